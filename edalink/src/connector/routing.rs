//! Auto-routing simulation.
//!
//! The router does not search for paths. It synthesizes one trace per
//! unrouted net, alternating across the signal layers, and drops a via from
//! "Top" for every trace that lands on another layer. Results are written back
//! into the board.

use chrono::Utc;

use super::random::RandomSource;
use super::store::BoardStore;
use crate::core::{ConnectorError, ConnectorResult};
use crate::schema::*;

const DEFAULT_TRACE_WIDTH: f64 = 0.2;
const VIA_DRILL: f64 = 0.3;
const VIA_PAD: f64 = 0.6;

fn snapshot(board: &Board, traces_added: usize, vias_added: usize) -> RoutingResult {
    let unrouted_nets: Vec<String> = board
        .nets
        .iter()
        .filter(|n| !board.is_net_routed(&n.id))
        .map(|n| n.id.clone())
        .collect();
    RoutingResult {
        board_id: board.id.clone(),
        completion_rate: board.routing_completion(),
        total_nets: board.nets.len(),
        routed_nets: board.routed_net_count(),
        unrouted_nets,
        traces_added,
        vias_added,
        traces: board.traces.clone(),
        vias: board.vias.clone(),
        layer_utilization: board
            .layers
            .iter()
            .map(|l| LayerUtilization {
                layer: l.name.clone(),
                routed_length: board.routed_length_on(&l.name),
                utilization: board.layer_utilization(&l.name),
            })
            .collect(),
        completed_at: Utc::now(),
    }
}

impl BoardStore {
    pub fn run_auto_router(
        &mut self,
        board_id: &str,
        options: &AutoRouteOptions,
        rng: &mut dyn RandomSource,
    ) -> ConnectorResult<RoutingResult> {
        let board = self.boards.get_mut(board_id).ok_or_else(|| ConnectorError::not_found("Board", board_id))?;

        if let Some(requested) = &options.net_ids {
            if let Some(missing) = requested.iter().find(|id| !board.has_net(id)) {
                return Err(ConnectorError::not_found("Net", missing));
            }
        }

        let targets: Vec<String> = board
            .nets
            .iter()
            .filter(|n| !board.is_net_routed(&n.id))
            .filter(|n| options.net_ids.as_ref().map_or(true, |ids| ids.contains(&n.id)))
            .map(|n| n.id.clone())
            .collect();

        let mut signal_layers: Vec<String> = board
            .layers
            .iter()
            .filter(|l| l.layer_type == LayerType::Signal)
            .map(|l| l.name.clone())
            .collect();
        if signal_layers.is_empty() {
            signal_layers = board.layers.iter().map(|l| l.name.clone()).collect();
        }
        let top = signal_layers.first().cloned().unwrap_or_else(|| "Top".to_string());
        let width = options.trace_width.unwrap_or(DEFAULT_TRACE_WIDTH);

        let mut new_traces = Vec::new();
        let mut new_vias = Vec::new();
        for (i, net_id) in targets.iter().enumerate() {
            let layer = signal_layers[i % signal_layers.len()].clone();
            let length = (rng.range(8.0, 45.0) * 10.0).round() / 10.0;
            let x = 5.0 + (i as f64 * 3.0) % board.width.max(1.0);
            let start = Point::new(x, 5.0);
            let end = Point::new(x, 5.0 + length.min(board.height.max(1.0)));

            if layer != top {
                new_vias.push(Via {
                    id: self.ids.via.mint(),
                    net_id: net_id.clone(),
                    position: start,
                    drill_size: VIA_DRILL,
                    pad_size: VIA_PAD,
                    start_layer: top.clone(),
                    end_layer: layer.clone(),
                });
            }
            new_traces.push(Trace {
                id: self.ids.trace.mint(),
                net_id: net_id.clone(),
                layer,
                points: vec![start, end],
                width,
                length,
                status: TraceStatus::Routed,
            });
        }

        let traces_added = new_traces.len();
        let vias_added = new_vias.len();
        board.traces.extend(new_traces);
        board.vias.extend(new_vias);
        board.updated_at = Utc::now();

        let result = snapshot(board, traces_added, vias_added);
        self.routing_results.insert(board_id.to_string(), result.clone());
        Ok(result)
    }

    /// Last stored routing result, or one derived from current trace coverage.
    pub fn routing_status(&self, board_id: &str) -> ConnectorResult<RoutingResult> {
        let board = self.board(board_id)?;
        Ok(self
            .routing_results
            .get(board_id)
            .cloned()
            .unwrap_or_else(|| snapshot(board, 0, 0)))
    }

    /// Remove every trace and via, or only those on `net_ids`. Discards the
    /// stored routing result.
    pub fn clear_routes(&mut self, board_id: &str, net_ids: Option<&[String]>) -> ConnectorResult<RoutesCleared> {
        let board = self.board_mut(board_id)?;
        let before = (board.traces.len(), board.vias.len());
        match net_ids {
            Some(ids) => {
                board.traces.retain(|t| !ids.contains(&t.net_id));
                board.vias.retain(|v| !ids.contains(&v.net_id));
            }
            None => {
                board.traces.clear();
                board.vias.clear();
            }
        }
        board.updated_at = Utc::now();
        let cleared = RoutesCleared {
            board_id: board_id.to_string(),
            traces_removed: before.0 - board.traces.len(),
            vias_removed: before.1 - board.vias.len(),
        };
        self.routing_results.remove(board_id);
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::random::ScriptedRandom;
    use crate::connector::seed::DEMO_BOARD_ID;

    #[test]
    fn test_router_routes_unrouted_nets() {
        let mut store = BoardStore::with_demo_data();
        let before = store.routing_status(DEMO_BOARD_ID).unwrap();
        assert_eq!(before.unrouted_nets, vec!["NET_I2C_SDA", "NET_I2C_SCL"]);

        let mut rng = ScriptedRandom::constant(0.0);
        let result = store
            .run_auto_router(DEMO_BOARD_ID, &AutoRouteOptions::default(), &mut rng)
            .unwrap();
        assert_eq!(result.traces_added, 2);
        // Signal layers are Top and Bottom; the second trace needs a via.
        assert_eq!(result.vias_added, 1);
        assert_eq!(result.completion_rate, 100.0);
        assert!(result.unrouted_nets.is_empty());
        assert_eq!(result.traces.last().unwrap().length, 8.0);
    }

    #[test]
    fn test_router_net_filter() {
        let mut store = BoardStore::with_demo_data();
        let options = AutoRouteOptions {
            net_ids: Some(vec!["NET_I2C_SCL".to_string()]),
            trace_width: Some(0.25),
        };
        let mut rng = ScriptedRandom::constant(0.5);
        let result = store.run_auto_router(DEMO_BOARD_ID, &options, &mut rng).unwrap();
        assert_eq!(result.traces_added, 1);
        assert_eq!(result.unrouted_nets, vec!["NET_I2C_SDA"]);
        assert_eq!(result.traces.last().unwrap().width, 0.25);

        let bad = AutoRouteOptions {
            net_ids: Some(vec!["NET_MISSING".to_string()]),
            trace_width: None,
        };
        assert!(store.run_auto_router(DEMO_BOARD_ID, &bad, &mut rng).is_err());
    }

    #[test]
    fn test_clear_routes_discards_stored_result() {
        let mut store = BoardStore::with_demo_data();
        let mut rng = ScriptedRandom::constant(0.5);
        store
            .run_auto_router(DEMO_BOARD_ID, &AutoRouteOptions::default(), &mut rng)
            .unwrap();
        let cleared = store.clear_routes(DEMO_BOARD_ID, None).unwrap();
        assert_eq!(cleared.traces_removed, 7);
        assert_eq!(cleared.vias_removed, 3);

        let status = store.routing_status(DEMO_BOARD_ID).unwrap();
        assert_eq!(status.completion_rate, 0.0);
        assert_eq!(status.traces_added, 0);
    }

    #[test]
    fn test_layer_utilization_capped() {
        let mut store = BoardStore::with_demo_data();
        let status = store.routing_status(DEMO_BOARD_ID).unwrap();
        let top = status.layer_utilization.iter().find(|l| l.layer == "Top").unwrap();
        // 22.4 + 21.6 + 20.1 over a 180mm perimeter
        assert_eq!(top.utilization, 35.6);

        let board = store.board_mut(DEMO_BOARD_ID).unwrap();
        board.traces[2].length = 1000.0;
        let status = store.routing_status(DEMO_BOARD_ID).unwrap();
        let top = status.layer_utilization.iter().find(|l| l.layer == "Top").unwrap();
        assert_eq!(top.utilization, 100.0);
    }
}
