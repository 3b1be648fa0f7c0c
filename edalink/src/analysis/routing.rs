//! Routing coverage: per-layer utilization, unrouted nets and the
//! critical/high-priority net checklist.

use serde::{Deserialize, Serialize};

use crate::schema::design::round1;
use crate::schema::{Board, LayerUtilization, NetPriority};

/// Routing state of one critical or high-priority net
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetRoutingCheck {
    pub net_id: String,
    pub net_name: String,
    pub priority: NetPriority,
    pub routed: bool,
    pub trace_count: usize,
    pub routed_length: f64,
    pub max_length: Option<f64>,
    /// `true` when the net has no length budget
    pub within_max_length: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingAnalysis {
    pub board_id: String,
    pub completion_rate: f64,
    pub total_nets: usize,
    pub routed_nets: usize,
    pub layer_utilization: Vec<LayerUtilization>,
    pub unrouted_nets: Vec<String>,
    pub critical_nets: Vec<NetRoutingCheck>,
}

impl RoutingAnalysis {
    pub fn from_board(board: &Board) -> Self {
        let layer_utilization = board
            .layers
            .iter()
            .map(|layer| LayerUtilization {
                layer: layer.name.clone(),
                routed_length: round1(board.routed_length_on(&layer.name)),
                utilization: board.layer_utilization(&layer.name),
            })
            .collect();

        let unrouted_nets = board
            .nets
            .iter()
            .filter(|n| !board.is_net_routed(&n.id))
            .map(|n| n.id.clone())
            .collect();

        let critical_nets = board
            .nets
            .iter()
            .filter(|n| n.priority.is_critical_or_high())
            .map(|net| {
                let trace_count = board.traces.iter().filter(|t| t.net_id == net.id).count();
                let routed_length = round1(board.net_length(&net.id));
                NetRoutingCheck {
                    net_id: net.id.clone(),
                    net_name: net.name.clone(),
                    priority: net.priority,
                    routed: trace_count > 0,
                    trace_count,
                    routed_length,
                    max_length: net.max_length,
                    within_max_length: net.max_length.map_or(true, |max| routed_length <= max),
                }
            })
            .collect();

        Self {
            board_id: board.id.clone(),
            completion_rate: board.routing_completion(),
            total_nets: board.nets.len(),
            routed_nets: board.routed_net_count(),
            layer_utilization,
            unrouted_nets,
            critical_nets,
        }
    }

    /// Critical or high-priority nets without any trace
    pub fn unrouted_critical(&self) -> Vec<&str> {
        self.critical_nets
            .iter()
            .filter(|c| !c.routed)
            .map(|c| c.net_id.as_str())
            .collect()
    }
}
