//! Design Analysis Service
//!
//! Composes connector calls into higher-level reports. The service holds no
//! state of its own; every report is computed from fresh connector reads.
//!
//! Connector failures are returned unchanged. Reports fail fast only on the
//! primary board fetch; secondary sections of the health report fall back to
//! empty values.

mod health;
mod placement;
mod routing;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::connector::EdaConnector;
use crate::core::ConnectorResult;
use crate::schema::*;

pub use health::{DrcSummary, HealthReport, SignalIntegritySummary};
pub use placement::{package_area, PlacementAnalysis, DENSITY_WARNING_PERCENT};
pub use routing::{NetRoutingCheck, RoutingAnalysis};

/// Board metadata merged with the current routing completion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub width: f64,
    pub height: f64,
    pub area: f64,
    pub layer_count: usize,
    pub component_count: usize,
    pub net_count: usize,
    pub trace_count: usize,
    pub via_count: usize,
    pub routing_completion: f64,
}

impl BoardSummary {
    fn from_board(board: &Board, routing_completion: f64) -> Self {
        Self {
            id: board.id.clone(),
            name: board.name.clone(),
            project_id: board.project_id.clone(),
            width: board.width,
            height: board.height,
            area: board.area(),
            layer_count: board.layers.len(),
            component_count: board.components.len(),
            net_count: board.nets.len(),
            trace_count: board.traces.len(),
            via_count: board.vias.len(),
            routing_completion,
        }
    }
}

/// Gerber manifest and BOM produced together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturingPackage {
    pub gerber: GerberExport,
    pub bom: BomExport,
}

pub struct DesignAnalysisService {
    connector: Arc<dyn EdaConnector>,
}

impl DesignAnalysisService {
    pub fn new(connector: Arc<dyn EdaConnector>) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &Arc<dyn EdaConnector> {
        &self.connector
    }

    /// Board metadata plus routing completion. Completion falls back to the
    /// trace coverage of the fetched board when routing status is unavailable.
    pub async fn board_summary(&self, board_id: &str) -> ConnectorResult<BoardSummary> {
        let board = self.connector.get_board(board_id).await?;
        let completion = match self.connector.get_routing_status(board_id).await {
            Ok(status) => status.completion_rate,
            Err(e) => {
                tracing::warn!("Routing status unavailable for {}: {}", board_id, e);
                board.routing_completion()
            }
        };
        Ok(BoardSummary::from_board(&board, completion))
    }

    pub async fn analyze_placement(&self, board_id: &str) -> ConnectorResult<PlacementAnalysis> {
        let board = self.connector.get_board(board_id).await?;
        Ok(PlacementAnalysis::from_board(&board))
    }

    pub async fn analyze_routing(&self, board_id: &str) -> ConnectorResult<RoutingAnalysis> {
        let board = self.connector.get_board(board_id).await?;
        Ok(RoutingAnalysis::from_board(&board))
    }

    /// Board summary, DRC, signal integrity and routing in one report.
    ///
    /// Runs DRC, which replaces the stored DRC result for the board.
    pub async fn health_report(&self, board_id: &str) -> ConnectorResult<HealthReport> {
        let board = self.board_summary(board_id).await?;
        let drc = self.connector.run_drc(board_id).await;
        let signal_integrity = self.connector.analyze_signal_integrity(board_id, None).await;
        let routing = self.analyze_routing(board_id).await;
        Ok(HealthReport::assemble(board, drc, signal_integrity, routing))
    }

    /// Gerber then BOM; stops at the first failure.
    pub async fn manufacturing_export(
        &self,
        board_id: &str,
        gerber: GerberOptions,
        bom: BomOptions,
    ) -> ConnectorResult<ManufacturingPackage> {
        let gerber = self.connector.export_gerber(board_id, gerber).await?;
        let bom = self.connector.export_bom(board_id, bom).await?;
        tracing::info!(
            "Manufacturing package for {}: {} Gerber files, {} BOM lines",
            board_id,
            gerber.files.len(),
            bom.entries.len()
        );
        Ok(ManufacturingPackage { gerber, bom })
    }
}
