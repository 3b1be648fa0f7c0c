//! EDA Connector
//!
//! A common interface over PCB design backends. Two implementations exist:
//! [`MockEdaConnector`], which serves an in-memory board store, and
//! [`LiveEdaConnector`], the integration seam for a real backend.
//!
//! Every operation except [`EdaConnector::initialize`],
//! [`EdaConnector::health_check`] and [`EdaConnector::dispose`] fails with
//! `NOT_INITIALIZED` until the connector has been initialized. Results convert
//! into the wire [`Envelope`](crate::core::Envelope) with `Envelope::from`.

mod drc;
mod export;
mod live;
mod mock;
pub mod random;
mod routing;
pub mod seed;
mod signal;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ConnectorConfig, ConnectorMode};
use crate::core::{ConnectorResult, Page};
use crate::schema::*;

pub use live::LiveEdaConnector;
pub use mock::MockEdaConnector;
pub use random::{RandomSource, ScriptedRandom};
pub use seed::{DEMO_BOARD_ID, DEMO_PROJECT_ID};
pub use store::BoardStore;

/// Common trait for all EDA backends
#[async_trait]
pub trait EdaConnector: Send + Sync {
    /// Backend kind
    fn mode(&self) -> ConnectorMode;

    /// Prepare the connector for data operations
    async fn initialize(&self) -> ConnectorResult<()>;

    /// Report readiness. Allowed in any state.
    async fn health_check(&self) -> ConnectorResult<HealthStatus>;

    /// Return to the uninitialized state. Stored data is kept.
    async fn dispose(&self) -> ConnectorResult<()>;

    // Projects

    async fn list_projects(&self, filter: ProjectFilter) -> ConnectorResult<Page<Project>>;

    async fn get_project(&self, project_id: &str) -> ConnectorResult<Project>;

    async fn create_project(&self, request: CreateProject) -> ConnectorResult<Project>;

    async fn update_project(&self, project_id: &str, patch: ProjectUpdate) -> ConnectorResult<Project>;

    // Boards

    async fn list_boards(&self, project_id: &str) -> ConnectorResult<Vec<Board>>;

    async fn get_board(&self, board_id: &str) -> ConnectorResult<Board>;

    async fn create_board(&self, request: CreateBoard) -> ConnectorResult<Board>;

    async fn update_board(&self, board_id: &str, patch: BoardUpdate) -> ConnectorResult<Board>;

    // Components

    async fn list_components(&self, board_id: &str, filter: ComponentFilter) -> ConnectorResult<Page<Component>>;

    async fn get_component(&self, board_id: &str, component_id: &str) -> ConnectorResult<Component>;

    async fn place_component(&self, board_id: &str, request: PlaceComponent) -> ConnectorResult<Component>;

    /// Fails with `VALIDATION_ERROR` for locked components
    async fn move_component(
        &self,
        board_id: &str,
        component_id: &str,
        patch: ComponentMove,
    ) -> ConnectorResult<Component>;

    /// Returns the removed component
    async fn delete_component(&self, board_id: &str, component_id: &str) -> ConnectorResult<Component>;

    // Nets

    async fn list_nets(&self, board_id: &str, filter: NetFilter) -> ConnectorResult<Page<Net>>;

    async fn get_net(&self, board_id: &str, net_id: &str) -> ConnectorResult<Net>;

    async fn create_net(&self, board_id: &str, request: CreateNet) -> ConnectorResult<Net>;

    async fn update_net(&self, board_id: &str, net_id: &str, patch: NetUpdate) -> ConnectorResult<Net>;

    // Design rules

    /// Run DRC. Replaces the stored result for the board.
    async fn run_drc(&self, board_id: &str) -> ConnectorResult<DrcResult>;

    /// Violations of the latest run. `NOT_FOUND` when DRC has not been run.
    async fn get_drc_violations(
        &self,
        board_id: &str,
        severity: Option<Severity>,
    ) -> ConnectorResult<Vec<DrcViolation>>;

    async fn list_design_rules(&self, board_id: &str) -> ConnectorResult<Vec<DesignRule>>;

    async fn update_drc_rule(&self, board_id: &str, rule_id: &str, patch: RuleUpdate) -> ConnectorResult<DesignRule>;

    // Routing

    /// Route unrouted nets. Writes traces and vias into the board and
    /// replaces the stored routing result.
    async fn run_auto_router(&self, board_id: &str, options: AutoRouteOptions) -> ConnectorResult<RoutingResult>;

    async fn get_routing_status(&self, board_id: &str) -> ConnectorResult<RoutingResult>;

    /// Remove traces and vias from the board, all of them or only those on
    /// `net_ids`. Discards the stored routing result.
    async fn clear_routes(&self, board_id: &str, net_ids: Option<Vec<String>>) -> ConnectorResult<RoutesCleared>;

    // Analysis and export

    async fn analyze_signal_integrity(
        &self,
        board_id: &str,
        net_ids: Option<Vec<String>>,
    ) -> ConnectorResult<SignalIntegrityResult>;

    async fn export_gerber(&self, board_id: &str, options: GerberOptions) -> ConnectorResult<GerberExport>;

    async fn export_bom(&self, board_id: &str, options: BomOptions) -> ConnectorResult<BomExport>;
}

/// Build the connector selected by `config.mode`.
pub fn create_connector(config: &ConnectorConfig) -> Arc<dyn EdaConnector> {
    tracing::debug!("Creating {} connector", config.mode);
    match config.mode {
        ConnectorMode::Mock => Arc::new(MockEdaConnector::from_config(config)),
        ConnectorMode::Live => Arc::new(LiveEdaConnector::from_config(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_follows_mode() {
        assert_eq!(create_connector(&ConnectorConfig::mock()).mode(), ConnectorMode::Mock);
        let live = create_connector(&ConnectorConfig::live(Some("token".to_string())));
        assert_eq!(live.mode(), ConnectorMode::Live);
    }
}
