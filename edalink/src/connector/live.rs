//! Live EDA Connector
//!
//! Integration seam for a network-backed EDA service. No backend is wired
//! in yet: initialization checks credentials and every data operation
//! reports `NOT_IMPLEMENTED`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use super::EdaConnector;
use crate::config::{ConnectorConfig, ConnectorMode};
use crate::core::{ConnectorError, ConnectorResult, Page};
use crate::schema::*;

pub struct LiveEdaConnector {
    api_token: Option<String>,
    base_url: Option<String>,
    initialized: AtomicBool,
}

impl LiveEdaConnector {
    pub fn new(api_token: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_token,
            base_url,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self::new(config.api_token.clone(), config.base_url.clone())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn has_token(&self) -> bool {
        self.api_token.as_deref().map_or(false, |t| !t.trim().is_empty())
    }

    fn unavailable<T>(&self, operation: &str) -> ConnectorResult<T> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(ConnectorError::not_initialized());
        }
        Err(ConnectorError::not_implemented(operation))
    }
}

#[async_trait]
impl EdaConnector for LiveEdaConnector {
    fn mode(&self) -> ConnectorMode {
        ConnectorMode::Live
    }

    async fn initialize(&self) -> ConnectorResult<()> {
        if !self.has_token() {
            return Err(ConnectorError::auth_required("Live EDA connector requires an API token"));
        }
        self.initialized.store(true, Ordering::SeqCst);
        tracing::info!(
            "Live EDA connector initialized (base URL: {})",
            self.base_url.as_deref().unwrap_or("unset")
        );
        Ok(())
    }

    async fn health_check(&self) -> ConnectorResult<HealthStatus> {
        Ok(HealthStatus {
            healthy: false,
            initialized: self.initialized.load(Ordering::SeqCst),
            mode: ConnectorMode::Live,
            message: "Live EDA backend is not implemented".to_string(),
            checked_at: Utc::now(),
        })
    }

    async fn dispose(&self) -> ConnectorResult<()> {
        self.initialized.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn list_projects(&self, _filter: ProjectFilter) -> ConnectorResult<Page<Project>> {
        self.unavailable("list_projects")
    }

    async fn get_project(&self, _project_id: &str) -> ConnectorResult<Project> {
        self.unavailable("get_project")
    }

    async fn create_project(&self, _request: CreateProject) -> ConnectorResult<Project> {
        self.unavailable("create_project")
    }

    async fn update_project(&self, _project_id: &str, _patch: ProjectUpdate) -> ConnectorResult<Project> {
        self.unavailable("update_project")
    }

    async fn list_boards(&self, _project_id: &str) -> ConnectorResult<Vec<Board>> {
        self.unavailable("list_boards")
    }

    async fn get_board(&self, _board_id: &str) -> ConnectorResult<Board> {
        self.unavailable("get_board")
    }

    async fn create_board(&self, _request: CreateBoard) -> ConnectorResult<Board> {
        self.unavailable("create_board")
    }

    async fn update_board(&self, _board_id: &str, _patch: BoardUpdate) -> ConnectorResult<Board> {
        self.unavailable("update_board")
    }

    async fn list_components(&self, _board_id: &str, _filter: ComponentFilter) -> ConnectorResult<Page<Component>> {
        self.unavailable("list_components")
    }

    async fn get_component(&self, _board_id: &str, _component_id: &str) -> ConnectorResult<Component> {
        self.unavailable("get_component")
    }

    async fn place_component(&self, _board_id: &str, _request: PlaceComponent) -> ConnectorResult<Component> {
        self.unavailable("place_component")
    }

    async fn move_component(
        &self,
        _board_id: &str,
        _component_id: &str,
        _patch: ComponentMove,
    ) -> ConnectorResult<Component> {
        self.unavailable("move_component")
    }

    async fn delete_component(&self, _board_id: &str, _component_id: &str) -> ConnectorResult<Component> {
        self.unavailable("delete_component")
    }

    async fn list_nets(&self, _board_id: &str, _filter: NetFilter) -> ConnectorResult<Page<Net>> {
        self.unavailable("list_nets")
    }

    async fn get_net(&self, _board_id: &str, _net_id: &str) -> ConnectorResult<Net> {
        self.unavailable("get_net")
    }

    async fn create_net(&self, _board_id: &str, _request: CreateNet) -> ConnectorResult<Net> {
        self.unavailable("create_net")
    }

    async fn update_net(&self, _board_id: &str, _net_id: &str, _patch: NetUpdate) -> ConnectorResult<Net> {
        self.unavailable("update_net")
    }

    async fn run_drc(&self, _board_id: &str) -> ConnectorResult<DrcResult> {
        self.unavailable("run_drc")
    }

    async fn get_drc_violations(
        &self,
        _board_id: &str,
        _severity: Option<Severity>,
    ) -> ConnectorResult<Vec<DrcViolation>> {
        self.unavailable("get_drc_violations")
    }

    async fn list_design_rules(&self, _board_id: &str) -> ConnectorResult<Vec<DesignRule>> {
        self.unavailable("list_design_rules")
    }

    async fn update_drc_rule(
        &self,
        _board_id: &str,
        _rule_id: &str,
        _patch: RuleUpdate,
    ) -> ConnectorResult<DesignRule> {
        self.unavailable("update_drc_rule")
    }

    async fn run_auto_router(&self, _board_id: &str, _options: AutoRouteOptions) -> ConnectorResult<RoutingResult> {
        self.unavailable("run_auto_router")
    }

    async fn get_routing_status(&self, _board_id: &str) -> ConnectorResult<RoutingResult> {
        self.unavailable("get_routing_status")
    }

    async fn clear_routes(&self, _board_id: &str, _net_ids: Option<Vec<String>>) -> ConnectorResult<RoutesCleared> {
        self.unavailable("clear_routes")
    }

    async fn analyze_signal_integrity(
        &self,
        _board_id: &str,
        _net_ids: Option<Vec<String>>,
    ) -> ConnectorResult<SignalIntegrityResult> {
        self.unavailable("analyze_signal_integrity")
    }

    async fn export_gerber(&self, _board_id: &str, _options: GerberOptions) -> ConnectorResult<GerberExport> {
        self.unavailable("export_gerber")
    }

    async fn export_bom(&self, _board_id: &str, _options: BomOptions) -> ConnectorResult<BomExport> {
        self.unavailable("export_bom")
    }
}
