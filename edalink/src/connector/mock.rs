//! Mock EDA Connector
//!
//! Serves an in-memory [`BoardStore`], optionally seeded with the demo
//! project. All state lives for the lifetime of the connector instance.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use super::random::{self, RandomSource};
use super::store::BoardStore;
use super::EdaConnector;
use crate::config::{ConnectorConfig, ConnectorMode};
use crate::core::{ConnectorError, ConnectorResult, Page};
use crate::schema::*;

pub struct MockEdaConnector {
    initialized: AtomicBool,
    store: RwLock<BoardStore>,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl MockEdaConnector {
    /// Demo data with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_store(BoardStore::with_demo_data(), random::from_entropy())
    }

    /// No projects or boards
    pub fn empty() -> Self {
        Self::with_store(BoardStore::new(), random::from_entropy())
    }

    pub fn from_config(config: &ConnectorConfig) -> Self {
        let store = if config.seed_demo_data {
            BoardStore::with_demo_data()
        } else {
            BoardStore::new()
        };
        let rng = match config.seed {
            Some(seed) => random::seeded(seed),
            None => random::from_entropy(),
        };
        Self::with_store(store, rng)
    }

    pub fn with_store(store: BoardStore, rng: Box<dyn RandomSource>) -> Self {
        Self {
            initialized: AtomicBool::new(false),
            store: RwLock::new(store),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the random source, e.g. with a [`ScriptedRandom`](super::ScriptedRandom)
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn ensure_initialized(&self) -> ConnectorResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(ConnectorError::not_initialized())
        }
    }

    async fn read<T>(&self, op: impl FnOnce(&BoardStore) -> ConnectorResult<T>) -> ConnectorResult<T> {
        self.ensure_initialized()?;
        let store = self.store.read().await;
        op(&store)
    }

    async fn write<T>(&self, op: impl FnOnce(&mut BoardStore) -> ConnectorResult<T>) -> ConnectorResult<T> {
        self.ensure_initialized()?;
        let mut store = self.store.write().await;
        op(&mut store)
    }
}

impl Default for MockEdaConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EdaConnector for MockEdaConnector {
    fn mode(&self) -> ConnectorMode {
        ConnectorMode::Mock
    }

    async fn initialize(&self) -> ConnectorResult<()> {
        self.initialized.store(true, Ordering::SeqCst);
        tracing::info!("Mock EDA connector initialized");
        Ok(())
    }

    async fn health_check(&self) -> ConnectorResult<HealthStatus> {
        let initialized = self.is_initialized();
        Ok(HealthStatus {
            healthy: initialized,
            initialized,
            mode: ConnectorMode::Mock,
            message: if initialized {
                "Mock EDA connector ready".to_string()
            } else {
                "Mock EDA connector not initialized".to_string()
            },
            checked_at: Utc::now(),
        })
    }

    async fn dispose(&self) -> ConnectorResult<()> {
        self.initialized.store(false, Ordering::SeqCst);
        tracing::info!("Mock EDA connector disposed");
        Ok(())
    }

    async fn list_projects(&self, filter: ProjectFilter) -> ConnectorResult<Page<Project>> {
        self.read(|s| Ok(s.list_projects(&filter))).await
    }

    async fn get_project(&self, project_id: &str) -> ConnectorResult<Project> {
        tracing::debug!("get_project {}", project_id);
        self.read(|s| s.project(project_id).cloned()).await
    }

    async fn create_project(&self, request: CreateProject) -> ConnectorResult<Project> {
        let project = self.write(|s| Ok(s.create_project(request))).await?;
        tracing::info!("Created project {} ({})", project.id, project.name);
        Ok(project)
    }

    async fn update_project(&self, project_id: &str, patch: ProjectUpdate) -> ConnectorResult<Project> {
        self.write(|s| s.update_project(project_id, patch)).await
    }

    async fn list_boards(&self, project_id: &str) -> ConnectorResult<Vec<Board>> {
        self.read(|s| s.boards_for_project(project_id)).await
    }

    async fn get_board(&self, board_id: &str) -> ConnectorResult<Board> {
        tracing::debug!("get_board {}", board_id);
        self.read(|s| s.board(board_id).cloned()).await
    }

    async fn create_board(&self, request: CreateBoard) -> ConnectorResult<Board> {
        let board = self.write(|s| s.create_board(request)).await?;
        tracing::info!(
            "Created board {} with {} layers on project {}",
            board.id,
            board.layers.len(),
            board.project_id
        );
        Ok(board)
    }

    async fn update_board(&self, board_id: &str, patch: BoardUpdate) -> ConnectorResult<Board> {
        self.write(|s| s.update_board(board_id, patch)).await
    }

    async fn list_components(&self, board_id: &str, filter: ComponentFilter) -> ConnectorResult<Page<Component>> {
        self.read(|s| s.list_components(board_id, &filter)).await
    }

    async fn get_component(&self, board_id: &str, component_id: &str) -> ConnectorResult<Component> {
        self.read(|s| s.component(board_id, component_id).cloned()).await
    }

    async fn place_component(&self, board_id: &str, request: PlaceComponent) -> ConnectorResult<Component> {
        let component = self.write(|s| s.place_component(board_id, request)).await?;
        tracing::info!("Placed {} as {} on {}", component.designator, component.id, board_id);
        Ok(component)
    }

    async fn move_component(
        &self,
        board_id: &str,
        component_id: &str,
        patch: ComponentMove,
    ) -> ConnectorResult<Component> {
        self.write(|s| s.move_component(board_id, component_id, patch)).await
    }

    async fn delete_component(&self, board_id: &str, component_id: &str) -> ConnectorResult<Component> {
        let removed = self.write(|s| s.delete_component(board_id, component_id)).await?;
        tracing::info!("Deleted component {} from {}", component_id, board_id);
        Ok(removed)
    }

    async fn list_nets(&self, board_id: &str, filter: NetFilter) -> ConnectorResult<Page<Net>> {
        self.read(|s| s.list_nets(board_id, &filter)).await
    }

    async fn get_net(&self, board_id: &str, net_id: &str) -> ConnectorResult<Net> {
        self.read(|s| s.net(board_id, net_id).cloned()).await
    }

    async fn create_net(&self, board_id: &str, request: CreateNet) -> ConnectorResult<Net> {
        let net = self.write(|s| s.create_net(board_id, request)).await?;
        tracing::info!("Created net {} on {}", net.id, board_id);
        Ok(net)
    }

    async fn update_net(&self, board_id: &str, net_id: &str, patch: NetUpdate) -> ConnectorResult<Net> {
        self.write(|s| s.update_net(board_id, net_id, patch)).await
    }

    async fn run_drc(&self, board_id: &str) -> ConnectorResult<DrcResult> {
        let result = self.write(|s| s.run_drc(board_id)).await?;
        tracing::info!(
            "DRC on {}: {} errors, {} warnings",
            board_id,
            result.error_count,
            result.warning_count
        );
        Ok(result)
    }

    async fn get_drc_violations(
        &self,
        board_id: &str,
        severity: Option<Severity>,
    ) -> ConnectorResult<Vec<DrcViolation>> {
        self.read(|s| s.drc_violations(board_id, severity)).await
    }

    async fn list_design_rules(&self, board_id: &str) -> ConnectorResult<Vec<DesignRule>> {
        self.read(|s| s.design_rules(board_id)).await
    }

    async fn update_drc_rule(&self, board_id: &str, rule_id: &str, patch: RuleUpdate) -> ConnectorResult<DesignRule> {
        let rule = self.write(|s| s.update_rule(board_id, rule_id, patch)).await?;
        tracing::info!("Updated rule {} on {} (enabled: {})", rule.id, board_id, rule.enabled);
        Ok(rule)
    }

    async fn run_auto_router(&self, board_id: &str, options: AutoRouteOptions) -> ConnectorResult<RoutingResult> {
        self.ensure_initialized()?;
        let mut store = self.store.write().await;
        let mut rng = self.rng.lock().await;
        let result = store.run_auto_router(board_id, &options, &mut **rng)?;
        tracing::info!(
            "Auto-router on {}: {} traces, {} vias added, {}% complete",
            board_id,
            result.traces_added,
            result.vias_added,
            result.completion_rate
        );
        Ok(result)
    }

    async fn get_routing_status(&self, board_id: &str) -> ConnectorResult<RoutingResult> {
        self.read(|s| s.routing_status(board_id)).await
    }

    async fn clear_routes(&self, board_id: &str, net_ids: Option<Vec<String>>) -> ConnectorResult<RoutesCleared> {
        let cleared = self.write(|s| s.clear_routes(board_id, net_ids.as_deref())).await?;
        tracing::info!(
            "Cleared {} traces and {} vias from {}",
            cleared.traces_removed,
            cleared.vias_removed,
            board_id
        );
        Ok(cleared)
    }

    async fn analyze_signal_integrity(
        &self,
        board_id: &str,
        net_ids: Option<Vec<String>>,
    ) -> ConnectorResult<SignalIntegrityResult> {
        self.ensure_initialized()?;
        let store = self.store.read().await;
        let mut rng = self.rng.lock().await;
        store.analyze_signal_integrity(board_id, net_ids.as_deref(), &mut **rng)
    }

    async fn export_gerber(&self, board_id: &str, options: GerberOptions) -> ConnectorResult<GerberExport> {
        self.ensure_initialized()?;
        let store = self.store.read().await;
        let mut rng = self.rng.lock().await;
        let export = store.export_gerber(board_id, &options, &mut **rng)?;
        tracing::info!("Gerber export for {}: {} files", board_id, export.files.len());
        Ok(export)
    }

    async fn export_bom(&self, board_id: &str, options: BomOptions) -> ConnectorResult<BomExport> {
        self.read(|s| s.export_bom(board_id, &options)).await
    }
}
