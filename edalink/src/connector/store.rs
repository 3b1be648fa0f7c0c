//! In-memory board store.
//!
//! Owns every project and board plus the latest DRC and routing result per
//! board. All methods are synchronous; the connector wraps them with the
//! initialization check and locking. Domain operations (DRC, routing, signal
//! integrity, export) live in sibling modules as further `impl BoardStore`
//! blocks.

use std::collections::HashMap;

use chrono::Utc;

use crate::core::{ConnectorError, ConnectorResult, Page};
use crate::schema::*;

pub const DEFAULT_PROJECT_LIMIT: usize = 25;
pub const DEFAULT_COMPONENT_LIMIT: usize = 100;
pub const DEFAULT_NET_LIMIT: usize = 100;

/// Monotonic ID generator for one collection.
///
/// IDs are never reused, even after the entity they named is deleted.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: &'static str,
    next: u32,
}

impl IdSequence {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    pub fn mint(&mut self) -> String {
        let id = format!("{}{:03}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Sequences {
    pub project: IdSequence,
    pub board: IdSequence,
    pub component: IdSequence,
    pub trace: IdSequence,
    pub via: IdSequence,
    pub rule: IdSequence,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            project: IdSequence::new("PROJ"),
            board: IdSequence::new("BRD"),
            component: IdSequence::new("COMP"),
            trace: IdSequence::new("TRC"),
            via: IdSequence::new("VIA"),
            rule: IdSequence::new("RULE"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    pub(crate) projects: Vec<Project>,
    pub(crate) boards: HashMap<String, Board>,
    pub(crate) drc_results: HashMap<String, DrcResult>,
    pub(crate) routing_results: HashMap<String, RoutingResult>,
    pub(crate) ids: Sequences,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the demo project and board.
    pub fn with_demo_data() -> Self {
        let mut store = Self::new();
        super::seed::populate(&mut store);
        store
    }

    // ---- projects ----------------------------------------------------------

    pub fn list_projects(&self, filter: &ProjectFilter) -> Page<Project> {
        let matching: Vec<Project> = self
            .projects
            .iter()
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        filter.page.apply(matching, DEFAULT_PROJECT_LIMIT)
    }

    pub fn project(&self, id: &str) -> ConnectorResult<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ConnectorError::not_found("Project", id))
    }

    fn project_mut(&mut self, id: &str) -> ConnectorResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ConnectorError::not_found("Project", id))
    }

    pub fn create_project(&mut self, request: CreateProject) -> Project {
        let now = Utc::now();
        let project = Project {
            id: self.ids.project.mint(),
            name: request.name,
            description: request.description,
            status: ProjectStatus::Draft,
            version: "0.1.0".to_string(),
            boards: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.projects.push(project.clone());
        project
    }

    pub fn update_project(&mut self, id: &str, patch: ProjectUpdate) -> ConnectorResult<Project> {
        let project = self.project_mut(id)?;
        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = Some(description);
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        if let Some(version) = patch.version {
            project.version = version;
        }
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    // ---- boards ------------------------------------------------------------

    pub fn boards_for_project(&self, project_id: &str) -> ConnectorResult<Vec<Board>> {
        let project = self.project(project_id)?;
        Ok(project
            .boards
            .iter()
            .filter_map(|r| self.boards.get(&r.id).cloned())
            .collect())
    }

    pub fn board(&self, id: &str) -> ConnectorResult<&Board> {
        self.boards
            .get(id)
            .ok_or_else(|| ConnectorError::not_found("Board", id))
    }

    pub(crate) fn board_mut(&mut self, id: &str) -> ConnectorResult<&mut Board> {
        self.boards
            .get_mut(id)
            .ok_or_else(|| ConnectorError::not_found("Board", id))
    }

    pub fn create_board(&mut self, request: CreateBoard) -> ConnectorResult<Board> {
        // Existence check first so a failed create does not burn an ID.
        self.project(&request.project_id)?;
        if request.layer_count < 2 {
            return Err(ConnectorError::validation(format!(
                "layerCount must be at least 2, got {}",
                request.layer_count
            )));
        }

        let now = Utc::now();
        let design_rules = vec![
            DesignRule::new(&self.ids.rule.mint(), "Minimum Clearance", RuleType::Clearance, 0.15, "mm", Severity::Error),
            DesignRule::new(&self.ids.rule.mint(), "Minimum Trace Width", RuleType::Width, 0.15, "mm", Severity::Error),
            DesignRule::new(&self.ids.rule.mint(), "Minimum Drill Size", RuleType::Drill, 0.3, "mm", Severity::Warning),
        ];
        let board = Board {
            id: self.ids.board.mint(),
            project_id: request.project_id.clone(),
            name: request.name,
            width: request.width,
            height: request.height,
            layers: Layer::default_stack(request.layer_count),
            components: Vec::new(),
            nets: Vec::new(),
            traces: Vec::new(),
            vias: Vec::new(),
            design_rules,
            created_at: now,
            updated_at: now,
        };

        let project = self.project_mut(&request.project_id)?;
        project.boards.push(BoardRef {
            id: board.id.clone(),
            name: board.name.clone(),
        });
        project.updated_at = now;

        self.boards.insert(board.id.clone(), board.clone());
        Ok(board)
    }

    pub fn update_board(&mut self, id: &str, patch: BoardUpdate) -> ConnectorResult<Board> {
        let board = self.board_mut(id)?;
        if let Some(name) = patch.name {
            board.name = name;
        }
        if let Some(width) = patch.width {
            board.width = width;
        }
        if let Some(height) = patch.height {
            board.height = height;
        }
        board.updated_at = Utc::now();
        let updated = board.clone();

        // Keep the project's denormalized summary in step with renames.
        if let Ok(project) = self.project_mut(&updated.project_id) {
            if let Some(r) = project.boards.iter_mut().find(|r| r.id == updated.id) {
                r.name = updated.name.clone();
            }
        }
        Ok(updated)
    }

    // ---- components --------------------------------------------------------

    pub fn list_components(&self, board_id: &str, filter: &ComponentFilter) -> ConnectorResult<Page<Component>> {
        let board = self.board(board_id)?;
        let matching: Vec<Component> = board
            .components
            .iter()
            .filter(|c| filter.layer.map_or(true, |side| c.layer == side))
            .cloned()
            .collect();
        Ok(filter.page.apply(matching, DEFAULT_COMPONENT_LIMIT))
    }

    pub fn component(&self, board_id: &str, component_id: &str) -> ConnectorResult<&Component> {
        self.board(board_id)?
            .find_component(component_id)
            .ok_or_else(|| ConnectorError::not_found("Component", component_id))
    }

    pub fn place_component(&mut self, board_id: &str, request: PlaceComponent) -> ConnectorResult<Component> {
        let board = self.board(board_id)?;
        for pin in &request.pins {
            if let Some(net_id) = &pin.net_id {
                if !board.has_net(net_id) {
                    return Err(ConnectorError::validation(format!(
                        "Pin {} references unknown net {}",
                        pin.id, net_id
                    )));
                }
            }
        }

        let component = Component {
            id: self.ids.component.mint(),
            designator: request.designator,
            value: request.value,
            package: request.package,
            part_number: request.part_number,
            position: request.position,
            rotation: request.rotation.unwrap_or(0.0),
            layer: request.layer.unwrap_or(Side::Top),
            locked: false,
            pins: request.pins,
        };
        let board = self.board_mut(board_id)?;
        board.components.push(component.clone());
        board.updated_at = Utc::now();
        Ok(component)
    }

    pub fn move_component(
        &mut self,
        board_id: &str,
        component_id: &str,
        patch: ComponentMove,
    ) -> ConnectorResult<Component> {
        let board = self.board_mut(board_id)?;
        let component = board
            .components
            .iter_mut()
            .find(|c| c.id == component_id)
            .ok_or_else(|| ConnectorError::not_found("Component", component_id))?;
        if component.locked {
            return Err(ConnectorError::validation(format!(
                "Component {} is locked and cannot be moved",
                component_id
            )));
        }
        if let Some(position) = patch.position {
            component.position = position;
        }
        if let Some(rotation) = patch.rotation {
            component.rotation = rotation;
        }
        if let Some(layer) = patch.layer {
            component.layer = layer;
        }
        let moved = component.clone();
        board.updated_at = Utc::now();
        Ok(moved)
    }

    /// Removes the component and drops its pin keys from every net.
    pub fn delete_component(&mut self, board_id: &str, component_id: &str) -> ConnectorResult<Component> {
        let board = self.board_mut(board_id)?;
        let index = board
            .components
            .iter()
            .position(|c| c.id == component_id)
            .ok_or_else(|| ConnectorError::not_found("Component", component_id))?;
        let removed = board.components.remove(index);
        let prefix = format!("{}:", removed.id);
        for net in &mut board.nets {
            net.pins.retain(|key| !key.starts_with(&prefix));
        }
        board.updated_at = Utc::now();
        Ok(removed)
    }

    // ---- nets --------------------------------------------------------------

    pub fn list_nets(&self, board_id: &str, filter: &NetFilter) -> ConnectorResult<Page<Net>> {
        let board = self.board(board_id)?;
        let matching: Vec<Net> = board
            .nets
            .iter()
            .filter(|n| filter.priority.map_or(true, |p| n.priority == p))
            .filter(|n| filter.net_class.as_deref().map_or(true, |c| n.net_class == c))
            .cloned()
            .collect();
        Ok(filter.page.apply(matching, DEFAULT_NET_LIMIT))
    }

    pub fn net(&self, board_id: &str, net_id: &str) -> ConnectorResult<&Net> {
        self.board(board_id)?
            .find_net(net_id)
            .ok_or_else(|| ConnectorError::not_found("Net", net_id))
    }

    pub fn create_net(&mut self, board_id: &str, request: CreateNet) -> ConnectorResult<Net> {
        let board = self.board_mut(board_id)?;
        if request.name.trim().is_empty() {
            return Err(ConnectorError::validation("Net name must not be blank"));
        }
        let id = Net::id_for_name(&request.name);
        if board.has_net(&id) {
            return Err(ConnectorError::validation(format!("Net {} already exists", id)));
        }
        if let Some(key) = request.pins.iter().find(|k| !board.has_pin_key(k)) {
            return Err(ConnectorError::validation(format!(
                "Pin reference {} does not match a component pin",
                key
            )));
        }
        if let Some(partner) = &request.diff_pair {
            if *partner == id {
                return Err(ConnectorError::validation(format!("Net {} cannot pair with itself", id)));
            }
            if !board.has_net(partner) {
                return Err(ConnectorError::validation(format!(
                    "Differential partner {} does not exist",
                    partner
                )));
            }
        }

        let net = Net {
            id,
            name: request.name,
            pins: request.pins,
            priority: request.priority.unwrap_or_default(),
            impedance_target: request.impedance_target,
            max_length: request.max_length,
            diff_pair: request.diff_pair,
            net_class: request.net_class.unwrap_or_else(|| "signal".to_string()),
        };
        board.nets.push(net.clone());
        board.updated_at = Utc::now();
        Ok(net)
    }

    pub fn update_net(&mut self, board_id: &str, net_id: &str, patch: NetUpdate) -> ConnectorResult<Net> {
        let board = self.board_mut(board_id)?;
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ConnectorError::validation("Net name must not be blank"));
        }
        if let Some(partner) = &patch.diff_pair {
            if partner == net_id {
                return Err(ConnectorError::validation(format!("Net {} cannot pair with itself", net_id)));
            }
            if !board.has_net(partner) {
                return Err(ConnectorError::validation(format!(
                    "Differential partner {} does not exist",
                    partner
                )));
            }
        }
        let net = board
            .nets
            .iter_mut()
            .find(|n| n.id == net_id)
            .ok_or_else(|| ConnectorError::not_found("Net", net_id))?;
        if let Some(name) = patch.name {
            net.name = name;
        }
        if let Some(priority) = patch.priority {
            net.priority = priority;
        }
        if let Some(target) = patch.impedance_target {
            net.impedance_target = Some(target);
        }
        if let Some(max_length) = patch.max_length {
            net.max_length = Some(max_length);
        }
        if let Some(partner) = patch.diff_pair {
            net.diff_pair = Some(partner);
        }
        let updated = net.clone();
        board.updated_at = Utc::now();
        Ok(updated)
    }
}
