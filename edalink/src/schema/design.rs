//! Design entities held by the board store.
//!
//! All lengths are in millimetres, angles in degrees, impedance in ohms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project lifecycle. Transitions are not ordered or enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    InReview,
    Approved,
    Manufacturing,
}

/// Denormalized board reference stored on the owning project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub version: String,
    pub boards: Vec<BoardRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Signal,
    Power,
    Ground,
    Mixed,
}

/// One copper layer in the stack-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    pub order: u32,
    pub thickness: f64,      // mm
    pub copper_weight: f64,  // oz
    pub material: String,
}

impl Layer {
    /// Synthesize the default stack for a board with `count` layers.
    ///
    /// Layer 1 is "Top" and the last is "Bottom". With four or more layers,
    /// layer 2 becomes the ground plane and layer `count - 1` the power plane.
    pub fn default_stack(count: u32) -> Vec<Layer> {
        (1..=count)
            .map(|order| {
                let (name, layer_type) = if order == 1 {
                    ("Top".to_string(), LayerType::Signal)
                } else if order == count {
                    ("Bottom".to_string(), LayerType::Signal)
                } else if count >= 4 && order == 2 {
                    ("Ground".to_string(), LayerType::Ground)
                } else if count >= 4 && order == count - 1 {
                    ("Power".to_string(), LayerType::Power)
                } else {
                    (format!("Inner{}", order), LayerType::Signal)
                };
                let outer = order == 1 || order == count;
                Layer {
                    id: format!("L{}", order),
                    name,
                    layer_type,
                    order,
                    thickness: 0.035,
                    copper_weight: if outer { 1.0 } else { 0.5 },
                    material: "FR4".to_string(),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Board side a component is mounted on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Top,
    Bottom,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: String,
    pub name: String,
    /// Lookup key into the board's nets; not an ownership link.
    pub net_id: Option<String>,
}

impl Pin {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            net_id: None,
        }
    }

    pub fn on_net(mut self, net_id: &str) -> Self {
        self.net_id = Some(net_id.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub designator: String,
    pub value: Option<String>,
    pub package: String,
    pub part_number: Option<String>,
    pub position: Point,
    pub rotation: f64,
    pub layer: Side,
    pub locked: bool,
    pub pins: Vec<Pin>,
}

impl Component {
    pub fn new(id: &str, designator: &str, package: &str) -> Self {
        Self {
            id: id.to_string(),
            designator: designator.to_string(),
            value: None,
            package: package.to_string(),
            part_number: None,
            position: Point::default(),
            rotation: 0.0,
            layer: Side::Top,
            locked: false,
            pins: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_part_number(mut self, part_number: &str) -> Self {
        self.part_number = Some(part_number.to_string());
        self
    }

    pub fn at(mut self, x: f64, y: f64, rotation: f64) -> Self {
        self.position = Point::new(x, y);
        self.rotation = rotation;
        self
    }

    pub fn on_side(mut self, side: Side) -> Self {
        self.layer = side;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn with_pin(mut self, pin: Pin) -> Self {
        self.pins.push(pin);
        self
    }

    /// `"componentId:pinId"` key used by nets.
    pub fn pin_key(&self, pin_id: &str) -> String {
        format!("{}:{}", self.id, pin_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetPriority {
    Critical,
    High,
    #[default]
    Normal,
    Low,
}

impl NetPriority {
    pub fn is_critical_or_high(&self) -> bool {
        matches!(self, NetPriority::Critical | NetPriority::High)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Net {
    pub id: String,
    pub name: String,
    /// `"componentId:pinId"` keys
    pub pins: Vec<String>,
    pub priority: NetPriority,
    pub impedance_target: Option<f64>,
    pub max_length: Option<f64>,
    pub diff_pair: Option<String>,
    pub net_class: String,
}

impl Net {
    /// Net IDs are derived from the name: `"usb dp"` -> `"NET_USB_DP"`.
    pub fn id_for_name(name: &str) -> String {
        let joined = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_uppercase();
        format!("NET_{}", joined)
    }

    pub fn new(name: &str) -> Self {
        Self {
            id: Self::id_for_name(name),
            name: name.to_string(),
            pins: Vec::new(),
            priority: NetPriority::Normal,
            impedance_target: None,
            max_length: None,
            diff_pair: None,
            net_class: "signal".to_string(),
        }
    }

    pub fn with_class(mut self, net_class: &str) -> Self {
        self.net_class = net_class.to_string();
        self
    }

    pub fn with_priority(mut self, priority: NetPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_impedance(mut self, ohms: f64) -> Self {
        self.impedance_target = Some(ohms);
        self
    }

    pub fn with_max_length(mut self, mm: f64) -> Self {
        self.max_length = Some(mm);
        self
    }

    pub fn paired_with(mut self, net_id: &str) -> Self {
        self.diff_pair = Some(net_id.to_string());
        self
    }

    pub fn with_pins(mut self, pins: &[&str]) -> Self {
        self.pins = pins.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn is_si_candidate(&self) -> bool {
        self.net_class == "differential" || self.net_class == "high_speed"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceStatus {
    Routed,
    #[default]
    Pending,
    Failed,
    Optimized,
}

/// Routed polyline for one net on one layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub id: String,
    pub net_id: String,
    pub layer: String,
    pub points: Vec<Point>,
    pub width: f64,
    /// Supplied by whoever created the trace, not derived from `points`.
    pub length: f64,
    pub status: TraceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Via {
    pub id: String,
    pub net_id: String,
    pub position: Point,
    pub drill_size: f64,
    pub pad_size: f64,
    pub start_layer: String,
    pub end_layer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Clearance,
    Width,
    AnnularRing,
    Drill,
    Silkscreen,
    SolderMask,
    Impedance,
    LengthMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub value: f64,
    pub unit: String,
    pub severity: Severity,
    pub enabled: bool,
    /// `None` applies the rule to every net class.
    pub net_classes: Option<Vec<String>>,
}

impl DesignRule {
    pub fn new(id: &str, name: &str, rule_type: RuleType, value: f64, unit: &str, severity: Severity) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rule_type,
            value,
            unit: unit.to_string(),
            severity,
            enabled: true,
            net_classes: None,
        }
    }

    pub fn for_classes(mut self, classes: &[&str]) -> Self {
        self.net_classes = Some(classes.iter().map(|c| c.to_string()).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub layers: Vec<Layer>,
    pub components: Vec<Component>,
    pub nets: Vec<Net>,
    pub traces: Vec<Trace>,
    pub vias: Vec<Via>,
    pub design_rules: Vec<DesignRule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    pub fn find_component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn find_net(&self, id: &str) -> Option<&Net> {
        self.nets.iter().find(|n| n.id == id)
    }

    pub fn has_net(&self, id: &str) -> bool {
        self.nets.iter().any(|n| n.id == id)
    }

    /// Whether `"componentId:pinId"` names a pin on this board.
    pub fn has_pin_key(&self, key: &str) -> bool {
        let Some((component_id, pin_id)) = key.split_once(':') else {
            return false;
        };
        self.find_component(component_id)
            .map(|c| c.pins.iter().any(|p| p.id == pin_id))
            .unwrap_or(false)
    }

    pub fn is_net_routed(&self, net_id: &str) -> bool {
        self.traces.iter().any(|t| t.net_id == net_id)
    }

    pub fn routed_net_count(&self) -> usize {
        self.nets.iter().filter(|n| self.is_net_routed(&n.id)).count()
    }

    /// Percentage of nets with at least one trace. A board without nets is
    /// fully routed.
    pub fn routing_completion(&self) -> f64 {
        if self.nets.is_empty() {
            return 100.0;
        }
        round1(self.routed_net_count() as f64 / self.nets.len() as f64 * 100.0)
    }

    /// Total routed length on a layer.
    pub fn routed_length_on(&self, layer_name: &str) -> f64 {
        self.traces
            .iter()
            .filter(|t| t.layer == layer_name)
            .map(|t| t.length)
            .sum()
    }

    /// Routed length on a layer normalized by the board perimeter, capped at 100.
    pub fn layer_utilization(&self, layer_name: &str) -> f64 {
        let perimeter = self.perimeter();
        if perimeter <= 0.0 {
            return 0.0;
        }
        round1((self.routed_length_on(layer_name) / perimeter * 100.0).min(100.0))
    }

    pub fn net_length(&self, net_id: &str) -> f64 {
        self.traces
            .iter()
            .filter(|t| t.net_id == net_id)
            .map(|t| t.length)
            .sum()
    }
}

/// Round to one decimal place for reporting.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stack_four_layers() {
        let stack = Layer::default_stack(4);
        let names: Vec<_> = stack.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Top", "Ground", "Power", "Bottom"]);
        assert_eq!(stack[1].layer_type, LayerType::Ground);
        assert_eq!(stack[2].layer_type, LayerType::Power);
        assert_eq!(stack.iter().map(|l| l.order).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_default_stack_two_and_six_layers() {
        let two = Layer::default_stack(2);
        assert_eq!(two.len(), 2);
        assert!(two.iter().all(|l| l.layer_type == LayerType::Signal));

        let six = Layer::default_stack(6);
        let names: Vec<_> = six.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Top", "Ground", "Inner3", "Inner4", "Power", "Bottom"]);
        assert_eq!(six[2].layer_type, LayerType::Signal);
    }

    #[test]
    fn test_three_layer_stack_has_no_planes() {
        let three = Layer::default_stack(3);
        assert!(three.iter().all(|l| l.layer_type == LayerType::Signal));
        assert_eq!(three[1].name, "Inner2");
    }

    #[test]
    fn test_net_id_for_name() {
        assert_eq!(Net::id_for_name("usb dp"), "NET_USB_DP");
        assert_eq!(Net::id_for_name("VCC_3V3"), "NET_VCC_3V3");
        assert_eq!(Net::id_for_name("  spi   clk "), "NET_SPI_CLK");
    }

    #[test]
    fn test_serialized_field_names() {
        let rule = DesignRule::new("RULE001", "Clearance", RuleType::AnnularRing, 0.1, "mm", Severity::Error);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "annular_ring");
        assert_eq!(json["severity"], "error");
        assert!(json.get("netClasses").is_some());

        let status = serde_json::to_value(ProjectStatus::InReview).unwrap();
        assert_eq!(status, "in_review");
    }
}
