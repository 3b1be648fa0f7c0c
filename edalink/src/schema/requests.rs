//! Request, patch and filter types accepted by connector operations.
//!
//! Patch types merge field by field: `None` leaves the stored value alone.

use serde::{Deserialize, Serialize};

use super::design::{NetPriority, Pin, Point, ProjectStatus, Severity, Side};
use crate::core::Pagination;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    #[serde(flatten)]
    pub page: Pagination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateProject {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoard {
    pub project_id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_layer_count")]
    pub layer_count: u32,
}

fn default_layer_count() -> u32 {
    2
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardUpdate {
    pub name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentFilter {
    pub layer: Option<Side>,
    #[serde(flatten)]
    pub page: Pagination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceComponent {
    pub designator: String,
    pub package: String,
    pub position: Point,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub layer: Option<Side>,
    #[serde(default)]
    pub pins: Vec<Pin>,
}

impl PlaceComponent {
    pub fn new(designator: &str, package: &str, x: f64, y: f64) -> Self {
        Self {
            designator: designator.to_string(),
            package: package.to_string(),
            position: Point::new(x, y),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentMove {
    pub position: Option<Point>,
    pub rotation: Option<f64>,
    pub layer: Option<Side>,
}

impl ComponentMove {
    pub fn to(x: f64, y: f64) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetFilter {
    pub priority: Option<NetPriority>,
    pub net_class: Option<String>,
    #[serde(flatten)]
    pub page: Pagination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNet {
    pub name: String,
    #[serde(default)]
    pub pins: Vec<String>,
    #[serde(default)]
    pub priority: Option<NetPriority>,
    #[serde(default)]
    pub net_class: Option<String>,
    #[serde(default)]
    pub impedance_target: Option<f64>,
    #[serde(default)]
    pub max_length: Option<f64>,
    #[serde(default)]
    pub diff_pair: Option<String>,
}

impl CreateNet {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetUpdate {
    pub name: Option<String>,
    pub priority: Option<NetPriority>,
    pub impedance_target: Option<f64>,
    pub max_length: Option<f64>,
    pub diff_pair: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleUpdate {
    pub value: Option<f64>,
    pub severity: Option<Severity>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoRouteOptions {
    /// Restrict routing to these nets. `None` routes every unrouted net.
    pub net_ids: Option<Vec<String>>,
    /// Trace width for synthesized traces; defaults to 0.2 mm.
    pub trace_width: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GerberFormat {
    #[default]
    #[serde(rename = "RS-274X")]
    Rs274x,
    #[serde(rename = "RS-274D")]
    Rs274d,
}

impl GerberFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            GerberFormat::Rs274x => "RS-274X",
            GerberFormat::Rs274d => "RS-274D",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Mm,
    Inch,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Mm => "mm",
            Units::Inch => "inch",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GerberOptions {
    /// Layer names to emit copper files for; `None` means every board layer.
    pub layers: Option<Vec<String>>,
    pub format: GerberFormat,
    pub units: Units,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BomOptions {
    pub group_by_value: bool,
}

impl BomOptions {
    pub fn grouped() -> Self {
        Self { group_by_value: true }
    }
}
