//! Outputs of domain operations: DRC, routing, signal integrity, exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::design::{Point, RuleType, Severity, Trace, Via};
use super::requests::{GerberFormat, Units};
use crate::config::ConnectorMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub healthy: bool,
    pub initialized: bool,
    pub mode: ConnectorMode,
    pub message: String,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrcViolation {
    pub id: String,
    pub rule_id: Option<String>,
    pub rule_type: RuleType,
    pub severity: Severity,
    pub message: String,
    pub location: Point,
    /// IDs of the traces, nets or components involved
    pub items: Vec<String>,
}

/// Snapshot of the latest DRC run for a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrcResult {
    pub board_id: String,
    pub passed: bool,
    pub rules_checked: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub violations: Vec<DrcViolation>,
    pub run_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerUtilization {
    pub layer: String,
    pub routed_length: f64,
    pub utilization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingResult {
    pub board_id: String,
    /// Percent of nets with at least one trace
    pub completion_rate: f64,
    pub total_nets: usize,
    pub routed_nets: usize,
    pub unrouted_nets: Vec<String>,
    pub traces_added: usize,
    pub vias_added: usize,
    pub traces: Vec<Trace>,
    pub vias: Vec<Via>,
    pub layer_utilization: Vec<LayerUtilization>,
    pub completed_at: DateTime<Utc>,
}

/// Counts removed by a clear-routes call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesCleared {
    pub board_id: String,
    pub traces_removed: usize,
    pub vias_removed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetSignalIntegrity {
    pub net_id: String,
    pub net_name: String,
    pub target_impedance: f64,
    pub impedance: f64,
    pub deviation_percent: f64,
    /// Only for nets with a differential partner
    pub skew_ps: Option<f64>,
    pub crosstalk_db: f64,
    pub passed: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalIntegrityResult {
    pub board_id: String,
    pub nets_analyzed: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<NetSignalIntegrity>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GerberFileType {
    Copper,
    Soldermask,
    Silkscreen,
    Paste,
    Drill,
    Outline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GerberFile {
    pub name: String,
    pub layer: String,
    pub file_type: GerberFileType,
    /// Bytes
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GerberExport {
    pub board_id: String,
    pub format: GerberFormat,
    pub units: Units,
    pub files: Vec<GerberFile>,
    pub total_size: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomEntry {
    pub designator: String,
    pub part_number: Option<String>,
    pub value: Option<String>,
    pub package: String,
    pub quantity: usize,
    pub manufacturer: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomExport {
    pub board_id: String,
    pub entries: Vec<BomEntry>,
    pub total_components: usize,
    pub unique_parts: usize,
    pub generated_at: DateTime<Utc>,
}
