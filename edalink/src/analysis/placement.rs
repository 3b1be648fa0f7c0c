//! Placement heuristics: side split, package mix, density, critical parts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::design::round1;
use crate::schema::{Board, Component, Side};

/// Density above which a placement suggestion is raised (percent)
pub const DENSITY_WARNING_PERCENT: f64 = 60.0;

/// Approximate footprint area in mm² by package family. Checked in order, so
/// more specific names come first.
const PACKAGE_AREAS: &[(&str, f64)] = &[
    ("0402", 1.0),
    ("0603", 1.5),
    ("0805", 2.5),
    ("1206", 4.5),
    ("SOT-223", 25.0),
    ("SOT-23", 6.0),
    ("SOIC", 30.0),
    ("QFP", 50.0),
    ("BGA", 100.0),
    ("USB", 40.0),
];
const DEFAULT_PACKAGE_AREA: f64 = 10.0;

const CRITICAL_PACKAGES: &[&str] = &["QFP", "BGA", "SOIC"];
const CRITICAL_DESIGNATOR_PREFIXES: &[char] = &['J', 'Y'];

pub fn package_area(package: &str) -> f64 {
    let package = package.to_ascii_uppercase();
    PACKAGE_AREAS
        .iter()
        .find(|(family, _)| package.contains(family))
        .map(|(_, area)| *area)
        .unwrap_or(DEFAULT_PACKAGE_AREA)
}

fn is_critical(component: &Component) -> bool {
    let package = component.package.to_ascii_uppercase();
    CRITICAL_PACKAGES.iter().any(|p| package.contains(p))
        || component.designator.starts_with(CRITICAL_DESIGNATOR_PREFIXES)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementAnalysis {
    pub board_id: String,
    pub total_components: usize,
    pub top_count: usize,
    pub bottom_count: usize,
    /// Component count per package name
    pub package_counts: BTreeMap<String, usize>,
    /// Designators of connectors, crystals and fine-pitch ICs
    pub critical_components: Vec<String>,
    pub component_area: f64,
    pub board_area: f64,
    /// Footprint area as a percentage of board area
    pub density: f64,
    pub suggestions: Vec<String>,
}

impl PlacementAnalysis {
    pub fn from_board(board: &Board) -> Self {
        let total = board.components.len();
        let top_count = board.components.iter().filter(|c| c.layer == Side::Top).count();
        let bottom_count = total - top_count;

        let mut package_counts = BTreeMap::new();
        for component in &board.components {
            *package_counts.entry(component.package.clone()).or_insert(0) += 1;
        }

        let critical_components: Vec<String> = board
            .components
            .iter()
            .filter(|c| is_critical(c))
            .map(|c| c.designator.clone())
            .collect();

        let component_area: f64 = board.components.iter().map(|c| package_area(&c.package)).sum();
        let board_area = board.area();
        let density = if board_area > 0.0 {
            round1(component_area / board_area * 100.0)
        } else {
            0.0
        };

        let mut suggestions = Vec::new();
        if density > DENSITY_WARNING_PERCENT {
            suggestions.push(format!(
                "Placement density is {}%; consider a larger board or moving parts to the bottom side",
                density
            ));
        }
        if total > 0 && (top_count == 0 || bottom_count == 0) {
            let side = if top_count == 0 { Side::Bottom } else { Side::Top };
            suggestions.push(format!(
                "All components are on the {} side; double-sided placement could shorten routes",
                side.as_str()
            ));
        }
        if !critical_components.is_empty() {
            suggestions.push(format!(
                "Place critical components first and keep them near their connections: {}",
                critical_components.join(", ")
            ));
        }

        Self {
            board_id: board.id.clone(),
            total_components: total,
            top_count,
            bottom_count,
            package_counts,
            critical_components,
            component_area: round1(component_area),
            board_area,
            density,
            suggestions,
        }
    }
}
