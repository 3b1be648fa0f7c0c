use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BoardSummary, RoutingAnalysis};
use crate::core::ConnectorResult;
use crate::schema::{DrcResult, SignalIntegrityResult};

const MAX_DRC_WARNINGS: usize = 3;
const NO_ACTION: &str = "Design passes all health checks; no action required";
const DRC_UNAVAILABLE: &str = "DRC could not be run; rerun before release";
const SI_UNAVAILABLE: &str = "Signal integrity analysis could not be run; rerun before release";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrcSummary {
    /// `false` when DRC could not be run and the counts are defaults
    pub available: bool,
    pub passed: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub rules_checked: usize,
}

impl From<&DrcResult> for DrcSummary {
    fn from(result: &DrcResult) -> Self {
        Self {
            available: true,
            passed: result.passed,
            error_count: result.error_count,
            warning_count: result.warning_count,
            info_count: result.info_count,
            rules_checked: result.rules_checked,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalIntegritySummary {
    pub available: bool,
    pub nets_analyzed: usize,
    pub passed: usize,
    pub failed: usize,
    /// Names of nets that failed at least one check
    pub failing_nets: Vec<String>,
}

impl From<&SignalIntegrityResult> for SignalIntegritySummary {
    fn from(result: &SignalIntegrityResult) -> Self {
        Self {
            available: true,
            nets_analyzed: result.nets_analyzed,
            passed: result.passed,
            failed: result.failed,
            failing_nets: result
                .results
                .iter()
                .filter(|r| !r.passed)
                .map(|r| r.net_name.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub board: BoardSummary,
    pub drc: DrcSummary,
    pub signal_integrity: SignalIntegritySummary,
    pub routing: RoutingAnalysis,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl HealthReport {
    /// Build a report from the board summary and the outcome of each
    /// secondary analysis. Failed sections are replaced by empty defaults.
    pub(crate) fn assemble(
        board: BoardSummary,
        drc: ConnectorResult<DrcResult>,
        signal_integrity: ConnectorResult<SignalIntegrityResult>,
        routing: ConnectorResult<RoutingAnalysis>,
    ) -> Self {
        let drc = match drc {
            Ok(result) => DrcSummary::from(&result),
            Err(e) => {
                tracing::warn!("DRC unavailable for health report on {}: {}", board.id, e);
                DrcSummary::default()
            }
        };
        let signal_integrity = match signal_integrity {
            Ok(result) => SignalIntegritySummary::from(&result),
            Err(e) => {
                tracing::warn!("Signal integrity unavailable for health report on {}: {}", board.id, e);
                SignalIntegritySummary::default()
            }
        };
        let routing = routing.unwrap_or_else(|e| {
            tracing::warn!("Routing analysis unavailable for health report on {}: {}", board.id, e);
            RoutingAnalysis::default()
        });

        let recommendations = recommendations(&board, &drc, &signal_integrity, &routing);
        Self {
            board,
            drc,
            signal_integrity,
            routing,
            recommendations,
            generated_at: Utc::now(),
        }
    }

    /// Whether the report carries nothing beyond the "no action" line
    pub fn is_clean(&self) -> bool {
        self.recommendations.len() == 1 && self.recommendations[0] == NO_ACTION
    }

    /// DRC reported errors or never ran.
    pub fn release_blocked(&self) -> bool {
        !self.drc.available || self.drc.error_count > 0
    }
}

fn recommendations(
    board: &BoardSummary,
    drc: &DrcSummary,
    si: &SignalIntegritySummary,
    routing: &RoutingAnalysis,
) -> Vec<String> {
    let mut out = Vec::new();
    if !drc.available {
        out.push(DRC_UNAVAILABLE.to_string());
    }
    if drc.error_count > 0 {
        out.push(format!(
            "Fix {} DRC error(s) before releasing for manufacturing",
            drc.error_count
        ));
    }
    if drc.warning_count > MAX_DRC_WARNINGS {
        out.push(format!("Review {} DRC warnings", drc.warning_count));
    }
    if !si.available {
        out.push(SI_UNAVAILABLE.to_string());
    }
    if si.failed > 0 {
        out.push(format!(
            "Resolve signal integrity issues on {} net(s): {}",
            si.failed,
            si.failing_nets.join(", ")
        ));
    }
    if board.routing_completion < 100.0 {
        out.push(format!(
            "Complete routing: {}% of nets routed",
            board.routing_completion
        ));
    }
    let unrouted_critical = routing.unrouted_critical();
    if !unrouted_critical.is_empty() {
        out.push(format!(
            "Route critical/high-priority nets first: {}",
            unrouted_critical.join(", ")
        ));
    }
    if out.is_empty() {
        out.push(NO_ACTION.to_string());
    }
    out
}
