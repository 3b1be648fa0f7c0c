//! Design rule check.
//!
//! The mock DRC does not inspect geometry. Each run produces the same
//! illustrative set of violations (clearance, impedance, length match) and
//! scores them against the board's rule set:
//!
//! - an enabled rule of the matching type supplies severity and rule ID
//! - if every rule of that type is disabled the violation is suppressed
//! - if the board has no rule of that type the default severity applies

use chrono::Utc;

use super::store::BoardStore;
use crate::core::{ConnectorError, ConnectorResult};
use crate::schema::*;

enum RuleBinding<'a> {
    Enabled(&'a DesignRule),
    Unbound,
    Disabled,
}

fn bind_rule(board: &Board, rule_type: RuleType) -> RuleBinding<'_> {
    let mut of_type = board.design_rules.iter().filter(|r| r.rule_type == rule_type).peekable();
    if of_type.peek().is_none() {
        return RuleBinding::Unbound;
    }
    match of_type.find(|r| r.enabled) {
        Some(rule) => RuleBinding::Enabled(rule),
        None => RuleBinding::Disabled,
    }
}

struct Finding {
    rule_type: RuleType,
    default_severity: Severity,
    default_threshold: f64,
    location: Point,
    items: Vec<String>,
    describe: fn(&[String], f64) -> String,
}

fn canned_findings(board: &Board) -> Vec<Finding> {
    let clearance_items: Vec<String> = board.traces.iter().take(2).map(|t| t.id.clone()).collect();
    let impedance_items: Vec<String> = board
        .nets
        .iter()
        .find(|n| n.impedance_target.is_some())
        .map(|n| vec![n.id.clone()])
        .unwrap_or_default();
    let pair_items: Vec<String> = board
        .nets
        .iter()
        .find_map(|n| n.diff_pair.as_ref().map(|p| vec![n.id.clone(), p.clone()]))
        .unwrap_or_default();

    vec![
        Finding {
            rule_type: RuleType::Clearance,
            default_severity: Severity::Error,
            default_threshold: 0.15,
            location: Point::new(12.5, 8.3),
            items: clearance_items,
            describe: |items, min| match items {
                [a, b, ..] => format!("Clearance between {} and {} is 0.12mm (minimum {}mm)", a, b, min),
                _ => format!("Copper clearance of 0.12mm is below the {}mm minimum", min),
            },
        },
        Finding {
            rule_type: RuleType::Impedance,
            default_severity: Severity::Warning,
            default_threshold: 10.0,
            location: Point::new(25.0, 15.0),
            items: impedance_items,
            describe: |items, tolerance| match items.first() {
                Some(net) => format!("Impedance of {} deviates 12% from target (tolerance {}%)", net, tolerance),
                None => format!("Controlled impedance deviates 12% from target (tolerance {}%)", tolerance),
            },
        },
        Finding {
            rule_type: RuleType::LengthMatch,
            default_severity: Severity::Warning,
            default_threshold: 0.5,
            location: Point::new(30.2, 18.7),
            items: pair_items,
            describe: |items, tolerance| match items {
                [a, b, ..] => format!("Length mismatch of 0.8mm between {} and {} (tolerance {}mm)", a, b, tolerance),
                _ => format!("Differential pair length mismatch of 0.8mm (tolerance {}mm)", tolerance),
            },
        },
    ]
}

impl BoardStore {
    /// Run DRC and replace the stored result for the board.
    pub fn run_drc(&mut self, board_id: &str) -> ConnectorResult<DrcResult> {
        let board = self.board(board_id)?;

        let mut violations = Vec::new();
        for finding in canned_findings(board) {
            let (rule_id, severity, threshold) = match bind_rule(board, finding.rule_type) {
                RuleBinding::Disabled => continue,
                RuleBinding::Enabled(rule) => (Some(rule.id.clone()), rule.severity, rule.value),
                RuleBinding::Unbound => (None, finding.default_severity, finding.default_threshold),
            };
            violations.push(DrcViolation {
                id: format!("VIOL{:03}", violations.len() + 1),
                rule_id,
                rule_type: finding.rule_type,
                severity,
                message: (finding.describe)(&finding.items, threshold),
                location: finding.location,
                items: finding.items,
            });
        }

        let count = |s: Severity| violations.iter().filter(|v| v.severity == s).count();
        let result = DrcResult {
            board_id: board_id.to_string(),
            passed: count(Severity::Error) == 0,
            rules_checked: board.design_rules.iter().filter(|r| r.enabled).count(),
            error_count: count(Severity::Error),
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
            violations,
            run_at: Utc::now(),
        };
        self.drc_results.insert(board_id.to_string(), result.clone());
        Ok(result)
    }

    /// Violations from the latest run, optionally filtered by severity.
    pub fn drc_violations(&self, board_id: &str, severity: Option<Severity>) -> ConnectorResult<Vec<DrcViolation>> {
        self.board(board_id)?;
        let result = self.drc_results.get(board_id).ok_or_else(|| {
            ConnectorError::new(
                crate::core::ErrorCode::NotFound,
                format!("No DRC results for board {}. Run DRC first.", board_id),
            )
        })?;
        Ok(result
            .violations
            .iter()
            .filter(|v| severity.map_or(true, |s| v.severity == s))
            .cloned()
            .collect())
    }

    pub fn design_rules(&self, board_id: &str) -> ConnectorResult<Vec<DesignRule>> {
        Ok(self.board(board_id)?.design_rules.clone())
    }

    pub fn update_rule(&mut self, board_id: &str, rule_id: &str, patch: RuleUpdate) -> ConnectorResult<DesignRule> {
        let board = self.board_mut(board_id)?;
        let rule = board
            .design_rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| ConnectorError::not_found("Design rule", rule_id))?;
        if let Some(value) = patch.value {
            rule.value = value;
        }
        if let Some(severity) = patch.severity {
            rule.severity = severity;
        }
        if let Some(enabled) = patch.enabled {
            rule.enabled = enabled;
        }
        let updated = rule.clone();
        board.updated_at = Utc::now();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::seed::DEMO_BOARD_ID;
    use crate::core::ErrorCode;

    #[test]
    fn test_demo_drc_fails_on_clearance() {
        let mut store = BoardStore::with_demo_data();
        let result = store.run_drc(DEMO_BOARD_ID).unwrap();
        assert!(!result.passed);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.warning_count, 2);
        assert_eq!(result.rules_checked, 5);
        assert_eq!(result.violations[0].rule_id.as_deref(), Some("RULE001"));
        assert_eq!(result.violations[0].items, vec!["TRC001", "TRC002"]);
    }

    #[test]
    fn test_disabled_rule_suppresses_violation() {
        let mut store = BoardStore::with_demo_data();
        let clearance = store.design_rules(DEMO_BOARD_ID).unwrap()[0].id.clone();
        store
            .update_rule(DEMO_BOARD_ID, &clearance, RuleUpdate {
                enabled: Some(false),
                ..Default::default()
            })
            .unwrap();
        let result = store.run_drc(DEMO_BOARD_ID).unwrap();
        assert!(result.passed);
        assert!(result.violations.iter().all(|v| v.rule_type != RuleType::Clearance));
    }

    #[test]
    fn test_severity_follows_rule() {
        let mut store = BoardStore::with_demo_data();
        store
            .update_rule(DEMO_BOARD_ID, "RULE001", RuleUpdate {
                severity: Some(Severity::Info),
                value: Some(0.2),
                ..Default::default()
            })
            .unwrap();
        let result = store.run_drc(DEMO_BOARD_ID).unwrap();
        assert!(result.passed);
        assert_eq!(result.info_count, 1);
        assert!(result.violations[0].message.contains("0.2mm"));
    }

    #[test]
    fn test_unbound_rules_use_defaults() {
        let mut store = BoardStore::new();
        let project = store.create_project(CreateProject::named("Bare"));
        let board = store
            .create_board(CreateBoard {
                project_id: project.id,
                name: "Bare".to_string(),
                width: 10.0,
                height: 10.0,
                layer_count: 2,
            })
            .unwrap();
        let result = store.run_drc(&board.id).unwrap();
        assert_eq!(result.violations.len(), 3);
        let impedance = result.violations.iter().find(|v| v.rule_type == RuleType::Impedance).unwrap();
        assert_eq!(impedance.rule_id, None);
        assert_eq!(impedance.severity, Severity::Warning);
    }

    #[test]
    fn test_violations_require_run() {
        let mut store = BoardStore::with_demo_data();
        let err = store.drc_violations(DEMO_BOARD_ID, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        store.run_drc(DEMO_BOARD_ID).unwrap();
        let warnings = store.drc_violations(DEMO_BOARD_ID, Some(Severity::Warning)).unwrap();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_update_rule_not_found() {
        let mut store = BoardStore::with_demo_data();
        let err = store.update_rule(DEMO_BOARD_ID, "RULE999", RuleUpdate::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let err = store.update_rule("BRD999", "RULE001", RuleUpdate::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
