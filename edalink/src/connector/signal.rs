//! Signal-integrity estimation.
//!
//! Figures are drawn from the injected random source within fixed bands, so
//! results vary between runs unless the source is seeded.

use chrono::Utc;

use super::random::RandomSource;
use super::store::BoardStore;
use crate::core::{ConnectorError, ConnectorResult};
use crate::schema::*;

pub const DEFAULT_IMPEDANCE_OHMS: f64 = 50.0;
pub const MAX_DEVIATION_PERCENT: f64 = 10.0;
pub const MAX_SKEW_PS: f64 = 3.0;
pub const MAX_CROSSTALK_DB: f64 = -25.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn evaluate(net: &Net, rng: &mut dyn RandomSource) -> NetSignalIntegrity {
    let target = net.impedance_target.unwrap_or(DEFAULT_IMPEDANCE_OHMS);
    let impedance = target * (1.0 + rng.range(-0.1, 0.1));
    let deviation = (impedance - target).abs() / target * 100.0;
    let skew = net.diff_pair.as_ref().map(|_| round2(rng.range(0.0, 5.0)));
    let crosstalk = round2(rng.range(-45.0, -20.0));

    let mut issues = Vec::new();
    if deviation > MAX_DEVIATION_PERCENT {
        issues.push(format!(
            "Impedance deviation {:.1}% exceeds {}% tolerance",
            deviation, MAX_DEVIATION_PERCENT
        ));
    }
    if let Some(skew) = skew.filter(|s| *s > MAX_SKEW_PS) {
        issues.push(format!("Differential skew {:.2}ps exceeds {}ps", skew, MAX_SKEW_PS));
    }
    if crosstalk > MAX_CROSSTALK_DB {
        issues.push(format!("Crosstalk {:.1}dB exceeds {}dB limit", crosstalk, MAX_CROSSTALK_DB));
    }

    NetSignalIntegrity {
        net_id: net.id.clone(),
        net_name: net.name.clone(),
        target_impedance: target,
        impedance: round2(impedance),
        deviation_percent: round2(deviation),
        skew_ps: skew,
        crosstalk_db: crosstalk,
        passed: issues.is_empty(),
        issues,
    }
}

impl BoardStore {
    /// Analyze `net_ids`, or every differential / high-speed net when `None`.
    pub fn analyze_signal_integrity(
        &self,
        board_id: &str,
        net_ids: Option<&[String]>,
        rng: &mut dyn RandomSource,
    ) -> ConnectorResult<SignalIntegrityResult> {
        let board = self.board(board_id)?;
        let nets: Vec<&Net> = match net_ids {
            Some(ids) => ids
                .iter()
                .map(|id| board.find_net(id).ok_or_else(|| ConnectorError::not_found("Net", id)))
                .collect::<ConnectorResult<_>>()?,
            None => board.nets.iter().filter(|n| n.is_si_candidate()).collect(),
        };

        let results: Vec<NetSignalIntegrity> = nets.into_iter().map(|n| evaluate(n, rng)).collect();
        let passed = results.iter().filter(|r| r.passed).count();
        Ok(SignalIntegrityResult {
            board_id: board_id.to_string(),
            nets_analyzed: results.len(),
            passed,
            failed: results.len() - passed,
            results,
            analyzed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::random::{seeded, ScriptedRandom};
    use crate::connector::seed::DEMO_BOARD_ID;
    use crate::core::ErrorCode;

    #[test]
    fn test_defaults_to_differential_and_high_speed() {
        let store = BoardStore::with_demo_data();
        let mut rng = seeded(3);
        let result = store.analyze_signal_integrity(DEMO_BOARD_ID, None, &mut *rng).unwrap();
        let ids: Vec<_> = result.results.iter().map(|r| r.net_id.as_str()).collect();
        assert_eq!(ids, vec!["NET_USB_DP", "NET_USB_DN", "NET_SPI_CLK"]);
        assert!(result.results[0].skew_ps.is_some());
        assert!(result.results[2].skew_ps.is_none());
    }

    #[test]
    fn test_midpoint_samples_pass() {
        let store = BoardStore::with_demo_data();
        // impedance on target, 2.5ps skew, -32.5dB crosstalk
        let mut rng = ScriptedRandom::constant(0.5);
        let result = store.analyze_signal_integrity(DEMO_BOARD_ID, None, &mut rng).unwrap();
        assert_eq!(result.failed, 0);
        let dp = &result.results[0];
        assert_eq!(dp.impedance, 90.0);
        assert_eq!(dp.deviation_percent, 0.0);
        assert_eq!(dp.skew_ps, Some(2.5));
        assert_eq!(dp.crosstalk_db, -32.5);
    }

    #[test]
    fn test_high_samples_fail_with_issues() {
        let store = BoardStore::with_demo_data();
        // skew 4.5ps, crosstalk -22.5dB
        let mut rng = ScriptedRandom::constant(0.9);
        let ids = vec!["NET_USB_DP".to_string()];
        let result = store
            .analyze_signal_integrity(DEMO_BOARD_ID, Some(ids.as_slice()), &mut rng)
            .unwrap();
        assert_eq!(result.failed, 1);
        let issues = &result.results[0].issues;
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.contains("skew")));
        assert!(issues.iter().any(|i| i.contains("Crosstalk")));
    }

    #[test]
    fn test_untargeted_net_uses_fifty_ohms() {
        let store = BoardStore::with_demo_data();
        let mut rng = ScriptedRandom::constant(0.5);
        let ids = vec!["NET_I2C_SDA".to_string()];
        let result = store
            .analyze_signal_integrity(DEMO_BOARD_ID, Some(ids.as_slice()), &mut rng)
            .unwrap();
        assert_eq!(result.results[0].target_impedance, 50.0);
    }

    #[test]
    fn test_unknown_net_is_not_found() {
        let store = BoardStore::with_demo_data();
        let mut rng = ScriptedRandom::constant(0.5);
        let ids = vec!["NET_GHOST".to_string()];
        let err = store
            .analyze_signal_integrity(DEMO_BOARD_ID, Some(ids.as_slice()), &mut rng)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
