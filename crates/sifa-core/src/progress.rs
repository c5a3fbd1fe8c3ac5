//! Tracked issues and the aggregate progress metric derived from them.

use serde::{Deserialize, Serialize};

/// A named issue whose cure progress the clinician tracks over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedIssue {
  pub id:   i64,
  pub name: String,
  /// 0–100 by convention; the caller layer clamps, the store does not.
  pub percentage_cured: i64,
}

/// Input to `add_tracked_issue` / `update_tracked_issue`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTrackedIssue {
  pub name: String,
  #[serde(default)]
  pub percentage_cured: i64,
}

/// Mean of `percentage_cured` rounded to the nearest integer; `0` when
/// nothing is tracked yet.
pub fn average_progress(issues: &[TrackedIssue]) -> i64 {
  if issues.is_empty() {
    return 0;
  }
  let sum: i64 = issues.iter().map(|i| i.percentage_cured).sum();
  (sum as f64 / issues.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
  use super::*;

  fn issue(pct: i64) -> TrackedIssue {
    TrackedIssue { id: 0, name: "waswas".into(), percentage_cured: pct }
  }

  #[test]
  fn averages_round_to_nearest() {
    assert_eq!(average_progress(&[issue(40), issue(70)]), 55);
    assert_eq!(average_progress(&[issue(40), issue(70), issue(0)]), 37);
    assert_eq!(average_progress(&[issue(33), issue(34)]), 34);
  }

  #[test]
  fn empty_set_is_zero() {
    assert_eq!(average_progress(&[]), 0);
  }
}
