//! The per-patient core-issues checklist.
//!
//! Exactly one record exists per patient; a default row is persisted at
//! patient creation, and an absent row reads as [`CoreIssues::default()`].
//! The two paths must stay shape-identical.

use serde::{Deserialize, Serialize};

/// A free-form belief entry.
///
/// Early releases stored these as bare strings; the storage layer upgrades
/// those to `{title: "", description: s}` on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeliefEntry {
  #[serde(default)]
  pub title:       String,
  #[serde(default, alias = "text")]
  pub description: String,
}

/// The checklist attached 1:1 to every patient.
///
/// The niyyath and najas lists hold the selected item labels; each selected
/// item pairs with the matching `*_time` field below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreIssues {
  #[serde(default)]
  pub is_about_belief: bool,
  #[serde(default)]
  pub belief_types:    Vec<BeliefEntry>,

  /// Selected among "Wudu", "Namaz", "Ghusl", "Fasting".
  #[serde(default)]
  pub niyyath_related:      Vec<String>,
  #[serde(default)]
  pub wudu_niyyath_time:    String,
  #[serde(default)]
  pub namaz_niyyath_time:   String,
  #[serde(default)]
  pub ghusl_niyyath_time:   String,
  #[serde(default)]
  pub fasting_niyyath_time: String,

  #[serde(default)]
  pub najas_related:      Vec<String>,
  #[serde(default)]
  pub urination_time:     String,
  #[serde(default)]
  pub motion_time:        String,
  #[serde(default)]
  pub ghusl_najas_time:   String,
  #[serde(default)]
  pub normal_bath_time:   String,
  #[serde(default)]
  pub hand_washing_time:  String,
  #[serde(default)]
  pub dress_washing_time: String,

  #[serde(default)]
  pub dog_related:          bool,
  #[serde(default)]
  pub pig_related:          bool,
  #[serde(default)]
  pub over_soaping:         bool,
  #[serde(default)]
  pub insects_related:      bool,
  #[serde(default)]
  pub gas_locking_related:  bool,
  #[serde(default)]
  pub fear_of_death:        bool,
  #[serde(default)]
  pub fear_of_disease:      bool,
  #[serde(default)]
  pub door_locking_related: bool,

  #[serde(default)]
  pub wudu_time:    String,
  #[serde(default)]
  pub namaz_time:   String,
  #[serde(default)]
  pub other_issues: String,
}
