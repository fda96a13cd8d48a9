//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use workload_core::{
  snapshot::AssessmentSnapshot,
  threshold::ThresholdEntry,
};

pub fn assessment(snap: &AssessmentSnapshot) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{}  {} ({})  score {}",
    snap.date, snap.label, snap.colour, snap.score
  );

  let active: Vec<_> = snap.factors.iter().filter(|f| f.active).collect();
  if active.is_empty() {
    let _ = writeln!(out, "  no activity");
    return out;
  }
  for f in active {
    let _ = writeln!(
      out,
      "  {:<28} x{:<3} +{}",
      f.description, f.weight, f.contribution
    );
  }
  out
}

pub fn thresholds(entries: &[&ThresholdEntry]) -> String {
  let mut out = String::new();
  for e in entries {
    let marker = if e.is_overridden() { "*" } else { " " };
    let _ = writeln!(
      out,
      "{:<12} {:>3}{} {}",
      e.weight.label(),
      e.value,
      marker,
      e.colour
    );
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use workload_core::{
    snapshot::FactorSnapshot,
    taxonomy::{ActionKind, EntityType},
    weight::ActivityWeight,
  };

  fn snap(factors: Vec<FactorSnapshot>, score: u64) -> AssessmentSnapshot {
    AssessmentSnapshot {
      date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
      score,
      weight: ActivityWeight::Light,
      label: "Light".into(),
      colour: ActivityWeight::Light.default_colour(),
      factors,
      active: vec![],
      inactive: vec![],
    }
  }

  #[test]
  fn quiet_day_says_so() {
    let text = assessment(&snap(vec![], 0));
    assert!(text.starts_with("2026-04-01  Light (#34C759)  score 0"));
    assert!(text.contains("no activity"));
  }

  #[test]
  fn lists_only_active_factors() {
    let make = |entity_type, count, active| FactorSnapshot {
      entity_type,
      action_kind: ActionKind::Create,
      count,
      weight: 1,
      threshold: 1,
      alive: true,
      active,
      inactive: !active,
      contribution: u64::from(count),
      description: format!("{count} things"),
    };
    let text = assessment(&snap(
      vec![make(EntityType::Jobs, 3, true), make(EntityType::Notes, 0, false)],
      3,
    ));
    assert!(text.contains("3 things"));
    assert!(!text.contains("0 things"));
    assert!(text.contains("+3"));
  }

  #[test]
  fn overridden_thresholds_are_marked() {
    let mut medium = ThresholdEntry::default_for(ActivityWeight::Medium);
    medium.value = 6;
    let light = ThresholdEntry::default_for(ActivityWeight::Light);
    let text = thresholds(&[&light, &medium]);
    let lines: Vec<&str> = text.lines().collect();
    assert!(!lines[0].contains('*'));
    assert!(lines[1].contains("6*"));
  }
}
