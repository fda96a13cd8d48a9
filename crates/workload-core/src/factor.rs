//! Factor — one (entity type, action kind) pair's measured activity plus the
//! user's scoring configuration for it.
//!
//! `count` and `date` are a transient snapshot refreshed from a
//! [`FactorSource`] on every evaluation. `weight`, `threshold` and `alive` are
//! user settings that persist across evaluations under the factor's
//! [`FactorKey`]. The setters here only change fields; persisting and
//! re-evaluating is the job of [`crate::factor_set::FactorSet`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  source::{FactorSource, SourceError},
  taxonomy::{ActionKind, EntityType, FactorKey},
};

pub const DEFAULT_WEIGHT: u32 = 1;
pub const DEFAULT_THRESHOLD: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
  id:        Uuid,
  key:       FactorKey,
  date:      Option<NaiveDate>,
  count:     u32,
  weight:    u32,
  threshold: u32,
  alive:     bool,
}

impl Factor {
  /// A fresh factor with default settings and no count yet.
  pub fn seed(key: FactorKey) -> Self {
    Self::restore(Uuid::new_v4(), key, DEFAULT_WEIGHT, DEFAULT_THRESHOLD, true)
  }

  /// Rebuild a factor from persisted settings.
  pub fn restore(
    id: Uuid,
    key: FactorKey,
    weight: u32,
    threshold: u32,
    alive: bool,
  ) -> Self {
    Self { id, key, date: None, count: 0, weight, threshold, alive }
  }

  // ── Accessors ─────────────────────────────────────────────────────────

  pub fn id(&self) -> Uuid { self.id }

  pub fn key(&self) -> FactorKey { self.key }

  pub fn entity_type(&self) -> EntityType { self.key.entity_type }

  pub fn action_kind(&self) -> ActionKind { self.key.action_kind }

  /// The date `count` was computed for, if it has been computed.
  pub fn date(&self) -> Option<NaiveDate> { self.date }

  pub fn count(&self) -> u32 { self.count }

  pub fn weight(&self) -> u32 { self.weight }

  pub fn threshold(&self) -> u32 { self.threshold }

  pub fn alive(&self) -> bool { self.alive }

  // ── Counting ──────────────────────────────────────────────────────────

  /// Query `source` for this factor's activity on `date` and store the
  /// result. A pair the source cannot count, or a failed query, yields zero.
  pub async fn recompute_count<S: FactorSource>(
    &mut self,
    source: &S,
    date: NaiveDate,
  ) -> u32 {
    let count = match source.count(self.key, date).await {
      Ok(n) => n,
      Err(SourceError::UnsupportedFactorPair(key)) => {
        tracing::debug!(%key, "no counting rule; counting as zero");
        0
      }
      Err(SourceError::Backend(e)) => {
        tracing::warn!(key = %self.key, %date, error = %e, "count query failed; counting as zero");
        0
      }
    };
    self.count = count;
    self.date = Some(date);
    count
  }

  // ── Mutators ──────────────────────────────────────────────────────────

  pub fn set_alive(&mut self, alive: bool) { self.alive = alive; }

  pub fn set_weight(&mut self, weight: u32) { self.weight = weight; }

  pub fn set_threshold(&mut self, threshold: u32) { self.threshold = threshold; }

  // ── Scoring ───────────────────────────────────────────────────────────

  /// `count × weight`.
  pub fn weighted(&self) -> u64 { u64::from(self.count) * u64::from(self.weight) }

  /// Alive and at or above its threshold.
  pub fn is_active(&self) -> bool { self.alive && self.count >= self.threshold }

  /// Switched off, or at or below its threshold. A count exactly equal to
  /// the threshold satisfies both this and [`Self::is_active`].
  pub fn is_inactive(&self) -> bool { !self.alive || self.count <= self.threshold }

  /// What this factor adds to the score: its weighted count if it is active
  /// and the weighted count also reaches the threshold, otherwise nothing.
  pub fn contribution(&self) -> u64 {
    let weighted = self.weighted();
    if self.is_active() && weighted >= u64::from(self.threshold) {
      weighted
    } else {
      0
    }
  }

  /// Human-readable summary such as "3 Jobs created".
  pub fn describe(&self) -> String {
    let noun = if self.count <= 1 {
      self.key.entity_type.singular()
    } else {
      self.key.entity_type.plural()
    };
    format!("{} {} {}", self.count, noun, self.key.action_kind.past_tense())
  }

  #[cfg(test)]
  pub(crate) fn counted(mut self, count: u32) -> Self {
    self.count = count;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::FixedSource;

  fn jobs_created() -> FactorKey { FactorKey::new(EntityType::Jobs, ActionKind::Create) }

  fn factor(count: u32, weight: u32, threshold: u32, alive: bool) -> Factor {
    Factor::restore(Uuid::new_v4(), jobs_created(), weight, threshold, alive)
      .counted(count)
  }

  #[test]
  fn seed_uses_defaults() {
    let f = Factor::seed(jobs_created());
    assert_eq!(f.weight(), 1);
    assert_eq!(f.threshold(), 1);
    assert!(f.alive());
    assert_eq!(f.count(), 0);
    assert_eq!(f.date(), None);
  }

  #[test]
  fn describe_uses_singular_up_to_one() {
    assert_eq!(factor(0, 1, 1, true).describe(), "0 Job created");
    assert_eq!(factor(1, 1, 1, true).describe(), "1 Job created");
    assert_eq!(factor(3, 1, 1, true).describe(), "3 Jobs created");

    let people = Factor::seed(FactorKey::new(EntityType::People, ActionKind::Interaction))
      .counted(2);
    assert_eq!(people.describe(), "2 People interacted with");
  }

  #[test]
  fn describe_ignores_settings() {
    let a = factor(4, 1, 1, true);
    let b = factor(4, 9, 7, false);
    assert_eq!(a.describe(), b.describe());
  }

  #[test]
  fn contribution_follows_both_threshold_checks() {
    for count in 0..6u32 {
      for weight in 0..4u32 {
        for threshold in 0..6u32 {
          for alive in [true, false] {
            let f = factor(count, weight, threshold, alive);
            let weighted = u64::from(count * weight);
            let counts = alive && count >= threshold && weighted >= u64::from(threshold);
            assert_eq!(f.contribution(), if counts { weighted } else { 0 });
          }
        }
      }
    }
  }

  #[test]
  fn weight_zero_only_counts_with_zero_threshold() {
    assert_eq!(factor(5, 0, 1, true).contribution(), 0);
    assert_eq!(factor(5, 0, 0, true).contribution(), 0);
    assert!(factor(5, 0, 0, true).is_active());
  }

  #[test]
  fn count_equal_to_threshold_is_active_and_inactive() {
    let f = factor(5, 1, 5, true);
    assert!(f.is_active());
    assert!(f.is_inactive());
  }

  #[test]
  fn dead_factor_is_never_active() {
    let f = factor(10, 3, 1, false);
    assert!(!f.is_active());
    assert!(f.is_inactive());
    assert_eq!(f.contribution(), 0);
  }

  #[tokio::test]
  async fn recompute_reads_source_and_stamps_date() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    let source = FixedSource::default().with(jobs_created(), 4);
    let mut f = Factor::seed(jobs_created());

    assert_eq!(f.recompute_count(&source, date).await, 4);
    assert_eq!(f.count(), 4);
    assert_eq!(f.date(), Some(date));
  }

  #[tokio::test]
  async fn unsupported_and_failing_pairs_count_zero() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    let people = FactorKey::new(EntityType::People, ActionKind::Create);
    let source = FixedSource::default()
      .with(jobs_created(), 2)
      .failing(jobs_created());

    let mut unsupported = Factor::seed(people).counted(7);
    assert_eq!(unsupported.recompute_count(&source, date).await, 0);

    let mut failing = Factor::seed(jobs_created()).counted(7);
    assert_eq!(failing.recompute_count(&source, date).await, 0);
    assert_eq!(failing.date(), Some(date));
  }
}
