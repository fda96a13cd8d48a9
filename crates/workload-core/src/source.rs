//! The `FactorSource` port and the registry of counting rules behind it.
//!
//! A source answers "how much activity of this kind happened on this day".
//! Which pairs can be counted at all, and how, is data held in
//! [`CountingRules`] rather than a branch per pair.

use std::{collections::BTreeMap, future::Future};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::taxonomy::{ActionKind, EntityType, FactorKey};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Why a source could not produce a count. Neither case aborts an
/// assessment; the affected factor counts as zero.
#[derive(Debug, Error)]
pub enum SourceError<E> {
  #[error("no counting rule for {0}")]
  UnsupportedFactorPair(FactorKey),

  #[error("count query failed: {0}")]
  Backend(#[source] E),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Counting query service consumed by [`crate::factor::Factor`].
pub trait FactorSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Count the activity matching `key` on `date`.
  fn count(
    &self,
    key: FactorKey,
    date: NaiveDate,
  ) -> impl Future<Output = Result<u32, SourceError<Self::Error>>> + Send + '_;
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// How to turn a day's logged events into a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "action", rename_all = "snake_case")]
pub enum CountRule {
  /// Every logged event of this action counts.
  Events(ActionKind),
  /// Each entity counts once, however many events of this action it logged.
  DistinctEntities(ActionKind),
}

/// Registry of the pairs a source knows how to count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountingRules {
  rules: BTreeMap<FactorKey, CountRule>,
}

impl CountingRules {
  /// Rules for the entity types the tracker records events for. Companies,
  /// people and projects have no rule and count as zero.
  pub fn standard() -> Self {
    [EntityType::Records, EntityType::Jobs, EntityType::Tasks, EntityType::Notes]
      .into_iter()
      .fold(Self::default(), |rules, entity| {
        rules
          .with(
            FactorKey::new(entity, ActionKind::Create),
            CountRule::Events(ActionKind::Create),
          )
          .with(
            FactorKey::new(entity, ActionKind::Interaction),
            CountRule::DistinctEntities(ActionKind::Interaction),
          )
      })
  }

  pub fn with(mut self, key: FactorKey, rule: CountRule) -> Self {
    self.rules.insert(key, rule);
    self
  }

  /// Look up the rule for `key`.
  pub fn rule<E>(&self, key: FactorKey) -> Result<CountRule, SourceError<E>> {
    self
      .rules
      .get(&key)
      .copied()
      .ok_or(SourceError::UnsupportedFactorPair(key))
  }

  pub fn supports(&self, key: FactorKey) -> bool { self.rules.contains_key(&key) }
}
