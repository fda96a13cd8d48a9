//! Read-only, serialisable views handed to presentation layers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  factor::Factor,
  taxonomy::{ActionKind, EntityType, FactorKey},
  weight::{ActivityWeight, Colour},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorSnapshot {
  pub entity_type:  EntityType,
  pub action_kind:  ActionKind,
  pub count:        u32,
  pub weight:       u32,
  pub threshold:    u32,
  pub alive:        bool,
  /// Meets the active predicate.
  pub active:       bool,
  /// Meets the inactive predicate; can be true together with `active`.
  pub inactive:     bool,
  /// What the factor adds to the day's score.
  pub contribution: u64,
  pub description:  String,
}

impl From<&Factor> for FactorSnapshot {
  fn from(f: &Factor) -> Self {
    Self {
      entity_type:  f.entity_type(),
      action_kind:  f.action_kind(),
      count:        f.count(),
      weight:       f.weight(),
      threshold:    f.threshold(),
      alive:        f.alive(),
      active:       f.is_active(),
      inactive:     f.is_inactive(),
      contribution: f.contribution(),
      description:  f.describe(),
    }
  }
}

impl FactorSnapshot {
  pub fn key(&self) -> FactorKey { FactorKey::new(self.entity_type, self.action_kind) }
}

/// The outcome of assessing one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSnapshot {
  pub date:     NaiveDate,
  pub score:    u64,
  pub weight:   ActivityWeight,
  pub label:    String,
  pub colour:   Colour,
  /// Every factor, highest count first.
  pub factors:  Vec<FactorSnapshot>,
  pub active:   Vec<FactorKey>,
  pub inactive: Vec<FactorKey>,
}
