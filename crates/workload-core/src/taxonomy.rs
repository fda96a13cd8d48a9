//! Trackable entity categories and the kinds of activity counted for them.
//!
//! A [`FactorKey`] pairs one [`EntityType`] with one [`ActionKind`] and is the
//! stable identity of a factor across evaluations and process restarts.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::Error;

// ─── EntityType ──────────────────────────────────────────────────────────────

/// A category of item the tracker records activity for.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityType {
  Records,
  Jobs,
  Tasks,
  Notes,
  Companies,
  People,
  Projects,
}

impl EntityType {
  /// Identifier used in storage columns and URLs, e.g. `"jobs"`.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Display label for headings.
  pub fn label(self) -> &'static str { self.plural() }

  pub fn singular(self) -> &'static str {
    match self {
      Self::Records => "Record",
      Self::Jobs => "Job",
      Self::Tasks => "Task",
      Self::Notes => "Note",
      Self::Companies => "Company",
      Self::People => "Person",
      Self::Projects => "Project",
    }
  }

  pub fn plural(self) -> &'static str {
    match self {
      Self::Records => "Records",
      Self::Jobs => "Jobs",
      Self::Tasks => "Tasks",
      Self::Notes => "Notes",
      Self::Companies => "Companies",
      Self::People => "People",
      Self::Projects => "Projects",
    }
  }
}

impl fmt::Display for EntityType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── ActionKind ──────────────────────────────────────────────────────────────

/// What happened to an entity.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
  /// The entity was created on the day.
  Create,
  /// The entity was edited or otherwise touched on the day.
  Interaction,
}

impl ActionKind {
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn label(self) -> &'static str {
    match self {
      Self::Create => "Create",
      Self::Interaction => "Interaction",
    }
  }

  /// Verb phrase used in factor descriptions ("3 Jobs created").
  pub fn past_tense(self) -> &'static str {
    match self {
      Self::Create => "created",
      Self::Interaction => "interacted with",
    }
  }
}

impl fmt::Display for ActionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── FactorKey ───────────────────────────────────────────────────────────────

/// Composite identity of a factor. Exactly one factor exists per key.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FactorKey {
  pub entity_type: EntityType,
  pub action_kind: ActionKind,
}

impl FactorKey {
  pub const fn new(entity_type: EntityType, action_kind: ActionKind) -> Self {
    Self { entity_type, action_kind }
  }

  /// Every (entity, action) pair, entity-major in declaration order.
  pub fn universe() -> Vec<FactorKey> {
    EntityType::iter()
      .flat_map(|e| ActionKind::iter().map(move |a| FactorKey::new(e, a)))
      .collect()
  }
}

impl fmt::Display for FactorKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.entity_type, self.action_kind)
  }
}

impl FromStr for FactorKey {
  type Err = Error;

  /// Parses the `entity.action` form produced by `Display`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (entity, action) = s
      .split_once('.')
      .ok_or_else(|| Error::InvalidKey(s.to_owned()))?;
    let entity_type =
      entity.parse().map_err(|_| Error::InvalidKey(s.to_owned()))?;
    let action_kind =
      action.parse().map_err(|_| Error::InvalidKey(s.to_owned()))?;
    Ok(Self::new(entity_type, action_kind))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn universe_covers_every_pair_once() {
    let keys = FactorKey::universe();
    assert_eq!(keys.len(), 14);

    let mut deduped = keys.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), keys.len());
  }

  #[test]
  fn key_display_parses_back() {
    let key = FactorKey::new(EntityType::Jobs, ActionKind::Interaction);
    assert_eq!(key.to_string(), "jobs.interaction");
    assert_eq!("jobs.interaction".parse::<FactorKey>().unwrap(), key);
  }

  #[test]
  fn malformed_key_is_rejected() {
    assert!(matches!(
      "jobs".parse::<FactorKey>(),
      Err(Error::InvalidKey(_))
    ));
    assert!(matches!(
      "widgets.create".parse::<FactorKey>(),
      Err(Error::InvalidKey(_))
    ));
  }

  #[test]
  fn people_singular_is_irregular() {
    assert_eq!(EntityType::People.singular(), "Person");
    assert_eq!(EntityType::Companies.singular(), "Company");
  }
}
