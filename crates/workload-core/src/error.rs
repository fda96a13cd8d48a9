//! Error types for `workload-core`.

use thiserror::Error;

use crate::{taxonomy::FactorKey, weight::ActivityWeight};

#[derive(Debug, Error)]
pub enum Error {
  #[error("no factor for {0}")]
  UnknownFactor(FactorKey),

  #[error("invalid factor key: {0:?}")]
  InvalidKey(String),

  #[error("invalid colour {0:?}: expected #RRGGBB")]
  InvalidColour(String),

  #[error("unknown activity weight: {0:?}")]
  UnknownWeight(String),

  #[error("the {0} threshold is fixed and cannot be edited")]
  ImmutableEntry(ActivityWeight),

  #[error("score bands must satisfy 0 < medium < heavy < significant")]
  InvalidBands,

  /// Persisting a mutated entity failed. The in-memory change is kept.
  #[error("failed to save {entity}: {source}")]
  StorageWriteFailed {
    entity: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("failed to load {entity}: {source}")]
  StorageReadFailed {
    entity: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  pub(crate) fn write<E>(entity: impl Into<String>, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageWriteFailed { entity: entity.into(), source: Box::new(source) }
  }

  pub(crate) fn read<E>(entity: impl Into<String>, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageReadFailed { entity: entity.into(), source: Box::new(source) }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
