//! The `AssessmentStore` trait: persistence port for factor settings and the
//! threshold table.
//!
//! Implemented by storage backends (e.g. `workload-store-sqlite`). The engine
//! holds no global state; everything that must survive a restart goes
//! through this trait.

use std::future::Future;

use crate::{
  factor::Factor,
  taxonomy::FactorKey,
  threshold::ThresholdEntry,
};

/// Abstraction over a backend that remembers factor configuration and
/// threshold overrides.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait AssessmentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Factors ───────────────────────────────────────────────────────────

  /// Load the persisted factors whose key is in `universe`. Counts are not
  /// persisted; returned factors carry a zero count and no date.
  fn load_factors<'a>(
    &'a self,
    universe: &'a [FactorKey],
  ) -> impl Future<Output = Result<Vec<Factor>, Self::Error>> + Send + 'a;

  /// Insert or update one factor's `weight`, `threshold` and `alive` flag,
  /// keyed by its [`FactorKey`].
  fn save_factor<'a>(
    &'a self,
    factor: &'a Factor,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Thresholds ────────────────────────────────────────────────────────

  fn load_thresholds(
    &self,
  ) -> impl Future<Output = Result<Vec<ThresholdEntry>, Self::Error>> + Send + '_;

  /// Insert or update a single entry.
  fn save_threshold<'a>(
    &'a self,
    entry: &'a ThresholdEntry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Replace the whole table in one transaction. On error the previously
  /// stored table must be left untouched.
  fn replace_thresholds<'a>(
    &'a self,
    entries: &'a [ThresholdEntry],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
