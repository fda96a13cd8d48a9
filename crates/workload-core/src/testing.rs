//! In-memory test doubles for the two ports.

use std::{
  collections::{HashMap, HashSet},
  io,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use chrono::NaiveDate;

use crate::{
  factor::Factor,
  source::{FactorSource, SourceError},
  store::AssessmentStore,
  taxonomy::FactorKey,
  threshold::ThresholdEntry,
};

// ─── FixedSource ─────────────────────────────────────────────────────────────

/// Returns the same count for a key regardless of date. Keys without a
/// count are unsupported.
#[derive(Default)]
pub struct FixedSource {
  counts:  HashMap<FactorKey, u32>,
  failing: HashSet<FactorKey>,
}

impl FixedSource {
  pub fn with(mut self, key: FactorKey, count: u32) -> Self {
    self.counts.insert(key, count);
    self
  }

  pub fn failing(mut self, key: FactorKey) -> Self {
    self.failing.insert(key);
    self
  }
}

impl FactorSource for FixedSource {
  type Error = io::Error;

  async fn count(
    &self,
    key: FactorKey,
    _date: NaiveDate,
  ) -> Result<u32, SourceError<io::Error>> {
    if self.failing.contains(&key) {
      return Err(SourceError::Backend(io::Error::other("query failed")));
    }
    self
      .counts
      .get(&key)
      .copied()
      .ok_or(SourceError::UnsupportedFactorPair(key))
  }
}

// ─── FakeStore ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeStore {
  pub factors:      Mutex<HashMap<FactorKey, Factor>>,
  pub thresholds:   Mutex<Vec<ThresholdEntry>>,
  pub factor_saves: AtomicUsize,
  fail_writes:      AtomicBool,
}

impl FakeStore {
  pub fn fail_writes(&self, fail: bool) { self.fail_writes.store(fail, Ordering::SeqCst); }

  fn check_write(&self) -> io::Result<()> {
    if self.fail_writes.load(Ordering::SeqCst) {
      Err(io::Error::other("disk full"))
    } else {
      Ok(())
    }
  }

  pub fn stored_factor(&self, key: FactorKey) -> Option<Factor> {
    self.factors.lock().unwrap().get(&key).cloned()
  }

  pub fn stored_thresholds(&self) -> Vec<ThresholdEntry> {
    self.thresholds.lock().unwrap().clone()
  }
}

impl AssessmentStore for FakeStore {
  type Error = io::Error;

  async fn load_factors(&self, universe: &[FactorKey]) -> io::Result<Vec<Factor>> {
    let factors = self.factors.lock().unwrap();
    Ok(universe.iter().filter_map(|k| factors.get(k).cloned()).collect())
  }

  async fn save_factor(&self, factor: &Factor) -> io::Result<()> {
    self.check_write()?;
    self.factor_saves.fetch_add(1, Ordering::SeqCst);
    self.factors.lock().unwrap().insert(factor.key(), factor.clone());
    Ok(())
  }

  async fn load_thresholds(&self) -> io::Result<Vec<ThresholdEntry>> {
    Ok(self.stored_thresholds())
  }

  async fn save_threshold(&self, entry: &ThresholdEntry) -> io::Result<()> {
    self.check_write()?;
    let mut table = self.thresholds.lock().unwrap();
    table.retain(|e| e.weight != entry.weight);
    table.push(entry.clone());
    Ok(())
  }

  async fn replace_thresholds(&self, entries: &[ThresholdEntry]) -> io::Result<()> {
    self.check_write()?;
    *self.thresholds.lock().unwrap() = entries.to_vec();
    Ok(())
  }
}
