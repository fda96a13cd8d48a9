//! ThresholdTable — the user-editable breakpoint and colour for each
//! [`ActivityWeight`].
//!
//! The table always holds exactly one entry per weight. A stored table that
//! is missing entries is discarded and regenerated from the defaults.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  store::AssessmentStore,
  weight::{ActivityWeight, Colour},
};

// ─── Entry ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdEntry {
  pub weight:        ActivityWeight,
  /// The user's breakpoint; equals `default_value` until overridden.
  pub value:         u32,
  pub default_value: u32,
  pub colour:        Colour,
}

impl ThresholdEntry {
  pub fn default_for(weight: ActivityWeight) -> Self {
    Self {
      weight,
      value: weight.default_value(),
      default_value: weight.default_value(),
      colour: weight.default_colour(),
    }
  }

  pub fn is_overridden(&self) -> bool { self.value != self.default_value }
}

// ─── Table ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdTable {
  /// Indexed by `ActivityWeight as usize`.
  entries: [ThresholdEntry; ActivityWeight::COUNT],
}

impl Default for ThresholdTable {
  fn default() -> Self {
    Self { entries: ActivityWeight::ALL.map(ThresholdEntry::default_for) }
  }
}

impl ThresholdTable {
  /// Build a table from stored rows. Returns `None` unless every weight is
  /// present and the fixed `Empty` breakpoint is still at its default.
  pub fn from_entries(mut rows: Vec<ThresholdEntry>) -> Option<Self> {
    let ordered: Vec<ThresholdEntry> = ActivityWeight::ALL
      .iter()
      .map(|w| {
        rows
          .iter()
          .position(|e| e.weight == *w)
          .map(|i| rows.swap_remove(i))
      })
      .collect::<Option<_>>()?;
    let entries: [ThresholdEntry; ActivityWeight::COUNT] = ordered.try_into().ok()?;
    let empty = &entries[ActivityWeight::Empty as usize];
    if empty.value != ActivityWeight::Empty.default_value() {
      return None;
    }
    Some(Self { entries })
  }

  /// Load the table from `store`, regenerating it if the stored copy is
  /// incomplete or its `Empty` breakpoint has moved.
  pub async fn load<S: AssessmentStore>(store: &S) -> Result<Self> {
    let rows = store
      .load_thresholds()
      .await
      .map_err(|e| Error::read("threshold table", e))?;
    let found = rows.len();

    match Self::from_entries(rows) {
      Some(table) => Ok(table),
      None => {
        tracing::warn!(
          found,
          expected = ActivityWeight::COUNT,
          "threshold table incomplete or corrupt; regenerating defaults"
        );
        let mut table = Self::default();
        table.reset_to_default(store).await?;
        Ok(table)
      }
    }
  }

  /// Every entry ordered by default breakpoint, lightest first.
  pub fn all(&self) -> Vec<&ThresholdEntry> {
    let mut entries: Vec<&ThresholdEntry> = self.entries.iter().collect();
    entries.sort_by_key(|e| e.default_value);
    entries
  }

  pub fn entry(&self, weight: ActivityWeight) -> &ThresholdEntry {
    &self.entries[weight as usize]
  }

  pub fn colour_for(&self, weight: ActivityWeight) -> &Colour {
    &self.entry(weight).colour
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Discard every override and persist the default table in one write.
  /// The in-memory table only changes once the store has accepted it.
  pub async fn reset_to_default<S: AssessmentStore>(&mut self, store: &S) -> Result<()> {
    let fresh = Self::default();
    store
      .replace_thresholds(&fresh.entries)
      .await
      .map_err(|e| Error::write("threshold table", e))?;
    *self = fresh;
    Ok(())
  }

  /// Override one weight's breakpoint. The `Empty` breakpoint is fixed.
  ///
  /// On a failed save the new value stays in memory; retry with
  /// [`Self::save`] or set the old value back.
  pub async fn set_value<S: AssessmentStore>(
    &mut self,
    store: &S,
    weight: ActivityWeight,
    value: u32,
  ) -> Result<&ThresholdEntry> {
    if !weight.is_editable() {
      return Err(Error::ImmutableEntry(weight));
    }
    self.entries[weight as usize].value = value;
    self.save(store, weight).await?;
    Ok(self.entry(weight))
  }

  /// Change one weight's display colour. Same save policy as
  /// [`Self::set_value`].
  pub async fn set_colour<S: AssessmentStore>(
    &mut self,
    store: &S,
    weight: ActivityWeight,
    colour: Colour,
  ) -> Result<&ThresholdEntry> {
    self.entries[weight as usize].colour = colour;
    self.save(store, weight).await?;
    Ok(self.entry(weight))
  }

  /// Persist the current state of one entry.
  pub async fn save<S: AssessmentStore>(&self, store: &S, weight: ActivityWeight) -> Result<()> {
    store
      .save_threshold(self.entry(weight))
      .await
      .map_err(|e| Error::write(format!("{weight} threshold"), e))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::FakeStore;

  fn colour(s: &str) -> Colour { s.parse().unwrap() }

  #[tokio::test]
  async fn empty_store_is_regenerated() {
    let store = FakeStore::default();
    let table = ThresholdTable::load(&store).await.unwrap();

    assert_eq!(table, ThresholdTable::default());
    assert_eq!(store.stored_thresholds().len(), ActivityWeight::COUNT);
  }

  #[tokio::test]
  async fn partial_table_is_regenerated() {
    let store = FakeStore::default();
    let mut heavy = ThresholdEntry::default_for(ActivityWeight::Heavy);
    heavy.value = 42;
    *store.thresholds.lock().unwrap() = vec![heavy];

    let table = ThresholdTable::load(&store).await.unwrap();
    assert_eq!(table.entry(ActivityWeight::Heavy).value, 10);
    assert_eq!(store.stored_thresholds().len(), ActivityWeight::COUNT);
  }

  #[tokio::test]
  async fn moved_empty_breakpoint_is_regenerated() {
    let store = FakeStore::default();
    let mut rows = ActivityWeight::ALL.map(ThresholdEntry::default_for).to_vec();
    rows[ActivityWeight::Empty as usize].value = 3;
    rows[ActivityWeight::Medium as usize].value = 7;
    *store.thresholds.lock().unwrap() = rows.clone();

    assert!(ThresholdTable::from_entries(rows).is_none());

    let table = ThresholdTable::load(&store).await.unwrap();
    assert_eq!(table, ThresholdTable::default());
    let stored = store.stored_thresholds();
    assert_eq!(stored.len(), ActivityWeight::COUNT);
    assert!(stored.iter().all(|e| e.value == e.default_value));
  }

  #[tokio::test]
  async fn complete_table_keeps_overrides() {
    let store = FakeStore::default();
    let mut rows: Vec<_> =
      ActivityWeight::ALL.map(ThresholdEntry::default_for).into_iter().rev().collect();
    rows[0].value = 99;
    let overridden = rows[0].weight;
    *store.thresholds.lock().unwrap() = rows;

    let table = ThresholdTable::load(&store).await.unwrap();
    assert_eq!(table.entry(overridden).value, 99);
    assert!(table.entry(overridden).is_overridden());
  }

  #[test]
  fn all_is_ordered_by_default_value() {
    let table = ThresholdTable::default();
    let weights: Vec<_> = table.all().iter().map(|e| e.weight).collect();
    assert_eq!(weights, ActivityWeight::ALL.to_vec());
  }

  #[tokio::test]
  async fn set_value_touches_only_its_entry() {
    let store = FakeStore::default();
    let mut table = ThresholdTable::load(&store).await.unwrap();

    table.set_value(&store, ActivityWeight::Medium, 7).await.unwrap();

    let stored = ThresholdTable::from_entries(store.stored_thresholds()).unwrap();
    assert_eq!(stored.entry(ActivityWeight::Medium).value, 7);
    for w in [ActivityWeight::Light, ActivityWeight::Heavy, ActivityWeight::Significant] {
      assert_eq!(stored.entry(w).value, w.default_value());
    }
  }

  #[tokio::test]
  async fn empty_breakpoint_is_immutable() {
    let store = FakeStore::default();
    let mut table = ThresholdTable::load(&store).await.unwrap();

    let err = table.set_value(&store, ActivityWeight::Empty, 3).await.unwrap_err();
    assert!(matches!(err, Error::ImmutableEntry(ActivityWeight::Empty)));
    assert_eq!(table.entry(ActivityWeight::Empty).value, 0);

    table
      .set_colour(&store, ActivityWeight::Empty, colour("#000000"))
      .await
      .unwrap();
    assert_eq!(table.colour_for(ActivityWeight::Empty).as_str(), "#000000");
  }

  #[tokio::test]
  async fn failed_save_keeps_in_memory_change() {
    let store = FakeStore::default();
    let mut table = ThresholdTable::load(&store).await.unwrap();
    store.fail_writes(true);

    let err = table
      .set_colour(&store, ActivityWeight::Heavy, colour("#123456"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::StorageWriteFailed { .. }));
    assert_eq!(table.colour_for(ActivityWeight::Heavy).as_str(), "#123456");

    store.fail_writes(false);
    table.save(&store, ActivityWeight::Heavy).await.unwrap();
    let stored = ThresholdTable::from_entries(store.stored_thresholds()).unwrap();
    assert_eq!(stored.colour_for(ActivityWeight::Heavy).as_str(), "#123456");
  }

  #[tokio::test]
  async fn failed_reset_leaves_both_tables_unchanged() {
    let store = FakeStore::default();
    let mut table = ThresholdTable::load(&store).await.unwrap();
    table.set_value(&store, ActivityWeight::Light, 3).await.unwrap();
    let before_memory = table.clone();
    let before_store = store.stored_thresholds();

    store.fail_writes(true);
    assert!(table.reset_to_default(&store).await.is_err());

    assert_eq!(table, before_memory);
    assert_eq!(store.stored_thresholds(), before_store);
  }

  #[tokio::test]
  async fn reset_discards_overrides() {
    let store = FakeStore::default();
    let mut table = ThresholdTable::load(&store).await.unwrap();
    table.set_value(&store, ActivityWeight::Heavy, 30).await.unwrap();
    table
      .set_colour(&store, ActivityWeight::Light, colour("#ABCDEF"))
      .await
      .unwrap();

    table.reset_to_default(&store).await.unwrap();

    assert_eq!(table, ThresholdTable::default());
    assert_eq!(
      ThresholdTable::from_entries(store.stored_thresholds()).unwrap(),
      ThresholdTable::default()
    );
  }
}
