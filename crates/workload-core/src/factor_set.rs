//! FactorSet — every factor for one evaluation plus the score and weight
//! derived from them.
//!
//! `score` and `weight` are recomputed by [`FactorSet::evaluate`] after every
//! change to the factors, so readers never observe a stale pair. The only
//! way to change a factor's settings from outside is through the mutation
//! methods here, which evaluate and persist in one step.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
  Error, Result,
  factor::Factor,
  source::FactorSource,
  store::AssessmentStore,
  taxonomy::{EntityType, FactorKey},
  weight::{ActivityWeight, ScoreBands},
};

#[derive(Debug, Clone)]
pub struct FactorSet {
  factors: BTreeMap<FactorKey, Factor>,
  bands:   ScoreBands,
  score:   u64,
  weight:  ActivityWeight,
}

impl FactorSet {
  /// An empty set classified with `bands`.
  pub fn new(bands: ScoreBands) -> Self {
    Self {
      factors: BTreeMap::new(),
      bands,
      score: 0,
      weight: ActivityWeight::Empty,
    }
  }

  // ── Loading ───────────────────────────────────────────────────────────

  /// Load the persisted factors, seed (and persist) a default factor for
  /// every pair that has none, then refresh all counts for `date` and
  /// evaluate.
  ///
  /// Safe to call repeatedly: pairs already held in memory or in the store
  /// are reused, never duplicated.
  pub async fn load_or_seed<St, Src>(
    &mut self,
    store: &St,
    source: &Src,
    date: NaiveDate,
  ) -> Result<()>
  where
    St: AssessmentStore,
    Src: FactorSource,
  {
    let universe = FactorKey::universe();
    let stored = store
      .load_factors(&universe)
      .await
      .map_err(|e| Error::read("factors", e))?;
    for factor in stored {
      self.factors.entry(factor.key()).or_insert(factor);
    }

    for key in universe {
      if self.factors.contains_key(&key) {
        continue;
      }
      let factor = Factor::seed(key);
      store
        .save_factor(&factor)
        .await
        .map_err(|e| Error::write(format!("factor {key}"), e))?;
      tracing::debug!(%key, "seeded factor");
      self.factors.insert(key, factor);
    }

    self.refresh_counts(source, date).await;
    Ok(())
  }

  /// Recount every factor for `date` and evaluate. A failed count only
  /// zeroes its own factor.
  pub async fn refresh_counts<Src: FactorSource>(&mut self, source: &Src, date: NaiveDate) {
    for factor in self.factors.values_mut() {
      factor.recompute_count(source, date).await;
    }
    self.evaluate();
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub fn score(&self) -> u64 { self.score }

  pub fn weight(&self) -> ActivityWeight { self.weight }

  pub fn bands(&self) -> &ScoreBands { &self.bands }

  pub fn get(&self, key: FactorKey) -> Option<&Factor> { self.factors.get(&key) }

  pub fn len(&self) -> usize { self.factors.len() }

  pub fn is_empty(&self) -> bool { self.factors.is_empty() }

  /// All factors, highest count first.
  pub fn ranked(&self) -> Vec<&Factor> { rank(self.factors.values()) }

  /// Alive factors whose count reaches their threshold, highest count first.
  pub fn active(&self) -> Vec<&Factor> {
    rank(self.factors.values().filter(|f| f.is_active()))
  }

  /// Switched-off factors and those at or below their threshold. A factor
  /// whose count equals its threshold appears here and in [`Self::active`].
  pub fn inactive(&self) -> Vec<&Factor> {
    rank(self.factors.values().filter(|f| f.is_inactive()))
  }

  /// Active factors of one entity type, in [`Self::active`] order.
  pub fn by_type(&self, entity_type: EntityType) -> Vec<&Factor> {
    self
      .active()
      .into_iter()
      .filter(|f| f.entity_type() == entity_type)
      .collect()
  }

  // ── Scoring ───────────────────────────────────────────────────────────

  /// Sum of each active factor's weighted count, where that weighted count
  /// also reaches the factor's threshold.
  pub fn calculate_score(&self) -> u64 {
    self.active().iter().map(|f| f.contribution()).sum()
  }

  pub fn classify(&self, score: u64) -> ActivityWeight { self.bands.classify(score) }

  /// Recompute `score`, then `weight` from it.
  pub fn evaluate(&mut self) {
    self.score = self.calculate_score();
    self.weight = self.classify(self.score);
    tracing::debug!(score = self.score, weight = %self.weight, "evaluated factor set");
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Flip a factor between alive and switched off.
  pub async fn toggle_active<St: AssessmentStore>(
    &mut self,
    store: &St,
    key: FactorKey,
  ) -> Result<()> {
    self.mutate(store, key, |f| f.set_alive(!f.alive())).await
  }

  pub async fn set_threshold<St: AssessmentStore>(
    &mut self,
    store: &St,
    key: FactorKey,
    threshold: u32,
  ) -> Result<()> {
    self.mutate(store, key, |f| f.set_threshold(threshold)).await
  }

  pub async fn set_weight<St: AssessmentStore>(
    &mut self,
    store: &St,
    key: FactorKey,
    weight: u32,
  ) -> Result<()> {
    self.mutate(store, key, |f| f.set_weight(weight)).await
  }

  /// Persist one factor's current settings.
  pub async fn save<St: AssessmentStore>(&self, store: &St, key: FactorKey) -> Result<()> {
    let factor = self.factors.get(&key).ok_or(Error::UnknownFactor(key))?;
    store
      .save_factor(factor)
      .await
      .map_err(|e| Error::write(format!("factor {key}"), e))
  }

  /// Apply `change`, re-evaluate, then persist.
  ///
  /// If the save fails the change is kept in memory and the set stays
  /// evaluated against it; the caller decides whether to [`Self::save`]
  /// again or apply the inverse change.
  async fn mutate<St: AssessmentStore>(
    &mut self,
    store: &St,
    key: FactorKey,
    change: impl FnOnce(&mut Factor),
  ) -> Result<()> {
    let factor = self.factors.get_mut(&key).ok_or(Error::UnknownFactor(key))?;
    change(factor);
    self.evaluate();
    self.save(store, key).await
  }
}

/// Order by count descending; equal counts fall back to key order so output
/// is stable.
fn rank<'a>(factors: impl Iterator<Item = &'a Factor>) -> Vec<&'a Factor> {
  let mut ranked: Vec<&Factor> = factors.collect();
  ranked.sort_by(|a, b| b.count().cmp(&a.count()).then(a.key().cmp(&b.key())));
  ranked
}
