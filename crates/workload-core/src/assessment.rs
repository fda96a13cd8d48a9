//! Assessment — assesses one day's workload.
//!
//! Running an assessment loads (or seeds) the factors, pulls their counts
//! for the date from a [`FactorSource`], evaluates the score and weight, and
//! loads the threshold table used to colour the result. Every mutation takes
//! `&mut self`, so one assessment has exactly one writer; callers sharing an
//! assessment across tasks must put it behind a lock for the whole
//! mutate-evaluate-persist sequence.

use chrono::NaiveDate;

use crate::{
  Result,
  config::AssessmentConfig,
  factor_set::FactorSet,
  snapshot::{AssessmentSnapshot, FactorSnapshot},
  source::FactorSource,
  store::AssessmentStore,
  taxonomy::FactorKey,
  threshold::{ThresholdEntry, ThresholdTable},
  weight::{ActivityWeight, Colour},
};

#[derive(Debug, Clone)]
pub struct Assessment {
  date:       NaiveDate,
  factors:    FactorSet,
  thresholds: ThresholdTable,
}

impl Assessment {
  /// Assess `date`.
  pub async fn run<St, Src>(
    store: &St,
    source: &Src,
    config: &AssessmentConfig,
    date: NaiveDate,
  ) -> Result<Self>
  where
    St: AssessmentStore,
    Src: FactorSource,
  {
    config.validate()?;

    let thresholds = ThresholdTable::load(store).await?;
    let mut factors = FactorSet::new(config.bands);
    factors.load_or_seed(store, source, date).await?;

    tracing::info!(
      %date,
      score = factors.score(),
      weight = %factors.weight(),
      "assessed day"
    );

    Ok(Self { date, factors, thresholds })
  }

  /// Recount against `source` for the same date.
  pub async fn refresh<Src: FactorSource>(&mut self, source: &Src) {
    self.factors.refresh_counts(source, self.date).await;
  }

  // ── Results ───────────────────────────────────────────────────────────

  pub fn date(&self) -> NaiveDate { self.date }

  pub fn score(&self) -> u64 { self.factors.score() }

  pub fn weight(&self) -> ActivityWeight { self.factors.weight() }

  /// Display colour configured for the day's weight.
  pub fn colour(&self) -> &Colour { self.thresholds.colour_for(self.weight()) }

  pub fn factors(&self) -> &FactorSet { &self.factors }

  pub fn thresholds(&self) -> &ThresholdTable { &self.thresholds }

  pub fn snapshot(&self) -> AssessmentSnapshot {
    AssessmentSnapshot {
      date:     self.date,
      score:    self.score(),
      weight:   self.weight(),
      label:    self.weight().label().to_owned(),
      colour:   self.colour().clone(),
      factors:  self.factors.ranked().into_iter().map(FactorSnapshot::from).collect(),
      active:   self.factors.active().iter().map(|f| f.key()).collect(),
      inactive: self.factors.inactive().iter().map(|f| f.key()).collect(),
    }
  }

  // ── Factor mutations ──────────────────────────────────────────────────

  pub async fn toggle_factor<St: AssessmentStore>(
    &mut self,
    store: &St,
    key: FactorKey,
  ) -> Result<()> {
    self.factors.toggle_active(store, key).await
  }

  pub async fn set_factor_weight<St: AssessmentStore>(
    &mut self,
    store: &St,
    key: FactorKey,
    weight: u32,
  ) -> Result<()> {
    self.factors.set_weight(store, key, weight).await
  }

  pub async fn set_factor_threshold<St: AssessmentStore>(
    &mut self,
    store: &St,
    key: FactorKey,
    threshold: u32,
  ) -> Result<()> {
    self.factors.set_threshold(store, key, threshold).await
  }

  // ── Threshold mutations ───────────────────────────────────────────────

  pub async fn set_threshold_value<St: AssessmentStore>(
    &mut self,
    store: &St,
    weight: ActivityWeight,
    value: u32,
  ) -> Result<&ThresholdEntry> {
    self.thresholds.set_value(store, weight, value).await
  }

  pub async fn set_threshold_colour<St: AssessmentStore>(
    &mut self,
    store: &St,
    weight: ActivityWeight,
    colour: Colour,
  ) -> Result<&ThresholdEntry> {
    self.thresholds.set_colour(store, weight, colour).await
  }

  pub async fn reset_thresholds<St: AssessmentStore>(&mut self, store: &St) -> Result<()> {
    self.thresholds.reset_to_default(store).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    Error,
    taxonomy::{ActionKind, EntityType},
    testing::{FakeStore, FixedSource},
    weight::ScoreBands,
  };

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 1, 12).unwrap() }

  fn jobs_created() -> FactorKey { FactorKey::new(EntityType::Jobs, ActionKind::Create) }

  #[tokio::test]
  async fn run_seeds_counts_and_classifies() {
    let store = FakeStore::default();
    let source = FixedSource::default()
      .with(FactorKey::new(EntityType::Tasks, ActionKind::Interaction), 6);

    let a = Assessment::run(&store, &source, &AssessmentConfig::default(), day())
      .await
      .unwrap();

    assert_eq!(a.date(), day());
    assert_eq!(a.score(), 6);
    assert_eq!(a.weight(), ActivityWeight::Medium);
    assert_eq!(a.colour(), &ActivityWeight::Medium.default_colour());
    assert_eq!(a.factors().len(), 14);
    assert!(a.factors().ranked().iter().all(|f| f.date() == Some(day())));
  }

  #[tokio::test]
  async fn colour_follows_threshold_table() {
    let store = FakeStore::default();
    let source = FixedSource::default().with(jobs_created(), 2);
    let mut a = Assessment::run(&store, &source, &AssessmentConfig::default(), day())
      .await
      .unwrap();

    let teal: Colour = "#008080".parse().unwrap();
    a.set_threshold_colour(&store, ActivityWeight::Light, teal.clone())
      .await
      .unwrap();
    assert_eq!(a.colour(), &teal);

    a.reset_thresholds(&store).await.unwrap();
    assert_eq!(a.colour(), &ActivityWeight::Light.default_colour());
  }

  #[tokio::test]
  async fn custom_bands_change_classification() {
    let store = FakeStore::default();
    let source = FixedSource::default().with(jobs_created(), 3);
    let config = AssessmentConfig {
      bands: ScoreBands { medium: 2, heavy: 3, significant: 4 },
    };

    let a = Assessment::run(&store, &source, &config, day()).await.unwrap();
    assert_eq!(a.weight(), ActivityWeight::Heavy);
  }

  #[tokio::test]
  async fn invalid_bands_are_rejected() {
    let store = FakeStore::default();
    let config = AssessmentConfig {
      bands: ScoreBands { medium: 9, heavy: 3, significant: 4 },
    };
    let err = Assessment::run(&store, &FixedSource::default(), &config, day())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidBands));
  }

  #[tokio::test]
  async fn refresh_picks_up_new_counts() {
    let store = FakeStore::default();
    let mut a = Assessment::run(
      &store,
      &FixedSource::default().with(jobs_created(), 1),
      &AssessmentConfig::default(),
      day(),
    )
    .await
    .unwrap();
    assert_eq!(a.weight(), ActivityWeight::Light);

    a.refresh(&FixedSource::default().with(jobs_created(), 20)).await;
    assert_eq!(a.score(), 20);
    assert_eq!(a.weight(), ActivityWeight::Significant);
  }

  #[tokio::test]
  async fn snapshot_mirrors_factor_set() {
    let store = FakeStore::default();
    let source = FixedSource::default().with(jobs_created(), 4);
    let mut a = Assessment::run(&store, &source, &AssessmentConfig::default(), day())
      .await
      .unwrap();
    a.set_factor_threshold(&store, jobs_created(), 4).await.unwrap();

    let snap = a.snapshot();
    assert_eq!(snap.score, 4);
    assert_eq!(snap.label, "Light");
    assert_eq!(snap.factors.len(), 14);
    assert_eq!(snap.factors[0].key(), jobs_created());
    assert_eq!(snap.factors[0].description, "4 Jobs created");
    assert!(snap.factors[0].active && snap.factors[0].inactive);
    assert_eq!(snap.active, vec![jobs_created()]);
    assert!(snap.inactive.contains(&jobs_created()));

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["weight"], "light");
    assert_eq!(json["factors"][0]["entity_type"], "jobs");
  }
}
