//! Handlers for `/factors`.
//!
//! | Method | Path                                   | Notes                   |
//! |--------|----------------------------------------|-------------------------|
//! | PATCH  | `/factors/{entity_type}/{action_kind}` | Returns fresh snapshot  |

use std::sync::Arc;

use axum::extract::State;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use workload_core::{
  assessment::Assessment,
  snapshot::AssessmentSnapshot,
  taxonomy::{ActionKind, EntityType, FactorKey},
};

use crate::{
  ApiError, ApiState, Backend,
  extract::{Json, Path},
};

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFactorBody {
  /// Day to re-assess after the change; defaults to today.
  pub date:      Option<NaiveDate>,
  pub weight:    Option<u32>,
  pub threshold: Option<u32>,
  pub alive:     Option<bool>,
}

pub async fn update<S: Backend>(
  State(state): State<Arc<ApiState<S>>>,
  Path((entity_type, action_kind)): Path<(EntityType, ActionKind)>,
  Json(body): Json<UpdateFactorBody>,
) -> Result<Json<AssessmentSnapshot>, ApiError> {
  if body.weight.is_none() && body.threshold.is_none() && body.alive.is_none() {
    return Err(ApiError::BadRequest(
      "expected at least one of weight, threshold, alive".into(),
    ));
  }

  let key = FactorKey::new(entity_type, action_kind);
  let date = body.date.unwrap_or_else(|| Local::now().date_naive());

  let _guard = state.writer.lock().await;
  let store = state.store.as_ref();
  let mut assessment = Assessment::run(store, store, &state.config, date).await?;

  if let Some(weight) = body.weight {
    assessment.set_factor_weight(store, key, weight).await?;
  }
  if let Some(threshold) = body.threshold {
    assessment.set_factor_threshold(store, key, threshold).await?;
  }
  if let Some(alive) = body.alive {
    let current = assessment
      .factors()
      .get(key)
      .map(|f| f.alive())
      .ok_or_else(|| ApiError::NotFound(format!("factor {key}")))?;
    if current != alive {
      assessment.toggle_factor(store, key).await?;
    }
  }

  tracing::info!(%key, %date, score = assessment.score(), "factor updated");
  Ok(Json(assessment.snapshot()))
}
