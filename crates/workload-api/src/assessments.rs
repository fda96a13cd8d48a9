//! Handlers for `/assessments`.
//!
//! | Method | Path                              | Notes                         |
//! |--------|-----------------------------------|-------------------------------|
//! | GET    | `/assessments/{date}`             | Full snapshot for one day     |
//! | GET    | `/assessments/{date}/factors`     | `?entity_type=` filter        |

use std::sync::Arc;

use axum::extract::State;
use chrono::NaiveDate;
use serde::Deserialize;
use workload_core::{
  assessment::Assessment,
  snapshot::{AssessmentSnapshot, FactorSnapshot},
  taxonomy::EntityType,
};

use crate::{
  ApiError, ApiState, Backend,
  extract::{Json, Path, Query},
};

// ─── Get one ─────────────────────────────────────────────────────────────────

pub async fn get_one<S: Backend>(
  State(state): State<Arc<ApiState<S>>>,
  Path(date): Path<NaiveDate>,
) -> Result<Json<AssessmentSnapshot>, ApiError> {
  let _guard = state.writer.lock().await;
  let store = state.store.as_ref();
  let assessment = Assessment::run(store, store, &state.config, date).await?;
  Ok(Json(assessment.snapshot()))
}

// ─── Factors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FactorsParams {
  pub entity_type: Option<EntityType>,
}

/// Factors for one day, highest count first. Without a filter only the
/// active factors are returned.
pub async fn factors<S: Backend>(
  State(state): State<Arc<ApiState<S>>>,
  Path(date): Path<NaiveDate>,
  Query(params): Query<FactorsParams>,
) -> Result<Json<Vec<FactorSnapshot>>, ApiError> {
  let _guard = state.writer.lock().await;
  let store = state.store.as_ref();
  let assessment = Assessment::run(store, store, &state.config, date).await?;

  let set = assessment.factors();
  let factors = match params.entity_type {
    Some(entity_type) => set.by_type(entity_type),
    None => set.active(),
  };
  Ok(Json(factors.into_iter().map(FactorSnapshot::from).collect()))
}
