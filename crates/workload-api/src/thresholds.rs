//! Handlers for `/thresholds`.
//!
//! | Method | Path                    | Notes                               |
//! |--------|-------------------------|-------------------------------------|
//! | GET    | `/thresholds`           | Lightest weight first               |
//! | PATCH  | `/thresholds/{weight}`  | `value` and/or `colour`             |
//! | POST   | `/thresholds/reset`     | Restores every default atomically   |

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use workload_core::{
  threshold::{ThresholdEntry, ThresholdTable},
  weight::{Colour, parse_weight},
};

use crate::{
  ApiError, ApiState, Backend,
  extract::{Json, Path},
};

fn listing(table: &ThresholdTable) -> Vec<ThresholdEntry> {
  table.all().into_iter().cloned().collect()
}

// ─── List ────────────────────────────────────────────────────────────────────

pub async fn list<S: Backend>(
  State(state): State<Arc<ApiState<S>>>,
) -> Result<Json<Vec<ThresholdEntry>>, ApiError> {
  let _guard = state.writer.lock().await;
  let table = ThresholdTable::load(state.store.as_ref()).await?;
  Ok(Json(listing(&table)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateThresholdBody {
  pub value:  Option<u32>,
  pub colour: Option<Colour>,
}

pub async fn update<S: Backend>(
  State(state): State<Arc<ApiState<S>>>,
  Path(weight): Path<String>,
  Json(body): Json<UpdateThresholdBody>,
) -> Result<Json<ThresholdEntry>, ApiError> {
  let weight = parse_weight(&weight)?;
  if body.value.is_none() && body.colour.is_none() {
    return Err(ApiError::BadRequest("expected value and/or colour".into()));
  }

  let _guard = state.writer.lock().await;
  let store = state.store.as_ref();
  let mut table = ThresholdTable::load(store).await?;

  if let Some(value) = body.value {
    table.set_value(store, weight, value).await?;
  }
  if let Some(colour) = body.colour {
    table.set_colour(store, weight, colour).await?;
  }

  tracing::info!(%weight, "threshold updated");
  Ok(Json(table.entry(weight).clone()))
}

// ─── Reset ───────────────────────────────────────────────────────────────────

pub async fn reset<S: Backend>(
  State(state): State<Arc<ApiState<S>>>,
) -> Result<Json<Vec<ThresholdEntry>>, ApiError> {
  let _guard = state.writer.lock().await;
  let store = state.store.as_ref();
  let mut table = ThresholdTable::load(store).await?;
  table.reset_to_default(store).await?;

  tracing::info!("thresholds reset to defaults");
  Ok(Json(listing(&table)))
}
