//! JSON REST API for workload assessments.
//!
//! Exposes an axum [`Router`] backed by any store that is both an
//! [`AssessmentStore`] and a [`FactorSource`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", workload_api::api_router(ApiState::new(store, config)))
//! ```

pub mod assessments;
pub mod error;
pub mod extract;
pub mod factors;
pub mod thresholds;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use tokio::sync::Mutex;
use workload_core::{
  config::AssessmentConfig,
  source::FactorSource,
  store::AssessmentStore,
};

pub use error::ApiError;

/// A backend the API can serve from: it persists settings and counts
/// activity.
pub trait Backend: AssessmentStore + FactorSource + 'static {}

impl<T> Backend for T where T: AssessmentStore + FactorSource + 'static {}

/// Shared state behind every handler.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub config: AssessmentConfig,
  /// Held for the whole load-mutate-persist sequence of a request.
  writer:     Mutex<()>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, config: AssessmentConfig) -> Self {
    Self { store, config, writer: Mutex::new(()) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: Backend>(state: ApiState<S>) -> Router<()> {
  Router::new()
    // Assessments
    .route("/assessments/{date}", get(assessments::get_one::<S>))
    .route("/assessments/{date}/factors", get(assessments::factors::<S>))
    // Factors
    .route("/factors/{entity_type}/{action_kind}", patch(factors::update::<S>))
    // Thresholds
    .route("/thresholds", get(thresholds::list::<S>))
    .route("/thresholds/reset", post(thresholds::reset::<S>))
    .route("/thresholds/{weight}", patch(thresholds::update::<S>))
    .with_state(Arc::new(state))
}
