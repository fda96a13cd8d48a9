//! SQLite backend for the workload assessment engine.
//!
//! One [`SqliteStore`] implements both ports: it persists factor settings and
//! the threshold table ([`AssessmentStore`](workload_core::store::AssessmentStore))
//! and counts logged activity ([`FactorSource`](workload_core::source::FactorSource)).
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{Activity, NewActivity, SqliteStore};
