//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar days are `YYYY-MM-DD`, UUIDs are
//! hyphenated lowercase strings and enums use their snake_case identifiers.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use workload_core::{
  factor::Factor,
  taxonomy::{ActionKind, EntityType, FactorKey},
  threshold::ThresholdEntry,
  weight::{ActivityWeight, Colour},
};

use crate::{Error, Result, store::Activity};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_entity_type(s: &str) -> Result<EntityType> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "entity_type",
    value:  s.to_owned(),
  })
}

pub fn decode_action_kind(s: &str) -> Result<ActionKind> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "action_kind",
    value:  s.to_owned(),
  })
}

pub fn decode_weight(s: &str) -> Result<ActivityWeight> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "weight",
    value:  s.to_owned(),
  })
}

// ─── Integers ────────────────────────────────────────────────────────────────

pub fn decode_u32(column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `factors` row.
pub struct RawFactor {
  pub factor_id:   String,
  pub entity_type: String,
  pub action_kind: String,
  pub weight:      i64,
  pub threshold:   i64,
  pub alive:       bool,
}

impl RawFactor {
  pub fn into_factor(self) -> Result<Factor> {
    let key = FactorKey::new(
      decode_entity_type(&self.entity_type)?,
      decode_action_kind(&self.action_kind)?,
    );
    Ok(Factor::restore(
      decode_uuid(&self.factor_id)?,
      key,
      decode_u32("weight", self.weight)?,
      decode_u32("threshold", self.threshold)?,
      self.alive,
    ))
  }
}

/// Raw values read directly from a `thresholds` row.
pub struct RawThreshold {
  pub weight:        String,
  pub value:         i64,
  pub default_value: i64,
  pub colour:        String,
}

impl RawThreshold {
  pub fn into_entry(self) -> Result<ThresholdEntry> {
    let colour: Colour = self.colour.parse()?;
    Ok(ThresholdEntry {
      weight: decode_weight(&self.weight)?,
      value: decode_u32("value", self.value)?,
      default_value: decode_u32("default_value", self.default_value)?,
      colour,
    })
  }
}

/// Raw strings read directly from an `activity` row.
pub struct RawActivity {
  pub activity_id: String,
  pub entity_type: String,
  pub action_kind: String,
  pub entity_id:   String,
  pub occurred_at: String,
  pub occurred_on: String,
}

impl RawActivity {
  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      activity_id: decode_uuid(&self.activity_id)?,
      key:         FactorKey::new(
        decode_entity_type(&self.entity_type)?,
        decode_action_kind(&self.action_kind)?,
      ),
      entity_id:   decode_uuid(&self.entity_id)?,
      occurred_at: decode_dt(&self.occurred_at)?,
      occurred_on: decode_date(&self.occurred_on)?,
    })
  }
}
