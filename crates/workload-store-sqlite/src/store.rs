//! [`SqliteStore`] — the SQLite implementation of [`AssessmentStore`] and
//! [`FactorSource`].

use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, Utc};
use uuid::Uuid;

use workload_core::{
  factor::Factor,
  source::{CountRule, CountingRules, FactorSource, SourceError},
  store::AssessmentStore,
  taxonomy::{ActionKind, EntityType, FactorKey},
  threshold::ThresholdEntry,
};

use crate::{
  Result,
  encode::{
    RawActivity, RawFactor, RawThreshold, decode_u32, encode_date, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Activity ────────────────────────────────────────────────────────────────

/// Input to [`SqliteStore::record_activity`].
#[derive(Debug, Clone)]
pub struct NewActivity {
  pub key:         FactorKey,
  /// The record, job, task, etc. that was acted on.
  pub entity_id:   Uuid,
  pub occurred_at: DateTime<Utc>,
  /// The calendar day the activity is counted against.
  pub occurred_on: NaiveDate,
}

impl NewActivity {
  /// Activity happening now, counted against today's local date.
  pub fn now(entity_type: EntityType, action_kind: ActionKind, entity_id: Uuid) -> Self {
    Self {
      key: FactorKey::new(entity_type, action_kind),
      entity_id,
      occurred_at: Utc::now(),
      occurred_on: Local::now().date_naive(),
    }
  }

  /// Activity counted against a specific day.
  pub fn on(
    entity_type: EntityType,
    action_kind: ActionKind,
    entity_id: Uuid,
    day: NaiveDate,
  ) -> Self {
    Self { occurred_on: day, ..Self::now(entity_type, action_kind, entity_id) }
  }
}

/// A persisted activity event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
  pub activity_id: Uuid,
  pub key:         FactorKey,
  pub entity_id:   Uuid,
  pub occurred_at: DateTime<Utc>,
  pub occurred_on: NaiveDate,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Factor settings, threshold table and activity log in one SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  rules:           CountingRules,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, rules: CountingRules::standard() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, rules: CountingRules::standard() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the counting rules used when acting as a [`FactorSource`].
  pub fn with_rules(mut self, rules: CountingRules) -> Self {
    self.rules = rules;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Activity log ──────────────────────────────────────────────────────────

  /// Append one event to the activity log.
  pub async fn record_activity(&self, input: NewActivity) -> Result<Activity> {
    let activity = Activity {
      activity_id: Uuid::new_v4(),
      key:         input.key,
      entity_id:   input.entity_id,
      occurred_at: input.occurred_at,
      occurred_on: input.occurred_on,
    };

    let id_str     = encode_uuid(activity.activity_id);
    let entity_str = activity.key.entity_type.as_str();
    let action_str = activity.key.action_kind.as_str();
    let target_str = encode_uuid(activity.entity_id);
    let at_str     = encode_dt(activity.occurred_at);
    let on_str     = encode_date(activity.occurred_on);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activity (
             activity_id, entity_type, action_kind, entity_id, occurred_at, occurred_on
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, entity_str, action_str, target_str, at_str, on_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(activity)
  }

  /// Every event counted against `day`, oldest first.
  pub async fn activity_on(&self, day: NaiveDate) -> Result<Vec<Activity>> {
    let on_str = encode_date(day);

    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT activity_id, entity_type, action_kind, entity_id, occurred_at, occurred_on
           FROM activity
           WHERE occurred_on = ?1
           ORDER BY occurred_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![on_str], |row| {
            Ok(RawActivity {
              activity_id: row.get(0)?,
              entity_type: row.get(1)?,
              action_kind: row.get(2)?,
              entity_id:   row.get(3)?,
              occurred_at: row.get(4)?,
              occurred_on: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_activity).collect()
  }

  async fn count_rule(&self, key: FactorKey, rule: CountRule, day: NaiveDate) -> Result<u32> {
    let (sql, action) = match rule {
      CountRule::Events(action) => (
        "SELECT COUNT(*) FROM activity
         WHERE entity_type = ?1 AND action_kind = ?2 AND occurred_on = ?3",
        action,
      ),
      CountRule::DistinctEntities(action) => (
        "SELECT COUNT(DISTINCT entity_id) FROM activity
         WHERE entity_type = ?1 AND action_kind = ?2 AND occurred_on = ?3",
        action,
      ),
    };
    let entity_str = key.entity_type.as_str();
    let action_str = action.as_str();
    let on_str     = encode_date(day);

    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          sql,
          rusqlite::params![entity_str, action_str, on_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    decode_u32("count", n)
  }
}

// ─── AssessmentStore impl ────────────────────────────────────────────────────

impl AssessmentStore for SqliteStore {
  type Error = crate::Error;

  // ── Factors ───────────────────────────────────────────────────────────────

  async fn load_factors(&self, universe: &[FactorKey]) -> Result<Vec<Factor>> {
    let raws: Vec<RawFactor> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT factor_id, entity_type, action_kind, weight, threshold, alive
           FROM factors",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawFactor {
              factor_id:   row.get(0)?,
              entity_type: row.get(1)?,
              action_kind: row.get(2)?,
              weight:      row.get(3)?,
              threshold:   row.get(4)?,
              alive:       row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let factors = raws
      .into_iter()
      .map(RawFactor::into_factor)
      .collect::<Result<Vec<_>>>()?;

    Ok(factors.into_iter().filter(|f| universe.contains(&f.key())).collect())
  }

  async fn save_factor(&self, factor: &Factor) -> Result<()> {
    let id_str     = encode_uuid(factor.id());
    let entity_str = factor.entity_type().as_str();
    let action_str = factor.action_kind().as_str();
    let weight     = i64::from(factor.weight());
    let threshold  = i64::from(factor.threshold());
    let alive      = factor.alive();
    let at_str     = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO factors (
             factor_id, entity_type, action_kind, weight, threshold, alive, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (entity_type, action_kind) DO UPDATE SET
             weight     = excluded.weight,
             threshold  = excluded.threshold,
             alive      = excluded.alive,
             updated_at = excluded.updated_at",
          rusqlite::params![id_str, entity_str, action_str, weight, threshold, alive, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Thresholds ────────────────────────────────────────────────────────────

  async fn load_thresholds(&self) -> Result<Vec<ThresholdEntry>> {
    let raws: Vec<RawThreshold> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT weight, value, default_value, colour FROM thresholds")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawThreshold {
              weight:        row.get(0)?,
              value:         row.get(1)?,
              default_value: row.get(2)?,
              colour:        row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawThreshold::into_entry).collect()
  }

  async fn save_threshold(&self, entry: &ThresholdEntry) -> Result<()> {
    let row = ThresholdRow::from(entry);

    self
      .conn
      .call(move |conn| {
        row.upsert(conn)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace_thresholds(&self, entries: &[ThresholdEntry]) -> Result<()> {
    let rows: Vec<ThresholdRow> = entries.iter().map(ThresholdRow::from).collect();

    // Dropping the transaction on any error rolls the DELETE back.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM thresholds", [])?;
        for row in &rows {
          row.upsert(&tx)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Owned column values for one `thresholds` row, ready to move into a
/// connection closure.
struct ThresholdRow {
  weight:        &'static str,
  value:         i64,
  default_value: i64,
  colour:        String,
}

impl From<&ThresholdEntry> for ThresholdRow {
  fn from(e: &ThresholdEntry) -> Self {
    Self {
      weight:        e.weight.as_str(),
      value:         i64::from(e.value),
      default_value: i64::from(e.default_value),
      colour:        e.colour.to_string(),
    }
  }
}

impl ThresholdRow {
  fn upsert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute(
      "INSERT INTO thresholds (weight, value, default_value, colour)
       VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT (weight) DO UPDATE SET
         value         = excluded.value,
         default_value = excluded.default_value,
         colour        = excluded.colour",
      rusqlite::params![self.weight, self.value, self.default_value, self.colour],
    )?;
    Ok(())
  }
}

// ─── FactorSource impl ───────────────────────────────────────────────────────

impl FactorSource for SqliteStore {
  type Error = crate::Error;

  async fn count(
    &self,
    key: FactorKey,
    date: NaiveDate,
  ) -> std::result::Result<u32, SourceError<crate::Error>> {
    let rule = self.rules.rule(key)?;
    self
      .count_rule(key, rule, date)
      .await
      .map_err(SourceError::Backend)
  }
}
