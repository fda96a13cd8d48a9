//! `workload` — assess how busy a day was from logged activity.
//!
//! # Usage
//!
//! ```
//! workload log jobs create
//! workload assess --date 2026-02-09
//! workload factor weight jobs create 2
//! workload serve
//! ```

mod render;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use workload_api::{ApiState, api_router};
use workload_core::{
  assessment::Assessment,
  taxonomy::{ActionKind, EntityType, FactorKey},
  threshold::ThresholdTable,
  weight::{ActivityWeight, Colour, parse_weight},
};
use workload_store_sqlite::{NewActivity, SqliteStore};

use settings::AppConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "workload", version, about = "Daily workload assessment")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "workload.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Score and classify one day.
  Assess {
    /// Day to assess (default: today).
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the full snapshot as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Record one activity event.
  Log {
    entity: EntityType,
    action: ActionKind,

    /// The record, job, task, etc. acted on (default: a fresh id).
    #[arg(long)]
    entity_id: Option<Uuid>,

    /// Day to count the event against (default: today).
    #[arg(long)]
    date: Option<NaiveDate>,
  },

  /// Change one factor's settings.
  #[command(subcommand)]
  Factor(FactorCommand),

  /// Inspect or edit the threshold table.
  #[command(subcommand)]
  Thresholds(ThresholdCommand),

  /// Serve the JSON API.
  Serve,
}

#[derive(Subcommand, Debug)]
enum FactorCommand {
  /// Multiplier applied to the factor's count.
  Weight { entity: EntityType, action: ActionKind, value: u32 },
  /// Count at which the factor becomes active.
  Threshold { entity: EntityType, action: ActionKind, value: u32 },
  /// Switch the factor on or off.
  Toggle { entity: EntityType, action: ActionKind },
}

#[derive(Subcommand, Debug)]
enum ThresholdCommand {
  List,
  SetValue {
    #[arg(value_parser = parse_weight)]
    weight: ActivityWeight,
    value:  u32,
  },
  SetColour {
    #[arg(value_parser = parse_weight)]
    weight: ActivityWeight,
    colour: Colour,
  },
  /// Restore every default breakpoint and colour.
  Reset,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command {
    Command::Assess { date, json } => assess(&store, &cfg, date.unwrap_or_else(today), json).await,
    Command::Log { entity, action, entity_id, date } => {
      let input = NewActivity::on(
        entity,
        action,
        entity_id.unwrap_or_else(Uuid::new_v4),
        date.unwrap_or_else(today),
      );
      let activity = store
        .record_activity(input)
        .await
        .context("failed to record activity")?;
      println!(
        "logged {} for {} on {}",
        activity.key, activity.entity_id, activity.occurred_on
      );
      Ok(())
    }
    Command::Factor(cmd) => factor(&store, &cfg, cmd).await,
    Command::Thresholds(cmd) => thresholds(&store, cmd).await,
    Command::Serve => serve(store, cfg).await,
  }
}

fn today() -> NaiveDate { Local::now().date_naive() }

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn assess(
  store: &SqliteStore,
  cfg: &AppConfig,
  date: NaiveDate,
  json: bool,
) -> anyhow::Result<()> {
  let assessment = Assessment::run(store, store, &cfg.assessment, date)
    .await
    .with_context(|| format!("failed to assess {date}"))?;
  let snap = assessment.snapshot();
  if json {
    println!("{}", serde_json::to_string_pretty(&snap)?);
  } else {
    print!("{}", render::assessment(&snap));
  }
  Ok(())
}

async fn factor(store: &SqliteStore, cfg: &AppConfig, cmd: FactorCommand) -> anyhow::Result<()> {
  let mut assessment = Assessment::run(store, store, &cfg.assessment, today()).await?;

  let key = match cmd {
    FactorCommand::Weight { entity, action, value } => {
      let key = FactorKey::new(entity, action);
      assessment.set_factor_weight(store, key, value).await?;
      key
    }
    FactorCommand::Threshold { entity, action, value } => {
      let key = FactorKey::new(entity, action);
      assessment.set_factor_threshold(store, key, value).await?;
      key
    }
    FactorCommand::Toggle { entity, action } => {
      let key = FactorKey::new(entity, action);
      assessment.toggle_factor(store, key).await?;
      key
    }
  };

  if let Some(f) = assessment.factors().get(key) {
    println!(
      "{key}: weight {} threshold {} {}",
      f.weight(),
      f.threshold(),
      if f.alive() { "on" } else { "off" }
    );
  }
  print!("{}", render::assessment(&assessment.snapshot()));
  Ok(())
}

async fn thresholds(store: &SqliteStore, cmd: ThresholdCommand) -> anyhow::Result<()> {
  let mut table = ThresholdTable::load(store)
    .await
    .context("failed to load thresholds")?;

  match cmd {
    ThresholdCommand::List => {}
    ThresholdCommand::SetValue { weight, value } => {
      table.set_value(store, weight, value).await?;
    }
    ThresholdCommand::SetColour { weight, colour } => {
      table.set_colour(store, weight, colour).await?;
    }
    ThresholdCommand::Reset => table.reset_to_default(store).await?,
  }

  print!("{}", render::thresholds(&table.all()));
  Ok(())
}

async fn serve(store: SqliteStore, cfg: AppConfig) -> anyhow::Result<()> {
  let address = cfg.address();
  let state = ApiState::new(Arc::new(store), cfg.assessment);
  let app = axum::Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http());

  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
