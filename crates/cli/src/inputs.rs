//! Shared input flags: the three exports, the planning date, the RNG seed
//! and the engine config, loaded into one reconciled [`Session`].

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use fieldplan_engine::geo::Geocoder;
use fieldplan_engine::normalize::NormalizeContext;
use fieldplan_engine::{normalize, EngineConfig, RecordKind, Records, Session};

use crate::exit_codes::EXIT_INPUT;
use crate::CliError;

const CONFIG_DIR: &str = "fieldplan";
const CONFIG_FILE: &str = "config.toml";

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Deployed account list CSV/TSV
    #[arg(long)]
    pub accounts: Option<PathBuf>,

    /// Prospect list CSV/TSV
    #[arg(long)]
    pub prospects: PathBuf,

    /// Outreach log CSV/TSV
    #[arg(long)]
    pub outreach: Option<PathBuf>,

    /// Plan as of this date (YYYY-MM-DD, default: today)
    #[arg(long, value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    /// Seed for generated ids and map jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Engine config TOML (default: <config dir>/fieldplan/config.toml if present)
    #[arg(long, env = "FIELDPLAN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Everything a command needs after loading the inputs.
pub struct Loaded {
    pub session: Session,
    pub config: EngineConfig,
    pub today: NaiveDate,
}

/// clap value parser for `--today`.
pub fn parse_today(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM-DD, got '{value}'"))
}

pub fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// `--config` if given, else the per-user config file if it exists, else defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<EngineConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => path,
            None => {
                log::debug!("no config file; using built-in defaults");
                return Ok(EngineConfig::default());
            }
        },
    };
    load_config(&path)
}

pub fn load_config(path: &Path) -> Result<EngineConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_INPUT, format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = EngineConfig::from_toml(&text).map_err(|e| {
        CliError::from(e).with_hint(format!("check {}", path.display()))
    })?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Read, normalize and reconcile the inputs.
///
/// Accounts are imported first so prospects normalize against them; the
/// outreach import then triggers reconciliation.
pub fn load(args: &InputArgs) -> Result<Loaded, CliError> {
    let config = resolve_config(args.config.as_deref())?;
    let today = resolve_today(args.today);
    let geocoder = Geocoder::new(&config.geo);
    let mut rng = rng_from_seed(args.seed);

    let mut session = Session::new();

    if let Some(path) = &args.accounts {
        let rows = fieldplan_io::read_rows(path)?;
        let ctx = NormalizeContext { today, accounts: &[], geocoder: &geocoder };
        if let Records::Accounts(accounts) = normalize(RecordKind::Accounts, &rows, &ctx, &mut rng) {
            session = session.import_accounts(accounts);
        }
    }

    let rows = fieldplan_io::read_rows(&args.prospects)?;
    let ctx = NormalizeContext { today, accounts: session.accounts(), geocoder: &geocoder };
    let prospects = normalize(RecordKind::Prospects, &rows, &ctx, &mut rng);
    let outreach = match &args.outreach {
        Some(path) => {
            let rows = fieldplan_io::read_rows(path)?;
            Some(normalize(RecordKind::Outreach, &rows, &ctx, &mut rng))
        }
        None => None,
    };

    if let Records::Prospects(prospects) = prospects {
        if prospects.is_empty() {
            return Err(CliError::new(
                EXIT_INPUT,
                format!("no prospects with a company name in {}", args.prospects.display()),
            )
            .with_hint("the prospect file needs a 'Company Name' or 'Company' column"));
        }
        session = session.import_prospects(prospects);
    }
    if let Some(Records::Outreach(logs)) = outreach {
        session = session.import_outreach(logs);
    }

    if let Some(notice) = unreconciled_logs_notice(&session) {
        log::warn!("{notice}");
    }
    log::info!(
        "loaded {} accounts, {} prospects, {} outreach logs",
        session.accounts().len(),
        session.prospects().len(),
        session.logs().len()
    );
    Ok(Loaded { session, config, today })
}

/// Reconciliation only runs once accounts are loaded; say so when outreach
/// logs would otherwise be silently ignored.
fn unreconciled_logs_notice(session: &Session) -> Option<String> {
    (session.accounts().is_empty() && !session.logs().is_empty()).then(|| {
        format!(
            "no accounts loaded; {} outreach logs were not applied to prospect status or contact dates (pass --accounts)",
            session.logs().len()
        )
    })
}
