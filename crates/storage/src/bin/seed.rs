use std::fmt;

use chrono::{DateTime, Duration, Utc};
use portal_core::model::{
    ProtocolId, ProtocolRecord, SessionResult, sample_work_at_height_test,
};
use storage::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    protocols: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidProtocols { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidProtocols { raw } => {
                write!(f, "invalid --protocols value: {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("PORTAL_DB_URL").unwrap_or_else(|_| "sqlite:portal.sqlite3".into());
        let mut protocols = std::env::var("PORTAL_SEED_PROTOCOLS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(3);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--protocols" => {
                    let value = require_value(&mut args, "--protocols")?;
                    protocols = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidProtocols { raw: value })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    now = Some(
                        DateTime::parse_from_rfc3339(&value)
                            .map(|dt| dt.with_timezone(&Utc))
                            .map_err(|_| ArgsError::InvalidNow { raw: value })?,
                    );
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => return Err(ArgsError::UnknownArg(other.to_owned())),
            }
        }

        Ok(Self {
            db_url,
            protocols,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:portal.sqlite3)");
    eprintln!("  --protocols <n>           Number of demo protocols to append (default: 3)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  PORTAL_DB_URL, PORTAL_SEED_PROTOCOLS");
}

const DEMO_LISTENERS: &[(&str, &str)] = &[
    ("Иванов Иван Иванович", "Электрик"),
    ("Петров Пётр Петрович", "Сварщик"),
    ("Сидорова Анна Викторовна", "Оператор станка"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let now = args.now.unwrap_or_else(Utc::now);

    let storage = Storage::sqlite(&args.db_url).await?;

    let test = sample_work_at_height_test();
    storage.tests.save(&test).await?;
    tracing::info!(test = %test.id, "seeded test catalog");

    for i in 0..args.protocols {
        let (name, position) = DEMO_LISTENERS[i as usize % DEMO_LISTENERS.len()];
        // Alternate between passing and failing results.
        let correct = if i % 2 == 0 { 3 } else { 1 };
        let record = ProtocolRecord::from_result(
            ProtocolId::generate(),
            format!("№ {}", i + 1),
            test.id.clone(),
            test.title.clone(),
            Some(name.to_owned()),
            Some(position.to_owned()),
            SessionResult { correct, total: 3 },
            now - Duration::days(i64::from(i)),
        );
        storage.protocols.append(&record).await?;
    }
    tracing::info!(count = args.protocols, "seeded protocol registry");

    Ok(())
}
