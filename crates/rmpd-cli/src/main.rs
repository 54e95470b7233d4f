use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rmpd_acquire::fetch::PORTAL_URL;
use rmpd_acquire::{output, DumpPaths, Fetcher};
use rmpd_model::{LookupRequest, LookupResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Optional env file consulted before argument resolution.
const ENV_FILE: &str = ".env";

#[derive(Parser)]
#[command(name = "rmpd")]
#[command(about = "Look up the monitoring status of an RMPD shipment on the PUESC portal")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// RMPD document number
    rmpd: Option<String>,

    /// Truck registration number
    truck: Option<String>,

    /// GeoLocator number
    locator: Option<String>,

    /// Save the raw HTML page and the result JSON
    #[arg(long)]
    dump: bool,

    /// Directory for dumped files
    #[arg(short = 'O', long, default_value = ".")]
    output_dir: PathBuf,

    /// Portal form URL (e.g., the test portal)
    #[arg(long, env = "RMPD_ENDPOINT", default_value = PORTAL_URL)]
    endpoint: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Parse a previously saved page instead of querying the portal
    #[arg(long, value_name = "FILE")]
    input_html: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// What to look up, after merging arguments and environment.
#[derive(Debug, PartialEq, Eq)]
struct Resolved {
    request: LookupRequest,
    dump: bool,
}

/// Take identifiers from the positionals when all three are given,
/// otherwise from `RMPD`, `TRUCK` and `LOCATOR` in the environment.
fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Option<Resolved> {
    if let Some(request) =
        LookupRequest::from_parts(cli.rmpd.clone(), cli.truck.clone(), cli.locator.clone())
    {
        return Some(Resolved {
            request,
            dump: cli.dump,
        });
    }

    tracing::info!("Missing CLI args; falling back to environment variables");
    let request = LookupRequest::from_parts(env("RMPD"), env("TRUCK"), env("LOCATOR"))?;
    let dump = cli.dump || env("DUMP_FILE").is_some_and(|v| is_truthy(&v));
    tracing::info!(
        rmpd = %request.document_number,
        truck = %request.truck_number,
        locator = %request.geolocator_number,
        "Request data from environment"
    );
    Some(Resolved { request, dump })
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !matches!(value.to_ascii_lowercase().as_str(), "0" | "false" | "no")
}

fn init_tracing(cli: &Cli) {
    // Suppress noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z".to_string();

    // stdout carries the result JSON
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if cli.utc {
        builder
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format))
            .init();
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format))
            .init();
    }
}

/// Re-parse a saved page; dumps only the result JSON.
fn run_offline(path: &Path, dump: Option<&DumpPaths>) -> Result<LookupResult> {
    tracing::info!(path = %path.display(), "Parsing saved page");
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let result = rmpd_parse::parse(&html)?;
    if let Some(paths) = dump {
        output::write_json(&paths.json, &result)
            .with_context(|| format!("Failed to write {}", paths.json.display()))?;
    }
    Ok(result)
}

async fn run_online(cli: &Cli, resolved: &Resolved, dump: Option<&DumpPaths>) -> Result<LookupResult> {
    let fetcher = Fetcher::builder()
        .endpoint(cli.endpoint.as_str())
        .timeout(Duration::from_secs(cli.timeout))
        .build()?;
    Ok(rmpd_acquire::lookup(&fetcher, &resolved.request, dump).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Existing environment variables take precedence over the file
    let env_file = dotenvy::from_filename(ENV_FILE).ok();

    let cli = Cli::parse();
    init_tracing(&cli);
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "Loaded env file");
    }

    let result = match &cli.input_html {
        Some(path) => {
            let dump = cli.dump.then(|| DumpPaths::in_dir(&cli.output_dir));
            run_offline(path, dump.as_ref())
        }
        None => {
            let Some(resolved) = resolve(&cli, |key| std::env::var(key).ok()) else {
                Cli::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        "Missing required values from both CLI and environment.",
                    )
                    .exit();
            };
            let dump = resolved.dump.then(|| DumpPaths::in_dir(&cli.output_dir));
            run_online(&cli, &resolved, dump.as_ref()).await
        }
    };

    match result {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("{e:#}");
            Cli::command().error(ErrorKind::ValueValidation, format!("{e:#}")).exit()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rmpd").chain(args.iter().copied())).unwrap()
    }

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positionals_win() {
        let resolved = resolve(
            &cli(&["RMPD1", "WX1", "GEO1", "--dump"]),
            env_of(&[("RMPD", "ENV"), ("TRUCK", "ENV"), ("LOCATOR", "ENV")]),
        )
        .unwrap();
        assert_eq!(resolved.request, LookupRequest::new("RMPD1", "WX1", "GEO1"));
        assert!(resolved.dump);
    }

    #[test]
    fn test_incomplete_positionals_fall_back_to_env() {
        let resolved = resolve(
            &cli(&["RMPD1"]),
            env_of(&[
                ("RMPD", "RMPD2"),
                ("TRUCK", "WX2"),
                ("LOCATOR", "GEO2"),
                ("DUMP_FILE", "1"),
            ]),
        )
        .unwrap();
        assert_eq!(resolved.request, LookupRequest::new("RMPD2", "WX2", "GEO2"));
        assert!(resolved.dump);
    }

    #[test]
    fn test_nothing_resolves() {
        assert_eq!(resolve(&cli(&[]), env_of(&[("RMPD", "RMPD2")])), None);
    }

    #[test]
    fn test_defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.timeout, 30);
        assert!(!cli.dump);
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("rmpd.html"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("0"));
    }

    #[test]
    fn test_offline_reparse_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("saved.html");
        std::fs::write(
            &page,
            r#"<div class="rmpd-xslt"><span data-phrase-id="rmpdNumber">RMPD5</span></div>"#,
        )
        .unwrap();
        let dump = DumpPaths::in_dir(dir.path());

        let first = run_offline(&page, Some(&dump)).unwrap();
        let first_json = std::fs::read_to_string(&dump.json).unwrap();
        let second = run_offline(&page, Some(&dump)).unwrap();
        let second_json = std::fs::read_to_string(&dump.json).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_json, second_json);
        assert_eq!(first.report.unwrap().number.as_deref(), Some("RMPD5"));
    }
}
