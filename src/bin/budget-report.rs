use std::{fs::OpenOptions, path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use time::{Date, OffsetDateTime, macros::format_description};
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use household_budget::{
    Error, IntakePolicy, ReportConfig,
    aggregation::{compute_totals, group_by_month},
    config::{DEFAULT_RECENT_LIMIT, DEFAULT_TITLE},
    export::export_monthly_csv,
    intake::read_operations,
    report::write_report,
    timezone::local_date,
};

/// Render a household budget's operations as an HTML report.
///
/// The input is the JSON list returned by the budget service's operations
/// endpoint.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the operations JSON.
    #[arg(short, long)]
    input: PathBuf,

    /// File path to write the HTML report to.
    #[arg(short, long, default_value = "report.html")]
    output: PathBuf,

    /// Also write the monthly income and expense totals to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// The date to treat as today (YYYY-MM-DD). Defaults to today in `--timezone`.
    #[arg(long, value_parser = parse_date)]
    today: Option<Date>,

    /// The household's timezone as a canonical name, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// The title of the report.
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// How many of the most recent operations to list.
    #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
    recent: usize,

    /// Fail if any operation is malformed instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// Append debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_date(text: &str) -> Result<Date, String> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|error| format!("expected a date like 2024-03-15: {error}"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(args.log_file.as_ref()) {
        print_error(format!("Could not open the log file: {error}"));
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let today = match args.today {
        Some(today) => today,
        None => local_date(&args.timezone, OffsetDateTime::now_utc())?,
    };

    let policy = if args.strict {
        IntakePolicy::RejectMalformed
    } else {
        IntakePolicy::SkipMalformed
    };

    tracing::info!("Reading operations from {}", args.input.display());
    let intake = read_operations(&args.input, policy)?;

    if !intake.skipped.is_empty() {
        tracing::warn!(
            "Skipped {} malformed operation(s), rerun with --strict to fail instead",
            intake.skipped.len()
        );
    }

    let totals = compute_totals(&intake.operations);
    tracing::info!(
        "{} operations: income {}, expenses {}, balance {}",
        intake.operations.len(),
        totals.income,
        totals.expenses,
        totals.balance
    );

    let config = ReportConfig::new(today)
        .title(&args.title)
        .recent_limit(args.recent);
    write_report(&args.output, &intake.operations, &config)?;

    if let Some(csv_path) = &args.csv {
        export_monthly_csv(csv_path, &group_by_month(&intake.operations))?;
    }

    Ok(())
}

fn setup_logging(log_file: Option<&PathBuf>) -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
