use std::{fs, path::PathBuf, process::exit};

use clap::{Parser, ValueEnum};

use dashboard_metrics::{
    AnalyticsConfig, DashboardReport, DashboardResponse, Dimension, Error, Period, ReportRequest,
    build_report,
    format::{CurrencyFormatter, format_percent},
    logging::setup_logging,
    month::{parse_date, parse_year_month},
    timezone::today_in,
};

/// Computes the comparative dashboard views for one dimension of a dashboard
/// payload.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the dashboard payload as JSON.
    #[arg(long)]
    input: PathBuf,

    /// The dimension the payload breaks spending down by.
    #[arg(short, long, default_value_t = Dimension::Category)]
    dimension: Dimension,

    /// Report on a single month, e.g. "2024-03". Defaults to the whole series.
    #[arg(short, long)]
    month: Option<String>,

    /// The date to treat as today, e.g. "2024-03-15". Defaults to today in
    /// the configured timezone.
    #[arg(long)]
    reference_date: Option<String>,

    /// File path to a JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// The canonical timezone used to work out today's date.
    #[arg(long)]
    timezone: Option<String>,

    /// How many entities to select by default.
    #[arg(long)]
    top_n: Option<usize>,

    /// Entity IDs currently selected for comparison. May be repeated.
    #[arg(long = "select")]
    selection: Vec<String>,

    /// The selection was made by the user, so no default is applied.
    #[arg(long)]
    user_selected: bool,

    /// Fold table rows beyond this many into an "Others" row.
    #[arg(long)]
    max_table_entities: Option<usize>,

    /// How to print the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// The log level used when `RUST_LOG` is not set.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(error) => {
            setup_logging("info");
            tracing::error!("Could not load the settings: {error}");
            exit(1);
        }
    };

    setup_logging(&config.log_level);

    if let Err(error) = run(&args, &config) {
        tracing::error!("{error}");
        exit(1);
    }
}

fn load_config(args: &Args) -> Result<AnalyticsConfig, Error> {
    let mut config = match &args.config {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };

    if let Some(timezone) = &args.timezone {
        config.timezone = timezone.clone();
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if let Some(max_table_entities) = args.max_table_entities {
        config.max_table_entities = Some(max_table_entities);
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone();
    }

    Ok(config)
}

fn run(args: &Args, config: &AnalyticsConfig) -> Result<(), Error> {
    let json = fs::read_to_string(&args.input).map_err(|error| Error::Io {
        path: args.input.display().to_string(),
        reason: error.to_string(),
    })?;
    let response = DashboardResponse::from_json(&json)?;

    let period = match &args.month {
        Some(text) => {
            let (year, month) = parse_year_month(text)?;
            Period::Month { year, month }
        }
        None => Period::Annual,
    };

    let reference_date = match &args.reference_date {
        Some(text) => parse_date(text)?,
        None => today_in(&config.timezone)?,
    };

    let request = ReportRequest {
        dimension: args.dimension,
        period,
        reference_date,
        selection: args.selection.clone(),
        user_has_selected: args.user_selected,
    };

    tracing::info!(
        "Analyzing {} months by {} as of {reference_date}",
        response.months.len(),
        args.dimension
    );

    let report = build_report(&response, &request, config)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report, &CurrencyFormatter::new(&config.currency_symbol)?),
    }

    Ok(())
}

fn print_text(report: &DashboardReport, formatter: &CurrencyFormatter) {
    println!("{} by {}", report.period_label, report.dimension);
    println!();
    println!("Revenue      {}", formatter.format(report.summary.revenue));
    println!("Expenses     {}", formatter.format(report.summary.expenses));
    println!("Investments  {}", formatter.format(report.summary.investments));
    println!("Balance      {}", formatter.format(report.summary.balance));

    if !report.reconciled {
        println!("(the monthly totals do not add up to the payload's summary)");
    }

    println!();
    for item in &report.table {
        println!(
            "{:<24} {:>14} {:>5}  {:?}",
            item.name,
            formatter.format(item.value),
            format_percent(item.percent),
            item.status
        );
    }

    if report.evolution.is_empty() {
        return;
    }

    println!();
    println!("{:<24} {}", "", report.months.join(" "));
    for entity in &report.evolution {
        let values: Vec<String> = entity
            .values
            .iter()
            .map(|value| formatter.format(*value))
            .collect();
        println!("{:<24} {}", entity.name, values.join(" "));
    }
}
