use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use wbi_climate::config::{ClientConfig, DEFAULT_BASE_URL};
use wbi_climate::models::{QueryRequest, YearRange};
use wbi_climate::{Client, FetchCache, Pipeline, PipelineError, SeriesFetcher};
use wbi_climate::{catalog, filter, stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "wbi-climate",
    version,
    about = "Compare World Bank climate indicators across countries"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one indicator for several countries (and optionally save and print stats).
    Get(GetArgs),
    /// List the built-in countries and indicators.
    List,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct GetArgs {
    /// Country names or codes separated by comma or semicolon (e.g., Kenya,World or KEN;WLD).
    /// Defaults to World and Kenya.
    #[arg(short, long)]
    countries: Option<String>,
    /// Indicator code or catalog name (e.g., EN.ATM.CO2E.PC)
    #[arg(short, long)]
    indicator: String,
    /// First year to keep (defaults to the earliest year with data).
    #[arg(long)]
    from: Option<i32>,
    /// Last year to keep (defaults to the latest year with data).
    #[arg(long)]
    to: Option<i32>,
    /// Save the filtered rows to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print per-country summary statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// API base URL.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Total request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Get(args) => cmd_get(args),
        Command::List => {
            cmd_list();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_list() {
    println!("Countries:");
    for (name, code) in catalog::COUNTRIES {
        println!("  {code:<4} {name}");
    }
    println!("Indicators:");
    for (name, code) in catalog::INDICATORS {
        println!("  {code:<20} {name}");
    }
}

fn cmd_get(args: GetArgs) -> Result<ExitCode> {
    let countries: Vec<_> = match args.countries.as_deref() {
        Some(list) => parse_list(list)
            .iter()
            .map(|c| catalog::resolve_country(c))
            .collect(),
        None => catalog::default_countries(),
    };
    if countries.is_empty() {
        anyhow::bail!("Please select at least one country.");
    }
    let indicator = catalog::resolve_indicator(&args.indicator);
    let label = catalog::indicator_name(&indicator)
        .map(str::to_string)
        .unwrap_or_else(|| indicator.clone());

    let cfg = ClientConfig::default()
        .with_base_url(args.base_url)
        .with_timeout(Duration::from_secs(args.timeout));
    let client = Client::with_config(&cfg)?;
    let mut pipeline = Pipeline::new(FetchCache::new(SeriesFetcher::new(client)));

    let req = QueryRequest {
        countries,
        indicator,
        year_range: None,
    };
    let mut result = match pipeline.run(&req) {
        Ok(r) => r,
        Err(e @ PipelineError::NoUsableData { .. }) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    for d in &result.diagnostics {
        eprintln!("{d} ({label})");
    }

    // Either bound may be given alone; the other comes from the data.
    if args.from.is_some() || args.to.is_some() {
        let range = YearRange::new(
            args.from.unwrap_or(result.range.start),
            args.to.unwrap_or(result.range.end),
        );
        result.data = filter::filter(&result.data, range.start, range.end);
        result.summary = stats::summarize(&result.data);
        result.range = range;
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&result.data, path)?,
            "json" => storage::save_json(&result.data, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", result.data.len(), path.display());
    }

    println!(
        "{label}: {} rows, {}..={}",
        result.data.len(),
        result.range.start,
        result.range.end
    );

    if args.stats {
        for s in &result.summary {
            println!(
                "{}  count={} mean={} std={} min={} 25%={} 50%={} 75%={} max={}",
                s.country,
                s.count,
                fmt_opt(Some(s.mean)),
                fmt_opt(s.std),
                fmt_opt(Some(s.min)),
                fmt_opt(Some(s.q25)),
                fmt_opt(Some(s.median)),
                fmt_opt(Some(s.q75)),
                fmt_opt(Some(s.max))
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
