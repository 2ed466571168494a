//! watchlist-ranker: rank a watch-list by momentum, volatility and news sentiment.
//!
//! Reads the ticker list and the cached `<TICKER>_prices.csv` /
//! `<TICKER>_headlines.json` files, then prints the top of the ranked table.
//!
//! Usage:
//!   watchlist-ranker
//!   watchlist-ranker --tickers tickers.txt --data-dir data --top 10
//!   watchlist-ranker --inspect AAPL
//!   watchlist-ranker --json --sequential

mod report;

use analysis_core::AnalysisError;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use watchlist_pipeline::{loader, PipelineConfig, SignalPipeline};

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    tickers_file: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    top_n: Option<usize>,
    inspect: Option<String>,
    json: bool,
    sequential: bool,
    help: bool,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = || {
                iter.next()
                    .cloned()
                    .with_context(|| format!("{} requires a value", arg))
            };

            match arg.as_str() {
                "--tickers" => parsed.tickers_file = Some(PathBuf::from(value()?)),
                "--data-dir" => parsed.data_dir = Some(PathBuf::from(value()?)),
                "--top" => {
                    let raw = value()?;
                    parsed.top_n = Some(
                        raw.parse()
                            .with_context(|| format!("--top expects a number, got {:?}", raw))?,
                    );
                }
                "--inspect" => parsed.inspect = Some(value()?.to_uppercase()),
                "--json" => parsed.json = true,
                "--sequential" => parsed.sequential = true,
                "--help" | "-h" => parsed.help = true,
                other => bail!("unknown argument: {}", other),
            }
        }

        Ok(parsed)
    }

    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(path) = &self.tickers_file {
            config.tickers_file = path.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if self.sequential {
            config.parallel = false;
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  watchlist-ranker [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tickers FILE     Ticker list, one per line (env WATCHLIST_TICKERS_FILE, default tickers.txt)");
    eprintln!("  --data-dir DIR     Cached prices/headlines (env WATCHLIST_DATA_DIR, default data)");
    eprintln!("  --top N            Rows to show, 1-20 (env WATCHLIST_TOP_N, default 7)");
    eprintln!("  --inspect TICKER   Show features and headlines for one ticker");
    eprintln!("  --json             Emit the ranked table as JSON");
    eprintln!("  --sequential       Disable parallel feature extraction");
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchlist_cli=info,watchlist_pipeline=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = CliArgs::parse(&args)?;
    if cli.help {
        print_usage();
        return Ok(());
    }

    let mut config = PipelineConfig::from_env()?;
    cli.apply(&mut config);

    let tickers = loader::read_tickers(&config.tickers_file)
        .context("Create a tickers file with one TICKER per line")?;
    if tickers.is_empty() {
        bail!("{:?} lists no tickers", config.tickers_file);
    }
    tracing::info!(
        "Ranking {} tickers from {:?} (parallel={})",
        tickers.len(),
        config.data_dir,
        config.parallel
    );

    let data = loader::load_watchlist(&config.data_dir, &tickers);
    let pipeline = SignalPipeline::new().parallel(config.parallel);
    let records = pipeline.build_records(&data);

    let table = match pipeline.rank(&records) {
        Ok(table) => table,
        Err(AnalysisError::EmptyRanking) => {
            tracing::warn!("No data loaded. Check {:?} for cached prices.", config.data_dir);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let top_n = config.effective_top_n(tickers.len());
    let shown = table.top(top_n);

    if cli.json {
        let report = report::JsonReport {
            ranked: table.len(),
            rows: shown,
            stats: table.stats(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Top {} ranked tickers", shown.len());
        print!("{}", report::render_table(shown));
    }

    if let Some(symbol) = &cli.inspect {
        match (table.get(symbol), table.position(symbol)) {
            (Some(row), Some(rank)) => {
                println!();
                print!("{}", report::render_inspection(row, rank));
            }
            _ => tracing::warn!("{} is not in the ranked table", symbol),
        }
    }

    Ok(())
}
