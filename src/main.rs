//! wecsim command line entry

// Use jemalloc as global allocator
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

use clap::Parser;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wecsim::config::AgingCurve;
use wecsim::sim::Sweep;
use wecsim::trace::load_trace;
use wecsim::{PolicyKind, SimResult, WecConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "wecsim")]
#[command(about = "Trace-driven simulator for multi-tier cache policies")]
struct Args {
    /// Policy to simulate (wec|lru|lfu)
    #[arg(short = 'a', long, default_value = "wec")]
    algo: PolicyKind,

    /// Trace file with one `address,op` record per line
    #[arg(short = 'f', long)]
    trace: PathBuf,

    /// Backing-store capacities (in blocks) to sweep over
    #[arg(required = true)]
    capacities: Vec<usize>,

    /// JSON file with WEC tunables; flags below override its values
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Requests between two SSD reconfigurations
    #[arg(long)]
    update_period: Option<u64>,

    /// Quit threshold curve (linear|square-root|cube-root|quadratic|cubic)
    #[arg(long)]
    aging: Option<AgingCurve>,

    /// Share of the cache given to RAM
    #[arg(long)]
    ram_ratio: Option<f64>,

    /// Cache size relative to the backing store
    #[arg(long)]
    cache_ratio: Option<f64>,

    /// Fraction of candidates considered for SSD promotion per cycle
    #[arg(long)]
    threshold: Option<f64>,

    /// Initial admission window size, overriding the derived one
    #[arg(long)]
    window: Option<usize>,

    /// Directory receiving the report files
    #[arg(short = 'o', long, default_value = "output")]
    out_dir: PathBuf,

    /// Also write the reports as a JSON array
    #[arg(long)]
    json: bool,

    /// Run the capacities on separate threads
    #[arg(long)]
    parallel: bool,

    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn wec_config(&self) -> SimResult<WecConfig> {
        let mut config = match &self.config {
            Some(path) => WecConfig::from_json_file(path)?,
            None => WecConfig::default(),
        };
        if let Some(period) = self.update_period {
            config.update_period = period;
        }
        if let Some(aging) = self.aging {
            config.aging = aging;
        }
        if let Some(ratio) = self.ram_ratio {
            config.ram_ratio = ratio;
        }
        if let Some(ratio) = self.cache_ratio {
            config.cache_ratio = ratio;
        }
        if let Some(threshold) = self.threshold {
            config.promotion_threshold = threshold;
        }
        if self.window.is_some() {
            config.window_size = self.window;
        }
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn output_path(out_dir: &Path, algo: PolicyKind, trace: &Path, extension: &str) -> PathBuf {
    let stem = trace
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    let timestamp = chrono::Utc::now().timestamp();
    out_dir
        .join(algo.to_string())
        .join(format!("{}_{}_{}.{}", algo, stem, timestamp, extension))
}

fn run(args: &Args) -> SimResult<PathBuf> {
    let config = args.wec_config()?;
    let sweep = Sweep::new(args.algo, config, args.capacities.clone()).with_parallel(args.parallel);
    sweep.validate()?;

    let trace = load_trace(&args.trace)?;
    let outputs = sweep.run(&trace)?;

    let out_path = output_path(&args.out_dir, args.algo, &args.trace, "txt");
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(&out_path)?);
    for output in &outputs {
        out.write_all(&output.rendered)?;
    }
    out.flush()?;

    if args.json {
        let json_path = out_path.with_extension("json");
        let reports: Vec<_> = outputs.iter().map(|o| &o.report).collect();
        let file = BufWriter::new(File::create(&json_path)?);
        serde_json::to_writer_pretty(file, &reports)?;
        tracing::info!(path = %json_path.display(), "wrote JSON reports");
    }

    for output in &outputs {
        println!("{}", output.report.summary_line());
    }
    Ok(out_path)
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(out_path) => {
            println!("{}", args.algo);
            println!("{}", out_path.display());
            println!("Done");
        }
        Err(err) => {
            tracing::error!(%err, "run failed");
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}
