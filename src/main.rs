use anyhow::{bail, Context, Result};
use clap::Parser;
use remote_sigscan::config::{validate_config, ConfigLoader, DEFAULT_CONFIG_FILE};
use remote_sigscan::{
    enumerate_processes, find_processes_by_name, Address, MemoryRange, ProcessSession,
    ProcessTarget,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Find byte signatures or text in a running process's main module
#[derive(Debug, Parser)]
#[command(name = "remote-sigscan", version)]
struct Args {
    /// Process name or PID
    #[arg(required_unless_present = "list")]
    target: Option<String>,

    /// Hex pattern, `??` or `?` nibbles are wildcards (e.g. "48 8B ?? ?? 5C")
    #[arg(
        short,
        long,
        conflicts_with = "text",
        required_unless_present_any = ["text", "list"]
    )]
    pattern: Option<String>,

    /// Literal text, one byte per character
    #[arg(short, long)]
    text: Option<String>,

    /// Scan start address (defaults to the module base)
    #[arg(long)]
    start: Option<Address>,

    /// Scan end address, exclusive (defaults to the module end)
    #[arg(long)]
    end: Option<Address>,

    /// Bytes read per chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Matching worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// List running processes (filtered by TARGET as a name, if given) and exit
    #[arg(short, long, conflicts_with_all = ["pattern", "text"])]
    list: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::new(&args.config)
        .load_or_default()
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(chunk_size) = args.chunk_size {
        config.scanner.chunk_size = chunk_size;
    }
    if let Some(threads) = args.threads {
        config.scanner.max_threads = threads;
    }
    validate_config(&config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(false)
        .init();

    info!("remote-sigscan v{}", env!("CARGO_PKG_VERSION"));

    if args.list {
        let processes = match &args.target {
            Some(name) => find_processes_by_name(name)?,
            None => enumerate_processes()?,
        };
        if args.json {
            println!("{}", serde_json::to_string_pretty(&processes)?);
        } else {
            for process in &processes {
                println!("{:>8}  {}", process.pid, process.name);
            }
        }
        return Ok(());
    }

    let Some(target) = args.target.as_deref() else {
        bail!("a process name or PID is required");
    };
    let target: ProcessTarget = target.parse()?;
    let session = ProcessSession::open(&target, config.scanner.clone())
        .with_context(|| format!("opening {}", target))?;

    let module = session.module();
    let range = MemoryRange::new(
        args.start.unwrap_or(module.base),
        args.end.unwrap_or(module.end),
    );
    info!(module = %module.name, %range, "scanning");

    let scanner = session.scanner();
    let chunk_size = session.config().chunk_size;

    match (&args.pattern, &args.text) {
        (Some(pattern), _) => {
            let report = scanner.find_pattern(pattern, range, chunk_size)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Found: {}", report.len());
                for address in report.iter() {
                    println!("{:X}", address);
                }
                if report.terminated_early {
                    eprintln!("note: a read returned no data before the range end");
                }
            }
        }
        (None, Some(text)) => {
            let found = scanner.find_text(text, range, chunk_size)?;
            if args.json {
                println!("{}", json!({ "text": text, "address": found }));
            } else {
                match found {
                    Some(address) => println!("{:X}", address),
                    None => println!("Not found"),
                }
            }
        }
        (None, None) => bail!("either --pattern or --text is required"),
    }

    Ok(())
}
