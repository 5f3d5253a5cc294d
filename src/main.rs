use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail, ensure};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use sixdeg::INDEX_MAX;
use sixdeg::ingest::Collection;
use sixdeg::search::separation;
use sixdeg::snapshot::Network;
use sixdeg::statistics::NetworkStats;

/// Input used when no -f is given.
const DEFAULT_INPUT: &str = "data/social_network.txt";

/// Snapshot written by --generate when no -c is given.
const DEFAULT_SNAPSHOT: &str = "data/social_network.bin";

/// Degree-of-separation search over a static social network
#[derive(Parser, Debug)]
#[command(name = "sixdeg")]
#[command(about = "Answers how many ties apart two members of a social network are", long_about = None)]
struct Args {
    /// Print the version and exit
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Input file: a .txt relationship list or a .bin snapshot
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Where --generate writes the snapshot
    #[arg(short = 'c', long = "compact-file")]
    compact_file: Option<PathBuf>,

    /// Build a snapshot from the .txt input; suppresses searches
    #[arg(short = 'g', long = "generate")]
    generate: bool,

    /// Print network shape statistics
    #[arg(short = 's', long = "stats")]
    stats: bool,

    /// Print the statistics report as JSON instead of one line
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Members to pair up and search, e.g. -l JOHN,IAN,0,41
    #[arg(short = 'l', long = "lookup", value_delimiter = ',')]
    lookup: Vec<String>,

    /// Print the default input and snapshot paths and exit
    #[arg(short = 'd', long = "default")]
    defaults: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // help and version exit 0, anything malformed exits 1 like file trouble
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(trouble) => {
            let code = if trouble.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = trouble.print();
            return code;
        }
    };

    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }
    if args.defaults {
        println!("input:    {DEFAULT_INPUT}");
        println!("snapshot: {DEFAULT_SNAPSHOT}");
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed_searches) => ExitCode::from(failed_searches.min(255) as u8),
        Err(trouble) => {
            error!("{trouble:#}");
            eprintln!("ERROR: {trouble:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<usize> {
    let pairs = normalize_pairs(&args.lookup)?;
    let input = args
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

    let network = match input.extension().and_then(|ext| ext.to_str()) {
        Some("txt") => {
            let collection = Collection::from_path(&input)?;
            let (dict, graph, stats) = collection.compact()?;
            if args.stats {
                report_stats(&stats, args.json)?;
            }
            let network = Network::new(dict, graph);
            if args.generate {
                return generate_snapshot(args, &network);
            }
            network
        }
        Some("bin") => {
            ensure!(
                !args.generate,
                "--generate wants a .txt input, got {}",
                input.display()
            );
            let network = Network::load(&input)?;
            if args.stats {
                let stats = NetworkStats::measure(&network.dict, &network.graph);
                report_stats(&stats, args.json)?;
            }
            network
        }
        _ => bail!(
            "unsupported input extension, want .txt or .bin: {}",
            input.display()
        ),
    };

    println!("Number of members in that social network: {}", network.len());
    if pairs.is_empty() {
        return Ok(0);
    }

    let start_time = std::time::Instant::now();
    let mut failed_searches = 0usize;
    for (a, b) in &pairs {
        let outcome = separation(a, b, &network.dict, &network.graph);
        let ties = if outcome.ties == INDEX_MAX {
            "-".to_owned()
        } else {
            outcome.ties.to_string()
        };
        let verdict = if outcome.ok { "ok" } else { "failed" };
        println!("[{verdict}] ties={ties} {}", outcome.hint);
        if !outcome.ok {
            failed_searches += 1;
        }
    }
    println!(
        "Completed {} searches in {:.3}s ({} failed)",
        pairs.len(),
        start_time.elapsed().as_secs_f64(),
        failed_searches
    );
    Ok(failed_searches)
}

fn generate_snapshot(args: &Args, network: &Network) -> Result<usize> {
    let to = args
        .compact_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT));
    let sizes = network.store(&to)?;
    println!(
        "Stored snapshot of {} members at {} ({} dictionary bytes, {} graph bytes)",
        sizes.members,
        to.display(),
        sizes.dict_bytes,
        sizes.graph_bytes
    );
    Ok(0)
}

fn report_stats(stats: &NetworkStats, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
    } else {
        println!("{}", stats.summary());
    }
    Ok(())
}

/// Drops empty entries left behind by stray commas and pairs up the rest.
fn normalize_pairs(raw: &[String]) -> Result<Vec<(String, String)>> {
    let names: Vec<&String> = raw.iter().filter(|entry| !entry.is_empty()).collect();
    ensure!(
        names.len() % 2 == 0,
        "-l wants an even number of members, got {}",
        names.len()
    );
    Ok(names
        .chunks(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}
