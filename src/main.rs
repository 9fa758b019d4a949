use std::io;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use volley_stats::analysis::analyze_loaded;
use volley_stats::config::AnalysisConfig;
use volley_stats::export::{export_json, export_xlsx};
use volley_stats::metrics::{ReceivePolicy, render_report};
use volley_stats::source::load_sources;

struct CliArgs {
    dir: Option<PathBuf>,
    sheet: Option<String>,
    summary_policy: Option<ReceivePolicy>,
    trend_policy: Option<ReceivePolicy>,
    xlsx: Option<PathBuf>,
    json: Option<PathBuf>,
    serial: bool,
    verbose: bool,
    files: Vec<String>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = parse_args(std::env::args().skip(1).collect())?;

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut cfg = AnalysisConfig::from_env();
    if let Some(dir) = args.dir {
        cfg.data_dir = dir;
    }
    if let Some(sheet) = args.sheet {
        cfg.sheet_name = sheet;
    }
    if let Some(policy) = args.summary_policy {
        cfg.summary_policy = policy;
    }
    if let Some(policy) = args.trend_policy {
        cfg.trend_policy = policy;
    }
    if args.serial {
        cfg.parallel = false;
    }

    let loaded = load_sources(&cfg.data_dir, &args.files)?;
    let report = analyze_loaded(&loaded, &cfg)?;

    println!("{}", report.summary);
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.id, skipped.reason);
    }
    print!("{}", render_report(&report.rows, report.sessions.len() > 1));

    println!("\nTeam trend ({} receive):", cfg.trend_policy);
    for point in &report.team_trend {
        println!(
            "  {:<16} attack {:>5.1}%  serve {:>5.1}%  receive {:>6.1}%  set {:>5.1}%",
            point.session_id,
            point.attack_efficiency,
            point.serve_efficiency,
            point.receive_efficiency,
            point.set_efficiency
        );
    }

    if let Some(path) = args.xlsx {
        let written = export_xlsx(&path, &report)?;
        println!(
            "\nWrote {} ({} players, {} sessions, {} series)",
            path.display(),
            written.players,
            written.sessions,
            written.series
        );
    }
    if let Some(path) = args.json {
        export_json(&path, &report)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliArgs> {
    let mut out = CliArgs {
        dir: None,
        sheet: None,
        summary_policy: None,
        trend_policy: None,
        xlsx: None,
        json: None,
        serial: false,
        verbose: false,
        files: Vec::new(),
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = || -> Result<String> {
            inline
                .clone()
                .or_else(|| iter.next())
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--dir" => out.dir = Some(PathBuf::from(value()?)),
            "--sheet" => out.sheet = Some(value()?),
            "--summary-policy" => out.summary_policy = Some(parse_policy(&value()?)?),
            "--trend-policy" => out.trend_policy = Some(parse_policy(&value()?)?),
            "--xlsx" => out.xlsx = Some(PathBuf::from(value()?)),
            "--json" => out.json = Some(PathBuf::from(value()?)),
            "--serial" => out.serial = true,
            "-v" | "--verbose" => out.verbose = true,
            other if other.starts_with('-') => return Err(anyhow!("unknown flag: {other}")),
            _ => out.files.push(arg),
        }
    }
    Ok(out)
}

fn parse_policy(raw: &str) -> Result<ReceivePolicy> {
    raw.parse::<ReceivePolicy>().map_err(|err| anyhow!(err))
}
