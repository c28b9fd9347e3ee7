use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::LevelFilter;

use luminid_bundler::{BundleConfig, PackReport};

#[derive(Parser)]
#[command(name = "bundle", version)]
#[command(about = "Inline the compiled game script into a single distributable index.html")]
struct Cli {
    /// Directory relative paths are resolved against [env: LUMINID_ROOT]
    #[arg(long)]
    root: Option<PathBuf>,

    /// Compiled script to inline [default: dist/main.roadroller.js]
    #[arg(long)]
    script: Option<PathBuf>,

    /// Page template holding the main.js script tag [default: index.html]
    #[arg(long)]
    template: Option<PathBuf>,

    /// Bundle to write [default: dist/index.html]
    #[arg(long)]
    out: Option<PathBuf>,

    /// Auxiliary asset copied next to the bundle if present [default: favicon.ico]
    #[arg(long)]
    asset: Option<PathBuf>,

    /// Where the auxiliary asset is copied [default: dist/favicon.ico]
    #[arg(long)]
    asset_out: Option<PathBuf>,

    /// Strict mode: a missing marker or blown size budget is an error
    #[arg(long)]
    strict: bool,

    /// Size budget for the bundle in bytes [env: LUMINID_MAX_BYTES]
    #[arg(long)]
    max_bytes: Option<u64>,

    /// Print the pack report as JSON instead of a sentence
    #[arg(long)]
    json: bool,

    /// Re-pack whenever an input changes
    #[arg(long)]
    watch: bool,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Flags win over the environment, which wins over defaults.
    fn apply(&self, config: &mut BundleConfig) {
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(script) = &self.script {
            config.script = script.clone();
        }
        if let Some(template) = &self.template {
            config.template = template.clone();
        }
        if let Some(out) = &self.out {
            config.output = out.clone();
        }
        if let Some(asset) = &self.asset {
            config.asset = Some(asset.clone());
        }
        if let Some(asset_out) = &self.asset_out {
            config.asset_output = asset_out.clone();
        }
        if self.max_bytes.is_some() {
            config.max_bytes = self.max_bytes;
        }
        config.strict |= self.strict;
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn print_report(report: &PackReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", report.to_json().context("cannot serialize pack report")?);
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = BundleConfig::from_env().context("cannot load configuration")?;
    cli.apply(&mut config);

    if cli.watch {
        luminid_bundler::watch(&config, |result| {
            let shown = result
                .map_err(anyhow::Error::from)
                .and_then(|report| print_report(&report, cli.json));
            if let Err(e) = shown {
                eprintln!("error: {e:#}");
            }
        })?;
        return Ok(());
    }

    let report = luminid_bundler::pack(&config)?;
    print_report(&report, cli.json)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
