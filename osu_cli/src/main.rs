use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use osu_parser::ParseOptions;

mod inspect;

#[derive(Debug, Parser)]
#[command(name = "osu")]
#[command(about = "osu! beatmap parser CLI", long_about = None)]
struct Cli {
    /// Log skipped sections, ignored keys and geometry fallbacks.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a beatmap and write it out as JSON.
    Parse {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reject beatmaps without hit objects.
        #[arg(long)]
        strict: bool,
        /// Append a sentinel hit object at infinite time.
        #[arg(long)]
        sentinel: bool,
    },
    /// Print a summary and one row per hit object.
    Inspect {
        input: PathBuf,
        /// Points sampled along each slider path.
        #[arg(long, default_value_t = 3)]
        samples: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Command::Parse {
            input,
            output,
            strict,
            sentinel,
        } => {
            let options = ParseOptions {
                file: None,
                append_sentinel: sentinel,
                require_hit_objects: strict,
            };
            let beatmap = osu_parser::parse_file_with_options(&input, options)
                .map_err(|e| anyhow::anyhow!(e.to_string()))
                .with_context(|| format!("parse failed: {}", input.display()))?;

            let json =
                serde_json::to_string_pretty(&beatmap).context("failed to serialize beatmap")?;
            let out_path = output.unwrap_or_else(|| default_output_path(&input));
            fs::write(&out_path, json)
                .with_context(|| format!("failed to write: {}", out_path.display()))?;
        }
        Command::Inspect { input, samples } => {
            let beatmap = osu_parser::parse_file(&input)
                .map_err(|e| anyhow::anyhow!(e.to_string()))
                .with_context(|| format!("parse failed: {}", input.display()))?;

            inspect::run_inspect(&beatmap, samples)?;
        }
    }

    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let mut out = input.to_path_buf();
    out.set_extension("beatmap.json");
    out
}
