//! Ridge CLI - Command-line interface for the Ridge terrain generator

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{generate, init};

#[derive(Parser)]
#[command(name = "ridge")]
#[command(about = "Bezier-refined procedural terrain mesh generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log pipeline progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a terrain config with default values
    Init {
        /// Config file to create
        #[arg(default_value = "terrain.toml")]
        path: String,
    },

    /// Generate a terrain mesh
    Generate {
        /// Path to terrain config (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<String>,

        /// Heightmap image, overrides the config's heightmap_path
        #[arg(long)]
        heightmap: Option<String>,

        /// Write the mesh as Wavefront OBJ
        #[arg(short, long)]
        output: Option<String>,

        /// Coarse control grid cells per edge
        #[arg(long)]
        coarse: Option<u32>,

        /// Output grid cells per edge
        #[arg(long)]
        fine: Option<u32>,

        /// Skip the noise pass
        #[arg(long)]
        no_noise: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Init { path } => init::run(&path),
        Commands::Generate {
            config,
            heightmap,
            output,
            coarse,
            fine,
            no_noise,
            format,
        } => generate::run(generate::GenerateArgs {
            config,
            heightmap,
            output,
            coarse,
            fine,
            no_noise,
            format,
        }),
    }
}
