//! CLI frontend for the TAB thing-making engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tab",
    about = "TAB: make things from models and poke at their behaviors",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where models come from.
#[derive(Args)]
struct CatalogArgs {
    /// Catalog root directory (one subdirectory per section)
    #[arg(short, long, default_value = "catalog")]
    catalog: PathBuf,

    /// Activate an extra catalog section (repeatable)
    #[arg(short, long = "section")]
    sections: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List models available in the active catalog sections
    Models {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Make a thing and print its attributes
    Make {
        /// Model name, or an inline JSON model such as '{"base":"container"}'
        model: String,

        /// Addon model applied after the base model
        #[arg(short, long)]
        addon: Option<String>,

        /// Print attributes as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Make a thing and invoke one of its capabilities
    Invoke {
        /// Model name, or an inline JSON model
        model: String,

        /// Capability to invoke (e.g. fullName, describe, weigh)
        capability: String,

        /// JSON argument passed to the capability (repeatable)
        #[arg(long = "arg")]
        args: Vec<String>,

        /// Addon model applied after the base model
        #[arg(short, long)]
        addon: Option<String>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Models { catalog } => commands::models::run(&catalog.catalog, &catalog.sections),
        Commands::Make {
            model,
            addon,
            json,
            catalog,
        } => commands::make::run(
            &catalog.catalog,
            &catalog.sections,
            &model,
            addon.as_deref(),
            json,
        ),
        Commands::Invoke {
            model,
            capability,
            args,
            addon,
            catalog,
        } => commands::invoke::run(
            &catalog.catalog,
            &catalog.sections,
            &model,
            addon.as_deref(),
            &capability,
            &args,
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
