// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quill - back end for an academic writing workflow.
//!
//! This is the binary entry point: it loads configuration and dispatches to
//! the gateway server or a one-shot command.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;
mod shutdown;
mod wiring;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quill_config::QuillConfig;
use quill_core::TaskType;

/// Quill - AI routing, reference sync and literature search for academic writing.
#[derive(Parser, Debug)]
#[command(name = "quill", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Generate text for one prompt through the provider router.
    Generate {
        prompt: String,
        /// Workflow step the prompt belongs to.
        #[arg(long, default_value = "general")]
        task: TaskType,
        /// System prompt sent ahead of the user prompt.
        #[arg(long)]
        system: Option<String>,
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Search academic sources for papers.
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration and print a summary.
    Config {
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> QuillConfig {
    let loaded = match path {
        Some(path) => quill_config::load_and_validate_path(path),
        None => quill_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            quill_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command {
        Some(Commands::Serve) => {
            serve::init_tracing(&config.server.log_level);
            serve::run_serve(config).await
        }
        Some(Commands::Generate {
            prompt,
            task,
            system,
            max_tokens,
            json,
        }) => {
            serve::init_tracing("warn");
            let args = commands::GenerateArgs {
                prompt,
                task,
                system,
                max_tokens,
                json,
            };
            commands::run_generate(&config, args).await
        }
        Some(Commands::Search { query, json }) => {
            serve::init_tracing("warn");
            commands::run_search(&config, &query, json).await
        }
        Some(Commands::Config { json }) => commands::run_config(&config, json),
        None => {
            println!("quill: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
