use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;

use crate::config::Config;
use crate::executor::{Output, VM};
use crate::host::{stdout_output, Host, Outcome};
use crate::lexer::{self, Keyword, TokenKind};

#[derive(Parser)]
#[command(name = "basic")]
#[command(about = "Resumable BASIC-style script runtime", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a script, stepping it on a fixed tick rate
    Run {
        /// Script path, or "-" for stdin
        file: String,

        /// Advance virtual time one tick period per tick instead of waiting
        #[arg(long)]
        simulate: bool,

        /// Upper bound on interpreter steps per tick
        #[arg(long)]
        steps_per_tick: Option<usize>,

        /// Ticks per second
        #[arg(long)]
        tick_rate: Option<u32>,
    },

    /// Compile a script without running it and report arena usage
    Check {
        /// Script path, or "-" for stdin
        file: String,
    },

    /// Print the token stream of a script as JSON
    Tokens {
        /// Script path, or "-" for stdin
        file: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Token as shown by `basic tokens`
#[derive(Serialize)]
struct TokenDump<'a> {
    kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<Keyword>,
    text: &'a str,
    line: usize,
}

/// Run the CLI by parsing process arguments
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli).await
}

fn read_source(file: &str) -> Result<String> {
    if file == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read script from stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read script {}", file))
}

async fn run_cli_with_args(cli: Cli) -> Result<()> {
    let mut builder = Config::builder();
    if let Some(path) = &cli.config {
        builder = builder.config_path(path);
    }
    let mut config = builder.build()?;

    match cli.command {
        Commands::Run {
            file,
            simulate,
            steps_per_tick,
            tick_rate,
        } => {
            if let Some(steps) = steps_per_tick {
                config.host.steps_per_tick = steps;
            }
            if let Some(rate) = tick_rate {
                config.host.tick_rate_hz = rate;
            }
            config.validate()?;

            let source = read_source(&file)?;
            let (output, finish) = stdout_output();
            let vm = match VM::with_config(&source, &config.runtime, output) {
                Ok(vm) => vm,
                Err(_) => {
                    // The diagnostic already went through the print callback
                    finish();
                    std::process::exit(1);
                }
            };

            let mut host = Host::new(vm, config.host.clone()).simulate(simulate);
            let outcome = host.run().await;
            finish();

            match outcome {
                Outcome::Completed | Outcome::Exited => {}
                Outcome::Failed(_) => std::process::exit(1),
                Outcome::Interrupted => std::process::exit(130),
            }
        }

        Commands::Check { file } => {
            let source = read_source(&file)?;
            match VM::with_config(&source, &config.runtime, Output::discard()) {
                Ok(vm) => {
                    let usage = vm.usage();
                    println!("{}: OK", file);
                    println!(
                        "  statement nodes: {}/{}",
                        usage.statement_nodes.0, usage.statement_nodes.1
                    );
                    println!("  plan ops:        {}/{}", usage.plan_ops.0, usage.plan_ops.1);
                    println!(
                        "  string bytes:    {}/{}",
                        usage.string_bytes.0, usage.string_bytes.1
                    );
                    println!("  name slots:      {}/{}", usage.name_slots.0, usage.name_slots.1);
                }
                Err(fault) => {
                    eprintln!("{}: {}", file, fault);
                    std::process::exit(1);
                }
            }
        }

        Commands::Tokens { file } => {
            let source = read_source(&file)?;
            let tokens = lexer::tokenize(&source)?;
            let dump: Vec<TokenDump> = tokens
                .iter()
                .map(|token| TokenDump {
                    kind: token.kind,
                    keyword: token.keyword,
                    text: token.span.text(&source),
                    line: token.span.line_in(&source),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&dump).context("Failed to serialize tokens")?
            );
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
