//! Implgen CLI - run generation rounds over symbol graph snapshots

use clap::{Parser, Subcommand, ValueEnum};
use implgen::annotation::InterfaceDirectives;
use implgen::config::{self, ImplgenConfig};
use implgen::graph::SymbolGraph;
use implgen::snapshot;
use implgen::ui::{self, CandidateRow};
use implgen::FsCodeGenerator;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "implgen")]
#[command(version)]
#[command(about = "Interface implementation synthesizer - annotation-driven code generation")]
#[command(long_about = r#"
Implgen reads a resolved symbol graph and generates an implementation for every
interface marked for synthesis:
  • a report() method printing the interface marker's message
  • one override per marked function, printing its message and returning x + y
  • a dependency manifest linking each artifact to its source file

Declarations the host could not resolve yet are reported as deferred.

Example usage:
  implgen init
  implgen inspect --graph 'snapshots/*.json'
  implgen generate --graph 'snapshots/*.json' --out build/generated/implgen
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one generation round and write artifacts
    Generate {
        /// Snapshot files or glob patterns (JSON or TOML)
        #[arg(short, long, required = true, num_args = 1..)]
        graph: Vec<String>,

        /// Output directory (defaults to the config value, then build/generated/implgen)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show candidates and their resolved directives without writing anything
    Inspect {
        /// Snapshot files or glob patterns (JSON or TOML)
        #[arg(short, long, required = true, num_args = 1..)]
        graph: Vec<String>,
    },

    /// Write a default implgen.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    match cli.command {
        Commands::Init { force } => {
            config::write_config(&config_path, &ImplgenConfig::default(), force)?;
            ui::success(&format!("Wrote {}", config_path.display()));
        }

        Commands::Generate { graph, out, format } => {
            let config = config::load_config(Some(config_path.as_path()))?.unwrap_or_default();
            let out = out
                .or_else(|| config.output.as_ref().map(PathBuf::from))
                .unwrap_or_else(config::default_output_dir);

            let symbols = snapshot::load_graph(&graph)?;
            tracing::info!("Loaded {} declaration(s) from {} pattern(s)", symbols.len(), graph.len());

            config::ensure_output_dir(&out)?;
            let mut codegen = FsCodeGenerator::new(&out);
            let outcome = match config.processor().process(&symbols, &mut codegen) {
                Ok(outcome) => outcome,
                Err(e) => {
                    ui::error(&format!("Round aborted: {}", e));
                    return Err(e.into());
                }
            };
            let manifest = codegen.write_manifest()?;

            if format == Format::Json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            ui::header(&format!("Generated into {}", out.display()));
            ui::info("Markers", &format!("@{} / @{}", config.markers.class, config.markers.function));
            for artifact in &outcome.artifacts {
                ui::artifact(artifact);
            }
            if !outcome.skipped.is_empty() {
                ui::section("Skipped (not interfaces)");
                for id in &outcome.skipped {
                    ui::skipped(&id.to_id_string());
                }
            }
            if !outcome.deferred.is_empty() {
                ui::section("Deferred to next round");
                for id in &outcome.deferred {
                    ui::deferred(&id.to_id_string());
                }
            }
            ui::section("Summary");
            ui::summary_row("Artifacts:", &outcome.artifacts.len().to_string());
            ui::summary_row("Deferred:", &outcome.deferred.len().to_string());
            ui::summary_row("Skipped:", &outcome.skipped.len().to_string());
            ui::summary_row("Manifest:", &manifest.display().to_string());
        }

        Commands::Inspect { graph } => {
            let config = config::load_config(Some(config_path.as_path()))?.unwrap_or_default();
            let symbols = snapshot::load_graph(&graph)?;
            let processor = config.processor();

            let stats = symbols.stats();
            let counts = [
                ("Declarations", stats.declarations.to_string()),
                ("Interfaces", stats.interfaces.to_string()),
                ("Functions", stats.functions.to_string()),
                ("Annotations", stats.annotations.to_string()),
                ("Unresolved", stats.unresolved.to_string()),
            ];
            let rows: Vec<(&str, &str)> = counts.iter().map(|(k, v)| (*k, v.as_str())).collect();
            ui::header("Symbol graph");
            println!("{}", ui::stats_table(&rows));

            let mut candidates = Vec::new();
            for declaration in processor.candidates(&symbols) {
                let status = if !symbols.is_resolved(declaration) {
                    "deferred"
                } else if !declaration.is_interface() {
                    "skipped"
                } else {
                    "ready"
                };
                let (report, sums) = match InterfaceDirectives::resolve(declaration, &config.markers) {
                    Ok(directives) => (
                        directives.report().unwrap_or("-").to_string(),
                        directives
                            .sums()
                            .map(|(function, message)| format!("{}: {}", function, message))
                            .collect::<Vec<_>>()
                            .join("\n"),
                    ),
                    Err(e) => (ui::dim(&e.to_string()), String::new()),
                };
                candidates.push(CandidateRow {
                    declaration: declaration.id.qualified_name(),
                    kind: declaration.kind.to_string(),
                    status: status.to_string(),
                    report,
                    sums,
                });
            }

            ui::section("Candidates");
            if candidates.is_empty() {
                ui::warn(&format!(
                    "No declarations carry @{} or @{}",
                    config.markers.class, config.markers.function
                ));
            } else {
                println!("{}", ui::candidates_table(&candidates));
            }
        }
    }

    Ok(())
}
