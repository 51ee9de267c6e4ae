use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ctxdump_core::{Config, Diagnostic, DiagnosticCode, ExportReport, Severity, TypeRegistry};
use ctxdump_include::{BuildOptions, IncludeTreeBuilder, RegistryReflector};
use ctxdump_catalog::{MetadataMapper, SnapshotDataSource};
use ctxdump_export::{
    metadata_rows, pad_rows, BulkExporter, ContextLoader, DirectorySink, SerializeOptions, METADATA_HEADER,
};

const DEFAULT_CONFIG: &str = "ctxdump.toml";

/// ctxdump - include paths, metadata layout and JSON dumps of a data context
#[derive(Parser)]
#[command(name = "ctxdump")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ctxdump.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Do not print recoverable diagnostics
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the include paths of one or more root types
    Includes {
        /// Type model file (JSON)
        #[arg(short, long)]
        types: PathBuf,

        /// Root type name (repeatable)
        #[arg(short, long, required = true)]
        root: Vec<String>,

        /// Namespace prefix of traversable types
        #[arg(short, long)]
        namespace: Option<String>,

        /// Most dots a produced path may contain
        #[arg(long)]
        max_depth: Option<usize>,

        /// Do not mark expanded container types
        #[arg(long)]
        no_ignore_list: bool,

        /// Share one cycle guard across all roots
        #[arg(long)]
        share_guard: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the Server/Database/Table/Column layout of a snapshot
    Metadata {
        /// Snapshot file (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Dump every table of a snapshot as JSON files
    Export {
        /// Snapshot file (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Deepest record level that is expanded (overrides config)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Also write the export report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Load a whole-context dump
    Load {
        /// Dump file, or the directory holding <context>.json
        path: PathBuf,

        /// Context name
        #[arg(long)]
        context: String,
    },

    /// Write a default config file
    InitConfig {
        /// Destination
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Includes {
            types,
            root,
            namespace,
            max_depth,
            no_ignore_list,
            share_guard,
            json,
        } => {
            let mut options = BuildOptions::from(&config.include);
            if let Some(namespace) = namespace {
                options.namespace_filter = namespace;
            }
            if let Some(max_depth) = max_depth {
                options.max_depth = max_depth;
            }
            if no_ignore_list {
                options.add_to_ignore_list = false;
            }
            includes_command(&types, &root, options, share_guard, json, cli.quiet)
        }
        Commands::Metadata { snapshot, json } => metadata_command(&snapshot, json),
        Commands::Export {
            snapshot,
            output,
            max_depth,
            report,
        } => {
            let output = output.unwrap_or_else(|| config.output_dir());
            let options = export_options(&config, max_depth);
            export_command(&config, &snapshot, &output, options, report.as_deref(), cli.quiet).await
        }
        Commands::Load { path, context } => load_command(&path, &context, cli.quiet),
        Commands::InitConfig { output, force } => init_config_command(&output, force),
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(path) = path {
        tracing::debug!(path = %path.display(), "loading config");
        return Ok(Config::from_file(path)?);
    }

    let default_path = Path::new(DEFAULT_CONFIG);
    if default_path.exists() {
        tracing::debug!(path = DEFAULT_CONFIG, "loading config");
        Ok(Config::from_file(default_path)?)
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Ok(Config::default())
    }
}

/// Export settings from the config file with the command-line override applied
fn export_options(config: &Config, max_depth: Option<usize>) -> SerializeOptions {
    let mut options = SerializeOptions::from(&config.export);
    if let Some(max_depth) = max_depth {
        options.max_depth = max_depth;
    }
    options
}

/// Includes command - derive include paths from a type model
fn includes_command(
    types: &Path,
    roots: &[String],
    options: BuildOptions,
    share_guard: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let registry = TypeRegistry::from_file(types)
        .map_err(|e| anyhow::anyhow!("Failed to load type model: {}", e))?;

    let handles = roots
        .iter()
        .map(|name| {
            registry
                .handle(name)
                .ok_or_else(|| anyhow::anyhow!("Type '{}' not found in {}", name, types.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let reflector = RegistryReflector::new(&registry);
    let mut builder = IncludeTreeBuilder::new(&reflector, options);
    let trees = builder.build_forest(&handles, share_guard);

    if json {
        let value: serde_json::Value = roots
            .iter()
            .zip(&trees)
            .map(|(root, tree)| serde_json::json!({ "root": root, "paths": tree.paths() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for (root, tree) in roots.iter().zip(&trees) {
            println!("{}", root.bold());
            for path in tree.paths() {
                println!("  {}", path);
            }
        }
    }

    if !quiet {
        print_diagnostics(builder.diagnostics());
    }

    Ok(())
}

/// Metadata command - show the mapped table layout
fn metadata_command(snapshot: &Path, json: bool) -> Result<()> {
    let source = SnapshotDataSource::from_file(snapshot)
        .map_err(|e| anyhow::anyhow!("Failed to load snapshot: {}", e))?;
    let server = map_server(&source)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&server)?);
    } else {
        print_layout(&server);
    }

    Ok(())
}

/// Export command - write one JSON file per table plus the context dumps
async fn export_command(
    config: &Config,
    snapshot: &Path,
    output: &Path,
    options: SerializeOptions,
    report_path: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let source = SnapshotDataSource::from_file(snapshot)
        .map_err(|e| anyhow::anyhow!("Failed to load snapshot: {}", e))?;
    let server = map_server(&source)?;

    if config.export.show_in_console && !quiet {
        print_layout(&server);
        println!();
    }

    let sink = DirectorySink::new(output);
    let report = BulkExporter::new(options).export(&source, &server, &sink).await;

    if let Some(path) = report_path {
        report.save_to_file(path)?;
        eprintln!("{} {}", "Report saved to:".green(), path.display());
    }

    print_report_summary(&report, output, quiet);
    Ok(())
}

/// Load command - read a whole-context dump back
fn load_command(path: &Path, context: &str, quiet: bool) -> Result<()> {
    let Some(loaded) = ContextLoader::load(path, context) else {
        if !quiet {
            let diagnostic = Diagnostic::new(
                DiagnosticCode::DeserializationFailure,
                Severity::Error,
                format!("No readable dump for '{}' at {}", context, path.display()),
            )
            .with_subject(context);
            print_diagnostics(std::slice::from_ref(&diagnostic));
        }
        std::process::exit(1);
    };

    println!("{} {}", "Loaded".green(), loaded.source.display());
    println!(
        "  {} collections, {} records",
        loaded.collections.len(),
        loaded.record_count()
    );
    for (i, collection) in loaded.collections.iter().enumerate() {
        println!("  [{}] {} records", i, collection.len());
    }

    Ok(())
}

/// Init-config command - write the default configuration
fn init_config_command(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists. Use --force to overwrite it.",
            output.display()
        ));
    }

    Config::default().save_to_file(output)?;
    println!("{} {}", "Wrote".green(), output.display());
    Ok(())
}

/// Map the source's metadata, tagging a failure with its diagnostic code
fn map_server(source: &SnapshotDataSource) -> Result<ctxdump_core::Server> {
    MetadataMapper::map_source(source).map_err(|e| anyhow::anyhow!("[{}] {}", e.code(), e))
}

fn print_layout(server: &ctxdump_core::Server) {
    let mut rows = vec![METADATA_HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
    rows.extend(metadata_rows(server));
    println!("{}", pad_rows(&rows, 2));
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        let severity_str = match diag.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warn => "WARN".yellow().bold(),
            Severity::Info => "INFO".cyan(),
        };

        match &diag.subject {
            Some(subject) => eprintln!("  [{}] {} {}: {}", severity_str, diag.code, subject.bold(), diag.message),
            None => eprintln!("  [{}] {}: {}", severity_str, diag.code, diag.message),
        }
    }
}

fn print_report_summary(report: &ExportReport, output: &Path, quiet: bool) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Export Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!("Output: {}", output.display());
    println!();

    println!("{}", "Summary:".bold());
    println!("  Tables:    {}/{}", report.summary.tables_exported, report.summary.tables);
    println!("  Artifacts: {}", report.summary.artifacts);

    if report.summary.errors > 0 {
        println!("  Errors:    {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:    {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings:  {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings:  {}", format!("{}", report.summary.warnings).green());
    }
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ Every table exported".green().bold());
    } else if !quiet {
        println!("{}", "Diagnostics:".bold());
        print_diagnostics(&report.diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_options_follow_config() {
        let mut config = Config::default();
        config.export.max_depth = 4;
        config.export.pretty = false;

        let options = export_options(&config, None);
        assert_eq!(options.max_depth, 4);
        assert!(!options.pretty);
        assert!(options.preserve_references);
    }

    #[test]
    fn test_max_depth_flag_overrides_config() {
        let options = export_options(&Config::default(), Some(7));
        assert_eq!(options.max_depth, 7);
    }

    #[test]
    fn test_mapping_failure_carries_code() {
        use ctxdump_catalog::{ConnectionDescriptor, EntityMetadata, Snapshot};

        let snapshot = Snapshot::new(ConnectionDescriptor::new("localhost", "shop"), "ShopContext")
            .with_entity(EntityMetadata::unmapped("Shop.Orphan"));

        let err = map_server(&SnapshotDataSource::new(snapshot)).unwrap_err();
        assert!(err.to_string().starts_with("[METADATA_INTEGRITY]"), "{}", err);
    }

    #[test]
    fn test_cli_parses_includes() {
        let cli = Cli::try_parse_from([
            "ctxdump", "includes", "--types", "model.json", "--root", "Shop.Order", "--root", "Shop.Customer",
            "--max-depth", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Includes { root, max_depth, .. } => {
                assert_eq!(root, vec!["Shop.Order", "Shop.Customer"]);
                assert_eq!(max_depth, Some(2));
            }
            _ => panic!("expected includes command"),
        }
    }
}
