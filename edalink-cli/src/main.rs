//! EdaLink CLI - query and analyze PCB designs through an EDA connector.

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use edalink::prelude::*;
use edalink::{HealthReport, PlacementAnalysis, RoutingAnalysis};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "edalink-cli")]
#[command(about = "Mock-first PCB design connector and analysis tool", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON connector config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Connector backend (overrides config and EDALINK_MODE)
    #[arg(long, global = true, value_enum)]
    mode: Option<ModeArg>,

    /// Seed for reproducible signal-integrity and export figures
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects
    Projects {
        /// draft, in_review, approved or manufacturing
        #[arg(long, value_parser = parse_wire::<ProjectStatus>)]
        status: Option<ProjectStatus>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },

    /// Show a board
    Board {
        #[arg(value_name = "BOARD")]
        board_id: String,
    },

    /// List components on a board
    Components {
        #[arg(value_name = "BOARD")]
        board_id: String,
        /// top or bottom
        #[arg(long, value_parser = parse_wire::<Side>)]
        layer: Option<Side>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },

    /// List nets on a board
    Nets {
        #[arg(value_name = "BOARD")]
        board_id: String,
        /// critical, high, normal or low
        #[arg(long, value_parser = parse_wire::<NetPriority>)]
        priority: Option<NetPriority>,
        #[arg(long = "class")]
        net_class: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },

    /// Run DRC and list violations
    Drc {
        #[arg(value_name = "BOARD")]
        board_id: String,
        /// error, warning or info
        #[arg(long, value_parser = parse_wire::<Severity>)]
        severity: Option<Severity>,
    },

    /// Run the auto-router
    Route {
        #[arg(value_name = "BOARD")]
        board_id: String,
        /// Restrict routing to these nets (repeatable)
        #[arg(long = "net")]
        nets: Vec<String>,
        #[arg(long)]
        trace_width: Option<f64>,
    },

    /// Estimate signal integrity
    Si {
        #[arg(value_name = "BOARD")]
        board_id: String,
        /// Nets to analyze (repeatable); defaults to differential and high-speed nets
        #[arg(long = "net")]
        nets: Vec<String>,
    },

    /// Placement density and suggestions
    Placement {
        #[arg(value_name = "BOARD")]
        board_id: String,
    },

    /// Routing coverage and critical-net checklist
    Routing {
        #[arg(value_name = "BOARD")]
        board_id: String,
    },

    /// Aggregated design health report
    Health {
        #[arg(value_name = "BOARD")]
        board_id: String,
        /// Exit with error code if DRC reports errors or could not run
        #[arg(long)]
        fail_on_errors: bool,
    },

    /// Export Gerber manifest and BOM
    Export {
        #[arg(value_name = "BOARD")]
        board_id: String,
        #[arg(long)]
        group_by_value: bool,
        /// mm or inch
        #[arg(long, value_parser = parse_wire::<Units>, default_value = "mm")]
        units: Units,
        /// RS-274X or RS-274D
        #[arg(long, value_parser = parse_wire::<GerberFormat>, default_value = "RS-274X")]
        gerber_format: GerberFormat,
    },

    /// Connector health check
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Mock,
    Live,
}

impl From<ModeArg> for ConnectorMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Mock => ConnectorMode::Mock,
            ModeArg::Live => ConnectorMode::Live,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// Result envelope as JSON
    Json,
}

/// Parse a value using its wire name, e.g. `in_review` or `RS-274X`.
fn parse_wire<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unrecognized value '{}'", s))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("edalink={},edalink_cli={}", level, level).into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ConnectorConfig> {
    let config = match &cli.config {
        Some(path) => ConnectorConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ConnectorConfig::default(),
    };
    let mut config = config.merge_env().context("invalid EDALINK_* environment")?;
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = load_config(&cli)?;
    tracing::debug!("Using {} connector", config.mode);
    let connector = create_connector(&config);
    let format = cli.format;

    // A failed initialization is still reported by the health check.
    if let Err(e) = connector.initialize().await {
        tracing::warn!("Initialization failed: {}", e);
        if !matches!(cli.command, Commands::Status) {
            return Ok(emit::<()>(Err(e), format, |_| {}));
        }
    }

    let service = DesignAnalysisService::new(connector.clone());

    let code = match cli.command {
        Commands::Projects { status, limit, offset } => {
            let filter = ProjectFilter {
                status,
                page: page(limit, offset),
            };
            emit(connector.list_projects(filter).await, format, print_projects)
        }
        Commands::Board { board_id } => emit(connector.get_board(&board_id).await, format, print_board),
        Commands::Components {
            board_id,
            layer,
            limit,
            offset,
        } => {
            let filter = ComponentFilter {
                layer,
                page: page(limit, offset),
            };
            emit(connector.list_components(&board_id, filter).await, format, print_components)
        }
        Commands::Nets {
            board_id,
            priority,
            net_class,
            limit,
            offset,
        } => {
            let filter = NetFilter {
                priority,
                net_class,
                page: page(limit, offset),
            };
            emit(connector.list_nets(&board_id, filter).await, format, print_nets)
        }
        Commands::Drc { board_id, severity } => {
            let result = match connector.run_drc(&board_id).await {
                Ok(result) => connector
                    .get_drc_violations(&board_id, severity)
                    .await
                    .map(|violations| DrcResult { violations, ..result }),
                Err(e) => Err(e),
            };
            emit(result, format, print_drc)
        }
        Commands::Route {
            board_id,
            nets,
            trace_width,
        } => {
            let options = AutoRouteOptions {
                net_ids: non_empty(nets),
                trace_width,
            };
            emit(connector.run_auto_router(&board_id, options).await, format, print_routing_result)
        }
        Commands::Si { board_id, nets } => emit(
            connector.analyze_signal_integrity(&board_id, non_empty(nets)).await,
            format,
            print_signal_integrity,
        ),
        Commands::Placement { board_id } => {
            emit(service.analyze_placement(&board_id).await, format, print_placement)
        }
        Commands::Routing { board_id } => emit(service.analyze_routing(&board_id).await, format, print_routing),
        Commands::Health {
            board_id,
            fail_on_errors,
        } => {
            let result = service.health_report(&board_id).await;
            let has_errors = matches!(&result, Ok(report) if report.release_blocked());
            let code = emit(result, format, print_health_report);
            if code == 0 && fail_on_errors && has_errors {
                1
            } else {
                code
            }
        }
        Commands::Export {
            board_id,
            group_by_value,
            units,
            gerber_format,
        } => {
            let gerber = GerberOptions {
                layers: None,
                format: gerber_format,
                units,
            };
            let bom = BomOptions { group_by_value };
            emit(
                service.manufacturing_export(&board_id, gerber, bom).await,
                format,
                print_export,
            )
        }
        Commands::Status => emit(connector.health_check().await, format, print_health_status),
    };

    connector.dispose().await.ok();
    Ok(code)
}

fn page(limit: Option<usize>, offset: Option<usize>) -> Pagination {
    Pagination { limit, offset }
}

fn non_empty(ids: Vec<String>) -> Option<Vec<String>> {
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// Print a connector result and return the process exit code.
fn emit<T: Serialize>(result: ConnectorResult<T>, format: OutputFormat, human: impl FnOnce(&T)) -> i32 {
    let code = if result.is_ok() { 0 } else { 1 };
    match format {
        OutputFormat::Json => {
            let envelope = Envelope::from(result);
            match serde_json::to_string_pretty(&envelope) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: failed to serialize output: {}", e);
                    return 1;
                }
            }
        }
        OutputFormat::Human => match &result {
            Ok(data) => human(data),
            Err(e) => eprintln!("Error: {}", e),
        },
    }
    code
}

fn print_health_status(status: &HealthStatus) {
    println!("Mode:        {}", status.mode);
    println!("Initialized: {}", status.initialized);
    println!("Healthy:     {}", status.healthy);
    println!("{}", status.message);
}

fn print_projects(page: &Page<Project>) {
    println!("Projects ({} of {}):", page.items.len(), page.total);
    for project in &page.items {
        println!(
            "  {}  {:<24} {:?}  v{}  {} board(s)",
            project.id,
            project.name,
            project.status,
            project.version,
            project.boards.len()
        );
    }
}

fn print_board(board: &Board) {
    println!("\nBoard: {} ({})", board.name, board.id);
    println!("{}", "─".repeat(60));
    println!("  Project:    {}", board.project_id);
    println!("  Size:       {} x {} mm", board.width, board.height);
    println!("  Layers:     {}", board.layers.iter().map(|l| l.name.as_str()).collect::<Vec<_>>().join(", "));
    println!("  Components: {}", board.components.len());
    println!("  Nets:       {}", board.nets.len());
    println!("  Traces:     {}", board.traces.len());
    println!("  Vias:       {}", board.vias.len());
    println!("  Rules:      {}", board.design_rules.len());
}

fn print_components(page: &Page<Component>) {
    println!("Components ({} of {}):", page.items.len(), page.total);
    for c in &page.items {
        println!(
            "  {:<4} {:<8} {:<12} {:<14} ({}, {}) {}°{}",
            c.designator,
            c.id,
            c.package,
            c.value.as_deref().unwrap_or("-"),
            c.position.x,
            c.position.y,
            c.rotation,
            if c.locked { "  [locked]" } else { "" }
        );
    }
}

fn print_nets(page: &Page<Net>) {
    println!("Nets ({} of {}):", page.items.len(), page.total);
    for n in &page.items {
        println!(
            "  {:<16} {:<14} {:?}  {} pin(s)",
            n.id,
            n.net_class,
            n.priority,
            n.pins.len()
        );
    }
}

fn print_drc(result: &DrcResult) {
    println!("\nDRC for {}: {}", result.board_id, if result.passed { "PASSED" } else { "FAILED" });
    println!("{}", "─".repeat(60));
    for v in &result.violations {
        println!("  [{:?}] {}", v.severity, v.message);
        println!("      at ({}, {})", v.location.x, v.location.y);
    }
    println!("\n  Summary:");
    println!("    Rules checked: {}", result.rules_checked);
    println!("    Errors:        {}", result.error_count);
    println!("    Warnings:      {}", result.warning_count);
    println!("    Info:          {}", result.info_count);
}

fn print_routing_result(result: &RoutingResult) {
    println!("Routing for {}: {}% complete", result.board_id, result.completion_rate);
    println!("  Added {} trace(s) and {} via(s)", result.traces_added, result.vias_added);
    if !result.unrouted_nets.is_empty() {
        println!("  Unrouted: {}", result.unrouted_nets.join(", "));
    }
}

fn print_signal_integrity(result: &SignalIntegrityResult) {
    println!(
        "Signal integrity for {}: {}/{} nets passed",
        result.board_id, result.passed, result.nets_analyzed
    );
    for r in &result.results {
        println!(
            "  {:<16} {:>6.2} ohm (target {})  crosstalk {} dB{}",
            r.net_id,
            r.impedance,
            r.target_impedance,
            r.crosstalk_db,
            r.skew_ps.map(|s| format!("  skew {} ps", s)).unwrap_or_default()
        );
        for issue in &r.issues {
            println!("      - {}", issue);
        }
    }
}

fn print_placement(analysis: &PlacementAnalysis) {
    println!("Placement for {}:", analysis.board_id);
    println!("  Top/Bottom: {}/{}", analysis.top_count, analysis.bottom_count);
    println!("  Density:    {}%", analysis.density);
    for (package, count) in &analysis.package_counts {
        println!("    {:<14} {}", package, count);
    }
    for s in &analysis.suggestions {
        println!("  - {}", s);
    }
}

fn print_routing(analysis: &RoutingAnalysis) {
    println!("Routing for {}: {}% complete", analysis.board_id, analysis.completion_rate);
    for l in &analysis.layer_utilization {
        println!("  {:<10} {:>6} mm  {:>5}%", l.layer, l.routed_length, l.utilization);
    }
    for n in &analysis.critical_nets {
        println!(
            "  [{}] {:<16} {} trace(s), {} mm",
            if n.routed && n.within_max_length { "x" } else { " " },
            n.net_id,
            n.trace_count,
            n.routed_length
        );
    }
}

fn print_health_report(report: &HealthReport) {
    println!("\nHealth report: {} ({})", report.board.name, report.board.id);
    println!("{}", "─".repeat(60));
    println!("  Routing completion: {}%", report.board.routing_completion);
    if report.drc.available {
        println!(
            "  DRC:                {} errors, {} warnings",
            report.drc.error_count, report.drc.warning_count
        );
    } else {
        println!("  DRC:                unavailable");
    }
    if report.signal_integrity.available {
        println!(
            "  Signal integrity:   {}/{} nets passed",
            report.signal_integrity.passed, report.signal_integrity.nets_analyzed
        );
    } else {
        println!("  Signal integrity:   unavailable");
    }
    println!("\n  Recommendations:");
    for r in &report.recommendations {
        println!("    - {}", r);
    }
}

fn print_export(package: &edalink::ManufacturingPackage) {
    println!(
        "Gerber ({}, {}): {} files, {} bytes",
        package.gerber.format.as_str(),
        package.gerber.units.as_str(),
        package.gerber.files.len(),
        package.gerber.total_size
    );
    for f in &package.gerber.files {
        println!("  {:<28} {:<18} {}", f.name, f.layer, f.size);
    }
    println!(
        "BOM: {} line(s), {} component(s), {} unique part(s)",
        package.bom.entries.len(),
        package.bom.total_components,
        package.bom.unique_parts
    );
    for e in &package.bom.entries {
        println!("  {:<3} x {:<10} {}", e.quantity, e.designator, e.description);
    }
}
