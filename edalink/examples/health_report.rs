//! Health report example: run the analysis service on the demo board and
//! print the findings.

use edalink::prelude::*;

#[tokio::main]
async fn main() -> Result<(), ConnectorError> {
    let board_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEMO_BOARD_ID.to_string());

    let connector = create_connector(&ConnectorConfig::mock().with_seed(7));
    connector.initialize().await?;
    let service = DesignAnalysisService::new(connector.clone());

    let report = service.health_report(&board_id).await?;

    println!("Health report for: {} ({})", report.board.name, report.board.id);
    println!("Routing completion: {}%", report.board.routing_completion);
    println!(
        "DRC: {} errors, {} warnings",
        report.drc.error_count, report.drc.warning_count
    );
    println!(
        "Signal integrity: {}/{} nets passed",
        report.signal_integrity.passed, report.signal_integrity.nets_analyzed
    );
    println!();

    println!("Recommendations:");
    for line in &report.recommendations {
        println!("  - {}", line);
    }

    if report.drc.error_count > 0 {
        println!("\nBoard is not ready for manufacturing.");
        std::process::exit(1);
    }

    let package = service
        .manufacturing_export(&board_id, GerberOptions::default(), BomOptions::grouped())
        .await?;
    println!(
        "\nExported {} Gerber files ({} bytes) and {} BOM lines.",
        package.gerber.files.len(),
        package.gerber.total_size,
        package.bom.entries.len()
    );
    Ok(())
}
