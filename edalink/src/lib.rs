//! EdaLink - mock-first PCB design connector and analysis service
//!
//! This library models a PCB design backend (projects, boards, components,
//! nets, routing, design rules) behind the [`EdaConnector`] trait, and
//! composes connector calls into design reports with
//! [`DesignAnalysisService`].
//!
//! # Quick Start
//!
//! ```no_run
//! use edalink::prelude::*;
//!
//! # async fn run() -> Result<(), ConnectorError> {
//! let connector = create_connector(&ConnectorConfig::mock().with_seed(7));
//! connector.initialize().await?;
//!
//! let service = DesignAnalysisService::new(connector.clone());
//! let report = service.health_report(DEMO_BOARD_ID).await?;
//! for line in &report.recommendations {
//!     println!("- {}", line);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Mock connector**: in-memory store with a demo project, DRC, auto-router,
//!   signal integrity and manufacturing exports
//! - **Live connector**: credential-checked stub for a real EDA backend
//! - **Analysis**: placement density, routing coverage, aggregated health report
//! - **Reproducible**: stochastic figures come from an injectable random source

pub mod analysis;
pub mod config;
pub mod connector;
pub mod core;
pub mod schema;

// Re-export main types
pub use analysis::{
    BoardSummary, DesignAnalysisService, HealthReport, ManufacturingPackage, PlacementAnalysis,
    RoutingAnalysis,
};
pub use config::{ConfigError, ConnectorConfig, ConnectorMode};
pub use connector::{
    create_connector, BoardStore, EdaConnector, LiveEdaConnector, MockEdaConnector, RandomSource,
    ScriptedRandom, DEMO_BOARD_ID, DEMO_PROJECT_ID,
};
pub use core::{ConnectorError, ConnectorResult, Envelope, ErrorCode, Page, Pagination};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::schema::*;
    pub use crate::{
        create_connector, ConnectorConfig, ConnectorError, ConnectorMode, ConnectorResult,
        DesignAnalysisService, EdaConnector, Envelope, ErrorCode, MockEdaConnector, Page, Pagination,
        DEMO_BOARD_ID, DEMO_PROJECT_ID,
    };
}
