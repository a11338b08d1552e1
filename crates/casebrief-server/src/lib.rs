//! casebrief server
//!
//! HTTP service over the casebrief rule engines and record sinks.
//!
//! The router exposes:
//! - `/api/classify` for stateless risk and category previews
//! - `/api/documents/:id/analyze` to detect, classify and persist in one step
//! - `/api/risks` and `/api/categories` for direct record access

pub mod analysis;
pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use analysis::{analyze_document, render_report, DocumentAnalysis};
pub use config::ServerConfig;
pub use routes::{create_router, AppError};
pub use state::AppState;
