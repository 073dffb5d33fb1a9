//! The fund-transparency report: the pure aggregation engine, the charts,
//! the page, and the CSV export.

mod charts;
pub mod engine;
mod export;
mod handlers;
mod view;

pub use export::get_transparency_export;
pub use handlers::{ReportQuery, ReportState, get_transparency_page};
