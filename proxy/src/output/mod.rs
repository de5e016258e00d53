mod output_event;
mod output_metrics;
mod snapshot;

pub use output_event::OutputEvent;
pub use output_metrics::{OutputMetrics, OutputPhase};
pub use snapshot::{OutputGeometry, OutputMode, OutputSnapshot};
