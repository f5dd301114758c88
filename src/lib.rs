mod averaging;
mod blob;
mod compression;
mod config;
mod error;
mod pipeline;
mod score;
mod types;

pub use averaging::{WindowAverager, WindowEdges};
pub use compression::{CompressedSeries, MIN_SERIES_LEN, SwingingDoor};
pub use config::RampConfig;
pub use error::{RampError, Result};
pub use pipeline::{RampReport, evaluate};
pub use score::{ramp_score, trapezoid};
pub use types::{ArchivedPoint, CompressionStats, Snapshot, WindowedSeries};
