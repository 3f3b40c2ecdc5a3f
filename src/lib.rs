pub mod compare;
pub mod config;
pub mod data;
pub mod error;
pub mod playback;
pub mod scene;

pub use compare::ComparisonView;
pub use config::{Approach, PlaybackConfig, RoadDirections, SignalTiming, Validate};
pub use data::{TrajectoryStore, VehicleTrajectory};
pub use error::PayloadError;
pub use playback::{Frame, MetricsSnapshot, PlaybackClock, PlaybackSession, SignalColor};
