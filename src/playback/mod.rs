//! Clock, metrics, interpolation and signal resolution for one playback.
//!
//! Everything except [`PlaybackSession`] and [`FrameTimer`] is a pure
//! function of the store and the current virtual time.

pub mod clock;
pub mod interpolation;
pub mod metrics;
pub mod session;
pub mod signals;
pub mod timing;

pub use clock::*;
pub use interpolation::*;
pub use metrics::*;
pub use session::*;
pub use signals::*;
pub use timing::*;
