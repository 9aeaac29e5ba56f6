//! mvstab Core: Temporal Motion Stabilizer
//!
//! Filters a noisy per-pixel motion field against the previous frame's
//! stabilized output:
//! - **Kernel:** Neighborhood clamp, history reprojection, adaptive blend
//! - **Dispatch:** Row-parallel evaluation over a full field
//! - **History:** Double-buffered frame-to-frame driver
//! - **Stats:** Per-frame accounting of which policy each pixel took
//!
//! This crate is pure computation with no I/O and no GPU bindings.
//! All inputs are data; all outputs are data.

pub mod dispatch;
pub mod history;
pub mod kernel;
pub mod stats;

pub use dispatch::{stabilize, stabilize_into, try_stabilize_into};
pub use history::TemporalStabilizer;
pub use kernel::{stabilize_pixel, PixelOutcome, PixelPath};
pub use stats::FrameStats;
