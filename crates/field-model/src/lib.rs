//! mvstab Field Model
//!
//! Defines the data contracts shared by the stabilizer and its drivers:
//! - **Vectors:** Per-pixel motion vectors in pixel units
//! - **Grids:** Row-major per-pixel storage with edge-clamped addressing
//! - **Fields:** Paired motion + confidence grids for one frame
//! - **Params:** Per-dispatch kernel constants
//! - **Sequences:** JSON documents holding multi-frame field data
//!
//! Motion vectors point from a surface's previous-frame position to its
//! current-frame position. Sampling coordinates are normalized to
//! `[0.0, 1.0]` with texel centres at `(i + 0.5) / size`.

pub mod error;
pub mod field;
pub mod grid;
pub mod params;
pub mod sequence;
pub mod vector;

pub use error::*;
pub use field::*;
pub use grid::*;
pub use params::*;
pub use sequence::*;
pub use vector::*;
