//! Per-frame stabilization statistics.

use crate::kernel::{PixelOutcome, PixelPath};

/// Counts of which policy each pixel took, plus output magnitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub total_pixels: u64,
    pub passthrough: u64,
    pub discarded: u64,
    pub blended: u64,
    /// Blended or discarded pixels snapped to zero motion.
    pub deadzoned: u64,
    /// Pixels whose output motion is non-zero.
    pub moving: u64,
    pub max_motion_length: f32,
    sum_motion_length: f64,
    sum_confidence: f64,
}

impl FrameStats {
    /// Account for one pixel.
    pub fn record(&mut self, outcome: &PixelOutcome) {
        self.total_pixels += 1;
        match outcome.path {
            PixelPath::Passthrough => self.passthrough += 1,
            PixelPath::Discarded => self.discarded += 1,
            PixelPath::Blended => self.blended += 1,
        }
        if outcome.deadzoned {
            self.deadzoned += 1;
        }

        let length = outcome.motion.length();
        if length > 0.0 {
            self.moving += 1;
        }
        self.max_motion_length = self.max_motion_length.max(length);
        self.sum_motion_length += length as f64;
        self.sum_confidence += outcome.confidence as f64;
    }

    /// Combine partial statistics (e.g. per row) into one.
    pub fn merge(mut self, other: FrameStats) -> FrameStats {
        self.total_pixels += other.total_pixels;
        self.passthrough += other.passthrough;
        self.discarded += other.discarded;
        self.blended += other.blended;
        self.deadzoned += other.deadzoned;
        self.moving += other.moving;
        self.max_motion_length = self.max_motion_length.max(other.max_motion_length);
        self.sum_motion_length += other.sum_motion_length;
        self.sum_confidence += other.sum_confidence;
        self
    }

    pub fn avg_motion_length(&self) -> f32 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        (self.sum_motion_length / self.total_pixels as f64) as f32
    }

    pub fn avg_confidence(&self) -> f32 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        (self.sum_confidence / self.total_pixels as f64) as f32
    }

    /// Fraction of pixels that used history at all.
    pub fn history_coverage(&self) -> f32 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.blended as f32 / self.total_pixels as f32
    }

    /// Fraction of pixels with non-zero output motion.
    pub fn motion_coverage(&self) -> f32 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.moving as f32 / self.total_pixels as f32
    }
}
