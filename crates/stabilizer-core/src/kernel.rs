//! Per-pixel temporal stabilization of motion vectors.
//!
//! Each pixel is filtered independently:
//! 1. Build the component-wise min/max box of the current 3×3 motion
//!    neighborhood (edge-clamped).
//! 2. Reproject into the previous frame using the current vector.
//! 3. Pass the current value through untouched when history is reset or
//!    the reprojected sample lands off-screen.
//! 4. Otherwise bilinearly sample history, clamp it into the box, and blend
//!    with a step-function trust weight.
//! 5. Snap tiny results to zero to stop sub-pixel crawling.
//!
//! The kernel reads only the inputs it is handed and writes nothing; the
//! dispatcher decides where the result goes.

use mvstab_field_model::{lerp, Grid, MotionField, TemporalParams, Vec2};

/// Starting trust in history.
pub const BASE_HISTORY_TRUST: f32 = 0.94;

/// Deviation above which history trust drops to [`SOFT_DEVIATION_TRUST`].
pub const SOFT_DEVIATION: f32 = 2.0;
pub const SOFT_DEVIATION_TRUST: f32 = 0.8;

/// Deviation above which history trust drops to [`HARD_DEVIATION_TRUST`].
pub const HARD_DEVIATION: f32 = 10.0;
pub const HARD_DEVIATION_TRUST: f32 = 0.5;

/// Current confidence above which history trust is scaled down.
pub const HIGH_CURRENT_CONFIDENCE: f32 = 0.9;
pub const HIGH_CONFIDENCE_SCALE: f32 = 0.9;

/// History confidence below which history is discarded outright.
pub const LOW_HISTORY_CONFIDENCE: f32 = 0.2;

/// Blended vectors shorter than this (pixels) are forced to zero.
pub const DEADZONE: f32 = 0.1;

/// Axis-aligned box of plausible motion around a pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl MotionBounds {
    /// Degenerate box around a single vector.
    pub fn point(v: Vec2) -> Self {
        Self { min: v, max: v }
    }

    /// Grow the box to include `v`.
    pub fn include(&mut self, v: Vec2) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    /// Component-wise clamp of `v` into the box.
    pub fn clamp(&self, v: Vec2) -> Vec2 {
        v.clamp(self.min, self.max)
    }

    pub fn contains(&self, v: Vec2) -> bool {
        v.x >= self.min.x && v.x <= self.max.x && v.y >= self.min.y && v.y <= self.max.y
    }
}

/// Which policy decided a pixel's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelPath {
    /// History invalid or off-screen; output is the current value.
    Passthrough,
    /// History confidence too low; blend weight forced to zero.
    Discarded,
    /// History blended in with a non-zero weight.
    Blended,
}

/// Result of stabilizing one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelOutcome {
    pub motion: Vec2,
    pub confidence: f32,
    pub path: PixelPath,
    /// The blended vector was snapped to zero.
    pub deadzoned: bool,
}

impl PixelOutcome {
    pub(crate) fn passthrough(motion: Vec2, confidence: f32) -> Self {
        Self {
            motion,
            confidence,
            path: PixelPath::Passthrough,
            deadzoned: false,
        }
    }
}

/// Min/max box over the 3×3 neighborhood of `(x, y)` in `motion`.
///
/// Neighbors past the border reuse the nearest edge pixel.
pub fn neighborhood_bounds(motion: &Grid<Vec2>, x: usize, y: usize) -> MotionBounds {
    let (cx, cy) = (x as i64, y as i64);
    let mut bounds = MotionBounds::point(motion.load_clamped(cx, cy));
    for dy in -1..=1 {
        for dx in -1..=1 {
            bounds.include(motion.load_clamped(cx + dx, cy + dy));
        }
    }
    bounds
}

/// Normalized centre of pixel `(x, y)` and the texel size of a
/// `width × height` grid.
pub fn pixel_uv(x: usize, y: usize, width: usize, height: usize) -> (Vec2, Vec2) {
    let texel = Vec2::new(1.0 / width as f32, 1.0 / height as f32);
    let uv = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).mul_elem(texel);
    (uv, texel)
}

/// Previous-frame sampling position of pixel `(x, y)` moving by `motion`.
///
/// Motion points prev→curr, so the previous location is behind it.
pub fn reproject(x: usize, y: usize, width: usize, height: usize, motion: Vec2) -> Vec2 {
    let (uv, texel) = pixel_uv(x, y, width, height);
    uv - motion.mul_elem(texel)
}

/// Whether a reprojected coordinate lies inside `[0, 1]²`.
///
/// Exactly 0 or 1 counts as inside; NaN counts as outside.
pub fn on_screen(uv: Vec2) -> bool {
    (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y)
}

/// Trust placed in (clamped) history for one pixel.
///
/// The assignments are ordered overwrites, not a combination: the hard
/// deviation step replaces the soft one, the confidence scale applies to
/// whichever step won, and a low-confidence history zeroes everything.
pub fn history_trust(deviation: f32, current_confidence: f32, history_confidence: f32) -> f32 {
    let mut alpha = BASE_HISTORY_TRUST;
    if deviation > SOFT_DEVIATION {
        alpha = SOFT_DEVIATION_TRUST;
    }
    if deviation > HARD_DEVIATION {
        alpha = HARD_DEVIATION_TRUST;
    }
    if current_confidence > HIGH_CURRENT_CONFIDENCE {
        alpha *= HIGH_CONFIDENCE_SCALE;
    }
    if history_confidence < LOW_HISTORY_CONFIDENCE {
        alpha = 0.0;
    }
    alpha
}

/// Blend a current sample with its history sample.
///
/// `history_motion` is clamped into `bounds` before the deviation is
/// measured. Used once history is known to be valid.
pub fn blend(
    current_motion: Vec2,
    current_confidence: f32,
    bounds: &MotionBounds,
    history_motion: Vec2,
    history_confidence: f32,
) -> PixelOutcome {
    let clamped = bounds.clamp(history_motion);
    let deviation = (clamped - current_motion).length();
    let alpha = history_trust(deviation, current_confidence, history_confidence);

    let mut motion = Vec2::lerp(current_motion, clamped, alpha);
    let confidence = lerp(current_confidence, history_confidence, alpha);

    let deadzoned = motion.length() < DEADZONE;
    if deadzoned {
        motion = Vec2::ZERO;
    }

    PixelOutcome {
        motion,
        confidence,
        path: if alpha == 0.0 {
            PixelPath::Discarded
        } else {
            PixelPath::Blended
        },
        deadzoned,
    }
}

/// Stabilize pixel `(x, y)` of `current` against `history`.
///
/// `(x, y)` must lie inside `current`. History is only touched through the
/// reprojected bilinear sample, never indexed directly.
pub fn stabilize_pixel(
    current: &MotionField,
    history: &MotionField,
    params: &TemporalParams,
    x: usize,
    y: usize,
) -> PixelOutcome {
    let (width, height) = current.dims();
    let motion = current.motion();
    let current_motion = motion.load_clamped(x as i64, y as i64);
    let current_confidence = current.confidence().load_clamped(x as i64, y as i64);

    let bounds = neighborhood_bounds(motion, x, y);

    let history_uv = reproject(x, y, width, height, current_motion);
    if params.reset_history || history.motion().is_empty() || !on_screen(history_uv) {
        return PixelOutcome::passthrough(current_motion, current_confidence);
    }

    let history_motion = history.motion().sample_bilinear(history_uv.x, history_uv.y);
    let history_confidence = history
        .confidence()
        .sample_bilinear(history_uv.x, history_uv.y);

    blend(
        current_motion,
        current_confidence,
        &bounds,
        history_motion,
        history_confidence,
    )
}
