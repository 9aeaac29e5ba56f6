//! Per-dispatch kernel constants.

use serde::{Deserialize, Serialize};

/// Constants shared by every pixel of one stabilization dispatch.
///
/// `history_weight`, `conf_influence` and `neighborhood_size` travel with
/// the dispatch for parity with the upstream constant layout; the blend
/// uses fixed trust weights and a 3×3 neighborhood and does not read them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalParams {
    /// History weight requested by the host, `[0, 0.99]` after sanitizing.
    pub history_weight: f32,

    /// Confidence influence requested by the host, `[0, 1]` after sanitizing.
    pub conf_influence: f32,

    /// Invalidate history for this dispatch (scene cut, teleport, restart).
    pub reset_history: bool,

    /// Neighborhood size requested by the host, `[1, 5]` after sanitizing.
    pub neighborhood_size: u32,
}

impl TemporalParams {
    pub const MAX_HISTORY_WEIGHT: f32 = 0.99;
    pub const MIN_NEIGHBORHOOD: u32 = 1;
    pub const MAX_NEIGHBORHOOD: u32 = 5;

    /// Low-flicker preset for content dominated by static text.
    pub fn text_preservation() -> Self {
        Self {
            history_weight: 0.05,
            conf_influence: 0.3,
            reset_history: false,
            neighborhood_size: 1,
        }
    }

    /// Copy with every reserved value clamped into its valid range.
    ///
    /// NaN weights sanitize to zero.
    pub fn sanitized(self) -> Self {
        Self {
            history_weight: clamp_or_zero(self.history_weight, 0.0, Self::MAX_HISTORY_WEIGHT),
            conf_influence: clamp_or_zero(self.conf_influence, 0.0, 1.0),
            reset_history: self.reset_history,
            neighborhood_size: self
                .neighborhood_size
                .clamp(Self::MIN_NEIGHBORHOOD, Self::MAX_NEIGHBORHOOD),
        }
    }

    /// Copy with `reset_history` set.
    pub fn with_reset(self, reset_history: bool) -> Self {
        Self {
            reset_history,
            ..self
        }
    }
}

impl Default for TemporalParams {
    fn default() -> Self {
        Self {
            history_weight: 0.2,
            conf_influence: 0.6,
            reset_history: false,
            neighborhood_size: 2,
        }
    }
}

fn clamp_or_zero(value: f32, lo: f32, hi: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(lo, hi)
}
