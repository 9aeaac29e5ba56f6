//! Full-grid dispatch of the stabilization kernel.
//!
//! Rows are the unit of parallel work. Each rayon task owns one row of both
//! output grids, so writes never overlap and results do not depend on
//! scheduling.

use mvstab_common::{StabError, StabResult};
use mvstab_field_model::{MotionField, TemporalParams, Vec2};
use rayon::prelude::*;

use crate::kernel::{stabilize_pixel, PixelOutcome};
use crate::stats::FrameStats;

/// Stabilize every pixel of `current` against `history` into `out`.
///
/// `current` and `history` must share dimensions; `out` is resized to
/// match `current` when it differs. `out` must not be `history`; the
/// borrow rules already forbid aliasing.
pub fn stabilize_into(
    current: &MotionField,
    history: &MotionField,
    params: &TemporalParams,
    out: &mut MotionField,
) -> FrameStats {
    debug_assert!(
        params.reset_history || current.same_dims(history),
        "history {:?} does not match current {:?}",
        history.dims(),
        current.dims()
    );

    let (width, height) = current.dims();
    if !out.same_dims(current) {
        *out = MotionField::filled(width, height, Vec2::ZERO, 0.0);
    }
    if width == 0 || height == 0 {
        return FrameStats::default();
    }

    let (motion_out, confidence_out) = out.grids_mut();
    let row_stats: Vec<FrameStats> = motion_out
        .as_mut_slice()
        .par_chunks_mut(width)
        .zip(confidence_out.as_mut_slice().par_chunks_mut(width))
        .enumerate()
        .map(|(y, (motion_row, confidence_row))| {
            let mut stats = FrameStats::default();
            for x in 0..width {
                let outcome = stabilize_pixel(current, history, params, x, y);
                motion_row[x] = outcome.motion;
                confidence_row[x] = outcome.confidence;
                stats.record(&outcome);
            }
            stats
        })
        .collect();

    row_stats
        .into_iter()
        .fold(FrameStats::default(), FrameStats::merge)
}

/// Checked variant of [`stabilize_into`] for callers that cannot
/// guarantee matching dimensions.
pub fn try_stabilize_into(
    current: &MotionField,
    history: &MotionField,
    params: &TemporalParams,
    out: &mut MotionField,
) -> StabResult<FrameStats> {
    if !params.reset_history && !current.same_dims(history) {
        return Err(StabError::processing(format!(
            "history is {:?} but current field is {:?}",
            history.dims(),
            current.dims()
        )));
    }
    Ok(stabilize_into(current, history, params, out))
}

/// Allocate an output field and stabilize into it.
pub fn stabilize(
    current: &MotionField,
    history: &MotionField,
    params: &TemporalParams,
) -> (MotionField, FrameStats) {
    let (width, height) = current.dims();
    let mut out = MotionField::filled(width, height, Vec2::ZERO, 0.0);
    let stats = stabilize_into(current, history, params, &mut out);
    (out, stats)
}

/// Copy `current` into `out` unchanged, as used while stabilization is
/// switched off.
pub fn passthrough_into(current: &MotionField, out: &mut MotionField) -> FrameStats {
    out.copy_from(current);
    let mut stats = FrameStats::default();
    for (motion, confidence) in current
        .motion()
        .as_slice()
        .iter()
        .zip(current.confidence().as_slice())
    {
        stats.record(&PixelOutcome::passthrough(*motion, *confidence));
    }
    stats
}
