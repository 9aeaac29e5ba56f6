//! Double-buffered history for running the stabilizer frame after frame.
//!
//! Two slots alternate roles: one holds the previous frame's output (read
//! as history), the other receives this frame's output. After a frame the
//! roles swap, so the filter has exactly one frame of memory.

use mvstab_field_model::{FrameInputs, MotionField, TemporalParams, Vec2};

use crate::dispatch::{passthrough_into, stabilize_into};
use crate::stats::FrameStats;

/// Frame-loop driver owning the history slots.
#[derive(Debug)]
pub struct TemporalStabilizer {
    slots: [MotionField; 2],
    read_index: usize,
    history_valid: bool,
    enabled: bool,
    params: TemporalParams,
    frames_processed: u64,
    last_stats: Option<FrameStats>,
}

impl TemporalStabilizer {
    /// Create a driver with the given base parameters.
    pub fn new(params: TemporalParams) -> Self {
        Self {
            slots: [empty_field(), empty_field()],
            read_index: 0,
            history_valid: false,
            enabled: true,
            params: params.sanitized(),
            frames_processed: 0,
            last_stats: None,
        }
    }

    /// Driver with default parameters.
    pub fn with_defaults() -> Self {
        Self::new(TemporalParams::default())
    }

    /// Stabilize one frame and return its output.
    ///
    /// The returned field becomes the history of the next call.
    pub fn process(&mut self, current: &MotionField) -> &MotionField {
        self.process_frame(FrameInputs::motion_only(current))
    }

    /// Stabilize one frame given its full input set.
    pub fn process_frame(&mut self, inputs: FrameInputs<'_>) -> &MotionField {
        let current = inputs.current;
        if !self.slots[0].same_dims(current) {
            let (width, height) = current.dims();
            tracing::info!(
                width,
                height,
                previous = ?self.slots[0].dims(),
                "Resizing temporal history"
            );
            self.slots = [
                MotionField::filled(width, height, Vec2::ZERO, 0.0),
                MotionField::filled(width, height, Vec2::ZERO, 0.0),
            ];
            self.read_index = 0;
            self.history_valid = false;
        }

        let write_index = 1 - self.read_index;

        let stats = if self.enabled {
            let reset = self.params.reset_history || !self.history_valid;
            if reset {
                tracing::debug!(frame = self.frames_processed, "History invalid, passing through");
            }
            let params = self.params.with_reset(reset);
            let (history, out) = split_slots(&mut self.slots, self.read_index);
            let stats = stabilize_into(current, history, &params, out);
            self.history_valid = true;
            stats
        } else {
            let stats = passthrough_into(current, &mut self.slots[write_index]);
            self.history_valid = false;
            stats
        };

        self.read_index = write_index;
        tracing::debug!(
            frame = self.frames_processed,
            blended = stats.blended,
            discarded = stats.discarded,
            passthrough = stats.passthrough,
            deadzoned = stats.deadzoned,
            avg_motion = stats.avg_motion_length(),
            luma = inputs.luma.is_some(),
            "Stabilized frame"
        );
        self.frames_processed += 1;
        self.last_stats = Some(stats);

        &self.slots[self.read_index]
    }

    /// Invalidate history; the next frame passes through unchanged.
    ///
    /// Use on scene cuts, camera teleports, capture restarts, or when the
    /// source frame pair changes.
    pub fn reset(&mut self) {
        if self.history_valid {
            tracing::debug!(frame = self.frames_processed, "Temporal history reset");
        }
        self.history_valid = false;
        self.read_index = 0;
    }

    /// Turn stabilization on or off. Turning it off drops history.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.history_valid = false;
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace the base parameters (stored sanitized).
    pub fn set_params(&mut self, params: TemporalParams) {
        self.params = params.sanitized();
    }

    pub fn params(&self) -> &TemporalParams {
        &self.params
    }

    /// Whether the next frame will blend against history.
    pub fn is_history_valid(&self) -> bool {
        self.history_valid && !self.params.reset_history
    }

    /// The field the next frame will read as history, if any.
    pub fn history(&self) -> Option<&MotionField> {
        self.history_valid.then(|| &self.slots[self.read_index])
    }

    /// Statistics of the most recent frame.
    pub fn last_stats(&self) -> Option<&FrameStats> {
        self.last_stats.as_ref()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}

impl Default for TemporalStabilizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn empty_field() -> MotionField {
    MotionField::filled(0, 0, Vec2::ZERO, 0.0)
}

/// Borrow the history slot immutably and the other slot mutably.
fn split_slots(
    slots: &mut [MotionField; 2],
    read_index: usize,
) -> (&MotionField, &mut MotionField) {
    let (first, second) = slots.split_at_mut(1);
    if read_index == 0 {
        (&first[0], &mut second[0])
    } else {
        (&second[0], &mut first[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvstab_field_model::Grid;

    fn moving(width: usize, height: usize, motion: Vec2, confidence: f32) -> MotionField {
        MotionField::filled(width, height, motion, confidence)
    }

    #[test]
    fn test_first_frame_passes_through() {
        let mut stab = TemporalStabilizer::with_defaults();
        let frame = moving(8, 8, Vec2::new(0.5, 0.0), 0.6);
        let out = stab.process(&frame).clone();
        assert_eq!(out, frame);
        assert_eq!(stab.last_stats().unwrap().passthrough, 64);
        assert!(stab.is_history_valid());
    }

    #[test]
    fn test_second_frame_blends_history() {
        let mut stab = TemporalStabilizer::with_defaults();
        stab.process(&moving(8, 8, Vec2::new(1.0, 0.0), 0.8));
        let out = stab.process(&moving(8, 8, Vec2::new(1.0, 0.0), 0.8)).clone();
        let stats = *stab.last_stats().unwrap();
        // column 0 reprojects off-screen
        assert_eq!(stats.passthrough, 8);
        assert_eq!(stats.blended, 56);
        assert_eq!(out.pixel(4, 4), Some((Vec2::new(1.0, 0.0), 0.8)));
    }

    #[test]
    fn test_reset_forces_passthrough() {
        let mut stab = TemporalStabilizer::with_defaults();
        stab.process(&moving(4, 4, Vec2::ZERO, 1.0));
        stab.reset();
        assert!(!stab.is_history_valid());
        assert!(stab.history().is_none());
        let frame = moving(4, 4, Vec2::new(0.05, 0.0), 0.5);
        let out = stab.process(&frame).clone();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_reset_param_forces_passthrough_every_frame() {
        let mut stab = TemporalStabilizer::new(TemporalParams::default().with_reset(true));
        for _ in 0..3 {
            let frame = moving(4, 4, Vec2::new(0.05, 0.0), 0.5);
            assert_eq!(stab.process(&frame), &frame);
        }
        assert!(!stab.is_history_valid());
    }

    #[test]
    fn test_resize_invalidates_history() {
        let mut stab = TemporalStabilizer::with_defaults();
        stab.process(&moving(4, 4, Vec2::ZERO, 1.0));
        stab.process(&moving(4, 4, Vec2::ZERO, 1.0));
        let frame = moving(6, 3, Vec2::new(0.05, 0.05), 0.3);
        let out = stab.process(&frame).clone();
        assert_eq!(out, frame);
        assert_eq!(stab.history().unwrap().dims(), (6, 3));
    }

    #[test]
    fn test_disabled_passes_through_and_drops_history() {
        let mut stab = TemporalStabilizer::with_defaults();
        stab.process(&moving(4, 4, Vec2::ZERO, 1.0));
        stab.set_enabled(false);
        let frame = moving(4, 4, Vec2::new(0.05, 0.0), 0.5);
        assert_eq!(stab.process(&frame), &frame);
        assert!(stab.history().is_none());

        stab.set_enabled(true);
        let frame = moving(4, 4, Vec2::new(0.07, 0.0), 0.4);
        // first enabled frame after a pause has no history to blend with
        assert_eq!(stab.process(&frame), &frame);
        assert_eq!(stab.frames_processed(), 3);
    }

    #[test]
    fn test_history_is_previous_output() {
        let mut stab = TemporalStabilizer::with_defaults();
        let first = stab.process(&moving(5, 5, Vec2::new(0.5, 0.5), 0.7)).clone();
        assert_eq!(stab.history(), Some(&first));

        let current = MotionField::new(
            Grid::new(5, 5, Vec2::new(0.6, 0.5)),
            Grid::new(5, 5, 0.7),
        )
        .unwrap();
        let second = stab.process(&current).clone();
        assert_eq!(stab.history(), Some(&second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_params_are_sanitized() {
        let mut stab = TemporalStabilizer::with_defaults();
        stab.set_params(TemporalParams {
            history_weight: 4.0,
            neighborhood_size: 99,
            ..Default::default()
        });
        assert_eq!(stab.params().history_weight, TemporalParams::MAX_HISTORY_WEIGHT);
        assert_eq!(stab.params().neighborhood_size, TemporalParams::MAX_NEIGHBORHOOD);
    }

    #[test]
    fn test_luma_inputs_do_not_change_output() {
        let frame = moving(4, 4, Vec2::new(0.3, 0.0), 0.6);
        let luma_prev = Grid::new(4, 4, 0.2);
        let luma_curr = Grid::new(4, 4, 0.9);

        let mut plain = TemporalStabilizer::with_defaults();
        let mut with_luma = TemporalStabilizer::with_defaults();
        for _ in 0..3 {
            let inputs = FrameInputs::with_luma(&frame, &luma_prev, &luma_curr).unwrap();
            let a = plain.process(&frame).clone();
            let b = with_luma.process_frame(inputs).clone();
            assert_eq!(a, b);
        }
    }
}
