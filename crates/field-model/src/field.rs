//! Per-frame motion fields.

use crate::error::FieldError;
use crate::grid::Grid;
use crate::vector::Vec2;

/// Motion vectors plus per-pixel confidence for one frame.
///
/// Both grids always share the same dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionField {
    motion: Grid<Vec2>,
    confidence: Grid<f32>,
}

impl MotionField {
    /// Pair a motion grid with its confidence grid.
    pub fn new(motion: Grid<Vec2>, confidence: Grid<f32>) -> Result<Self, FieldError> {
        if motion.dims() != confidence.dims() {
            return Err(FieldError::DimensionMismatch {
                left: motion.dims(),
                right: confidence.dims(),
            });
        }
        Ok(Self { motion, confidence })
    }

    /// Uniform field: every pixel gets `motion` and `confidence`.
    pub fn filled(width: usize, height: usize, motion: Vec2, confidence: f32) -> Self {
        Self {
            motion: Grid::new(width, height, motion),
            confidence: Grid::new(width, height, confidence),
        }
    }

    /// Build a field by evaluating `f(x, y) -> (motion, confidence)`.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> (Vec2, f32),
    ) -> Self {
        let capacity = width.saturating_mul(height);
        let mut motion = Vec::with_capacity(capacity);
        let mut confidence = Vec::with_capacity(capacity);
        for y in 0..height {
            for x in 0..width {
                let (m, c) = f(x, y);
                motion.push(m);
                confidence.push(c);
            }
        }
        Self {
            motion: Grid::from_raw(width, height, motion),
            confidence: Grid::from_raw(width, height, confidence),
        }
    }

    pub fn width(&self) -> usize {
        self.motion.width()
    }

    pub fn height(&self) -> usize {
        self.motion.height()
    }

    pub fn dims(&self) -> (usize, usize) {
        self.motion.dims()
    }

    pub fn same_dims(&self, other: &MotionField) -> bool {
        self.dims() == other.dims()
    }

    pub fn motion(&self) -> &Grid<Vec2> {
        &self.motion
    }

    pub fn confidence(&self) -> &Grid<f32> {
        &self.confidence
    }

    /// `(motion, confidence)` at `(x, y)`, or `None` outside the field.
    pub fn pixel(&self, x: usize, y: usize) -> Option<(Vec2, f32)> {
        Some((self.motion.get(x, y)?, self.confidence.get(x, y)?))
    }

    /// Mutable access to both grids at once, for writers that fill rows in
    /// lockstep.
    pub fn grids_mut(&mut self) -> (&mut Grid<Vec2>, &mut Grid<f32>) {
        (&mut self.motion, &mut self.confidence)
    }

    /// Copy `other` into `self`, resizing when dimensions differ.
    pub fn copy_from(&mut self, other: &MotionField) {
        self.motion.copy_from(&other.motion);
        self.confidence.copy_from(&other.confidence);
    }
}

/// The luminance references of one dispatch.
///
/// Carried alongside the motion input but not consumed by the current
/// blend.
#[derive(Debug, Clone, Copy)]
pub struct LumaPair<'a> {
    pub prev: &'a Grid<f32>,
    pub curr: &'a Grid<f32>,
}

/// Borrowed inputs of one stabilization dispatch.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub current: &'a MotionField,
    pub luma: Option<LumaPair<'a>>,
}

impl<'a> FrameInputs<'a> {
    /// Inputs without luminance references.
    pub fn motion_only(current: &'a MotionField) -> Self {
        Self {
            current,
            luma: None,
        }
    }

    /// Inputs with luminance references; both must match the motion dims.
    pub fn with_luma(
        current: &'a MotionField,
        prev: &'a Grid<f32>,
        curr: &'a Grid<f32>,
    ) -> Result<Self, FieldError> {
        for luma in [prev, curr] {
            if luma.dims() != current.dims() {
                return Err(FieldError::DimensionMismatch {
                    left: current.dims(),
                    right: luma.dims(),
                });
            }
        }
        Ok(Self {
            current,
            luma: Some(LumaPair { prev, curr }),
        })
    }
}
