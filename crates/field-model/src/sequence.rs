//! JSON documents holding a sequence of motion fields.
//!
//! Layout:
//!
//! ```json
//! { "width": 2, "height": 1,
//!   "frames": [ { "motion": [[0.5, 0.0], [1.0, 0.0]], "confidence": [1.0, 0.8] } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::field::MotionField;
use crate::grid::{pixel_count, Grid};
use crate::vector::Vec2;

/// One serialized frame: row-major motion and confidence values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub motion: Vec<Vec2>,
    pub confidence: Vec<f32>,
}

/// A multi-frame field document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSequence {
    pub width: usize,
    pub height: usize,
    pub frames: Vec<FrameRecord>,
}

impl FieldSequence {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
        }
    }

    /// Append a field. It must match the sequence dimensions.
    pub fn push(&mut self, field: &MotionField) -> Result<(), FieldError> {
        if field.dims() != (self.width, self.height) {
            return Err(FieldError::DimensionMismatch {
                left: (self.width, self.height),
                right: field.dims(),
            });
        }
        self.frames.push(FrameRecord {
            motion: field.motion().as_slice().to_vec(),
            confidence: field.confidence().as_slice().to_vec(),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Check the declared dimensions and every frame against them.
    pub fn validate(&self) -> Result<(), FieldError> {
        let expected = pixel_count(self.width, self.height)?;
        for (index, frame) in self.frames.iter().enumerate() {
            if frame.motion.len() != expected {
                return Err(FieldError::InvalidFrame {
                    index,
                    message: format!(
                        "motion has {} values, expected {expected}",
                        frame.motion.len()
                    ),
                });
            }
            if frame.confidence.len() != expected {
                return Err(FieldError::InvalidFrame {
                    index,
                    message: format!(
                        "confidence has {} values, expected {expected}",
                        frame.confidence.len()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Materialize frame `index` as a [`MotionField`].
    pub fn field(&self, index: usize) -> Result<MotionField, FieldError> {
        let frame = self.frames.get(index).ok_or_else(|| FieldError::InvalidFrame {
            index,
            message: format!("sequence has only {} frames", self.frames.len()),
        })?;
        let motion = Grid::from_vec(self.width, self.height, frame.motion.clone())?;
        let confidence = Grid::from_vec(self.width, self.height, frame.confidence.clone())?;
        MotionField::new(motion, confidence)
    }

    /// Materialize every frame.
    pub fn fields(&self) -> Result<Vec<MotionField>, FieldError> {
        (0..self.frames.len()).map(|i| self.field(i)).collect()
    }
}

/// Parse a field sequence document. Frame lengths are checked by
/// [`FieldSequence::validate`].
pub fn parse_sequence(json: &str) -> Result<FieldSequence, serde_json::Error> {
    serde_json::from_str(json)
}
