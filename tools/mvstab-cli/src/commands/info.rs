//! Show field sequence information.

use std::path::PathBuf;

use mvstab_field_model::MotionField;

use crate::synthetic::mean_motion_error;

pub fn run(input: PathBuf) -> anyhow::Result<()> {
    let sequence = super::load_sequence(&input)?;
    let fields = sequence.fields()?;

    println!("Sequence: {}", input.display());
    println!("  Resolution: {}x{}", sequence.width, sequence.height);
    println!("  Frames: {}", fields.len());
    println!();

    let mut previous: Option<&MotionField> = None;
    for (index, field) in fields.iter().enumerate() {
        let summary = FieldSummary::of(field);
        let change = previous
            .map(|p| format!("{:.3}", mean_motion_error(p, field)))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  frame {:>3}: |motion| avg {:.3} max {:.3}  confidence avg {:.3}  static {:>5.1}%  change {}",
            index,
            summary.avg_length,
            summary.max_length,
            summary.avg_confidence,
            summary.static_fraction * 100.0,
            change
        );
        previous = Some(field);
    }

    Ok(())
}

struct FieldSummary {
    avg_length: f32,
    max_length: f32,
    avg_confidence: f32,
    static_fraction: f32,
}

impl FieldSummary {
    fn of(field: &MotionField) -> Self {
        let n = field.motion().len().max(1) as f64;
        let mut sum_length = 0.0f64;
        let mut max_length = 0.0f32;
        let mut zero = 0usize;
        for m in field.motion().as_slice() {
            let length = m.length();
            sum_length += length as f64;
            max_length = max_length.max(length);
            if length == 0.0 {
                zero += 1;
            }
        }
        let sum_confidence: f64 = field
            .confidence()
            .as_slice()
            .iter()
            .map(|c| *c as f64)
            .sum();

        Self {
            avg_length: (sum_length / n) as f32,
            max_length,
            avg_confidence: (sum_confidence / n) as f32,
            static_fraction: (zero as f64 / n) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvstab_field_model::Vec2;

    #[test]
    fn test_summary_of_mixed_field() {
        let field = MotionField::from_fn(2, 2, |x, _| {
            if x == 0 {
                (Vec2::ZERO, 0.5)
            } else {
                (Vec2::new(3.0, 4.0), 1.0)
            }
        });
        let summary = FieldSummary::of(&field);
        assert!((summary.avg_length - 2.5).abs() < 1e-6);
        assert_eq!(summary.max_length, 5.0);
        assert!((summary.avg_confidence - 0.75).abs() < 1e-6);
        assert!((summary.static_fraction - 0.5).abs() < 1e-6);
    }
}
