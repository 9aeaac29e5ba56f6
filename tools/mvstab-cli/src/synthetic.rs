//! Synthetic motion field sequences with known ground truth.
//!
//! A rectangle slides across a static background. Every observed frame is
//! the ground truth plus seeded noise, confidence jitter, and a sprinkle of
//! low-confidence outliers, so the same seed always yields the same run.

use mvstab_field_model::{MotionField, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Parameters of a synthetic scene.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub width: usize,
    pub height: usize,
    pub frames: usize,
    pub seed: u64,
    /// Per-component motion noise amplitude, in pixels.
    pub noise: f32,
    /// Rectangle velocity, in pixels per frame.
    pub velocity: Vec2,
    /// First frame of a second shot.
    pub cut_at: Option<usize>,
    /// Probability that a pixel is replaced by a bogus low-confidence vector.
    pub outlier_rate: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 36,
            frames: 30,
            seed: 7,
            noise: 0.35,
            velocity: Vec2::new(3.0, 0.0),
            cut_at: None,
            outlier_rate: 0.02,
        }
    }
}

/// One generated frame.
#[derive(Debug, Clone)]
pub struct SyntheticFrame {
    pub index: usize,
    pub observed: MotionField,
    pub truth: MotionField,
    /// True on the first frame of a new shot.
    pub scene_cut: bool,
}

/// Deterministic frame source for a [`SceneConfig`].
pub struct SceneGenerator {
    config: SceneConfig,
    rng: ChaCha8Rng,
    next_index: usize,
}

impl SceneGenerator {
    pub fn new(config: SceneConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            next_index: 0,
        }
    }

    fn shot_start(&self, index: usize) -> usize {
        match self.config.cut_at {
            Some(cut) if index >= cut => cut,
            _ => 0,
        }
    }

    /// Noise-free motion for frame `index`.
    pub fn truth(&self, index: usize) -> MotionField {
        let SceneConfig {
            width,
            height,
            velocity,
            ..
        } = self.config;

        let shot_start = self.shot_start(index);
        let second_shot = shot_start > 0;
        let local = (index - shot_start) as f32;

        let (start_x, start_y) = if second_shot {
            (width as f32 * 0.6, height as f32 * 0.5)
        } else {
            (width as f32 * 0.1, height as f32 * 0.25)
        };
        let origin_x = (start_x + velocity.x * local).rem_euclid(width.max(1) as f32);
        let origin_y = (start_y + velocity.y * local).rem_euclid(height.max(1) as f32);

        let block_w = (width / 4).max(1) as f32;
        let block_h = (height / 4).max(1) as f32;
        // the second shot pans the camera against the object
        let background = if second_shot {
            velocity * -0.5
        } else {
            Vec2::ZERO
        };

        MotionField::from_fn(width, height, |x, y| {
            let dx = (x as f32 - origin_x.floor()).rem_euclid(width as f32);
            let dy = (y as f32 - origin_y.floor()).rem_euclid(height as f32);
            if dx < block_w && dy < block_h {
                (velocity, 0.85)
            } else {
                (background, 0.7)
            }
        })
    }

    fn observe(&mut self, truth: &MotionField) -> MotionField {
        let noise = self.config.noise;
        let outlier_rate = self.config.outlier_rate.clamp(0.0, 1.0);
        let rng = &mut self.rng;

        let (width, height) = truth.dims();
        let mut values = Vec::with_capacity(width * height);
        for (motion, confidence) in truth
            .motion()
            .as_slice()
            .iter()
            .zip(truth.confidence().as_slice())
        {
            if rng.random_bool(outlier_rate) {
                let bogus = Vec2::new(rng.random_range(-8.0..8.0), rng.random_range(-8.0..8.0));
                values.push((bogus, rng.random_range(0.0..0.15)));
                continue;
            }
            let jitter = Vec2::new(gaussianish(rng), gaussianish(rng)) * noise;
            let conf = (confidence + rng.random_range(-0.15..0.15)).clamp(0.0, 1.0);
            values.push((*motion + jitter, conf));
        }

        MotionField::from_fn(width, height, |x, y| values[y * width + x])
    }
}

impl Iterator for SceneGenerator {
    type Item = SyntheticFrame;

    fn next(&mut self) -> Option<SyntheticFrame> {
        let index = self.next_index;
        if index >= self.config.frames {
            return None;
        }
        self.next_index += 1;

        let truth = self.truth(index);
        let observed = self.observe(&truth);
        Some(SyntheticFrame {
            index,
            observed,
            truth,
            scene_cut: index > 0 && self.config.cut_at == Some(index),
        })
    }
}

/// Irwin-Hall approximation of a unit-variance normal sample.
fn gaussianish(rng: &mut impl Rng) -> f32 {
    (0..3).map(|_| rng.random_range(-1.0f32..1.0)).sum()
}

/// Mean per-pixel distance between the motion of two same-sized fields.
pub fn mean_motion_error(a: &MotionField, b: &MotionField) -> f32 {
    let n = a.motion().len().min(b.motion().len());
    if n == 0 {
        return 0.0;
    }
    let total: f64 = a
        .motion()
        .as_slice()
        .iter()
        .zip(b.motion().as_slice())
        .map(|(p, q)| (*p - *q).length() as f64)
        .sum();
    (total / n as f64) as f32
}
