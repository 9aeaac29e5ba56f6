//! Owned per-pixel grids in row-major layout.

use crate::error::FieldError;
use crate::vector::{lerp, Vec2};

/// Values that can be linearly filtered by [`Grid::sample_bilinear`].
pub trait Texel: Copy {
    fn mix(a: Self, b: Self, t: f32) -> Self;
}

impl Texel for f32 {
    #[inline]
    fn mix(a: f32, b: f32, t: f32) -> f32 {
        lerp(a, b, t)
    }
}

impl Texel for Vec2 {
    #[inline]
    fn mix(a: Vec2, b: Vec2, t: f32) -> Vec2 {
        Vec2::lerp(a, b, t)
    }
}

/// Number of pixels in a `width × height` grid, or an error when the
/// product does not fit in `usize`.
pub fn pixel_count(width: usize, height: usize) -> Result<usize, FieldError> {
    width
        .checked_mul(height)
        .ok_or(FieldError::TooLarge { width, height })
}

/// A `width × height` grid with one value per pixel (stride == width).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Grid of the given size with every pixel set to `fill`.
    ///
    /// Panics like `Vec` does on capacity overflow when `width * height`
    /// does not fit in `usize`; use [`Grid::from_vec`] for untrusted sizes.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width.saturating_mul(height)],
        }
    }

    /// Wrap existing row-major data.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, FieldError> {
        let expected = pixel_count(width, height)?;
        if data.len() != expected {
            return Err(FieldError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(Some(data.len()), width.checked_mul(height));
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel.
    ///
    /// Same overflow behaviour as [`Grid::new`].
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Value at `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.idx(x, y)])
    }

    /// Point load with edge-clamped addressing.
    ///
    /// Coordinates outside the grid reuse the nearest border pixel. The
    /// grid must not be empty.
    #[inline]
    pub fn load_clamped(&self, x: i64, y: i64) -> T {
        let cx = x.clamp(0, self.width as i64 - 1) as usize;
        let cy = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[self.idx(cx, cy)]
    }

    /// Overwrite the value at `(x, y)`. Returns `false` outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.idx(x, y);
        self.data[i] = value;
        true
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.data.chunks(self.width.max(1))
    }

    /// Copy `other` into `self`, resizing when dimensions differ.
    pub fn copy_from(&mut self, other: &Grid<T>) {
        self.width = other.width;
        self.height = other.height;
        self.data.clear();
        self.data.extend_from_slice(&other.data);
    }
}

impl<T: Texel> Grid<T> {
    /// Bilinear sample at normalized `(u, v)` with clamp addressing.
    ///
    /// Texel centres sit at `(i + 0.5) / size`. Both taps on each axis are
    /// clamped to the border, so samples past the edge return border
    /// values instead of extrapolating. Non-finite coordinates never panic:
    /// infinities read the border and NaN propagates into the result. The
    /// grid must not be empty.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> T {
        // taps past the border read edge pixels either way
        let tx = (u * self.width as f32 - 0.5).clamp(-1.0, self.width as f32);
        let ty = (v * self.height as f32 - 0.5).clamp(-1.0, self.height as f32);
        let x0 = tx.floor();
        let y0 = ty.floor();
        let fx = tx - x0;
        let fy = ty - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = T::mix(
            self.load_clamped(x0, y0),
            self.load_clamped(x0 + 1, y0),
            fx,
        );
        let bottom = T::mix(
            self.load_clamped(x0, y0 + 1),
            self.load_clamped(x0 + 1, y0 + 1),
            fx,
        );
        T::mix(top, bottom, fy)
    }
}
