//! Row-major 2D buffer with boundary-safe sampling.

use std::ops::{Index, IndexMut};
use std::slice;

use rayon::prelude::*;

/// How coordinates outside the buffer are mapped back inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    /// Mirror about the edge, repeating the edge sample: `d c b a | a b c d | d c b a`.
    #[default]
    Reflect,
    /// Replicate the nearest edge sample: `a a a a | a b c d | d d d d`.
    Nearest,
}

impl Border {
    /// Map a signed coordinate onto `0..len`.
    ///
    /// Works for coordinates any distance outside the buffer. `len` must be non-zero.
    #[inline]
    pub fn resolve(self, i: isize, len: usize) -> usize {
        debug_assert!(len > 0);
        if i >= 0 && (i as usize) < len {
            return i as usize;
        }
        match self {
            Border::Nearest => i.clamp(0, len as isize - 1) as usize,
            Border::Reflect => {
                let period = 2 * len as isize;
                let m = i.rem_euclid(period) as usize;
                if m < len {
                    m
                } else {
                    2 * len - 1 - m
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Buffer2<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Buffer2<T> {
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel, rows in parallel.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        T: Send,
        F: Fn(usize, usize) -> T + Sync,
    {
        let pixels: Vec<T> = (0..width * height)
            .into_par_iter()
            .map(|idx| f(idx % width, idx / width))
            .collect();
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        debug_assert!(x < self.width && y < self.height);
        &self.pixels[y * self.width + x]
    }

    /// Read a pixel at signed coordinates, resolving out-of-range ones with `border`.
    ///
    /// Panics on an empty buffer.
    #[inline]
    pub fn sample(&self, x: isize, y: isize, border: Border) -> &T {
        let x = border.resolve(x, self.width);
        let y = border.resolve(y, self.height);
        &self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.pixels.iter()
    }

    /// Apply `f` to every pixel, producing a new buffer of the same dimensions.
    pub fn map<U, F>(&self, f: F) -> Buffer2<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        Buffer2 {
            pixels: self.pixels.par_iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T: Default + Clone> Buffer2<T> {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![T::default(); width * height],
            width,
            height,
        }
    }
}

impl<T: Clone> Buffer2<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }
}

impl<T> Index<(usize, usize)> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.pixels[y * self.width + x]
    }
}

impl<T> Index<usize> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.pixels[idx]
    }
}

impl<'a, T> IntoIterator for &'a Buffer2<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_dimensions() {
        let buf = Buffer2::new(3, 2, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(buf.dimensions(), (3, 2));
        assert_eq!(buf.len(), 6);
        assert!(!buf.is_empty());
    }

    #[test]
    #[should_panic(expected = "pixels length must equal width * height")]
    fn test_new_panics_on_size_mismatch() {
        Buffer2::new(3, 2, vec![1, 2, 3]);
    }

    #[test]
    fn test_get_is_row_major() {
        let buf = Buffer2::new(3, 2, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(*buf.get(2, 0), 30);
        assert_eq!(*buf.get(0, 1), 40);
        assert_eq!(buf[(2, 1)], 60);
        assert_eq!(buf.row(1), &[40, 50, 60]);
    }

    #[test]
    fn test_from_fn_matches_coordinates() {
        let buf = Buffer2::from_fn(4, 3, |x, y| x * 10 + y);
        assert_eq!(buf[(0, 0)], 0);
        assert_eq!(buf[(3, 0)], 30);
        assert_eq!(buf[(1, 2)], 12);
    }

    #[test]
    fn test_map_keeps_dimensions() {
        let buf = Buffer2::new(2, 2, vec![1.0f32, 2.0, 3.0, 4.0]);
        let doubled = buf.map(|&v| v * 2.0);
        assert_eq!(doubled.dimensions(), (2, 2));
        assert_eq!(doubled.pixels(), &[2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_reflect_resolve() {
        // d c b a | a b c d | d c b a
        let b = Border::Reflect;
        assert_eq!(b.resolve(-1, 4), 0);
        assert_eq!(b.resolve(-2, 4), 1);
        assert_eq!(b.resolve(-4, 4), 3);
        assert_eq!(b.resolve(4, 4), 3);
        assert_eq!(b.resolve(5, 4), 2);
        assert_eq!(b.resolve(7, 4), 0);
        assert_eq!(b.resolve(8, 4), 0);
    }

    #[test]
    fn test_reflect_far_outside_stays_in_bounds() {
        for i in -50..50 {
            assert!(Border::Reflect.resolve(i, 3) < 3);
            assert_eq!(Border::Reflect.resolve(i, 1), 0);
        }
    }

    #[test]
    fn test_nearest_resolve() {
        let b = Border::Nearest;
        assert_eq!(b.resolve(-3, 4), 0);
        assert_eq!(b.resolve(2, 4), 2);
        assert_eq!(b.resolve(9, 4), 3);
    }

    #[test]
    fn test_sample_uses_border() {
        let buf = Buffer2::new(3, 1, vec![1, 2, 3]);
        assert_eq!(*buf.sample(-1, 0, Border::Reflect), 1);
        assert_eq!(*buf.sample(-2, 0, Border::Reflect), 2);
        assert_eq!(*buf.sample(5, 3, Border::Nearest), 3);
    }
}
