//! Bit-packed 2D buffer for boolean masks.
//!
//! Each row starts on a fresh `u64` word so row-oriented consumers (run
//! extraction, per-row parallel construction) can work on whole words.
//! Padding bits past `width` in the last word of a row are always zero.

use rayon::prelude::*;

/// Number of bits per storage word.
const BITS_PER_WORD: usize = 64;

/// A 2D buffer storing boolean values packed as bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer2 {
    words: Vec<u64>,
    width: usize,
    height: usize,
    words_per_row: usize,
}

impl BitBuffer2 {
    /// Create a new bit buffer filled with the given value.
    pub fn new_filled(width: usize, height: usize, value: bool) -> Self {
        let words_per_row = width.div_ceil(BITS_PER_WORD);
        let fill = if value { !0u64 } else { 0u64 };
        let mut buffer = Self {
            words: vec![fill; words_per_row * height],
            width,
            height,
            words_per_row,
        };
        if value {
            buffer.clear_padding();
        }
        buffer
    }

    /// Create a new bit buffer with all bits set to false.
    #[inline]
    pub fn new_default(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, false)
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel, rows in parallel.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> bool + Sync,
    {
        let mut buffer = Self::new_default(width, height);
        if buffer.words.is_empty() {
            return buffer;
        }
        let words_per_row = buffer.words_per_row;

        buffer
            .words
            .par_chunks_mut(words_per_row)
            .enumerate()
            .for_each(|(y, row)| {
                for x in 0..width {
                    if f(x, y) {
                        row[x / BITS_PER_WORD] |= 1u64 << (x % BITS_PER_WORD);
                    }
                }
            });

        buffer
    }

    /// Create a bit buffer from row-major booleans.
    pub fn from_slice(width: usize, height: usize, data: &[bool]) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "data length {} does not match dimensions {}x{}",
            data.len(),
            width,
            height
        );
        Self::from_fn(width, height, |x, y| data[y * width + x])
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

    /// Total number of pixels (width * height).
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn words_per_row(&self) -> usize {
        self.words_per_row
    }

    /// The packed words of row `y`.
    #[inline]
    pub fn row_words(&self, y: usize) -> &[u64] {
        let start = y * self.words_per_row;
        &self.words[start..start + self.words_per_row]
    }

    #[inline]
    pub fn get_xy(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height);
        let word = self.words[y * self.words_per_row + x / BITS_PER_WORD];
        (word >> (x % BITS_PER_WORD)) & 1 != 0
    }

    #[inline]
    pub fn set_xy(&mut self, x: usize, y: usize, value: bool) {
        debug_assert!(x < self.width && y < self.height);
        let word = &mut self.words[y * self.words_per_row + x / BITS_PER_WORD];
        let bit = 1u64 << (x % BITS_PER_WORD);
        if value {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    /// Count the number of set bits (true values).
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Pixelwise union with a mask of the same dimensions.
    pub fn or(&self, other: &Self) -> Self {
        assert_eq!(self.dimensions(), other.dimensions(), "dimension mismatch");
        Self {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a | b)
                .collect(),
            width: self.width,
            height: self.height,
            words_per_row: self.words_per_row,
        }
    }

    /// Iterate over `(x, y)` of every set pixel in raster order.
    pub fn iter_ones(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let words_per_row = self.words_per_row;
        self.words
            .iter()
            .enumerate()
            .flat_map(move |(word_idx, &word)| {
                let y = word_idx / words_per_row;
                let base_x = (word_idx % words_per_row) * BITS_PER_WORD;
                SetBits(word).map(move |bit| (base_x + bit, y))
            })
    }

    /// Row-major booleans.
    pub fn to_vec(&self) -> Vec<bool> {
        let mut out = Vec::with_capacity(self.len());
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.get_xy(x, y));
            }
        }
        out
    }

    fn clear_padding(&mut self) {
        let tail = self.width % BITS_PER_WORD;
        if tail == 0 || self.words_per_row == 0 {
            return;
        }
        let keep = (1u64 << tail) - 1;
        for row in self.words.chunks_mut(self.words_per_row) {
            if let Some(last) = row.last_mut() {
                *last &= keep;
            }
        }
    }
}

/// Positions of set bits in a word, lowest first.
struct SetBits(u64);

impl Iterator for SetBits {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(bit)
    }
}
