//! Connected component labeling using union-find.
//!
//! Works on run-length encoded rows of a bit-packed mask:
//! - Word-level bit scanning skips background words and walks mixed words
//!   with trailing-zero counts
//! - Runs in adjacent rows are merged with 8-connectivity through a
//!   disjoint-set over provisional run labels
//! - A final flatten pass renumbers roots densely in raster scan order


use glam::DVec2;

use crate::common::Buffer2;
use crate::math::Aabb;
use crate::raster::Mask;

// ============================================================================
// Run-Length Encoding
// ============================================================================

/// A horizontal run of foreground pixels.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: u32, // inclusive
    end: u32,   // exclusive
    label: u32, // provisional
}

impl Run {
    /// Columns of the previous row that can touch this run diagonally or directly.
    /// End is exclusive.
    #[inline]
    fn search_window(&self) -> (u32, u32) {
        (self.start.saturating_sub(1), self.end + 1)
    }
}

/// Whether two runs in adjacent rows are 8-connected.
#[inline]
fn runs_connected(prev: &Run, curr: &Run) -> bool {
    prev.start < curr.end + 1 && prev.end + 1 > curr.start
}

/// Extract the runs of one mask row.
///
/// Relies on padding bits past `width` being zero.
fn extract_runs_from_row(row_words: &[u64], width: usize, runs: &mut Vec<Run>) {
    let width = width as u32;
    let mut in_run = false;
    let mut run_start = 0u32;

    for (word_idx, &word) in row_words.iter().enumerate() {
        let base_x = (word_idx * 64) as u32;

        if word == 0 {
            if in_run {
                runs.push(Run {
                    start: run_start,
                    end: base_x.min(width),
                    label: 0,
                });
                in_run = false;
            }
            continue;
        }

        if word == !0u64 {
            if !in_run {
                run_start = base_x;
                in_run = true;
            }
            continue;
        }

        extract_runs_from_mixed_word(word, base_x, width, &mut in_run, &mut run_start, runs);
    }

    if in_run {
        runs.push(Run {
            start: run_start,
            end: width,
            label: 0,
        });
    }
}

/// Walk run transitions inside a word holding both set and clear bits.
#[inline]
fn extract_runs_from_mixed_word(
    word: u64,
    base_x: u32,
    width: u32,
    in_run: &mut bool,
    run_start: &mut u32,
    runs: &mut Vec<Run>,
) {
    let word_end = (base_x + 64).min(width);
    let mut pos = base_x;

    while pos < word_end {
        let bit_offset = pos - base_x;
        let remaining_bits = word >> bit_offset;

        if *in_run {
            // Rest of the word is set: the run continues into the next word.
            if remaining_bits == !0u64 >> bit_offset {
                break;
            }
            let end_pos = pos + (!remaining_bits).trailing_zeros();
            if end_pos >= word_end {
                break;
            }
            runs.push(Run {
                start: *run_start,
                end: end_pos,
                label: 0,
            });
            *in_run = false;
            pos = end_pos;
        } else {
            if remaining_bits == 0 {
                break;
            }
            let start_pos = pos + remaining_bits.trailing_zeros();
            if start_pos >= word_end {
                break;
            }
            *run_start = start_pos;
            *in_run = true;
            pos = start_pos;
        }
    }
}

/// Merge the current row's runs with the previous row's runs.
///
/// Each run takes the label of the first touching run above and unions the
/// rest into it. Runs touching nothing get a fresh label.
fn merge_runs_with_prev(curr_runs: &mut [Run], prev_runs: &[Run], uf: &mut UnionFind) {
    let mut prev_idx = 0;
    for run in curr_runs.iter_mut() {
        let (search_start, search_end) = run.search_window();

        while prev_idx < prev_runs.len() && prev_runs[prev_idx].end <= search_start {
            prev_idx += 1;
        }

        let mut assigned_label = None;
        let mut check_idx = prev_idx;
        while check_idx < prev_runs.len() && prev_runs[check_idx].start < search_end {
            let prev_run = &prev_runs[check_idx];
            if runs_connected(prev_run, run) {
                match assigned_label {
                    Some(label) if label != prev_run.label => uf.union(label, prev_run.label),
                    None => assigned_label = Some(prev_run.label),
                    _ => {}
                }
            }
            check_idx += 1;
        }

        run.label = assigned_label.unwrap_or_else(|| uf.make_set());
    }
}

// ============================================================================
// LabelGrid
// ============================================================================

/// Grid of component labels: 0 is background, components are `1..=num_labels`.
///
/// Immutable once built. Component geometry is derived on demand through
/// [`LabelGrid::components`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGrid {
    labels: Buffer2<u32>,
    num_labels: usize,
}

impl LabelGrid {
    /// Wrap a label buffer whose labels are already dense in `1..=num_labels`.
    pub(crate) fn from_parts(labels: Buffer2<u32>, num_labels: usize) -> Self {
        debug_assert!(labels.iter().all(|&l| l as usize <= num_labels));
        Self { labels, num_labels }
    }

    /// Number of connected components (excluding background).
    #[inline]
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.labels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.labels.height()
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.labels.dimensions()
    }

    /// Row-major label slice.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        self.labels.pixels()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        *self.labels.get(x, y)
    }

    /// Whether every pixel is background.
    pub fn is_background(&self) -> bool {
        self.num_labels == 0
    }

    /// Pixel count per label; index 0 counts background.
    pub fn areas(&self) -> Vec<usize> {
        let mut areas = vec![0usize; self.num_labels + 1];
        for &label in self.labels.iter() {
            areas[label as usize] += 1;
        }
        areas
    }

    /// Derive every component in ascending label order, in one pass over the grid.
    pub fn components(&self) -> Vec<Component> {
        let mut components: Vec<Component> = (1..=self.num_labels as u32)
            .map(Component::empty)
            .collect();

        let width = self.width();
        for (idx, &label) in self.labels.iter().enumerate() {
            if label == 0 {
                continue;
            }
            components[label as usize - 1].push(idx % width, idx / width);
        }

        components
    }

    /// Derive a single component, or `None` if `label` is background or out of range.
    pub fn component(&self, label: u32) -> Option<Component> {
        if label == 0 || label as usize > self.num_labels {
            return None;
        }
        let width = self.width();
        let mut component = Component::empty(label);
        for (idx, &l) in self.labels.iter().enumerate() {
            if l == label {
                component.push(idx % width, idx / width);
            }
        }
        Some(component)
    }
}

impl std::ops::Index<(usize, usize)> for LabelGrid {
    type Output = u32;

    #[inline]
    fn index(&self, pos: (usize, usize)) -> &Self::Output {
        &self.labels[pos]
    }
}

/// Read-only view of one labeled component.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub label: u32,
    /// `(x, y)` pixel coordinates in raster order.
    pub pixels: Vec<(usize, usize)>,
    pub bbox: Aabb,
}

impl Component {
    fn empty(label: u32) -> Self {
        Self {
            label,
            pixels: Vec::new(),
            bbox: Aabb::empty(),
        }
    }

    #[inline]
    fn push(&mut self, x: usize, y: usize) {
        self.pixels.push((x, y));
        self.bbox.include(x, y);
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.pixels.len()
    }

    /// Mean pixel position (x = column, y = row).
    pub fn centroid(&self) -> DVec2 {
        if self.pixels.is_empty() {
            return DVec2::ZERO;
        }
        let sum = self
            .pixels
            .iter()
            .fold(DVec2::ZERO, |acc, &(x, y)| acc + DVec2::new(x as f64, y as f64));
        sum / self.pixels.len() as f64
    }
}

// ============================================================================
// Labeling
// ============================================================================

/// Label the 8-connected foreground regions of `mask`.
///
/// Labels are dense in `1..=num_labels` and numbered by each component's
/// first pixel in raster scan order.
pub fn label_mask(mask: &Mask) -> LabelGrid {
    let (width, height) = mask.dimensions();
    let mut labels = Buffer2::new_default(width, height);

    if width == 0 || height == 0 {
        return LabelGrid {
            labels,
            num_labels: 0,
        };
    }

    let mut uf = UnionFind::new();
    let mut prev_runs: Vec<Run> = Vec::with_capacity(width / 4);
    let mut curr_runs: Vec<Run> = Vec::with_capacity(width / 4);

    for y in 0..height {
        curr_runs.clear();
        extract_runs_from_row(mask.row_words(y), width, &mut curr_runs);

        if curr_runs.is_empty() {
            prev_runs.clear();
            continue;
        }

        merge_runs_with_prev(&mut curr_runs, &prev_runs, &mut uf);

        let row_start = y * width;
        let pixels = labels.pixels_mut();
        for run in &curr_runs {
            pixels[row_start + run.start as usize..row_start + run.end as usize].fill(run.label);
        }

        std::mem::swap(&mut prev_runs, &mut curr_runs);
    }

    let num_labels = uf.flatten_labels(labels.pixels_mut());
    LabelGrid { labels, num_labels }
}

// ============================================================================
// Union-Find
// ============================================================================

/// Disjoint-set over provisional labels `1..next_label`.
///
/// Unions attach the larger root under the smaller, so every root is the
/// earliest-created label of its set.
#[derive(Debug)]
struct UnionFind {
    parent: Vec<u32>,
    next_label: u32,
}

impl UnionFind {
    fn new() -> Self {
        Self {
            parent: Vec::with_capacity(256),
            next_label: 1,
        }
    }

    #[inline]
    fn make_set(&mut self) -> u32 {
        let label = self.next_label;
        self.parent.push(label);
        self.next_label += 1;
        label
    }

    /// Find root with two-pass path compression.
    #[inline]
    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        loop {
            let parent = self.parent[(root - 1) as usize];
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = label;
        while current != root {
            let idx = (current - 1) as usize;
            let parent = self.parent[idx];
            self.parent[idx] = root;
            current = parent;
        }

        root
    }

    #[inline]
    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            let (smaller, larger) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[(larger - 1) as usize] = smaller;
        }
    }

    /// Rewrite provisional labels to dense `1..=n` and return `n`.
    fn flatten_labels(&mut self, labels: &mut [u32]) -> usize {
        if self.parent.is_empty() {
            return 0;
        }

        let len = self.parent.len();
        let mut label_map = vec![0u32; len + 1];
        let mut num_labels = 0u32;

        for i in 1..=len as u32 {
            let root = self.find(i);
            if label_map[root as usize] == 0 {
                num_labels += 1;
                label_map[root as usize] = num_labels;
            }
            label_map[i as usize] = label_map[root as usize];
        }

        for l in labels.iter_mut() {
            if *l != 0 {
                *l = label_map[*l as usize];
            }
        }

        num_labels as usize
    }
}
