//! Binary morphology with a disk structuring element.
//!
//! Offsets that fall outside the mask are skipped by both erosion and
//! dilation, which keeps the two operators adjoint: opening is idempotent
//! and never adds pixels, closing never removes them.

#[cfg(test)]
mod tests;

use crate::config::validate_structuring_radius;
use crate::error::Result;
use crate::raster::Mask;

/// Neighborhood shape as a list of `(dx, dy)` offsets, origin included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    radius: usize,
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// Euclidean disk: every offset with `dx² + dy² <= radius²`.
    pub fn disk(radius: usize) -> Result<Self> {
        validate_structuring_radius(radius)?;

        let r = radius as isize;
        let offsets = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx * dx + dy * dy <= r * r)
            .collect();

        Ok(Self { radius, offsets })
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    #[inline]
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    /// Number of pixels covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// In-bounds neighbors of `(x, y)` under this element.
    #[inline]
    fn neighbors(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offsets.iter().filter_map(move |&(dx, dy)| {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                None
            } else {
                Some((nx as usize, ny as usize))
            }
        })
    }
}

/// A pixel stays set iff every in-bounds neighbor is set.
pub fn erode(mask: &Mask, element: &StructuringElement) -> Mask {
    let (width, height) = mask.dimensions();
    Mask::from_fn(width, height, |x, y| {
        element
            .neighbors(x, y, width, height)
            .all(|(nx, ny)| mask.get_xy(nx, ny))
    })
}

/// A pixel becomes set iff any in-bounds neighbor is set.
pub fn dilate(mask: &Mask, element: &StructuringElement) -> Mask {
    let (width, height) = mask.dimensions();
    Mask::from_fn(width, height, |x, y| {
        element
            .neighbors(x, y, width, height)
            .any(|(nx, ny)| mask.get_xy(nx, ny))
    })
}

/// Erode then dilate: removes features narrower than the element.
pub fn opening(mask: &Mask, element: &StructuringElement) -> Mask {
    dilate(&erode(mask, element), element)
}

/// Dilate then erode: fills gaps narrower than the element.
pub fn closing(mask: &Mask, element: &StructuringElement) -> Mask {
    erode(&dilate(mask, element), element)
}

/// Opening followed by closing with a disk of `radius`.
pub fn open_then_close(mask: &Mask, radius: usize) -> Result<Mask> {
    let element = StructuringElement::disk(radius)?;

    let opened = opening(mask, &element);
    let cleaned = closing(&opened, &element);

    tracing::debug!(
        radius,
        element_pixels = element.len(),
        input_pixels = mask.count_ones(),
        opened_pixels = opened.count_ones(),
        cleaned_pixels = cleaned.count_ones(),
        "Morphological cleanup"
    );
    Ok(cleaned)
}
