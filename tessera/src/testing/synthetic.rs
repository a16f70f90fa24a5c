//! Synthetic survey rasters with known buried structures.

use crate::math::Aabb;
use crate::raster::{normalize, Raster};
use crate::smoothing::smooth;

use super::TestRng;

/// Side length of the standard synthetic field.
pub const FIELD_SIZE: usize = 512;

/// Rectangles `(x, y, width, height)` placed in the standard field.
pub const STANDARD_STRUCTURES: [(usize, usize, usize, usize); 4] = [
    (150, 200, 80, 120),
    (300, 150, 60, 90),
    (100, 350, 100, 70),
    (350, 300, 90, 110),
];

/// Intensity added over a whole structure.
const STRUCTURE_BOOST: f32 = 0.15;
/// Extra intensity over the structure core.
const CORE_BOOST: f32 = 0.1;
/// Core inset from the structure outline, in pixels.
const CORE_INSET: usize = 10;

/// A rectangle placed into a synthetic field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedStructure {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PlacedStructure {
    pub fn bbox(&self) -> Aabb {
        Aabb::new(
            self.x,
            self.x + self.width - 1,
            self.y,
            self.y + self.height - 1,
        )
    }
}

/// A synthetic field and the structures hidden in it.
#[derive(Debug, Clone)]
pub struct SiteField {
    pub raster: Raster,
    pub structures: Vec<PlacedStructure>,
}

/// Standard 512x512 field with the four reference structures.
pub fn generate_site_field(seed: u64) -> SiteField {
    generate_site_field_with(FIELD_SIZE, FIELD_SIZE, &STANDARD_STRUCTURES, seed)
}

/// Build a field: smooth terrain plus geological texture plus blurred
/// structures, min-max normalized to [0, 1].
pub fn generate_site_field_with(
    width: usize,
    height: usize,
    structures: &[(usize, usize, usize, usize)],
    seed: u64,
) -> SiteField {
    let mut rng = TestRng::new(seed);

    let base = gaussian_noise(width, height, 0.4, 0.1, &mut rng);
    let base = smooth(&base, 20.0).unwrap();

    let geology = gaussian_noise(width, height, 0.0, 0.05, &mut rng);
    let geology = smooth(&geology, 5.0).unwrap();

    let mut layer = Raster::new_default(width, height);
    let placed: Vec<PlacedStructure> = structures
        .iter()
        .map(|&(x, y, w, h)| PlacedStructure {
            x,
            y,
            width: w,
            height: h,
        })
        .collect();
    for s in &placed {
        add_rect(&mut layer, s.x, s.y, s.width, s.height, STRUCTURE_BOOST);
        if s.width > 2 * CORE_INSET && s.height > 2 * CORE_INSET {
            add_rect(
                &mut layer,
                s.x + CORE_INSET,
                s.y + CORE_INSET,
                s.width - 2 * CORE_INSET,
                s.height - 2 * CORE_INSET,
                CORE_BOOST,
            );
        }
    }
    let layer = smooth(&layer, 3.0).unwrap();

    let combined = Raster::from_fn(width, height, |x, y| {
        base[(x, y)] + geology[(x, y)] + layer[(x, y)]
    });

    SiteField {
        raster: normalize(&combined),
        structures: placed,
    }
}

fn gaussian_noise(width: usize, height: usize, mean: f32, sigma: f32, rng: &mut TestRng) -> Raster {
    let pixels = (0..width * height)
        .map(|_| mean + sigma * rng.next_gaussian_f32())
        .collect();
    Raster::new(width, height, pixels)
}

fn add_rect(raster: &mut Raster, x0: usize, y0: usize, w: usize, h: usize, value: f32) {
    let x1 = (x0 + w).min(raster.width());
    let y1 = (y0 + h).min(raster.height());
    for y in y0..y1 {
        for x in x0..x1 {
            raster[(x, y)] += value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_is_normalized() {
        let field = generate_site_field_with(64, 64, &[(20, 20, 30, 30)], 3);
        let min = field.raster.iter().copied().fold(f32::INFINITY, f32::min);
        let max = field.raster.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(min.abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_structure_is_brighter_than_surroundings() {
        let field = generate_site_field_with(96, 96, &[(30, 30, 40, 40)], 11);
        let inside = field.raster[(50, 50)];
        let outside = field.raster[(5, 5)];
        assert!(inside > outside, "inside {inside} outside {outside}");
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = generate_site_field_with(32, 32, &[(8, 8, 12, 12)], 5);
        let b = generate_site_field_with(32, 32, &[(8, 8, 12, 12)], 5);
        assert_eq!(a.raster, b.raster);
    }

    #[test]
    fn test_placed_structure_bbox() {
        let s = PlacedStructure {
            x: 150,
            y: 200,
            width: 80,
            height: 120,
        };
        assert_eq!(s.bbox(), Aabb::new(150, 229, 200, 319));
    }
}
