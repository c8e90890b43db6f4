use image::GrayImage;

use super::grid::LevelGrid;

/// Level for `brightness` among `levels` equal-width buckets.
///
/// Equivalent to `floor(brightness / (256 / levels))` clamped to
/// `[0, levels - 1]`, computed without floating point.
pub fn level_for(brightness: u8, levels: usize) -> usize {
    let levels = levels.max(1);
    (usize::from(brightness) * levels / 256).min(levels - 1)
}

pub struct LevelMapper {
    levels: usize,
}

impl LevelMapper {
    pub fn new(levels: usize) -> Self {
        Self { levels: levels.max(1) }
    }

    pub fn map_brightness(&self, gray: &GrayImage) -> LevelGrid {
        let levels = gray.pixels().map(|pixel| level_for(pixel.0[0], self.levels)).collect();
        LevelGrid::new(gray.width(), gray.height(), levels)
    }
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;

    #[test]
    fn buckets_are_equal_width() {
        assert_eq!(level_for(0, 4), 0);
        assert_eq!(level_for(63, 4), 0);
        assert_eq!(level_for(64, 4), 1);
        assert_eq!(level_for(191, 4), 2);
        assert_eq!(level_for(192, 4), 3);
        assert_eq!(level_for(255, 4), 3);
    }

    #[test]
    fn uneven_division_floors() {
        // 256 / 3 = 85.33..
        assert_eq!(level_for(85, 3), 0);
        assert_eq!(level_for(86, 3), 1);
        assert_eq!(level_for(170, 3), 1);
        assert_eq!(level_for(171, 3), 2);
        assert_eq!(level_for(255, 3), 2);
    }

    #[test]
    fn mapping_is_monotonic_and_covers_every_level() {
        for levels in [1usize, 2, 3, 5, 11, 256, 300] {
            let mut seen = vec![false; levels];
            let mut previous = 0;
            for b in 0..=255u8 {
                let level = level_for(b, levels);
                assert!(level >= previous);
                assert!(level < levels);
                seen[level] = true;
                previous = level;
            }
            if levels <= 256 {
                assert!(seen.iter().all(|&s| s), "levels={levels}");
            }
        }
    }

    #[test]
    fn maps_grid_row_major() {
        let gray = GrayImage::from_fn(3, 2, |x, y| Luma([(x * 100 + y * 20) as u8]));
        let grid = LevelMapper::new(4).map_brightness(&gray);
        assert_eq!((grid.width, grid.height), (3, 2));
        assert_eq!(grid.levels, vec![0, 1, 3, 0, 1, 3]);
    }
}
