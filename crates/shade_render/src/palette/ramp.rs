use super::color::{lerp, Color};
use crate::ShadeError;

/// Shape parameters for [`ShadeRamp::generate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RampOptions {
    /// Per-channel multiplier turning the base color into the background.
    pub background_factor: f64,
    /// How far from background toward base the darkest foreground shade starts.
    pub shadow_lift: f64,
    /// How far from base toward white the lightest foreground shade reaches.
    pub highlight_reach: f64,
}

impl Default for RampOptions {
    fn default() -> Self {
        Self { background_factor: 0.1, shadow_lift: 0.3, highlight_reach: 1.0 }
    }
}

impl RampOptions {
    /// Glyphs are drawn thin, so the top of the ramp stops short of white.
    pub fn glyphs() -> Self {
        Self { highlight_reach: 0.85, ..Self::default() }
    }

    fn validate(&self) -> Result<(), ShadeError> {
        let fields = [
            ("background factor", self.background_factor),
            ("shadow lift", self.shadow_lift),
            ("highlight reach", self.highlight_reach),
        ];
        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ShadeError::InvalidArgument(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Dark-to-light colors derived from one base color.
///
/// Index 0 is the background. The foreground shades that follow climb from
/// just above the background, through the base color near the middle, toward
/// white.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShadeRamp {
    shades: Vec<Color>,
}

impl ShadeRamp {
    pub const MIN_SHADES: usize = 2;

    /// Build a ramp of exactly `total` shades, background included.
    ///
    /// The midpoint is the real index `(F - 1) / 2` over the `F = total - 1`
    /// foreground shades. Foreground shades below it are interpolated from the
    /// shadow floor to the base color, those above it from the base color to
    /// the highlight peak, and an exact integer midpoint is the base color.
    pub fn generate(base: Color, total: usize, options: RampOptions) -> Result<Self, ShadeError> {
        if total < Self::MIN_SHADES {
            return Err(ShadeError::InvalidArgument(format!(
                "at least {} shades are required (background + one foreground), got {total}",
                Self::MIN_SHADES
            )));
        }
        options.validate()?;

        let background = base.scale(options.background_factor);
        let foreground = total - 1;

        let mut shades = Vec::with_capacity(total);
        shades.push(background);

        if foreground == 1 {
            shades.push(base);
            return Ok(Self { shades });
        }

        let base_real = base.real();
        let floor = lerp(background.real(), base_real, options.shadow_lift);
        let peak = lerp(base_real, Color::WHITE.real(), options.highlight_reach);
        let mid = (foreground - 1) as f64 / 2.0;
        let upper_span = (foreground - 1) as f64 - mid;

        for index in 0..foreground {
            let i = index as f64;
            let shade = if i < mid {
                Color::from_real(lerp(floor, base_real, i / mid))
            } else if i > mid {
                Color::from_real(lerp(base_real, peak, (i - mid) / upper_span))
            } else {
                base
            };
            shades.push(shade);
        }

        Ok(Self { shades })
    }

    pub fn len(&self) -> usize {
        self.shades.len()
    }

    /// Always false; a ramp holds at least [`Self::MIN_SHADES`] colors.
    pub fn is_empty(&self) -> bool {
        self.shades.is_empty()
    }

    pub fn background(&self) -> Color {
        self.shades[0]
    }

    pub fn foreground(&self) -> &[Color] {
        &self.shades[1..]
    }

    pub fn shades(&self) -> &[Color] {
        &self.shades
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.shades.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn luminance(color: Color) -> u32 {
        u32::from(color.r) + u32::from(color.g) + u32::from(color.b)
    }

    #[test]
    fn two_shades_are_background_then_base() {
        let base = Color::new(0x44, 0xcc, 0xaa);
        let ramp = ShadeRamp::generate(base, 2, RampOptions::default()).unwrap();
        assert_eq!(ramp.shades(), &[Color::new(6, 20, 17), base]);
    }

    #[test]
    fn rejects_fewer_than_two_shades() {
        for total in [0, 1] {
            let err = ShadeRamp::generate(Color::WHITE, total, RampOptions::default()).unwrap_err();
            assert!(matches!(err, ShadeError::InvalidArgument(_)));
        }
    }

    #[test]
    fn rejects_factors_outside_unit_range() {
        let options = RampOptions { highlight_reach: 1.5, ..RampOptions::default() };
        let err = ShadeRamp::generate(Color::WHITE, 4, options).unwrap_err();
        assert!(matches!(err, ShadeError::InvalidArgument(_)));
    }

    #[test]
    fn odd_foreground_count_places_base_exactly_in_the_middle() {
        let base = Color::new(100, 200, 40);
        let options = RampOptions { background_factor: 0.5, shadow_lift: 0.5, highlight_reach: 1.0 };
        let ramp = ShadeRamp::generate(base, 4, options).unwrap();

        assert_eq!(
            ramp.shades(),
            &[
                Color::new(50, 100, 20),
                // halfway between background and base
                Color::new(75, 150, 30),
                base,
                Color::WHITE,
            ]
        );
    }

    #[test]
    fn even_foreground_count_straddles_the_base() {
        let base = Color::new(128, 64, 32);
        let options = RampOptions { background_factor: 0.5, shadow_lift: 0.0, highlight_reach: 0.5 };
        let ramp = ShadeRamp::generate(base, 3, options).unwrap();

        // F = 2, midpoint 0.5: first shade is the floor, second the peak.
        assert_eq!(ramp.foreground(), &[Color::new(64, 32, 16), Color::new(191, 159, 143)]);
    }

    #[test]
    fn glyph_ramp_stops_short_of_white() {
        let base = Color::new(0, 0, 0);
        let ramp = ShadeRamp::generate(base, 6, RampOptions::glyphs()).unwrap();
        let top = *ramp.shades().last().unwrap();
        assert!(top.r < 255 && top.r > 200, "top shade {top}");
    }

    #[test]
    fn ramps_have_exact_length_and_dark_background() {
        let bases = [
            Color::BLACK,
            Color::WHITE,
            Color::new(0x44, 0xcc, 0xaa),
            Color::new(255, 0, 7),
            Color::new(1, 2, 3),
        ];
        for base in bases {
            for total in 2..=24 {
                for options in [RampOptions::default(), RampOptions::glyphs()] {
                    let ramp = ShadeRamp::generate(base, total, options).unwrap();
                    assert_eq!(ramp.len(), total);

                    let bg = ramp.background();
                    assert!(bg.r <= base.r && bg.g <= base.g && bg.b <= base.b);

                    let foreground = ramp.foreground();
                    for pair in foreground.windows(2) {
                        assert!(luminance(pair[0]) <= luminance(pair[1]), "{base} x{total}");
                    }
                }
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let base = Color::new(12, 99, 250);
        let first = ShadeRamp::generate(base, 11, RampOptions::glyphs()).unwrap();
        let second = ShadeRamp::generate(base, 11, RampOptions::glyphs()).unwrap();
        assert_eq!(first, second);
    }
}
