//! Magnitude validation and colour-index derivation.

use crate::domain::model::{
    Band, ColorIndex, ColorIndices, MagnitudeInput, MagnitudeSet, RangeBound, RangeViolation,
};
use crate::utils::error::{Result, StellarError};

pub const MAG_MIN: f64 = 12.0;
pub const MAG_MAX: f64 = 24.0;

/// Colour ranges covered by the survey training data.
pub const SURVEY_COLOR_RANGES: [(ColorIndex, f64, f64); 4] = [
    (ColorIndex::UG, -0.5, 2.8),
    (ColorIndex::GR, -0.4, 1.6),
    (ColorIndex::RI, -0.4, 1.3),
    (ColorIndex::IZ, -0.4, 1.1),
];

/// Validates all five bands at once. Missing values are reported before range violations.
pub fn validate_magnitudes(input: &MagnitudeInput) -> Result<MagnitudeSet> {
    let parsed = Band::ALL.map(|band| (band, input.get(band).and_then(|v| v.parse())));

    let missing: Vec<Band> = parsed
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(band, _)| *band)
        .collect();
    if !missing.is_empty() {
        return Err(StellarError::MissingValue { bands: missing });
    }

    let values = parsed.map(|(band, value)| (band, value.unwrap_or_default()));

    let violations: Vec<RangeViolation> = values
        .iter()
        .filter_map(|&(band, value)| {
            let bound = if value < MAG_MIN {
                RangeBound::BelowMinimum(MAG_MIN)
            } else if value > MAG_MAX {
                RangeBound::AboveMaximum(MAG_MAX)
            } else {
                return None;
            };
            Some(RangeViolation { band, value, bound })
        })
        .collect();
    if !violations.is_empty() {
        return Err(StellarError::OutOfRange { violations });
    }

    let [u, g, r, i, z] = values.map(|(_, value)| value);
    Ok(MagnitudeSet { u, g, r, i, z })
}

pub fn compute_color_indices(magnitudes: &MagnitudeSet) -> ColorIndices {
    ColorIndices {
        u_g: magnitudes.u - magnitudes.g,
        g_r: magnitudes.g - magnitudes.r,
        r_i: magnitudes.r - magnitudes.i,
        i_z: magnitudes.i - magnitudes.z,
    }
}

/// Live preview: available as soon as every band parses, regardless of range.
pub fn preview_color_indices(input: &MagnitudeInput) -> Option<ColorIndices> {
    let value = |band| input.get(band).and_then(|v| v.parse());
    Some(ColorIndices {
        u_g: value(Band::U)? - value(Band::G)?,
        g_r: value(Band::G)? - value(Band::R)?,
        r_i: value(Band::R)? - value(Band::I)?,
        i_z: value(Band::I)? - value(Band::Z)?,
    })
}

pub fn survey_range_warnings(colors: &ColorIndices) -> Vec<String> {
    SURVEY_COLOR_RANGES
        .iter()
        .filter_map(|&(index, lo, hi)| {
            let value = colors.get(index);
            (!(lo..=hi).contains(&value))
                .then(|| format!("{}={:.2} outside SDSS range", index.key(), value))
        })
        .collect()
}

pub fn within_survey_ranges(colors: &ColorIndices) -> bool {
    survey_range_warnings(colors).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(values: [&str; 5]) -> MagnitudeInput {
        Band::ALL
            .iter()
            .zip(values)
            .fold(MagnitudeInput::new(), |acc, (band, value)| acc.with(*band, value))
    }

    #[test]
    fn test_validate_accepts_typical_star() {
        let set = validate_magnitudes(&input(["18.5", "17.2", "16.8", "16.5", "16.3"])).unwrap();
        assert_eq!(set.u, 18.5);
        assert_eq!(set.z, 16.3);
    }

    #[test]
    fn test_validate_accepts_boundaries() {
        let set = validate_magnitudes(&input(["12", "24", "12.0", "24.0", "18"])).unwrap();
        assert_eq!(set.u, MAG_MIN);
        assert_eq!(set.g, MAG_MAX);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = validate_magnitudes(&input(["11.999", "17", "16", "16", "24.001"])).unwrap_err();
        match err {
            StellarError::OutOfRange { violations } => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].band, Band::U);
                assert_eq!(violations[0].bound, RangeBound::BelowMinimum(12.0));
                assert_eq!(violations[1].band, Band::Z);
                assert_eq!(violations[1].bound, RangeBound::AboveMaximum(24.0));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_reports_missing_before_range() {
        let mut raw = input(["30", "17", "16", "16", "16"]);
        raw.clear(Band::R);
        raw.set(Band::I, "abc");

        match validate_magnitudes(&raw).unwrap_err() {
            StellarError::MissingValue { bands } => assert_eq!(bands, vec![Band::R, Band::I]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_color_indices_telescoping_identity() {
        let samples = [
            [18.5, 17.2, 16.8, 16.5, 16.3],
            [12.0, 24.0, 13.3, 22.1, 19.75],
            [20.123, 19.456, 18.789, 18.012, 17.345],
        ];
        for [u, g, r, i, z] in samples {
            let colors = compute_color_indices(&MagnitudeSet { u, g, r, i, z });
            let sum = colors.u_g + colors.g_r + colors.r_i + colors.i_z;
            assert!((sum - (u - z)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_color_indices_display_three_decimals() {
        let set = MagnitudeSet {
            u: 18.5,
            g: 17.2,
            r: 16.8,
            i: 16.5,
            z: 16.3,
        };
        assert_eq!(
            compute_color_indices(&set).to_string(),
            "u-g: 1.300, g-r: 0.400, r-i: 0.300, i-z: 0.200"
        );
    }

    #[test]
    fn test_preview_ignores_range_but_needs_all_bands() {
        let mut raw = input(["30", "17", "16", "16", "16"]);
        let preview = preview_color_indices(&raw).unwrap();
        assert!((preview.u_g - 13.0).abs() < 1e-12);

        raw.set(Band::G, "");
        assert!(preview_color_indices(&raw).is_none());
    }

    #[test]
    fn test_survey_range_warnings() {
        let colors = ColorIndices {
            u_g: 3.0,
            g_r: 0.4,
            r_i: 0.3,
            i_z: -0.5,
        };
        assert_eq!(
            survey_range_warnings(&colors),
            vec!["u_g=3.00 outside SDSS range", "i_z=-0.50 outside SDSS range"]
        );
        assert!(!within_survey_ranges(&colors));
    }
}
