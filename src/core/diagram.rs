//! Hertzsprung-Russell diagram placement.

use crate::domain::model::PredictionResult;
use crate::utils::error::{Result, StellarError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed distance used for the pseudo-absolute view. Not derived from astrometry.
pub const REFERENCE_DISTANCE_PC: f64 = 100.0;

pub const G_R_AXIS: (f64, f64) = (-0.5, 2.0);
/// Brightest at the top, so the axis runs from 15 down to -5.
pub const MAGNITUDE_AXIS: (f64, f64) = (15.0, -5.0);

/// `M = m - 5 log10(d / 10)`.
pub fn to_absolute_magnitude(apparent: f64, distance_pc: f64) -> Result<f64> {
    if !(distance_pc.is_finite() && distance_pc > 0.0) {
        return Err(StellarError::InvalidDistance {
            distance: distance_pc,
        });
    }
    Ok(apparent - 5.0 * (distance_pc / 10.0).log10())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MagnitudeView {
    #[default]
    PseudoAbsolute,
    Apparent,
}

impl MagnitudeView {
    pub fn toggled(self) -> Self {
        match self {
            MagnitudeView::PseudoAbsolute => MagnitudeView::Apparent,
            MagnitudeView::Apparent => MagnitudeView::PseudoAbsolute,
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            MagnitudeView::PseudoAbsolute => "Absolute Magnitude (M_g)",
            MagnitudeView::Apparent => "Apparent Magnitude (g)",
        }
    }
}

/// Five-bucket marker hue keyed on g-r.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StarHue {
    Blue,
    BlueWhite,
    Yellow,
    Orange,
    Red,
}

impl StarHue {
    pub fn from_g_r(g_r: f64) -> Self {
        if g_r < 0.0 {
            StarHue::Blue
        } else if g_r < 0.3 {
            StarHue::BlueWhite
        } else if g_r < 0.6 {
            StarHue::Yellow
        } else if g_r < 1.0 {
            StarHue::Orange
        } else {
            StarHue::Red
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            StarHue::Blue => "#9bb0ff",
            StarHue::BlueWhite => "#cad7ff",
            StarHue::Yellow => "#fff4ea",
            StarHue::Orange => "#ffd2a1",
            StarHue::Red => "#ffcc6f",
        }
    }
}

impl fmt::Display for StarHue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StarHue::Blue => "blue",
            StarHue::BlueWhite => "blue-white",
            StarHue::Yellow => "yellow",
            StarHue::Orange => "orange",
            StarHue::Red => "red",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramPoint {
    pub g_r: f64,
    pub magnitude: f64,
    pub view: MagnitudeView,
    pub hue: StarHue,
}

impl DiagramPoint {
    pub fn within_axes(&self) -> bool {
        let (x_min, x_max) = G_R_AXIS;
        let (y_faint, y_bright) = MAGNITUDE_AXIS;
        (x_min..=x_max).contains(&self.g_r) && (y_bright..=y_faint).contains(&self.magnitude)
    }
}

pub fn place_on_diagram(result: &PredictionResult, view: MagnitudeView) -> Result<DiagramPoint> {
    let apparent = result.magnitudes.g;
    let magnitude = match view {
        MagnitudeView::PseudoAbsolute => to_absolute_magnitude(apparent, REFERENCE_DISTANCE_PC)?,
        MagnitudeView::Apparent => apparent,
    };
    Ok(DiagramPoint {
        g_r: result.colors.g_r,
        magnitude,
        view,
        hue: StarHue::from_g_r(result.colors.g_r),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::merge::merge_result;
    use crate::core::photometry::compute_color_indices;
    use crate::domain::model::{ExtinctionParameters, MagnitudeSet, RawPrediction};

    #[test]
    fn test_absolute_magnitude_at_reference_distance() {
        assert_eq!(to_absolute_magnitude(15.0, 100.0).unwrap(), 10.0);
        assert_eq!(to_absolute_magnitude(15.0, 10.0).unwrap(), 15.0);
    }

    #[test]
    fn test_absolute_magnitude_rejects_bad_distance() {
        for distance in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                to_absolute_magnitude(15.0, distance),
                Err(StellarError::InvalidDistance { .. })
            ));
        }
    }

    #[test]
    fn test_view_toggle() {
        let view = MagnitudeView::default();
        assert_eq!(view, MagnitudeView::PseudoAbsolute);
        assert_eq!(view.toggled(), MagnitudeView::Apparent);
        assert_eq!(view.toggled().toggled(), view);
    }

    #[test]
    fn test_hue_buckets() {
        assert_eq!(StarHue::from_g_r(-0.2), StarHue::Blue);
        assert_eq!(StarHue::from_g_r(0.0), StarHue::BlueWhite);
        assert_eq!(StarHue::from_g_r(0.4), StarHue::Yellow);
        assert_eq!(StarHue::from_g_r(0.75), StarHue::Orange);
        assert_eq!(StarHue::from_g_r(1.4), StarHue::Red);
    }

    #[test]
    fn test_place_in_both_views() {
        let star = MagnitudeSet {
            u: 18.5,
            g: 17.2,
            r: 16.8,
            i: 16.5,
            z: 16.3,
        };
        let result = merge_result(
            RawPrediction::default(),
            &star,
            &compute_color_indices(&star),
            &ExtinctionParameters::none(),
        );

        let absolute = place_on_diagram(&result, MagnitudeView::PseudoAbsolute).unwrap();
        assert!((absolute.magnitude - 12.2).abs() < 1e-9);
        assert!((absolute.g_r - 0.4).abs() < 1e-9);
        assert_eq!(absolute.hue, StarHue::Yellow);
        assert!(absolute.within_axes());

        let apparent = place_on_diagram(&result, MagnitudeView::Apparent).unwrap();
        assert_eq!(apparent.magnitude, 17.2);
        assert!(!apparent.within_axes());
    }
}
