//! Cut-Length Calculation
//!
//! Converts a reinforcement element's geometry into the straight length of
//! bar the cutter needs, applying hook allowances and bend deductions per
//! IS 2502 practice: a hook adds a diameter multiple, and every bend
//! shortens the bar by one diameter per 45 degrees of bend.

use serde::{Deserialize, Serialize};

use crate::errors::{DesignError, DesignResult};
use crate::materials::BarSize;

/// End hook applied to a stirrup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HookType {
    /// No hook (open stirrup or welded closure)
    None,
    /// Standard 90 degree hook
    Standard90,
    /// 135 degree seismic hook
    #[default]
    Seismic135,
}

impl HookType {
    pub fn display_name(&self) -> &'static str {
        match self {
            HookType::None => "No hook",
            HookType::Standard90 => "90 deg hook",
            HookType::Seismic135 => "135 deg seismic hook",
        }
    }

    /// Angle the hook bends through, when present
    pub fn bend_angle(&self) -> Option<BendAngle> {
        match self {
            HookType::None => None,
            HookType::Standard90 => Some(BendAngle::Deg90),
            HookType::Seismic135 => Some(BendAngle::Deg135),
        }
    }
}

impl std::fmt::Display for HookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Bend angle at a corner or hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BendAngle {
    Deg45,
    Deg90,
    Deg135,
}

impl BendAngle {
    pub fn degrees(&self) -> f64 {
        match self {
            BendAngle::Deg45 => 45.0,
            BendAngle::Deg90 => 90.0,
            BendAngle::Deg135 => 135.0,
        }
    }
}

/// Hook-length multipliers and bend deductions used when converting bent
/// shapes to cut lengths.
///
/// Defaults follow the common schedule values: 8d for a 90 degree hook,
/// 10d for a 135 degree seismic hook (never less than 75 mm), and one bar
/// diameter of deduction per 45 degrees of bend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BendPolicy {
    /// Hook applied to stirrup ends
    pub stirrup_hook: HookType,

    /// Hook length in bar diameters for 90 degree hooks
    pub hook_multiplier_90: f64,

    /// Hook length in bar diameters for 135 degree hooks
    pub hook_multiplier_135: f64,

    /// Absolute floor on a hook length (mm)
    pub min_hook_length_mm: f64,

    /// Bend deduction in bar diameters per 45 degrees of bend
    pub deduction_diameters_per_45deg: f64,
}

impl Default for BendPolicy {
    fn default() -> Self {
        BendPolicy {
            stirrup_hook: HookType::Seismic135,
            hook_multiplier_90: 8.0,
            hook_multiplier_135: 10.0,
            min_hook_length_mm: 75.0,
            deduction_diameters_per_45deg: 1.0,
        }
    }
}

impl BendPolicy {
    /// Length added per stirrup hook (mm)
    pub fn hook_length_mm(&self, diameter_mm: f64) -> f64 {
        let multiplier = match self.stirrup_hook {
            HookType::None => return 0.0,
            HookType::Standard90 => self.hook_multiplier_90,
            HookType::Seismic135 => self.hook_multiplier_135,
        };
        (multiplier * diameter_mm).max(self.min_hook_length_mm)
    }

    /// Length removed per bend (mm)
    pub fn bend_deduction_mm(&self, angle: BendAngle, diameter_mm: f64) -> f64 {
        angle.degrees() / 45.0 * self.deduction_diameters_per_45deg * diameter_mm
    }
}

/// Geometry of one reinforcement element, before cut-length conversion.
///
/// ## JSON Examples
///
/// ```json
/// { "type": "Straight", "length_mm": 5800.0, "end_allowance_mm": 150.0 }
/// { "type": "Stirrup", "member_b_mm": 300.0, "member_d_mm": 500.0, "cover_mm": 25.0, "legs": 2 }
/// { "type": "Crank", "length_mm": 6000.0, "crank_depth_mm": 400.0, "cranked_ends": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BarShapeSpec {
    /// Straight bar: member length plus an anchorage allowance per end
    Straight {
        length_mm: f64,
        end_allowance_mm: f64,
    },
    /// Closed stirrup around the member cross-section
    Stirrup {
        member_b_mm: f64,
        member_d_mm: f64,
        cover_mm: f64,
        /// 2 for a plain closed stirrup, 4 for a continuous double loop
        legs: u32,
    },
    /// Bent-up (cranked) bar: straight length plus crank extension
    Crank {
        length_mm: f64,
        crank_depth_mm: f64,
        /// Ends carrying a crank (1 or 2)
        cranked_ends: u32,
    },
}

impl BarShapeSpec {
    /// Schedule shape code (BS 8666 style)
    pub fn shape_code(&self) -> &'static str {
        match self {
            BarShapeSpec::Straight { .. } => "00",
            BarShapeSpec::Stirrup { .. } => "51",
            BarShapeSpec::Crank { .. } => "41",
        }
    }

    /// Short description for schedule remarks
    pub fn description(&self) -> String {
        match self {
            BarShapeSpec::Straight { .. } => "Straight bar".to_string(),
            BarShapeSpec::Stirrup { legs, .. } => format!("Closed stirrup, {} legs", legs),
            BarShapeSpec::Crank { cranked_ends, .. } => {
                format!("Cranked bar, {} end(s)", cranked_ends)
            }
        }
    }

    pub fn validate(&self) -> DesignResult<()> {
        match self {
            BarShapeSpec::Straight { length_mm, .. } => {
                if !length_mm.is_finite() || *length_mm <= 0.0 {
                    return Err(DesignError::invalid_input(
                        "length_mm",
                        length_mm.to_string(),
                        "Straight bar length must be positive",
                    ));
                }
            }
            BarShapeSpec::Stirrup {
                member_b_mm,
                member_d_mm,
                cover_mm,
                legs,
            } => {
                if *cover_mm < 0.0 {
                    return Err(DesignError::invalid_input(
                        "cover_mm",
                        cover_mm.to_string(),
                        "Cover cannot be negative",
                    ));
                }
                if member_b_mm - 2.0 * cover_mm <= 0.0 || member_d_mm - 2.0 * cover_mm <= 0.0 {
                    return Err(DesignError::invalid_input(
                        "member_b_mm/member_d_mm",
                        format!("{}/{}", member_b_mm, member_d_mm),
                        "Cover consumes the whole cross-section",
                    ));
                }
                if *legs != 2 && *legs != 4 {
                    return Err(DesignError::invalid_input(
                        "legs",
                        legs.to_string(),
                        "Stirrups are fabricated with 2 or 4 legs",
                    ));
                }
            }
            BarShapeSpec::Crank {
                length_mm,
                crank_depth_mm,
                cranked_ends,
            } => {
                if !length_mm.is_finite() || *length_mm <= 0.0 {
                    return Err(DesignError::invalid_input(
                        "length_mm",
                        length_mm.to_string(),
                        "Cranked bar length must be positive",
                    ));
                }
                if *crank_depth_mm < 0.0 {
                    return Err(DesignError::invalid_input(
                        "crank_depth_mm",
                        crank_depth_mm.to_string(),
                        "Crank depth cannot be negative",
                    ));
                }
                if *cranked_ends != 1 && *cranked_ends != 2 {
                    return Err(DesignError::invalid_input(
                        "cranked_ends",
                        cranked_ends.to_string(),
                        "A bar cranks at one or both ends",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Cut length for this shape in the given bar size (mm).
    ///
    /// Stirrup: enclosed-perimeter loops plus two hooks, less one bend
    /// deduction per corner and per hook bend. A 2-legged stirrup has 3
    /// corner bends; the 4-legged continuous loop has 7.
    /// Crank: each cranked end adds 0.42 x crank depth and bends twice
    /// through 45 degrees.
    pub fn cut_length_mm(&self, size: BarSize, policy: &BendPolicy) -> f64 {
        let dia = size.diameter_mm();
        match self {
            BarShapeSpec::Straight {
                length_mm,
                end_allowance_mm,
            } => length_mm + 2.0 * end_allowance_mm,
            BarShapeSpec::Stirrup {
                member_b_mm,
                member_d_mm,
                cover_mm,
                legs,
            } => {
                let a = member_b_mm - 2.0 * cover_mm;
                let b = member_d_mm - 2.0 * cover_mm;
                let loops = (*legs as f64) / 2.0;
                let perimeter = 2.0 * (a + b);
                let corner_bends = (2 * legs - 1) as f64;
                let corner_deduction =
                    corner_bends * policy.bend_deduction_mm(BendAngle::Deg90, dia);
                let (hooks, hook_deduction) = match policy.stirrup_hook.bend_angle() {
                    Some(angle) => (
                        2.0 * policy.hook_length_mm(dia),
                        2.0 * policy.bend_deduction_mm(angle, dia),
                    ),
                    None => (0.0, 0.0),
                };
                loops * perimeter + hooks - corner_deduction - hook_deduction
            }
            BarShapeSpec::Crank {
                length_mm,
                crank_depth_mm,
                cranked_ends,
            } => {
                let ends = *cranked_ends as f64;
                let extension = 0.42 * crank_depth_mm * ends;
                let deduction = 2.0 * ends * policy.bend_deduction_mm(BendAngle::Deg45, dia);
                length_mm + extension - deduction
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_bar_with_allowance() {
        let shape = BarShapeSpec::Straight {
            length_mm: 5800.0,
            end_allowance_mm: 150.0,
        };
        assert_eq!(shape.cut_length_mm(BarSize::D16, &BendPolicy::default()), 6100.0);
    }

    #[test]
    fn test_stirrup_seismic_hooks_known_value() {
        // 300 x 500 member, 25 cover, 8 mm stirrup with 135 hooks:
        // 2(250 + 450) + 2 x 80 - 3 x 16 - 2 x 24 = 1464
        let shape = BarShapeSpec::Stirrup {
            member_b_mm: 300.0,
            member_d_mm: 500.0,
            cover_mm: 25.0,
            legs: 2,
        };
        let cut = shape.cut_length_mm(BarSize::D8, &BendPolicy::default());
        assert!((cut - 1464.0).abs() < 0.01);
    }

    #[test]
    fn test_stirrup_hook_floor_applies_to_small_bars() {
        // 8 mm with 90 hooks: 8 x 8 = 64 < 75, so the floor governs
        let policy = BendPolicy {
            stirrup_hook: HookType::Standard90,
            ..BendPolicy::default()
        };
        assert_eq!(policy.hook_length_mm(8.0), 75.0);
        assert_eq!(policy.hook_length_mm(12.0), 96.0);
    }

    #[test]
    fn test_stirrup_without_hooks() {
        let policy = BendPolicy {
            stirrup_hook: HookType::None,
            ..BendPolicy::default()
        };
        let shape = BarShapeSpec::Stirrup {
            member_b_mm: 300.0,
            member_d_mm: 500.0,
            cover_mm: 25.0,
            legs: 2,
        };
        // 1400 - 3 x 16, no hook terms
        let cut = shape.cut_length_mm(BarSize::D8, &policy);
        assert!((cut - 1352.0).abs() < 0.01);
    }

    #[test]
    fn test_four_legged_stirrup_doubles_perimeter() {
        let two = BarShapeSpec::Stirrup {
            member_b_mm: 300.0,
            member_d_mm: 500.0,
            cover_mm: 25.0,
            legs: 2,
        };
        let four = BarShapeSpec::Stirrup {
            member_b_mm: 300.0,
            member_d_mm: 500.0,
            cover_mm: 25.0,
            legs: 4,
        };
        let policy = BendPolicy::default();
        let cut2 = two.cut_length_mm(BarSize::D8, &policy);
        let cut4 = four.cut_length_mm(BarSize::D8, &policy);
        // Extra loop adds one perimeter less four more corner deductions
        assert!((cut4 - cut2 - (1400.0 - 4.0 * 16.0)).abs() < 0.01);
    }

    #[test]
    fn test_crank_extension_and_deduction() {
        // 6000 + 2 x 0.42 x 400 - 4 x 16 = 6272 for 16 mm
        let shape = BarShapeSpec::Crank {
            length_mm: 6000.0,
            crank_depth_mm: 400.0,
            cranked_ends: 2,
        };
        let cut = shape.cut_length_mm(BarSize::D16, &BendPolicy::default());
        assert!((cut - 6272.0).abs() < 0.01);
    }

    #[test]
    fn test_bend_deduction_scales_with_angle() {
        let policy = BendPolicy::default();
        assert_eq!(policy.bend_deduction_mm(BendAngle::Deg45, 16.0), 16.0);
        assert_eq!(policy.bend_deduction_mm(BendAngle::Deg90, 16.0), 32.0);
        assert_eq!(policy.bend_deduction_mm(BendAngle::Deg135, 16.0), 48.0);
    }

    #[test]
    fn test_shape_codes() {
        let straight = BarShapeSpec::Straight {
            length_mm: 1000.0,
            end_allowance_mm: 0.0,
        };
        assert_eq!(straight.shape_code(), "00");
        let stirrup = BarShapeSpec::Stirrup {
            member_b_mm: 300.0,
            member_d_mm: 500.0,
            cover_mm: 25.0,
            legs: 2,
        };
        assert_eq!(stirrup.shape_code(), "51");
    }

    #[test]
    fn test_validate_rejects_odd_legs() {
        let shape = BarShapeSpec::Stirrup {
            member_b_mm: 300.0,
            member_d_mm: 500.0,
            cover_mm: 25.0,
            legs: 3,
        };
        assert!(shape.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_cover_eating_section() {
        let shape = BarShapeSpec::Stirrup {
            member_b_mm: 100.0,
            member_d_mm: 500.0,
            cover_mm: 50.0,
            legs: 2,
        };
        assert!(shape.validate().is_err());
    }

    #[test]
    fn test_shape_serialization() {
        let shape = BarShapeSpec::Stirrup {
            member_b_mm: 300.0,
            member_d_mm: 500.0,
            cover_mm: 25.0,
            legs: 2,
        };
        let json = serde_json::to_string(&shape).unwrap();
        assert!(json.contains("\"type\":\"Stirrup\""));
        let roundtrip: BarShapeSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(shape, roundtrip);
    }
}
