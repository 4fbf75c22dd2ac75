//! # Bar Arrangement Optimizer
//!
//! Searches the bar catalog for a constructible layout (diameter x count x
//! layers) providing at least the required tension steel area, under the
//! IS 456 spacing and cover rules.
//!
//! ## Rules Applied
//!
//! - Clear spacing between bars >= max(bar diameter, aggregate size + 5 mm, 25 mm)
//! - Bars that do not fit one row spill into further layers, up to `max_layers`
//! - A row never holds more than `max_bars_per_layer` bars
//! - At least `min_total_bars` bars regardless of area demand
//!
//! ## Example
//!
//! ```rust
//! use design_core::arrangement::{ArrangementInput, optimize_arrangement};
//! use design_core::materials::BarSize;
//!
//! let input = ArrangementInput {
//!     ast_required_mm2: 804.0,
//!     b_mm: 300.0,
//!     cover_mm: 40.0,
//!     stirrup_dia_mm: 8.0,
//!     allowed_sizes: vec![BarSize::D16, BarSize::D20, BarSize::D25],
//!     ..ArrangementInput::default()
//! };
//!
//! let result = optimize_arrangement(&input).unwrap();
//! let chosen = result.chosen.unwrap();
//! assert_eq!(chosen.bar_size, BarSize::D20);
//! assert_eq!(chosen.count, 3);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::errors::{DesignError, DesignResult};
use crate::materials::BarSize;

/// Upper bound on ranked alternatives returned alongside the chosen layout
const MAX_ALTERNATIVES: usize = 4;

/// Selection objective for the arrangement search.
///
/// A closed enum with an associated comparison key: adding an objective is
/// a compile-time change, not a string branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Objective {
    /// Least steel area provided (ties: fewer bars, then smaller diameter)
    MinArea,
    /// Fewest bars to place (ties: smaller diameter)
    #[default]
    MinBarCount,
}

impl Objective {
    /// Rank two feasible candidates under this objective.
    pub fn compare(&self, a: &ArrangementCandidate, b: &ArrangementCandidate) -> Ordering {
        match self {
            Objective::MinArea => a
                .area_provided_mm2
                .partial_cmp(&b.area_provided_mm2)
                .unwrap_or(Ordering::Equal)
                .then(a.count.cmp(&b.count))
                .then(a.bar_size.cmp(&b.bar_size)),
            Objective::MinBarCount => a
                .count
                .cmp(&b.count)
                .then(a.bar_size.cmp(&b.bar_size)),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Objective::MinArea => "Minimum steel area",
            Objective::MinBarCount => "Minimum bar count",
        }
    }
}

/// Input parameters for the arrangement search.
///
/// ## JSON Example
///
/// ```json
/// {
///   "ast_required_mm2": 804.0,
///   "b_mm": 300.0,
///   "cover_mm": 40.0,
///   "stirrup_dia_mm": 8.0,
///   "allowed_sizes": ["D16", "D20", "D25"],
///   "max_layers": 2,
///   "objective": "MinBarCount",
///   "agg_size_mm": 20.0,
///   "min_total_bars": 3,
///   "max_bars_per_layer": 6
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrangementInput {
    /// Required tension steel area (mm^2), from the strength calculator
    pub ast_required_mm2: f64,

    /// Section width (mm)
    pub b_mm: f64,

    /// Clear cover to the stirrup face (mm)
    pub cover_mm: f64,

    /// Stirrup diameter (mm); offsets the main bars inward
    pub stirrup_dia_mm: f64,

    /// Candidate bar sizes, in catalog order
    pub allowed_sizes: Vec<BarSize>,

    /// Maximum stacked bar layers
    pub max_layers: u32,

    /// Selection objective
    pub objective: Objective,

    /// Nominal maximum aggregate size (mm); drives minimum clear spacing
    pub agg_size_mm: f64,

    /// Lower bound on total bars regardless of area demand
    pub min_total_bars: u32,

    /// Upper bound on bars in any one layer
    pub max_bars_per_layer: u32,
}

impl Default for ArrangementInput {
    fn default() -> Self {
        ArrangementInput {
            ast_required_mm2: 0.0,
            b_mm: 300.0,
            cover_mm: 25.0,
            stirrup_dia_mm: 8.0,
            allowed_sizes: BarSize::BEAM_FLEXURE.to_vec(),
            max_layers: 2,
            objective: Objective::default(),
            agg_size_mm: 20.0,
            min_total_bars: 3,
            max_bars_per_layer: 6,
        }
    }
}

impl ArrangementInput {
    /// Validate input parameters. Geometry that merely cannot fit any bars
    /// is a feasibility outcome, not an input error; only structural
    /// nonsense is rejected here.
    pub fn validate(&self) -> DesignResult<()> {
        if !self.ast_required_mm2.is_finite() || self.ast_required_mm2 <= 0.0 {
            return Err(DesignError::invalid_input(
                "ast_required_mm2",
                self.ast_required_mm2.to_string(),
                "Required steel area must be positive",
            ));
        }
        if !self.b_mm.is_finite() || self.b_mm <= 0.0 {
            return Err(DesignError::invalid_input(
                "b_mm",
                self.b_mm.to_string(),
                "Section width must be positive",
            ));
        }
        if self.cover_mm < 0.0 || self.stirrup_dia_mm < 0.0 || self.agg_size_mm < 0.0 {
            return Err(DesignError::invalid_input(
                "cover_mm/stirrup_dia_mm/agg_size_mm",
                format!(
                    "{}/{}/{}",
                    self.cover_mm, self.stirrup_dia_mm, self.agg_size_mm
                ),
                "Cover, stirrup diameter, and aggregate size cannot be negative",
            ));
        }
        if self.allowed_sizes.is_empty() {
            return Err(DesignError::missing_field("allowed_sizes"));
        }
        if self.max_layers < 1 {
            return Err(DesignError::invalid_input(
                "max_layers",
                self.max_layers.to_string(),
                "At least one layer is required",
            ));
        }
        if self.max_bars_per_layer < 1 {
            return Err(DesignError::invalid_input(
                "max_bars_per_layer",
                self.max_bars_per_layer.to_string(),
                "At least one bar per layer is required",
            ));
        }
        if self.min_total_bars < 1 {
            return Err(DesignError::invalid_input(
                "min_total_bars",
                self.min_total_bars.to_string(),
                "At least one bar is required",
            ));
        }
        Ok(())
    }

    /// Minimum clear spacing between parallel bars of the given diameter
    /// (IS 456 26.3.2: bar diameter, aggregate + 5 mm, absolute 25 mm floor)
    pub fn required_clear_spacing_mm(&self, diameter_mm: f64) -> f64 {
        diameter_mm.max(self.agg_size_mm + 5.0).max(25.0)
    }

    /// Width available between the outermost bar centers of one row (mm).
    /// Negative when cover and stirrups already consume the section.
    pub fn row_center_span_mm(&self, diameter_mm: f64) -> f64 {
        self.b_mm - 2.0 * (self.cover_mm + self.stirrup_dia_mm) - diameter_mm
    }
}

/// One diameter's packing outcome, feasible or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrangementCandidate {
    /// Bar size used throughout the arrangement
    pub bar_size: BarSize,

    /// Total bars
    pub count: u32,

    /// Layers used
    pub layers: u32,

    /// Bars in each layer, outermost layer first
    pub bars_per_layer: Vec<u32>,

    /// Clear spacing provided in the fullest row (mm)
    pub spacing_mm: f64,

    /// Steel area provided (mm^2)
    pub area_provided_mm2: f64,

    /// True when the layout satisfies every geometric rule
    pub is_feasible: bool,

    /// Constraint that ruled the layout out, when infeasible
    pub violation: Option<String>,
}

/// Result of an arrangement search. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrangementResult {
    /// Best feasible layout under the objective, if any
    pub chosen: Option<ArrangementCandidate>,

    /// Remaining feasible layouts, ranked by the same objective
    pub alternatives: Vec<ArrangementCandidate>,

    /// True when `chosen` is present
    pub is_feasible: bool,

    /// Human-readable outcome summary; cites the binding constraint on failure
    pub remarks: String,
}

/// Pack one diameter and report the outcome.
fn pack_diameter(input: &ArrangementInput, size: BarSize) -> ArrangementCandidate {
    let dia = size.diameter_mm();
    let area = size.area_mm2();
    let count = ((input.ast_required_mm2 / area).ceil() as u32).max(input.min_total_bars);
    let spacing_req = input.required_clear_spacing_mm(dia);
    let center_span = input.row_center_span_mm(dia);

    let infeasible = |violation: String| ArrangementCandidate {
        bar_size: size,
        count,
        layers: 0,
        bars_per_layer: Vec::new(),
        spacing_mm: 0.0,
        area_provided_mm2: count as f64 * area,
        is_feasible: false,
        violation: Some(violation),
    };

    if center_span < 0.0 {
        return infeasible(format!(
            "available width is negative ({:.0} mm); cover and stirrups leave no room for {} bars",
            center_span, size
        ));
    }

    // Row capacity from width: n bars need (n-1)*(dia + spacing) <= center span
    let capacity_from_width = (center_span / (dia + spacing_req)).floor() as u32 + 1;
    let per_row = capacity_from_width.min(input.max_bars_per_layer);

    let layers = count.div_ceil(per_row);
    if layers > input.max_layers {
        let violation = if count > input.max_layers * input.max_bars_per_layer {
            format!(
                "{} bars exceed the layer capacity of {} layers x {} bars",
                count, input.max_layers, input.max_bars_per_layer
            )
        } else {
            format!(
                "row width fits only {} bars of {}, needing {} layers (max {})",
                per_row, size, layers, input.max_layers
            )
        };
        return infeasible(violation);
    }

    // Distribute bars across layers, fullest rows first
    let mut bars_per_layer = Vec::with_capacity(layers as usize);
    let mut remaining = count;
    for _ in 0..layers {
        let in_row = remaining.min(per_row);
        bars_per_layer.push(in_row);
        remaining -= in_row;
    }

    // Clear spacing actually provided in the fullest row
    let fullest = bars_per_layer[0];
    let spacing_mm = if fullest >= 2 {
        center_span / (fullest - 1) as f64 - dia
    } else {
        center_span
    };

    ArrangementCandidate {
        bar_size: size,
        count,
        layers,
        bars_per_layer,
        spacing_mm,
        area_provided_mm2: count as f64 * area,
        is_feasible: true,
        violation: None,
    }
}

/// Search the allowed bar sizes for the best constructible arrangement.
///
/// Pure and deterministic: identical inputs produce an identical chosen
/// layout and identical alternative ordering.
///
/// # Returns
///
/// * `Ok(ArrangementResult)` - outcome, feasible or not (infeasibility is data)
/// * `Err(DesignError)` - structurally invalid input only
pub fn optimize_arrangement(input: &ArrangementInput) -> DesignResult<ArrangementResult> {
    input.validate()?;

    let candidates: Vec<ArrangementCandidate> = input
        .allowed_sizes
        .iter()
        .map(|&size| pack_diameter(input, size))
        .collect();

    let mut feasible: Vec<ArrangementCandidate> = candidates
        .iter()
        .filter(|c| c.is_feasible)
        .cloned()
        .collect();
    feasible.sort_by(|a, b| input.objective.compare(a, b));

    if feasible.is_empty() {
        // Cite the binding constraint. When every diameter dies on row/layer
        // capacity, the width and layer limits govern; otherwise the catalog
        // range does.
        let detail = candidates
            .iter()
            .max_by(|a, b| {
                a.bar_size
                    .diameter_mm()
                    .partial_cmp(&b.bar_size.diameter_mm())
                    .unwrap_or(Ordering::Equal)
            })
            .and_then(|largest| largest.violation.clone())
            .unwrap_or_else(|| "no candidate diameter".to_string());
        let remarks = format!(
            "No feasible arrangement for {:.0} mm2 in a {:.0} mm wide section: {}. \
             Consider a wider section, more layers, or larger bars.",
            input.ast_required_mm2, input.b_mm, detail
        );
        return Ok(ArrangementResult {
            chosen: None,
            alternatives: Vec::new(),
            is_feasible: false,
            remarks,
        });
    }

    let chosen = feasible.remove(0);
    feasible.truncate(MAX_ALTERNATIVES);
    let remarks = format!(
        "{} x {} in {} layer(s): {:.0} mm2 provided for {:.0} mm2 required ({})",
        chosen.count,
        chosen.bar_size,
        chosen.layers,
        chosen.area_provided_mm2,
        input.ast_required_mm2,
        input.objective.display_name()
    );

    Ok(ArrangementResult {
        chosen: Some(chosen),
        alternatives: feasible,
        is_feasible: true,
        remarks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 804 mm^2 in a 300 wide section, the worked example geometry
    fn test_input() -> ArrangementInput {
        ArrangementInput {
            ast_required_mm2: 804.0,
            b_mm: 300.0,
            cover_mm: 40.0,
            stirrup_dia_mm: 8.0,
            allowed_sizes: vec![BarSize::D16, BarSize::D20, BarSize::D25],
            max_layers: 2,
            ..ArrangementInput::default()
        }
    }

    #[test]
    fn test_min_bar_count_picks_three_20s() {
        let result = optimize_arrangement(&test_input()).unwrap();
        assert!(result.is_feasible);
        let chosen = result.chosen.unwrap();
        // 20 mm and 25 mm both land on 3 bars (25 mm clamped up to the
        // 3-bar minimum); the smaller diameter wins the tie.
        assert_eq!(chosen.bar_size, BarSize::D20);
        assert_eq!(chosen.count, 3);
        assert_eq!(chosen.layers, 1);
        assert!(chosen.area_provided_mm2 >= 804.0);
        assert!((chosen.area_provided_mm2 - 942.48).abs() < 0.1);
    }

    #[test]
    fn test_min_area_picks_four_16s() {
        let input = ArrangementInput {
            objective: Objective::MinArea,
            ..test_input()
        };
        let result = optimize_arrangement(&input).unwrap();
        let chosen = result.chosen.unwrap();
        // 4 x 16 = 804.2 mm^2 barely covers the demand and beats 3 x 20
        assert_eq!(chosen.bar_size, BarSize::D16);
        assert_eq!(chosen.count, 4);
        assert!(chosen.area_provided_mm2 >= 804.0);
        assert!(chosen.area_provided_mm2 < 810.0);
    }

    #[test]
    fn test_narrow_section_infeasible_cites_limits() {
        let input = ArrangementInput {
            ast_required_mm2: 6000.0,
            b_mm: 230.0,
            max_bars_per_layer: 4,
            ..test_input()
        };
        let result = optimize_arrangement(&input).unwrap();
        assert!(!result.is_feasible);
        assert!(result.chosen.is_none());
        assert!(result.alternatives.is_empty());
        let remarks = result.remarks.to_lowercase();
        assert!(remarks.contains("layer") || remarks.contains("width"));
    }

    #[test]
    fn test_area_always_covers_demand() {
        for ast in [150.0, 804.0, 1500.0, 2400.0] {
            let input = ArrangementInput {
                ast_required_mm2: ast,
                b_mm: 350.0,
                ..ArrangementInput::default()
            };
            let result = optimize_arrangement(&input).unwrap();
            if let Some(chosen) = &result.chosen {
                assert!(chosen.area_provided_mm2 >= ast);
            }
            for alt in &result.alternatives {
                assert!(alt.area_provided_mm2 >= ast);
            }
        }
    }

    #[test]
    fn test_layer_and_row_limits_respected() {
        let input = ArrangementInput {
            ast_required_mm2: 3200.0,
            b_mm: 300.0,
            max_layers: 3,
            max_bars_per_layer: 4,
            ..ArrangementInput::default()
        };
        let result = optimize_arrangement(&input).unwrap();
        if let Some(chosen) = &result.chosen {
            assert!(chosen.layers <= 3);
            assert!(chosen.count <= 3 * 4);
            for row in &chosen.bars_per_layer {
                assert!(*row <= 4);
            }
            assert_eq!(chosen.bars_per_layer.iter().sum::<u32>(), chosen.count);
        }
    }

    #[test]
    fn test_spilling_into_second_layer() {
        // 2000 mm^2 of 16 mm bars in a 230 section: 10 bars cannot sit in
        // one row, so the layout spills.
        let input = ArrangementInput {
            ast_required_mm2: 2000.0,
            b_mm: 230.0,
            cover_mm: 30.0,
            stirrup_dia_mm: 8.0,
            allowed_sizes: vec![BarSize::D16],
            max_layers: 4,
            ..ArrangementInput::default()
        };
        let result = optimize_arrangement(&input).unwrap();
        let chosen = result.chosen.unwrap();
        assert_eq!(chosen.count, 10);
        assert!(chosen.layers >= 2);
    }

    #[test]
    fn test_minimum_bar_count_applies() {
        let input = ArrangementInput {
            ast_required_mm2: 100.0,
            ..ArrangementInput::default()
        };
        let result = optimize_arrangement(&input).unwrap();
        let chosen = result.chosen.unwrap();
        assert_eq!(chosen.count, 3);
    }

    #[test]
    fn test_spacing_meets_code_minimum() {
        let input = test_input();
        let result = optimize_arrangement(&input).unwrap();
        let chosen = result.chosen.unwrap();
        let required = input.required_clear_spacing_mm(chosen.bar_size.diameter_mm());
        assert!(chosen.spacing_mm >= required);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let input = test_input();
        let first = optimize_arrangement(&input).unwrap();
        let second = optimize_arrangement(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_alternatives_ranked_and_bounded() {
        let input = ArrangementInput {
            ast_required_mm2: 900.0,
            b_mm: 400.0,
            allowed_sizes: BarSize::BEAM_FLEXURE.to_vec(),
            ..ArrangementInput::default()
        };
        let result = optimize_arrangement(&input).unwrap();
        let chosen = result.chosen.unwrap();
        assert!(result.alternatives.len() <= 4);
        for alt in &result.alternatives {
            assert_ne!(input.objective.compare(&chosen, alt), std::cmp::Ordering::Greater);
        }
        for pair in result.alternatives.windows(2) {
            assert_ne!(
                input.objective.compare(&pair[0], &pair[1]),
                std::cmp::Ordering::Greater
            );
        }
    }

    #[test]
    fn test_invalid_area_rejected() {
        let input = ArrangementInput {
            ast_required_mm2: -804.0,
            ..ArrangementInput::default()
        };
        let err = optimize_arrangement(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let input = ArrangementInput {
            ast_required_mm2: 804.0,
            allowed_sizes: vec![],
            ..ArrangementInput::default()
        };
        let err = optimize_arrangement(&input).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let result = optimize_arrangement(&test_input()).unwrap();
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("area_provided_mm2"));
        let roundtrip: ArrangementResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, roundtrip);
    }
}
