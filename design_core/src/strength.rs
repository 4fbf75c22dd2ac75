//! # Strength-Check Interface
//!
//! The section search consumes a flexure/shear calculator but does not own
//! one: the stress-block code formulas live in a separate crate. This module
//! defines the seam. Implementations must be pure - same inputs, same
//! outputs - because the search relies on deterministic candidate ranking.

use serde::{Deserialize, Serialize};

use crate::materials::{ConcreteGrade, SteelGrade};

/// Outcome of a flexure/shear strength check on one trial section.
///
/// A failed check is data, not an error: `ast_required_mm2` may still be
/// reported (e.g., the section fails shear but the flexural demand was
/// computable) and the caller decides what to do with the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthEvaluation {
    /// Tension steel area demanded by the factored moment (mm^2)
    pub ast_required_mm2: f64,

    /// True when the section can carry the factored moment
    pub is_flexure_ok: bool,

    /// True when the section can carry the factored shear
    pub is_shear_ok: bool,

    /// Reason for the governing failure, when any check fails
    pub failure_reason: Option<String>,
}

impl StrengthEvaluation {
    /// True when both strength checks pass
    pub fn is_ok(&self) -> bool {
        self.is_flexure_ok && self.is_shear_ok
    }
}

/// Flexure/shear calculator consumed by the section search.
///
/// # Arguments to `evaluate`
///
/// * `b_mm` - section width
/// * `d_overall_mm` - overall depth D
/// * `d_eff_mm` - effective depth d
/// * `concrete` / `steel` - material grades
/// * `mu_knm` - factored design moment
/// * `vu_kn` - factored design shear
pub trait FlexureShearCalculator {
    fn evaluate(
        &self,
        b_mm: f64,
        d_overall_mm: f64,
        d_eff_mm: f64,
        concrete: ConcreteGrade,
        steel: SteelGrade,
        mu_knm: f64,
        vu_kn: f64,
    ) -> StrengthEvaluation;
}
