//! # Section and Material Search
//!
//! Enumerates candidate width x depth x grade combinations for a beam,
//! prices every candidate that survives the strength checks, and returns
//! the minimum-cost design with ranked alternatives and a savings figure
//! against a conservative baseline.
//!
//! The strength checks themselves are external: the search consumes a
//! [`FlexureShearCalculator`](crate::strength::FlexureShearCalculator) and
//! treats per-candidate failures as data, never as errors.
//!
//! ## Cost Model
//!
//! total = (concrete volume x grade rate
//!          + steel weight x steel rate
//!          + formwork contact area x formwork rate
//!          + congestion labor adjustment) x location factor
//!
//! The congestion adjustment prices the extra fixing labor of densely
//! reinforced sections: when the steel percentage pt exceeds the profile's
//! threshold, the steel cost is scaled by the congestion multiplier.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{DesignError, DesignResult};
use crate::materials::{ConcreteGrade, GradePair, SteelGrade, STANDARD_GRADE_PAIRS};
use crate::strength::FlexureShearCalculator;

/// Alternatives reported alongside the optimal candidate
const MAX_ALTERNATIVES: usize = 5;

/// Allowance from the overall depth down to the effective depth:
/// stirrup leg (8 mm) plus half of an assumed 16 mm main bar.
const EFFECTIVE_DEPTH_ALLOWANCE_MM: f64 = 16.0;

/// Steel density (kg/m^3)
const STEEL_DENSITY_KG_M3: f64 = 7850.0;

/// Standard formwork widths (mm) stocked by most contractors
pub static STANDARD_WIDTHS_MM: [f64; 5] = [230.0, 250.0, 300.0, 350.0, 400.0];

/// Standard overall depths (mm), 300 to 750 in 50 mm steps
pub static STANDARD_DEPTHS_MM: Lazy<Vec<f64>> =
    Lazy::new(|| (0..10).map(|i| 300.0 + 50.0 * i as f64).collect());

/// Cooperative cancellation flag for the grid search.
///
/// Clonable and cheap to share across threads; the search polls it once
/// per candidate. A cancelled search returns its partial result with an
/// explanatory remark - cancellation is a reportable outcome, not an error.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Unit rates and adjustment factors for pricing a candidate section.
///
/// Injected into the search explicitly; never read from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostProfile {
    /// Placed-concrete rate per grade (currency/m^3)
    pub concrete_cost_per_m3: HashMap<ConcreteGrade, f64>,

    /// Reinforcement supply-and-fix rate (currency/kg)
    pub steel_cost_per_kg: f64,

    /// Formwork rate over contact area (currency/m^2)
    pub formwork_cost_per_m2: f64,

    /// Steel percentage above which fixing labor is surcharged
    pub congestion_threshold_pt: f64,

    /// Multiplier applied to steel cost beyond the congestion threshold
    pub congestion_multiplier: f64,

    /// Regional adjustment applied to the summed cost
    pub location_factor: f64,

    /// ISO currency code for every figure in this profile
    pub currency: String,
}

impl Default for CostProfile {
    fn default() -> Self {
        let mut concrete = HashMap::new();
        concrete.insert(ConcreteGrade::M20, 5000.0);
        concrete.insert(ConcreteGrade::M25, 5500.0);
        concrete.insert(ConcreteGrade::M30, 6200.0);
        concrete.insert(ConcreteGrade::M35, 6800.0);
        concrete.insert(ConcreteGrade::M40, 7500.0);
        CostProfile {
            concrete_cost_per_m3: concrete,
            steel_cost_per_kg: 65.0,
            formwork_cost_per_m2: 450.0,
            congestion_threshold_pt: 1.2,
            congestion_multiplier: 1.15,
            location_factor: 1.0,
            currency: "INR".to_string(),
        }
    }
}

impl CostProfile {
    /// Rate for a concrete grade, when the profile prices it
    pub fn concrete_rate(&self, grade: ConcreteGrade) -> Option<f64> {
        self.concrete_cost_per_m3.get(&grade).copied()
    }

    /// Reject profiles that cannot price the given grid.
    pub fn validate(&self, grid: &SectionGrid) -> DesignResult<()> {
        for (concrete, _) in &grid.grade_pairs {
            match self.concrete_rate(*concrete) {
                None => return Err(DesignError::cost_rate_missing(concrete.display_name())),
                Some(rate) if rate < 0.0 => {
                    return Err(DesignError::invalid_input(
                        "concrete_cost_per_m3",
                        rate.to_string(),
                        "Concrete rate cannot be negative",
                    ))
                }
                Some(_) => {}
            }
        }
        if self.steel_cost_per_kg < 0.0 || self.formwork_cost_per_m2 < 0.0 {
            return Err(DesignError::invalid_input(
                "steel_cost_per_kg/formwork_cost_per_m2",
                format!("{}/{}", self.steel_cost_per_kg, self.formwork_cost_per_m2),
                "Unit rates cannot be negative",
            ));
        }
        if self.congestion_multiplier < 1.0 {
            return Err(DesignError::invalid_input(
                "congestion_multiplier",
                self.congestion_multiplier.to_string(),
                "Congestion multiplier cannot discount steel below its base cost",
            ));
        }
        if self.location_factor <= 0.0 {
            return Err(DesignError::invalid_input(
                "location_factor",
                self.location_factor.to_string(),
                "Location factor must be positive",
            ));
        }
        Ok(())
    }
}

/// The search space: cross product of widths, depths, and grade pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGrid {
    /// Candidate widths (mm)
    pub widths_mm: Vec<f64>,

    /// Candidate overall depths (mm)
    pub depths_mm: Vec<f64>,

    /// Candidate (concrete, steel) grade combinations
    pub grade_pairs: Vec<GradePair>,
}

impl Default for SectionGrid {
    fn default() -> Self {
        SectionGrid {
            widths_mm: STANDARD_WIDTHS_MM.to_vec(),
            depths_mm: STANDARD_DEPTHS_MM.clone(),
            grade_pairs: STANDARD_GRADE_PAIRS.clone(),
        }
    }
}

impl SectionGrid {
    /// Number of grid points
    pub fn len(&self) -> usize {
        self.widths_mm.len() * self.depths_mm.len() * self.grade_pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> DesignResult<()> {
        if self.widths_mm.is_empty() {
            return Err(DesignError::missing_field("widths_mm"));
        }
        if self.depths_mm.is_empty() {
            return Err(DesignError::missing_field("depths_mm"));
        }
        if self.grade_pairs.is_empty() {
            return Err(DesignError::missing_field("grade_pairs"));
        }
        if self
            .widths_mm
            .iter()
            .chain(self.depths_mm.iter())
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(DesignError::invalid_input(
                "widths_mm/depths_mm",
                "non-positive".to_string(),
                "Grid dimensions must be positive",
            ));
        }
        Ok(())
    }

    /// The conservative default used for savings reporting: the largest
    /// width and depth in the grid with the first grade pair.
    fn baseline_point(&self) -> (f64, f64, GradePair) {
        let max_w = self
            .widths_mm
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let max_d = self
            .depths_mm
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        (max_w, max_d, self.grade_pairs[0])
    }
}

/// Demand side of the section search.
///
/// ## JSON Example
///
/// ```json
/// { "span_mm": 6000.0, "mu_knm": 180.0, "vu_kn": 120.0, "cover_mm": 30.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSearchInput {
    /// Clear span (mm); drives quantities, not strength
    pub span_mm: f64,

    /// Governing factored moment (kN m)
    pub mu_knm: f64,

    /// Governing factored shear (kN)
    pub vu_kn: f64,

    /// Clear cover (mm)
    pub cover_mm: f64,
}

impl SectionSearchInput {
    pub fn validate(&self) -> DesignResult<()> {
        if !self.span_mm.is_finite() || self.span_mm <= 0.0 {
            return Err(DesignError::invalid_input(
                "span_mm",
                self.span_mm.to_string(),
                "Span must be positive",
            ));
        }
        if !self.mu_knm.is_finite() || self.mu_knm <= 0.0 {
            return Err(DesignError::invalid_input(
                "mu_knm",
                self.mu_knm.to_string(),
                "Design moment must be positive",
            ));
        }
        if !self.vu_kn.is_finite() || self.vu_kn < 0.0 {
            return Err(DesignError::invalid_input(
                "vu_kn",
                self.vu_kn.to_string(),
                "Design shear cannot be negative",
            ));
        }
        if self.cover_mm < 0.0 {
            return Err(DesignError::invalid_input(
                "cover_mm",
                self.cover_mm.to_string(),
                "Cover cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Itemized cost of one candidate section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Concrete volume cost
    pub concrete: f64,
    /// Reinforcement supply-and-fix cost
    pub steel: f64,
    /// Formwork contact-area cost
    pub formwork: f64,
    /// Congestion labor surcharge (zero below the threshold)
    pub labor_adjustment: f64,
    /// Grand total after the location factor
    pub total: f64,
    /// Currency code copied from the profile
    pub currency: String,
}

/// One grid point's evaluation, valid or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCandidate {
    /// Width (mm)
    pub b_mm: f64,
    /// Overall depth D (mm)
    pub d_overall_mm: f64,
    /// Effective depth d (mm); D less cover, stirrup, and half a 16 mm bar
    pub d_eff_mm: f64,
    /// Concrete grade
    pub concrete: ConcreteGrade,
    /// Steel grade
    pub steel: SteelGrade,
    /// Tension steel demanded by the strength check (mm^2)
    pub ast_required_mm2: f64,
    /// Steel percentage 100 Ast / (b d)
    pub pt_percent: f64,
    /// Main steel weight over the span (kg)
    pub steel_weight_kg: f64,
    /// Cost breakdown; absent when the candidate failed a check
    pub cost: Option<CostBreakdown>,
    /// True when every strength check passed
    pub is_valid: bool,
    /// Why the candidate was rejected, when invalid
    pub failure_reason: Option<String>,
}

impl SectionCandidate {
    /// Total cost of a valid candidate
    pub fn total_cost(&self) -> Option<f64> {
        self.cost.as_ref().map(|c| c.total)
    }
}

/// Result of a section search.
///
/// `optimal_candidate == None` with a remark is the no-feasible-solution
/// outcome: reportable, and retryable with relaxed inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Cheapest valid candidate, if any
    pub optimal_candidate: Option<SectionCandidate>,

    /// Cost of the conservative default section, when it is valid
    pub baseline_cost: Option<f64>,

    /// Next cheapest valid candidates, ascending by total cost
    pub alternatives: Vec<SectionCandidate>,

    /// baseline - optimal, when both exist
    pub savings_amount: Option<f64>,

    /// Savings as a percentage of the baseline
    pub savings_percent: Option<f64>,

    /// Grid points attempted (cancellation stops the count early)
    pub candidates_evaluated: u32,

    /// Grid points that passed every strength check
    pub candidates_valid: u32,

    /// Wall-clock search time (seconds)
    pub computation_time_sec: f64,

    /// Set when the search found nothing or was cancelled
    pub remark: Option<String>,
}

/// Rank valid candidates: cheapest total, then lighter steel, then
/// shallower section.
fn rank_candidates(a: &SectionCandidate, b: &SectionCandidate) -> Ordering {
    let ta = a.total_cost().unwrap_or(f64::INFINITY);
    let tb = b.total_cost().unwrap_or(f64::INFINITY);
    ta.partial_cmp(&tb)
        .unwrap_or(Ordering::Equal)
        .then(
            a.steel_weight_kg
                .partial_cmp(&b.steel_weight_kg)
                .unwrap_or(Ordering::Equal),
        )
        .then(
            a.d_overall_mm
                .partial_cmp(&b.d_overall_mm)
                .unwrap_or(Ordering::Equal),
        )
}

/// Evaluate and price one grid point. Never raises: a failed check or an
/// unpriceable grade yields an invalid candidate with a reason.
fn evaluate_candidate(
    input: &SectionSearchInput,
    b_mm: f64,
    d_overall_mm: f64,
    pair: GradePair,
    profile: &CostProfile,
    calculator: &dyn FlexureShearCalculator,
) -> SectionCandidate {
    let (concrete, steel) = pair;
    let d_eff_mm = d_overall_mm - input.cover_mm - EFFECTIVE_DEPTH_ALLOWANCE_MM;

    let invalid = |reason: String| SectionCandidate {
        b_mm,
        d_overall_mm,
        d_eff_mm,
        concrete,
        steel,
        ast_required_mm2: 0.0,
        pt_percent: 0.0,
        steel_weight_kg: 0.0,
        cost: None,
        is_valid: false,
        failure_reason: Some(reason),
    };

    if d_eff_mm <= 0.0 {
        return invalid(format!(
            "effective depth {:.0} mm is non-positive for D = {:.0} mm",
            d_eff_mm, d_overall_mm
        ));
    }

    let eval = calculator.evaluate(
        b_mm,
        d_overall_mm,
        d_eff_mm,
        concrete,
        steel,
        input.mu_knm,
        input.vu_kn,
    );
    if !eval.is_ok() {
        return invalid(
            eval.failure_reason
                .unwrap_or_else(|| "strength check failed".to_string()),
        );
    }

    let rate = match profile.concrete_rate(concrete) {
        Some(rate) => rate,
        None => return invalid(format!("no concrete rate for {}", concrete)),
    };

    let ast = eval.ast_required_mm2;
    let pt_percent = 100.0 * ast / (b_mm * d_eff_mm);
    let span_m = input.span_mm / 1000.0;
    let steel_weight_kg = ast * 1e-6 * span_m * STEEL_DENSITY_KG_M3;

    let concrete_cost = b_mm * d_overall_mm * input.span_mm * 1e-9 * rate;
    let steel_cost = steel_weight_kg * profile.steel_cost_per_kg;
    let formwork_cost = (b_mm + 2.0 * d_overall_mm) * 1e-3 * span_m * profile.formwork_cost_per_m2;
    let labor_adjustment = if pt_percent > profile.congestion_threshold_pt {
        steel_cost * (profile.congestion_multiplier - 1.0)
    } else {
        0.0
    };
    let total =
        (concrete_cost + steel_cost + formwork_cost + labor_adjustment) * profile.location_factor;

    SectionCandidate {
        b_mm,
        d_overall_mm,
        d_eff_mm,
        concrete,
        steel,
        ast_required_mm2: ast,
        pt_percent,
        steel_weight_kg,
        cost: Some(CostBreakdown {
            concrete: concrete_cost,
            steel: steel_cost,
            formwork: formwork_cost,
            labor_adjustment,
            total,
            currency: profile.currency.clone(),
        }),
        is_valid: true,
        failure_reason: None,
    }
}

/// Search the grid for the minimum-cost valid section.
///
/// Deterministic for a fixed calculator; candidate evaluations are
/// independent and the token is polled once per grid point.
///
/// # Returns
///
/// * `Ok(OptimizationResult)` - complete account of the search, including
///   the no-feasible-solution and cancelled outcomes
/// * `Err(DesignError)` - malformed input, grid, or cost profile only
pub fn optimize_section(
    input: &SectionSearchInput,
    grid: &SectionGrid,
    profile: &CostProfile,
    calculator: &dyn FlexureShearCalculator,
    cancel: &CancelToken,
) -> DesignResult<OptimizationResult> {
    input.validate()?;
    grid.validate()?;
    profile.validate(grid)?;

    let start = Instant::now();
    let mut evaluated: u32 = 0;
    let mut valids: Vec<SectionCandidate> = Vec::new();
    let mut cancelled = false;

    'search: for &b_mm in &grid.widths_mm {
        for &d_mm in &grid.depths_mm {
            for &pair in &grid.grade_pairs {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break 'search;
                }
                evaluated += 1;
                let candidate = evaluate_candidate(input, b_mm, d_mm, pair, profile, calculator);
                if candidate.is_valid {
                    valids.push(candidate);
                }
            }
        }
    }

    let candidates_valid = valids.len() as u32;
    valids.sort_by(rank_candidates);

    let (baseline_b, baseline_d, baseline_pair) = grid.baseline_point();
    let baseline =
        evaluate_candidate(input, baseline_b, baseline_d, baseline_pair, profile, calculator);
    let baseline_cost = baseline.total_cost();

    let mut alternatives = valids;
    let optimal_candidate = if alternatives.is_empty() {
        None
    } else {
        Some(alternatives.remove(0))
    };
    alternatives.truncate(MAX_ALTERNATIVES);

    let (savings_amount, savings_percent) = match (&optimal_candidate, baseline_cost) {
        (Some(opt), Some(base)) if base > 0.0 => {
            let amount = base - opt.total_cost().unwrap_or(base);
            (Some(amount), Some(100.0 * amount / base))
        }
        _ => (None, None),
    };

    let remark = if cancelled {
        Some(format!(
            "Search cancelled after {} of {} candidates",
            evaluated,
            grid.len()
        ))
    } else if optimal_candidate.is_none() {
        Some(format!(
            "No section in the {}-point grid passed the strength checks for Mu = {:.0} kN m; \
             widen the grid or raise the grades",
            grid.len(),
            input.mu_knm
        ))
    } else {
        None
    };

    Ok(OptimizationResult {
        optimal_candidate,
        baseline_cost,
        alternatives,
        savings_amount,
        savings_percent,
        candidates_evaluated: evaluated,
        candidates_valid,
        computation_time_sec: start.elapsed().as_secs_f64(),
        remark,
    })
}
