//! # Fabrication Planning
//!
//! Turns a finished design's bar list into a bar-bending schedule: cut
//! lengths with bend and hook allowances, grouped bar marks, and a
//! cutting-stock plan over standard stock lengths.
//!
//! ## Pipeline
//!
//! 1. [`cut_length`] - shape geometry to cut length per bar
//! 2. [`schedule`] - identical bars grouped into stable marks
//! 3. [`cutting`] - marks packed onto stock bars, waste accounted exactly
//!
//! ## Example
//!
//! ```rust
//! use design_core::fabrication::{generate_cutting_plan, ScheduleInput};
//! use design_core::fabrication::cut_length::BarShapeSpec;
//! use design_core::fabrication::schedule::BarItem;
//! use design_core::materials::BarSize;
//!
//! let input = ScheduleInput {
//!     bars: vec![BarItem {
//!         zone: "Span bottom".to_string(),
//!         shape: BarShapeSpec::Straight { length_mm: 4200.0, end_allowance_mm: 0.0 },
//!         size: BarSize::D16,
//!         count: 4,
//!     }],
//!     ..ScheduleInput::default()
//! };
//!
//! let schedule = generate_cutting_plan(&input).unwrap();
//! assert_eq!(schedule.summary.total_bars, 4);
//! ```

pub mod cut_length;
pub mod cutting;
pub mod schedule;

use serde::{Deserialize, Serialize};

pub use cut_length::{BarShapeSpec, BendAngle, BendPolicy, HookType};
pub use cutting::{CuttingAssignment, CuttingPlan, StockLengths, UnfabricableBar};
pub use schedule::{BarItem, BarMark};

use crate::errors::DesignResult;

/// Everything the planner needs: the bar list, the bend/hook policy, and
/// the stock lengths on the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScheduleInput {
    /// Reinforcement elements from the accepted design
    pub bars: Vec<BarItem>,

    /// Hook lengths and bend deductions
    pub policy: BendPolicy,

    /// Standard stock lengths available
    pub stock: StockLengths,
}

/// Roll-up figures for the schedule footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Bars across all marks
    pub total_bars: u32,

    /// Steel weight across all marks (kg)
    pub total_weight_kg: f64,

    /// Stock bars consumed
    pub stock_bars_used: u32,

    /// Offcut length across all stock bars (mm)
    pub total_waste_mm: f64,

    /// Waste as a percentage of stock consumed
    pub waste_percent: f64,
}

/// The complete bar-bending schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarBendingSchedule {
    /// Schedule line items, in mark order
    pub marks: Vec<BarMark>,

    /// Stock-bar assignments
    pub cutting_plan: CuttingPlan,

    /// Bars no stock length can hold; the design needs splicing
    pub unfabricable: Vec<UnfabricableBar>,

    /// Footer totals
    pub summary: ScheduleSummary,
}

impl BarBendingSchedule {
    /// True when every bar can be cut from the available stock
    pub fn is_fabricable(&self) -> bool {
        self.unfabricable.is_empty()
    }
}

/// Build the bar-bending schedule and cutting plan for a bar list.
///
/// # Returns
///
/// * `Ok(BarBendingSchedule)` - marks, plan, and summary; overlong bars are
///   reported in `unfabricable`, never truncated or dropped
/// * `Err(DesignError)` - malformed bar items or stock table only
pub fn generate_cutting_plan(input: &ScheduleInput) -> DesignResult<BarBendingSchedule> {
    let marks = schedule::build_marks(&input.bars, &input.policy)?;
    let (cutting_plan, unfabricable) = cutting::pack_marks(&marks, &input.stock)?;

    let total_bars = marks.iter().map(|m| m.count).sum();
    let total_weight_kg = marks.iter().map(|m| m.total_weight_kg).sum();
    let stock_used = cutting_plan.stock_used_mm();
    let summary = ScheduleSummary {
        total_bars,
        total_weight_kg,
        stock_bars_used: cutting_plan.assignments.len() as u32,
        total_waste_mm: cutting_plan.total_waste_mm,
        waste_percent: if stock_used > 0.0 {
            100.0 * cutting_plan.total_waste_mm / stock_used
        } else {
            0.0
        },
    };

    Ok(BarBendingSchedule {
        marks,
        cutting_plan,
        unfabricable,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::BarSize;

    /// A small beam's worth of steel: bottom bars, top bars, stirrups
    fn beam_input() -> ScheduleInput {
        ScheduleInput {
            bars: vec![
                BarItem {
                    zone: "Span bottom".to_string(),
                    shape: BarShapeSpec::Straight {
                        length_mm: 5800.0,
                        end_allowance_mm: 150.0,
                    },
                    size: BarSize::D20,
                    count: 3,
                },
                BarItem {
                    zone: "Support top".to_string(),
                    shape: BarShapeSpec::Straight {
                        length_mm: 2100.0,
                        end_allowance_mm: 0.0,
                    },
                    size: BarSize::D16,
                    count: 4,
                },
                BarItem {
                    zone: "Stirrups".to_string(),
                    shape: BarShapeSpec::Stirrup {
                        member_b_mm: 300.0,
                        member_d_mm: 500.0,
                        cover_mm: 25.0,
                        legs: 2,
                    },
                    size: BarSize::D8,
                    count: 38,
                },
            ],
            policy: BendPolicy::default(),
            stock: StockLengths::default(),
        }
    }

    #[test]
    fn test_full_schedule() {
        let schedule = generate_cutting_plan(&beam_input()).unwrap();

        assert_eq!(schedule.marks.len(), 3);
        assert_eq!(schedule.summary.total_bars, 45);
        assert!(schedule.is_fabricable());
        assert!(schedule.summary.total_weight_kg > 0.0);
        assert!(schedule.summary.waste_percent >= 0.0);
        assert!(schedule.summary.waste_percent <= 100.0);

        // Footer must agree with the plan
        assert_eq!(
            schedule.summary.stock_bars_used as usize,
            schedule.cutting_plan.assignments.len()
        );
        assert_eq!(
            schedule.summary.total_waste_mm,
            schedule.cutting_plan.stock_used_mm() - schedule.cutting_plan.placed_mm()
        );
    }

    #[test]
    fn test_schedule_weight_matches_marks() {
        let schedule = generate_cutting_plan(&beam_input()).unwrap();
        let by_marks: f64 = schedule.marks.iter().map(|m| m.total_weight_kg).sum();
        assert!((schedule.summary.total_weight_kg - by_marks).abs() < 1e-9);
    }

    #[test]
    fn test_overlong_bar_makes_schedule_unfabricable() {
        let mut input = beam_input();
        input.bars.push(BarItem {
            zone: "Span bottom".to_string(),
            shape: BarShapeSpec::Straight {
                length_mm: 14000.0,
                end_allowance_mm: 0.0,
            },
            size: BarSize::D20,
            count: 2,
        });
        let schedule = generate_cutting_plan(&input).unwrap();
        assert!(!schedule.is_fabricable());
        assert_eq!(schedule.unfabricable.len(), 1);
        assert_eq!(schedule.unfabricable[0].count, 2);
    }

    #[test]
    fn test_empty_bar_list_is_benign() {
        let input = ScheduleInput::default();
        let schedule = generate_cutting_plan(&input).unwrap();
        assert!(schedule.marks.is_empty());
        assert_eq!(schedule.summary.total_bars, 0);
        assert_eq!(schedule.summary.waste_percent, 0.0);
    }

    #[test]
    fn test_schedule_serialization() {
        let schedule = generate_cutting_plan(&beam_input()).unwrap();
        let json = serde_json::to_string_pretty(&schedule).unwrap();
        assert!(json.contains("cut_length_mm"));
        assert!(json.contains("utilization_percent"));
        let roundtrip: BarBendingSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(schedule, roundtrip);
    }
}
