//! Cutting-Stock Packing
//!
//! Assigns required cut lengths to standard stock bars using first-fit
//! decreasing: sort the pieces longest first, place each into the first
//! open bar with enough remaining length, and open a new bar (the shortest
//! stock that fits) only when none has room. The heuristic is deliberate -
//! exact bin packing is NP-hard, and schedule waste tolerances do not
//! justify the cost - and must stay byte-for-byte deterministic so plans
//! are comparable across runs.
//!
//! Pieces of different diameters never share a stock bar; each diameter
//! group is packed independently.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::errors::{DesignError, DesignResult};
use crate::fabrication::schedule::BarMark;

/// Length comparisons tolerate this much float noise (mm)
const LENGTH_EPS_MM: f64 = 1e-6;

/// Standard stock bar lengths available from the supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLengths {
    /// Available lengths (mm), ascending
    pub lengths_mm: Vec<f64>,
}

impl Default for StockLengths {
    fn default() -> Self {
        // 12 m bars are the universal market length
        StockLengths {
            lengths_mm: vec![12000.0],
        }
    }
}

impl StockLengths {
    pub fn validate(&self) -> DesignResult<()> {
        if self.lengths_mm.is_empty() {
            return Err(DesignError::missing_field("lengths_mm"));
        }
        if self.lengths_mm.iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(DesignError::invalid_input(
                "lengths_mm",
                format!("{:?}", self.lengths_mm),
                "Stock lengths must be positive",
            ));
        }
        Ok(())
    }

    /// Longest available stock (mm)
    pub fn longest_mm(&self) -> f64 {
        self.lengths_mm.iter().copied().fold(0.0, f64::max)
    }

    /// Shortest stock that can hold the given piece, if any
    fn shortest_fitting_mm(&self, piece_mm: f64) -> Option<f64> {
        self.lengths_mm
            .iter()
            .copied()
            .filter(|l| *l + LENGTH_EPS_MM >= piece_mm)
            .fold(None, |best, l| match best {
                None => Some(l),
                Some(b) if l < b => Some(l),
                keep => keep,
            })
    }
}

/// One stock bar and the pieces cut from it, in placement order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingAssignment {
    /// Stock bar length (mm)
    pub stock_length_mm: f64,

    /// Bar diameter this stock bar serves (mm)
    pub diameter_mm: f64,

    /// Placed cut lengths, in placement order (mm)
    pub pieces: Vec<f64>,

    /// Unused remainder (mm)
    pub offcut_mm: f64,
}

/// A bar whose cut length exceeds every available stock length.
///
/// Reported per mark, never truncated: the design needs a splice detail
/// before it can be fabricated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnfabricableBar {
    /// Mark the offending bars belong to
    pub mark_id: String,

    /// Required cut length (mm)
    pub cut_length_mm: f64,

    /// Longest stock on offer (mm)
    pub longest_stock_mm: f64,

    /// Number of bars affected
    pub count: u32,
}

/// Complete packing outcome across all diameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingPlan {
    /// Stock bar assignments, grouped by diameter ascending
    pub assignments: Vec<CuttingAssignment>,

    /// Sum of all offcuts: stock used minus pieces placed (mm)
    pub total_waste_mm: f64,

    /// Placed length over stock length, as a percentage
    pub utilization_percent: f64,
}

impl CuttingPlan {
    /// Total stock length consumed (mm)
    pub fn stock_used_mm(&self) -> f64 {
        self.assignments.iter().map(|a| a.stock_length_mm).sum()
    }

    /// Total cut length placed (mm)
    pub fn placed_mm(&self) -> f64 {
        self.assignments
            .iter()
            .map(|a| a.pieces.iter().sum::<f64>())
            .sum()
    }
}

/// In-progress stock bar during packing.
struct OpenBar {
    stock_length_mm: f64,
    pieces: Vec<f64>,
    used_mm: f64,
}

/// Pack the marks' pieces onto stock bars.
///
/// Returns the plan plus the list of bars no stock length can hold.
pub fn pack_marks(
    marks: &[BarMark],
    stock: &StockLengths,
) -> DesignResult<(CuttingPlan, Vec<UnfabricableBar>)> {
    stock.validate()?;
    let longest = stock.longest_mm();

    // Diameter groups, ascending; marks within a group keep schedule order.
    let mut diameters: Vec<f64> = marks.iter().map(|m| m.diameter_mm).collect();
    diameters.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    diameters.dedup();

    let mut assignments = Vec::new();
    let mut unfabricable = Vec::new();

    for diameter in diameters {
        // Expand this diameter's marks into individual pieces, flagging
        // lengths no stock can hold.
        let mut pieces: Vec<f64> = Vec::new();
        for mark in marks.iter().filter(|m| m.diameter_mm == diameter) {
            if mark.cut_length_mm > longest + LENGTH_EPS_MM {
                unfabricable.push(UnfabricableBar {
                    mark_id: mark.id.clone(),
                    cut_length_mm: mark.cut_length_mm,
                    longest_stock_mm: longest,
                    count: mark.count,
                });
                continue;
            }
            pieces.extend(std::iter::repeat(mark.cut_length_mm).take(mark.count as usize));
        }

        // First-fit decreasing. The sort is stable, so equal lengths keep
        // schedule order and the plan is reproducible.
        pieces.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

        let mut bars: Vec<OpenBar> = Vec::new();
        for piece in pieces {
            let slot = bars
                .iter_mut()
                .find(|bar| bar.stock_length_mm - bar.used_mm + LENGTH_EPS_MM >= piece);
            match slot {
                Some(bar) => {
                    bar.pieces.push(piece);
                    bar.used_mm += piece;
                }
                None => {
                    let stock_length_mm = stock
                        .shortest_fitting_mm(piece)
                        .ok_or_else(|| DesignError::Internal {
                            message: format!(
                                "piece of {:.0} mm passed the stock check but fits no stock",
                                piece
                            ),
                        })?;
                    bars.push(OpenBar {
                        stock_length_mm,
                        pieces: vec![piece],
                        used_mm: piece,
                    });
                }
            }
        }

        assignments.extend(bars.into_iter().map(|bar| CuttingAssignment {
            stock_length_mm: bar.stock_length_mm,
            diameter_mm: diameter,
            offcut_mm: bar.stock_length_mm - bar.used_mm,
            pieces: bar.pieces,
        }));
    }

    let stock_used: f64 = assignments.iter().map(|a| a.stock_length_mm).sum();
    let placed: f64 = assignments
        .iter()
        .map(|a| a.pieces.iter().sum::<f64>())
        .sum();
    let total_waste_mm = stock_used - placed;
    let utilization_percent = if stock_used > 0.0 {
        100.0 * placed / stock_used
    } else {
        0.0
    };

    Ok((
        CuttingPlan {
            assignments,
            total_waste_mm,
            utilization_percent,
        },
        unfabricable,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(id: &str, diameter_mm: f64, cut_length_mm: f64, count: u32) -> BarMark {
        BarMark {
            id: id.to_string(),
            zone: "Span".to_string(),
            shape_code: "00".to_string(),
            diameter_mm,
            count,
            cut_length_mm,
            total_length_mm: cut_length_mm * count as f64,
            unit_weight_kg_per_m: diameter_mm * diameter_mm / 162.0,
            total_weight_kg: 0.0,
            remarks: String::new(),
        }
    }

    #[test]
    fn test_decreasing_fit_worked_example() {
        // Four 4200s and one 3000 on 12 m stock: two 4200s per bar (a third
        // would need 12600), the 3000 rides in the first bar's remainder.
        let marks = vec![mark("M01", 16.0, 4200.0, 4), mark("M02", 16.0, 3000.0, 1)];
        let (plan, unfab) = pack_marks(&marks, &StockLengths::default()).unwrap();

        assert!(unfab.is_empty());
        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.assignments[0].pieces, vec![4200.0, 4200.0, 3000.0]);
        assert_eq!(plan.assignments[0].offcut_mm, 600.0);
        assert_eq!(plan.assignments[1].pieces, vec![4200.0, 4200.0]);
        assert_eq!(plan.assignments[1].offcut_mm, 3600.0);
        assert_eq!(plan.total_waste_mm, 4200.0);
    }

    #[test]
    fn test_no_piece_lost_or_duplicated() {
        let marks = vec![
            mark("M01", 16.0, 4200.0, 7),
            mark("M02", 16.0, 3000.0, 5),
            mark("M03", 16.0, 1800.0, 11),
        ];
        let (plan, unfab) = pack_marks(&marks, &StockLengths::default()).unwrap();
        assert!(unfab.is_empty());

        for m in &marks {
            let placed = plan
                .assignments
                .iter()
                .flat_map(|a| a.pieces.iter())
                .filter(|p| **p == m.cut_length_mm)
                .count();
            assert_eq!(placed, m.count as usize, "mark {} miscounted", m.id);
        }
    }

    #[test]
    fn test_no_assignment_overflows_its_stock() {
        let marks = vec![
            mark("M01", 16.0, 5100.0, 9),
            mark("M02", 16.0, 2400.0, 6),
            mark("M03", 16.0, 900.0, 14),
        ];
        let (plan, _) = pack_marks(&marks, &StockLengths::default()).unwrap();
        for a in &plan.assignments {
            assert!(a.pieces.iter().sum::<f64>() <= a.stock_length_mm + 1e-6);
            assert!(a.offcut_mm >= -1e-6);
        }
    }

    #[test]
    fn test_waste_identity_exact() {
        let marks = vec![
            mark("M01", 16.0, 4700.0, 6),
            mark("M02", 20.0, 3900.0, 4),
            mark("M03", 20.0, 2100.0, 9),
        ];
        let (plan, _) = pack_marks(&marks, &StockLengths::default()).unwrap();
        let identity = plan.stock_used_mm() - plan.placed_mm();
        assert_eq!(plan.total_waste_mm, identity);
        assert!(
            (plan.utilization_percent - 100.0 * plan.placed_mm() / plan.stock_used_mm()).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_diameters_never_share_stock() {
        let marks = vec![mark("M01", 16.0, 2000.0, 3), mark("M02", 20.0, 2000.0, 3)];
        let (plan, _) = pack_marks(&marks, &StockLengths::default()).unwrap();
        // 6 pieces of 2000 would fit one 12 m bar, but diameters split them
        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.assignments[0].diameter_mm, 16.0);
        assert_eq!(plan.assignments[1].diameter_mm, 20.0);
    }

    #[test]
    fn test_overlong_bar_flagged_never_truncated() {
        let marks = vec![mark("M01", 16.0, 13500.0, 2), mark("M02", 16.0, 4000.0, 3)];
        let (plan, unfab) = pack_marks(&marks, &StockLengths::default()).unwrap();

        assert_eq!(unfab.len(), 1);
        assert_eq!(unfab[0].mark_id, "M01");
        assert_eq!(unfab[0].count, 2);
        assert_eq!(unfab[0].longest_stock_mm, 12000.0);
        // The remaining bars are still planned
        let placed: usize = plan.assignments.iter().map(|a| a.pieces.len()).sum();
        assert_eq!(placed, 3);
        // Nothing 13500 was silently cut down
        assert!(plan
            .assignments
            .iter()
            .flat_map(|a| a.pieces.iter())
            .all(|p| *p == 4000.0));
    }

    #[test]
    fn test_new_bar_uses_shortest_fitting_stock() {
        let stock = StockLengths {
            lengths_mm: vec![6000.0, 12000.0],
        };
        let marks = vec![mark("M01", 16.0, 5500.0, 1), mark("M02", 16.0, 7000.0, 1)];
        let (plan, _) = pack_marks(&marks, &stock).unwrap();
        // 7000 opens a 12 m bar; 5500 does not fit its remainder (5000) and
        // opens a 6 m bar of its own
        assert_eq!(plan.assignments.len(), 2);
        let by_piece = |len: f64| {
            plan.assignments
                .iter()
                .find(|a| a.pieces.contains(&len))
                .unwrap()
                .stock_length_mm
        };
        assert_eq!(by_piece(7000.0), 12000.0);
        assert_eq!(by_piece(5500.0), 6000.0);
    }

    #[test]
    fn test_deterministic_plan() {
        let marks = vec![
            mark("M01", 16.0, 4200.0, 5),
            mark("M02", 16.0, 4200.0, 5),
            mark("M03", 16.0, 2600.0, 7),
        ];
        let first = pack_marks(&marks, &StockLengths::default()).unwrap();
        let second = pack_marks(&marks, &StockLengths::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_marks_empty_plan() {
        let (plan, unfab) = pack_marks(&[], &StockLengths::default()).unwrap();
        assert!(plan.assignments.is_empty());
        assert_eq!(plan.total_waste_mm, 0.0);
        assert_eq!(plan.utilization_percent, 0.0);
        assert!(unfab.is_empty());
    }

    #[test]
    fn test_invalid_stock_rejected() {
        let stock = StockLengths { lengths_mm: vec![] };
        assert!(pack_marks(&[], &stock).is_err());
    }
}
