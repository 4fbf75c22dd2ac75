//! Bar-Mark Assignment
//!
//! Groups identical fabricated bars into schedule line items. Two bars
//! share a mark when they agree on zone, diameter, shape code, and cut
//! length (lengths are first rounded to the 5 mm schedule step). Mark ids
//! are assigned in a fixed order - zone first-appearance, then diameter,
//! then shape, then length - so re-running on identical input reproduces
//! identical ids.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{DesignError, DesignResult};
use crate::fabrication::cut_length::{BarShapeSpec, BendPolicy};
use crate::materials::BarSize;

/// Cut lengths are rounded to this step before grouping and scheduling
const MARK_LENGTH_STEP_MM: f64 = 5.0;

/// One reinforcement element as detailed on the drawings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarItem {
    /// Location/zone label (e.g., "Span AB bottom"); orders the schedule
    pub zone: String,

    /// Element geometry
    pub shape: BarShapeSpec,

    /// Bar size
    pub size: BarSize,

    /// Number of identical bars
    pub count: u32,
}

impl BarItem {
    pub fn validate(&self) -> DesignResult<()> {
        if self.count == 0 {
            return Err(DesignError::invalid_input(
                "count",
                "0".to_string(),
                "A bar item needs at least one bar",
            ));
        }
        self.shape.validate()
    }
}

/// One line of the bar-bending schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarMark {
    /// Stable schedule identifier ("M01", "M02", ...)
    pub id: String,

    /// Location/zone label carried from the input
    pub zone: String,

    /// Shape code ("00" straight, "51" stirrup, "41" crank)
    pub shape_code: String,

    /// Bar diameter (mm)
    pub diameter_mm: f64,

    /// Bars under this mark
    pub count: u32,

    /// Cut length per bar, rounded to the schedule step (mm)
    pub cut_length_mm: f64,

    /// cut_length x count (mm)
    pub total_length_mm: f64,

    /// Linear weight (kg/m)
    pub unit_weight_kg_per_m: f64,

    /// unit_weight x total length (kg)
    pub total_weight_kg: f64,

    /// Shape description for the fabricator
    pub remarks: String,
}

/// Round a computed cut length to the schedule step.
fn round_to_step(length_mm: f64) -> f64 {
    (length_mm / MARK_LENGTH_STEP_MM).round() * MARK_LENGTH_STEP_MM
}

/// Group bar items into schedule marks.
///
/// Deterministic: the same items produce the same marks with the same ids.
pub fn build_marks(items: &[BarItem], policy: &BendPolicy) -> DesignResult<Vec<BarMark>> {
    for item in items {
        item.validate()?;
    }

    // Zone rank by first appearance keeps the schedule in drawing order.
    let mut zone_rank: HashMap<&str, usize> = HashMap::new();
    for item in items {
        let next = zone_rank.len();
        zone_rank.entry(item.zone.as_str()).or_insert(next);
    }

    // Group key: (zone, size, shape code, rounded length in steps)
    #[derive(PartialEq, Eq, Hash)]
    struct Key<'a> {
        zone: &'a str,
        size: BarSize,
        shape_code: &'static str,
        length_steps: i64,
    }

    struct Group<'a> {
        item: &'a BarItem,
        cut_length_mm: f64,
        count: u32,
    }

    let mut groups: HashMap<Key, Group> = HashMap::new();
    for item in items {
        let cut = round_to_step(item.shape.cut_length_mm(item.size, policy));
        if cut <= 0.0 {
            return Err(DesignError::invalid_input(
                "shape",
                format!("{:?}", item.shape),
                "Bend deductions reduce the cut length to zero",
            ));
        }
        let key = Key {
            zone: item.zone.as_str(),
            size: item.size,
            shape_code: item.shape.shape_code(),
            length_steps: (cut / MARK_LENGTH_STEP_MM).round() as i64,
        };
        groups
            .entry(key)
            .and_modify(|g| g.count += item.count)
            .or_insert(Group {
                item,
                cut_length_mm: cut,
                count: item.count,
            });
    }

    let mut ordered: Vec<(Key, Group)> = groups.into_iter().collect();
    ordered.sort_by(|(ka, _), (kb, _)| {
        zone_rank[ka.zone]
            .cmp(&zone_rank[kb.zone])
            .then(ka.size.cmp(&kb.size))
            .then(ka.shape_code.cmp(kb.shape_code))
            .then(ka.length_steps.cmp(&kb.length_steps))
    });

    let marks = ordered
        .into_iter()
        .enumerate()
        .map(|(index, (_, group))| {
            let item = group.item;
            let unit_weight = item.size.unit_weight_kg_per_m();
            let total_length_mm = group.cut_length_mm * group.count as f64;
            BarMark {
                id: format!("M{:02}", index + 1),
                zone: item.zone.clone(),
                shape_code: item.shape.shape_code().to_string(),
                diameter_mm: item.size.diameter_mm(),
                count: group.count,
                cut_length_mm: group.cut_length_mm,
                total_length_mm,
                unit_weight_kg_per_m: unit_weight,
                total_weight_kg: unit_weight * total_length_mm / 1000.0,
                remarks: item.shape.description(),
            }
        })
        .collect();

    Ok(marks)
}
