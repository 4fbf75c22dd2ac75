//! # Project Data Structures
//!
//! The `Project` struct is the root container for a job's beam design
//! work: metadata, the office defaults injected into the three engines,
//! and the design items themselves. Projects serialize to human-readable
//! JSON; where that JSON lives is the caller's concern.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (design code, cover, rates, stock)
//! └── items: HashMap<Uuid, DesignItem> (all design tasks)
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::arrangement::ArrangementInput;
use crate::fabrication::{ScheduleInput, StockLengths};
use crate::materials::{ConcreteGrade, SteelGrade};
use crate::section::{CostProfile, SectionSearchInput};

/// Current schema version for serialized projects
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Office defaults fed to the engines
    pub settings: GlobalSettings,

    /// All design items, keyed by UUID for stable references
    pub items: HashMap<Uuid, DesignItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use design_core::project::Project;
    ///
    /// let project = Project::new("A. Engineer", "26-014", "Horizon Builders");
    /// assert_eq!(project.meta.job_id, "26-014");
    /// ```
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a design item; returns its assigned UUID.
    pub fn add_item(&mut self, item: DesignItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a design item by UUID, returning it if present.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<DesignItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_item(&self, id: &Uuid) -> Option<&DesignItem> {
        self.items.get(id)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Office defaults for new design items.
///
/// These are the explicit configuration objects handed to the engines;
/// nothing in the search paths reads them implicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Design code designation
    pub code: String,

    /// Default clear cover (mm)
    pub default_cover_mm: f64,

    /// Default nominal aggregate size (mm)
    pub agg_size_mm: f64,

    /// Default concrete grade for new work
    pub default_concrete: ConcreteGrade,

    /// Default reinforcement grade for new work
    pub default_steel: SteelGrade,

    /// Office cost profile
    pub cost_profile: CostProfile,

    /// Stock lengths the usual supplier carries
    pub stock: StockLengths,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            code: "IS 456:2000".to_string(),
            default_cover_mm: 30.0,
            agg_size_mm: 20.0,
            default_concrete: ConcreteGrade::M25,
            default_steel: SteelGrade::Fe500,
            cost_profile: CostProfile::default(),
            stock: StockLengths::default(),
        }
    }
}

/// One design task under a project, with its user-facing label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignItem {
    /// User label (e.g., "B-1", "Plinth beam at grid C")
    pub label: String,

    /// The task input itself
    pub task: DesignTask,
}

/// Enum wrapper over the three engine inputs, for heterogeneous storage
/// with clean serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DesignTask {
    /// Bar arrangement search
    Arrangement(ArrangementInput),
    /// Section/material cost optimization
    SectionSearch(SectionSearchInput),
    /// Bar-bending schedule and cutting plan
    Schedule(ScheduleInput),
}

impl DesignTask {
    /// Task type as a string
    pub fn task_type(&self) -> &'static str {
        match self {
            DesignTask::Arrangement(_) => "Arrangement",
            DesignTask::SectionSearch(_) => "Section search",
            DesignTask::Schedule(_) => "Schedule",
        }
    }
}
