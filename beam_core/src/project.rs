//! # Project Data Structures
//!
//! The `Project` struct is the document a user edits and saves: one beam,
//! its loads, and the settings used to sample diagrams. Projects serialize to
//! `.beam` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, name, engineer, timestamps)
//! ├── settings: AnalysisSettings (diagram sampling)
//! ├── beam: Beam (length and supports)
//! └── loads: Vec<Load> (applied loads, in entry order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use beam_core::beam::Beam;
//! use beam_core::loads::Load;
//! use beam_core::project::Project;
//!
//! let project = Project::new("Footbridge", "Jane Engineer", Beam::simply_supported(10.0))
//!     .with_load(Load::point(100.0, 5.0));
//!
//! let analysis = project.analyze().unwrap();
//! assert!((analysis.summary.max_moment.value - 250.0).abs() < 1e-9);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::beam::Beam;
use crate::calculations::{
    compute_internal_forces, solve_reactions, ForceSample, ForceSummary, InternalForces,
    ReactionSet,
};
use crate::errors::CalcResult;
use crate::loads::{validate_loads, Load};

/// Current schema version for .beam files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// File extension for saved projects
pub const FILE_EXTENSION: &str = "beam";

/// Root project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, name, engineer)
    pub meta: ProjectMetadata,

    /// Analysis settings
    #[serde(default)]
    pub settings: AnalysisSettings,

    /// The beam being analysed
    pub beam: Beam,

    /// Applied loads
    #[serde(default)]
    pub loads: Vec<Load>,
}

impl Project {
    /// Create a new project with no loads.
    ///
    /// # Example
    ///
    /// ```rust
    /// use beam_core::beam::Beam;
    /// use beam_core::project::Project;
    ///
    /// let project = Project::new("Canopy", "John Doe", Beam::cantilever(3.0));
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// assert!(project.loads.is_empty());
    /// ```
    pub fn new(name: impl Into<String>, engineer: impl Into<String>, beam: Beam) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                engineer: engineer.into(),
                created: now,
                modified: now,
            },
            settings: AnalysisSettings::default(),
            beam,
            loads: Vec::new(),
        }
    }

    /// Add a load and return self (builder pattern)
    pub fn with_load(mut self, load: Load) -> Self {
        self.loads.push(load);
        self
    }

    /// Add a load.
    ///
    /// Returns the index assigned to the load.
    pub fn add_load(&mut self, load: Load) -> usize {
        self.loads.push(load);
        self.touch();
        self.loads.len() - 1
    }

    /// Remove a load by index.
    ///
    /// Returns the removed load if the index was valid.
    pub fn remove_load(&mut self, index: usize) -> Option<Load> {
        if index >= self.loads.len() {
            return None;
        }
        let load = self.loads.remove(index);
        self.touch();
        Some(load)
    }

    /// Replace the beam, keeping the loads.
    pub fn set_beam(&mut self, beam: Beam) {
        self.beam = beam;
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Check the beam and every load without solving anything.
    pub fn validate(&self) -> CalcResult<()> {
        self.beam.validate()?;
        validate_loads(&self.loads, self.beam.length)
    }

    /// Solve reactions, build the internal-force diagrams and sample them.
    pub fn analyze(&self) -> CalcResult<BeamAnalysis> {
        let reactions = solve_reactions(&self.beam, &self.loads)?;
        let forces = compute_internal_forces(&self.beam, &self.loads, &reactions)?;
        let samples = forces.sample(self.settings.sample_points);
        let summary = forces.summary();

        tracing::debug!(
            project = %self.meta.name,
            samples = samples.len(),
            "analyzed project"
        );

        Ok(BeamAnalysis {
            reactions,
            forces,
            samples,
            summary,
        })
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project or member name
    pub name: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Settings that control how results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Number of uniformly spaced sample positions for diagrams
    pub sample_points: usize,
}

impl AnalysisSettings {
    /// Minimum number of sample points (both beam ends)
    pub const MIN_SAMPLE_POINTS: usize = 2;

    /// Set the number of sample points and return self (builder pattern)
    pub fn with_sample_points(mut self, points: usize) -> Self {
        self.sample_points = points.max(Self::MIN_SAMPLE_POINTS);
        self
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            sample_points: 101, // every 1% of the length
        }
    }
}

/// Everything computed for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamAnalysis {
    /// Support reactions in beam support order
    pub reactions: ReactionSet,
    /// Exact V(x), M(x), N(x) with critical points
    pub forces: InternalForces,
    /// Sampled diagram rows
    pub samples: Vec<ForceSample>,
    /// Maxima and minima
    pub summary: ForceSummary,
}
