//! Applied load definitions
//!
//! Sign conventions, with x running from the left end to the right end:
//!
//! - Point forces and distributed loads: positive **downward**
//! - Concentrated moments: positive **counter-clockwise**
//! - Axial forces: positive toward **+x** (pulling the right end)

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// The category of an applied load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadKind {
    /// Concentrated transverse force
    PointForce,
    /// Uniform transverse load over an interval
    Distributed,
    /// Concentrated couple
    Moment,
    /// Concentrated force along the beam axis
    Axial,
}

impl LoadKind {
    /// Short code used in load labels (P, q, C, H)
    pub fn code(&self) -> &'static str {
        match self {
            LoadKind::PointForce => "P",
            LoadKind::Distributed => "q",
            LoadKind::Moment => "C",
            LoadKind::Axial => "H",
        }
    }
}

impl std::fmt::Display for LoadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single load applied to the beam
///
/// ## JSON Format
/// ```json
/// { "type": "PointForce", "position": 5.0, "magnitude": 100.0 }
/// { "type": "DistributedLoad", "start": 0.0, "end": 10.0, "intensity": 10.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Load {
    /// Point force (N) at position (m), positive downward
    PointForce { position: f64, magnitude: f64 },

    /// Uniform load (N/m) from `start` to `end` (m), positive downward
    DistributedLoad { start: f64, end: f64, intensity: f64 },

    /// Concentrated moment (N·m) at position (m), positive counter-clockwise
    Moment { position: f64, magnitude: f64 },

    /// Axial force (N) at position (m), positive toward +x
    AxialForce { position: f64, magnitude: f64 },
}

impl Load {
    /// Create a point force
    pub fn point(magnitude: f64, position: f64) -> Self {
        Load::PointForce {
            position,
            magnitude,
        }
    }

    /// Create a uniform distributed load
    pub fn distributed(intensity: f64, start: f64, end: f64) -> Self {
        Load::DistributedLoad {
            start,
            end,
            intensity,
        }
    }

    /// Create a concentrated moment
    pub fn moment(magnitude: f64, position: f64) -> Self {
        Load::Moment {
            position,
            magnitude,
        }
    }

    /// Create an axial force
    pub fn axial(magnitude: f64, position: f64) -> Self {
        Load::AxialForce {
            position,
            magnitude,
        }
    }

    /// The category of this load
    pub fn kind(&self) -> LoadKind {
        match self {
            Load::PointForce { .. } => LoadKind::PointForce,
            Load::DistributedLoad { .. } => LoadKind::Distributed,
            Load::Moment { .. } => LoadKind::Moment,
            Load::AxialForce { .. } => LoadKind::Axial,
        }
    }

    /// Total downward force (N)
    ///
    /// Distributed loads are reduced to intensity × length.
    pub fn vertical_force(&self) -> f64 {
        match *self {
            Load::PointForce { magnitude, .. } => magnitude,
            Load::DistributedLoad {
                start,
                end,
                intensity,
            } => intensity * (end - start),
            Load::Moment { .. } | Load::AxialForce { .. } => 0.0,
        }
    }

    /// Force along +x (N)
    pub fn horizontal_force(&self) -> f64 {
        match *self {
            Load::AxialForce { magnitude, .. } => magnitude,
            _ => 0.0,
        }
    }

    /// Where the resultant acts: the interval midpoint for distributed loads
    pub fn centroid(&self) -> f64 {
        match *self {
            Load::PointForce { position, .. }
            | Load::Moment { position, .. }
            | Load::AxialForce { position, .. } => position,
            Load::DistributedLoad { start, end, .. } => (start + end) / 2.0,
        }
    }

    /// Counter-clockwise moment of this load about the point `x` (N·m)
    ///
    /// Axial forces act along the beam axis and have no lever arm.
    pub fn moment_about(&self, x: f64) -> f64 {
        match *self {
            Load::Moment { magnitude, .. } => magnitude,
            Load::AxialForce { .. } => 0.0,
            _ => -self.vertical_force() * (self.centroid() - x),
        }
    }

    /// Positions where this load starts, ends or acts
    pub fn positions(&self) -> Vec<f64> {
        match *self {
            Load::DistributedLoad { start, end, .. } => vec![start, end],
            _ => vec![self.centroid()],
        }
    }

    /// Distributed intensity (N/m) acting strictly inside `(a, b)`.
    ///
    /// The interval must not straddle one of this load's endpoints.
    pub fn intensity_over(&self, a: f64, b: f64) -> f64 {
        match *self {
            Load::DistributedLoad {
                start,
                end,
                intensity,
            } => {
                let mid = (a + b) / 2.0;
                if start < mid && mid < end {
                    intensity
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    /// Short label like `P100N@5m`, `q10N/m_0-10m`
    pub fn label(&self) -> String {
        match *self {
            Load::PointForce {
                position,
                magnitude,
            } => format!("P{}N@{}m", magnitude, position),
            Load::DistributedLoad {
                start,
                end,
                intensity,
            } => format!("q{}N/m_{}-{}m", intensity, start, end),
            Load::Moment {
                position,
                magnitude,
            } => format!("C{}N.m@{}m", magnitude, position),
            Load::AxialForce {
                position,
                magnitude,
            } => format!("H{}N@{}m", magnitude, position),
        }
    }

    /// Validate this load against a beam of the given length.
    ///
    /// `index` is the load's position in its list and only appears in errors.
    pub fn validate(&self, index: usize, beam_length: f64) -> CalcResult<()> {
        let subject = || format!("load[{}] ({})", index, self);

        let values: Vec<(&str, f64)> = match *self {
            Load::PointForce {
                position,
                magnitude,
            }
            | Load::Moment {
                position,
                magnitude,
            }
            | Load::AxialForce {
                position,
                magnitude,
            } => vec![("position", position), ("magnitude", magnitude)],
            Load::DistributedLoad {
                start,
                end,
                intensity,
            } => vec![("start", start), ("end", end), ("intensity", intensity)],
        };
        for (name, value) in values {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(
                    format!("loads[{}].{}", index, name),
                    value.to_string(),
                    "Value must be finite",
                ));
            }
        }

        if let Load::DistributedLoad { start, end, .. } = *self {
            if start > end {
                return Err(CalcError::invalid_input(
                    format!("loads[{}]", index),
                    format!("[{}, {}]", start, end),
                    "Distributed load start must not exceed its end",
                ));
            }
        }

        for x in self.positions() {
            if !(0.0..=beam_length).contains(&x) {
                return Err(CalcError::configuration(
                    subject(),
                    format!("x = {} m lies outside the beam [0, {}]", x, beam_length),
                ));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Load {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Load::PointForce {
                position,
                magnitude,
            } => write!(f, "point force {} N at x = {} m", magnitude, position),
            Load::DistributedLoad {
                start,
                end,
                intensity,
            } => write!(f, "distributed load {} N/m over [{}, {}] m", intensity, start, end),
            Load::Moment {
                position,
                magnitude,
            } => write!(f, "moment {} N·m at x = {} m", magnitude, position),
            Load::AxialForce {
                position,
                magnitude,
            } => write!(f, "axial force {} N at x = {} m", magnitude, position),
        }
    }
}
