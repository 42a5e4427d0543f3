//! # Beam Model
//!
//! Geometry and support conditions of a straight, statically determinate beam.
//!
//! Positions are measured in metres from the left end (x = 0) to the right
//! end (x = L). Each support contributes a fixed set of reaction unknowns:
//!
//! | Kind     | Vertical | Horizontal | Rotation | Unknowns |
//! |----------|:--------:|:----------:|:--------:|:--------:|
//! | `Pin`    | ✓        | ✓          |          | 2        |
//! | `Roller` | ✓        |            |          | 1        |
//! | `Fixed`  | ✓        | ✓          | ✓        | 3        |
//!
//! A planar beam has three equilibrium equations, so the support set must
//! provide exactly three independent unknowns: one fixed support on its own,
//! or a pin together with a roller at a different position.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::beam::{Beam, BeamConfiguration, SupportKind};
//!
//! // 12 m beam with 2 m overhangs on both sides
//! let beam = Beam::overhanging(12.0, 2.0, 10.0);
//! assert!(matches!(beam.configuration(), Ok(BeamConfiguration::PinRoller { .. })));
//! assert!(beam.has_overhang());
//!
//! // A lone roller cannot carry anything
//! let unstable = Beam::new(5.0).with_support(SupportKind::Roller, 0.0);
//! assert!(unstable.validate().is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Number of independent equilibrium equations for a planar beam
pub const EQUILIBRIUM_EQUATIONS: usize = 3;

// =============================================================================
// SUPPORT KIND
// =============================================================================

/// Support condition and the reaction components it can exert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SupportKind {
    /// Hinge - restrains vertical and horizontal translation, rotation free
    #[default]
    Pin,

    /// Roller - restrains vertical translation only
    Roller,

    /// Clamped end - restrains both translations and rotation
    Fixed,
}

impl SupportKind {
    /// Returns true if this support exerts a vertical reaction
    pub fn restrains_vertical(&self) -> bool {
        true
    }

    /// Returns true if this support exerts a horizontal reaction
    pub fn restrains_horizontal(&self) -> bool {
        matches!(self, SupportKind::Pin | SupportKind::Fixed)
    }

    /// Returns true if this support exerts a reaction moment
    pub fn restrains_rotation(&self) -> bool {
        matches!(self, SupportKind::Fixed)
    }

    /// Number of reaction unknowns introduced by this support
    pub fn unknowns(&self) -> usize {
        [
            self.restrains_vertical(),
            self.restrains_horizontal(),
            self.restrains_rotation(),
        ]
        .iter()
        .filter(|restrained| **restrained)
        .count()
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportKind::Pin => "Pin",
            SupportKind::Roller => "Roller",
            SupportKind::Fixed => "Fixed",
        }
    }
}

impl std::fmt::Display for SupportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// =============================================================================
// SUPPORT
// =============================================================================

/// A support at a position along the beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Support {
    /// Support condition
    pub kind: SupportKind,
    /// Distance from the left end (m)
    pub position: f64,
}

impl Support {
    /// Create a support
    pub fn new(kind: SupportKind, position: f64) -> Self {
        Support { kind, position }
    }
}

impl std::fmt::Display for Support {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} support at x = {} m", self.kind, self.position)
    }
}

// =============================================================================
// BEAM CONFIGURATION
// =============================================================================

/// A validated, statically determinate support arrangement.
///
/// Indices refer to [`Beam::supports`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamConfiguration {
    /// A single fixed support carrying everything
    Cantilever { fixed: usize },

    /// A pin and a roller at distinct positions
    PinRoller { pin: usize, roller: usize },
}

impl BeamConfiguration {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            BeamConfiguration::Cantilever { .. } => "Cantilever",
            BeamConfiguration::PinRoller { .. } => "Pin + roller",
        }
    }
}

// =============================================================================
// BEAM
// =============================================================================

/// A straight beam with its supports.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B-1",
///   "length": 10.0,
///   "supports": [
///     { "kind": "Pin", "position": 0.0 },
///     { "kind": "Roller", "position": 10.0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// User label for this beam
    #[serde(default)]
    pub label: String,

    /// Total length (m)
    pub length: f64,

    /// Supports, in the order their reactions are reported
    pub supports: Vec<Support>,
}

impl Beam {
    /// Create an unsupported beam of the given length
    pub fn new(length: f64) -> Self {
        Beam {
            label: String::new(),
            length,
            supports: Vec::new(),
        }
    }

    /// Pin at x = 0, roller at x = L
    pub fn simply_supported(length: f64) -> Self {
        Beam::new(length)
            .with_support(SupportKind::Pin, 0.0)
            .with_support(SupportKind::Roller, length)
    }

    /// Fixed at x = 0, free at x = L
    pub fn cantilever(length: f64) -> Self {
        Beam::new(length).with_support(SupportKind::Fixed, 0.0)
    }

    /// Free at x = 0, fixed at x = L
    pub fn cantilever_right(length: f64) -> Self {
        Beam::new(length).with_support(SupportKind::Fixed, length)
    }

    /// Pin and roller at arbitrary positions, leaving overhangs beyond them
    pub fn overhanging(length: f64, pin_at: f64, roller_at: f64) -> Self {
        Beam::new(length)
            .with_support(SupportKind::Pin, pin_at)
            .with_support(SupportKind::Roller, roller_at)
    }

    /// Set the label and return self (builder pattern)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a support and return self (builder pattern)
    pub fn with_support(mut self, kind: SupportKind, position: f64) -> Self {
        self.supports.push(Support::new(kind, position));
        self
    }

    /// Add a support
    pub fn add_support(&mut self, kind: SupportKind, position: f64) {
        self.supports.push(Support::new(kind, position));
    }

    /// Total number of reaction unknowns
    pub fn unknown_count(&self) -> usize {
        self.supports.iter().map(|s| s.kind.unknowns()).sum()
    }

    /// Check that a position lies on the beam
    pub fn contains(&self, x: f64) -> bool {
        (0.0..=self.length).contains(&x)
    }

    /// Validate the length alone.
    pub fn validate_length(&self) -> CalcResult<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(CalcError::invalid_input(
                "length",
                self.length.to_string(),
                "Beam length must be positive and finite",
            ));
        }
        Ok(())
    }

    /// Validate geometry and determinacy.
    pub fn validate(&self) -> CalcResult<()> {
        self.configuration().map(|_| ())
    }

    /// Validate the beam and classify its support arrangement.
    ///
    /// Fails with [`CalcError::InvalidInput`] for a non-positive length and
    /// [`CalcError::Configuration`] for supports off the beam or a support
    /// set that is not statically determinate.
    pub fn configuration(&self) -> CalcResult<BeamConfiguration> {
        self.validate_length()?;

        for (i, support) in self.supports.iter().enumerate() {
            if !support.position.is_finite() {
                return Err(CalcError::invalid_input(
                    format!("supports[{}].position", i),
                    support.position.to_string(),
                    "Support position must be finite",
                ));
            }
            if !self.contains(support.position) {
                return Err(CalcError::configuration(
                    format!("support[{}] ({})", i, support),
                    format!("position lies outside the beam [0, {}]", self.length),
                ));
            }
        }

        let unknowns = self.unknown_count();
        if unknowns < EQUILIBRIUM_EQUATIONS {
            return Err(CalcError::configuration(
                self.subject(),
                format!(
                    "under-constrained: {} reaction unknown(s) for {} equilibrium equations",
                    unknowns, EQUILIBRIUM_EQUATIONS
                ),
            ));
        }
        if unknowns > EQUILIBRIUM_EQUATIONS {
            return Err(CalcError::configuration(
                self.subject(),
                format!(
                    "statically indeterminate: {} reaction unknowns for {} equilibrium equations",
                    unknowns, EQUILIBRIUM_EQUATIONS
                ),
            ));
        }

        let find = |kind: SupportKind| self.supports.iter().position(|s| s.kind == kind);

        match (find(SupportKind::Fixed), find(SupportKind::Pin), find(SupportKind::Roller)) {
            (Some(fixed), None, None) => Ok(BeamConfiguration::Cantilever { fixed }),
            (None, Some(pin), Some(roller)) => {
                if self.supports[pin].position == self.supports[roller].position {
                    return Err(CalcError::configuration(
                        self.subject(),
                        format!(
                            "pin and roller coincide at x = {} m; the beam is free to rotate",
                            self.supports[pin].position
                        ),
                    ));
                }
                Ok(BeamConfiguration::PinRoller { pin, roller })
            }
            _ => Err(CalcError::configuration(
                self.subject(),
                "three rollers provide no horizontal restraint; use one fixed support or a pin with a roller",
            )),
        }
    }

    /// True for a pin/roller beam whose supports sit at both ends
    pub fn is_simply_supported(&self) -> bool {
        match self.configuration() {
            Ok(BeamConfiguration::PinRoller { pin, roller }) => {
                let (a, b) = ordered(self.supports[pin].position, self.supports[roller].position);
                a == 0.0 && b == self.length
            }
            _ => false,
        }
    }

    /// True when part of the beam extends beyond the outermost supports
    pub fn has_overhang(&self) -> bool {
        match self.configuration() {
            Ok(BeamConfiguration::PinRoller { pin, roller }) => {
                let (a, b) = ordered(self.supports[pin].position, self.supports[roller].position);
                a > 0.0 || b < self.length
            }
            _ => false,
        }
    }

    /// Identifier used in error messages
    pub(crate) fn subject(&self) -> String {
        if self.label.is_empty() {
            format!("beam (L = {} m)", self.length)
        } else {
            format!("beam '{}' (L = {} m)", self.label, self.length)
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
