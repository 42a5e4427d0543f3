//! Piecewise Polynomial Force Functions
//!
//! Internal forces of a statically determinate beam are exact piecewise
//! polynomials of degree ≤ 2. Each [`Piece`] stores its coefficients in the
//! local coordinate `t = x − start`:
//!
//! ```text
//! f(x) = c0 + c1·t + c2·t²
//! ```
//!
//! Shear is constant or linear per piece, moment linear or quadratic, axial
//! force constant. Values at piece boundaries may jump (point forces,
//! concentrated moments); [`InternalForceFunction::evaluate`] returns the
//! right-hand limit and [`InternalForceFunction::left_limit`] the left-hand one.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Which internal force a function describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceComponent {
    /// Shear force V(x)
    Shear,
    /// Bending moment M(x)
    Moment,
    /// Axial force N(x)
    Axial,
}

impl ForceComponent {
    /// All components in diagram order (V, M, N)
    pub const ALL: [ForceComponent; 3] = [
        ForceComponent::Shear,
        ForceComponent::Moment,
        ForceComponent::Axial,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ForceComponent::Shear => "Shear force",
            ForceComponent::Moment => "Bending moment",
            ForceComponent::Axial => "Axial force",
        }
    }

    /// Conventional symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            ForceComponent::Shear => "V",
            ForceComponent::Moment => "M",
            ForceComponent::Axial => "N",
        }
    }
}

impl std::fmt::Display for ForceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// =============================================================================
// PIECE
// =============================================================================

/// One polynomial piece on `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Left end of the piece (m)
    pub start: f64,
    /// Right end of the piece (m)
    pub end: f64,
    /// `[c0, c1, c2]` in the local coordinate `t = x − start`
    pub coefficients: [f64; 3],
}

impl Piece {
    /// Create a piece
    pub fn new(start: f64, end: f64, coefficients: [f64; 3]) -> Self {
        Piece {
            start,
            end,
            coefficients,
        }
    }

    /// Length of the piece (m)
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Polynomial value at x (no range check)
    pub fn value_at(&self, x: f64) -> f64 {
        let [c0, c1, c2] = self.coefficients;
        let t = x - self.start;
        c0 + t * (c1 + t * c2)
    }

    /// First derivative at x
    pub fn slope_at(&self, x: f64) -> f64 {
        let [_, c1, c2] = self.coefficients;
        c1 + 2.0 * c2 * (x - self.start)
    }

    /// Value at the left end
    pub fn start_value(&self) -> f64 {
        self.coefficients[0]
    }

    /// Value at the right end
    pub fn end_value(&self) -> f64 {
        self.value_at(self.end)
    }

    /// Exact integral over the piece
    pub fn integral(&self) -> f64 {
        let [c0, c1, c2] = self.coefficients;
        let h = self.length();
        h * (c0 + h * (c1 / 2.0 + h * c2 / 3.0))
    }

    /// Highest power with a coefficient larger than `tolerance` over the piece
    pub fn degree(&self, tolerance: f64) -> usize {
        let [_, c1, c2] = self.coefficients;
        let h = self.length();
        if (c2 * h * h).abs() > tolerance {
            2
        } else if (c1 * h).abs() > tolerance {
            1
        } else {
            0
        }
    }

    /// Stationary point strictly inside the piece, if the piece is quadratic
    pub fn stationary_point(&self, tolerance: f64) -> Option<f64> {
        if self.degree(tolerance) < 2 {
            return None;
        }
        let [_, c1, c2] = self.coefficients;
        let x = self.start - c1 / (2.0 * c2);
        self.strictly_inside(x).then_some(x)
    }

    /// Roots strictly inside the piece, ascending.
    ///
    /// Constant pieces have none, even when identically zero.
    pub fn interior_roots(&self, tolerance: f64) -> Vec<f64> {
        let [c0, c1, c2] = self.coefficients;
        let mut roots = Vec::new();

        match self.degree(tolerance) {
            0 => {}
            1 => roots.push(self.start - c0 / c1),
            _ => {
                let vertex = self.start - c1 / (2.0 * c2);
                let discriminant = c1 * c1 - 4.0 * c2 * c0;
                if self.value_at(vertex).abs() <= tolerance {
                    // Tangent root
                    roots.push(vertex);
                } else if discriminant > 0.0 {
                    // Numerically stable pair; q != 0 since the vertex value is not zero
                    let q = -0.5 * (c1 + c1.signum() * discriminant.sqrt());
                    let (t1, t2) = (q / c2, c0 / q);
                    roots.push(self.start + t1.min(t2));
                    roots.push(self.start + t1.max(t2));
                }
            }
        }

        roots.retain(|x| self.strictly_inside(*x));
        roots
    }

    fn strictly_inside(&self, x: f64) -> bool {
        let margin = 1e-12 * self.length().max(1.0);
        x > self.start + margin && x < self.end - margin
    }
}

// =============================================================================
// CRITICAL POINTS
// =============================================================================

/// Classification of a critical point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriticalKind {
    /// The function crosses zero
    Zero,
    /// Local maximum or minimum (or a beam end with non-zero value)
    Extremum,
    /// Jump caused by a concentrated action
    Discontinuity,
}

/// A notable point of an internal-force function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalPoint {
    /// Position (m)
    pub x: f64,
    /// Value at x (the right-hand limit at a discontinuity)
    pub value: f64,
    /// Left-hand limit; equals `value` where the function is continuous
    pub left_value: f64,
    /// What makes this point notable
    pub kind: CriticalKind,
}

impl CriticalPoint {
    /// Size of the jump (right − left); zero unless a discontinuity
    pub fn jump(&self) -> f64 {
        self.value - self.left_value
    }
}

/// Location and value of a maximum/minimum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extreme {
    /// Position (m)
    pub x: f64,
    /// Signed value
    pub value: f64,
}

// =============================================================================
// INTERNAL FORCE FUNCTION
// =============================================================================

/// Piecewise polynomial internal force over `[0, L]`.
///
/// Pieces are contiguous, ordered by position and each has positive length.
/// Deserialization goes through [`InternalForceFunction::new`], so malformed
/// piece lists are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawForceFunction")]
pub struct InternalForceFunction {
    component: ForceComponent,
    pieces: Vec<Piece>,
    /// Absolute tolerance below which values, jumps and coefficients count as zero
    tolerance: f64,
}

/// Unchecked wire form of [`InternalForceFunction`]
#[derive(Deserialize)]
struct RawForceFunction {
    component: ForceComponent,
    pieces: Vec<Piece>,
    tolerance: f64,
}

impl TryFrom<RawForceFunction> for InternalForceFunction {
    type Error = CalcError;

    fn try_from(raw: RawForceFunction) -> CalcResult<Self> {
        InternalForceFunction::new(raw.component, raw.pieces, raw.tolerance)
    }
}

impl InternalForceFunction {
    /// Assemble a function from contiguous pieces.
    ///
    /// Fails if `pieces` is empty, has a gap/overlap or a piece of zero length.
    pub fn new(component: ForceComponent, pieces: Vec<Piece>, tolerance: f64) -> CalcResult<Self> {
        let field = format!("{} pieces", component.symbol());
        if pieces.is_empty() {
            return Err(CalcError::invalid_input(field, "[]", "At least one piece is required"));
        }
        for (i, piece) in pieces.iter().enumerate() {
            if !(piece.end > piece.start) {
                return Err(CalcError::invalid_input(
                    field,
                    format!("[{}, {}]", piece.start, piece.end),
                    format!("Piece {} must have positive length", i),
                ));
            }
            if i > 0 && pieces[i - 1].end != piece.start {
                return Err(CalcError::invalid_input(
                    field,
                    format!("{} / {}", pieces[i - 1].end, piece.start),
                    format!("Piece {} does not start where piece {} ends", i, i - 1),
                ));
            }
        }
        Ok(InternalForceFunction {
            component,
            pieces,
            tolerance: tolerance.abs(),
        })
    }

    /// The force this function describes
    pub fn component(&self) -> ForceComponent {
        self.component
    }

    /// Polynomial pieces in ascending order
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Tolerance used for critical point detection
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Left end of the domain
    pub fn start(&self) -> f64 {
        self.pieces.first().map_or(0.0, |p| p.start)
    }

    /// Right end of the domain
    pub fn end(&self) -> f64 {
        self.pieces.last().map_or(0.0, |p| p.end)
    }

    /// Piece boundaries, including both ends
    pub fn breakpoints(&self) -> Vec<f64> {
        std::iter::once(self.start())
            .chain(self.pieces.iter().map(|p| p.end))
            .collect()
    }

    fn check_domain(&self, x: f64) -> CalcResult<()> {
        if !x.is_finite() || x < self.start() || x > self.end() {
            return Err(CalcError::invalid_input(
                "x",
                x.to_string(),
                format!(
                    "{} can only be evaluated on the beam [{}, {}]",
                    self.component.display_name(),
                    self.start(),
                    self.end()
                ),
            ));
        }
        Ok(())
    }

    /// Value at x.
    ///
    /// Returns the right-hand limit on `[0, L)` and the left-hand limit at `L`.
    pub fn evaluate(&self, x: f64) -> CalcResult<f64> {
        self.check_domain(x)?;
        Ok(self.right_value(x))
    }

    /// Left-hand limit at x (the value itself at x = 0)
    pub fn left_limit(&self, x: f64) -> CalcResult<f64> {
        self.check_domain(x)?;
        Ok(self.left_value(x))
    }

    /// Right-hand limit without a domain check
    pub(crate) fn right_value(&self, x: f64) -> f64 {
        let index = self
            .pieces
            .partition_point(|p| p.end <= x)
            .min(self.pieces.len() - 1);
        self.pieces[index].value_at(x)
    }

    /// Left-hand limit without a domain check
    pub(crate) fn left_value(&self, x: f64) -> f64 {
        let index = self
            .pieces
            .partition_point(|p| p.end < x)
            .min(self.pieces.len() - 1);
        self.pieces[index].value_at(x)
    }

    /// Exact integral over the whole beam
    pub fn integral(&self) -> f64 {
        self.pieces.iter().map(Piece::integral).sum()
    }

    /// Zeros, extrema and discontinuities ordered by x.
    ///
    /// - Zero: interior roots of each piece, plus sign changes at continuous
    ///   interior boundaries. The beam ends are never reported as zeros.
    /// - Extremum: interior stationary points, continuous interior boundaries
    ///   where the function falls (or rises) away on both sides, and beam ends
    ///   with a non-zero value. A boundary where V = 0 between two quadratic
    ///   pieces of M is decided by curvature.
    /// - Discontinuity: interior boundaries whose left and right limits differ.
    ///
    /// Each interior boundary yields at most one point. A jump takes precedence,
    /// so a boundary that is both a jump and a local peak is reported only as a
    /// discontinuity; both limits are available on that point.
    pub fn critical_points(&self) -> Vec<CriticalPoint> {
        let tol = self.tolerance;
        let mut points = Vec::new();

        let continuous = |x: f64, value: f64, kind| CriticalPoint {
            x,
            value,
            left_value: value,
            kind,
        };

        let first = self.pieces[0];
        if first.start_value().abs() > tol {
            points.push(continuous(first.start, first.start_value(), CriticalKind::Extremum));
        }

        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                let before = &self.pieces[i - 1];
                let x = piece.start;
                let left = before.end_value();
                let right = piece.start_value();

                if (right - left).abs() > tol {
                    points.push(CriticalPoint {
                        x,
                        value: right,
                        left_value: left,
                        kind: CriticalKind::Discontinuity,
                    });
                } else {
                    let bend = side_sign(before, Side::Left, tol) * side_sign(piece, Side::Right, tol);
                    if right.abs() <= tol && bend < 0.0 {
                        points.push(continuous(x, 0.0, CriticalKind::Zero));
                    }
                    if bend > 0.0 {
                        points.push(continuous(x, right, CriticalKind::Extremum));
                    }
                }
            }

            for root in piece.interior_roots(tol) {
                points.push(continuous(root, 0.0, CriticalKind::Zero));
            }
            if let Some(x) = piece.stationary_point(tol) {
                points.push(continuous(x, piece.value_at(x), CriticalKind::Extremum));
            }
        }

        let last = self.pieces[self.pieces.len() - 1];
        if last.end_value().abs() > tol {
            points.push(continuous(last.end, last.end_value(), CriticalKind::Extremum));
        }

        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        points
    }

    /// Candidate extreme locations: every piece-end limit and interior stationary point
    fn candidates(&self) -> impl Iterator<Item = Extreme> + '_ {
        self.pieces.iter().flat_map(move |piece| {
            let stationary = piece.stationary_point(self.tolerance).map(|x| Extreme {
                x,
                value: piece.value_at(x),
            });
            [
                Some(Extreme {
                    x: piece.start,
                    value: piece.start_value(),
                }),
                stationary,
                Some(Extreme {
                    x: piece.end,
                    value: piece.end_value(),
                }),
            ]
            .into_iter()
            .flatten()
        })
    }

    fn select(&self, better: impl Fn(&Extreme, &Extreme) -> bool) -> Extreme {
        let mut candidates = self.candidates();
        // Pieces are never empty, so there is at least one candidate
        let first = candidates.next().unwrap_or(Extreme { x: 0.0, value: 0.0 });
        candidates.fold(first, |best, c| if better(&c, &best) { c } else { best })
    }

    /// Largest value (including one-sided limits at discontinuities)
    pub fn max(&self) -> Extreme {
        self.select(|c, best| c.value > best.value)
    }

    /// Smallest value (including one-sided limits at discontinuities)
    pub fn min(&self) -> Extreme {
        self.select(|c, best| c.value < best.value)
    }

    /// Value of largest magnitude, sign preserved
    pub fn max_abs(&self) -> Extreme {
        self.select(|c, best| c.value.abs() > best.value.abs())
    }
}

#[derive(Clone, Copy)]
enum Side {
    /// Approaching a boundary from the left (piece ends there)
    Left,
    /// Leaving a boundary to the right (piece starts there)
    Right,
}

/// Sign of `f(near) − f(boundary)` for a point of the piece just beside the
/// boundary; zero if the piece is flat there
fn side_sign(piece: &Piece, side: Side, tolerance: f64) -> f64 {
    let (x, direction) = match side {
        Side::Left => (piece.end, -1.0),
        Side::Right => (piece.start, 1.0),
    };
    let slope = piece.slope_at(x);
    let [_, _, c2] = piece.coefficients;
    let h = piece.length();

    if (slope * h).abs() > tolerance {
        (direction * slope).signum()
    } else if (c2 * h * h).abs() > tolerance {
        c2.signum()
    } else {
        0.0
    }
}
