/// Hint solver: exact coefficients for the current target.
///
/// Solves  [b1 b2] · c = target  for c via the 2×2 inverse.
/// A basis whose columns are (nearly) parallel spans at most a line, so
/// there is no unique answer and the solve reports `NotRepresentable`
/// instead of returning garbage from a blown-up inverse.

use glam::{DMat2, DVec2};
use thiserror::Error;

use super::combination::{Basis, Coefficients};

/// |det| must exceed this fraction of |b1|·|b2| (i.e. |sin θ| between the
/// basis vectors) for the basis to count as spanning the plane.
pub const SINGULAR_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HintError {
    #[error("this basis cannot represent the target")]
    NotRepresentable,
}

/// Does the basis span the plane?
pub fn spans_plane(basis: &Basis) -> bool {
    let det = DMat2::from_cols(basis.b1, basis.b2).determinant();
    let scale = basis.b1.length() * basis.b2.length();
    det.is_finite() && det.abs() > SINGULAR_TOLERANCE * scale
}

/// Exact coefficients reaching `target`. Unrounded and unclamped: the
/// answer may fall outside the slider range.
pub fn solve(basis: &Basis, target: DVec2) -> Result<Coefficients, HintError> {
    if !spans_plane(basis) {
        return Err(HintError::NotRepresentable);
    }
    let c = DMat2::from_cols(basis.b1, basis.b2).inverse() * target;
    if !c.is_finite() {
        return Err(HintError::NotRepresentable);
    }
    Ok(Coefficients::new(c.x, c.y))
}
