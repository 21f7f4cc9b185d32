//! Typed error taxonomy for the boundary of this crate.
//!
//! Leaf errors are plain `derive_more` enums, the same pattern the linear-algebra
//! layer uses for its own errors. They are lifted to [`problemo::Problem`] at the
//! points where this crate actually fails (as opposed to returning a `Status`,
//! which is how infeasibility, unboundedness, and time/iteration limits are
//! reported — see the crate-level docs).

use derive_more::{Display, Error};

/// Failures in the model-building and reporting surface.
#[derive(Debug, Display, Error, PartialEq, Eq, Clone, Copy)]
pub enum ModelError {
    /// A variable handle was not produced by the model it was queried against.
    #[display("variable handle does not belong to this model")]
    UnknownVariable,
    /// The model reached an internally inconsistent state before a solve could start.
    #[display("model is in an inconsistent internal state")]
    UnknownModel,
}

/// Failures in the dense linear-algebra layer underneath the simplex solver.
#[derive(Debug, Display, Error, PartialEq, Clone, Copy)]
pub enum NumericalError {
    /// The current basis matrix has no inverse (a pivot produced a singular basis).
    #[display("basis matrix is rank-deficient")]
    RankDeficient,
    /// The basis inverse could not be refreshed from the current pivot.
    #[display("basis inverse could not be refreshed")]
    InversionFailed,
}
