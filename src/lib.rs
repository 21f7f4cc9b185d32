//! A Big-M revised simplex method and branch-and-bound solver for linear and
//! mixed-integer linear programs.
//!
//! Build a [`model::Model`] by adding variables and constraints, set an
//! objective, and call [`model::Model::solve`]. Continuous models are solved
//! directly with the revised simplex method; models with integer or binary
//! variables are solved by branch-and-bound, re-solving a relaxation at every
//! node. See `SPEC_FULL.md` for the full specification this crate implements.

pub type E = f64;

pub mod callback;
pub mod error;
pub mod linalg;
pub mod mip;
pub mod model;
pub mod simplex;
pub mod standardize;
pub mod terminators;
#[cfg(test)]
mod tests;

use problemo::Problem;

/// Status codes returned by the simplex and branch-and-bound solvers.
///
/// This is the solver-internal status; [`model::ReportedStatus`] is the
/// smaller, externally-facing projection of it reported in a
/// [`model::SolverResult`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Status {
    #[default]
    InProgress,
    /// A provably optimal solution was found.
    Optimal,
    /// A feasible incumbent exists but optimality was not proven before the
    /// solver stopped (time or iteration limit, or interruption).
    Feasible,
    /// The problem (or a relaxation) has no feasible solution.
    Infeasible,
    /// The objective is unbounded in the direction of improvement.
    Unbounded,
    /// The solver stopped due to a time limit.
    TimeLimit,
    /// The solver stopped due to an iteration limit.
    IterationLimit,
    /// The solver was interrupted (e.g. by Ctrl-C).
    Interrupted,
}

/// Trait for algorithms that solve a [`model::Model`] in place.
pub trait Solver {
    fn solve(&mut self, model: &mut model::Model, hooks: &mut SolverHooks) -> Result<Status, Problem>;
}

/// Per-solve hooks: a progress callback and a termination policy.
pub struct SolverHooks {
    pub callback: Box<dyn callback::Callback>,
    pub terminator: Box<dyn terminators::Terminator>,
}

impl SolverHooks {
    pub fn new(callback: Box<dyn callback::Callback>, terminator: Box<dyn terminators::Terminator>) -> Self {
        Self { callback, terminator }
    }
}

impl Default for SolverHooks {
    fn default() -> Self {
        Self {
            callback: Box::new(callback::NoOpCallback),
            terminator: Box::new(terminators::MultipleTerminators::new(Vec::new())),
        }
    }
}
