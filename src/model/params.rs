//! Solver configuration.
//!
//! The interior-point solver this crate grew out of configured itself through a
//! dynamic, proc-macro-backed options registry (`build_options!` /
//! `build_option_enum!`) that let callers stash arbitrary named values and look
//! them up by string at runtime. That registry exists to serve a family of
//! solvers (IPM, QP, NLP) with overlapping but not identical knobs. A Big-M
//! simplex and branch-and-bound solver has exactly three knobs, fixed at
//! compile time, so a plain struct is the right tool here — see `SPEC_FULL.md`
//! §10.3 for the full reasoning.

/// Node-selection strategy for the branch-and-bound tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Branching {
    /// Depth-first: always expand the most recently created node first.
    #[default]
    Dfs,
    /// Breadth-first: expand nodes in the order they were created.
    Bfs,
}

/// Fixed configuration for a [`crate::model::Model::solve`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    /// Relative optimality gap at which branch-and-bound may stop early.
    ///
    /// `0.0` requires the tree to be fully explored (or pruned) before an
    /// incumbent is reported as optimal.
    pub mip_gap: f64,
    /// Wall-clock budget, in seconds, for a single `solve` call.
    pub time_limit: f64,
    /// Node-selection strategy used by the branch-and-bound controller.
    pub branching: Branching,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            mip_gap: 0.0,
            time_limit: f64::INFINITY,
            branching: Branching::Dfs,
        }
    }
}
