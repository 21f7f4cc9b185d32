//! The model-building surface: variables, expressions, constraints, and the
//! dense tableau they standardize into before being handed to the simplex
//! solver or the branch-and-bound controller.

pub mod params;

use std::collections::BTreeMap;

use faer::{Col, Mat};
use problemo::Problem;
use problemo::common::IntoCommonProblem;
use serde::Serialize;

pub use params::{Branching, SolverParams};

use crate::E;
use crate::Status;
use crate::error::ModelError;

/// A stable handle to a variable registered with a [`Model`].
///
/// Handles are plain column indices rather than object identity: cloning a
/// `Model` (as the branch-and-bound controller does for every node) produces
/// variables in the same order, so a handle minted against the original model
/// stays valid against any of its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarHandle(pub(crate) usize);

/// A stable handle to a constraint registered with a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstHandle(pub(crate) usize);

/// The declared type of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarKind {
    #[default]
    Continuous,
    Integer,
    Binary,
}

/// Why a column exists: a variable the caller added, or one of the three
/// auxiliary kinds the standardizer injects to put a row into canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarRole {
    #[default]
    Primal,
    Slack,
    Surplus,
    Artificial,
}

/// Constraint relational operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Eq,
    Ge,
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Min,
    Max,
}

/// A single decision variable or auxiliary column.
#[derive(Debug, Clone)]
pub struct Variable {
    pub lb: E,
    pub ub: E,
    pub kind: VarKind,
    pub role: VarRole,
    pub name: String,
    /// Objective coefficient, already adjusted for `Min`/`Max`.
    pub coeff_c: E,
    /// Sparse row -> coefficient map; materialized into a dense column by
    /// [`crate::standardize::materialize`].
    pub column: BTreeMap<usize, E>,
    pub value: E,
    pub in_basis: bool,
}

impl Variable {
    fn new(lb: E, ub: E, kind: VarKind, role: VarRole, name: String) -> Self {
        let (lb, ub) = if kind == VarKind::Binary { (lb.max(0.0), ub.min(1.0)) } else { (lb, ub) };
        Self {
            lb,
            ub,
            kind,
            role,
            name,
            coeff_c: 0.0,
            column: BTreeMap::new(),
            value: 0.0,
            in_basis: false,
        }
    }
}

/// A linear combination of variables: `sum(coeff * var)`.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    pub terms: Vec<(E, VarHandle)>,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_term(&mut self, coeff: E, var: VarHandle) -> &mut Self {
        self.terms.push((coeff, var));
        self
    }
}

/// A standardized constraint: row index, canonical sense, and non-negative RHS.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub row: usize,
    pub sense: Sense,
    pub rhs: E,
    /// Index of the slack or artificial variable that starts this row in the
    /// basis. Recorded at construction time so that re-materializing a model
    /// (e.g. a branch-and-bound child re-solving from scratch) always starts
    /// from the canonical identity basis, regardless of which variables ended
    /// up basic the last time this model was solved.
    pub basis_var: usize,
}

/// The model's objective row.
#[derive(Debug, Clone)]
pub struct Objective {
    pub direction: Direction,
    pub value: E,
}

/// The externally visible solve status, mirroring the five values a caller can
/// observe through [`SolverResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportedStatus {
    #[default]
    None,
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
}

/// The structured result of a [`Model::solve`] call, also emitted as one line
/// of JSON on every meaningful state transition (see `SPEC_FULL.md` §10.2).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolverResult {
    pub status: ReportedStatus,
    pub obj_val: f64,
    pub solution: BTreeMap<String, f64>,
}

/// A linear or mixed-integer program under construction, and later, under
/// solution.
#[derive(Clone)]
pub struct Model {
    name: String,
    vars: Vec<Variable>,
    consts: Vec<Constraint>,
    obj: Option<Objective>,
    is_mip: bool,
    n_rows: usize,
    n_slack: usize,
    n_surplus: usize,
    n_artificial: usize,
    big_m: E,
    params: SolverParams,
    status: Status,

    // Materialized by `standardize::materialize` immediately before a solve;
    // `None` beforehand and stale (but harmless) afterwards, since a fresh
    // relaxation always re-materializes rather than warm-starting.
    pub(crate) a: Option<Mat<E>>,
    pub(crate) b: Option<Col<E>>,
    pub(crate) basis: Vec<usize>,
    pub(crate) b_inv: Option<Mat<E>>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            consts: Vec::new(),
            obj: None,
            is_mip: false,
            n_rows: 0,
            n_slack: 0,
            n_surplus: 0,
            n_artificial: 0,
            big_m: 1.0e6,
            params: SolverParams::default(),
            status: Status::InProgress,
            a: None,
            b: None,
            basis: Vec::new(),
            b_inv: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_params(&mut self, params: SolverParams) {
        self.params = params;
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn is_mip(&self) -> bool {
        self.is_mip
    }

    pub fn big_m(&self) -> E {
        self.big_m
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.vars.len()
    }

    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub(crate) fn vars_mut(&mut self) -> &mut [Variable] {
        &mut self.vars
    }

    pub fn consts(&self) -> &[Constraint] {
        &self.consts
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.obj.as_ref()
    }

    pub(crate) fn objective_mut(&mut self) -> Option<&mut Objective> {
        self.obj.as_mut()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Registers a new decision variable and returns a handle to it.
    pub fn add_var(&mut self, lb: E, ub: E, kind: VarKind, name: impl Into<String>) -> VarHandle {
        if kind != VarKind::Continuous {
            self.is_mip = true;
        }
        self.vars.push(Variable::new(lb, ub, kind, VarRole::Primal, name.into()));
        VarHandle(self.vars.len() - 1)
    }

    fn push_aux_var(&mut self, role: VarRole, row: usize, coeff: E, name: String) -> usize {
        let coeff_c = if role == VarRole::Artificial { self.big_m } else { 0.0 };
        let mut var = Variable::new(0.0, E::INFINITY, VarKind::Continuous, role, name);
        var.coeff_c = coeff_c;
        var.column.insert(row, coeff);
        self.vars.push(var);
        self.vars.len() - 1
    }

    /// Registers a constraint built from an arbitrary linear expression.
    ///
    /// Normalizes the RHS to be non-negative (flipping the sense and negating
    /// the row if necessary) and eagerly injects the slack, surplus, or
    /// artificial columns the row needs to reach canonical form.
    pub fn add_const(&mut self, expr: &Expression, sense: Sense, rhs: E) -> ConstHandle {
        let row = self.n_rows;
        let (sense, rhs, sign) = if rhs < 0.0 {
            (flip_sense(sense), -rhs, -1.0)
        } else {
            (sense, rhs, 1.0)
        };

        for &(coeff, var) in &expr.terms {
            *self.vars[var.0].column.entry(row).or_insert(0.0) += coeff * sign;
        }

        let basis_var = match sense {
            Sense::Le => {
                let idx = self.push_aux_var(VarRole::Slack, row, 1.0, format!("s{}", self.n_slack));
                self.vars[idx].in_basis = true;
                self.n_slack += 1;
                idx
            }
            Sense::Ge => {
                self.push_aux_var(VarRole::Surplus, row, -1.0, format!("e{}", self.n_surplus));
                self.n_surplus += 1;
                let artificial_idx =
                    self.push_aux_var(VarRole::Artificial, row, 1.0, format!("a{}", self.n_artificial));
                self.vars[artificial_idx].in_basis = true;
                self.n_artificial += 1;
                artificial_idx
            }
            Sense::Eq => {
                let idx =
                    self.push_aux_var(VarRole::Artificial, row, 1.0, format!("a{}", self.n_artificial));
                self.vars[idx].in_basis = true;
                self.n_artificial += 1;
                idx
            }
        };

        self.consts.push(Constraint { row, sense, rhs, basis_var });
        self.n_rows += 1;
        ConstHandle(self.consts.len() - 1)
    }

    /// Convenience for a single-variable constraint, e.g. a capacity bound.
    pub fn add_const_var(&mut self, var: VarHandle, sense: Sense, rhs: E) -> ConstHandle {
        let mut expr = Expression::new();
        expr.add_term(1.0, var);
        self.add_const(&expr, sense, rhs)
    }

    /// Sets (or replaces) the objective row.
    pub fn set_objective(&mut self, expr: &Expression, direction: Direction) {
        for &(coeff, var) in &expr.terms {
            self.vars[var.0].coeff_c = match direction {
                Direction::Min => coeff,
                Direction::Max => -coeff,
            };
        }
        self.obj = Some(Objective { direction, value: 0.0 });
    }

    /// Reads back the solved value of a variable.
    ///
    /// Fails with [`ModelError::UnknownVariable`] if `handle` indexes outside
    /// this model's variable list.
    pub fn get_value(&self, handle: VarHandle) -> Result<E, Problem> {
        self.vars
            .get(handle.0)
            .map(|v| v.value)
            .ok_or_else(|| ModelError::UnknownVariable.to_string().gloss())
    }

    /// Standardizes, solves (simplex for an LP, branch-and-bound for a MIP),
    /// and returns the structured result. Uses a silent callback and a
    /// time-limit-only termination policy; use [`Model::solve_with_hooks`] to
    /// supply a custom [`crate::SolverHooks`] (e.g. to chain in an
    /// `InterruptTerminator`).
    pub fn solve(&mut self) -> Result<SolverResult, Problem> {
        let mut terminators: Vec<Box<dyn crate::terminators::Terminator>> = Vec::new();
        if self.params.time_limit.is_finite() {
            terminators.push(Box::new(crate::terminators::TimeOutTerminator::new(
                self.params.time_limit as u64,
            )));
        }
        let hooks = crate::SolverHooks::new(
            Box::new(crate::callback::NoOpCallback),
            Box::new(crate::terminators::MultipleTerminators::new(terminators)),
        );
        self.solve_with_hooks(hooks)
    }

    /// Same as [`Model::solve`], but lets the caller own the [`crate::SolverHooks`]
    /// driving the solve — a custom [`crate::callback::Callback`], a different
    /// termination policy, or both.
    pub fn solve_with_hooks(&mut self, mut hooks: crate::SolverHooks) -> Result<SolverResult, Problem> {
        crate::standardize::materialize(self)?;
        hooks.terminator.initialize();

        let status = if self.is_mip {
            crate::mip::solve(self, &mut hooks)?
        } else {
            use crate::Solver;
            let mut solver = crate::simplex::SimplexSolver::<crate::simplex::basis::EtaUpdate>::new();
            solver.solve(self, &mut hooks)?
        };
        self.status = status;

        let result = self.report();
        crate::callback::report_result(&result);
        Ok(result)
    }

    pub(crate) fn report(&self) -> SolverResult {
        let has_feasible = self
            .vars
            .iter()
            .filter(|v| v.role == VarRole::Artificial)
            .all(|v| v.value.abs() < 1e-6);

        let reported = match self.status {
            Status::Optimal if has_feasible => ReportedStatus::Optimal,
            Status::Optimal => ReportedStatus::Infeasible,
            Status::Infeasible => ReportedStatus::Infeasible,
            Status::Unbounded => ReportedStatus::Unbounded,
            Status::Feasible | Status::TimeLimit | Status::IterationLimit | Status::Interrupted => {
                if has_feasible {
                    ReportedStatus::Feasible
                } else {
                    ReportedStatus::Infeasible
                }
            }
            Status::InProgress => ReportedStatus::None,
        };

        let obj_val = self.obj.as_ref().map(|o| o.value).unwrap_or(0.0);
        let solution = self
            .vars
            .iter()
            .filter(|v| v.role == VarRole::Primal)
            .map(|v| (v.name.clone(), v.value))
            .collect();

        SolverResult { status: reported, obj_val, solution }
    }
}

fn flip_sense(sense: Sense) -> Sense {
    match sense {
        Sense::Le => Sense::Ge,
        Sense::Ge => Sense::Le,
        Sense::Eq => Sense::Eq,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_var_marks_the_model_as_mip() {
        let mut model = Model::new("t");
        assert!(!model.is_mip());
        model.add_var(0.0, E::INFINITY, VarKind::Integer, "x");
        assert!(model.is_mip());
    }

    #[test]
    fn negative_rhs_flips_sense_and_sign() {
        let mut model = Model::new("t");
        let x = model.add_var(0.0, E::INFINITY, VarKind::Continuous, "x");
        let mut expr = Expression::new();
        expr.add_term(-1.0, x);
        model.add_const(&expr, Sense::Le, -4.0);
        let c = &model.consts()[0];
        assert_eq!(c.sense, Sense::Ge);
        assert_eq!(c.rhs, 4.0);
        assert_eq!(model.vars()[x.0].column[&0], 1.0);
    }

    #[test]
    fn get_value_rejects_an_out_of_range_handle() {
        let model = Model::new("t");
        let bogus = VarHandle(7);
        assert!(model.get_value(bogus).is_err());
    }

    #[test]
    fn le_constraint_adds_a_basic_slack() {
        let mut model = Model::new("t");
        let x = model.add_var(0.0, E::INFINITY, VarKind::Continuous, "x");
        let mut expr = Expression::new();
        expr.add_term(1.0, x);
        model.add_const(&expr, Sense::Le, 10.0);
        assert_eq!(model.n_cols(), 2);
        assert_eq!(model.vars()[1].role, VarRole::Slack);
        assert!(model.vars()[1].in_basis);
    }

    #[test]
    fn ge_constraint_adds_surplus_and_artificial() {
        let mut model = Model::new("t");
        let x = model.add_var(0.0, E::INFINITY, VarKind::Continuous, "x");
        let mut expr = Expression::new();
        expr.add_term(1.0, x);
        model.add_const(&expr, Sense::Ge, 2.0);
        assert_eq!(model.n_cols(), 3);
        assert_eq!(model.vars()[1].role, VarRole::Surplus);
        assert_eq!(model.vars()[2].role, VarRole::Artificial);
        assert_eq!(model.vars()[2].coeff_c, model.big_m());
    }

    #[test]
    fn binary_bounds_are_clamped_to_zero_one_but_narrower_bounds_are_honored() {
        let mut model = Model::new("t");
        let wide = model.add_var(-5.0, 5.0, VarKind::Binary, "wide");
        let narrow = model.add_var(0.0, 0.0, VarKind::Binary, "narrow");
        assert_eq!((model.vars()[wide.0].lb, model.vars()[wide.0].ub), (0.0, 1.0));
        assert_eq!((model.vars()[narrow.0].lb, model.vars()[narrow.0].ub), (0.0, 0.0));
    }

    /// A terminator that fires on its first poll, standing in for
    /// `InterruptTerminator` without touching its process-global Ctrl-C
    /// handler (which only one instance per process may install).
    struct AlwaysInterrupt;

    impl crate::terminators::Terminator for AlwaysInterrupt {
        fn terminate(&mut self) -> Option<Status> {
            Some(Status::Interrupted)
        }
    }

    #[test]
    fn solve_with_hooks_routes_a_caller_supplied_terminator() {
        use crate::callback::NoOpCallback;

        let mut model = Model::new("t");
        let x = model.add_var(0.0, E::INFINITY, VarKind::Continuous, "x");
        model.add_const_var(x, Sense::Le, 10.0);
        let mut obj = Expression::new();
        obj.add_term(1.0, x);
        model.set_objective(&obj, Direction::Max);

        let hooks = crate::SolverHooks::new(Box::new(NoOpCallback), Box::new(AlwaysInterrupt));

        model.solve_with_hooks(hooks).unwrap();
        assert_eq!(model.status(), Status::Interrupted);
    }
}
