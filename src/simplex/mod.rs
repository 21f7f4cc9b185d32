//! The revised simplex method, Big-M variant.
//!
//! Grounded in the reference's `lp/simplex.py` `SimplexSolver.iterate`: Dantzig
//! entering-variable rule (most positive reduced cost), ratio-test leaving
//! rule with ties broken by the lowest basis-position index, and the basis
//! inverse maintained explicitly rather than recomputed from a fresh tableau
//! each iteration.

pub mod basis;

use std::marker::PhantomData;

use faer::Col;
use problemo::Problem;
use problemo::common::IntoCommonProblem;

use crate::E;
use crate::Status;
use crate::error::ModelError;
use crate::linalg::vector_ops::{column, dot, is_col_nonpositive, left_mul};
use crate::model::{Model, VarRole};
use crate::{Solver, SolverHooks};

use basis::BasisInverse;

const TOL: E = 1e-9;

/// Revised simplex solver, generic over its basis-inverse maintenance
/// strategy (see [`basis::BasisInverse`]).
pub struct SimplexSolver<B: BasisInverse> {
    _strategy: PhantomData<B>,
}

impl<B: BasisInverse> SimplexSolver<B> {
    pub fn new() -> Self {
        Self { _strategy: PhantomData }
    }

    fn compute_basic_values(model: &Model) -> Col<E> {
        let b_inv = model.b_inv.as_ref().expect("model must be materialized");
        let b = model.b.as_ref().expect("model must be materialized");
        b_inv * b
    }

    fn assign_basic_values(model: &mut Model, x_b: &Col<E>) {
        let basis = model.basis.clone();
        for (row, &var_idx) in basis.iter().enumerate() {
            model.vars_mut()[var_idx].value = x_b[row];
        }
    }

    fn recompute_objective(model: &mut Model) {
        let value: E = model.vars().iter().map(|v| v.coeff_c * v.value).sum();
        if let Some(obj) = model.objective_mut() {
            obj.value = match obj.direction {
                crate::model::Direction::Min => value,
                crate::model::Direction::Max => -value,
            };
        }
    }
}

impl<B: BasisInverse> Default for SimplexSolver<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BasisInverse> Solver for SimplexSolver<B> {
    fn solve(&mut self, model: &mut Model, hooks: &mut SolverHooks) -> Result<Status, Problem> {
        let m = model.basis.len();
        let n = model.n_cols();
        let max_iter = 50 * (m + n);

        let x0 = Self::compute_basic_values(model);
        if (0..m).any(|i| x0[i] < -TOL) {
            return Err(ModelError::UnknownModel.to_string().gloss());
        }
        Self::assign_basic_values(model, &x0);
        Self::recompute_objective(model);

        let mut converged = false;
        let a = model.a.clone().expect("model must be materialized");

        for iter in 0..max_iter {
            let b_inv = model.b_inv.clone().expect("model must be materialized");

            let c_b: Col<E> = Col::from_fn(m, |i| model.vars()[model.basis[i]].coeff_c);
            let w = left_mul(&c_b, &b_inv);

            let mut entering = None;
            let mut best = TOL;
            for j in 0..n {
                if model.vars()[j].in_basis {
                    continue;
                }
                let a_j = column(&a, j);
                let zc = dot(w.as_ref(), a_j.as_ref()) - model.vars()[j].coeff_c;
                if zc > best {
                    best = zc;
                    entering = Some(j);
                }
            }

            let Some(j_enter) = entering else {
                converged = true;
                break;
            };

            let a_col = column(&a, j_enter);
            let y = &b_inv * &a_col;

            if is_col_nonpositive(y.as_ref(), TOL) {
                model.set_status(Status::Unbounded);
                return Ok(Status::Unbounded);
            }

            let mut leaving_row = None;
            let mut best_ratio = E::INFINITY;
            for i in 0..m {
                if y[i] > TOL {
                    let ratio = model.vars()[model.basis[i]].value / y[i];
                    if ratio < best_ratio - TOL {
                        best_ratio = ratio;
                        leaving_row = Some(i);
                    }
                }
            }
            let i_leave = leaving_row.expect("unboundedness checked above");

            let leaving_var = model.basis[i_leave];
            model.vars_mut()[leaving_var].in_basis = false;
            model.vars_mut()[leaving_var].value = 0.0;
            model.vars_mut()[j_enter].in_basis = true;
            model.basis[i_leave] = j_enter;

            let mut new_binv = b_inv;
            B::update(&mut new_binv, &a, &model.basis, &y, i_leave)?;
            model.b_inv = Some(new_binv);

            let x_b = Self::compute_basic_values(model);
            Self::assign_basic_values(model, &x_b);
            Self::recompute_objective(model);

            hooks.callback.call(model, iter);
            if let Some(status) = hooks.terminator.terminate() {
                model.set_status(status);
                return Ok(status);
            }
        }

        let status = if converged {
            let infeasible = model
                .vars()
                .iter()
                .any(|v| v.role == VarRole::Artificial && v.value > 1e-6);
            if infeasible { Status::Infeasible } else { Status::Optimal }
        } else {
            Status::IterationLimit
        };
        model.set_status(status);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, Expression, Model, Sense, VarKind};
    use basis::EtaUpdate;

    fn solve_lp(model: &mut Model) -> Status {
        crate::standardize::materialize(model).unwrap();
        let mut hooks = SolverHooks::default();
        let mut solver = SimplexSolver::<EtaUpdate>::new();
        solver.solve(model, &mut hooks).unwrap()
    }

    #[test]
    fn solves_a_textbook_maximization() {
        // max 3x + 2y  s.t.  x + y <= 4, x + 3y <= 6, x,y >= 0
        let mut model = Model::new("t");
        let x = model.add_var(0.0, E::INFINITY, VarKind::Continuous, "x");
        let y = model.add_var(0.0, E::INFINITY, VarKind::Continuous, "y");

        let mut e1 = Expression::new();
        e1.add_term(1.0, x).add_term(1.0, y);
        model.add_const(&e1, Sense::Le, 4.0);

        let mut e2 = Expression::new();
        e2.add_term(1.0, x).add_term(3.0, y);
        model.add_const(&e2, Sense::Le, 6.0);

        let mut obj = Expression::new();
        obj.add_term(3.0, x).add_term(2.0, y);
        model.set_objective(&obj, Direction::Max);

        let status = solve_lp(&mut model);
        assert_eq!(status, Status::Optimal);
        assert!((model.get_value(x).unwrap() - 4.0).abs() < 1e-6);
        assert!((model.get_value(y).unwrap() - 0.0).abs() < 1e-6);
        assert!((model.objective().unwrap().value - 12.0).abs() < 1e-6);
    }

    #[test]
    fn detects_infeasibility() {
        // x <= 1, x >= 3 is infeasible.
        let mut model = Model::new("t");
        let x = model.add_var(0.0, E::INFINITY, VarKind::Continuous, "x");
        model.add_const_var(x, Sense::Le, 1.0);
        model.add_const_var(x, Sense::Ge, 3.0);
        let mut obj = Expression::new();
        obj.add_term(1.0, x);
        model.set_objective(&obj, Direction::Min);

        assert_eq!(solve_lp(&mut model), Status::Infeasible);
    }

    #[test]
    fn detects_unboundedness() {
        // max x s.t. x >= 0, no upper bound.
        let mut model = Model::new("t");
        let x = model.add_var(0.0, E::INFINITY, VarKind::Continuous, "x");
        model.add_const_var(x, Sense::Ge, 0.0);
        let mut obj = Expression::new();
        obj.add_term(1.0, x);
        model.set_objective(&obj, Direction::Max);

        assert_eq!(solve_lp(&mut model), Status::Unbounded);
    }
}
