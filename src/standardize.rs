//! Materializes a [`Model`]'s sparse, per-variable coefficient maps into the
//! dense tableau the simplex solver operates on, and resets every variable to
//! the canonical starting basis.
//!
//! Constraints are already in canonical form by the time they reach this
//! module — [`Model::add_const`] normalizes the RHS sign and injects slack,
//! surplus, and artificial columns eagerly. This step only has to build the
//! dense `A` matrix and `b` vector, and (re)establish the identity basis:
//! every row's designated slack/artificial variable is basic, at a value
//! equal to that row's RHS, independent of whatever basis the model last
//! converged to. Branch-and-bound nodes rely on this to re-solve each
//! relaxation from scratch rather than warm-start (see `SPEC_FULL.md` §9,
//! Non-goals).

use faer::{Col, Mat};
use problemo::Problem;
use problemo::common::IntoCommonProblem;

use crate::E;
use crate::error::ModelError;
use crate::model::Model;

pub fn materialize(model: &mut Model) -> Result<(), Problem> {
    let m = model.n_rows();
    let n = model.n_cols();

    let mut a = Mat::<E>::zeros(m, n);
    for (j, var) in model.vars().iter().enumerate() {
        for (&row, &coeff) in &var.column {
            a[(row, j)] = coeff;
        }
    }

    let mut b = Col::<E>::zeros(m);
    for c in model.consts() {
        b[c.row] = c.rhs;
    }
    if (0..m).any(|i| b[i] < -1e-9) {
        return Err(ModelError::UnknownModel.to_string().gloss());
    }

    for var in model.vars_mut() {
        var.in_basis = false;
        var.value = 0.0;
    }

    let mut basis = vec![0usize; m];
    for c in model.consts() {
        basis[c.row] = c.basis_var;
    }
    for &idx in &basis {
        model.vars_mut()[idx].in_basis = true;
    }
    let basis_values: Vec<(usize, E)> = model.consts().iter().map(|c| (c.basis_var, c.rhs)).collect();
    for (idx, rhs) in basis_values {
        model.vars_mut()[idx].value = rhs;
    }

    let b_inv = Mat::<E>::from_fn(m, m, |i, j| if i == j { 1.0 } else { 0.0 });

    model.a = Some(a);
    model.b = Some(b);
    model.basis = basis;
    model.b_inv = Some(b_inv);

    if let Some(obj) = model.objective_mut() {
        obj.value = 0.0;
    }

    Ok(())
}
