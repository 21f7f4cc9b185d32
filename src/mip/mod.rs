//! Branch-and-bound controller for mixed-integer programs.
//!
//! Grounded in the reference's `lp/algo.py` `Algorithm` class: a tree of
//! `Model` snapshots, explored depth-first or breadth-first, branching on a
//! fractional integer variable by adding a tightened bound constraint to each
//! child. Two deliberate departures from the reference (recorded as Open
//! Question decisions in `DESIGN.md`):
//!
//! - Branching picks the *most fractional* variable deterministically, not a
//!   random one (the reference's `do_branching` calls `random.choice`).
//! - Each child re-solves its relaxation from scratch rather than attempting
//!   to reuse the parent's basis; Non-goals explicitly rule out warm-starting.

use std::collections::VecDeque;

use problemo::Problem;

use crate::Status;
use crate::SolverHooks;
use crate::Solver;
use crate::model::{Branching, Model, Sense, VarHandle, VarKind, VarRole};
use crate::simplex::SimplexSolver;
use crate::simplex::basis::EtaUpdate;

struct Node {
    model: Model,
    /// A valid lower bound (minimization sense) for every solution in this
    /// node's subtree: the LP relaxation value of the ancestor that spawned
    /// it, tightened to this node's own relaxation value once it is solved.
    bound: f64,
}

/// Runs branch-and-bound on `model`, which must already be materialized.
/// Returns the status of the best incumbent found (or of the root relaxation,
/// if it was itself infeasible or unbounded), and leaves `model`'s variables
/// set to that incumbent's values.
pub fn solve(model: &mut Model, hooks: &mut SolverHooks) -> Result<Status, Problem> {
    let int_vars: Vec<usize> = model
        .vars()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.role == VarRole::Primal && matches!(v.kind, VarKind::Integer | VarKind::Binary))
        .map(|(i, _)| i)
        .collect();

    let params = *model.params();
    let mut open: VecDeque<Node> = VecDeque::new();
    open.push_back(Node { model: model.clone(), bound: f64::NEG_INFINITY });

    let mut best: Option<(f64, Model)> = None;
    let mut root_status: Option<Status> = None;
    let mut exhausted = true;
    let mut node_index = 0usize;

    while let Some(node) = pop_node(&mut open, params.branching) {
        if let Some(status) = hooks.terminator.terminate() {
            if root_status.is_none() {
                root_status = Some(status);
            }
            exhausted = false;
            break;
        }

        let mut node_model = node.model;
        crate::standardize::materialize(&mut node_model)?;
        let mut solver = SimplexSolver::<EtaUpdate>::new();
        let status = solver.solve(&mut node_model, hooks)?;
        if root_status.is_none() {
            root_status = Some(status);
        }

        hooks.callback.call(&node_model, node_index);
        node_index += 1;

        match status {
            Status::Infeasible | Status::Unbounded => continue,
            Status::TimeLimit | Status::Interrupted | Status::IterationLimit => {
                exhausted = false;
                continue;
            }
            Status::Optimal => {}
            Status::InProgress | Status::Feasible => unreachable!("simplex never reports this"),
        }

        let relaxed_obj = node_model.objective().map(|o| o.value).unwrap_or(0.0);
        // Compare in minimization sense regardless of the user's direction.
        let relaxed_bound = match node_model.objective().map(|o| o.direction) {
            Some(crate::model::Direction::Max) => -relaxed_obj,
            _ => relaxed_obj,
        };

        if let Some((best_obj, _)) = &best {
            if relaxed_bound >= *best_obj - 1e-9 {
                continue; // bound pruning: this subtree cannot beat the incumbent
            }
        }

        match most_fractional(&node_model, &int_vars) {
            Some((var_idx, value)) => {
                let handle = VarHandle(var_idx);
                let mut down = node_model.clone();
                down.add_const_var(handle, Sense::Le, value.floor());
                let mut up = node_model.clone();
                up.add_const_var(handle, Sense::Ge, value.ceil());
                open.push_back(Node { model: down, bound: relaxed_bound });
                open.push_back(Node { model: up, bound: relaxed_bound });
            }
            None => {
                let improving = best.as_ref().map_or(true, |(b, _)| relaxed_bound < *b - 1e-9);
                if improving {
                    best = Some((relaxed_bound, node_model));
                }
            }
        }

        if let Some((best_obj, _)) = &best {
            let open_bound = open.iter().map(|n| n.bound).fold(f64::INFINITY, f64::min);
            if open_bound.is_finite() {
                let gap = (best_obj - open_bound).abs() / best_obj.abs().max(1e-10);
                if gap <= params.mip_gap {
                    exhausted = open.is_empty();
                    break;
                }
            }
        }
    }

    exhausted &= open.is_empty();

    match best {
        Some((_, incumbent)) => {
            for (dst, src) in model.vars_mut().iter_mut().zip(incumbent.vars().iter()) {
                dst.value = src.value;
            }
            if let (Some(dst), Some(src)) = (model.objective_mut(), incumbent.objective()) {
                dst.value = src.value;
            }
            Ok(if exhausted { Status::Optimal } else { Status::Feasible })
        }
        None => Ok(root_status.unwrap_or(Status::Infeasible)),
    }
}

fn pop_node(open: &mut VecDeque<Node>, branching: Branching) -> Option<Node> {
    match branching {
        Branching::Dfs => open.pop_back(),
        Branching::Bfs => open.pop_front(),
    }
}

/// Picks the integer variable whose fractional part is closest to one half,
/// skipping variables already integral within tolerance. Ties go to the
/// lowest-index variable encountered first.
fn most_fractional(model: &Model, int_vars: &[usize]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64, f64)> = None; // (index, value, distance-to-half)
    for &idx in int_vars {
        let value = model.vars()[idx].value;
        let frac = value - value.floor();
        if frac < 1e-6 || frac > 1.0 - 1e-6 {
            continue;
        }
        let distance = (0.5 - frac).abs();
        let better = match &best {
            None => true,
            Some((_, _, best_distance)) => distance < *best_distance - 1e-12,
        };
        if better {
            best = Some((idx, value, distance));
        }
    }
    best.map(|(idx, value, _)| (idx, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, Expression};

    fn run(model: &mut Model) -> Status {
        crate::standardize::materialize(model).unwrap();
        let mut hooks = SolverHooks::default();
        solve(model, &mut hooks).unwrap()
    }

    #[test]
    fn solves_a_small_knapsack_style_mip() {
        // max 5x + 4y s.t. 6x + 4y <= 24, x + 2y <= 6, x,y integer
        let mut model = Model::new("t");
        let x = model.add_var(0.0, f64::INFINITY, VarKind::Integer, "x");
        let y = model.add_var(0.0, f64::INFINITY, VarKind::Integer, "y");

        let mut e1 = Expression::new();
        e1.add_term(6.0, x).add_term(4.0, y);
        model.add_const(&e1, Sense::Le, 24.0);

        let mut e2 = Expression::new();
        e2.add_term(1.0, x).add_term(2.0, y);
        model.add_const(&e2, Sense::Le, 6.0);

        let mut obj = Expression::new();
        obj.add_term(5.0, x).add_term(4.0, y);
        model.set_objective(&obj, Direction::Max);

        let status = run(&mut model);
        assert_eq!(status, Status::Optimal);
        let xv = model.get_value(x).unwrap().round();
        let yv = model.get_value(y).unwrap().round();
        assert!((5.0 * xv + 4.0 * yv - 21.0).abs() < 1e-6);
    }

    #[test]
    fn reports_infeasible_when_no_relaxation_is_feasible() {
        let mut model = Model::new("t");
        let x = model.add_var(0.0, f64::INFINITY, VarKind::Integer, "x");
        model.add_const_var(x, Sense::Le, 1.0);
        model.add_const_var(x, Sense::Ge, 3.0);
        let mut obj = Expression::new();
        obj.add_term(1.0, x);
        model.set_objective(&obj, Direction::Min);

        assert_eq!(run(&mut model), Status::Infeasible);
    }
}
