//! Per-iteration hooks and the structured result line.

use serde::Serialize;

use crate::model::{Model, SolverParams, SolverResult};

/// Hook invoked once per solver iteration for logging, monitoring, or early stopping.
pub trait Callback {
    /// Called at the end of each iteration with the current model state.
    fn call(&mut self, model: &Model, iteration: usize);
}

/// A callback that does nothing. Use when no per-iteration output is needed.
pub struct NoOpCallback;

impl Callback for NoOpCallback {
    fn call(&mut self, _model: &Model, _iteration: usize) {}
}

/// Prints the current objective value to stdout each iteration.
pub struct ConvergenceOutput;

impl Callback for ConvergenceOutput {
    fn call(&mut self, model: &Model, iteration: usize) {
        let obj = model.objective().map(|o| o.value).unwrap_or(0.0);
        println!("| {:4} | obj = {:<14.6} |", iteration, obj);
    }
}

impl ConvergenceOutput {
    pub fn new(_params: &SolverParams) -> Self {
        Self
    }
}

/// The structured status line emitted at every meaningful state transition:
/// a new MIP incumbent, or the final result of a `solve` call. One line of
/// `serde_json` per transition, per `SPEC_FULL.md` §10.2.
#[derive(Serialize)]
struct ResultLine<'a> {
    status: &'a crate::model::ReportedStatus,
    obj_val: f64,
    solution: &'a std::collections::BTreeMap<String, f64>,
}

pub fn report_result(result: &SolverResult) {
    let line = ResultLine {
        status: &result.status,
        obj_val: result.obj_val,
        solution: &result.solution,
    };
    match serde_json::to_string(&line) {
        Ok(json) => println!("{json}"),
        Err(_) => println!(
            "{{\"status\":\"{:?}\",\"obj_val\":{}}}",
            result.status, result.obj_val
        ),
    }
}
