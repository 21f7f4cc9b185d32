//! Benchmarks one full solve of a modestly sized dense LP, exercising the
//! revised simplex method's pivot loop end to end.

use pivot::model::{Direction, Expression, Model, Sense, VarKind};

fn main() {
    divan::main();
}

/// A diet-style LP: `n` nutrients, `2n` foods, each food supplying a
/// diagonal-dominant amount of its own nutrient plus a little of its
/// neighbors, forcing several pivots before the simplex converges.
fn build_model(n: usize) -> Model {
    let mut model = Model::new("bench");
    let foods: Vec<_> = (0..2 * n)
        .map(|i| model.add_var(0.0, f64::INFINITY, VarKind::Continuous, format!("f{i}")))
        .collect();

    for row in 0..n {
        let mut expr = Expression::new();
        for (col, &food) in foods.iter().enumerate() {
            let coeff = if col % n == row { 3.0 } else { 1.0 };
            expr.add_term(coeff, food);
        }
        model.add_const(&expr, Sense::Ge, 10.0);
    }

    let mut obj = Expression::new();
    for (i, &food) in foods.iter().enumerate() {
        obj.add_term(1.0 + (i % 5) as f64, food);
    }
    model.set_objective(&obj, Direction::Min);

    model
}

#[divan::bench(args = [4, 8, 16])]
fn solve_dense_lp(n: usize) {
    let mut model = build_model(n);
    model.solve().unwrap();
}
