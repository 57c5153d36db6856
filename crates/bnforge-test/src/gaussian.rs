//! Seeded Gaussian data with known dependencies.

use bnforge_core::DataFrame;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Column names produced by [`generate_normal_data`].
pub const NORMAL_DATA_COLUMNS: [&str; 4] = ["a", "b", "c", "d"];

struct Normal {
    rng: ChaCha8Rng,
}

impl Normal {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Box-Muller draw from `N(mean, sd^2)`.
    fn sample(&mut self, mean: f64, sd: f64) -> f64 {
        let u1: f64 = 1.0 - self.rng.random::<f64>();
        let u2: f64 = self.rng.random::<f64>();
        mean + sd * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

/// Four linearly dependent columns:
///
/// - `a ~ N(3, 0.5^2)`
/// - `b = 2.5 + 1.65 a + N(0, 2^2)`
/// - `c = -4.2 - 1.2 a + 3.2 b + N(0, 0.75^2)`
/// - `d = 1.5 - 0.9 a + 5.6 b + 0.3 c + N(0, 0.5^2)`
pub fn generate_normal_data(rows: usize, seed: u64) -> DataFrame {
    let mut normal = Normal::new(seed);
    let mut a = Vec::with_capacity(rows);
    let mut b = Vec::with_capacity(rows);
    let mut c = Vec::with_capacity(rows);
    let mut d = Vec::with_capacity(rows);
    for _ in 0..rows {
        let va = normal.sample(3.0, 0.5);
        let vb = 2.5 + 1.65 * va + normal.sample(0.0, 2.0);
        let vc = -4.2 - 1.2 * va + 3.2 * vb + normal.sample(0.0, 0.75);
        let vd = 1.5 - 0.9 * va + 5.6 * vb + 0.3 * vc + normal.sample(0.0, 0.5);
        a.push(va);
        b.push(vb);
        c.push(vc);
        d.push(vd);
    }
    frame(vec![("a", a), ("b", b), ("c", c), ("d", d)])
}

/// `columns` mutually independent standard normal columns named `x0, x1, ...`.
pub fn generate_independent_data(rows: usize, columns: usize, seed: u64) -> DataFrame {
    let mut normal = Normal::new(seed);
    let data = (0..columns)
        .map(|i| {
            let values = (0..rows).map(|_| normal.sample(0.0, 1.0)).collect();
            (format!("x{i}"), values)
        })
        .collect();
    frame(data)
}

/// `x ~ N(0, 1)` and `y = 2x + 1` exactly, so the residual variance of `y`
/// given `x` is zero.
pub fn generate_deterministic_data(rows: usize, seed: u64) -> DataFrame {
    let mut normal = Normal::new(seed);
    let x: Vec<f64> = (0..rows).map(|_| normal.sample(0.0, 1.0)).collect();
    let y = x.iter().map(|v| 2.0 * v + 1.0).collect();
    frame(vec![("x", x), ("y", y)])
}

/// A chain `x -> y -> z` with strong linear links.
pub fn generate_chain_data(rows: usize, seed: u64) -> DataFrame {
    let mut normal = Normal::new(seed);
    let mut x = Vec::with_capacity(rows);
    let mut y = Vec::with_capacity(rows);
    let mut z = Vec::with_capacity(rows);
    for _ in 0..rows {
        let vx = normal.sample(0.0, 1.0);
        let vy = 1.5 * vx + normal.sample(0.0, 0.5);
        let vz = -2.0 * vy + normal.sample(0.0, 0.5);
        x.push(vx);
        y.push(vy);
        z.push(vz);
    }
    frame(vec![("x", x), ("y", y), ("z", z)])
}

fn frame<N: Into<String>>(columns: Vec<(N, Vec<f64>)>) -> DataFrame {
    match DataFrame::new(columns) {
        Ok(df) => df,
        Err(e) => panic!("fixture produced invalid data: {e}"),
    }
}
