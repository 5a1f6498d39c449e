//! Shared numeric thresholds and small solvers.

/// General-purpose tolerance for near-zero tests (squared norms, pdfs, discriminants).
pub const EPSILON: f64 = 1e-5;

/// Minimum parametric distance accepted as a hit, and the offset used when
/// spawning secondary rays off a surface.
pub const HIT_EPSILON: f64 = 1e-4;

/// Solve `a·t² + b·t + c = 0` for real roots.
///
/// Returns `(t0, t1)` with `t0 <= t1`, or `None` when the discriminant is negative.
/// A discriminant within [`EPSILON`] of zero is treated as a double root.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let (x0, x1) = if discriminant.abs() < EPSILON {
        let root = -0.5 * b / a;
        (root, root)
    } else {
        // Numerically stable form: avoid subtracting nearly equal quantities
        let q = if b > 0.0 {
            -0.5 * (b + discriminant.sqrt())
        } else {
            -0.5 * (b - discriminant.sqrt())
        };
        (q / a, c / q)
    };

    Some(if x0 > x1 { (x1, x0) } else { (x0, x1) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_roots_sorted() {
        // (t - 1)(t - 3) = t² - 4t + 3
        let (t0, t1) = solve_quadratic(1.0, -4.0, 3.0).unwrap();
        assert!((t0 - 1.0).abs() < 1e-12);
        assert!((t1 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_double_root() {
        // (t - 2)² = t² - 4t + 4
        let (t0, t1) = solve_quadratic(1.0, -4.0, 4.0).unwrap();
        assert_eq!(t0, t1);
        assert!((t0 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_none());
    }
}
