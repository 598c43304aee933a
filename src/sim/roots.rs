//! Closed-form polynomial root solving
//!
//! Collision times fall out of quadratics (line crossings) and quartics
//! (accelerated endpoint hits). "No hit" is represented as +infinity
//! rather than an error so callers can take plain minimums, and a
//! vanishing leading coefficient degrades to the lower-degree form
//! instead of dividing by a near-zero value.

/// Coefficient magnitude below which a leading term is treated as zero
const DEGENERATE_EPS: f64 = 1e-12;

/// Earliest admissible root of `a·t² + b·t + c = 0`.
///
/// Prefers the smaller root unless only the larger one lies in the
/// future; returns +infinity when no real root exists. Both-negative
/// pairs are returned as-is so callers can filter for strictly-positive
/// times themselves.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> f64 {
    if a.abs() < DEGENERATE_EPS {
        if b.abs() < DEGENERATE_EPS {
            return f64::INFINITY;
        }
        return -c / b;
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return f64::INFINITY;
    }

    let sqrt_disc = disc.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };

    if lo < 0.0 && hi >= 0.0 { hi } else { lo }
}

/// Both real roots of `a·y² + b·y + c = 0`, fewer when degenerate.
fn real_quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < DEGENERATE_EPS {
        if b.abs() < DEGENERATE_EPS {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sqrt_disc = disc.sqrt();
    vec![(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)]
}

/// All real roots of `a·t³ + b·t² + c·t + d = 0`.
///
/// Cardano's formula for the single-root case, the trigonometric form
/// for three real roots. Degrades to the quadratic when `a` vanishes.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    if a.abs() < DEGENERATE_EPS {
        return real_quadratic_roots(b, c, d);
    }

    let p = b / a;
    let q = c / a;
    let r = d / a;

    // Depress: t = y - p/3 turns this into y³ + m·y + n
    let shift = p / 3.0;
    let m = q - p * p / 3.0;
    let n = r - p * q / 3.0 + 2.0 * p * p * p / 27.0;

    if m.abs() < DEGENERATE_EPS && n.abs() < DEGENERATE_EPS {
        return vec![-shift];
    }

    let half_n = n / 2.0;
    let disc = half_n * half_n + (m / 3.0) * (m / 3.0) * (m / 3.0);

    let roots = if disc > 0.0 {
        let sqrt_disc = disc.sqrt();
        let y = (-half_n + sqrt_disc).cbrt() + (-half_n - sqrt_disc).cbrt();
        vec![y - shift]
    } else if m >= 0.0 {
        // disc <= 0 with non-negative m only happens at the triple root
        vec![-shift]
    } else {
        let rho = (-m / 3.0).powi(3).sqrt();
        let phi = (-half_n / rho).clamp(-1.0, 1.0).acos();
        let scale = 2.0 * (-m / 3.0).sqrt();
        (0..3)
            .map(|k| {
                scale * ((phi + 2.0 * std::f64::consts::PI * k as f64) / 3.0).cos() - shift
            })
            .collect()
    };

    let coeffs = [a, b, c, d];
    let mut roots: Vec<f64> = roots.into_iter().map(|t| polish(&coeffs, t)).collect();
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    roots
}

/// All real roots of `c[0]·t⁴ + c[1]·t³ + c[2]·t² + c[3]·t + c[4] = 0`.
///
/// Ferrari's factorization: depress the quartic, split it into two
/// quadratics via a root of the resolvent cubic, then polish each root
/// with a couple of Newton steps against the original polynomial. A
/// vanishing cubic term in the depressed form takes the biquadratic
/// shortcut; a vanishing leading coefficient degrades to the cubic.
pub fn solve_quartic(coeffs: [f64; 5]) -> Vec<f64> {
    let [a, b, c, d, e] = coeffs;
    if a.abs() < DEGENERATE_EPS {
        return solve_cubic(b, c, d, e);
    }

    let p = b / a;
    let q = c / a;
    let r = d / a;
    let s = e / a;

    // Depress: t = y - p/4 turns this into y⁴ + α·y² + β·y + γ
    let shift = p / 4.0;
    let p2 = p * p;
    let alpha = q - 3.0 * p2 / 8.0;
    let beta = r - p * q / 2.0 + p2 * p / 8.0;
    let gamma = s - 3.0 * p2 * p2 / 256.0 + p2 * q / 16.0 - p * r / 4.0;

    let mut roots = Vec::with_capacity(4);

    if beta.abs() < DEGENERATE_EPS {
        // Biquadratic: z² + α·z + γ = 0 with z = y²
        for z in real_quadratic_roots(1.0, alpha, gamma) {
            if z >= 0.0 {
                let y = z.sqrt();
                roots.push(y - shift);
                if y > 0.0 {
                    roots.push(-y - shift);
                }
            }
        }
    } else {
        // The resolvent z³ + 2α·z² + (α² - 4γ)·z - β² = 0 always has a
        // positive real root when β is nonzero; its square root splits
        // the depressed quartic into two quadratic factors.
        let z0 = solve_cubic(1.0, 2.0 * alpha, alpha * alpha - 4.0 * gamma, -beta * beta)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
            .max(0.0);
        let w = z0.sqrt();
        if w < DEGENERATE_EPS {
            return roots;
        }
        let half = (alpha + z0) / 2.0;
        let offset = beta / (2.0 * w);
        for (fb, fc) in [(w, half - offset), (-w, half + offset)] {
            for y in real_quadratic_roots(1.0, fb, fc) {
                roots.push(y - shift);
            }
        }
    }

    let mut roots: Vec<f64> = roots.into_iter().map(|t| polish(&coeffs, t)).collect();
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    roots
}

/// Smallest strictly positive value in `roots`, or +infinity
pub fn earliest_positive(roots: &[f64]) -> f64 {
    roots
        .iter()
        .copied()
        .filter(|t| *t > 0.0)
        .fold(f64::INFINITY, f64::min)
}

/// A couple of Newton steps to tighten a closed-form root
fn polish(coeffs: &[f64], mut t: f64) -> f64 {
    for _ in 0..2 {
        let mut f = 0.0;
        let mut df = 0.0;
        for &c in coeffs {
            df = df * t + f;
            f = f * t + c;
        }
        if df.abs() < DEGENERATE_EPS {
            break;
        }
        t -= f / df;
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Expand (t-r0)(t-r1)(t-r2)(t-r3) into monic coefficients
    fn coeffs_from_roots(r: [f64; 4]) -> [f64; 5] {
        let e1 = r[0] + r[1] + r[2] + r[3];
        let e2 = r[0] * r[1] + r[0] * r[2] + r[0] * r[3] + r[1] * r[2] + r[1] * r[3] + r[2] * r[3];
        let e3 = r[0] * r[1] * r[2] + r[0] * r[1] * r[3] + r[0] * r[2] * r[3] + r[1] * r[2] * r[3];
        let e4 = r[0] * r[1] * r[2] * r[3];
        [1.0, -e1, e2, -e3, e4]
    }

    #[test]
    fn test_quadratic_prefers_earliest_future_root() {
        // Roots -2 and 2: the future one wins
        assert_eq!(solve_quadratic(1.0, 0.0, -4.0), 2.0);
    }

    #[test]
    fn test_quadratic_linear_fallback() {
        assert_eq!(solve_quadratic(0.0, 2.0, -4.0), 2.0);
    }

    #[test]
    fn test_quadratic_no_real_root() {
        assert!(solve_quadratic(1.0, 0.0, 4.0).is_infinite());
    }

    #[test]
    fn test_quadratic_both_past_returns_raw() {
        // Roots -1 and -2: callers filter for strictly-positive times
        assert!((solve_quadratic(1.0, 3.0, 2.0) - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_quadratic_smaller_of_two_future_roots() {
        // (t-1)(t-3): earliest hit is 1
        assert!((solve_quadratic(1.0, -4.0, 3.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cubic_known_roots() {
        // (t-1)(t-2)(t-3) = t³ - 6t² + 11t - 6
        let roots = solve_cubic(1.0, -6.0, 11.0, -6.0);
        assert_eq!(roots.len(), 3);
        for (found, expected) in roots.iter().zip([1.0, 2.0, 3.0]) {
            assert!((found - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cubic_single_real_root() {
        // t³ - 1 has one real root
        let roots = solve_cubic(1.0, 0.0, 0.0, -1.0);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_quartic_recovers_known_roots() {
        let roots = solve_quartic(coeffs_from_roots([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(roots.len(), 4);
        for (found, expected) in roots.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert!(
                (found - expected).abs() < 1e-6,
                "expected {expected}, got {found}"
            );
        }
    }

    #[test]
    fn test_quartic_biquadratic() {
        // t⁴ - 5t² + 4 = (t²-1)(t²-4)
        let roots = solve_quartic([1.0, 0.0, -5.0, 0.0, 4.0]);
        assert_eq!(roots.len(), 4);
        for (found, expected) in roots.iter().zip([-2.0, -1.0, 1.0, 2.0]) {
            assert!((found - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_quartic_no_real_roots() {
        assert!(solve_quartic([1.0, 0.0, 0.0, 0.0, 1.0]).is_empty());
    }

    #[test]
    fn test_quartic_degenerate_leading_degrades_to_cubic() {
        let roots = solve_quartic([0.0, 1.0, -6.0, 11.0, -6.0]);
        assert_eq!(roots.len(), 3);
        assert!((roots[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_earliest_positive_filters() {
        assert_eq!(earliest_positive(&[-3.0, 2.0, 5.0]), 2.0);
        assert!(earliest_positive(&[-3.0, -2.0]).is_infinite());
        assert!(earliest_positive(&[]).is_infinite());
    }

    proptest! {
        #[test]
        fn prop_quartic_round_trip(mut r in prop::array::uniform4(-10.0f64..10.0)) {
            r.sort_by(|x, y| x.partial_cmp(y).unwrap());
            // Well-separated roots keep the polynomial conditioned
            prop_assume!(r.windows(2).all(|w| w[1] - w[0] > 0.1));

            let found = solve_quartic(coeffs_from_roots(r));
            prop_assert_eq!(found.len(), 4);
            for expected in r {
                prop_assert!(
                    found.iter().any(|f| (f - expected).abs() < 1e-6),
                    "missing root {} in {:?}", expected, found
                );
            }
        }
    }
}
