/*!
 * Rate transform planning.
 *
 * A single atempo step only supports magnitudes within a fixed range, so a
 * requested speed factor outside it is decomposed into a chain of
 * boundary-magnitude steps plus one residual step. Composing the emitted
 * steps in order reproduces the requested ratio.
 */

/// Tolerance under which a residual factor counts as "no change"
const UNITY_TOLERANCE: f64 = 1e-9;

/// Decompose a speed factor into elementary tempo steps, each within
/// `[low, high]`.
///
/// A factor of exactly 1.0 yields an empty plan, as does any factor that
/// is not a finite positive number. The product of the returned steps
/// equals `speed_factor` within floating-point tolerance.
pub fn plan_tempo_steps(speed_factor: f64, low: f64, high: f64) -> Vec<f64> {
    // No chain of positive steps composes to a degenerate ratio
    if !(speed_factor > 0.0 && speed_factor.is_finite()) {
        return Vec::new();
    }

    let mut steps = Vec::new();
    let mut remaining = speed_factor;

    while remaining < low {
        steps.push(low);
        remaining /= low;
    }

    while remaining > high {
        steps.push(high);
        remaining /= high;
    }

    if (remaining - 1.0).abs() > UNITY_TOLERANCE {
        steps.push(remaining);
    }

    steps
}
