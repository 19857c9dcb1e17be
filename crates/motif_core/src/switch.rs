use crate::error::MotifError;

/// Goldbeter–Koshland function: steady-state active fraction of a zero-order
/// ultrasensitive covalent-modification cycle.
///
/// `u1` and `u2` are the opposing modification/demodification rates, `j1` and
/// `j2` the corresponding Michaelis-like saturation constants (scaled by total
/// enzyme). The result is the smaller root of the quadratic obtained from the
/// cycle's steady-state balance,
///
/// ```text
/// B = u2 - u1 + j1*u2 + j2*u1
/// G = 2*u1*j2 / (B + sqrt(B^2 - 4*(u2 - u1)*u1*j2))
/// ```
///
/// and lies in `[0, 1]` for physically valid inputs. A negative discriminant
/// signals an invalid parameter combination and is reported as a domain
/// error, never clamped.
pub fn goldbeter_koshland(u1: f64, u2: f64, j1: f64, j2: f64) -> Result<f64, MotifError> {
    for (name, value) in [("u1", u1), ("u2", u2), ("j1", j1), ("j2", j2)] {
        if !value.is_finite() || value < 0.0 {
            return Err(MotifError::Domain(format!(
                "goldbeter_koshland: {name} = {value} must be finite and non-negative"
            )));
        }
    }
    if j1 == 0.0 || j2 == 0.0 {
        return Err(MotifError::Domain(format!(
            "goldbeter_koshland: saturation constants must be strictly positive (j1 = {j1}, j2 = {j2})"
        )));
    }
    if u1 == 0.0 && u2 == 0.0 {
        return Err(MotifError::Domain(
            "goldbeter_koshland: u1 = u2 = 0 leaves the modification cycle undetermined".into(),
        ));
    }
    if u1 == 0.0 {
        return Ok(0.0);
    }

    let b = u2 - u1 + j1 * u2 + j2 * u1;
    let discriminant = b * b - 4.0 * (u2 - u1) * u1 * j2;
    if discriminant < 0.0 {
        return Err(MotifError::Domain(format!(
            "goldbeter_koshland: negative discriminant {discriminant} \
             (u1 = {u1}, u2 = {u2}, j1 = {j1}, j2 = {j2})"
        )));
    }

    let value = (2.0 * u1 * j2) / (b + discriminant.sqrt());
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MotifError::Domain(format!(
            "goldbeter_koshland: non-finite result for u1 = {u1}, u2 = {u2}, j1 = {j1}, j2 = {j2}"
        )))
    }
}

/// Unchecked evaluation used inside derivative functions, where the result
/// feeds straight into the integrator. Out-of-domain inputs propagate as NaN
/// and surface through the integrator's finiteness check rather than being
/// clamped here.
#[inline]
pub(crate) fn gk_unchecked(u1: f64, u2: f64, j1: f64, j2: f64) -> f64 {
    let b = u2 - u1 + j1 * u2 + j2 * u1;
    (2.0 * u1 * j2) / (b + (b * b - 4.0 * (u2 - u1) * u1 * j2).sqrt())
}

#[cfg(test)]
mod tests {
    use super::{gk_unchecked, goldbeter_koshland};
    use crate::error::MotifError;

    #[test]
    fn zero_u1_gives_exact_zero() {
        let value = goldbeter_koshland(0.0, 1.0, 0.5, 0.5).expect("valid inputs");
        assert_eq!(value, 0.0);
    }

    #[test]
    fn balanced_rates_with_equal_saturation_give_one_half() {
        // u1 = u2 with j1 = j2 puts the cycle exactly at its midpoint.
        let value = goldbeter_koshland(1.0, 1.0, 0.5, 0.5).expect("valid inputs");
        assert!((value - 0.5).abs() < 1e-12, "expected 0.5, got {value}");
    }

    #[test]
    fn bounded_and_monotone_in_u1() {
        let (u2, j1, j2) = (1.0, 0.1, 0.1);
        let mut previous = -1.0;
        for i in 0..=40 {
            let u1 = u2 * f64::from(i) / 40.0;
            let value = goldbeter_koshland(u1, u2, j1, j2).expect("valid inputs");
            assert!(
                (0.0..=1.0).contains(&value),
                "G({u1}) = {value} escapes [0, 1]"
            );
            assert!(
                value >= previous,
                "G({u1}) = {value} decreased below {previous}"
            );
            previous = value;
        }
    }

    #[test]
    fn saturates_toward_one_for_dominant_u1() {
        let value = goldbeter_koshland(100.0, 1.0, 0.3, 0.3).expect("valid inputs");
        assert!(value > 0.95 && value <= 1.0, "got {value}");
    }

    #[test]
    fn degenerate_and_invalid_inputs_are_rejected() {
        assert!(matches!(
            goldbeter_koshland(0.0, 0.0, 0.5, 0.5),
            Err(MotifError::Domain(_))
        ));
        assert!(matches!(
            goldbeter_koshland(-0.1, 1.0, 0.5, 0.5),
            Err(MotifError::Domain(_))
        ));
        assert!(matches!(
            goldbeter_koshland(0.2, 1.0, 0.0, 0.5),
            Err(MotifError::Domain(_))
        ));
        assert!(matches!(
            goldbeter_koshland(f64::NAN, 1.0, 0.5, 0.5),
            Err(MotifError::Domain(_))
        ));
    }

    #[test]
    fn unchecked_form_matches_checked_form_on_valid_inputs() {
        for &u1 in &[0.0, 0.05, 0.2, 0.4, 0.8, 2.0] {
            let checked = goldbeter_koshland(u1, 0.4, 0.5, 0.5).expect("valid inputs");
            let raw = gk_unchecked(u1, 0.4, 0.5, 0.5);
            assert!((checked - raw).abs() < 1e-15);
        }
    }
}
