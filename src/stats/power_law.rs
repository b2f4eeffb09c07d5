//! Power-law exponent estimation

use crate::error::PowerLawError;

/// Fit the exponent of a discrete power law to the samples `>= xmin`.
///
/// Maximum-likelihood estimate with the usual discrete approximation:
/// `alpha = 1 + n / sum(ln(x / (xmin - 0.5)))`.
pub fn fit_exponent(samples: &[f64], xmin: f64) -> Result<f64, PowerLawError> {
    if !(xmin > 0.5) {
        return Err(PowerLawError::InvalidXmin(xmin));
    }

    let shifted = xmin - 0.5;
    let (count, log_sum) = samples
        .iter()
        .filter(|&&x| x >= xmin)
        .fold((0usize, 0.0f64), |(n, s), &x| (n + 1, s + (x / shifted).ln()));

    if count == 0 {
        return Err(PowerLawError::NoSamples(xmin));
    }
    if !(log_sum > 0.0) || !log_sum.is_finite() {
        return Err(PowerLawError::Degenerate(log_sum));
    }

    Ok(1.0 + count as f64 / log_sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_closed_form() {
        let samples = [1.0, 3.0, 6.0, 12.0, 24.0];
        let expected = 1.0 + 3.0 / ((6.0f64 / 5.5).ln() + (12.0f64 / 5.5).ln() + (24.0f64 / 5.5).ln());
        let alpha = fit_exponent(&samples, 6.0).unwrap();
        assert!((alpha - expected).abs() < 1e-12);
    }

    #[test]
    fn no_samples_above_cutoff() {
        assert_eq!(fit_exponent(&[1.0, 2.0], 6.0), Err(PowerLawError::NoSamples(6.0)));
        assert_eq!(fit_exponent(&[], 6.0), Err(PowerLawError::NoSamples(6.0)));
    }

    #[test]
    fn rejects_small_cutoff() {
        assert_eq!(fit_exponent(&[1.0], 0.5), Err(PowerLawError::InvalidXmin(0.5)));
    }
}
