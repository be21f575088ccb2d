//! Descriptive statistics for Monte-Carlo samples.
//!
//! Every estimator here returns `Result<_, StatsError>` so that the
//! degenerate cases (empty input, a single observation, a zero mean,
//! rounding that drives the variance below zero) surface as recoverable
//! domain errors instead of NaN or infinity.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier compensated summation.
//! - **Variance**: the textbook one-pass form `(Σx² − n·x̄²)/(n − 1)`.
//!   This formula is subject to cancellation for samples with a large
//!   offset and tiny spread; a negative result is reported by [`std_dev`]
//!   as [`StatsError::NegativeVariance`].
//! - **Confidence intervals**: two-sided 95% normal approximation with the
//!   fixed quantile [`Z_95`].

use thiserror::Error;

/// Two-sided 95% quantile of the standard normal distribution.
pub const Z_95: f64 = 1.96;

/// Failure of a descriptive statistic on a given sample.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The sample has no observations.
    #[error("sample is empty")]
    Empty,

    /// The estimator needs more observations than were supplied.
    #[error("need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum number of observations.
        required: usize,
        /// Observations supplied.
        actual: usize,
    },

    /// The sample contains NaN or an infinity.
    #[error("sample contains NaN or infinite values")]
    NonFinite,

    /// Floating-point cancellation produced a negative variance.
    #[error("variance evaluated to a negative value ({0})")]
    NegativeVariance(f64),

    /// Relative dispersion is undefined for a zero mean.
    #[error("mean is zero, coefficient of variation is undefined")]
    ZeroMean,

    /// Paired samples have different lengths.
    #[error("paired samples differ in length: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first sample.
        left: usize,
        /// Length of the second sample.
        right: usize,
    },

    /// The denominator of a ratio estimate sums to zero.
    #[error("denominator sample sums to zero")]
    ZeroDenominator,

    /// A probability outside `[0, 1]`.
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}

/// A two-sided confidence interval `[lower, upper]`.
///
/// # Examples
/// ```
/// use cvp_montecarlo::stats::ConfidenceInterval;
/// let ci = ConfidenceInterval::around(10.0, 2.0);
/// assert_eq!((ci.lower, ci.upper), (8.0, 12.0));
/// assert!(ci.contains(10.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Builds the symmetric interval `center ± half_width`.
    pub fn around(center: f64, half_width: f64) -> Self {
        Self {
            lower: center - half_width,
            upper: center + half_width,
        }
    }

    /// Returns true if `x` lies inside the closed interval.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    pub fn half_width(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }

    /// Scales both bounds by `factor`, keeping `lower <= upper`.
    pub fn scaled(&self, factor: f64) -> Self {
        let (a, b) = (self.lower * factor, self.upper * factor);
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }
}

/// Ratio-of-sums estimate `Σy / Σx` with its 95% interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioEstimate {
    pub ratio: f64,
    pub interval: ConfidenceInterval,
}

fn require_finite(data: &[f64]) -> Result<(), StatsError> {
    if data.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(StatsError::NonFinite)
    }
}

/// The common value of a non-empty sample whose elements are all equal.
fn constant_value(data: &[f64]) -> Option<f64> {
    let first = *data.first()?;
    data.iter().all(|&x| x == first).then_some(first)
}

/// Computes the arithmetic mean.
///
/// # Complexity
/// O(n) time, O(1) space.
///
/// # Returns
/// The compensated sum divided by `n`; for a constant sample, the constant.
///
/// # Errors
/// [`StatsError::Empty`] for an empty sample, [`StatsError::NonFinite`]
/// if any element is NaN or infinite.
///
/// # Examples
/// ```
/// use cvp_montecarlo::stats::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Ok(3.0));
/// assert!(mean(&[]).is_err());
/// ```
pub fn mean(data: &[f64]) -> Result<f64, StatsError> {
    if data.is_empty() {
        return Err(StatsError::Empty);
    }
    require_finite(data)?;
    if let Some(c) = constant_value(data) {
        return Ok(c);
    }
    Ok(kahan_sum(data) / data.len() as f64)
}

/// Computes the unbiased sample variance `(Σx² − n·x̄²)/(n − 1)`.
///
/// A constant sample has variance exactly zero.
///
/// # Complexity
/// O(n) time, O(1) space; two passes over the data.
///
/// # Errors
/// [`StatsError::InsufficientData`] when fewer than two observations are
/// given; otherwise the errors of [`mean`].
///
/// # Examples
/// ```
/// use cvp_montecarlo::stats::variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
/// assert!(variance(&[1.0]).is_err());
/// ```
pub fn variance(data: &[f64]) -> Result<f64, StatsError> {
    let n = data.len();
    if n < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: n,
        });
    }
    let m = mean(data)?;
    if constant_value(data).is_some() {
        return Ok(0.0);
    }
    let sum_sq = compensated_sum(data.iter().map(|x| x * x));
    let nf = n as f64;
    Ok((sum_sq - nf * m * m) / (nf - 1.0))
}

/// Computes the sample standard deviation.
///
/// # Errors
/// [`StatsError::NegativeVariance`] if cancellation in [`variance`]
/// yields a value below zero, plus the errors of [`variance`].
pub fn std_dev(data: &[f64]) -> Result<f64, StatsError> {
    let var = variance(data)?;
    if var < 0.0 {
        return Err(StatsError::NegativeVariance(var));
    }
    Ok(var.sqrt())
}

/// Computes the 95% normal-approximation interval for the mean,
/// `x̄ ± 1.96·s/√n`.
///
/// A constant sample yields a zero-width interval at that constant.
///
/// # Examples
/// ```
/// use cvp_montecarlo::stats::{confidence_interval, mean};
/// let data = [9.0, 10.0, 11.0, 10.0];
/// let ci = confidence_interval(&data).unwrap();
/// assert!(ci.lower <= ci.upper);
/// assert!(ci.contains(mean(&data).unwrap()));
/// ```
pub fn confidence_interval(data: &[f64]) -> Result<ConfidenceInterval, StatsError> {
    let sd = std_dev(data)?;
    let m = mean(data)?;
    let half_width = Z_95 * sd / (data.len() as f64).sqrt();
    Ok(ConfidenceInterval::around(m, half_width))
}

/// Computes the coefficient of variation as a percentage, `100·s/x̄`.
///
/// # Errors
/// [`StatsError::ZeroMean`] if the sample mean is exactly zero.
pub fn coefficient_of_variation(data: &[f64]) -> Result<f64, StatsError> {
    let sd = std_dev(data)?;
    let m = mean(data)?;
    if m == 0.0 {
        return Err(StatsError::ZeroMean);
    }
    Ok(100.0 * sd / m)
}

/// 95% Wald interval for a probability estimated from `n` trials,
/// `p ± 1.96·√(p(1−p)/n)`.
///
/// # Examples
/// ```
/// use cvp_montecarlo::stats::proportion_interval;
/// let ci = proportion_interval(0.5, 100).unwrap();
/// assert!((ci.half_width() - 0.098).abs() < 1e-12);
/// ```
pub fn proportion_interval(p: f64, n: usize) -> Result<ConfidenceInterval, StatsError> {
    if n == 0 {
        return Err(StatsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::InvalidProbability(p));
    }
    let half_width = Z_95 * (p * (1.0 - p) / n as f64).sqrt();
    Ok(ConfidenceInterval::around(p, half_width))
}

/// Estimates `R = Σy / Σx` from paired samples together with the
/// linearised 95% interval `R ± 1.96·√Σ(yᵢ − R·xᵢ)² / |Σx|`.
///
/// # Errors
/// [`StatsError::LengthMismatch`] for unpaired input,
/// [`StatsError::InsufficientData`] for fewer than two pairs,
/// [`StatsError::ZeroDenominator`] when `Σx = 0`.
///
/// # Examples
/// ```
/// use cvp_montecarlo::stats::ratio_estimate;
/// let y = [2.0, 4.0, 6.0];
/// let x = [1.0, 2.0, 3.0];
/// let est = ratio_estimate(&y, &x).unwrap();
/// assert!((est.ratio - 2.0).abs() < 1e-15);
/// assert!(est.interval.half_width().abs() < 1e-12);
/// ```
pub fn ratio_estimate(
    numerator: &[f64],
    denominator: &[f64],
) -> Result<RatioEstimate, StatsError> {
    let n = numerator.len();
    if n != denominator.len() {
        return Err(StatsError::LengthMismatch {
            left: n,
            right: denominator.len(),
        });
    }
    if n < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: n,
        });
    }
    require_finite(numerator)?;
    require_finite(denominator)?;

    let sum_x = kahan_sum(denominator);
    if sum_x == 0.0 {
        return Err(StatsError::ZeroDenominator);
    }
    let ratio = kahan_sum(numerator) / sum_x;
    let residual = compensated_sum(
        numerator
            .iter()
            .zip(denominator)
            .map(|(y, x)| (y - ratio * x).powi(2)),
    );
    let half_width = Z_95 * residual.sqrt() / sum_x.abs();
    Ok(RatioEstimate {
        ratio,
        interval: ConfidenceInterval::around(ratio, half_width),
    })
}

// ---------------------------------------------------------------------------
// Compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation of a slice.
///
/// Reference: Neumaier (1974), *Zeitschrift für Angewandte Mathematik und
/// Mechanik* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    compensated_sum(data.iter().copied())
}

fn compensated_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
