//! Moment-parameterised random variate generators.
//!
//! Every law is specified by its mean `μ` and coefficient of variation
//! `k = σ/μ` (as a ratio, not a percentage). Each parameter struct maps
//! `(μ, k)` to the law's native `alfa`/`beta` pair and draws variates from
//! an explicitly passed RNG.
//!
//! # Supported Distributions
//!
//! | Distribution | alfa | beta | Draw |
//! |---|---|---|---|
//! | [`NormalParams`] | μ | k·μ | alfa + beta·z |
//! | [`LogNormalParams`] | ln μ − beta²/2 | √ln(1+k²) | exp(alfa + beta·z) |
//! | [`UniformParams`] | μ(1−√3·k) | μ(1+√3·k) | alfa + U·(beta−alfa) |
//! | [`GammaParams`] | 1/k² (shape) | alfa/μ (rate) | rejection, three regimes |
//! | [`BirnbaumSaundersParams`] | beta·μ − 0.5/beta | √[(μ+√(μ²+3(kμ)²))/(2(kμ)²)] | see type docs |
//! | [`ParetoParams`] | 2k²/(k²−1) | (alfa−1)·μ | beta·((1−U)^(−1/alfa) − 1) |
//!
//! `z` is [`standard_normal`], `U` is [`unit_uniform`].
//!
//! [`Distribution`] closes the set of laws into one enum, together with
//! the [`Distribution::Zero`] law used for inputs that are not random.

use std::fmt;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::random::{standard_normal, unit_uniform};

/// Error type for sampler construction and sampling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// `(mean, cv)` does not map to a valid parameter set.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),

    /// A rejection loop exceeded its attempt budget.
    #[error("rejection sampler gave up after {attempts} attempts")]
    RejectionExhausted {
        /// Budget that was exhausted.
        attempts: usize,
    },

    /// A draw overflowed to a non-finite value.
    #[error("{law} sampler produced a non-finite variate")]
    NonFiniteVariate { law: &'static str },
}

fn require_finite(law: &str, mean: f64, cv: f64) -> Result<(), DistributionError> {
    if !mean.is_finite() || !cv.is_finite() {
        return Err(DistributionError::InvalidParameters(format!(
            "{law} requires finite mean and cv, got mean={mean}, cv={cv}"
        )));
    }
    Ok(())
}

fn require_positive_mean(law: &str, mean: f64) -> Result<(), DistributionError> {
    if mean <= 0.0 {
        return Err(DistributionError::InvalidParameters(format!(
            "{law} requires mean > 0, got {mean}"
        )));
    }
    Ok(())
}

fn draw<F>(n: usize, mut next: F) -> Vec<f64>
where
    F: FnMut() -> f64,
{
    (0..n).map(|_| next()).collect()
}

// ============================================================================
// Normal Distribution
// ============================================================================

/// Normal law `N(μ, (kμ)²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalParams {
    alfa: f64,
    beta: f64,
}

impl NormalParams {
    /// Maps `(μ, k)` to location `alfa = μ` and scale `beta = k·μ`.
    ///
    /// # Errors
    /// Returns `Err` if either argument is not finite or `cv < 0`.
    pub fn from_moments(mean: f64, cv: f64) -> Result<Self, DistributionError> {
        require_finite("Normal", mean, cv)?;
        if cv < 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Normal requires cv >= 0, got {cv}"
            )));
        }
        Ok(Self {
            alfa: mean,
            beta: cv * mean,
        })
    }

    /// Location, equal to the mean.
    pub fn alfa(&self) -> f64 {
        self.alfa
    }

    /// Scale, equal to the standard deviation `k·μ`.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn mean(&self) -> f64 {
        self.alfa
    }

    pub fn variance(&self) -> f64 {
        self.beta * self.beta
    }

    /// Draws `alfa + beta·z`.
    ///
    /// Tails are cut at `alfa ± 6·beta` by [`standard_normal`].
    ///
    /// # Examples
    /// ```
    /// use cvp_montecarlo::distributions::NormalParams;
    /// use cvp_montecarlo::random::create_rng;
    /// let p = NormalParams::from_moments(100.0, 0.1).unwrap();
    /// let x = p.sample_one(&mut create_rng(3));
    /// assert!((40.0..=160.0).contains(&x));
    /// ```
    pub fn sample_one<R: Rng>(&self, rng: &mut R) -> f64 {
        self.alfa + self.beta * standard_normal(rng)
    }
}

/// Draws `n` normal variates with the given mean and coefficient of variation.
///
/// # Examples
/// ```
/// use cvp_montecarlo::distributions::normal;
/// use cvp_montecarlo::random::create_rng;
/// let mut rng = create_rng(42);
/// let sample = normal(337.0, 0.07, 1000, &mut rng).unwrap();
/// assert_eq!(sample.len(), 1000);
/// ```
pub fn normal<R: Rng>(
    mean: f64,
    cv: f64,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, DistributionError> {
    let params = NormalParams::from_moments(mean, cv)?;
    Ok(draw(n, || params.sample_one(rng)))
}

// ============================================================================
// LogNormal Distribution
// ============================================================================

/// Log-normal law whose arithmetic mean is `μ` and CV is `k`.
///
/// `ln X ~ N(alfa, beta²)` with `beta² = ln(1 + k²)` and
/// `alfa = ln μ − beta²/2`, so that `E[X] = exp(alfa + beta²/2) = μ`.
///
/// Reference: Johnson, Kotz & Balakrishnan (1994), *Continuous Univariate
/// Distributions*, Vol. 1, Chapter 14.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalParams {
    alfa: f64,
    beta: f64,
}

impl LogNormalParams {
    /// # Errors
    /// Returns `Err` if `mean <= 0`, `cv < 0` or either is not finite.
    pub fn from_moments(mean: f64, cv: f64) -> Result<Self, DistributionError> {
        require_finite("LogNormal", mean, cv)?;
        require_positive_mean("LogNormal", mean)?;
        if cv < 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "LogNormal requires cv >= 0, got {cv}"
            )));
        }
        let beta = (1.0 + cv * cv).ln().sqrt();
        let alfa = mean.ln() - beta * beta / 2.0;
        Ok(Self { alfa, beta })
    }

    /// Mean of `ln X`.
    pub fn alfa(&self) -> f64 {
        self.alfa
    }

    /// Standard deviation of `ln X`.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Mean = exp(alfa + beta²/2).
    pub fn mean(&self) -> f64 {
        (self.alfa + self.beta * self.beta / 2.0).exp()
    }

    /// Variance = (exp(beta²) − 1) · exp(2·alfa + beta²).
    pub fn variance(&self) -> f64 {
        let s2 = self.beta * self.beta;
        (s2.exp() - 1.0) * (2.0 * self.alfa + s2).exp()
    }

    /// # Returns
    /// A strictly positive variate `exp(alfa + beta·z)`.
    pub fn sample_one<R: Rng>(&self, rng: &mut R) -> f64 {
        (self.alfa + self.beta * standard_normal(rng)).exp()
    }
}

/// Draws `n` log-normal variates. All values are strictly positive.
pub fn log_normal<R: Rng>(
    mean: f64,
    cv: f64,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, DistributionError> {
    let params = LogNormalParams::from_moments(mean, cv)?;
    Ok(draw(n, || params.sample_one(rng)))
}

// ============================================================================
// Uniform Distribution
// ============================================================================

/// Continuous uniform law between `alfa = μ(1 − √3·k)` and
/// `beta = μ(1 + √3·k)`.
///
/// The half-width `√3·k·μ` gives standard deviation `k·μ`. With `k = 0`
/// the law degenerates to the point `μ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformParams {
    alfa: f64,
    beta: f64,
}

impl UniformParams {
    /// # Errors
    /// Returns `Err` if `cv < 0` or either argument is not finite.
    pub fn from_moments(mean: f64, cv: f64) -> Result<Self, DistributionError> {
        require_finite("Uniform", mean, cv)?;
        if cv < 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Uniform requires cv >= 0, got {cv}"
            )));
        }
        let spread = 3.0_f64.sqrt() * cv;
        Ok(Self {
            alfa: mean * (1.0 - spread),
            beta: mean * (1.0 + spread),
        })
    }

    /// Lower bound.
    pub fn alfa(&self) -> f64 {
        self.alfa
    }

    /// Upper bound.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn mean(&self) -> f64 {
        (self.alfa + self.beta) / 2.0
    }

    pub fn variance(&self) -> f64 {
        let range = self.beta - self.alfa;
        range * range / 12.0
    }

    pub fn sample_one<R: Rng>(&self, rng: &mut R) -> f64 {
        self.alfa + unit_uniform(rng) * (self.beta - self.alfa)
    }
}

/// Draws `n` uniform variates on `[alfa, beta]`.
pub fn uniform<R: Rng>(
    mean: f64,
    cv: f64,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, DistributionError> {
    let params = UniformParams::from_moments(mean, cv)?;
    Ok(draw(n, || params.sample_one(rng)))
}

// ============================================================================
// Gamma Distribution
// ============================================================================

/// Default per-variate attempt budget for the Gamma rejection loops.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Largest accepted Gamma shape, i.e. `cv >= 0.01`.
///
/// Each large-shape variate costs `⌊alfa⌋` uniforms.
pub const MAX_GAMMA_SHAPE: f64 = 1e4;

/// Gamma law with shape `alfa = 1/k²` and rate `beta = alfa/μ`.
///
/// # Algorithm
/// The generator picks one of three regimes by shape:
///
/// - `alfa < 1`: Jöhnk's method. Draw `a = U^(1/alfa)`,
///   `b = U'^(1/(1−alfa))` until `a + b ≤ 1`, then return
///   `−(a/(a+b))·ln U'' / beta`.
/// - `1 ≤ alfa < 5`: propose `c = −(alfa/⌊alfa⌋)·ln(∏ U)` from
///   `⌊alfa⌋` uniforms, accept with probability
///   `(c/alfa)^f · exp(−f·(c/alfa − 1))` where `f = alfa − ⌊alfa⌋`.
/// - `alfa ≥ 5`: with `f = alfa − ⌊alfa⌋` and `r = U`, multiply `r` by
///   `⌊alfa − 1⌋` further uniforms if `r ≥ f`, else by `⌊alfa⌋`, and return
///   `−ln r / beta`. The logarithm is accumulated as a sum of `ln U`. This is an Erlang shortcut that rounds the shape to a
///   neighbouring integer rather than an exact Gamma method; risk figures
///   downstream were produced with it, so it is kept unchanged.
///
/// The two rejection regimes give up after [`GammaParams::max_attempts`]
/// proposals per variate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaParams {
    alfa: f64,
    beta: f64,
    max_attempts: usize,
}

impl GammaParams {
    /// # Errors
    /// Returns `Err` if `mean <= 0`, `cv <= 0`, either is not finite, or
    /// the shape `1/cv²` exceeds [`MAX_GAMMA_SHAPE`].
    pub fn from_moments(mean: f64, cv: f64) -> Result<Self, DistributionError> {
        require_finite("Gamma", mean, cv)?;
        require_positive_mean("Gamma", mean)?;
        if cv <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Gamma requires cv > 0, got {cv}"
            )));
        }
        let alfa = 1.0 / (cv * cv);
        if alfa > MAX_GAMMA_SHAPE {
            return Err(DistributionError::InvalidParameters(format!(
                "Gamma shape 1/cv² = {alfa} exceeds {MAX_GAMMA_SHAPE} (cv = {cv} is too small)"
            )));
        }
        Ok(Self {
            alfa,
            beta: alfa / mean,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Overrides the per-variate rejection budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Shape parameter.
    pub fn alfa(&self) -> f64 {
        self.alfa
    }

    /// Rate parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn mean(&self) -> f64 {
        self.alfa / self.beta
    }

    pub fn variance(&self) -> f64 {
        self.alfa / (self.beta * self.beta)
    }

    /// Draws one Gamma variate.
    ///
    /// # Complexity
    /// O(⌊alfa⌋) uniforms per accepted proposal for `alfa ≥ 1`, times the
    /// number of rejections below `alfa = 5`.
    ///
    /// # Errors
    /// [`DistributionError::RejectionExhausted`] if a rejection regime does
    /// not accept within the attempt budget, or
    /// [`DistributionError::NonFiniteVariate`] if a zero uniform drives the
    /// logarithm to infinity.
    pub fn sample_one<R: Rng>(&self, rng: &mut R) -> Result<f64, DistributionError> {
        let x = if self.alfa < 1.0 {
            self.sample_small_shape(rng)?
        } else if self.alfa < 5.0 {
            self.sample_moderate_shape(rng)?
        } else {
            self.sample_large_shape(rng)
        };
        if x.is_finite() {
            Ok(x)
        } else {
            Err(DistributionError::NonFiniteVariate { law: "Gamma" })
        }
    }

    fn sample_small_shape<R: Rng>(&self, rng: &mut R) -> Result<f64, DistributionError> {
        let alfa = self.alfa;
        for _ in 0..self.max_attempts {
            let a = unit_uniform(rng).powf(1.0 / alfa);
            let b = unit_uniform(rng).powf(1.0 / (1.0 - alfa));
            let c = a + b;
            if c <= 1.0 {
                let d = a / c;
                return Ok(-d * unit_uniform(rng).ln() / self.beta);
            }
        }
        Err(DistributionError::RejectionExhausted {
            attempts: self.max_attempts,
        })
    }

    fn sample_moderate_shape<R: Rng>(&self, rng: &mut R) -> Result<f64, DistributionError> {
        let alfa = self.alfa;
        let whole = alfa.trunc();
        let frac = alfa - whole;
        for _ in 0..self.max_attempts {
            let mut r = 1.0;
            for _ in 0..whole as usize {
                r *= unit_uniform(rng);
            }
            let c = -(alfa / whole) * r.ln();
            let ratio = c / alfa;
            if unit_uniform(rng) <= ratio.powf(frac) * (-frac * (ratio - 1.0)).exp() {
                return Ok(c / self.beta);
            }
        }
        Err(DistributionError::RejectionExhausted {
            attempts: self.max_attempts,
        })
    }

    fn sample_large_shape<R: Rng>(&self, rng: &mut R) -> f64 {
        let alfa = self.alfa;
        let frac = alfa - alfa.trunc();
        let first = unit_uniform(rng);
        let extra = if first >= frac {
            (alfa - 1.0).trunc()
        } else {
            alfa.trunc()
        };
        // ln of the product, summed term by term: the product itself
        // underflows to zero once the shape passes ~745.
        let mut log_product = first.ln();
        for _ in 0..extra as usize {
            log_product += unit_uniform(rng).ln();
        }
        -log_product / self.beta
    }
}

/// Draws `n` Gamma variates.
///
/// # Errors
/// Parameter errors of [`GammaParams::from_moments`], or
/// [`DistributionError::RejectionExhausted`] from any single draw.
pub fn gamma<R: Rng>(
    mean: f64,
    cv: f64,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, DistributionError> {
    let params = GammaParams::from_moments(mean, cv)?;
    (0..n).map(|_| params.sample_one(rng)).collect()
}

// ============================================================================
// Birnbaum–Saunders Distribution
// ============================================================================

/// Birnbaum–Saunders (fatigue-life) law with mean `μ` and CV `k`.
///
/// With `s = k·μ`:
/// ```text
/// beta = √[(μ + √(μ² + 3s²)) / (2s²)]
/// alfa = beta·μ − 0.5/beta
/// ```
/// A variate is built from `a1 = alfa/beta` and `a2 = z/beta` as
/// `a1 + a2²/2 + a2·√(a1 + a2²/4)`, which equals
/// `(√(a1 + a2²/4) + a2/2)²` and is therefore non-negative.
///
/// Reference: Birnbaum & Saunders (1969), "A New Family of Life
/// Distributions", *Journal of Applied Probability* 6(2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirnbaumSaundersParams {
    alfa: f64,
    beta: f64,
}

impl BirnbaumSaundersParams {
    /// # Errors
    /// Returns `Err` if `mean <= 0`, `cv <= 0`, either is not finite, or the
    /// mapping yields `alfa < 0` (very large `cv` on a small mean).
    pub fn from_moments(mean: f64, cv: f64) -> Result<Self, DistributionError> {
        require_finite("BirnbaumSaunders", mean, cv)?;
        require_positive_mean("BirnbaumSaunders", mean)?;
        if cv <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "BirnbaumSaunders requires cv > 0, got {cv}"
            )));
        }
        let s2 = (cv * mean).powi(2);
        let beta = ((mean + (mean * mean + 3.0 * s2).sqrt()) / (2.0 * s2)).sqrt();
        let alfa = beta * mean - 0.5 / beta;
        if alfa.is_nan() || alfa < 0.0 || !beta.is_finite() {
            return Err(DistributionError::InvalidParameters(format!(
                "BirnbaumSaunders mapping is degenerate for mean={mean}, cv={cv} (alfa={alfa}, beta={beta})"
            )));
        }
        Ok(Self { alfa, beta })
    }

    pub fn alfa(&self) -> f64 {
        self.alfa
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Mean = alfa/beta + 1/(2·beta²).
    pub fn mean(&self) -> f64 {
        self.alfa / self.beta + 0.5 / (self.beta * self.beta)
    }

    /// Variance = a1/beta² + 5/(4·beta⁴) with `a1 = alfa/beta`.
    pub fn variance(&self) -> f64 {
        let b2 = self.beta * self.beta;
        self.alfa / self.beta / b2 + 1.25 / (b2 * b2)
    }

    /// # Returns
    /// A non-negative variate; `z` is cut at ±6, so the draw is bounded.
    pub fn sample_one<R: Rng>(&self, rng: &mut R) -> f64 {
        let a1 = self.alfa / self.beta;
        let a2 = standard_normal(rng) / self.beta;
        a1 + 0.5 * a2 * a2 + a2 * (a1 + 0.25 * a2 * a2).sqrt()
    }
}

/// Draws `n` Birnbaum–Saunders variates.
pub fn birnbaum_saunders<R: Rng>(
    mean: f64,
    cv: f64,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, DistributionError> {
    let params = BirnbaumSaundersParams::from_moments(mean, cv)?;
    Ok(draw(n, || params.sample_one(rng)))
}

// ============================================================================
// Pareto Distribution
// ============================================================================

/// Pareto type II (Lomax) law with mean `μ` and CV `k > 1`.
///
/// `alfa = 2k²/(k² − 1)` and `beta = (alfa − 1)·μ`; the variate is
/// `beta·((1 − U)^(−1/alfa) − 1) ≥ 0`. For `k ≤ 1` the shape is
/// non-positive or undefined, so construction fails. As `k → 1⁺` the shape
/// grows without bound and so does the dispersion of the draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParetoParams {
    alfa: f64,
    beta: f64,
}

impl ParetoParams {
    /// # Errors
    /// Returns `Err` if `mean <= 0`, `cv <= 1` or either is not finite.
    pub fn from_moments(mean: f64, cv: f64) -> Result<Self, DistributionError> {
        require_finite("Pareto", mean, cv)?;
        require_positive_mean("Pareto", mean)?;
        if cv <= 1.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Pareto requires cv > 1, got {cv}"
            )));
        }
        let k2 = cv * cv;
        let alfa = 2.0 * k2 / (k2 - 1.0);
        Ok(Self {
            alfa,
            beta: (alfa - 1.0) * mean,
        })
    }

    /// Shape; always greater than 2.
    pub fn alfa(&self) -> f64 {
        self.alfa
    }

    /// Scale.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Mean = beta/(alfa − 1).
    pub fn mean(&self) -> f64 {
        self.beta / (self.alfa - 1.0)
    }

    /// Variance = beta²·alfa / ((alfa − 1)²·(alfa − 2)); `alfa > 2` always
    /// holds for a valid mapping.
    pub fn variance(&self) -> f64 {
        let am1 = self.alfa - 1.0;
        self.beta * self.beta * self.alfa / (am1 * am1 * (self.alfa - 2.0))
    }

    /// Inverse-CDF draw `beta·((1 − U)^(−1/alfa) − 1)`.
    pub fn sample_one<R: Rng>(&self, rng: &mut R) -> f64 {
        self.beta * (1.0 / (1.0 - unit_uniform(rng)).powf(1.0 / self.alfa) - 1.0)
    }
}

/// Draws `n` Pareto variates. Requires `cv > 1`.
pub fn pareto<R: Rng>(
    mean: f64,
    cv: f64,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, DistributionError> {
    let params = ParetoParams::from_moments(mean, cv)?;
    Ok(draw(n, || params.sample_one(rng)))
}

// ============================================================================
// Distribution kinds
// ============================================================================

/// Tag selecting a sampling law.
///
/// Deserialises from the snake-case name (`"log_normal"`), the variant
/// name (`"LogNormal"`) or the short tags `N`, `LN`, `R`, `G`, `BS`, `P`
/// and `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    #[serde(alias = "N", alias = "Normal")]
    Normal,
    #[serde(alias = "LN", alias = "LogNormal")]
    LogNormal,
    #[serde(alias = "R", alias = "Uniform")]
    Uniform,
    #[serde(alias = "G", alias = "Gamma")]
    Gamma,
    #[serde(alias = "BS", alias = "BirnbaumSaunders")]
    BirnbaumSaunders,
    #[serde(alias = "P", alias = "Pareto")]
    Pareto,
    /// Non-random input: always yields zeros.
    #[serde(alias = "NaN", alias = "Zero")]
    Zero,
}

impl DistributionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LogNormal => "log_normal",
            Self::Uniform => "uniform",
            Self::Gamma => "gamma",
            Self::BirnbaumSaunders => "birnbaum_saunders",
            Self::Pareto => "pareto",
            Self::Zero => "zero",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully parameterised sampling law.
///
/// # Examples
/// ```
/// use cvp_montecarlo::distributions::{Distribution, DistributionKind};
/// use cvp_montecarlo::random::create_rng;
///
/// let mut rng = create_rng(1);
/// let gamma = Distribution::from_moments(DistributionKind::Gamma, 10_000.0, 0.1).unwrap();
/// assert_eq!(gamma.sample(500, &mut rng).unwrap().len(), 500);
///
/// let zero = Distribution::from_moments(DistributionKind::Zero, 0.0, 0.0).unwrap();
/// assert_eq!(zero.sample(3, &mut rng).unwrap(), vec![0.0; 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    Normal(NormalParams),
    LogNormal(LogNormalParams),
    Uniform(UniformParams),
    Gamma(GammaParams),
    BirnbaumSaunders(BirnbaumSaundersParams),
    Pareto(ParetoParams),
    Zero,
}

impl Distribution {
    /// Maps `(mean, cv)` to the parameters of the law selected by `kind`.
    ///
    /// [`DistributionKind::Zero`] ignores both arguments.
    pub fn from_moments(
        kind: DistributionKind,
        mean: f64,
        cv: f64,
    ) -> Result<Self, DistributionError> {
        Ok(match kind {
            DistributionKind::Normal => Self::Normal(NormalParams::from_moments(mean, cv)?),
            DistributionKind::LogNormal => Self::LogNormal(LogNormalParams::from_moments(mean, cv)?),
            DistributionKind::Uniform => Self::Uniform(UniformParams::from_moments(mean, cv)?),
            DistributionKind::Gamma => Self::Gamma(GammaParams::from_moments(mean, cv)?),
            DistributionKind::BirnbaumSaunders => {
                Self::BirnbaumSaunders(BirnbaumSaundersParams::from_moments(mean, cv)?)
            }
            DistributionKind::Pareto => Self::Pareto(ParetoParams::from_moments(mean, cv)?),
            DistributionKind::Zero => Self::Zero,
        })
    }

    pub fn kind(&self) -> DistributionKind {
        match self {
            Self::Normal(_) => DistributionKind::Normal,
            Self::LogNormal(_) => DistributionKind::LogNormal,
            Self::Uniform(_) => DistributionKind::Uniform,
            Self::Gamma(_) => DistributionKind::Gamma,
            Self::BirnbaumSaunders(_) => DistributionKind::BirnbaumSaunders,
            Self::Pareto(_) => DistributionKind::Pareto,
            Self::Zero => DistributionKind::Zero,
        }
    }

    /// Analytic mean of the law.
    pub fn mean(&self) -> f64 {
        match self {
            Self::Normal(p) => p.mean(),
            Self::LogNormal(p) => p.mean(),
            Self::Uniform(p) => p.mean(),
            Self::Gamma(p) => p.mean(),
            Self::BirnbaumSaunders(p) => p.mean(),
            Self::Pareto(p) => p.mean(),
            Self::Zero => 0.0,
        }
    }

    /// Analytic variance of the law.
    pub fn variance(&self) -> f64 {
        match self {
            Self::Normal(p) => p.variance(),
            Self::LogNormal(p) => p.variance(),
            Self::Uniform(p) => p.variance(),
            Self::Gamma(p) => p.variance(),
            Self::BirnbaumSaunders(p) => p.variance(),
            Self::Pareto(p) => p.variance(),
            Self::Zero => 0.0,
        }
    }

    /// Draws a single variate.
    pub fn sample_one<R: Rng>(&self, rng: &mut R) -> Result<f64, DistributionError> {
        match self {
            Self::Normal(p) => Ok(p.sample_one(rng)),
            Self::LogNormal(p) => Ok(p.sample_one(rng)),
            Self::Uniform(p) => Ok(p.sample_one(rng)),
            Self::Gamma(p) => p.sample_one(rng),
            Self::BirnbaumSaunders(p) => Ok(p.sample_one(rng)),
            Self::Pareto(p) => Ok(p.sample_one(rng)),
            Self::Zero => Ok(0.0),
        }
    }

    /// Draws `n` independent variates; `n = 0` yields an empty vector.
    pub fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>, DistributionError> {
        match self {
            Self::Zero => Ok(vec![0.0; n]),
            _ => (0..n).map(|_| self.sample_one(rng)).collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::stats;

    fn rel_err(actual: f64, expected: f64) -> f64 {
        ((actual - expected) / expected).abs()
    }

    // --- sizes ---

    #[test]
    fn test_all_samplers_return_n() {
        let mut rng = create_rng(42);
        assert_eq!(normal(10.0, 0.1, 17, &mut rng).unwrap().len(), 17);
        assert_eq!(log_normal(10.0, 0.1, 17, &mut rng).unwrap().len(), 17);
        assert_eq!(uniform(10.0, 0.1, 17, &mut rng).unwrap().len(), 17);
        assert_eq!(gamma(10.0, 0.1, 17, &mut rng).unwrap().len(), 17);
        assert_eq!(birnbaum_saunders(10.0, 0.1, 17, &mut rng).unwrap().len(), 17);
        assert_eq!(pareto(10.0, 1.5, 17, &mut rng).unwrap().len(), 17);
    }

    #[test]
    fn test_all_samplers_empty_for_zero_n() {
        let mut rng = create_rng(42);
        assert!(normal(10.0, 0.1, 0, &mut rng).unwrap().is_empty());
        assert!(log_normal(10.0, 0.1, 0, &mut rng).unwrap().is_empty());
        assert!(uniform(10.0, 0.1, 0, &mut rng).unwrap().is_empty());
        assert!(gamma(10.0, 0.1, 0, &mut rng).unwrap().is_empty());
        assert!(birnbaum_saunders(10.0, 0.1, 0, &mut rng).unwrap().is_empty());
        assert!(pareto(10.0, 1.5, 0, &mut rng).unwrap().is_empty());
    }

    // --- Normal ---

    #[test]
    fn test_normal_params() {
        let p = NormalParams::from_moments(337.0, 0.07).unwrap();
        assert_eq!(p.alfa(), 337.0);
        assert!((p.beta() - 23.59).abs() < 1e-10);
    }

    #[test]
    fn test_normal_mean_inside_interval() {
        let mut rng = create_rng(2024);
        let sample = normal(337.0, 0.07, 20_000, &mut rng).unwrap();
        let m = stats::mean(&sample).unwrap();
        let ci = stats::confidence_interval(&sample).unwrap();
        assert!(ci.contains(m));
        assert!((m - 337.0).abs() < 1.0, "mean {m}");
    }

    #[test]
    fn test_normal_interval_coverage() {
        // The analytic mean should fall inside the 95% interval in
        // roughly 95% of independent trials.
        let trials = 200;
        let mut rng = create_rng(99);
        let covered = (0..trials)
            .filter(|_| {
                let sample = normal(100.0, 0.2, 2_000, &mut rng).unwrap();
                stats::confidence_interval(&sample).unwrap().contains(100.0)
            })
            .count();
        assert!(covered >= 175, "coverage {covered}/{trials}");
    }

    #[test]
    fn test_normal_invalid() {
        assert!(NormalParams::from_moments(f64::NAN, 0.1).is_err());
        assert!(NormalParams::from_moments(1.0, -0.1).is_err());
    }

    // --- LogNormal ---

    #[test]
    fn test_lognormal_params_recover_moments() {
        let p = LogNormalParams::from_moments(152.93, 0.1).unwrap();
        assert!(rel_err(p.mean(), 152.93) < 1e-12);
        assert!(rel_err(p.variance().sqrt() / p.mean(), 0.1) < 1e-10);
    }

    #[test]
    fn test_lognormal_strictly_positive() {
        let mut rng = create_rng(8);
        let sample = log_normal(1.0, 2.0, 20_000, &mut rng).unwrap();
        assert!(sample.iter().all(|&x| x > 0.0));
    }

    #[test]
    fn test_lognormal_invalid() {
        assert!(LogNormalParams::from_moments(0.0, 0.1).is_err());
        assert!(LogNormalParams::from_moments(-5.0, 0.1).is_err());
    }

    // --- Uniform ---

    #[test]
    fn test_uniform_within_bounds() {
        let p = UniformParams::from_moments(191.3, 0.07).unwrap();
        let mut rng = create_rng(4);
        for _ in 0..20_000 {
            let x = p.sample_one(&mut rng);
            assert!(
                x >= p.alfa() && x <= p.beta(),
                "{x} outside [{}, {}]",
                p.alfa(),
                p.beta()
            );
        }
        assert!(rel_err(p.variance().sqrt(), 0.07 * 191.3) < 1e-12);
    }

    #[test]
    fn test_uniform_degenerate_cv_zero() {
        let mut rng = create_rng(4);
        let sample = uniform(50.0, 0.0, 100, &mut rng).unwrap();
        assert!(sample.iter().all(|&x| x == 50.0));
    }

    // --- Gamma ---

    #[test]
    fn test_gamma_params() {
        let p = GammaParams::from_moments(10_000.0, 0.5).unwrap();
        assert!((p.alfa() - 4.0).abs() < 1e-12);
        assert!((p.beta() - 4e-4).abs() < 1e-15);
        assert_eq!(p.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert!(rel_err(p.mean(), 10_000.0) < 1e-12);
    }

    #[test]
    fn test_gamma_small_shape_regime() {
        // cv = 1.5 -> alfa ≈ 0.444
        let mut rng = create_rng(21);
        let sample = gamma(50.0, 1.5, 20_000, &mut rng).unwrap();
        assert!(sample.iter().all(|&x| x >= 0.0));
        let m = stats::mean(&sample).unwrap();
        assert!(rel_err(m, 50.0) < 0.05, "mean {m}");
    }

    #[test]
    fn test_gamma_moderate_shape_regime() {
        // cv = 0.6 -> alfa ≈ 2.78
        let mut rng = create_rng(22);
        let sample = gamma(50.0, 0.6, 20_000, &mut rng).unwrap();
        assert!(sample.iter().all(|&x| x >= 0.0));
        let m = stats::mean(&sample).unwrap();
        assert!(rel_err(m, 50.0) < 0.03, "mean {m}");
        let cv = stats::coefficient_of_variation(&sample).unwrap() / 100.0;
        assert!((cv - 0.6).abs() < 0.03, "cv {cv}");
    }

    #[test]
    fn test_gamma_large_shape_regime() {
        // cv = 0.1 -> alfa ≈ 100
        let mut rng = create_rng(23);
        let sample = gamma(19_116.8, 0.1, 20_000, &mut rng).unwrap();
        assert!(sample.iter().all(|&x| x >= 0.0));
        let m = stats::mean(&sample).unwrap();
        assert!(rel_err(m, 19_116.8) < 0.02, "mean {m}");
    }

    #[test]
    fn test_gamma_shape_five_boundary() {
        // alfa = 5 on either side of the rounding of 1/cv²
        let mut rng = create_rng(24);
        for cv in [1.0 / 5.0_f64.sqrt(), 0.447] {
            let p = GammaParams::from_moments(200.0, cv).unwrap();
            assert!((p.alfa() - 5.0).abs() < 0.01);
            let sample = gamma(200.0, cv, 20_000, &mut rng).unwrap();
            assert!(sample.iter().all(|x| x.is_finite() && *x >= 0.0));
            let m = stats::mean(&sample).unwrap();
            assert!(rel_err(m, 200.0) < 0.05, "cv {cv}: mean {m}");
        }
    }

    #[test]
    fn test_gamma_shape_past_underflow() {
        // alfa = 2500 and ≈ 1111: a product of that many uniforms is 0.0
        let mut rng = create_rng(25);
        for (mean, cv) in [(100.0, 0.02), (19_116.8, 0.03)] {
            let sample = gamma(mean, cv, 2_000, &mut rng).unwrap();
            assert!(sample.iter().all(|x| x.is_finite() && *x > 0.0));
            let m = stats::mean(&sample).unwrap();
            assert!(rel_err(m, mean) < 0.01, "cv {cv}: mean {m}");
            let sample_cv = stats::coefficient_of_variation(&sample).unwrap() / 100.0;
            assert!((sample_cv - cv).abs() < 0.005, "cv {cv}: sample cv {sample_cv}");
        }
    }

    #[test]
    fn test_gamma_shape_upper_bound() {
        assert!(GammaParams::from_moments(100.0, 0.011).is_ok());
        let err = GammaParams::from_moments(100.0, 1e-4).unwrap_err();
        assert!(matches!(err, DistributionError::InvalidParameters(_)));
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn test_gamma_exhaustion_reported() {
        let mut rng = create_rng(1);
        for cv in [1.5, 0.6] {
            let p = GammaParams::from_moments(1.0, cv).unwrap().with_max_attempts(0);
            assert_eq!(
                p.sample_one(&mut rng),
                Err(DistributionError::RejectionExhausted { attempts: 0 })
            );
        }
    }

    #[test]
    fn test_gamma_large_shape_ignores_budget() {
        let mut rng = create_rng(1);
        let p = GammaParams::from_moments(1.0, 0.1).unwrap().with_max_attempts(0);
        assert!(p.sample_one(&mut rng).is_ok());
    }

    #[test]
    fn test_gamma_invalid() {
        assert!(GammaParams::from_moments(1.0, 0.0).is_err());
        assert!(GammaParams::from_moments(0.0, 0.5).is_err());
    }

    // --- Birnbaum–Saunders ---

    #[test]
    fn test_birnbaum_saunders_params_recover_moments() {
        let p = BirnbaumSaundersParams::from_moments(100.0, 0.1).unwrap();
        assert!(rel_err(p.mean(), 100.0) < 1e-10);
        assert!(rel_err(p.variance().sqrt(), 10.0) < 1e-10);
    }

    #[test]
    fn test_birnbaum_saunders_sample() {
        let mut rng = create_rng(31);
        let sample = birnbaum_saunders(100.0, 0.3, 20_000, &mut rng).unwrap();
        assert!(sample.iter().all(|&x| x >= 0.0));
        let m = stats::mean(&sample).unwrap();
        assert!(rel_err(m, 100.0) < 0.02, "mean {m}");
    }

    #[test]
    fn test_birnbaum_saunders_invalid() {
        assert!(BirnbaumSaundersParams::from_moments(100.0, 0.0).is_err());
        assert!(BirnbaumSaundersParams::from_moments(-1.0, 0.1).is_err());
    }

    // --- Pareto ---

    #[test]
    fn test_pareto_requires_cv_above_one() {
        assert!(ParetoParams::from_moments(191.3, 0.07).is_err());
        assert!(ParetoParams::from_moments(191.3, 1.0).is_err());
        assert!(ParetoParams::from_moments(191.3, 1.01).is_ok());
    }

    #[test]
    fn test_pareto_params_recover_moments() {
        let p = ParetoParams::from_moments(10.0, 2.0).unwrap();
        // alfa = 8/3, beta = 50/3
        assert!((p.alfa() - 8.0 / 3.0).abs() < 1e-12);
        assert!(rel_err(p.mean(), 10.0) < 1e-12);
        assert!(rel_err(p.variance().sqrt(), 20.0) < 1e-10);
    }

    #[test]
    fn test_pareto_non_negative() {
        let mut rng = create_rng(41);
        let sample = pareto(10.0, 1.5, 20_000, &mut rng).unwrap();
        assert!(sample.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn test_pareto_parameters_diverge_near_one() {
        let wide = ParetoParams::from_moments(10.0, 1.05).unwrap();
        let wider = ParetoParams::from_moments(10.0, 1.001).unwrap();
        assert!(wider.alfa() > wide.alfa());
        assert!(wider.beta() > wide.beta());
    }

    // --- Distribution enum ---

    #[test]
    fn test_zero_kind_constant_sample() {
        let mut rng = create_rng(0);
        let d = Distribution::from_moments(DistributionKind::Zero, 123.0, 9.0).unwrap();
        assert_eq!(d.kind(), DistributionKind::Zero);
        assert_eq!(d.sample(5, &mut rng), Ok(vec![0.0; 5]));
        assert!(d.sample(0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_enum_matches_free_function() {
        let d = Distribution::from_moments(DistributionKind::Normal, 337.0, 0.07).unwrap();
        let mut rng1 = create_rng(77);
        let mut rng2 = create_rng(77);
        assert_eq!(
            d.sample(64, &mut rng1).unwrap(),
            normal(337.0, 0.07, 64, &mut rng2).unwrap()
        );
    }

    #[test]
    fn test_enum_kind_roundtrip() {
        let kinds = [
            (DistributionKind::Normal, 1.0, 0.1),
            (DistributionKind::LogNormal, 1.0, 0.1),
            (DistributionKind::Uniform, 1.0, 0.1),
            (DistributionKind::Gamma, 1.0, 0.1),
            (DistributionKind::BirnbaumSaunders, 1.0, 0.1),
            (DistributionKind::Pareto, 1.0, 1.5),
            (DistributionKind::Zero, 0.0, 0.0),
        ];
        for (kind, mean, cv) in kinds {
            let d = Distribution::from_moments(kind, mean, cv).unwrap();
            assert_eq!(d.kind(), kind);
            if kind != DistributionKind::Zero {
                assert!(rel_err(d.mean(), mean) < 1e-10, "{kind}: {}", d.mean());
            }
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DistributionKind::BirnbaumSaunders.to_string(), "birnbaum_saunders");
        assert_eq!(DistributionKind::Zero.to_string(), "zero");
    }

    #[test]
    fn test_invalid_parameters_message() {
        let err = Distribution::from_moments(DistributionKind::Pareto, 1.0, 0.5).unwrap_err();
        assert!(err.to_string().contains("cv > 1"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn uniform_draws_stay_in_bounds(
            seed in 0_u64..10000,
            mean in 1.0_f64..1e4,
            cv in 0.0_f64..0.5,
        ) {
            let p = UniformParams::from_moments(mean, cv).unwrap();
            let mut rng = create_rng(seed);
            for _ in 0..50 {
                let x = p.sample_one(&mut rng);
                prop_assert!(x >= p.alfa() && x <= p.beta());
            }
        }

        #[test]
        fn gamma_draws_non_negative(
            seed in 0_u64..10000,
            mean in 0.1_f64..1e4,
            cv in 0.05_f64..3.0,
        ) {
            let p = GammaParams::from_moments(mean, cv).unwrap();
            let mut rng = create_rng(seed);
            for _ in 0..20 {
                let x = p.sample_one(&mut rng).unwrap();
                prop_assert!(x >= 0.0);
            }
        }

        #[test]
        fn gamma_small_cv_finite_or_rejected(
            seed in 0_u64..10000,
            mean in 0.1_f64..1e5,
            cv in 0.001_f64..0.05,
        ) {
            let mut rng = create_rng(seed);
            if let Ok(sample) = gamma(mean, cv, 5, &mut rng) {
                prop_assert!(sample.iter().all(|x| x.is_finite() && *x > 0.0));
            }
        }

        #[test]
        fn birnbaum_saunders_draws_non_negative(
            seed in 0_u64..10000,
            mean in 1.0_f64..1e4,
            cv in 0.01_f64..1.0,
        ) {
            let p = BirnbaumSaundersParams::from_moments(mean, cv).unwrap();
            let mut rng = create_rng(seed);
            for _ in 0..20 {
                prop_assert!(p.sample_one(&mut rng) >= 0.0);
            }
        }

        #[test]
        fn sample_length_matches_request(
            seed in 0_u64..10000,
            n in 0_usize..200,
        ) {
            let mut rng = create_rng(seed);
            let d = Distribution::from_moments(DistributionKind::LogNormal, 5.0, 0.3).unwrap();
            prop_assert_eq!(d.sample(n, &mut rng).unwrap().len(), n);
        }
    }
}
