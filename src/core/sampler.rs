//! Stochastic draws for machine speeds and dwell durations.
//!
//! Each distribution family is one `Sampler` implementation constructed from
//! typed parameters. The location/scale families follow the usual convention
//! `loc + scale * X` where `X` is the standardised distribution.

use super::errors::ConfigError;
use rand::distributions::WeightedIndex;
use rand::RngCore;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A single-value draw from a configured distribution.
///
/// The random stream is owned by the run and handed in on every call, so a
/// sampler holds no mutable state and can be shared across parallel runs.
pub trait Sampler: Send + Sync + Debug {
    fn sample(&self, rng: &mut dyn RngCore) -> f64;
}

/// Always returns the same value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl Sampler for Constant {
    fn sample(&self, _rng: &mut dyn RngCore) -> f64 {
        self.0
    }
}

/// Weighted choice over an empirical table of values
#[derive(Debug, Clone)]
pub struct Discrete {
    values: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl Discrete {
    pub fn new(table: &[(f64, f64)]) -> Result<Self, ConfigError> {
        let values = table.iter().map(|(value, _)| *value).collect();
        let index = WeightedIndex::new(table.iter().map(|(_, weight)| *weight)).map_err(|e| {
            ConfigError::InvalidDistribution {
                family: "discrete",
                reason: e.to_string(),
            }
        })?;
        Ok(Self { values, index })
    }
}

impl Sampler for Discrete {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.values[self.index.sample(rng)]
    }
}

/// `loc + Exp(1 / scale)`
#[derive(Debug, Clone)]
pub struct Exponential {
    loc: f64,
    dist: rand_distr::Exp<f64>,
}

impl Exponential {
    pub fn new(loc: f64, scale: f64) -> Result<Self, ConfigError> {
        let dist = rand_distr::Exp::new(1.0 / scale).map_err(invalid("exponential"))?;
        Ok(Self { loc, dist })
    }
}

impl Sampler for Exponential {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.loc + self.dist.sample(rng)
    }
}

/// `loc + scale * exp(s * Z)`
#[derive(Debug, Clone)]
pub struct LogNormal {
    loc: f64,
    dist: rand_distr::LogNormal<f64>,
}

impl LogNormal {
    pub fn new(s: f64, loc: f64, scale: f64) -> Result<Self, ConfigError> {
        if !(scale > 0.0) {
            return Err(ConfigError::InvalidDistribution {
                family: "lognormal",
                reason: format!("scale {} is not positive", scale),
            });
        }
        let dist = rand_distr::LogNormal::new(scale.ln(), s).map_err(invalid("lognormal"))?;
        Ok(Self { loc, dist })
    }
}

impl Sampler for LogNormal {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.loc + self.dist.sample(rng)
    }
}

/// `loc + scale * Beta(a, b)`
#[derive(Debug, Clone)]
pub struct Beta {
    loc: f64,
    scale: f64,
    dist: rand_distr::Beta<f64>,
}

impl Beta {
    pub fn new(a: f64, b: f64, loc: f64, scale: f64) -> Result<Self, ConfigError> {
        let dist = rand_distr::Beta::new(a, b).map_err(invalid("beta"))?;
        Ok(Self { loc, scale, dist })
    }
}

impl Sampler for Beta {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.loc + self.scale * self.dist.sample(rng)
    }
}

/// `loc + Pareto(scale, b)`
#[derive(Debug, Clone)]
pub struct Pareto {
    loc: f64,
    dist: rand_distr::Pareto<f64>,
}

impl Pareto {
    pub fn new(b: f64, loc: f64, scale: f64) -> Result<Self, ConfigError> {
        let dist = rand_distr::Pareto::new(scale, b).map_err(invalid("pareto"))?;
        Ok(Self { loc, dist })
    }
}

impl Sampler for Pareto {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.loc + self.dist.sample(rng)
    }
}

/// `loc + scale * T(df)`
#[derive(Debug, Clone)]
pub struct StudentT {
    loc: f64,
    scale: f64,
    dist: rand_distr::StudentT<f64>,
}

impl StudentT {
    pub fn new(df: f64, loc: f64, scale: f64) -> Result<Self, ConfigError> {
        let dist = rand_distr::StudentT::new(df).map_err(invalid("student-t"))?;
        Ok(Self { loc, scale, dist })
    }
}

impl Sampler for StudentT {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.loc + self.scale * self.dist.sample(rng)
    }
}

fn invalid<E: std::fmt::Display>(family: &'static str) -> impl Fn(E) -> ConfigError {
    move |e| ConfigError::InvalidDistribution {
        family,
        reason: e.to_string(),
    }
}

/// Serializable description of a sampler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum SamplerSpec {
    Constant { value: f64 },
    /// `(value, weight)` pairs; weights are relative
    Discrete { table: Vec<(f64, f64)> },
    Exponential { loc: f64, scale: f64 },
    LogNormal { s: f64, loc: f64, scale: f64 },
    Beta { a: f64, b: f64, loc: f64, scale: f64 },
    Pareto { b: f64, loc: f64, scale: f64 },
    StudentT { df: f64, loc: f64, scale: f64 },
}

impl SamplerSpec {
    pub fn constant(value: f64) -> Self {
        SamplerSpec::Constant { value }
    }

    pub fn discrete(table: &[(f64, f64)]) -> Self {
        SamplerSpec::Discrete {
            table: table.to_vec(),
        }
    }

    /// Validate the parameters and construct the sampler
    pub fn build(&self) -> Result<Box<dyn Sampler>, ConfigError> {
        let sampler: Box<dyn Sampler> = match *self {
            SamplerSpec::Constant { value } => Box::new(Constant(value)),
            SamplerSpec::Discrete { ref table } => Box::new(Discrete::new(table)?),
            SamplerSpec::Exponential { loc, scale } => Box::new(Exponential::new(loc, scale)?),
            SamplerSpec::LogNormal { s, loc, scale } => Box::new(LogNormal::new(s, loc, scale)?),
            SamplerSpec::Beta { a, b, loc, scale } => Box::new(Beta::new(a, b, loc, scale)?),
            SamplerSpec::Pareto { b, loc, scale } => Box::new(Pareto::new(b, loc, scale)?),
            SamplerSpec::StudentT { df, loc, scale } => Box::new(StudentT::new(df, loc, scale)?),
        };
        Ok(sampler)
    }
}
