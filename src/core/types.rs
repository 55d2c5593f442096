use serde::{Deserialize, Serialize};

/// Identifier of a state inside a machine's Markov chain
pub type StateId = u32;

/// One discrete unit of simulated time
pub type Tick = u64;

/// 1-based identifier of one run inside a batch
pub type RunId = u32;

/// Index of a buffer inside a run's buffer arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub(crate) usize);

impl BufferId {
    /// Get the raw arena index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Maximum number of parts a buffer can hold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Bounded(f64),
    Unbounded,
}

impl Capacity {
    /// Numeric limit, infinite for unbounded buffers
    pub fn limit(&self) -> f64 {
        match self {
            Capacity::Bounded(limit) => *limit,
            Capacity::Unbounded => f64::INFINITY,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Capacity::Unbounded)
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Capacity::Unbounded
    }
}

/// Parts held by a buffer when a run starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stock {
    Parts(f64),
    /// A supply that never runs dry
    Inexhaustible,
}

impl Stock {
    pub fn amount(&self) -> f64 {
        match self {
            Stock::Parts(parts) => *parts,
            Stock::Inexhaustible => f64::INFINITY,
        }
    }
}

impl Default for Stock {
    fn default() -> Self {
        Stock::Parts(0.0)
    }
}
