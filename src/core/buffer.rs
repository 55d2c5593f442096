use super::errors::ConfigError;
use super::types::{Capacity, Stock};

/// Counter of in-transit parts between machines.
///
/// Machines upstream `put` into the buffer and machines downstream `get` from it.
/// Neither operation blocks or fails: each one moves as many parts as the buffer
/// allows and reports how many actually moved, leaving the caller to deal with
/// the remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    id: String,
    max_capacity: Capacity,
    current_parts: f64,
}

impl Buffer {
    /// Create an empty buffer
    pub fn new(id: impl Into<String>, max_capacity: Capacity) -> Self {
        debug_assert!(
            max_capacity.limit() > 0.0,
            "buffer capacity must be positive"
        );
        Self {
            id: id.into(),
            max_capacity,
            current_parts: 0.0,
        }
    }

    /// Create a buffer holding an initial stock
    pub fn with_stock(
        id: impl Into<String>,
        max_capacity: Capacity,
        stock: Stock,
    ) -> Result<Self, ConfigError> {
        let id = id.into();
        let invalid = |reason: String| ConfigError::InvalidBuffer {
            buffer: id.clone(),
            reason,
        };

        if let Capacity::Bounded(limit) = max_capacity {
            if !(limit > 0.0) {
                return Err(invalid(format!("capacity {} is not positive", limit)));
            }
        }
        match stock {
            Stock::Inexhaustible if !max_capacity.is_unbounded() => {
                return Err(invalid(
                    "an inexhaustible stock needs unbounded capacity".to_string(),
                ));
            }
            Stock::Parts(parts) if !(parts >= 0.0) || parts > max_capacity.limit() => {
                return Err(invalid(format!(
                    "initial stock {} outside 0..={}",
                    parts,
                    max_capacity.limit()
                )));
            }
            _ => {}
        }

        Ok(Self {
            id,
            max_capacity,
            current_parts: stock.amount(),
        })
    }

    /// Create an unbounded buffer that never runs dry
    pub fn source(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            max_capacity: Capacity::Unbounded,
            current_parts: f64::INFINITY,
        }
    }

    /// Offer `amount` parts; returns how many were accepted
    pub fn put(&mut self, amount: f64) -> f64 {
        debug_assert!(amount >= 0.0, "put amount must be non-negative, got {}", amount);
        let accepted = match self.max_capacity {
            Capacity::Unbounded => amount,
            Capacity::Bounded(_) => amount.min(self.available_space()),
        };
        self.current_parts += accepted;
        accepted
    }

    /// Request `amount` parts; returns how many were released
    pub fn get(&mut self, amount: f64) -> f64 {
        debug_assert!(amount >= 0.0, "get amount must be non-negative, got {}", amount);
        let released = amount.min(self.current_parts);
        self.current_parts -= released;
        released
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn max_capacity(&self) -> Capacity {
        self.max_capacity
    }

    pub fn current_parts(&self) -> f64 {
        self.current_parts
    }

    /// Room left before the buffer is full
    pub fn available_space(&self) -> f64 {
        match self.max_capacity {
            Capacity::Unbounded => f64::INFINITY,
            Capacity::Bounded(limit) => (limit - self.current_parts).max(0.0),
        }
    }

    pub fn is_full(&self) -> bool {
        self.available_space() <= 0.0
    }

    pub fn is_empty(&self) -> bool {
        self.current_parts <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_put_over_capacity_fills_buffer() {
        let mut buffer = Buffer::new("b", Capacity::Bounded(100.0));
        assert_eq!(buffer.put(150.0), 100.0);
        assert_eq!(buffer.current_parts(), 100.0);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_get_from_full_buffer() {
        let mut buffer =
            Buffer::with_stock("b", Capacity::Bounded(100.0), Stock::Parts(100.0)).unwrap();
        assert_eq!(buffer.get(30.0), 30.0);
        assert_eq!(buffer.current_parts(), 70.0);
    }

    #[test]
    fn test_get_more_than_available_drains() {
        let mut buffer =
            Buffer::with_stock("b", Capacity::Bounded(100.0), Stock::Parts(40.0)).unwrap();
        assert_eq!(buffer.get(55.0), 40.0);
        assert_eq!(buffer.current_parts(), 0.0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_put_into_partially_full_buffer() {
        let mut buffer =
            Buffer::with_stock("b", Capacity::Bounded(100.0), Stock::Parts(80.0)).unwrap();
        assert_eq!(buffer.put(50.0), 20.0);
        assert_eq!(buffer.current_parts(), 100.0);
    }

    #[test]
    fn test_source_never_runs_dry() {
        let mut source = Buffer::source("supply");
        for _ in 0..10 {
            assert_eq!(source.get(1_000_000.0), 1_000_000.0);
        }
        assert!(source.current_parts().is_infinite());
        assert_eq!(source.put(5.0), 5.0);
    }

    #[test]
    fn test_invalid_stock_rejected() {
        let over = Buffer::with_stock("b", Capacity::Bounded(10.0), Stock::Parts(11.0));
        assert!(matches!(over, Err(ConfigError::InvalidBuffer { .. })));

        let negative = Buffer::with_stock("b", Capacity::Unbounded, Stock::Parts(-1.0));
        assert!(negative.is_err());

        let bounded_source = Buffer::with_stock("b", Capacity::Bounded(10.0), Stock::Inexhaustible);
        assert!(bounded_source.is_err());

        let zero_capacity = Buffer::with_stock("b", Capacity::Bounded(0.0), Stock::Parts(0.0));
        assert!(zero_capacity.is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(u32),
        Get(u32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..500).prop_map(Op::Put),
            (0u32..500).prop_map(Op::Get),
        ]
    }

    proptest! {
        #[test]
        fn prop_bounded_buffer_respects_capacity(
            capacity in 1u32..1000,
            ops in proptest::collection::vec(op_strategy(), 0..64),
        ) {
            let limit = capacity as f64;
            let mut buffer = Buffer::new("b", Capacity::Bounded(limit));
            for op in ops {
                match op {
                    Op::Put(n) => { buffer.put(n as f64); }
                    Op::Get(n) => { buffer.get(n as f64); }
                }
                prop_assert!(buffer.current_parts() >= 0.0);
                prop_assert!(buffer.current_parts() <= limit);
            }
        }

        #[test]
        fn prop_unbounded_buffer_conserves_parts(
            ops in proptest::collection::vec(op_strategy(), 0..64),
        ) {
            let mut buffer = Buffer::new("b", Capacity::Unbounded);
            let mut accepted = 0.0;
            let mut released = 0.0;
            for op in ops {
                match op {
                    Op::Put(n) => {
                        let moved = buffer.put(n as f64);
                        prop_assert_eq!(moved, n as f64);
                        accepted += moved;
                    }
                    Op::Get(n) => { released += buffer.get(n as f64); }
                }
            }
            prop_assert_eq!(buffer.current_parts(), accepted - released);
        }
    }
}
