use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Name of the counter that numbers orders.
pub const ORDER_COUNTER: &str = "orders";

/// Type-safe identifier for Counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CounterId(pub u32);

impl From<u32> for CounterId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "counter_{}", self.0)
    }
}

/// A named monotonic sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counter {
    pub id: CounterId,
    pub name: String,
    pub seq: u64,
}

#[derive(Debug, Clone)]
pub struct CounterCreate {
    pub name: String,
}
