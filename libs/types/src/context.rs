//! Per-call context

use ethers::types::{Address, U256};

/// The caller of a router operation and the native value it attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    pub value: U256,
}

impl CallContext {
    /// Call without native value
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            value: U256::zero(),
        }
    }

    pub fn with_value(sender: Address, value: U256) -> Self {
        Self { sender, value }
    }
}

/// Deadlines are exclusive: a call at or after `deadline` is expired
pub fn is_expired(deadline: U256, now: U256) -> bool {
    now >= deadline
}
