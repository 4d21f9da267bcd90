//! Pair snapshots and canonical token ordering

use crate::error::{Result, RouterError};
use ethers::types::{Address, U256};

/// Read-only view of a pair at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairState {
    pub token0: Address,
    pub token1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
    /// Higher fee tier, trades a compliance-gated token
    pub is_restricted: bool,
}

impl PairState {
    /// Reserves oriented as (reserve of `token_in`, reserve of the other side)
    pub fn reserves_for(&self, token_in: Address) -> Result<(U256, U256)> {
        if token_in == self.token0 {
            Ok((self.reserve0, self.reserve1))
        } else if token_in == self.token1 {
            Ok((self.reserve1, self.reserve0))
        } else {
            Err(RouterError::PairNotFound {
                token_a: token_in,
                token_b: self.token0,
            })
        }
    }

    /// `(amount0_out, amount1_out)` for receiving `amount_out` of `token_out`
    pub fn outputs_for(&self, token_out: Address, amount_out: U256) -> (U256, U256) {
        if token_out == self.token0 {
            (amount_out, U256::zero())
        } else {
            (U256::zero(), amount_out)
        }
    }

    pub fn contains(&self, token: Address) -> bool {
        token == self.token0 || token == self.token1
    }
}

/// Order two tokens the way pairs store them (lower address first)
pub fn sort_tokens(token_a: Address, token_b: Address) -> Result<(Address, Address)> {
    if token_a == token_b {
        return Err(RouterError::IdenticalAddresses);
    }
    let (token0, token1) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };
    if token0 == Address::zero() {
        return Err(RouterError::ZeroAddress);
    }
    Ok((token0, token1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn test_sort_tokens() {
        assert_eq!(sort_tokens(addr(2), addr(1)).unwrap(), (addr(1), addr(2)));
        assert_eq!(sort_tokens(addr(1), addr(2)).unwrap(), (addr(1), addr(2)));
        assert_eq!(
            sort_tokens(addr(1), addr(1)).unwrap_err(),
            RouterError::IdenticalAddresses
        );
        assert_eq!(
            sort_tokens(Address::zero(), addr(1)).unwrap_err(),
            RouterError::ZeroAddress
        );
    }

    #[test]
    fn test_reserves_follow_input_side() {
        let pair = PairState {
            token0: addr(1),
            token1: addr(2),
            reserve0: U256::from(100),
            reserve1: U256::from(200),
            is_restricted: false,
        };
        assert_eq!(
            pair.reserves_for(addr(2)).unwrap(),
            (U256::from(200), U256::from(100))
        );
        assert_eq!(pair.outputs_for(addr(1), U256::from(5)), (U256::from(5), U256::zero()));
        assert_eq!(pair.outputs_for(addr(2), U256::from(5)), (U256::zero(), U256::from(5)));
        assert!(pair.reserves_for(addr(3)).is_err());
    }
}
