//! Pool and reserve-source abstractions
//!
//! [`AmmPool`] prices one pool in one direction. [`ReserveSource`] is the
//! read-only lookup the path resolver uses to find the reserves of every hop;
//! it is implemented over a live ledger ([`LedgerReserves`]) and over a plain
//! in-memory book ([`ReserveBook`]) for offline quoting.

use crate::fee::Fee;
use crate::v2_math::{V2Math, V2PoolState};
use ixs_types::{sort_tokens, Address, FactoryApi, PairApi, PairState, Result, RouterError, U256};
use std::collections::HashMap;

/// Unified single-pool pricing interface
pub trait AmmPool {
    /// Calculate output amount for given input
    fn get_amount_out(&self, amount_in: U256) -> Result<U256>;

    /// Calculate required input for desired output
    fn get_amount_in(&self, amount_out: U256) -> Result<U256>;

    /// Reserves as (in, out)
    fn get_liquidity(&self) -> (U256, U256);

    fn fee(&self) -> Fee;
}

impl AmmPool for V2PoolState {
    fn get_amount_out(&self, amount_in: U256) -> Result<U256> {
        V2Math::get_amount_out(amount_in, self.reserve_in, self.reserve_out, self.fee)
    }

    fn get_amount_in(&self, amount_out: U256) -> Result<U256> {
        V2Math::get_amount_in(amount_out, self.reserve_in, self.reserve_out, self.fee)
    }

    fn get_liquidity(&self) -> (U256, U256) {
        (self.reserve_in, self.reserve_out)
    }

    fn fee(&self) -> Fee {
        self.fee
    }
}

/// Read-only access to the reserves of a hop
pub trait ReserveSource {
    /// Reserves oriented as (reserve of `token_in`, reserve of `token_out`)
    fn reserves(&self, token_in: Address, token_out: Address) -> Result<(U256, U256)>;
}

/// Reserve lookups against a live ledger: factory for the address, pair for
/// the state. Nothing is cached between calls.
pub struct LedgerReserves<'a, L: ?Sized> {
    ledger: &'a L,
}

impl<'a, L> LedgerReserves<'a, L>
where
    L: PairApi + FactoryApi + ?Sized,
{
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Full snapshot of the pair behind a hop
    pub fn pair_for(&self, token_a: Address, token_b: Address) -> Result<(Address, PairState)> {
        sort_tokens(token_a, token_b)?;
        let pair = self
            .ledger
            .get_pair(token_a, token_b)
            .ok_or(RouterError::PairNotFound { token_a, token_b })?;
        Ok((pair, self.ledger.pair_state(pair)?))
    }
}

impl<'a, L> ReserveSource for LedgerReserves<'a, L>
where
    L: PairApi + FactoryApi + ?Sized,
{
    fn reserves(&self, token_in: Address, token_out: Address) -> Result<(U256, U256)> {
        let (_, state) = self.pair_for(token_in, token_out)?;
        state.reserves_for(token_in)
    }
}

/// Reserves keyed by canonical token pair, for quoting without a ledger
#[derive(Debug, Clone, Default)]
pub struct ReserveBook {
    pairs: HashMap<(Address, Address), PairState>,
}

impl ReserveBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record reserves for `token_a`/`token_b` (given in that order)
    pub fn insert(
        &mut self,
        token_a: Address,
        token_b: Address,
        reserve_a: U256,
        reserve_b: U256,
        is_restricted: bool,
    ) -> Result<()> {
        let (token0, token1) = sort_tokens(token_a, token_b)?;
        let (reserve0, reserve1) = if token0 == token_a {
            (reserve_a, reserve_b)
        } else {
            (reserve_b, reserve_a)
        };
        self.pairs.insert(
            (token0, token1),
            PairState {
                token0,
                token1,
                reserve0,
                reserve1,
                is_restricted,
            },
        );
        Ok(())
    }

    pub fn get(&self, token_a: Address, token_b: Address) -> Option<&PairState> {
        let key = sort_tokens(token_a, token_b).ok()?;
        self.pairs.get(&key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl ReserveSource for ReserveBook {
    fn reserves(&self, token_in: Address, token_out: Address) -> Result<(U256, U256)> {
        sort_tokens(token_in, token_out)?;
        let state = self.get(token_in, token_out).ok_or(RouterError::PairNotFound {
            token_a: token_in,
            token_b: token_out,
        })?;
        state.reserves_for(token_in)
    }
}
