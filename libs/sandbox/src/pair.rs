//! Constant-product pairs and the factory registry

use crate::ledger::InMemoryLedger;
use crate::token::{TokenKind, TokenState};
use ethers::utils::keccak256;
use ixs_config::constants::MINIMUM_LIQUIDITY;
use ixs_types::{
    sort_tokens, Address, FactoryApi, PairApi, PairState, Result, RouterError, TokenApi, U256,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub(crate) struct PairRecord {
    pub(crate) token0: Address,
    pub(crate) token1: Address,
    pub(crate) reserve0: U256,
    pub(crate) reserve1: U256,
    pub(crate) is_restricted: bool,
    pub(crate) locked: bool,
}

impl PairRecord {
    fn snapshot(&self) -> PairState {
        PairState {
            token0: self.token0,
            token1: self.token1,
            reserve0: self.reserve0,
            reserve1: self.reserve1,
            is_restricted: self.is_restricted,
        }
    }
}

fn rejected(pair: Address, reason: &str) -> RouterError {
    RouterError::PairRejected {
        pair,
        reason: reason.to_string(),
    }
}

fn mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b).ok_or(RouterError::ArithmeticOverflow)
}

impl InMemoryLedger {
    pub fn pair_count(&self) -> usize {
        self.state.pairs.len()
    }

    fn record(&self, pair: Address) -> Result<PairRecord> {
        self.state
            .pairs
            .get(&pair)
            .cloned()
            .ok_or_else(|| rejected(pair, "no such pair"))
    }

    fn record_mut(&mut self, pair: Address) -> Result<&mut PairRecord> {
        self.state
            .pairs
            .get_mut(&pair)
            .ok_or_else(|| rejected(pair, "no such pair"))
    }

    fn pair_balances(&self, record: &PairRecord, pair: Address) -> Result<(U256, U256)> {
        Ok((
            self.balance_of(record.token0, pair)?,
            self.balance_of(record.token1, pair)?,
        ))
    }

    fn sync_reserves(&mut self, pair: Address, balance0: U256, balance1: U256) -> Result<()> {
        let record = self.record_mut(pair)?;
        record.reserve0 = balance0;
        record.reserve1 = balance1;
        Ok(())
    }

    fn set_lock(&mut self, pair: Address, locked: bool) -> Result<()> {
        let record = self.record_mut(pair)?;
        if locked && record.locked {
            return Err(rejected(pair, "locked"));
        }
        record.locked = locked;
        Ok(())
    }

    fn swap_inner(&mut self, pair: Address, amount0_out: U256, amount1_out: U256, to: Address) -> Result<()> {
        let record = self.record(pair)?;
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(RouterError::InsufficientOutputAmount);
        }
        if amount0_out >= record.reserve0 || amount1_out >= record.reserve1 {
            return Err(RouterError::InsufficientLiquidity);
        }
        if to == record.token0 || to == record.token1 {
            return Err(rejected(pair, "invalid recipient"));
        }

        self.set_lock(pair, true)?;
        if !amount0_out.is_zero() {
            self.move_tokens(record.token0, pair, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            self.move_tokens(record.token1, pair, to, amount1_out)?;
        }
        let (balance0, balance1) = self.pair_balances(&record, pair)?;

        let amount0_in = balance0.saturating_sub(record.reserve0 - amount0_out);
        let amount1_in = balance1.saturating_sub(record.reserve1 - amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(rejected(pair, "insufficient input amount"));
        }

        let fee = self.fees.for_pair(record.is_restricted);
        let denominator = fee.denominator_u256();
        let adjusted0 = mul(balance0, denominator)? - mul(amount0_in, fee.retained())?;
        let adjusted1 = mul(balance1, denominator)? - mul(amount1_in, fee.retained())?;
        let k_before = mul(
            mul(record.reserve0, record.reserve1)?,
            mul(denominator, denominator)?,
        )?;
        if mul(adjusted0, adjusted1)? < k_before {
            return Err(rejected(pair, "K"));
        }

        self.sync_reserves(pair, balance0, balance1)?;
        self.set_lock(pair, false)?;
        debug!(?pair, %amount0_in, %amount1_in, %amount0_out, %amount1_out, "pair swap");
        Ok(())
    }

    fn mint_inner(&mut self, pair: Address, to: Address) -> Result<U256> {
        let record = self.record(pair)?;
        self.set_lock(pair, true)?;
        let (balance0, balance1) = self.pair_balances(&record, pair)?;
        let amount0 = balance0.saturating_sub(record.reserve0);
        let amount1 = balance1.saturating_sub(record.reserve1);

        let total_supply = self.total_supply(pair)?;
        let minimum = U256::from(MINIMUM_LIQUIDITY);
        let liquidity = if total_supply.is_zero() {
            let root = mul(amount0, amount1)?.integer_sqrt();
            if root <= minimum {
                return Err(rejected(pair, "insufficient liquidity minted"));
            }
            self.mint_tokens(pair, Address::zero(), minimum)?;
            root - minimum
        } else {
            std::cmp::min(
                mul(amount0, total_supply)? / record.reserve0,
                mul(amount1, total_supply)? / record.reserve1,
            )
        };
        if liquidity.is_zero() {
            return Err(rejected(pair, "insufficient liquidity minted"));
        }

        self.mint_tokens(pair, to, liquidity)?;
        self.sync_reserves(pair, balance0, balance1)?;
        self.set_lock(pair, false)?;
        debug!(?pair, ?to, %liquidity, "pair mint");
        Ok(liquidity)
    }

    fn burn_inner(&mut self, pair: Address, to: Address) -> Result<(U256, U256)> {
        let record = self.record(pair)?;
        self.set_lock(pair, true)?;
        let (balance0, balance1) = self.pair_balances(&record, pair)?;
        let liquidity = self.balance_of(pair, pair)?;
        let total_supply = self.total_supply(pair)?;
        if total_supply.is_zero() {
            return Err(rejected(pair, "insufficient liquidity burned"));
        }

        let amount0 = mul(liquidity, balance0)? / total_supply;
        let amount1 = mul(liquidity, balance1)? / total_supply;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(rejected(pair, "insufficient liquidity burned"));
        }

        let lp = self.token_mut(pair)?;
        lp.debit(pair, pair, liquidity)?;
        lp.total_supply -= liquidity;

        self.move_tokens(record.token0, pair, to, amount0)?;
        self.move_tokens(record.token1, pair, to, amount1)?;
        let (balance0, balance1) = self.pair_balances(&record, pair)?;
        self.sync_reserves(pair, balance0, balance1)?;
        self.set_lock(pair, false)?;
        debug!(?pair, ?to, %liquidity, %amount0, %amount1, "pair burn");
        Ok((amount0, amount1))
    }
}

impl PairApi for InMemoryLedger {
    fn pair_state(&self, pair: Address) -> Result<PairState> {
        Ok(self.record(pair)?.snapshot())
    }

    fn swap(&mut self, pair: Address, amount0_out: U256, amount1_out: U256, to: Address) -> Result<()> {
        self.atomically(|ledger| ledger.swap_inner(pair, amount0_out, amount1_out, to))
    }

    fn mint(&mut self, pair: Address, to: Address) -> Result<U256> {
        self.atomically(|ledger| ledger.mint_inner(pair, to))
    }

    fn burn(&mut self, pair: Address, to: Address) -> Result<(U256, U256)> {
        self.atomically(|ledger| ledger.burn_inner(pair, to))
    }
}

impl FactoryApi for InMemoryLedger {
    fn get_pair(&self, token_a: Address, token_b: Address) -> Option<Address> {
        let key = sort_tokens(token_a, token_b).ok()?;
        self.state.pair_index.get(&key).copied()
    }

    /// Pairs touching a restricted token always take the restricted fee tier,
    /// whatever `restricted` says
    fn create_pair(&mut self, token_a: Address, token_b: Address, restricted: bool) -> Result<Address> {
        let (token0, token1) = sort_tokens(token_a, token_b)?;
        if let Some(existing) = self.state.pair_index.get(&(token0, token1)) {
            return Err(rejected(*existing, "pair exists"));
        }
        let is_restricted =
            restricted || self.is_restricted(token0)? || self.is_restricted(token1)?;

        let mut salt = token0.as_bytes().to_vec();
        salt.extend_from_slice(token1.as_bytes());
        let pair = Address::from_slice(&keccak256(salt)[12..]);

        self.state.pairs.insert(
            pair,
            PairRecord {
                token0,
                token1,
                reserve0: U256::zero(),
                reserve1: U256::zero(),
                is_restricted,
                locked: false,
            },
        );
        self.state.pair_index.insert((token0, token1), pair);
        self.state
            .tokens
            .insert(pair, TokenState::new("IXS V2", "IXS-V2", TokenKind::Liquidity));
        debug!(?pair, ?token0, ?token1, is_restricted, "pair created");
        Ok(pair)
    }
}
