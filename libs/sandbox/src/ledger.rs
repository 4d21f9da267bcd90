//! Ledger state, transactions, native value and block context

use crate::pair::PairRecord;
use crate::token::TokenState;
use ethers::utils::keccak256;
use ixs_amm::FeeSchedule;
use ixs_config::constants::addresses::MAINNET_CHAIN_ID;
use ixs_types::{Address, ChainApi, Result, RouterError, Transactional, U256};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{trace, warn};

/// A completed token movement, as seen by a transfer hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEvent {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    /// Amount credited to `to` (after any transfer fee)
    pub amount: U256,
}

/// Callback run after every transfer of one token
///
/// The hook gets the ledger back mutably and may call anything on it,
/// including the router. An error fails the transfer that triggered it.
pub type TransferHook = Box<dyn FnMut(&mut InMemoryLedger, &TransferEvent) -> Result<()>>;

#[derive(Debug, Clone)]
pub(crate) struct LedgerState {
    pub(crate) chain_id: U256,
    pub(crate) timestamp: U256,
    pub(crate) native: HashMap<Address, U256>,
    pub(crate) rejects_native: HashSet<Address>,
    pub(crate) tokens: HashMap<Address, TokenState>,
    pub(crate) pairs: HashMap<Address, PairRecord>,
    pub(crate) pair_index: HashMap<(Address, Address), Address>,
    pub(crate) deployed: u64,
}

/// Whole-chain stand-in for the router's collaborators
pub struct InMemoryLedger {
    pub(crate) state: LedgerState,
    snapshots: Vec<LedgerState>,
    hooks: HashMap<Address, TransferHook>,
    pub(crate) fees: FeeSchedule,
}

impl fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("chain_id", &self.state.chain_id)
            .field("timestamp", &self.state.timestamp)
            .field("tokens", &self.state.tokens.len())
            .field("pairs", &self.state.pairs.len())
            .field("depth", &self.snapshots.len())
            .finish()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Empty chain with id 1, time 1 and the default fee tiers
    pub fn new() -> Self {
        Self::with_fees(FeeSchedule::default())
    }

    /// Empty chain whose pairs enforce `fees` in their invariant check
    pub fn with_fees(fees: FeeSchedule) -> Self {
        Self {
            state: LedgerState {
                chain_id: U256::from(MAINNET_CHAIN_ID),
                timestamp: U256::one(),
                native: HashMap::new(),
                rejects_native: HashSet::new(),
                tokens: HashMap::new(),
                pairs: HashMap::new(),
                pair_index: HashMap::new(),
                deployed: 0,
            },
            snapshots: Vec::new(),
            hooks: HashMap::new(),
            fees,
        }
    }

    pub fn set_chain_id(&mut self, chain_id: U256) {
        self.state.chain_id = chain_id;
    }

    pub fn set_timestamp(&mut self, timestamp: U256) {
        self.state.timestamp = timestamp;
    }

    pub fn advance_time(&mut self, seconds: u64) {
        self.state.timestamp = self.state.timestamp.saturating_add(U256::from(seconds));
    }

    /// Credit native value out of thin air
    pub fn fund_native(&mut self, account: Address, amount: U256) {
        let balance = self.state.native.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Make `account` refuse incoming native value
    pub fn set_rejects_native(&mut self, account: Address, rejects: bool) {
        if rejects {
            self.state.rejects_native.insert(account);
        } else {
            self.state.rejects_native.remove(&account);
        }
    }

    pub fn set_transfer_hook(&mut self, token: Address, hook: TransferHook) {
        self.hooks.insert(token, hook);
    }

    pub fn clear_transfer_hook(&mut self, token: Address) {
        self.hooks.remove(&token);
    }

    /// Open transactions
    pub fn transaction_depth(&self) -> usize {
        self.snapshots.len()
    }

    pub(crate) fn next_address(&mut self) -> Address {
        self.state.deployed += 1;
        let mut preimage = b"ixs-sandbox".to_vec();
        preimage.extend_from_slice(&self.state.deployed.to_be_bytes());
        Address::from_slice(&keccak256(preimage)[12..])
    }

    /// Run `f` in a nested transaction, rolling back on error
    pub(crate) fn atomically<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.begin();
        match f(self) {
            Ok(value) => {
                self.commit();
                Ok(value)
            }
            Err(err) => {
                self.rollback();
                Err(err)
            }
        }
    }

    /// Run the hook of `event.token`, if any
    ///
    /// The hook is detached while it runs, so transfers of the same token
    /// inside it do not re-enter it.
    pub(crate) fn notify_transfer(&mut self, event: TransferEvent) -> Result<()> {
        let Some(mut hook) = self.hooks.remove(&event.token) else {
            return Ok(());
        };
        trace!(token = ?event.token, from = ?event.from, to = ?event.to, "running transfer hook");
        let outcome = hook(self, &event);
        self.hooks.entry(event.token).or_insert(hook);
        outcome
    }
}

impl ChainApi for InMemoryLedger {
    fn chain_id(&self) -> U256 {
        self.state.chain_id
    }

    fn block_timestamp(&self) -> U256 {
        self.state.timestamp
    }

    fn native_balance(&self, account: Address) -> U256 {
        self.state.native.get(&account).copied().unwrap_or_default()
    }

    fn send_native(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let available = self.native_balance(from);
        if available < amount || self.state.rejects_native.contains(&to) {
            return Err(RouterError::EthRefundFailed { to, amount });
        }
        self.state.native.insert(from, available - amount);
        let balance = self.state.native.entry(to).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}

impl Transactional for InMemoryLedger {
    fn begin(&mut self) {
        self.snapshots.push(self.state.clone());
    }

    fn commit(&mut self) {
        if self.snapshots.pop().is_none() {
            warn!("commit without open transaction");
        }
    }

    fn rollback(&mut self) {
        match self.snapshots.pop() {
            Some(snapshot) => self.state = snapshot,
            None => warn!("rollback without open transaction"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn test_native_transfers() {
        let mut ledger = InMemoryLedger::new();
        ledger.fund_native(addr(1), U256::from(100));

        ledger.send_native(addr(1), addr(2), U256::from(40)).unwrap();
        assert_eq!(ledger.native_balance(addr(1)), U256::from(60));
        assert_eq!(ledger.native_balance(addr(2)), U256::from(40));

        assert_eq!(
            ledger.send_native(addr(1), addr(2), U256::from(61)).unwrap_err(),
            RouterError::EthRefundFailed {
                to: addr(2),
                amount: U256::from(61)
            }
        );

        ledger.set_rejects_native(addr(3), true);
        assert!(ledger.send_native(addr(1), addr(3), U256::from(1)).is_err());
    }

    #[test]
    fn test_nested_rollback() {
        let mut ledger = InMemoryLedger::new();
        ledger.fund_native(addr(1), U256::from(10));

        ledger.begin();
        ledger.fund_native(addr(1), U256::from(5));
        ledger.begin();
        ledger.fund_native(addr(1), U256::from(5));
        ledger.rollback();
        assert_eq!(ledger.native_balance(addr(1)), U256::from(15));
        ledger.commit();

        assert_eq!(ledger.native_balance(addr(1)), U256::from(15));
        assert_eq!(ledger.transaction_depth(), 0);

        ledger.begin();
        ledger.fund_native(addr(1), U256::from(5));
        ledger.rollback();
        assert_eq!(ledger.native_balance(addr(1)), U256::from(15));
    }

    #[test]
    fn test_deployed_addresses_are_distinct() {
        let mut ledger = InMemoryLedger::new();
        let a = ledger.next_address();
        let b = ledger.next_address();
        assert_ne!(a, b);
        assert!(!a.is_zero());
    }
}
