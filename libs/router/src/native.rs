//! Native value in and out of the router
//!
//! Value attached to a call is pulled into the router's account, wrapped into
//! WETH before it enters a pair, and unwrapped on the way out. Whatever the
//! operation did not use goes back to the caller, so the router's native
//! balance is zero again when the call returns.

use ixs_types::{Address, ChainApi, Result, RouterError, WrappedNativeApi, U256};
use tracing::debug;

/// Moves native value between callers, the router and WETH
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeAdapter {
    router: Address,
    weth: Address,
}

impl NativeAdapter {
    pub fn new(router: Address, weth: Address) -> Self {
        Self { router, weth }
    }

    pub fn weth(&self) -> Address {
        self.weth
    }

    /// Credit the value attached by `sender` to the router
    pub fn receive_value<L>(&self, ledger: &mut L, sender: Address, value: U256) -> Result<()>
    where
        L: ChainApi + ?Sized,
    {
        ledger.send_native(sender, self.router, value)
    }

    /// Convert `amount` of the router's native balance into WETH it holds
    pub fn wrap<L>(&self, ledger: &mut L, amount: U256) -> Result<()>
    where
        L: WrappedNativeApi + ?Sized,
    {
        debug!(%amount, "wrapping native");
        ledger.deposit(self.weth, self.router, amount)
    }

    /// Unwrap `amount` of the router's WETH and pay it to `to`
    pub fn unwrap_to<L>(&self, ledger: &mut L, amount: U256, to: Address) -> Result<()>
    where
        L: ChainApi + WrappedNativeApi + ?Sized,
    {
        debug!(%amount, ?to, "unwrapping native");
        ledger.withdraw(self.weth, self.router, amount)?;
        self.pay(ledger, to, amount)
    }

    /// Return the unused part of `received` after `spent` was wrapped
    pub fn refund_excess<L>(
        &self,
        ledger: &mut L,
        to: Address,
        received: U256,
        spent: U256,
    ) -> Result<()>
    where
        L: ChainApi + ?Sized,
    {
        let excess = received.checked_sub(spent).ok_or(RouterError::ArithmeticOverflow)?;
        if excess.is_zero() {
            return Ok(());
        }
        debug!(%excess, ?to, "refunding native");
        self.pay(ledger, to, excess)
    }

    fn pay<L>(&self, ledger: &mut L, to: Address, amount: U256) -> Result<()>
    where
        L: ChainApi + ?Sized,
    {
        ledger
            .send_native(self.router, to, amount)
            .map_err(|_| RouterError::EthRefundFailed { to, amount })
    }
}
