//! Swap operations
//!
//! Every variant takes one [`SwapAuthorization`] per path token, the
//! caller's [`CallContext`] and a deadline. Exact-input and exact-output
//! variants size the whole path up front and check the caller's bound before
//! any effect. Fee-on-transfer variants only know the first transfer in
//! advance; they size each hop from the pair's balance and check the bound
//! against the recipient's balance once every hop is settled.

use crate::plan::SwapPlan;
use crate::router::Router;
use ixs_types::{
    Address, CallContext, Ledger, Result, RouterError, SlippageKind, SwapAuthorization, U256,
};
use tracing::info;

fn output_below_minimum(limit: U256, realized: U256) -> RouterError {
    RouterError::SlippageExceeded {
        kind: SlippageKind::OutputBelowMinimum,
        limit,
        realized,
    }
}

fn input_above_maximum(limit: U256, realized: U256) -> RouterError {
    RouterError::SlippageExceeded {
        kind: SlippageKind::InputAboveMaximum,
        limit,
        realized,
    }
}

fn ensure_min_output(amount_out_min: U256, realized: U256) -> Result<()> {
    if realized < amount_out_min {
        return Err(output_below_minimum(amount_out_min, realized));
    }
    Ok(())
}

fn last(amounts: &[U256]) -> U256 {
    amounts.last().copied().unwrap_or_default()
}

/// Settle every hop and return the recipient's balance delta of the output
/// token, which falls short of the quote when that token burns on transfer
fn execute_measuring<L>(ledger: &mut L, plan: &SwapPlan, amounts: &[U256], to: Address) -> Result<U256>
where
    L: Ledger + ?Sized,
{
    let output = plan.output_token();
    let before = ledger.balance_of(output, to)?;
    plan.execute(ledger, amounts, to)?;
    let after = ledger.balance_of(output, to)?;
    Ok(after.saturating_sub(before))
}

impl Router {
    fn ensure_starts_with_weth(&self, path: &[Address]) -> Result<()> {
        if path.first() != Some(&self.weth()) {
            return Err(RouterError::invalid_path("path must start with WETH"));
        }
        Ok(())
    }

    fn ensure_ends_with_weth(&self, path: &[Address]) -> Result<()> {
        if path.last() != Some(&self.weth()) {
            return Err(RouterError::invalid_path("path must end with WETH"));
        }
        Ok(())
    }

    /// Snapshot, size exact-input and authorize
    fn plan_exact_input<L>(
        &self,
        ledger: &L,
        sender: Address,
        amount_in: U256,
        path: &[Address],
        authorizations: &[SwapAuthorization],
    ) -> Result<(SwapPlan, Vec<U256>)>
    where
        L: Ledger + ?Sized,
    {
        let mut plan = SwapPlan::snapshot(ledger, path, authorizations.len())?;
        let amounts = plan.amounts_out(&self.resolver, amount_in)?;
        plan.authorize(&self.verifier, ledger, sender, authorizations)?;
        Ok((plan, amounts))
    }

    /// Snapshot, size exact-output and authorize
    fn plan_exact_output<L>(
        &self,
        ledger: &L,
        sender: Address,
        amount_out: U256,
        path: &[Address],
        authorizations: &[SwapAuthorization],
    ) -> Result<(SwapPlan, Vec<U256>)>
    where
        L: Ledger + ?Sized,
    {
        let mut plan = SwapPlan::snapshot(ledger, path, authorizations.len())?;
        let amounts = plan.amounts_in(&self.resolver, amount_out)?;
        plan.authorize(&self.verifier, ledger, sender, authorizations)?;
        Ok((plan, amounts))
    }

    /// Snapshot and authorize; fee-on-transfer swaps size hop by hop
    fn plan_fee_on_transfer<L>(
        &self,
        ledger: &L,
        sender: Address,
        path: &[Address],
        authorizations: &[SwapAuthorization],
    ) -> Result<SwapPlan>
    where
        L: Ledger + ?Sized,
    {
        let mut plan = SwapPlan::snapshot(ledger, path, authorizations.len())?;
        plan.authorize(&self.verifier, ledger, sender, authorizations)?;
        Ok(plan)
    }

    /// Consume nonces, pull the sender's tokens into the first pair and
    /// settle every hop
    ///
    /// Returns how much of the output token `to` actually gained.
    fn settle_from_sender<L>(
        &self,
        ledger: &mut L,
        sender: Address,
        plan: &SwapPlan,
        amounts: &[U256],
        to: Address,
    ) -> Result<U256>
    where
        L: Ledger + ?Sized,
    {
        plan.consume_grants(ledger)?;
        ledger.transfer_from(plan.input_token(), self.address(), sender, plan.first_pair(), amounts[0])?;
        execute_measuring(ledger, plan, amounts, to)
    }

    /// Consume nonces, wrap the router's native value into the first pair and
    /// settle every hop
    fn settle_from_native<L>(
        &self,
        ledger: &mut L,
        plan: &SwapPlan,
        amounts: &[U256],
        to: Address,
    ) -> Result<U256>
    where
        L: Ledger + ?Sized,
    {
        plan.consume_grants(ledger)?;
        self.native().wrap(ledger, amounts[0])?;
        ledger.transfer(self.weth(), self.address(), plan.first_pair(), amounts[0])?;
        execute_measuring(ledger, plan, amounts, to)
    }

    /// Exact `amount_in` of `path[0]` for at least `amount_out_min` of the
    /// last token
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_tokens<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        amount_in: U256,
        amount_out_min: U256,
        path: &[Address],
        to: Address,
        deadline: U256,
        authorizations: &[SwapAuthorization],
    ) -> Result<Vec<U256>>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "swap_exact_tokens_for_tokens", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            let (plan, amounts) =
                self.plan_exact_input(ledger, ctx.sender, amount_in, path, authorizations)?;
            ensure_min_output(amount_out_min, last(&amounts))?;
            let received = self.settle_from_sender(ledger, ctx.sender, &plan, &amounts, to)?;
            ensure_min_output(amount_out_min, received)?;
            info!(
                sender = ?ctx.sender,
                ?to,
                amount_in = %amounts[0],
                amount_out = %last(&amounts),
                %received,
                hops = amounts.len() - 1,
                authorized = plan.grants().len(),
                "swapped exact tokens for tokens"
            );
            Ok(amounts)
        })
    }

    /// Exactly `amount_out` of the last token for at most `amount_in_max` of
    /// `path[0]`
    #[allow(clippy::too_many_arguments)]
    pub fn swap_tokens_for_exact_tokens<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        amount_out: U256,
        amount_in_max: U256,
        path: &[Address],
        to: Address,
        deadline: U256,
        authorizations: &[SwapAuthorization],
    ) -> Result<Vec<U256>>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "swap_tokens_for_exact_tokens", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            let (plan, amounts) =
                self.plan_exact_output(ledger, ctx.sender, amount_out, path, authorizations)?;
            if amounts[0] > amount_in_max {
                return Err(input_above_maximum(amount_in_max, amounts[0]));
            }
            self.settle_from_sender(ledger, ctx.sender, &plan, &amounts, to)?;
            info!(
                sender = ?ctx.sender,
                ?to,
                amount_in = %amounts[0],
                amount_out = %last(&amounts),
                "swapped tokens for exact tokens"
            );
            Ok(amounts)
        })
    }

    /// All attached native value, wrapped, for at least `amount_out_min` of
    /// the last token
    pub fn swap_exact_eth_for_tokens<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        amount_out_min: U256,
        path: &[Address],
        to: Address,
        deadline: U256,
        authorizations: &[SwapAuthorization],
    ) -> Result<Vec<U256>>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "swap_exact_eth_for_tokens", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            self.ensure_starts_with_weth(path)?;
            let (plan, amounts) =
                self.plan_exact_input(ledger, ctx.sender, ctx.value, path, authorizations)?;
            ensure_min_output(amount_out_min, last(&amounts))?;
            self.native().receive_value(ledger, ctx.sender, ctx.value)?;
            let received = self.settle_from_native(ledger, &plan, &amounts, to)?;
            ensure_min_output(amount_out_min, received)?;
            info!(
                sender = ?ctx.sender,
                ?to,
                amount_in = %amounts[0],
                amount_out = %last(&amounts),
                %received,
                "swapped exact ETH for tokens"
            );
            Ok(amounts)
        })
    }

    /// Exactly `amount_out` native for at most `amount_in_max` of `path[0]`
    #[allow(clippy::too_many_arguments)]
    pub fn swap_tokens_for_exact_eth<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        amount_out: U256,
        amount_in_max: U256,
        path: &[Address],
        to: Address,
        deadline: U256,
        authorizations: &[SwapAuthorization],
    ) -> Result<Vec<U256>>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "swap_tokens_for_exact_eth", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            self.ensure_ends_with_weth(path)?;
            let (plan, amounts) =
                self.plan_exact_output(ledger, ctx.sender, amount_out, path, authorizations)?;
            if amounts[0] > amount_in_max {
                return Err(input_above_maximum(amount_in_max, amounts[0]));
            }
            let received = self.settle_from_sender(ledger, ctx.sender, &plan, &amounts, self.address())?;
            self.native().unwrap_to(ledger, received, to)?;
            info!(
                sender = ?ctx.sender,
                ?to,
                amount_in = %amounts[0],
                amount_out = %last(&amounts),
                "swapped tokens for exact ETH"
            );
            Ok(amounts)
        })
    }

    /// Exact `amount_in` of `path[0]` for at least `amount_out_min` native
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_eth<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        amount_in: U256,
        amount_out_min: U256,
        path: &[Address],
        to: Address,
        deadline: U256,
        authorizations: &[SwapAuthorization],
    ) -> Result<Vec<U256>>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "swap_exact_tokens_for_eth", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            self.ensure_ends_with_weth(path)?;
            let (plan, amounts) =
                self.plan_exact_input(ledger, ctx.sender, amount_in, path, authorizations)?;
            ensure_min_output(amount_out_min, last(&amounts))?;
            let received = self.settle_from_sender(ledger, ctx.sender, &plan, &amounts, self.address())?;
            ensure_min_output(amount_out_min, received)?;
            self.native().unwrap_to(ledger, received, to)?;
            info!(
                sender = ?ctx.sender,
                ?to,
                amount_in = %amounts[0],
                amount_out = %last(&amounts),
                "swapped exact tokens for ETH"
            );
            Ok(amounts)
        })
    }

    /// Exactly `amount_out` of the last token for at most the attached
    /// native value; the rest is refunded
    pub fn swap_eth_for_exact_tokens<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        amount_out: U256,
        path: &[Address],
        to: Address,
        deadline: U256,
        authorizations: &[SwapAuthorization],
    ) -> Result<Vec<U256>>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "swap_eth_for_exact_tokens", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            self.ensure_starts_with_weth(path)?;
            let (plan, amounts) =
                self.plan_exact_output(ledger, ctx.sender, amount_out, path, authorizations)?;
            if amounts[0] > ctx.value {
                return Err(input_above_maximum(ctx.value, amounts[0]));
            }
            let native = self.native();
            native.receive_value(ledger, ctx.sender, ctx.value)?;
            self.settle_from_native(ledger, &plan, &amounts, to)?;
            native.refund_excess(ledger, ctx.sender, ctx.value, amounts[0])?;
            info!(
                sender = ?ctx.sender,
                ?to,
                amount_in = %amounts[0],
                refunded = %(ctx.value - amounts[0]),
                "swapped ETH for exact tokens"
            );
            Ok(amounts)
        })
    }

    /// Exact-input swap through tokens that may burn part of each transfer
    ///
    /// Returns what `to` actually received.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        amount_in: U256,
        amount_out_min: U256,
        path: &[Address],
        to: Address,
        deadline: U256,
        authorizations: &[SwapAuthorization],
    ) -> Result<U256>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(
            ledger,
            "swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens",
            |ledger| {
                self.ensure_deadline(ledger, deadline)?;
                let plan = self.plan_fee_on_transfer(ledger, ctx.sender, path, authorizations)?;
                plan.consume_grants(ledger)?;
                ledger.transfer_from(
                    plan.input_token(),
                    self.address(),
                    ctx.sender,
                    plan.first_pair(),
                    amount_in,
                )?;
                let received = self.settle_measuring(ledger, &plan, to)?;
                ensure_min_output(amount_out_min, received)?;
                info!(sender = ?ctx.sender, ?to, %amount_in, %received, "swapped fee-on-transfer tokens");
                Ok(received)
            },
        )
    }

    /// Fee-on-transfer variant of [`Router::swap_exact_eth_for_tokens`]
    pub fn swap_exact_eth_for_tokens_supporting_fee_on_transfer_tokens<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        amount_out_min: U256,
        path: &[Address],
        to: Address,
        deadline: U256,
        authorizations: &[SwapAuthorization],
    ) -> Result<U256>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(
            ledger,
            "swap_exact_eth_for_tokens_supporting_fee_on_transfer_tokens",
            |ledger| {
                self.ensure_deadline(ledger, deadline)?;
                self.ensure_starts_with_weth(path)?;
                let plan = self.plan_fee_on_transfer(ledger, ctx.sender, path, authorizations)?;
                let native = self.native();
                native.receive_value(ledger, ctx.sender, ctx.value)?;
                plan.consume_grants(ledger)?;
                native.wrap(ledger, ctx.value)?;
                ledger.transfer(self.weth(), self.address(), plan.first_pair(), ctx.value)?;
                let received = self.settle_measuring(ledger, &plan, to)?;
                ensure_min_output(amount_out_min, received)?;
                info!(sender = ?ctx.sender, ?to, amount_in = %ctx.value, %received, "swapped ETH for fee-on-transfer tokens");
                Ok(received)
            },
        )
    }

    /// Fee-on-transfer variant of [`Router::swap_exact_tokens_for_eth`]
    ///
    /// The bound applies to the WETH the router received from the last pair.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_eth_supporting_fee_on_transfer_tokens<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        amount_in: U256,
        amount_out_min: U256,
        path: &[Address],
        to: Address,
        deadline: U256,
        authorizations: &[SwapAuthorization],
    ) -> Result<U256>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(
            ledger,
            "swap_exact_tokens_for_eth_supporting_fee_on_transfer_tokens",
            |ledger| {
                self.ensure_deadline(ledger, deadline)?;
                self.ensure_ends_with_weth(path)?;
                let plan = self.plan_fee_on_transfer(ledger, ctx.sender, path, authorizations)?;
                plan.consume_grants(ledger)?;
                ledger.transfer_from(
                    plan.input_token(),
                    self.address(),
                    ctx.sender,
                    plan.first_pair(),
                    amount_in,
                )?;
                let received = self.settle_measuring(ledger, &plan, self.address())?;
                ensure_min_output(amount_out_min, received)?;
                self.native().unwrap_to(ledger, received, to)?;
                info!(sender = ?ctx.sender, ?to, %amount_in, %received, "swapped fee-on-transfer tokens for ETH");
                Ok(received)
            },
        )
    }

    /// Settle fee-on-transfer hops and return how much of the output token
    /// `to` gained
    fn settle_measuring<L>(&self, ledger: &mut L, plan: &SwapPlan, to: Address) -> Result<U256>
    where
        L: Ledger + ?Sized,
    {
        let output = plan.output_token();
        let before = ledger.balance_of(output, to)?;
        plan.execute_supporting_fee_on_transfer(ledger, self.fees(), to)?;
        let after = ledger.balance_of(output, to)?;
        Ok(after.saturating_sub(before))
    }
}
