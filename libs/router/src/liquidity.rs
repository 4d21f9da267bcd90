//! Liquidity provision and removal
//!
//! Deposits are sized to the pair's current ratio and minted to `to`; a pair
//! that does not exist yet is created on first deposit, restricted if asked
//! to be. Removals pull LP tokens from the caller (optionally approving the
//! router with a signed permit in the same call), burn them at the pair and
//! check the caller's minimums against what came out.

use crate::router::Router;
use ixs_amm::optimal_liquidity_amounts;
use ixs_types::{
    sort_tokens, Address, CallContext, Ledger, Permit, Result, RouterError, SlippageKind, U256,
};
use tracing::info;

impl Router {
    /// Pair for the deposit, created if missing, and the amounts to deposit
    #[allow(clippy::too_many_arguments)]
    fn size_deposit<L>(
        &self,
        ledger: &mut L,
        token_a: Address,
        token_b: Address,
        amount_a_desired: U256,
        amount_b_desired: U256,
        amount_a_min: U256,
        amount_b_min: U256,
        restricted: bool,
    ) -> Result<(Address, U256, U256)>
    where
        L: Ledger + ?Sized,
    {
        sort_tokens(token_a, token_b)?;
        let pair = match ledger.get_pair(token_a, token_b) {
            Some(pair) => pair,
            None => {
                let pair = ledger.create_pair(token_a, token_b, restricted)?;
                info!(?pair, ?token_a, ?token_b, restricted, "created pair");
                pair
            }
        };
        let (reserve_a, reserve_b) = ledger.pair_state(pair)?.reserves_for(token_a)?;
        let (amount_a, amount_b) = optimal_liquidity_amounts(
            amount_a_desired,
            amount_b_desired,
            amount_a_min,
            amount_b_min,
            reserve_a,
            reserve_b,
        )?;
        Ok((pair, amount_a, amount_b))
    }

    /// Deposit both tokens at the pair's ratio
    ///
    /// Returns `(amount_a, amount_b, liquidity)`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        token_a: Address,
        token_b: Address,
        amount_a_desired: U256,
        amount_b_desired: U256,
        amount_a_min: U256,
        amount_b_min: U256,
        to: Address,
        deadline: U256,
        restricted: bool,
    ) -> Result<(U256, U256, U256)>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "add_liquidity", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            let (pair, amount_a, amount_b) = self.size_deposit(
                ledger,
                token_a,
                token_b,
                amount_a_desired,
                amount_b_desired,
                amount_a_min,
                amount_b_min,
                restricted,
            )?;
            ledger.transfer_from(token_a, self.address(), ctx.sender, pair, amount_a)?;
            ledger.transfer_from(token_b, self.address(), ctx.sender, pair, amount_b)?;
            let liquidity = ledger.mint(pair, to)?;
            info!(?pair, sender = ?ctx.sender, ?to, %amount_a, %amount_b, %liquidity, "added liquidity");
            Ok((amount_a, amount_b, liquidity))
        })
    }

    /// Deposit `token` against the attached native value; unused value is
    /// refunded
    ///
    /// Returns `(amount_token, amount_eth, liquidity)`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity_eth<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        token: Address,
        amount_token_desired: U256,
        amount_token_min: U256,
        amount_eth_min: U256,
        to: Address,
        deadline: U256,
        restricted: bool,
    ) -> Result<(U256, U256, U256)>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "add_liquidity_eth", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            let native = self.native();
            native.receive_value(ledger, ctx.sender, ctx.value)?;
            let (pair, amount_token, amount_eth) = self.size_deposit(
                ledger,
                token,
                self.weth(),
                amount_token_desired,
                ctx.value,
                amount_token_min,
                amount_eth_min,
                restricted,
            )?;
            ledger.transfer_from(token, self.address(), ctx.sender, pair, amount_token)?;
            native.wrap(ledger, amount_eth)?;
            ledger.transfer(self.weth(), self.address(), pair, amount_eth)?;
            let liquidity = ledger.mint(pair, to)?;
            native.refund_excess(ledger, ctx.sender, ctx.value, amount_eth)?;
            info!(?pair, sender = ?ctx.sender, ?to, %amount_token, %amount_eth, %liquidity, "added ETH liquidity");
            Ok((amount_token, amount_eth, liquidity))
        })
    }

    /// Burn `liquidity` of the caller's LP tokens, paying both sides to `to`
    #[allow(clippy::too_many_arguments)]
    fn withdraw_liquidity<L>(
        &self,
        ledger: &mut L,
        sender: Address,
        token_a: Address,
        token_b: Address,
        liquidity: U256,
        amount_a_min: U256,
        amount_b_min: U256,
        to: Address,
    ) -> Result<(U256, U256)>
    where
        L: Ledger + ?Sized,
    {
        let (token0, _) = sort_tokens(token_a, token_b)?;
        let pair = self.existing_pair(ledger, token_a, token_b)?;
        ledger.transfer_from(pair, self.address(), sender, pair, liquidity)?;
        let (amount0, amount1) = ledger.burn(pair, to)?;
        let (amount_a, amount_b) = if token_a == token0 {
            (amount0, amount1)
        } else {
            (amount1, amount0)
        };
        if amount_a < amount_a_min {
            return Err(RouterError::SlippageExceeded {
                kind: SlippageKind::AmountABelowMinimum,
                limit: amount_a_min,
                realized: amount_a,
            });
        }
        if amount_b < amount_b_min {
            return Err(RouterError::SlippageExceeded {
                kind: SlippageKind::AmountBBelowMinimum,
                limit: amount_b_min,
                realized: amount_b,
            });
        }
        info!(?pair, ?sender, ?to, %liquidity, %amount_a, %amount_b, "removed liquidity");
        Ok((amount_a, amount_b))
    }

    fn existing_pair<L>(&self, ledger: &L, token_a: Address, token_b: Address) -> Result<Address>
    where
        L: Ledger + ?Sized,
    {
        ledger
            .get_pair(token_a, token_b)
            .ok_or(RouterError::PairNotFound { token_a, token_b })
    }

    /// Let the pair's LP token approve the router from `sender`'s signature
    #[allow(clippy::too_many_arguments)]
    fn apply_permit<L>(
        &self,
        ledger: &mut L,
        sender: Address,
        token_a: Address,
        token_b: Address,
        liquidity: U256,
        deadline: U256,
        permit: &Permit,
    ) -> Result<()>
    where
        L: Ledger + ?Sized,
    {
        let pair = self.existing_pair(ledger, token_a, token_b)?;
        let value = if permit.approve_max {
            U256::MAX
        } else {
            liquidity
        };
        ledger.permit(pair, sender, self.address(), value, deadline, &permit.signature)
    }

    /// Burn LP tokens for both underlying tokens
    ///
    /// Returns `(amount_a, amount_b)`.
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        token_a: Address,
        token_b: Address,
        liquidity: U256,
        amount_a_min: U256,
        amount_b_min: U256,
        to: Address,
        deadline: U256,
    ) -> Result<(U256, U256)>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "remove_liquidity", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            self.withdraw_liquidity(
                ledger,
                ctx.sender,
                token_a,
                token_b,
                liquidity,
                amount_a_min,
                amount_b_min,
                to,
            )
        })
    }

    /// Burn LP tokens of a `token`/WETH pair, paying the WETH side as native
    ///
    /// Returns `(amount_token, amount_eth)`.
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity_eth<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        token: Address,
        liquidity: U256,
        amount_token_min: U256,
        amount_eth_min: U256,
        to: Address,
        deadline: U256,
    ) -> Result<(U256, U256)>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "remove_liquidity_eth", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            self.withdraw_eth_liquidity(
                ledger,
                ctx.sender,
                token,
                liquidity,
                amount_token_min,
                amount_eth_min,
                to,
            )
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn withdraw_eth_liquidity<L>(
        &self,
        ledger: &mut L,
        sender: Address,
        token: Address,
        liquidity: U256,
        amount_token_min: U256,
        amount_eth_min: U256,
        to: Address,
    ) -> Result<(U256, U256)>
    where
        L: Ledger + ?Sized,
    {
        let (amount_token, amount_eth) = self.withdraw_liquidity(
            ledger,
            sender,
            token,
            self.weth(),
            liquidity,
            amount_token_min,
            amount_eth_min,
            self.address(),
        )?;
        ledger.transfer(token, self.address(), to, amount_token)?;
        self.native().unwrap_to(ledger, amount_eth, to)?;
        Ok((amount_token, amount_eth))
    }

    /// [`Router::remove_liquidity`] approving the router with a permit
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity_with_permit<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        token_a: Address,
        token_b: Address,
        liquidity: U256,
        amount_a_min: U256,
        amount_b_min: U256,
        to: Address,
        deadline: U256,
        permit: &Permit,
    ) -> Result<(U256, U256)>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "remove_liquidity_with_permit", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            self.apply_permit(ledger, ctx.sender, token_a, token_b, liquidity, deadline, permit)?;
            self.withdraw_liquidity(
                ledger,
                ctx.sender,
                token_a,
                token_b,
                liquidity,
                amount_a_min,
                amount_b_min,
                to,
            )
        })
    }

    /// [`Router::remove_liquidity_eth`] approving the router with a permit
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity_eth_with_permit<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        token: Address,
        liquidity: U256,
        amount_token_min: U256,
        amount_eth_min: U256,
        to: Address,
        deadline: U256,
        permit: &Permit,
    ) -> Result<(U256, U256)>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(ledger, "remove_liquidity_eth_with_permit", |ledger| {
            self.ensure_deadline(ledger, deadline)?;
            self.apply_permit(ledger, ctx.sender, token, self.weth(), liquidity, deadline, permit)?;
            self.withdraw_eth_liquidity(
                ledger,
                ctx.sender,
                token,
                liquidity,
                amount_token_min,
                amount_eth_min,
                to,
            )
        })
    }

    /// Like [`Router::remove_liquidity_eth`] for tokens that burn part of
    /// each transfer: forwards whatever token balance the router ended up
    /// with instead of the burned amount
    ///
    /// Returns the native amount paid out.
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity_eth_supporting_fee_on_transfer_tokens<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        token: Address,
        liquidity: U256,
        amount_token_min: U256,
        amount_eth_min: U256,
        to: Address,
        deadline: U256,
    ) -> Result<U256>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(
            ledger,
            "remove_liquidity_eth_supporting_fee_on_transfer_tokens",
            |ledger| {
                self.ensure_deadline(ledger, deadline)?;
                self.withdraw_fee_on_transfer_eth_liquidity(
                    ledger,
                    ctx.sender,
                    token,
                    liquidity,
                    amount_token_min,
                    amount_eth_min,
                    to,
                )
            },
        )
    }

    /// Fee-on-transfer removal approving the router with a permit
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity_eth_with_permit_supporting_fee_on_transfer_tokens<L>(
        &self,
        ledger: &mut L,
        ctx: &CallContext,
        token: Address,
        liquidity: U256,
        amount_token_min: U256,
        amount_eth_min: U256,
        to: Address,
        deadline: U256,
        permit: &Permit,
    ) -> Result<U256>
    where
        L: Ledger + ?Sized,
    {
        self.atomically(
            ledger,
            "remove_liquidity_eth_with_permit_supporting_fee_on_transfer_tokens",
            |ledger| {
                self.ensure_deadline(ledger, deadline)?;
                self.apply_permit(ledger, ctx.sender, token, self.weth(), liquidity, deadline, permit)?;
                self.withdraw_fee_on_transfer_eth_liquidity(
                    ledger,
                    ctx.sender,
                    token,
                    liquidity,
                    amount_token_min,
                    amount_eth_min,
                    to,
                )
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn withdraw_fee_on_transfer_eth_liquidity<L>(
        &self,
        ledger: &mut L,
        sender: Address,
        token: Address,
        liquidity: U256,
        amount_token_min: U256,
        amount_eth_min: U256,
        to: Address,
    ) -> Result<U256>
    where
        L: Ledger + ?Sized,
    {
        let (_, amount_eth) = self.withdraw_liquidity(
            ledger,
            sender,
            token,
            self.weth(),
            liquidity,
            amount_token_min,
            amount_eth_min,
            self.address(),
        )?;
        let held = ledger.balance_of(token, self.address())?;
        ledger.transfer(token, self.address(), to, held)?;
        self.native().unwrap_to(ledger, amount_eth, to)?;
        Ok(amount_eth)
    }
}
