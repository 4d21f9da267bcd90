//! Two-phase swap execution
//!
//! The snapshot phase reads every pair on the path, sizes the trade and
//! verifies authorizations without touching the ledger. Only then does the
//! effects phase consume nonces and move tokens. Nothing computed in the
//! snapshot phase is re-validated against state that an external call could
//! have changed, except where the effects phase explicitly re-reads it
//! (fee-on-transfer hops, final balance checks).

use ixs_amm::{FeeSchedule, LedgerReserves, PathResolver, ReserveBook, V2Math};
use ixs_authorization::{AuthorizationVerifier, Verdict};
use ixs_types::{
    Address, AuthorizationGrant, ChainApi, FactoryApi, PairApi, PairState, Result, RouterError,
    SwapAuthorization, SwapPath, TokenApi, U256,
};
use tracing::{debug, trace};

/// One hop of a planned swap, with the pair as it was before any effect
#[derive(Debug, Clone, Copy)]
pub(crate) struct HopPlan {
    pub(crate) pair: Address,
    pub(crate) state: PairState,
    pub(crate) input: Address,
    pub(crate) output: Address,
}

#[derive(Debug, Clone)]
pub(crate) struct SwapPlan {
    path: SwapPath,
    hops: Vec<HopPlan>,
    grants: Vec<AuthorizationGrant>,
}

impl SwapPlan {
    /// Validate `path` against the supplied authorizations and snapshot
    /// every pair it crosses
    pub(crate) fn snapshot<L>(ledger: &L, path: &[Address], authorization_count: usize) -> Result<Self>
    where
        L: PairApi + FactoryApi + ?Sized,
    {
        let path = SwapPath::from_slice(path)?;
        if authorization_count != path.len() {
            return Err(RouterError::AuthorizationCountMismatch {
                expected: path.len(),
                supplied: authorization_count,
            });
        }

        let reserves = LedgerReserves::new(ledger);
        let hops = path
            .hops()
            .map(|hop| {
                let (pair, state) = reserves.pair_for(hop.input, hop.output)?;
                Ok(HopPlan {
                    pair,
                    state,
                    input: hop.input,
                    output: hop.output,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path,
            hops,
            grants: Vec::new(),
        })
    }

    pub(crate) fn first_pair(&self) -> Address {
        self.hops[0].pair
    }

    pub(crate) fn input_token(&self) -> Address {
        self.path.first()
    }

    pub(crate) fn output_token(&self) -> Address {
        self.path.last()
    }

    pub(crate) fn grants(&self) -> &[AuthorizationGrant] {
        &self.grants
    }

    fn restricted_flags(&self) -> Vec<bool> {
        self.hops.iter().map(|hop| hop.state.is_restricted).collect()
    }

    fn reserve_book(&self) -> Result<ReserveBook> {
        let mut book = ReserveBook::new();
        for hop in &self.hops {
            book.insert(
                hop.state.token0,
                hop.state.token1,
                hop.state.reserve0,
                hop.state.reserve1,
                hop.state.is_restricted,
            )?;
        }
        Ok(book)
    }

    /// Exact-input sizing over the snapshot
    pub(crate) fn amounts_out(&self, resolver: &PathResolver, amount_in: U256) -> Result<Vec<U256>> {
        resolver.get_amounts_out(
            amount_in,
            self.path.tokens(),
            &self.restricted_flags(),
            &self.reserve_book()?,
        )
    }

    /// Exact-output sizing over the snapshot
    pub(crate) fn amounts_in(&self, resolver: &PathResolver, amount_out: U256) -> Result<Vec<U256>> {
        resolver.get_amounts_in(
            amount_out,
            self.path.tokens(),
            &self.restricted_flags(),
            &self.reserve_book()?,
        )
    }

    /// Verify the authorization of every path token for `sender`
    ///
    /// A restricted token appearing more than once on the path is verified
    /// and consumed once.
    pub(crate) fn authorize<L>(
        &mut self,
        verifier: &AuthorizationVerifier,
        ledger: &L,
        sender: Address,
        authorizations: &[SwapAuthorization],
    ) -> Result<()>
    where
        L: ChainApi + TokenApi + ?Sized,
    {
        for (index, (&token, authorization)) in self.path.tokens().iter().zip(authorizations).enumerate() {
            // One grant covers every hop through its token; later entries for
            // the same token are never verified.
            if self.grants.iter().any(|grant| grant.token == token) {
                trace!(?token, position = index, "token already authorized earlier on the path");
                continue;
            }
            if let Verdict::Granted(grant) =
                verifier.verify(ledger, token, sender, sender, authorization)?
            {
                self.grants.push(grant);
            }
        }
        Ok(())
    }

    /// Advance the holder's nonce on every authorized token
    pub(crate) fn consume_grants<L>(&self, ledger: &mut L) -> Result<()>
    where
        L: TokenApi + ?Sized,
    {
        for grant in &self.grants {
            ledger.consume_swap_authorization(grant)?;
        }
        Ok(())
    }

    fn recipient_after(&self, index: usize, to: Address) -> Address {
        self.hops.get(index + 1).map_or(to, |next| next.pair)
    }

    /// Settle every hop with the precomputed `amounts`
    ///
    /// The input must already sit in the first pair.
    pub(crate) fn execute<L>(&self, ledger: &mut L, amounts: &[U256], to: Address) -> Result<()>
    where
        L: PairApi + ?Sized,
    {
        for (index, hop) in self.hops.iter().enumerate() {
            let amount_out = amounts[index + 1];
            let (amount0_out, amount1_out) = hop.state.outputs_for(hop.output, amount_out);
            let recipient = self.recipient_after(index, to);
            debug!(hop = index, pair = ?hop.pair, %amount_out, ?recipient, "settling hop");
            ledger.swap(hop.pair, amount0_out, amount1_out, recipient)?;
        }
        Ok(())
    }

    /// Settle every hop sizing from what each pair actually received
    ///
    /// Each hop re-reads the pair's reserves and its balance of the input
    /// token; the difference is the input that arrived after any transfer
    /// fee.
    pub(crate) fn execute_supporting_fee_on_transfer<L>(
        &self,
        ledger: &mut L,
        fees: &FeeSchedule,
        to: Address,
    ) -> Result<()>
    where
        L: PairApi + TokenApi + ?Sized,
    {
        for (index, hop) in self.hops.iter().enumerate() {
            let state = ledger.pair_state(hop.pair)?;
            let (reserve_in, reserve_out) = state.reserves_for(hop.input)?;
            let amount_in = ledger
                .balance_of(hop.input, hop.pair)?
                .checked_sub(reserve_in)
                .ok_or(RouterError::InsufficientInputAmount)?;
            let amount_out = V2Math::get_amount_out(
                amount_in,
                reserve_in,
                reserve_out,
                fees.for_pair(state.is_restricted),
            )?;
            let (amount0_out, amount1_out) = state.outputs_for(hop.output, amount_out);
            let recipient = self.recipient_after(index, to);
            debug!(hop = index, pair = ?hop.pair, %amount_in, %amount_out, ?recipient, "settling hop");
            ledger.swap(hop.pair, amount0_out, amount1_out, recipient)?;
        }
        Ok(())
    }
}
