//! Router value, quote queries and the per-call transaction wrapper

use crate::native::NativeAdapter;
use anyhow::Context;
use ixs_amm::{FeeSchedule, LedgerReserves, PathResolver, V2Math};
use ixs_authorization::AuthorizationVerifier;
use ixs_config::RouterConfig;
use ixs_types::{
    is_expired, Address, ChainApi, FactoryApi, Ledger, PairApi, Result, RouterError, U256,
};
use tracing::{debug, info, warn};

/// Stateless swap and liquidity router
///
/// Holds only addresses and pricing/verification settings. Everything else
/// is read from the ledger on each call.
#[derive(Debug, Clone)]
pub struct Router {
    address: Address,
    factory: Address,
    weth: Address,
    pub(crate) resolver: PathResolver,
    pub(crate) verifier: AuthorizationVerifier,
}

impl Router {
    /// Router at `address` with the default fee tiers and domain version
    pub fn new(address: Address, factory: Address, weth: Address) -> Self {
        Self {
            address,
            factory,
            weth,
            resolver: PathResolver::default(),
            verifier: AuthorizationVerifier::default(),
        }
    }

    /// Router deployed at `address` on `chain`, with everything else from
    /// configuration
    ///
    /// Authorization domains are built from the chain's own id, so a
    /// configuration written for another chain is refused.
    pub fn from_config<C>(address: Address, config: &RouterConfig, chain: &C) -> anyhow::Result<Self>
    where
        C: ChainApi + ?Sized,
    {
        config.validate()?;
        let live_chain_id = chain.chain_id();
        if live_chain_id != U256::from(config.chain.chain_id) {
            anyhow::bail!(
                "chain.chain_id {} does not match the connected chain {}",
                config.chain.chain_id,
                live_chain_id
            );
        }
        let fees = FeeSchedule::from_config(&config.fees).context("invalid fee configuration")?;
        let router = Self {
            address,
            factory: config.contracts.factory,
            weth: config.contracts.weth,
            resolver: PathResolver::new(fees),
            verifier: AuthorizationVerifier::new(config.authorization.domain_version.clone()),
        };
        info!(
            router = ?address,
            factory = ?router.factory,
            weth = ?router.weth,
            chain_id = config.chain.chain_id,
            "router configured"
        );
        Ok(router)
    }

    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.resolver = PathResolver::new(fees);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn factory(&self) -> Address {
        self.factory
    }

    pub fn weth(&self) -> Address {
        self.weth
    }

    pub fn fees(&self) -> &FeeSchedule {
        self.resolver.fees()
    }

    pub fn verifier(&self) -> &AuthorizationVerifier {
        &self.verifier
    }

    pub fn native(&self) -> NativeAdapter {
        NativeAdapter::new(self.address, self.weth)
    }

    /// Equivalent amount of B for `amount_a` at the reserve ratio
    pub fn quote(&self, amount_a: U256, reserve_a: U256, reserve_b: U256) -> Result<U256> {
        V2Math::quote(amount_a, reserve_a, reserve_b)
    }

    pub fn get_amount_out(
        &self,
        amount_in: U256,
        reserve_in: U256,
        reserve_out: U256,
        restricted: bool,
    ) -> Result<U256> {
        V2Math::get_amount_out(amount_in, reserve_in, reserve_out, self.fees().for_pair(restricted))
    }

    pub fn get_amount_in(
        &self,
        amount_out: U256,
        reserve_in: U256,
        reserve_out: U256,
        restricted: bool,
    ) -> Result<U256> {
        V2Math::get_amount_in(amount_out, reserve_in, reserve_out, self.fees().for_pair(restricted))
    }

    /// Amounts along `path` for an exact input, against live reserves
    ///
    /// `restricted[i]` picks the fee tier of hop `i`.
    pub fn get_amounts_out<L>(
        &self,
        ledger: &L,
        amount_in: U256,
        path: &[Address],
        restricted: &[bool],
    ) -> Result<Vec<U256>>
    where
        L: PairApi + FactoryApi + ?Sized,
    {
        self.resolver
            .get_amounts_out(amount_in, path, restricted, &LedgerReserves::new(ledger))
    }

    /// Amounts along `path` required for an exact output, against live
    /// reserves
    pub fn get_amounts_in<L>(
        &self,
        ledger: &L,
        amount_out: U256,
        path: &[Address],
        restricted: &[bool],
    ) -> Result<Vec<U256>>
    where
        L: PairApi + FactoryApi + ?Sized,
    {
        self.resolver
            .get_amounts_in(amount_out, path, restricted, &LedgerReserves::new(ledger))
    }

    pub(crate) fn ensure_deadline<L: ChainApi + ?Sized>(&self, ledger: &L, deadline: U256) -> Result<()> {
        let now = ledger.block_timestamp();
        if is_expired(deadline, now) {
            return Err(RouterError::Expired { deadline, now });
        }
        Ok(())
    }

    /// Run `op` in its own ledger transaction
    pub(crate) fn atomically<L, T>(
        &self,
        ledger: &mut L,
        operation: &'static str,
        op: impl FnOnce(&mut L) -> Result<T>,
    ) -> Result<T>
    where
        L: Ledger + ?Sized,
    {
        ledger.begin();
        match op(ledger) {
            Ok(value) => {
                ledger.commit();
                debug!(operation, "committed");
                Ok(value)
            }
            Err(err) => {
                ledger.rollback();
                warn!(operation, error = %err, "rolled back");
                Err(err)
            }
        }
    }
}
