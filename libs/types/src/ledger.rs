//! Collaborator interfaces consumed by the router core
//!
//! The core owns no state. Everything it needs (pair reserves, token
//! balances and metadata, swap nonces, the factory registry, native value and
//! block time) is read through these traits on every call, and every effect
//! is requested through them. Each method names the contract it talks to by
//! address, and the acting account explicitly, so a single host value can
//! stand in for the whole chain.

use crate::authorization::AuthorizationGrant;
use crate::error::Result;
use crate::pair::PairState;
use ethers::types::{Address, Signature, U256};

/// Host chain facts and native value movement
pub trait ChainApi {
    /// Active chain identifier, bound into typed-data domains
    fn chain_id(&self) -> U256;

    /// Timestamp of the block the call executes in
    fn block_timestamp(&self) -> U256;

    fn native_balance(&self, account: Address) -> U256;

    /// Move native value; fails if `to` refuses it
    fn send_native(&mut self, from: Address, to: Address, amount: U256) -> Result<()>;
}

/// Pair contract primitives
pub trait PairApi {
    fn pair_state(&self, pair: Address) -> Result<PairState>;

    /// Pay out the requested amounts to `to`, then enforce the
    /// constant-product invariant against whatever input arrived
    fn swap(&mut self, pair: Address, amount0_out: U256, amount1_out: U256, to: Address)
        -> Result<()>;

    /// Mint LP tokens to `to` for the tokens transferred in since last sync
    fn mint(&mut self, pair: Address, to: Address) -> Result<U256>;

    /// Burn the LP tokens held by the pair itself, paying both sides to `to`
    fn burn(&mut self, pair: Address, to: Address) -> Result<(U256, U256)>;
}

/// Pair registry
pub trait FactoryApi {
    fn get_pair(&self, token_a: Address, token_b: Address) -> Option<Address>;

    fn create_pair(&mut self, token_a: Address, token_b: Address, restricted: bool)
        -> Result<Address>;
}

/// Token contracts (ordinary, fee-on-transfer, restricted, LP)
pub trait TokenApi {
    fn name(&self, token: Address) -> Result<String>;

    fn symbol(&self, token: Address) -> Result<String>;

    fn balance_of(&self, token: Address, holder: Address) -> Result<U256>;

    /// `from` moves its own tokens
    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: U256)
        -> Result<()>;

    /// `spender` moves `from`'s tokens against an allowance
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()>;

    /// Standard signed approval
    #[allow(clippy::too_many_arguments)]
    fn permit(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        signature: &Signature,
    ) -> Result<()>;

    /// Whether transfers of `token` through the router need an operator's
    /// authorization
    fn is_restricted(&self, token: Address) -> Result<bool>;

    /// Current swap nonce of `holder` on a restricted token
    fn swap_nonce(&self, token: Address, holder: Address) -> Result<U256>;

    /// Whether `operator` may sign swap authorizations for `token`
    fn is_swap_operator(&self, token: Address, operator: Address) -> Result<bool>;

    /// Advance the holder's nonce; fails if it moved since verification
    fn consume_swap_authorization(&mut self, grant: &AuthorizationGrant) -> Result<()>;
}

/// Wrapped native token
pub trait WrappedNativeApi {
    /// Move `amount` native from `account` into `weth`, crediting WETH
    fn deposit(&mut self, weth: Address, account: Address, amount: U256) -> Result<()>;

    /// Burn `amount` WETH from `account`, paying native back to it
    fn withdraw(&mut self, weth: Address, account: Address, amount: U256) -> Result<()>;
}

/// All-or-nothing execution
///
/// `begin` opens a (possibly nested) transaction; `rollback` discards every
/// effect since the matching `begin`.
pub trait Transactional {
    fn begin(&mut self);

    fn commit(&mut self);

    fn rollback(&mut self);
}

/// Everything the router needs from its host
pub trait Ledger:
    ChainApi + PairApi + FactoryApi + TokenApi + WrappedNativeApi + Transactional
{
}

impl<T> Ledger for T where
    T: ChainApi + PairApi + FactoryApi + TokenApi + WrappedNativeApi + Transactional
{
}
