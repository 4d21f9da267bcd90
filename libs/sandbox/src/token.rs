//! ERC-20 variants and WETH

use crate::ledger::{InMemoryLedger, TransferEvent};
use ixs_authorization::{Eip712Domain, PermitMessage, TypedMessage};
use ixs_config::constants::addresses::WETH;
use ixs_config::constants::typed_data::DOMAIN_VERSION;
use ixs_types::{
    is_expired, Address, AuthorizationGrant, Result, RouterError, Signature, TokenApi,
    WrappedNativeApi, U256,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Fee-on-transfer tokens burn `amount / FEE_ON_TRANSFER_DIVISOR` of every
/// transfer
pub const FEE_ON_TRANSFER_DIVISOR: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Standard,
    /// Burns 1% of every transfer
    FeeOnTransfer,
    /// Security token gated by operator swap authorizations
    Restricted,
    /// WETH; holds the native value backing its supply
    WrappedNative,
    /// LP token of a pair, living at the pair's address
    Liquidity,
}

#[derive(Debug, Clone)]
pub(crate) struct TokenState {
    pub(crate) name: String,
    pub(crate) symbol: String,
    pub(crate) kind: TokenKind,
    pub(crate) total_supply: U256,
    pub(crate) balances: HashMap<Address, U256>,
    pub(crate) allowances: HashMap<(Address, Address), U256>,
    pub(crate) permit_nonces: HashMap<Address, U256>,
    pub(crate) swap_nonces: HashMap<Address, U256>,
    pub(crate) operators: HashSet<Address>,
}

impl TokenState {
    pub(crate) fn new(name: &str, symbol: &str, kind: TokenKind) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            kind,
            total_supply: U256::zero(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            permit_nonces: HashMap::new(),
            swap_nonces: HashMap::new(),
            operators: HashSet::new(),
        }
    }

    pub(crate) fn balance(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    pub(crate) fn credit(&mut self, holder: Address, amount: U256) {
        let balance = self.balances.entry(holder).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub(crate) fn debit(&mut self, token: Address, holder: Address, amount: U256) -> Result<()> {
        let balance = self.balance(holder);
        if balance < amount {
            return Err(RouterError::TransferFailed {
                token,
                reason: format!("balance {balance} below {amount}"),
            });
        }
        self.balances.insert(holder, balance - amount);
        Ok(())
    }
}

impl InMemoryLedger {
    /// Deploy a token at a fresh address
    pub fn deploy_token(&mut self, name: &str, symbol: &str, kind: TokenKind) -> Address {
        let address = self.next_address();
        self.deploy_token_at(address, name, symbol, kind)
    }

    pub fn deploy_token_at(
        &mut self,
        address: Address,
        name: &str,
        symbol: &str,
        kind: TokenKind,
    ) -> Address {
        self.state
            .tokens
            .insert(address, TokenState::new(name, symbol, kind));
        debug!(?address, name, ?kind, "token deployed");
        address
    }

    /// WETH9 at its canonical address
    pub fn deploy_weth(&mut self) -> Address {
        self.deploy_token_at(WETH, "Wrapped Ether", "WETH", TokenKind::WrappedNative)
    }

    /// Mint new supply (WETH mints must go through `deposit`)
    pub fn mint_tokens(&mut self, token: Address, to: Address, amount: U256) -> Result<()> {
        let state = self.token_mut(token)?;
        if state.kind == TokenKind::WrappedNative {
            return Err(RouterError::TransferFailed {
                token,
                reason: "wrapped native supply is backed by deposits".into(),
            });
        }
        state.total_supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(RouterError::ArithmeticOverflow)?;
        state.credit(to, amount);
        Ok(())
    }

    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) -> Result<()> {
        self.token_mut(token)?
            .allowances
            .insert((owner, spender), amount);
        Ok(())
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state
            .tokens
            .get(&token)
            .and_then(|state| state.allowances.get(&(owner, spender)).copied())
            .unwrap_or_default()
    }

    pub fn total_supply(&self, token: Address) -> Result<U256> {
        Ok(self.token(token)?.total_supply)
    }

    /// Register a compliance operator of a restricted token
    pub fn add_swap_operator(&mut self, token: Address, operator: Address) -> Result<()> {
        let state = self.token_mut(token)?;
        if state.kind != TokenKind::Restricted {
            return Err(RouterError::TransferFailed {
                token,
                reason: "operators exist only on restricted tokens".into(),
            });
        }
        state.operators.insert(operator);
        Ok(())
    }

    pub fn permit_nonce(&self, token: Address, owner: Address) -> U256 {
        self.state
            .tokens
            .get(&token)
            .and_then(|state| state.permit_nonces.get(&owner).copied())
            .unwrap_or_default()
    }

    /// Domain `permit` signatures of `token` are checked under
    pub fn permit_domain(&self, token: Address) -> Result<Eip712Domain> {
        let state = self.token(token)?;
        let domain = Eip712Domain::new(
            state.name.clone(),
            DOMAIN_VERSION,
            self.state.chain_id,
            token,
        );
        Ok(match state.kind {
            TokenKind::Restricted => domain.with_symbol(state.symbol.clone()),
            _ => domain,
        })
    }

    pub(crate) fn token(&self, token: Address) -> Result<&TokenState> {
        self.state.tokens.get(&token).ok_or_else(|| unknown(token))
    }

    pub(crate) fn token_mut(&mut self, token: Address) -> Result<&mut TokenState> {
        self.state.tokens.get_mut(&token).ok_or_else(|| unknown(token))
    }

    /// Move `amount` from `from`, applying the token's transfer fee, then run
    /// its hook
    pub(crate) fn move_tokens(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        let state = self.token_mut(token)?;
        state.debit(token, from, amount)?;

        let received = if state.kind == TokenKind::FeeOnTransfer {
            let burned = amount / U256::from(FEE_ON_TRANSFER_DIVISOR);
            state.total_supply -= burned;
            amount - burned
        } else {
            amount
        };
        state.credit(to, received);

        self.notify_transfer(TransferEvent {
            token,
            from,
            to,
            amount: received,
        })
    }
}

fn unknown(token: Address) -> RouterError {
    RouterError::TransferFailed {
        token,
        reason: "no such token".into(),
    }
}

impl TokenApi for InMemoryLedger {
    fn name(&self, token: Address) -> Result<String> {
        Ok(self.token(token)?.name.clone())
    }

    fn symbol(&self, token: Address) -> Result<String> {
        Ok(self.token(token)?.symbol.clone())
    }

    fn balance_of(&self, token: Address, holder: Address) -> Result<U256> {
        Ok(self.token(token)?.balance(holder))
    }

    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        self.atomically(|ledger| ledger.move_tokens(token, from, to, amount))
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        self.atomically(|ledger| {
            if spender != from {
                let state = ledger.token_mut(token)?;
                let allowed = state
                    .allowances
                    .get(&(from, spender))
                    .copied()
                    .unwrap_or_default();
                if allowed < amount {
                    return Err(RouterError::TransferFailed {
                        token,
                        reason: format!("allowance {allowed} below {amount}"),
                    });
                }
                if allowed != U256::MAX {
                    state.allowances.insert((from, spender), allowed - amount);
                }
            }
            ledger.move_tokens(token, from, to, amount)
        })
    }

    fn permit(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        signature: &Signature,
    ) -> Result<()> {
        if is_expired(deadline, self.state.timestamp) {
            return Err(RouterError::PermitRejected {
                token,
                reason: "expired".into(),
            });
        }
        let nonce = self.permit_nonce(token, owner);
        let digest = PermitMessage {
            owner,
            spender,
            value,
            nonce,
            deadline,
        }
        .digest(&self.permit_domain(token)?);

        match signature.recover(digest) {
            Ok(signer) if signer == owner && !owner.is_zero() => {}
            _ => {
                return Err(RouterError::PermitRejected {
                    token,
                    reason: "invalid signature".into(),
                })
            }
        }

        let state = self.token_mut(token)?;
        state.permit_nonces.insert(owner, nonce + U256::one());
        state.allowances.insert((owner, spender), value);
        Ok(())
    }

    fn is_restricted(&self, token: Address) -> Result<bool> {
        Ok(self.token(token)?.kind == TokenKind::Restricted)
    }

    fn swap_nonce(&self, token: Address, holder: Address) -> Result<U256> {
        Ok(self
            .token(token)?
            .swap_nonces
            .get(&holder)
            .copied()
            .unwrap_or_default())
    }

    fn is_swap_operator(&self, token: Address, operator: Address) -> Result<bool> {
        Ok(self.token(token)?.operators.contains(&operator))
    }

    fn consume_swap_authorization(&mut self, grant: &AuthorizationGrant) -> Result<()> {
        let state = self.token_mut(grant.token)?;
        let current = state
            .swap_nonces
            .get(&grant.holder)
            .copied()
            .unwrap_or_default();
        if current != grant.nonce {
            return Err(RouterError::NonceMismatch {
                token: grant.token,
                holder: grant.holder,
                expected: current,
                supplied: grant.nonce,
            });
        }
        state.swap_nonces.insert(grant.holder, current + U256::one());
        Ok(())
    }
}

impl WrappedNativeApi for InMemoryLedger {
    fn deposit(&mut self, weth: Address, account: Address, amount: U256) -> Result<()> {
        self.atomically(|ledger| {
            if ledger.token(weth)?.kind != TokenKind::WrappedNative {
                return Err(unknown(weth));
            }
            ledger
                .send_native_unchecked(account, weth, amount)
                .map_err(|_| RouterError::TransferFailed {
                    token: weth,
                    reason: "insufficient native balance".into(),
                })?;
            let state = ledger.token_mut(weth)?;
            state.total_supply = state.total_supply.saturating_add(amount);
            state.credit(account, amount);
            Ok(())
        })
    }

    fn withdraw(&mut self, weth: Address, account: Address, amount: U256) -> Result<()> {
        self.atomically(|ledger| {
            let state = ledger.token_mut(weth)?;
            if state.kind != TokenKind::WrappedNative {
                return Err(unknown(weth));
            }
            state.debit(weth, account, amount)?;
            state.total_supply -= amount;
            ledger.send_native_unchecked(weth, account, amount)
        })
    }
}

impl InMemoryLedger {
    /// Native movement that ignores the recipient's refusal flag; WETH
    /// deposits and withdrawals are not plain sends
    fn send_native_unchecked(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        let available = self.state.native.get(&from).copied().unwrap_or_default();
        if available < amount {
            return Err(RouterError::EthRefundFailed { to, amount });
        }
        self.state.native.insert(from, available - amount);
        let balance = self.state.native.entry(to).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}
