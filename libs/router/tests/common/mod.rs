//! Shared fixture: a sandbox chain with DAI, a restricted wLink2 token,
//! WETH and a router, plus a funded trader whose key can sign permits.

#![allow(dead_code)]

use ethers::signers::{LocalWallet, Signer};
use ixs_authorization::ComplianceOperator;
use ixs_config::constants::addresses::FACTORY;
use ixs_router::Router;
use ixs_sandbox::{InMemoryLedger, TokenKind};
use ixs_types::{Address, CallContext, SwapAuthorization, TokenApi, U256};

pub const OPERATOR_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TRADER_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub const START_TIME: u64 = 1_700_000_000;
pub const ONE_HOUR: u64 = 3_600;

pub fn e18(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

/// Swap and authorization deadline used throughout
pub fn deadline() -> U256 {
    U256::from(START_TIME + ONE_HOUR)
}

pub fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

pub struct Fixture {
    pub ledger: InMemoryLedger,
    pub router: Router,
    pub operator: ComplianceOperator,
    pub trader: LocalWallet,
    pub dai: Address,
    pub wlink: Address,
    pub weth: Address,
}

impl Fixture {
    /// Trader holds 10 000 of each token and 10 000 native, and has
    /// approved the router for everything
    pub fn new() -> Self {
        let mut ledger = InMemoryLedger::new();
        ledger.set_timestamp(U256::from(START_TIME));

        let weth = ledger.deploy_weth();
        let router = Router::new(addr(0x7007e7), FACTORY, weth);
        let dai = ledger.deploy_token("Dai Stablecoin", "DAI", TokenKind::Standard);
        let wlink = ledger.deploy_token("wLink2", "wLink2", TokenKind::Restricted);

        let operator = ComplianceOperator::from_private_key(OPERATOR_KEY).unwrap();
        ledger.add_swap_operator(wlink, operator.address()).unwrap();

        let trader: LocalWallet = TRADER_KEY.parse().unwrap();
        let mut fixture = Self {
            ledger,
            router,
            operator,
            trader,
            dai,
            wlink,
            weth,
        };
        let holder = fixture.trader_address();
        fixture.fund(holder, &[dai, wlink], e18(10_000));
        fixture.ledger.fund_native(holder, e18(10_000));
        fixture
    }

    pub fn trader_address(&self) -> Address {
        self.trader.address()
    }

    pub fn ctx(&self) -> CallContext {
        CallContext::new(self.trader_address())
    }

    pub fn ctx_with_value(&self, value: U256) -> CallContext {
        CallContext::with_value(self.trader_address(), value)
    }

    /// Mint `amount` of each token to `holder` and approve the router
    pub fn fund(&mut self, holder: Address, tokens: &[Address], amount: U256) {
        let router = self.router.address();
        for &token in tokens {
            self.ledger.mint_tokens(token, holder, amount).unwrap();
            self.ledger.approve(token, holder, router, U256::MAX).unwrap();
        }
    }

    pub fn deploy(&mut self, name: &str, kind: TokenKind) -> Address {
        let token = self.ledger.deploy_token(name, name, kind);
        let holder = self.trader_address();
        self.fund(holder, &[token], e18(10_000));
        token
    }

    /// Seed a `token_a`/`token_b` pool from the trader
    pub fn add_pool(&mut self, token_a: Address, token_b: Address, amount_a: U256, amount_b: U256) -> U256 {
        let ctx = self.ctx();
        let (_, _, liquidity) = self
            .router
            .add_liquidity(
                &mut self.ledger,
                &ctx,
                token_a,
                token_b,
                amount_a,
                amount_b,
                U256::zero(),
                U256::zero(),
                ctx.sender,
                deadline(),
                false,
            )
            .unwrap();
        liquidity
    }

    /// Seed a `token`/WETH pool from the trader's native balance
    pub fn add_eth_pool(&mut self, token: Address, amount_token: U256, amount_eth: U256) -> U256 {
        let ctx = self.ctx_with_value(amount_eth);
        let (_, _, liquidity) = self
            .router
            .add_liquidity_eth(
                &mut self.ledger,
                &ctx,
                token,
                amount_token,
                U256::zero(),
                U256::zero(),
                ctx.sender,
                deadline(),
                false,
            )
            .unwrap();
        liquidity
    }

    /// Operator authorization for the trader's swap `nonces_ahead` swaps
    /// from now
    pub fn authorize(&self, token: Address, nonces_ahead: u64) -> SwapAuthorization {
        let holder = self.trader_address();
        self.operator
            .authorize(
                &self.ledger,
                self.router.verifier(),
                token,
                holder,
                holder,
                deadline(),
                nonces_ahead,
            )
            .unwrap()
    }

    pub fn balance(&self, token: Address, holder: Address) -> U256 {
        self.ledger.balance_of(token, holder).unwrap()
    }

    pub fn swap_nonce(&self, token: Address) -> U256 {
        self.ledger.swap_nonce(token, self.trader_address()).unwrap()
    }
}
