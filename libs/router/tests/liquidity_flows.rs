//! Liquidity provision and removal against the sandbox chain

mod common;

use common::{addr, deadline, e18, Fixture};
use ixs_authorization::{sign_permit, PermitMessage};
use ixs_config::constants::MINIMUM_LIQUIDITY;
use ixs_sandbox::TokenKind;
use ixs_types::{
    Address, ChainApi, FactoryApi, PairApi, Permit, RouterError, SlippageKind, U256,
};

fn sign(fx: &Fixture, pair: Address, value: U256, approve_max: bool) -> Permit {
    let owner = fx.trader_address();
    let message = PermitMessage {
        owner,
        spender: fx.router.address(),
        value,
        nonce: fx.ledger.permit_nonce(pair, owner),
        deadline: deadline(),
    };
    let domain = fx.ledger.permit_domain(pair).unwrap();
    Permit {
        approve_max,
        signature: sign_permit(&fx.trader, &domain, &message).unwrap(),
    }
}

#[test]
fn test_first_deposit_creates_pair_and_locks_minimum() {
    let mut fx = Fixture::new();
    let token_a = fx.deploy("TA", TokenKind::Standard);
    let token_b = fx.deploy("TB", TokenKind::Standard);
    assert!(fx.ledger.get_pair(token_a, token_b).is_none());

    let ctx = fx.ctx();
    let (amount_a, amount_b, liquidity) = fx
        .router
        .add_liquidity(
            &mut fx.ledger,
            &ctx,
            token_a,
            token_b,
            e18(1),
            e18(4),
            U256::zero(),
            U256::zero(),
            ctx.sender,
            deadline(),
            false,
        )
        .unwrap();

    assert_eq!((amount_a, amount_b), (e18(1), e18(4)));
    assert_eq!(liquidity, e18(2) - U256::from(MINIMUM_LIQUIDITY));
    let pair = fx.ledger.get_pair(token_a, token_b).unwrap();
    assert!(!fx.ledger.pair_state(pair).unwrap().is_restricted);
    assert_eq!(fx.balance(pair, Address::zero()), U256::from(MINIMUM_LIQUIDITY));
    assert_eq!(fx.balance(pair, ctx.sender), liquidity);
}

#[test]
fn test_restricted_flag_marks_new_pair() {
    let mut fx = Fixture::new();
    let token_a = fx.deploy("TA", TokenKind::Standard);
    let token_b = fx.deploy("TB", TokenKind::Standard);
    let ctx = fx.ctx();
    fx.router
        .add_liquidity(
            &mut fx.ledger,
            &ctx,
            token_a,
            token_b,
            e18(10),
            e18(10),
            U256::zero(),
            U256::zero(),
            ctx.sender,
            deadline(),
            true,
        )
        .unwrap();
    let pair = fx.ledger.get_pair(token_a, token_b).unwrap();
    assert!(fx.ledger.pair_state(pair).unwrap().is_restricted);
}

#[test]
fn test_deposit_follows_pool_ratio() {
    let mut fx = Fixture::new();
    let token_a = fx.deploy("TA", TokenKind::Standard);
    let token_b = fx.deploy("TB", TokenKind::Standard);
    fx.add_pool(token_a, token_b, e18(10), e18(20));
    let ctx = fx.ctx();

    let (amount_a, amount_b, _) = fx
        .router
        .add_liquidity(
            &mut fx.ledger,
            &ctx,
            token_a,
            token_b,
            e18(5),
            e18(50),
            U256::zero(),
            U256::zero(),
            ctx.sender,
            deadline(),
            false,
        )
        .unwrap();
    assert_eq!((amount_a, amount_b), (e18(5), e18(10)));

    let err = fx
        .router
        .add_liquidity(
            &mut fx.ledger,
            &ctx,
            token_a,
            token_b,
            e18(5),
            e18(50),
            U256::zero(),
            e18(11),
            ctx.sender,
            deadline(),
            false,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RouterError::SlippageExceeded {
            kind: SlippageKind::AmountBBelowMinimum,
            ..
        }
    ));

    let err = fx
        .router
        .add_liquidity(
            &mut fx.ledger,
            &ctx,
            token_a,
            token_a,
            e18(1),
            e18(1),
            U256::zero(),
            U256::zero(),
            ctx.sender,
            deadline(),
            false,
        )
        .unwrap_err();
    assert_eq!(err, RouterError::IdenticalAddresses);
}

#[test]
fn test_add_liquidity_eth_refunds_excess() {
    let mut fx = Fixture::new();
    let dai = fx.dai;
    fx.add_eth_pool(dai, e18(100), e18(50));
    let trader = fx.trader_address();
    let native_before = fx.ledger.native_balance(trader);

    let ctx = fx.ctx_with_value(e18(20));
    let (amount_token, amount_eth, liquidity) = fx
        .router
        .add_liquidity_eth(
            &mut fx.ledger,
            &ctx,
            dai,
            e18(10),
            U256::zero(),
            U256::zero(),
            trader,
            deadline(),
            false,
        )
        .unwrap();

    assert_eq!((amount_token, amount_eth), (e18(10), e18(5)));
    assert!(!liquidity.is_zero());
    assert_eq!(fx.ledger.native_balance(trader), native_before - e18(5));
    assert_eq!(fx.ledger.native_balance(fx.router.address()), U256::zero());
}

#[test]
fn test_remove_liquidity_pays_both_sides() {
    let mut fx = Fixture::new();
    let token_a = fx.deploy("TA", TokenKind::Standard);
    let token_b = fx.deploy("TB", TokenKind::Standard);
    let liquidity = fx.add_pool(token_a, token_b, e18(1), e18(4));
    let pair = fx.ledger.get_pair(token_a, token_b).unwrap();
    let ctx = fx.ctx();
    let router = fx.router.address();
    fx.ledger.approve(pair, ctx.sender, router, U256::MAX).unwrap();

    let too_greedy = fx.router.remove_liquidity(
        &mut fx.ledger,
        &ctx,
        token_a,
        token_b,
        liquidity,
        e18(1),
        U256::zero(),
        ctx.sender,
        deadline(),
    );
    assert!(matches!(
        too_greedy,
        Err(RouterError::SlippageExceeded {
            kind: SlippageKind::AmountABelowMinimum,
            ..
        })
    ));
    assert_eq!(fx.balance(pair, ctx.sender), liquidity);

    // the locked minimum keeps 1000 / 2e18 of each side in the pool
    let (amount_b, amount_a) = fx
        .router
        .remove_liquidity(
            &mut fx.ledger,
            &ctx,
            token_b,
            token_a,
            liquidity,
            U256::zero(),
            U256::zero(),
            ctx.sender,
            deadline(),
        )
        .unwrap();
    assert_eq!(amount_a, e18(1) - U256::from(500));
    assert_eq!(amount_b, e18(4) - U256::from(2_000));
    assert_eq!(fx.balance(pair, ctx.sender), U256::zero());
    assert_eq!(fx.ledger.total_supply(pair).unwrap(), U256::from(MINIMUM_LIQUIDITY));
}

#[test]
fn test_remove_liquidity_of_missing_pair() {
    let mut fx = Fixture::new();
    let ctx = fx.ctx();
    let (dai, wlink) = (fx.dai, fx.wlink);
    let err = fx
        .router
        .remove_liquidity(
            &mut fx.ledger,
            &ctx,
            dai,
            wlink,
            e18(1),
            U256::zero(),
            U256::zero(),
            ctx.sender,
            deadline(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        RouterError::PairNotFound {
            token_a: dai,
            token_b: wlink
        }
    );
}

#[test]
fn test_remove_liquidity_with_permit() {
    let mut fx = Fixture::new();
    let token_a = fx.deploy("TA", TokenKind::Standard);
    let token_b = fx.deploy("TB", TokenKind::Standard);
    let liquidity = fx.add_pool(token_a, token_b, e18(1), e18(4));
    let pair = fx.ledger.get_pair(token_a, token_b).unwrap();
    let ctx = fx.ctx();

    let half = liquidity / 2;
    let permit = sign(&fx, pair, half, false);
    fx.router
        .remove_liquidity_with_permit(
            &mut fx.ledger,
            &ctx,
            token_a,
            token_b,
            half,
            U256::zero(),
            U256::zero(),
            ctx.sender,
            deadline(),
            &permit,
        )
        .unwrap();
    assert_eq!(fx.ledger.allowance(pair, ctx.sender, fx.router.address()), U256::zero());
    assert_eq!(fx.ledger.permit_nonce(pair, ctx.sender), U256::one());

    // the consumed permit cannot be replayed
    let err = fx
        .router
        .remove_liquidity_with_permit(
            &mut fx.ledger,
            &ctx,
            token_a,
            token_b,
            half,
            U256::zero(),
            U256::zero(),
            ctx.sender,
            deadline(),
            &permit,
        )
        .unwrap_err();
    assert!(matches!(err, RouterError::PermitRejected { token, .. } if token == pair));

    let permit = sign(&fx, pair, U256::MAX, true);
    fx.router
        .remove_liquidity_with_permit(
            &mut fx.ledger,
            &ctx,
            token_a,
            token_b,
            half,
            U256::zero(),
            U256::zero(),
            ctx.sender,
            deadline(),
            &permit,
        )
        .unwrap();
    assert_eq!(fx.ledger.allowance(pair, ctx.sender, fx.router.address()), U256::MAX);
}

#[test]
fn test_remove_liquidity_eth_variants() {
    let mut fx = Fixture::new();
    let (dai, weth) = (fx.dai, fx.weth);
    let liquidity = fx.add_eth_pool(dai, e18(4), e18(1));
    let pair = fx.ledger.get_pair(dai, weth).unwrap();
    let ctx = fx.ctx();
    let recipient = addr(0x5eed);

    let quarter = liquidity / 4;
    let permit = sign(&fx, pair, quarter, false);
    let (amount_token, amount_eth) = fx
        .router
        .remove_liquidity_eth_with_permit(
            &mut fx.ledger,
            &ctx,
            dai,
            quarter,
            U256::zero(),
            U256::zero(),
            recipient,
            deadline(),
            &permit,
        )
        .unwrap();
    assert_eq!(fx.balance(dai, recipient), amount_token);
    assert_eq!(fx.ledger.native_balance(recipient), amount_eth);

    let router = fx.router.address();
    fx.ledger.approve(pair, ctx.sender, router, U256::MAX).unwrap();
    let (_, more_eth) = fx
        .router
        .remove_liquidity_eth(
            &mut fx.ledger,
            &ctx,
            dai,
            quarter,
            U256::zero(),
            U256::zero(),
            recipient,
            deadline(),
        )
        .unwrap();
    assert_eq!(fx.ledger.native_balance(recipient), amount_eth + more_eth);
    assert_eq!(fx.ledger.native_balance(router), U256::zero());
    assert_eq!(fx.balance(weth, router), U256::zero());
    assert_eq!(fx.balance(dai, router), U256::zero());
}

#[test]
fn test_fee_on_transfer_removal_forwards_what_arrived() {
    let mut fx = Fixture::new();
    let deflating = fx.deploy("DTT", TokenKind::FeeOnTransfer);
    let liquidity = fx.add_eth_pool(deflating, e18(100), e18(10));
    let pair = fx.ledger.get_pair(deflating, fx.weth).unwrap();
    let ctx = fx.ctx();
    let router = fx.router.address();
    let recipient = addr(0x5eed);
    fx.ledger.approve(pair, ctx.sender, router, U256::MAX).unwrap();

    // the burned share leaves the router short of what the pair paid out
    let strict = fx.router.remove_liquidity_eth(
        &mut fx.ledger,
        &ctx,
        deflating,
        liquidity / 2,
        U256::zero(),
        U256::zero(),
        recipient,
        deadline(),
    );
    assert!(matches!(strict, Err(RouterError::TransferFailed { .. })));

    let amount_eth = fx
        .router
        .remove_liquidity_eth_supporting_fee_on_transfer_tokens(
            &mut fx.ledger,
            &ctx,
            deflating,
            liquidity / 2,
            U256::zero(),
            U256::zero(),
            recipient,
            deadline(),
        )
        .unwrap();
    assert_eq!(fx.ledger.native_balance(recipient), amount_eth);
    assert!(!fx.balance(deflating, recipient).is_zero());
    assert_eq!(fx.balance(deflating, router), U256::zero());

    let remaining = fx.balance(pair, ctx.sender);
    fx.ledger.approve(pair, ctx.sender, router, U256::zero()).unwrap();
    let permit = sign(&fx, pair, remaining, false);
    fx.router
        .remove_liquidity_eth_with_permit_supporting_fee_on_transfer_tokens(
            &mut fx.ledger,
            &ctx,
            deflating,
            remaining,
            U256::zero(),
            U256::zero(),
            recipient,
            deadline(),
            &permit,
        )
        .unwrap();
    assert_eq!(fx.balance(pair, ctx.sender), U256::zero());
    assert_eq!(fx.ledger.native_balance(router), U256::zero());
}
