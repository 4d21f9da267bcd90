//! Pricing Property Tests
//!
//! Properties of the constant-product formulas that must hold for any
//! reserves and amounts, independent of concrete fixtures.

use ixs_amm::{optimal_liquidity_amounts, FeeSchedule, PathResolver, ReserveBook, V2Math};
use ixs_types::{Address, U256};
use proptest::prelude::*;

fn reserve() -> impl Strategy<Value = u128> {
    1_000u128..1_000_000_000_000_000_000_000_000u128
}

proptest! {
    /// Paying the quoted input always buys at least the requested output
    #[test]
    fn amount_in_covers_amount_out(
        reserve_in in reserve(),
        reserve_out in reserve(),
        fraction in 1u128..1000,
        restricted in any::<bool>(),
    ) {
        let fee = FeeSchedule::default().for_pair(restricted);
        let reserve_in = U256::from(reserve_in);
        let reserve_out = U256::from(reserve_out);
        let amount_out = reserve_out * U256::from(fraction) / U256::from(1000u64);
        prop_assume!(!amount_out.is_zero());

        let amount_in = V2Math::get_amount_in(amount_out, reserve_in, reserve_out, fee).unwrap();
        let received = V2Math::get_amount_out(amount_in, reserve_in, reserve_out, fee).unwrap();
        prop_assert!(received >= amount_out);
    }

    /// Output never reaches the whole output reserve
    #[test]
    fn amount_out_below_reserve(
        amount_in in 1u128..u128::MAX,
        reserve_in in reserve(),
        reserve_out in reserve(),
    ) {
        let fee = FeeSchedule::default().standard;
        let out = V2Math::get_amount_out(
            U256::from(amount_in),
            U256::from(reserve_in),
            U256::from(reserve_out),
            fee,
        ).unwrap();
        prop_assert!(out < U256::from(reserve_out));
    }

    /// The restricted tier never pays more than the standard tier
    #[test]
    fn restricted_tier_pays_no_more(
        amount_in in 1u128..1_000_000_000_000_000_000_000u128,
        reserve_in in reserve(),
        reserve_out in reserve(),
    ) {
        let fees = FeeSchedule::default();
        let (a, r_in, r_out) = (U256::from(amount_in), U256::from(reserve_in), U256::from(reserve_out));
        let standard = V2Math::get_amount_out(a, r_in, r_out, fees.standard).unwrap();
        let restricted = V2Math::get_amount_out(a, r_in, r_out, fees.restricted).unwrap();
        prop_assert!(restricted <= standard);
    }

    /// The constant product never decreases across a swap
    #[test]
    fn swap_preserves_k(
        amount_in in 1u128..1_000_000_000_000_000_000_000u128,
        reserve_in in reserve(),
        reserve_out in reserve(),
    ) {
        let fee = FeeSchedule::default().standard;
        let (a, r_in, r_out) = (U256::from(amount_in), U256::from(reserve_in), U256::from(reserve_out));
        let out = V2Math::get_amount_out(a, r_in, r_out, fee).unwrap();
        prop_assert!((r_in + a) * (r_out - out) >= r_in * r_out);
    }

    /// Deposits never exceed what the caller offered
    #[test]
    fn liquidity_amounts_within_desired(
        desired_a in 1u128..1_000_000_000_000_000_000u128,
        desired_b in 1u128..1_000_000_000_000_000_000u128,
        reserve_a in reserve(),
        reserve_b in reserve(),
    ) {
        let (a, b) = optimal_liquidity_amounts(
            U256::from(desired_a),
            U256::from(desired_b),
            U256::zero(),
            U256::zero(),
            U256::from(reserve_a),
            U256::from(reserve_b),
        ).unwrap();
        prop_assert!(a <= U256::from(desired_a));
        prop_assert!(b <= U256::from(desired_b));
        prop_assert!(a == U256::from(desired_a) || b == U256::from(desired_b));
    }

    /// Multi-hop output equals chaining single hops by hand
    #[test]
    fn path_matches_chained_hops(
        amount_in in 1u64..1_000_000_000u64,
        r1 in reserve(),
        r2 in reserve(),
        r3 in reserve(),
        r4 in reserve(),
    ) {
        let (t1, t2, t3) = (
            Address::from_low_u64_be(1),
            Address::from_low_u64_be(2),
            Address::from_low_u64_be(3),
        );
        let mut book = ReserveBook::new();
        book.insert(t1, t2, U256::from(r1), U256::from(r2), false).unwrap();
        book.insert(t2, t3, U256::from(r3), U256::from(r4), true).unwrap();

        let fees = FeeSchedule::default();
        let resolver = PathResolver::new(fees);
        let result = resolver.get_amounts_out(U256::from(amount_in), &[t1, t2, t3], &[false, true], &book);

        let first = V2Math::get_amount_out(U256::from(amount_in), U256::from(r1), U256::from(r2), fees.standard);
        match (result, first) {
            (Ok(amounts), Ok(mid)) => {
                prop_assert_eq!(amounts[1], mid);
                let last = V2Math::get_amount_out(mid, U256::from(r3), U256::from(r4), fees.restricted).unwrap();
                prop_assert_eq!(amounts[2], last);
            }
            (Err(_), _) => {}
            (Ok(_), Err(e)) => prop_assert!(false, "hand chain failed: {e}"),
        }
    }
}
