//! Liquidity-preserving deposit sizing
//!
//! A deposit must match the pool's current ratio or the excess is donated to
//! existing LPs. Given the caller's desired and minimum amounts, pick the
//! largest pair of amounts at the current ratio that fits both.

use crate::v2_math::V2Math;
use ixs_types::{Result, RouterError, SlippageKind, U256};

/// Amounts to deposit for `(token_a, token_b)` given the pool's reserves
///
/// An empty pool takes the desired amounts as-is and sets the price.
pub fn optimal_liquidity_amounts(
    amount_a_desired: U256,
    amount_b_desired: U256,
    amount_a_min: U256,
    amount_b_min: U256,
    reserve_a: U256,
    reserve_b: U256,
) -> Result<(U256, U256)> {
    if reserve_a.is_zero() && reserve_b.is_zero() {
        return Ok((amount_a_desired, amount_b_desired));
    }

    let amount_b_optimal = V2Math::quote(amount_a_desired, reserve_a, reserve_b)?;
    if amount_b_optimal <= amount_b_desired {
        if amount_b_optimal < amount_b_min {
            return Err(RouterError::SlippageExceeded {
                kind: SlippageKind::AmountBBelowMinimum,
                limit: amount_b_min,
                realized: amount_b_optimal,
            });
        }
        return Ok((amount_a_desired, amount_b_optimal));
    }

    let amount_a_optimal = V2Math::quote(amount_b_desired, reserve_b, reserve_a)?;
    // quoting B at the ratio overshot, so A at the ratio cannot exceed desired
    debug_assert!(amount_a_optimal <= amount_a_desired);
    if amount_a_optimal < amount_a_min {
        return Err(RouterError::SlippageExceeded {
            kind: SlippageKind::AmountABelowMinimum,
            limit: amount_a_min,
            realized: amount_a_optimal,
        });
    }
    Ok((amount_a_optimal, amount_b_desired))
}
