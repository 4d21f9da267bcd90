//! Constant-product AMM math in exact integers
//!
//! All quantities are raw token units held in `U256`. Every step is checked;
//! an overflow surfaces as [`RouterError::ArithmeticOverflow`] instead of
//! wrapping.
//!
//! Rounding is part of the contract: amounts paid out floor, amounts required
//! in ceil, so accumulated rounding always lands in the pool's favour.

use crate::fee::Fee;
use ixs_types::{Result, RouterError, U256};

/// Pool reserves oriented for one trade direction, plus its fee tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V2PoolState {
    pub reserve_in: U256,
    pub reserve_out: U256,
    pub fee: Fee,
}

/// V2 AMM math functions
pub struct V2Math;

impl V2Math {
    /// Equivalent amount of the other asset at the current reserve ratio
    ///
    /// `floor(amount_a * reserve_b / reserve_a)`; no fee is applied.
    pub fn quote(amount_a: U256, reserve_a: U256, reserve_b: U256) -> Result<U256> {
        if amount_a.is_zero() {
            return Err(RouterError::InsufficientAmount);
        }
        if reserve_a.is_zero() || reserve_b.is_zero() {
            return Err(RouterError::InsufficientLiquidity);
        }
        Ok(mul(amount_a, reserve_b)? / reserve_a)
    }

    /// Output received for an exact input, after the pair's fee
    ///
    /// # Arguments
    /// * `amount_in` - Input token amount (raw units)
    /// * `reserve_in` - Reserve of the input token
    /// * `reserve_out` - Reserve of the output token
    /// * `fee` - Fee tier of the pair
    pub fn get_amount_out(
        amount_in: U256,
        reserve_in: U256,
        reserve_out: U256,
        fee: Fee,
    ) -> Result<U256> {
        if amount_in.is_zero() {
            return Err(RouterError::InsufficientInputAmount);
        }
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(RouterError::InsufficientLiquidity);
        }

        let amount_in_with_fee = mul(amount_in, fee.numerator_u256())?;
        let numerator = mul(amount_in_with_fee, reserve_out)?;
        let denominator = add(mul(reserve_in, fee.denominator_u256())?, amount_in_with_fee)?;

        Ok(numerator / denominator)
    }

    /// Input required for an exact output, after the pair's fee
    ///
    /// Rounds up by adding one to the floored quotient.
    pub fn get_amount_in(
        amount_out: U256,
        reserve_in: U256,
        reserve_out: U256,
        fee: Fee,
    ) -> Result<U256> {
        if amount_out.is_zero() {
            return Err(RouterError::InsufficientOutputAmount);
        }
        if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
            return Err(RouterError::InsufficientLiquidity);
        }

        let numerator = mul(mul(reserve_in, amount_out)?, fee.denominator_u256())?;
        let denominator = mul(reserve_out - amount_out, fee.numerator_u256())?;

        add(numerator / denominator, U256::one())
    }
}

pub(crate) fn mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b).ok_or(RouterError::ArithmeticOverflow)
}

pub(crate) fn add(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b).ok_or(RouterError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee::FeeSchedule;

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    fn e18(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    fn standard() -> Fee {
        FeeSchedule::default().standard
    }

    fn restricted() -> Fee {
        FeeSchedule::default().restricted
    }

    #[test]
    fn test_quote() {
        assert_eq!(V2Math::quote(u(1), u(100), u(200)).unwrap(), u(2));
        assert_eq!(V2Math::quote(u(2), u(200), u(100)).unwrap(), u(1));
        assert_eq!(
            V2Math::quote(u(0), u(100), u(200)).unwrap_err(),
            RouterError::InsufficientAmount
        );
        assert_eq!(
            V2Math::quote(u(1), u(0), u(200)).unwrap_err(),
            RouterError::InsufficientLiquidity
        );
        assert_eq!(
            V2Math::quote(u(1), u(100), u(0)).unwrap_err(),
            RouterError::InsufficientLiquidity
        );
    }

    #[test]
    fn test_get_amount_out() {
        assert_eq!(
            V2Math::get_amount_out(u(2), u(100), u(100), standard()).unwrap(),
            u(1)
        );
        assert_eq!(
            V2Math::get_amount_out(u(0), u(100), u(100), standard()).unwrap_err(),
            RouterError::InsufficientInputAmount
        );
        assert_eq!(
            V2Math::get_amount_out(u(2), u(0), u(100), standard()).unwrap_err(),
            RouterError::InsufficientLiquidity
        );
        assert_eq!(
            V2Math::get_amount_out(u(2), u(100), u(0), standard()).unwrap_err(),
            RouterError::InsufficientLiquidity
        );
    }

    #[test]
    fn test_get_amount_out_fee_tiers() {
        let expected_standard =
            e18(2) * u(997) * e18(100) / (e18(50) * u(1000) + e18(2) * u(997));
        let expected_restricted =
            e18(2) * u(990) * e18(100) / (e18(50) * u(1000) + e18(2) * u(990));

        assert_eq!(
            V2Math::get_amount_out(e18(2), e18(50), e18(100), standard()).unwrap(),
            expected_standard
        );
        assert_eq!(
            V2Math::get_amount_out(e18(2), e18(50), e18(100), restricted()).unwrap(),
            expected_restricted
        );
        assert!(expected_restricted < expected_standard);
    }

    #[test]
    fn test_get_amount_in() {
        assert_eq!(
            V2Math::get_amount_in(u(1), u(100), u(100), standard()).unwrap(),
            u(2)
        );
        assert_eq!(
            V2Math::get_amount_in(u(0), u(100), u(100), standard()).unwrap_err(),
            RouterError::InsufficientOutputAmount
        );
        assert_eq!(
            V2Math::get_amount_in(u(1), u(0), u(100), standard()).unwrap_err(),
            RouterError::InsufficientLiquidity
        );
        assert_eq!(
            V2Math::get_amount_in(u(1), u(100), u(0), standard()).unwrap_err(),
            RouterError::InsufficientLiquidity
        );
        assert_eq!(
            V2Math::get_amount_in(u(100), u(100), u(100), standard()).unwrap_err(),
            RouterError::InsufficientLiquidity
        );
    }

    #[test]
    fn test_get_amount_in_fee_tiers() {
        let expected_standard =
            e18(50) * e18(1) * u(1000) / ((e18(100) - e18(1)) * u(997)) + u(1);
        let expected_restricted =
            e18(50) * e18(1) * u(1000) / ((e18(100) - e18(1)) * u(990)) + u(1);

        assert_eq!(
            V2Math::get_amount_in(e18(1), e18(50), e18(100), standard()).unwrap(),
            expected_standard
        );
        assert_eq!(
            V2Math::get_amount_in(e18(1), e18(50), e18(100), restricted()).unwrap(),
            expected_restricted
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(
            V2Math::get_amount_out(U256::MAX, u(100), u(100), standard()).unwrap_err(),
            RouterError::ArithmeticOverflow
        );
        assert_eq!(
            V2Math::quote(U256::MAX, u(1), u(2)).unwrap_err(),
            RouterError::ArithmeticOverflow
        );
    }
}
