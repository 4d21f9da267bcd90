//! Multi-hop amount resolution
//!
//! Composes the single-pool formulas across a path. Exact-input resolution
//! walks front to back feeding each hop's output into the next; exact-output
//! resolution walks back to front computing the input each hop requires.
//! Both return the full per-token amount sequence, `amounts[i]` being the
//! quantity of `path[i]` moved.

use crate::fee::FeeSchedule;
use crate::pool_traits::ReserveSource;
use crate::v2_math::V2Math;
use ixs_types::{Address, Result, RouterError, SwapPath, U256};
use tracing::trace;

/// Resolves per-hop amounts under a fee schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathResolver {
    fees: FeeSchedule,
}

impl PathResolver {
    pub fn new(fees: FeeSchedule) -> Self {
        Self { fees }
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Amounts received along `path` for an exact `amount_in`
    ///
    /// `restricted[i]` selects the fee tier of hop `i`.
    pub fn get_amounts_out<R>(
        &self,
        amount_in: U256,
        path: &[Address],
        restricted: &[bool],
        reserves: &R,
    ) -> Result<Vec<U256>>
    where
        R: ReserveSource + ?Sized,
    {
        let path = SwapPath::from_slice(path)?;
        check_flags(&path, restricted)?;

        let mut amounts = Vec::with_capacity(path.len());
        amounts.push(amount_in);
        for hop in path.hops() {
            let (reserve_in, reserve_out) = reserves.reserves(hop.input, hop.output)?;
            let fee = self.fees.for_pair(restricted[hop.index]);
            let out = V2Math::get_amount_out(amounts[hop.index], reserve_in, reserve_out, fee)?;
            trace!(hop = hop.index, %reserve_in, %reserve_out, amount_out = %out, "resolved hop");
            amounts.push(out);
        }
        Ok(amounts)
    }

    /// Amounts required along `path` to receive an exact `amount_out`
    pub fn get_amounts_in<R>(
        &self,
        amount_out: U256,
        path: &[Address],
        restricted: &[bool],
        reserves: &R,
    ) -> Result<Vec<U256>>
    where
        R: ReserveSource + ?Sized,
    {
        let path = SwapPath::from_slice(path)?;
        check_flags(&path, restricted)?;

        let mut amounts = vec![U256::zero(); path.len()];
        amounts[path.len() - 1] = amount_out;
        for hop in path.hops().rev() {
            let (reserve_in, reserve_out) = reserves.reserves(hop.input, hop.output)?;
            let fee = self.fees.for_pair(restricted[hop.index]);
            amounts[hop.index] =
                V2Math::get_amount_in(amounts[hop.index + 1], reserve_in, reserve_out, fee)?;
            trace!(hop = hop.index, amount_in = %amounts[hop.index], "resolved hop");
        }
        Ok(amounts)
    }
}

fn check_flags(path: &SwapPath, restricted: &[bool]) -> Result<()> {
    if restricted.len() < path.hop_count() {
        return Err(RouterError::invalid_path(format!(
            "{} restriction flags for {} hops",
            restricted.len(),
            path.hop_count()
        )));
    }
    Ok(())
}
