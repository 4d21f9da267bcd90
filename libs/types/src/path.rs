//! Swap paths
//!
//! A path is the ordered list of tokens a trade walks through. Each adjacent
//! pair of tokens is one hop and must be backed by a pair contract.

use crate::error::{Result, RouterError};
use ethers::types::Address;

/// One step of a path: trade `input` for `output` through their pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    /// Index of the hop (0 for the first pair)
    pub index: usize,
    /// Token sent into the pair
    pub input: Address,
    /// Token received from the pair
    pub output: Address,
}

/// Validated token path of at least two tokens
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Address>", into = "Vec<Address>"))]
pub struct SwapPath {
    tokens: Vec<Address>,
}

impl SwapPath {
    /// Build a path, rejecting anything shorter than one hop
    pub fn new(tokens: Vec<Address>) -> Result<Self> {
        if tokens.len() < 2 {
            return Err(RouterError::invalid_path(format!(
                "path needs at least 2 tokens, got {}",
                tokens.len()
            )));
        }
        Ok(Self { tokens })
    }

    /// Borrowing constructor for callers holding a slice
    pub fn from_slice(tokens: &[Address]) -> Result<Self> {
        Self::new(tokens.to_vec())
    }

    pub fn tokens(&self) -> &[Address] {
        &self.tokens
    }

    /// Number of tokens (always >= 2)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false; present for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of pairs traversed
    pub fn hop_count(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn first(&self) -> Address {
        self.tokens[0]
    }

    pub fn last(&self) -> Address {
        self.tokens[self.tokens.len() - 1]
    }

    /// Hops in trade order
    pub fn hops(&self) -> impl DoubleEndedIterator<Item = Hop> + ExactSizeIterator + '_ {
        self.tokens.windows(2).enumerate().map(|(index, w)| Hop {
            index,
            input: w[0],
            output: w[1],
        })
    }

    /// Hop `index`, if it exists
    pub fn hop(&self, index: usize) -> Option<Hop> {
        if index + 1 < self.tokens.len() {
            Some(Hop {
                index,
                input: self.tokens[index],
                output: self.tokens[index + 1],
            })
        } else {
            None
        }
    }
}

impl TryFrom<Vec<Address>> for SwapPath {
    type Error = RouterError;

    fn try_from(tokens: Vec<Address>) -> Result<Self> {
        SwapPath::new(tokens)
    }
}

impl From<SwapPath> for Vec<Address> {
    fn from(path: SwapPath) -> Self {
        path.tokens
    }
}
