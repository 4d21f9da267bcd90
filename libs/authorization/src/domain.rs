//! Typed-data domains
//!
//! Every token signs under its own domain. Wrapped security tokens bind
//! their symbol into the separator; ordinary ERC-20 and LP tokens do not.

use ethers::abi::{encode, Token};
use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;
use ixs_config::constants::typed_data::{EIP712_DOMAIN, EIP712_DOMAIN_WITH_SYMBOL};
use once_cell::sync::Lazy;

static DOMAIN_TYPEHASH: Lazy<[u8; 32]> = Lazy::new(|| keccak256(EIP712_DOMAIN));
static DOMAIN_WITH_SYMBOL_TYPEHASH: Lazy<[u8; 32]> =
    Lazy::new(|| keccak256(EIP712_DOMAIN_WITH_SYMBOL));

/// Domain of one token contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip712Domain {
    pub name: String,
    /// Present only for wrapped security tokens
    pub symbol: Option<String>,
    pub version: String,
    pub chain_id: U256,
    pub verifying_contract: Address,
}

impl Eip712Domain {
    /// Domain without a symbol
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: U256,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: None,
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// `keccak256(abi.encode(typehash, keccak(name), [keccak(symbol),]
    /// keccak(version), chainId, verifyingContract))`
    pub fn separator(&self) -> H256 {
        let typehash = match self.symbol {
            Some(_) => *DOMAIN_WITH_SYMBOL_TYPEHASH,
            None => *DOMAIN_TYPEHASH,
        };

        let mut tokens = Vec::with_capacity(6);
        tokens.push(Token::FixedBytes(typehash.to_vec()));
        tokens.push(Token::FixedBytes(keccak256(self.name.as_bytes()).to_vec()));
        if let Some(symbol) = &self.symbol {
            tokens.push(Token::FixedBytes(keccak256(symbol.as_bytes()).to_vec()));
        }
        tokens.push(Token::FixedBytes(keccak256(self.version.as_bytes()).to_vec()));
        tokens.push(Token::Uint(self.chain_id));
        tokens.push(Token::Address(self.verifying_contract));

        H256(keccak256(encode(&tokens)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Eip712Domain {
        Eip712Domain::new("wLink2", "1", U256::one(), Address::repeat_byte(0x11))
    }

    #[test]
    fn test_symbol_changes_separator() {
        let plain = domain();
        let with_symbol = domain().with_symbol("wLink2");
        assert_ne!(plain.separator(), with_symbol.separator());
    }

    #[test]
    fn test_separator_binds_chain_and_contract() {
        let base = domain().with_symbol("W").separator();

        let mut other_chain = domain().with_symbol("W");
        other_chain.chain_id = U256::from(5);
        assert_ne!(base, other_chain.separator());

        let mut other_contract = domain().with_symbol("W");
        other_contract.verifying_contract = Address::repeat_byte(0x22);
        assert_ne!(base, other_contract.separator());
    }

    #[test]
    fn test_separator_layout() {
        let d = domain().with_symbol("SYM");
        let mut encoded = Vec::new();
        encoded.extend_from_slice(&keccak256(EIP712_DOMAIN_WITH_SYMBOL));
        encoded.extend_from_slice(&keccak256("wLink2"));
        encoded.extend_from_slice(&keccak256("SYM"));
        encoded.extend_from_slice(&keccak256("1"));
        let mut word = [0u8; 32];
        U256::one().to_big_endian(&mut word);
        encoded.extend_from_slice(&word);
        encoded.extend_from_slice(&[0u8; 12]);
        encoded.extend_from_slice(Address::repeat_byte(0x11).as_bytes());

        assert_eq!(d.separator(), H256(keccak256(encoded)));
    }
}
