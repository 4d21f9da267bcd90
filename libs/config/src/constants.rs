//! Router protocol constants
//!
//! Values every deployment of the router core agrees on: the LP lock-up,
//! fee tiers, typed-data type strings and the canonical deployment
//! addresses. Everything here is fixed at compile time; the tunable subset
//! (fees, addresses, chain) is mirrored in [`crate::RouterConfig`].

/// LP tokens permanently locked by the first mint of every pair
pub const MINIMUM_LIQUIDITY: u64 = 1000;

/// Fee tiers, as `numerator / DENOMINATOR` of the input that reaches the curve
pub mod fees {
    /// Ordinary pairs: 0.3%
    pub const STANDARD_NUMERATOR: u32 = 997;

    /// Pairs trading a restricted (security) token: 1%
    pub const RESTRICTED_NUMERATOR: u32 = 990;

    pub const DENOMINATOR: u32 = 1000;
}

/// EIP-712 type strings
pub mod typed_data {
    /// Version string bound into every token domain
    pub const DOMAIN_VERSION: &str = "1";

    /// Domain of ordinary ERC-20 and LP tokens
    pub const EIP712_DOMAIN: &str =
        "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

    /// Domain of wrapped security tokens, which also bind their symbol
    pub const EIP712_DOMAIN_WITH_SYMBOL: &str =
        "EIP712Domain(string name,string symbol,string version,uint256 chainId,address verifyingContract)";

    /// Operator approval of a restricted-token swap
    pub const AUTHORIZE_SWAP: &str =
        "AuthorizeSwap(address operator,address spender,uint256 nonce,uint256 deadline)";

    /// Standard signed allowance
    pub const PERMIT: &str =
        "Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";
}

/// Canonical mainnet deployment
pub mod addresses {
    use ethers::types::{Address, H160};

    /// IXS V2 factory
    pub const FACTORY: Address = H160([
        0x18, 0x8c, 0xe6, 0xfd, 0x2e, 0xd5, 0x0d, 0xca, 0xc7, 0x37, 0xab, 0x68, 0x02, 0xb5, 0x3f,
        0xc5, 0x0e, 0x75, 0x7b, 0x2f,
    ]);

    /// WETH9. Must match the token the factory's pairs were created against.
    pub const WETH: Address = H160([
        0xc0, 0x2a, 0xaa, 0x39, 0xb2, 0x23, 0xfe, 0x8d, 0x0a, 0x0e, 0x5c, 0x4f, 0x27, 0xea, 0xd9,
        0x08, 0x3c, 0x75, 0x6c, 0xc2,
    ]);

    /// Ethereum mainnet
    pub const MAINNET_CHAIN_ID: u64 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_match_checksummed_literals() {
        assert_eq!(
            addresses::FACTORY.as_bytes(),
            hex::decode("188CE6fD2Ed50dcAc737AB6802b53FC50e757b2f").unwrap()
        );
        assert_eq!(
            addresses::WETH.as_bytes(),
            hex::decode("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap()
        );
    }

    #[test]
    fn test_fee_tiers_ordered() {
        assert!(fees::RESTRICTED_NUMERATOR < fees::STANDARD_NUMERATOR);
        assert!(fees::STANDARD_NUMERATOR < fees::DENOMINATOR);
    }
}
