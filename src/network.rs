use alloy_primitives::Address;
use std::fmt;

/// EIP-155 chain identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chain(pub u64);

impl Chain {
    pub const MAINNET: Chain = Chain(1);
    pub const ROPSTEN: Chain = Chain(3);
    pub const RINKEBY: Chain = Chain(4);
    pub const GOERLI: Chain = Chain(5);
    pub const KOVAN: Chain = Chain(42);
    pub const SEPOLIA: Chain = Chain(11_155_111);

    pub fn id(&self) -> u64 {
        self.0
    }

    /// Base URL of the Etherscan instance serving this chain, if there is one.
    pub fn etherscan_api_base_url(&self) -> Option<&'static str> {
        match *self {
            Chain::MAINNET => Some("https://api.etherscan.io"),
            Chain::ROPSTEN => Some("https://api-ropsten.etherscan.io"),
            Chain::RINKEBY => Some("https://api-rinkeby.etherscan.io"),
            Chain::GOERLI => Some("https://api-goerli.etherscan.io"),
            Chain::KOVAN => Some("https://api-kovan.etherscan.io"),
            Chain::SEPOLIA => Some("https://api-sepolia.etherscan.io"),
            _ => None,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDefinition {
    pub chain: Chain,
    pub name: String,
}

impl NetworkDefinition {
    pub fn new(chain: Chain, name: impl Into<String>) -> Self {
        Self {
            chain,
            name: name.into(),
        }
    }

    pub fn for_chain(chain: Chain) -> Self {
        let name = match chain {
            Chain::MAINNET => "mainnet",
            Chain::ROPSTEN => "ropsten",
            Chain::RINKEBY => "rinkeby",
            Chain::GOERLI => "goerli",
            Chain::KOVAN => "kovan",
            Chain::SEPOLIA => "sepolia",
            _ => "custom",
        };
        Self::new(chain, name)
    }
}

/// A currency held by a wallet: either the chain's native currency or a contract-issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub address: Address,
    pub chain: Chain,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    /// The native currency of `chain`, keyed by the zero address.
    pub fn root(chain: Chain) -> Self {
        Self {
            address: Address::ZERO,
            chain,
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }

    pub fn is_root_token(&self) -> bool {
        self.address == Address::ZERO
    }
}
