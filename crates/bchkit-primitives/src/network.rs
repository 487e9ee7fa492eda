//! Chain parameters.
//!
//! Each supported chain is a variant of the closed [`Network`] enum whose
//! parameters live in a plain immutable [`NetworkParams`] struct.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chainhash::Hash;
use crate::PrimitivesError;

/// Immutable parameters of one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    /// Canonical name ("livenet" or "testnet").
    pub name: &'static str,
    /// Alternative name ("mainnet" or "regtest").
    pub alias: &'static str,
    /// URI scheme used by payment requests.
    pub scheme: &'static str,
    /// P2P message start bytes.
    pub magic: u32,
    /// Default P2P port.
    pub port: u16,
    /// Version byte of pay-to-pubkey-hash addresses.
    pub pubkey_hash_prefix: u8,
    /// Version byte of pay-to-script-hash addresses.
    pub script_hash_prefix: u8,
    /// Version byte of WIF private keys.
    pub private_key_prefix: u8,
    /// BIP32 extended public key version.
    pub xpub_version: u32,
    /// BIP32 extended private key version.
    pub xprv_version: u32,
    /// Genesis block hash in display (byte-reversed) hex.
    pub genesis_hash: &'static str,
    /// Whether signatures commit to the replay-protection fork id.
    pub uses_fork_id: bool,
}

const MAINNET_GENESIS: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";
const TESTNET_GENESIS: &str = "000000000933ea01ad0ee984209779baaec3ced90fa3f408719526f8d77f4943";

const MAINNET_BCH: NetworkParams = NetworkParams {
    name: "livenet",
    alias: "mainnet",
    scheme: "bitcoincash",
    magic: 0xe3e1f3e8,
    port: 8333,
    pubkey_hash_prefix: 0x00,
    script_hash_prefix: 0x05,
    private_key_prefix: 0x80,
    xpub_version: 0x0488b21e,
    xprv_version: 0x0488ade4,
    genesis_hash: MAINNET_GENESIS,
    uses_fork_id: true,
};

const TESTNET_BCH: NetworkParams = NetworkParams {
    name: "testnet",
    alias: "regtest",
    scheme: "bchtest",
    magic: 0xf4e5f3f4,
    port: 18333,
    pubkey_hash_prefix: 0x6f,
    script_hash_prefix: 0xc4,
    private_key_prefix: 0xef,
    xpub_version: 0x043587cf,
    xprv_version: 0x04358394,
    genesis_hash: TESTNET_GENESIS,
    uses_fork_id: true,
};

const MAINNET_BTC: NetworkParams = NetworkParams {
    scheme: "bitcoin",
    magic: 0xf9beb4d9,
    uses_fork_id: false,
    ..MAINNET_BCH
};

const TESTNET_BTC: NetworkParams = NetworkParams {
    scheme: "bitcoin",
    magic: 0x0b110907,
    uses_fork_id: false,
    ..TESTNET_BCH
};

/// A supported chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Bitcoin Cash main network.
    MainnetBCH,
    /// Bitcoin Cash test network.
    TestnetBCH,
    /// Bitcoin main network.
    MainnetBTC,
    /// Bitcoin test network.
    TestnetBTC,
}

impl Network {
    /// Every supported network, Bitcoin Cash first.
    pub const ALL: [Network; 4] = [
        Network::MainnetBCH,
        Network::TestnetBCH,
        Network::MainnetBTC,
        Network::TestnetBTC,
    ];

    /// Return the parameters of this network.
    pub fn params(self) -> &'static NetworkParams {
        match self {
            Network::MainnetBCH => &MAINNET_BCH,
            Network::TestnetBCH => &TESTNET_BCH,
            Network::MainnetBTC => &MAINNET_BTC,
            Network::TestnetBTC => &TESTNET_BTC,
        }
    }

    /// Decode the genesis block hash.
    pub fn genesis_hash(self) -> Result<Hash, PrimitivesError> {
        Hash::from_hex(self.params().genesis_hash)
    }

    /// First network, in [`Network::ALL`] order, using `prefix` for WIF keys.
    pub fn from_private_key_prefix(prefix: u8) -> Option<Network> {
        Self::ALL
            .into_iter()
            .find(|n| n.params().private_key_prefix == prefix)
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::MainnetBCH
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.params();
        write!(f, "{}:{}", params.scheme, params.name)
    }
}

impl FromStr for Network {
    type Err = PrimitivesError;

    /// Parse the `scheme:name` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.to_string() == s)
            .ok_or_else(|| PrimitivesError::UnknownNetwork(s.to_string()))
    }
}
