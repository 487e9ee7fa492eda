/// Cryptographic primitives and chain parameters for bchkit.
///
/// This crate provides the building blocks the script interpreter and the
/// transaction layer consume:
/// - Hash functions (SHA-1, SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction identification
/// - secp256k1 keys and DER-encoded ECDSA signatures
/// - Variable-length integer encoding and a little-endian byte reader/writer
/// - Network parameters for the supported chains

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod ec;
pub mod network;

mod error;
pub use error::PrimitivesError;
pub use network::{Network, NetworkParams};
