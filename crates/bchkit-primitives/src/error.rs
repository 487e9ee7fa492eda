/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, EC key handling, signature parsing and
/// binary decoding.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// The private key bytes do not form a valid secp256k1 scalar.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The public key is not a valid SEC1 encoded curve point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The signature is not valid DER or has out-of-range components.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The WIF string is malformed.
    #[error("invalid WIF format: {0}")]
    InvalidWif(String),

    /// A Base58Check checksum did not match.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A hash had the wrong length or format.
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    /// No network is known under the given name.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    /// The reader ran out of bytes.
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
