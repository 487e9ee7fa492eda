//! secp256k1 private key.
//!
//! Wraps a k256 signing key and adds WIF import/export keyed on the
//! network's private key version byte.

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::hash::sha256d;
use crate::network::Network;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Compression flag byte appended to WIF for compressed public keys.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key for signing.
#[derive(Clone, Debug)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a raw 32-byte scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice representing the private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a valid scalar on secp256k1,
    /// or an error if the scalar is zero or out of range.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_bytes(bytes.into())
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner: signing_key })
    }

    /// Create a private key from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Decode a WIF string and return the key with the network it names.
    ///
    /// # Arguments
    /// * `wif` - A Base58Check-encoded WIF string (compressed or uncompressed).
    ///
    /// # Returns
    /// The key and the network whose private key version byte matches the
    /// prefix, or an error if the WIF is malformed or the checksum fails.
    pub fn from_wif(wif: &str) -> Result<(Self, Network), PrimitivesError> {
        let decoded = bs58::decode(wif)
            .into_vec()
            .map_err(|e| PrimitivesError::InvalidWif(e.to_string()))?;

        // prefix + key + [compress flag] + checksum
        let payload_end = match decoded.len() {
            38 if decoded[33] == COMPRESS_MAGIC => 1 + PRIVATE_KEY_BYTES_LEN + 1,
            38 => {
                return Err(PrimitivesError::InvalidWif(
                    "invalid compression flag".to_string(),
                ))
            }
            37 => 1 + PRIVATE_KEY_BYTES_LEN,
            n => {
                return Err(PrimitivesError::InvalidWif(format!(
                    "invalid length {}",
                    n
                )))
            }
        };

        let checksum = sha256d(&decoded[..payload_end]);
        if checksum[..4] != decoded[payload_end..] {
            return Err(PrimitivesError::ChecksumMismatch);
        }

        let network = Network::from_private_key_prefix(decoded[0]).ok_or_else(|| {
            PrimitivesError::InvalidWif(format!("unknown prefix 0x{:02x}", decoded[0]))
        })?;
        let key = Self::from_bytes(&decoded[1..1 + PRIVATE_KEY_BYTES_LEN])?;
        Ok((key, network))
    }

    /// Encode the private key as a compressed-key WIF string for `network`.
    pub fn to_wif(&self, network: Network) -> String {
        let mut payload = Vec::with_capacity(1 + PRIVATE_KEY_BYTES_LEN + 1 + 4);
        payload.push(network.params().private_key_prefix);
        payload.extend_from_slice(&self.to_bytes());
        payload.push(COMPRESS_MAGIC);

        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);

        bs58::encode(payload).into_string()
    }

    /// Serialize the private key as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Serialize the private key as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derive the corresponding public key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte message hash using deterministic RFC6979 nonces.
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        let mut bytes = self.inner.to_bytes();
        bytes.zeroize();
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priv_keys() {
        let key_hex = "eaf02ca348c524e6392655ba4d29603cd1a7347d9d65cfe93ce1ebffdca22694";
        let priv_key = PrivateKey::from_hex(key_hex).unwrap();
        let pub_key = priv_key.pub_key();

        let uncompressed = pub_key.to_uncompressed();
        assert_eq!(PublicKey::from_bytes(&uncompressed).unwrap(), pub_key);

        let hash = crate::hash::sha256(b"0123456789");
        let sig = priv_key.sign(&hash).unwrap();
        assert!(pub_key.verify(&hash, &sig));

        assert_eq!(priv_key.to_hex(), key_hex);
    }

    #[test]
    fn test_wif_round_trip_per_network() {
        let pk = PrivateKey::new();
        for network in [Network::MainnetBCH, Network::TestnetBCH] {
            let wif = pk.to_wif(network);
            let (decoded, decoded_network) = PrivateKey::from_wif(&wif).unwrap();
            assert_eq!(decoded, pk);
            // BCH and BTC share version bytes; the lookup yields the first match.
            assert_eq!(
                decoded_network.params().private_key_prefix,
                network.params().private_key_prefix
            );
        }
    }

    #[test]
    fn test_known_wif() {
        let (key, network) =
            PrivateKey::from_wif("L4o1GXuUSHauk19f9Cfpm1qfSXZuGLBUAC2VZM6vdmfMxRxAYkWq").unwrap();
        assert_eq!(network.params().private_key_prefix, 0x80);
        assert_eq!(key.to_wif(network), "L4o1GXuUSHauk19f9Cfpm1qfSXZuGLBUAC2VZM6vdmfMxRxAYkWq");
    }

    #[test]
    fn test_private_key_from_invalid_input() {
        assert!(PrivateKey::from_hex("").is_err());
        assert!(PrivateKey::from_hex("L4o1GXuUSHauk19f9Cfpm1qfSXZuGLBUAC2VZM6vdmfMxRxAYkWq").is_err());
        assert!(PrivateKey::from_wif("L401GXuUSHauk19f9Cfpm1qfSXZuGLBUAC2VZM6vdmfMxRxAYkWq").is_err());
        assert!(PrivateKey::from_wif("L4o1GXuUSHauk19f9Cfpm1qfSXZuGLBUAC2VZM6vdmfMxRxAYkW").is_err());
    }
}
