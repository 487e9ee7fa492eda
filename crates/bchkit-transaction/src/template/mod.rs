//! Unlocking script templates for common locking script types.
//!
//! Provides the `UnlockingScriptTemplate` trait with P2PKH and multisig
//! implementations that sign an input and build its unlocking script.
//! Locking scripts themselves come from `bchkit_script::template`.

pub mod multisig;
pub mod p2pkh;

use bchkit_primitives::ec::PrivateKey;
use bchkit_script::Script;

use crate::sighash::SighashType;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Trait for script templates that produce unlocking scripts.
///
/// The `sign` method receives the full transaction and the input index,
/// computes the appropriate signature hash, signs it, and returns the
/// unlocking script.
pub trait UnlockingScriptTemplate {
    /// Produce an unlocking script for the given input.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError>;

    /// Estimate the byte length of the unlocking script, for fee
    /// calculation before the signature exists.
    fn estimate_length(&self, tx: &Transaction, input_index: usize) -> usize;
}

/// Sign `digest` and append the hash type byte, giving the bytes a
/// signature opcode expects on the stack.
pub(crate) fn sign_digest(
    key: &PrivateKey,
    digest: &[u8; 32],
    sighash_type: SighashType,
) -> Result<Vec<u8>, TransactionError> {
    let signature = key
        .sign(digest)
        .map_err(|e| TransactionError::SigningError(e.to_string()))?;
    let mut bytes = signature.to_der();
    bytes.push(sighash_type.to_byte());
    Ok(bytes)
}
