//! Pay-to-Public-Key-Hash (P2PKH) template.
//!
//! Locks to `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG` and
//! unlocks with `<sig> <pubkey>`.

use bchkit_primitives::ec::{PrivateKey, PublicKey};
use bchkit_script::{template, Script};

use crate::sighash::SighashType;
use crate::template::{sign_digest, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Create a P2PKH locking script paying to `pub_key`.
pub fn lock(pub_key: &PublicKey) -> Result<Script, TransactionError> {
    Ok(template::p2pkh(&pub_key.hash160())?)
}

/// Create a P2PKH unlocker for signing transaction inputs.
///
/// `sighash_type` defaults to [`SighashType::ALL_FORKID`].
pub fn unlock(private_key: PrivateKey, sighash_type: Option<SighashType>) -> P2PKH {
    P2PKH {
        private_key,
        sighash_type: sighash_type.unwrap_or_default(),
    }
}

/// P2PKH signing template holding a private key and hash type.
pub struct P2PKH {
    private_key: PrivateKey,
    sighash_type: SighashType,
}

impl UnlockingScriptTemplate for P2PKH {
    /// Sign the input against its source output and produce
    /// `<DER_sig || hash_type> <compressed_pubkey>`.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError> {
        let digest = tx.calc_input_signature_hash(input_index, self.sighash_type)?;
        let sig = sign_digest(&self.private_key, &digest, self.sighash_type)?;

        let mut script = Script::new();
        script
            .append_push_data(&sig)?
            .append_push_data(&self.private_key.pub_key().to_compressed())?;
        Ok(script)
    }

    /// 1 (push len) + 71 (typical DER sig + hash type) + 1 (push len) + 33 (compressed pubkey).
    fn estimate_length(&self, _tx: &Transaction, _input_index: usize) -> usize {
        106
    }
}
