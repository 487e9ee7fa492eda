//! Bare and pay-to-script-hash multisig unlocking.
//!
//! Unlocks `OP_m <key>... OP_n OP_CHECKMULTISIG` with
//! `OP_0 <sig>...`, the leading `OP_0` feeding the extra item
//! `OP_CHECKMULTISIG` pops. For P2SH the redeem script is pushed last.

use bchkit_primitives::ec::PrivateKey;
use bchkit_script::{Opcode, Script};

use crate::sighash::{self, SighashType};
use crate::template::{sign_digest, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Build `OP_0 <sig>...` from finished signatures, each already carrying
/// its hash type byte. Signatures must follow the key order of the lock.
pub fn unlocking_script(signatures: &[Vec<u8>]) -> Result<Script, TransactionError> {
    if signatures.is_empty() {
        return Err(TransactionError::SigningError(
            "multisig unlock needs at least one signature".to_string(),
        ));
    }
    let mut script = Script::new();
    script.append_opcode(Opcode::Op0)?;
    for sig in signatures {
        script.append_push_data(sig)?;
    }
    Ok(script)
}

/// Create an unlocker for a bare multisig output.
///
/// `keys` must be ordered as their public keys appear in the lock.
pub fn unlock(keys: Vec<PrivateKey>, sighash_type: Option<SighashType>) -> Multisig {
    Multisig {
        keys,
        sighash_type: sighash_type.unwrap_or_default(),
        redeem_script: None,
    }
}

/// Create an unlocker for a P2SH output wrapping the multisig `redeem_script`.
pub fn unlock_p2sh(
    keys: Vec<PrivateKey>,
    redeem_script: Script,
    sighash_type: Option<SighashType>,
) -> Multisig {
    Multisig {
        keys,
        sighash_type: sighash_type.unwrap_or_default(),
        redeem_script: Some(redeem_script),
    }
}

/// Multisig signing template.
pub struct Multisig {
    keys: Vec<PrivateKey>,
    sighash_type: SighashType,
    redeem_script: Option<Script>,
}

impl Multisig {
    /// The script the signatures commit to: the redeem script for P2SH,
    /// otherwise the locking script being spent.
    fn script_code<'a>(&'a self, locking_script: &'a Script) -> Result<&'a Script, TransactionError> {
        match &self.redeem_script {
            Some(redeem) => {
                if redeem.to_p2sh() != *locking_script {
                    return Err(TransactionError::SigningError(
                        "redeem script does not match the P2SH output".to_string(),
                    ));
                }
                Ok(redeem)
            }
            None => Ok(locking_script),
        }
    }
}

impl UnlockingScriptTemplate for Multisig {
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError> {
        let source = tx.source_output(input_index)?;
        let script_code = self.script_code(&source.locking_script)?;

        let (required, _) = script_code.multisig_requirements().ok_or_else(|| {
            TransactionError::SigningError("script code is not a multisig script".to_string())
        })?;
        if self.keys.len() != required {
            return Err(TransactionError::SigningError(format!(
                "multisig needs {} signatures, got {} keys",
                required,
                self.keys.len()
            )));
        }

        let digest = sighash::signature_hash(
            tx,
            input_index,
            script_code.to_bytes(),
            self.sighash_type,
            source.satoshis,
        )?;
        let signatures = self
            .keys
            .iter()
            .map(|key| sign_digest(key, &digest, self.sighash_type))
            .collect::<Result<Vec<_>, _>>()?;

        let mut script = unlocking_script(&signatures)?;
        if let Some(redeem) = &self.redeem_script {
            script.append_push_data(redeem.to_bytes())?;
        }
        Ok(script)
    }

    /// One byte for `OP_0`, 73 per signature, plus the pushed redeem script.
    fn estimate_length(&self, _tx: &Transaction, _input_index: usize) -> usize {
        let redeem = self
            .redeem_script
            .as_ref()
            .map(|r| {
                let prefix = match r.len() {
                    0..=75 => 1,
                    76..=255 => 2,
                    _ => 3,
                };
                r.len() + prefix
            })
            .unwrap_or(0);
        1 + 73 * self.keys.len() + redeem
    }
}
