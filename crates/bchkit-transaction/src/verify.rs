//! Input verification: binds the script interpreter to one transaction input.

use bchkit_primitives::ec::{PublicKey, Signature};
use bchkit_script::interpreter::{
    verify, ExecutionContext, InterpreterError, ScriptFlags, SignatureChecker,
};
use bchkit_script::Script;

use crate::output::TransactionOutput;
use crate::sighash::{self, SighashType};
use crate::transaction::Transaction;
use crate::TransactionError;

/// [`SignatureChecker`] for a single input of a transaction.
///
/// Signatures are checked against the digest of `tx` for `input_index`,
/// committing to the script code the interpreter hands over and to the
/// value of the output being spent.
pub struct TransactionSignatureChecker<'a> {
    tx: &'a Transaction,
    input_index: usize,
    satoshis: u64,
}

impl<'a> TransactionSignatureChecker<'a> {
    /// Fails when `input_index` is past the end of the inputs.
    pub fn new(
        tx: &'a Transaction,
        input_index: usize,
        satoshis: u64,
    ) -> Result<Self, TransactionError> {
        if input_index >= tx.inputs.len() {
            return Err(TransactionError::InputIndexOutOfRange {
                index: input_index,
                count: tx.inputs.len(),
            });
        }
        Ok(TransactionSignatureChecker {
            tx,
            input_index,
            satoshis,
        })
    }
}

impl SignatureChecker for TransactionSignatureChecker<'_> {
    fn verify_signature(
        &self,
        full_sig: &[u8],
        pub_key: &[u8],
        script_code: &Script,
    ) -> Result<bool, InterpreterError> {
        let Some((&hash_type, der)) = full_sig.split_last() else {
            return Ok(false);
        };

        let signature = match Signature::from_der(der) {
            Ok(sig) => sig,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable signature");
                return Ok(false);
            }
        };
        let key = match PublicKey::from_bytes(pub_key) {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable public key");
                return Ok(false);
            }
        };

        let digest = sighash::signature_hash(
            self.tx,
            self.input_index,
            script_code.to_bytes(),
            SighashType::from_byte(hash_type),
            self.satoshis,
        )
        .map_err(|e| InterpreterError::SignatureCheck(e.to_string()))?;

        let valid = key.verify(&digest, &signature);
        if !valid {
            tracing::debug!(
                input_index = self.input_index,
                hash_type,
                "signature does not verify"
            );
        }
        Ok(valid)
    }

    fn lock_time(&self) -> u32 {
        self.tx.lock_time
    }

    fn tx_version(&self) -> u32 {
        self.tx.version
    }

    fn input_sequence(&self) -> u32 {
        self.tx.inputs[self.input_index].sequence_number
    }
}

/// Verify input `input_index` of `tx` against the output it spends.
///
/// Runs the input's unlocking script and `utxo`'s locking script through
/// the interpreter under `flags`. Returns `Ok(false)` when the scripts run
/// to completion with a false result, and `Err` when evaluation aborts or
/// the index is out of range.
pub fn verify_input(
    tx: &Transaction,
    input_index: usize,
    utxo: &TransactionOutput,
    flags: ScriptFlags,
) -> Result<bool, TransactionError> {
    let checker = TransactionSignatureChecker::new(tx, input_index, utxo.satoshis)?;
    let mut ctx = ExecutionContext::new()
        .with_flags(flags)
        .with_checker(&checker);

    let unlocking_script = &tx.inputs[input_index].unlocking_script;
    let valid = verify(&utxo.locking_script, unlocking_script, &mut ctx)?;
    tracing::debug!(input_index, valid, "input verified");
    Ok(valid)
}
