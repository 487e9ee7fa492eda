//! Signature hash computation for transaction signing.
//!
//! Computes the digest that ECDSA signs to authorize spending an input.
//! Hash types carrying [`SighashType::FORKID`] use the BIP-143 style
//! digest adopted by Bitcoin Cash for replay protection, which commits to
//! the value being spent. Hash types without it use the original Satoshi
//! digest over a modified copy of the transaction.
//!
//! See <https://github.com/bitcoincashorg/bitcoincash.org/blob/master/spec/replay-protected-sighash.md>

use std::fmt;

use bchkit_primitives::hash::sha256d;
use bchkit_primitives::util::{ByteWriter, VarInt};
use bchkit_script::{Opcode, Script};

use crate::transaction::Transaction;
use crate::TransactionError;

/// Hash type appended to every signature, selecting which parts of the
/// transaction the signature commits to.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SighashType(pub u32);

impl SighashType {
    /// Sign all inputs and all outputs.
    pub const ALL: SighashType = SighashType(0x01);
    /// Sign all inputs but no outputs.
    pub const NONE: SighashType = SighashType(0x02);
    /// Sign all inputs and only the output with the same index as the signed input.
    pub const SINGLE: SighashType = SighashType(0x03);
    /// Replay-protected digest (BIP-143 style).
    pub const FORKID: SighashType = SighashType(0x40);
    /// Only sign the current input, letting others be added later.
    pub const ANYONECANPAY: SighashType = SighashType(0x80);

    /// The standard Bitcoin Cash hash type: ALL | FORKID.
    pub const ALL_FORKID: SighashType = SighashType(0x41);

    /// Mask applied to extract the base type (ALL, NONE, SINGLE).
    pub const BASE_MASK: u32 = 0x1f;

    /// Interpret the hash type byte that ends a serialized signature.
    pub fn from_byte(byte: u8) -> Self {
        SighashType(byte as u32)
    }

    /// The low byte appended to a DER signature.
    pub fn to_byte(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn base(self) -> u32 {
        self.0 & Self::BASE_MASK
    }

    pub fn has_fork_id(self) -> bool {
        self.0 & Self::FORKID.0 != 0
    }

    pub fn anyone_can_pay(self) -> bool {
        self.0 & Self::ANYONECANPAY.0 != 0
    }

    pub fn is_none(self) -> bool {
        self.base() == Self::NONE.0
    }

    pub fn is_single(self) -> bool {
        self.base() == Self::SINGLE.0
    }
}

impl std::ops::BitOr for SighashType {
    type Output = SighashType;

    fn bitor(self, rhs: SighashType) -> SighashType {
        SighashType(self.0 | rhs.0)
    }
}

impl Default for SighashType {
    fn default() -> Self {
        SighashType::ALL_FORKID
    }
}

impl fmt::Debug for SighashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.base() {
            0x01 => "ALL",
            0x02 => "NONE",
            0x03 => "SINGLE",
            _ => "UNKNOWN",
        };
        write!(f, "SighashType({}", base)?;
        if self.has_fork_id() {
            write!(f, "|FORKID")?;
        }
        if self.anyone_can_pay() {
            write!(f, "|ANYONECANPAY")?;
        }
        write!(f, ")")
    }
}

/// Digest returned by the legacy algorithm for `SINGLE` without a matching
/// output: the integer one in internal byte order.
const SINGLE_OUT_OF_RANGE_DIGEST: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

/// Compute the signature hash for a given input.
///
/// Dispatches on the fork-id bit of `sighash_type`.
///
/// # Arguments
/// * `tx`           - The transaction being signed.
/// * `input_index`  - Index of the input being signed.
/// * `script_code`  - The script the signature commits to (usually the
///   locking script of the output being spent, or the redeem script).
/// * `sighash_type` - The combined hash type flags.
/// * `satoshis`     - Value of the output being spent; only the fork-id
///   digest commits to it.
///
/// # Returns
/// A 32-byte double-SHA256 hash to be signed by ECDSA.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: SighashType,
    satoshis: u64,
) -> Result<[u8; 32], TransactionError> {
    check_input_index(tx, input_index)?;

    if sighash_type.has_fork_id() {
        let preimage = calc_preimage(tx, input_index, script_code, sighash_type, satoshis)?;
        return Ok(sha256d(&preimage));
    }

    if sighash_type.is_single() && input_index >= tx.outputs.len() {
        tracing::debug!(input_index, "SIGHASH_SINGLE without matching output");
        return Ok(SINGLE_OUT_OF_RANGE_DIGEST);
    }
    let preimage = calc_legacy_preimage(tx, input_index, script_code, sighash_type)?;
    Ok(sha256d(&preimage))
}

/// Compute the pre-image bytes for the fork-id sighash before double-hashing.
///
/// The preimage consists of:
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes) - sha256d of all outpoints unless ANYONECANPAY
/// 3. hashSequence (32 bytes) - sha256d of all sequences unless ANYONECANPAY/SINGLE/NONE
/// 4. outpoint (32+4 bytes) - txid + vout of the input being signed
/// 5. scriptCode (varint + script) - the script being satisfied
/// 6. value (8 bytes LE) - satoshis of the output being spent
/// 7. nSequence (4 bytes LE) - sequence of the input being signed
/// 8. hashOutputs (32 bytes) - sha256d of all outputs or one output
/// 9. nLocktime (4 bytes LE)
/// 10. sighashType (4 bytes LE)
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: SighashType,
    satoshis: u64,
) -> Result<Vec<u8>, TransactionError> {
    check_input_index(tx, input_index)?;

    let input = &tx.inputs[input_index];
    let single_or_none = sighash_type.is_single() || sighash_type.is_none();

    let hash_prevouts = if !sighash_type.anyone_can_pay() {
        prevouts_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_sequence = if !sighash_type.anyone_can_pay() && !single_or_none {
        sequence_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_outputs = if !single_or_none {
        outputs_hash(tx, None)
    } else if sighash_type.is_single() && input_index < tx.outputs.len() {
        outputs_hash(tx, Some(input_index))
    } else {
        [0u8; 32]
    };

    let mut writer = ByteWriter::with_capacity(160 + script_code.len());
    writer.write_u32_le(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    input.previous_output.write_to(&mut writer);
    writer.write_varint(VarInt::from(script_code.len()));
    writer.write_bytes(script_code);
    writer.write_u64_le(satoshis);
    writer.write_u32_le(input.sequence_number);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type.0);

    Ok(writer.into_bytes())
}

/// Compute the pre-image bytes for the legacy sighash.
///
/// The transaction is serialized with every other input's script blanked
/// and the signed input's script replaced by `script_code` stripped of
/// `OP_CODESEPARATOR`. `NONE` drops all outputs, `SINGLE` keeps outputs up
/// to the signed index with earlier ones nulled, and both zero the other
/// inputs' sequences. `ANYONECANPAY` keeps only the signed input.
///
/// The `SINGLE` case with no matching output has no preimage; it is
/// rejected here and handled by [`signature_hash`].
pub fn calc_legacy_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: SighashType,
) -> Result<Vec<u8>, TransactionError> {
    check_input_index(tx, input_index)?;
    if sighash_type.is_single() && input_index >= tx.outputs.len() {
        return Err(TransactionError::InvalidTransaction(format!(
            "SIGHASH_SINGLE input {} has no matching output (tx has {} outputs)",
            input_index,
            tx.outputs.len()
        )));
    }

    let mut code = Script::from_bytes(script_code);
    code.delete_occurrences_of_opcode(Opcode::CodeSeparator)?;
    let code = code.to_bytes();

    let mut writer = ByteWriter::with_capacity(256);
    writer.write_u32_le(tx.version);

    if sighash_type.anyone_can_pay() {
        writer.write_varint(VarInt::from(1usize));
        let input = &tx.inputs[input_index];
        input.write_for_sig_hash(&mut writer, code, input.sequence_number);
    } else {
        writer.write_varint(VarInt::from(tx.inputs.len()));
        let zero_others = sighash_type.is_none() || sighash_type.is_single();
        for (i, input) in tx.inputs.iter().enumerate() {
            if i == input_index {
                input.write_for_sig_hash(&mut writer, code, input.sequence_number);
            } else {
                let sequence = if zero_others { 0 } else { input.sequence_number };
                input.write_for_sig_hash(&mut writer, &[], sequence);
            }
        }
    }

    if sighash_type.is_none() {
        writer.write_varint(VarInt::from(0usize));
    } else if sighash_type.is_single() {
        writer.write_varint(VarInt::from(input_index + 1));
        for _ in 0..input_index {
            // null output: value -1 and an empty script
            writer.write_u64_le(u64::MAX);
            writer.write_varint(VarInt::from(0usize));
        }
        tx.outputs[input_index].write_to(&mut writer);
    } else {
        writer.write_varint(VarInt::from(tx.outputs.len()));
        for output in &tx.outputs {
            output.write_to(&mut writer);
        }
    }

    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type.0);
    Ok(writer.into_bytes())
}

fn check_input_index(tx: &Transaction, input_index: usize) -> Result<(), TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InputIndexOutOfRange {
            index: input_index,
            count: tx.inputs.len(),
        });
    }
    Ok(())
}

fn prevouts_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        input.previous_output.write_to(&mut writer);
    }
    sha256d(&writer.into_bytes())
}

fn sequence_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence_number);
    }
    sha256d(&writer.into_bytes())
}

/// Double-SHA256 of the serialized outputs, or of the one at `only`.
fn outputs_hash(tx: &Transaction, only: Option<usize>) -> [u8; 32] {
    let mut writer = ByteWriter::new();
    match only {
        Some(index) => tx.outputs[index].write_to(&mut writer),
        None => {
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
    }
    sha256d(&writer.into_bytes())
}
