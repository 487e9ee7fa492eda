//! Core transaction type.
//!
//! Represents a complete transaction with version, inputs, outputs, and
//! lock time. Supports binary and hex serialization, transaction id
//! computation, coinbase detection, and signing inputs through an
//! [`UnlockingScriptTemplate`].

use bchkit_primitives::chainhash::Hash;
use bchkit_primitives::hash::sha256d;
use bchkit_primitives::util::{ByteReader, ByteWriter, VarInt};
use bchkit_script::interpreter::ScriptFlags;
use bchkit_script::Script;

use crate::input::{OutPoint, TransactionInput};
use crate::output::TransactionOutput;
use crate::sighash::{self, SighashType};
use crate::template::UnlockingScriptTemplate;
use crate::TransactionError;

/// A transaction consisting of a version, a set of inputs, a set of
/// outputs, and a lock time.
///
/// # Wire format
///
/// | Field        | Size                      |
/// |--------------|---------------------------|
/// | version      | 4 bytes (LE)              |
/// | input count  | VarInt                    |
/// | inputs       | variable (per input)      |
/// | output count | VarInt                    |
/// | outputs      | variable (per output)     |
/// | lock_time    | 4 bytes (LE)              |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version. Currently 1 or 2.
    pub version: u32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. If non-zero, the transaction is not valid until the
    /// specified block height or Unix timestamp.
    pub lock_time: u32,
}

impl Transaction {
    /// Create a new empty transaction with version 1 and lock time 0.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    /// Parse a transaction from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// The slice must hold exactly one complete transaction with no
    /// trailing data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `ByteReader`.
    ///
    /// Reads the version, input count, inputs, output count, outputs, and
    /// lock time in standard wire format.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let input_count = read_count(reader, "input")?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = read_count(reader, "output")?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// Serialize this transaction to raw wire-format bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(256);
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Compute the transaction id (double SHA-256 of the serialized bytes).
    ///
    /// The hash is held in internal byte order; its `Display` gives the
    /// conventional reversed hex.
    pub fn tx_id(&self) -> Hash {
        Hash::new(sha256d(&self.to_bytes()))
    }

    /// The transaction id as display-order hex.
    pub fn tx_id_hex(&self) -> String {
        self.tx_id().to_string()
    }

    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Add an unsigned input spending output `vout` of `prev_tx_id`
    /// (display-order hex), remembering the spent output for signing.
    pub fn add_input_from(
        &mut self,
        prev_tx_id: &str,
        vout: u32,
        prev_locking_script: Script,
        satoshis: u64,
    ) -> Result<(), TransactionError> {
        let txid = Hash::from_hex(prev_tx_id)?;
        let input = TransactionInput::new(OutPoint::new(txid, vout))
            .with_source_output(TransactionOutput::new(satoshis, prev_locking_script));
        self.inputs.push(input);
        Ok(())
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Sum of all output values.
    pub fn total_output_satoshis(&self) -> u64 {
        self.outputs.iter().map(|o| o.satoshis).sum()
    }

    /// Sum of the values spent by all inputs.
    ///
    /// Fails when any input lacks its source output.
    pub fn total_input_satoshis(&self) -> Result<u64, TransactionError> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                input
                    .source_output()
                    .map(|o| o.satoshis)
                    .ok_or(TransactionError::MissingSourceOutput(i))
            })
            .sum()
    }

    /// A coinbase transaction has exactly one input spending the null outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
    }

    /// Size of the serialized transaction in bytes.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    /// Compute the signature hash for an input from its attached source
    /// output, committing to the full locking script.
    pub fn calc_input_signature_hash(
        &self,
        input_index: usize,
        sighash_type: SighashType,
    ) -> Result<[u8; 32], TransactionError> {
        let source = self.source_output(input_index)?;
        sighash::signature_hash(
            self,
            input_index,
            source.locking_script.to_bytes(),
            sighash_type,
            source.satoshis,
        )
    }

    /// Build the unlocking script for `input_index` with `template` and
    /// store it on the input.
    pub fn sign_input(
        &mut self,
        input_index: usize,
        template: &dyn UnlockingScriptTemplate,
    ) -> Result<(), TransactionError> {
        let count = self.inputs.len();
        let unlocking_script = template.sign(self, input_index)?;
        tracing::debug!(
            input_index,
            script_len = unlocking_script.len(),
            "signed input"
        );
        let input = self
            .inputs
            .get_mut(input_index)
            .ok_or(TransactionError::InputIndexOutOfRange {
                index: input_index,
                count,
            })?;
        input.unlocking_script = unlocking_script;
        Ok(())
    }

    /// Verify every input against its attached source output.
    pub fn verify(&self, flags: ScriptFlags) -> Result<bool, TransactionError> {
        for index in 0..self.inputs.len() {
            let utxo = self.source_output(index)?;
            if !crate::verify::verify_input(self, index, utxo, flags)? {
                tracing::debug!(input_index = index, "input failed verification");
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(crate) fn source_output(
        &self,
        input_index: usize,
    ) -> Result<&TransactionOutput, TransactionError> {
        let input = self.inputs.get(input_index).ok_or(
            TransactionError::InputIndexOutOfRange {
                index: input_index,
                count: self.inputs.len(),
            },
        )?;
        input
            .source_output()
            .ok_or(TransactionError::MissingSourceOutput(input_index))
    }
}

/// Read a count prefix, refusing counts the remaining bytes cannot hold.
fn read_count(reader: &mut ByteReader, what: &str) -> Result<usize, TransactionError> {
    let count = reader.read_varint().map_err(|e| {
        TransactionError::SerializationError(format!("reading {} count: {}", what, e))
    })?;
    let count = count.value();
    if count > reader.remaining() as u64 {
        return Err(TransactionError::SerializationError(format!(
            "{} count {} exceeds remaining {} bytes",
            what,
            count,
            reader.remaining()
        )));
    }
    Ok(count as usize)
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Transaction {
    /// Display the transaction as its hex-encoded serialization.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
