//! Transaction input and the outpoint it spends.
//!
//! Provides binary serialization/deserialization following the Bitcoin wire
//! format. The output being spent can be attached to an input for signing;
//! it is local data and never serialized.

use bchkit_primitives::chainhash::Hash;
use bchkit_primitives::util::{ByteReader, ByteWriter, VarInt};
use bchkit_script::Script;
use serde::{Deserialize, Serialize};

use crate::output::TransactionOutput;
use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// Reference to an output of a previous transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    /// Id of the transaction holding the output, in internal byte order.
    pub txid: Hash,
    /// Index of the output within that transaction.
    pub index: u32,
}

impl OutPoint {
    pub fn new(txid: Hash, index: u32) -> Self {
        OutPoint { txid, index }
    }

    /// The all-zero txid with index `0xFFFFFFFF` used by coinbase inputs.
    pub fn null() -> Self {
        OutPoint {
            txid: Hash::default(),
            index: u32::MAX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX && self.txid == Hash::default()
    }

    /// Wire format: 32-byte txid followed by the index as u32 LE.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let txid = reader.read_array::<32>().map_err(|e| {
            TransactionError::SerializationError(format!("reading source txid: {}", e))
        })?;
        let index = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;
        Ok(OutPoint {
            txid: Hash::new(txid),
            index,
        })
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(self.txid.as_bytes());
        writer.write_u32_le(self.index);
    }
}

/// A single input in a transaction.
///
/// # Wire format
///
/// | Field              | Size             |
/// |--------------------|------------------|
/// | previous txid      | 32 bytes (LE)    |
/// | previous index     | 4 bytes (LE)     |
/// | script length      | VarInt           |
/// | unlocking_script   | variable         |
/// | sequence_number    | 4 bytes (LE)     |
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionInput {
    /// The output being spent.
    pub previous_output: OutPoint,

    /// The unlocking script (scriptSig). Empty until the input is signed.
    pub unlocking_script: Script,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence_number: u32,

    source_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// Create an unsigned input spending `previous_output` with a final sequence.
    pub fn new(previous_output: OutPoint) -> Self {
        TransactionInput {
            previous_output,
            unlocking_script: Script::new(),
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            source_output: None,
        }
    }

    /// Deserialize a `TransactionInput` from a `ByteReader`.
    ///
    /// # Returns
    /// `Ok(TransactionInput)` on success, or a `TransactionError` if the
    /// data is truncated or malformed.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let previous_output = OutPoint::read_from(reader)?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading unlocking script: {}", e))
        })?;

        let sequence_number = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        Ok(TransactionInput {
            previous_output,
            unlocking_script: Script::from_bytes(script_bytes),
            sequence_number,
            source_output: None,
        })
    }

    /// Serialize this input into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        self.previous_output.write_to(writer);
        writer.write_var_bytes(self.unlocking_script.to_bytes());
        writer.write_u32_le(self.sequence_number);
    }

    /// Serialize with `script` in place of the unlocking script and
    /// `sequence` in place of the sequence number, as the legacy signature
    /// hash requires.
    pub(crate) fn write_for_sig_hash(&self, writer: &mut ByteWriter, script: &[u8], sequence: u32) {
        self.previous_output.write_to(writer);
        writer.write_varint(VarInt::from(script.len()));
        writer.write_bytes(script);
        writer.write_u32_le(sequence);
    }

    /// Attach the output being spent, needed to sign this input.
    pub fn set_source_output(&mut self, output: Option<TransactionOutput>) {
        self.source_output = output;
    }

    /// Builder form of [`set_source_output`](Self::set_source_output).
    pub fn with_source_output(mut self, output: TransactionOutput) -> Self {
        self.source_output = Some(output);
        self
    }

    /// The output being spent, when attached.
    pub fn source_output(&self) -> Option<&TransactionOutput> {
        self.source_output.as_ref()
    }
}
