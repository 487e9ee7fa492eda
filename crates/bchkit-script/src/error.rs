/// Error types for script construction and parsing.
///
/// Interpreter failures have their own enum,
/// [`InterpreterError`](crate::interpreter::InterpreterError).
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// A push opcode declares more payload bytes than the script holds.
    #[error("malformed push at offset {offset}: needs {needed} bytes, {available} available")]
    MalformedPush {
        /// Offset of the push opcode within the script.
        offset: usize,
        /// Bytes the push declares (length prefix plus payload).
        needed: usize,
        /// Bytes remaining after the opcode.
        available: usize,
    },

    /// A token in an ASM or debug string could not be parsed.
    #[error("invalid script token '{0}'")]
    InvalidToken(String),

    /// Attempted to append a push opcode without its payload.
    #[error("use append_push_data for push opcodes: {0}")]
    InvalidOpcodeType(String),

    /// The requested length prefix cannot carry the payload.
    #[error("cannot encode {len} bytes with {encoding:?}")]
    EncodingUnavailable {
        /// Payload length.
        len: usize,
        /// The requested encoding.
        encoding: crate::chunk::PushEncoding,
    },

    /// Payload does not fit even in `OP_PUSHDATA4`.
    #[error("data too big: {0} bytes")]
    DataTooBig(usize),

    /// Empty data was pushed where a payload is required.
    #[error("push data is empty")]
    EmptyData,

    /// A chunk index is outside the script.
    #[error("chunk index {index} out of range for {len} chunks")]
    IndexOutOfRange {
        /// Requested index, possibly negative.
        index: isize,
        /// Number of chunks in the script.
        len: usize,
    },

    /// Template arguments are inconsistent.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] bchkit_primitives::PrimitivesError),
}
