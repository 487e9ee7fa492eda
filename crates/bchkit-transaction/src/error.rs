use bchkit_script::interpreter::InterpreterError;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid for the requested operation.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Signing an input failed.
    #[error("signing error: {0}")]
    SigningError(String),

    /// Binary or hex decoding failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An input index past the end of the input list.
    #[error("input index {index} out of range (tx has {count} inputs)")]
    InputIndexOutOfRange { index: usize, count: usize },

    /// Signing needs the output being spent but the input does not carry it.
    #[error("input {0} has no source output")]
    MissingSourceOutput(usize),

    /// An underlying script error (forwarded from `bchkit-script`).
    #[error("script error: {0}")]
    Script(#[from] bchkit_script::ScriptError),

    /// Script verification aborted.
    #[error("script verification failed: {0}")]
    Interpreter(#[from] InterpreterError),

    /// An underlying primitives error (forwarded from `bchkit-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] bchkit_primitives::PrimitivesError),
}
