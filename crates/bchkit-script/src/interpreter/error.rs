//! Interpreter error type.

use crate::opcodes::Opcode;
use crate::ScriptError;

/// Why a script evaluation was aborted.
///
/// A clean evaluation that leaves a false or empty stack is not an error;
/// [`verify`](super::verify) reports it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// The script bytes could not be split into chunks.
    #[error("parse error: {0}")]
    Parse(#[from] ScriptError),

    /// Script exceeds the maximum evaluated size.
    #[error("script size {size} exceeds max {max}")]
    ScriptTooLarge { size: usize, max: usize },

    /// The opcode needs more items than the stack holds.
    #[error("operation requires {required} stack items, {available} available")]
    StackUnderflow { required: usize, available: usize },

    /// `OP_FROMALTSTACK` with an empty alt stack.
    #[error("operation requires {required} alt stack items, {available} available")]
    AltStackUnderflow { required: usize, available: usize },

    /// `OP_PICK` or `OP_ROLL` with a negative index.
    #[error("invalid stack index {index}")]
    InvalidStackIndex { index: i64 },

    /// Data and alt stacks together exceed the depth limit.
    #[error("combined stack size {size} exceeds max {max}")]
    StackSizeExceeded { size: usize, max: usize },

    /// Permanently disabled opcode, fatal even in an unexecuted branch.
    #[error("attempt to execute disabled opcode {opcode}")]
    DisabledOpcode { opcode: Opcode },

    /// `OP_RESERVED`, `OP_VER`, `OP_RESERVED1` or `OP_RESERVED2` executed.
    #[error("attempt to execute reserved opcode {opcode}")]
    ReservedOpcode { opcode: Opcode },

    /// An unassigned opcode executed.
    #[error("attempt to execute invalid opcode {opcode}")]
    InvalidOpcode { opcode: Opcode },

    /// A push-data opcode reached opcode dispatch instead of the chunk parser.
    #[error("push opcode {opcode} cannot be executed directly")]
    UnexpectedPushOpcode { opcode: Opcode },

    /// `OP_VERIF` or `OP_VERNOTIF`, which fail wherever they appear.
    #[error("{opcode} is always invalid")]
    VerIf { opcode: Opcode },

    /// `OP_ELSE`/`OP_ENDIF` without `OP_IF`, or a script ending inside a branch.
    #[error("unbalanced conditional")]
    UnbalancedConditional,

    /// A numeric operand is wider than the opcode accepts.
    #[error("script number of {size} bytes exceeds max {max}")]
    NumberTooLarge { size: usize, max: usize },

    /// A numeric operand is not minimally encoded.
    #[error("script number is not minimally encoded")]
    NonMinimalNumber,

    /// A push does not use the smallest possible opcode.
    #[error("{opcode} is not a minimal push")]
    NonMinimalPush { opcode: Opcode },

    /// A lock-time operand is negative.
    #[error("negative lock time")]
    NegativeLockTime,

    /// The transaction does not satisfy the lock-time requirement.
    #[error("lock time requirement not satisfied")]
    UnsatisfiedLockTime,

    /// `OP_SPLIT` position outside the operand.
    #[error("split position {index} out of range for {size} bytes")]
    InvalidSplitRange { index: i64, size: usize },

    /// Bitwise operands differ in length.
    #[error("operands are not the same size")]
    InvalidOperandSize,

    /// `OP_DIV` or `OP_MOD` by zero.
    #[error("division by zero")]
    DivideByZero,

    /// `OP_NUM2BIN`/`OP_BIN2NUM` value does not fit the requested size.
    #[error("number out of range for conversion")]
    InvalidNumberRange,

    /// `OP_CHECKMULTISIG` key count outside `0..=max`.
    #[error("public key count {count} out of range (max {max})")]
    PubKeyCount { count: i64, max: usize },

    /// `OP_CHECKMULTISIG` signature count outside `0..=keys`.
    #[error("signature count {count} out of range (max {max})")]
    SigCount { count: i64, max: usize },

    /// Pushed or computed element exceeds the element size limit.
    #[error("element size {size} exceeds max {max}")]
    ElementTooLarge { size: usize, max: usize },

    /// Too many non-push operations in one script.
    #[error("exceeded max operation count {max}")]
    OpCountExceeded { max: usize },

    /// A signature or lock-time opcode ran without a bound transaction.
    #[error("no transaction bound to the execution context")]
    MissingTransactionContext,

    /// The bound signature checker failed.
    #[error("signature check failed: {0}")]
    SignatureCheck(String),

    /// `OP_RETURN` executed.
    #[error("OP_RETURN executed")]
    OpReturn,

    /// `OP_VERIFY` or a `*VERIFY` opcode found a false value.
    #[error("{opcode} failed")]
    VerifyFailed { opcode: Opcode },

    /// P2SH spend whose unlocking script contains non-push opcodes.
    #[error("P2SH unlocking script is not push only")]
    P2shNotPushOnly,

    /// An upgradable NOP executed while they are discouraged.
    #[error("{opcode} reserved for soft-fork upgrades")]
    DiscourageUpgradableNops { opcode: Opcode },

    /// Undefined signature hash type.
    #[error("invalid signature hash type 0x{hash_type:02x}")]
    SigHashType { hash_type: u8 },

    /// Signature is not strict DER.
    #[error("signature is not strict DER: {0}")]
    SigDer(&'static str),

    /// Signature S value is in the upper half of the curve order.
    #[error("signature has high S value")]
    SigHighS,

    /// Public key is neither compressed nor uncompressed SEC encoding.
    #[error("unsupported public key encoding")]
    PubKeyType,

    /// `SIGHASH_FORKID` used while fork-id signatures are not enabled.
    #[error("fork id used without SIGHASH_FORKID enabled")]
    IllegalForkId,

    /// `SIGHASH_FORKID` missing while it is mandatory.
    #[error("signature must use SIGHASH_FORKID")]
    MustUseForkId,

    /// A failed signature check with a non-empty signature.
    #[error("non-empty signature on failed check")]
    NullFail,
}
