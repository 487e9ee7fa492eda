//! Mutable VM state for one script-pair evaluation.

use std::fmt;

use crate::chunk::{ChunkIter, ScriptChunk};
use crate::opcodes::Opcode;
use crate::Script;

use super::config::InterpreterLimits;
use super::error::InterpreterError;
use super::flags::ScriptFlags;
use super::scriptnum::ScriptNumber;
use super::stack::{from_bool, Stack};
use super::SignatureChecker;

/// Execution state threaded through every opcode.
///
/// One context serves one verification; it is reset between attempts and
/// never shared. Signature and lock-time opcodes consult the optional
/// [`SignatureChecker`], failing with
/// [`InterpreterError::MissingTransactionContext`] when none is bound.
pub struct ExecutionContext<'a> {
    pub stack: Stack,
    pub alt_stack: Stack,
    /// One frame per open `OP_IF`/`OP_NOTIF`; true while its branch runs.
    pub condition_stack: Vec<bool>,
    pub op_count: usize,
    pub flags: ScriptFlags,
    pub limits: InterpreterLimits,
    pub(crate) checker: Option<&'a dyn SignatureChecker>,
    /// Bytes of the script currently executing.
    pub(crate) script_code: Vec<u8>,
    /// Offset just past the last executed `OP_CODESEPARATOR`.
    pub(crate) code_separator: usize,
    /// Offset just past the chunk being executed.
    pub(crate) pc: usize,
}

impl Default for ExecutionContext<'_> {
    fn default() -> Self {
        ExecutionContext::new()
    }
}

impl<'a> ExecutionContext<'a> {
    /// A context with consensus flags, default limits and no transaction.
    pub fn new() -> Self {
        ExecutionContext {
            stack: Stack::new(),
            alt_stack: Stack::new_alt(),
            condition_stack: Vec::new(),
            op_count: 0,
            flags: ScriptFlags::CONSENSUS,
            limits: InterpreterLimits::default(),
            checker: None,
            script_code: Vec::new(),
            code_separator: 0,
            pc: 0,
        }
    }

    pub fn with_flags(mut self, flags: ScriptFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_limits(mut self, limits: InterpreterLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Bind the transaction input being verified.
    pub fn with_checker(mut self, checker: &'a dyn SignatureChecker) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn has_flag(&self, flag: ScriptFlags) -> bool {
        self.flags.has_flag(flag)
    }

    /// Clear all evaluation state, keeping flags, limits and the checker.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.alt_stack.clear();
        self.condition_stack.clear();
        self.op_count = 0;
        self.script_code.clear();
        self.code_separator = 0;
        self.pc = 0;
    }

    /// True when no enclosing conditional branch is skipped.
    pub fn should_execute(&self) -> bool {
        self.condition_stack.iter().all(|&frame| frame)
    }

    pub fn increment_op_count(&mut self, by: usize) -> Result<(), InterpreterError> {
        self.op_count += by;
        if self.op_count > self.limits.max_ops_per_script {
            return Err(InterpreterError::OpCountExceeded {
                max: self.limits.max_ops_per_script,
            });
        }
        Ok(())
    }

    pub(crate) fn checker(&self) -> Result<&'a dyn SignatureChecker, InterpreterError> {
        self.checker.ok_or(InterpreterError::MissingTransactionContext)
    }

    // -----------------------------------------------------------------------
    // Stack helpers
    // -----------------------------------------------------------------------

    pub fn push_number(&mut self, n: &ScriptNumber) {
        self.stack.push(n.to_bytes());
    }

    pub fn push_bool(&mut self, value: bool) {
        self.stack.push(from_bool(value));
    }

    /// Pop an arithmetic operand (bounded by `max_script_number_length`).
    pub fn pop_number(&mut self) -> Result<ScriptNumber, InterpreterError> {
        let data = self.stack.pop()?;
        self.decode_number(&data, self.limits.max_script_number_length)
    }

    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        self.stack.pop_bool()
    }

    pub(crate) fn decode_number(
        &self,
        data: &[u8],
        max_len: usize,
    ) -> Result<ScriptNumber, InterpreterError> {
        ScriptNumber::from_bytes(data, max_len, self.has_flag(ScriptFlags::VERIFY_MINIMAL_DATA))
    }

    /// Pop the top item and fail with `VerifyFailed` when it is false.
    pub(crate) fn verify_top(&mut self, opcode: Opcode) -> Result<(), InterpreterError> {
        if self.stack.pop_bool()? {
            Ok(())
        } else {
            Err(InterpreterError::VerifyFailed { opcode })
        }
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Run every chunk of `script` against this context.
    ///
    /// The operation counter restarts for each script and the alt stack is
    /// cleared when the script ends. A script that ends inside an open
    /// conditional fails.
    pub fn execute_script(&mut self, script: &Script) -> Result<(), InterpreterError> {
        let bytes = script.to_bytes();
        if bytes.len() > self.limits.max_script_size {
            return Err(InterpreterError::ScriptTooLarge {
                size: bytes.len(),
                max: self.limits.max_script_size,
            });
        }
        self.script_code = bytes.to_vec();
        self.code_separator = 0;
        self.op_count = 0;

        for chunk in ChunkIter::new(bytes) {
            let chunk = chunk?;
            self.pc = chunk.range().end;
            tracing::trace!(
                opcode = %chunk.opcode(),
                depth = self.stack.depth(),
                executing = self.should_execute(),
                "step"
            );
            match chunk.data() {
                Some(data) => self.execute_push(&chunk, data)?,
                None => self.execute_opcode(chunk.opcode())?,
            }

            let size = self.stack.depth() + self.alt_stack.depth();
            if size > self.limits.max_stack_size {
                return Err(InterpreterError::StackSizeExceeded {
                    size,
                    max: self.limits.max_stack_size,
                });
            }
        }

        if !self.condition_stack.is_empty() {
            return Err(InterpreterError::UnbalancedConditional);
        }
        self.alt_stack.clear();
        Ok(())
    }

    fn execute_push(&mut self, chunk: &ScriptChunk<'_>, data: &[u8]) -> Result<(), InterpreterError> {
        if data.len() > self.limits.max_script_element_size {
            return Err(InterpreterError::ElementTooLarge {
                size: data.len(),
                max: self.limits.max_script_element_size,
            });
        }
        if !self.should_execute() {
            return Ok(());
        }
        if self.has_flag(ScriptFlags::VERIFY_MINIMAL_DATA) && !chunk.is_minimal_push() {
            return Err(InterpreterError::NonMinimalPush {
                opcode: chunk.opcode(),
            });
        }
        self.stack.push(data.to_vec());
        Ok(())
    }

    /// Execute a single non-data opcode.
    ///
    /// Counts the operation, rejects disabled opcodes even inside a skipped
    /// branch, rejects inline push opcodes (their payload belongs to the
    /// chunk parser), then skips everything outside `OP_IF..=OP_ENDIF` when
    /// the current branch is not executing.
    pub fn execute_opcode(&mut self, opcode: Opcode) -> Result<(), InterpreterError> {
        if opcode.counts_toward_op_limit() {
            self.increment_op_count(1)?;
        }
        if opcode.is_disabled() {
            return Err(InterpreterError::DisabledOpcode { opcode });
        }
        if opcode.is_push_data() {
            return Err(InterpreterError::UnexpectedPushOpcode { opcode });
        }
        if !self.should_execute() && !opcode.is_conditional() {
            return Ok(());
        }
        self.dispatch(opcode)
    }

    fn dispatch(&mut self, opcode: Opcode) -> Result<(), InterpreterError> {
        use Opcode::*;
        match opcode {
            Op0 | PushBytes(_) | PushData1 | PushData2 | PushData4 => {
                Err(InterpreterError::UnexpectedPushOpcode { opcode })
            }
            Op1Negate | Num(_) => {
                let n = opcode.small_int_value().unwrap_or_default();
                self.push_number(&ScriptNumber::new(n));
                Ok(())
            }

            // Flow control
            Nop => Ok(()),
            Reserved | Ver | Reserved1 | Reserved2 => {
                Err(InterpreterError::ReservedOpcode { opcode })
            }
            If => self.op_if(false),
            NotIf => self.op_if(true),
            VerIf | VerNotIf => Err(InterpreterError::VerIf { opcode }),
            Else => self.op_else(),
            EndIf => self.op_endif(),
            Verify => {
                self.stack.require(1)?;
                self.verify_top(opcode)
            }
            Return => Err(InterpreterError::OpReturn),

            // Stack
            ToAltStack => self.op_to_alt_stack(),
            FromAltStack => self.op_from_alt_stack(),
            Drop2 => self.op_2drop(),
            Dup2 => self.op_2dup(),
            Dup3 => self.op_3dup(),
            Over2 => self.op_2over(),
            Rot2 => self.op_2rot(),
            Swap2 => self.op_2swap(),
            IfDup => self.op_ifdup(),
            Depth => {
                let depth = self.stack.depth() as i64;
                self.push_number(&ScriptNumber::new(depth));
                Ok(())
            }
            Drop => self.op_drop(),
            Dup => self.op_dup(),
            Nip => self.op_nip(),
            Over => self.op_over(),
            Pick => self.op_pick(false),
            Roll => self.op_pick(true),
            Rot => self.op_rot(),
            Swap => self.op_swap(),
            Tuck => self.op_tuck(),

            // Splice and bitwise
            Cat => self.op_cat(),
            Split => self.op_split(),
            Num2Bin => self.op_num2bin(),
            Bin2Num => self.op_bin2num(),
            Size => self.op_size(),
            And | Or | Xor => self.op_bitwise(opcode),
            Equal => self.op_equal(),
            EqualVerify => {
                self.op_equal()?;
                self.verify_top(opcode)
            }
            Invert | Mul2 | Div2 | Mul | LShift | RShift => {
                Err(InterpreterError::DisabledOpcode { opcode })
            }

            // Arithmetic
            Add1 | Sub1 | Negate | Abs | Not | NotEqual0 => self.op_unary_arith(opcode),
            Add | Sub | Div | Mod | BoolAnd | BoolOr | NumEqual | NumNotEqual | LessThan
            | GreaterThan | LessThanOrEqual | GreaterThanOrEqual | Min | Max => {
                self.op_binary_arith(opcode)
            }
            NumEqualVerify => {
                self.op_binary_arith(NumEqual)?;
                self.verify_top(opcode)
            }
            Within => self.op_within(),

            // Crypto
            Ripemd160 | Sha1 | Sha256 | Hash160 | Hash256 => self.op_hash(opcode),
            CodeSeparator => {
                self.code_separator = self.pc;
                Ok(())
            }
            CheckSig => self.op_checksig(),
            CheckSigVerify => {
                self.op_checksig()?;
                self.verify_top(opcode)
            }
            CheckMultiSig => self.op_checkmultisig(),
            CheckMultiSigVerify => {
                self.op_checkmultisig()?;
                self.verify_top(opcode)
            }

            // Lock time and expansion
            CheckLockTimeVerify => self.op_check_locktime_verify(),
            CheckSequenceVerify => self.op_check_sequence_verify(),
            Nop1 | UpgradableNop(_) => self.op_upgradable_nop(opcode),
            Unknown(_) => Err(InterpreterError::InvalidOpcode { opcode }),
        }
    }
}

impl fmt::Display for ExecutionContext<'_> {
    /// One boxed line per stack item, top first, then a rule of `=`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for data in self.stack.items().iter().rev() {
            let hex = hex::encode(data);
            let mut contents = if hex.len() > 20 {
                format!("{}..{} [{}bytes]", &hex[..5], &hex[hex.len() - 5..], data.len())
            } else {
                format!("0x{}", hex)
            };
            match contents.as_str() {
                "0x" => contents = "NULL [FALSE/0]".to_string(),
                "0x01" => contents = "0x01 [TRUE/1]".to_string(),
                _ => {}
            }
            let pad = 24usize.saturating_sub(contents.len()) / 2 + 1;
            writeln!(f, "| {0}{1}{0} |", " ".repeat(pad), contents)?;
        }
        writeln!(f, "{}", "=".repeat(30))
    }
}

impl fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("stack", &self.stack)
            .field("alt_stack", &self.alt_stack)
            .field("condition_stack", &self.condition_stack)
            .field("op_count", &self.op_count)
            .field("flags", &self.flags)
            .field("has_checker", &self.checker.is_some())
            .finish()
    }
}
