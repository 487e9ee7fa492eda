//! Conditional, upgradable-NOP and lock-time opcodes.

use crate::opcodes::Opcode;

use super::context::ExecutionContext;
use super::error::InterpreterError;
use super::flags::ScriptFlags;

/// Lock times below this are block heights, at or above it timestamps.
pub const LOCK_TIME_THRESHOLD: i64 = 500_000_000;
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;
pub const SEQUENCE_LOCK_TIME_DISABLED: i64 = 1 << 31;
pub const SEQUENCE_LOCK_TIME_TYPE_FLAG: i64 = 1 << 22;
pub const SEQUENCE_LOCK_TIME_MASK: i64 = 0x0000_ffff;

impl ExecutionContext<'_> {
    /// Open a branch. Inside a skipped branch nothing is popped and the new
    /// frame is false, keeping `OP_ELSE`/`OP_ENDIF` pairing intact.
    pub(crate) fn op_if(&mut self, negate: bool) -> Result<(), InterpreterError> {
        let mut taken = false;
        if self.should_execute() {
            self.stack.require(1)?;
            taken = self.stack.pop_bool()? != negate;
        }
        self.condition_stack.push(taken);
        Ok(())
    }

    pub(crate) fn op_else(&mut self) -> Result<(), InterpreterError> {
        let top = self
            .condition_stack
            .last_mut()
            .ok_or(InterpreterError::UnbalancedConditional)?;
        *top = !*top;
        Ok(())
    }

    pub(crate) fn op_endif(&mut self) -> Result<(), InterpreterError> {
        self.condition_stack
            .pop()
            .map(|_| ())
            .ok_or(InterpreterError::UnbalancedConditional)
    }

    pub(crate) fn op_upgradable_nop(&mut self, opcode: Opcode) -> Result<(), InterpreterError> {
        if self.has_flag(ScriptFlags::VERIFY_DISCOURAGE_UPGRADABLE_NOPS) {
            return Err(InterpreterError::DiscourageUpgradableNops { opcode });
        }
        Ok(())
    }

    /// BIP65. The operand stays on the stack.
    pub(crate) fn op_check_locktime_verify(&mut self) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_CHECK_LOCK_TIME) {
            return self.op_upgradable_nop(Opcode::CheckLockTimeVerify);
        }

        self.stack.require(1)?;
        let lock_time = self
            .decode_number(self.stack.peek(-1)?, self.limits.max_locktime_number_length)?
            .to_i64();
        if lock_time < 0 {
            return Err(InterpreterError::NegativeLockTime);
        }

        let checker = self.checker()?;
        verify_lock_time(checker.lock_time() as i64, LOCK_TIME_THRESHOLD, lock_time)?;

        // A final input disables the transaction lock time entirely.
        if checker.input_sequence() == SEQUENCE_FINAL {
            return Err(InterpreterError::UnsatisfiedLockTime);
        }
        Ok(())
    }

    /// BIP112. The operand stays on the stack.
    pub(crate) fn op_check_sequence_verify(&mut self) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_CHECK_SEQUENCE) {
            return self.op_upgradable_nop(Opcode::CheckSequenceVerify);
        }

        self.stack.require(1)?;
        let sequence = self
            .decode_number(self.stack.peek(-1)?, self.limits.max_locktime_number_length)?
            .to_i64();
        if sequence < 0 {
            return Err(InterpreterError::NegativeLockTime);
        }
        if sequence & SEQUENCE_LOCK_TIME_DISABLED != 0 {
            return Ok(());
        }

        let checker = self.checker()?;
        if checker.tx_version() < 2 {
            return Err(InterpreterError::UnsatisfiedLockTime);
        }
        let tx_sequence = checker.input_sequence() as i64;
        if tx_sequence & SEQUENCE_LOCK_TIME_DISABLED != 0 {
            return Err(InterpreterError::UnsatisfiedLockTime);
        }

        let mask = SEQUENCE_LOCK_TIME_TYPE_FLAG | SEQUENCE_LOCK_TIME_MASK;
        verify_lock_time(
            tx_sequence & mask,
            SEQUENCE_LOCK_TIME_TYPE_FLAG,
            sequence & mask,
        )
    }
}

/// Both values must be of the same kind (below or above `threshold`) and
/// the required one must not exceed the transaction's.
pub(crate) fn verify_lock_time(
    tx_lock_time: i64,
    threshold: i64,
    lock_time: i64,
) -> Result<(), InterpreterError> {
    if (tx_lock_time < threshold) != (lock_time < threshold) || lock_time > tx_lock_time {
        return Err(InterpreterError::UnsatisfiedLockTime);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{ScriptNumber, SignatureChecker};
    use crate::Script;

    struct LockChecker {
        lock_time: u32,
        version: u32,
        sequence: u32,
    }

    impl SignatureChecker for LockChecker {
        fn verify_signature(&self, _: &[u8], _: &[u8], _: &Script) -> Result<bool, InterpreterError> {
            Ok(false)
        }
        fn lock_time(&self) -> u32 {
            self.lock_time
        }
        fn tx_version(&self) -> u32 {
            self.version
        }
        fn input_sequence(&self) -> u32 {
            self.sequence
        }
    }

    fn cltv(checker: &LockChecker, operand: i64) -> Result<(), InterpreterError> {
        let mut ctx = ExecutionContext::new().with_checker(checker);
        ctx.push_number(&ScriptNumber::new(operand));
        ctx.op_check_locktime_verify()
    }

    fn csv(checker: &LockChecker, operand: i64) -> Result<(), InterpreterError> {
        let mut ctx = ExecutionContext::new().with_checker(checker);
        ctx.push_number(&ScriptNumber::new(operand));
        ctx.op_check_sequence_verify()
    }

    #[test]
    fn test_cltv() {
        let tx = LockChecker { lock_time: 500, version: 1, sequence: 0 };
        cltv(&tx, 400).unwrap();
        cltv(&tx, 500).unwrap();
        assert!(matches!(cltv(&tx, 501), Err(InterpreterError::UnsatisfiedLockTime)));
        assert!(matches!(cltv(&tx, 600_000_000), Err(InterpreterError::UnsatisfiedLockTime)));
        assert!(matches!(cltv(&tx, -1), Err(InterpreterError::NegativeLockTime)));

        let final_tx = LockChecker { lock_time: 500, version: 1, sequence: SEQUENCE_FINAL };
        assert!(matches!(cltv(&final_tx, 400), Err(InterpreterError::UnsatisfiedLockTime)));
    }

    #[test]
    fn test_cltv_keeps_operand_and_needs_checker() {
        let tx = LockChecker { lock_time: 10, version: 1, sequence: 0 };
        let mut ctx = ExecutionContext::new().with_checker(&tx);
        ctx.push_number(&ScriptNumber::new(5));
        ctx.op_check_locktime_verify().unwrap();
        assert_eq!(ctx.stack.items(), &[vec![5u8]]);

        let mut ctx = ExecutionContext::new();
        ctx.push_number(&ScriptNumber::new(5));
        assert!(matches!(
            ctx.op_check_locktime_verify(),
            Err(InterpreterError::MissingTransactionContext)
        ));
    }

    #[test]
    fn test_cltv_as_nop_without_flag() {
        let mut ctx = ExecutionContext::new().with_flags(ScriptFlags::NONE);
        ctx.op_check_locktime_verify().unwrap();
        let mut ctx = ExecutionContext::new()
            .with_flags(ScriptFlags::VERIFY_DISCOURAGE_UPGRADABLE_NOPS);
        assert!(matches!(
            ctx.op_check_locktime_verify(),
            Err(InterpreterError::DiscourageUpgradableNops { .. })
        ));
    }

    #[test]
    fn test_csv() {
        let tx = LockChecker { lock_time: 0, version: 2, sequence: 10 };
        csv(&tx, 10).unwrap();
        assert!(matches!(csv(&tx, 11), Err(InterpreterError::UnsatisfiedLockTime)));
        // type flag mismatch
        assert!(matches!(
            csv(&tx, SEQUENCE_LOCK_TIME_TYPE_FLAG | 1),
            Err(InterpreterError::UnsatisfiedLockTime)
        ));
        // disabled operand is a no-op
        csv(&tx, SEQUENCE_LOCK_TIME_DISABLED).unwrap();

        let v1 = LockChecker { lock_time: 0, version: 1, sequence: 10 };
        assert!(matches!(csv(&v1, 5), Err(InterpreterError::UnsatisfiedLockTime)));
        let disabled = LockChecker { lock_time: 0, version: 2, sequence: 1 << 31 };
        assert!(matches!(csv(&disabled, 5), Err(InterpreterError::UnsatisfiedLockTime)));
    }

    #[test]
    fn test_else_endif_without_if() {
        let mut ctx = ExecutionContext::new();
        assert!(matches!(ctx.op_else(), Err(InterpreterError::UnbalancedConditional)));
        assert!(matches!(ctx.op_endif(), Err(InterpreterError::UnbalancedConditional)));
    }
}
