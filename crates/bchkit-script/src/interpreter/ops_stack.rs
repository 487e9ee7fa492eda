//! Stack manipulation opcodes.

use super::context::ExecutionContext;
use super::error::InterpreterError;
use super::stack::as_bool;

impl ExecutionContext<'_> {
    pub(crate) fn op_to_alt_stack(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(1)?;
        let data = self.stack.pop()?;
        self.alt_stack.push(data);
        Ok(())
    }

    pub(crate) fn op_from_alt_stack(&mut self) -> Result<(), InterpreterError> {
        self.alt_stack.require(1)?;
        let data = self.alt_stack.pop()?;
        self.stack.push(data);
        Ok(())
    }

    pub(crate) fn op_drop(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(1)?;
        self.stack.pop()?;
        Ok(())
    }

    pub(crate) fn op_2drop(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        self.stack.pop()?;
        self.stack.pop()?;
        Ok(())
    }

    pub(crate) fn op_dup(&mut self) -> Result<(), InterpreterError> {
        self.dup_n(1)
    }

    pub(crate) fn op_2dup(&mut self) -> Result<(), InterpreterError> {
        self.dup_n(2)
    }

    pub(crate) fn op_3dup(&mut self) -> Result<(), InterpreterError> {
        self.dup_n(3)
    }

    /// Copy the top `n` items, preserving their order.
    fn dup_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.stack.require(n)?;
        for _ in 0..n {
            let item = self.stack.peek(-(n as isize))?.to_vec();
            self.stack.push(item);
        }
        Ok(())
    }

    pub(crate) fn op_over(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let item = self.stack.peek(-2)?.to_vec();
        self.stack.push(item);
        Ok(())
    }

    pub(crate) fn op_2over(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(4)?;
        for _ in 0..2 {
            let item = self.stack.peek(-4)?.to_vec();
            self.stack.push(item);
        }
        Ok(())
    }

    pub(crate) fn op_nip(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        self.stack.remove(-2)?;
        Ok(())
    }

    pub(crate) fn op_rot(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(3)?;
        let item = self.stack.remove(-3)?;
        self.stack.push(item);
        Ok(())
    }

    pub(crate) fn op_2rot(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(6)?;
        let first = self.stack.remove(-6)?;
        let second = self.stack.remove(-5)?;
        self.stack.push(first);
        self.stack.push(second);
        Ok(())
    }

    pub(crate) fn op_swap(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        self.stack.swap(-2, -1)
    }

    pub(crate) fn op_2swap(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(4)?;
        self.stack.swap(-4, -2)?;
        self.stack.swap(-3, -1)
    }

    pub(crate) fn op_tuck(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let top = self.stack.peek(-1)?.to_vec();
        self.stack.insert(-3, top)
    }

    pub(crate) fn op_ifdup(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(1)?;
        let top = self.stack.peek(-1)?;
        if as_bool(top) {
            let copy = top.to_vec();
            self.stack.push(copy);
        }
        Ok(())
    }

    /// `OP_PICK` copies and `OP_ROLL` moves the item `n` below the top.
    pub(crate) fn op_pick(&mut self, roll: bool) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let n = self.pop_number()?.to_i64();
        if n < 0 {
            return Err(InterpreterError::InvalidStackIndex { index: n });
        }
        let depth = self.stack.depth();
        if n as u64 >= depth as u64 {
            return Err(InterpreterError::StackUnderflow {
                required: (n as usize).saturating_add(1),
                available: depth,
            });
        }
        let index = -(n as isize) - 1;
        let item = if roll {
            self.stack.remove(index)?
        } else {
            self.stack.peek(index)?.to_vec()
        };
        self.stack.push(item);
        Ok(())
    }
}
