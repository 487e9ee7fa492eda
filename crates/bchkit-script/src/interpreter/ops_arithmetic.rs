//! Numeric opcodes.

use crate::opcodes::Opcode;

use super::context::ExecutionContext;
use super::error::InterpreterError;

impl ExecutionContext<'_> {
    pub(crate) fn op_unary_arith(&mut self, opcode: Opcode) -> Result<(), InterpreterError> {
        self.stack.require(1)?;
        let mut n = self.pop_number()?;
        match opcode {
            Opcode::Add1 => {
                n.incr();
            }
            Opcode::Sub1 => {
                n.decr();
            }
            Opcode::Negate => {
                n.neg();
            }
            Opcode::Abs => {
                n.abs();
            }
            Opcode::Not => {
                self.push_bool(n.is_zero());
                return Ok(());
            }
            _ => {
                self.push_bool(!n.is_zero());
                return Ok(());
            }
        }
        self.push_number(&n);
        Ok(())
    }

    /// Binary numeric opcodes; `b` is the top item and `a` the one below.
    pub(crate) fn op_binary_arith(&mut self, opcode: Opcode) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let b = self.pop_number()?;
        let mut a = self.pop_number()?;

        let flag = match opcode {
            Opcode::BoolAnd => !a.is_zero() && !b.is_zero(),
            Opcode::BoolOr => !a.is_zero() || !b.is_zero(),
            Opcode::NumEqual => a == b,
            Opcode::NumNotEqual => a != b,
            Opcode::LessThan => a < b,
            Opcode::GreaterThan => a > b,
            Opcode::LessThanOrEqual => a <= b,
            Opcode::GreaterThanOrEqual => a >= b,
            _ => {
                let result = match opcode {
                    Opcode::Add => a.add(&b).clone(),
                    Opcode::Sub => a.sub(&b).clone(),
                    Opcode::Div | Opcode::Mod if b.is_zero() => {
                        return Err(InterpreterError::DivideByZero);
                    }
                    Opcode::Div => a.div(&b).clone(),
                    Opcode::Mod => a.modulo(&b).clone(),
                    Opcode::Min => a.min(b),
                    _ => a.max(b),
                };
                self.push_number(&result);
                return Ok(());
            }
        };
        self.push_bool(flag);
        Ok(())
    }

    /// `x min max WITHIN` is true when `min <= x < max`.
    pub(crate) fn op_within(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(3)?;
        let max = self.pop_number()?;
        let min = self.pop_number()?;
        let x = self.pop_number()?;
        self.push_bool(min <= x && x < max);
        Ok(())
    }
}
