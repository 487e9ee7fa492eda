//! Splice, bitwise and hashing opcodes.

use bchkit_primitives::hash;

use crate::opcodes::Opcode;

use super::context::ExecutionContext;
use super::error::InterpreterError;
use super::scriptnum::{minimally_encode, ScriptNumber};

impl ExecutionContext<'_> {
    pub(crate) fn op_cat(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let tail = self.stack.pop()?;
        let mut head = self.stack.pop()?;
        let size = head.len() + tail.len();
        if size > self.limits.max_script_element_size {
            return Err(InterpreterError::ElementTooLarge {
                size,
                max: self.limits.max_script_element_size,
            });
        }
        head.extend_from_slice(&tail);
        self.stack.push(head);
        Ok(())
    }

    pub(crate) fn op_split(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let position = self.pop_number()?.to_i64();
        let mut data = self.stack.pop()?;
        if position < 0 || position as u64 > data.len() as u64 {
            return Err(InterpreterError::InvalidSplitRange {
                index: position,
                size: data.len(),
            });
        }
        let tail = data.split_off(position as usize);
        self.stack.push(data);
        self.stack.push(tail);
        Ok(())
    }

    /// Re-encode a number into exactly `size` bytes, moving the sign bit to
    /// the new last byte.
    pub(crate) fn op_num2bin(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let size = self.pop_number()?.to_i64();
        if size < 0 || size as u64 > self.limits.max_script_element_size as u64 {
            return Err(InterpreterError::ElementTooLarge {
                size: size.max(0) as usize,
                max: self.limits.max_script_element_size,
            });
        }
        let size = size as usize;

        let mut raw = minimally_encode(&self.stack.pop()?);
        if raw.len() > size {
            return Err(InterpreterError::InvalidNumberRange);
        }
        if raw.len() == size {
            self.stack.push(raw);
            return Ok(());
        }

        let mut sign = 0x00;
        if let Some(last) = raw.last_mut() {
            sign = *last & 0x80;
            *last &= 0x7f;
        }
        raw.resize(size, 0x00);
        if let Some(last) = raw.last_mut() {
            *last |= sign;
        }
        self.stack.push(raw);
        Ok(())
    }

    pub(crate) fn op_bin2num(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(1)?;
        let raw = minimally_encode(&self.stack.pop()?);
        if raw.len() > self.limits.max_script_number_length {
            return Err(InterpreterError::InvalidNumberRange);
        }
        self.stack.push(raw);
        Ok(())
    }

    pub(crate) fn op_size(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(1)?;
        let len = self.stack.peek(-1)?.len() as i64;
        self.push_number(&ScriptNumber::new(len));
        Ok(())
    }

    pub(crate) fn op_bitwise(&mut self, opcode: Opcode) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let b = self.stack.pop()?;
        let mut a = self.stack.pop()?;
        if a.len() != b.len() {
            return Err(InterpreterError::InvalidOperandSize);
        }
        for (x, y) in a.iter_mut().zip(&b) {
            *x = match opcode {
                Opcode::And => *x & y,
                Opcode::Or => *x | y,
                _ => *x ^ y,
            };
        }
        self.stack.push(a);
        Ok(())
    }

    /// Byte-wise equality, not numeric.
    pub(crate) fn op_equal(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        self.push_bool(a == b);
        Ok(())
    }

    pub(crate) fn op_hash(&mut self, opcode: Opcode) -> Result<(), InterpreterError> {
        self.stack.require(1)?;
        let data = self.stack.pop()?;
        let digest = match opcode {
            Opcode::Ripemd160 => hash::ripemd160(&data).to_vec(),
            Opcode::Sha1 => hash::sha1(&data).to_vec(),
            Opcode::Sha256 => hash::sha256(&data).to_vec(),
            Opcode::Hash160 => hash::hash160(&data).to_vec(),
            _ => hash::sha256d(&data).to_vec(),
        };
        self.stack.push(digest);
        Ok(())
    }
}
