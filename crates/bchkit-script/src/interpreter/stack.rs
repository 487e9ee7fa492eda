//! Data and alt stacks for the script interpreter.
//!
//! Positions are addressed from the top with negative offsets: `-1` is the
//! top item, `-2` the one below it. Opcodes call [`Stack::require`] before
//! touching items so a short stack fails with a structured underflow error.

use super::error::InterpreterError;

/// Truthiness of a stack element: any non-zero byte is true, except a
/// lone sign bit in the last byte (negative zero).
pub fn as_bool(t: &[u8]) -> bool {
    for (i, &b) in t.iter().enumerate() {
        if b != 0 {
            return !(i == t.len() - 1 && b == 0x80);
        }
    }
    false
}

/// Encode a boolean: true is `0x01`, false is empty.
pub fn from_bool(v: bool) -> Vec<u8> {
    if v {
        vec![1]
    } else {
        vec![]
    }
}

/// An ordered sequence of byte strings; the last element is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    items: Vec<Vec<u8>>,
    alt: bool,
}

impl Stack {
    pub fn new() -> Self {
        Stack::default()
    }

    /// A stack whose underflows report as alt-stack errors.
    pub fn new_alt() -> Self {
        Stack {
            items: Vec::new(),
            alt: true,
        }
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items bottom to top.
    pub fn items(&self) -> &[Vec<u8>] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<Vec<u8>>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Fail unless at least `n` items are present.
    pub fn require(&self, n: usize) -> Result<(), InterpreterError> {
        if self.items.len() >= n {
            return Ok(());
        }
        let available = self.items.len();
        Err(if self.alt {
            InterpreterError::AltStackUnderflow {
                required: n,
                available,
            }
        } else {
            InterpreterError::StackUnderflow {
                required: n,
                available,
            }
        })
    }

    pub fn push(&mut self, data: Vec<u8>) {
        self.items.push(data);
    }

    pub fn pop(&mut self) -> Result<Vec<u8>, InterpreterError> {
        self.require(1)?;
        self.items.pop().ok_or(InterpreterError::StackUnderflow {
            required: 1,
            available: 0,
        })
    }

    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        Ok(as_bool(&self.pop()?))
    }

    /// Borrow the item at a top-relative offset.
    pub fn peek(&self, index: isize) -> Result<&[u8], InterpreterError> {
        let pos = self.position(index)?;
        Ok(&self.items[pos])
    }

    /// Remove and return the item at a top-relative offset.
    pub fn remove(&mut self, index: isize) -> Result<Vec<u8>, InterpreterError> {
        let pos = self.position(index)?;
        Ok(self.items.remove(pos))
    }

    /// Insert so the new item ends up at the given top-relative offset.
    pub fn insert(&mut self, index: isize, data: Vec<u8>) -> Result<(), InterpreterError> {
        let len = self.items.len();
        let needed = index.unsigned_abs();
        if index >= 0 || needed > len + 1 {
            self.require(needed.saturating_sub(1).max(1))?;
            return Err(InterpreterError::InvalidStackIndex {
                index: index as i64,
            });
        }
        self.items.insert(len + 1 - needed, data);
        Ok(())
    }

    pub fn swap(&mut self, a: isize, b: isize) -> Result<(), InterpreterError> {
        let pa = self.position(a)?;
        let pb = self.position(b)?;
        self.items.swap(pa, pb);
        Ok(())
    }

    fn position(&self, index: isize) -> Result<usize, InterpreterError> {
        let len = self.items.len();
        let needed = index.unsigned_abs();
        if index >= 0 || needed > len {
            self.require(needed.max(1))?;
            return Err(InterpreterError::InvalidStackIndex {
                index: index as i64,
            });
        }
        Ok(len - needed)
    }
}
