//! Script number encoding and arithmetic.
//!
//! Numbers on the stack are little-endian byte strings with the sign in the
//! high bit of the last byte. Arithmetic opcodes only accept 4-byte operands,
//! but results may grow past that and stay valid as long as they are never
//! read back as numbers, so values are held as big integers.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::error::InterpreterError;

/// A decoded script number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScriptNumber {
    pub val: BigInt,
}

impl ScriptNumber {
    pub fn new(val: i64) -> Self {
        ScriptNumber {
            val: BigInt::from(val),
        }
    }

    /// Decode a stack element.
    ///
    /// `max_len` bounds the operand width and `require_minimal` rejects
    /// encodings with superfluous zero bytes (including negative zero).
    pub fn from_bytes(
        bb: &[u8],
        max_len: usize,
        require_minimal: bool,
    ) -> Result<Self, InterpreterError> {
        if bb.len() > max_len {
            return Err(InterpreterError::NumberTooLarge {
                size: bb.len(),
                max: max_len,
            });
        }
        if require_minimal {
            check_minimal_data_encoding(bb)?;
        }

        let Some((&last, _)) = bb.split_last() else {
            return Ok(ScriptNumber {
                val: BigInt::zero(),
            });
        };

        let mut v = BigInt::zero();
        for (i, &b) in bb.iter().enumerate() {
            v |= BigInt::from(b) << (8 * i);
        }

        if last & 0x80 != 0 {
            let mask = !(BigInt::from(0x80_i64) << (8 * (bb.len() - 1)));
            v &= mask;
            v = -v;
        }

        Ok(ScriptNumber { val: v })
    }

    /// Minimal little-endian sign-magnitude encoding; zero is empty.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.val.is_zero() {
            return vec![];
        }

        let is_negative = self.val.is_negative();
        let (_, mut result) = self.val.abs().to_bytes_le();

        if let Some(last) = result.last_mut() {
            if *last & 0x80 != 0 {
                result.push(if is_negative { 0x80 } else { 0x00 });
            } else if is_negative {
                *last |= 0x80;
            }
        }
        result
    }

    pub fn add(&mut self, other: &ScriptNumber) -> &mut Self {
        self.val = &self.val + &other.val;
        self
    }

    pub fn sub(&mut self, other: &ScriptNumber) -> &mut Self {
        self.val = &self.val - &other.val;
        self
    }

    /// Truncated division. The caller rejects a zero divisor.
    pub fn div(&mut self, other: &ScriptNumber) -> &mut Self {
        let (q, _) = self.val.div_rem(&other.val);
        self.val = q;
        self
    }

    /// Truncated remainder; takes the sign of the dividend.
    pub fn modulo(&mut self, other: &ScriptNumber) -> &mut Self {
        let (_, r) = self.val.div_rem(&other.val);
        self.val = r;
        self
    }

    pub fn incr(&mut self) -> &mut Self {
        self.val = &self.val + BigInt::one();
        self
    }

    pub fn decr(&mut self) -> &mut Self {
        self.val = &self.val - BigInt::one();
        self
    }

    pub fn neg(&mut self) -> &mut Self {
        self.val = -self.val.clone();
        self
    }

    pub fn abs(&mut self) -> &mut Self {
        if self.val.is_negative() {
            self.val = -self.val.clone();
        }
        self
    }

    pub fn is_zero(&self) -> bool {
        self.val.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.val.is_negative()
    }

    /// Convert to i32, clamping on overflow.
    pub fn to_i32(&self) -> i32 {
        match self.val.to_i64() {
            Some(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            None if self.val.is_positive() => i32::MAX,
            None => i32::MIN,
        }
    }

    /// Convert to i64, clamping on overflow.
    pub fn to_i64(&self) -> i64 {
        match self.val.to_i64() {
            Some(v) => v,
            None if self.val.is_positive() => i64::MAX,
            None => i64::MIN,
        }
    }
}

impl From<i64> for ScriptNumber {
    fn from(val: i64) -> Self {
        ScriptNumber::new(val)
    }
}

/// Strip superfluous high zero bytes while keeping the sign (`OP_BIN2NUM`).
pub fn minimally_encode(data: &[u8]) -> Vec<u8> {
    let Some(&last) = data.last() else {
        return vec![];
    };
    if last & 0x7f != 0 {
        return data.to_vec();
    }
    if data.len() == 1 {
        return vec![];
    }
    if data[data.len() - 2] & 0x80 != 0 {
        return data.to_vec();
    }

    let mut data = data.to_vec();
    let mut i = data.len() - 1;
    while i > 0 {
        if data[i - 1] != 0 {
            if data[i - 1] & 0x80 != 0 {
                data[i] = last;
                data.truncate(i + 1);
            } else {
                data[i - 1] |= last;
                data.truncate(i);
            }
            return data;
        }
        i -= 1;
    }
    vec![]
}

/// Reject number encodings with a superfluous trailing zero or sign byte.
pub fn check_minimal_data_encoding(v: &[u8]) -> Result<(), InterpreterError> {
    let Some(&last) = v.last() else {
        return Ok(());
    };
    if last & 0x7f == 0 && (v.len() == 1 || v[v.len() - 2] & 0x80 == 0) {
        return Err(InterpreterError::NonMinimalNumber);
    }
    Ok(())
}
