//! Script chunk parsing and encoding.
//!
//! A script chunk is either a single opcode byte or a data push (opcode,
//! optional length prefix, payload). Chunks borrow the parent script's bytes
//! and record their byte range, so concatenating the ranges of every chunk
//! reproduces the script exactly.

use std::fmt;
use std::ops::Range;

use crate::opcodes::*;
use crate::ScriptError;

/// Length prefix used when encoding a data push.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PushEncoding {
    /// The smallest encoding that fits the payload.
    Compact,
    /// Opcode byte is the length (payloads under 76 bytes).
    Direct,
    /// `OP_PUSHDATA1` with a one-byte length.
    PushData1,
    /// `OP_PUSHDATA2` with a two-byte little-endian length.
    PushData2,
    /// `OP_PUSHDATA4` with a four-byte little-endian length.
    PushData4,
}

/// A single parsed element of a script, borrowing the script bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ScriptChunk<'a> {
    script: &'a [u8],
    start: usize,
    payload: usize,
    end: usize,
}

impl<'a> ScriptChunk<'a> {
    /// Byte range of this chunk within the owning script.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The raw chunk bytes: opcode, length prefix and payload.
    pub fn bytes(&self) -> &'a [u8] {
        &self.script[self.start..self.end]
    }

    /// The opcode byte at the start of the chunk.
    pub fn opcode_byte(&self) -> u8 {
        self.script[self.start]
    }

    /// The decoded opcode at the start of the chunk.
    pub fn opcode(&self) -> Opcode {
        Opcode::from_byte(self.opcode_byte())
    }

    /// Whether this chunk pushes inline data (`OP_0`..=`OP_PUSHDATA4`).
    pub fn is_push_data(&self) -> bool {
        self.opcode_byte() <= OP_PUSHDATA4
    }

    /// Whether this chunk is a plain opcode.
    pub fn is_opcode(&self) -> bool {
        !self.is_push_data()
    }

    /// The pushed payload, or `None` for opcode chunks.
    pub fn data(&self) -> Option<&'a [u8]> {
        if self.is_push_data() {
            Some(&self.script[self.payload..self.end])
        } else {
            None
        }
    }

    /// Whether the payload uses the shortest possible length prefix.
    ///
    /// Opcode chunks are never considered compact data.
    pub fn is_data_compact(&self) -> bool {
        let len = self.end - self.payload;
        match self.opcode_byte() {
            op if op < OP_PUSHDATA1 => true,
            OP_PUSHDATA1 => len >= OP_PUSHDATA1 as usize,
            OP_PUSHDATA2 => len > 0xff,
            OP_PUSHDATA4 => len > 0xffff,
            _ => false,
        }
    }

    /// Whether the push uses the smallest opcode able to produce its value,
    /// including `OP_0`, `OP_1NEGATE` and `OP_1`..`OP_16` for one-byte values.
    pub fn is_minimal_push(&self) -> bool {
        let Some(data) = self.data() else {
            return true;
        };
        let op = self.opcode_byte();
        match data {
            [] => op == OP_0,
            [b] if (1..=16).contains(b) || *b == 0x81 => false,
            _ if data.len() < OP_PUSHDATA1 as usize => op as usize == data.len(),
            _ if data.len() <= 0xff => op == OP_PUSHDATA1,
            _ if data.len() <= 0xffff => op == OP_PUSHDATA2,
            _ => true,
        }
    }

    /// ASM token: hex for data pushes, the opcode name otherwise.
    pub fn to_asm_string(&self) -> String {
        match self.data() {
            Some([]) => "OP_0".to_string(),
            Some(data) => hex::encode(data),
            None => self.opcode().to_string(),
        }
    }

    fn length_prefix_width(&self) -> usize {
        match self.opcode_byte() {
            OP_PUSHDATA2 => 2,
            OP_PUSHDATA4 => 4,
            _ => 1,
        }
    }
}

impl fmt::Display for ScriptChunk<'_> {
    /// Debug-string rendering of the chunk.
    ///
    /// Opcodes render by name and an empty push as `OP_0`. Printable ASCII
    /// payloads render between single quotes, anything else as hex wrapped
    /// in brackets when shorter than 16 bytes. Non-compact pushes carry a
    /// `1:`, `2:` or `4:` prefix naming the length prefix width.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = match self.data() {
            None => return write!(f, "{}", self.opcode()),
            Some([]) => return f.write_str("OP_0"),
            Some(data) => data,
        };
        if !self.is_data_compact() {
            write!(f, "{}:", self.length_prefix_width())?;
        }
        if data.iter().all(|b| (0x20..=0x7e).contains(b)) {
            f.write_str("'")?;
            for &b in data {
                match b {
                    b'\\' => f.write_str("\\\\")?,
                    b'\'' => f.write_str("\\'")?,
                    _ => write!(f, "{}", b as char)?,
                }
            }
            f.write_str("'")
        } else if data.len() < 16 {
            write!(f, "[{}]", hex::encode(data))
        } else {
            f.write_str(&hex::encode(data))
        }
    }
}

impl fmt::Debug for ScriptChunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptChunk({:?}, {})", self.range(), self)
    }
}

/// Iterator over the chunks of a script.
///
/// Yields one error and then stops when a push runs past the end.
pub struct ChunkIter<'a> {
    script: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> ChunkIter<'a> {
    /// Start iterating at the beginning of `script`.
    pub fn new(script: &'a [u8]) -> Self {
        ChunkIter {
            script,
            offset: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<ScriptChunk<'a>, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.script.len() {
            return None;
        }
        match read_chunk(self.script, self.offset) {
            Ok(chunk) => {
                self.offset = chunk.end;
                Some(Ok(chunk))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Split raw script bytes into chunks.
///
/// Fails with [`ScriptError::MalformedPush`] if a declared payload runs past
/// the end of the script.
pub fn parse_chunks(script: &[u8]) -> Result<Vec<ScriptChunk<'_>>, ScriptError> {
    ChunkIter::new(script).collect()
}

fn read_chunk(script: &[u8], offset: usize) -> Result<ScriptChunk<'_>, ScriptError> {
    let op = script[offset];
    let available = script.len() - offset - 1;
    let (prefix_len, data_len) = match op {
        0x00..=0x4b => (0, op as usize),
        OP_PUSHDATA1 | OP_PUSHDATA2 | OP_PUSHDATA4 => {
            let width = match op {
                OP_PUSHDATA1 => 1,
                OP_PUSHDATA2 => 2,
                _ => 4,
            };
            if available < width {
                return Err(ScriptError::MalformedPush {
                    offset,
                    needed: width,
                    available,
                });
            }
            let mut len_bytes = [0u8; 4];
            len_bytes[..width].copy_from_slice(&script[offset + 1..offset + 1 + width]);
            (width, u32::from_le_bytes(len_bytes) as usize)
        }
        _ => (0, 0),
    };

    let needed = prefix_len.saturating_add(data_len);
    if needed > available {
        return Err(ScriptError::MalformedPush {
            offset,
            needed,
            available,
        });
    }
    Ok(ScriptChunk {
        script,
        start: offset,
        payload: offset + 1 + prefix_len,
        end: offset + 1 + needed,
    })
}

/// Encode `data` as a push with the requested length prefix.
///
/// An empty payload with [`PushEncoding::Compact`] or
/// [`PushEncoding::Direct`] encodes as `OP_0`.
pub fn encode_push(data: &[u8], encoding: PushEncoding) -> Result<Vec<u8>, ScriptError> {
    use PushEncoding::*;
    let len = data.len();
    let mut out = Vec::with_capacity(len + 5);
    if len < OP_PUSHDATA1 as usize && matches!(encoding, Compact | Direct) {
        out.push(len as u8);
    } else if len <= 0xff && matches!(encoding, Compact | PushData1) {
        out.push(OP_PUSHDATA1);
        out.push(len as u8);
    } else if len <= 0xffff && matches!(encoding, Compact | PushData2) {
        out.push(OP_PUSHDATA2);
        out.extend_from_slice(&(len as u16).to_le_bytes());
    } else if len as u64 <= 0xffff_ffff && matches!(encoding, Compact | PushData4) {
        out.push(OP_PUSHDATA4);
        out.extend_from_slice(&(len as u32).to_le_bytes());
    } else if encoding == Compact {
        return Err(ScriptError::DataTooBig(len));
    } else {
        return Err(ScriptError::EncodingUnavailable { len, encoding });
    }
    out.extend_from_slice(data);
    Ok(out)
}

/// Encode several payloads as consecutive compact pushes.
pub fn encode_pushes(parts: &[&[u8]]) -> Result<Vec<u8>, ScriptError> {
    let mut result = Vec::new();
    for part in parts {
        result.extend_from_slice(&encode_push(part, PushEncoding::Compact)?);
    }
    Ok(result)
}
