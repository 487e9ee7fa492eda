//! Script type: an owned byte buffer with chunk-level views.
//!
//! A script is kept exactly as serialized. Chunks are derived on demand and
//! borrow the buffer, so parsing never re-encodes anything and size limits
//! and signature hashes always see the original bytes.

use std::fmt;

use bchkit_primitives::ec::PublicKey;
use bchkit_primitives::hash::hash160;

use crate::chunk::{encode_push, parse_chunks, ChunkIter, PushEncoding, ScriptChunk};
use crate::interpreter::ScriptNumber;
use crate::opcodes::*;
use crate::ScriptError;

/// A Bitcoin Cash script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    /// Create a script from raw bytes. The bytes are not validated.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Create a script from a space-separated ASM string.
    ///
    /// Opcode names (`OP_DUP`, `OP_FALSE`, ...) become single opcode bytes;
    /// every other token is hex and becomes a compact data push.
    ///
    /// # Returns
    /// A `Script`, or [`ScriptError::InvalidToken`] for a token that is
    /// neither an opcode name nor hex.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        for token in asm.split_whitespace() {
            if let Some(opcode) = Opcode::from_name(token) {
                script.0.push(opcode.to_byte());
                continue;
            }
            let data =
                hex::decode(token).map_err(|_| ScriptError::InvalidToken(token.to_string()))?;
            script.0.extend_from_slice(&encode_push(&data, PushEncoding::Compact)?);
        }
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// ASM rendering: data pushes as hex, opcodes by name.
    ///
    /// # Returns
    /// A space-separated ASM string. A malformed tail renders as `[error]`
    /// after the chunks that parsed.
    pub fn to_asm(&self) -> String {
        self.render(|chunk| chunk.to_asm_string())
    }

    /// Human-readable rendering used in logs and test fixtures.
    ///
    /// Printable payloads appear quoted, short binary payloads in brackets
    /// and non-compact pushes carry their length-prefix width.
    pub fn to_debug_string(&self) -> String {
        self.render(|chunk| chunk.to_string())
    }

    fn render(&self, token: impl Fn(&ScriptChunk<'_>) -> String) -> String {
        self.iter_chunks()
            .map(|chunk| match chunk {
                Ok(chunk) => token(&chunk),
                Err(_) => "[error]".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Return a reference to the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Chunk access
    // -----------------------------------------------------------------------

    /// Parse the script into chunks borrowing its bytes.
    ///
    /// # Returns
    /// The chunks in order, or [`ScriptError::MalformedPush`] when a push
    /// runs past the end of the script.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk<'_>>, ScriptError> {
        parse_chunks(&self.0)
    }

    /// Iterate over chunks without collecting them.
    pub fn iter_chunks(&self) -> ChunkIter<'_> {
        ChunkIter::new(&self.0)
    }

    /// Chunk at `index`; negative indices count from the end (`-1` is last).
    pub fn chunk_at(&self, index: isize) -> Result<ScriptChunk<'_>, ScriptError> {
        let chunks = self.chunks()?;
        let len = chunks.len();
        resolve_index(index, len)
            .map(|i| chunks[i])
            .ok_or(ScriptError::IndexOutOfRange { index, len })
    }

    /// Opcode at `index`, or `None` when that chunk is a data push.
    pub fn opcode_at(&self, index: isize) -> Result<Option<Opcode>, ScriptError> {
        let chunk = self.chunk_at(index)?;
        Ok(chunk.is_opcode().then(|| chunk.opcode()))
    }

    /// Payload pushed at `index`, or `None` when that chunk is an opcode.
    pub fn pushed_data_at(&self, index: isize) -> Result<Option<&[u8]>, ScriptError> {
        Ok(self.chunk_at(index)?.data())
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Append a single non-push opcode.
    ///
    /// `OP_0` is accepted; direct pushes and `OP_PUSHDATA1/2/4` are rejected
    /// because they need a payload. Use [`append_push_data`](Self::append_push_data).
    pub fn append_opcode(&mut self, opcode: Opcode) -> Result<&mut Self, ScriptError> {
        let b = opcode.to_byte();
        if (OP_DATA_1..=OP_PUSHDATA4).contains(&b) {
            return Err(ScriptError::InvalidOpcodeType(opcode.name().to_string()));
        }
        self.0.push(b);
        Ok(self)
    }

    /// Append raw opcode bytes, rejecting push opcodes as
    /// [`append_opcode`](Self::append_opcode) does.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<&mut Self, ScriptError> {
        if let Some(&op) = opcodes.iter().find(|op| (OP_DATA_1..=OP_PUSHDATA4).contains(*op)) {
            return Err(ScriptError::InvalidOpcodeType(
                Opcode::from_byte(op).name().to_string(),
            ));
        }
        self.0.extend_from_slice(opcodes);
        Ok(self)
    }

    /// Append `data` with the most compact length prefix.
    ///
    /// # Returns
    /// [`ScriptError::EmptyData`] for an empty payload (append `OP_0`
    /// instead), or [`ScriptError::DataTooBig`] past `OP_PUSHDATA4` range.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<&mut Self, ScriptError> {
        self.push_data_with_encoding(data, PushEncoding::Compact)
    }

    /// Append `data` with a preferred length prefix.
    ///
    /// Fails with [`ScriptError::EncodingUnavailable`] when the prefix cannot
    /// carry the payload, e.g. a 300-byte payload with `PushData1`.
    pub fn push_data_with_encoding(
        &mut self,
        data: &[u8],
        encoding: PushEncoding,
    ) -> Result<&mut Self, ScriptError> {
        if data.is_empty() {
            return Err(ScriptError::EmptyData);
        }
        self.0.extend_from_slice(&encode_push(data, encoding)?);
        Ok(self)
    }

    /// Append hex-encoded data as a compact push.
    pub fn append_push_data_hex(&mut self, hex_str: &str) -> Result<&mut Self, ScriptError> {
        let data = hex::decode(hex_str)?;
        self.append_push_data(&data)
    }

    /// Append an integer the way the interpreter expects to read it back:
    /// `OP_0`, `OP_1NEGATE` and `OP_1`..`OP_16` for small values, a minimal
    /// script-number push otherwise.
    pub fn append_number(&mut self, n: i64) -> Result<&mut Self, ScriptError> {
        match Opcode::from_small_int(n) {
            Some(opcode) => {
                self.0.push(opcode.to_byte());
                Ok(self)
            }
            None => self.append_push_data(&ScriptNumber::new(n).to_bytes()),
        }
    }

    /// Append the bytes of another script.
    pub fn append_script(&mut self, other: &Script) -> Result<&mut Self, ScriptError> {
        if other.is_empty() {
            return Err(ScriptError::EmptyData);
        }
        self.0.extend_from_slice(&other.0);
        Ok(self)
    }

    /// Remove every push whose payload equals `data`, whatever its length
    /// prefix. Empty `data` leaves the script untouched.
    pub fn delete_occurrences_of_data(&mut self, data: &[u8]) -> Result<&mut Self, ScriptError> {
        if data.is_empty() {
            return Ok(self);
        }
        self.retain_chunks(|chunk| chunk.data() != Some(data))
    }

    /// Remove every occurrence of a non-push opcode.
    pub fn delete_occurrences_of_opcode(&mut self, opcode: Opcode) -> Result<&mut Self, ScriptError> {
        self.retain_chunks(|chunk| !(chunk.is_opcode() && chunk.opcode() == opcode))
    }

    fn retain_chunks(
        &mut self,
        keep: impl Fn(&ScriptChunk<'_>) -> bool,
    ) -> Result<&mut Self, ScriptError> {
        let mut kept = Vec::with_capacity(self.0.len());
        for chunk in self.chunks()? {
            if keep(&chunk) {
                kept.extend_from_slice(chunk.bytes());
            }
        }
        self.0 = kept;
        Ok(self)
    }

    /// Script made of the chunks from `index` to the end.
    pub fn sub_script_from(&self, index: usize) -> Result<Script, ScriptError> {
        let chunks = self.chunks()?;
        if index > chunks.len() {
            return Err(ScriptError::IndexOutOfRange {
                index: index as isize,
                len: chunks.len(),
            });
        }
        Ok(Script(join_chunks(&chunks[index..])))
    }

    /// Script made of the chunks before `index`.
    pub fn sub_script_to(&self, index: usize) -> Result<Script, ScriptError> {
        let chunks = self.chunks()?;
        if index > chunks.len() {
            return Err(ScriptError::IndexOutOfRange {
                index: index as isize,
                len: chunks.len(),
            });
        }
        Ok(Script(join_chunks(&chunks[..index])))
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// Check if this is a Pay-to-Public-Key-Hash (P2PKH) output script.
    ///
    /// Pattern: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// Check if this is a Pay-to-Public-Key (P2PK) output script.
    ///
    /// Pattern: <pubkey> OP_CHECKSIG, with a 33-byte compressed or 65-byte
    /// uncompressed key.
    pub fn is_p2pk(&self) -> bool {
        match self.chunks().as_deref() {
            Ok([key, check]) => {
                check.opcode_byte() == OP_CHECKSIG
                    && key.data().is_some_and(PublicKey::is_valid_encoding)
            }
            _ => false,
        }
    }

    /// Check if this is a Pay-to-Script-Hash (P2SH) output script.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL. Only the exact 23-byte
    /// template qualifies.
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// Whether the script ends with `OP_HASH160 <20 bytes> OP_EQUAL`.
    pub fn ends_with_p2sh(&self) -> bool {
        match self.chunks().as_deref() {
            Ok([.., hash_op, hash, equal]) => {
                hash_op.opcode_byte() == OP_HASH160
                    && hash.data().map(<[u8]>::len) == Some(20)
                    && equal.opcode_byte() == OP_EQUAL
            }
            _ => false,
        }
    }

    /// Decode a bare multisig script `OP_m <key>... OP_n OP_CHECKMULTISIG`.
    ///
    /// # Returns
    /// The number of required signatures and the public keys, or `None`
    /// unless `1 <= m <= n` and the script holds exactly `n` key pushes.
    pub fn multisig_requirements(&self) -> Option<(usize, Vec<&[u8]>)> {
        let chunks = self.chunks().ok()?;
        let [first, keys @ .., n_chunk, last] = chunks.as_slice() else {
            return None;
        };
        if last.opcode_byte() != OP_CHECKMULTISIG {
            return None;
        }
        let m = small_int(first)?;
        let n = small_int(n_chunk)?;
        if m < 1 || n < m || keys.len() != n as usize {
            return None;
        }
        let keys = keys
            .iter()
            .map(|chunk| chunk.data().filter(|d| !d.is_empty()))
            .collect::<Option<Vec<_>>>()?;
        Some((m as usize, keys))
    }

    pub fn is_multisig(&self) -> bool {
        self.multisig_requirements().is_some()
    }

    /// Multisig with at most three keys, the standardness relay limit.
    pub fn is_standard_multisig(&self) -> bool {
        self.multisig_requirements()
            .is_some_and(|(_, keys)| keys.len() <= 3)
    }

    /// `OP_RETURN <data>` with exactly one push.
    pub fn is_standard_op_return(&self) -> bool {
        self.standard_op_return_data().is_some()
    }

    /// The payload of a standard `OP_RETURN <data>` script.
    pub fn standard_op_return_data(&self) -> Option<&[u8]> {
        match parse_chunks(&self.0).ok()?.as_slice() {
            [ret, data] if ret.opcode_byte() == OP_RETURN => data.data(),
            _ => None,
        }
    }

    /// Whether every chunk is a push or a small-integer opcode.
    ///
    /// A script that fails to parse is not push-only.
    pub fn is_push_only(&self) -> bool {
        self.iter_chunks()
            .all(|chunk| chunk.is_ok_and(|c| c.opcode_byte() <= OP_16))
    }

    /// P2PKH, P2SH, P2PK or standard multisig.
    pub fn is_standard(&self) -> bool {
        self.is_p2pkh() || self.is_p2sh() || self.is_p2pk() || self.is_standard_multisig()
    }

    // -----------------------------------------------------------------------
    // Data extraction
    // -----------------------------------------------------------------------

    /// Extract the 20-byte hash from a P2PKH script.
    ///
    /// # Returns
    /// The public key hash, or [`ScriptError::InvalidTemplate`] when the
    /// script is not P2PKH.
    pub fn public_key_hash(&self) -> Result<[u8; 20], ScriptError> {
        if !self.is_p2pkh() {
            return Err(ScriptError::InvalidTemplate("not a P2PKH script".to_string()));
        }
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&self.0[3..23]);
        Ok(hash)
    }

    /// Wrap this script as a P2SH locking script paying to its HASH160.
    pub fn to_p2sh(&self) -> Script {
        let mut bytes = Vec::with_capacity(23);
        bytes.push(OP_HASH160);
        bytes.push(OP_DATA_20);
        bytes.extend_from_slice(&hash160(&self.0));
        bytes.push(OP_EQUAL);
        Script(bytes)
    }
}

fn resolve_index(index: isize, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())?
    } else {
        index as usize
    };
    (resolved < len).then_some(resolved)
}

fn join_chunks(chunks: &[ScriptChunk<'_>]) -> Vec<u8> {
    chunks.iter().flat_map(|c| c.bytes().iter().copied()).collect()
}

/// Value of an `OP_1`..`OP_16` chunk.
fn small_int(chunk: &ScriptChunk<'_>) -> Option<i64> {
    if chunk.is_push_data() {
        return None;
    }
    chunk.opcode().small_int_value().filter(|n| *n > 0)
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2PKH_HEX: &str = "76a914e2a623699e81b291c0327f408fea765d534baa2a88ac";
    const PUBKEY_HEX: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    // -----------------------------------------------------------------------
    // Construction & rendering
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_hex_roundtrip() {
        let script = Script::from_hex(P2PKH_HEX).expect("valid hex should parse");
        assert_eq!(script.to_hex(), P2PKH_HEX);
        assert!(Script::from_hex("").expect("empty hex").is_empty());
        assert!(matches!(Script::from_hex("ZZZZ"), Err(ScriptError::HexDecode(_))));
    }

    #[test]
    fn test_asm_roundtrip() {
        let asm = "OP_DUP OP_HASH160 e2a623699e81b291c0327f408fea765d534baa2a OP_EQUALVERIFY OP_CHECKSIG";
        let script = Script::from_asm(asm).expect("valid ASM should parse");
        assert_eq!(script.to_hex(), P2PKH_HEX);
        assert_eq!(script.to_asm(), asm);
        assert!(Script::from_asm("").expect("empty ASM").is_empty());
    }

    #[test]
    fn test_from_asm_rejects_bad_token() {
        assert!(matches!(
            Script::from_asm("OP_DUP nothex"),
            Err(ScriptError::InvalidToken(t)) if t == "nothex"
        ));
    }

    #[test]
    fn test_to_asm_malformed_tail_is_marked() {
        assert_eq!(Script::from_bytes(&[OP_PUSHDATA1, 0x05]).to_asm(), "[error]");
        let script = Script::from_bytes(&[0x51, 0x02, 0xab, 0xcd, 0x76, 0x4c, 0x05, 0x01]);
        assert_eq!(script.to_asm(), "OP_1 abcd OP_DUP [error]");
        assert_eq!(script.to_debug_string(), "OP_1 [abcd] OP_DUP [error]");
    }

    #[test]
    fn test_debug_string() {
        let mut script = Script::new();
        script
            .append_opcode(Opcode::Return)
            .unwrap()
            .append_push_data(b"hello")
            .unwrap()
            .append_push_data(&[0x00, 0xff])
            .unwrap()
            .push_data_with_encoding(b"hi", PushEncoding::PushData2)
            .unwrap();
        assert_eq!(script.to_debug_string(), "OP_RETURN 'hello' [00ff] 2:'hi'");
    }

    // -----------------------------------------------------------------------
    // Chunk access
    // -----------------------------------------------------------------------

    #[test]
    fn test_chunk_access_with_negative_indices() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        assert_eq!(script.opcode_at(0).unwrap(), Some(Opcode::Dup));
        assert_eq!(script.opcode_at(-1).unwrap(), Some(Opcode::CheckSig));
        assert_eq!(script.opcode_at(2).unwrap(), None);
        assert_eq!(script.pushed_data_at(-3).unwrap().map(<[u8]>::len), Some(20));
        assert!(script.pushed_data_at(0).unwrap().is_none());
        assert!(matches!(
            script.chunk_at(5),
            Err(ScriptError::IndexOutOfRange { index: 5, len: 5 })
        ));
        assert!(matches!(
            script.chunk_at(-6),
            Err(ScriptError::IndexOutOfRange { index: -6, len: 5 })
        ));
    }

    #[test]
    fn test_sub_scripts() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        assert_eq!(script.sub_script_from(3).unwrap().to_hex(), "88ac");
        assert_eq!(script.sub_script_to(2).unwrap().to_hex(), "76a9");
        assert_eq!(script.sub_script_from(5).unwrap(), Script::new());
        assert!(script.sub_script_to(6).is_err());
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    #[test]
    fn test_append_push_data_sizes() {
        let cases: [(usize, &[u8]); 4] = [
            (1, &[0x01]),
            (75, &[0x4b]),
            (76, &[OP_PUSHDATA1, 76]),
            (256, &[OP_PUSHDATA2, 0x00, 0x01]),
        ];
        for (len, prefix) in cases {
            let mut script = Script::new();
            script.append_push_data(&vec![0xab; len]).unwrap();
            assert_eq!(&script.to_bytes()[..prefix.len()], prefix, "len {len}");
            assert_eq!(script.len(), prefix.len() + len);
        }
    }

    #[test]
    fn test_append_push_data_rejects_empty() {
        assert!(matches!(Script::new().append_push_data(&[]), Err(ScriptError::EmptyData)));
    }

    #[test]
    fn test_push_data_with_encoding() {
        let mut script = Script::new();
        script.push_data_with_encoding(&[1, 2], PushEncoding::PushData4).unwrap();
        assert_eq!(script.to_hex(), "4e020000000102");
        assert!(matches!(
            Script::new().push_data_with_encoding(&[0u8; 300], PushEncoding::PushData1),
            Err(ScriptError::EncodingUnavailable { len: 300, .. })
        ));
    }

    #[test]
    fn test_append_opcode_rejects_push_opcodes() {
        let mut script = Script::new();
        script.append_opcode(Opcode::Op0).unwrap();
        assert!(matches!(
            script.append_opcode(Opcode::PushData1),
            Err(ScriptError::InvalidOpcodeType(_))
        ));
        assert!(script.append_opcodes(&[OP_DUP, OP_DATA_20]).is_err());
        assert_eq!(script.to_bytes(), &[OP_0]);
    }

    #[test]
    fn test_append_number() {
        let mut script = Script::new();
        for n in [0, -1, 1, 16, 17, -2, 1000] {
            script.append_number(n).unwrap();
        }
        assert_eq!(script.to_hex(), "004f51600111018202e803");
    }

    #[test]
    fn test_append_script() {
        let mut script = Script::from_bytes(&[OP_1]);
        script.append_script(&Script::from_bytes(&[OP_2, OP_ADD])).unwrap();
        assert_eq!(script.to_bytes(), &[OP_1, OP_2, OP_ADD]);
        assert!(script.append_script(&Script::new()).is_err());
    }

    #[test]
    fn test_delete_occurrences() {
        let mut script = Script::new();
        script
            .append_push_data(&[0xaa, 0xbb])
            .unwrap()
            .append_opcode(Opcode::CodeSeparator)
            .unwrap()
            .push_data_with_encoding(&[0xaa, 0xbb], PushEncoding::PushData1)
            .unwrap()
            .append_opcode(Opcode::CheckSig)
            .unwrap();
        script.delete_occurrences_of_data(&[0xaa, 0xbb]).unwrap();
        assert_eq!(script.to_bytes(), &[OP_CODESEPARATOR, OP_CHECKSIG]);
        script.delete_occurrences_of_opcode(Opcode::CodeSeparator).unwrap();
        assert_eq!(script.to_bytes(), &[OP_CHECKSIG]);
    }

    #[test]
    fn test_delete_keeps_pushes_of_opcode_bytes() {
        let mut script = Script::new();
        script.append_push_data(&[OP_CODESEPARATOR]).unwrap();
        script.delete_occurrences_of_opcode(Opcode::CodeSeparator).unwrap();
        assert_eq!(script.to_bytes(), &[0x01, OP_CODESEPARATOR]);
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    #[test]
    fn test_classification() {
        let p2pkh = Script::from_hex(P2PKH_HEX).unwrap();
        assert!(p2pkh.is_p2pkh() && p2pkh.is_standard());
        assert!(!p2pkh.is_p2sh() && !p2pkh.is_p2pk());

        let p2pk = Script::from_hex(&format!("21{PUBKEY_HEX}ac")).unwrap();
        assert!(p2pk.is_p2pk() && p2pk.is_standard());
        assert!(!Script::from_hex("0201ffac").unwrap().is_p2pk());

        let p2sh = p2pkh.to_p2sh();
        assert!(p2sh.is_p2sh() && p2sh.ends_with_p2sh() && p2sh.is_standard());
        assert_eq!(&p2sh.to_bytes()[2..22], &hash160(p2pkh.to_bytes()));

        let mut wrapped = Script::from_bytes(&[OP_DROP]);
        wrapped.append_script(&p2sh).unwrap();
        assert!(wrapped.ends_with_p2sh() && !wrapped.is_p2sh());
    }

    #[test]
    fn test_multisig_requirements() {
        let key = hex::decode(PUBKEY_HEX).unwrap();
        let mut script = Script::new();
        script.append_number(2).unwrap();
        for _ in 0..3 {
            script.append_push_data(&key).unwrap();
        }
        script.append_number(3).unwrap().append_opcode(Opcode::CheckMultiSig).unwrap();
        let (m, keys) = script.multisig_requirements().unwrap();
        assert_eq!((m, keys.len()), (2, 3));
        assert!(script.is_standard_multisig() && script.is_standard());

        let mut four = Script::new();
        four.append_number(1).unwrap();
        for _ in 0..4 {
            four.append_push_data(&key).unwrap();
        }
        four.append_number(4).unwrap().append_opcode(Opcode::CheckMultiSig).unwrap();
        assert!(four.is_multisig() && !four.is_standard_multisig());

        // m > n and a key count that disagrees with n
        assert!(Script::from_asm(&format!("OP_3 {PUBKEY_HEX} OP_1 OP_CHECKMULTISIG"))
            .unwrap()
            .multisig_requirements()
            .is_none());
        assert!(Script::from_asm(&format!("OP_1 {PUBKEY_HEX} OP_2 OP_CHECKMULTISIG"))
            .unwrap()
            .multisig_requirements()
            .is_none());
    }

    #[test]
    fn test_op_return() {
        let script = Script::from_asm("OP_RETURN 68656c6c6f").unwrap();
        assert!(script.is_standard_op_return());
        assert_eq!(script.standard_op_return_data(), Some(&b"hello"[..]));
        assert!(!Script::from_asm("OP_RETURN").unwrap().is_standard_op_return());
        assert!(!Script::from_asm("OP_RETURN OP_DUP").unwrap().is_standard_op_return());
    }

    #[test]
    fn test_is_push_only() {
        assert!(Script::from_asm("OP_0 OP_16 OP_1NEGATE abcd").unwrap().is_push_only());
        assert!(!Script::from_asm("OP_1 OP_NOP").unwrap().is_push_only());
        assert!(Script::new().is_push_only());
        assert!(!Script::from_bytes(&[0x05, 0x01]).is_push_only());
    }

    #[test]
    fn test_public_key_hash() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        assert_eq!(
            hex::encode(script.public_key_hash().unwrap()),
            "e2a623699e81b291c0327f408fea765d534baa2a"
        );
        assert!(matches!(
            script.to_p2sh().public_key_hash(),
            Err(ScriptError::InvalidTemplate(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Traits
    // -----------------------------------------------------------------------

    #[test]
    fn test_serde_hex() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(json, format!("\"{P2PKH_HEX}\""));
        let back: Script = serde_json::from_str(&json).unwrap();
        assert_eq!(back, script);
        assert!(serde_json::from_str::<Script>("\"zz\"").is_err());
    }

    #[test]
    fn test_display_and_debug() {
        let script = Script::from_bytes(&[OP_1, OP_2]);
        assert_eq!(script.to_string(), "5152");
        assert_eq!(format!("{script:?}"), "Script(5152)");
        assert_eq!(Script::default(), Script::new());
    }
}
