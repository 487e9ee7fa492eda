//! Signature-checking opcodes and signature encoding rules.

use bchkit_primitives::ec::Signature;

use crate::opcodes::Opcode;
use crate::Script;

use super::context::ExecutionContext;
use super::error::InterpreterError;
use super::flags::ScriptFlags;

pub const SIGHASH_FORKID: u8 = 0x40;
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

impl ExecutionContext<'_> {
    pub(crate) fn op_checksig(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(2)?;
        let pub_key = self.stack.pop()?;
        let sig = self.stack.pop()?;

        self.check_signature_encoding(&sig)?;
        self.check_pub_key_encoding(&pub_key)?;

        let valid = if sig.is_empty() {
            false
        } else {
            let checker = self.checker()?;
            let script_code = self.signed_script_code(&[sig.as_slice()])?;
            checker.verify_signature(&sig, &pub_key, &script_code)?
        };

        if !valid && !sig.is_empty() && self.has_flag(ScriptFlags::VERIFY_NULL_FAIL) {
            return Err(InterpreterError::NullFail);
        }
        self.push_bool(valid);
        Ok(())
    }

    /// `<dummy> <sig>.. m <key>.. n OP_CHECKMULTISIG`.
    ///
    /// Signatures are matched against keys in order; a key that fails is
    /// skipped and never revisited. The dummy element is popped unchecked.
    pub(crate) fn op_checkmultisig(&mut self) -> Result<(), InterpreterError> {
        self.stack.require(1)?;
        let max_keys = self.limits.max_pubkeys_per_multisig;
        let key_count = self.pop_number()?.to_i64();
        if key_count < 0 || key_count as u64 > max_keys as u64 {
            return Err(InterpreterError::PubKeyCount {
                count: key_count,
                max: max_keys,
            });
        }
        let key_count = key_count as usize;
        self.increment_op_count(key_count)?;

        self.stack.require(key_count + 1)?;
        let mut keys = Vec::with_capacity(key_count);
        for _ in 0..key_count {
            keys.push(self.stack.pop()?);
        }

        let sig_count = self.pop_number()?.to_i64();
        if sig_count < 0 || sig_count as u64 > key_count as u64 {
            return Err(InterpreterError::SigCount {
                count: sig_count,
                max: key_count,
            });
        }
        let sig_count = sig_count as usize;

        self.stack.require(sig_count + 1)?;
        let mut sigs = Vec::with_capacity(sig_count);
        for _ in 0..sig_count {
            sigs.push(self.stack.pop()?);
        }
        self.stack.pop()?;

        let sig_refs: Vec<&[u8]> = sigs.iter().map(Vec::as_slice).collect();
        let script_code = self.signed_script_code(&sig_refs)?;

        let mut success = true;
        let mut sig_idx = 0;
        let mut key_idx = 0;
        while sig_idx < sig_count {
            if sig_count - sig_idx > key_count - key_idx {
                success = false;
                break;
            }
            let sig = &sigs[sig_idx];
            let key = &keys[key_idx];
            self.check_signature_encoding(sig)?;
            self.check_pub_key_encoding(key)?;

            let matched = !sig.is_empty()
                && self.checker()?.verify_signature(sig, key, &script_code)?;
            if matched {
                sig_idx += 1;
            }
            key_idx += 1;
        }

        if !success
            && self.has_flag(ScriptFlags::VERIFY_NULL_FAIL)
            && sigs.iter().any(|s| !s.is_empty())
        {
            return Err(InterpreterError::NullFail);
        }
        self.push_bool(success);
        Ok(())
    }

    /// The script code a signature commits to: the current script after
    /// the last executed `OP_CODESEPARATOR`. For legacy signatures the
    /// signatures themselves and any remaining separators are removed.
    fn signed_script_code(&self, sigs: &[&[u8]]) -> Result<Script, InterpreterError> {
        let start = self.code_separator.min(self.script_code.len());
        let mut script = Script::from_bytes(&self.script_code[start..]);
        let mut legacy = false;
        for sig in sigs {
            if !self.uses_fork_id(sig) {
                script.delete_occurrences_of_data(sig)?;
                legacy = true;
            }
        }
        if legacy {
            script.delete_occurrences_of_opcode(Opcode::CodeSeparator)?;
        }
        Ok(script)
    }

    fn uses_fork_id(&self, sig: &[u8]) -> bool {
        self.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID)
            && sig.last().is_some_and(|ht| ht & SIGHASH_FORKID != 0)
    }

    /// DER, low-S and hash type rules for a signature with its hash type
    /// byte appended. Empty signatures always pass.
    pub(crate) fn check_signature_encoding(&self, sig: &[u8]) -> Result<(), InterpreterError> {
        let Some((&hash_type, der)) = sig.split_last() else {
            return Ok(());
        };

        if self.flags.has_any(&[ScriptFlags::VERIFY_STRICT_ENCODING, ScriptFlags::VERIFY_LOW_S]) {
            check_der_encoding(der)?;
        }

        if self.has_flag(ScriptFlags::VERIFY_LOW_S) {
            let parsed = Signature::from_der(der).map_err(|_| InterpreterError::SigDer("unparseable"))?;
            if !parsed.is_low_s() {
                return Err(InterpreterError::SigHighS);
            }
        }

        if self.has_flag(ScriptFlags::VERIFY_STRICT_ENCODING) {
            let base = hash_type & !(SIGHASH_FORKID | SIGHASH_ANYONECANPAY);
            if !(1..=3).contains(&base) {
                return Err(InterpreterError::SigHashType { hash_type });
            }
            let uses_fork_id = hash_type & SIGHASH_FORKID != 0;
            let fork_id_enabled = self.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID);
            if uses_fork_id && !fork_id_enabled {
                return Err(InterpreterError::IllegalForkId);
            }
            if !uses_fork_id && fork_id_enabled {
                return Err(InterpreterError::MustUseForkId);
            }
        }
        Ok(())
    }

    pub(crate) fn check_pub_key_encoding(&self, pub_key: &[u8]) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_STRICT_ENCODING) {
            return Ok(());
        }
        match pub_key {
            [0x02 | 0x03, rest @ ..] if rest.len() == 32 => Ok(()),
            [0x04, rest @ ..] if rest.len() == 64 => Ok(()),
            _ => Err(InterpreterError::PubKeyType),
        }
    }
}

/// Strict DER: `0x30 len 0x02 rlen R 0x02 slen S`, with minimal positive
/// integers and no trailing bytes.
fn check_der_encoding(sig: &[u8]) -> Result<(), InterpreterError> {
    let sig_len = sig.len();
    if sig_len < 8 {
        return Err(InterpreterError::SigDer("too short"));
    }
    if sig_len > 72 {
        return Err(InterpreterError::SigDer("too long"));
    }
    if sig[0] != 0x30 {
        return Err(InterpreterError::SigDer("wrong sequence marker"));
    }
    if sig[1] as usize != sig_len - 2 {
        return Err(InterpreterError::SigDer("bad length"));
    }

    let r_len = sig[3] as usize;
    let s_type_offset = 4 + r_len;
    let s_len_offset = s_type_offset + 1;
    if s_len_offset >= sig_len {
        return Err(InterpreterError::SigDer("S missing"));
    }
    let s_offset = s_len_offset + 1;
    let s_len = sig[s_len_offset] as usize;
    if s_offset + s_len != sig_len {
        return Err(InterpreterError::SigDer("invalid S length"));
    }

    if sig[2] != 0x02 {
        return Err(InterpreterError::SigDer("R integer marker"));
    }
    if r_len == 0 {
        return Err(InterpreterError::SigDer("R length is zero"));
    }
    if sig[4] & 0x80 != 0 {
        return Err(InterpreterError::SigDer("R is negative"));
    }
    if r_len > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return Err(InterpreterError::SigDer("R has too much padding"));
    }

    if sig[s_type_offset] != 0x02 {
        return Err(InterpreterError::SigDer("S integer marker"));
    }
    if s_len == 0 {
        return Err(InterpreterError::SigDer("S length is zero"));
    }
    if sig[s_offset] & 0x80 != 0 {
        return Err(InterpreterError::SigDer("S is negative"));
    }
    if s_len > 1 && sig[s_offset] == 0x00 && sig[s_offset + 1] & 0x80 == 0 {
        return Err(InterpreterError::SigDer("S has too much padding"));
    }
    Ok(())
}
