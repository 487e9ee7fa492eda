//! Locking script templates.
//!
//! Each builder returns a fresh [`Script`] or a [`ScriptError::InvalidTemplate`]
//! describing why the arguments cannot form the template.

use bchkit_primitives::ec::PublicKey;
use bchkit_primitives::hash::{hash160, sha256};

use crate::opcodes::Opcode;
use crate::{Script, ScriptError};

/// Largest OP_RETURN payload relayed as standard.
pub const MAX_OP_RETURN_DATA_SIZE: usize = 220;

/// Keys allowed in a bare multisig template (`OP_1`..`OP_16`).
pub const MAX_MULTISIG_KEYS: usize = 16;

/// `<pubkey> OP_CHECKSIG`
pub fn p2pk(pub_key: &PublicKey) -> Result<Script, ScriptError> {
    let mut script = Script::new();
    script
        .append_push_data(&pub_key.to_compressed())?
        .append_opcode(Opcode::CheckSig)?;
    Ok(script)
}

/// `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`
pub fn p2pkh(pub_key_hash: &[u8; 20]) -> Result<Script, ScriptError> {
    let mut script = Script::new();
    script
        .append_opcode(Opcode::Dup)?
        .append_opcode(Opcode::Hash160)?
        .append_push_data(pub_key_hash)?
        .append_opcode(Opcode::EqualVerify)?
        .append_opcode(Opcode::CheckSig)?;
    Ok(script)
}

/// `OP_HASH160 <hash160(redeem)> OP_EQUAL`
pub fn p2sh(redeem: &Script) -> Script {
    redeem.to_p2sh()
}

/// `OP_m <key>... OP_n OP_CHECKMULTISIG` with compressed keys.
///
/// Requires `1 <= m <= n <= 16`.
pub fn multisig(required: usize, keys: &[PublicKey]) -> Result<Script, ScriptError> {
    if required == 0 || required > keys.len() || keys.len() > MAX_MULTISIG_KEYS {
        return Err(ScriptError::InvalidTemplate(format!(
            "cannot build {}-of-{} multisig",
            required,
            keys.len()
        )));
    }
    let mut script = Script::new();
    script.append_number(required as i64)?;
    for key in keys {
        script.append_push_data(&key.to_compressed())?;
    }
    script
        .append_number(keys.len() as i64)?
        .append_opcode(Opcode::CheckMultiSig)?;
    Ok(script)
}

/// `OP_RETURN <text>` for a UTF-8 payload of at most 220 bytes.
pub fn op_return(text: &str) -> Result<Script, ScriptError> {
    if text.is_empty() || text.len() > MAX_OP_RETURN_DATA_SIZE {
        return Err(ScriptError::InvalidTemplate(format!(
            "OP_RETURN payload must be 1..={} bytes, got {}",
            MAX_OP_RETURN_DATA_SIZE,
            text.len()
        )));
    }
    let mut script = Script::new();
    script
        .append_opcode(Opcode::Return)?
        .append_push_data(text.as_bytes())?;
    Ok(script)
}

/// `<lock_time> OP_CHECKLOCKTIMEVERIFY OP_DROP <script>`
///
/// `lock_time` is a block height below 500,000,000 and a unix timestamp
/// otherwise, matching the transaction lock time it will be compared with.
pub fn lock_time(lock_time: u32, script: &Script) -> Result<Script, ScriptError> {
    let mut out = Script::new();
    out.append_number(lock_time as i64)?
        .append_opcode(Opcode::CheckLockTimeVerify)?
        .append_opcode(Opcode::Drop)?
        .append_script(script)?;
    Ok(out)
}

/// Combine scripts into a tree of `OP_IF`/`OP_ELSE` branches.
///
/// Scripts are paired as `OP_IF a OP_ELSE b OP_ENDIF` level by level; an
/// unpaired script at the end of a level becomes `OP_DROP c`. The spender
/// picks a branch by pushing one selector per level, truthy for the first
/// script of a pair.
pub fn condition(scripts: &[Script]) -> Result<Script, ScriptError> {
    let mut level: Vec<Script> = scripts.to_vec();
    if level.is_empty() {
        return Err(ScriptError::InvalidTemplate("no scripts to combine".to_string()));
    }
    while level.len() > 1 {
        let mut next = Vec::with_capacity((level.len() + 1) / 2);
        let mut iter = level.into_iter();
        while let Some(first) = iter.next() {
            let mut script = Script::new();
            match iter.next() {
                Some(second) => {
                    script
                        .append_opcode(Opcode::If)?
                        .append_script(&first)?
                        .append_opcode(Opcode::Else)?
                        .append_script(&second)?
                        .append_opcode(Opcode::EndIf)?;
                }
                None => {
                    script.append_opcode(Opcode::Drop)?.append_script(&first)?;
                }
            }
            next.push(script);
        }
        level = next;
    }
    Ok(level.remove(0))
}

/// Hash function guarding the claim branch of a hashed time-locked contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashOperator {
    Sha256,
    Hash160,
}

impl HashOperator {
    pub fn opcode(self) -> Opcode {
        match self {
            HashOperator::Sha256 => Opcode::Sha256,
            HashOperator::Hash160 => Opcode::Hash160,
        }
    }

    pub fn hash_size(self) -> usize {
        match self {
            HashOperator::Sha256 => 32,
            HashOperator::Hash160 => 20,
        }
    }

    pub fn hash(self, secret: &[u8]) -> Vec<u8> {
        match self {
            HashOperator::Sha256 => sha256(secret).to_vec(),
            HashOperator::Hash160 => hash160(secret).to_vec(),
        }
    }
}

/// Hashed time-locked contract.
///
/// ```text
/// OP_IF
///     [HASHOP] <digest> OP_EQUALVERIFY OP_DUP OP_HASH160 <recipient hash>
/// OP_ELSE
///     <lock_time> OP_CHECKLOCKTIMEVERIFY OP_DROP OP_DUP OP_HASH160 <sender hash>
/// OP_ENDIF
/// OP_EQUALVERIFY OP_CHECKSIG
/// ```
///
/// The recipient claims with `<sig> <pubkey> <secret> OP_1`, the sender
/// refunds after `lock_time` with `<sig> <pubkey> OP_0`.
pub fn htlc(
    recipient: &[u8; 20],
    sender: &[u8; 20],
    lock_time: u32,
    digest: &[u8],
    hash_op: HashOperator,
) -> Result<Script, ScriptError> {
    if digest.len() != hash_op.hash_size() {
        return Err(ScriptError::InvalidTemplate(format!(
            "{:?} digest must be {} bytes, got {}",
            hash_op,
            hash_op.hash_size(),
            digest.len()
        )));
    }
    let mut script = Script::new();
    script
        .append_opcode(Opcode::If)?
        .append_opcode(hash_op.opcode())?
        .append_push_data(digest)?
        .append_opcode(Opcode::EqualVerify)?
        .append_opcode(Opcode::Dup)?
        .append_opcode(Opcode::Hash160)?
        .append_push_data(recipient)?
        .append_opcode(Opcode::Else)?
        .append_number(lock_time as i64)?
        .append_opcode(Opcode::CheckLockTimeVerify)?
        .append_opcode(Opcode::Drop)?
        .append_opcode(Opcode::Dup)?
        .append_opcode(Opcode::Hash160)?
        .append_push_data(sender)?
        .append_opcode(Opcode::EndIf)?
        .append_opcode(Opcode::EqualVerify)?
        .append_opcode(Opcode::CheckSig)?;
    Ok(script)
}

/// [`htlc`] from the secret preimage instead of its digest.
pub fn htlc_from_secret(
    recipient: &[u8; 20],
    sender: &[u8; 20],
    lock_time: u32,
    secret: &[u8],
    hash_op: HashOperator,
) -> Result<Script, ScriptError> {
    htlc(recipient, sender, lock_time, &hash_op.hash(secret), hash_op)
}
