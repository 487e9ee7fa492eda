//! Opcode table.
//!
//! Raw opcode byte values are exported as `OP_*` constants for building
//! scripts byte by byte. The closed [`Opcode`] enum is the decoded view the
//! interpreter dispatches on: every byte value maps to exactly one variant.

use std::fmt;

// Push value
pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = 0x00;
pub const OP_DATA_1: u8 = 0x01;
pub const OP_DATA_20: u8 = 0x14;
pub const OP_DATA_32: u8 = 0x20;
pub const OP_DATA_33: u8 = 0x21;
pub const OP_DATA_65: u8 = 0x41;
pub const OP_DATA_75: u8 = 0x4b;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_RESERVED: u8 = 0x50;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = 0x51;
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_4: u8 = 0x54;
pub const OP_5: u8 = 0x55;
pub const OP_6: u8 = 0x56;
pub const OP_7: u8 = 0x57;
pub const OP_8: u8 = 0x58;
pub const OP_9: u8 = 0x59;
pub const OP_10: u8 = 0x5a;
pub const OP_11: u8 = 0x5b;
pub const OP_12: u8 = 0x5c;
pub const OP_13: u8 = 0x5d;
pub const OP_14: u8 = 0x5e;
pub const OP_15: u8 = 0x5f;
pub const OP_16: u8 = 0x60;

// Flow control
pub const OP_NOP: u8 = 0x61;
pub const OP_VER: u8 = 0x62;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
pub const OP_VERIF: u8 = 0x65;
pub const OP_VERNOTIF: u8 = 0x66;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;

// Stack
pub const OP_TOALTSTACK: u8 = 0x6b;
pub const OP_FROMALTSTACK: u8 = 0x6c;
pub const OP_2DROP: u8 = 0x6d;
pub const OP_2DUP: u8 = 0x6e;
pub const OP_3DUP: u8 = 0x6f;
pub const OP_2OVER: u8 = 0x70;
pub const OP_2ROT: u8 = 0x71;
pub const OP_2SWAP: u8 = 0x72;
pub const OP_IFDUP: u8 = 0x73;
pub const OP_DEPTH: u8 = 0x74;
pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_NIP: u8 = 0x77;
pub const OP_OVER: u8 = 0x78;
pub const OP_PICK: u8 = 0x79;
pub const OP_ROLL: u8 = 0x7a;
pub const OP_ROT: u8 = 0x7b;
pub const OP_SWAP: u8 = 0x7c;
pub const OP_TUCK: u8 = 0x7d;

// Splice
pub const OP_CAT: u8 = 0x7e;
pub const OP_SPLIT: u8 = 0x7f;
pub const OP_NUM2BIN: u8 = 0x80;
pub const OP_BIN2NUM: u8 = 0x81;
pub const OP_SIZE: u8 = 0x82;

// Bitwise logic
pub const OP_INVERT: u8 = 0x83;
pub const OP_AND: u8 = 0x84;
pub const OP_OR: u8 = 0x85;
pub const OP_XOR: u8 = 0x86;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_RESERVED1: u8 = 0x89;
pub const OP_RESERVED2: u8 = 0x8a;

// Arithmetic
pub const OP_1ADD: u8 = 0x8b;
pub const OP_1SUB: u8 = 0x8c;
pub const OP_2MUL: u8 = 0x8d;
pub const OP_2DIV: u8 = 0x8e;
pub const OP_NEGATE: u8 = 0x8f;
pub const OP_ABS: u8 = 0x90;
pub const OP_NOT: u8 = 0x91;
pub const OP_0NOTEQUAL: u8 = 0x92;
pub const OP_ADD: u8 = 0x93;
pub const OP_SUB: u8 = 0x94;
pub const OP_MUL: u8 = 0x95;
pub const OP_DIV: u8 = 0x96;
pub const OP_MOD: u8 = 0x97;
pub const OP_LSHIFT: u8 = 0x98;
pub const OP_RSHIFT: u8 = 0x99;
pub const OP_BOOLAND: u8 = 0x9a;
pub const OP_BOOLOR: u8 = 0x9b;
pub const OP_NUMEQUAL: u8 = 0x9c;
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
pub const OP_LESSTHAN: u8 = 0x9f;
pub const OP_GREATERTHAN: u8 = 0xa0;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
pub const OP_MIN: u8 = 0xa3;
pub const OP_MAX: u8 = 0xa4;
pub const OP_WITHIN: u8 = 0xa5;

// Crypto
pub const OP_RIPEMD160: u8 = 0xa6;
pub const OP_SHA1: u8 = 0xa7;
pub const OP_SHA256: u8 = 0xa8;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_HASH256: u8 = 0xaa;
pub const OP_CODESEPARATOR: u8 = 0xab;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

// Expansion
pub const OP_NOP1: u8 = 0xb0;
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
pub const OP_NOP2: u8 = 0xb1;
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
pub const OP_NOP3: u8 = 0xb2;
pub const OP_NOP4: u8 = 0xb3;
pub const OP_NOP5: u8 = 0xb4;
pub const OP_NOP6: u8 = 0xb5;
pub const OP_NOP7: u8 = 0xb6;
pub const OP_NOP8: u8 = 0xb7;
pub const OP_NOP9: u8 = 0xb8;
pub const OP_NOP10: u8 = 0xb9;

// Template matching placeholders
pub const OP_PUBKEYHASH: u8 = 0xfd;
pub const OP_PUBKEY: u8 = 0xfe;
pub const OP_INVALIDOPCODE: u8 = 0xff;

/// Broad grouping of opcodes, mirroring how they are documented and tested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpcodeCategory {
    /// Pushes a byte string taken from the script itself.
    PushData,
    /// Pushes a small number (`OP_1NEGATE`, `OP_1`..`OP_16`).
    PushNumber,
    /// Conditionals, `OP_VERIFY`, `OP_RETURN`, `OP_NOP`.
    FlowControl,
    /// Pure stack rearrangements.
    Stack,
    /// Byte string slicing and number conversion.
    Splice,
    /// Bitwise logic and byte equality.
    Bitwise,
    /// Script number arithmetic and comparison.
    Arithmetic,
    /// Hashing and signature checking.
    Crypto,
    /// `OP_CHECKLOCKTIMEVERIFY` and `OP_CHECKSEQUENCEVERIFY`.
    LockTime,
    /// Reserved for soft-fork upgrades; no-ops when executed.
    UpgradableNop,
    /// Fails the script when executed.
    Reserved,
    /// No assigned meaning.
    Unknown,
}

/// A decoded opcode.
///
/// Every byte value maps to exactly one variant through [`Opcode::from_byte`]
/// and back through [`Opcode::to_byte`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `OP_0`: pushes an empty byte string.
    Op0,
    /// Direct push of 1..=75 bytes; the value is the byte count.
    PushBytes(u8),
    PushData1,
    PushData2,
    PushData4,
    Op1Negate,
    Reserved,
    /// `OP_1`..`OP_16`; the value is the number pushed.
    Num(u8),
    Nop,
    Ver,
    If,
    NotIf,
    VerIf,
    VerNotIf,
    Else,
    EndIf,
    Verify,
    Return,
    ToAltStack,
    FromAltStack,
    Drop2,
    Dup2,
    Dup3,
    Over2,
    Rot2,
    Swap2,
    IfDup,
    Depth,
    Drop,
    Dup,
    Nip,
    Over,
    Pick,
    Roll,
    Rot,
    Swap,
    Tuck,
    Cat,
    Split,
    Num2Bin,
    Bin2Num,
    Size,
    Invert,
    And,
    Or,
    Xor,
    Equal,
    EqualVerify,
    Reserved1,
    Reserved2,
    Add1,
    Sub1,
    Mul2,
    Div2,
    Negate,
    Abs,
    Not,
    NotEqual0,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LShift,
    RShift,
    BoolAnd,
    BoolOr,
    NumEqual,
    NumEqualVerify,
    NumNotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Min,
    Max,
    Within,
    Ripemd160,
    Sha1,
    Sha256,
    Hash160,
    Hash256,
    CodeSeparator,
    CheckSig,
    CheckSigVerify,
    CheckMultiSig,
    CheckMultiSigVerify,
    Nop1,
    CheckLockTimeVerify,
    CheckSequenceVerify,
    /// `OP_NOP4`..`OP_NOP10`; the value is the opcode byte.
    UpgradableNop(u8),
    /// Unassigned values 0xba..=0xff.
    Unknown(u8),
}

const SMALL_INT_NAMES: [&str; 16] = [
    "OP_1", "OP_2", "OP_3", "OP_4", "OP_5", "OP_6", "OP_7", "OP_8", "OP_9", "OP_10", "OP_11",
    "OP_12", "OP_13", "OP_14", "OP_15", "OP_16",
];

const NOP_NAMES: [&str; 7] = [
    "OP_NOP4", "OP_NOP5", "OP_NOP6", "OP_NOP7", "OP_NOP8", "OP_NOP9", "OP_NOP10",
];

impl Opcode {
    /// Decode a single opcode byte.
    pub fn from_byte(b: u8) -> Opcode {
        use Opcode::*;
        match b {
            OP_0 => Op0,
            0x01..=0x4b => PushBytes(b),
            OP_PUSHDATA1 => PushData1,
            OP_PUSHDATA2 => PushData2,
            OP_PUSHDATA4 => PushData4,
            OP_1NEGATE => Op1Negate,
            OP_RESERVED => Reserved,
            OP_1..=OP_16 => Num(b - OP_1 + 1),
            OP_NOP => Nop,
            OP_VER => Ver,
            OP_IF => If,
            OP_NOTIF => NotIf,
            OP_VERIF => VerIf,
            OP_VERNOTIF => VerNotIf,
            OP_ELSE => Else,
            OP_ENDIF => EndIf,
            OP_VERIFY => Verify,
            OP_RETURN => Return,
            OP_TOALTSTACK => ToAltStack,
            OP_FROMALTSTACK => FromAltStack,
            OP_2DROP => Drop2,
            OP_2DUP => Dup2,
            OP_3DUP => Dup3,
            OP_2OVER => Over2,
            OP_2ROT => Rot2,
            OP_2SWAP => Swap2,
            OP_IFDUP => IfDup,
            OP_DEPTH => Depth,
            OP_DROP => Drop,
            OP_DUP => Dup,
            OP_NIP => Nip,
            OP_OVER => Over,
            OP_PICK => Pick,
            OP_ROLL => Roll,
            OP_ROT => Rot,
            OP_SWAP => Swap,
            OP_TUCK => Tuck,
            OP_CAT => Cat,
            OP_SPLIT => Split,
            OP_NUM2BIN => Num2Bin,
            OP_BIN2NUM => Bin2Num,
            OP_SIZE => Size,
            OP_INVERT => Invert,
            OP_AND => And,
            OP_OR => Or,
            OP_XOR => Xor,
            OP_EQUAL => Equal,
            OP_EQUALVERIFY => EqualVerify,
            OP_RESERVED1 => Reserved1,
            OP_RESERVED2 => Reserved2,
            OP_1ADD => Add1,
            OP_1SUB => Sub1,
            OP_2MUL => Mul2,
            OP_2DIV => Div2,
            OP_NEGATE => Negate,
            OP_ABS => Abs,
            OP_NOT => Not,
            OP_0NOTEQUAL => NotEqual0,
            OP_ADD => Add,
            OP_SUB => Sub,
            OP_MUL => Mul,
            OP_DIV => Div,
            OP_MOD => Mod,
            OP_LSHIFT => LShift,
            OP_RSHIFT => RShift,
            OP_BOOLAND => BoolAnd,
            OP_BOOLOR => BoolOr,
            OP_NUMEQUAL => NumEqual,
            OP_NUMEQUALVERIFY => NumEqualVerify,
            OP_NUMNOTEQUAL => NumNotEqual,
            OP_LESSTHAN => LessThan,
            OP_GREATERTHAN => GreaterThan,
            OP_LESSTHANOREQUAL => LessThanOrEqual,
            OP_GREATERTHANOREQUAL => GreaterThanOrEqual,
            OP_MIN => Min,
            OP_MAX => Max,
            OP_WITHIN => Within,
            OP_RIPEMD160 => Ripemd160,
            OP_SHA1 => Sha1,
            OP_SHA256 => Sha256,
            OP_HASH160 => Hash160,
            OP_HASH256 => Hash256,
            OP_CODESEPARATOR => CodeSeparator,
            OP_CHECKSIG => CheckSig,
            OP_CHECKSIGVERIFY => CheckSigVerify,
            OP_CHECKMULTISIG => CheckMultiSig,
            OP_CHECKMULTISIGVERIFY => CheckMultiSigVerify,
            OP_NOP1 => Nop1,
            OP_CHECKLOCKTIMEVERIFY => CheckLockTimeVerify,
            OP_CHECKSEQUENCEVERIFY => CheckSequenceVerify,
            OP_NOP4..=OP_NOP10 => UpgradableNop(b),
            _ => Unknown(b),
        }
    }

    /// Encode back to the opcode byte.
    pub fn to_byte(self) -> u8 {
        use Opcode::*;
        match self {
            Op0 => OP_0,
            PushBytes(n) => n,
            PushData1 => OP_PUSHDATA1,
            PushData2 => OP_PUSHDATA2,
            PushData4 => OP_PUSHDATA4,
            Op1Negate => OP_1NEGATE,
            Reserved => OP_RESERVED,
            Num(n) => OP_1 + n - 1,
            Nop => OP_NOP,
            Ver => OP_VER,
            If => OP_IF,
            NotIf => OP_NOTIF,
            VerIf => OP_VERIF,
            VerNotIf => OP_VERNOTIF,
            Else => OP_ELSE,
            EndIf => OP_ENDIF,
            Verify => OP_VERIFY,
            Return => OP_RETURN,
            ToAltStack => OP_TOALTSTACK,
            FromAltStack => OP_FROMALTSTACK,
            Drop2 => OP_2DROP,
            Dup2 => OP_2DUP,
            Dup3 => OP_3DUP,
            Over2 => OP_2OVER,
            Rot2 => OP_2ROT,
            Swap2 => OP_2SWAP,
            IfDup => OP_IFDUP,
            Depth => OP_DEPTH,
            Drop => OP_DROP,
            Dup => OP_DUP,
            Nip => OP_NIP,
            Over => OP_OVER,
            Pick => OP_PICK,
            Roll => OP_ROLL,
            Rot => OP_ROT,
            Swap => OP_SWAP,
            Tuck => OP_TUCK,
            Cat => OP_CAT,
            Split => OP_SPLIT,
            Num2Bin => OP_NUM2BIN,
            Bin2Num => OP_BIN2NUM,
            Size => OP_SIZE,
            Invert => OP_INVERT,
            And => OP_AND,
            Or => OP_OR,
            Xor => OP_XOR,
            Equal => OP_EQUAL,
            EqualVerify => OP_EQUALVERIFY,
            Reserved1 => OP_RESERVED1,
            Reserved2 => OP_RESERVED2,
            Add1 => OP_1ADD,
            Sub1 => OP_1SUB,
            Mul2 => OP_2MUL,
            Div2 => OP_2DIV,
            Negate => OP_NEGATE,
            Abs => OP_ABS,
            Not => OP_NOT,
            NotEqual0 => OP_0NOTEQUAL,
            Add => OP_ADD,
            Sub => OP_SUB,
            Mul => OP_MUL,
            Div => OP_DIV,
            Mod => OP_MOD,
            LShift => OP_LSHIFT,
            RShift => OP_RSHIFT,
            BoolAnd => OP_BOOLAND,
            BoolOr => OP_BOOLOR,
            NumEqual => OP_NUMEQUAL,
            NumEqualVerify => OP_NUMEQUALVERIFY,
            NumNotEqual => OP_NUMNOTEQUAL,
            LessThan => OP_LESSTHAN,
            GreaterThan => OP_GREATERTHAN,
            LessThanOrEqual => OP_LESSTHANOREQUAL,
            GreaterThanOrEqual => OP_GREATERTHANOREQUAL,
            Min => OP_MIN,
            Max => OP_MAX,
            Within => OP_WITHIN,
            Ripemd160 => OP_RIPEMD160,
            Sha1 => OP_SHA1,
            Sha256 => OP_SHA256,
            Hash160 => OP_HASH160,
            Hash256 => OP_HASH256,
            CodeSeparator => OP_CODESEPARATOR,
            CheckSig => OP_CHECKSIG,
            CheckSigVerify => OP_CHECKSIGVERIFY,
            CheckMultiSig => OP_CHECKMULTISIG,
            CheckMultiSigVerify => OP_CHECKMULTISIGVERIFY,
            Nop1 => OP_NOP1,
            CheckLockTimeVerify => OP_CHECKLOCKTIMEVERIFY,
            CheckSequenceVerify => OP_CHECKSEQUENCEVERIFY,
            UpgradableNop(b) => b,
            Unknown(b) => b,
        }
    }

    /// Canonical mnemonic.
    ///
    /// Direct pushes share the name `OP_PUSHBYTES` and unassigned values
    /// share `OP_UNKNOWN`; `Display` adds the distinguishing number.
    pub fn name(self) -> &'static str {
        use Opcode::*;
        match self {
            Op0 => "OP_0",
            PushBytes(_) => "OP_PUSHBYTES",
            PushData1 => "OP_PUSHDATA1",
            PushData2 => "OP_PUSHDATA2",
            PushData4 => "OP_PUSHDATA4",
            Op1Negate => "OP_1NEGATE",
            Reserved => "OP_RESERVED",
            Num(n) => SMALL_INT_NAMES[(n - 1) as usize],
            Nop => "OP_NOP",
            Ver => "OP_VER",
            If => "OP_IF",
            NotIf => "OP_NOTIF",
            VerIf => "OP_VERIF",
            VerNotIf => "OP_VERNOTIF",
            Else => "OP_ELSE",
            EndIf => "OP_ENDIF",
            Verify => "OP_VERIFY",
            Return => "OP_RETURN",
            ToAltStack => "OP_TOALTSTACK",
            FromAltStack => "OP_FROMALTSTACK",
            Drop2 => "OP_2DROP",
            Dup2 => "OP_2DUP",
            Dup3 => "OP_3DUP",
            Over2 => "OP_2OVER",
            Rot2 => "OP_2ROT",
            Swap2 => "OP_2SWAP",
            IfDup => "OP_IFDUP",
            Depth => "OP_DEPTH",
            Drop => "OP_DROP",
            Dup => "OP_DUP",
            Nip => "OP_NIP",
            Over => "OP_OVER",
            Pick => "OP_PICK",
            Roll => "OP_ROLL",
            Rot => "OP_ROT",
            Swap => "OP_SWAP",
            Tuck => "OP_TUCK",
            Cat => "OP_CAT",
            Split => "OP_SPLIT",
            Num2Bin => "OP_NUM2BIN",
            Bin2Num => "OP_BIN2NUM",
            Size => "OP_SIZE",
            Invert => "OP_INVERT",
            And => "OP_AND",
            Or => "OP_OR",
            Xor => "OP_XOR",
            Equal => "OP_EQUAL",
            EqualVerify => "OP_EQUALVERIFY",
            Reserved1 => "OP_RESERVED1",
            Reserved2 => "OP_RESERVED2",
            Add1 => "OP_1ADD",
            Sub1 => "OP_1SUB",
            Mul2 => "OP_2MUL",
            Div2 => "OP_2DIV",
            Negate => "OP_NEGATE",
            Abs => "OP_ABS",
            Not => "OP_NOT",
            NotEqual0 => "OP_0NOTEQUAL",
            Add => "OP_ADD",
            Sub => "OP_SUB",
            Mul => "OP_MUL",
            Div => "OP_DIV",
            Mod => "OP_MOD",
            LShift => "OP_LSHIFT",
            RShift => "OP_RSHIFT",
            BoolAnd => "OP_BOOLAND",
            BoolOr => "OP_BOOLOR",
            NumEqual => "OP_NUMEQUAL",
            NumEqualVerify => "OP_NUMEQUALVERIFY",
            NumNotEqual => "OP_NUMNOTEQUAL",
            LessThan => "OP_LESSTHAN",
            GreaterThan => "OP_GREATERTHAN",
            LessThanOrEqual => "OP_LESSTHANOREQUAL",
            GreaterThanOrEqual => "OP_GREATERTHANOREQUAL",
            Min => "OP_MIN",
            Max => "OP_MAX",
            Within => "OP_WITHIN",
            Ripemd160 => "OP_RIPEMD160",
            Sha1 => "OP_SHA1",
            Sha256 => "OP_SHA256",
            Hash160 => "OP_HASH160",
            Hash256 => "OP_HASH256",
            CodeSeparator => "OP_CODESEPARATOR",
            CheckSig => "OP_CHECKSIG",
            CheckSigVerify => "OP_CHECKSIGVERIFY",
            CheckMultiSig => "OP_CHECKMULTISIG",
            CheckMultiSigVerify => "OP_CHECKMULTISIGVERIFY",
            Nop1 => "OP_NOP1",
            CheckLockTimeVerify => "OP_CHECKLOCKTIMEVERIFY",
            CheckSequenceVerify => "OP_CHECKSEQUENCEVERIFY",
            UpgradableNop(b) => NOP_NAMES[(b - OP_NOP4) as usize],
            Unknown(OP_PUBKEYHASH) => "OP_PUBKEYHASH",
            Unknown(OP_PUBKEY) => "OP_PUBKEY",
            Unknown(OP_INVALIDOPCODE) => "OP_INVALIDOPCODE",
            Unknown(_) => "OP_UNKNOWN",
        }
    }

    /// Look up an opcode by mnemonic, accepting the usual aliases.
    ///
    /// Accepts every string `Display` produces plus `OP_FALSE`, `OP_TRUE`,
    /// `OP_NOP2` and `OP_NOP3`.
    pub fn from_name(name: &str) -> Option<Opcode> {
        match name {
            "OP_FALSE" => return Some(Opcode::Op0),
            "OP_TRUE" => return Some(Opcode::Num(1)),
            "OP_NOP2" => return Some(Opcode::CheckLockTimeVerify),
            "OP_NOP3" => return Some(Opcode::CheckSequenceVerify),
            _ => {}
        }
        (0..=u8::MAX)
            .map(Opcode::from_byte)
            .find(|op| op.to_string() == name)
    }

    /// Classify the opcode.
    pub fn category(self) -> OpcodeCategory {
        use Opcode::*;
        use OpcodeCategory as C;
        match self {
            Op0 | PushBytes(_) | PushData1 | PushData2 | PushData4 => C::PushData,
            Op1Negate | Num(_) => C::PushNumber,
            Nop | If | NotIf | Else | EndIf | Verify | Return => C::FlowControl,
            ToAltStack | FromAltStack | Drop2 | Dup2 | Dup3 | Over2 | Rot2 | Swap2 | IfDup
            | Depth | Drop | Dup | Nip | Over | Pick | Roll | Rot | Swap | Tuck => C::Stack,
            Cat | Split | Num2Bin | Bin2Num | Size => C::Splice,
            Invert | And | Or | Xor | Equal | EqualVerify => C::Bitwise,
            Add1 | Sub1 | Mul2 | Div2 | Negate | Abs | Not | NotEqual0 | Add | Sub | Mul | Div
            | Mod | LShift | RShift | BoolAnd | BoolOr | NumEqual | NumEqualVerify
            | NumNotEqual | LessThan | GreaterThan | LessThanOrEqual | GreaterThanOrEqual
            | Min | Max | Within => C::Arithmetic,
            Ripemd160 | Sha1 | Sha256 | Hash160 | Hash256 | CodeSeparator | CheckSig
            | CheckSigVerify | CheckMultiSig | CheckMultiSigVerify => C::Crypto,
            CheckLockTimeVerify | CheckSequenceVerify => C::LockTime,
            Nop1 | UpgradableNop(_) => C::UpgradableNop,
            Reserved | Ver | VerIf | VerNotIf | Reserved1 | Reserved2 => C::Reserved,
            Unknown(_) => C::Unknown,
        }
    }

    /// Whether the opcode pushes bytes carried inline by the script
    /// (`OP_0`, direct pushes and `OP_PUSHDATA1/2/4`).
    pub fn is_push_data(self) -> bool {
        self.to_byte() <= OP_PUSHDATA4
    }

    /// Whether the opcode is allowed in a push-only script (value <= `OP_16`).
    pub fn is_push(self) -> bool {
        self.to_byte() <= OP_16
    }

    /// Whether executing the opcode counts toward the operation limit.
    pub fn counts_toward_op_limit(self) -> bool {
        self.to_byte() > OP_16
    }

    /// Whether the opcode is one of `OP_IF`..=`OP_ENDIF`, which run even in
    /// a skipped branch to keep the condition stack balanced.
    pub fn is_conditional(self) -> bool {
        (OP_IF..=OP_ENDIF).contains(&self.to_byte())
    }

    /// Whether the opcode is permanently disabled.
    ///
    /// Disabled opcodes fail the script wherever they appear, including
    /// inside a branch that is not executed.
    pub fn is_disabled(self) -> bool {
        matches!(
            self,
            Opcode::Invert
                | Opcode::Mul2
                | Opcode::Div2
                | Opcode::Mul
                | Opcode::LShift
                | Opcode::RShift
        )
    }

    /// The opposite of [`Opcode::is_disabled`].
    pub fn is_enabled(self) -> bool {
        !self.is_disabled()
    }

    /// The number pushed by `OP_0`, `OP_1NEGATE` and `OP_1`..`OP_16`.
    pub fn small_int_value(self) -> Option<i64> {
        match self {
            Opcode::Op0 => Some(0),
            Opcode::Op1Negate => Some(-1),
            Opcode::Num(n) => Some(n as i64),
            _ => None,
        }
    }

    /// The opcode pushing `n` when `n` is in -1..=16.
    pub fn from_small_int(n: i64) -> Option<Opcode> {
        match n {
            -1 => Some(Opcode::Op1Negate),
            0 => Some(Opcode::Op0),
            1..=16 => Some(Opcode::Num(n as u8)),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Opcode::PushBytes(n) => write!(f, "OP_PUSHBYTES_{}", n),
            Opcode::Unknown(b) if self.name() == "OP_UNKNOWN" => {
                write!(f, "OP_UNKNOWN{}", b)
            }
            op => f.write_str(op.name()),
        }
    }
}

impl From<u8> for Opcode {
    fn from(b: u8) -> Self {
        Opcode::from_byte(b)
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        op.to_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_round_trip_is_total() {
        for b in 0..=u8::MAX {
            assert_eq!(Opcode::from_byte(b).to_byte(), b, "byte 0x{:02x}", b);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for b in 0..=u8::MAX {
            let op = Opcode::from_byte(b);
            assert_eq!(Opcode::from_name(&op.to_string()), Some(op), "name {}", op);
        }
        assert_eq!(Opcode::from_name("OP_TRUE"), Some(Opcode::Num(1)));
        assert_eq!(Opcode::from_name("OP_FALSE"), Some(Opcode::Op0));
        assert_eq!(Opcode::from_name("OP_NOP2"), Some(Opcode::CheckLockTimeVerify));
        assert_eq!(Opcode::from_name("OP_BOGUS"), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Opcode::from_byte(OP_DUP).to_string(), "OP_DUP");
        assert_eq!(Opcode::from_byte(OP_16).to_string(), "OP_16");
        assert_eq!(Opcode::from_byte(OP_NOP10).to_string(), "OP_NOP10");
        assert_eq!(Opcode::from_byte(0x14).to_string(), "OP_PUSHBYTES_20");
        assert_eq!(Opcode::from_byte(0xba).to_string(), "OP_UNKNOWN186");
        assert_eq!(Opcode::from_byte(0xff).to_string(), "OP_INVALIDOPCODE");
    }

    #[test]
    fn test_classification() {
        assert!(Opcode::from_byte(OP_PUSHDATA4).is_push_data());
        assert!(!Opcode::from_byte(OP_1NEGATE).is_push_data());
        assert!(Opcode::from_byte(OP_16).is_push());
        assert!(!Opcode::from_byte(OP_NOP).is_push());
        assert!(!Opcode::from_byte(OP_16).counts_toward_op_limit());
        assert!(Opcode::from_byte(OP_NOP).counts_toward_op_limit());

        for b in OP_IF..=OP_ENDIF {
            assert!(Opcode::from_byte(b).is_conditional());
        }
        assert!(!Opcode::from_byte(OP_VERIFY).is_conditional());

        for b in [OP_INVERT, OP_2MUL, OP_2DIV, OP_MUL, OP_LSHIFT, OP_RSHIFT] {
            assert!(Opcode::from_byte(b).is_disabled());
        }
        for b in [OP_CAT, OP_SPLIT, OP_AND, OP_OR, OP_XOR, OP_DIV, OP_MOD, OP_NUM2BIN] {
            assert!(Opcode::from_byte(b).is_enabled());
        }

        assert_eq!(Opcode::Dup.category(), OpcodeCategory::Stack);
        assert_eq!(Opcode::CheckSig.category(), OpcodeCategory::Crypto);
        assert_eq!(Opcode::VerIf.category(), OpcodeCategory::Reserved);
        assert_eq!(Opcode::Unknown(0xc0).category(), OpcodeCategory::Unknown);
    }

    #[test]
    fn test_small_ints() {
        for n in -1..=16 {
            let op = Opcode::from_small_int(n).unwrap();
            assert_eq!(op.small_int_value(), Some(n));
        }
        assert_eq!(Opcode::from_small_int(17), None);
        assert_eq!(Opcode::Dup.small_int_value(), None);
    }
}
