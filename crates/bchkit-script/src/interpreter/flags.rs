//! Script verification flags (bitmask).

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use bchkit_primitives::Network;

/// Block timestamp at which pay-to-script-hash evaluation became mandatory.
pub const BIP16_ACTIVATION_TIME: u32 = 1_333_238_400;

/// Script verification flags controlling interpreter behavior.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScriptFlags(pub u32);

impl ScriptFlags {
    pub const NONE: ScriptFlags = ScriptFlags(0);
    /// Evaluate pay-to-script-hash redeem scripts.
    pub const VERIFY_P2SH: ScriptFlags = ScriptFlags(1 << 0);
    /// Require strict DER signatures, defined hash types and SEC public keys.
    pub const VERIFY_STRICT_ENCODING: ScriptFlags = ScriptFlags(1 << 1);
    /// Require the S value of signatures to be in the lower half of the order.
    pub const VERIFY_LOW_S: ScriptFlags = ScriptFlags(1 << 2);
    /// Require minimal pushes and minimally encoded numbers.
    pub const VERIFY_MINIMAL_DATA: ScriptFlags = ScriptFlags(1 << 3);
    /// Failed signature checks must use an empty signature.
    pub const VERIFY_NULL_FAIL: ScriptFlags = ScriptFlags(1 << 4);
    /// Fail on `OP_NOP1` and `OP_NOP4`..`OP_NOP10`.
    pub const VERIFY_DISCOURAGE_UPGRADABLE_NOPS: ScriptFlags = ScriptFlags(1 << 5);
    /// Enforce `OP_CHECKLOCKTIMEVERIFY` instead of treating it as `OP_NOP2`.
    pub const VERIFY_CHECK_LOCK_TIME: ScriptFlags = ScriptFlags(1 << 6);
    /// Enforce `OP_CHECKSEQUENCEVERIFY` instead of treating it as `OP_NOP3`.
    pub const VERIFY_CHECK_SEQUENCE: ScriptFlags = ScriptFlags(1 << 7);
    /// Signatures must carry `SIGHASH_FORKID` (and may only carry it when set).
    pub const ENABLE_SIGHASH_FORKID: ScriptFlags = ScriptFlags(1 << 8);

    /// Rules every block has enforced since the lock-time soft forks.
    pub const CONSENSUS: ScriptFlags = ScriptFlags(
        Self::VERIFY_P2SH.0 | Self::VERIFY_CHECK_LOCK_TIME.0 | Self::VERIFY_CHECK_SEQUENCE.0,
    );

    /// Consensus rules plus the relay policy checks.
    pub const STANDARD: ScriptFlags = ScriptFlags(
        Self::CONSENSUS.0
            | Self::VERIFY_STRICT_ENCODING.0
            | Self::VERIFY_LOW_S.0
            | Self::VERIFY_MINIMAL_DATA.0
            | Self::VERIFY_NULL_FAIL.0
            | Self::VERIFY_DISCOURAGE_UPGRADABLE_NOPS.0,
    );

    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn has_any(self, flags: &[ScriptFlags]) -> bool {
        flags.iter().any(|f| self.has_flag(*f))
    }

    /// P2SH is enabled for blocks at or after the BIP16 activation time.
    pub fn for_block_time(timestamp: u32) -> ScriptFlags {
        if timestamp >= BIP16_ACTIVATION_TIME {
            ScriptFlags::VERIFY_P2SH
        } else {
            ScriptFlags::NONE
        }
    }

    /// Consensus flags for a chain; fork-id chains also get strict
    /// encoding and mandatory `SIGHASH_FORKID`.
    pub fn for_network(network: Network) -> ScriptFlags {
        let mut flags = ScriptFlags::CONSENSUS;
        if network.params().uses_fork_id {
            flags |= ScriptFlags::VERIFY_STRICT_ENCODING | ScriptFlags::ENABLE_SIGHASH_FORKID;
        }
        flags
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScriptFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ScriptFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        ScriptFlags(self.0 & rhs.0)
    }
}

impl fmt::Debug for ScriptFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(ScriptFlags, &str); 9] = [
            (ScriptFlags::VERIFY_P2SH, "P2SH"),
            (ScriptFlags::VERIFY_STRICT_ENCODING, "STRICT_ENCODING"),
            (ScriptFlags::VERIFY_LOW_S, "LOW_S"),
            (ScriptFlags::VERIFY_MINIMAL_DATA, "MINIMAL_DATA"),
            (ScriptFlags::VERIFY_NULL_FAIL, "NULL_FAIL"),
            (ScriptFlags::VERIFY_DISCOURAGE_UPGRADABLE_NOPS, "DISCOURAGE_UPGRADABLE_NOPS"),
            (ScriptFlags::VERIFY_CHECK_LOCK_TIME, "CHECK_LOCK_TIME"),
            (ScriptFlags::VERIFY_CHECK_SEQUENCE, "CHECK_SEQUENCE"),
            (ScriptFlags::ENABLE_SIGHASH_FORKID, "SIGHASH_FORKID"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.has_flag(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "ScriptFlags({})", names.join(" | "))
    }
}
