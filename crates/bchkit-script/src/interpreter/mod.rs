//! Script interpreter.
//!
//! Evaluates an unlocking script followed by a locking script on a shared
//! stack and reports whether the pair validates. All state lives in an
//! [`ExecutionContext`] owned by the caller, so independent verifications
//! can run in parallel, each with its own context.
//!
//! The interpreter does not depend on the transaction crate. Signature and
//! lock-time opcodes go through the [`SignatureChecker`] trait, which the
//! transaction layer implements for a specific input.
//!
//! # Example
//!
//! ```ignore
//! use bchkit_script::interpreter::{verify, ExecutionContext, ScriptFlags};
//!
//! let mut ctx = ExecutionContext::new()
//!     .with_flags(ScriptFlags::for_network(network))
//!     .with_checker(&checker);
//! let valid = verify(&locking_script, &unlocking_script, &mut ctx)?;
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod flags;
pub mod machine;
pub mod scriptnum;
pub mod stack;

mod ops_arithmetic;
mod ops_crypto;
mod ops_data;
mod ops_flow;
mod ops_stack;

pub use config::InterpreterLimits;
pub use context::ExecutionContext;
pub use error::InterpreterError;
pub use flags::ScriptFlags;
pub use machine::verify;
pub use ops_crypto::{SIGHASH_ANYONECANPAY, SIGHASH_FORKID};
pub use scriptnum::ScriptNumber;
pub use stack::{as_bool, from_bool, Stack};

use crate::Script;

/// The transaction input a script is being verified for.
///
/// Implemented by the transaction layer; the interpreter only sees the
/// values signature and lock-time opcodes need.
pub trait SignatureChecker {
    /// Check `full_sig` (DER signature followed by the hash type byte)
    /// against `pub_key` over the digest of the spending input, committing
    /// to `script_code`.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not verify.
    fn verify_signature(
        &self,
        full_sig: &[u8],
        pub_key: &[u8],
        script_code: &Script,
    ) -> Result<bool, InterpreterError>;

    fn lock_time(&self) -> u32;

    fn tx_version(&self) -> u32;

    /// Sequence number of the input being verified.
    fn input_sequence(&self) -> u32;
}
