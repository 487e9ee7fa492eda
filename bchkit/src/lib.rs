#![deny(missing_docs)]

//! Bitcoin Cash script toolkit.
//!
//! Re-exports the component crates for single-crate usage: key and hash
//! primitives, scripts with their interpreter, and transactions with
//! signing and input verification.
//!
//! ```ignore
//! use bchkit::script::interpreter::ScriptFlags;
//! use bchkit::transaction::{verify_input, Transaction};
//!
//! let tx = Transaction::from_hex(raw)?;
//! let valid = verify_input(&tx, 0, &spent_output, ScriptFlags::STANDARD)?;
//! ```

pub use bchkit_primitives as primitives;
pub use bchkit_script as script;
pub use bchkit_transaction as transaction;

pub use bchkit_script::interpreter::{verify, ExecutionContext, ScriptFlags};
pub use bchkit_script::{Opcode, Script};
pub use bchkit_transaction::{verify_input, SighashType, Transaction};
