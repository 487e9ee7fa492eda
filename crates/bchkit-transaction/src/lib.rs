//! Bitcoin Cash transactions: wire format, signature hashing, signing
//! templates and input verification against the script interpreter.

pub mod transaction;
pub mod input;
pub mod output;
pub mod sighash;
pub mod template;
pub mod verify;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::{OutPoint, TransactionInput};
pub use output::TransactionOutput;
pub use sighash::SighashType;
pub use verify::{verify_input, TransactionSignatureChecker};

#[cfg(test)]
mod tests;
