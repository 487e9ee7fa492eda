//! Bitcoin Cash script: opcodes, chunk parsing, builders and the interpreter.
//!
//! Provides the `Script` type, the closed `Opcode` table, borrowing chunk
//! views, standard locking script templates, and a script interpreter that
//! verifies an unlocking/locking script pair.

pub mod opcodes;
pub mod chunk;
pub mod script;
pub mod template;
pub mod interpreter;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use opcodes::Opcode;
pub use chunk::{PushEncoding, ScriptChunk};
