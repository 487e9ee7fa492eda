//! Interpreter resource limits.

pub const MAX_OPS_PER_SCRIPT: usize = 201;
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
pub const MAX_SCRIPT_SIZE: usize = 10_000;
pub const MAX_PUB_KEYS_PER_MULTISIG: usize = 20;
pub const MAX_SCRIPT_NUMBER_LENGTH: usize = 4;
pub const MAX_LOCKTIME_NUMBER_LENGTH: usize = 5;
pub const MAX_STACK_SIZE: usize = 1000;

/// Limits enforced while evaluating scripts.
///
/// The defaults are the consensus values; tests and tools may tighten or
/// relax them per context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterLimits {
    /// Non-push opcodes (plus multisig keys) allowed per script.
    pub max_ops_per_script: usize,
    /// Largest element that may be pushed onto the stack.
    pub max_script_element_size: usize,
    /// Largest script that may be evaluated.
    pub max_script_size: usize,
    /// Most public keys `OP_CHECKMULTISIG` accepts.
    pub max_pubkeys_per_multisig: usize,
    /// Widest operand arithmetic opcodes accept.
    pub max_script_number_length: usize,
    /// Widest operand the lock-time opcodes accept.
    pub max_locktime_number_length: usize,
    /// Combined depth of the data and alt stacks.
    pub max_stack_size: usize,
}

impl Default for InterpreterLimits {
    fn default() -> Self {
        InterpreterLimits {
            max_ops_per_script: MAX_OPS_PER_SCRIPT,
            max_script_element_size: MAX_SCRIPT_ELEMENT_SIZE,
            max_script_size: MAX_SCRIPT_SIZE,
            max_pubkeys_per_multisig: MAX_PUB_KEYS_PER_MULTISIG,
            max_script_number_length: MAX_SCRIPT_NUMBER_LENGTH,
            max_locktime_number_length: MAX_LOCKTIME_NUMBER_LENGTH,
            max_stack_size: MAX_STACK_SIZE,
        }
    }
}
