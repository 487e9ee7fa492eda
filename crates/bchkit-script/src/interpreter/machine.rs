//! Script-pair verification.

use crate::Script;

use super::context::ExecutionContext;
use super::error::InterpreterError;
use super::flags::ScriptFlags;
use super::stack::as_bool;

/// Evaluate `unlock` followed by `lock` on one shared stack.
///
/// Returns `Ok(true)` when the final stack is non-empty with a true top
/// item, `Ok(false)` when evaluation finishes cleanly on an empty or false
/// stack, and `Err` when any opcode aborts evaluation. With
/// [`ScriptFlags::VERIFY_P2SH`] a pay-to-script-hash lock additionally runs
/// the redeem script pushed by `unlock` against the remaining stack.
pub fn verify(
    lock: &Script,
    unlock: &Script,
    ctx: &mut ExecutionContext<'_>,
) -> Result<bool, InterpreterError> {
    ctx.reset();

    tracing::debug!(script = %unlock, "executing unlocking script");
    ctx.execute_script(unlock)?;
    let saved = ctx.stack.items().to_vec();

    tracing::debug!(script = %lock, "executing locking script");
    ctx.execute_script(lock)?;
    if !top_is_true(ctx) {
        tracing::debug!("locking script left a false stack");
        return Ok(false);
    }

    if ctx.has_flag(ScriptFlags::VERIFY_P2SH) && lock.is_p2sh() {
        if !unlock.is_push_only() {
            return Err(InterpreterError::P2shNotPushOnly);
        }
        let Some((redeem_bytes, rest)) = saved.split_last() else {
            return Ok(false);
        };
        let redeem = Script::from_bytes(redeem_bytes);

        ctx.reset();
        ctx.stack.set_items(rest.to_vec());
        tracing::debug!(script = %redeem, "executing P2SH redeem script");
        ctx.execute_script(&redeem)?;
        if !top_is_true(ctx) {
            tracing::debug!("redeem script left a false stack");
            return Ok(false);
        }
    }

    tracing::debug!("script verified");
    Ok(true)
}

fn top_is_true(ctx: &ExecutionContext<'_>) -> bool {
    ctx.stack.peek(-1).map(as_bool).unwrap_or(false)
}
