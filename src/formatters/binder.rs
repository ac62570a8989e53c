//! Binder IPC events.

use super::FormatterTable;
use crate::event::FieldView;

const BINDER_TRANSACTION: &str = r#""transaction=%d dest_node=%d dest_proc=%d dest_thread=%d reply=%d flags=0x%x code=0x%x", REC->debug_id, REC->target_node, REC->to_proc, REC->to_thread, REC->reply, REC->flags, REC->code"#;
const BINDER_TRANSACTION_RECEIVED: &str = r#""transaction=%d", REC->debug_id"#;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(BINDER_TRANSACTION, binder_transaction);
    table.insert(BINDER_TRANSACTION_RECEIVED, binder_transaction_received);
}

fn binder_transaction(view: &FieldView<'_>) -> Option<String> {
    let debug_id = view.int("debug_id")?;
    let target_node = view.int("target_node")?;
    let to_proc = view.int("to_proc")?;
    let to_thread = view.int("to_thread")?;
    let reply = view.int("reply")?;
    let code = view.uint("code")?;
    let flags = view.uint("flags")?;
    Some(format!(
        "transaction={debug_id} dest_node={target_node} dest_proc={to_proc} \
         dest_thread={to_thread} reply={reply} flags=0x{flags:x} code=0x{code:x}"
    ))
}

fn binder_transaction_received(view: &FieldView<'_>) -> Option<String> {
    let debug_id = view.int("debug_id")?;
    Some(format!("transaction={debug_id}"))
}
