//! I2C and SMBus events.

use super::FormatterTable;
use crate::event::FieldView;

const I2C_READ: &str = r#""i2c-%d #%u a=%03x f=%04x l=%u", REC->adapter_nr, REC->msg_nr, REC->addr, REC->flags, REC->len"#;
const I2C_WRITE_OR_REPLY: &str = r#""i2c-%d #%u a=%03x f=%04x l=%u [%*phD]", REC->adapter_nr, REC->msg_nr, REC->addr, REC->flags, REC->len, REC->len, __get_dynamic_array(buf)"#;
const I2C_RESULT: &str = r#""i2c-%d n=%u ret=%d", REC->adapter_nr, REC->nr_msgs, REC->ret"#;
const SMBUS_READ: &str = r#""i2c-%d a=%03x f=%04x c=%x %s", REC->adapter_nr, REC->addr, REC->flags, REC->command, __print_symbolic(REC->protocol, { 0, "QUICK" }, { 1, "BYTE" }, { 2, "BYTE_DATA" }, { 3, "WORD_DATA" }, { 4, "PROC_CALL" }, { 5, "BLOCK_DATA" }, { 6, "I2C_BLOCK_BROKEN" }, { 7, "BLOCK_PROC_CALL" }, { 8, "I2C_BLOCK_DATA" })"#;
const SMBUS_WRITE_OR_REPLY: &str = r#""i2c-%d a=%03x f=%04x c=%x %s l=%u [%*phD]", REC->adapter_nr, REC->addr, REC->flags, REC->command, __print_symbolic(REC->protocol, { 0, "QUICK" }, { 1, "BYTE" }, { 2, "BYTE_DATA" }, { 3, "WORD_DATA" }, { 4, "PROC_CALL" }, { 5, "BLOCK_DATA" }, { 6, "I2C_BLOCK_BROKEN" }, { 7, "BLOCK_PROC_CALL" }, { 8, "I2C_BLOCK_DATA" }), REC->len, REC->len, REC->buf"#;
const SMBUS_RESULT: &str = r#""i2c-%d a=%03x f=%04x c=%x %s %s res=%d", REC->adapter_nr, REC->addr, REC->flags, REC->command, __print_symbolic(REC->protocol, { 0, "QUICK" }, { 1, "BYTE" }, { 2, "BYTE_DATA" }, { 3, "WORD_DATA" }, { 4, "PROC_CALL" }, { 5, "BLOCK_DATA" }, { 6, "I2C_BLOCK_BROKEN" }, { 7, "BLOCK_PROC_CALL" }, { 8, "I2C_BLOCK_DATA" }), REC->read_write == 0 ? "wr" : "rd", REC->res"#;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(I2C_READ, i2c_read);
    table.insert(I2C_WRITE_OR_REPLY, i2c_write_or_reply);
    table.insert(I2C_RESULT, i2c_result);
    table.insert(SMBUS_READ, smbus_read);
    table.insert(SMBUS_WRITE_OR_REPLY, smbus_write_or_reply);
    table.insert(SMBUS_RESULT, smbus_result);
}

fn smbus_protocol_name(protocol: u64) -> &'static str {
    match protocol {
        0 => "QUICK",
        1 => "BYTE",
        2 => "BYTE_DATA",
        3 => "WORD_DATA",
        4 => "PROC_CALL",
        5 => "BLOCK_DATA",
        6 => "I2C_BLOCK_BROKEN",
        7 => "BLOCK_PROC_CALL",
        8 => "I2C_BLOCK_DATA",
        _ => "",
    }
}

fn i2c_read(view: &FieldView<'_>) -> Option<String> {
    let adapter_nr = view.int("adapter_nr")?;
    let msg_nr = view.uint("msg_nr")?;
    let addr = view.uint("addr")?;
    let flags = view.uint("flags")?;
    let len = view.uint("len")?;
    Some(format!(
        "i2c-{adapter_nr} #{msg_nr} a={addr:03x} f={flags:04x} l={len}"
    ))
}

fn i2c_write_or_reply(view: &FieldView<'_>) -> Option<String> {
    let adapter_nr = view.int("adapter_nr")?;
    let msg_nr = view.uint("msg_nr")?;
    let addr = view.uint("addr")?;
    let flags = view.uint("flags")?;
    let len = view.uint("len")?;
    let buf: i64 = view.data_loc_str("buf")?.parse().ok()?;
    Some(format!(
        "i2c-{adapter_nr} #{msg_nr} a={addr:03x} f={flags:04x} l={len} {buf:>width$}",
        width = len as usize
    ))
}

fn i2c_result(view: &FieldView<'_>) -> Option<String> {
    let adapter_nr = view.int("adapter_nr")?;
    let nr_msgs = view.uint("nr_msgs")?;
    let ret = view.int("ret")?;
    Some(format!("i2c-{adapter_nr} n={nr_msgs} ret={ret}"))
}

fn smbus_read(view: &FieldView<'_>) -> Option<String> {
    let adapter_nr = view.int("adapter_nr")?;
    let flags = view.uint("flags")?;
    let addr = view.uint("addr")?;
    let command = view.uint("command")?;
    let protocol = smbus_protocol_name(view.uint("protocol")?);
    Some(format!(
        "i2c-{adapter_nr} a={addr:03x} f={flags:04x} c={command:x} {protocol}"
    ))
}

fn smbus_write_or_reply(view: &FieldView<'_>) -> Option<String> {
    let adapter_nr = view.int("adapter_nr")?;
    let addr = view.uint("addr")?;
    let flags = view.uint("flags")?;
    let command = view.uint("command")?;
    let len = view.uint("len")?;
    let protocol = smbus_protocol_name(view.uint("protocol")?);
    let buf: i64 = view.cstr("buf[32 + 2]")?.parse().ok()?;
    Some(format!(
        "i2c-{adapter_nr} a={addr:03x} f={flags:04x} c={command:x} {protocol} \
         l={len}{buf:>width$}",
        width = len as usize
    ))
}

fn smbus_result(view: &FieldView<'_>) -> Option<String> {
    let adapter_nr = view.int("adapter_nr")?;
    let addr = view.uint("addr")?;
    let flags = view.uint("flags")?;
    let read_write = if view.uint("read_write")? == 0 {
        "wr"
    } else {
        "rd"
    };
    let command = view.uint("command")?;
    let res = view.int("res")?;
    let protocol = smbus_protocol_name(view.uint("protocol")?);
    Some(format!(
        "i2c-{adapter_nr} a={addr:03x} f={flags:04x} c={command:x} {protocol} {read_write} \
         res={res}"
    ))
}
