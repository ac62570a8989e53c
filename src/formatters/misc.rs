//! Remaining single-event formatters: dma_fence, rss_stat, workqueue,
//! kernel `print`, and user-space `tracing_mark_write`.

use super::FormatterTable;
use crate::event::FieldView;

const DMA_FENCE_FUNCS: &str = r#""driver=%s timeline=%s context=%u seqno=%u", __get_str(driver), __get_str(timeline), REC->context, REC->seqno"#;
const RSS_STAT_HM: &str = r#""mm_id=%u curr=%d member=%d size=%ldB", REC->mm_id, REC->curr, REC->member, REC->size"#;
const WORKQUEUE_EXECUTE_START_OR_END: &str = r#""work struct %p: function %ps", REC->work, REC->function"#;
const PRINT: &str = r#""%ps: %s", (void *)REC->ip, REC->buf"#;
const TRACING_MARK_WRITE: &str = r#""%s", ((void *)((char *)REC + (REC->__data_loc_buffer & 0xffff)))"#;

/// Offset of the message text in a `print` event payload: the 8 common
/// bytes plus the 8-byte instruction pointer.
const PRINT_BUF_OFFSET: usize = 16;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(DMA_FENCE_FUNCS, dma_fence);
    table.insert(RSS_STAT_HM, rss_stat);
    table.insert(WORKQUEUE_EXECUTE_START_OR_END, workqueue_execute);
    table.insert(PRINT, print);
    table.insert(TRACING_MARK_WRITE, tracing_mark_write);
}

fn dma_fence(view: &FieldView<'_>) -> Option<String> {
    let driver = view.data_loc_str("driver")?;
    let timeline = view.data_loc_str("timeline")?;
    let context = view.uint("context")?;
    let seqno = view.uint("seqno")?;
    Some(format!(
        "driver={driver} timeline={timeline} context={context} seqno={seqno}"
    ))
}

fn rss_stat(view: &FieldView<'_>) -> Option<String> {
    let mm_id = view.uint("mm_id")?;
    let curr = view.uint("curr")?;
    let member = view.int("member")?;
    let size = view.int("size")?;
    Some(format!("mm_id={mm_id} curr={curr} member={member} size={size}"))
}

fn workqueue_execute(view: &FieldView<'_>) -> Option<String> {
    let work = view.uint("work")?;
    let function = view.uint("function")?;
    Some(format!("work struct 0x{work:x}: function 0x{function:x}"))
}

fn print(view: &FieldView<'_>) -> Option<String> {
    let ip = view.uint("ip")?;
    let buf = view.cstr_at(PRINT_BUF_OFFSET)?;
    Some(format!("0x{ip:x}: {buf}"))
}

/// User-space trace marks pass through almost verbatim. A finished async
/// section (`E|...|`) loses its trailing pipe; begin/finish/counter marks
/// (`S|`, `F|`, `C|`) get their last space turned into the value separator.
fn tracing_mark_write(view: &FieldView<'_>) -> Option<String> {
    let body = view.data_loc_str("buffer")?;
    if body.starts_with("E|") && body.ends_with('|') {
        return Some(body[..body.len() - 1].to_string());
    }
    if body.starts_with("S|") || body.starts_with("F|") || body.starts_with("C|") {
        if let Some(pos) = body.rfind(' ') {
            return Some(format!("{}|{}", &body[..pos], &body[pos + 1..]));
        }
    }
    Some(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::FieldView;
    use crate::metadata::{EventFormat, FieldDesc};

    fn mark_format() -> EventFormat {
        EventFormat {
            name: "tracing_mark_write".into(),
            id: 5,
            fields: vec![FieldDesc {
                type_name: "__data_loc char[]".into(),
                name: "buffer".into(),
                offset: 8,
                size: 4,
                signed: false,
            }],
            print_fmt: TRACING_MARK_WRITE.to_string(),
        }
    }

    fn mark_payload(body: &str) -> Vec<u8> {
        let mut payload = vec![0u8; 12];
        payload[8..10].copy_from_slice(&12u16.to_le_bytes());
        payload.extend_from_slice(body.as_bytes());
        payload.push(0);
        payload
    }

    #[test]
    fn mark_write_edge_cases() {
        let format = mark_format();
        for (body, expected) in [
            ("E|1234|", "E|1234"),
            ("S|1234 work", "S|1234|work"),
            ("C|1234|counter 7", "C|1234|counter|7"),
            ("plain text", "plain text"),
            ("E|1234", "E|1234"),
        ] {
            let payload = mark_payload(body);
            let view = FieldView::new(&format, &payload);
            assert_eq!(tracing_mark_write(&view).unwrap(), expected, "{body}");
        }
    }
}
