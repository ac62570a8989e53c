//! End-to-end conversion over a synthesized capture file: header, metadata
//! segments and two per-CPU raw-trace segments, rendered to text and
//! compared against the exact expected output.

use std::io::Write;
use std::path::Path;

use hitrace_convert::render::TRACE_BANNER;
use hitrace_convert::{convert_capture, ConvertSummary};

const PAGE_SIZE: usize = 4096;

const SCHED_SWITCH_FMT: &str = r#""prev_comm=%s prev_pid=%d prev_prio=%d prev_state=%s%s ==> next_comm=%s next_pid=%d next_prio=%d expeller_type=%u", REC->prev_comm, REC->prev_pid, REC->prev_prio, (REC->prev_state & ((((0x0000 | 0x0001 | 0x0002 | 0x0004 | 0x0008 | 0x0010 | 0x0020 | 0x0040) + 1) << 1) - 1)) ? __print_flags(REC->prev_state & ((((0x0000 | 0x0001 | 0x0002 | 0x0004 | 0x0008 | 0x0010 | 0x0020 | 0x0040) + 1) << 1) - 1), "|", { 0x0001, "S" }, { 0x0002, "D" }, { 0x0004, "T" }, { 0x0008, "t" }, { 0x0010, "X" }, { 0x0020, "Z" }, { 0x0040, "P" }, { 0x0080, "I" }) : "R", REC->prev_state & (((0x0000 | 0x0001 | 0x0002 | 0x0004 | 0x0008 | 0x0010 | 0x0020 | 0x0040) + 1) << 1) ? "+" : "", REC->next_comm, REC->next_pid, REC->next_prio, REC->expeller_type"#;
const CPU_IDLE_FMT: &str = r#""state=%lu cpu_id=%lu", (unsigned long)REC->state, (unsigned long)REC->cpu_id"#;
const MARK_WRITE_FMT: &str = r#""%s", ((void *)((char *)REC + (REC->__data_loc_buffer & 0xffff)))"#;

fn event_formats_segment() -> String {
    let mut text = String::new();
    text.push_str(
        "name: sched_switch\n\
         ID: 314\n\
         format:\n\
         \tfield:unsigned short common_type;\toffset:0;\tsize:2;\tsigned:0;\n\
         \tfield:unsigned char common_flags;\toffset:2;\tsize:1;\tsigned:0;\n\
         \tfield:unsigned char common_preempt_count;\toffset:3;\tsize:1;\tsigned:0;\n\
         \tfield:int common_pid;\toffset:4;\tsize:4;\tsigned:1;\n\
         \n\
         \tfield:char prev_comm[16];\toffset:8;\tsize:16;\tsigned:0;\n\
         \tfield:pid_t prev_pid;\toffset:24;\tsize:4;\tsigned:1;\n\
         \tfield:int prev_prio;\toffset:28;\tsize:4;\tsigned:1;\n\
         \tfield:long prev_state;\toffset:32;\tsize:8;\tsigned:1;\n\
         \tfield:char next_comm[16];\toffset:40;\tsize:16;\tsigned:0;\n\
         \tfield:pid_t next_pid;\toffset:56;\tsize:4;\tsigned:1;\n\
         \tfield:int next_prio;\toffset:60;\tsize:4;\tsigned:1;\n\
         \tfield:unsigned int expeller_type;\toffset:64;\tsize:4;\tsigned:0;\n\
         \n",
    );
    text.push_str(&format!("print fmt: {SCHED_SWITCH_FMT}\n"));

    text.push_str(
        "name: cpu_idle\n\
         ID: 200\n\
         format:\n\
         \tfield:unsigned short common_type;\toffset:0;\tsize:2;\tsigned:0;\n\
         \tfield:unsigned char common_flags;\toffset:2;\tsize:1;\tsigned:0;\n\
         \tfield:unsigned char common_preempt_count;\toffset:3;\tsize:1;\tsigned:0;\n\
         \tfield:int common_pid;\toffset:4;\tsize:4;\tsigned:1;\n\
         \n\
         \tfield:u32 state;\toffset:8;\tsize:4;\tsigned:0;\n\
         \tfield:u32 cpu_id;\toffset:12;\tsize:4;\tsigned:0;\n\
         \n",
    );
    text.push_str(&format!("print fmt: {CPU_IDLE_FMT}\n"));

    text.push_str(
        "name: tracing_mark_write\n\
         ID: 5\n\
         format:\n\
         \tfield:unsigned short common_type;\toffset:0;\tsize:2;\tsigned:0;\n\
         \tfield:unsigned char common_flags;\toffset:2;\tsize:1;\tsigned:0;\n\
         \tfield:unsigned char common_preempt_count;\toffset:3;\tsize:1;\tsigned:0;\n\
         \tfield:int common_pid;\toffset:4;\tsize:4;\tsigned:1;\n\
         \n\
         \tfield:__data_loc char[] buffer;\toffset:8;\tsize:4;\tsigned:0;\n\
         \n",
    );
    text.push_str(&format!("print fmt: {MARK_WRITE_FMT}\n"));

    // An event whose print fmt has no formatter.
    text.push_str(
        "name: mystery_event\n\
         ID: 999\n\
         format:\n\
         \tfield:unsigned short common_type;\toffset:0;\tsize:2;\tsigned:0;\n\
         \tfield:unsigned char common_flags;\toffset:2;\tsize:1;\tsigned:0;\n\
         \tfield:unsigned char common_preempt_count;\toffset:3;\tsize:1;\tsigned:0;\n\
         \tfield:int common_pid;\toffset:4;\tsize:4;\tsigned:1;\n\
         \tfield:u32 x;\toffset:8;\tsize:4;\tsigned:0;\n\
         print fmt: \"x=%u\", REC->x\n",
    );
    text
}

fn common_prefix(event_id: u16, flags: u8, preempt: u8, pid: u32) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&event_id.to_le_bytes());
    payload.push(flags);
    payload.push(preempt);
    payload.extend_from_slice(&pid.to_le_bytes());
    payload
}

fn fixed_str(s: &str, len: usize) -> Vec<u8> {
    let mut bytes = s.as_bytes().to_vec();
    bytes.resize(len, 0);
    bytes
}

fn sched_switch_payload() -> Vec<u8> {
    let mut p = common_prefix(314, 0x01, 2, 42);
    p.extend_from_slice(&fixed_str("bash", 16));
    p.extend_from_slice(&1234i32.to_le_bytes());
    p.extend_from_slice(&120i32.to_le_bytes());
    p.extend_from_slice(&2i64.to_le_bytes());
    p.extend_from_slice(&fixed_str("kworker/0:1", 16));
    p.extend_from_slice(&42i32.to_le_bytes());
    p.extend_from_slice(&120i32.to_le_bytes());
    p.extend_from_slice(&0u32.to_le_bytes());
    p
}

fn cpu_idle_payload() -> Vec<u8> {
    let mut p = common_prefix(200, 0, 0, 0);
    p.extend_from_slice(&1u32.to_le_bytes());
    p.extend_from_slice(&1u32.to_le_bytes());
    p
}

fn mark_write_payload() -> Vec<u8> {
    let mut p = common_prefix(5, 0, 0, 1234);
    let body = b"E|1234|\0";
    // __data_loc: offset in the low half, length in the high half
    p.extend_from_slice(&(12u32 | (body.len() as u32) << 16).to_le_bytes());
    p.extend_from_slice(body);
    p
}

fn mystery_payload() -> Vec<u8> {
    let mut p = common_prefix(999, 0, 0, 42);
    p.extend_from_slice(&7u32.to_le_bytes());
    p
}

fn page(timestamp: u64, core_id: u8, events: &[&[u8]]) -> Vec<u8> {
    let mut page = Vec::with_capacity(PAGE_SIZE);
    page.extend_from_slice(&timestamp.to_le_bytes());
    page.extend_from_slice(&0u64.to_le_bytes());
    page.push(core_id);
    let mut ts_offset = 0u32;
    for payload in events {
        page.extend_from_slice(&ts_offset.to_le_bytes());
        page.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        page.extend_from_slice(payload);
        let pad = ((payload.len() + 3) & !3) - payload.len();
        page.extend(std::iter::repeat(0).take(pad));
        ts_offset += 500;
    }
    page.resize(PAGE_SIZE, 0);
    page
}

fn segment(out: &mut Vec<u8>, segment_type: u32, payload: &[u8]) {
    out.extend_from_slice(&segment_type.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
}

fn build_capture() -> Vec<u8> {
    let mut file = Vec::new();
    // header: magic, file type, version at C offsets, 2 CPUs in bits 1-5
    // of the reserved word
    file.extend_from_slice(&0x5754u16.to_le_bytes());
    file.push(1);
    file.push(0);
    file.extend_from_slice(&4u16.to_le_bytes());
    file.extend_from_slice(&[0, 0]);
    file.extend_from_slice(&(2u32 << 1).to_le_bytes());

    // pid 0 has a saved cmdline on purpose: it must still render as <idle>
    segment(&mut file, 2, b"0 swapper\n42 kworker/0:1\n1234 bash\n");
    segment(&mut file, 3, b"42 2\n1234 1234\n");
    segment(&mut file, 99, b"junk");
    // cpu 0: a mark write at 1.0s and a sched_switch 500ns later
    let page0 = page(
        1_000_000_000,
        0,
        &[&mark_write_payload(), &sched_switch_payload()],
    );
    segment(&mut file, 4, &page0);
    // cpu 1: idle at 0.5s, two formatter-less events, one unknown id
    let unknown_id = common_prefix(777, 0, 0, 42);
    let page1 = page(
        500_000_000,
        1,
        &[
            &cpu_idle_payload(),
            &mystery_payload(),
            &mystery_payload(),
            &unknown_id,
        ],
    );
    segment(&mut file, 5, &page1);
    // the event-format table arrives last; rendering must not care
    segment(&mut file, 1, event_formats_segment().as_bytes());
    file
}

fn run_conversion(dir: &Path) -> (ConvertSummary, String) {
    let input = dir.join("record_trace.sys");
    let output = dir.join("record_trace.ftrace");
    std::fs::File::create(&input)
        .unwrap()
        .write_all(&build_capture())
        .unwrap();
    let summary = convert_capture(&input, &output).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    (summary, text)
}

#[test]
fn converts_a_full_capture() {
    let dir = tempfile::tempdir().unwrap();
    let (summary, text) = run_conversion(dir.path());

    let expected_lines = [
        "          <idle>-0     (-----) [001] ....     0.500000: cpu_idle: state=1 cpu_id=1",
        "            bash-1234  ( 1234) [000] ....     1.000000: tracing_mark_write: E|1234",
        "     kworker/0:1-42    (    2) [000] d..2     1.000001: sched_switch: \
         prev_comm=bash prev_pid=1234 prev_prio=120 prev_state=D ==> next_comm=kworker/0:1 \
         next_pid=42 next_prio=120 expeller_type=0",
    ];
    let expected = format!("{}{}\n", TRACE_BANNER, expected_lines.join("\n"));
    assert_eq!(text, expected);

    assert_eq!(summary.render.lines, 3);
    assert_eq!(summary.render.missing_format_events, 2);
    let missing: Vec<&str> = summary
        .render
        .missing_format
        .iter()
        .map(|s| s.as_str())
        .collect();
    assert_eq!(missing, ["mystery_event"]);
    assert_eq!(summary.render.unknown_event_ids.get(&777), Some(&1));
    assert_eq!(summary.render.per_event[&314].count, 1);
    assert_eq!(summary.render.per_event[&999].count, 2);

    assert_eq!(summary.decode.segments, 6);
    assert_eq!(summary.decode.raw_segments, 2);
    assert_eq!(summary.decode.pages, 2);
    let unknown: Vec<u32> = summary
        .decode
        .unknown_segment_types
        .iter()
        .copied()
        .collect();
    assert_eq!(unknown, [99]);
}

#[test]
fn conversion_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let (_, first) = run_conversion(dir.path());
    let (_, second) = run_conversion(dir.path());
    assert_eq!(first, second);
}

#[test]
fn empty_segments_and_empty_captures_are_fine() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.sys");
    let output = dir.path().join("empty.ftrace");

    let mut file = vec![0u8; 12];
    file[8..12].copy_from_slice(&(1u32 << 1).to_le_bytes());
    segment(&mut file, 2, b"");
    segment(&mut file, 4, b"");
    std::fs::File::create(&input)
        .unwrap()
        .write_all(&file)
        .unwrap();

    let summary = convert_capture(&input, &output).unwrap();
    assert_eq!(summary.render.lines, 0);
    assert_eq!(summary.decode.segments, 2);
    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text, TRACE_BANNER);
}

#[test]
fn truncated_captures_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("truncated.sys");
    let output = dir.path().join("truncated.ftrace");

    let mut file = vec![0u8; 12];
    file[8..12].copy_from_slice(&(1u32 << 1).to_le_bytes());
    file.extend_from_slice(&2u32.to_le_bytes());
    file.extend_from_slice(&100u32.to_le_bytes());
    file.extend_from_slice(b"short");
    std::fs::File::create(&input)
        .unwrap()
        .write_all(&file)
        .unwrap();

    assert!(convert_capture(&input, &output).is_err());
}
