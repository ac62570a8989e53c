//! Scheduler events: wakeup, switch, blocked reason.

use super::FormatterTable;
use crate::event::FieldView;

const SCHED_WAKEUP_HM: &str = r#""comm=%s pid=%d prio=%d target_cpu=%03d", REC->pname, REC->pid, REC->prio, REC->target_cpu"#;
const SCHED_WAKEUP: &str = r#""comm=%s pid=%d prio=%d target_cpu=%03d", REC->comm, REC->pid, REC->prio, REC->target_cpu"#;
const SCHED_SWITCH_HM: &str = r#""prev_comm=%s prev_pid=%d prev_prio=%d prev_state=%s" " ==> next_comm=%s next_pid=%d next_prio=%d", REC->pname, REC->prev_tid, REC->pprio, hm_trace_tcb_state2str(REC->pstate), REC->nname, REC->next_tid, REC->nprio"#;
const SCHED_SWITCH: &str = r#""prev_comm=%s prev_pid=%d prev_prio=%d prev_state=%s%s ==> next_comm=%s next_pid=%d next_prio=%d expeller_type=%u", REC->prev_comm, REC->prev_pid, REC->prev_prio, (REC->prev_state & ((((0x0000 | 0x0001 | 0x0002 | 0x0004 | 0x0008 | 0x0010 | 0x0020 | 0x0040) + 1) << 1) - 1)) ? __print_flags(REC->prev_state & ((((0x0000 | 0x0001 | 0x0002 | 0x0004 | 0x0008 | 0x0010 | 0x0020 | 0x0040) + 1) << 1) - 1), "|", { 0x0001, "S" }, { 0x0002, "D" }, { 0x0004, "T" }, { 0x0008, "t" }, { 0x0010, "X" }, { 0x0020, "Z" }, { 0x0040, "P" }, { 0x0080, "I" }) : "R", REC->prev_state & (((0x0000 | 0x0001 | 0x0002 | 0x0004 | 0x0008 | 0x0010 | 0x0020 | 0x0040) + 1) << 1) ? "+" : "", REC->next_comm, REC->next_pid, REC->next_prio, REC->expeller_type"#;
const SCHED_BLOCKED_REASON_HM: &str = r#""pid=%d iowait=%d caller=%s delay=%llu", REC->pid, REC->iowait, hmtrace_sched_blocked_reason_of(REC->cnode_idx, REC->caller), REC->delay >> 10"#;
const SCHED_BLOCKED_REASON: &str = r#""pid=%d iowait=%d caller=%pS delay=%lu", REC->pid, REC->io_wait, REC->caller, REC->delay>>10"#;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(SCHED_WAKEUP_HM, sched_wakeup_hm);
    table.insert(SCHED_WAKEUP, sched_wakeup);
    table.insert(SCHED_SWITCH_HM, sched_switch_hm);
    table.insert(SCHED_SWITCH, sched_switch);
    table.insert(SCHED_BLOCKED_REASON_HM, sched_blocked_reason_hm);
    table.insert(SCHED_BLOCKED_REASON, sched_blocked_reason);
}

fn sched_wakeup_hm(view: &FieldView<'_>) -> Option<String> {
    let pname = view.cstr("pname[16]")?;
    let pid = view.int("pid")?;
    let prio = view.int("prio")?;
    let target_cpu = view.int("target_cpu")?;
    Some(format!(
        "comm={pname} pid={pid} prio={prio} target_cpu={target_cpu:03}"
    ))
}

fn sched_wakeup(view: &FieldView<'_>) -> Option<String> {
    let comm = view.cstr("comm[16]")?;
    let pid = view.int("pid")?;
    let prio = view.int("prio")?;
    let target_cpu = view.int("target_cpu")?;
    Some(format!(
        "comm={comm} pid={pid} prio={prio} target_cpu={target_cpu:03}"
    ))
}

fn sched_switch_hm(view: &FieldView<'_>) -> Option<String> {
    let pname = view.cstr("pname[16]")?;
    let prev_tid = view.int("prev_tid")?;
    let pprio = view.int("pprio")?;
    let pstate = view.int("pstate")?;
    let nname = view.cstr("nname[16]")?;
    let next_tid = view.int("next_tid")?;
    let nprio = view.int("nprio")?;

    let prev_state = match pstate {
        0x0 => "R",
        0x1 => "S",
        0x2 => "D",
        0x10 => "X",
        0x100 => "R+",
        _ => "?",
    };

    Some(format!(
        "prev_comm={pname} prev_pid={prev_tid} prev_prio={pprio} prev_state={prev_state} \
         ==> next_comm={nname} next_pid={next_tid} next_prio={nprio}"
    ))
}

/// Task states print as a single letter keyed on the low byte, `R` when no
/// bit is set, with `+` appended for the preempted bit 0x100.
fn task_state_str(state: i64) -> String {
    let letter = match state & 0xff {
        0x1 => "S",
        0x2 => "D",
        0x4 => "T",
        0x8 => "t",
        0x10 => "X",
        0x20 => "Z",
        0x40 => "P",
        0x80 => "I",
        _ => "R",
    };
    if state & 0x100 != 0 {
        format!("{letter}+")
    } else {
        letter.to_string()
    }
}

fn sched_switch(view: &FieldView<'_>) -> Option<String> {
    let prev_comm = view.cstr("prev_comm[16]")?;
    let prev_pid = view.int("prev_pid")?;
    let prev_prio = view.int("prev_prio")?;
    let prev_state = view.int("prev_state")?;
    let next_comm = view.cstr("next_comm[16]")?;
    let next_pid = view.int("next_pid")?;
    let next_prio = view.int("next_prio")?;
    let expeller_type = view.uint("expeller_type")?;

    let pstate = task_state_str(prev_state);
    Some(format!(
        "prev_comm={prev_comm} prev_pid={prev_pid} prev_prio={prev_prio} prev_state={pstate} \
         ==> next_comm={next_comm} next_pid={next_pid} next_prio={next_prio} \
         expeller_type={expeller_type}"
    ))
}

fn sched_blocked_reason_hm(view: &FieldView<'_>) -> Option<String> {
    let pid = view.int("pid")?;
    let caller = view.uint("caller")?;
    let iowait = view.uint("iowait")?;
    let delay = view.uint("delay")?;
    let cnode_idx = view.uint("cnode_idx")?;
    Some(format!(
        "pid={pid} iowait={iowait} caller=0x{caller:x} cnode_idx={cnode_idx} delay={}",
        delay >> 10
    ))
}

fn sched_blocked_reason(view: &FieldView<'_>) -> Option<String> {
    let pid = view.int("pid")?;
    let caller = view.uint("caller")?;
    let iowait = view.uint("iowait")?;
    let delay = view.uint("delay")?;
    Some(format!(
        "pid={pid} iowait={iowait} caller=0x{caller:x} delay={}",
        delay >> 10
    ))
}
