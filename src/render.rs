//! Turns a decoded capture into systrace/ftrace-compatible text.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::io::Write;

use crate::capture::Capture;
use crate::error::Error;
use crate::event::{FieldView, RawEvent};
use crate::formatters;
use crate::metadata::{CmdLines, TidGroups};

/// The fixed column banner. Written verbatim, placeholders included — the
/// devices' own tooling has always emitted it this way and downstream
/// parsers expect it.
pub const TRACE_BANNER: &str = "\
# tracer: nop
#
# entries-in-buffer/entries-written: %lu/%lu   #P:%d
#
#                                      _-----=> irqs-off
#                                     / _----=> need-resched
#                                    | / _---=> hardirq/softirq
#                                    || / _--=> preempt-depth
#                                    ||| /     delay
#           TASK-PID    TGID   CPU#  ||||    TIMESTAMP  FUNCTION
#              | |        |      |   ||||       |         |
";

const TASK_WIDTH: usize = 16;
const PID_WIDTH: usize = 6;
const TGID_WIDTH: usize = 5;

const FLAG_IRQS_OFF: u64 = 0x01;
const FLAG_IRQS_NOSUPPORT: u64 = 0x02;
const FLAG_NEED_RESCHED: u64 = 0x04;
const FLAG_HARDIRQ: u64 = 0x08;
const FLAG_SOFTIRQ: u64 = 0x10;
const FLAG_PREEMPT_RESCHED: u64 = 0x20;
const FLAG_NMI: u64 = 0x40;

/// Per-event-id tallies for the run summary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventTally {
    pub name: String,
    pub count: usize,
    pub bytes: usize,
}

#[derive(Debug, Default)]
pub struct RenderStats {
    pub lines: usize,
    pub per_event: BTreeMap<u16, EventTally>,
    pub unknown_event_ids: BTreeMap<u16, usize>,
    /// Names of events whose print fmt has no formatter, each once.
    pub missing_format: BTreeSet<String>,
    pub missing_format_events: usize,
    pub dropped_malformed: usize,
}

impl RenderStats {
    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "wrote {} trace lines ({} known print formats)",
            self.lines,
            formatters::known_format_count()
        )?;
        for (id, tally) in &self.per_event {
            writeln!(
                out,
                "  event {:5} {:<28} {:8} events, {} bytes",
                id, tally.name, tally.count, tally.bytes
            )?;
        }
        if !self.unknown_event_ids.is_empty() {
            let total: usize = self.unknown_event_ids.values().sum();
            let ids: Vec<String> = self
                .unknown_event_ids
                .keys()
                .map(|id| id.to_string())
                .collect();
            writeln!(
                out,
                "dropped {} events with ids missing from the format table: {}",
                total,
                ids.join(", ")
            )?;
        }
        if !self.missing_format.is_empty() {
            writeln!(
                out,
                "dropped {} events with unsupported print formats:",
                self.missing_format_events
            )?;
            for name in &self.missing_format {
                writeln!(out, "  {name}")?;
            }
        }
        if self.dropped_malformed != 0 {
            writeln!(
                out,
                "dropped {} events with malformed payloads",
                self.dropped_malformed
            )?;
        }
        Ok(())
    }
}

/// Sort the buffered events and write the whole trace. All metadata
/// segments must already have been decoded.
pub fn render_trace<W: Write>(capture: &mut Capture, out: &mut W) -> Result<RenderStats, Error> {
    capture.events.sort_by_timestamp();
    out.write_all(TRACE_BANNER.as_bytes())?;

    let mut stats = RenderStats::default();
    let mut line = String::new();
    for event in capture.events.iter() {
        let Some(format) = capture.formats.get(event.event_id) else {
            *stats.unknown_event_ids.entry(event.event_id).or_default() += 1;
            continue;
        };

        let tally = stats
            .per_event
            .entry(event.event_id)
            .or_insert_with(|| EventTally {
                name: format.name.clone(),
                ..EventTally::default()
            });
        tally.count += 1;
        tally.bytes += event.payload.len();

        let Some(formatter) = formatters::formatter_for(&format.print_fmt) else {
            stats.missing_format.insert(format.name.clone());
            stats.missing_format_events += 1;
            continue;
        };

        let view = FieldView::new(format, &event.payload);
        let Some(body) = formatter(&view) else {
            stats.dropped_malformed += 1;
            continue;
        };

        line.clear();
        write_line_prefix(&mut line, &capture.cmdlines, &capture.tgids, event, &view);
        line.push_str(view.event_name());
        line.push_str(": ");
        line.push_str(&body);
        line.push('\n');
        out.write_all(line.as_bytes())?;
        stats.lines += 1;
    }
    Ok(stats)
}

fn write_line_prefix(
    line: &mut String,
    cmdlines: &CmdLines,
    tgids: &TidGroups,
    event: &RawEvent,
    view: &FieldView<'_>,
) {
    let pid = view.uint("common_pid").unwrap_or(0) as u32;

    let task = if pid == 0 {
        "<idle>"
    } else {
        cmdlines.get(pid).unwrap_or("<...>")
    };
    let _ = write!(line, "{task:>TASK_WIDTH$}-");
    let _ = write!(line, "{pid:<PID_WIDTH$}");
    match tgids.get(pid) {
        Some(tgid) => {
            let _ = write!(line, "({tgid:>TGID_WIDTH$})");
        }
        None => line.push_str("(-----)"),
    }
    let _ = write!(line, " [{:03}] ", event.core);

    let flags = view.uint("common_flags").unwrap_or(0);
    let preempt_count = view.uint("common_preempt_count").unwrap_or(0);
    if flags | preempt_count == 0 {
        line.push_str(".... ");
    } else {
        line.push_str(&flags_string(flags, preempt_count));
        line.push(' ');
    }

    // Half-up rounding from nanoseconds to microseconds.
    let micros = event.timestamp / 1000 + u64::from(event.timestamp % 1000 >= 500);
    let _ = write!(line, "{:>5}.{:06}: ", micros / 1_000_000, micros % 1_000_000);
}

/// The four-character latency column: irqs-off, need-resched,
/// hardirq/softirq/nmi, preempt-depth.
fn flags_string(flags: u64, preempt_count: u64) -> String {
    let irqs_off = if flags & FLAG_IRQS_OFF != 0 {
        'd'
    } else if flags & FLAG_IRQS_NOSUPPORT != 0 {
        'X'
    } else {
        '.'
    };

    let need_resched = flags & FLAG_NEED_RESCHED != 0;
    let preempt_resched = flags & FLAG_PREEMPT_RESCHED != 0;
    let resched = match (need_resched, preempt_resched) {
        (true, true) => 'N',
        (true, false) => 'n',
        (false, true) => 'p',
        (false, false) => '.',
    };

    let nmi = flags & FLAG_NMI != 0;
    let hardirq = flags & FLAG_HARDIRQ != 0;
    let softirq = flags & FLAG_SOFTIRQ != 0;
    let irq = if nmi && hardirq {
        'Z'
    } else if nmi {
        'z'
    } else if hardirq && softirq {
        'H'
    } else if hardirq {
        'h'
    } else if softirq {
        's'
    } else {
        '.'
    };

    let depth = if preempt_count != 0 {
        b"0123456789abcdef"[(preempt_count & 0x0f) as usize] as char
    } else {
        '.'
    };

    [irqs_off, resched, irq, depth].iter().collect()
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use super::*;

    #[test]
    fn flag_glyphs() {
        assert_eq!(flags_string(0x01, 0), "d...");
        assert_eq!(flags_string(0x02, 0), "X...");
        assert_eq!(flags_string(0x04 | 0x20, 0), ".N..");
        assert_eq!(flags_string(0x04, 0), ".n..");
        assert_eq!(flags_string(0x20, 0), ".p..");
        assert_eq!(flags_string(0x40 | 0x08, 0), "..Z.");
        assert_eq!(flags_string(0x40, 0), "..z.");
        assert_eq!(flags_string(0x08 | 0x10, 0), "..H.");
        assert_eq!(flags_string(0x08, 0), "..h.");
        assert_eq!(flags_string(0x10, 0), "..s.");
        assert_eq!(flags_string(0, 0x12), "...2");
        assert_eq!(flags_string(0x01, 0x1b), "d..b");
    }

    #[test]
    fn microsecond_rounding() {
        // Mirrors the prefix arithmetic: ns -> µs with half-up at 500.
        let round = |ns: u64| ns / 1000 + u64::from(ns % 1000 >= 500);
        assert_eq!(round(1_000_000_499), 1_000_000);
        assert_eq!(round(1_000_000_500), 1_000_001);
        assert_eq!(round(1_000_001_000), 1_000_001);
        assert_eq!(round(999_500), 1_000);
    }

    #[test]
    fn timestamp_columns() {
        let mut s = String::new();
        let micros = 1_000_000u64;
        let _ = write!(s, "{:>5}.{:06}: ", micros / 1_000_000, micros % 1_000_000);
        assert_eq!(s, "    1.000000: ");
        s.clear();
        let micros = 1_000u64;
        let _ = write!(s, "{:>5}.{:06}: ", micros / 1_000_000, micros % 1_000_000);
        assert_eq!(s, "    0.001000: ");
    }
}
