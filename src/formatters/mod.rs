//! The per-event formatter catalogue.
//!
//! Formatters are selected by the event's verbatim `print fmt` string — the
//! kernel-supplied format-string-literal-plus-argument-list, matched byte
//! for byte. This is deliberate: it tells apart same-named events across
//! kernel variants without any runtime format-string interpretation. Most
//! events exist in two flavors (a vendor kernel one and a mainline one)
//! whose format strings differ even where the rendered output doesn't.
//!
//! A formatter receives the event's named-field view and returns the text
//! payload of the line, or `None` when the payload doesn't carry what the
//! formatter needs (the event is then dropped and counted, never fatal).

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::event::FieldView;

mod binder;
mod block;
mod fs;
mod i2c;
mod mmc;
mod misc;
mod power;
mod regulator;
mod sched;
mod thermal;
mod ufs;

pub type Formatter = fn(&FieldView<'_>) -> Option<String>;

type FormatterTable = FxHashMap<&'static str, Formatter>;

static TABLE: LazyLock<FormatterTable> = LazyLock::new(|| {
    let mut table = FormatterTable::default();
    sched::register(&mut table);
    power::register(&mut table);
    fs::register(&mut table);
    block::register(&mut table);
    ufs::register(&mut table);
    i2c::register(&mut table);
    regulator::register(&mut table);
    binder::register(&mut table);
    mmc::register(&mut table);
    thermal::register(&mut table);
    misc::register(&mut table);
    table
});

/// Look up the formatter for a `print fmt` string.
pub fn formatter_for(print_fmt: &str) -> Option<Formatter> {
    TABLE.get(print_fmt).copied()
}

/// Number of known print formats, for the run summary.
pub fn known_format_count() -> usize {
    TABLE.len()
}

/// Device numbers are packed as `major << 20 | minor`.
pub(crate) fn split_dev(dev: u64) -> (u64, u64) {
    (dev >> 20, dev & 0xfffff)
}
