//! Decoders for the text-format metadata segments: the event-format table,
//! the saved cmdline table and the saved tid→tgid table.

use log::warn;
use rustc_hash::FxHashMap;

/// One field of an event payload, as described by the kernel's format file.
///
/// `name` is kept verbatim, including array suffixes (`comm[16]`): the
/// formatter catalogue addresses fields under those exact spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDesc {
    pub type_name: String,
    pub name: String,
    pub offset: usize,
    pub size: usize,
    pub signed: bool,
}

/// Per-event-id descriptor: how to slice a payload into named fields, and
/// the verbatim `print fmt` line used to pick a formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFormat {
    pub name: String,
    pub id: u16,
    pub fields: Vec<FieldDesc>,
    pub print_fmt: String,
}

#[derive(Debug, Default)]
pub struct EventFormatTable {
    by_id: FxHashMap<u16, EventFormat>,
}

impl EventFormatTable {
    pub fn get(&self, id: u16) -> Option<&EventFormat> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Decode one event-format segment. The segment is a newline-separated
    /// run of per-event records; a `print fmt:` line closes the current
    /// record. Line classification is purely prefix-based, everything
    /// unrecognized is skipped.
    pub fn parse_segment(&mut self, text: &str) {
        let mut name = None::<String>;
        let mut id = None::<u16>;
        let mut fields = Vec::new();

        for line in text.split('\n') {
            let line = line.trim_start();
            if let Some(rest) = line.strip_prefix("name: ") {
                name = Some(rest.to_string());
            } else if let Some(rest) = line.strip_prefix("ID: ") {
                id = rest.trim().parse().ok();
            } else if line.starts_with("field:") {
                if let Some(field) = parse_field_line(line) {
                    fields.push(field);
                }
            } else if let Some(rest) = line.strip_prefix("print fmt: ") {
                match (name.take(), id.take()) {
                    (Some(name), Some(id)) => {
                        self.by_id.insert(
                            id,
                            EventFormat {
                                name,
                                id,
                                fields: std::mem::take(&mut fields),
                                print_fmt: rest.to_string(),
                            },
                        );
                    }
                    _ => {
                        warn!("event format record without name/ID, dropping it");
                        fields.clear();
                    }
                }
            }
        }
    }
}

/// `field:<type> <name>; offset:<n>; size:<n>; signed:<0|1>;`
///
/// The name is the text after the last space of the first clause; the type
/// is everything before it.
fn parse_field_line(line: &str) -> Option<FieldDesc> {
    let mut clauses = line.split(';');
    let decl = clauses.next()?.trim_start().strip_prefix("field:")?;
    let offset = clauses.next()?.trim_start().strip_prefix("offset:")?;
    let size = clauses.next()?.trim_start().strip_prefix("size:")?;
    let signed = clauses.next()?.trim_start().strip_prefix("signed:")?;

    let split = decl.rfind(' ')?;
    Some(FieldDesc {
        type_name: decl[..split].to_string(),
        name: decl[split + 1..].to_string(),
        offset: offset.parse().ok()?,
        size: size.parse().ok()?,
        signed: signed.trim() == "1",
    })
}

/// pid → command name, from lines of the form `<pid> <comm>`.
#[derive(Debug, Default)]
pub struct CmdLines {
    by_pid: FxHashMap<u32, String>,
}

impl CmdLines {
    pub fn get(&self, pid: u32) -> Option<&str> {
        self.by_pid.get(&pid).map(|s| s.as_str())
    }

    pub fn parse_segment(&mut self, text: &str) {
        for line in text.split('\n') {
            let Some((pid, comm)) = line.split_once(' ') else {
                continue;
            };
            if let Ok(pid) = pid.parse() {
                self.by_pid.insert(pid, comm.to_string());
            }
        }
    }
}

/// pid → thread group id, from lines of the form `<pid> <tgid>`.
#[derive(Debug, Default)]
pub struct TidGroups {
    by_pid: FxHashMap<u32, i64>,
}

impl TidGroups {
    pub fn get(&self, pid: u32) -> Option<i64> {
        self.by_pid.get(&pid).copied()
    }

    pub fn parse_segment(&mut self, text: &str) {
        for line in text.split('\n') {
            let Some((pid, tgid)) = line.split_once(' ') else {
                continue;
            };
            if let (Ok(pid), Ok(tgid)) = (pid.parse(), tgid.trim().parse()) {
                self.by_pid.insert(pid, tgid);
            }
        }
    }
}
