//! Converts binary hitrace capture files into systrace/ftrace-compatible
//! text.
//!
//! A capture file is a little-endian container: a 12-byte header, then
//! `(type, size, payload)` segments until end of file. Text segments carry
//! the metadata needed to make sense of the raw data — the kernel's
//! event-format table, the saved cmdlines and the tid→tgid table — and the
//! per-CPU segments carry ring-buffer pages of variable-length event
//! records. Because metadata may come after the raw data in the container,
//! the whole file is decoded first and rendering runs afterwards.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), hitrace_convert::Error> {
//! let summary = hitrace_convert::convert_capture(
//!     std::path::Path::new("record_trace.sys"),
//!     std::path::Path::new("record_trace.ftrace"),
//! )?;
//! summary.write_report(&mut std::io::stderr().lock())?;
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod error;
pub mod event;
pub mod formatters;
pub mod metadata;
pub mod page;
pub mod reader;
pub mod render;
pub mod textmode;
pub mod unpack;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use capture::{read_capture, Capture, DecodeStats};
pub use error::Error;
pub use render::{render_trace, RenderStats};

/// What a conversion run did, for the post-run report on stderr.
#[derive(Debug)]
pub struct ConvertSummary {
    pub decode: DecodeStats,
    pub render: RenderStats,
}

impl ConvertSummary {
    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "decoded {} segments ({} raw-trace, {} pages)",
            self.decode.segments, self.decode.raw_segments, self.decode.pages
        )?;
        if !self.decode.unknown_segment_types.is_empty() {
            let types: Vec<String> = self
                .decode
                .unknown_segment_types
                .iter()
                .map(|t| t.to_string())
                .collect();
            writeln!(out, "skipped unsupported segment types: {}", types.join(", "))?;
        }
        if self.decode.malformed_segments != 0 || self.decode.malformed_pages != 0 {
            writeln!(
                out,
                "abandoned {} malformed segments and {} malformed pages",
                self.decode.malformed_segments, self.decode.malformed_pages
            )?;
        }
        self.render.write_report(out)
    }
}

/// Convert one binary capture file, writing the rendered trace to
/// `output`. The output file is created truncating; on error it may be
/// left partially written, but the error is always reported.
pub fn convert_capture(input: &Path, output: &Path) -> Result<ConvertSummary, Error> {
    let mut capture = read_capture(input)?;
    let mut out = BufWriter::new(File::create(output)?);
    let render = render_trace(&mut capture, &mut out)?;
    out.flush()?;
    Ok(ConvertSummary {
        decode: capture.stats,
        render,
    })
}
