//! The top-level capture container: a 12-byte file header followed by
//! `(type, size, payload)` segments until end of file.

use std::collections::BTreeSet;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};

use crate::error::Error;
use crate::event::EventBuffer;
use crate::metadata::{CmdLines, EventFormatTable, TidGroups};
use crate::page::decode_raw_segment;
use crate::reader::ByteReader;
use crate::unpack::unpack;

pub const CAPTURE_HEADER_SIZE: usize = 12;
const SEGMENT_HEADER_SIZE: usize = 8;

const SEGMENT_EVENT_FORMATS: u32 = 1;
const SEGMENT_CMDLINES: u32 = 2;
const SEGMENT_TGIDS: u32 = 3;
const SEGMENT_RAW_TRACE_BASE: u32 = 4;
const SEGMENT_HEADER_PAGE: u32 = 30;
const SEGMENT_PRINTK_FORMATS: u32 = 31;
const SEGMENT_KALLSYMS: u32 = 32;

/// The fixed capture-file header. The producer writes its C struct
/// `{u16 magic; u8 file_type; u16 version; u32 reserved}` with natural
/// alignment, so `version` sits at byte 4 and `reserved` at byte 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureHeader {
    pub magic: u16,
    pub file_type: u8,
    pub version: u16,
    pub reserved: u32,
}

impl CaptureHeader {
    pub fn parse(data: &[u8]) -> Result<CaptureHeader, Error> {
        if data.len() < CAPTURE_HEADER_SIZE {
            return Err(Error::TruncatedCapture("capture header"));
        }
        Ok(CaptureHeader {
            magic: LittleEndian::read_u16(&data[0..]),
            file_type: data[2],
            version: LittleEndian::read_u16(&data[4..]),
            reserved: LittleEndian::read_u32(&data[8..]),
        })
    }

    /// Number of CPUs whose ring buffers the capture holds, from bits 1-5
    /// of the reserved field. Raw-trace segment types are
    /// `4 .. 4 + cpu_count`.
    pub fn cpu_count(&self) -> u32 {
        (self.reserved >> 1) & 0x1f
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    EventFormats,
    CmdLines,
    TidGroups,
    RawTrace { cpu: u32 },
    HeaderPage,
    PrintkFormats,
    Kallsyms,
    Unsupported,
}

impl SegmentKind {
    pub fn classify(raw: u32, cpu_count: u32) -> SegmentKind {
        match raw {
            SEGMENT_EVENT_FORMATS => SegmentKind::EventFormats,
            SEGMENT_CMDLINES => SegmentKind::CmdLines,
            SEGMENT_TGIDS => SegmentKind::TidGroups,
            SEGMENT_HEADER_PAGE => SegmentKind::HeaderPage,
            SEGMENT_PRINTK_FORMATS => SegmentKind::PrintkFormats,
            SEGMENT_KALLSYMS => SegmentKind::Kallsyms,
            t if t >= SEGMENT_RAW_TRACE_BASE && t < SEGMENT_RAW_TRACE_BASE + cpu_count => {
                SegmentKind::RawTrace {
                    cpu: t - SEGMENT_RAW_TRACE_BASE,
                }
            }
            _ => SegmentKind::Unsupported,
        }
    }
}

#[derive(Debug, Default)]
pub struct DecodeStats {
    pub segments: usize,
    pub raw_segments: usize,
    pub pages: usize,
    pub malformed_pages: usize,
    pub malformed_segments: usize,
    pub unknown_segment_types: BTreeSet<u32>,
}

/// Everything decoded from one capture file. Metadata and raw-trace
/// segments may appear in any order in the container, so rendering starts
/// only after the whole file has been walked.
#[derive(Debug)]
pub struct Capture {
    pub header: CaptureHeader,
    pub formats: EventFormatTable,
    pub cmdlines: CmdLines,
    pub tgids: TidGroups,
    pub events: EventBuffer,
    pub stats: DecodeStats,
}

/// Walk a capture file end to end. Only I/O problems and truncation in the
/// middle of a record are fatal; anything wrong inside a segment abandons
/// that segment and decoding continues with the next one.
pub fn read_capture(path: &Path) -> Result<Capture, Error> {
    let mut reader = ByteReader::open(path)?;
    let header_bytes = reader.read_exact_block(CAPTURE_HEADER_SIZE, "capture header")?;
    let header = CaptureHeader::parse(&header_bytes)?;
    let cpu_count = header.cpu_count();
    debug!(
        "capture magic 0x{:04x} type {} version {} with {} CPUs",
        header.magic, header.file_type, header.version, cpu_count
    );
    if cpu_count == 0 {
        warn!("capture header reports 0 CPUs; no raw-trace segments will match");
    }

    let mut capture = Capture {
        header,
        formats: EventFormatTable::default(),
        cmdlines: CmdLines::default(),
        tgids: TidGroups::default(),
        events: EventBuffer::default(),
        stats: DecodeStats::default(),
    };

    while let Some(segment_header) = reader.read_block(SEGMENT_HEADER_SIZE, "segment header")? {
        // read_block returned a full 8 bytes, so this can't mismatch.
        let values = unpack("II", &segment_header).expect("segment header size");
        let (segment_type, segment_size) = (values[0] as u32, values[1] as usize);
        let payload = reader.read_exact_block(segment_size, "segment payload")?;
        capture.stats.segments += 1;

        match SegmentKind::classify(segment_type, cpu_count) {
            SegmentKind::EventFormats => {
                with_segment_text(&payload, &mut capture.stats, |text| {
                    capture.formats.parse_segment(text)
                });
            }
            SegmentKind::CmdLines => {
                with_segment_text(&payload, &mut capture.stats, |text| {
                    capture.cmdlines.parse_segment(text)
                });
            }
            SegmentKind::TidGroups => {
                with_segment_text(&payload, &mut capture.stats, |text| {
                    capture.tgids.parse_segment(text)
                });
            }
            SegmentKind::RawTrace { cpu } => {
                debug!("raw trace segment for cpu {cpu}: {segment_size} bytes");
                capture.stats.raw_segments += 1;
                decode_raw_segment(&payload, &mut capture.events, &mut capture.stats);
            }
            SegmentKind::HeaderPage | SegmentKind::PrintkFormats | SegmentKind::Kallsyms => {
                debug!("skipping segment type {segment_type} ({segment_size} bytes)");
            }
            SegmentKind::Unsupported => {
                if capture.stats.unknown_segment_types.insert(segment_type) {
                    warn!("unsupported segment type {segment_type}, skipping");
                }
            }
        }
    }

    Ok(capture)
}

fn with_segment_text(payload: &[u8], stats: &mut DecodeStats, f: impl FnOnce(&str)) {
    match std::str::from_utf8(payload) {
        Ok(text) => f(text),
        Err(e) => {
            warn!("metadata segment is not valid UTF-8 ({e}), abandoning it");
            stats.malformed_segments += 1;
        }
    }
}
