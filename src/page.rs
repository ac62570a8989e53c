//! Framing of raw-trace segments: fixed 4096-byte per-CPU pages, each
//! holding a run of variable-length, 4-byte-aligned event records.

use byteorder::{ByteOrder, LittleEndian};
use log::warn;

use crate::capture::DecodeStats;
use crate::error::MalformedRecord;
use crate::event::{EventBuffer, RawEvent};
use crate::unpack::unpack;

pub const PAGE_SIZE: usize = 4096;
pub const PAGE_HEADER_SIZE: usize = 17;
pub const EVENT_HEADER_SIZE: usize = 6;

/// 17-byte page header: base timestamp, committed length, core id.
///
/// The length field is informational only; event framing is driven by the
/// fixed page size and per-event size advancement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub timestamp: u64,
    pub length: u64,
    pub core_id: u8,
}

impl PageHeader {
    pub fn parse(data: &[u8]) -> Result<PageHeader, MalformedRecord> {
        let values = unpack("QQB", data)?;
        Ok(PageHeader {
            timestamp: values[0],
            length: values[1],
            core_id: values[2] as u8,
        })
    }
}

/// Decode one raw-trace segment into the event buffer. The segment is
/// walked in whole pages; a trailing chunk shorter than a page is ignored.
pub fn decode_raw_segment(data: &[u8], events: &mut EventBuffer, stats: &mut DecodeStats) {
    for page in data.chunks_exact(PAGE_SIZE) {
        decode_page(page, events, stats);
        stats.pages += 1;
    }
}

/// Decode the events of one page. Malformed data abandons the rest of the
/// page; earlier events of the page are kept.
fn decode_page(page: &[u8], events: &mut EventBuffer, stats: &mut DecodeStats) {
    let header = match PageHeader::parse(&page[..PAGE_HEADER_SIZE]) {
        Ok(header) => header,
        Err(e) => {
            warn!("bad page header: {e}");
            stats.malformed_pages += 1;
            return;
        }
    };

    let mut pos = PAGE_HEADER_SIZE;
    while pos + EVENT_HEADER_SIZE <= PAGE_SIZE {
        let ts_offset = LittleEndian::read_u32(&page[pos..]);
        let event_size = LittleEndian::read_u16(&page[pos + 4..]) as usize;
        if event_size == 0 {
            // Padding tail of the page.
            break;
        }
        pos += EVENT_HEADER_SIZE;
        if event_size < 2 || pos + event_size > PAGE_SIZE {
            warn!(
                "event of {event_size} bytes at page offset {pos} overruns the page, \
                 dropping the rest of the page"
            );
            stats.malformed_pages += 1;
            break;
        }

        let payload = &page[pos..pos + event_size];
        let event_id = LittleEndian::read_u16(payload);
        events.push(RawEvent {
            timestamp: header.timestamp + u64::from(ts_offset),
            core: header.core_id,
            event_id,
            payload: payload.to_vec(),
        });

        // The cursor advances by the aligned size; the gap past the raw
        // size is padding.
        pos += (event_size + 3) & !3;
    }
}
