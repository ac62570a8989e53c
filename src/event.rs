//! Decoded trace events and the named-field view a formatter works with.

use memchr::memchr;

use crate::metadata::EventFormat;

/// One trace record, as recovered from a ring-buffer page.
///
/// `timestamp` is absolute nanoseconds (page base + event offset).
/// `payload` is the raw event bytes; field offsets from the event-format
/// table refer to this slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub timestamp: u64,
    pub core: u8,
    pub event_id: u16,
    pub payload: Vec<u8>,
}

/// All decoded events of a capture, in discovery order until sorted.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<RawEvent>,
}

impl EventBuffer {
    pub fn push(&mut self, event: RawEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Order events by ascending timestamp. The sort is stable, so events
    /// with equal timestamps keep their discovery order.
    pub fn sort_by_timestamp(&mut self) {
        self.events.sort_by_key(|e| e.timestamp);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawEvent> {
        self.events.iter()
    }
}

/// Field access into one event payload, driven by the event's descriptor.
///
/// Formatters must go through this view rather than hardcoding offsets:
/// different kernel variants place the same logical field at different
/// positions, and only the descriptor knows where a field actually lives.
pub struct FieldView<'a> {
    format: &'a EventFormat,
    payload: &'a [u8],
}

impl<'a> FieldView<'a> {
    pub fn new(format: &'a EventFormat, payload: &'a [u8]) -> Self {
        FieldView { format, payload }
    }

    pub fn event_name(&self) -> &'a str {
        &self.format.name
    }

    /// The raw bytes of a named field, or `None` if the descriptor doesn't
    /// list the field or the payload is too short for it.
    pub fn bytes(&self, name: &str) -> Option<&'a [u8]> {
        let field = self.format.fields.iter().find(|f| f.name == name)?;
        let end = field.offset.checked_add(field.size)?;
        self.payload.get(field.offset..end)
    }

    /// Little-endian unsigned integer of the field's width (1..=8 bytes).
    pub fn uint(&self, name: &str) -> Option<u64> {
        let bytes = self.bytes(name)?;
        if bytes.is_empty() || bytes.len() > 8 {
            return None;
        }
        let mut buf = [0u8; 8];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(u64::from_le_bytes(buf))
    }

    /// Little-endian signed integer of the field's width, sign-extended.
    pub fn int(&self, name: &str) -> Option<i64> {
        let bytes = self.bytes(name)?;
        if bytes.is_empty() || bytes.len() > 8 {
            return None;
        }
        let fill = if bytes[bytes.len() - 1] & 0x80 != 0 {
            0xff
        } else {
            0
        };
        let mut buf = [fill; 8];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(i64::from_le_bytes(buf))
    }

    /// Like [`FieldView::uint`] but for oversized array fields (up to 16
    /// bytes), which some events print as one wide hex number.
    pub fn uint_wide(&self, name: &str) -> Option<u128> {
        let bytes = self.bytes(name)?;
        if bytes.is_empty() || bytes.len() > 16 {
            return None;
        }
        let mut buf = [0u8; 16];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(u128::from_le_bytes(buf))
    }

    /// A fixed-size string field: UTF-8 up to the first NUL byte.
    pub fn cstr(&self, name: &str) -> Option<&'a str> {
        str_up_to_nul(self.bytes(name)?)
    }

    /// A dynamic string: the named field is a 4-byte `__data_loc` whose low
    /// 16 bits give the offset of a NUL-terminated string at the payload
    /// tail.
    pub fn data_loc_str(&self, name: &str) -> Option<&'a str> {
        let loc = self.uint(name)?;
        self.cstr_at((loc & 0xffff) as usize)
    }

    /// NUL-terminated string starting at an arbitrary payload offset.
    pub fn cstr_at(&self, offset: usize) -> Option<&'a str> {
        str_up_to_nul(self.payload.get(offset..)?)
    }

    /// Raw payload bytes starting at an arbitrary offset.
    pub fn payload_at(&self, offset: usize) -> Option<&'a [u8]> {
        self.payload.get(offset..)
    }
}

fn str_up_to_nul(bytes: &[u8]) -> Option<&str> {
    let end = memchr(0, bytes).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end]).ok()
}
