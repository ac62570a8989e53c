//! Little-endian decoding of fixed-layout records.
//!
//! The capture container describes its fixed records by compact layout
//! strings: one character per field, `B`/`H`/`I`/`L`/`Q` for unsigned
//! integers of 1/2/4/4/8 bytes, packed with no padding. `"QQB"` is a page
//! header, `"LH"` an event header, `"II"` a segment header.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::MalformedRecord;

fn field_size(c: char) -> usize {
    match c {
        'B' => 1,
        'H' => 2,
        'I' | 'L' => 4,
        'Q' => 8,
        _ => panic!("unknown layout character {c:?}"),
    }
}

/// Packed byte size of a layout descriptor.
pub fn packed_size(layout: &str) -> usize {
    layout.chars().map(field_size).sum()
}

/// Decode `data` according to `layout`, yielding one unsigned integer per
/// field. The slice length must match the layout's packed size exactly.
pub fn unpack(layout: &'static str, data: &[u8]) -> Result<Vec<u64>, MalformedRecord> {
    let expected = packed_size(layout);
    if data.len() != expected {
        return Err(MalformedRecord {
            layout,
            expected,
            actual: data.len(),
        });
    }
    let mut values = Vec::with_capacity(layout.len());
    let mut offset = 0;
    for c in layout.chars() {
        let size = field_size(c);
        let v = match size {
            1 => data[offset] as u64,
            2 => LittleEndian::read_u16(&data[offset..]) as u64,
            4 => LittleEndian::read_u32(&data[offset..]) as u64,
            _ => LittleEndian::read_u64(&data[offset..]),
        };
        values.push(v);
        offset += size;
    }
    Ok(values)
}
