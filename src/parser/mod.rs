//! Parser module - message body decoding
//!
//! Cells and the binary cursor over them, raw addresses, and the caption
//! decoders that turn known message bodies into display values.

pub mod address;
pub mod captions;
pub mod cell;

// Re-export key types
pub use address::Address;
pub use captions::{CaptionDecoder, CaptionHandler, CaptionParams, CaptionRegistry, Captions};
pub use cell::{Cell, CellBuilder, Slice, begin_message};

/// Leading 32-bit op code of a body, if the body is long enough to carry one
pub fn body_op(body: &Cell) -> Option<u32> {
    if body.bit_len() < 32 {
        return None;
    }
    body.parse().load_uint(32).ok().map(|op| op as u32)
}
