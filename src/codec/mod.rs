//! Typed state over an untyped string channel.
//!
//! A [`Codec`] translates one binding's value type to and from its raw
//! query-parameter form. Decoding is total from the binding's point of
//! view: a failure is reported as a [`DecodeError`] and the binding
//! falls back to its default instead of surfacing it.

mod codec;
mod coords;

pub use codec::{Codec, DecodeError, JsonCodec};
pub use coords::{Coordinate, CoordsCodec};
