use super::{Codec, DecodeError};

// Would use a comma between axes but it gets percent-escaped.
const AXIS_SEPARATOR: char = '.';
const COORD_SEPARATOR: char = '_';

/// One grid cell address, by row and column exponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Codec for an optional coordinate list, encoded as `x.y_x.y`.
///
/// `None` and the empty list both have no query representation, so a
/// cleared list removes the key. Decoding an unparsable pair rejects
/// the whole value and the binding falls back to its default.
pub struct CoordsCodec;

impl Codec<Option<Vec<Coordinate>>> for CoordsCodec {
    fn encode(&self, value: &Option<Vec<Coordinate>>) -> Option<String> {
        let coords = value.as_ref()?;
        if coords.is_empty() {
            return None;
        }
        Some(
            coords
                .iter()
                .map(|c| format!("{}{}{}", c.x, AXIS_SEPARATOR, c.y))
                .collect::<Vec<_>>()
                .join(&COORD_SEPARATOR.to_string()),
        )
    }

    fn decode(&self, raw: &str) -> Result<Option<Vec<Coordinate>>, DecodeError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let malformed = || DecodeError::Malformed(raw.to_string());
        let mut coords = Vec::new();
        for pair in raw.split(COORD_SEPARATOR) {
            let (x, y) = pair.split_once(AXIS_SEPARATOR).ok_or_else(malformed)?;
            let x = x.parse().map_err(|_| malformed())?;
            let y = y.parse().map_err(|_| malformed())?;
            coords.push(Coordinate { x, y });
        }
        Ok(Some(coords))
    }
}
