//! Bit-interleaved tile hash codec.
//!
//! A tile hash spells out the path from the root to a tile, one digit per
//! zoom level. Each digit is `1 + (f << 2 | y << 1 | x)` for the bits of the
//! vertical, y and x indices at that level, so:
//!
//! - a tile's hash starts with the hash of every one of its ancestors,
//! - sorting hashes lexicographically sorts tiles in Z-order,
//! - the root tile hashes to the empty string.
//!
//! ```
//! use local_spatial_id_types::tilehash;
//! use local_spatial_id_types::zfxy::ZFXYTile;
//!
//! let tile = ZFXYTile::new(2, 1, 3, 0).unwrap();
//! let hash = tilehash::encode(&tile);
//! assert_eq!(hash, "26");
//! assert_eq!(tilehash::decode(&hash).unwrap(), tile);
//! ```

use crate::error::ZfxyError;
use crate::zfxy::{MAX_ZOOM, ZFXYTile};

/// Encode a tile into its hash.
pub fn encode(tile: &ZFXYTile) -> String {
    encode_axes(tile.z, tile.f, tile.x, tile.y)
}

/// Encode raw axis values at zoom `z`. Bits above `z` are ignored, and bits
/// past the width of `u64` read as zero.
pub fn encode_axes(z: u32, f: u64, x: u64, y: u64) -> String {
    let bit_of = |value: u64, bit: u32| value.checked_shr(bit).unwrap_or(0) & 1;
    let mut out = String::with_capacity(z as usize);
    for bit in (0..z).rev() {
        let digit = child_digit(bit_of(f, bit), bit_of(x, bit), bit_of(y, bit));
        out.push(char::from(b'1' + digit as u8));
    }
    out
}

/// Decode a tile hash back into a tile.
///
/// # Errors
///
/// Returns `ZfxyError::Parse` for characters outside `1..=8` or a hash
/// deeper than [`MAX_ZOOM`].
pub fn decode(hash: &str) -> Result<ZFXYTile, ZfxyError> {
    let (z, f, x, y) = decode_axes(hash)?;
    Ok(ZFXYTile { z, f, x, y })
}

/// Decode a tile hash into raw `(z, f, x, y)` axis values.
pub fn decode_axes(hash: &str) -> Result<(u32, u64, u64, u64), ZfxyError> {
    let (mut z, mut f, mut x, mut y) = (0u32, 0u64, 0u64, 0u64);

    for ch in hash.chars() {
        if z >= MAX_ZOOM {
            return Err(ZfxyError::Parse(format!(
                "tile hash '{}' is deeper than the maximum zoom {}",
                hash, MAX_ZOOM
            )));
        }

        let digit = match ch {
            '1'..='8' => u64::from(ch as u8 - b'1'),
            _ => {
                return Err(ZfxyError::Parse(format!(
                    "invalid character '{}' in tile hash '{}'",
                    ch, hash
                )));
            }
        };

        f = (f << 1) | (digit >> 2);
        y = (y << 1) | ((digit >> 1) & 1);
        x = (x << 1) | (digit & 1);
        z += 1;
    }

    Ok((z, f, x, y))
}

/// Position (0..8) of a child within its parent for the given axis bits.
#[inline]
pub fn child_digit(f_bit: u64, x_bit: u64, y_bit: u64) -> u64 {
    (f_bit << 2) | (y_bit << 1) | x_bit
}

/// Split a descendant index into `(f, x, y)` offsets below an ancestor
/// `depth` levels up. Index `i` is the `i`-th descendant in hash order.
pub fn deinterleave(index: u64, depth: u32) -> (u64, u64, u64) {
    let (mut f, mut x, mut y) = (0u64, 0u64, 0u64);
    for level in (0..depth).rev() {
        let digit = (index >> (3 * level)) & 0b111;
        f = (f << 1) | ((digit >> 2) & 1);
        y = (y << 1) | ((digit >> 1) & 1);
        x = (x << 1) | (digit & 1);
    }
    (f, x, y)
}
