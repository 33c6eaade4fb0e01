//! Vector tiers and the generic kernel bodies they share.
//!
//! The kernels in [`reduce`] and [`search`] are written once against
//! [`SimdVector`]. Each tier module wraps them in `#[target_feature]` entry
//! points:
//!
//! - [`avx2`]: 256-bit WIDE tier (x86_64)
//! - [`sse`]: 128-bit NARROW tier (x86_64, SSE4.2)
//! - [`neon`]: 128-bit NARROW tier (aarch64)

#[cfg(target_arch = "x86_64")]
pub mod avx2;

#[cfg(target_arch = "x86_64")]
pub mod sse;

#[cfg(target_arch = "aarch64")]
pub mod neon;

pub mod reduce;
pub mod search;
pub mod traits;

pub use traits::SimdVector;

/// Splits a sub-register remainder into descending power-of-two chunks.
///
/// A remainder of `len` bytes (`len < register`, a multiple of `element`) is
/// covered by at most one chunk each of `register / 2`, `register / 4`, ...,
/// `element` bytes. Every branch is taken at most once, largest first.
///
/// Ascending iteration lays the chunks out upward from `start`; descending
/// iteration lays them out downward from `start + len`, so the chunk nearest
/// the high end comes first.
#[derive(Debug, Clone)]
pub(crate) struct TailChunks {
    low: usize,
    high: usize,
    chunk: usize,
    element: usize,
    descending: bool,
}

impl TailChunks {
    #[inline(always)]
    pub(crate) fn ascending(start: usize, len: usize, register: usize, element: usize) -> Self {
        debug_assert!(len < register && len % element == 0);
        Self {
            low: start,
            high: start + len,
            chunk: register / 2,
            element,
            descending: false,
        }
    }

    #[inline(always)]
    pub(crate) fn descending(start: usize, len: usize, register: usize, element: usize) -> Self {
        debug_assert!(len < register && len % element == 0);
        Self {
            low: start,
            high: start + len,
            chunk: register / 2,
            element,
            descending: true,
        }
    }
}

impl Iterator for TailChunks {
    /// `(byte offset, chunk bytes)`
    type Item = (usize, usize);

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        while self.chunk >= self.element {
            let chunk = self.chunk;
            self.chunk /= 2;
            if self.high - self.low >= chunk {
                return Some(if self.descending {
                    self.high -= chunk;
                    (self.high, chunk)
                } else {
                    self.low += chunk;
                    (self.low - chunk, chunk)
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::TailChunks;

    #[test]
    fn test_ascending_chunks_cover_remainder_in_order() {
        let chunks: Vec<_> = TailChunks::ascending(64, 28, 32, 4).collect();
        assert_eq!(chunks, vec![(64, 16), (80, 8), (88, 4)]);
    }

    #[test]
    fn test_descending_chunks_start_at_high_end() {
        let chunks: Vec<_> = TailChunks::descending(0, 28, 32, 4).collect();
        assert_eq!(chunks, vec![(12, 16), (4, 8), (0, 4)]);
    }

    #[test]
    fn test_single_byte_elements_reach_one_byte_chunks() {
        let chunks: Vec<_> = TailChunks::ascending(0, 15, 16, 1).collect();
        assert_eq!(chunks, vec![(0, 8), (8, 4), (12, 2), (14, 1)]);
    }

    #[test]
    fn test_empty_remainder_yields_nothing() {
        assert_eq!(TailChunks::ascending(32, 0, 32, 8).count(), 0);
        assert_eq!(TailChunks::descending(0, 0, 16, 2).count(), 0);
    }

    #[test]
    fn test_eight_byte_elements_skip_smaller_chunks() {
        let chunks: Vec<_> = TailChunks::ascending(0, 24, 32, 8).collect();
        assert_eq!(chunks, vec![(0, 16), (16, 8)]);
    }
}
