//! Bit vector with precomputed rank samples at block boundaries.

use crate::bit_pack::BitPack;

/// A packed bit vector answering `rank` queries, optionally accelerated by
/// prefix-rank samples taken every `block_size` bits.
///
/// With a block size λ configured, sample `k` holds `rank1(k·λ)` and a query
/// scans at most λ bits past the nearest preceding boundary. The sample array
/// always has `⌈B/λ⌉ + 1` entries, so the sample index derived from any
/// position `≤ B` is in range and no fallback path exists. Without a block
/// size the query degenerates to a scan of the whole prefix.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RankBitVector {
    bits: BitPack,
    block_size: Option<usize>,
    samples: Vec<usize>,
}

impl RankBitVector {
    /// Pack `bits` and precompute rank samples when `block_size` is given.
    ///
    /// A `block_size` of zero is rejected by the index builder before it
    /// reaches this constructor.
    pub fn new(bits: &[bool], block_size: Option<usize>) -> Self {
        let samples = match block_size {
            Some(stride) => {
                debug_assert!(stride > 0, "block size must be non-zero");
                let mut samples = Vec::with_capacity(bits.len() / stride + 2);
                let mut running = 0usize;
                for (idx, &bit) in bits.iter().enumerate() {
                    if idx % stride == 0 {
                        samples.push(running);
                    }
                    running += usize::from(bit);
                }
                // Sentinel sample at (or clamped to) the end of the vector.
                while samples.len() <= (bits.len() + stride - 1) / stride {
                    samples.push(running);
                }
                samples
            }
            None => Vec::new(),
        };

        Self {
            bits: BitPack::from_bits(bits),
            block_size,
            samples,
        }
    }

    /// Number of bits in the vector.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` when the vector holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at position `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        self.bits.get(idx)
    }

    /// Number of 1-bits in the prefix `[0, pos)`. `pos` may equal the length,
    /// in which case the total population count is returned.
    pub fn rank1(&self, pos: usize) -> usize {
        debug_assert!(pos <= self.len(), "rank position {pos} exceeds {}", self.len());
        match self.block_size {
            Some(stride) => {
                let boundary = pos - pos % stride;
                self.samples[boundary / stride] + self.bits.count_ones(boundary, pos)
            }
            None => self.bits.count_ones(0, pos),
        }
    }

    /// Number of 0-bits in the prefix `[0, pos)`.
    pub fn rank0(&self, pos: usize) -> usize {
        pos - self.rank1(pos)
    }
}
