//! Wavelet tree over a small-alphabet symbol sequence.

use thiserror::Error;

use crate::rank_vector::RankBitVector;

/// Errors raised by wavelet tree queries.
#[derive(Debug, Error)]
pub enum WaveletError {
    /// A rank or access position fell outside the represented sequence.
    #[error("position {position} out of range, node holds {len} positions")]
    PositionOutOfRange {
        /// Position that was requested.
        position: usize,
        /// Number of positions the node represents.
        len: usize,
    },

    /// A symbol index fell outside the alphabet range.
    #[error("symbol index {index} outside the alphabet of {size} symbols")]
    SymbolOutOfRange {
        /// Symbol index that was requested.
        index: u8,
        /// Alphabet size the tree was built for.
        size: usize,
    },
}

/// A node of the wavelet tree.
///
/// Internal nodes cover a symbol-index range `[lo, hi)` with `hi − lo ≥ 2` and
/// carry one bit per represented position: 0 routes the position to the left
/// half of the range, 1 to the right. Leaves cover a single symbol and carry
/// no bits.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum WaveletNode {
    /// Node partitioning `[lo, hi)` at its midpoint.
    Internal {
        /// Inclusive lower bound of the covered symbol-index range.
        lo: usize,
        /// Exclusive upper bound of the covered symbol-index range.
        hi: usize,
        /// Routing bits, one per position represented by this node.
        bits: RankBitVector,
        /// Subtree for `[lo, mid)`.
        left: Box<WaveletNode>,
        /// Subtree for `[mid, hi)`.
        right: Box<WaveletNode>,
    },
    /// Terminal node covering a single symbol index.
    Leaf {
        /// Inclusive lower bound (the symbol index itself).
        lo: usize,
        /// Exclusive upper bound.
        hi: usize,
    },
}

impl WaveletNode {
    fn rank(&self, symbol: usize, position: usize) -> Result<usize, WaveletError> {
        match self {
            WaveletNode::Leaf { .. } => Ok(position),
            WaveletNode::Internal {
                lo,
                hi,
                bits,
                left,
                right,
            } => {
                if position > bits.len() {
                    return Err(WaveletError::PositionOutOfRange {
                        position,
                        len: bits.len(),
                    });
                }
                let mid = midpoint(*lo, *hi);
                let ones = bits.rank1(position);
                let zeros = position - ones;
                if symbol < mid {
                    left.rank(symbol, zeros)
                } else {
                    right.rank(symbol, ones)
                }
            }
        }
    }

    fn access(&self, position: usize) -> usize {
        match self {
            WaveletNode::Leaf { lo, .. } => *lo,
            WaveletNode::Internal {
                bits, left, right, ..
            } => {
                if bits.get(position) {
                    right.access(bits.rank1(position))
                } else {
                    left.access(bits.rank0(position))
                }
            }
        }
    }
}

/// Balanced binary partitioning of an alphabet-indexed sequence into per-level
/// bit vectors.
///
/// `rank(c, i)` descends one level per query step, converting a position in
/// the parent sequence into a position among the positions routed to the same
/// half, so the whole query costs O(log σ) binary ranks.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WaveletTree {
    root: WaveletNode,
    len: usize,
    alphabet_size: usize,
}

impl WaveletTree {
    /// Build a tree over `symbols`, each an alphabet index in
    /// `[0, alphabet_size)`. `block_size` configures rank sampling of every
    /// bit vector in the tree.
    pub fn build(symbols: &[u8], alphabet_size: usize, block_size: Option<usize>) -> Self {
        debug_assert!(alphabet_size >= 2);
        debug_assert!(symbols.iter().all(|&s| (s as usize) < alphabet_size));
        Self {
            root: build_node(symbols.to_vec(), 0, alphabet_size, block_size),
            len: symbols.len(),
            alphabet_size,
        }
    }

    /// Number of positions represented.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the tree represents an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alphabet size the tree was built for.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Number of occurrences of `symbol` in the first `position` entries of
    /// the represented sequence. `position` may equal the sequence length.
    pub fn rank(&self, symbol: u8, position: usize) -> Result<usize, WaveletError> {
        if (symbol as usize) >= self.alphabet_size {
            return Err(WaveletError::SymbolOutOfRange {
                index: symbol,
                size: self.alphabet_size,
            });
        }
        self.root.rank(symbol as usize, position)
    }

    /// Symbol stored at `position`, recovered by descending the routing bits.
    pub fn access(&self, position: usize) -> Result<u8, WaveletError> {
        if position >= self.len {
            return Err(WaveletError::PositionOutOfRange {
                position,
                len: self.len,
            });
        }
        Ok(self.root.access(position) as u8)
    }
}

/// Midpoint used for range partitioning: `lo + ⌈(hi − lo)/2⌉`.
fn midpoint(lo: usize, hi: usize) -> usize {
    lo + (hi - lo + 1) / 2
}

fn build_node(
    symbols: Vec<u8>,
    lo: usize,
    hi: usize,
    block_size: Option<usize>,
) -> WaveletNode {
    if hi - lo <= 1 {
        return WaveletNode::Leaf { lo, hi };
    }

    let mid = midpoint(lo, hi);
    let mut bits = Vec::with_capacity(symbols.len());
    let mut left_symbols = Vec::new();
    let mut right_symbols = Vec::new();
    for &symbol in &symbols {
        let goes_right = (symbol as usize) >= mid;
        bits.push(goes_right);
        if goes_right {
            right_symbols.push(symbol);
        } else {
            left_symbols.push(symbol);
        }
    }

    WaveletNode::Internal {
        lo,
        hi,
        bits: RankBitVector::new(&bits, block_size),
        left: Box::new(build_node(left_symbols, lo, mid, block_size)),
        right: Box::new(build_node(right_symbols, mid, hi, block_size)),
    }
}
