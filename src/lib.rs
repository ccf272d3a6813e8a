//! # seqindex
//!
//! Succinct FM-index for exact substring counting over a static text drawn
//! from a small, ordered alphabet (the canonical use is DNA terminated by a
//! `$` sentinel).
//!
//! ## Pipeline
//!
//! 1. **Suffix array**: prefix-doubling sort of all suffixes
//! 2. **BWT + C table**: one pass over the sorted suffixes
//! 3. **Wavelet tree**: per-level bit partitioning of the BWT with
//!    block-sampled rank
//! 4. **Backward search**: counting in O(m log σ) rank queries
//!
//! The index is immutable after construction and safe to share across any
//! number of concurrent readers.
//!
//! ## Usage
//!
//! ```
//! use seqindex::{FmIndex, IndexOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = IndexOptions { block_size: Some(64) };
//! let index = FmIndex::build(b"acaaba$", b"$abc", &options)?;
//! assert_eq!(index.count(b"ab")?, 1);
//! assert_eq!(index.count(b"a")?, 4);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules - leaves first
pub mod alphabet; // Symbol ordering and byte ↔ index mapping
pub mod bit_pack; // Machine-word bit packing
pub mod fm_index; // Index construction and backward search
pub mod rank_vector; // Blocked rank over packed bits
pub mod suffix; // Suffix array construction
pub mod wavelet; // Wavelet tree over the BWT

// Re-exports for convenience
pub use alphabet::{Alphabet, AlphabetError};
pub use bit_pack::BitPack;
pub use fm_index::{BuildError, FmIndex, IndexOptions, QueryError};
pub use rank_vector::RankBitVector;
pub use suffix::suffix_array;
pub use wavelet::{WaveletError, WaveletTree};
