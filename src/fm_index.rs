//! FM-index: backward search over the BWT for substring counting.

use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::alphabet::{Alphabet, AlphabetError};
use crate::suffix::suffix_array;
use crate::wavelet::{WaveletError, WaveletTree};

/// Errors raised while building an index.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The alphabet failed validation.
    #[error("invalid alphabet: {0}")]
    Alphabet(#[from] AlphabetError),

    /// A configured rank-sampling block size of zero.
    #[error("block size must be greater than zero")]
    InvalidBlockSize,

    /// The text contained a byte that is not an alphabet symbol.
    #[error("symbol {symbol:?} at position {position} is not in the alphabet")]
    UnknownSymbol {
        /// Offending byte.
        symbol: char,
        /// Position within the text.
        position: usize,
    },

    /// The text did not end with the sentinel symbol.
    #[error("text must end with the sentinel {sentinel:?}")]
    MissingSentinel {
        /// The expected sentinel.
        sentinel: char,
    },

    /// The sentinel occurred before the final position.
    #[error("sentinel {sentinel:?} may only appear as the final symbol, found one at position {position}")]
    InteriorSentinel {
        /// The sentinel symbol.
        sentinel: char,
        /// Position of the premature occurrence.
        position: usize,
    },

    /// The suffix-array construction violated its contract.
    #[error("suffix array construction failed: {0}")]
    SuffixArray(String),
}

/// Errors raised by count and rank queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The pattern contained a byte that is not an alphabet symbol.
    #[error("symbol {symbol:?} at offset {offset} of the pattern is not in the alphabet")]
    UnknownSymbol {
        /// Offending byte.
        symbol: char,
        /// Offset within the pattern.
        offset: usize,
    },

    /// A diagnostic rank query was malformed.
    #[error(transparent)]
    Wavelet(#[from] WaveletError),
}

/// Index construction options.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Stride λ for bit-vector rank sampling. `None` disables sampling and
    /// every rank query scans its full prefix. Typical values are log₂ n,
    /// (log₂ n)², or a small constant such as 100.
    pub block_size: Option<usize>,
}

/// Succinct self-index answering exact substring-count queries.
///
/// Holds a wavelet tree over the Burrows–Wheeler transform of the text plus
/// the cumulative-count table used by LF-mapping. The suffix array exists only
/// transiently during construction. After construction the index is immutable
/// and can be shared freely across threads.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FmIndex {
    alphabet: Alphabet,
    tree: WaveletTree,
    c_table: Vec<usize>,
    len: usize,
}

impl FmIndex {
    /// Build an index over `text`, which must consist of `symbols` bytes and
    /// end with exactly one occurrence of the sentinel (the first symbol of
    /// the alphabet).
    pub fn build(
        text: &[u8],
        symbols: &[u8],
        options: &IndexOptions,
    ) -> Result<Self, BuildError> {
        let alphabet = Alphabet::new(symbols)?;
        if options.block_size == Some(0) {
            return Err(BuildError::InvalidBlockSize);
        }

        let sentinel = alphabet.sentinel();
        match text.last() {
            Some(&byte) if byte == sentinel => {}
            _ => {
                return Err(BuildError::MissingSentinel {
                    sentinel: sentinel as char,
                })
            }
        }

        let mut encoded = Vec::with_capacity(text.len());
        let mut frequencies = vec![0usize; alphabet.len()];
        for (position, &byte) in text.iter().enumerate() {
            if byte == sentinel && position + 1 != text.len() {
                return Err(BuildError::InteriorSentinel {
                    sentinel: sentinel as char,
                    position,
                });
            }
            let index = alphabet
                .index_of(byte)
                .ok_or_else(|| BuildError::UnknownSymbol {
                    symbol: byte as char,
                    position,
                })?;
            frequencies[index as usize] += 1;
            encoded.push(index);
        }

        let started = Instant::now();
        let sa = suffix_array(&encoded);
        debug!(elapsed = ?started.elapsed(), length = encoded.len(), "suffix array constructed");

        // The sentinel terminates the text and sorts first, so the first
        // sorted suffix must be the sentinel suffix.
        if sa.len() != encoded.len() || sa.first() != Some(&(encoded.len() - 1)) {
            return Err(BuildError::SuffixArray(
                "output is not a sentinel-anchored permutation".to_string(),
            ));
        }

        let started = Instant::now();
        let bwt = build_bwt(&encoded, &sa);
        let c_table = build_c_table(&frequencies);
        debug!(elapsed = ?started.elapsed(), "BWT and cumulative counts derived");

        let started = Instant::now();
        let tree = WaveletTree::build(&bwt, alphabet.len(), options.block_size);
        debug!(elapsed = ?started.elapsed(), "wavelet tree built");

        Ok(Self {
            alphabet,
            tree,
            c_table,
            len: encoded.len(),
        })
    }

    /// Length of the indexed text, sentinel included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the index covers an empty text. The sentinel
    /// requirement makes this impossible for successfully built indexes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The alphabet the index was built with.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Cumulative-count table: entry `c` is the number of text symbols whose
    /// index is strictly less than `c`, i.e. the first sorted-suffix row
    /// starting with symbol `c`.
    pub fn c_table(&self) -> &[usize] {
        &self.c_table
    }

    /// Number of occurrences of `pattern` in the indexed text.
    ///
    /// Backward search: the half-open row interval `[start, end)` is narrowed
    /// once per pattern symbol, from the last to the first, via LF-mapping.
    /// The empty pattern matches every position including the sentinel row,
    /// so it counts `len()` occurrences.
    pub fn count(&self, pattern: &[u8]) -> Result<u64, QueryError> {
        let mut start = 0usize;
        let mut end = self.len;

        for (offset, &byte) in pattern.iter().enumerate().rev() {
            let index = self
                .alphabet
                .index_of(byte)
                .ok_or_else(|| QueryError::UnknownSymbol {
                    symbol: byte as char,
                    offset,
                })?;

            let start_rank = self.tree.rank(index, start)?;
            let end_rank = self.tree.rank(index, end)?;
            if start_rank == end_rank {
                return Ok(0);
            }

            let skip = self.c_table[index as usize];
            start = skip + start_rank;
            end = skip + end_rank;
            debug_assert!(start <= end && end <= self.len);
        }

        Ok((end - start) as u64)
    }

    /// Diagnostic rank query: occurrences of the symbol with alphabet index
    /// `symbol_index` in the first `position` entries of the BWT.
    pub fn rank(&self, symbol_index: u8, position: usize) -> Result<u64, QueryError> {
        Ok(self.tree.rank(symbol_index, position)? as u64)
    }
}

/// Emit the BWT of the encoded text given its suffix array, using the cyclic
/// convention `T[−1] = T[n−1]`.
fn build_bwt(encoded: &[u8], sa: &[usize]) -> Vec<u8> {
    let n = encoded.len();
    let mut bwt = Vec::with_capacity(n);
    for &suffix in sa {
        let previous = if suffix == 0 { n - 1 } else { suffix - 1 };
        bwt.push(encoded[previous]);
    }
    bwt
}

/// Prefix sums of the per-symbol frequencies. Symbols absent from the text
/// contribute zero-width gaps, keeping the table non-decreasing with
/// `c_table[c + 1] − c_table[c]` equal to the frequency of symbol `c`.
fn build_c_table(frequencies: &[usize]) -> Vec<usize> {
    let mut c_table = Vec::with_capacity(frequencies.len());
    let mut total = 0usize;
    for &frequency in frequencies {
        c_table.push(total);
        total += frequency;
    }
    c_table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_index(block_size: Option<usize>) -> FmIndex {
        FmIndex::build(
            b"acaaba$",
            b"$abc",
            &IndexOptions { block_size },
        )
        .expect("index build should succeed")
    }

    #[test]
    fn builds_expected_c_table() {
        // "acaaba$" holds one $, four a, one b, one c.
        let index = small_index(None);
        assert_eq!(index.c_table(), &[0, 1, 5, 6]);
        assert_eq!(index.len(), 7);
    }

    #[test]
    fn bwt_follows_the_cyclic_convention() {
        // Sorted suffixes of "acaaba$": $, a$, aaba$, aba$, acaaba$, ba$,
        // caaba$, so the BWT reads the preceding characters "abca$aa".
        let encoded: Vec<u8> = b"acaaba$"
            .iter()
            .map(|&b| match b {
                b'$' => 0,
                b'a' => 1,
                b'b' => 2,
                _ => 3,
            })
            .collect();
        let sa = suffix_array(&encoded);
        assert_eq!(sa, vec![6, 5, 2, 3, 0, 4, 1]);
        assert_eq!(build_bwt(&encoded, &sa), vec![1, 2, 3, 1, 0, 1, 1]);
    }

    #[test]
    fn counts_patterns_in_the_worked_example() {
        let index = small_index(Some(2));
        assert_eq!(index.count(b"a").unwrap(), 4);
        assert_eq!(index.count(b"ab").unwrap(), 1);
        assert_eq!(index.count(b"aba").unwrap(), 1);
        assert_eq!(index.count(b"aa").unwrap(), 1);
        assert_eq!(index.count(b"ca").unwrap(), 1);
        assert_eq!(index.count(b"cab").unwrap(), 0);
        assert_eq!(index.count(b"bb").unwrap(), 0);
    }

    #[test]
    fn empty_pattern_counts_every_rotation() {
        let index = small_index(None);
        assert_eq!(index.count(b"").unwrap(), 7);
    }

    #[test]
    fn pattern_longer_than_text_counts_zero() {
        let index = small_index(Some(3));
        assert_eq!(index.count(b"acaabaacaaba").unwrap(), 0);
    }

    #[test]
    fn unknown_pattern_symbol_is_rejected() {
        let index = small_index(None);
        assert!(matches!(
            index.count(b"az"),
            Err(QueryError::UnknownSymbol { symbol: 'z', offset: 1 })
        ));
    }

    #[test]
    fn unknown_text_symbol_is_rejected() {
        let result = FmIndex::build(b"axa$", b"$abc", &IndexOptions::default());
        assert!(matches!(
            result,
            Err(BuildError::UnknownSymbol { symbol: 'x', position: 1 })
        ));
    }

    #[test]
    fn text_without_terminal_sentinel_is_rejected() {
        let result = FmIndex::build(b"acaaba", b"$abc", &IndexOptions::default());
        assert!(matches!(result, Err(BuildError::MissingSentinel { sentinel: '$' })));

        let empty = FmIndex::build(b"", b"$abc", &IndexOptions::default());
        assert!(matches!(empty, Err(BuildError::MissingSentinel { .. })));
    }

    #[test]
    fn interior_sentinel_is_rejected() {
        let result = FmIndex::build(b"ac$aba$", b"$abc", &IndexOptions::default());
        assert!(matches!(
            result,
            Err(BuildError::InteriorSentinel { sentinel: '$', position: 2 })
        ));
    }

    #[test]
    fn zero_block_size_is_rejected() {
        let result = FmIndex::build(
            b"acaaba$",
            b"$abc",
            &IndexOptions {
                block_size: Some(0),
            },
        );
        assert!(matches!(result, Err(BuildError::InvalidBlockSize)));
    }

    #[test]
    fn sentinel_only_text_builds() {
        let index = FmIndex::build(b"$", b"$a", &IndexOptions::default()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.count(b"").unwrap(), 1);
        assert_eq!(index.count(b"a").unwrap(), 0);
    }

    #[test]
    fn diagnostic_rank_walks_the_bwt() {
        // BWT of "acaaba$" is "abca$aa" (indices 1 2 3 1 0 1 1).
        let index = small_index(Some(2));
        let bwt = [1u8, 2, 3, 1, 0, 1, 1];
        for symbol in 0..4u8 {
            for position in 0..=bwt.len() {
                let naive = bwt[..position].iter().filter(|&&s| s == symbol).count() as u64;
                assert_eq!(
                    index.rank(symbol, position).unwrap(),
                    naive,
                    "symbol {symbol} position {position}"
                );
            }
        }
    }

    #[test]
    fn rank_rejects_positions_past_the_text() {
        let index = small_index(None);
        assert!(matches!(
            index.rank(1, 8),
            Err(QueryError::Wavelet(WaveletError::PositionOutOfRange { .. }))
        ));
    }

    #[test]
    fn rank_at_full_length_matches_symbol_frequencies() {
        let index = small_index(Some(4));
        let c = index.c_table();
        for symbol in 0..3u8 {
            let frequency = c[symbol as usize + 1] - c[symbol as usize];
            assert_eq!(index.rank(symbol, index.len()).unwrap(), frequency as u64);
        }
        // Last symbol's frequency is bounded by the text length instead.
        assert_eq!(
            index.rank(3, index.len()).unwrap(),
            (index.len() - c[3]) as u64
        );
    }

    #[test]
    fn count_is_pure() {
        let index = small_index(Some(2));
        let first = index.count(b"aba").unwrap();
        let second = index.count(b"aba").unwrap();
        assert_eq!(first, second);
    }
}
