//! Suffix array construction by prefix doubling.

/// Build the suffix array of `text`: a permutation of `[0, n)` listing the
/// starting positions of all suffixes in lexicographic order of the suffixes.
///
/// Uses prefix doubling: after round `k` the suffixes are ordered by their
/// first `2^k` symbols, and two ranks per position extend the comparison to
/// `2^(k+1)` symbols. Runs in O(n log² n) time and O(n) extra space, which is
/// comfortable for texts up to tens of millions of symbols.
///
/// When the final symbol of `text` is unique and smallest, entry 0 of the
/// result is `n − 1`; the index builder relies on that anchoring.
pub fn suffix_array(text: &[u8]) -> Vec<usize> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    // Rank 0 is reserved for "past the end of the text".
    let mut ranks: Vec<usize> = text.iter().map(|&byte| byte as usize + 1).collect();
    let mut next_ranks = vec![0usize; n];
    let mut step = 1;

    loop {
        let key = |suffix: usize| {
            (
                ranks[suffix],
                ranks.get(suffix + step).copied().unwrap_or(0),
            )
        };
        order.sort_unstable_by_key(|&suffix| key(suffix));

        next_ranks[order[0]] = 1;
        for pair in order.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            next_ranks[current] =
                next_ranks[previous] + usize::from(key(current) != key(previous));
        }
        std::mem::swap(&mut ranks, &mut next_ranks);

        if ranks[order[n - 1]] == n {
            break;
        }
        step *= 2;
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_suffix_array(text: &[u8]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..text.len()).collect();
        order.sort_by(|&lhs, &rhs| text[lhs..].cmp(&text[rhs..]));
        order
    }

    #[test]
    fn known_small_example() {
        // banana$ is the classic worked example.
        assert_eq!(suffix_array(b"banana$"), vec![6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn matches_naive_sort_on_assorted_texts() {
        let texts: &[&[u8]] = &[
            b"acaaba$",
            b"aaaaaaa$",
            b"abababab$",
            b"GATTACAGATTACA$",
            b"z$",
            b"$",
        ];
        for &text in texts {
            assert_eq!(
                suffix_array(text),
                naive_suffix_array(text),
                "text {:?}",
                String::from_utf8_lossy(text)
            );
        }
    }

    #[test]
    fn output_is_a_permutation() {
        let text = b"CCTGAGATTACGN$";
        let mut order = suffix_array(text);
        order.sort_unstable();
        let expected: Vec<usize> = (0..text.len()).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn sentinel_suffix_sorts_first() {
        let text = b"ACGTACGT$";
        assert_eq!(suffix_array(text)[0], text.len() - 1);
    }

    #[test]
    fn empty_text_yields_empty_array() {
        assert!(suffix_array(b"").is_empty());
    }
}
