//! Hamming-distance scorer over binary payloads.

use crate::index::DocumentMetadata;
use crate::result::IndexResult;
use crate::scoring::args::ScorerArgs;

/// Number of set bits of every byte value.
const BITS_IN_BYTE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < table.len() {
        table[i] = (i as u8).count_ones() as u8;
        i += 1;
    }
    table
};

fn bit_distance(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .map(|(x, y)| usize::from(BITS_IN_BYTE[usize::from(x ^ y)]))
        .sum()
}

/// Inverse Hamming distance between the query payload and the document
/// payload: `1 / (differing bits + 1)`.
///
/// Both payloads must be non-empty and of the same length, otherwise the
/// score is 0.
pub fn hamming_scorer(
    args: &mut ScorerArgs<'_>,
    _result: &IndexResult,
    dmd: &DocumentMetadata,
    _min_score: f64,
) -> f64 {
    let query = args.payload();
    let document = dmd.payload();

    if query.is_empty() || document.is_empty() || query.len() != document.len() {
        args.explain_root(None, || "Payloads provided to scorer vary in length".to_string());
        return 0.0;
    }

    let nbits = bit_distance(query, document);
    // +1 so identical payloads score a perfect 1
    let score = 1.0 / (nbits + 1) as f64;
    args.explain_root(None, || {
        format!(
            "String length is {}. Bit count is {nbits}. Result is (1 / count + 1) = {score:.2}",
            query.len()
        )
    });
    score
}
