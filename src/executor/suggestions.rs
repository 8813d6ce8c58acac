//! "Did you mean" suggestions for mistyped application names.

use strsim::jaro_winkler;

/// Names scoring below this Jaro-Winkler similarity are never suggested.
pub const MIN_SIMILARITY: f64 = 0.8;

/// The known name closest to `input`, if any is close enough.
///
/// Ties keep the alphabetically first candidate when `known` is sorted.
pub fn suggest_application(input: &str, known: &[String]) -> Option<String> {
    let mut best: Option<(&String, f64)> = None;

    for candidate in known {
        let score = jaro_winkler(candidate, input);
        if score < MIN_SIMILARITY {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }

    best.map(|(name, _)| name.clone())
}
