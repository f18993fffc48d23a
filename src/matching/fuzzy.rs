//! Jaro and Jaro-Winkler string similarity.
//!
//! Computed over Unicode scalar values so accented input that slipped past
//! normalization still lines up character by character.
//!
//! CHANGELOG:
//! - 10/15/2026 - Local implementation replaces the strsim call (strsim kept as test oracle)
//! - 10/14/2026 - Initial stub

/// Winkler prefix scaling factor.
pub const PREFIX_SCALE: f64 = 0.1;

/// Longest common prefix that earns the Winkler boost.
pub const MAX_PREFIX: usize = 4;

/// Jaro similarity (0.0 - 1.0).
///
/// Either side empty scores 0.0; identical non-empty strings score exactly 1.0.
pub fn jaro(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    jaro_chars(&a, &b)
}

fn jaro_chars(a: &[char], b: &[char]) -> f64 {
    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ch) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b.len());
        for j in start..end {
            if b_matched[j] || b[j] != *ch {
                continue;
            }
            a_matched[i] = true;
            b_matched[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Matched characters of `a` and `b` compared pairwise in match order.
    let a_seq = a.iter().zip(&a_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let b_seq = b.iter().zip(&b_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let transpositions = a_seq.zip(b_seq).filter(|(x, y)| x != y).count();

    let m = matches as f64;
    let t = transpositions as f64 / 2.0;
    (m / a.len() as f64 + m / b.len() as f64 + (m - t) / m) / 3.0
}

/// Jaro-Winkler similarity (0.0 - 1.0).
///
/// Jaro plus a bonus of `PREFIX_SCALE * (1 - jaro)` for each leading
/// character the two strings share, up to `MAX_PREFIX`.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let sim = jaro_chars(&a, &b);

    let prefix = a
        .iter()
        .zip(&b)
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    (sim + prefix as f64 * PREFIX_SCALE * (1.0 - sim)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_strings() {
        assert_eq!(jaro_winkler("juan", "juan"), 1.0);
        assert_eq!(jaro("maria jose", "maria jose"), 1.0);
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(jaro_winkler("juan", ""), 0.0);
        assert_eq!(jaro_winkler("", "juan"), 0.0);
        assert_eq!(jaro_winkler("", ""), 0.0);
        assert_eq!(jaro("", "x"), 0.0);
    }

    #[test]
    fn test_completely_different() {
        assert_eq!(jaro_winkler("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_single_characters() {
        // Window floors at zero: only the aligned position can match.
        assert_eq!(jaro_winkler("a", "b"), 0.0);
        assert!(close(jaro("ab", "ba"), 0.0));
        assert_eq!(jaro_winkler("a", "a"), 1.0);
    }

    #[test]
    fn test_classic_pairs() {
        // MARTHA/MARHTA: 6 matches, 2 out-of-order characters.
        assert!(close(jaro("martha", "marhta"), 17.0 / 18.0));
        assert!(close(jaro_winkler("martha", "marhta"), 0.9611111111111111));
        // DWAYNE/DUANE: 4 matches, no transpositions.
        assert!(close(jaro("dwayne", "duane"), (4.0 / 6.0 + 4.0 / 5.0 + 1.0) / 3.0));
    }

    #[test]
    fn test_odd_transpositions_use_half_counts() {
        // Three matched characters out of order: t = 3 / 2, not 1.
        assert!(close(jaro("abcxyz", "bcaxyz"), 11.0 / 12.0));
    }

    #[test]
    fn test_common_name_variations() {
        assert!(jaro_winkler("garcia", "garsia") > 0.9);
        assert!(jaro_winkler("gonzalez", "gonzales") > 0.9);
        assert!(jaro_winkler("martinez", "martines") > 0.9);
    }

    #[test]
    fn test_prefix_boost_is_capped() {
        let jaro_only = jaro("abcdefgh", "abcdefgx");
        let boosted = jaro_winkler("abcdefgh", "abcdefgx");
        assert!(close(boosted, jaro_only + 4.0 * PREFIX_SCALE * (1.0 - jaro_only)));
    }

    #[test]
    fn test_symmetric() {
        for (a, b) in [("juan garcia", "juana garcia"), ("pedro", "petra"), ("ana", "anabel")] {
            assert!(close(jaro_winkler(a, b), jaro_winkler(b, a)));
        }
    }

    #[test]
    fn test_matches_strsim_oracle() {
        // Pairs with an even transposition count and Jaro above 0.7, where the
        // reference crate's integer halving and boost cutoff agree with ours.
        let pairs = [
            ("martha", "marhta"),
            ("dwayne", "duane"),
            ("dixon", "dicksonx"),
            ("juan garcia", "juan garsia"),
            ("gonzalez", "gonzales"),
            ("rodriguez", "rodrigues"),
            ("fernandez", "fernandes"),
        ];
        for (a, b) in pairs {
            let ours = jaro_winkler(a, b);
            let oracle = strsim::jaro_winkler(a, b);
            assert!(close(ours, oracle), "{} / {}: {} vs {}", a, b, ours, oracle);
        }
    }

    #[test]
    fn test_unicode_counts_chars_not_bytes() {
        assert!(close(jaro("núñez", "nuñez"), jaro("nxnez", "nunez")));
    }
}
