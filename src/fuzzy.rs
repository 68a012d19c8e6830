//! Fuzzy string matching over a fixed vocabulary.
//!
//! Spoken phrases arrive with transcription errors ("weakly" for
//! "weekly"), so vocabulary lookups use a Levenshtein similarity ratio
//! instead of exact comparison.

/// Levenshtein edit distance between two strings, by characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp = vec![vec![0; b.len() + 1]; a.len() + 1];

    for i in 0..=a.len() {
        dp[i][0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }
    dp[a.len()][b.len()]
}

/// Similarity ratio in [0, 1]: 1.0 for identical strings, 0.0 for
/// completely different ones. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Best vocabulary entry for `candidate`, or `None` when nothing clears
/// `threshold`. Ties break toward the earlier vocabulary entry.
pub fn best_match<'a>(candidate: &str, vocabulary: &[&'a str], threshold: f64) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;
    for word in vocabulary {
        let score = similarity(candidate, word);
        if score >= threshold && best.map_or(true, |(_, s)| score > s) {
            best = Some((word, score));
        }
    }
    best.map(|(word, _)| word)
}
