use std::collections::HashSet;

/// Two adjacent characters taken from a string.
///
/// Characters are Unicode scalar values, so template texts and probe texts
/// are always split the same way regardless of how they were encoded on disk.
pub type Bigram = (char, char);

/// Collect the distinct bigrams of `s` using a sliding window of one character.
///
/// Strings shorter than two characters have no bigrams.
pub fn bigrams(s: &str) -> HashSet<Bigram> {
    s.chars().zip(s.chars().skip(1)).collect()
}

/// Dice coefficient of two bigram sets: `2 * |a ∩ b| / (|a| + |b|)`.
///
/// Returns `0.0` when both sets are empty instead of dividing by zero.
pub fn dice_coefficient(a: &HashSet<Bigram>, b: &HashSet<Bigram>) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }

    // Walk the smaller set and probe the larger one.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let shared = small.iter().filter(|bg| large.contains(bg)).count();

    (2 * shared) as f64 / total as f64
}
