//! Pure shape predicates for tailored content. No network, no store access —
//! the retry driver in `fetcher` composes these.

/// Bullet budget per experience summary.
pub const MAX_BULLETS_PER_EXPERIENCE: usize = 5;

/// Required hard-skill keyword count.
pub const HARD_SKILL_COUNT: usize = 5;

/// Counts paragraph-wrapped bullet fragments (`<p>…</p>` with non-empty
/// inner text) in an experience summary. Unclosed paragraphs and empty
/// `<p></p>` placeholders do not count.
pub fn count_bullet_fragments(summary: &str) -> usize {
    let mut count = 0;
    let mut rest = summary;
    while let Some(start) = rest.find("<p>") {
        let after = &rest[start + 3..];
        match after.find("</p>") {
            Some(end) => {
                if !after[..end].trim().is_empty() {
                    count += 1;
                }
                rest = &after[end + 4..];
            }
            None => break,
        }
    }
    count
}

/// A skill label usable as a hard-skill keyword: non-empty after trimming,
/// with no internal whitespace.
pub fn is_single_token(label: &str) -> bool {
    let trimmed = label.trim();
    !trimmed.is_empty() && !trimmed.chars().any(char::is_whitespace)
}

/// Checks a hard-skill keyword list: exactly 5 entries, each a single token.
/// Returns a description of the first violation, or `None` when valid.
pub fn hard_skill_violation(keywords: &[String]) -> Option<String> {
    if keywords.len() != HARD_SKILL_COUNT {
        return Some(format!(
            "expected exactly {HARD_SKILL_COUNT} hard skills, got {}",
            keywords.len()
        ));
    }
    keywords
        .iter()
        .find(|k| !is_single_token(k))
        .map(|k| format!("hard skill '{k}' is not a single token"))
}
