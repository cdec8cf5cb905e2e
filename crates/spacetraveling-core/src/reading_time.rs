//! Read-time estimation.

use crate::content::Section;

/// Assumed reading speed.
pub const WORDS_PER_MINUTE: usize = 200;

/// Number of whitespace-separated words in `text`.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated reading time in whole minutes, rounded up.
///
/// Counts the words of every heading and every paragraph. Content without
/// any words yields 0.
#[must_use]
pub fn estimate(sections: &[Section]) -> u32 {
    let words: usize = sections
        .iter()
        .map(|section| {
            word_count(&section.heading)
                + section
                    .paragraphs
                    .iter()
                    .map(|paragraph| word_count(paragraph))
                    .sum::<usize>()
        })
        .sum();

    u32::try_from(words.div_ceil(WORDS_PER_MINUTE)).unwrap_or(u32::MAX)
}
