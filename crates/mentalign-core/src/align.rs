//! # Offset Alignment
//!
//! Maps character-offset annotations onto token spans of the sentences
//! produced by a [`Tokenizer`](crate::tokenizer::Tokenizer).
//!
//! Offsets from the annotation files and boundaries from the tokenizer are
//! produced independently and disagree at the margins (hyphens, brackets,
//! multi-word terms). Alignment is therefore best-effort and never fails:
//! an annotation that falls outside every sentence is dropped, and a span
//! whose tokens do not reproduce the gold text is kept as is. Use
//! [`quality`](crate::quality) to measure how well a corpus aligned.

use crate::types::{Annotation, Sentence, Tag};

/// Aligns `annotations` against `sentences`.
///
/// Returns one tag list per sentence, positionally matching `sentences`.
///
/// # Examples
/// ```
/// use mentalign_core::align::align;
/// use mentalign_core::types::{Annotation, Region, Sentence};
///
/// let sentences = vec![
///     Sentence::from_pairs([("BRCA1", 0), ("mutation", 6), (".", 14)]).unwrap(),
/// ];
/// let annotations = vec![Annotation {
///     region: Region::Title,
///     start: 0,
///     end: 5,
///     text: "BRCA1".into(),
///     mention_type: "Gene".into(),
///     concept_id: String::new(),
/// }];
///
/// let tags = align(&annotations, &sentences);
/// assert_eq!(tags[0][0].span, (0, 1));
/// ```
pub fn align(annotations: &[Annotation], sentences: &[Sentence]) -> Vec<Vec<Tag>> {
    let mut tags: Vec<Vec<Tag>> = vec![Vec::new(); sentences.len()];
    let boundaries = sentence_boundaries(sentences);

    for annotation in annotations {
        let Some(position) = find_sentence(&boundaries, sentences, annotation.start) else {
            continue;
        };
        let span = token_span(&sentences[position], annotation);
        tags[position].push(Tag::new(
            annotation.text.clone(),
            span,
            annotation.mention_type.clone(),
        ));
    }

    tags
}

/// `(first token offset, sentence position)` sorted by offset.
fn sentence_boundaries(sentences: &[Sentence]) -> Vec<(usize, usize)> {
    let mut boundaries: Vec<(usize, usize)> = sentences
        .iter()
        .enumerate()
        .filter_map(|(position, sentence)| sentence.first_offset().map(|off| (off, position)))
        .collect();
    boundaries.sort_by_key(|&(offset, _)| offset);
    boundaries
}

/// First sentence, in boundary order, whose range `[first, last + 1]`
/// contains `start`. No backtracking: a later sentence that would fit the
/// whole mention better is never considered.
fn find_sentence(
    boundaries: &[(usize, usize)],
    sentences: &[Sentence],
    start: usize,
) -> Option<usize> {
    boundaries.iter().find_map(|&(start_off, position)| {
        let end_off = sentences[position].last_offset()? + 1;
        (start_off <= start && start <= end_off).then_some(position)
    })
}

/// Token span of `annotation` within `sentence`.
///
/// The span end is measured from `annotation.start` plus the length of
/// the mention text rather than the recorded end offset.
pub fn token_span(sentence: &Sentence, annotation: &Annotation) -> (usize, usize) {
    let offsets = sentence.token_offsets();
    let len = offsets.len();
    let start = annotation.start;
    let span_end = start + annotation.char_len();

    // Falls back to the last token when no interior token brackets `start`.
    let token_start = offsets
        .windows(2)
        .position(|w| w[0] <= start && start < w[1])
        .unwrap_or(len.saturating_sub(1));

    let mut token_end = len;
    for (j, &offset) in offsets.iter().enumerate().skip(token_start) {
        if span_end > offset {
            token_end = j + 1;
        } else {
            break;
        }
    }

    (token_start, token_end)
}
