//! Length-bounded chunking with a sliding overlap window.
//!
//! Page text is first split into units by trying separators from coarsest to
//! finest: paragraph breaks, line breaks, sentence ends, then spaces. A piece
//! is only split further while it exceeds the chunk budget, so cuts land on
//! the largest boundary available. Units keep their trailing separator, which
//! makes chunks exact substrings of the page text and keeps separator
//! characters counted against the budget. Units are then packed into chunks
//! of at most `chunk_size` characters; when a chunk closes, the trailing
//! units totaling up to `overlap` characters carry over into the next chunk,
//! so consecutive chunks share the configured overlap without ever exceeding
//! the budget. A single word longer than the budget passes through unchanged
//! as its own chunk.

use std::collections::VecDeque;

use crate::pdf::PageRecord;

use super::types::{ChunkingError, TextCard};

/// Separator layers tried from coarsest to finest.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

/// Split every page into overlapping chunks and flatten them into text cards.
///
/// `chunk_id` is the position within each page's chunk sequence and restarts
/// at 0 for every page.
pub fn build_text_cards(
    pages: &[PageRecord],
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<TextCard>, ChunkingError> {
    let mut cards = Vec::new();
    for page in pages {
        let chunks = chunk_text(&page.text, chunk_size, overlap)?;
        for (chunk_id, content) in chunks.into_iter().enumerate() {
            cards.push(TextCard {
                content,
                source: page.source.clone(),
                page: page.page,
                chunk_id,
            });
        }
    }
    tracing::info!(cards = cards.len(), "Created text cards");
    Ok(cards)
}

/// Chunk text into overlapping segments of at most `chunk_size` characters.
///
/// Returns an empty vector when the input text is all whitespace. An overlap
/// equal to or larger than the chunk size is capped at `chunk_size - 1`.
pub(crate) fn chunk_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let effective_overlap = overlap.min(chunk_size - 1);
    let mut units = Vec::new();
    collect_units(text, chunk_size, 0, &mut units);
    Ok(pack_units(&units, chunk_size, effective_overlap))
}

/// Split `piece` into units no longer than `budget` wherever a separator
/// allows it, descending to finer separators only for oversized pieces.
///
/// A piece with no separators left stays whole even when it exceeds the
/// budget; that is the unsplittable-token pass-through.
fn collect_units<'a>(piece: &'a str, budget: usize, level: usize, units: &mut Vec<&'a str>) {
    if piece.is_empty() {
        return;
    }
    if piece.chars().count() <= budget || level == SEPARATORS.len() {
        units.push(piece);
        return;
    }
    let separator = SEPARATORS[level];
    if !piece.contains(separator) {
        collect_units(piece, budget, level + 1, units);
        return;
    }
    for part in piece.split_inclusive(separator) {
        if part.chars().count() <= budget {
            units.push(part);
        } else {
            collect_units(part, budget, level + 1, units);
        }
    }
}

/// Pack units into chunks of at most `chunk_size` characters, stepping each
/// new chunk back over the trailing units of the previous one so that up to
/// `overlap` characters are shared across the boundary.
fn pack_units(units: &[&str], chunk_size: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: VecDeque<(&str, usize)> = VecDeque::new();
    let mut window_len = 0usize;
    // Whether the window holds content not yet emitted in a chunk.
    let mut fresh = false;

    for &unit in units {
        let unit_len = unit.chars().count();
        if !window.is_empty() && window_len + unit_len > chunk_size {
            if fresh {
                push_window(&mut chunks, &window);
                fresh = false;
            }
            while let Some(&(_, front_len)) = window.front() {
                if window_len <= overlap && window_len + unit_len <= chunk_size {
                    break;
                }
                window_len -= front_len;
                window.pop_front();
            }
        }
        window.push_back((unit, unit_len));
        window_len += unit_len;
        if !unit.trim().is_empty() {
            fresh = true;
        }
    }
    if fresh {
        push_window(&mut chunks, &window);
    }

    chunks
}

fn push_window(chunks: &mut Vec<String>, window: &VecDeque<(&str, usize)>) {
    let chunk: String = window.iter().map(|(unit, _)| *unit).collect();
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A stream of distinct words, so shared text across a chunk boundary can
    /// only come from the overlap carry.
    fn varied_text(words: usize) -> String {
        (0..words)
            .map(|i| format!("term{i:03}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Longest suffix of `previous` that is also a prefix of `current`.
    fn shared_boundary_chars(previous: &str, current: &str) -> usize {
        let prev: Vec<char> = previous.chars().collect();
        let cur: Vec<char> = current.chars().collect();
        let max = prev.len().min(cur.len());
        (0..=max)
            .rev()
            .find(|&len| prev[prev.len() - len..] == cur[..len])
            .unwrap_or(0)
    }

    #[test]
    fn chunks_respect_the_character_budget() {
        let text = "one two three four five";
        let chunks = chunk_text(text, 9, 0).expect("chunking succeeds");
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 9, "oversized chunk: {chunk:?}");
        }
    }

    #[test]
    fn chunk_words_cover_the_original_text() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let chunks = chunk_text(text, 12, 0).expect("chunking succeeds");
        let chunk_words: Vec<&str> = chunks
            .iter()
            .flat_map(|chunk| chunk.split_whitespace())
            .collect();
        let original_words: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(chunk_words, original_words);
    }

    #[test]
    fn dense_pages_keep_chunks_within_budget() {
        // No word here exceeds the budget, so no chunk may either.
        let text = varied_text(300);
        let chunks = chunk_text(&text, 1000, 200).expect("chunking succeeds");
        assert!(chunks.len() > 1);
        for (index, chunk) in chunks.iter().enumerate() {
            let len = chunk.chars().count();
            assert!(len <= 1000, "chunk {index} is {len} chars");
        }
    }

    #[test]
    fn consecutive_chunks_share_the_configured_overlap() {
        let text = varied_text(300);
        let chunks = chunk_text(&text, 1000, 200).expect("chunking succeeds");
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let shared = shared_boundary_chars(&pair[0], &pair[1]);
            // Up to one word plus trimmed whitespace short of the target.
            assert!(
                (150..=200).contains(&shared),
                "boundary shares {shared} chars"
            );
        }
    }

    #[test]
    fn page_spanning_multiple_budgets_yields_three_chunks() {
        let text = "clinical handbook oxford medicine ".repeat(74);
        let chunks = chunk_text(&text, 1000, 200).expect("chunking succeeds");
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000);
        }
    }

    #[test]
    fn cuts_prefer_sentence_boundaries() {
        let text = "First sentence here. Second sentence here. Third.";
        let chunks = chunk_text(text, 25, 0).expect("chunking succeeds");
        assert_eq!(chunks[0], "First sentence here.");
    }

    #[test]
    fn whitespace_only_input_yields_no_chunks() {
        let chunks = chunk_text("   \n\t  ", 100, 20).expect("chunking succeeds");
        assert!(chunks.is_empty());
    }

    #[test]
    fn oversized_single_token_passes_through() {
        let token = "x".repeat(40);
        let chunks = chunk_text(&token, 10, 0).expect("chunking succeeds");
        assert_eq!(chunks, vec![token]);
    }

    #[test]
    fn overlap_is_capped_below_the_chunk_size() {
        let text = "alpha beta gamma delta epsilon zeta";
        let chunks = chunk_text(text, 10, 50).expect("chunking succeeds");
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10);
        }
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let error = chunk_text("hello", 0, 0).unwrap_err();
        assert!(matches!(error, ChunkingError::InvalidChunkSize));
    }

    #[test]
    fn chunk_ids_restart_per_page() {
        let pages = vec![
            PageRecord {
                text: "alpha beta gamma delta epsilon zeta".into(),
                source: "Test".into(),
                page: 1,
            },
            PageRecord {
                text: "eta theta iota kappa lambda mu".into(),
                source: "Test".into(),
                page: 2,
            },
        ];
        let cards = build_text_cards(&pages, 12, 0).expect("cards built");
        assert!(cards.len() >= 4);

        for page in [1u32, 2] {
            let ids: Vec<usize> = cards
                .iter()
                .filter(|card| card.page == page)
                .map(|card| card.chunk_id)
                .collect();
            let expected: Vec<usize> = (0..ids.len()).collect();
            assert_eq!(ids, expected, "chunk ids on page {page} restart at zero");
        }
    }
}
