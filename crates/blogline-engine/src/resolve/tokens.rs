use crate::models::MARKER;

/// A piece of an entry body, as seen by the reference resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Token(Token<'a>),
}

/// A marked phrase such as `Some Phrase**`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The full matched span, phrase and markers.
    pub text: &'a str,
    /// The words before the markers.
    pub phrase: &'a str,
    pub markers: usize,
}

/// Splits a body into plain text and marked tokens.
///
/// A token is the longest run of words (non-whitespace, non-marker
/// characters) joined by single spaces that ends right before a run of
/// markers. Markers with no word in front of them stay plain text.
pub fn tokenize(body: &str) -> Vec<Segment<'_>> {
    let bytes = body.as_bytes();
    let mut out = vec![];
    let mut text_start = 0;
    let mut i = 0;

    // The marker is ASCII, so byte positions of marker runs are always
    // char boundaries.
    while i < bytes.len() {
        if bytes[i] != MARKER as u8 {
            i += 1;
            continue;
        }

        let run_start = i;
        while i < bytes.len() && bytes[i] == MARKER as u8 {
            i += 1;
        }

        let phrase_start = phrase_start(body, text_start, run_start);
        if phrase_start == run_start {
            continue;
        }

        if phrase_start > text_start {
            out.push(Segment::Text(&body[text_start..phrase_start]));
        }
        out.push(Segment::Token(Token {
            text: &body[phrase_start..i],
            phrase: &body[phrase_start..run_start],
            markers: i - run_start,
        }));
        text_start = i;
    }

    if text_start < body.len() {
        out.push(Segment::Text(&body[text_start..]));
    }
    out
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && c != MARKER
}

/// Walks back from `end` over words separated by single spaces, never
/// crossing `floor`. Returns `end` when no word precedes it.
fn phrase_start(body: &str, floor: usize, end: usize) -> usize {
    let mut chars = body[floor..end].char_indices().rev().peekable();
    let mut start = end;

    loop {
        let mut found_word = false;
        while let Some(&(idx, c)) = chars.peek() {
            if !is_word_char(c) {
                break;
            }
            start = floor + idx;
            found_word = true;
            chars.next();
        }

        if !found_word {
            break;
        }

        match (chars.next(), chars.peek()) {
            (Some((_, ' ')), Some(&(_, c))) if is_word_char(c) => continue,
            _ => break,
        }
    }

    start
}
