/// Sentence boundary scanning.
///
/// A sentence runs through its terminator run (`.`, `!`, `?`, or a
/// newline) and any trailing whitespace, so consecutive sentence spans
/// tile the text exactly with no gaps.

#[derive(Clone, Copy, PartialEq)]
enum State {
    /// Inside sentence body.
    Body,
    /// Inside a `.`/`!`/`?` run; needs whitespace to confirm a boundary
    /// (so "3.14" stays one sentence).
    Terminator,
    /// Consuming trailing whitespace; the next non-whitespace char starts
    /// a new sentence.
    Trailing,
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// The sentence starting at byte `pos`: its end byte offset (exclusive)
/// and its length in chars. `pos` must be a char boundary strictly before
/// `text.len()`.
pub(crate) fn sentence_end(text: &str, pos: usize) -> (usize, usize) {
    let mut state = State::Body;
    let mut chars = 0usize;

    for (i, c) in text[pos..].char_indices() {
        match state {
            State::Body => {
                if c == '\n' {
                    state = State::Trailing;
                } else if is_terminator(c) {
                    state = State::Terminator;
                }
            }
            State::Terminator => {
                if c.is_whitespace() {
                    state = State::Trailing;
                } else if !is_terminator(c) {
                    state = State::Body;
                }
            }
            State::Trailing => {
                if !c.is_whitespace() {
                    return (pos + i, chars);
                }
            }
        }
        chars += 1;
    }

    (text.len(), chars)
}
