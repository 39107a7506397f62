//! Text normalization for social-media style input
//!
//! Canonicalizes raw text into a whitespace-separated token stream:
//! mentions and links collapse to placeholder tokens, everything else is
//! lower-cased and stripped of emphasis spelling ("soooo" becomes "soo").

/// Token substituted for `@user` mentions
pub const USER_PLACEHOLDER: &str = "<user>";

/// Token substituted for `http://` and `https://` links
pub const URL_PLACEHOLDER: &str = "<url>";

/// Characters split away from words by [`separate_punctuation`]
pub const PUNCTUATION: [char; 4] = ['!', '.', ',', '?'];

/// Maximum length of a run of one repeated character
const MAX_REPEAT: usize = 2;

/// Normalize text for feature extraction.
///
/// Pure, total and idempotent: `normalize(&normalize(t)) == normalize(t)`.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(normalize_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_token(token: &str) -> String {
    // Prefixes are checked after rewriting so that e.g. "htttp://" cannot
    // turn into a link on a second pass.
    let rewritten = collapse_repeats(&token.to_lowercase());

    if rewritten.starts_with('@') {
        USER_PLACEHOLDER.to_string()
    } else if rewritten.starts_with("http://") || rewritten.starts_with("https://") {
        URL_PLACEHOLDER.to_string()
    } else {
        rewritten
    }
}

/// Truncate every run of a repeated character to at most two characters.
///
/// See <http://cs.stanford.edu/people/alecmgo/papers/TwitterDistantSupervision09.pdf>.
pub fn collapse_repeats(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut last: Option<char> = None;
    let mut run = 0;

    for ch in token.chars() {
        if Some(ch) == last {
            run += 1;
        } else {
            last = Some(ch);
            run = 1;
        }
        if run <= MAX_REPEAT {
            out.push(ch);
        }
    }

    out
}

/// Split runs of punctuation away from adjacent non-punctuation characters.
///
/// `"great!!"` becomes `"great !!"`. Whitespace is normalized to single
/// spaces. Idempotent.
pub fn separate_punctuation(text: &str) -> String {
    let mut pieces: Vec<String> = Vec::new();

    for token in text.split_whitespace() {
        let mut current = String::new();
        let mut current_is_punct = false;

        for ch in token.chars() {
            let is_punct = PUNCTUATION.contains(&ch);
            if !current.is_empty() && is_punct != current_is_punct {
                pieces.push(std::mem::take(&mut current));
            }
            current_is_punct = is_punct;
            current.push(ch);
        }

        if !current.is_empty() {
            pieces.push(current);
        }
    }

    pieces.join(" ")
}
