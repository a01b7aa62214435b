//! Escaping for free-text fields embedded in the feed markup.

use html_escape::encode_quoted_attribute;

pub const ELLIPSIS: char = '…';
pub const LINE_BREAK: &str = "<br />";

/// Escapes `& < > " '` as HTML entities.
pub fn sanitize_title_or_author(input: &str) -> String {
    encode_quoted_attribute(input).into_owned()
}

/// Truncates to `max_chars` source characters (plus an ellipsis), escapes,
/// then turns newlines into line breaks.
pub fn sanitize_description(input: &str, max_chars: usize) -> String {
    let truncated = match input.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut head = input[..cut].to_string();
            head.push(ELLIPSIS);
            head
        }
        None => input.to_string(),
    };
    encode_quoted_attribute(&truncated).replace('\n', LINE_BREAK)
}
