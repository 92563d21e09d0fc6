//! Quote-aware scanning of tag and variable markup.

/// Byte ranges of `markup` that are outside single- or double-quoted strings.
pub(crate) fn unquoted_ranges(markup: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in markup.char_indices() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                start = i + 1;
            }
            Some(_) => {}
            None if c == '\'' || c == '"' => {
                if start < i {
                    ranges.push((start, i));
                }
                quote = Some(c);
            }
            None => {}
        }
    }
    if quote.is_none() && start < markup.len() {
        ranges.push((start, markup.len()));
    }
    ranges
}

/// Filter names applied in `markup`, each with its byte offset.
///
/// `product.price | money | t: 'a|b'` yields `money` and `t`.
pub(crate) fn filters(markup: &str) -> Vec<(usize, &str)> {
    let mut found = Vec::new();
    for (start, end) in unquoted_ranges(markup) {
        let chunk = &markup[start..end];
        for (pipe, _) in chunk.match_indices('|') {
            let after = start + pipe + 1;
            let rest = &markup[after..];
            let skipped = rest.len() - rest.trim_start().len();
            let name_start = after + skipped;
            let name_len = markup[name_start..]
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(markup.len() - name_start);
            if name_len > 0 {
                found.push((name_start, &markup[name_start..name_start + name_len]));
            }
        }
    }
    found
}

/// The first argument of a tag when it is a quoted string:
/// `'card', product: p` yields `card`.
pub(crate) fn string_argument(markup: &str) -> Option<&str> {
    let markup = markup.trim_start();
    let quote = markup.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let rest = &markup[1..];
    rest.find(quote).map(|end| &rest[..end])
}

/// Variable names referenced in `markup`: the leading identifier of each
/// lookup outside strings, skipping keywords and filter names.
pub(crate) fn variable_names(markup: &str) -> Vec<&str> {
    const KEYWORDS: &[&str] = &[
        "and", "or", "contains", "in", "with", "as", "for", "by", "true", "false", "nil",
        "null", "empty", "blank", "reversed", "limit", "offset", "cols",
    ];

    let filter_offsets: Vec<usize> = filters(markup).iter().map(|(at, _)| *at).collect();
    let mut names = Vec::new();

    for (start, end) in unquoted_ranges(markup) {
        let chunk = &markup[start..end];
        let mut chars = chunk.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if !(c.is_ascii_alphabetic() || c == '_') {
                continue;
            }
            let preceded_by_dot = chunk[..i].ends_with('.');
            let mut end_of_word = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' || next == '-' {
                    end_of_word = j + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let word = &chunk[i..end_of_word];
            let followed_by_colon = chunk[end_of_word..].trim_start().starts_with(':');
            if preceded_by_dot
                || followed_by_colon
                || KEYWORDS.contains(&word)
                || filter_offsets.contains(&(start + i))
            {
                continue;
            }
            names.push(word);
        }
    }
    names
}
