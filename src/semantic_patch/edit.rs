//! Byte-offset edits on a source buffer

use std::ops::Range;

/// Replace `start..end` with `replacement`
pub fn apply_replace(original: &str, start: usize, end: usize, replacement: &str) -> String {
    let mut new_string = String::with_capacity(original.len() - (end - start) + replacement.len());
    new_string.push_str(&original[..start]);
    new_string.push_str(replacement);
    if end < original.len() {
        new_string.push_str(&original[end..]);
    }
    new_string
}

pub fn apply_insert(original: &str, at: usize, insertion: &str) -> String {
    apply_replace(original, at, at, insertion)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// First occurrence of `literal` in `text[from..to]` that does not continue
/// an identifier, so `data_source_id: None,` never matches inside
/// `primary_data_source_id: None,`.
pub fn find_literal(text: &str, from: usize, to: usize, literal: &str) -> Option<usize> {
    if literal.is_empty() || from >= to {
        return None;
    }
    let bounded = literal.as_bytes().first().copied().is_some_and(is_ident_byte);
    let mut search = from;
    while let Some(rel) = text[search..to].find(literal) {
        let hit = search + rel;
        if !bounded || hit == 0 || !is_ident_byte(text.as_bytes()[hit - 1]) {
            return Some(hit);
        }
        search = hit + 1;
        while !text.is_char_boundary(search) {
            search += 1;
        }
    }
    None
}

/// Delete every occurrence of `literal` lying entirely inside `region`.
///
/// Occurrences are located with [`find_literal`]. An occurrence that is the
/// only thing on its line, with that line also inside `region`, takes the
/// whole line (indentation and line break) with it. Returns the rewritten
/// text and the number of occurrences removed.
pub fn remove_literal_in(text: &str, region: Range<usize>, literal: &str) -> (String, usize) {
    if literal.is_empty() || region.start >= region.end {
        return (text.to_string(), 0);
    }

    let mut out = String::with_capacity(text.len());
    let mut removed = 0;
    let mut cursor = region.start;
    out.push_str(&text[..region.start]);

    while let Some(hit) = find_literal(text, cursor, region.end, literal) {
        let hit_end = hit + literal.len();

        let line_start = text[..hit].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = text[hit_end..]
            .find('\n')
            .map(|i| hit_end + i + 1)
            .unwrap_or(text.len());
        let alone = line_start >= cursor
            && line_end <= region.end
            && text[line_start..hit].trim().is_empty()
            && text[hit_end..line_end].trim().is_empty();

        if alone {
            out.push_str(&text[cursor..line_start]);
            cursor = line_end;
        } else {
            out.push_str(&text[cursor..hit]);
            cursor = hit_end;
        }
        removed += 1;
    }
    out.push_str(&text[cursor..]);

    (out, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_insert() {
        assert_eq!(apply_replace("let x = 1;", 8, 9, "42"), "let x = 42;");
        assert_eq!(apply_insert("ab", 1, "-"), "a-b");
        assert_eq!(apply_insert("ab", 2, "c"), "abc");
    }

    #[test]
    fn test_remove_literal_takes_whole_line() {
        let text = "{\n    a: None,\n    b: 1,\n    a: None,\n}";
        let (out, removed) = remove_literal_in(text, 0..text.len(), "a: None,");

        assert_eq!(removed, 2);
        assert_eq!(out, "{\n    b: 1,\n}");
    }

    #[test]
    fn test_remove_literal_inline() {
        let text = "S { a: None, b: 1 }";
        let (out, removed) = remove_literal_in(text, 0..text.len(), "a: None,");

        assert_eq!(removed, 1);
        assert_eq!(out, "S {  b: 1 }");
    }

    #[test]
    fn test_remove_literal_respects_region() {
        let text = "a: None,\nkeep\na: None,\nafter a: None,\n";
        let second = text.find("keep").unwrap();
        let region_end = text.find("after").unwrap();
        let (out, removed) = remove_literal_in(text, second..region_end, "a: None,");

        assert_eq!(removed, 1);
        assert_eq!(out, "a: None,\nkeep\nafter a: None,\n");
    }

    #[test]
    fn test_same_line_occurrence_keeps_line_break() {
        // The region starts mid-line, right after a kept occurrence
        let text = "a: None, a: None,\nnext";
        let (out, removed) = remove_literal_in(text, 8..text.len(), "a: None,");

        assert_eq!(removed, 1);
        assert_eq!(out, "a: None, \nnext");
    }

    #[test]
    fn test_longer_identifier_is_not_an_occurrence() {
        let text = "{\n    primary_a: None,\n    a: None,\n    xa: None,\n}";
        let standalone = text.find("\n    a: None,").unwrap() + 5;
        assert_eq!(find_literal(text, 0, text.len(), "a: None,"), Some(standalone));

        let (out, removed) = remove_literal_in(text, 0..text.len(), "a: None,");
        assert_eq!(removed, 1);
        assert_eq!(out, "{\n    primary_a: None,\n    xa: None,\n}");
    }

    #[test]
    fn test_remove_literal_without_match() {
        let text = "nothing here";
        let (out, removed) = remove_literal_in(text, 0..text.len(), "a: None,");
        assert_eq!(removed, 0);
        assert_eq!(out, "nothing here");
    }
}
