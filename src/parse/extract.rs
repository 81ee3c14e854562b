//! JSON object extraction from free-form model output.
//!
//! Models wrap their answer in prose, markdown fences or both. These helpers
//! find balanced `{...}` spans and clean up the most common syntax slip (a
//! trailing comma) without touching string contents.

/// Returns every balanced `{...}` span in `text` with its byte offset, ordered
/// by opening brace.
///
/// One pass over `text` with a stack of open braces, so input full of stray
/// braces stays linear. Braces inside JSON strings are ignored. Nested objects
/// come after the object that contains them, so callers trying candidates in
/// order see the outermost object first.
pub(crate) fn json_object_candidates(text: &str) -> Vec<(usize, &str)> {
    let mut open = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            // Quotes only delimit strings inside an object; prose may have stray ones.
            '"' if !open.is_empty() => in_string = true,
            '{' => open.push(idx),
            '}' => {
                if let Some(start) = open.pop() {
                    spans.push((start, idx + c.len_utf8()));
                }
            }
            _ => {}
        }
    }

    spans.sort_unstable_by_key(|&(start, _)| start);
    spans
        .into_iter()
        .map(|(start, end)| (start, &text[start..end]))
        .collect()
}

/// Drops commas that directly precede `}` or `]` (ignoring whitespace).
pub(crate) fn strip_trailing_commas(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in json.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = json[idx + 1..].chars().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
