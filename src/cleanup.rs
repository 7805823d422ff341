const FENCE: &str = "```";
const LANGUAGE_TAGS: [&str; 5] = ["sql", "postgresql", "postgres", "pgsql", "psql"];

/// Remove a surrounding markdown code fence from model output.
///
/// Strips a leading "```" (optionally tagged `sql` or a PostgreSQL variant)
/// and a trailing "```", plus whitespace at the very start and end. Text
/// between the fences is kept byte for byte. Input without fences only loses
/// its outer whitespace, and the function is idempotent.
pub fn strip_code_fence(raw: &str) -> String {
    let mut current = raw.trim();
    loop {
        let next = strip_once(current);
        if next.len() == current.len() {
            return current.to_string();
        }
        current = next;
    }
}

fn strip_once(text: &str) -> &str {
    let mut out = text;
    if let Some(rest) = out.strip_prefix(FENCE) {
        out = strip_language_tag(rest).trim_start();
    }
    if let Some(rest) = out.strip_suffix(FENCE) {
        out = rest.trim_end();
    }
    out
}

fn strip_language_tag(text: &str) -> &str {
    let end = text
        .find(char::is_whitespace)
        .unwrap_or(text.len());
    let tag = &text[..end];
    if LANGUAGE_TAGS.iter().any(|known| tag.eq_ignore_ascii_case(known)) {
        &text[end..]
    } else {
        text
    }
}
