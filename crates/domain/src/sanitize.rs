//! Markup stripping for free-text feed fields

/// Remove every markup tag from `text`.
///
/// A tag starts at a `<` followed by an ASCII letter, by `/` and a letter, or
/// by `!` or `?`, and runs up to and including the next `>`. An unterminated
/// tag drops the remainder of the input. Any other `<` or `>` is ordinary text,
/// so `5 < 6` and `a > b` pass through. Entities are left as they are and
/// whitespace is not touched.
///
/// The output never contains a tag, so sanitizing twice gives the same result
/// as sanitizing once.
pub fn sanitize(text: &str) -> String {
    let mut current = strip_tags(text);
    // Dropping a tag can join a literal `<` with the text after it
    loop {
        let next = strip_tags(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if opens_tag(tail) {
            match tail.find('>') {
                Some(end) => rest = &tail[end + 1..],
                None => return out,
            }
        } else {
            out.push('<');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

/// Whether `s`, which starts with `<`, begins a tag, comment or declaration
fn opens_tag(s: &str) -> bool {
    let mut chars = s.chars().skip(1);
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some('!' | '?') => true,
        Some('/') => chars.next().is_some_and(|c| c.is_ascii_alphabetic()),
        _ => false,
    }
}
