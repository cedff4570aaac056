//! `#TAG:value;` reader shared by both formats.
//!
//! Values may span several lines (SM `#NOTES` always does). A tag ends at
//! `;`, or at the next line starting with `#` when the `;` is missing.
//! `//` comments are removed before reading.

/// One tag as it appears in the source, before format-specific dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    /// Tag name, uppercased, without `#`.
    pub name: String,
    /// Everything between the first `:` and the terminator. `None` when the
    /// tag has no `:` at all.
    pub value: Option<String>,
}

impl RawTag {
    /// The value, or a copy of the raw tag text for error messages.
    pub fn value_or_raw(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.name)
    }
}

pub fn read_tags(text: &str) -> Vec<RawTag> {
    let cleaned = text.lines().map(strip_comment).collect::<Vec<_>>().join("\n");
    let mut tags = Vec::new();
    let mut rest = cleaned.as_str();

    while let Some(start) = rest.find('#') {
        let body = &rest[start + 1..];
        let (content, consumed) = split_tag_body(body);
        tags.push(to_raw_tag(content));
        rest = &body[consumed..];
    }

    tags
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Returns the tag content and how many bytes of `body` it used up.
fn split_tag_body(body: &str) -> (&str, usize) {
    let semicolon = body.find(';');
    let next_tag = body.find("\n#");

    match (semicolon, next_tag) {
        (Some(end), Some(next)) if next < end => (&body[..next], next),
        (Some(end), _) => (&body[..end], end + 1),
        (None, Some(next)) => (&body[..next], next),
        (None, None) => (body, body.len()),
    }
}

fn to_raw_tag(content: &str) -> RawTag {
    match content.split_once(':') {
        Some((name, value)) => RawTag {
            name: name.trim().to_uppercase(),
            value: Some(value.to_string()),
        },
        None => RawTag {
            name: content.trim().to_uppercase(),
            value: None,
        },
    }
}
