use super::slug::{generate_heading_id, is_space, trim_space};
use std::collections::HashMap;

/// The heading levels that make it into a table of contents.
pub const TOC_LEVELS: std::ops::RangeInclusive<usize> = 2..=4;

/// One entry in a post's table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Anchor ID, unique among the headings extracted from one document.
    pub id: String,
    pub text: String,
    /// Between 2 and 4, inclusive.
    pub level: u8,
}

/// Extract the level-2, -3, and -4 headings from a Markdown document, in
/// document order, with unique anchor IDs.
pub fn extract_headings(document: &str) -> Vec<Heading> {
    Headings::new(document).collect()
}

/// An iterator over the table-of-contents headings in a document.
///
/// Detection is strictly line-based: a line is a heading if it starts with two
/// to four `#` characters, then whitespace, then anything else. There is no
/// awareness of code blocks or other Markdown structure.
pub struct Headings<I> {
    lines: I,
    /// How many times each base ID has been handed out so far.
    used_ids: HashMap<String, usize>,
}

impl<'a> Headings<std::str::Split<'a, fn(char) -> bool>> {
    pub fn new(document: &'a str) -> Self {
        Self::from_lines(document.split(is_line_break as fn(char) -> bool))
    }
}

impl<I> Headings<I> {
    /// Scan an existing sequence of lines instead of splitting a document.
    pub fn from_lines(lines: I) -> Self {
        Self {
            lines,
            used_ids: HashMap::new(),
        }
    }

    /// Disambiguate a base ID against the ones already issued. The counter is
    /// keyed by base ID, so the first "foo" gets `foo`, the second `foo-2`,
    /// and so on.
    fn unique_id(&mut self, base: String) -> String {
        let count = self.used_ids.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        }
    }
}

impl<I> Iterator for Headings<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Heading;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            if let Some((level, text)) = parse_heading_line(line.as_ref()) {
                let id = self.unique_id(generate_heading_id(text));
                return Some(Heading {
                    id,
                    text: text.to_string(),
                    level,
                });
            }
        }
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// If this line is a table-of-contents heading, return its level and trimmed
/// text.
///
/// The text after the markers must be at least one whitespace character
/// followed by at least one more character. That second character may itself
/// be whitespace, in which case the heading text is empty.
fn parse_heading_line(line: &str) -> Option<(u8, &str)> {
    let markers = line.bytes().take_while(|&b| b == b'#').count();
    if !TOC_LEVELS.contains(&markers) {
        return None;
    }

    let rest = &line[markers..];
    let mut chars = rest.chars();
    if !is_space(chars.next()?) || chars.as_str().is_empty() {
        return None;
    }

    Some((markers as u8, trim_space(rest)))
}
