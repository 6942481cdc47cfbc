//! YAML front matter: splitting it off a document, and checking that it has
//! what a post needs.

use crate::post::{VALID_CATEGORIES, VALID_DIFFICULTIES};
use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_yaml::{Mapping, Value};
use std::fmt;

const DELIMITER: &str = "---";

/// Front matter keys every post must have.
pub const REQUIRED_FRONTMATTER_FIELDS: &[&str] = &[
    "title",
    "description",
    "publishedAt",
    "author",
    "category",
    "tags",
];

/// A document split into its raw front matter and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// The text between the delimiters, if the document had front matter.
    pub raw: Option<&'a str>,
    pub body: &'a str,
}

/// Separate front matter from the rest of a document. Front matter starts
/// with a `---` line at the very top of the document and ends at the next
/// `---` line. Without a closing delimiter, the whole document is body.
pub fn split_frontmatter(source: &str) -> Split<'_> {
    let no_frontmatter = Split {
        raw: None,
        body: source,
    };

    let Some(first) = source.split_inclusive('\n').next() else {
        return no_frontmatter;
    };
    if !is_delimiter(first) {
        return no_frontmatter;
    }

    let rest = &source[first.len()..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line) {
            return Split {
                raw: Some(&rest[..offset]),
                body: &rest[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    no_frontmatter
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).trim_end_matches([' ', '\t']) == DELIMITER
}

/// Split a document and parse its front matter as a YAML mapping. A document
/// without front matter gets an empty mapping.
pub fn parse_frontmatter(source: &str) -> Result<(Mapping, &str)> {
    let split = split_frontmatter(source);
    let data = match split.raw {
        Some(raw) if !raw.trim().is_empty() => match serde_yaml::from_str(raw)? {
            Value::Mapping(m) => m,
            Value::Null => Mapping::new(),
            _ => bail!("front matter must be a mapping of keys to values"),
        },
        _ => Mapping::new(),
    };
    Ok((data, split.body))
}

/// The outcome of checking a post's front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub success: bool,
    /// Required fields that are absent, null, or empty.
    pub missing_fields: Vec<&'static str>,
    /// Fields that are present but have an unusable value.
    pub invalid_fields: Vec<&'static str>,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            return f.write_str("valid");
        }
        let mut problems = vec![];
        if !self.missing_fields.is_empty() {
            problems.push(format!("missing fields {}", self.missing_fields.join(", ")));
        }
        if !self.invalid_fields.is_empty() {
            problems.push(format!("invalid fields {}", self.invalid_fields.join(", ")));
        }
        f.write_str(&problems.join("; "))
    }
}

/// Check that front matter has every required field, and that the fields
/// with a fixed vocabulary or a date format are well-formed.
pub fn validate_frontmatter(data: &Mapping) -> ValidationResult {
    let missing_fields: Vec<_> = REQUIRED_FRONTMATTER_FIELDS
        .iter()
        .copied()
        .filter(|&field| is_missing(data.get(field)))
        .collect();

    let mut invalid_fields = vec![];
    let mut check = |field: &'static str, ok: fn(&Value) -> bool| {
        if let Some(value) = data.get(field)
            && !is_missing(Some(value))
            && !ok(value)
        {
            invalid_fields.push(field);
        }
    };
    for field in ["title", "description", "author", "featuredImage"] {
        check(field, Value::is_string);
    }
    check("tags", |v| {
        v.as_sequence()
            .is_some_and(|s| s.iter().all(Value::is_string))
    });
    check("category", |v| {
        v.as_str().is_some_and(|s| VALID_CATEGORIES.contains(&s))
    });
    check("difficulty", |v| {
        v.as_str().is_some_and(|s| VALID_DIFFICULTIES.contains(&s))
    });
    check("publishedAt", |v| v.as_str().and_then(parse_date).is_some());
    check("updatedAt", |v| v.as_str().and_then(parse_date).is_some());
    check("relatedPosts", |v| {
        v.as_sequence()
            .is_some_and(|s| s.iter().all(Value::is_string))
    });

    ValidationResult {
        success: missing_fields.is_empty() && invalid_fields.is_empty(),
        missing_fields,
        invalid_fields,
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Parse a front matter date, either a plain `YYYY-MM-DD` date (taken as
/// midnight) or an RFC 3339 timestamp (taken in UTC).
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "\
---
title: Learning Hiragana
description: Where to start.
publishedAt: 2024-03-01
author: Aiko
category: hiragana
tags: [kana, basics]
---
## First Steps
";

    fn validate(source: &str) -> ValidationResult {
        let (data, _) = parse_frontmatter(source).unwrap();
        validate_frontmatter(&data)
    }

    #[test]
    fn split() {
        let s = split_frontmatter("---\ntitle: x\n---\nbody\n");
        assert_eq!(s.raw, Some("title: x\n"));
        assert_eq!(s.body, "body\n");
    }

    #[test]
    fn split_crlf() {
        let s = split_frontmatter("---\r\ntitle: x\r\n---\r\nbody");
        assert_eq!(s.raw, Some("title: x\r\n"));
        assert_eq!(s.body, "body");
    }

    #[test]
    fn split_without_frontmatter() {
        let s = split_frontmatter("## hi\n---\n");
        assert_eq!(s.raw, None);
        assert_eq!(s.body, "## hi\n---\n");
    }

    #[test]
    fn split_unclosed() {
        let s = split_frontmatter("---\ntitle: x\nbody");
        assert_eq!(s.raw, None);
        assert_eq!(s.body, "---\ntitle: x\nbody");
    }

    #[test]
    fn split_at_end_of_file() {
        let s = split_frontmatter("---\ntitle: x\n---");
        assert_eq!(s.raw, Some("title: x\n"));
        assert_eq!(s.body, "");
    }

    #[test]
    fn split_empty_frontmatter() {
        let s = split_frontmatter("---\n---\nbody");
        assert_eq!(s.raw, Some(""));
        assert_eq!(s.body, "body");
    }

    #[test]
    fn parse() {
        let (data, body) = parse_frontmatter(VALID).unwrap();
        assert_eq!(data.get("author").and_then(Value::as_str), Some("Aiko"));
        assert_eq!(body, "## First Steps\n");
    }

    #[test]
    fn parse_non_mapping() {
        assert!(parse_frontmatter("---\n- a\n- b\n---\nbody").is_err());
    }

    #[test]
    fn parse_bad_yaml() {
        assert!(parse_frontmatter("---\ntitle: [unclosed\n---\nbody").is_err());
    }

    #[test]
    fn valid() {
        let result = validate(VALID);
        assert!(result.success, "{result}");
        assert!(result.missing_fields.is_empty());
        assert!(result.invalid_fields.is_empty());
    }

    #[test]
    fn nothing_at_all() {
        let result = validate("just a body");
        assert!(!result.success);
        assert_eq!(result.missing_fields, REQUIRED_FRONTMATTER_FIELDS);
    }

    #[test]
    fn missing_and_empty() {
        let result = validate("---\ntitle: ''\ndescription: ~\n---\n");
        assert!(!result.success);
        assert_eq!(
            result.missing_fields,
            &["title", "description", "publishedAt", "author", "category", "tags"]
        );
    }

    #[test]
    fn empty_tags_are_fine() {
        let source = VALID.replace("tags: [kana, basics]", "tags: []");
        assert!(validate(&source).success);
    }

    #[test]
    fn bad_category() {
        let source = VALID.replace("category: hiragana", "category: cooking");
        let result = validate(&source);
        assert!(!result.success);
        assert!(result.missing_fields.is_empty());
        assert_eq!(result.invalid_fields, &["category"]);
    }

    #[test]
    fn bad_dates_and_difficulty() {
        let source = VALID
            .replace("publishedAt: 2024-03-01", "publishedAt: last tuesday")
            .replace("tags:", "difficulty: expert\nupdatedAt: 2024-03-02T10:00:00Z\ntags:");
        let result = validate(&source);
        assert_eq!(result.invalid_fields, &["difficulty", "publishedAt"]);
        assert_eq!(
            result.to_string(),
            "invalid fields difficulty, publishedAt"
        );
    }

    #[test]
    fn text_fields_must_be_strings() {
        let source = VALID
            .replace("title: Learning Hiragana", "title: 2024")
            .replace("author: Aiko", "author: [Aiko, Ken]");
        let result = validate(&source);
        assert!(!result.success);
        assert!(result.missing_fields.is_empty());
        assert_eq!(result.invalid_fields, &["title", "author"]);
    }

    #[test]
    fn tags_must_be_a_list() {
        let source = VALID.replace("tags: [kana, basics]", "tags: kana");
        assert_eq!(validate(&source).invalid_fields, &["tags"]);
    }

    #[test]
    fn dates() {
        assert_eq!(
            parse_date("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1).map(|d| d.and_time(NaiveTime::MIN))
        );
        assert_eq!(
            parse_date("2024-03-01T09:00:00+09:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(parse_date("March 1st"), None);
    }
}
