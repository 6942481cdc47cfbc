use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Typical adult reading speed for prose.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Estimate how many minutes it takes to read a Markdown document. This is
/// always at least one minute. A `words_per_minute` of zero means the default.
pub fn calculate_reading_time(content: &str, words_per_minute: u32) -> u32 {
    let wpm = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };
    let words = u32::try_from(count_words(content)).unwrap_or(u32::MAX);
    words.div_ceil(wpm).max(1)
}

/// Count the words a reader would see in a Markdown document: text and code,
/// but not link targets, raw HTML, or markup.
pub fn count_words(content: &str) -> usize {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    // Gather the visible text, with a space wherever a block boundary or line
    // break separates words. Inline markup does not split words: `un*til*` is
    // still a single word.
    let mut text = String::new();
    for event in Parser::new_ext(content, options) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::Start(
                Tag::Emphasis
                | Tag::Strong
                | Tag::Strikethrough
                | Tag::Link { .. }
                | Tag::Image { .. },
            )
            | Event::End(
                TagEnd::Emphasis
                | TagEnd::Strong
                | TagEnd::Strikethrough
                | TagEnd::Link
                | TagEnd::Image,
            ) => (),
            Event::Start(_) | Event::End(_) | Event::SoftBreak | Event::HardBreak => {
                text.push(' ')
            }
            _ => (),
        }
    }

    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn empty_is_one_minute() {
        assert_eq!(calculate_reading_time("", 200), 1);
    }

    #[test]
    fn rounds_up() {
        assert_eq!(calculate_reading_time(&words(400), 200), 2);
        assert_eq!(calculate_reading_time(&words(401), 200), 3);
    }

    #[test]
    fn custom_speed() {
        assert_eq!(calculate_reading_time(&words(300), 100), 3);
    }

    #[test]
    fn zero_speed_uses_default() {
        assert_eq!(calculate_reading_time(&words(1000), 0), 5);
    }

    #[test]
    fn plain() {
        assert_eq!(count_words("one two  three"), 3);
    }

    #[test]
    fn markup_is_not_counted() {
        assert_eq!(count_words("## Heading\n\n*one* **two** `three`"), 4);
    }

    #[test]
    fn link_targets_are_not_counted() {
        assert_eq!(count_words("[read this](https://example.com/a-b)"), 2);
    }

    #[test]
    fn inline_markup_does_not_split_words() {
        assert_eq!(count_words("un*til*"), 1);
    }

    #[test]
    fn blocks_split_words() {
        assert_eq!(count_words("one\ntwo\n\n- three\n- four"), 4);
    }

    #[test]
    fn code_blocks_count() {
        assert_eq!(count_words("```\nlet x = 1;\n```"), 4);
    }

    #[test]
    fn html_is_not_counted() {
        assert_eq!(count_words("<Callout type=\"tip\">\n\nhello\n\n</Callout>"), 1);
    }
}
