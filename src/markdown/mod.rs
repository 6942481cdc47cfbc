mod headings;
mod reading_time;
mod slug;

pub use headings::{Heading, Headings, TOC_LEVELS, extract_headings};
pub use reading_time::{DEFAULT_WORDS_PER_MINUTE, calculate_reading_time, count_words};
pub use slug::{FALLBACK_ID, generate_heading_id};
