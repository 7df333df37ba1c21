// reply.rs - Reply Formatting
// Renders query outcomes into the text (and optional "More Videos" button)
// sent back to the user.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::query::Reply;
use crate::ranking::RankedPage;

pub const MORE_BUTTON_ID: &str = "more_videos";
pub const MORE_BUTTON_LABEL: &str = "More Videos";

pub const NO_RESULTS_TEXT: &str = "No videos found.";
pub const FAILED_TEXT: &str = "Error fetching videos. Please try again later.";
pub const SESSION_EXPIRED_TEXT: &str = "Your search session has expired. Please send a new query.";
pub const EXHAUSTED_TEXT: &str = "No more videos for this search.";

// Numeric character references, e.g. &#39; or &#x27;
static NUMERIC_ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").expect("Invalid numeric entity regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReply {
    pub text: String,
    pub more_button: bool,
}

impl FormattedReply {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            more_button: false,
        }
    }
}

pub fn render(reply: &Reply) -> FormattedReply {
    match reply {
        Reply::Page(page) => format_reply(page, Utc::now().year()),
        Reply::NoResults => FormattedReply::plain(NO_RESULTS_TEXT),
        Reply::Failed => FormattedReply::plain(FAILED_TEXT),
        Reply::SessionExpired => FormattedReply::plain(SESSION_EXPIRED_TEXT),
        Reply::Exhausted => FormattedReply::plain(EXHAUSTED_TEXT),
    }
}

/// Numbered "title (N views)" list with watch links, followed by the footer.
pub fn format_reply(page: &RankedPage, year: i32) -> FormattedReply {
    let mut text = String::new();
    for (index, video) in page.videos.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} ({} views)\n{}\n\n",
            index + 1,
            decode_html_entities(&video.title),
            video.view_count,
            video.watch_url()
        ));
    }
    text.push_str(&footer(year));

    FormattedReply {
        text,
        more_button: page.has_more(),
    }
}

pub fn footer(year: i32) -> String {
    format!("© {} | Developed by MEHEDI AL TAYIB", year)
}

/// Decode the HTML entities YouTube puts in snippet titles.
pub fn decode_html_entities(text: &str) -> String {
    let decoded = NUMERIC_ENTITY_REGEX.replace_all(text, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        // control characters other than newline and tab stay escaped
        code.filter(|c| *c >= 0x20 || *c == 0x0A || *c == 0x09)
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    let entities = [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&apos;", "'"),
        ("&nbsp;", " "),
        ("&amp;", "&"),
    ];

    let mut result = decoded.into_owned();
    for (entity, replacement) in entities.iter() {
        result = result.replace(entity, replacement);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::VideoResult;

    fn video(id: &str, title: &str, views: u64) -> VideoResult {
        VideoResult { video_id: id.into(), title: title.into(), view_count: views, source_index: 0 }
    }

    #[test]
    fn test_format_numbered_list_with_footer() {
        let page = RankedPage {
            videos: vec![video("B", "T2", 300), video("C", "T3", 200), video("A", "T1", 100)],
            next_page_token: None,
        };
        let reply = format_reply(&page, 2024);

        let expected = "1. T2 (300 views)\nhttps://www.youtube.com/watch?v=B\n\n\
                        2. T3 (200 views)\nhttps://www.youtube.com/watch?v=C\n\n\
                        3. T1 (100 views)\nhttps://www.youtube.com/watch?v=A\n\n\
                        © 2024 | Developed by MEHEDI AL TAYIB";
        assert_eq!(reply.text, expected);
        assert!(!reply.more_button);
    }

    #[test]
    fn test_more_button_follows_next_token() {
        let page = RankedPage { videos: vec![video("A", "T1", 1)], next_page_token: Some("p2".into()) };
        assert!(format_reply(&page, 2024).more_button);
    }

    #[test]
    fn test_titles_are_unescaped() {
        let page = RankedPage { videos: vec![video("A", "Tom &amp; Jerry&#39;s &quot;Best&quot; &#x1F431;", 5)], next_page_token: None };
        let reply = format_reply(&page, 2024);
        assert!(reply.text.starts_with("1. Tom & Jerry's \"Best\" 🐱 (5 views)\n"));
    }

    #[test]
    fn test_decode_does_not_double_unescape() {
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_html_entities("plain text"), "plain text");
        assert_eq!(decode_html_entities("&#99999999;"), "&#99999999;");
    }

    #[test]
    fn test_control_references_stay_escaped() {
        assert_eq!(decode_html_entities("a&#0;b&#x1B;c&#7;"), "a&#0;b&#x1B;c&#7;");
        assert_eq!(decode_html_entities("line&#10;next&#9;tab"), "line\nnext\ttab");
    }

    #[test]
    fn test_render_outcomes() {
        assert_eq!(render(&Reply::NoResults).text, NO_RESULTS_TEXT);
        assert_eq!(render(&Reply::Failed).text, FAILED_TEXT);
        assert_eq!(render(&Reply::SessionExpired).text, SESSION_EXPIRED_TEXT);
        assert!(!render(&Reply::Exhausted).more_button);

        let page = RankedPage { videos: vec![video("A", "T1", 1)], next_page_token: Some("p2".into()) };
        let rendered = render(&Reply::Page(page));
        assert!(rendered.more_button);
        assert!(rendered.text.contains(&footer(Utc::now().year())));
    }
}
