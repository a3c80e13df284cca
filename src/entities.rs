//
// entities.rs
// Distributed under terms of the MIT license.
//

use crate::error::NofanError;
use crate::utils::unescape_html;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Plain,
    At,
    Link,
    Tag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoldSpan {
    pub text: String,
    pub is_bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
    // user id, mentions only
    pub id: Option<String>,
    // present when the service marked search keywords with <b>
    pub bold_spans: Option<Vec<BoldSpan>>,
}

impl Segment {
    fn new(kind: SegmentKind, raw: &str, id: Option<String>) -> Self {
        Segment {
            kind,
            text: unescape_html(&strip_bold(raw)),
            id,
            bold_spans: bold_spans(raw),
        }
    }
}

// Splits an html-format status text into typed segments. Mentions come as
// @<a href="http://fanfou.com/<id>">name</a>, hashtags as
// #<a href="/q/<query>">tag</a># and links as plain anchors; search results
// additionally mark matched keywords with <b> inside any of them.
pub fn entities(html: &str) -> Result<Vec<Segment>, NofanError> {
    let re = Regex::new(concat!(
        r##"#<a href="(?:https?://fanfou\.com)?/q/[^"]*"[^>]*>(.*?)</a>#"##,
        r##"|@<a href="https?://fanfou\.com/([^"]*)"[^>]*>(.*?)</a>"##,
        r##"|<a href="[^"]*"[^>]*>(.*?)</a>"##,
    ))
    .map_err(|e| NofanError::ParseError(e.to_string()))?;

    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in re.captures_iter(html) {
        let whole = caps.get(0).ok_or_else(|| NofanError::ParseError(html.to_string()))?;

        if whole.start() > cursor {
            segments.push(Segment::new(SegmentKind::Plain, &html[cursor..whole.start()], None));
        }

        if let Some(inner) = caps.get(1) {
            segments.push(Segment::new(
                SegmentKind::Tag,
                &format!("#{}#", inner.as_str()),
                None,
            ));
        } else if let Some(inner) = caps.get(3) {
            let id = caps.get(2).map(|m| unescape_html(m.as_str()));
            segments.push(Segment::new(
                SegmentKind::At,
                &format!("@{}", inner.as_str()),
                id,
            ));
        } else if let Some(inner) = caps.get(4) {
            segments.push(Segment::new(SegmentKind::Link, inner.as_str(), None));
        }

        cursor = whole.end();
    }

    if cursor < html.len() {
        segments.push(Segment::new(SegmentKind::Plain, &html[cursor..], None));
    }

    Ok(segments)
}

// Concatenation of the display text of every segment.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

fn strip_bold(raw: &str) -> String {
    raw.replace("<b>", "").replace("</b>", "")
}

fn bold_spans(raw: &str) -> Option<Vec<BoldSpan>> {
    if !raw.contains("<b>") {
        return None;
    }

    let mut spans = Vec::new();
    let mut rest = raw;
    while let Some(open) = rest.find("<b>") {
        if open > 0 {
            spans.push(BoldSpan {
                text: unescape_html(&rest[..open]),
                is_bold: false,
            });
        }
        let after = &rest[open + 3..];
        match after.find("</b>") {
            Some(close) => {
                spans.push(BoldSpan {
                    text: unescape_html(&after[..close]),
                    is_bold: true,
                });
                rest = &after[close + 4..];
            }
            None => {
                spans.push(BoldSpan {
                    text: unescape_html(after),
                    is_bold: true,
                });
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        spans.push(BoldSpan {
            text: unescape_html(rest),
            is_bold: false,
        });
    }

    Some(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_segment() {
        let segments = entities("hello world").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Plain);
        assert_eq!(segments[0].text, "hello world");
        assert!(segments[0].bold_spans.is_none());
    }

    #[test]
    fn splits_mention_tag_and_link() {
        let html = concat!(
            "hello ",
            r#"@<a href="http://fanfou.com/u123" class="former">alice</a>"#,
            " ",
            r##"#<a href="/q/%E6%97%A5%E5%B8%B8">日常</a>#"##,
            " ",
            r#"<a href="http://x.cn" title="http://x.cn" rel="nofollow" target="_blank">http://x.cn</a>"#,
        );
        let segments = entities(html).unwrap();

        let kinds: Vec<_> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Plain,
                SegmentKind::At,
                SegmentKind::Plain,
                SegmentKind::Tag,
                SegmentKind::Plain,
                SegmentKind::Link,
            ]
        );
        assert_eq!(segments[1].text, "@alice");
        assert_eq!(segments[1].id.as_deref(), Some("u123"));
        assert_eq!(segments[3].text, "#日常#");
        assert_eq!(segments[5].text, "http://x.cn");
        assert_eq!(plain_text(&segments), "hello @alice #日常# http://x.cn");
    }

    #[test]
    fn unescapes_entities_in_plain_segments() {
        let segments = entities("tea &amp; cake &lt;3").unwrap();
        assert_eq!(segments[0].text, "tea & cake <3");
    }

    #[test]
    fn marks_bold_search_spans() {
        let segments = entities("learning <b>rust</b> today").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "learning rust today");
        assert_eq!(
            segments[0].bold_spans,
            Some(vec![
                BoldSpan { text: "learning ".to_string(), is_bold: false },
                BoldSpan { text: "rust".to_string(), is_bold: true },
                BoldSpan { text: " today".to_string(), is_bold: false },
            ])
        );
    }

    #[test]
    fn marks_bold_spans_inside_anchors() {
        let html = r##"#<a href="/q/rust"><b>rust</b>acean</a>#"##;
        let segments = entities(html).unwrap();
        assert_eq!(segments[0].kind, SegmentKind::Tag);
        assert_eq!(segments[0].text, "#rustacean#");
        assert_eq!(
            segments[0].bold_spans,
            Some(vec![
                BoldSpan { text: "#".to_string(), is_bold: false },
                BoldSpan { text: "rust".to_string(), is_bold: true },
                BoldSpan { text: "acean#".to_string(), is_bold: false },
            ])
        );
    }

    #[test]
    fn keeps_literal_at_before_foreign_links() {
        let html = r#"@<a href="http://other.example">x</a>"#;
        let segments = entities(html).unwrap();
        assert_eq!(segments[0].kind, SegmentKind::Plain);
        assert_eq!(segments[0].text, "@");
        assert_eq!(segments[1].kind, SegmentKind::Link);
        assert_eq!(segments[1].text, "x");
    }
}
