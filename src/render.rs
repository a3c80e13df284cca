//
// render.rs
// Distributed under terms of the MIT license.
//

use crate::entities::{entities, SegmentKind};
use crate::error::NofanError;
use crate::fanfou::Status;
use crate::paint::Style;
use crate::store::ColorScheme;
use crate::utils::{hyperlink, strip_photo_suffix, time_ago};
use chrono::{DateTime, Local, Utc};

pub struct RenderOptions<'a> {
    pub verbose: bool,
    pub time_tag: bool,
    pub photo_tag: bool,
    pub colors: &'a ColorScheme,
    // injected clock keeps relative time tags deterministic under test
    pub now: DateTime<Utc>,
    pub hyperlinks: bool,
}

// One line per status, input order preserved.
pub fn render(statuses: &[Status], options: &RenderOptions) -> Result<Vec<String>, NofanError> {
    statuses
        .iter()
        .map(|status| render_one(status, options))
        .collect()
}

fn render_one(status: &Status, options: &RenderOptions) -> Result<String, NofanError> {
    let colors = options.colors;
    let text_style = Style::parse(&colors.text);
    let name_style = Style::parse(&colors.name);
    let highlight_style = Style::parse(&colors.highlight);

    let user = status
        .user
        .as_ref()
        .ok_or_else(|| NofanError::MalformedStatus(status.id.clone()))?;

    let mut text = String::new();
    for segment in entities(&status.text)? {
        let style = match segment.kind {
            SegmentKind::At => Style::parse(&colors.at),
            SegmentKind::Link => Style::parse(&colors.link),
            SegmentKind::Tag => Style::parse(&colors.tag),
            SegmentKind::Plain => text_style.clone(),
        };

        // a segment with sub-highlight spans takes its own branch; an empty
        // span list still counts as highlighted
        match &segment.bold_spans {
            Some(spans) => {
                for span in spans {
                    if span.is_bold {
                        text.push_str(&style.overlay(&highlight_style).paint(&span.text));
                    } else {
                        text.push_str(&style.paint(&span.text));
                    }
                }
                if options.verbose && segment.kind == SegmentKind::At {
                    if let Some(id) = &segment.id {
                        text.push_str(&style.paint(&format!(":{}", id)));
                    }
                }
            }
            None => {
                let shown = match (&segment.id, options.verbose, segment.kind) {
                    (Some(id), true, SegmentKind::At) => format!("{}:{}", segment.text, id),
                    _ => segment.text.clone(),
                };
                text.push_str(&style.paint(&shown));
            }
        }
    }

    let shown_name = if options.verbose {
        format!("{}({}):{}", user.name, user.id, status.id)
    } else {
        user.name.clone()
    };
    let name = format!(
        "{}{}{}",
        text_style.paint("["),
        name_style.paint(&shown_name),
        text_style.paint("]")
    );

    if let Some(photo) = &status.photo {
        if options.photo_tag {
            let url = strip_photo_suffix(&photo.largeurl)?;
            let tag = if options.hyperlinks {
                hyperlink("[图]", &url)
            } else {
                "[图]".to_string()
            };
            let tag = Style::parse(&colors.photo).paint(&tag);
            if text.is_empty() {
                text = tag;
            } else {
                text.push(' ');
                text.push_str(&tag);
            }
        }
    }

    if options.time_tag {
        let stamp = if options.verbose {
            status
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        } else {
            time_ago(status.created_at, options.now)
        };
        let stamp = Style::parse(&colors.timeago).paint(&format!("({})", stamp));
        Ok(format!("{} {} {}", name, text, stamp))
    } else {
        Ok(format!("{} {}", name, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fanfou::{Photo, User};
    use chrono::TimeZone;

    const TEXT_HTML: &str = concat!(
        "hello ",
        r#"@<a href="http://fanfou.com/alice123" class="former">alice</a>"#,
        " ",
        r##"#<a href="/q/tag">tag</a>#"##,
        " ",
        r#"<a href="http://x" rel="nofollow" target="_blank">http://x</a>"#,
    );

    fn posted() -> DateTime<chrono::FixedOffset> {
        Utc.with_ymd_and_hms(2020, 5, 1, 12, 0, 0).unwrap().into()
    }

    fn status(text: &str) -> Status {
        Status {
            id: "s1".to_string(),
            created_at: posted(),
            text: text.to_string(),
            user: Some(User {
                id: "u1".to_string(),
                name: "Alice Wonder".to_string(),
                screen_name: Some("alice".to_string()),
            }),
            photo: None,
        }
    }

    fn options(colors: &ColorScheme, verbose: bool) -> RenderOptions {
        RenderOptions {
            verbose,
            time_tag: false,
            photo_tag: true,
            colors,
            now: Utc.with_ymd_and_hms(2020, 5, 1, 12, 5, 0).unwrap(),
            hyperlinks: false,
        }
    }

    fn bracketed(colors: &ColorScheme, name: &str) -> String {
        format!(
            "{}{}{}",
            Style::parse(&colors.text).paint("["),
            Style::parse(&colors.name).paint(name),
            Style::parse(&colors.text).paint("]")
        )
    }

    #[test]
    fn renders_segments_in_role_colors() {
        colored::control::set_override(true);
        let colors = ColorScheme::default();

        let lines = render(&[status(TEXT_HTML)], &options(&colors, false)).unwrap();

        let text_style = Style::parse(&colors.text);
        let expected_text = [
            text_style.paint("hello "),
            Style::parse(&colors.at).paint("@alice"),
            text_style.paint(" "),
            Style::parse(&colors.tag).paint("#tag#"),
            text_style.paint(" "),
            Style::parse(&colors.link).paint("http://x"),
        ]
        .concat();
        assert_eq!(
            lines,
            vec![format!("{} {}", bracketed(&colors, "Alice Wonder"), expected_text)]
        );
    }

    #[test]
    fn verbose_exposes_mention_and_status_ids() {
        colored::control::set_override(true);
        let colors = ColorScheme::default();

        let lines = render(&[status(TEXT_HTML)], &options(&colors, true)).unwrap();

        assert_eq!(lines.len(), 1);
        let text_style = Style::parse(&colors.text);
        let expected_text = [
            text_style.paint("hello "),
            Style::parse(&colors.at).paint("@alice:alice123"),
            text_style.paint(" "),
            Style::parse(&colors.tag).paint("#tag#"),
            text_style.paint(" "),
            Style::parse(&colors.link).paint("http://x"),
        ]
        .concat();
        assert_eq!(
            lines[0],
            format!(
                "{} {}",
                bracketed(&colors, "Alice Wonder(u1):s1"),
                expected_text
            )
        );
    }

    #[test]
    fn time_tag_appends_relative_time() {
        colored::control::set_override(true);
        let colors = ColorScheme::default();
        let mut opts = options(&colors, false);
        opts.time_tag = true;

        let lines = render(&[status("hi")], &opts).unwrap();
        let stamp = Style::parse(&colors.timeago).paint("(5 minutes ago)");
        assert!(lines[0].ends_with(&format!(" {}", stamp)));
    }

    #[test]
    fn verbose_time_tag_is_absolute_local() {
        colored::control::set_override(true);
        let colors = ColorScheme::default();
        let mut opts = options(&colors, true);
        opts.time_tag = true;

        let lines = render(&[status("hi")], &opts).unwrap();
        let absolute = posted()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        let stamp = Style::parse(&colors.timeago).paint(&format!("({})", absolute));
        assert!(lines[0].ends_with(&format!(" {}", stamp)));
    }

    #[test]
    fn photo_tag_is_appended_after_text() {
        colored::control::set_override(true);
        let colors = ColorScheme::default();

        let mut with_photo = status("hi");
        with_photo.photo = Some(Photo {
            largeurl: "http://photo.fanfou.com/p.jpg@596w_1l.jpg".to_string(),
            imageurl: None,
            thumburl: None,
        });

        let lines = render(&[with_photo.clone()], &options(&colors, false)).unwrap();
        let tag = Style::parse(&colors.photo).paint("[图]");
        assert!(lines[0].ends_with(&format!(" {}", tag)));

        let mut linked = options(&colors, false);
        linked.hyperlinks = true;
        let lines = render(&[with_photo], &linked).unwrap();
        let tag = Style::parse(&colors.photo)
            .paint(&hyperlink("[图]", "http://photo.fanfou.com/p.jpg"));
        assert!(lines[0].ends_with(&format!(" {}", tag)));
    }

    #[test]
    fn search_highlights_use_the_highlight_style() {
        colored::control::set_override(true);
        let colors = ColorScheme::default();

        let lines = render(&[status("say <b>rust</b>")], &options(&colors, false)).unwrap();

        let text_style = Style::parse(&colors.text);
        let expected = [
            text_style.paint("say "),
            text_style
                .overlay(&Style::parse(&colors.highlight))
                .paint("rust"),
        ]
        .concat();
        assert_eq!(
            lines[0],
            format!("{} {}", bracketed(&colors, "Alice Wonder"), expected)
        );
    }

    #[test]
    fn missing_author_fails_fast() {
        let colors = ColorScheme::default();
        let mut broken = status("hi");
        broken.user = None;

        match render(&[broken], &options(&colors, false)) {
            Err(NofanError::MalformedStatus(id)) => assert_eq!(id, "s1"),
            other => panic!("expected MalformedStatus, got {:?}", other),
        }
    }

    #[test]
    fn rendering_is_deterministic_and_order_preserving() {
        colored::control::set_override(true);
        let colors = ColorScheme::default();
        let mut second = status("second");
        second.id = "s2".to_string();
        let batch = vec![status("first"), second];

        let once = render(&batch, &options(&colors, false)).unwrap();
        let twice = render(&batch, &options(&colors, false)).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
        assert!(once[0].contains("first"));
        assert!(once[1].contains("second"));
    }
}
