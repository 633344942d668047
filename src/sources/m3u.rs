//! M3U playlist parsing
//!
//! Turns playlist text into an ordered list of [`MediaEntry`] values. Two
//! listing shapes are understood:
//!
//! - flat listings, where each `#EXTINF:` line names the reference line that
//!   follows it (IPTV style lists and HLS media playlists alike)
//! - variant listings, where `#EXT-X-STREAM-INF:` lines introduce
//!   sub-playlist references (HLS master playlists)
//!
//! Variant references are only used when the document has no `#EXTINF:`
//! entries at all. Parsing never fails: anything unrecognised is skipped.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

use crate::models::MediaEntry;
use crate::utils::url::UrlUtils;

const EXTINF: &str = "#EXTINF:";
const STREAM_INF: &str = "#EXT-X-STREAM-INF:";
const EXTGRP: &str = "#EXTGRP:";

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z0-9_-]+)=(?:"([^"]*)"|([^",\s]*))"#)
            .expect("attribute pattern is a valid regex")
    })
}

/// Metadata collected from a directive while waiting for its reference line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PendingEntry {
    title: Option<String>,
    logo: Option<String>,
    group: Option<String>,
}

impl PendingEntry {
    /// `#EXTINF:<duration> key="value" ...,<title>`
    fn from_extinf(directive: &str) -> Self {
        let (attributes, title) = split_extinf(directive);
        let attributes = parse_attributes(attributes);

        Self {
            title: non_empty(title),
            logo: attributes.get("tvg-logo").and_then(|v| non_empty(v)),
            group: attributes.get("group-title").and_then(|v| non_empty(v)),
        }
    }

    /// `#EXT-X-STREAM-INF:BANDWIDTH=...,NAME="..."`
    fn from_stream_inf(directive: &str) -> Self {
        let attributes = parse_attributes(directive);

        Self {
            title: attributes.get("name").and_then(|v| non_empty(v)),
            logo: None,
            group: None,
        }
    }
}

/// Explicit parser state, folded over the playlist lines
#[derive(Debug)]
enum ParseState {
    AwaitingInfo,
    HaveTitle(PendingEntry),
    HaveVariant(PendingEntry),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Info(&'a str),
    Variant(&'a str),
    Group(&'a str),
    Directive,
    Reference(&'a str),
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(rest) = line.strip_prefix(EXTINF) {
            Line::Info(rest)
        } else if let Some(rest) = line.strip_prefix(STREAM_INF) {
            Line::Variant(rest)
        } else if let Some(rest) = line.strip_prefix(EXTGRP) {
            Line::Group(rest.trim())
        } else if line.starts_with('#') {
            Line::Directive
        } else {
            Line::Reference(line)
        }
    }
}

#[derive(Debug, Default)]
struct Collected {
    entries: Vec<(PendingEntry, String)>,
    variants: Vec<(PendingEntry, String)>,
}

fn step(state: ParseState, line: Line<'_>, collected: &mut Collected) -> ParseState {
    match (state, line) {
        (_, Line::Info(directive)) => ParseState::HaveTitle(PendingEntry::from_extinf(directive)),
        (_, Line::Variant(directive)) => {
            ParseState::HaveVariant(PendingEntry::from_stream_inf(directive))
        }
        (ParseState::HaveTitle(mut pending), Line::Group(group)) => {
            if pending.group.is_none() {
                pending.group = non_empty(group);
            }
            ParseState::HaveTitle(pending)
        }
        (ParseState::HaveTitle(pending), Line::Reference(reference)) => {
            collected.entries.push((pending, reference.to_string()));
            ParseState::AwaitingInfo
        }
        (ParseState::HaveVariant(pending), Line::Reference(reference)) => {
            collected.variants.push((pending, reference.to_string()));
            ParseState::AwaitingInfo
        }
        // A reference with nothing to pair it with is dropped
        (ParseState::AwaitingInfo, Line::Reference(_)) => ParseState::AwaitingInfo,
        (state, Line::Group(_) | Line::Directive) => state,
    }
}

/// Parse playlist text, keeping reference addresses exactly as written
pub fn parse(text: &str) -> Vec<MediaEntry> {
    parse_with_base(text, None)
}

/// Parse playlist text, resolving relative references against `base`
pub fn parse_with_base(text: &str, base: Option<&Url>) -> Vec<MediaEntry> {
    let mut collected = Collected::default();
    // `str::trim` keeps U+FEFF, which would turn a leading `#EXTINF:` into a reference
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    // A title still pending at end of input has no reference and is dropped
    let _unterminated = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Line::classify)
        .fold(ParseState::AwaitingInfo, |state, line| {
            step(state, line, &mut collected)
        });

    let from_variants = collected.entries.is_empty();
    let chosen = if from_variants {
        collected.variants
    } else {
        collected.entries
    };

    let entries: Vec<MediaEntry> = chosen
        .into_iter()
        .enumerate()
        .map(|(index, (pending, reference))| {
            let ordinal = index + 1;
            MediaEntry {
                id: MediaEntry::playlist_id(ordinal),
                title: pending
                    .title
                    .unwrap_or_else(|| MediaEntry::placeholder_title(ordinal)),
                url: UrlUtils::resolve_reference(base, &reference),
                logo: pending.logo,
                group: pending.group,
            }
        })
        .collect();

    debug!(
        "Parsed {} playlist entries{}",
        entries.len(),
        if from_variants && !entries.is_empty() {
            " from variant streams"
        } else {
            ""
        }
    );

    entries
}

/// Split `#EXTINF:` content at the first comma outside a quoted value
///
/// When a quote never closes, the first comma of any kind is used instead.
fn split_extinf(directive: &str) -> (&str, &str) {
    let mut in_quotes = false;
    for (index, ch) in directive.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return (&directive[..index], directive[index + 1..].trim()),
            _ => {}
        }
    }

    match directive.split_once(',') {
        Some((attributes, title)) if in_quotes => (attributes, title.trim()),
        _ => (directive, ""),
    }
}

/// Parse `key=value` / `key="value"` pairs; keys are lowercased
fn parse_attributes(text: &str) -> HashMap<String, String> {
    attribute_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
            Some((key, value))
        })
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(entries: &[MediaEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_pairs_info_and_reference_lines_in_order() {
        let text = "#EXTM3U\n\
                    #EXTINF:-1,First Movie\n\
                    http://example.com/first.mp4\n\
                    #EXTINF:-1,Second Movie\n\
                    http://example.com/second.mp4\n\
                    #EXTINF:-1,Third Movie\n\
                    http://example.com/third.mp4\n";

        let entries = parse(text);

        assert_eq!(ids(&entries), vec!["vod-1", "vod-2", "vod-3"]);
        assert_eq!(entries[0].title, "First Movie");
        assert_eq!(entries[1].url, "http://example.com/second.mp4");
        assert_eq!(entries[2].title, "Third Movie");
    }

    #[rstest]
    #[case::empty("")]
    #[case::only_header("#EXTM3U")]
    #[case::bare_reference("http://x/a.mp4")]
    #[case::unterminated_title("#EXTINF:0,Title")]
    #[case::title_then_comment("#EXTINF:0,Title\n# just a comment")]
    #[case::binary_noise("\u{0}\u{1}ftypmp42\u{0}")]
    fn test_yields_nothing(#[case] text: &str) {
        assert!(parse(text).is_empty());
    }

    #[rstest]
    #[case::empty_title("#EXTINF:-1,\nhttp://x/a.mp4")]
    #[case::whitespace_title("#EXTINF:-1,   \nhttp://x/a.mp4")]
    #[case::no_comma("#EXTINF:-1\nhttp://x/a.mp4")]
    fn test_missing_title_falls_back_to_placeholder(#[case] text: &str) {
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Video 1");
    }

    #[test]
    fn test_placeholder_uses_entry_ordinal() {
        let text = "#EXTINF:-1,Named\nhttp://x/1.mp4\n#EXTINF:-1,\nhttp://x/2.mp4";
        let entries = parse(text);
        assert_eq!(entries[1].title, "Video 2");
    }

    #[test]
    fn test_reference_without_title_is_dropped_and_does_not_consume_an_id() {
        let text = "http://x/orphan.mp4\n#EXTINF:-1,Kept\nhttp://x/kept.mp4\nhttp://x/orphan2.mp4";
        let entries = parse(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "vod-1");
        assert_eq!(entries[0].url, "http://x/kept.mp4");
    }

    #[test]
    fn test_later_info_line_replaces_pending_title() {
        let text = "#EXTINF:-1,Lost\n#EXTINF:-1,Winner\nhttp://x/a.mp4";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Winner");
    }

    #[test]
    fn test_directives_between_info_and_reference_are_ignored() {
        let text = "#EXTINF:-1,Movie\n#EXTVLCOPT:http-user-agent=Foo\n\n  http://x/a.mp4  \r\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "http://x/a.mp4");
    }

    #[test]
    fn test_title_is_text_after_first_unquoted_comma() {
        let text = "#EXTINF:-1 tvg-id=\"a\" tvg-logo=\"http://img/a.png\" group-title=\"Drama, Classic\", Casablanca, 1942 \nhttp://x/a.mp4";
        let entries = parse(text);

        assert_eq!(entries[0].title, "Casablanca, 1942");
        assert_eq!(entries[0].logo.as_deref(), Some("http://img/a.png"));
        assert_eq!(entries[0].group.as_deref(), Some("Drama, Classic"));
    }

    #[test]
    fn test_extgrp_sets_group_when_missing() {
        let text = "#EXTINF:-1,Movie\n#EXTGRP:Westerns\nhttp://x/a.mp4";
        assert_eq!(parse(text)[0].group.as_deref(), Some("Westerns"));
    }

    #[test]
    fn test_repeated_addresses_are_kept() {
        let text = "#EXTINF:-1,A\nhttp://x/same.mp4\n#EXTINF:-1,B\nhttp://x/same.mp4";
        assert_eq!(parse(text).len(), 2);
    }

    #[test]
    fn test_media_playlist_segments_become_entries() {
        let text = "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:9.009,\nsegment0.ts\n#EXTINF:9.009,\nsegment1.ts\n#EXT-X-ENDLIST";
        let entries = parse(text);

        assert_eq!(ids(&entries), vec!["vod-1", "vod-2"]);
        assert_eq!(entries[0].title, "Video 1");
        assert_eq!(entries[1].url, "segment1.ts");
    }

    #[test]
    fn test_variant_listing_used_when_no_info_entries() {
        let text = "#EXTM3U\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=1280000,RESOLUTION=1280x720,NAME=\"720p\"\n\
                    low/index.m3u8\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=2560000,CODECS=\"avc1.4d401f,mp4a.40.2\"\n\
                    high/index.m3u8\n";

        let entries = parse(text);

        assert_eq!(ids(&entries), vec!["vod-1", "vod-2"]);
        assert_eq!(entries[0].title, "720p");
        assert_eq!(entries[1].title, "Video 2");
        assert_eq!(entries[0].url, "low/index.m3u8");
    }

    #[test]
    fn test_info_entries_win_over_variants() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=1,NAME=\"v\"\nvariant.m3u8\n#EXTINF:-1,Movie\nhttp://x/a.mp4";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Movie");
    }

    #[test]
    fn test_relative_references_resolve_against_base() {
        let base = Url::parse("http://cdn.example.com/vod/master.m3u8").unwrap();
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=1\nlow/index.m3u8\n";

        let entries = parse_with_base(text, Some(&base));

        assert_eq!(entries[0].url, "http://cdn.example.com/vod/low/index.m3u8");
    }

    #[test]
    fn test_split_extinf() {
        assert_eq!(split_extinf("-1,Title"), ("-1", "Title"));
        assert_eq!(split_extinf("-1 a=\"x,y\",T"), ("-1 a=\"x,y\"", "T"));
        assert_eq!(split_extinf("-1"), ("-1", ""));
        assert_eq!(split_extinf("-1 a=\"x,y\""), ("-1 a=\"x,y\"", ""));
    }

    #[test]
    fn test_unbalanced_quote_falls_back_to_first_comma() {
        let entries = parse("#EXTINF:-1 tvg-name=\"x,The Movie\nhttp://x/a.mp4");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "The Movie");
    }

    #[test]
    fn test_leading_byte_order_mark_is_ignored() {
        let text = "\u{feff}#EXTINF:-1,First\nhttp://x/1.mp4\n#EXTINF:-1,Second\nhttp://x/2.mp4\n";

        let entries = parse(text);

        assert_eq!(ids(&entries), vec!["vod-1", "vod-2"]);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[1].title, "Second");
    }

    #[test]
    fn test_parse_attributes_lowercases_keys() {
        let attrs = parse_attributes("BANDWIDTH=100,NAME=\"Main Feed\",RESOLUTION=640x360");
        assert_eq!(attrs.get("bandwidth").map(String::as_str), Some("100"));
        assert_eq!(attrs.get("name").map(String::as_str), Some("Main Feed"));
        assert_eq!(attrs.get("resolution").map(String::as_str), Some("640x360"));
    }

    #[test]
    fn test_n_pairs_yield_n_sequential_ids() {
        let text: String = (1..=25)
            .map(|n| format!("#EXTINF:-1,Item {n}\nhttp://x/{n}.mp4\n"))
            .collect();

        let entries = parse(&text);

        assert_eq!(entries.len(), 25);
        for (index, entry) in entries.iter().enumerate() {
            assert_eq!(entry.id, format!("vod-{}", index + 1));
            assert_eq!(entry.title, format!("Item {}", index + 1));
        }
    }
}
