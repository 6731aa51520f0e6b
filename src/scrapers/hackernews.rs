//! Hacker News front page parser.
//!
//! This is the only module that knows the markup of the source site. It turns
//! a raw HTML document into an ordered list of [`Story`] records and nothing
//! else; fetching and caching live in [`super::source`] and [`super::cache`].
//!
//! # Markup
//!
//! Each entry on the front page is split across two table rows:
//!
//! ```text
//! <tr class="athing">  ... <span class="titleline"><a href="...">Title</a> ...</span>
//! <tr>                 ... <td class="subtext"> <span class="score">123 points</span>
//!                          ... <a href="item?id=1">45&nbsp;comments</a></td>
//! ```
//!
//! Title lines and subtext cells are paired in document order. Pairing stops
//! at the shorter of the two lists.

use crate::models::{MISSING_LINK, MISSING_TITLE, Story};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

static TITLE_LINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.titleline").expect("static selector"));
static SUBTEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.subtext").expect("static selector"));
static SCORE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.score").expect("static selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));

/// Why a single entry was skipped.
///
/// Only these kinds are swallowed by [`parse_front_page`]; everything else
/// about an entry falls back to a default value instead of failing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EntryError {
    #[error("subtext has no links")]
    NoSubtextLinks,
    #[error("comment link has no text")]
    EmptyCommentLabel,
}

/// Parse up to `limit` stories from a front page document.
///
/// Ranks are assigned from the entry's position on the page, before any
/// skipping, so a malformed entry leaves a gap rather than shifting the
/// ranks of the entries after it.
///
/// # Arguments
///
/// * `html` - The raw front page markup
/// * `limit` - Maximum number of entries to consider
/// * `base` - URL the page was fetched from, used to resolve relative links
///
/// # Returns
///
/// Stories in ascending rank order. May be shorter than `limit`, or empty if
/// the markup does not contain any entries.
#[instrument(level = "debug", skip(html, base), fields(bytes = html.len()))]
pub fn parse_front_page(html: &str, limit: usize, base: &Url) -> Vec<Story> {
    let document = Html::parse_document(html);
    let title_lines = document.select(&TITLE_LINE);
    let subtexts = document.select(&SUBTEXT);

    let mut stories = Vec::with_capacity(limit);
    for (i, (title_line, subtext)) in title_lines.zip(subtexts).take(limit).enumerate() {
        let rank = i + 1;
        match parse_entry(rank, title_line, subtext, base) {
            Ok(story) => stories.push(story),
            Err(e) => debug!(rank, error = %e, "Skipping malformed entry"),
        }
    }

    debug!(count = stories.len(), limit, "Parsed front page");
    stories
}

fn parse_entry(
    rank: usize,
    title_line: ElementRef<'_>,
    subtext: ElementRef<'_>,
    base: &Url,
) -> Result<Story, EntryError> {
    let (title, link) = match title_line.select(&ANCHOR).next() {
        Some(anchor) => {
            let title = element_text(anchor);
            let link = anchor
                .value()
                .attr("href")
                .map(|href| resolve_link(href, base))
                .unwrap_or_else(|| MISSING_LINK.to_string());
            (title, link)
        }
        None => (MISSING_TITLE.to_string(), MISSING_LINK.to_string()),
    };

    let points = subtext
        .select(&SCORE)
        .next()
        .map(|score| leading_number(&element_text(score)))
        .unwrap_or(0);

    let comment_link = subtext
        .select(&ANCHOR)
        .last()
        .ok_or(EntryError::NoSubtextLinks)?;
    let comments = comment_count(&element_text(comment_link))?;

    Ok(Story {
        rank,
        title,
        link,
        points,
        comments,
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Absolute links are kept verbatim; relative ones (`item?id=…`) are joined
/// onto the page URL.
fn resolve_link(href: &str, base: &Url) -> String {
    match Url::parse(href) {
        Ok(_) => href.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        Err(_) => href.to_string(),
    }
}

/// Leading whitespace-delimited token as an integer, or 0.
fn leading_number(text: &str) -> u32 {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

/// Comment count from the label of the last subtext link.
///
/// `"45 comments"` and `"1 comment"` count. `"discuss"` and anything else
/// without a purely numeric leading token is 0. So is a numeric token not
/// followed by a comment label: job postings have no comment link and their
/// last link is the age, e.g. `"3 hours ago"`.
fn comment_count(label: &str) -> Result<u32, EntryError> {
    let mut tokens = label.split_whitespace();
    let first = tokens.next().ok_or(EntryError::EmptyCommentLabel)?;

    if !first.chars().all(|c| c.is_ascii_digit()) {
        return Ok(0);
    }
    if !tokens.next().is_some_and(|t| t.starts_with("comment")) {
        return Ok(0);
    }
    Ok(first.parse().unwrap_or(0))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// One front page row pair, shaped like the live site.
    pub(crate) fn entry(title: &str, href: &str, score: Option<&str>, last_link: &str) -> String {
        let score = score
            .map(|s| format!(r#"<span class="score" id="score_1">{s}</span> by "#))
            .unwrap_or_default();
        format!(
            r#"<tr class="athing submission" id="1">
                 <td class="title"><span class="rank">1.</span></td>
                 <td class="title"><span class="titleline"><a href="{href}">{title}</a>
                   <span class="sitebit comhead"> (<a href="from?site=example.com"><span class="sitestr">example.com</span></a>)</span></span></td>
               </tr>
               <tr><td colspan="2"></td><td class="subtext"><span class="subline">
                 {score}<a href="user?id=pg" class="hnuser">pg</a>
                 <span class="age"><a href="item?id=1">3 hours ago</a></span> |
                 <a href="hide?id=1">hide</a> | <a href="item?id=1">{last_link}</a>
               </span></td></tr>
               <tr class="spacer" style="height:5px"></tr>"#
        )
    }

    pub(crate) fn page(entries: &[String]) -> String {
        format!(
            r#"<html><head><title>Hacker News</title></head><body><center><table id="hnmain">
               <tr><td><table border="0" cellpadding="0" cellspacing="0">{}</table></td></tr>
               </table></center></body></html>"#,
            entries.join("\n")
        )
    }

    pub(crate) fn numbered_page(count: usize) -> String {
        let entries: Vec<String> = (1..=count)
            .map(|i| {
                entry(
                    &format!("Story number {i}"),
                    &format!("https://example.com/{i}"),
                    Some(&format!("{} points", i * 10)),
                    &format!("{i}&nbsp;comments"),
                )
            })
            .collect();
        page(&entries)
    }

    fn base() -> Url {
        Url::parse("https://news.ycombinator.com/").unwrap()
    }

    #[test]
    fn test_parses_full_entry() {
        let html = page(&[entry(
            "Omegle founder shuts down site forever",
            "https://omegle.com/",
            Some("261 points"),
            "119&nbsp;comments",
        )]);
        let stories = parse_front_page(&html, 30, &base());
        assert_eq!(
            stories,
            vec![Story {
                rank: 1,
                title: "Omegle founder shuts down site forever".to_string(),
                link: "https://omegle.com/".to_string(),
                points: 261,
                comments: 119,
            }]
        );
    }

    #[test]
    fn test_limit_bounds_batch_and_ranks_ascend() {
        let html = numbered_page(40);
        for limit in [10, 25, 30] {
            let stories = parse_front_page(&html, limit, &base());
            assert_eq!(stories.len(), limit);
            let ranks: Vec<usize> = stories.iter().map(|s| s.rank).collect();
            assert_eq!(ranks, (1..=limit).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_limit_larger_than_page() {
        let stories = parse_front_page(&numbered_page(30), 100, &base());
        assert_eq!(stories.len(), 30);
        assert_eq!(stories.last().unwrap().rank, 30);
    }

    #[test]
    fn test_missing_score_yields_zero_points() {
        let html = page(&[entry("Ask HN: Anyone?", "item?id=9", None, "12&nbsp;comments")]);
        let stories = parse_front_page(&html, 10, &base());
        assert_eq!(stories[0].points, 0);
        assert_eq!(stories[0].comments, 12);
    }

    #[test]
    fn test_non_numeric_score_yields_zero_points() {
        let html = page(&[entry("Odd", "https://a.b/", Some("lots of points"), "2 comments")]);
        assert_eq!(parse_front_page(&html, 10, &base())[0].points, 0);
    }

    #[test]
    fn test_discuss_label_yields_zero_comments() {
        let html = page(&[entry("Fresh", "https://a.b/", Some("5 points"), "discuss")]);
        let stories = parse_front_page(&html, 10, &base());
        assert_eq!(stories[0].comments, 0);
        assert_eq!(stories[0].points, 5);
    }

    #[test]
    fn test_singular_comment_label() {
        let html = page(&[entry("One", "https://a.b/", Some("1 point"), "1&nbsp;comment")]);
        let stories = parse_front_page(&html, 10, &base());
        assert_eq!(stories[0].points, 1);
        assert_eq!(stories[0].comments, 1);
    }

    #[test]
    fn test_relative_link_is_resolved() {
        let html = page(&[entry("Ask HN: Rust?", "item?id=38190401", Some("3 points"), "discuss")]);
        let stories = parse_front_page(&html, 10, &base());
        assert_eq!(stories[0].link, "https://news.ycombinator.com/item?id=38190401");
    }

    #[test]
    fn test_missing_title_link_uses_defaults() {
        let html = page(&[r#"
            <tr class="athing"><td class="title"><span class="titleline">untitled</span></td></tr>
            <tr><td class="subtext"><span class="score">4 points</span>
                <a href="item?id=2">7 comments</a></td></tr>"#
            .to_string()]);
        let stories = parse_front_page(&html, 10, &base());
        assert_eq!(stories[0].title, MISSING_TITLE);
        assert_eq!(stories[0].link, MISSING_LINK);
        assert_eq!(stories[0].points, 4);
        assert_eq!(stories[0].comments, 7);
    }

    #[test]
    fn test_entry_without_subtext_links_is_skipped() {
        let broken = r#"
            <tr class="athing"><td><span class="titleline"><a href="https://x.y/">Broken</a></span></td></tr>
            <tr><td class="subtext"><span class="score">9 points</span></td></tr>"#
            .to_string();
        let html = page(&[
            entry("First", "https://a.b/1", Some("1 point"), "1 comment"),
            broken,
            entry("Third", "https://a.b/3", Some("3 points"), "3 comments"),
        ]);
        let stories = parse_front_page(&html, 10, &base());
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].rank, 1);
        assert_eq!(stories[1].rank, 3);
        assert_eq!(stories[1].title, "Third");
    }

    #[test]
    fn test_page_without_entries_is_empty() {
        let stories = parse_front_page("<html><body><p>Sorry.</p></body></html>", 30, &base());
        assert!(stories.is_empty());
    }

    #[test]
    fn test_comment_count_rules() {
        assert_eq!(comment_count("45 comments"), Ok(45));
        assert_eq!(comment_count("45\u{a0}comments"), Ok(45));
        assert_eq!(comment_count("discuss"), Ok(0));
        assert_eq!(comment_count("3 hours ago"), Ok(0));
        assert_eq!(comment_count("12abc comments"), Ok(0));
        assert_eq!(comment_count("45 foo"), Ok(0));
        assert_eq!(comment_count("45"), Ok(0));
        assert_eq!(comment_count("   "), Err(EntryError::EmptyCommentLabel));
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("261 points"), 261);
        assert_eq!(leading_number(""), 0);
        assert_eq!(leading_number("-4 points"), 0);
    }
}
