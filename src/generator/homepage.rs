//! Refreshes sections of the hand-written homepage.
//!
//! A section is found by an explicit marker pair,
//! `<!-- section:NAME -->` ... `<!-- /section:NAME -->`, whose contents are
//! replaced and whose markers are kept. Pages without markers fall back to
//! matching `<section>` blocks by their `<h2>` heading text. A section that
//! cannot be found leaves the page as it is.

use std::{borrow::Cow, sync::OnceLock};

use anyhow::Context as _;
use log::{debug, info};
use regex::{Captures, NoExpand, Regex, RegexBuilder};

use super::{
    data::{Category, Post},
    utils::format_short_date,
};
use crate::context::Context;

pub(crate) struct Section {
    pub name: &'static str,
    pub heading: &'static str,
    patterns: OnceLock<SectionPatterns>,
}

struct SectionPatterns {
    markers: Regex,
    heading: Regex,
}

impl Section {
    const fn new(name: &'static str, heading: &'static str) -> Self {
        Section {
            name,
            heading,
            patterns: OnceLock::new(),
        }
    }

    /// Compiled on first use and kept for the rest of the run.
    fn patterns(&self) -> &SectionPatterns {
        self.patterns.get_or_init(|| {
            let name = regex::escape(self.name);
            SectionPatterns {
                markers: RegexBuilder::new(&format!(
                    r"(<!-- section:{name} -->).*?(<!-- /section:{name} -->)"
                ))
                .dot_matches_new_line(true)
                .build()
                .unwrap(),
                heading: RegexBuilder::new(&format!(
                    r"<section>\s*<h2>{}</h2>.*?</section>",
                    regex::escape(self.heading)
                ))
                .dot_matches_new_line(true)
                .build()
                .unwrap(),
            }
        })
    }
}

pub(crate) static LAB_SECTION: Section = Section::new("lab", "🔬 Latest from the Lab");

pub(crate) static LIBRARY_SECTION: Section = Section::new("library", "📚 From the Library");

pub(crate) static READING_SECTION: Section = Section::new("reading", "Currently Reading");

/// Replaces `section` in `page` with `markup`. Borrows `page` back when the
/// section is not found.
pub(crate) fn splice<'a>(page: &'a str, section: &Section, markup: &str) -> Cow<'a, str> {
    let patterns = section.patterns();
    if patterns.markers.is_match(page) {
        return patterns.markers.replace_all(page, |caps: &Captures| {
            format!("{}\n        {markup}\n        {}", &caps[1], &caps[2])
        });
    }

    let spliced = patterns.heading.replace_all(page, NoExpand(markup));
    if matches!(spliced, Cow::Borrowed(_)) {
        debug!("section {:?} not found in homepage", section.name);
    }
    spliced
}

fn render_post_links(posts: &[&Post]) -> String {
    posts
        .iter()
        .map(|post| {
            format!(
                concat!(
                    "                <li><a href=\"/blog/{}\">",
                    "<span class=\"title\">{}</span>",
                    "<span class=\"date\">{}</span></a></li>"
                ),
                post.filename,
                post.title,
                format_short_date(&post.date)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_section(heading: &str, items: &str, view_all: &str) -> String {
    format!(
        concat!(
            "<section>\n",
            "            <h2>{}</h2>\n",
            "            <ul class=\"post-list\">\n",
            "{}\n",
            "            </ul>\n",
            "            {}\n",
            "        </section>"
        ),
        heading, items, view_all
    )
}

pub(super) fn render_lab_section(lab_posts: &[&Post], limit: usize) -> String {
    let shown = &lab_posts[..lab_posts.len().min(limit)];
    let items = if shown.is_empty() {
        "                <li class=\"empty-note\">First lab post coming soon.</li>".to_string()
    } else {
        render_post_links(shown)
    };
    let view_all = if lab_posts.len() > limit {
        format!(
            "<a href=\"/lab/\" class=\"view-all\">View all {} lab posts →</a>",
            lab_posts.len()
        )
    } else {
        "<a href=\"/lab/\" class=\"view-all\">View all lab posts →</a>".to_string()
    };
    render_section(LAB_SECTION.heading, &items, &view_all)
}

pub(super) fn render_library_section(library_posts: &[&Post], limit: usize) -> String {
    let shown = &library_posts[..library_posts.len().min(limit)];
    let view_all = format!(
        "<a href=\"/blog/\" class=\"view-all\">View all {} posts →</a>",
        library_posts.len()
    );
    render_section(LIBRARY_SECTION.heading, &render_post_links(shown), &view_all)
}

/// Reads the homepage, applies `edit`, and writes it back only when the
/// content changed.
pub(crate) fn update_homepage<F>(ctx: &Context, edit: F) -> anyhow::Result<()>
where
    F: FnOnce(&str) -> anyhow::Result<String>,
{
    let path = ctx.homepage_path();
    let content =
        std::fs::read_to_string(&path).with_context(|| format!("while reading {path:?}"))?;
    let updated = edit(&content)?;
    if updated != content {
        std::fs::write(&path, updated).with_context(|| format!("while writing {path:?}"))?;
    }
    Ok(())
}

/// Refreshes the lab and library sections with the newest posts.
pub(crate) fn update_post_sections(ctx: &Context, posts: &[Post]) -> anyhow::Result<()> {
    let lab_posts: Vec<&Post> = posts.iter().filter(|p| p.category == Category::Lab).collect();
    let library_posts: Vec<&Post> = posts
        .iter()
        .filter(|p| p.category == Category::Library)
        .collect();

    update_homepage(ctx, |content| {
        let lab = render_lab_section(&lab_posts, ctx.homepage_limit);
        let library = render_library_section(&library_posts, ctx.homepage_limit);
        let content = splice(content, &LAB_SECTION, &lab);
        let content = splice(&content, &LIBRARY_SECTION, &library);
        Ok(content.into_owned())
    })?;

    info!(
        "Updated index.html — Lab: {} shown ({} total), Library: {} shown ({} total)",
        lab_posts.len().min(ctx.homepage_limit),
        lab_posts.len(),
        library_posts.len().min(ctx.homepage_limit),
        library_posts.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::utils::parse_date;

    fn post(slug: &str, date: &str, category: Category) -> Post {
        Post {
            slug: slug.to_string(),
            filename: format!("{slug}.html"),
            title: slug.to_uppercase(),
            description: String::new(),
            date: parse_date(date).unwrap(),
            tags: vec![],
            category,
            body: String::new(),
            reading_time: 1,
        }
    }

    const PAGE: &str = "<main>\n        <section>\n            <h2>🔬 Latest from the Lab</h2>\n            <p>old</p>\n        </section>\n</main>\n";

    #[test]
    fn splices_by_heading() {
        let out = splice(PAGE, &LAB_SECTION, "<section>new</section>");
        assert_eq!(out, "<main>\n        <section>new</section>\n</main>\n");
    }

    #[test]
    fn replacement_text_is_literal() {
        let out = splice(PAGE, &LAB_SECTION, "<section>$1 costs $5</section>");
        assert!(out.contains("<section>$1 costs $5</section>"));
    }

    #[test]
    fn splices_between_markers() {
        let page = "<main>\n<!-- section:lab -->\nanything\n<!-- /section:lab -->\n</main>";
        let out = splice(page, &LAB_SECTION, "<section>new</section>");
        assert_eq!(
            out,
            "<main>\n<!-- section:lab -->\n        <section>new</section>\n        <!-- /section:lab -->\n</main>"
        );
        // a second pass is stable
        let again = splice(&out, &LAB_SECTION, "<section>new</section>");
        assert_eq!(again, out);
    }

    #[test]
    fn markers_win_over_headings() {
        let page = format!("{PAGE}<!-- section:lab --><!-- /section:lab -->");
        let out = splice(&page, &LAB_SECTION, "NEW");
        assert!(out.contains("<p>old</p>"));
        assert!(out.contains("<!-- section:lab -->\n        NEW\n        <!-- /section:lab -->"));
    }

    #[test]
    fn section_patterns_are_compiled_once() {
        splice(PAGE, &READING_SECTION, "x");
        assert!(std::ptr::eq(READING_SECTION.patterns(), READING_SECTION.patterns()));
    }

    #[test]
    fn missing_section_is_a_no_op() {
        let out = splice(PAGE, &LIBRARY_SECTION, "<section>new</section>");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, PAGE);
    }

    #[test]
    fn lab_section_lists_latest_posts() {
        let posts: Vec<Post> = (1..=6)
            .map(|d| post(&format!("p{d}"), &format!("2024-01-0{d}"), Category::Lab))
            .rev()
            .collect();
        let refs: Vec<&Post> = posts.iter().collect();
        let out = render_lab_section(&refs, 5);
        assert_eq!(out.matches("<li>").count(), 5);
        assert!(out.contains("<li><a href=\"/blog/p6.html\"><span class=\"title\">P6</span><span class=\"date\">Jan 06</span></a></li>"));
        assert!(!out.contains("p1.html"));
        assert!(out.contains("View all 6 lab posts →"));
    }

    #[test]
    fn empty_lab_section_has_placeholder() {
        let out = render_lab_section(&[], 5);
        assert!(out.contains("<li class=\"empty-note\">First lab post coming soon.</li>"));
        assert!(out.contains("View all lab posts →"));
    }

    #[test]
    fn library_section_always_shows_total() {
        let posts = [post("a", "2024-01-01", Category::Library)];
        let refs: Vec<&Post> = posts.iter().collect();
        let out = render_library_section(&refs, 3);
        assert!(out.starts_with("<section>\n            <h2>📚 From the Library</h2>\n"));
        assert!(out.contains("View all 1 posts →"));
        assert!(out.ends_with("</a>\n        </section>"));
    }
}
