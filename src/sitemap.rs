//! `sitemap.xml` over the pages a build leaves on disk.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::Context as _;
use chrono::{DateTime, Local, NaiveDate};
use log::{debug, info};
use regex::Regex;

use crate::context::Context;

// the visible date written by the post template
static POST_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<p class="meta">([A-Za-z]+ \d+, \d{4})"#).unwrap());

const HOME_PRIORITY: &str = "1.0";
const BLOG_INDEX_PRIORITY: &str = "0.9";
const ABOUT_PRIORITY: &str = "0.8";
const POST_PRIORITY: &str = "0.7";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SitemapUrl {
    pub loc: String,
    pub lastmod: String,
    pub priority: &'static str,
}

fn file_mtime(path: &Path) -> anyhow::Result<String> {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("while reading mtime of {path:?}"))?;
    Ok(DateTime::<Local>::from(modified).format("%Y-%m-%d").to_string())
}

/// Publication date of a rendered post, read back from its meta line.
/// Falls back to the file's mtime.
fn post_lastmod(path: &Path) -> anyhow::Result<String> {
    let extracted = std::fs::read_to_string(path).ok().and_then(|html| {
        let caps = POST_DATE.captures(&html)?;
        NaiveDate::parse_from_str(&caps[1], "%B %d, %Y").ok()
    });
    match extracted {
        Some(date) => Ok(date.format("%Y-%m-%d").to_string()),
        None => {
            debug!("no date found in {path:?}, using its mtime");
            file_mtime(path)
        }
    }
}

fn post_pages(blog_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !blog_dir.is_dir() {
        return Ok(vec![]);
    }
    let mut pages = vec![];
    for entry in std::fs::read_dir(blog_dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.metadata()?.is_file()
            && path.extension().is_some_and(|ext| ext == "html")
            && entry.file_name() != "index.html"
        {
            pages.push(path);
        }
    }
    pages.sort();
    Ok(pages)
}

pub(crate) fn collect_urls(ctx: &Context) -> anyhow::Result<Vec<SitemapUrl>> {
    let mut urls = vec![];

    let fixed_pages = [
        (ctx.homepage_path(), "/".to_string(), HOME_PRIORITY),
        (ctx.about_path(), "/about.html".to_string(), ABOUT_PRIORITY),
        (ctx.blog_dir.join("index.html"), "/blog/".to_string(), BLOG_INDEX_PRIORITY),
    ];
    for (path, loc, priority) in fixed_pages {
        if path.exists() {
            urls.push(SitemapUrl {
                loc: format!("{}{loc}", ctx.site_url),
                lastmod: file_mtime(&path)?,
                priority,
            });
        }
    }

    for path in post_pages(&ctx.blog_dir)? {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        urls.push(SitemapUrl {
            loc: format!("{}/blog/{name}", ctx.site_url),
            lastmod: post_lastmod(&path)?,
            priority: POST_PRIORITY,
        });
    }

    Ok(urls)
}

pub(crate) fn render_sitemap(urls: &[SitemapUrl]) -> String {
    let mut lines = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#.to_string(),
    ];
    for url in urls {
        lines.push("  <url>".to_string());
        lines.push(format!("    <loc>{}</loc>", url.loc));
        lines.push(format!("    <lastmod>{}</lastmod>", url.lastmod));
        lines.push(format!("    <priority>{}</priority>", url.priority));
        lines.push("  </url>".to_string());
    }
    lines.push("</urlset>".to_string());
    lines.join("\n")
}

/// Writes `sitemap.xml` and returns the number of URLs in it.
pub(crate) fn generate_sitemap(ctx: &Context) -> anyhow::Result<usize> {
    let urls = collect_urls(ctx)?;
    let path = ctx.sitemap_path();
    std::fs::write(&path, render_sitemap(&urls)).with_context(|| format!("while writing {path:?}"))?;
    info!("Generated sitemap.xml with {} URLs", urls.len());
    Ok(urls.len())
}
