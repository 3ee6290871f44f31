use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, warn};

use super::{
    data::{Category, Post},
    utils::{parse_date, reading_time, sort_post},
};
use crate::metadata::{parse_frontmatter, Frontmatter};

const MARKDOWN_EXTENSION: &str = "md";

/// Builds a [`Post`] from its parsed frontmatter. Fails when the date is
/// missing or not `YYYY-MM-DD`.
pub(super) fn build_post(slug: &str, metadata: &Frontmatter, body: String) -> anyhow::Result<Post> {
    if metadata.is_empty() {
        warn!("{slug}: no frontmatter found");
    }
    let date = metadata.scalar("date").unwrap_or("");
    let date = parse_date(date).with_context(|| format!("invalid date {date:?}"))?;

    let category = match metadata.scalar("category") {
        None => Category::default(),
        Some(value) => value.parse::<Category>().unwrap_or_else(|e| {
            warn!("{slug}: {e}, treating it as {}", Category::default());
            Category::default()
        }),
    };

    Ok(Post {
        slug: slug.to_string(),
        filename: format!("{slug}.html"),
        title: metadata.scalar("title").unwrap_or("Untitled").to_string(),
        description: metadata.scalar("description").unwrap_or("").to_string(),
        date,
        tags: metadata.list("tags"),
        category,
        reading_time: reading_time(&body),
        body,
    })
}

fn preprocess_file(path: &Path) -> anyhow::Result<Post> {
    let slug = path
        .file_stem()
        .context("post file has no name")?
        .to_string_lossy()
        .to_string();
    // posts saved with CRLF line endings parse like LF ones
    let content = std::fs::read_to_string(path)?.replace("\r\n", "\n");
    let (metadata, body) = parse_frontmatter(&content);
    build_post(&slug, &metadata, body)
}

/// Loads every `*.md` file in `posts_dir`, in filename order, and returns the
/// posts newest first. A single bad post fails the whole load.
pub(crate) fn load_posts(posts_dir: &Path) -> anyhow::Result<Vec<Post>> {
    let mut paths: Vec<PathBuf> = vec![];
    for entry in std::fs::read_dir(posts_dir)
        .with_context(|| format!("while reading posts directory {posts_dir:?}"))?
    {
        let entry = entry?;
        let path = entry.path();
        if entry.metadata()?.is_file()
            && path.extension().is_some_and(|ext| ext == MARKDOWN_EXTENSION)
        {
            paths.push(path);
        }
    }
    paths.sort();

    let mut posts = vec![];
    for path in paths.iter() {
        debug!("Loading {path:?}...");
        posts.push(preprocess_file(path).with_context(|| format!("while preprocessing {path:?}"))?);
    }
    posts.sort_by(sort_post);

    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn decorates_posts_with_defaults() {
        let (metadata, body) = parse_frontmatter("---\ndate: 2024-03-01\n---\n# Title\n\nHello there.");
        let post = build_post("hello", &metadata, body).unwrap();
        assert_eq!(post.filename, "hello.html");
        assert_eq!(post.title, "Untitled");
        assert_eq!(post.description, "");
        assert_eq!(post.category, Category::Library);
        assert!(post.tags.is_empty());
        assert_eq!(post.body, "Hello there.");
        assert_eq!(post.reading_time, 1);
    }

    #[test]
    fn reads_category_and_tags() {
        let (metadata, body) =
            parse_frontmatter("---\ndate: 2024-03-01\ncategory: lab\ntags: [a, b]\n---\nx");
        let post = build_post("p", &metadata, body).unwrap();
        assert_eq!(post.category, Category::Lab);
        assert_eq!(post.tags, vec!["a", "b"]);
    }

    #[test]
    fn unknown_category_falls_back_to_library() {
        let (metadata, body) = parse_frontmatter("---\ndate: 2024-03-01\ncategory: kitchen\n---\nx");
        let post = build_post("p", &metadata, body).unwrap();
        assert_eq!(post.category, Category::Library);
    }

    #[test]
    fn missing_or_malformed_date_is_fatal() {
        let (metadata, body) = parse_frontmatter("---\ntitle: No date\n---\nx");
        assert!(build_post("p", &metadata, body).is_err());

        let (metadata, body) = parse_frontmatter("---\ndate: 01/03/2024\n---\nx");
        assert!(build_post("p", &metadata, body).is_err());
    }

    #[test]
    fn loads_and_sorts_markdown_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.md", "---\ntitle: B\ndate: 2024-01-02\n---\nb");
        write(dir.path(), "c.md", "---\ntitle: C\ndate: 2024-01-02\n---\nc");
        write(dir.path(), "a.md", "---\ntitle: A\ndate: 2024-01-01\n---\na");
        write(dir.path(), "notes.txt", "ignored");

        let posts = load_posts(dir.path()).unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["c", "b", "a"]);
    }

    #[test]
    fn one_bad_post_fails_the_load() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", "---\ndate: 2024-01-01\n---\nok");
        write(dir.path(), "bad.md", "---\ndate: someday\n---\nnope");

        let err = load_posts(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("bad.md"));
    }

    #[test]
    fn crlf_posts_parse_like_lf_posts() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "windows.md",
            "---\r\ntitle: T\r\ndate: 2024-03-01\r\n---\r\n# T\r\n\r\n::: callout\r\n**Warning**\r\n\r\nHot.\r\n:::\r\n",
        );

        let posts = load_posts(dir.path()).unwrap();
        assert_eq!(posts[0].title, "T");
        assert_eq!(posts[0].body, "::: callout\n**Warning**\n\nHot.\n:::");

        let html = crate::generator::markdown::to_html(&posts[0].body);
        assert_eq!(
            html,
            "<div class=\"callout\"><div class=\"callout-label\">Warning</div>\nHot.\n</div>\n"
        );
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        assert!(load_posts(&dir.path().join("nope")).is_err());
    }
}
