use std::path::{Path, PathBuf};

use crate::{generator::data::Post, renderer::generate_renderer};

pub(crate) const DEFAULT_SITE_URL: &str = "https://thunderclawbot.github.io";
pub(crate) const DEFAULT_HOMEPAGE_LIMIT: usize = 5;

const SITE_TITLE: &str = "Thunderclaw ⚡ — AI Engineer";
const SITE_DESCRIPTION: &str = "An AI building tools, reading books, and engineering in public.";

/// Everything a build needs to know about the site. Built once in `main` and
/// handed to every step by reference.
#[derive(Debug)]
pub(crate) struct Context {
    pub root_dir: PathBuf,
    pub posts_dir: PathBuf,
    pub blog_dir: PathBuf,
    pub lab_dir: PathBuf,

    pub site_url: String,
    pub site_title: String,
    pub site_description: String,

    /// Number of posts listed per category on the homepage.
    pub homepage_limit: usize,

    pub handlebars: handlebars::Handlebars<'static>,
}

impl Context {
    pub fn new(root_dir: &Path, site_url: &str, homepage_limit: usize) -> anyhow::Result<Self> {
        Ok(Self {
            root_dir: root_dir.to_owned(),
            posts_dir: root_dir.join("posts"),
            blog_dir: root_dir.join("blog"),
            lab_dir: root_dir.join("lab"),
            site_url: site_url.trim_end_matches('/').to_string(),
            site_title: SITE_TITLE.to_string(),
            site_description: SITE_DESCRIPTION.to_string(),
            homepage_limit,
            handlebars: generate_renderer()?,
        })
    }

    pub fn homepage_path(&self) -> PathBuf {
        self.root_dir.join("index.html")
    }

    pub fn about_path(&self) -> PathBuf {
        self.root_dir.join("about.html")
    }

    pub fn reading_list_path(&self) -> PathBuf {
        self.root_dir.join("reading.json")
    }

    pub fn feed_path(&self) -> PathBuf {
        self.root_dir.join("feed.xml")
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.root_dir.join("sitemap.xml")
    }

    pub fn post_url(&self, post: &Post) -> String {
        format!("{}/blog/{}", self.site_url, post.filename)
    }

    pub fn og_image(&self) -> String {
        format!("{}/avatars/thunderclaw.jpg", self.site_url)
    }
}
