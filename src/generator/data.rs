use std::{fmt, str::FromStr};

use anyhow::bail;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Category {
    Lab,
    #[default]
    Library,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Lab => "lab",
            Category::Library => "library",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "lab" => Ok(Category::Lab),
            "library" => Ok(Category::Library),
            _ => bail!("unknown category: {s:?}"),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub(crate) struct Post {
    pub slug: String,
    pub filename: String,
    pub title: String,
    pub description: String,
    pub date: chrono::NaiveDate,
    pub tags: Vec<String>,
    pub category: Category,
    #[serde(skip_serializing)]
    pub body: String,
    pub reading_time: usize,
}

#[derive(Serialize, Debug)]
pub(super) struct PostPageData<'a> {
    pub post: &'a Post,
    pub body: String,
    pub url: String,
    pub og_image: String,
    pub category_badge: &'static str,
    pub prev_link: String,
    pub next_link: String,
}

#[derive(Serialize, Debug)]
pub(super) struct ListPageData<'a> {
    pub site_url: &'a str,
    pub page_title: &'a str,
    pub page_description: &'a str,
    pub page_tagline: &'a str,
    pub page_url: String,
    pub filters: String,
    pub filter_script: &'static str,
    pub posts: String,
}

#[derive(Serialize, Debug)]
pub(super) struct FeedData<'a> {
    pub site_title: &'a str,
    pub site_url: &'a str,
    pub site_description: &'a str,
    pub items: String,
}
