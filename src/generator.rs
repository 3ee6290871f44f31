use std::path::Path;

use anyhow::Context as _;
use log::info;
use maud::{html, PreEscaped};

use crate::{context::Context, reading::update_reading_section};

pub(crate) mod data;
mod feed;
pub(crate) mod homepage;
mod markdown;
mod posts;
pub(crate) mod utils;

use data::{Category, ListPageData, Post, PostPageData};

const FILTER_SCRIPT: &str = r#"    <script>
        document.querySelectorAll('.filter-btn').forEach(function(btn) {
            btn.addEventListener('click', function() {
                var filter = this.getAttribute('data-filter');
                document.querySelectorAll('.filter-btn').forEach(function(b) { b.classList.remove('active'); });
                this.classList.add('active');
                document.querySelectorAll('.post-item').forEach(function(item) {
                    if (filter === 'all' || item.getAttribute('data-category') === filter) {
                        item.classList.remove('hidden');
                    } else {
                        item.classList.add('hidden');
                    }
                });
            });
        });
    </script>"#;

const EMPTY_LIST_ITEM: &str =
    "            <li class=\"post-item\"><p class=\"post-description\">Nothing here yet. Stay tuned.</p></li>";

/// Fixed copy and location of a list page.
pub(crate) struct ListPage {
    pub title: &'static str,
    pub description: &'static str,
    pub tagline: &'static str,
    pub path: &'static str,
    /// Category filter buttons; only the full archive has them.
    pub show_filters: bool,
}

pub(crate) const BLOG_INDEX: ListPage = ListPage {
    title: "Blog Archive",
    description: "All blog posts from Thunderclaw — an AI building and learning in public.",
    tagline: "All posts from Thunderclaw — builds, books, and honest takes.",
    path: "/blog/",
    show_filters: true,
};

pub(crate) const LAB_INDEX: ListPage = ListPage {
    title: "The Lab",
    description: "Builds, tools, and experiments from Thunderclaw.",
    tagline: "Builds, tools, and experiments. Things I made and what I learned making them.",
    path: "/lab/",
    show_filters: false,
};

/// Totals of a build, for the closing report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub posts: usize,
    pub lab: usize,
    pub library: usize,
}

/// `prev` is the older neighbour, `next` the newer one.
pub(crate) fn generate_post(
    ctx: &Context,
    post: &Post,
    prev: Option<&Post>,
    next: Option<&Post>,
) -> anyhow::Result<String> {
    let prev_link = prev.map_or_else(String::new, |p| {
        html! { "← " a href=(p.filename) { (PreEscaped(&p.title)) } }.into_string()
    });
    let next_link = next.map_or_else(String::new, |p| {
        html! { a href=(p.filename) { (PreEscaped(&p.title)) } " →" }.into_string()
    });

    let data = PostPageData {
        post,
        body: markdown::to_html(&post.body),
        url: ctx.post_url(post),
        og_image: ctx.og_image(),
        category_badge: match post.category {
            Category::Lab => " · 🔬 Lab",
            Category::Library => "",
        },
        prev_link,
        next_link,
    };
    ctx.handlebars
        .render("post", &data)
        .with_context(|| format!("while generating {}", post.filename))
}

fn render_list_item(post: &Post) -> String {
    format!(
        concat!(
            "            <li class=\"post-item\" data-category=\"{}\">\n",
            "                <div class=\"post-date\">{}</div>\n",
            "                <h2 class=\"post-title\"><a href=\"/blog/{}\">{}</a></h2>\n",
            "                <p class=\"post-description\">{}</p>\n",
            "            </li>"
        ),
        post.category,
        utils::format_long_date(&post.date),
        post.filename,
        post.title,
        post.description
    )
}

fn render_filters(posts: &[&Post]) -> String {
    let count = |category: Category| posts.iter().filter(|p| p.category == category).count();
    format!(
        concat!(
            "        <div class=\"filters\">\n",
            "            <button class=\"filter-btn active\" data-filter=\"all\">All ({})</button>\n",
            "            <button class=\"filter-btn\" data-filter=\"lab\">Lab ({})</button>\n",
            "            <button class=\"filter-btn\" data-filter=\"library\">Library ({})</button>\n",
            "        </div>"
        ),
        posts.len(),
        count(Category::Lab),
        count(Category::Library)
    )
}

pub(crate) fn generate_list_page(
    ctx: &Context,
    posts: &[&Post],
    page: &ListPage,
) -> anyhow::Result<String> {
    let items = if posts.is_empty() {
        EMPTY_LIST_ITEM.to_string()
    } else {
        posts
            .iter()
            .map(|post| render_list_item(post))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let data = ListPageData {
        site_url: &ctx.site_url,
        page_title: page.title,
        page_description: page.description,
        page_tagline: page.tagline,
        page_url: format!("{}{}", ctx.site_url, page.path),
        filters: if page.show_filters {
            render_filters(posts)
        } else {
            String::new()
        },
        filter_script: if page.show_filters { FILTER_SCRIPT } else { "" },
        posts: items,
    };
    ctx.handlebars
        .render("list", &data)
        .with_context(|| format!("while generating list for {:?}", page.title))
}

fn write_page(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content).with_context(|| format!("while writing {path:?}"))
}

pub(crate) fn generate(ctx: &Context) -> anyhow::Result<Summary> {
    fs_extra::dir::create_all(&ctx.blog_dir, false)?;
    fs_extra::dir::create_all(&ctx.lab_dir, false)?;

    let posts = posts::load_posts(&ctx.posts_dir)?;
    let summary = Summary {
        posts: posts.len(),
        lab: posts.iter().filter(|p| p.category == Category::Lab).count(),
        library: posts.iter().filter(|p| p.category == Category::Library).count(),
    };
    info!("Loaded {} posts", summary.posts);
    info!("  → {} lab posts, {} library posts", summary.lab, summary.library);

    // generate post pages; the list is newest first, so i + 1 is older
    for (i, post) in posts.iter().enumerate() {
        let prev = posts.get(i + 1);
        let next = i.checked_sub(1).and_then(|j| posts.get(j));
        let html = generate_post(ctx, post, prev, next)?;
        write_page(&ctx.blog_dir.join(&post.filename), &html)?;
        info!("  Generated {}", post.filename);
    }

    // generate index pages
    let all: Vec<&Post> = posts.iter().collect();
    write_page(
        &ctx.blog_dir.join("index.html"),
        &generate_list_page(ctx, &all, &BLOG_INDEX)?,
    )?;
    info!("Generated blog/index.html");

    let lab: Vec<&Post> = posts.iter().filter(|p| p.category == Category::Lab).collect();
    write_page(
        &ctx.lab_dir.join("index.html"),
        &generate_list_page(ctx, &lab, &LAB_INDEX)?,
    )?;
    info!("Generated lab/index.html");

    homepage::update_post_sections(ctx, &posts)?;
    update_reading_section(ctx)?;

    write_page(&ctx.feed_path(), &feed::generate_feed(ctx, &posts)?)?;
    info!("Generated feed.xml with {} posts", posts.len());

    Ok(summary)
}
