//! RSS 2.0 feed with an Atom self link.

use anyhow::Context as _;

use super::{
    data::{FeedData, Post},
    utils::format_rfc822,
};
use crate::context::Context;

fn render_item(ctx: &Context, post: &Post) -> String {
    let url = ctx.post_url(post);
    format!(
        concat!(
            "    <item>\n",
            "      <title>{}</title>\n",
            "      <link>{}</link>\n",
            "      <guid>{}</guid>\n",
            "      <pubDate>{}</pubDate>\n",
            "      <description>{}</description>\n",
            "      <category>{}</category>\n",
            "    </item>"
        ),
        post.title,
        url,
        url,
        format_rfc822(&post.date),
        post.description,
        post.category
    )
}

/// One `<item>` per post, in the order given.
pub(crate) fn generate_feed(ctx: &Context, posts: &[Post]) -> anyhow::Result<String> {
    let data = FeedData {
        site_title: &ctx.site_title,
        site_url: &ctx.site_url,
        site_description: &ctx.site_description,
        items: posts
            .iter()
            .map(|post| render_item(ctx, post))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    ctx.handlebars
        .render("feed", &data)
        .context("while generating feed.xml")
}
