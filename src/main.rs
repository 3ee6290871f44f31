use std::path::PathBuf;

use anyhow::bail;
use clap::{command, value_parser, Arg, ArgAction};
use context::Context;
use log::info;

mod context;
mod generator;
mod metadata;
mod reading;
mod renderer;
mod sitemap;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .init();

    let matches = command!()
        .args([
            Arg::new("root_dir")
                .help("Site root holding posts/, index.html and reading.json. Pages are written here.")
                .value_parser(value_parser!(PathBuf))
                .default_value("."),
            Arg::new("site_url")
                .long("site-url")
                .help("Absolute URL the site is served from [env: SITE_URL]"),
            Arg::new("homepage_limit")
                .long("homepage-limit")
                .help("Posts listed per category on the homepage")
                .value_parser(value_parser!(usize))
                .default_value("5"),
            Arg::new("skip_sitemap")
                .long("skip-sitemap")
                .help("Do not regenerate sitemap.xml")
                .action(ArgAction::SetTrue),
        ])
        .get_matches();

    let root_dir = matches
        .get_one::<PathBuf>("root_dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let site_url = matches
        .get_one::<String>("site_url")
        .cloned()
        .or_else(|| std::env::var("SITE_URL").ok())
        .unwrap_or_else(|| context::DEFAULT_SITE_URL.to_string());
    let homepage_limit = matches
        .get_one::<usize>("homepage_limit")
        .copied()
        .unwrap_or(context::DEFAULT_HOMEPAGE_LIMIT);

    let ctx = Context::new(&root_dir, &site_url, homepage_limit)?;
    if !ctx.posts_dir.is_dir() {
        bail!("{:?} must be a directory.", ctx.posts_dir);
    }

    info!("Building Thunderclaw blog...");
    let summary = generator::generate(&ctx)?;

    if !matches.get_flag("skip_sitemap") {
        sitemap::generate_sitemap(&ctx)?;
    }

    info!("Build complete!");
    info!(
        "   {} posts generated ({} lab, {} library)",
        summary.posts, summary.lab, summary.library
    );
    info!("   Blog archive: /blog/");
    info!("   Lab index: /lab/");
    info!("   RSS feed: /feed.xml");

    Ok(())
}
