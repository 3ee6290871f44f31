use anyhow::Context;
use chrono::NaiveDate;
use handlebars::{handlebars_helper, Handlebars};

use crate::generator::utils::{format_long_date, parse_date};

// dates reach templates as ISO strings through chrono's serde impl
handlebars_helper!(long_date: |date: str| {
    parse_date(date)
        .map(|d: NaiveDate| format_long_date(&d))
        .unwrap_or_else(|_| date.to_string())
});

pub(crate) fn generate_renderer() -> anyhow::Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    // pages embed pre-rendered markup, so nothing may be escaped twice
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_helper("long_date", Box::new(long_date));
    handlebars
        .register_template_string("post", include_str!("../template/post.hbs"))
        .context("post.hbs")?;
    handlebars
        .register_template_string("list", include_str!("../template/list.hbs"))
        .context("list.hbs")?;
    handlebars
        .register_template_string("feed", include_str!("../template/feed.hbs"))
        .context("feed.hbs")?;

    Ok(handlebars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn long_date_helper_formats_iso_dates() {
        let mut handlebars = generate_renderer().unwrap();
        handlebars
            .register_template_string("t", "{{long_date date}}")
            .unwrap();
        let out = handlebars.render("t", &json!({"date": "2024-03-01"})).unwrap();
        assert_eq!(out, "March 01, 2024");
    }

    #[test]
    fn markup_is_not_escaped() {
        let mut handlebars = generate_renderer().unwrap();
        handlebars.register_template_string("t", "{{body}}").unwrap();
        let out = handlebars.render("t", &json!({"body": "<p>a & b</p>"})).unwrap();
        assert_eq!(out, "<p>a & b</p>");
    }
}
