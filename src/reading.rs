use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use log::{info, warn};
use maud::{html, Markup, PreEscaped};
use serde::Deserialize;

use crate::{
    context::Context,
    generator::homepage::{splice, update_homepage, READING_SECTION},
};

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Book {
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub active: bool,
}

/// `None` when there is no reading list to load.
pub(crate) fn load_books(path: &Path) -> anyhow::Result<Option<Vec<Book>>> {
    if !path.exists() {
        warn!("{path:?} not found, skipping reading section update");
        return Ok(None);
    }
    let fd = File::open(path)?;
    let reader = BufReader::new(fd);
    let books: Vec<Book> = serde_json::from_reader(reader).with_context(|| format!("while parsing {path:?}"))?;
    Ok(Some(books))
}

fn render_status(book: &Book) -> Markup {
    let status = PreEscaped(book.status.as_str());
    if book.active {
        html! { span.status.active { "📖 " (status) } }
    } else if book.status == "complete" {
        html! { span.status { "✅ " (status) } }
    } else {
        html! { span.status { (status) } }
    }
}

pub(crate) fn render_reading_section(books: &[Book]) -> String {
    let items = books
        .iter()
        .map(|book| {
            format!(
                concat!(
                    "                <li>\n",
                    "                    <span class=\"title\">{}</span>\n",
                    "                    {}\n",
                    "                </li>"
                ),
                book.title,
                render_status(book).into_string()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        concat!(
            "<section>\n",
            "            <h2>{}</h2>\n",
            "            <ul class=\"reading-list\">\n",
            "{}\n",
            "            </ul>\n",
            "        </section>"
        ),
        READING_SECTION.heading, items
    )
}

/// Refreshes the "Currently Reading" homepage section from `reading.json`.
/// A missing reading list is not an error.
pub(crate) fn update_reading_section(ctx: &Context) -> anyhow::Result<()> {
    let Some(books) = load_books(&ctx.reading_list_path())? else {
        return Ok(());
    };

    let section = render_reading_section(&books);
    update_homepage(ctx, |content| {
        Ok(splice(content, &READING_SECTION, &section).into_owned())
    })?;

    info!("Updated reading section with {} books", books.len());
    Ok(())
}
