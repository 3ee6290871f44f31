use std::{borrow::Cow, sync::LazyLock};

use maud::{html, PreEscaped};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex, RegexBuilder};

static CALLOUT: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"::: callout\n(.*?)\n:::")
        .dot_matches_new_line(true)
        .build()
        .unwrap()
});

// `**Label**` followed by a blank line
static CALLOUT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\A\*\*(.*?)\*\*\s*\n\n(.*)")
        .dot_matches_new_line(true)
        .build()
        .unwrap()
});

const DEFAULT_CALLOUT_LABEL: &str = "Note";

/// Tables, footnotes, definition lists and strikethrough on top of CommonMark.
fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_DEFINITION_LIST);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

fn render_callout(label: &str, text: &str) -> String {
    html! {
        div.callout {
            div.callout-label { (PreEscaped(label)) }
            (PreEscaped(format!("\n{text}\n")))
        }
    }
    .into()
}

/// Rewrites `::: callout` blocks into raw HTML boxes ahead of markdown
/// conversion. Each rendered box goes through `place`, whose return value
/// replaces the block.
pub(crate) fn process_callouts<'a, F>(markdown: &'a str, mut place: F) -> Cow<'a, str>
where
    F: FnMut(String) -> String,
{
    CALLOUT.replace_all(markdown, |caps: &Captures| {
        let content = caps.get(1).map_or("", |m| m.as_str());
        let callout = match CALLOUT_LABEL.captures(content) {
            Some(labelled) => render_callout(
                labelled.get(1).map_or("", |m| m.as_str()),
                labelled.get(2).map_or("", |m| m.as_str()),
            ),
            None => render_callout(DEFAULT_CALLOUT_LABEL, content),
        };
        place(callout)
    })
}

fn callout_placeholder(index: usize) -> String {
    format!("<!-- callout:{index} -->")
}

/// Swaps callout placeholders back for their HTML. A callout goes through
/// the parser as a single comment line, so blank lines inside it do not end
/// the raw block and its body is left as written.
#[derive(Default)]
struct Callouts {
    blocks: Vec<String>,
}

impl Callouts {
    fn stash(&mut self, callout: String) -> String {
        self.blocks.push(callout);
        callout_placeholder(self.blocks.len() - 1)
    }

    fn find(&self, html: &str) -> Option<&str> {
        (0..self.blocks.len())
            .find(|&i| html.trim() == callout_placeholder(i))
            .map(|i| self.blocks[i].as_str())
    }

    fn map<'a>(&self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::Html(html) => match self.find(&html) {
                Some(callout) => Event::Html(format!("{callout}\n").into()),
                None => Event::Html(html),
            },
            Event::InlineHtml(html) => match self.find(&html) {
                Some(callout) => Event::InlineHtml(callout.to_string().into()),
                None => Event::InlineHtml(html),
            },
            _ => event,
        }
    }
}

fn render_code_block(lang: Option<&str>, code: &str) -> String {
    let mut out: String = html! {
        div.codehilite {
            pre {
                span {}
                code class=[lang.map(|l| format!("language-{l}"))] { (code) }
            }
        }
    }
    .into();
    out.push('\n');
    out
}

/// Collects code block contents and emits them as a single highlighter-shaped
/// HTML event at the end of the block. Everything else passes through.
#[derive(Default)]
struct CodeBlocks {
    lang: Option<String>,
    code: Option<String>,
}

impl CodeBlocks {
    fn map<'a>(&mut self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                self.lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(|l| l.to_string())
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(String::new());
                Event::Text("".into())
            }
            Event::End(TagEnd::CodeBlock) => match self.code.take() {
                Some(code) => {
                    Event::Html(render_code_block(self.lang.take().as_deref(), &code).into())
                }
                None => event,
            },
            Event::Text(text) => match self.code.as_mut() {
                Some(code) => {
                    code.push_str(&text);
                    Event::Text("".into())
                }
                None => Event::Text(text),
            },
            _ => event,
        }
    }
}

/// Markdown body to an HTML fragment.
pub(crate) fn to_html(markdown: &str) -> String {
    let mut callouts = Callouts::default();
    let markdown = process_callouts(markdown, |callout| callouts.stash(callout));
    let mut code_blocks = CodeBlocks::default();
    let parser = Parser::new_ext(&markdown, options())
        .map(|event| callouts.map(event))
        .map(|event| code_blocks.map(event));

    let mut body_html = String::new();
    pulldown_cmark::html::push_html(&mut body_html, parser);
    body_html
}
