//! Base-grammar phase: turns every markdown run into pulldown-cmark events.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use pulldown_cmark::{BrokenLink, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream};
use regex::Regex;

use crate::ast::{Document, NodeId, NodeKind};

/// `[^label]` left as text by a run that lacks the definition.
static FOOTNOTE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^([^\]\s]+)\]").unwrap());

/// Extensions enabled on top of `CommonMark`.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Link reference definitions gathered from the whole document, keyed by
/// normalized label.
type Definitions = HashMap<String, (String, String)>;

/// Parse the source of every `Markdown` node into its event stream.
///
/// Link reference definitions are collected from all runs first, so a
/// reference in one run resolves against a definition in another. Footnote
/// references are resolved the same way once every run is parsed.
pub fn parse_runs<'a>(doc: &mut Document<'a>, source: &'a str) {
    let runs: Vec<(NodeId, Cow<'a, str>)> = doc
        .walk(doc.root())
        .into_iter()
        .filter_map(|id| match &doc.node(id).kind {
            NodeKind::Markdown(block) => Some((id, block.text(source))),
            _ => None,
        })
        .collect();

    let options = parser_options();
    let definitions = collect_definitions(&runs, options);

    let parsed: Vec<(NodeId, Vec<Event<'a>>)> = runs
        .into_iter()
        .map(|(id, text)| {
            let events = match text {
                Cow::Borrowed(text) => parse_text(text, options, &definitions),
                Cow::Owned(text) => parse_text(&text, options, &definitions)
                    .into_iter()
                    .map(Event::into_static)
                    .collect(),
            };
            (id, events)
        })
        .collect();

    let footnotes: HashSet<String> = parsed
        .iter()
        .flat_map(|(_, events)| events)
        .filter_map(|event| match event {
            Event::Start(Tag::FootnoteDefinition(label)) => Some(label.to_string()),
            _ => None,
        })
        .collect();

    for (id, events) in parsed {
        let events = if footnotes.is_empty() {
            events
        } else {
            resolve_footnotes(events, &footnotes)
        };
        if let NodeKind::Markdown(block) = &mut doc.node_mut(id).kind {
            block.events = events;
        }
    }
}

fn parse_text<'t>(text: &'t str, options: Options, definitions: &Definitions) -> Vec<Event<'t>> {
    let callback = |link: BrokenLink<'t>| -> Option<(CowStr<'t>, CowStr<'t>)> {
        let (dest, title) = definitions.get(&normalize_label(&link.reference))?;
        Some((dest.clone().into(), title.clone().into()))
    };
    Parser::new_with_broken_link_callback(text, options, Some(callback)).collect()
}

/// Turn `[^label]` text into footnote references when `label` is defined in
/// some run. Code blocks are left alone.
fn resolve_footnotes<'a>(events: Vec<Event<'a>>, labels: &HashSet<String>) -> Vec<Event<'a>> {
    let mut resolved = Vec::with_capacity(events.len());
    let mut in_code = false;

    for event in TextMergeStream::new(events.into_iter()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code = true,
            Event::End(TagEnd::CodeBlock) => in_code = false,
            Event::Text(text) if !in_code && text.contains("[^") => {
                split_footnote_references(text, labels, &mut resolved);
                continue;
            }
            _ => {}
        }
        resolved.push(event);
    }
    resolved
}

fn split_footnote_references<'a>(
    text: CowStr<'a>,
    labels: &HashSet<String>,
    out: &mut Vec<Event<'a>>,
) {
    let mut last = 0;
    for caps in FOOTNOTE_REFERENCE.captures_iter(&text) {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !labels.contains(label.as_str()) {
            continue;
        }
        if whole.start() > last {
            out.push(Event::Text(text[last..whole.start()].to_owned().into()));
        }
        out.push(Event::FootnoteReference(label.as_str().to_owned().into()));
        last = whole.end();
    }

    if last == 0 {
        out.push(Event::Text(text));
    } else if last < text.len() {
        out.push(Event::Text(text[last..].to_owned().into()));
    }
}

fn collect_definitions(runs: &[(NodeId, Cow<'_, str>)], options: Options) -> Definitions {
    let mut definitions = Definitions::new();
    for (_, text) in runs {
        let parser = Parser::new_ext(text, options);
        for (label, def) in parser.reference_definitions().iter() {
            definitions.entry(normalize_label(label)).or_insert_with(|| {
                let title = def.title.as_deref().unwrap_or_default();
                (def.dest.to_string(), title.to_owned())
            });
        }
    }
    definitions
}

/// Case-fold a link label and collapse internal whitespace.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
