use mdn_markdown::{
    FrontmatterError, Markdown, MarkdownError, MarkdownOptions, ParseContext, UrlRewrite,
    get_frontmatter, to_html_email, to_html_page,
};
use pretty_assertions::assert_eq;

fn without_ids() -> Markdown {
    Markdown::new(&MarkdownOptions {
        heading_ids: false,
        ..MarkdownOptions::default()
    })
    .unwrap()
}

#[test]
fn frontmatter_is_extracted_and_hidden() {
    let markdown = "---\ntitle: Hello\ntags:\n  - a\n  - b\n---\n# Body\n";
    let conversion = Markdown::default()
        .convert(markdown, &UrlRewrite::page("https://example.com"))
        .unwrap();

    let frontmatter = conversion.frontmatter().unwrap();
    assert_eq!(frontmatter.source, "title: Hello\ntags:\n  - a\n  - b");
    assert_eq!(frontmatter.get_str("title"), Some("Hello"));
    assert_eq!(
        frontmatter.data["tags"],
        serde_json::json!(["a", "b"])
    );
    assert_eq!(conversion.html, "<h1 id=\"body\">Body</h1>\n");
}

#[test]
fn missing_frontmatter_renders_normally() {
    let engine = Markdown::default();
    let conversion = engine
        .convert("# Title\n\ntext", &UrlRewrite::page(""))
        .unwrap();

    assert_eq!(conversion.frontmatter(), Err(FrontmatterError::Missing));
    assert_eq!(
        conversion.html,
        "<h1 id=\"title\">Title</h1>\n<p>text</p>\n"
    );
}

#[test]
fn invalid_frontmatter_fails_open() {
    let markdown = "---\ntitle: [unclosed\n---\nBody";
    let conversion = Markdown::default()
        .convert(markdown, &UrlRewrite::page(""))
        .unwrap();

    assert!(matches!(
        conversion.frontmatter(),
        Err(FrontmatterError::Parse(_))
    ));
    assert_eq!(conversion.html, "<p>title: [unclosed</p>\n<p>Body</p>\n");
}

#[test]
fn frontmatter_only_at_first_line() {
    let engine = Markdown::default();
    assert_eq!(
        engine.parse_frontmatter("\n---\ntitle: x\n---\n"),
        Err(FrontmatterError::Missing)
    );
}

#[test]
fn comment_is_suppressed() {
    assert_eq!(
        without_ids().to_html_page("<!-- c -->\n# Hello", "").unwrap(),
        "<h1>Hello</h1>\n"
    );
}

#[test]
fn multi_line_comment_is_suppressed() {
    let markdown = "Before\n\n<!--\nsecret\nline\n-->\n\nAfter\n";
    let html = to_html_page(markdown, "").unwrap();
    assert_eq!(html, "<p>Before</p>\n<p>After</p>\n");
    assert!(!html.contains("secret"));
}

#[test]
fn unterminated_comment_consumes_rest() {
    assert_eq!(
        to_html_page("Text\n\n<!-- never closed\nmore", "").unwrap(),
        "<p>Text</p>\n"
    );
}

#[test]
fn page_rewrites_images_only() {
    let html = to_html_page("[a](/b)\n![a](/c)", "https://example.com").unwrap();
    assert!(html.contains(r#"src="https://example.com/c""#));
    assert!(html.contains(r#"href="/b""#));
}

#[test]
fn email_rewrites_links_and_images() {
    let html = to_html_email("https://example.com", "[a](/b)\n![a](/c)").unwrap();
    assert!(html.contains(r#"src="https://example.com/c""#));
    assert!(html.contains(r#"href="https://example.com/b""#));
}

#[test]
fn absolute_destinations_are_not_prefixed_twice() {
    let html = to_html_email(
        "https://example.com",
        "[a](https://example.com/b) ![i](https://example.com/c)",
    )
    .unwrap();
    assert!(html.contains(r#"href="https://example.com/b""#));
    assert!(html.contains(r#"src="https://example.com/c""#));
    assert!(!html.contains("https://example.comhttps://"));
}

#[test]
fn mismatched_snippet_close_keeps_accumulating() {
    let engine = Markdown::default();
    let source = "{{< a >}} text {{< /b >}}";
    let mut ctx = ParseContext::new();
    let doc = engine.parse(source, &mut ctx);

    let dump = doc.dump(source);
    assert!(dump.starts_with("Document\n  Snippet name=\"a\"\n    Markdown"));
    assert_eq!(doc.children(doc.root()).len(), 1);
    assert_eq!(get_frontmatter(&ctx), Err(FrontmatterError::Missing));
}

#[test]
fn matching_snippet_close_ends_container() {
    let engine = Markdown::default();
    let source = "{{< a >}}\nx\n{{< /a >}}\nafter";
    let mut ctx = ParseContext::new();
    let doc = engine.parse(source, &mut ctx);

    assert_eq!(
        doc.dump(source),
        "Document\n  Snippet name=\"a\"\n    Markdown source=\"x\\n\"\n  Markdown source=\"after\"\n"
    );
    assert_eq!(
        engine.to_html_page(source, "").unwrap(),
        "{{< a >}}\n<p>x</p>\n<p>after</p>\n"
    );
}

#[test]
fn newsletter_blocks_only_in_email() {
    let markdown = "Hi\n\n<md-newsletter>\nSubscribers only\n</md-newsletter>\n\nBye\n";

    let page = to_html_page(markdown, "https://example.com").unwrap();
    assert!(!page.contains("Subscribers only"));
    assert!(page.contains("<p>Bye</p>"));

    let email = to_html_email("https://example.com", markdown).unwrap();
    assert!(email.contains("<md-newsletter>"));
    assert!(email.contains("Subscribers only"));
}

#[test]
fn comment_inside_block_quote_is_suppressed() {
    let html = to_html_page("> <!-- secret -->\n> text\n", "").unwrap();
    assert_eq!(html, "<blockquote>\n<p>text</p>\n</blockquote>\n");
}

#[test]
fn multi_line_comment_inside_block_quote_is_suppressed() {
    let html = to_html_page("> <!--\n> secret\n> -->\n> text\n", "").unwrap();
    assert_eq!(html, "<blockquote>\n<p>text</p>\n</blockquote>\n");
}

#[test]
fn comment_inside_list_is_suppressed() {
    let html = to_html_page("- one\n\n  <!-- secret -->\n- two\n", "").unwrap();
    assert!(!html.contains("secret"));
    assert!(html.contains("one"));
    assert!(html.contains("two"));
}

#[test]
fn snippet_inside_block_quote_is_a_container() {
    let engine = Markdown::default();
    let source = "> {{< a >}}\n> x\n> {{< /a >}}\n";
    let mut ctx = ParseContext::new();
    let doc = engine.parse(source, &mut ctx);

    assert_eq!(
        doc.dump(source),
        "Document\n  BlockQuote\n    Snippet name=\"a\"\n      Markdown source=\"x\\n\"\n"
    );
    assert_eq!(
        engine.to_html_page(source, "").unwrap(),
        "<blockquote>\n{{< a >}}\n<p>x</p>\n</blockquote>\n"
    );
}

#[test]
fn footnote_inside_snippet_resolves_against_document() {
    let html = to_html_page("{{< box >}}\nSee[^n].\n{{< /box >}}\n\n[^n]: the note\n", "").unwrap();
    assert!(!html.contains("[^n]"));
    assert!(html.contains(r##"<a href="#fn:1" class="footnote-ref" role="doc-noteref">1</a>"##));
    assert!(html.contains("<li id=\"fn:1\">\n<p>the note"));
}

#[test]
fn rich_document() {
    let markdown = r#"---
title: Post
---

# Heading

Some text

**bold**

[Some relative link](/some-relative-link)

![Some image](/some-image.jpg)

| A | B |
|---|---|
| 1 | 2 |

- [x] done
- [ ] todo

~~gone~~
"#;
    let html = to_html_page(markdown, "https://markdown.club").unwrap();

    assert!(html.contains("<h1 id=\"heading\">Heading</h1>"));
    assert!(html.contains("<p><strong>bold</strong></p>"));
    assert!(html.contains(r#"<a href="/some-relative-link">Some relative link</a>"#));
    assert!(html.contains(r#"<img src="https://markdown.club/some-image.jpg" alt="Some image" />"#));
    assert!(html.contains("<th>A</th>"));
    assert!(html.contains("<td>2</td>"));
    assert!(html.contains(r#"<input checked="" disabled="" type="checkbox" /> done"#));
    assert!(html.contains("<del>gone</del>"));
    assert!(!html.contains("title: Post"));
}

#[test]
fn unknown_theme_is_rejected() {
    let result = Markdown::new(&MarkdownOptions {
        highlight_theme: "Monokai Extended Ultra".to_owned(),
        ..MarkdownOptions::default()
    });
    assert!(matches!(result, Err(MarkdownError::UnknownTheme(_))));
}

#[test]
fn engine_is_shared_across_threads() {
    let engine = std::sync::Arc::new(Markdown::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = std::sync::Arc::clone(&engine);
            std::thread::spawn(move || engine.to_html_page(&format!("# Page {i}"), "").unwrap())
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            format!("<h1 id=\"page-{i}\">Page {i}</h1>\n")
        );
    }
}
