//! Benchmarks for markdown conversion.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mdn_markdown::Markdown;

/// Generate a post with frontmatter, snippets, comments and code.
fn generate_markdown(sections: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * paragraphs_per_section * 200);
    md.push_str("---\ntitle: Benchmark\ndate: 2024-01-01\n---\n\n# Document Title\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n<!-- editor note {i} -->\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "Paragraph {j} of section {i} with **bold**, [a link](/page-{j}) and ![img](/img-{j}.png).\n\n"
            ));
        }
        md.push_str("{{< note >}}\nWrapped *content*.\n{{< /note >}}\n\n");
        md.push_str("```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\n");
    }
    md
}

fn bench_page_simple(c: &mut Criterion) {
    let engine = Markdown::default();
    c.bench_function("page_simple", |b| {
        b.iter(|| engine.to_html_page("# Hello\n\nSimple content.", "https://example.com"));
    });
}

fn bench_page_by_size(c: &mut Criterion) {
    let engine = Markdown::default();
    let mut group = c.benchmark_group("page_by_size");

    for (sections, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let markdown = generate_markdown(sections, paragraphs);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}s_{paragraphs}p")),
            &markdown,
            |b, md| b.iter(|| engine.to_html_page(md, "https://example.com")),
        );
    }

    group.finish();
}

fn bench_page_vs_email(c: &mut Criterion) {
    let engine = Markdown::default();
    let markdown = generate_markdown(10, 3);
    let mut group = c.benchmark_group("mode");

    group.bench_function("page", |b| {
        b.iter(|| engine.to_html_page(&markdown, "https://example.com"));
    });
    group.bench_function("email", |b| {
        b.iter(|| engine.to_html_email("https://example.com", &markdown));
    });

    group.finish();
}

fn bench_frontmatter_only(c: &mut Criterion) {
    let engine = Markdown::default();
    let markdown = generate_markdown(20, 3);
    c.bench_function("parse_frontmatter", |b| {
        b.iter(|| engine.parse_frontmatter(&markdown));
    });
}

criterion_group!(
    benches,
    bench_page_simple,
    bench_page_by_size,
    bench_page_vs_email,
    bench_frontmatter_only
);
criterion_main!(benches);
