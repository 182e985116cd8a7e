use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mincer::{HtmlCompressor, HtmlCompressorConfig, XmlCompressor};

const SECTION: &str = r#"
  <section class="card" id="item">
    <!-- card body -->
    <h2 class="title"> Heading </h2>
    <p>   Some   text with <a href="http://example.com/page">a link</a>   and more text.  </p>
    <pre>  fn main() {
      println!("kept");
  }</pre>
    <form method="get"><input type="text" name="q" disabled="disabled" /></form>
    <button onclick="javascript:submit()"> Go </button>
  </section>
"#;

fn page(sections: usize) -> String {
    let mut html = String::from(
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\">\n<html>\n<head>\n  <style type=\"text/css\"> body { margin: 0; padding: 0; } </style>\n  <script type=\"text/javascript\"> var total = 0; // counter\n  </script>\n</head>\n<body>\n",
    );
    for _ in 0..sections {
        html.push_str(SECTION);
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn bench_html_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("html");

    let default = HtmlCompressor::new();
    let aggressive = HtmlCompressor::from_config(HtmlCompressorConfig::aggressive()).unwrap();

    for sections in [1, 10, 100] {
        let html = page(sections);
        group.throughput(Throughput::Bytes(html.len() as u64));

        group.bench_with_input(BenchmarkId::new("default", sections), &html, |b, html| {
            b.iter(|| default.compress(black_box(html)))
        });

        group.bench_with_input(BenchmarkId::new("aggressive", sections), &html, |b, html| {
            b.iter(|| aggressive.compress(black_box(html)))
        });
    }

    group.finish();
}

fn bench_statistics_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    let html = page(10);
    let compressor = HtmlCompressor::builder()
        .config(HtmlCompressorConfig::aggressive())
        .generate_statistics(true)
        .build()
        .unwrap();

    group.bench_function("aggressive_with_statistics", |b| {
        b.iter(|| compressor.compress(black_box(&html)))
    });

    group.finish();
}

fn bench_xml_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("xml");

    let mut xml = String::from("<?xml version=\"1.0\"?>\n<feed>\n");
    for i in 0..100 {
        xml.push_str(&format!(
            "  <!-- entry {} -->\n  <entry  id = \"{}\" >\n    <title>Entry</title>\n    <![CDATA[ raw   text ]]>\n  </entry>\n",
            i, i
        ));
    }
    xml.push_str("</feed>\n");

    let compressor = XmlCompressor::new();
    group.throughput(Throughput::Bytes(xml.len() as u64));
    group.bench_function("feed_100", |b| b.iter(|| compressor.compress(black_box(&xml))));

    group.finish();
}

criterion_group!(
    compress_benches,
    bench_html_compression,
    bench_statistics_overhead,
    bench_xml_compression
);

criterion_main!(compress_benches);
