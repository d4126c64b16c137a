use bus::{Bus, FrameQueue, MediaQueryList};
use core_types::ComponentId;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use html::{Document, NodeKey};
use print_footnotes::{FootnoteConfig, HostContext, LinkScanner, PrintController};

const SMALL_LINKS: usize = 16;
const LARGE_LINKS: usize = 5_000;

fn make_article(links: usize) -> (Document, NodeKey, NodeKey) {
    let mut doc = Document::new();
    let host = doc.create_element("improved-print");
    doc.append_child(doc.root(), host).unwrap();
    let shadow = doc.attach_shadow(host).unwrap();
    for i in 0..links {
        let p = doc.create_element("p");
        doc.append_child(host, p).unwrap();
        doc.append_text(p, "Lorem ipsum ").unwrap();
        let href = format!("https://example.com/{i}");
        let a = doc.create_element_with_attrs("a", &[("href", href.as_str())]);
        if i % 7 == 0 {
            doc.toggle_attr(a, "no-print-footnote", true).unwrap();
        }
        doc.append_child(p, a).unwrap();
        doc.append_text(a, "link").unwrap();
    }
    (doc, host, shadow)
}

fn bench_scan(c: &mut Criterion) {
    let (doc, host, _) = make_article(LARGE_LINKS);
    let scanner = LinkScanner::new(&FootnoteConfig::default()).unwrap();
    c.bench_function("bench_scan_large", |b| {
        b.iter(|| black_box(scanner.scan(black_box(&doc), host).len()));
    });
}

fn bench_attach(c: &mut Criterion, name: &str, links: usize) {
    c.bench_function(name, |b| {
        b.iter_batched(
            || make_article(links),
            |(mut doc, host, shadow)| {
                let mut media = MediaQueryList::print();
                let mut frames = FrameQueue::new();
                let bus = Bus::new();
                let mut ctl = PrintController::new(
                    ComponentId(1),
                    host,
                    shadow,
                    FootnoteConfig::default(),
                )
                .unwrap();
                ctl.attach(&mut HostContext {
                    doc: &mut doc,
                    media: &mut media,
                    frames: &mut frames,
                    events: &bus.evt_tx,
                });
                black_box(ctl.markers().len());
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_attach_small(c: &mut Criterion) {
    bench_attach(c, "bench_attach_small", SMALL_LINKS);
}

fn bench_attach_large(c: &mut Criterion) {
    bench_attach(c, "bench_attach_large", LARGE_LINKS);
}

criterion_group!(benches, bench_scan, bench_attach_small, bench_attach_large);
criterion_main!(benches);
