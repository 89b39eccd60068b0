use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use stack_xml::{Node, Parser};

fn document(books: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<catalog>\n");
    for i in 0..books {
        xml.push_str(&format!(
            "  <book id=\"bk{i}\" available>\n    <!-- entry {i} -->\n    <title>Title {i}</title>\n    <price currency=USD>{i}.95</price>\n    <cover src='{i}.png'/>\n  </book>\n"
        ));
    }
    xml.push_str("</catalog>\n");
    xml
}

fn count_nodes(xml: &[u8]) -> usize {
    let mut parser = Parser::new();
    parser.begin_from_memory(xml).unwrap();
    let mut count = 0;
    while let Some(node) = parser.next_node().unwrap() {
        if let Node::Begin { attributes, .. } = &node {
            black_box(attributes.len());
        }
        count += 1;
    }
    count
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for books in [10, 100, 1000] {
        let xml = document(books);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(books), &xml, |b, xml| {
            b.iter(|| count_nodes(black_box(xml.as_bytes())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
