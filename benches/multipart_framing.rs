//! Benchmarks for batch framing
//!
//! This benchmark measures:
//! - Multipart body encoding for growing part counts
//! - Two-stage demultiplexing of a batch response

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use arango_batch::types::PartKey;
use arango_batch::wire::{build_raw_request, demultiplex, encode_batch_body, MIME_BOUNDARY};

fn sample_requests(n: usize) -> Vec<(Option<PartKey>, String)> {
    (0..n)
        .map(|i| {
            let id = (i % 3 == 0).then(|| PartKey::from(format!("doc-{}", i)));
            let body = format!(r#"{{"_key":"{}","value":{}}}"#, i, i * 7);
            let raw = build_raw_request("POST", "/_api/document/items", "127.0.0.1:8529", &[], &body, true);
            (id, raw)
        })
        .collect()
}

fn sample_response(n: usize) -> String {
    let mut body = String::new();
    for i in 0..n {
        body.push_str(&format!(
            "--{}\r\nContent-Type: application/x-arango-batchpart\r\n",
            MIME_BOUNDARY
        ));
        if i % 3 == 0 {
            body.push_str(&format!("Content-Id: doc-{}\r\n", i));
        }
        body.push_str("\r\nHTTP/1.1 202 Accepted\r\ncontent-type: application/json; charset=utf-8\r\n\r\n");
        body.push_str(&format!(r#"{{"error":false,"_id":"items/{}","_rev":"1"}}"#, i));
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--", MIME_BOUNDARY));
    body
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_batch_body");
    for n in [10usize, 100, 1000] {
        let requests = sample_requests(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("parts", n), &requests, |b, reqs| {
            b.iter(|| encode_batch_body(black_box(reqs).iter().map(|(id, raw)| (id.as_ref(), raw.as_str()))))
        });
    }
    group.finish();
}

fn bench_demultiplex(c: &mut Criterion) {
    let mut group = c.benchmark_group("demultiplex");
    for n in [10usize, 100, 1000] {
        let body = sample_response(n);
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::new("fragments", n), &body, |b, body| {
            b.iter(|| demultiplex(black_box(body)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_demultiplex);
criterion_main!(benches);
