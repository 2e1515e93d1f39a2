//! Performance benchmarks for SSE framing and payload classification
//!
//! Tests throughput for different event counts and transport chunk sizes.
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use agent_stream::envelope::classify;
use agent_stream::sse::{FrameParser, Utf8ChunkDecoder};

/// Generate an SSE body of `events` JSON-RPC artifact events
fn generate_stream(events: usize) -> String {
    (0..events)
        .map(|i| {
            format!(
                "data: {{\"jsonrpc\":\"2.0\",\"result\":{{\"artifact\":{{\"parts\":[{{\"type\":\"text\",\"text\":\"token {} with some ünïcödé\"}}]}}}}}}\n\n",
                i
            )
        })
        .collect()
}

/// Benchmark framing with the body cut into fixed-size chunks
fn bench_frame_parser_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_parser_chunked");
    let body = generate_stream(500);
    group.throughput(Throughput::Bytes(body.len() as u64));

    for chunk_size in [16, 256, 4096, 65536].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_byte_chunks", chunk_size)),
            chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut decoder = Utf8ChunkDecoder::new();
                    let mut parser = FrameParser::new();
                    let mut count = 0;
                    for chunk in body.as_bytes().chunks(chunk_size) {
                        let text = decoder.decode(black_box(chunk));
                        count += parser.push(&text).len();
                    }
                    count += parser.finalize().len();
                    black_box(count)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark framing plus classification, as the read loop does it
fn bench_frame_and_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_and_classify");

    for events in [10, 100, 1000].iter() {
        let body = generate_stream(*events);
        group.throughput(Throughput::Elements(*events as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_events", events)),
            &body,
            |b, body| {
                b.iter(|| {
                    let mut parser = FrameParser::new();
                    let signals: usize = parser
                        .push(black_box(body))
                        .iter()
                        .filter_map(|event| classify(&event.data).ok())
                        .map(|signals| signals.len())
                        .sum();
                    black_box(signals)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_frame_parser_chunked, bench_frame_and_classify);
criterion_main!(benches);
