// ABOUTME: Benchmark suite for the MMS call codec
// ABOUTME: Measures frame checking, parsing and serialization across typical MMS payload sizes

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mms::codec::{Encodable, Frame};
use mms::datatypes::{CompletionTokens, DownloadMessage, SendMessage};
use std::io::Cursor;
use std::time::Duration;

fn create_sample_send(payload_len: usize) -> Frame {
    let payload: Vec<u8> = (0..payload_len).map(|i| (i % 251) as u8).collect();
    Frame::SendMessage(Box::new(
        SendMessage::new(payload)
            .with_location_url("content://mms/outbox/1")
            .with_tokens(
                CompletionTokens::sent("sent:1")
                    .with_delivery("delivery:1")
                    .with_read("read:1"),
            ),
    ))
}

fn create_sample_download() -> Frame {
    Frame::DownloadMessage(
        DownloadMessage::new("http://mmsc.example.net/retrieve?id=0042")
            .with_transaction_id("T18a3c7e0")
            .with_downloaded("downloaded:0042"),
    )
}

fn bench_frame_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_check");

    let send_bytes = create_sample_send(300 * 1024).to_bytes().unwrap();
    group.bench_function("send_message_300k", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(send_bytes.as_ref()));
            Frame::check(&mut cursor).unwrap()
        })
    });

    let download_bytes = create_sample_download().to_bytes().unwrap();
    group.bench_function("download_message", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(download_bytes.as_ref()));
            Frame::check(&mut cursor).unwrap()
        })
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    group.measurement_time(Duration::from_secs(10));

    let download = create_sample_download();
    group.bench_function("download_message", |b| {
        b.iter(|| black_box(&download).to_bytes().unwrap())
    });

    group.finish();
}

fn bench_payload_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_sizes");
    group.measurement_time(Duration::from_secs(10));

    // Common carrier size limits for MMS
    let payload_sizes = [1024, 30 * 1024, 100 * 1024, 300 * 1024, 600 * 1024];

    for &size in &payload_sizes {
        let frame = create_sample_send(size);
        let frame_bytes = frame.to_bytes().unwrap();

        group.bench_with_input(BenchmarkId::new("send_message_encode", size), &frame, |b, frame| {
            b.iter(|| black_box(frame).to_bytes().unwrap())
        });

        group.bench_with_input(
            BenchmarkId::new("send_message_parse", size),
            &frame_bytes,
            |b, frame_bytes| {
                b.iter(|| {
                    let mut cursor = Cursor::new(black_box(frame_bytes.as_ref()));
                    Frame::parse(&mut cursor).unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_frame_check,
    bench_serialization,
    bench_payload_sizes
);
criterion_main!(benches);
