use criterion::{BenchmarkId, Criterion, Throughput};
use libmqtt::network::application::mqtt::{
    MAX_TOPICS_PER_REQUEST, QoS, Topic, decode_publish, encode_publish, encode_subscribe_many,
    varint,
};
use std::hint::black_box;

pub fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");
    for value in [127usize, 16_383, 2_097_151, 268_435_455] {
        let mut buf = [0u8; varint::MAX_LEN];
        let len = varint::encode(value, &mut buf).expect("Failed to encode");
        let encoded = buf[..len].to_vec();

        group.bench_with_input(BenchmarkId::new("encode", value), &value, |b, &value| {
            let mut dst = [0u8; varint::MAX_LEN];
            b.iter(|| varint::encode(black_box(value), &mut dst))
        });
        group.bench_with_input(BenchmarkId::new("decode", value), &encoded, |b, src| {
            b.iter(|| varint::decode(black_box(src)))
        });
    }
    group.finish();
}

pub fn bench_encode_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_publish");
    for size in [16usize, 256, 4096] {
        let payload = vec![0xA5u8; size];
        let mut dst = vec![0u8; size + 64];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| {
                encode_publish(
                    &mut dst,
                    black_box(b"libmqtt/bench-topic"),
                    QoS::AtLeastOnce,
                    1,
                    black_box(payload),
                )
                .expect("Failed to encode")
            })
        });
    }
    group.finish();
}

pub fn bench_encode_subscribe_many(c: &mut Criterion) {
    let filters: [&[u8]; MAX_TOPICS_PER_REQUEST] = [
        b"sensors/+/temp",
        b"sensors/+/humidity",
        b"actuators/#",
        b"status",
        b"config/device",
        b"ota/notify",
        b"time",
        b"alerts/#",
    ];
    let topics = filters.map(|filter| Topic::new(filter, QoS::AtLeastOnce));
    let mut dst = [0u8; 256];

    c.bench_function("encode_subscribe_many", |b| {
        b.iter(|| encode_subscribe_many(&mut dst, black_box(&topics), 7).expect("Failed to encode"))
    });
}

pub fn bench_decode_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_publish");
    for size in [16usize, 256, 4096] {
        let payload = vec![0x5Au8; size];
        let mut src = vec![0u8; size + 64];
        let len = encode_publish(&mut src, b"libmqtt/bench-topic", QoS::AtLeastOnce, 1, &payload)
            .expect("Failed to encode");
        src.truncate(len);

        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &src, |b, src| {
            b.iter(|| decode_publish(black_box(src)).expect("Failed to decode"))
        });
    }
    group.finish();
}
