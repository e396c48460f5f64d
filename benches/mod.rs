use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::application::mqtt::codec::bench_varint,
    network::application::mqtt::codec::bench_encode_publish,
    network::application::mqtt::codec::bench_encode_subscribe_many,
    network::application::mqtt::codec::bench_decode_publish,
    network::client::session::bench_poll_receive,
    network::client::session::bench_send
);
criterion_main!(benches);
