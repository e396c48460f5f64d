use criterion::{Criterion, Throughput};
use libmqtt::network::client::{Clock, ConnectionState, Handler, Peer, Session};
use libmqtt::network::error::Error;
use libmqtt::network::{Close, Connect, Connection, Read, Write};
use std::hint::black_box;
use std::time::Duration;

const PACKET: [u8; 27] = [
    0x30, 0x19, 0x00, 0x13, b'l', b'i', b'b', b'm', b'q', b't', b't', b'/', b'b', b'e', b'n',
    b'c', b'h', b'-', b't', b'o', b'p', b'i', b'c', 0x00, 0x01, b'h', b'i',
];

/// A connection that always has a packet waiting and accepts every write.
struct Loopback;

impl Read for Loopback {
    type Error = Error;
    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize, Self::Error> {
        let len = buf.len().min(PACKET.len());
        buf[..len].copy_from_slice(&PACKET[..len]);
        Ok(len)
    }
}

impl Write for Loopback {
    type Error = Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for Loopback {
    type Error = Error;
    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for Loopback {}

struct LoopbackNetwork;

impl Connect for LoopbackNetwork {
    type Connection = Loopback;
    type Error = Error;

    fn connect(&mut self, _host: &str, _port: u16) -> Result<Self::Connection, Self::Error> {
        Ok(Loopback)
    }
}

struct FrozenClock;

impl Clock for FrozenClock {
    fn now(&self) -> Duration {
        Duration::ZERO
    }
}

#[derive(Default)]
struct ByteCounter(usize);

impl Handler for ByteCounter {
    fn on_data(&mut self, _peer: &Peer, data: &[u8]) {
        self.0 += data.len();
    }
}

fn setup_session() -> Session<LoopbackNetwork, FrozenClock, ByteCounter> {
    let mut session = Session::new(LoopbackNetwork, FrozenClock, "bench.local", 1883)
        .expect("Failed to create session")
        .with_handler(ByteCounter::default());
    session.connect().expect("Failed to connect");
    assert_eq!(session.state(), ConnectionState::Connected);
    session
}

pub fn bench_poll_receive(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    let mut session = setup_session();
    group.throughput(Throughput::Bytes(PACKET.len() as u64));
    group.bench_function("poll_receive", |b| {
        b.iter(|| session.poll(black_box(Duration::from_millis(1))))
    });
    group.finish();
}

pub fn bench_send(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    let mut session = setup_session();
    group.throughput(Throughput::Bytes(PACKET.len() as u64));
    group.bench_function("send", |b| {
        b.iter(|| session.send(black_box(&PACKET)).expect("Failed to send"))
    });
    group.finish();
}
