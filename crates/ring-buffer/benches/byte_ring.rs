use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ring_buffer::ByteRingBuffer;

fn push_drain_line(c: &mut Criterion) {
    let buffer = ByteRingBuffer::with_default_capacity();
    let line = b"veh speed 80\r\n";

    c.bench_function("push_drain_line", |b| {
        b.iter(|| {
            for byte in line {
                buffer.push(black_box(*byte));
            }
            let mut sum = 0u32;
            buffer.drain_into(&mut |byte: u8| sum += byte as u32);
            black_box(sum)
        })
    });
}

criterion_group!(benches, push_drain_line);
criterion_main!(benches);
