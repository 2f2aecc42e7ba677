use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use UnboundedQueueMini::core::queue::Queue;

/// Benchmark: single-threaded enqueue
fn bench_enqueue_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue_single_thread");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("1000_items", |b| {
        b.iter(|| {
            let queue = Queue::new();
            for n in 0..1000u64 {
                black_box(queue.enqueue(n));
            }
            queue
        });
    });
    group.finish();
}

/// Benchmark: enqueue immediately followed by dequeue on one thread
fn bench_enqueue_dequeue_cycle(c: &mut Criterion) {
    let queue = Queue::new();
    c.bench_function("enqueue_dequeue_cycle", |b| {
        b.iter(|| {
            queue.enqueue(black_box(42u64));
            black_box(queue.dequeue())
        });
    });
}

/// Benchmark: N producers and N consumers moving 10k items in total
fn bench_mpmc(c: &mut Criterion) {
    const TOTAL: usize = 10_000;
    let mut group = c.benchmark_group("mpmc");
    group.throughput(Throughput::Elements(TOTAL as u64));

    for workers in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| {
                let queue = Arc::new(Queue::new());
                let consumers: Vec<_> = (0..workers)
                    .map(|_| {
                        let queue = queue.clone();
                        thread::spawn(move || queue.iter().count())
                    })
                    .collect();
                let producers: Vec<_> = (0..workers)
                    .map(|_| {
                        let queue = queue.clone();
                        thread::spawn(move || {
                            for n in 0..TOTAL / workers {
                                queue.enqueue(n);
                            }
                        })
                    })
                    .collect();
                for producer in producers {
                    producer.join().unwrap();
                }
                while !queue.is_empty() {
                    thread::yield_now();
                }
                queue.close();
                consumers.into_iter().map(|c| c.join().unwrap()).sum::<usize>()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_enqueue_single_thread, bench_enqueue_dequeue_cycle, bench_mpmc);
criterion_main!(benches);
