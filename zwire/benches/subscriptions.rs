//! Subscription matching and PUB fan-out benchmarks.
//!
//! Measures:
//! - `Trie::check` on the SUB side
//! - `MultiTrie::match_topic` on the PUB side
//! - End-to-end PUB -> N x SUB over inproc, including the ZWS codec

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zwire_core::endpoint::EndpointId;
use zwire_core::pubsub::index::MultiTrie;
use zwire_core::subscription::Trie;
use zwire::zws::{PubSocket, SubSocket};

const SUBSCRIPTION_COUNTS: &[usize] = &[10, 100, 1_000];
const FANOUT_SUBSCRIBERS: &[usize] = &[1, 4, 16];
const MESSAGE_COUNT: usize = 1_000;

fn topics(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("market.{:04}.", i).into_bytes()).collect()
}

fn trie_check(c: &mut Criterion) {
    zwire::dev_tracing::init_tracing();
    let mut group = c.benchmark_group("subscriptions/trie_check");

    for &n in SUBSCRIPTION_COUNTS {
        let mut trie = Trie::new();
        for topic in topics(n) {
            trie.add(&topic);
        }
        let hit = format!("market.{:04}.price", n / 2).into_bytes();
        let miss = b"weather.paris".to_vec();

        group.bench_with_input(BenchmarkId::new("hit", n), &hit, |b, topic| {
            b.iter(|| black_box(trie.check(black_box(topic))));
        });
        group.bench_with_input(BenchmarkId::new("miss", n), &miss, |b, topic| {
            b.iter(|| black_box(trie.check(black_box(topic))));
        });
    }
    group.finish();
}

fn multitrie_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscriptions/multitrie_match");

    for &n in SUBSCRIPTION_COUNTS {
        let endpoints: Vec<EndpointId> = (0..16).map(|_| EndpointId::next()).collect();
        let mut trie = MultiTrie::new();
        for (i, topic) in topics(n).iter().enumerate() {
            trie.add(topic, endpoints[i % endpoints.len()]);
            trie.add(b"market.", endpoints[(i + 1) % endpoints.len()]);
        }
        let topic = format!("market.{:04}.price", n / 2).into_bytes();

        group.bench_with_input(BenchmarkId::new("subscriptions", n), &topic, |b, topic| {
            b.iter(|| {
                let mut matched = 0usize;
                trie.match_topic(black_box(topic), |_| matched += 1);
                black_box(matched)
            });
        });
    }
    group.finish();
}

fn pubsub_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscriptions/inproc_fanout");

    for &num_subs in FANOUT_SUBSCRIBERS {
        group.throughput(Throughput::Elements((MESSAGE_COUNT * num_subs) as u64));
        group.bench_with_input(
            BenchmarkId::new("subscribers", num_subs),
            &num_subs,
            |b, &num_subs| {
                let address = format!("inproc://bench-fanout-{num_subs}");
                let mut publisher = PubSocket::new();
                publisher.bind(&address).unwrap();
                let mut subscribers: Vec<SubSocket> = (0..num_subs)
                    .map(|_| {
                        let mut sub = SubSocket::new();
                        sub.connect(&address).unwrap();
                        sub.subscribe("market.").unwrap();
                        sub
                    })
                    .collect();
                publisher.process();

                b.iter(|| {
                    for _ in 0..MESSAGE_COUNT {
                        publisher.send(["market.0001.price", "42"]).unwrap();
                    }
                    for sub in &mut subscribers {
                        while let Some(msg) = sub.try_recv() {
                            black_box(msg);
                        }
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, trie_check, multitrie_match, pubsub_fanout);
criterion_main!(benches);
