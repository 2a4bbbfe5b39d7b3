// Hashing, codec and classification benchmarks for relaytx.
//
// Covers transaction hashing with and without a reused scratch buffer,
// full binary encode/decode of a transaction, and selector classification
// against the default registry.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use relaytx_protocol::codec::{from_bytes, to_bytes};
use relaytx_protocol::registry::Registry;
use relaytx_protocol::testutil::{random_good_tx, random_good_txs, rng_from_seed};
use relaytx_protocol::transaction::{
    new_tx_hash, new_tx_hash_into_buffer, tx_hash_size_hint, Selector, Tx,
};

fn bench_new_tx_hash(c: &mut Criterion) {
    let reg = Registry::default();
    let tx = random_good_tx(&reg, &mut rng_from_seed(42)).unwrap();

    c.bench_function("sha256/new_tx_hash", |b| {
        b.iter(|| new_tx_hash(tx.version, &tx.selector, &tx.input).unwrap());
    });
}

fn bench_new_tx_hash_into_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("sha256/new_tx_hash_into_buffer");
    let reg = Registry::default();

    for size in [10, 100, 1000] {
        let txs = random_good_txs(&reg, &mut rng_from_seed(size as u64), size).unwrap();
        let max = txs
            .iter()
            .map(|tx| tx_hash_size_hint(tx.version, &tx.selector, &tx.input))
            .max()
            .unwrap_or(0);
        let mut buf = vec![0u8; max];

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txs, |b, txs| {
            b.iter(|| {
                for tx in txs {
                    new_tx_hash_into_buffer(tx.version, &tx.selector, &tx.input, &mut buf).unwrap();
                }
            });
        });
    }

    group.finish();
}

fn bench_tx_codec(c: &mut Criterion) {
    let reg = Registry::default();
    let tx = random_good_tx(&reg, &mut rng_from_seed(7)).unwrap();
    let bytes = to_bytes(&tx).unwrap();

    c.bench_function("codec/tx_encode", |b| {
        b.iter(|| to_bytes(&tx).unwrap());
    });
    c.bench_function("codec/tx_decode", |b| {
        b.iter(|| from_bytes::<Tx>(&bytes).unwrap());
    });
}

fn bench_classify(c: &mut Criterion) {
    let reg = Registry::default();
    let selectors = reg.all_selectors();
    let garbage = Selector::from("BTC/randomFn");

    let mut group = c.benchmark_group("selector/classify");
    group.throughput(Throughput::Elements(selectors.len() as u64));
    group.bench_function("all_valid", |b| {
        b.iter(|| selectors.iter().filter(|s| s.classify(&reg).is_lock()).count());
    });
    group.finish();

    c.bench_function("selector/classify_invalid", |b| {
        b.iter(|| garbage.classify(&reg));
    });
}

criterion_group!(
    benches,
    bench_new_tx_hash,
    bench_new_tx_hash_into_buffer,
    bench_tx_codec,
    bench_classify,
);
criterion_main!(benches);
