// Identifier derivation benchmarks.
//
// Covers single-transaction body hashing for both body encodings and
// whole-block derivation at block sizes seen on mainnet.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;

use waves_complexity::block::{Address, Block, BlockId};
use waves_complexity::derive::derive_ids;
use waves_complexity::transaction::Transaction;

fn invoke(i: u64) -> Transaction {
    serde_json::from_value(json!({
        "type": 16,
        "version": 2,
        "senderPublicKey": "4xsgrP8dWq5dcjgwCc8dFA5rfeXFg1u3dvR7Srz1c4RZ",
        "dApp": "3PEktVux2RhchSN63DsDo4b4mz4QqzKSeDv",
        "call": { "function": "swap", "args": [{ "type": "integer", "value": i }] },
        "payment": [{ "amount": 1_000_000, "assetId": null }],
        "fee": 500_000,
        "timestamp": 1_650_000_000_000u64 + i
    }))
    .expect("valid transaction json")
}

fn legacy_transfer() -> Transaction {
    serde_json::from_value(json!({
        "type": 4,
        "version": 2,
        "senderPublicKey": "4xsgrP8dWq5dcjgwCc8dFA5rfeXFg1u3dvR7Srz1c4RZ",
        "recipient": "3PEktVux2RhchSN63DsDo4b4mz4QqzKSeDv",
        "assetId": null,
        "feeAssetId": null,
        "amount": 100_000_000,
        "fee": 100_000,
        "timestamp": 1_650_000_000_000u64,
        "attachment": "4t2Xazb2SX"
    }))
    .expect("valid transaction json")
}

fn block_of(n: u64) -> Block {
    Block::new(
        BlockId::from_base58(&bs58::encode([1u8; 32]).into_string()).expect("block id"),
        Address::from_base58("3PAWwWa6GbwcJaFzwqXQN5KQm7H96Y7SHTQ").expect("address"),
        (0..n).map(invoke).collect(),
    )
}

fn bench_single_transaction(c: &mut Criterion) {
    let tx = invoke(7);
    c.bench_function("derive/single_invoke", |b| {
        b.iter(|| tx.raw_id(b'W').expect("derivable"));
    });
    let tx = legacy_transfer();
    c.bench_function("derive/single_legacy_transfer", |b| {
        b.iter(|| tx.raw_id(b'W').expect("derivable"));
    });
}

fn bench_block_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive/block");
    for size in [10u64, 100, 1_000] {
        let block = block_of(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &block, |b, block| {
            b.iter(|| derive_ids(block, block.scheme()).expect("derivable"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_transaction, bench_block_derivation);
criterion_main!(benches);
