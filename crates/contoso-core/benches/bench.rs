use bytes::Bytes;
use contoso_core::{
    Bank, DirectoryLookup, ProfileQuery,
    stream::{Pacer, StreamSession, tokenize},
};
use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use tokio::{runtime::Builder, sync::mpsc};
use tokio_util::sync::CancellationToken;

const WORDS_PER_BODY: usize = 1024;

fn body() -> String {
    "Hola, soy un LLM de ejemplo. Estoy transmitiendo este mensaje palabra por palabra. "
        .split_whitespace()
        .cycle()
        .take(WORDS_PER_BODY)
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_tokenize(c: &mut Criterion) {
    let text = body();
    let mut group = c.benchmark_group("tokenize");
    group.throughput(Throughput::Elements(WORDS_PER_BODY as u64));
    group.bench_function("1k_words", |b| b.iter(|| tokenize(black_box(&text))));
    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let rt = Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    let text = body();

    let mut group = c.benchmark_group("session");
    group.throughput(Throughput::Elements(WORDS_PER_BODY as u64 + 1));
    group.bench_function("zero_delay_1k_words", |b| {
        b.to_async(&rt).iter(|| async {
            let (tx, mut rx) = mpsc::channel::<Bytes>(8);
            let reader = tokio::spawn(async move {
                let mut n = 0usize;
                while let Some(chunk) = rx.recv().await {
                    n += chunk.len();
                }
                n
            });
            let pacer = Pacer::from_millis(0).unwrap();
            let outcome = StreamSession::new(&text, pacer, tx, CancellationToken::new())
                .run()
                .await;
            black_box(outcome);
            black_box(reader.await.unwrap());
        })
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let bank = Bank::seeded().unwrap();
    let query = ProfileQuery::by_name("carlos torres");
    c.bench_function("directory/find_by_name", |b| {
        b.iter(|| black_box(bank.directory().find(black_box(&query)).is_ok()))
    });
}

criterion_group!(benches, bench_tokenize, bench_session, bench_lookup);
criterion_main!(benches);
