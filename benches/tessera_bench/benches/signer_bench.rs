//! Token signing benchmarks
//!
//! Measures signing and verification across payload sizes, plus the
//! CSRF and session token paths built on top of them.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use tessera_security::{CsrfTokens, SessionConfig, SessionStore, Signer};

const SECRET: &[u8] = b"bench_secret_key_32_bytes_long!!";

fn signer() -> Signer {
    Signer::new(SECRET).expect("valid secret")
}

/// Benchmark raw sign/unsign over growing payloads
fn bench_sign_verify(c: &mut Criterion) {
    let signer = signer();
    let mut group = c.benchmark_group("signer");

    for size in [16usize, 256, 4096].iter() {
        let payload = vec![0x5au8; *size];
        let token = signer.sign(&payload);
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::new("sign", size), &payload, |b, payload| {
            b.iter(|| signer.sign(black_box(payload)))
        });
        group.bench_with_input(BenchmarkId::new("unsign", size), &token, |b, token| {
            b.iter(|| signer.unsign(black_box(token.as_str())))
        });
    }

    group.finish();
}

/// Benchmark rejecting a forged token
fn bench_reject(c: &mut Criterion) {
    let signer = signer();
    let mut forged = signer.sign(b"payload").into_string();
    let swap = if forged.as_bytes()[4] == b'A' { "B" } else { "A" };
    forged.replace_range(4..5, swap);

    c.bench_function("signer/reject_forged", |b| {
        b.iter(|| signer.unsign(black_box(&forged)).is_err())
    });
}

/// Benchmark CSRF token issue and verify
fn bench_csrf(c: &mut Criterion) {
    let tokens = CsrfTokens::new(&signer(), None);
    let issued = tokens.generate();
    let mut group = c.benchmark_group("csrf");

    group.bench_function("generate", |b| b.iter(|| tokens.generate()));
    group.bench_function("verify", |b| {
        b.iter(|| tokens.verify(black_box(Some(issued.as_str()))))
    });

    group.finish();
}

/// Benchmark session token encode and decode
fn bench_session(c: &mut Criterion) {
    let store: SessionStore<serde_json::Value> =
        SessionStore::new(&signer(), SessionConfig::default());
    let user = json!({
        "id": 42,
        "email": "bench@example.com",
        "name": "Bench User",
        "password": "never-signed",
    });
    let token = store
        .encode(&user, chrono::Utc::now())
        .expect("object principal");
    let mut group = c.benchmark_group("session");

    group.bench_function("encode", |b| {
        b.iter(|| store.encode(black_box(&user), chrono::Utc::now()))
    });
    group.bench_function("decode", |b| {
        b.iter(|| store.decode(black_box(token.as_str())))
    });

    group.finish();
}

criterion_group!(benches, bench_sign_verify, bench_reject, bench_csrf, bench_session);
criterion_main!(benches);
