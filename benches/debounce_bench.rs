// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ctswitch::{
    CertificateVerifier, FailureLogDebouncer, FailureReason, InterceptorChain, InterceptorManager,
    LogSink, StaticPreference, SuccessReason, VerificationOutcome,
};

struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _category: &str, message: &str) {
        black_box(message);
    }
}

fn debounce_benchmark(c: &mut Criterion) {
    let debouncer = FailureLogDebouncer::new(Arc::new(NullSink));
    let failure = VerificationOutcome::Failure(FailureReason::NoScts);
    let success = VerificationOutcome::Success(SuccessReason::Trusted { sct_count: 2 });

    c.bench_function("debounce_failure_streak", |b| {
        b.iter(|| black_box(debouncer.record("example.com", &failure)))
    });

    c.bench_function("debounce_flapping", |b| {
        b.iter(|| {
            debouncer.record("example.com", &failure);
            black_box(debouncer.record("example.com", &success))
        })
    });
}

fn reconcile_benchmark(c: &mut Criterion) {
    let manager = InterceptorManager::new(Arc::new(StaticPreference::new(true)), || {
        Ok(Arc::new(|_: &str, _: &[u8]| {
            VerificationOutcome::Success(SuccessReason::InsecureConnection)
        }) as Arc<dyn CertificateVerifier>)
    });
    let mut chain = InterceptorChain::new();

    c.bench_function("reconcile_toggle", |b| {
        b.iter(|| {
            manager.reconcile(true, &mut chain).unwrap();
            black_box(manager.reconcile(false, &mut chain).unwrap().len())
        })
    });
}

criterion_group!(benches, debounce_benchmark, reconcile_benchmark);
criterion_main!(benches);
