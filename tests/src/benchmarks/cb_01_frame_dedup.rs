//! # CB-01 Frame Deduplication Benchmarks
//!
//! Performance claims to validate:
//! - Signature computation: O(payload) with payload <= 8 bytes
//! - Duplicate check: amortized O(1) per frame
//! - Eviction at capacity: O(1) per insert
//! - Expiry: O(expired entries) per call
//!
//! Brutal Conditions:
//! - Every frame distinct (cache permanently full, one eviction per call)
//! - Large backlog expiring in one call after an idle gap
//! - Four-way bridge replaying each frame on every interface

use cb_01_frame_dedup::{
    compute_signature, DedupConfig, DuplicateDetector, ManualClock, SharedDuplicateDetector,
    SignatureWidth,
};
use bus_types::ArbitrationId;
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;

/// Random `(id, payload)` pairs with 29-bit ids and 0..=8 byte payloads.
pub fn random_frames(count: usize) -> Vec<(u32, Vec<u8>)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let id = rng.gen_range(0..=ArbitrationId::MAX_EXTENDED);
            let len = rng.gen_range(0..=8);
            let payload = (0..len).map(|_| rng.gen()).collect();
            (id, payload)
        })
        .collect()
}

fn detector(window_ms: u64, max: usize) -> DuplicateDetector<ManualClock> {
    let config = DedupConfig::new(window_ms, max).expect("valid config");
    DuplicateDetector::with_clock(config, ManualClock::new(0)).expect("valid detector")
}

pub fn bench_signature(c: &mut Criterion) {
    let mut group = c.benchmark_group("cb-01-signature");
    let id = ArbitrationId::new(0x18FE_F100).expect("valid id");

    for width in [
        SignatureWidth::Bits32,
        SignatureWidth::Bits64,
        SignatureWidth::Bits128,
    ] {
        for len in [0usize, 4, 8] {
            let payload = vec![0xA5u8; len];
            group.bench_with_input(
                BenchmarkId::new(format!("bits{}", width.bits()), len),
                &payload,
                |b, payload| b.iter(|| black_box(compute_signature(id, payload, width))),
            );
        }
    }

    group.finish();
}

pub fn bench_bridge_traffic(c: &mut Criterion) {
    let mut group = c.benchmark_group("cb-01-bridge-traffic");
    let frames = random_frames(10_000);

    for interfaces in [2usize, 4] {
        group.throughput(Throughput::Elements((frames.len() * interfaces) as u64));
        group.bench_with_input(
            BenchmarkId::new("interfaces", interfaces),
            &frames,
            |b, frames| {
                b.iter(|| {
                    let mut d = detector(50, 4_096);
                    let mut suppressed = 0u32;
                    for (i, (id, payload)) in frames.iter().enumerate() {
                        let now = i as u64 / 10;
                        for copy in 0..interfaces {
                            if d.is_duplicate_at(*id, payload, now + copy as u64)
                                .unwrap_or(false)
                            {
                                suppressed += 1;
                            }
                        }
                    }
                    black_box(suppressed)
                })
            },
        );
    }

    group.finish();
}

pub fn bench_eviction_at_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("cb-01-eviction");
    let frames = random_frames(20_000);

    for max in [256usize, 4_096, 65_536] {
        group.throughput(Throughput::Elements(frames.len() as u64));
        group.bench_with_input(BenchmarkId::new("max_cache", max), &frames, |b, frames| {
            b.iter(|| {
                // Window far longer than the run: only eviction removes entries.
                let mut d = detector(u64::MAX / 2, max);
                for (id, payload) in frames {
                    black_box(d.is_duplicate_at(*id, payload, 0).ok());
                }
                black_box(d.len())
            })
        });
    }

    group.finish();
}

pub fn bench_expiry_backlog(c: &mut Criterion) {
    let mut group = c.benchmark_group("cb-01-expiry");
    group.measurement_time(Duration::from_secs(5));

    for backlog in [1_000usize, 10_000, 50_000] {
        let frames = random_frames(backlog);
        group.throughput(Throughput::Elements(backlog as u64));
        group.bench_with_input(BenchmarkId::new("backlog", backlog), &frames, |b, frames| {
            b.iter_batched(
                || {
                    let mut d = detector(10, backlog);
                    for (id, payload) in frames {
                        let _ = d.is_duplicate_at(*id, payload, 0);
                    }
                    d
                },
                |mut d| black_box(d.sweep(1_000)),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

pub fn bench_shared_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("cb-01-shared");
    let frames = random_frames(10_000);
    group.throughput(Throughput::Elements(frames.len() as u64));

    group.bench_function("is_duplicate_at", |b| {
        b.iter(|| {
            let d = SharedDuplicateDetector::with_clock(
                DedupConfig::new(50, 4_096).expect("valid config"),
                ManualClock::new(0),
            )
            .expect("valid detector");
            for (i, (id, payload)) in frames.iter().enumerate() {
                black_box(d.is_duplicate_at(*id, payload, i as u64).ok());
            }
        })
    });

    group.finish();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_frames_are_valid() {
        for (id, payload) in random_frames(1_000) {
            assert!(ArbitrationId::new(id).is_ok());
            assert!(payload.len() <= 8);
        }
    }

    /// One million distinct frames never grow the cache past its bound.
    #[test]
    fn brutal_distinct_flood_stays_bounded() {
        let mut d = detector(1_000, 1_024);
        for i in 0..1_000_000u32 {
            let id = i & ArbitrationId::MAX_EXTENDED;
            d.is_duplicate_at(id, &i.to_be_bytes(), u64::from(i / 1_000))
                .unwrap();
            assert!(d.len() <= 1_024);
        }
        assert_eq!(d.len(), d.ledger_len());
    }
}
