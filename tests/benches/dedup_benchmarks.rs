//! # Canbridge Deduplication Benchmarks
//!
//! | Operation | Claim | Target |
//! |-----------|-------|--------|
//! | Signature | O(payload), payload <= 8 bytes | < 100ns |
//! | Duplicate check | amortized O(1) | < 1us per frame |
//! | Eviction at capacity | O(1) per insert | < 1us per frame |
//! | Expiry backlog | O(expired) | linear in backlog |

use cb_tests::benchmarks::cb_01_frame_dedup::{
    bench_bridge_traffic, bench_eviction_at_capacity, bench_expiry_backlog,
    bench_shared_uncontended, bench_signature,
};
use criterion::{criterion_group, criterion_main};

criterion_group!(
    benches,
    bench_signature,
    bench_bridge_traffic,
    bench_eviction_at_capacity,
    bench_expiry_backlog,
    bench_shared_uncontended,
);

criterion_main!(benches);
