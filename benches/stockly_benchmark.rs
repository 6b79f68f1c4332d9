use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use stockly::resource::{QueryCache, Tag, TagKind};
use stockly::{Principal, Role, RouteGuard, Session};

pub fn guard(c: &mut Criterion) {
    let guard = RouteGuard::new([Role::Buyer, Role::Supplier, Role::SuperAdmin]);
    let sessions = Role::ALL
        .iter()
        .map(|role| Session {
            user: Some(Principal {
                id: 1,
                username: "bench".into(),
                email: "bench@stockly.io".into(),
                role: *role,
            }),
            is_initialized: true,
            ..Session::default()
        })
        .collect::<Vec<_>>();

    c.bench_function("guard_decide", |b| {
        b.iter(|| {
            for session in &sessions {
                black_box(guard.decide(black_box(session)));
            }
        });
    });
}

pub fn invalidate(c: &mut Criterion) {
    const NUM_ENTRIES: usize = 1_000;

    let kinds = [
        TagKind::Order,
        TagKind::Product,
        TagKind::Company,
        TagKind::Warehouse,
    ];

    c.bench_function("invalidate", |b| {
        b.iter(|| {
            let cache = QueryCache::new(Duration::from_secs(60));
            for i in 0..NUM_ENTRIES {
                let kind = kinds[i % kinds.len()];
                let tags = if i % 2 == 0 {
                    vec![Tag::list(kind)]
                } else {
                    vec![Tag::id(kind, i)]
                };
                cache.insert(format!("GET /entries/{}", i), json!({"id": i}), tags);
            }
            black_box(cache.invalidate(&[Tag::id(TagKind::Order, 1), Tag::list(TagKind::Product)]));
        });
    });
}

criterion_group!(benches, guard, invalidate);
criterion_main!(benches);
