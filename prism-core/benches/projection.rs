//! Projection maintenance benchmarks.

use std::any::Any;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use prism_core::regions::{
    Member, MemberCollection, NavigationKind, SortComparison, View, ViewRef, ViewsCollection,
};

struct Tile(u32);

impl View for Tile {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn label(view: &ViewRef) -> u32 {
    view.as_any().downcast_ref::<Tile>().map(|t| t.0).unwrap_or(0)
}

fn populated(size: u32) -> (Arc<MemberCollection>, Vec<Arc<Member>>) {
    let raw = MemberCollection::new();
    let members: Vec<Arc<Member>> = (0..size)
        .map(|i| Member::new(Arc::new(Tile(size - i))))
        .collect();
    raw.extend(members.iter().cloned());
    (raw, members)
}

fn activation_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("activation_toggle");
    for size in [10u32, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (raw, members) = populated(size);
            let active = ViewsCollection::active(raw);
            let target = &members[members.len() / 2];
            b.iter(|| {
                target.set_active(true, NavigationKind::Programmatic);
                target.set_active(false, NavigationKind::Programmatic);
                black_box(active.len())
            });
        });
    }
    group.finish();
}

fn sorted_add_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_add_remove");
    for size in [10u32, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (raw, _members) = populated(size);
            let views = ViewsCollection::all(raw.clone());
            let sort: SortComparison = Arc::new(|a: &ViewRef, b: &ViewRef| label(a).cmp(&label(b)));
            views.set_sort_comparison(Some(sort));
            b.iter(|| {
                let member = Member::new(Arc::new(Tile(size / 2)));
                raw.push(member.clone());
                raw.remove(&member);
                black_box(views.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, activation_toggle, sorted_add_remove);
criterion_main!(benches);
