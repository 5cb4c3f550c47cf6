use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabwise::models::{DashboardState, Tab, TabGroup};
use tabwise::services::reconcile::{reconcile, Proposal};

const NOW: i64 = 1_700_000_000_000;

fn make_tab(i: usize) -> Tab {
    Tab {
        id: format!("tab-{}", i),
        title: format!("Tab {}", i),
        url: format!("https://site{}.example.com/page", i),
        favicon_url: None,
        last_accessed: Some(NOW - i as i64),
        is_placeholder: None,
    }
}

/// A dashboard with `grouped` tabs spread over 10 groups and `ungrouped`
/// loose tabs, plus proposals that mix extensions, new groups, unknown
/// URLs, and junk.
fn make_workload(grouped: usize, ungrouped: usize) -> (DashboardState, Vec<Proposal>) {
    let tabs: Vec<Tab> = (0..grouped + ungrouped).map(make_tab).collect();
    let mut groups: Vec<TabGroup> = (0..10)
        .map(|g| TabGroup {
            id: format!("group-{}", g),
            name: format!("Group {}", g),
            tabs: vec![],
            color: None,
            is_custom: g % 2 == 0,
        })
        .collect();
    for (i, tab) in tabs.iter().take(grouped).enumerate() {
        groups[i % 10].tabs.push(tab.clone());
    }

    let proposals = (0..20)
        .map(|p| Proposal {
            group_name: if p < 10 {
                format!("Group {}", p) // extend existing
            } else {
                format!("Suggested {}", p) // create new
            },
            tab_urls: (0..ungrouped / 20 + 1)
                .map(|u| {
                    let i = grouped + (p * 7 + u * 13) % ungrouped.max(1);
                    format!("https://site{}.example.com/page", i)
                })
                .chain(std::iter::once(format!("brandnew{}.dev/path", p)))
                .chain(std::iter::once("not a url".to_string()))
                .collect(),
        })
        .collect();

    (DashboardState { tabs, groups }, proposals)
}

fn benchmark_reconcile(c: &mut Criterion) {
    let (small_state, small_proposals) = make_workload(50, 50);
    let (large_state, large_proposals) = make_workload(500, 500);

    let mut group = c.benchmark_group("reconcile");

    group.bench_function("hundred_tabs", |b| {
        b.iter(|| {
            reconcile(
                black_box(&small_state),
                black_box(&small_proposals),
                NOW,
            )
        })
    });

    group.bench_function("thousand_tabs", |b| {
        b.iter(|| {
            reconcile(
                black_box(&large_state),
                black_box(&large_proposals),
                NOW,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_reconcile);
criterion_main!(benches);
