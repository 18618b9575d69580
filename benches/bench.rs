// Criterion benchmarks for Petswipe

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use petswipe::core::{render_card, render_list_card, EventBinder};
use petswipe::dom::contract::list_card_id;
use petswipe::dom::{Document, SharedDocument};
use petswipe::models::{Candidate, CandidateId};
use std::sync::Weak;

fn create_candidate(id: usize) -> Candidate {
    Candidate {
        id: CandidateId::new(id.to_string()),
        name: Some(format!("Pet {}", id)),
        image_url: Some(format!("http://img.test/{}.jpg", id)),
        gender: Some(if id % 2 == 0 { "Female" } else { "Male" }.to_string()),
        age: Some("Adult".to_string()),
        size: Some("Medium".to_string()),
        breed: Some("Mixed".to_string()),
        description: Some("Friendly and house trained".to_string()),
    }
}

fn list_page(count: usize) -> Document {
    Document::with_body((0..count).map(|i| render_list_card(&create_candidate(i))))
}

fn bench_render_card(c: &mut Criterion) {
    let candidate = create_candidate(1);
    c.bench_function("render_card", |b| {
        b.iter(|| render_card(black_box(&candidate)));
    });
}

fn bench_bind_list_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_list_page");

    for count in [10, 100, 500].iter() {
        group.bench_with_input(BenchmarkId::new("fresh", count), count, |b, &count| {
            b.iter_with_setup(
                || SharedDocument::new(list_page(count)),
                |document| {
                    let binder = EventBinder::new(document, Weak::new());
                    black_box(binder.bind())
                },
            );
        });
    }

    group.finish();
}

fn bench_card_lookup(c: &mut Criterion) {
    let doc = list_page(500);
    let last = list_card_id("499");

    c.bench_function("lookup_last_of_500_cards", |b| {
        b.iter(|| black_box(doc.get_element_by_id(black_box(&last)).is_some()));
    });
}

criterion_group!(benches, bench_render_card, bench_bind_list_page, bench_card_lookup);

criterion_main!(benches);
