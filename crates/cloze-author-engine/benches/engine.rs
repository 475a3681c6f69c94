use cloze_author_engine::{AnnotationEngine, SelectionEvent};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn generate_sentences(count: usize) -> String {
    (0..count)
        .map(|i| format!("Sentence number {i} mentions the word token{i} once. "))
        .collect()
}

/// Engine over `count` sentences with every `tokenN` turned into a blank
fn engine_with_blanks(count: usize) -> AnnotationEngine {
    let text = generate_sentences(count);
    let mut engine = AnnotationEngine::from_text(&text);
    for i in 0..count {
        let needle = format!("token{i} ");
        let flat = engine.flat_text();
        let Some(byte_start) = flat.find(&needle) else {
            continue;
        };
        let start = flat[..byte_start].chars().count();
        let event = SelectionEvent::new(start, start + needle.chars().count(), needle);
        engine.apply_selection(&event).unwrap();
    }
    engine
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    group.sample_size(20);

    let engine = engine_with_blanks(200);
    let flat = engine.flat_text();
    let start = flat.find("Sentence number 199").unwrap();
    let event = SelectionEvent::new(start, start + 8, "Sentence");

    group.bench_function("create_and_remove_near_end", |b| {
        b.iter(|| {
            let mut engine = engine.clone();
            engine.apply_selection(black_box(&event)).unwrap();
            engine.apply_selection(black_box(&event)).unwrap();
            black_box(engine);
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(20);

    let engine = engine_with_blanks(200);
    group.bench_function("preview_200_blanks", |b| {
        b.iter(|| black_box(engine.render()));
    });

    group.finish();
}

criterion_group!(benches, bench_selection, bench_render);
criterion_main!(benches);
