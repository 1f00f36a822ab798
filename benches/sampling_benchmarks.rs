use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use quizdr::question::normalize::{RawAnswer, RawQuestion, normalize};
use quizdr::quiz::sampler::{SampleMode, select_quiz};
use quizdr::quiz::scoring::score;

fn make_raw(count: usize) -> Vec<RawQuestion> {
    (0..count)
        .map(|i| RawQuestion {
            id: Some(format!("q{i}")),
            q: Some(format!("prompt number {i}")),
            choices: vec![
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string(),
                "delta".to_string(),
            ],
            answer: Some(if i % 3 == 0 {
                RawAnswer::Many(vec![0, 2])
            } else {
                RawAnswer::One((i % 4) as i64)
            }),
            focus: Some(format!("{}.{}", i % 9 + 1, i % 5 + 1)),
            ..RawQuestion::default()
        })
        .collect()
}

fn make_pool(count: usize) -> Vec<quizdr::question::Question> {
    let mut rng = SmallRng::seed_from_u64(42);
    make_raw(count)
        .into_iter()
        .map(|raw| normalize(raw, &mut rng))
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize (500 raw records)", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(1);
            make_raw(500)
                .into_iter()
                .map(|raw| normalize(black_box(raw), &mut rng))
                .count()
        })
    });
}

fn bench_select_plain(c: &mut Criterion) {
    let pool = make_pool(500);
    c.bench_function("select_quiz plain 40/500", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(2);
            select_quiz(black_box(&pool), 40, SampleMode::Plain, true, &mut rng)
        })
    });
}

fn bench_select_balanced(c: &mut Criterion) {
    let pool = make_pool(500);
    c.bench_function("select_quiz balanced 40/500", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(3);
            select_quiz(black_box(&pool), 40, SampleMode::Balanced, true, &mut rng)
        })
    });
}

fn bench_score(c: &mut Criterion) {
    let pool = make_pool(40);
    let slots: Vec<_> = pool.iter().map(|q| q.answer.clone()).collect();
    c.bench_function("score 40-question session", |b| {
        b.iter(|| score(black_box(&pool), black_box(&slots)))
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_select_plain,
    bench_select_balanced,
    bench_score
);
criterion_main!(benches);
