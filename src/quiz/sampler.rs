use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::question::normalize::Question;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleMode {
    /// Shuffle-then-take over the whole pool.
    Plain,
    /// Spread the selection across focus areas before topping up.
    Balanced,
}

/// Assemble a quiz from the pool.
///
/// `target_count` is caller-validated against the configured bounds but is
/// defensively clamped to the pool size here. `shuffle` reorders question
/// presentation only; choice order inside a question is never touched. The
/// rng is injected so tests can assert the algorithm's structure with a
/// seeded [`SmallRng`].
pub fn select_quiz(
    pool: &[Question],
    target_count: usize,
    mode: SampleMode,
    shuffle: bool,
    rng: &mut SmallRng,
) -> Vec<Question> {
    let target = target_count.min(pool.len());
    match mode {
        SampleMode::Plain => plain(pool, target, shuffle, rng),
        SampleMode::Balanced => balanced(pool, target, shuffle, rng),
    }
}

fn plain(pool: &[Question], target: usize, shuffle: bool, rng: &mut SmallRng) -> Vec<Question> {
    let mut ordered: Vec<&Question> = pool.iter().collect();
    if shuffle {
        ordered.shuffle(rng);
    }
    ordered.into_iter().take(target).cloned().collect()
}

/// Balanced selection: a fair per-area baseline, then a one-question-per-area
/// top-up pass in random area order, then uniform top-up from whatever is
/// left. Buckets partition the pool, so the result can never hold duplicate
/// questions.
fn balanced(pool: &[Question], target: usize, shuffle: bool, rng: &mut SmallRng) -> Vec<Question> {
    let mut by_area: BTreeMap<&str, Vec<&Question>> = BTreeMap::new();
    for question in pool {
        by_area.entry(question.focus.as_str()).or_default().push(question);
    }
    let area_count = by_area.len();
    if area_count == 0 {
        return plain(pool, target, shuffle, rng);
    }

    // Baseline: 1 or 2 per area, whichever target/k allows.
    let per_area = (target / area_count).clamp(1, 2);
    let mut picked: Vec<&Question> = Vec::with_capacity(target);
    for bucket in by_area.values_mut() {
        bucket.shuffle(rng);
        let take = per_area.min(bucket.len());
        picked.extend(bucket.drain(..take));
    }

    // One extra question per area that still has any, visiting areas in
    // random order so no area is systematically favored.
    if picked.len() < target {
        let mut areas: Vec<&str> = by_area
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(area, _)| *area)
            .collect();
        areas.shuffle(rng);
        for area in areas {
            if picked.len() >= target {
                break;
            }
            if let Some(bucket) = by_area.get_mut(area)
                && let Some(question) = bucket.pop()
            {
                picked.push(question);
            }
        }
    }

    // Small pools can still fall short; fill uniformly from the remainder.
    if picked.len() < target {
        let mut rest: Vec<&Question> = by_area.values_mut().flat_map(|b| b.drain(..)).collect();
        rest.shuffle(rng);
        picked.extend(rest.into_iter().take(target - picked.len()));
    }

    // Rounding overshoot from the per-area baseline.
    picked.truncate(target);

    if shuffle {
        picked.shuffle(rng);
    }
    picked.into_iter().cloned().collect()
}
