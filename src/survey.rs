//! Synthetic survey dataset and response tallies

use std::collections::HashMap;

use anyhow::Result;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{AgeGroup, OpinionChange, Support, SurveyResponse};

pub const SAMPLE_SIZE: usize = 147;
pub const SAMPLE_SEED: u64 = 42;

const AGE_WEIGHTS: [f64; 3] = [0.40, 0.35, 0.25];
const SUPPORT_WEIGHTS: [f64; 3] = [0.56, 0.22, 0.22];

/// Generate a reproducible demographic sample: the same `seed` always
/// yields the same responses.
pub fn generate_sample(count: usize, seed: u64) -> Result<Vec<SurveyResponse>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let age_dist = WeightedIndex::new(AGE_WEIGHTS)?;
    let support_dist = WeightedIndex::new(SUPPORT_WEIGHTS)?;

    let responses = (0..count)
        .map(|_| SurveyResponse {
            age_group: AgeGroup::ALL[age_dist.sample(&mut rng)],
            support: Support::ALL[support_dist.sample(&mut rng)],
            change: OpinionChange::ALL[rng.gen_range(0..OpinionChange::ALL.len())],
        })
        .collect();

    Ok(responses)
}

/// Count responses per support answer, most common first, ties by label.
/// Answers nobody gave are left out.
pub fn tally(responses: &[SurveyResponse]) -> Vec<(Support, usize)> {
    let mut counts: HashMap<Support, usize> = HashMap::new();
    for response in responses {
        *counts.entry(response.support).or_default() += 1;
    }

    let mut list: Vec<_> = counts.into_iter().collect();
    list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.label().cmp(b.0.label())));
    list
}
