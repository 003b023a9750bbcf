//! Accepted-value sets of the counts and freq detectors.

use std::collections::{BTreeMap, BTreeSet};

use dq_model::{CountsOptions, FittedState, FittedValues, FreqOptions};

fn tally(keys: &[Option<String>]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for key in keys.iter().flatten() {
        *counts.entry(key.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Values seen more than `n` times are valid.
pub fn counts(options: &CountsOptions, keys: &[Option<String>]) -> FittedState {
    let tallies = tally(keys);
    if tallies.is_empty() {
        return FittedState::Trivial;
    }
    let n_samples = tallies.values().sum();
    let valid: BTreeSet<String> = tallies
        .into_iter()
        .filter(|&(_, count)| count > options.n)
        .map(|(key, _)| key.to_string())
        .collect();
    tracing::debug!(n = options.n, n_valid = valid.len(), "fitted counts");
    FittedState::Values(FittedValues { valid, n_samples })
}

/// Values whose share of non-missing cells exceeds `freq` are valid.
pub fn freq(options: &FreqOptions, keys: &[Option<String>]) -> FittedState {
    let tallies = tally(keys);
    if tallies.is_empty() {
        return FittedState::Trivial;
    }
    let n_samples: usize = tallies.values().sum();
    let total = n_samples as f64;
    let valid: BTreeSet<String> = tallies
        .into_iter()
        .filter(|&(_, count)| count as f64 / total > options.freq)
        .map(|(key, _)| key.to_string())
        .collect();
    tracing::debug!(freq = options.freq, n_valid = valid.len(), "fitted freq");
    FittedState::Values(FittedValues { valid, n_samples })
}
