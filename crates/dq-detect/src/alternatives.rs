//! Key-collision clustering of categorical labels.
//!
//! Each distinct label is reduced to a fingerprint; labels sharing a
//! fingerprint form a cluster whose representative is the canonical
//! spelling. Every other label of the cluster is an alternative spelling and
//! is reported as an error.
//!
//! The work is proportional to the number of distinct labels: a single pass
//! builds the fingerprint to cluster map, labels are never compared pairwise.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use dq_model::{Cluster, FittedClusters, FittedState, Representative};

/// Two-character tag such as `fr:` opening a label.
static TAG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.{2}:").expect("Invalid tag prefix regex"));

/// Canonical form of a label.
///
/// Drops a leading two-character tag, trims and lowercases, folds accents
/// to ASCII, turns every non-letter into a separator, then sorts and dedupes
/// the tokens. Digits do not take part in the key.
///
/// ```
/// use dq_detect::alternatives::fingerprint;
///
/// assert_eq!(fingerprint("Torvalds, Linus"), "linus torvalds");
/// assert_eq!(fingerprint(" linus.torvalds "), "linus torvalds");
/// assert_eq!(fingerprint("Café"), fingerprint("cafe"));
/// ```
pub fn fingerprint(label: &str) -> String {
    let untagged = TAG_PREFIX.replace(label, " ");
    let folded: String = untagged
        .trim()
        .to_lowercase()
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
        .collect();
    let mut tokens: Vec<&str> = folded.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.dedup();
    tokens.join(" ")
}

struct Building<'a> {
    key: String,
    labels: Vec<&'a str>,
    counts: Vec<usize>,
}

/// Clusters the non-missing `labels`.
pub fn fit(labels: &[Option<String>], representative: Representative) -> FittedState {
    let mut by_label: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut building: Vec<Building<'_>> = Vec::new();

    for label in labels.iter().flatten() {
        if let Some(&(cluster, slot)) = by_label.get(label.as_str()) {
            building[cluster].counts[slot] += 1;
            continue;
        }
        let key = fingerprint(label);
        let cluster = *by_key.entry(key.clone()).or_insert_with(|| {
            building.push(Building {
                key,
                labels: Vec::new(),
                counts: Vec::new(),
            });
            building.len() - 1
        });
        let entry = &mut building[cluster];
        entry.labels.push(label);
        entry.counts.push(1);
        by_label.insert(label, (cluster, entry.labels.len() - 1));
    }

    if building.is_empty() {
        return FittedState::Trivial;
    }

    let clusters: Vec<Cluster> = building
        .into_iter()
        .map(|b| {
            let chosen = match representative {
                Representative::FirstEncountered => 0,
                Representative::MostFrequent => most_frequent(&b.counts),
            };
            Cluster {
                representative: b.labels[chosen].to_string(),
                labels: b.labels.iter().map(|l| (*l).to_string()).collect(),
                key: b.key,
            }
        })
        .collect();

    let fitted = FittedClusters { clusters };
    tracing::debug!(
        n_clusters = fitted.clusters.len(),
        n_collisions = fitted.collisions().count(),
        "fitted alternatives"
    );
    FittedState::Clusters(fitted)
}

/// Slot of the highest count; ties go to the lowest slot.
fn most_frequent(counts: &[usize]) -> usize {
    let mut best = 0;
    for (slot, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = slot;
        }
    }
    best
}

/// Fingerprint lookup over fitted clusters.
#[derive(Debug)]
pub struct ClusterIndex<'a> {
    clusters: &'a FittedClusters,
    by_key: HashMap<&'a str, usize>,
}

impl<'a> ClusterIndex<'a> {
    pub fn new(clusters: &'a FittedClusters) -> Self {
        let by_key = clusters
            .clusters
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.key.as_str(), idx))
            .collect();
        Self { clusters, by_key }
    }

    /// Cluster id and cluster of `label`, `None` for unknown fingerprints.
    pub fn lookup(&self, label: &str) -> Option<(usize, &'a Cluster)> {
        let idx = *self.by_key.get(fingerprint(label).as_str())?;
        Some((idx, &self.clusters.clusters[idx]))
    }

    /// Representative spelling of `label`, `None` for unknown fingerprints.
    pub fn representative(&self, label: &str) -> Option<&'a str> {
        self.lookup(label).map(|(_, c)| c.representative.as_str())
    }
}

/// Flags labels that differ from their cluster's representative.
///
/// A label whose fingerprint was never seen at fit time has no
/// representative and is flagged too. Returns the mask and the cluster id
/// of every row.
pub fn detect(clusters: &FittedClusters, labels: &[Option<String>]) -> (Vec<bool>, Vec<Option<usize>>) {
    let index = ClusterIndex::new(clusters);
    let mut cache: HashMap<&str, Option<(usize, bool)>> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            let Some(label) = label.as_deref() else {
                return (false, None);
            };
            let hit = *cache.entry(label).or_insert_with(|| {
                index
                    .lookup(label)
                    .map(|(idx, cluster)| (idx, cluster.representative != label))
            });
            match hit {
                Some((idx, flagged)) => (flagged, Some(idx)),
                None => (true, None),
            }
        })
        .unzip()
}
