//! Category-balanced test selection.
//!
//! Given a catalog and a target question count, pick
//! `min(count, catalog.len())` distinct scenarios spread as evenly as the
//! catalog allows across category labels:
//!
//! 1. **Quota**: every category gets `count / k`; the `count % k` leftover
//!    slots go to a random subset of categories, one each.
//! 2. **Draw**: each category contributes up to its quota, drawn without
//!    replacement in random order.
//! 3. **Backfill**: if small categories left slots unfilled, fill them one at
//!    a time from the category with the fewest picks so far that still has
//!    scenarios left. Ties are broken randomly.
//! 4. **Shuffle** the final list so category balance never shows up in the
//!    presentation order.
//!
//! A catalog with no category labels at all degrades to plain uniform
//! sampling without replacement.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::scenario::Scenario;

/// One category's remaining candidates and how many were taken.
struct Bucket<'a> {
    label: &'a str,
    pool: Vec<&'a Scenario>,
    taken: usize,
}

/// Select up to `count` scenarios from `catalog`, balanced across categories.
#[tracing::instrument(skip_all, fields(catalog = catalog.len(), count = count))]
pub fn select<'a, R: Rng + ?Sized>(
    catalog: &'a [Scenario],
    count: usize,
    rng: &mut R,
) -> Vec<&'a Scenario> {
    let target = count.min(catalog.len());
    if target == 0 {
        return Vec::new();
    }

    if catalog.iter().all(|s| s.category.is_none()) {
        tracing::debug!("no category labels; sampling uniformly");
        let mut all: Vec<&Scenario> = catalog.iter().collect();
        all.shuffle(rng);
        all.truncate(target);
        return all;
    }

    let mut buckets = bucket_by_category(catalog, rng);
    let quotas = quotas(buckets.len(), target, rng);

    let mut selected: Vec<&Scenario> = Vec::with_capacity(target);
    for (bucket, quota) in buckets.iter_mut().zip(quotas) {
        let take = quota.min(bucket.pool.len());
        selected.extend(bucket.pool.drain(..take));
        bucket.taken = take;
        tracing::debug!(category = bucket.label, quota, take, "category draw");
    }

    backfill(&mut buckets, &mut selected, target, rng);

    selected.shuffle(rng);
    selected
}

/// Group scenarios by label; each pool is shuffled.
fn bucket_by_category<'a, R: Rng + ?Sized>(catalog: &'a [Scenario], rng: &mut R) -> Vec<Bucket<'a>> {
    let mut groups: BTreeMap<&str, Vec<&Scenario>> = BTreeMap::new();
    for s in catalog {
        groups.entry(s.category_label()).or_default().push(s);
    }
    groups
        .into_iter()
        .map(|(label, mut pool)| {
            pool.shuffle(rng);
            Bucket {
                label,
                pool,
                taken: 0,
            }
        })
        .collect()
}

/// Even split of `target` over `k` categories; the remainder goes to a
/// random subset of them.
fn quotas<R: Rng + ?Sized>(k: usize, target: usize, rng: &mut R) -> Vec<usize> {
    let base = target / k;
    let extra = target % k;
    let mut quotas = vec![base; k];
    let mut lucky: Vec<usize> = (0..k).collect();
    lucky.shuffle(rng);
    for &i in lucky.iter().take(extra) {
        quotas[i] += 1;
    }
    quotas
}

fn backfill<'a, R: Rng + ?Sized>(
    buckets: &mut [Bucket<'a>],
    selected: &mut Vec<&'a Scenario>,
    target: usize,
    rng: &mut R,
) {
    while selected.len() < target {
        let mut open: Vec<usize> = (0..buckets.len())
            .filter(|&i| !buckets[i].pool.is_empty())
            .collect();
        // Shuffle first so `min_by_key` (first minimum wins) breaks ties randomly.
        open.shuffle(rng);
        let Some(&i) = open.iter().min_by_key(|&&i| buckets[i].taken) else {
            break;
        };
        let bucket = &mut buckets[i];
        let Some(s) = bucket.pool.pop() else {
            break;
        };
        selected.push(s);
        bucket.taken += 1;
        tracing::debug!(category = bucket.label, taken = bucket.taken, "backfill");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
