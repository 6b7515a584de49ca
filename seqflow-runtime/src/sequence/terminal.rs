use indexmap::IndexMap;
use seqflow_api::function::{CompareFunction, Element, FilterFunction, KeyFunction, MapFunction};
use seqflow_common::error::{SeqError, SeqResult};
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::Sum;

use super::LazySequence;

impl<T: Element> LazySequence<T> {
    /// Left fold into an accumulator of any type.
    pub fn fold<A, F>(self, init: A, mut func: F) -> SeqResult<A>
    where
        F: FnMut(A, T) -> A,
    {
        self.require_bounded("fold")?;
        let mut acc = init;
        for item in self.source {
            acc = func(acc, item?);
        }
        Ok(acc)
    }

    pub fn collect_to<C>(self) -> SeqResult<C>
    where
        C: FromIterator<T>,
    {
        self.require_bounded("collect_to")?;
        self.source.collect()
    }

    /// Fails with [`SeqError::DuplicateKey`] on the first key seen twice.
    pub fn collect_to_map<K, V, KF, VF>(self, key_fn: KF, value_fn: VF) -> SeqResult<HashMap<K, V>>
    where
        K: Eq + Hash + Debug,
        KF: KeyFunction<T, K>,
        VF: MapFunction<T, V>,
    {
        self.require_bounded("collect_to_map")?;
        let mut map = HashMap::new();
        for item in self.source {
            let value = item?;
            match map.entry(key_fn.key(&value)) {
                Entry::Occupied(slot) => {
                    return Err(SeqError::DuplicateKey(format!("{:?}", slot.key())));
                }
                Entry::Vacant(slot) => {
                    slot.insert(value_fn.map(value));
                }
            }
        }
        Ok(map)
    }

    /// Like [`collect_to_map`](Self::collect_to_map) but resolves duplicate
    /// keys with `merge(existing, incoming)`.
    pub fn collect_to_map_with<K, V, KF, VF, M>(
        self,
        key_fn: KF,
        value_fn: VF,
        merge: M,
    ) -> SeqResult<HashMap<K, V>>
    where
        K: Eq + Hash,
        KF: KeyFunction<T, K>,
        VF: MapFunction<T, V>,
        M: Fn(V, V) -> V,
    {
        self.require_bounded("collect_to_map_with")?;
        let mut map = HashMap::new();
        for item in self.source {
            let value = item?;
            let key = key_fn.key(&value);
            let incoming = value_fn.map(value);
            let merged = match map.remove(&key) {
                Some(existing) => merge(existing, incoming),
                None => incoming,
            };
            map.insert(key, merged);
        }
        Ok(map)
    }

    /// Groups in first-seen key order; each group keeps sequence order.
    pub fn group_by<K, F>(self, key_fn: F) -> SeqResult<IndexMap<K, Vec<T>>>
    where
        K: Eq + Hash,
        F: KeyFunction<T, K>,
    {
        self.require_bounded("group_by")?;
        let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
        for item in self.source {
            let value = item?;
            groups.entry(key_fn.key(&value)).or_default().push(value);
        }
        Ok(groups)
    }

    pub fn sum(self) -> SeqResult<T>
    where
        T: Sum<T>,
    {
        self.require_bounded("sum")?;
        self.source.sum()
    }

    pub fn min(self) -> SeqResult<Option<T>>
    where
        T: Ord,
    {
        self.min_by(|a: &T, b: &T| a.cmp(b))
    }

    pub fn max(self) -> SeqResult<Option<T>>
    where
        T: Ord,
    {
        self.max_by(|a: &T, b: &T| a.cmp(b))
    }

    /// Smallest element; the first one wins a tie.
    pub fn min_by<C>(self, compare: C) -> SeqResult<Option<T>>
    where
        C: CompareFunction<T>,
    {
        self.select_by("min", |candidate, best| compare.compare(candidate, best) == Ordering::Less)
    }

    /// Largest element; the first one wins a tie.
    pub fn max_by<C>(self, compare: C) -> SeqResult<Option<T>>
    where
        C: CompareFunction<T>,
    {
        self.select_by("max", |candidate, best| {
            compare.compare(candidate, best) == Ordering::Greater
        })
    }

    fn select_by<P>(self, op: &str, replaces: P) -> SeqResult<Option<T>>
    where
        P: Fn(&T, &T) -> bool,
    {
        self.require_bounded(op)?;
        let mut best: Option<T> = None;
        for item in self.source {
            let candidate = item?;
            best = match best {
                Some(current) if !replaces(&candidate, &current) => Some(current),
                _ => Some(candidate),
            };
        }
        Ok(best)
    }

    /// Mean of `key_fn` over all elements, `None` for an empty sequence.
    pub fn average_by<F>(self, key_fn: F) -> SeqResult<Option<f64>>
    where
        F: KeyFunction<T, f64>,
    {
        self.require_bounded("average")?;
        let mut total = 0.0;
        let mut n = 0usize;
        for item in self.source {
            total += key_fn.key(&item?);
            n += 1;
        }
        Ok((n > 0).then(|| total / n as f64))
    }

    /// Stops at the first match, so it may be used on an unbounded sequence.
    pub fn any_match<F>(self, pred: F) -> SeqResult<bool>
    where
        F: FilterFunction<T>,
    {
        for item in self.source {
            if pred.filter(&item?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn all_match<F>(self, pred: F) -> SeqResult<bool>
    where
        F: FilterFunction<T>,
    {
        for item in self.source {
            if !pred.filter(&item?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn none_match<F>(self, pred: F) -> SeqResult<bool>
    where
        F: FilterFunction<T>,
    {
        self.any_match(pred).map(|found| !found)
    }

    pub fn find_first(self) -> SeqResult<Option<T>> {
        let mut source = self.source;
        source.next().transpose()
    }
}
