//! The per-call memoization table mapping realized value -> cheapest known
//! reverse-polish expression reaching it, layered by component count (§4.4).

use std::collections::BTreeMap;

use crate::expr::Token;

/// A finite `f64` wrapped so it implements a total order, purely so it can
/// be used as a `BTreeMap` key. The engine only ever stores values realized
/// by series/parallel composition of strictly positive, finite catalogue
/// entries, so IEEE total ordering (not IEEE comparison semantics) is all
/// that is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedF64(f64);

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Ordered map from realized value -> cheapest expression reaching it,
/// layered by component count.
///
/// Scoped to a single [`crate::engine::synthesize`] call: insertion is
/// append-only for the store's lifetime, and it is dropped at call return.
pub struct MemoStore {
    levels: Vec<BTreeMap<OrderedF64, Vec<Token>>>,
    /// Component count of the cheapest expression currently stored for each
    /// value, used to enforce the "keep the smaller component count"
    /// insertion policy across levels.
    best_level: std::collections::HashMap<OrderedF64, usize>,
}

impl MemoStore {
    /// Creates a store with `max_level` levels (indices `1..=max_level`),
    /// seeded with every catalogue entry at level 1.
    pub fn new(catalogue: &[f64], max_level: usize) -> Self {
        let mut store = MemoStore {
            levels: (0..=max_level).map(|_| BTreeMap::new()).collect(),
            best_level: std::collections::HashMap::new(),
        };
        for &v in catalogue {
            store.insert(1, v, vec![Token::Value(v)]);
        }
        store
    }

    /// Inserts `(value, expr)` at `level`. Idempotent on `value`: if a
    /// cheaper (lower component count) expression for this value is
    /// already known, the insert is a no-op.
    pub fn insert(&mut self, level: usize, value: f64, expr: Vec<Token>) {
        let key = OrderedF64(value);
        if let Some(&existing_level) = self.best_level.get(&key) {
            if existing_level <= level {
                return;
            }
            self.levels[existing_level].remove(&key);
        }
        self.levels[level].insert(key, expr);
        self.best_level.insert(key, level);
    }

    /// Returns the two candidates bracketing `target` by value across all
    /// levels simultaneously, picking whichever is closer; ties are broken
    /// by lower component count (and, failing that, by lower value).
    pub fn nearest(&self, target: f64) -> Option<(f64, Vec<Token>)> {
        let mut best: Option<(f64, usize, &Vec<Token>)> = None;
        for (level, map) in self.levels.iter().enumerate() {
            if level == 0 {
                continue;
            }
            for candidate in bracket(map, target) {
                let (value, expr) = candidate;
                let error = (value - target).abs();
                let replace = match &best {
                    None => true,
                    Some((best_value, best_level, _)) => {
                        let best_error = (*best_value - target).abs();
                        error < best_error
                            || (error == best_error && level < *best_level)
                            || (error == best_error && level == *best_level && value < *best_value)
                    }
                };
                if replace {
                    best = Some((value, level, expr));
                }
            }
        }
        best.map(|(value, _, expr)| (value, expr.clone()))
    }

    /// Ordered keys at level `k`, for binary-search bracket lookup.
    pub fn level_keys(&self, k: usize) -> Vec<f64> {
        self.levels[k].keys().map(|k| k.0).collect()
    }

    /// The expression stored for `value` at exactly level `k`, if any. Used
    /// by the engine's budget-restricted probe, which must not see entries
    /// from levels beyond its remaining component budget.
    pub fn get(&self, k: usize, value: f64) -> Option<&Vec<Token>> {
        self.levels[k].get(&OrderedF64(value))
    }
}

/// The floor and ceiling entries of `map` bracketing `target`, if present.
fn bracket(map: &BTreeMap<OrderedF64, Vec<Token>>, target: f64) -> Vec<(f64, &Vec<Token>)> {
    let key = OrderedF64(target);
    let mut out = Vec::with_capacity(2);
    if let Some((k, v)) = map.range(..=key).next_back() {
        out.push((k.0, v));
    }
    if let Some((k, v)) = map.range(key..).next() {
        if out.first().map(|(existing, _)| *existing) != Some(k.0) {
            out.push((k.0, v));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Operator;

    #[test]
    fn seeds_level_one_from_the_catalogue() {
        let store = MemoStore::new(&[10.0, 15.0, 22.0], 3);
        assert_eq!(store.level_keys(1), vec![10.0, 15.0, 22.0]);
    }

    #[test]
    fn nearest_brackets_the_target_across_levels() {
        let store = MemoStore::new(&[10.0, 15.0, 22.0], 3);
        let (value, _) = store.nearest(16.0).unwrap();
        assert_eq!(value, 15.0);
    }

    #[test]
    fn insert_keeps_the_cheaper_component_count() {
        let mut store = MemoStore::new(&[10.0], 3);
        store.insert(
            3,
            25.0,
            vec![Token::Op(Operator::Series), Token::Value(15.0), Token::Value(10.0)],
        );
        assert_eq!(store.level_keys(3), vec![25.0]);

        // A cheaper (level 2) route to the same value arrives later: it
        // must replace the level-3 entry, not sit alongside it.
        store.insert(2, 25.0, vec![Token::Value(25.0)]);
        assert_eq!(store.level_keys(3), Vec::<f64>::new());
        assert_eq!(store.level_keys(2), vec![25.0]);

        // A later, more expensive route to the same value must not
        // displace the cheaper one already on record.
        store.insert(
            3,
            25.0,
            vec![Token::Op(Operator::Series), Token::Value(15.0), Token::Value(10.0)],
        );
        assert_eq!(store.level_keys(3), Vec::<f64>::new());
    }
}
