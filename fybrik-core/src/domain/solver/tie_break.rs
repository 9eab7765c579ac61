// fybrik-core/src/domain/solver/tie_break.rs
//
// Deterministic ranking among multiple feasible completions, per spec
// §4.5: fewest edges, then fewest cross-region hops, then lowest summed
// storage-account cost, then lexicographically-smallest module names.

use crate::domain::environment::Environment;
use crate::domain::model::{AttributeValue, Solution};

/// Returns whichever of `a`/`b` ranks first. Ties (equal keys) keep `a`,
/// so repeated calls over a fixed iteration order are stable.
pub fn better(env: &Environment, a: Solution, b: Solution) -> Solution {
    if rank_key(env, &b) < rank_key(env, &a) {
        b
    } else {
        a
    }
}

type RankKey = (usize, usize, ordered_float::NotNanOrZero, Vec<String>);

fn rank_key(env: &Environment, solution: &Solution) -> RankKey {
    (
        solution.len(),
        cross_region_hops(env, solution),
        ordered_float::NotNanOrZero(total_storage_cost(env, solution)),
        module_names_sorted(solution),
    )
}

fn cross_region_hops(env: &Environment, solution: &Solution) -> usize {
    solution
        .edges
        .windows(2)
        .filter(|pair| {
            let a = env.cluster(&pair[0].cluster).and_then(|c| c.region());
            let b = env.cluster(&pair[1].cluster).and_then(|c| c.region());
            a != b
        })
        .count()
}

fn total_storage_cost(env: &Environment, solution: &Solution) -> f64 {
    solution
        .edges
        .iter()
        .filter_map(|e| e.storage_account.as_ref())
        .filter_map(|name| env.storage_account(name))
        .map(|account| match env.storage_account_attributes(account).get("cost") {
            Some(AttributeValue::Number(n)) => *n,
            _ => 0.0,
        })
        .sum()
}

fn module_names_sorted(solution: &Solution) -> Vec<String> {
    let mut names: Vec<String> = solution.edges.iter().map(|e| e.module.clone()).collect();
    names.sort();
    names
}

/// A minimal `f64` wrapper giving us `Ord` for the tie-break tuple without
/// pulling in a crate dependency for one comparison: solver costs are
/// always finite, so `NaN` never legitimately occurs here.
mod ordered_float {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct NotNanOrZero(pub f64);

    impl Eq for NotNanOrZero {}

    impl PartialOrd for NotNanOrZero {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for NotNanOrZero {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
        }
    }
}
