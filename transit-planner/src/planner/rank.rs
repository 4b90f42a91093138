//! Route ranking for alternative results.
//!
//! Orders routes found under different criteria so the most useful options
//! come first.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::search::RouteResult;

/// Rank routes by preference.
///
/// Routes are ranked by:
/// 1. Total time (shorter is better)
/// 2. Number of transfers (fewer is better)
/// 3. Total fare (cheaper is better)
///
/// Invalid routes sort after every valid one. The sort is stable, so routes
/// that tie on all three keep their input order.
pub fn rank_routes(mut routes: Vec<RouteResult>) -> Vec<RouteResult> {
    routes.sort_by(|a, b| {
        // Valid first
        let valid_cmp = b.is_valid().cmp(&a.is_valid());
        if valid_cmp != Ordering::Equal {
            return valid_cmp;
        }

        let time_cmp = a.total_time().total_cmp(&b.total_time());
        if time_cmp != Ordering::Equal {
            return time_cmp;
        }

        let transfers_cmp = a.total_transfers().cmp(&b.total_transfers());
        if transfers_cmp != Ordering::Equal {
            return transfers_cmp;
        }

        a.total_fare().total_cmp(&b.total_fare())
    });

    routes
}

/// Drop routes whose path repeats an earlier route's path.
///
/// The first occurrence of each path is kept and input order is preserved.
pub fn deduplicate(routes: Vec<RouteResult>) -> Vec<RouteResult> {
    if routes.len() <= 1 {
        return routes;
    }

    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(routes.len());
    routes
        .into_iter()
        .filter(|route| seen.insert(route.path().to_vec()))
        .collect()
}
