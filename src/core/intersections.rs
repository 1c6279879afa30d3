use crate::domain::model::{IncidenceMatrix, Intersection, SortBy, UpsetSummary};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Groups items by membership pattern. Each group is an exclusive
/// intersection: its items are in exactly those sets.
pub fn summarize(matrix: &IncidenceMatrix, sort_by: SortBy) -> UpsetSummary {
    let mut counts: HashMap<&[bool], usize> = HashMap::new();
    for (_, row) in matrix.rows() {
        *counts.entry(row).or_insert(0) += 1;
    }

    let set_sizes: Vec<usize> = (0..matrix.column_count())
        .map(|column| matrix.rows().filter(|(_, row)| row[column]).count())
        .collect();
    let set_order = rank_sets(&set_sizes);

    let mut intersections: Vec<Intersection> = counts
        .into_iter()
        .map(|(members, size)| Intersection {
            members: members.to_vec(),
            size,
        })
        .collect();
    intersections.sort_by(|a, b| compare(a, b, sort_by, &set_order));

    UpsetSummary {
        set_names: matrix.set_names().to_vec(),
        set_sizes,
        set_order,
        item_count: matrix.row_count(),
        intersections,
    }
}

/// Column indices by set size, largest first. The sort is stable so equal
/// sizes keep entry order.
fn rank_sets(set_sizes: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..set_sizes.len()).collect();
    order.sort_by(|a, b| set_sizes[*b].cmp(&set_sizes[*a]));
    order
}

// Membership read from the lowest-ranked set upwards, so patterns that
// include higher-ranked sets sort first.
fn pattern_key(intersection: &Intersection, set_order: &[usize]) -> Vec<bool> {
    set_order
        .iter()
        .rev()
        .map(|column| intersection.members[*column])
        .collect()
}

fn compare(a: &Intersection, b: &Intersection, sort_by: SortBy, set_order: &[usize]) -> Ordering {
    let pattern = || pattern_key(a, set_order).cmp(&pattern_key(b, set_order));
    match sort_by {
        SortBy::Cardinality => b
            .size
            .cmp(&a.size)
            .then_with(|| a.degree().cmp(&b.degree()))
            .then_with(pattern),
        SortBy::Degree => a.degree().cmp(&b.degree()).then_with(pattern),
    }
}
