use rayon::prelude::*;

/// Returns the distinct values of `labels` with their number of occurrences,
/// by decreasing count; ties are broken by increasing label.
///
/// The labels are collected, sorted and merged.
///
/// # Examples
/// ```
/// # use webgraph_dagpart::utils::count_labels;
/// let counts = count_labels(vec![7, 3, 7, 9, 3, 7]);
/// assert_eq!(counts, vec![(7, 3), (3, 2), (9, 1)]);
/// ```
pub fn count_labels(labels: impl IntoParallelIterator<Item = usize>) -> Vec<(usize, usize)> {
    let mut labels: Vec<usize> = labels.into_par_iter().collect();
    labels.par_sort_unstable();

    let mut counts: Vec<(usize, usize)> = Vec::new();
    for label in labels {
        match counts.last_mut() {
            Some((last, count)) if *last == label => *count += 1,
            _ => counts.push((label, 1)),
        }
    }

    counts.par_sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    counts
}
