use rayon::prelude::*;

/// Returns at most `k` of `candidates` with the largest `degree`, by
/// decreasing degree; ties are broken by increasing node id.
///
/// # Examples
/// ```
/// # use webgraph_dagpart::utils::top_k_by_degree;
/// let degrees = [3, 1, 4, 1, 5, 4];
/// let top = top_k_by_degree(vec![0, 1, 2, 3, 4, 5], |node| degrees[node], 3);
/// assert_eq!(top, vec![4, 2, 5]);
/// ```
pub fn top_k_by_degree(
    candidates: Vec<usize>,
    degree: impl Fn(usize) -> usize + Sync,
    k: usize,
) -> Vec<usize> {
    if k == 0 {
        return Vec::new();
    }
    let mut ranked: Vec<(usize, usize)> = candidates
        .into_par_iter()
        .map(|node| (degree(node), node))
        .collect();
    let order = |a: &(usize, usize), b: &(usize, usize)| b.0.cmp(&a.0).then(a.1.cmp(&b.1));
    if ranked.len() > k {
        ranked.select_nth_unstable_by(k - 1, order);
        ranked.truncate(k);
    }
    ranked.par_sort_unstable_by(order);
    ranked.into_iter().map(|(_, node)| node).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ties_and_short_lists() {
        let degrees = [2, 2, 2, 7];
        assert_eq!(top_k_by_degree(vec![0, 1, 2, 3], |n| degrees[n], 2), vec![3, 0]);
        assert_eq!(top_k_by_degree(vec![2, 1], |n| degrees[n], 10), vec![1, 2]);
        assert!(top_k_by_degree(vec![0, 1], |n| degrees[n], 0).is_empty());
    }
}
