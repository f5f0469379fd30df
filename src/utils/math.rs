/// Returns the index of the maximum value in the slice `vec` if found, [`None`] otherwise.
///
/// In case of ties, the smallest index is returned.
///
/// # Arguments
/// - `vec`: the slice of elements.
///
/// # Examples
/// ```
/// # use webgraph_dagpart::utils::math::argmax;
/// let v = vec![1, 2, 5, 2, 5];
/// let index = argmax(&v);
/// assert_eq!(index, Some(2));
/// ```
pub fn argmax<T: std::cmp::PartialOrd + Copy>(vec: &[T]) -> Option<usize> {
    filtered_argmax(vec, |_, _| true)
}

/// Returns the index of the maximum value approved by `filter` in the slice `vec` if found, [`None`] otherwise.
///
/// In case of ties, the smallest index is returned.
///
/// # Arguments
/// - `vec`: the slice of elements.
/// - `filter`: a closure that takes as arguments the index of the element and the element itself and returns
///   `true` if the element may be selected.
///
/// # Examples
/// ```
/// # use webgraph_dagpart::utils::math::filtered_argmax;
/// let v = vec![1, 2, 5, 2, 1];
/// let index = filtered_argmax(&v, |_, element| element < 4);
/// assert_eq!(index, Some(1));
/// ```
pub fn filtered_argmax<T: std::cmp::PartialOrd + Copy, F: Fn(usize, T) -> bool>(
    vec: &[T],
    filter: F,
) -> Option<usize> {
    let mut argmax: Option<(usize, T)> = None;
    for (i, &elem) in vec.iter().enumerate() {
        if filter(i, elem) && argmax.map_or(true, |(_, max)| elem > max) {
            argmax = Some((i, elem));
        }
    }
    argmax.map(|(i, _)| i)
}

/// Returns the index of the minimum value in the slice `vec` if found, [`None`] otherwise.
///
/// In case of ties, the smallest index is returned.
///
/// # Arguments
/// - `vec`: the slice of elements.
///
/// # Examples
/// ```
/// # use webgraph_dagpart::utils::math::argmin;
/// let v = vec![4, 3, 1, 3, 1];
/// let index = argmin(&v);
/// assert_eq!(index, Some(2));
/// ```
pub fn argmin<T: std::cmp::PartialOrd + Copy>(vec: &[T]) -> Option<usize> {
    let mut argmin: Option<(usize, T)> = None;
    for (i, &elem) in vec.iter().enumerate() {
        if argmin.map_or(true, |(_, min)| elem < min) {
            argmin = Some((i, elem));
        }
    }
    argmin.map(|(i, _)| i)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty() {
        let v: Vec<usize> = Vec::new();
        assert_eq!(argmax(&v), None);
        assert_eq!(argmin(&v), None);
        assert_eq!(filtered_argmax(&[1, 2], |_, _| false), None);
    }

    #[test]
    fn test_floats() {
        let v = [0.5, 2.25, -1.0, 2.25];
        assert_eq!(argmax(&v), Some(1));
        assert_eq!(argmin(&v), Some(2));
        assert_eq!(filtered_argmax(&v, |i, _| i != 1), Some(3));
    }
}
