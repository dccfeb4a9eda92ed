/// Order-independent equality: true iff both slices hold the same multiset.
///
/// Sorts borrowed copies, so neither input is reordered.
pub fn unordered_eq<T>(lhs: &[T], rhs: &[T]) -> bool
where
    T: Ord,
{
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut lhs_sorted: Vec<&T> = lhs.iter().collect();
    let mut rhs_sorted: Vec<&T> = rhs.iter().collect();
    lhs_sorted.sort_unstable();
    rhs_sorted.sort_unstable();

    lhs_sorted
        .iter()
        .zip(rhs_sorted.iter())
        .all(|(l, r)| l == r)
}

#[test]
fn test_unordered_eq() {
    {
        let empty: Vec<&str> = vec![];
        assert!(unordered_eq(&empty, &empty));
    }

    {
        let l = vec!["x", "y"];
        let r = vec!["y", "x"];
        assert!(unordered_eq(&l, &r));
        assert!(unordered_eq(&r, &l));
    }

    // duplicates count
    {
        let l = vec!["a", "a", "b"];
        let r = vec!["a", "b"];
        assert!(!unordered_eq(&l, &r));
        assert!(!unordered_eq(&r, &l));
    }

    // same length, different multiplicity
    {
        let l = vec!["a", "a", "b"];
        let r = vec!["a", "b", "b"];
        assert!(!unordered_eq(&l, &r));
    }

    {
        let l = vec![3u32, 1, 2];
        let r = vec![1u32, 2, 4];
        assert!(!unordered_eq(&l, &r));
    }
}

#[test]
fn test_unordered_eq_leaves_inputs_alone() {
    let l = vec!["palisade", "extras", "marielda"];
    let r = vec!["marielda", "palisade", "extras"];
    assert!(unordered_eq(&l, &r));
    assert_eq!(l, vec!["palisade", "extras", "marielda"]);
    assert_eq!(r, vec!["marielda", "palisade", "extras"]);
}
