//! Integration tests for PersistentArray.

use persistent_hamt::collections::PersistentArray;
use rstest::rstest;

#[rstest]
fn test_set_remove_and_sparse_index() {
    let first = PersistentArray::new().set(0, "A").set(1, "B").set(2, "C");
    let second = first.remove(1).set(911, "D");

    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    assert_eq!(first.get(1), Some(&"B"));
    assert_eq!(second.get(1), None);
    assert_eq!(second.get(911), Some(&"D"));
    assert!(second.contains_index(911));
    assert!(!second.contains_index(912));
}

#[rstest]
fn test_overwrite_keeps_length() {
    let array = PersistentArray::new().set(5, 1).set(5, 2);
    assert_eq!(array.len(), 1);
    assert_eq!(array.get(5), Some(&2));
}

#[rstest]
#[case(usize::MAX)]
#[case(1 << 20)]
#[case(0)]
fn test_extreme_indices(#[case] index: usize) {
    let array = PersistentArray::new().set(index, index);
    assert_eq!(array.get(index), Some(&index));
    assert!(array.remove(index).is_empty());
}

#[rstest]
fn test_iteration_yields_indices() {
    let array: PersistentArray<char> = [(2, 'c'), (0, 'a'), (1, 'b')].into_iter().collect();
    let entries: Vec<(usize, char)> = array.iter().map(|(index, &value)| (index, value)).collect();
    assert_eq!(entries, vec![(0, 'a'), (1, 'b'), (2, 'c')]);
    assert_eq!(array.iter().len(), 3);
}

#[rstest]
fn test_large_indices_iterate_by_low_chunk_first() {
    let array = PersistentArray::new()
        .set(1_107_296_256, "A")
        .set(1_124_073_472, "B")
        .set(1_129_119_744, "C")
        .set(1_140_850_688, "D");
    assert_eq!(array.len(), 4);
    let mut values: Vec<&str> = array.iter().map(|(_, &value)| value).collect();
    values.sort_unstable();
    assert_eq!(values, vec!["A", "B", "C", "D"]);
}

#[rstest]
fn test_traverse_reports_completion() {
    let array = PersistentArray::new().set(0, 10).set(1, 20);
    let mut total = 0;
    assert!(array.traverse(|_, value| {
        total += value;
        true
    }));
    assert_eq!(total, 30);
}

#[rstest]
fn test_equality_is_by_content() {
    let left = PersistentArray::new().set(0, 'x').set(7, 'y');
    let right = PersistentArray::new().set(7, 'y').set(0, 'x');
    assert_eq!(left, right);
    assert_ne!(left, right.set(7, 'z'));
}

#[rstest]
fn test_remove_absent_is_noop() {
    let array = PersistentArray::new().set(0, ());
    let same = array.remove(3);
    assert_eq!(same.len(), 1);
    assert_eq!(same, array);
}
