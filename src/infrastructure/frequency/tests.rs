use super::*;

#[test]
fn test_frequency_index_insert_and_lookup() {
    let mut index = FrequencyIndex::new();
    assert!(index.is_empty());

    index.insert(1, 1);
    index.insert(2, 1);
    index.insert(3, 4);

    assert_eq!(index.len(), 3);
    assert_eq!(index.bucket_count(), 2);
    assert_eq!(index.frequency_of(1), Some(1));
    assert_eq!(index.frequency_of(3), Some(4));
    assert_eq!(index.frequency_of(9), None);
}

#[test]
fn test_frequency_index_relocate() {
    let mut index = FrequencyIndex::new();
    index.insert(1, 1);
    index.insert(2, 1);

    assert!(index.relocate(1, 2));
    assert!(!index.relocate(5, 2));
    assert_eq!(index.len(), 2);
    assert_eq!(index.frequency_of(1), Some(2));
    assert!(!index.contains(5));

    index.relocate(2, 2);
    // Bucket 1 is now empty and must be gone
    assert_eq!(index.bucket_count(), 1);
    assert_eq!(index.coldest(10), vec![1, 2]);
}

#[test]
fn test_frequency_index_coldest_order() {
    let mut index = FrequencyIndex::new();
    // Arrival order inside a bucket decides ties, not the address value
    index.insert(30, 2);
    index.insert(10, 1);
    index.insert(50, 1);
    index.insert(20, 3);
    index.insert(40, 1);

    assert_eq!(index.coldest(0), Vec::<Address>::new());
    assert_eq!(index.coldest(2), vec![10, 50]);
    assert_eq!(index.coldest(4), vec![10, 50, 40, 30]);
    assert_eq!(index.coldest(100), vec![10, 50, 40, 30, 20]);
}

#[test]
fn test_frequency_index_remove() {
    let mut index = FrequencyIndex::new();
    index.insert(1, 3);
    index.insert(2, 3);

    assert_eq!(index.remove(1), Some(3));
    assert_eq!(index.remove(1), None);
    assert_eq!(index.len(), 1);
    assert_eq!(index.coldest(5), vec![2]);

    index.remove(2);
    assert!(index.is_empty());
    assert_eq!(index.bucket_count(), 0);
}

#[test]
fn test_frequency_index_pop_coldest() {
    let mut index = FrequencyIndex::new();
    index.insert(7, 2);
    index.insert(8, 1);
    index.insert(9, 1);

    assert_eq!(index.pop_coldest(), Some((8, 1)));
    assert_eq!(index.pop_coldest(), Some((9, 1)));
    assert_eq!(index.pop_coldest(), Some((7, 2)));
    assert_eq!(index.pop_coldest(), None);
    assert!(index.is_empty());
}
