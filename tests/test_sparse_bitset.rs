#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};

    use expect_test::expect;

    use sparsebits::*;

    // One word per page (64 bits) so small indices already span many pages.
    type BS1 = SparseBitSet<1>;
    type BS = DefaultSparseBitSet;

    const SCENARIO: [u64; 14] = [
        0,
        1,
        2,
        3,
        17,
        42,
        73,
        1222,
        58723484,
        58723485,
        58723486,
        MAX_INDEX - 2,
        MAX_INDEX - 1,
        MAX_INDEX,
    ];

    #[test]
    fn test_scenario_size_and_string() {
        let bs = BS::from_indices(&SCENARIO).unwrap();
        assert_eq!(bs.size().unwrap(), 14);
        assert_eq!(bs.bit_count(), 14);
        let expect = expect!["{0, 1, 2, 3, 17, 42, 73, 1222, 58723484, 58723485, 58723486, 9223372036854775805, 9223372036854775806, 9223372036854775807}"];
        expect.assert_eq(&bs.to_string());
    }

    #[test]
    fn test_empty_string_and_errors() {
        let bs = BS::new();
        expect!["{}"].assert_eq(&bs.to_string());
        assert!(bs.is_empty());
        assert_eq!(bs.size().unwrap(), 0);
        assert!(bs.first().unwrap_err().is_not_found());
        assert!(bs.last().unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicates_collapse() {
        let bs = BS::from_indices(&[5, 5, 9, 5, 9]).unwrap();
        assert_eq!(bs.bit_count(), 2);
        assert_eq!(bs.iter().collect::<Vec<_>>(), vec![5, 9]);
    }

    #[test]
    fn test_set_clear_idempotence() {
        let mut bs = BS1::new();
        assert!(bs.set(100).unwrap());
        assert!(!bs.set(100).unwrap());
        assert!(bs.get(100).unwrap());
        assert!(bs.clear(100).unwrap());
        assert!(!bs.clear(100).unwrap());
        assert!(!bs.get(100).unwrap());
        assert!(bs.is_empty());
        assert_eq!(bs.page_count(), 0);
    }

    #[test]
    fn test_set_to() {
        let mut bs = BS::new();
        assert!(bs.set_to(7, true).unwrap());
        assert!(!bs.set_to(7, true).unwrap());
        assert!(bs.set_to(7, false).unwrap());
        assert!(!bs.set_to(7, false).unwrap());
    }

    #[test]
    fn test_boundaries() {
        let mut bs = BS::new();
        assert!(bs.set(0).unwrap());
        assert!(bs.set(MAX_INDEX).unwrap());
        assert!(bs.get(0).unwrap());
        assert!(bs.get(MAX_INDEX).unwrap());
        assert!(!bs.get(1).unwrap());
        assert!(!bs.get(MAX_INDEX - 1).unwrap());
        assert_eq!(bs.first().unwrap(), 0);
        assert_eq!(bs.last().unwrap(), MAX_INDEX);
        assert_eq!(bs.page_count(), 2);
    }

    #[test]
    fn test_out_of_domain_rejected_without_change() {
        let mut bs = BS::from_indices(&[1, 2]).unwrap();
        let before = bs.clone();
        assert!(bs.set(MAX_INDEX + 1).unwrap_err().is_invalid_argument());
        assert!(bs.set(u64::MAX).unwrap_err().is_invalid_argument());
        assert!(bs.clear(END).unwrap_err().is_invalid_argument());
        assert!(bs.get(END).unwrap_err().is_invalid_argument());
        assert!(bs.contains(u64::MAX).unwrap_err().is_invalid_argument());
        assert!(BS::from_indices(&[1, u64::MAX]).is_err());
        assert_eq!(bs, before);
        let err = bs.set(u64::MAX).unwrap_err();
        expect!["invalid argument index: 18446744073709551615 is outside [0, 9223372036854775807]"]
            .assert_eq(&err.to_string());
    }

    #[test]
    fn test_even_odd_clearing() {
        let mut bs = BS1::new();
        for i in 0..128 {
            bs.set(i).unwrap();
        }
        assert_eq!(bs.bit_count(), 128);
        for i in (0..128).step_by(2) {
            assert!(bs.clear(i).unwrap());
        }
        assert_eq!(bs.bit_count(), 64);
        for i in (1..128).step_by(2) {
            assert!(bs.clear(i).unwrap());
        }
        assert_eq!(bs.bit_count(), 0);
        assert!(bs.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut bs = BS::from_indices(&SCENARIO).unwrap();
        bs.clear_all();
        assert!(bs.is_empty());
        assert_eq!(bs.bit_count(), 0);
        assert_eq!(bs.page_count(), 0);
        expect!["{}"].assert_eq(&bs.to_string());
    }

    #[test]
    fn test_iteration_orders() {
        let bs = BS1::from_indices(&[900, 3, 64, 63, 1 << 40]).unwrap();
        assert_eq!(bs.iter().collect::<Vec<_>>(), vec![3, 63, 64, 900, 1 << 40]);
        assert_eq!(
            bs.descending_iter().collect::<Vec<_>>(),
            vec![1 << 40, 900, 64, 63, 3]
        );
    }

    #[test]
    fn test_range() {
        let bs = BS1::from_indices(&SCENARIO).unwrap();
        assert_eq!(bs.range(3..7777).collect::<Vec<_>>(), vec![3, 17, 42, 73, 1222]);
        assert_eq!(bs.range(3..=3).collect::<Vec<_>>(), vec![3]);
        assert_eq!(bs.range(..2).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(
            bs.range(MAX_INDEX - 1..).collect::<Vec<_>>(),
            vec![MAX_INDEX - 1, MAX_INDEX]
        );
        assert_eq!(bs.range(5..5).count(), 0);
        assert_eq!(bs.range(..).count(), 14);
    }

    #[test]
    fn test_next_prev_set_bit() {
        let bs = BS1::from_indices(&[10, 200, 5000]).unwrap();
        assert_eq!(bs.next_set_bit(0).unwrap(), Some(10));
        assert_eq!(bs.next_set_bit(11).unwrap(), Some(200));
        assert_eq!(bs.next_set_bit(5001).unwrap(), None);
        assert_eq!(bs.prev_set_bit(MAX_INDEX).unwrap(), Some(5000));
        assert_eq!(bs.prev_set_bit(199).unwrap(), Some(10));
        assert_eq!(bs.prev_set_bit(9).unwrap(), None);
        assert!(bs.next_set_bit(END).is_err());
    }

    #[test]
    fn test_next_clear_bit() {
        let mut bs = BS1::new();
        assert_eq!(bs.next_clear_bit(0).unwrap(), Some(0));
        for i in 0..130 {
            bs.set(i).unwrap();
        }
        assert_eq!(bs.next_clear_bit(0).unwrap(), Some(130));
        assert_eq!(bs.next_clear_bit(140).unwrap(), Some(140));
        bs.set(MAX_INDEX).unwrap();
        assert_eq!(bs.next_clear_bit(MAX_INDEX).unwrap(), None);
        assert_eq!(bs.next_clear_bit(MAX_INDEX - 1).unwrap(), Some(MAX_INDEX - 1));
    }

    #[test]
    fn test_nth() {
        let bs = BS1::from_indices(&[4, 70, 71, 500]).unwrap();
        assert_eq!(bs.nth(0), Some(4));
        assert_eq!(bs.nth(2), Some(71));
        assert_eq!(bs.nth(3), Some(500));
        assert_eq!(bs.nth(4), None);
    }

    #[test]
    fn test_union_intersect_difference() {
        let mut a = BS1::from_indices(&[1, 100, 1000]).unwrap();
        let b = BS1::from_indices(&[2, 100, 5000]).unwrap();

        let mut u = a.clone();
        assert!(u.union_with(&b));
        assert_eq!(u.iter().collect::<Vec<_>>(), vec![1, 2, 100, 1000, 5000]);
        assert!(!u.union_with(&b));

        let mut i = a.clone();
        assert!(i.intersect_with(&b));
        assert_eq!(i.iter().collect::<Vec<_>>(), vec![100]);
        assert_eq!(i.page_count(), 1);

        assert!(a.difference_with(&b));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 1000]);
        assert!(!a.difference_with(&b));
    }

    #[test]
    fn test_equality_ignores_capacity_and_history() {
        let a = BS::from_indices(&[3, 9, 1 << 33]).unwrap();
        let mut b = BS::with_capacity(64);
        b.set(1 << 33).unwrap();
        b.set(77).unwrap();
        b.set(9).unwrap();
        b.set(3).unwrap();
        b.clear(77).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hash_code(), b.hash_code());

        let tree: BTreeSet<u64> = [3, 9, 1 << 33].into_iter().collect();
        let hash: HashSet<u64> = [1 << 33, 9, 3].into_iter().collect();
        assert!(a == tree);
        assert!(a == hash);
        let other: BTreeSet<u64> = [3, 9].into_iter().collect();
        assert!(a != other);
    }

    #[test]
    fn test_hash_code_sums_members() {
        let bs = BS::from_indices(&[1, 2, 1 << 32]).unwrap();
        // (1 << 32) ^ 1 narrows to 1.
        assert_eq!(bs.hash_code(), 1 + 2 + 1);
        assert_eq!(BS::new().hash_code(), 0);
    }

    #[test]
    fn test_std_hash_agrees_with_eq() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(bs: &BS) -> u64 {
            let mut h = DefaultHasher::new();
            bs.hash(&mut h);
            h.finish()
        }
        let a = BS::from_indices(&[10, 20]).unwrap();
        let mut b = BS::new();
        b.set(20).unwrap();
        b.set(10).unwrap();
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_debug_format() {
        let bs = BS::from_indices(&[2, 1]).unwrap();
        expect!["{1, 2}"].assert_eq(&format!("{:?}", bs));
    }

    #[test]
    fn test_grow_across_pages() {
        let mut bs = BS1::new();
        bs.set(WORD_BITS + 5).unwrap();
        assert!(bs.get(WORD_BITS + 5).unwrap());
        assert_eq!(bs.page_count(), 1);
        bs.set(5).unwrap();
        assert_eq!(bs.page_count(), 2);
        assert_eq!(bs.first().unwrap(), 5);
        assert_eq!(bs.last().unwrap(), WORD_BITS + 5);
    }
}
