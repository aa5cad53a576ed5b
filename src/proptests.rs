use super::*;

use proptest::prelude::*;
use std::collections::HashMap;

type Key2 = (u8, u8);

#[derive(Clone, Debug)]
enum Op {
    Insert(Key2, u32),
    RemoveKey(Key2),
    RemovePrefix(u8),
    GetOrDefault(Key2),
}

// A narrow key space so ops collide often; wide random keys would almost
// never exercise the duplicate-insert and prefix-erase paths.
fn key_strategy() -> impl Strategy<Value = Key2> + Clone {
    (0u8..8, 0u8..8)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        5 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => key.clone().prop_map(Op::RemoveKey),
        1 => (0u8..8).prop_map(Op::RemovePrefix),
        2 => key.prop_map(Op::GetOrDefault),
    ];
    prop::collection::vec(op, 0..=400)
}

fn validate(map: &MultiKeyMap<Key2, u32>, model: &HashMap<Key2, u32>) {
    assert_eq!(map.len(), model.len());
    assert_eq!(map.iter().count(), map.len(), "len must match a full walk");
    for first in 0u8..8 {
        let expected = model.keys().filter(|k| k.0 == first).count();
        assert_eq!(map.count(&(first,)), expected);
        assert_eq!(map.contains(&(first,)), expected > 0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_hash_map(ops in ops_strategy()) {
        let mut map: MultiKeyMap<Key2, u32> = MultiKeyMap::new();
        let mut model: HashMap<Key2, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let inserted = map.insert(key, value);
                    prop_assert_eq!(inserted, !model.contains_key(&key));
                    model.entry(key).or_insert(value);
                }
                Op::RemoveKey(key) => {
                    let removed = map.remove(&key);
                    prop_assert_eq!(removed, usize::from(model.remove(&key).is_some()));
                }
                Op::RemovePrefix(first) => {
                    let removed = map.remove(&(first,));
                    let expected = model.keys().filter(|k| k.0 == first).count();
                    model.retain(|k, _| k.0 != first);
                    prop_assert_eq!(removed, expected);
                }
                Op::GetOrDefault(key) => {
                    let got = *map.get_or_default(key);
                    let want = *model.entry(key).or_insert(0);
                    prop_assert_eq!(got, want);
                }
            }
            prop_assert_eq!(map.len(), model.len());
        }

        validate(&map, &model);

        let mut got: Vec<(Key2, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        got.sort_unstable();
        let mut expected: Vec<(Key2, u32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        expected.sort_unstable();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_merge_moves_exactly_the_missing_keys(
        left in prop::collection::hash_map(key_strategy(), any::<u32>(), 0..32),
        right in prop::collection::hash_map(key_strategy(), any::<u32>(), 0..32),
    ) {
        let mut a: MultiKeyMap<Key2, u32> = left.iter().map(|(k, v)| (*k, *v)).collect();
        let mut b: MultiKeyMap<Key2, u32> = right.iter().map(|(k, v)| (*k, *v)).collect();

        a.merge(&mut b);

        for (key, value) in &left {
            prop_assert_eq!(a.get(key), Some(value));
        }
        for (key, value) in &right {
            if left.contains_key(key) {
                prop_assert_eq!(b.get(key), Some(value));
            } else {
                prop_assert_eq!(a.get(key), Some(value));
                prop_assert!(!b.contains(key));
            }
        }
        let moved = right.keys().filter(|k| !left.contains_key(k)).count();
        prop_assert_eq!(a.len(), left.len() + moved);
        prop_assert_eq!(b.len(), right.len() - moved);
    }

    #[test]
    fn prop_clone_and_equality(
        entries in prop::collection::hash_map(key_strategy(), any::<u32>(), 0..32),
    ) {
        let a: MultiKeyMap<Key2, u32> = entries.iter().map(|(k, v)| (*k, *v)).collect();
        let mut b = a.clone();
        prop_assert_eq!(&a, &b);

        // Key space above the strategy range, guaranteed fresh.
        b.insert((9, 0), 1);
        prop_assert_ne!(&a, &b);
        b.remove(&(9, 0));
        prop_assert_eq!(&a, &b);
    }
}
