use super::*;

use crate::value::{Key, Kind};

fn profile_record() -> Value {
    Value::record(vec![
        ("name", Value::from("Bob")),
        ("age", 25_i64.into()),
        (
            "profile",
            Value::record(vec![
                ("bio", Value::from("Hello")),
                (
                    "settings",
                    Value::record(vec![
                        ("theme", Value::from("light")),
                        ("notifications", true.into()),
                    ]),
                ),
            ]),
        ),
    ])
}

#[test]
fn test_small_record_deep_overwrite() {
    let base = profile_record();

    let out = produce_fast(&base, |ops| {
        ops.set(&["name"], "Alice".into());
        ops.set(&["age"], 30_i64.into());
        ops.set(&["profile", "bio"], "New".into());
        ops.set(&["profile", "settings", "theme"], "dark".into());
        Ok(())
    })
    .unwrap();

    let expect = Value::record(vec![
        ("name", Value::from("Alice")),
        ("age", 30_i64.into()),
        (
            "profile",
            Value::record(vec![
                ("bio", Value::from("New")),
                (
                    "settings",
                    Value::record(vec![
                        ("theme", Value::from("dark")),
                        ("notifications", true.into()),
                    ]),
                ),
            ]),
        ),
    ]);
    assert_eq!(out, expect);
    assert!(!is_persistent(&out));

    // the input is untouched.
    assert_eq!(base, profile_record());
}

#[test]
fn test_sequence_append_promotion() {
    let base = Value::seq((0..511_i64).map(Value::from).collect());

    let out = produce_fast(&base, |ops| {
        ops.push(&[], 999_i64.into());
        Ok(())
    })
    .unwrap();

    assert_eq!(out.kind(), Some(Kind::Sequence));
    assert_eq!(out.len(), Some(512));
    assert!(is_persistent(&out));
    match &out {
        Value::ISeq(vector) => {
            assert_eq!(vector.get(511), Some(&Value::from(999_i64)));
            assert_eq!(vector.get(0), Some(&Value::from(0_i64)));
        }
        _ => unreachable!(),
    }
    assert!(!is_persistent(&base));
}

#[test]
fn test_sequence_shrink_demotion() {
    let base = wrap(&Value::seq((0..520_i64).map(Value::from).collect()));
    assert!(is_persistent(&base));

    let out = produce_fast(&base, |ops| {
        for _ in 0..9 {
            ops.pop(&[]);
        }
        Ok(())
    })
    .unwrap();

    assert_eq!(out.len(), Some(511));
    assert!(!is_persistent(&out));
    assert_eq!(
        unwrap_value(&out),
        Value::seq((0..511_i64).map(Value::from).collect())
    );
    assert_eq!(base.len(), Some(520));
}

#[test]
fn test_mapping_delete_then_read() {
    let pairs: Vec<(Key, Value)> = (0..1000_i64)
        .map(|i| (Key::from(format!("k-{}", i)), Value::from(format!("v-{}", i))))
        .collect();
    let base = wrap(&Value::mapping(pairs.clone()));
    assert!(is_persistent(&base));

    let out = produce_fast(&base, |ops| {
        ops.map_del(&[], Key::from("k-500"));
        Ok(())
    })
    .unwrap();

    assert_eq!(out.len(), Some(999));
    let (base_map, out_map) = match (&base, &out) {
        (Value::IMap(base_map), Value::IMap(out_map)) => (base_map, out_map),
        _ => unreachable!(),
    };
    assert_eq!(out_map.get(&Key::from("k-500")), None);
    assert_eq!(base_map.get(&Key::from("k-500")), Some(&Value::from("v-500")));

    // iteration yields the other 999 entries in original insertion order.
    let keys: Vec<&Key> = out_map.iter().map(|(k, _)| k).collect();
    let expect: Vec<Key> = pairs
        .iter()
        .filter(|(k, _)| *k != Key::from("k-500"))
        .map(|(k, _)| k.clone())
        .collect();
    assert_eq!(keys.len(), expect.len());
    for (key, expect) in keys.iter().zip(expect.iter()) {
        assert_eq!(*key, expect);
    }

    // untouched values are shared by identity, not copied.
    let key = Key::from("k-17");
    let (a, b) = (base_map.get(&key).unwrap(), out_map.get(&key).unwrap());
    assert!(a.same(b));
}

#[test]
fn test_identity_short_circuit() {
    let base = Value::mapping(vec![(Key::from("a"), 1_i64.into())]);

    let out = produce_fast(&base, |ops| {
        ops.map_set(&[], Key::from("a"), 1_i64.into());
        Ok(())
    })
    .unwrap();
    assert!(out.same(&base));

    let out = produce(&base, |draft| {
        draft.as_map_mut()?.set(Key::from("a"), 1_i64.into())?;
        Ok(None)
    })
    .unwrap();
    assert!(out.same(&base));
}

#[test]
fn test_recipe_throws() {
    let base = Value::seq(vec![1_i64.into(), 2_i64.into(), 3_i64.into()]);

    let res = produce(&base, |draft| {
        draft.as_seq_mut()?.push(4_i64.into());
        err_at!(Recipe, msg: "boom")
    });
    match res {
        Err(Error::Recipe(_, msg)) => assert_eq!(msg, "boom"),
        _ => panic!("expected recipe failure"),
    }
    assert_eq!(base, Value::seq(vec![1_i64.into(), 2_i64.into(), 3_i64.into()]));

    let res = produce_fast(&base, |ops| {
        ops.push(&[], 4_i64.into());
        err_at!(Recipe, msg: "boom")
    });
    assert!(res.is_err());
    assert_eq!(base, Value::seq(vec![1_i64.into(), 2_i64.into(), 3_i64.into()]));
}

#[test]
fn test_no_op_identity() {
    let bases = vec![
        Value::seq(vec![1_i64.into()]),
        Value::mapping(vec![(Key::from("a"), 1_i64.into())]),
        Value::element_set(vec![Key::from("x")]),
        profile_record(),
        wrap(&Value::seq((0..600_i64).map(Value::from).collect())),
    ];

    for base in bases {
        let out = produce(&base, |_draft| Ok(None)).unwrap();
        assert!(out.same(&base));

        let out = produce_fast(&base, |_ops| Ok(())).unwrap();
        assert!(out.same(&base));
    }
}

#[test]
fn test_produce_sequence() {
    let base = Value::seq((0..10_i64).map(Value::from).collect());

    let out = produce(&base, |draft| {
        let seq = draft.as_seq_mut()?;
        seq.set(0, 100_i64.into())?;
        seq.push(10_i64.into());
        let last = seq.pop();
        assert_eq!(last, Some(10_i64.into()));
        seq.push(11_i64.into());
        Ok(None)
    })
    .unwrap();

    let mut expect: Vec<Value> = (0..10_i64).map(Value::from).collect();
    expect[0] = 100_i64.into();
    expect.push(11_i64.into());
    assert_eq!(out, Value::seq(expect));
}

#[test]
fn test_produce_record_children() {
    let base = profile_record();

    let out = produce(&base, |draft| {
        let rec = draft.as_rec_mut()?;
        rec.set("name", "Alice".into())?;
        let profile = rec.child_mut("profile")?.unwrap();
        let settings = profile.as_rec_mut()?.child_mut("settings")?.unwrap();
        settings.as_rec_mut()?.set("theme", "dark".into())?;
        Ok(None)
    })
    .unwrap();

    match &out {
        Value::Rec(pairs) => {
            assert_eq!(pairs[0].1, Value::from("Alice"));
        }
        _ => unreachable!(),
    }

    // structural sharing: a one-property change at the top level leaves
    // sibling values identical by identity.
    let base_age = match &base {
        Value::Rec(pairs) => pairs[1].1.clone(),
        _ => unreachable!(),
    };
    let out_age = match &out {
        Value::Rec(pairs) => pairs[1].1.clone(),
        _ => unreachable!(),
    };
    assert!(base_age.same(&out_age));
}

#[test]
fn test_produce_replacement() {
    let base = Value::seq(vec![1_i64.into()]);

    let replacement = Value::seq(vec![9_i64.into()]);
    let out = produce(&base, move |_draft| Ok(Some(replacement))).unwrap();
    assert_eq!(out, Value::seq(vec![9_i64.into()]));

    // a replacement of the wrong kind is a boundary violation.
    let res = produce(&base, |_draft| Ok(Some(Value::from(10_i64))));
    match res {
        Err(Error::WrongKind(_, _)) => (),
        _ => panic!("expected WrongKind"),
    }

    // a large replacement is promoted like any committed output.
    let replacement = Value::seq((0..600_i64).map(Value::from).collect());
    let out = produce(&base, move |_draft| Ok(Some(replacement))).unwrap();
    assert!(is_persistent(&out));
}

#[test]
fn test_produce_fast_sequence_ops() {
    let base = Value::seq((0..6_i64).map(Value::from).collect());

    let out = produce_fast(&base, |ops| {
        ops.set_index(&[], 0, 100_i64.into());
        ops.splice(&[], 1, 2, vec![200_i64.into()]);
        ops.retain(&[], |value| !matches!(value, Value::Integer(3)));
        ops.push(&[], 300_i64.into());
        Ok(())
    })
    .unwrap();

    // [0..5] -> set0: [100,1,2,3,4,5] -> splice: [100,200,3,4,5]
    // -> retain: [100,200,4,5] -> push: [100,200,4,5,300]
    let expect = Value::seq(vec![
        100_i64.into(),
        200_i64.into(),
        4_i64.into(),
        5_i64.into(),
        300_i64.into(),
    ]);
    assert_eq!(out, expect);
}

#[test]
fn test_produce_fast_update_merge() {
    let base = profile_record();

    let out = produce_fast(&base, |ops| {
        ops.update(&["age"], |age| match age {
            Some(Value::Integer(n)) => Value::Integer(n + 1),
            _ => Value::Null,
        });
        ops.merge(
            &["profile"],
            Value::record(vec![("bio", Value::from("Merged")), ("plan", Value::from("pro"))]),
        );
        Ok(())
    })
    .unwrap();

    match &out {
        Value::Rec(pairs) => {
            assert_eq!(pairs[1].1, Value::Integer(26));
            match &pairs[2].1 {
                Value::Rec(profile) => {
                    assert_eq!(profile[0].1, Value::from("Merged"));
                    assert_eq!(profile[2].0.as_ref(), "plan");
                    assert_eq!(profile[2].1, Value::from("pro"));
                }
                _ => unreachable!(),
            }
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_produce_fast_set_ops() {
    let base = Value::element_set(vec![Key::from("x"), Key::from("y")]);

    let out = produce_fast(&base, |ops| {
        ops.add(&[], Key::from("z"));
        ops.del_elem(&[], Key::from("x"));
        Ok(())
    })
    .unwrap();
    assert_eq!(out, Value::element_set(vec![Key::from("y"), Key::from("z")]));

    let out = produce_fast(&base, |ops| {
        ops.clear(&[]);
        Ok(())
    })
    .unwrap();
    assert_eq!(out, Value::element_set(vec![]));
}

#[test]
fn test_produce_fast_boundary_violations() {
    let base = profile_record();

    // walking through a scalar property.
    let res = produce_fast(&base, |ops| {
        ops.set(&["name", "first"], "A".into());
        Ok(())
    });
    match res {
        Err(Error::KeyNotFound(_, _)) => (),
        _ => panic!("expected KeyNotFound"),
    }

    // sequence op on a record draft.
    let res = produce_fast(&base, |ops| {
        ops.push(&[], 1_i64.into());
        Ok(())
    });
    match res {
        Err(Error::WrongKind(_, _)) => (),
        _ => panic!("expected WrongKind"),
    }

    // the input survives every failure unchanged.
    assert_eq!(base, profile_record());
}

#[test]
fn test_wrap_unwrap() {
    // small native: shallow copy, equal but not identical.
    let small = Value::seq(vec![1_i64.into(), 2_i64.into()]);
    let wrapped = wrap(&small);
    assert!(!is_persistent(&wrapped));
    assert_eq!(wrapped, small);
    assert!(!wrapped.same(&small));

    // large native: indexed.
    let large = Value::seq((0..600_i64).map(Value::from).collect());
    let wrapped = wrap(&large);
    assert!(is_persistent(&wrapped));
    assert_eq!(wrapped, large);

    // already indexed: identity.
    let again = wrap(&wrapped);
    assert!(again.same(&wrapped));

    // unwrap round-trip is deeply equal and fully native.
    let unwrapped = unwrap_value(&wrapped);
    assert!(!is_persistent(&unwrapped));
    assert_eq!(unwrapped, large);

    // native input to unwrap is identity.
    let unwrapped = unwrap_value(&small);
    assert!(unwrapped.same(&small));

    // wrap is idempotent on representation.
    let rewrapped = wrap(&unwrap_value(&wrapped));
    assert!(is_persistent(&rewrapped));
    assert_eq!(rewrapped, wrapped);
}

#[test]
fn test_wrap_unwrap_nested() {
    let base = Value::record(vec![
        ("items", Value::seq((0..600_i64).map(Value::from).collect())),
        ("tag", Value::from("x")),
    ]);

    // wrap converts the top level only; the nested large sequence stays
    // native until a producer reaches it.
    let wrapped = wrap(&base);
    assert!(!is_persistent(&wrapped));

    // a produced record with an indexed child unwraps deeply.
    let out = produce(&base, |draft| {
        let rec = draft.as_rec_mut()?;
        let items = rec.child_mut("items")?.unwrap();
        items.as_seq_mut()?.push(600_i64.into());
        Ok(None)
    })
    .unwrap();
    let items = match &out {
        Value::Rec(pairs) => pairs[0].1.clone(),
        _ => unreachable!(),
    };
    assert!(is_persistent(&items));

    let unwrapped = unwrap_value(&items);
    assert!(!is_persistent(&unwrapped));
    assert_eq!(unwrapped.len(), Some(601));
}

#[test]
fn test_produce_fast_random_sequence() {
    use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

    let seed: u128 = random();
    // let seed: u128 = 178341959637953225402008136000401923014;
    println!("test_produce_fast_random_sequence seed:{}", seed);
    let mut seed32 = [0u8; 32];
    let seed16 = seed.to_le_bytes();
    seed32[..16].copy_from_slice(&seed16);
    seed32[16..].copy_from_slice(&seed16);
    let mut rng = SmallRng::from_seed(seed32);

    // drive the value back and forth across the adaptive boundary and
    // compare against an ordinary vector after every produce call.
    let mut value = Value::seq(vec![]);
    let mut model: Vec<i64> = vec![];

    for _ in 0..200 {
        let burst = rng.gen::<usize>() % 40;
        let mut planned: Vec<(usize, i64, usize)> = vec![];
        for _ in 0..burst {
            planned.push((rng.gen::<usize>() % 4, rng.gen::<i64>() % 1000, rng.gen::<usize>()));
        }

        let plan = planned.clone();
        let snapshot = model.clone();
        value = produce_fast(&value, move |ops| {
            let mut len = snapshot.len();
            for (choice, payload, off) in plan {
                match choice {
                    0 | 1 => {
                        ops.push(&[], payload.into());
                        len += 1;
                    }
                    2 if len > 0 => {
                        ops.pop(&[]);
                        len -= 1;
                    }
                    3 if len > 0 => {
                        ops.set_index(&[], off % len, payload.into());
                    }
                    _ => (),
                }
            }
            Ok(())
        })
        .unwrap();

        for (choice, payload, off) in planned {
            match choice {
                0 | 1 => model.push(payload),
                2 if !model.is_empty() => {
                    model.pop();
                }
                3 if !model.is_empty() => {
                    let off = off % model.len();
                    model[off] = payload;
                }
                _ => (),
            }
        }

        let expect = Value::seq(model.iter().map(|n| Value::from(*n)).collect());
        assert_eq!(value, expect);
        assert_eq!(is_persistent(&value), model.len() >= crate::ADAPT_CUTOFF);
    }
}

#[test]
fn test_produce_fast_random_mapping() {
    use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

    let seed: u128 = random();
    println!("test_produce_fast_random_mapping seed:{}", seed);
    let mut seed32 = [0u8; 32];
    let seed16 = seed.to_le_bytes();
    seed32[..16].copy_from_slice(&seed16);
    seed32[16..].copy_from_slice(&seed16);
    let mut rng = SmallRng::from_seed(seed32);

    let mut value = Value::mapping(vec![]);
    let mut model: Vec<(i64, i64)> = vec![];

    for _ in 0..100 {
        let burst = rng.gen::<usize>() % 50;
        let mut planned: Vec<(bool, i64, i64)> = vec![];
        for _ in 0..burst {
            let key = rng.gen::<i64>() % 800;
            planned.push((rng.gen::<u32>() % 4 != 0, key, rng.gen::<i64>() % 100));
        }

        let plan = planned.clone();
        value = produce_fast(&value, move |ops| {
            for (is_set, key, payload) in plan {
                if is_set {
                    ops.map_set(&[], Key::from(key), payload.into());
                } else {
                    ops.map_del(&[], Key::from(key));
                }
            }
            Ok(())
        })
        .unwrap();

        for (is_set, key, payload) in planned {
            if is_set {
                match model.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = payload,
                    None => model.push((key, payload)),
                }
            } else if let Some(off) = model.iter().position(|(k, _)| *k == key) {
                model.remove(off);
            }
        }

        let expect = Value::mapping(
            model
                .iter()
                .map(|(k, v)| (Key::from(*k), Value::from(*v)))
                .collect(),
        );
        assert_eq!(value, expect);
        assert_eq!(is_persistent(&value), model.len() >= crate::ADAPT_CUTOFF);
    }
}

#[test]
fn test_produce_reentrant() {
    // a recipe may run a nested producer call on an unrelated value.
    let base = Value::seq(vec![1_i64.into()]);
    let other = Value::mapping(vec![(Key::from("n"), 1_i64.into())]);

    let out = produce(&base, |draft| {
        let nested = produce_fast(&other, |ops| {
            ops.map_set(&[], Key::from("n"), 2_i64.into());
            Ok(())
        })?;
        assert_eq!(nested, Value::mapping(vec![(Key::from("n"), 2_i64.into())]));

        draft.as_seq_mut()?.push(2_i64.into());
        Ok(None)
    })
    .unwrap();

    assert_eq!(out, Value::seq(vec![1_i64.into(), 2_i64.into()]));
    assert_eq!(other, Value::mapping(vec![(Key::from("n"), 1_i64.into())]));
}

#[test]
fn test_mapping_promotion_via_recipe() {
    let pairs: Vec<(Key, Value)> = (0..511_i64)
        .map(|i| (Key::from(i), Value::from(i)))
        .collect();
    let base = Value::mapping(pairs);

    let out = produce_fast(&base, |ops| {
        ops.map_set(&[], Key::from(1000_i64), Value::from(1000_i64));
        Ok(())
    })
    .unwrap();

    assert_eq!(out.len(), Some(512));
    assert!(is_persistent(&out));

    // and back below the boundary.
    let out = produce_fast(&out, |ops| {
        ops.map_del(&[], Key::from(1000_i64));
        ops.map_del(&[], Key::from(0_i64));
        Ok(())
    })
    .unwrap();
    assert_eq!(out.len(), Some(510));
    assert!(!is_persistent(&out));
}
