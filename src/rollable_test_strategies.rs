use std::collections::VecDeque;
use proptest::prelude::*;
use crate::{Algorithm, Arithmetic, Comparator, Die, DropKeep, Explode, Operator, Pool, RandomSource, Rollable};


/// Replays a fixed list of values, then keeps returning the lower bound.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scripted(VecDeque<i64>);

impl Scripted {
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self(values.into_iter().collect())
    }
}

impl RandomSource for Scripted {
    fn between(&mut self, min: i64, _max: i64) -> i64 {
        self.0.pop_front().unwrap_or(min)
    }
}


pub(crate) fn die_strategy() -> impl Strategy<Value = Die> {
    prop_oneof![
        (2i64..=20).prop_map(|sides| Die::sided(sides).unwrap()),
        Just(Die::fudge()),
        Just(Die::percentile()),
        prop::collection::vec(-5i64..10, 2..6).prop_map(|values| Die::custom(values).unwrap()),
    ]
}

pub(crate) fn operator_strategy() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Add),
        Just(Operator::Subtract),
        Just(Operator::Multiply),
        Just(Operator::Divide),
        Just(Operator::Power),
    ]
}

pub(crate) fn algorithm_strategy() -> impl Strategy<Value = Algorithm> {
    prop_oneof![
        Just(Algorithm::DropHighest),
        Just(Algorithm::DropLowest),
        Just(Algorithm::KeepHighest),
        Just(Algorithm::KeepLowest),
    ]
}

pub(crate) fn comparator_strategy() -> impl Strategy<Value = Comparator> {
    prop_oneof![
        Just(Comparator::Equals),
        Just(Comparator::GreaterThan),
        Just(Comparator::LessThan),
    ]
}

fn arithmetic_strategy(inner: impl Strategy<Value = Rollable>) -> impl Strategy<Value = Rollable> {
    (inner, operator_strategy(), 1u32..4)
        .prop_map(|(rollable, operator, operand)| Rollable::from(Arithmetic::new(rollable, operator, operand).unwrap()))
}

fn drop_keep_strategy(inner: impl Strategy<Value = Rollable>) -> impl Strategy<Value = Rollable> {
    (inner, algorithm_strategy())
        .prop_flat_map(|(rollable, algorithm)| {
            let count = Pool::from(rollable.clone()).len();
            (Just(rollable), Just(algorithm), 0..=count)
        })
        .prop_map(|(rollable, algorithm, threshold)| Rollable::from(DropKeep::new(rollable, algorithm, threshold).unwrap()))
}

// constant members make some comparisons endless, those trees are skipped
fn explode_strategy(inner: impl Strategy<Value = Rollable>) -> impl Strategy<Value = Rollable> {
    (inner, comparator_strategy())
        .prop_filter_map("explosion never stops", |(rollable, comparator)| {
            Explode::new(rollable, comparator, None).ok().map(Rollable::from)
        })
}

pub(crate) fn rollable_strategy() -> impl Strategy<Value = Rollable> {
    let leaf = die_strategy().prop_map(Rollable::from);

    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|rollables| Rollable::from(Pool::new(rollables))),
            arithmetic_strategy(inner.clone()),
            drop_keep_strategy(inner.clone()),
            explode_strategy(inner),
        ]
    })
}


/// `rollable` with nested sums spliced into the sum holding them, so trees
/// that only group a sum differently compare equal. The members of drop/keep
/// and explode pools stay apart.
pub(crate) fn flatten_sums(rollable: &Rollable) -> Rollable {
    match rollable {
        Rollable::Die(_) => rollable.clone(),
        Rollable::Pool(pool) => {
            let mut members = Vec::with_capacity(pool.len());

            for member in pool {
                match flatten_sums(member) {
                    Rollable::Pool(inner) => members.extend(inner.iter().cloned()),
                    other => members.push(other)
                }
            }

            Rollable::from(Pool::new(members))
        },
        Rollable::Arithmetic(arithmetic) => {
            let inner = flatten_sums(arithmetic.rollable());
            Rollable::from(Arithmetic::new(inner, arithmetic.operator(), arithmetic.operand()).unwrap())
        },
        Rollable::DropKeep(drop_keep) => {
            let pool = flatten_members(drop_keep.pool());
            Rollable::from(DropKeep::new(pool, drop_keep.algorithm(), drop_keep.threshold()).unwrap())
        },
        Rollable::Explode(explode) => {
            let pool = flatten_members(explode.pool());
            Rollable::from(Explode::new(pool, explode.comparator(), explode.threshold()).unwrap())
        }
    }
}

fn flatten_members(pool: &Pool) -> Rollable {
    Rollable::from(Pool::new(pool.iter().map(flatten_sums).collect()))
}
