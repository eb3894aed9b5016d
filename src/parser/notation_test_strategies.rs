use proptest::prelude::*;


#[derive(Debug, Clone)]
enum Size {
    Sided(i64),
    Fudge(bool),
    Percentile,
    Custom(Vec<i64>),
    Default
}

impl Size {
    fn notation(&self) -> String {
        match self {
            Size::Sided(sides) => sides.to_string(),
            Size::Fudge(uppercase) => if *uppercase { "F".into() } else { "f".into() },
            Size::Percentile => "%".into(),
            Size::Custom(values) => {
                let values: Vec<String> = values.iter().map(i64::to_string).collect();
                format!("[{}]", values.join(","))
            },
            Size::Default => String::new()
        }
    }

    // custom faces may repeat, so they are never exploded
    fn explodes(&self) -> bool {
        !matches!(self, Size::Custom(_))
    }
}


fn size_strategy() -> impl Strategy<Value = Size> {
    prop_oneof![
        3 => (3i64..=20).prop_map(Size::Sided),
        1 => any::<bool>().prop_map(Size::Fudge),
        1 => Just(Size::Percentile),
        1 => prop::collection::btree_set(-5i64..10, 2..5).prop_map(|values| Size::Custom(values.into_iter().collect())),
        1 => Just(Size::Default),
    ]
}

fn sort_strategy(count: u16) -> impl Strategy<Value = String> {
    (prop::sample::select(vec!["kh", "kl", "dh", "dl", "KH", "Dl"]), prop::option::of(0..=count))
        .prop_map(|(modifier, threshold)| match threshold {
            Some(threshold) => format!("{modifier}{threshold}"),
            None => modifier.to_string()
        })
}

fn explode_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["!", "!>", "!<", "!="]).prop_map(String::from)
}

fn arithmetic_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((prop::sample::select(vec!['+', '-', '*', '/', '^']), 1u32..=3), 0..=2)
        .prop_map(|suffixes| {
            suffixes.into_iter()
                .map(|(operator, operand)| format!("{operator}{operand}"))
                .collect::<String>()
        })
}


/// A single `quantity d size modifiers` segment.
pub(crate) fn simple_segment_strategy() -> impl Strategy<Value = String> {
    (prop::option::of(0u16..=8), size_strategy(), any::<bool>())
        .prop_flat_map(|(quantity, size, uppercase)| {
            let count = quantity.unwrap_or(1).max(1);
            let quantity = quantity.map(|quantity| quantity.to_string()).unwrap_or_default();
            let marker = if uppercase { "D" } else { "d" };
            let pool = format!("{quantity}{marker}{}", size.notation());

            let modifier = if size.explodes() {
                prop_oneof![Just(String::new()), sort_strategy(count), explode_strategy()].boxed()
            } else {
                prop_oneof![Just(String::new()), sort_strategy(count)].boxed()
            };

            (Just(pool), modifier, arithmetic_strategy())
        })
        .prop_map(|(pool, modifier, arithmetic)| format!("{pool}{modifier}{arithmetic}"))
        .prop_filter("comparator followed by a minus", |segment| !comparator_then_minus(segment))
}

/// Parenthesized bare dice, the first one repeated, sorted or exploded as a
/// whole: `(d6+d6+d4)kh1`, `(2d8+d3+2d8)!>`.
pub(crate) fn modified_pool_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((1u16..=2, 3i64..=12), 1..=3)
        .prop_flat_map(|mut dice| {
            dice.push(dice[0]);

            let members: Vec<String> = dice.iter()
                .map(|&(quantity, sides)| match quantity {
                    1 => format!("d{sides}"),
                    n => format!("{n}d{sides}")
                })
                .collect();
            let modifier = prop_oneof![sort_strategy(dice.len() as u16), explode_strategy()];

            (Just(members.join("+")), modifier, arithmetic_strategy())
        })
        .prop_map(|(members, modifier, arithmetic)| format!("({members}){modifier}{arithmetic}"))
        .prop_filter("comparator followed by a minus", |notation| !comparator_then_minus(notation))
}

// `!>-1` would read the operand as the threshold
fn comparator_then_minus(notation: &str) -> bool {
    notation.contains(">-") || notation.contains("<-") || notation.contains("=-")
}

/// Segments joined with `+`, possibly parenthesized and modified as a whole.
pub(crate) fn notation_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![3 => simple_segment_strategy(), 1 => modified_pool_strategy()];

    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..=3).prop_map(|segments| segments.join("+")),
            (inner, prop::option::of(prop::sample::select(vec!["kh", "kl", "dh", "dl"])), arithmetic_strategy())
                .prop_map(|(expression, sort, arithmetic)| {
                    format!("({expression}){}{arithmetic}", sort.unwrap_or_default())
                }),
        ]
    })
}
