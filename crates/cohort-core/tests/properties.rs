//! Cohort invariants over generated birth tables.

use cohort_core::{build_cohort, cohort_digest};
use cohort_model::{CohortOptions, SchemaEntry};
use polars::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Child {
    flag: Option<i64>,
    imputed: Option<i64>,
    current: Option<i64>,
}

/// A child has a current age, an age at death, or neither; never both.
fn ages() -> impl Strategy<Value = (Option<i64>, Option<i64>)> {
    prop_oneof![
        Just((None, None)),
        (0i64..=48).prop_map(|imputed| (Some(imputed), None)),
        (0i64..=59).prop_map(|current| (None, Some(current))),
    ]
}

fn child() -> impl Strategy<Value = Child> {
    (proptest::option::of(0i64..=8), ages()).prop_map(|(flag, (imputed, current))| Child {
        flag,
        imputed,
        current,
    })
}

fn table(children: &[Child]) -> DataFrame {
    let ids: Vec<i64> = (0..children.len() as i64).collect();
    df!(
        "child_id" => ids,
        "death_flag" => children.iter().map(|c| c.flag).collect::<Vec<_>>(),
        "age_at_death_months_imputed" => children.iter().map(|c| c.imputed).collect::<Vec<_>>(),
        "current_age_months" => children.iter().map(|c| c.current).collect::<Vec<_>>(),
    )
    .unwrap()
}

fn schema() -> Vec<SchemaEntry> {
    vec![SchemaEntry::feature_numeric("child_id")]
}

fn ints(df: &DataFrame, name: &str) -> Vec<i64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap())
        .collect()
}

proptest! {
    #[test]
    fn cohort_invariants_hold(children in proptest::collection::vec(child(), 0..40)) {
        let cohort = build_cohort(table(&children), &schema(), &CohortOptions::default()).unwrap();
        let df = cohort.data();

        let ids = ints(df, "child_id");
        let ages = ints(df, "age_child_month");
        let u5 = ints(df, "censored_u5");
        let u1 = ints(df, "censored_u1");
        let died: Vec<bool> = df
            .column("is_died")
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .map(|value| value.unwrap())
            .collect();

        let expected: Vec<usize> = children
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c.flag, None | Some(0)))
            .filter(|(_, c)| c.imputed.is_some() || c.current.is_some())
            .map(|(idx, _)| idx)
            .collect();
        prop_assert_eq!(ids.len(), expected.len());

        for (row, id) in ids.iter().enumerate() {
            let source = &children[*id as usize];
            prop_assert!(matches!(source.flag, None | Some(0)));
            prop_assert!((0..=59).contains(&ages[row]));
            prop_assert_eq!(Some(ages[row]), source.current.xor(source.imputed));
            prop_assert_eq!(died[row], source.flag.is_some());
            prop_assert_eq!(u5[row] == 1, died[row] && ages[row] < 60);
            prop_assert_eq!(u1[row] == 1, died[row] && ages[row] < 12);
            prop_assert!(u1[row] == 0 || u5[row] == 1);
        }
    }

    #[test]
    fn rebuilding_gives_the_same_digest(children in proptest::collection::vec(child(), 0..20)) {
        let options = CohortOptions::default();
        let first = build_cohort(table(&children), &schema(), &options).unwrap();
        let second = build_cohort(table(&children), &schema(), &options).unwrap();
        prop_assert!(first.data().equals_missing(second.data()));
        prop_assert_eq!(cohort_digest(&first).unwrap(), cohort_digest(&second).unwrap());
    }
}
