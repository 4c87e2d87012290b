mod common;

use chrono::NaiveDate;
use common::{day, reference_day};
use sales_ledger_api::{
    filter::{DateFilter, FilterState, Predicate, SortColumn, SortKey, TransactionQuery},
    routes::params::SortOrder,
};

fn build(state: &FilterState) -> TransactionQuery {
    TransactionQuery::build(state, reference_day()).expect("valid filter")
}

fn between(from: NaiveDate, to: NaiveDate) -> Vec<Predicate> {
    vec![Predicate::DateBetween { from, to }]
}

#[test]
fn building_twice_gives_equal_queries() {
    let mut state = FilterState::new();
    state
        .set_customers(["C3", "C1", "C3"])
        .set_products([9, 2, 9])
        .set_date_filter(DateFilter::ThisWeek);

    assert_eq!(build(&state), build(&state));

    let mut reordered = FilterState::new();
    reordered
        .set_date_filter(DateFilter::ThisWeek)
        .set_products([2, 9])
        .set_customers(["C1", "C3"]);
    assert_eq!(build(&state), build(&reordered));

    assert_eq!(
        build(&state).predicates,
        vec![
            Predicate::CustomerIn(vec!["C1".into(), "C3".into()]),
            Predicate::ProductIn(vec![2, 9]),
            Predicate::DateBetween {
                from: day(2024, 6, 9),
                to: day(2024, 6, 15),
            },
        ]
    );
}

#[test]
fn empty_state_has_no_predicates_and_the_fixed_sort() {
    let query = build(&FilterState::new());
    assert!(query.predicates.is_empty());
    assert_eq!(query, TransactionQuery::all());
    assert_eq!(
        query.sort,
        vec![
            SortKey {
                column: SortColumn::Date,
                order: SortOrder::Desc,
            },
            SortKey {
                column: SortColumn::Id,
                order: SortOrder::Desc,
            },
        ]
    );
}

#[test]
fn each_date_mode_yields_its_range_predicate() {
    let cases = [
        (DateFilter::Today, between(day(2024, 6, 15), day(2024, 6, 15))),
        (DateFilter::Yesterday, between(day(2024, 6, 14), day(2024, 6, 14))),
        (DateFilter::ThisWeek, between(day(2024, 6, 9), day(2024, 6, 15))),
        (DateFilter::ThisMonth, between(day(2024, 6, 1), day(2024, 6, 15))),
        (DateFilter::ThisYear, between(day(2024, 1, 1), day(2024, 6, 15))),
        (
            DateFilter::Day(day(2024, 3, 5)),
            between(day(2024, 3, 5), day(2024, 3, 5)),
        ),
        (
            DateFilter::Range {
                from: day(2024, 3, 1),
                to: day(2024, 3, 10),
            },
            between(day(2024, 3, 1), day(2024, 3, 10)),
        ),
        (
            DateFilter::Month {
                year: 2024,
                month: 2,
            },
            between(day(2024, 2, 1), day(2024, 2, 29)),
        ),
        (
            DateFilter::Year(2023),
            between(day(2023, 1, 1), day(2023, 12, 31)),
        ),
        (DateFilter::All, vec![]),
    ];

    for (filter, expected) in cases {
        let mut state = FilterState::new();
        state.set_date_filter(filter);
        let query = build(&state);
        assert_eq!(query.predicates, expected, "{filter:?}");
        assert_eq!(query, build(&state), "{filter:?}");
    }
}

#[test]
fn reversed_custom_range_fails_to_build() {
    let mut state = FilterState::new();
    state.set_date_filter(DateFilter::Range {
        from: day(2024, 3, 10),
        to: day(2024, 3, 1),
    });
    assert!(TransactionQuery::build(&state, reference_day()).is_err());
}
