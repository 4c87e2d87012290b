mod common;

use common::{day, reference_day};
use sales_ledger_api::{
    error::AppError,
    filter::date::{DateFilter, DateParams, DateRange},
};

fn range(filter: DateFilter) -> Option<DateRange> {
    filter.bounds(reference_day()).expect("valid filter")
}

fn span(from: (i32, u32, u32), to: (i32, u32, u32)) -> Option<DateRange> {
    Some(DateRange {
        from: day(from.0, from.1, from.2),
        to: day(to.0, to.1, to.2),
    })
}

#[test]
fn relative_modes_resolve_against_today() {
    assert_eq!(range(DateFilter::All), None);
    assert_eq!(range(DateFilter::Today), span((2024, 6, 15), (2024, 6, 15)));
    assert_eq!(range(DateFilter::Yesterday), span((2024, 6, 14), (2024, 6, 14)));
    assert_eq!(range(DateFilter::ThisWeek), span((2024, 6, 9), (2024, 6, 15)));
    assert_eq!(range(DateFilter::ThisMonth), span((2024, 6, 1), (2024, 6, 15)));
    assert_eq!(range(DateFilter::ThisYear), span((2024, 1, 1), (2024, 6, 15)));
}

#[test]
fn week_starts_on_sunday() {
    let sunday = day(2024, 6, 9);
    let bounds = DateFilter::ThisWeek.bounds(sunday).unwrap();
    assert_eq!(bounds, span((2024, 6, 9), (2024, 6, 9)));
}

#[test]
fn yesterday_crosses_year_boundary() {
    let bounds = DateFilter::Yesterday.bounds(day(2025, 1, 1)).unwrap();
    assert_eq!(bounds, span((2024, 12, 31), (2024, 12, 31)));
}

#[test]
fn custom_shapes_cover_whole_periods() {
    assert_eq!(
        range(DateFilter::Month { year: 2024, month: 2 }),
        span((2024, 2, 1), (2024, 2, 29))
    );
    assert_eq!(
        range(DateFilter::Month { year: 2023, month: 12 }),
        span((2023, 12, 1), (2023, 12, 31))
    );
    assert_eq!(range(DateFilter::Year(2023)), span((2023, 1, 1), (2023, 12, 31)));
    assert_eq!(
        range(DateFilter::Day(day(2024, 3, 5))),
        span((2024, 3, 5), (2024, 3, 5))
    );
    assert_eq!(
        range(DateFilter::Range {
            from: day(2024, 3, 1),
            to: day(2024, 3, 10)
        }),
        span((2024, 3, 1), (2024, 3, 10))
    );
}

#[test]
fn reversed_range_is_rejected() {
    let err = DateFilter::Range {
        from: day(2024, 3, 10),
        to: day(2024, 3, 1),
    }
    .bounds(reference_day())
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidFilter(_)));
}

#[test]
fn custom_precedence_prefers_month_and_year() {
    let filter = DateFilter::from_params(DateParams {
        mode: Some("custom"),
        date_from: Some("2024-01-05"),
        date_to: Some("2024-01-09"),
        month: Some("3"),
        year: Some("2024"),
    })
    .unwrap();
    assert_eq!(filter, DateFilter::Month { year: 2024, month: 3 });

    let filter = DateFilter::from_params(DateParams {
        mode: Some("custom"),
        year: Some("2023"),
        ..DateParams::default()
    })
    .unwrap();
    assert_eq!(filter, DateFilter::Year(2023));

    let filter = DateFilter::from_params(DateParams {
        mode: Some("custom"),
        date_from: Some("2024-01-05"),
        ..DateParams::default()
    })
    .unwrap();
    assert_eq!(filter, DateFilter::Day(day(2024, 1, 5)));

    let filter = DateFilter::from_params(DateParams {
        mode: Some("custom"),
        date_from: Some("2024-01-05"),
        date_to: Some("2024-01-05"),
        ..DateParams::default()
    })
    .unwrap();
    assert_eq!(filter, DateFilter::Day(day(2024, 1, 5)));
}

#[test]
fn malformed_date_params_are_invalid_filters() {
    let cases = [
        DateParams {
            mode: Some("lastDecade"),
            ..DateParams::default()
        },
        DateParams {
            mode: Some("custom"),
            ..DateParams::default()
        },
        DateParams {
            mode: Some("custom"),
            date_from: Some("15/06/2024"),
            ..DateParams::default()
        },
        DateParams {
            mode: Some("custom"),
            month: Some("13"),
            year: Some("2024"),
            ..DateParams::default()
        },
        DateParams {
            mode: Some("custom"),
            date_from: Some("2024-06-10"),
            date_to: Some("2024-06-01"),
            ..DateParams::default()
        },
    ];
    for params in cases {
        let err = DateFilter::from_params(params).unwrap_err();
        assert!(matches!(err, AppError::InvalidFilter(_)), "{params:?}");
    }
}

#[test]
fn all_and_missing_mode_mean_no_filter() {
    assert_eq!(
        DateFilter::from_params(DateParams::default()).unwrap(),
        DateFilter::All
    );
    assert_eq!(
        DateFilter::from_params(DateParams {
            mode: Some("all"),
            ..DateParams::default()
        })
        .unwrap(),
        DateFilter::All
    );
}
