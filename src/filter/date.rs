//! Date-filter modes and the inclusive day ranges they resolve to.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which days a transaction listing covers.
///
/// The `Day`, `Range`, `Month` and `Year` variants are the `custom` sub-shapes
/// on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    ThisYear,
    Day(NaiveDate),
    Range { from: NaiveDate, to: NaiveDate },
    Month { year: i32, month: u32 },
    Year(i32),
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Raw date-related query values, before interpretation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateParams<'a> {
    pub mode: Option<&'a str>,
    pub date_from: Option<&'a str>,
    pub date_to: Option<&'a str>,
    pub month: Option<&'a str>,
    pub year: Option<&'a str>,
}

/// Date-related query values produced by [`DateFilter::to_params`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedDate {
    pub mode: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl DateFilter {
    /// The `dateFilter` wire value, `None` for [`DateFilter::All`].
    pub fn mode(&self) -> Option<&'static str> {
        match self {
            DateFilter::All => None,
            DateFilter::Today => Some("today"),
            DateFilter::Yesterday => Some("yesterday"),
            DateFilter::ThisWeek => Some("thisWeek"),
            DateFilter::ThisMonth => Some("thisMonth"),
            DateFilter::ThisYear => Some("thisYear"),
            DateFilter::Day(_)
            | DateFilter::Range { .. }
            | DateFilter::Month { .. }
            | DateFilter::Year(_) => Some("custom"),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.mode() == Some("custom")
    }

    pub fn to_params(&self) -> EncodedDate {
        let mut encoded = EncodedDate {
            mode: self.mode().map(str::to_string),
            ..EncodedDate::default()
        };
        match *self {
            DateFilter::Day(date) => {
                encoded.date_from = Some(format_date(date));
                encoded.date_to = Some(format_date(date));
            }
            DateFilter::Range { from, to } => {
                encoded.date_from = Some(format_date(from));
                encoded.date_to = Some(format_date(to));
            }
            DateFilter::Month { year, month } => {
                encoded.month = Some(month.to_string());
                encoded.year = Some(year.to_string());
            }
            DateFilter::Year(year) => {
                encoded.year = Some(year.to_string());
            }
            _ => {}
        }
        encoded
    }

    /// Interprets raw query values.
    ///
    /// `custom` resolves by precedence: month+year, then year alone (no month,
    /// no `dateFrom`), then `dateFrom`+`dateTo`, then `dateFrom` alone.
    pub fn from_params(params: DateParams<'_>) -> AppResult<Self> {
        let mode = non_empty(params.mode);
        let date_from = non_empty(params.date_from);
        let date_to = non_empty(params.date_to);
        let month = non_empty(params.month);
        let year = non_empty(params.year);

        let filter = match mode {
            None | Some("all") => DateFilter::All,
            Some("today") => DateFilter::Today,
            Some("yesterday") => DateFilter::Yesterday,
            Some("thisWeek") => DateFilter::ThisWeek,
            Some("thisMonth") => DateFilter::ThisMonth,
            Some("thisYear") => DateFilter::ThisYear,
            Some("custom") => match (month, year, date_from, date_to) {
                (Some(month), Some(year), _, _) => DateFilter::Month {
                    year: parse_year(year)?,
                    month: parse_month(month)?,
                },
                (None, Some(year), None, _) => DateFilter::Year(parse_year(year)?),
                (_, _, Some(from), Some(to)) => {
                    let (from, to) = (parse_date(from)?, parse_date(to)?);
                    if from == to {
                        DateFilter::Day(from)
                    } else {
                        DateFilter::Range { from, to }
                    }
                }
                (_, _, Some(from), None) => DateFilter::Day(parse_date(from)?),
                _ => {
                    return Err(AppError::InvalidFilter(
                        "custom date filter needs dateFrom, month and year, or year".into(),
                    ));
                }
            },
            Some(other) => {
                return Err(AppError::InvalidFilter(format!(
                    "unknown dateFilter `{other}`"
                )));
            }
        };

        // Custom shapes never read `today`, so any date works here.
        if filter.is_custom() {
            filter.bounds(NaiveDate::MIN)?;
        }
        Ok(filter)
    }

    /// Resolves the inclusive day range relative to `today`. Weeks start on Sunday.
    pub fn bounds(&self, today: NaiveDate) -> AppResult<Option<DateRange>> {
        let range = match *self {
            DateFilter::All => return Ok(None),
            DateFilter::Today => DateRange {
                from: today,
                to: today,
            },
            DateFilter::Yesterday => {
                let yesterday = today.pred_opt().ok_or_else(out_of_range)?;
                DateRange {
                    from: yesterday,
                    to: yesterday,
                }
            }
            DateFilter::ThisWeek => {
                let back = Days::new(u64::from(today.weekday().num_days_from_sunday()));
                DateRange {
                    from: today.checked_sub_days(back).ok_or_else(out_of_range)?,
                    to: today,
                }
            }
            DateFilter::ThisMonth => DateRange {
                from: first_of_month(today.year(), today.month())?,
                to: today,
            },
            DateFilter::ThisYear => DateRange {
                from: first_of_month(today.year(), 1)?,
                to: today,
            },
            DateFilter::Day(date) => DateRange {
                from: date,
                to: date,
            },
            DateFilter::Range { from, to } => {
                if to < from {
                    return Err(AppError::InvalidFilter(format!(
                        "dateTo {to} is before dateFrom {from}"
                    )));
                }
                DateRange { from, to }
            }
            DateFilter::Month { year, month } => DateRange {
                from: first_of_month(year, month)?,
                to: last_of_month(year, month)?,
            },
            DateFilter::Year(year) => DateRange {
                from: first_of_month(year, 1)?,
                to: last_of_month(year, 12)?,
            },
        };
        Ok(Some(range))
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| AppError::InvalidFilter(format!("`{raw}` is not a YYYY-MM-DD date")))
}

fn parse_month(raw: &str) -> AppResult<u32> {
    raw.parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| AppError::InvalidFilter(format!("month `{raw}` is not between 1 and 12")))
}

fn parse_year(raw: &str) -> AppResult<i32> {
    raw.parse::<i32>()
        .map_err(|_| AppError::InvalidFilter(format!("year `{raw}` is not a number")))
}

fn first_of_month(year: i32, month: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AppError::InvalidFilter(format!("{year}-{month:02} is not a valid month"))
    })
}

fn last_of_month(year: i32, month: u32) -> AppResult<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    first_of_month(next_year, next_month)?
        .pred_opt()
        .ok_or_else(out_of_range)
}

fn out_of_range() -> AppError {
    AppError::InvalidFilter("date is outside the supported calendar range".into())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
