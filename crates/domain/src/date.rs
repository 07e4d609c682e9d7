use chrono::prelude::*;
use thiserror::Error;

/// A caller supplied event date after validation and zero-padding, together
/// with the sort key derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDate {
    /// `MM/DD/YYYY` with month and day zero-padded to width 2.
    pub date: String,
    /// `YYYY-MM-DD`, kept on the record purely so that storage backends
    /// without native date parsing can order events chronologically.
    pub sort_date: String,
}

#[derive(Debug, Error)]
#[error("date `{0}` is not a valid MM/DD/YYYY date")]
pub struct InvalidDateError(pub String);

/// Zero-pads the month and day parts of a `M/D/YYYY` shaped date.
///
/// Precondition: the input splits on `/` into three parts. Use [`normalize`]
/// for anything that comes from outside the process.
pub fn pad_date(date: &str) -> String {
    let parts = date.split('/').collect::<Vec<_>>();
    format!("{:0>2}/{:0>2}/{}", parts[0], parts[1], parts[2])
}

/// Derives the `YYYY-MM-DD` sort key from a date. Must be invoked only after
/// [`pad_date`].
pub fn create_sort_date(padded_date: &str) -> String {
    let parts = padded_date.split('/').collect::<Vec<_>>();
    format!("{}-{:0>2}-{:0>2}", parts[2], parts[0], parts[1])
}

/// Validates a raw `M/D/YYYY` date and produces the padded form plus the
/// sort key.
pub fn normalize(raw: &str) -> Result<NormalizedDate, InvalidDateError> {
    let parts = raw.split('/').collect::<Vec<_>>();
    if parts.len() != 3 {
        return Err(InvalidDateError(raw.to_string()));
    }
    let month = parts[0].parse::<u32>();
    let day = parts[1].parse::<u32>();
    let year = parts[2].parse::<i32>();
    if month.is_err() || day.is_err() || year.is_err() {
        return Err(InvalidDateError(raw.to_string()));
    }

    let month = month.unwrap();
    let day = day.unwrap();
    let year = year.unwrap();
    if !(1970..=2100).contains(&year) || month < 1 || month > 12 {
        return Err(InvalidDateError(raw.to_string()));
    }
    if day < 1 || day > get_month_length(year, month) {
        return Err(InvalidDateError(raw.to_string()));
    }

    let date = pad_date(raw);
    let sort_date = create_sort_date(&date);
    Ok(NormalizedDate { date, sort_date })
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month - 1 {
        0 => 31,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        2 => 31,
        3 => 30,
        4 => 31,
        5 => 30,
        6 => 31,
        7 => 31,
        8 => 30,
        9 => 31,
        10 => 30,
        11 => 31,
        _ => panic!("Invalid month"),
    }
}

/// Formats a calendar date in the `MM/DD/YYYY` form the store keeps.
pub fn format_date(date: &NaiveDate) -> String {
    format!("{:02}/{:02}/{}", date.month(), date.day(), date.year())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_pads_month_and_day() {
        assert_eq!(pad_date("3/4/2024"), "03/04/2024");
        assert_eq!(pad_date("12/31/1999"), "12/31/1999");
        assert_eq!(pad_date("1/09/2020"), "01/09/2020");
    }

    #[test]
    fn padding_is_idempotent() {
        let dates = vec!["3/4/2024", "12/31/1999", "1/9/2020", "10/1/2021"];
        for date in &dates {
            assert_eq!(pad_date(&pad_date(date)), pad_date(date));
        }
    }

    #[test]
    fn it_derives_the_sort_key() {
        assert_eq!(create_sort_date(&pad_date("3/4/2024")), "2024-03-04");
        assert_eq!(create_sort_date(&pad_date("12/31/1999")), "1999-12-31");
    }

    #[test]
    fn it_accepts_valid_dates() {
        let valid_dates = vec![
            "1/1/2018",
            "12/31/2025",
            "1/12/2020",
            "2/29/2020",
            "02/2/2020",
            "02/02/2020",
            "2/09/2020",
        ];

        for date in &valid_dates {
            assert!(normalize(date).is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_dates() {
        let invalid_dates = vec![
            "1--1/2018",
            "1/32/2020",
            "2/30/2020",
            "2/29/2021",
            "0/1/2020",
            "1/0/2020",
            "13/1/2020",
            "1/1/1900",
            "1/1",
            "1/1/1/2020",
            "abc",
            "a/b/c",
            "",
        ];

        for date in &invalid_dates {
            assert!(normalize(date).is_err());
        }
    }

    #[test]
    fn it_normalizes_while_validating() {
        let normalized = normalize("3/4/2024").expect("date to be valid");
        assert_eq!(normalized.date, "03/04/2024");
        assert_eq!(normalized.sort_date, "2024-03-04");
    }

    #[test]
    fn it_formats_calendar_dates() {
        let date = NaiveDate::from_ymd(2024, 3, 4);
        assert_eq!(format_date(&date), "03/04/2024");
        let date = NaiveDate::from_ymd(1999, 12, 31);
        assert_eq!(format_date(&date), "12/31/1999");
    }
}
