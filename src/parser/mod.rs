use chrono::{Days, NaiveDate};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res},
    sequence::tuple,
    IResult,
};

use crate::error::{QueryError, Result};

/// Wire format for every date accepted or produced by the service.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the trailing window, as a fixed offset rather than calendar months.
pub const TRAILING_WINDOW_DAYS: u64 = 365;

fn digits(count: usize) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input| take_while_m_n(count, count, |c: char| c.is_ascii_digit())(input)
}

fn number<T: std::str::FromStr>(count: usize) -> impl Fn(&str) -> IResult<&str, T> {
    move |input| map_res(digits(count), str::parse::<T>)(input)
}

/// Splits `YYYY-MM-DD` into its numeric parts. Rejects anything that is not
/// exactly four, two and two digits separated by dashes.
pub fn parse_date_parts(input: &str) -> IResult<&str, (i32, u32, u32)> {
    let (input, (year, _, month, _, day)) = all_consuming(tuple((
        number::<i32>(4),
        char('-'),
        number::<u32>(2),
        char('-'),
        number::<u32>(2),
    )))(input)?;

    Ok((input, (year, month, day)))
}

/// Parses a zero-padded ISO date and checks that it names a real calendar day.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let (_, (year, month, day)) =
        parse_date_parts(input).map_err(|_| QueryError::InvalidDate(input.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| QueryError::InvalidDate(input.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The date exactly 365 days before `date`. Leap days are not special-cased.
pub fn year_before(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(TRAILING_WINDOW_DAYS))
        .ok_or(QueryError::DateOutOfRange(date))
}
