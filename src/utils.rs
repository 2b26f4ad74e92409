use chrono::{Local, NaiveDate};

/// The library's calendar date. Loan dates, due dates and overdue sweeps are
/// all evaluated against the server's local day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
