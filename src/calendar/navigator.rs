use serde::{Deserialize, Serialize};
use time::{util::days_in_year_month, Date, Duration, Month};

use crate::days::week_start;

use super::services::get_week_days;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Weekly,
    Daily,
    Monthly,
}

/// Which part of the calendar is on screen. Holds no meal data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarNavigator {
    current_date: Date,
    current_view: CalendarView,
    current_week_start: Date,
}

impl CalendarNavigator {
    pub fn new(today: Date) -> Self {
        Self {
            current_date: today,
            current_view: CalendarView::default(),
            current_week_start: week_start(today),
        }
    }

    pub fn current_date(&self) -> Date {
        self.current_date
    }

    pub fn current_view(&self) -> CalendarView {
        self.current_view
    }

    pub fn current_week_start(&self) -> Date {
        self.current_week_start
    }

    pub fn set_date(&mut self, date: Date) {
        self.current_date = date;
        self.current_week_start = week_start(date);
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.current_view = view;
    }

    pub fn today(&mut self, today: Date) {
        self.set_date(today);
    }

    /// One step forward in the current view's unit.
    pub fn next(&mut self) {
        let date = match self.current_view {
            CalendarView::Daily => self.current_date.saturating_add(Duration::days(1)),
            CalendarView::Weekly => self.current_date.saturating_add(Duration::weeks(1)),
            CalendarView::Monthly => shift_months(self.current_date, 1),
        };
        self.set_date(date);
    }

    pub fn previous(&mut self) {
        let date = match self.current_view {
            CalendarView::Daily => self.current_date.saturating_sub(Duration::days(1)),
            CalendarView::Weekly => self.current_date.saturating_sub(Duration::weeks(1)),
            CalendarView::Monthly => shift_months(self.current_date, -1),
        };
        self.set_date(date);
    }

    pub fn visible_days(&self) -> Vec<Date> {
        match self.current_view {
            CalendarView::Daily => vec![self.current_date],
            CalendarView::Weekly => get_week_days(self.current_week_start).to_vec(),
            CalendarView::Monthly => month_grid(self.current_date).concat(),
        }
    }
}

/// Sunday-first weeks covering the month of `date`, padded with days from
/// the neighbouring months.
pub fn month_grid(date: Date) -> Vec<[Date; 7]> {
    let first = date.replace_day(1).unwrap_or(date);
    let last_day = days_in_year_month(date.year(), date.month());
    let last = date.replace_day(last_day).unwrap_or(date);

    let mut weeks = Vec::with_capacity(6);
    let mut start = week_start(first);
    while start <= last {
        weeks.push(get_week_days(start));
        start = start.saturating_add(Duration::weeks(1));
    }
    weeks
}

/// Moves by whole months, clamping the day to the target month's length.
fn shift_months(date: Date, delta: i32) -> Date {
    let index = date.year() * 12 + (date.month() as i32 - 1) + delta;
    let year = index.div_euclid(12);
    let month = match Month::try_from((index.rem_euclid(12) + 1) as u8) {
        Ok(m) => m,
        Err(_) => return date,
    };
    let day = date.day().min(days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).unwrap_or(date)
}
