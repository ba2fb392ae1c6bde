// libs/booking-cell/src/services/slots.rs
use chrono::{Datelike, Days, NaiveDate, NaiveTime};

use crate::models::{BookingDay, TimeSlot};

pub const BOOKING_WINDOW_DAYS: u64 = 7;
pub const FIRST_SLOT_HOUR: u32 = 9;
pub const LAST_SLOT_END_HOUR: u32 = 18;

/// The bookable days, starting with `today`.
pub fn next_seven_days(today: NaiveDate) -> Vec<BookingDay> {
    (0..BOOKING_WINDOW_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| BookingDay {
            weekday: date.format("%a").to_string(),
            day_of_month: date.day(),
            month: date.format("%b").to_string(),
            iso_date: date,
        })
        .collect()
}

/// Half-hour starts from 09:00 through 17:30.
pub fn time_slots() -> Vec<TimeSlot> {
    (FIRST_SLOT_HOUR..LAST_SLOT_END_HOUR)
        .flat_map(|hour| [0, 30].into_iter().map(move |minute| (hour, minute)))
        .filter_map(|(hour, minute)| NaiveTime::from_hms_opt(hour, minute, 0))
        .map(TimeSlot::new)
        .collect()
}

/// Resolve a slot from its display label ("9:30 AM").
pub fn slot_from_label(label: &str) -> Option<TimeSlot> {
    let label = label.trim();
    time_slots().into_iter().find(|slot| slot.label() == label)
}

pub fn is_bookable_date(today: NaiveDate, date: NaiveDate) -> bool {
    next_seven_days(today).iter().any(|day| day.iso_date == date)
}
