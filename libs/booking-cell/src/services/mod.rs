pub mod detail;
pub mod slots;

pub use detail::{DetailState, DetailView};
pub use slots::{next_seven_days, slot_from_label, time_slots};
