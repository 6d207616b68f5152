pub mod charts;
pub mod date_range;
pub mod layout;
