pub mod availability;
pub mod booking;
pub mod slots;
pub mod store;
pub mod text;
