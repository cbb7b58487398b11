pub mod catalog;
pub mod inventory;
pub mod reservations;
pub mod system;
