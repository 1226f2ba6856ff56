pub mod person;
pub mod team;
