pub mod grid;
pub mod patients;
