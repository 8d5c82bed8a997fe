pub mod generate;
pub mod judge;
pub mod select;
pub mod status;
