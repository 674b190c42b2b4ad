pub mod display;
pub mod operator;
