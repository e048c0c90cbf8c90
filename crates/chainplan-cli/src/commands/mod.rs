pub mod recipes;
pub mod solve;
