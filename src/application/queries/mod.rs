pub mod audit;
pub mod records;
pub mod sync;
