pub mod deadlines;
pub mod mahakim;
pub mod records;
pub mod seed;
pub mod sessions;
