pub mod audit;
pub mod cases;
pub mod deadline;
pub mod errors;
pub mod mahakim;
pub mod record;
pub mod session;
pub mod user;
