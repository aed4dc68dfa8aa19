pub mod rate_limit;
pub mod session_guard;
