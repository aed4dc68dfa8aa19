mod check;
mod login;
mod logout;
mod service;

pub use check::SessionVerdict;
pub use login::{LoginCommand, LoginResult};
pub use service::SessionCommandService;
