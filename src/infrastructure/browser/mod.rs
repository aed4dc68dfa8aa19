//! Browser automation for the Mahakim portal.
mod webdriver;

pub use webdriver::{WebDriverLauncher, WebDriverSession};
