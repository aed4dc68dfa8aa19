// src/application/ports/browser.rs
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("element not found: {0}")]
    MissingElement(String),
    #[error("browser driver error: {0}")]
    Driver(String),
    #[error("unexpected browser failure: {0}")]
    Unexpected(String),
}

impl BrowserError {
    /// Message stored on a failed sync attempt.
    pub fn stored_message(&self) -> String {
        match self {
            BrowserError::Timeout(detail) => {
                format!("انتهت مهلة الانتظار أثناء الاتصال ببوابة محاكم ({detail})")
            }
            BrowserError::MissingElement(selector) => {
                format!("تعذر العثور على حقل في نموذج البحث: {selector}")
            }
            BrowserError::Driver(detail) => format!("خطأ في المتصفح: {detail}"),
            BrowserError::Unexpected(detail) => format!("خطأ غير متوقع: {detail}"),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BrowserError::Timeout(_) => "timeout",
            BrowserError::MissingElement(_) => "missing_element",
            BrowserError::Driver(_) => "driver",
            BrowserError::Unexpected(_) => "unexpected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserOptions {
    pub headless: bool,
    pub timeout: Duration,
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, options: BrowserOptions) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// One live browser. Selectors are CSS selectors.
#[async_trait]
pub trait BrowserSession: Send {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Wait until `selector` is present and return its outer HTML.
    async fn wait_for_html(&mut self, selector: &str, timeout: Duration) -> Result<String, BrowserError>;

    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}
