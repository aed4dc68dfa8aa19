// src/infrastructure/browser/webdriver.rs
//! Minimal W3C WebDriver client (chromedriver, geckodriver) over HTTP.
//! Only the handful of commands the portal form needs are implemented.
use crate::application::ports::browser::{
    BrowserError, BrowserLauncher, BrowserOptions, BrowserSession,
};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Clone)]
pub struct WebDriverLauncher {
    client: Client,
    endpoint: String,
}

impl WebDriverLauncher {
    pub fn new(endpoint: impl Into<String>, request_timeout: Duration) -> Result<Self, BrowserError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| BrowserError::Driver(format!("cannot build HTTP client: {err}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    fn capabilities(options: &BrowserOptions) -> Value {
        let mut args = vec!["--disable-gpu", "--no-sandbox", "--lang=ar"];
        if options.headless {
            args.push("--headless=new");
        }
        let page_load_ms = u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX);
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args },
                    "timeouts": { "pageLoad": page_load_ms, "script": page_load_ms, "implicit": 0 }
                }
            }
        })
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self, options: BrowserOptions) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let value = send(
            &self.client,
            Method::POST,
            &format!("{}/session", self.endpoint),
            Some(Self::capabilities(&options)),
        )
        .await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| BrowserError::Driver("driver did not return a session id".into()))?;
        debug!(session_id, headless = options.headless, "webdriver session started");
        Ok(Box::new(WebDriverSession {
            client: self.client.clone(),
            base: format!("{}/session/{session_id}", self.endpoint),
        }))
    }
}

pub struct WebDriverSession {
    client: Client,
    base: String,
}

impl WebDriverSession {
    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, BrowserError> {
        send(&self.client, method, &format!("{}{path}", self.base), body).await
    }

    async fn find(&self, selector: &str) -> Result<String, BrowserError> {
        let value = self
            .command(
                Method::POST,
                "/element",
                Some(json!({ "using": "css selector", "value": selector })),
            )
            .await
            .map_err(|err| match err {
                BrowserError::MissingElement(_) => BrowserError::MissingElement(selector.to_string()),
                other => other,
            })?;
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BrowserError::Unexpected(format!("no element reference for {selector}")))
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await
            .map(|_| ())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        self.command(Method::POST, &format!("/element/{element}/clear"), Some(json!({})))
            .await?;
        self.command(
            Method::POST,
            &format!("/element/{element}/value"),
            Some(json!({ "text": value })),
        )
        .await
        .map(|_| ())
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        self.command(Method::POST, &format!("/element/{element}/click"), Some(json!({})))
            .await
            .map(|_| ())
    }

    async fn wait_for_html(&mut self, selector: &str, timeout: Duration) -> Result<String, BrowserError> {
        let deadline = Instant::now() + timeout;
        let element = loop {
            match self.find(selector).await {
                Ok(element) => break element,
                Err(BrowserError::MissingElement(_)) if Instant::now() < deadline => {
                    sleep(POLL_INTERVAL).await;
                }
                Err(BrowserError::MissingElement(_)) => {
                    return Err(BrowserError::Timeout(format!(
                        "{selector} did not appear within {}s",
                        timeout.as_secs()
                    )));
                }
                Err(other) => return Err(other),
            }
        };
        let html = self
            .command(Method::GET, &format!("/element/{element}/property/outerHTML"), None)
            .await?;
        html.as_str()
            .map(str::to_string)
            .ok_or_else(|| BrowserError::Unexpected("outerHTML is not a string".into()))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.command(Method::DELETE, "", None).await.map(|_| ())
    }
}

/// Send one WebDriver command and unwrap its `value` member.
async fn send(client: &Client, method: Method, url: &str, body: Option<Value>) -> Result<Value, BrowserError> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await.map_err(map_transport)?;
    let status = response.status();
    let mut payload: Value = response
        .json()
        .await
        .map_err(|err| BrowserError::Unexpected(format!("malformed driver response: {err}")))?;
    let value = payload.get_mut("value").map(Value::take).unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }
    let code = value.get("error").and_then(Value::as_str).unwrap_or("unknown error");
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    warn!(%status, code, "webdriver command failed");
    Err(classify(code, message))
}

fn classify(code: &str, message: String) -> BrowserError {
    match code {
        "no such element" | "stale element reference" => BrowserError::MissingElement(message),
        "timeout" | "script timeout" => BrowserError::Timeout(message),
        "session not created" | "invalid session id" | "unknown error" => {
            BrowserError::Driver(format!("{code}: {message}"))
        }
        other => BrowserError::Unexpected(format!("{other}: {message}")),
    }
}

fn map_transport(err: reqwest::Error) -> BrowserError {
    if err.is_timeout() {
        BrowserError::Timeout(err.to_string())
    } else if err.is_connect() {
        BrowserError::Driver(format!("webdriver unreachable: {err}"))
    } else {
        BrowserError::Unexpected(err.to_string())
    }
}
