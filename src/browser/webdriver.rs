//! Minimal W3C WebDriver client
//!
//! Speaks JSON over HTTP to a running WebDriver server (chromedriver by
//! default). Only the commands the console walk needs are implemented.

use std::thread;
use std::time::{Duration, Instant};

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::error::BrowserError;

use super::keys::Chord;
use super::locator::Locator;
use super::Page;

/// Web element identifier key defined by the W3C spec
const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4abdf3d1e1d9";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

// Resolves with the clipboard text, or "" when the browser refuses access.
const CLIPBOARD_SCRIPT: &str = "const done = arguments[arguments.length - 1];\
     navigator.clipboard.readText().then(done, () => done(''));";

#[derive(Debug, Clone)]
pub(crate) struct BrowserOptions {
    pub(crate) webdriver_url: String,
    pub(crate) headless: bool,
    pub(crate) element_timeout: Duration,
}

impl BrowserOptions {
    fn capabilities(&self) -> Value {
        let mut args = vec!["--window-size=1920,1080".to_string()];
        if self.headless {
            args.push("--headless=new".to_string());
        }
        json!({
            "alwaysMatch": {
                "browserName": "chrome",
                "goog:chromeOptions": { "args": args }
            }
        })
    }
}

pub(crate) struct WebDriverPage {
    agent: ureq::Agent,
    session_url: String,
    element_timeout: Duration,
    closed: bool,
}

impl WebDriverPage {
    /// Start a new browser session and grant it clipboard access
    pub(crate) fn launch(options: &BrowserOptions) -> Result<Self, BrowserError> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        let root = options.webdriver_url.trim_end_matches('/');

        let response = agent
            .post(&format!("{root}/session"))
            .send_json(json!({ "capabilities": options.capabilities() }))?;
        let value = unwrap_value(response)?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| BrowserError::Protocol("new session response has no sessionId".into()))?;
        info!(session_id, headless = options.headless, "Started browser session");

        let mut page = Self {
            agent,
            session_url: format!("{root}/session/{session_id}"),
            element_timeout: options.element_timeout,
            closed: false,
        };
        page.grant_clipboard();
        Ok(page)
    }

    fn grant_clipboard(&mut self) {
        for name in ["clipboard-read", "clipboard-write"] {
            let body = json!({ "descriptor": { "name": name }, "state": "granted" });
            if let Err(e) = self.post("/permissions", body) {
                warn!(permission = name, error = %e, "Could not grant browser permission");
            }
        }
    }

    fn post(&self, path: &str, body: Value) -> Result<Value, BrowserError> {
        let response = self
            .agent
            .post(&format!("{}{path}", self.session_url))
            .send_json(body)?;
        unwrap_value(response)
    }

    fn delete(&self, path: &str) -> Result<Value, BrowserError> {
        let response = self
            .agent
            .delete(&format!("{}{path}", self.session_url))
            .call()?;
        unwrap_value(response)
    }

    fn find_elements(
        &self,
        locator: &Locator,
        root: Option<&str>,
    ) -> Result<Vec<String>, BrowserError> {
        if let Locator::Within(parent, child) = locator {
            let mut found = Vec::new();
            for parent_id in self.find_elements(parent, root)? {
                found.extend(self.find_elements(child, Some(&parent_id))?);
            }
            return Ok(found);
        }

        let query = locator
            .query(root.is_some())
            .ok_or_else(|| BrowserError::Protocol(format!("cannot compile locator {locator}")))?;
        let path = match root {
            Some(id) => format!("/element/{id}/elements"),
            None => "/elements".to_string(),
        };
        let value = self.post(&path, json!({ "using": query.using, "value": query.value }))?;
        parse_element_ids(&value)
    }

    /// Poll until the locator matches, up to the element timeout. A timeout
    /// too large to represent as an `Instant` waits without a deadline.
    fn wait_for(&self, locator: &Locator) -> Result<String, BrowserError> {
        let deadline = Instant::now().checked_add(self.element_timeout);
        loop {
            if let Some(id) = self.find_elements(locator, None)?.into_iter().next() {
                debug!(%locator, element = %id, "Located element");
                return Ok(id);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(BrowserError::ElementNotFound(locator.to_string()));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn perform(&self, actions: Value) -> Result<(), BrowserError> {
        self.post("/actions", actions)?;
        self.delete("/actions")?;
        Ok(())
    }
}

impl Page for WebDriverPage {
    fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        debug!(url, "Navigating");
        self.post("/url", json!({ "url": url }))?;
        Ok(())
    }

    fn click(&mut self, locator: &Locator, clicks: u32) -> Result<(), BrowserError> {
        let id = self.wait_for(locator)?;
        if clicks <= 1 {
            self.post(&format!("/element/{id}/click"), json!({}))?;
            return Ok(());
        }
        self.perform(pointer_clicks(&id, clicks))
    }

    fn fill(&mut self, locator: &Locator, text: &str) -> Result<(), BrowserError> {
        let id = self.wait_for(locator)?;
        self.post(&format!("/element/{id}/clear"), json!({}))?;
        self.post(&format!("/element/{id}/value"), json!({ "text": text }))?;
        Ok(())
    }

    fn press(&mut self, locator: &Locator, chord: Chord) -> Result<(), BrowserError> {
        let id = self.wait_for(locator)?;
        self.post(
            "/execute/sync",
            json!({ "script": "arguments[0].focus();", "args": [element_ref(&id)] }),
        )?;
        debug!(%locator, %chord, "Pressing keys");
        self.perform(key_chord(chord))
    }

    fn count(&mut self, locator: &Locator) -> Result<usize, BrowserError> {
        Ok(self.find_elements(locator, None)?.len())
    }

    fn read_clipboard(&mut self) -> Result<String, BrowserError> {
        let value = self.post(
            "/execute/async",
            json!({ "script": CLIPBOARD_SCRIPT, "args": [] }),
        )?;
        Ok(match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    fn clear_cookies(&mut self) -> Result<(), BrowserError> {
        self.delete("/cookie")?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.delete("")?;
        info!("Closed browser session");
        Ok(())
    }
}

impl Drop for WebDriverPage {
    fn drop(&mut self) {
        if !self.closed
            && let Err(e) = self.close()
        {
            warn!(error = %e, "Failed to close browser session");
        }
    }
}

/// Strip the `{"value": ...}` envelope, mapping error payloads to `WebDriver`
fn unwrap_value(response: ureq::http::Response<ureq::Body>) -> Result<Value, BrowserError> {
    let status = response.status();
    let mut body = response.into_body();
    let mut parsed: Value = serde_json::from_reader(body.as_reader())
        .map_err(|e| BrowserError::Protocol(format!("invalid JSON body ({status}): {e}")))?;
    let value = parsed
        .get_mut("value")
        .map(Value::take)
        .unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }
    let field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let error = field("error");
    Err(BrowserError::WebDriver {
        error: if error.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            error
        },
        message: field("message"),
    })
}

fn parse_element_ids(value: &Value) -> Result<Vec<String>, BrowserError> {
    let items = value
        .as_array()
        .ok_or_else(|| BrowserError::Protocol(format!("expected element list, got {value}")))?;
    items
        .iter()
        .map(|item| {
            item.get(ELEMENT_KEY)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| BrowserError::Protocol(format!("not an element reference: {item}")))
        })
        .collect()
}

fn element_ref(id: &str) -> Value {
    let mut map = Map::new();
    map.insert(ELEMENT_KEY.to_string(), Value::String(id.to_string()));
    Value::Object(map)
}

fn pointer_clicks(element: &str, clicks: u32) -> Value {
    let mut actions = vec![json!({
        "type": "pointerMove",
        "duration": 0,
        "origin": element_ref(element),
        "x": 0,
        "y": 0
    })];
    for _ in 0..clicks {
        actions.push(json!({ "type": "pointerDown", "button": 0 }));
        actions.push(json!({ "type": "pointerUp", "button": 0 }));
    }
    json!({
        "actions": [{
            "type": "pointer",
            "id": "mouse",
            "parameters": { "pointerType": "mouse" },
            "actions": actions
        }]
    })
}

fn key_chord(chord: Chord) -> Value {
    let key = chord.key.code();
    let mut actions = Vec::new();
    if let Some(m) = chord.modifier {
        actions.push(json!({ "type": "keyDown", "value": m.code() }));
    }
    actions.push(json!({ "type": "keyDown", "value": key }));
    actions.push(json!({ "type": "keyUp", "value": key }));
    if let Some(m) = chord.modifier {
        actions.push(json!({ "type": "keyUp", "value": m.code() }));
    }
    json!({ "actions": [{ "type": "key", "id": "keyboard", "actions": actions }] })
}
