//! Browser automation layer
//!
//! The navigator drives the console through the `Page` trait; `WebDriverPage`
//! implements it against a W3C WebDriver server.

pub(crate) mod keys;
pub(crate) mod locator;
pub(crate) mod webdriver;

use crate::error::BrowserError;

pub(crate) use keys::{Chord, Key, Modifier};
pub(crate) use locator::Locator;
pub(crate) use webdriver::{BrowserOptions, WebDriverPage};

/// The handful of page interactions the console walk needs
pub(crate) trait Page {
    /// Load a URL and wait for the document to finish loading
    fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Click the first match `clicks` times in a row (2 = double click)
    fn click(&mut self, locator: &Locator, clicks: u32) -> Result<(), BrowserError>;

    /// Replace the contents of an input
    fn fill(&mut self, locator: &Locator, text: &str) -> Result<(), BrowserError>;

    /// Focus the first match and press a key chord
    fn press(&mut self, locator: &Locator, chord: Chord) -> Result<(), BrowserError>;

    /// Number of elements currently matching, without waiting
    fn count(&mut self, locator: &Locator) -> Result<usize, BrowserError>;

    fn read_clipboard(&mut self) -> Result<String, BrowserError>;

    fn clear_cookies(&mut self) -> Result<(), BrowserError>;

    /// End the browser session
    fn close(&mut self) -> Result<(), BrowserError>;
}
