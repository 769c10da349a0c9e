//! Playwright-style element locators
//!
//! Locators describe elements the way a user sees them (role plus
//! accessible name, label, visible text) and compile to the CSS or XPath
//! queries WebDriver understands.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Locator {
    /// Raw CSS selector
    Css(String),
    /// ARIA role with accessible name. `exact` compares the whole name
    /// case-sensitively; otherwise an ASCII case-insensitive substring matches.
    Role {
        role: String,
        name: String,
        exact: bool,
    },
    /// Form field or region labelled with the given text
    Label(String),
    /// Element whose own text node equals the text
    Text(String),
    /// `child` searched inside every match of `parent`
    Within(Box<Locator>, Box<Locator>),
}

/// A query in WebDriver's `using`/`value` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Query {
    pub(crate) using: &'static str,
    pub(crate) value: String,
}

impl Locator {
    pub(crate) fn css(selector: &str) -> Self {
        Locator::Css(selector.to_string())
    }

    pub(crate) fn role(role: &str, name: &str) -> Self {
        Locator::Role {
            role: role.to_string(),
            name: name.to_string(),
            exact: false,
        }
    }

    pub(crate) fn role_exact(role: &str, name: &str) -> Self {
        Locator::Role {
            role: role.to_string(),
            name: name.to_string(),
            exact: true,
        }
    }

    pub(crate) fn label(text: &str) -> Self {
        Locator::Label(text.to_string())
    }

    pub(crate) fn text_exact(text: &str) -> Self {
        Locator::Text(text.to_string())
    }

    pub(crate) fn within(self, child: Locator) -> Self {
        Locator::Within(Box::new(self), Box::new(child))
    }

    /// Compile to a single query. `scoped` makes XPath relative to the
    /// element the search starts from. `Within` has no single-query form.
    pub(crate) fn query(&self, scoped: bool) -> Option<Query> {
        let prefix = if scoped { "." } else { "" };
        let xpath = |value: String| {
            Some(Query {
                using: "xpath",
                value,
            })
        };
        match self {
            Locator::Css(selector) => Some(Query {
                using: "css selector",
                value: selector.clone(),
            }),
            Locator::Role { role, name, exact } => xpath(format!(
                "{prefix}//*[{} and {}]",
                role_condition(role),
                name_condition(name, *exact)
            )),
            Locator::Label(text) => {
                let lit = xpath_literal(text);
                xpath(format!(
                    "{prefix}//*[@aria-label={lit} or @id=//label[normalize-space(.)={lit}]/@for]"
                ))
            }
            Locator::Text(text) => xpath(format!(
                "{prefix}//*[text()[normalize-space(.)={}]]",
                xpath_literal(text)
            )),
            Locator::Within(..) => None,
        }
    }
}

fn role_condition(role: &str) -> String {
    let tags: &[&str] = match role {
        "button" => &["button"],
        "link" => &["a"],
        "cell" => &["td"],
        "option" => &["option"],
        "combobox" => &["select"],
        _ => &[],
    };
    let mut parts: Vec<String> = tags.iter().map(|t| format!("self::{t}")).collect();
    parts.push(format!("@role={}", xpath_literal(role)));
    if role == "cell" {
        parts.push("@role='gridcell'".to_string());
    }
    format!("({})", parts.join(" or "))
}

const UPPER: &str = "'ABCDEFGHIJKLMNOPQRSTUVWXYZ'";
const LOWER: &str = "'abcdefghijklmnopqrstuvwxyz'";

fn name_condition(name: &str, exact: bool) -> String {
    if exact {
        let lit = xpath_literal(name);
        return format!("(normalize-space(.)={lit} or @aria-label={lit})");
    }
    // XPath 1.0 has no lower-case(); translate() covers ASCII
    let lit = xpath_literal(&name.to_ascii_lowercase());
    let lower = |expr: &str| format!("translate({expr}, {UPPER}, {LOWER})");
    format!(
        "(contains({}, {lit}) or contains({}, {lit}))",
        lower("normalize-space(.)"),
        lower("@aria-label")
    )
}

/// Quote a string as an XPath 1.0 literal.
///
/// XPath has no escape sequences, so text containing both quote kinds is
/// split and rejoined with `concat()`.
pub(crate) fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s
        .split('\'')
        .map(|p| format!("'{p}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "{selector}"),
            Locator::Role { role, name, exact } => {
                write!(f, "role={role}[name=\"{name}\"")?;
                if *exact {
                    write!(f, " exact")?;
                }
                write!(f, "]")
            }
            Locator::Label(text) => write!(f, "label=\"{text}\""),
            Locator::Text(text) => write!(f, "text=\"{text}\""),
            Locator::Within(parent, child) => write!(f, "{parent} >> {child}"),
        }
    }
}
