use std::fmt;

use crate::browser::Browser;
use crate::dom::{ControlKind, ElementId};
use crate::error::{Result, TatError};
use crate::steps::Target;

/// Declarative assertions on page state
pub enum Assertion {
    // Presence and visibility
    Exists(Target),
    NotExists(Target),
    Visible(Target),
    NotVisible(Target),
    Length {
        target: Target,
        expected: usize,
    },

    // Form controls
    Value {
        target: Target,
        expected: String,
    },
    NoValue(Target),
    Checked(Target),
    NotChecked(Target),
    FileName {
        target: Target,
        expected: String,
    },

    // Content
    Attr {
        target: Target,
        name: String,
        expected: String,
    },
    ContainsText {
        target: Target,
        text: String,
    },
    Title(String),

    // Custom (read-only access to the session)
    Custom(Box<dyn Fn(&Browser) -> Result<()> + Send + Sync>),
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists(t) => write!(f, "Exists({})", t),
            Self::NotExists(t) => write!(f, "NotExists({})", t),
            Self::Visible(t) => write!(f, "Visible({})", t),
            Self::NotVisible(t) => write!(f, "NotVisible({})", t),
            Self::Length { target, expected } => write!(f, "Length({}, {})", target, expected),
            Self::Value { target, expected } => write!(f, "Value({}, {:?})", target, expected),
            Self::NoValue(t) => write!(f, "NoValue({})", t),
            Self::Checked(t) => write!(f, "Checked({})", t),
            Self::NotChecked(t) => write!(f, "NotChecked({})", t),
            Self::FileName { target, expected } => {
                write!(f, "FileName({}, {:?})", target, expected)
            }
            Self::Attr {
                target,
                name,
                expected,
            } => write!(f, "Attr({}, {}={:?})", target, name, expected),
            Self::ContainsText { target, text } => {
                write!(f, "ContainsText({}, {:?})", target, text)
            }
            Self::Title(t) => write!(f, "Title({:?})", t),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists(t) => write!(f, "{} exists", t),
            Self::NotExists(t) => write!(f, "{} does not exist", t),
            Self::Visible(t) => write!(f, "{} is visible", t),
            Self::NotVisible(t) => write!(f, "{} is not visible", t),
            Self::Length { target, expected } => write!(f, "{} has length {}", target, expected),
            Self::Value { target, expected } => write!(f, "{} has value {:?}", target, expected),
            Self::NoValue(t) => write!(f, "{} has no value", t),
            Self::Checked(t) => write!(f, "{} is checked", t),
            Self::NotChecked(t) => write!(f, "{} is not checked", t),
            Self::FileName { target, expected } => {
                write!(f, "{} holds file {:?}", target, expected)
            }
            Self::Attr {
                target,
                name,
                expected,
            } => write!(f, "{} has {}={:?}", target, name, expected),
            Self::ContainsText { target, text } => write!(f, "{} contains {:?}", target, text),
            Self::Title(t) => write!(f, "title is {:?}", t),
            Self::Custom(_) => write!(f, "custom check"),
        }
    }
}

impl Assertion {
    /// Check the assertion once against the current page.
    pub fn evaluate(&self, browser: &Browser) -> Result<()> {
        let doc = browser.document();
        match self {
            Self::Exists(target) => {
                first(browser, target)?;
                Ok(())
            }
            Self::NotExists(target) => {
                let count = target.resolve(doc)?.len();
                expect(target, count == 0, "no elements", || format!("{} found", count))
            }
            Self::Visible(target) => {
                let matched = all(browser, target)?;
                let hidden: Vec<String> = matched
                    .iter()
                    .filter(|eid| !doc.is_visible(**eid))
                    .map(|eid| doc.describe(*eid))
                    .collect();
                expect(target, hidden.is_empty(), "visible", || {
                    format!("hidden {}", hidden.join(", "))
                })
            }
            Self::NotVisible(target) => {
                let shown: Vec<String> = target
                    .resolve(doc)?
                    .into_iter()
                    .filter(|eid| doc.is_visible(*eid))
                    .map(|eid| doc.describe(eid))
                    .collect();
                expect(target, shown.is_empty(), "not visible", || {
                    format!("visible {}", shown.join(", "))
                })
            }
            Self::Length { target, expected } => {
                let count = target.resolve(doc)?.len();
                expect(target, count == *expected, &format!("length {}", expected), || {
                    format!("length {}", count)
                })
            }
            Self::Value { target, expected } => {
                let actual = doc.get(first(browser, target)?).value();
                expect(target, &actual == expected, &format!("value {:?}", expected), || {
                    format!("value {:?}", actual)
                })
            }
            Self::NoValue(target) => {
                let actual = doc.get(first(browser, target)?).value();
                expect(target, actual.is_empty(), "no value", || format!("value {:?}", actual))
            }
            Self::Checked(target) | Self::NotChecked(target) => {
                let want = matches!(self, Self::Checked(_));
                let matched = all(browser, target)?;
                let mut wrong = Vec::new();
                for eid in matched {
                    let el = doc.get(eid);
                    if !el.kind().is_checkable() {
                        return Err(TatError::NotInteractable {
                            action: "assert checked on",
                            target: target.to_string(),
                            reason: format!("{} is not a checkbox or radio", el),
                        });
                    }
                    if el.checked != want {
                        wrong.push(doc.describe(eid));
                    }
                }
                let label = if want { "checked" } else { "not checked" };
                expect(target, wrong.is_empty(), label, || {
                    format!("opposite state on {}", wrong.join(", "))
                })
            }
            Self::FileName { target, expected } => {
                let el = doc.get(first(browser, target)?);
                if el.kind() != ControlKind::File {
                    return Err(TatError::NotInteractable {
                        action: "read files of",
                        target: target.to_string(),
                        reason: format!("{} is not a file input", el),
                    });
                }
                let actual = el.files.first().map(|file| file.name.clone());
                expect(
                    target,
                    actual.as_deref() == Some(expected.as_str()),
                    &format!("file {:?}", expected),
                    || match &actual {
                        Some(name) => format!("file {:?}", name),
                        None => "no file".to_string(),
                    },
                )
            }
            Self::Attr {
                target,
                name,
                expected,
            } => {
                let actual = doc.get(first(browser, target)?).attr(name);
                expect(
                    target,
                    actual.as_deref() == Some(expected.as_str()),
                    &format!("{}={:?}", name, expected),
                    || match &actual {
                        Some(value) => format!("{}={:?}", name, value),
                        None => format!("no {} attribute", name),
                    },
                )
            }
            Self::ContainsText { target, text } => {
                let actual = doc.text_content(first(browser, target)?);
                expect(target, actual.contains(text.as_str()), &format!("text containing {:?}", text), || {
                    format!("text {:?}", actual)
                })
            }
            Self::Title(expected) => {
                let actual = browser.title();
                if actual == expected {
                    Ok(())
                } else {
                    Err(TatError::AssertionFailed {
                        target: "document title".to_string(),
                        expected: format!("{:?}", expected),
                        actual: format!("{:?}", actual),
                    })
                }
            }
            Self::Custom(check) => check(browser),
        }
    }
}

fn all(browser: &Browser, target: &Target) -> Result<Vec<ElementId>> {
    let matched = target.resolve(browser.document())?;
    if matched.is_empty() {
        return Err(TatError::SelectorNotFound(target.to_string()));
    }
    Ok(matched)
}

fn first(browser: &Browser, target: &Target) -> Result<ElementId> {
    Ok(all(browser, target)?[0])
}

fn expect(
    target: &Target,
    holds: bool,
    expected: &str,
    actual: impl FnOnce() -> String,
) -> Result<()> {
    if holds {
        Ok(())
    } else {
        Err(TatError::AssertionFailed {
            target: target.to_string(),
            expected: expected.to_string(),
            actual: actual(),
        })
    }
}
