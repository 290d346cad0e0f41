use std::fmt;

use crate::assertions::Assertion;
use crate::dom::{Document, ElementId};
use crate::error::{Result, TatError};
use crate::fixtures::FileSource;
use crate::http::ResponseExpectation;
use crate::selector::Selector;

/// How elements are found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// CSS selector.
    Css(String),
    /// Element (optionally matching `selector`) whose text contains `text`.
    Contains {
        selector: Option<String>,
        text: String,
    },
}

/// Which of the matched elements a target refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    All,
    First,
    Last,
    Nth(usize),
}

/// Elements a step acts on or asserts about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    query: Query,
    pick: Pick,
}

impl Target {
    /// Every element matching a CSS selector.
    pub fn css(selector: &str) -> Self {
        Self {
            query: Query::Css(selector.to_string()),
            pick: Pick::All,
        }
    }

    /// First element matching `selector` whose text contains `text`.
    pub fn contains(selector: &str, text: &str) -> Self {
        Self {
            query: Query::Contains {
                selector: Some(selector.to_string()),
                text: text.to_string(),
            },
            pick: Pick::First,
        }
    }

    /// Innermost element whose text contains `text`.
    pub fn text(text: &str) -> Self {
        Self {
            query: Query::Contains {
                selector: None,
                text: text.to_string(),
            },
            pick: Pick::First,
        }
    }

    pub fn first(mut self) -> Self {
        self.pick = Pick::First;
        self
    }

    pub fn last(mut self) -> Self {
        self.pick = Pick::Last;
        self
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.pick = Pick::Nth(index);
        self
    }

    /// Matched elements after applying the pick. May be empty.
    pub fn resolve(&self, doc: &Document) -> Result<Vec<ElementId>> {
        let matched = match &self.query {
            Query::Css(raw) => Selector::parse(raw)?.query_all(doc),
            Query::Contains { selector, text } => {
                let selector = selector.as_deref().map(Selector::parse).transpose()?;
                let candidates: Vec<ElementId> = doc
                    .ids()
                    .filter(|eid| selector.as_ref().map_or(true, |s| s.matches(doc, *eid)))
                    .filter(|eid| doc.text_content(*eid).contains(text.as_str()))
                    .collect();
                if selector.is_some() {
                    candidates
                } else {
                    // Innermost: drop candidates that have a matching descendant.
                    candidates
                        .iter()
                        .copied()
                        .filter(|eid| {
                            !candidates
                                .iter()
                                .any(|other| doc.ancestors(*other).any(|a| a == *eid))
                        })
                        .collect()
                }
            }
        };

        Ok(match self.pick {
            Pick::All => matched,
            Pick::First => matched.into_iter().take(1).collect(),
            Pick::Last => matched.last().copied().into_iter().collect(),
            Pick::Nth(index) => matched.get(index).copied().into_iter().collect(),
        })
    }

    /// Exactly one element, or an error naming the action.
    pub fn resolve_one(&self, doc: &Document) -> Result<ElementId> {
        let matched = self.resolve(doc)?;
        match matched.as_slice() {
            [one] => Ok(*one),
            [] => Err(TatError::SelectorNotFound(self.to_string())),
            many => Err(TatError::AmbiguousTarget {
                target: self.to_string(),
                count: many.len(),
            }),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Query::Css(raw) => f.write_str(raw)?,
            Query::Contains {
                selector: Some(selector),
                text,
            } => write!(f, "contains({}, {:?})", selector, text)?,
            Query::Contains {
                selector: None,
                text,
            } => write!(f, "contains({:?})", text)?,
        }
        match self.pick {
            Pick::All => Ok(()),
            Pick::First if matches!(self.query, Query::Contains { .. }) => Ok(()),
            Pick::First => write!(f, " (first)"),
            Pick::Last => write!(f, " (last)"),
            Pick::Nth(index) => write!(f, " (eq {})", index),
        }
    }
}

/// Option chosen in a select element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionRef {
    /// Matches an option's value, or failing that its visible text.
    Label(String),
    /// Zero-based option index.
    Index(usize),
}

impl From<&str> for OptionRef {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

impl From<usize> for OptionRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for OptionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{:?}", label),
            Self::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// How a file reaches a file input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadAction {
    #[default]
    Select,
    DragDrop,
}

/// Direct manipulation of matched elements, bypassing user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Show,
    Hide,
    SetValue(String),
    SetText(String),
    RemoveAttr(String),
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => f.write_str("show"),
            Self::Hide => f.write_str("hide"),
            Self::SetValue(value) => write!(f, "val({:?})", value),
            Self::SetText(text) => write!(f, "text({:?})", text),
            Self::RemoveAttr(name) => write!(f, "removeAttr({:?})", name),
        }
    }
}

/// All possible steps in a scenario
#[derive(Debug)]
pub enum Step {
    // Navigation
    Visit {
        path: String,
    },

    // User actions
    Type {
        target: Target,
        text: String,
    },
    Clear {
        target: Target,
    },
    Click {
        target: Target,
    },
    Check {
        target: Target,
    },
    Uncheck {
        target: Target,
    },
    Select {
        target: Target,
        option: OptionRef,
    },
    SelectFile {
        target: Target,
        source: FileSource,
        action: UploadAction,
    },
    Invoke {
        target: Target,
        call: Invocation,
    },

    // Time control
    InstallClock,
    Tick {
        ms: u64,
    },

    // Fixtures and macros
    Alias {
        name: String,
        fixture: String,
    },
    Command {
        name: String,
    },

    // Network
    Request {
        url: String,
        expect: ResponseExpectation,
    },

    // Assertions (can be interspersed)
    Assert {
        assertion: Assertion,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visit { path } => write!(f, "visit {}", path),
            Self::Type { target, text } => {
                let shown: String = text.chars().take(40).collect();
                let ellipsis = if text.chars().count() > 40 { "..." } else { "" };
                write!(f, "type {:?}{} into {}", shown, ellipsis, target)
            }
            Self::Clear { target } => write!(f, "clear {}", target),
            Self::Click { target } => write!(f, "click {}", target),
            Self::Check { target } => write!(f, "check {}", target),
            Self::Uncheck { target } => write!(f, "uncheck {}", target),
            Self::Select { target, option } => write!(f, "select {} in {}", option, target),
            Self::SelectFile {
                target,
                source,
                action,
            } => write!(f, "{:?} file {} onto {}", action, source, target),
            Self::Invoke { target, call } => write!(f, "invoke {} on {}", call, target),
            Self::InstallClock => f.write_str("install clock"),
            Self::Tick { ms } => write!(f, "tick {}ms", ms),
            Self::Alias { name, fixture } => write!(f, "alias @{} = {}", name, fixture),
            Self::Command { name } => write!(f, "command {}", name),
            Self::Request { url, .. } => write!(f, "request {}", url),
            Self::Assert { assertion } => write!(f, "assert {}", assertion),
        }
    }
}
