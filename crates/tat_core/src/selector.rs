//! CSS selector subset: type, `#id`, `.class`, `[attr]`, `[attr=value]`
//! compounds joined by the descendant combinator.

use crate::dom::{Document, ElementId};
use crate::error::{Result, TatError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn matches(&self, doc: &Document, eid: ElementId) -> bool {
        let el = doc.get(eid);
        if let Some(tag) = &self.tag {
            if tag != &el.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.classes.contains(c)) {
            return false;
        }
        self.attrs.iter().all(|m| match (el.attr(&m.name), &m.value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => &actual == expected,
            (None, _) => false,
        })
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    raw: String,
    chain: Vec<Compound>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| TatError::InvalidSelector {
            selector: raw.to_string(),
            reason: reason.to_string(),
        };

        let chars: Vec<char> = raw.trim().chars().collect();
        let mut chain = Vec::new();
        let mut current = Compound::default();
        let mut has_current = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match c {
                ' ' | '\t' | '\n' => {
                    if has_current {
                        chain.push(std::mem::take(&mut current));
                        has_current = false;
                    }
                    i += 1;
                }
                '#' | '.' => {
                    let (ident, next) = read_ident(&chars, i + 1);
                    if ident.is_empty() {
                        return Err(invalid("expected a name after '#' or '.'"));
                    }
                    if c == '#' {
                        current.id = Some(ident);
                    } else {
                        current.classes.push(ident);
                    }
                    has_current = true;
                    i = next;
                }
                '[' => {
                    let close = attr_close(&chars, i)
                        .ok_or_else(|| invalid("unterminated attribute selector"))?;
                    let body: String = chars[i + 1..close].iter().collect();
                    current.attrs.push(parse_attr(&body).ok_or_else(|| {
                        invalid("attribute selector must be [name] or [name=value]")
                    })?);
                    has_current = true;
                    i = close + 1;
                }
                '*' => {
                    has_current = true;
                    i += 1;
                }
                _ if c.is_ascii_alphabetic() => {
                    if has_current {
                        return Err(invalid("type selector must start a compound"));
                    }
                    let (ident, next) = read_ident(&chars, i);
                    current.tag = Some(ident.to_ascii_lowercase());
                    has_current = true;
                    i = next;
                }
                _ => return Err(invalid(&format!("unsupported character '{}'", c))),
            }
        }
        if has_current {
            chain.push(current);
        }
        if chain.is_empty() {
            return Err(invalid("empty selector"));
        }

        Ok(Self {
            raw: raw.to_string(),
            chain,
        })
    }

    /// The selector as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `eid` matches the whole descendant chain.
    pub fn matches(&self, doc: &Document, eid: ElementId) -> bool {
        let Some((last, rest)) = self.chain.split_last() else {
            return false;
        };
        if !last.matches(doc, eid) {
            return false;
        }
        let mut remaining = rest.iter().rev().peekable();
        for ancestor in doc.ancestors(eid) {
            match remaining.peek() {
                Some(compound) if compound.matches(doc, ancestor) => {
                    remaining.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        remaining.peek().is_none()
    }

    /// Every matching element in document order.
    pub fn query_all(&self, doc: &Document) -> Vec<ElementId> {
        doc.ids().filter(|eid| self.matches(doc, *eid)).collect()
    }
}

impl FromStr for Selector {
    type Err = TatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && (chars[end].is_alphanumeric() || matches!(chars[end], '-' | '_')) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

/// Index of the `]` closing the attribute selector opened at `open`.
/// Brackets inside a quoted value do not close it.
fn attr_close(chars: &[char], open: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &c) in chars.iter().enumerate().skip(open + 1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == ']' => return Some(i),
            None => {}
        }
    }
    None
}

fn parse_attr(body: &str) -> Option<AttrMatch> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return None;
    }
    Some(AttrMatch {
        name: name.to_ascii_lowercase(),
        value,
    })
}
