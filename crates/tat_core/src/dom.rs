//! In-memory document: elements, form-control state and visibility.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Index of an element within its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

/// One `<option>` of a select element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub disabled: bool,
}

/// Metadata of a file chosen through a file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    /// blake3 hex digest of the content.
    pub digest: String,
}

/// What kind of control an element is, derived from tag and `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Text,
    Email,
    Number,
    TextArea,
    Checkbox,
    Radio,
    File,
    Select,
    Button,
    Submit,
    Link,
    None,
}

impl ControlKind {
    fn classify(tag: &str, input_type: Option<&str>) -> Self {
        match tag {
            "textarea" => Self::TextArea,
            "select" => Self::Select,
            "a" => Self::Link,
            "button" => match input_type {
                Some("button") | Some("reset") => Self::Button,
                _ => Self::Submit,
            },
            "input" => match input_type.unwrap_or("text") {
                "email" => Self::Email,
                "number" => Self::Number,
                "checkbox" => Self::Checkbox,
                "radio" => Self::Radio,
                "file" => Self::File,
                "submit" => Self::Submit,
                "button" | "reset" => Self::Button,
                _ => Self::Text,
            },
            _ => Self::None,
        }
    }

    /// Whether text can be typed into this control.
    pub fn accepts_text(self) -> bool {
        matches!(self, Self::Text | Self::Email | Self::Number | Self::TextArea)
    }

    /// Whether this control has a checked state.
    pub fn is_checkable(self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

/// A single element and its live state.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub parent: Option<ElementId>,
    pub hidden: bool,
    pub checked: bool,
    pub disabled: bool,
    pub options: Vec<SelectOption>,
    pub selected: Option<usize>,
    pub files: Vec<FileMeta>,
    kind: ControlKind,
    /// Raw typed characters; `value()` derives the reported value from it.
    raw: String,
}

impl Element {
    pub(crate) fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        Self {
            kind: ControlKind::classify(&tag, None),
            tag,
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: String::new(),
            parent: None,
            hidden: false,
            checked: false,
            disabled: false,
            options: Vec::new(),
            selected: None,
            files: Vec::new(),
            raw: String::new(),
        }
    }

    /// Control kind of this element.
    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    /// Attribute value, including `id` and `class`.
    pub fn attr(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            _ => self.attrs.get(name).cloned(),
        }
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {
                self.attrs.insert(name.to_string(), value.to_string());
            }
        }
        if name == "type" {
            self.kind = ControlKind::classify(&self.tag, Some(value));
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) {
        match name {
            "id" => self.id = None,
            "class" => self.classes.clear(),
            _ => {
                self.attrs.remove(name);
            }
        }
        if name == "type" {
            self.kind = ControlKind::classify(&self.tag, None);
        }
    }

    /// The value a script would read from `.value`.
    pub fn value(&self) -> String {
        match self.kind {
            ControlKind::Number => {
                if self.raw.parse::<f64>().is_ok() {
                    self.raw.clone()
                } else {
                    String::new()
                }
            }
            ControlKind::Text | ControlKind::Email | ControlKind::TextArea => self.raw.clone(),
            ControlKind::Select => self
                .selected
                .and_then(|idx| self.options.get(idx))
                .map(|opt| opt.value.clone())
                .unwrap_or_default(),
            ControlKind::File => self
                .files
                .first()
                .map(|file| format!("C:\\fakepath\\{}", file.name))
                .unwrap_or_default(),
            _ => self.attrs.get("value").cloned().unwrap_or_default(),
        }
    }

    /// Overwrite the value as a script assignment would.
    pub(crate) fn set_value(&mut self, value: &str) {
        match self.kind {
            ControlKind::Select => {
                self.selected = self.options.iter().position(|opt| opt.value == value);
            }
            ControlKind::File => {
                if value.is_empty() {
                    self.files.clear();
                }
            }
            _ if self.kind.accepts_text() => self.raw = value.to_string(),
            _ => {
                self.attrs.insert("value".to_string(), value.to_string());
            }
        }
    }

    /// Append typed characters. Number inputs drop characters that can
    /// never be part of a number.
    pub(crate) fn type_chars(&mut self, text: &str) {
        match self.kind {
            ControlKind::Number => self.raw.extend(
                text.chars()
                    .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')),
            ),
            _ => self.raw.push_str(text),
        }
    }

    pub(crate) fn clear_value(&mut self) {
        self.raw.clear();
    }
}

/// A page's element tree in document order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub path: String,
    pub title: String,
    elements: Vec<Element>,
}

impl Document {
    /// Create an empty document.
    pub fn new(path: &str, title: &str) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            elements: Vec::new(),
        }
    }

    /// Append an element; elements must be pushed after their parent.
    pub fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    /// All element ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.elements.len()).map(ElementId)
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    /// Element with the given `id` attribute.
    pub fn by_id(&self, id: &str) -> Option<ElementId> {
        self.ids().find(|eid| self.get(*eid).id.as_deref() == Some(id))
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.get(id).parent, move |eid| self.get(*eid).parent)
    }

    /// Visible when neither the element nor any ancestor is hidden.
    pub fn is_visible(&self, id: ElementId) -> bool {
        !self.get(id).hidden && self.ancestors(id).all(|eid| !self.get(eid).hidden)
    }

    /// Own text plus the text of every descendant, in document order.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = self.get(id).text.clone();
        for eid in self.ids().filter(|eid| *eid > id) {
            if self.ancestors(eid).any(|a| a == id) && !self.get(eid).text.is_empty() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&self.get(eid).text);
            }
        }
        out
    }

    /// Radios sharing `name` with the given element (including itself).
    pub fn radio_group(&self, id: ElementId) -> Vec<ElementId> {
        let Some(name) = self.get(id).attrs.get("name").cloned() else {
            return vec![id];
        };
        self.ids()
            .filter(|eid| {
                let el = self.get(*eid);
                el.kind() == ControlKind::Radio && el.attrs.get("name") == Some(&name)
            })
            .collect()
    }

    /// Short one-line rendering used in failure messages.
    pub fn describe(&self, id: ElementId) -> String {
        self.get(id).to_string()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if let Some(id) = &self.id {
            write!(f, " id=\"{}\"", id)?;
        }
        if !self.classes.is_empty() {
            write!(f, " class=\"{}\"", self.classes.join(" "))?;
        }
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        write!(f, ">")
    }
}
