//! Site fixtures: the static pages a scenario browses.
//!
//! A site is described in TOML: an entry path and a list of pages, each
//! with its elements (in document order, children after parents) and an
//! optional contact-form section describing submit validation.

use crate::dom::{Document, Element, SelectOption};
use crate::error::{Result, TatError};
use crate::selector::Selector;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

const CAC_TAT_SITE: &str = include_str!("../fixtures/cac-tat.toml");

#[derive(Debug, Deserialize)]
struct SiteSpec {
    entry: String,
    pages: Vec<PageSpec>,
}

#[derive(Debug, Deserialize)]
struct PageSpec {
    path: String,
    title: String,
    #[serde(default)]
    elements: Vec<ElementSpec>,
    form: Option<FormSpec>,
}

#[derive(Debug, Deserialize)]
struct ElementSpec {
    tag: String,
    id: Option<String>,
    #[serde(default)]
    class: Vec<String>,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    hidden: bool,
    parent: Option<String>,
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    options: Vec<OptionSpec>,
}

#[derive(Debug, Deserialize)]
struct OptionSpec {
    value: Option<String>,
    text: String,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    selected: bool,
}

#[derive(Debug, Deserialize)]
struct FormSpec {
    submit: String,
    mandatory: Vec<String>,
    email: Option<String>,
    #[serde(default)]
    conditional: Vec<ConditionalSpec>,
    success: String,
    error: String,
    #[serde(default = "default_message_timeout")]
    message_timeout_ms: u64,
    #[serde(default = "default_true")]
    clear_on_success: bool,
}

#[derive(Debug, Deserialize)]
struct ConditionalSpec {
    toggle: String,
    field: String,
}

fn default_message_timeout() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

/// Submit behavior of a page's contact form.
#[derive(Debug, Clone)]
pub struct FormRules {
    pub submit: Selector,
    pub mandatory: Vec<Selector>,
    pub email: Option<Selector>,
    /// `(toggle checkbox, field)`: the field is mandatory while the toggle is checked.
    pub conditional: Vec<(Selector, Selector)>,
    pub success: Selector,
    pub error: Selector,
    pub message_timeout_ms: u64,
    pub clear_on_success: bool,
}

/// A page template: pristine document plus optional form rules.
#[derive(Debug, Clone)]
pub struct Page {
    pub document: Document,
    pub form: Option<FormRules>,
}

/// A set of pages addressable by path.
#[derive(Debug, Clone)]
pub struct Site {
    entry: String,
    pages: HashMap<String, Page>,
}

impl Site {
    /// The embedded "Central de Atendimento ao Cliente TAT" site.
    pub fn cac_tat() -> Result<Self> {
        Self::from_toml(CAC_TAT_SITE)
    }

    /// Load a site description from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TatError::InvalidSite(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a site description.
    pub fn from_toml(content: &str) -> Result<Self> {
        let spec: SiteSpec = toml::from_str(content)
            .map_err(|e| TatError::InvalidSite(format!("failed to parse site: {}", e)))?;

        let mut pages = HashMap::new();
        for page in spec.pages {
            let path = page.path.clone();
            if pages.insert(path.clone(), build_page(page)?).is_some() {
                return Err(TatError::InvalidSite(format!("duplicate page path: {}", path)));
            }
        }
        if !pages.contains_key(&spec.entry) {
            return Err(TatError::InvalidSite(format!(
                "entry page {} is not defined",
                spec.entry
            )));
        }

        Ok(Self {
            entry: spec.entry,
            pages,
        })
    }

    /// Path of the page scenarios start on.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Page template by path. A leading `./` or `/` is ignored.
    pub fn page(&self, path: &str) -> Result<&Page> {
        let key = path.trim_start_matches("./").trim_start_matches('/');
        self.pages
            .get(key)
            .ok_or_else(|| TatError::PageNotFound(path.to_string()))
    }

    /// All page paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

fn build_page(spec: PageSpec) -> Result<Page> {
    let mut document = Document::new(&spec.path, &spec.title);

    for el_spec in spec.elements {
        let mut element = Element::new(&el_spec.tag);
        if let Some(id) = &el_spec.id {
            element.set_attr("id", id);
        }
        element.classes = el_spec.class;
        for (name, value) in &el_spec.attrs {
            element.set_attr(&name.to_ascii_lowercase(), value);
        }
        element.text = el_spec.text;
        element.hidden = el_spec.hidden;
        element.checked = el_spec.checked;
        element.disabled = el_spec.disabled;

        if let Some(parent) = &el_spec.parent {
            let parent_id = document.by_id(parent).ok_or_else(|| {
                TatError::InvalidSite(format!(
                    "{}: parent #{} must be declared before its children",
                    spec.path, parent
                ))
            })?;
            element.parent = Some(parent_id);
        }

        if !el_spec.options.is_empty() {
            element.selected = el_spec
                .options
                .iter()
                .position(|opt| opt.selected)
                .or(Some(0));
            element.options = el_spec
                .options
                .into_iter()
                .map(|opt| SelectOption {
                    value: opt.value.unwrap_or_else(|| opt.text.clone()),
                    text: opt.text,
                    disabled: opt.disabled,
                })
                .collect();
        }

        document.push(element);
    }

    let form = spec.form.map(build_form).transpose()?;
    Ok(Page { document, form })
}

fn build_form(spec: FormSpec) -> Result<FormRules> {
    let parse_all = |raw: &[String]| raw.iter().map(|s| Selector::parse(s)).collect::<Result<Vec<_>>>();
    Ok(FormRules {
        submit: Selector::parse(&spec.submit)?,
        mandatory: parse_all(&spec.mandatory)?,
        email: spec.email.as_deref().map(Selector::parse).transpose()?,
        conditional: spec
            .conditional
            .iter()
            .map(|c| Ok((Selector::parse(&c.toggle)?, Selector::parse(&c.field)?)))
            .collect::<Result<Vec<_>>>()?,
        success: Selector::parse(&spec.success)?,
        error: Selector::parse(&spec.error)?,
        message_timeout_ms: spec.message_timeout_ms,
        clear_on_success: spec.clear_on_success,
    })
}
