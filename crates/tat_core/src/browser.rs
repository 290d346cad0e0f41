//! A single-page browsing session over a [`Site`].
//!
//! The session owns a working copy of the current page's document, the
//! timer clock and the form rules. Every action completes synchronously;
//! timers fire either through [`Browser::tick`] (installed clock) or when
//! the session settles on real time.

use crate::clock::VirtualClock;
use crate::dom::{ControlKind, Document, ElementId, FileMeta};
use crate::error::{Result, TatError};
use crate::poll::Settle;
use crate::selector::Selector;
use crate::site::{FormRules, Site};
use crate::steps::{Invocation, OptionRef, Target, UploadAction};
use std::sync::Arc;
use tracing::{debug, info};

/// Work a timer performs when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Hide a transient message.
    Hide(ElementId),
}

/// Outcome of the last form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted,
    Rejected,
}

/// Browsing session state.
pub struct Browser {
    site: Arc<Site>,
    document: Document,
    form: Option<FormRules>,
    clock: VirtualClock<TimerTask>,
    opened_tabs: Vec<String>,
    last_submission: Option<Submission>,
}

impl Browser {
    /// Open a session on the site's entry page.
    pub fn open(site: Arc<Site>, timer_step_limit: usize) -> Result<Self> {
        let entry = site.page(site.entry())?;
        let document = entry.document.clone();
        let form = entry.form.clone();
        Ok(Self {
            site,
            document,
            form,
            clock: VirtualClock::new(timer_step_limit),
            opened_tabs: Vec::new(),
            last_submission: None,
        })
    }

    /// Load a page of the site. Pending timers belong to the old page and are dropped.
    pub fn visit(&mut self, path: &str) -> Result<()> {
        let page = self.site.page(path)?;
        self.document = page.document.clone();
        self.form = page.form.clone();
        let dropped = self.clock.cancel_where(|_| true);
        self.last_submission = None;
        debug!(path, dropped_timers = dropped, "page loaded");
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn title(&self) -> &str {
        &self.document.title
    }

    pub fn current_path(&self) -> &str {
        &self.document.path
    }

    /// Links followed with `target="_blank"`.
    pub fn opened_tabs(&self) -> &[String] {
        &self.opened_tabs
    }

    pub fn last_submission(&self) -> Option<Submission> {
        self.last_submission
    }

    pub fn clock(&self) -> &VirtualClock<TimerTask> {
        &self.clock
    }

    // ===== User actions =====

    /// Type text into a single visible text control.
    pub fn type_text(&mut self, target: &Target, text: &str) -> Result<()> {
        let eid = self.actionable_one("type", target)?;
        let el = self.document.get(eid);
        if !el.kind().accepts_text() {
            return Err(not_interactable("type", target, format!("{} does not accept text", el)));
        }
        self.document.get_mut(eid).type_chars(text);
        Ok(())
    }

    /// Empty a single text control.
    pub fn clear(&mut self, target: &Target) -> Result<()> {
        let eid = self.actionable_one("clear", target)?;
        let el = self.document.get(eid);
        if !el.kind().accepts_text() {
            return Err(not_interactable("clear", target, format!("{} has no text value", el)));
        }
        self.document.get_mut(eid).clear_value();
        Ok(())
    }

    /// Click a single element.
    pub fn click(&mut self, target: &Target) -> Result<()> {
        let eid = self.actionable_one("click", target)?;
        match self.document.get(eid).kind() {
            ControlKind::Submit => self.submit(eid),
            ControlKind::Link => self.follow_link(eid),
            ControlKind::Checkbox => {
                let el = self.document.get_mut(eid);
                el.checked = !el.checked;
                Ok(())
            }
            ControlKind::Radio => {
                self.set_radio(eid);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Check every matched checkbox or radio.
    pub fn check(&mut self, target: &Target) -> Result<()> {
        for eid in self.actionable_all("check", target)? {
            match self.document.get(eid).kind() {
                ControlKind::Checkbox => self.document.get_mut(eid).checked = true,
                ControlKind::Radio => self.set_radio(eid),
                _ => {
                    return Err(not_interactable(
                        "check",
                        target,
                        format!("{} is not a checkbox or radio", self.document.describe(eid)),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Uncheck every matched checkbox.
    pub fn uncheck(&mut self, target: &Target) -> Result<()> {
        for eid in self.actionable_all("uncheck", target)? {
            if self.document.get(eid).kind() != ControlKind::Checkbox {
                return Err(not_interactable(
                    "uncheck",
                    target,
                    format!("{} is not a checkbox", self.document.describe(eid)),
                ));
            }
            self.document.get_mut(eid).checked = false;
        }
        Ok(())
    }

    /// Choose an option of a single select element.
    pub fn select(&mut self, target: &Target, option: &OptionRef) -> Result<()> {
        let eid = self.actionable_one("select", target)?;
        let el = self.document.get(eid);
        if el.kind() != ControlKind::Select {
            return Err(not_interactable("select", target, format!("{} is not a select", el)));
        }

        let index = match option {
            OptionRef::Index(index) => Some(*index).filter(|i| *i < el.options.len()),
            OptionRef::Label(label) => el
                .options
                .iter()
                .position(|opt| &opt.value == label)
                .or_else(|| el.options.iter().position(|opt| opt.text.trim() == label.as_str())),
        }
        .ok_or_else(|| not_interactable("select", target, format!("no option {}", option)))?;

        if el.options[index].disabled {
            return Err(not_interactable(
                "select",
                target,
                format!("option {} is disabled", option),
            ));
        }
        self.document.get_mut(eid).selected = Some(index);
        Ok(())
    }

    /// Attach a file to a single file input.
    pub fn select_file(&mut self, target: &Target, file: FileMeta, action: UploadAction) -> Result<()> {
        let eid = self.actionable_one("selectFile", target)?;
        let el = self.document.get(eid);
        if el.kind() != ControlKind::File {
            return Err(not_interactable("selectFile", target, format!("{} is not a file input", el)));
        }
        debug!(selector = %target, file = %file.name, ?action, "file attached");
        self.document.get_mut(eid).files = vec![file];
        Ok(())
    }

    /// Manipulate every matched element directly; no actionability checks.
    pub fn invoke(&mut self, target: &Target, call: &Invocation) -> Result<()> {
        let matched = target.resolve(&self.document)?;
        if matched.is_empty() {
            return Err(TatError::SelectorNotFound(target.to_string()));
        }
        for eid in matched {
            let el = self.document.get_mut(eid);
            match call {
                Invocation::Show => el.hidden = false,
                Invocation::Hide => el.hidden = true,
                Invocation::SetValue(value) => el.set_value(value),
                Invocation::SetText(text) => el.text = text.clone(),
                Invocation::RemoveAttr(name) => el.remove_attr(name),
            }
        }
        Ok(())
    }

    // ===== Time control =====

    /// Replace real time with a virtual clock fixed at 0.
    pub fn install_clock(&mut self) {
        self.clock.install();
    }

    /// Advance the installed clock, firing due timers in order.
    pub fn tick(&mut self, ms: u64) -> Result<usize> {
        let document = &mut self.document;
        self.clock.advance(ms, |_, task| {
            apply_timer(document, task);
            Ok(())
        })
    }

    // ===== Internals =====

    fn actionable_all(&self, action: &'static str, target: &Target) -> Result<Vec<ElementId>> {
        let matched = target.resolve(&self.document)?;
        if matched.is_empty() {
            return Err(TatError::SelectorNotFound(target.to_string()));
        }
        for eid in &matched {
            self.ensure_actionable(action, target, *eid)?;
        }
        Ok(matched)
    }

    fn actionable_one(&self, action: &'static str, target: &Target) -> Result<ElementId> {
        let eid = target.resolve_one(&self.document)?;
        self.ensure_actionable(action, target, eid)?;
        Ok(eid)
    }

    fn ensure_actionable(&self, action: &'static str, target: &Target, eid: ElementId) -> Result<()> {
        let el = self.document.get(eid);
        if !self.document.is_visible(eid) {
            return Err(not_interactable(action, target, format!("{} is not visible", el)));
        }
        if el.disabled {
            return Err(not_interactable(action, target, format!("{} is disabled", el)));
        }
        Ok(())
    }

    fn set_radio(&mut self, eid: ElementId) {
        for member in self.document.radio_group(eid) {
            self.document.get_mut(member).checked = member == eid;
        }
    }

    fn follow_link(&mut self, eid: ElementId) -> Result<()> {
        let el = self.document.get(eid);
        let Some(href) = el.attr("href") else {
            return Ok(());
        };
        if el.attr("target").as_deref() == Some("_blank") {
            debug!(href = %href, "link opened in new tab");
            self.opened_tabs.push(href);
            return Ok(());
        }
        self.visit(&href)
    }

    fn submit(&mut self, button: ElementId) -> Result<()> {
        let Some(form) = self.form.clone() else {
            debug!(path = %self.document.path, "submit on page without form rules");
            return Ok(());
        };
        if !form.submit.matches(&self.document, button) {
            debug!(button = %self.document.describe(button), "button is not the form's submit");
            return Ok(());
        }

        let accepted = self.form_is_valid(&form);
        let (show, hide) = if accepted {
            (&form.success, &form.error)
        } else {
            (&form.error, &form.success)
        };

        let messages: Vec<ElementId> = show
            .query_all(&self.document)
            .into_iter()
            .chain(hide.query_all(&self.document))
            .collect();
        self.clock
            .cancel_where(|TimerTask::Hide(eid)| messages.contains(eid));

        for eid in hide.query_all(&self.document) {
            self.document.get_mut(eid).hidden = true;
        }
        for eid in show.query_all(&self.document) {
            self.document.get_mut(eid).hidden = false;
            self.clock.schedule(form.message_timeout_ms, TimerTask::Hide(eid));
        }

        if accepted && form.clear_on_success {
            let fields = form
                .mandatory
                .iter()
                .chain(form.conditional.iter().map(|(_, field)| field));
            for selector in fields {
                for eid in selector.query_all(&self.document) {
                    self.document.get_mut(eid).clear_value();
                }
            }
        }

        let outcome = if accepted {
            Submission::Accepted
        } else {
            Submission::Rejected
        };
        info!(path = %self.document.path, ?outcome, "form submitted");
        self.last_submission = Some(outcome);
        Ok(())
    }

    fn form_is_valid(&self, form: &FormRules) -> bool {
        let filled = |selector: &Selector| {
            let matched = selector.query_all(&self.document);
            !matched.is_empty()
                && matched
                    .iter()
                    .all(|eid| !self.document.get(*eid).value().trim().is_empty())
        };

        if !form.mandatory.iter().all(filled) {
            return false;
        }
        if let Some(email) = &form.email {
            let valid = email
                .query_all(&self.document)
                .iter()
                .all(|eid| is_valid_email(&self.document.get(*eid).value()));
            if !valid {
                return false;
            }
        }
        form.conditional.iter().all(|(toggle, field)| {
            let required = toggle
                .query_all(&self.document)
                .iter()
                .any(|eid| self.document.get(*eid).checked);
            !required || filled(field)
        })
    }
}

impl Settle for Browser {
    fn settle(&mut self) -> Result<bool> {
        let document = &mut self.document;
        self.clock.run_due(|_, task| {
            apply_timer(document, task);
            Ok(())
        })?;
        Ok(self.clock.has_pending_real_timers())
    }
}

fn apply_timer(document: &mut Document, task: TimerTask) {
    match task {
        TimerTask::Hide(eid) => document.get_mut(eid).hidden = true,
    }
}

fn not_interactable(action: &'static str, target: &Target, reason: String) -> TatError {
    TatError::NotInteractable {
        action,
        target: target.to_string(),
        reason,
    }
}

/// `local@domain.tld`: one `@`, no whitespace, dotted domain without empty labels.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
