//! Color extraction orchestrator state.
//!
//! Two independent flows (URL and raw HTML) each own a source field, a busy
//! indicator and a result preview. Both feed one [`StagedExtraction`], the
//! only value that outlives a single interaction:
//!
//! - empty at start
//! - set by every successful extraction (last resolved response wins)
//! - read, never cleared, by apply
//! - untouched by failed extractions

use colorevolve_types::{Capabilities, Effect, ExtractedColors, ExtractionKind, ExtractionSource};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use serde_json::Value;
use tracing::info;

use crate::lifecycle::{self, Alerts, BusyIndicator};
use crate::ui::components::common::TextInputState;
use crate::ui::components::inputs::InputsState;
use crate::ui::focus::FocusTarget;

/// Extracted colors waiting to be applied into the base color inputs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StagedExtraction {
    colors: Option<ExtractedColors>,
}

impl StagedExtraction {
    pub fn get(&self) -> Option<&ExtractedColors> {
        self.colors.as_ref()
    }

    pub fn is_staged(&self) -> bool {
        self.colors.is_some()
    }

    fn stage(&mut self, colors: ExtractedColors) {
        self.colors = Some(colors);
    }
}

/// One extraction source with its own busy indicator.
#[derive(Debug, Clone)]
pub struct ExtractionFlow {
    source: TextInputState,
    busy: BusyIndicator,
    preview: Option<ExtractedColors>,
    pub f_source: FocusFlag,
}

impl ExtractionFlow {
    fn new(kind: ExtractionKind) -> Self {
        Self {
            source: TextInputState::new(),
            busy: BusyIndicator::default(),
            preview: None,
            f_source: FocusFlag::named(&format!("extraction.{}", kind.field_name())),
        }
    }

    pub fn source(&self) -> &TextInputState {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut TextInputState {
        &mut self.source
    }

    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    /// Colors from this flow's last successful extraction.
    pub fn preview(&self) -> Option<&ExtractedColors> {
        self.preview.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionState {
    url: ExtractionFlow,
    html: ExtractionFlow,
    staged: StagedExtraction,
    /// Whether the apply button is rendered and focusable.
    apply_offered: bool,

    container_focus: FocusFlag,
    pub f_apply: FocusFlag,
}

impl Default for ExtractionState {
    fn default() -> Self {
        Self::new(&Capabilities::default())
    }
}

impl ExtractionState {
    pub fn new(capabilities: &Capabilities) -> Self {
        Self {
            url: ExtractionFlow::new(ExtractionKind::Url),
            html: ExtractionFlow::new(ExtractionKind::Html),
            staged: StagedExtraction::default(),
            apply_offered: capabilities.has_extraction_apply,
            container_focus: FocusFlag::named("extraction"),
            f_apply: FocusFlag::named("extraction.apply"),
        }
    }

    /// Flag backing `target`, when this panel renders it.
    pub fn flag(&self, target: FocusTarget) -> Option<FocusFlag> {
        match target {
            FocusTarget::ExtractionSource(kind) => Some(self.flow(kind).f_source.clone()),
            FocusTarget::ApplyExtracted if self.apply_offered => Some(self.f_apply.clone()),
            _ => None,
        }
    }

    pub fn focused_target(&self) -> Option<FocusTarget> {
        if let Some(kind) = [ExtractionKind::Url, ExtractionKind::Html]
            .into_iter()
            .find(|kind| self.flow(*kind).f_source.get())
        {
            return Some(FocusTarget::ExtractionSource(kind));
        }
        (self.apply_offered && self.f_apply.get()).then_some(FocusTarget::ApplyExtracted)
    }

    pub fn flow(&self, kind: ExtractionKind) -> &ExtractionFlow {
        match kind {
            ExtractionKind::Url => &self.url,
            ExtractionKind::Html => &self.html,
        }
    }

    pub fn flow_mut(&mut self, kind: ExtractionKind) -> &mut ExtractionFlow {
        match kind {
            ExtractionKind::Url => &mut self.url,
            ExtractionKind::Html => &mut self.html,
        }
    }

    pub fn staged(&self) -> &StagedExtraction {
        &self.staged
    }

    /// Whether the apply action is enabled.
    pub fn can_apply(&self) -> bool {
        self.staged.is_staged()
    }

    pub fn set_source(&mut self, kind: ExtractionKind, text: &str) {
        self.flow_mut(kind).source.set_input(text);
    }

    /// Validate the source field and start a request for it.
    ///
    /// An empty field raises a blocking alert and sends nothing.
    pub fn request(&mut self, kind: ExtractionKind, alerts: &mut Alerts) -> Option<Effect> {
        let flow = self.flow_mut(kind);
        if flow.source.is_empty() {
            alerts.raise(kind.empty_source_message());
            return None;
        }
        let source = ExtractionSource::new(kind, flow.source.input());
        lifecycle::begin(&mut flow.busy, Effect::ExtractColor(source))
    }

    /// Settle a finished request. On success the colors are previewed for
    /// the flow, staged, and returned.
    pub fn complete(&mut self, kind: ExtractionKind, result: Result<Value, String>, alerts: &mut Alerts) -> Option<ExtractedColors> {
        let flow = match kind {
            ExtractionKind::Url => &mut self.url,
            ExtractionKind::Html => &mut self.html,
        };
        let payload = lifecycle::settle(&mut flow.busy, result, alerts)?;
        match serde_json::from_value::<ExtractedColors>(payload) {
            Ok(colors) => {
                info!(source = kind.field_name(), primary = %colors.primary, "colors extracted");
                flow.preview = Some(colors.clone());
                self.staged.stage(colors.clone());
                Some(colors)
            }
            Err(error) => {
                alerts.raise(format!("Error: unexpected extraction response: {error}"));
                None
            }
        }
    }

    /// Copy the staged colors into the base color inputs. The staged value
    /// stays available for repeated applies.
    pub fn apply(&self, inputs: &mut InputsState) -> bool {
        match self.staged.get() {
            Some(colors) => {
                inputs.apply_colors(&colors.to_array());
                true
            }
            None => false,
        }
    }
}

impl HasFocus for ExtractionState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.url.f_source);
        builder.leaf_widget(&self.html.f_source);
        if self.apply_offered {
            builder.leaf_widget(&self.f_apply);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use colorevolve_types::Variant;
    use serde_json::json;

    use super::*;

    fn success(primary: &str) -> Result<Value, String> {
        Ok(json!({"primary_color": primary, "bg_color": "#FFFFFF", "accent_color": "#FF8800"}))
    }

    #[test]
    fn empty_source_alerts_without_request() {
        let mut state = ExtractionState::default();
        let mut alerts = Alerts::default();
        assert_eq!(state.request(ExtractionKind::Url, &mut alerts), None);
        assert_eq!(alerts.current(), Some("Please enter a valid URL"));
        assert!(!state.flow(ExtractionKind::Url).busy().is_loading());

        assert_eq!(state.request(ExtractionKind::Html, &mut alerts), None);
        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn whitespace_only_source_is_sent_verbatim() {
        let mut state = ExtractionState::default();
        let mut alerts = Alerts::default();
        state.set_source(ExtractionKind::Url, "   ");
        let effect = state.request(ExtractionKind::Url, &mut alerts);
        assert_eq!(effect, Some(Effect::ExtractColor(ExtractionSource::Url("   ".into()))));
        assert!(alerts.is_empty());
    }

    #[test]
    fn request_is_source_tagged() {
        let mut state = ExtractionState::default();
        let mut alerts = Alerts::default();
        state.set_source(ExtractionKind::Html, "<body style=\"color: #111\">");
        let effect = state.request(ExtractionKind::Html, &mut alerts);
        assert_eq!(effect, Some(Effect::ExtractColor(ExtractionSource::Html("<body style=\"color: #111\">".into()))));
        assert!(state.flow(ExtractionKind::Html).busy().is_control_disabled());
        assert!(!state.flow(ExtractionKind::Url).busy().is_control_disabled());
    }

    #[test]
    fn flows_run_concurrently_and_last_resolved_wins() {
        let mut state = ExtractionState::default();
        let mut alerts = Alerts::default();
        state.set_source(ExtractionKind::Url, "https://example.com");
        state.set_source(ExtractionKind::Html, "<p/>");
        assert!(state.request(ExtractionKind::Url, &mut alerts).is_some());
        assert!(state.request(ExtractionKind::Html, &mut alerts).is_some());
        assert!(state.request(ExtractionKind::Url, &mut alerts).is_none(), "second URL request is refused");

        state.complete(ExtractionKind::Html, success("#222222"), &mut alerts);
        state.complete(ExtractionKind::Url, success("#111111"), &mut alerts);
        assert_eq!(state.staged().get().map(|colors| colors.primary.as_str()), Some("#111111"));
        assert_eq!(
            state.flow(ExtractionKind::Html).preview().map(|colors| colors.primary.as_str()),
            Some("#222222")
        );
    }

    #[test]
    fn application_error_keeps_prior_staged_colors() {
        let mut state = ExtractionState::default();
        let mut alerts = Alerts::default();
        state.set_source(ExtractionKind::Url, "https://example.com");
        state.request(ExtractionKind::Url, &mut alerts);
        state.complete(ExtractionKind::Url, success("#111111"), &mut alerts);
        let staged = state.staged().clone();

        state.request(ExtractionKind::Url, &mut alerts);
        let outcome = state.complete(ExtractionKind::Url, Ok(json!({"error": "unreachable host"})), &mut alerts);
        assert!(outcome.is_none());
        assert_eq!(alerts.current(), Some("Error: unreachable host"));
        assert_eq!(state.staged(), &staged);
        assert!(!state.flow(ExtractionKind::Url).busy().is_control_disabled());
    }

    #[test]
    fn malformed_success_payload_is_reported() {
        let mut state = ExtractionState::default();
        let mut alerts = Alerts::default();
        let outcome = state.complete(ExtractionKind::Url, Ok(json!({"color": "#111111"})), &mut alerts);
        assert!(outcome.is_none());
        assert!(!state.can_apply());
        assert!(alerts.current().unwrap().starts_with("Error: unexpected extraction response"));
    }

    #[test]
    fn apply_is_repeatable() {
        let mut state = ExtractionState::default();
        let mut alerts = Alerts::default();
        let mut inputs = InputsState::new(&Variant::Extended.into());
        assert!(!state.apply(&mut inputs));

        state.complete(ExtractionKind::Html, success("#111111"), &mut alerts);
        assert!(state.apply(&mut inputs));
        inputs.hex_text_changed(0, "#000000");
        assert!(state.apply(&mut inputs));
        assert_eq!(inputs.pairs()[0].picker().as_str(), "#111111");
        assert!(state.can_apply());
    }
}
