//! The rich-text editor component.
//!
//! [`RichTextEditor`] ties the engine to its caller: it resolves incoming values,
//! replaces content when the caller really changed it, and reports local edits through
//! `on_change` exactly once per new content state. Until [`RichTextEditor::mount`] is
//! called every operation is a no-op and the view shows the placeholder.

pub mod link;
pub mod view;

pub use link::LinkPrompt;
pub use view::{EditorView, ToolbarAction, ToolbarButton, TOOLBAR};

use crate::engine::{DocumentEditor, EditorCommand, Selection};
use crate::schema::{ImageAttrs, RichDocument};
use crate::sync::{
    resolve_html, ContentMode, ContentValue, DualRepresentation, ExternalAction, SyncState,
};

pub type ChangeCallback = Box<dyn FnMut(DualRepresentation)>;

/// Editor defaults that do not come from the caller's props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub placeholder: String,
    pub initial_content_mode: ContentMode,
    pub history_depth: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            placeholder: "Start writing your article...".to_string(),
            initial_content_mode: ContentMode::Html,
            history_depth: 100,
        }
    }
}

/// Properties supplied by the editor's caller.
#[derive(Default)]
pub struct EditorProps {
    pub value: Option<ContentValue>,
    pub on_change: Option<ChangeCallback>,
    pub placeholder: Option<String>,
    pub disabled: bool,
    pub asset_bucket: Option<String>,
    pub initial_content_mode: Option<ContentMode>,
}

impl std::fmt::Debug for EditorProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorProps")
            .field("value", &self.value)
            .field("on_change", &self.on_change.is_some())
            .field("placeholder", &self.placeholder)
            .field("disabled", &self.disabled)
            .field("asset_bucket", &self.asset_bucket)
            .field("initial_content_mode", &self.initial_content_mode)
            .finish()
    }
}

pub struct RichTextEditor {
    value: ContentValue,
    on_change: Option<ChangeCallback>,
    placeholder: String,
    disabled: bool,
    asset_bucket: Option<String>,
    mode: ContentMode,
    history_depth: usize,
    engine: Option<DocumentEditor>,
    sync: SyncState,
}

impl RichTextEditor {
    pub fn new(props: EditorProps, options: EditorOptions) -> Self {
        Self {
            value: props.value.unwrap_or_default(),
            on_change: props.on_change,
            placeholder: props.placeholder.unwrap_or(options.placeholder),
            disabled: props.disabled,
            asset_bucket: props.asset_bucket,
            mode: props
                .initial_content_mode
                .unwrap_or(options.initial_content_mode),
            history_depth: options.history_depth,
            engine: None,
            sync: SyncState::default(),
        }
    }

    /// Create the engine with the resolved initial content.
    pub fn mount(&mut self) {
        let initial = resolve_html(&self.value, self.mode);
        tracing::debug!(mode = ?self.mode, len = initial.len(), "mounting editor");
        self.engine = Some(DocumentEditor::from_html(&initial, self.history_depth));
        self.sync = SyncState::new(initial);
    }

    /// Drop the engine. Later operations are no-ops until the next mount.
    pub fn unmount(&mut self) {
        self.engine = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Option<&DocumentEditor> {
        self.engine.as_ref()
    }

    pub fn document(&self) -> Option<&RichDocument> {
        self.engine.as_ref().map(DocumentEditor::document)
    }

    pub fn html(&self) -> Option<String> {
        self.engine.as_ref().map(DocumentEditor::html)
    }

    pub fn is_editable(&self) -> bool {
        self.engine.is_some() && !self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn asset_bucket(&self) -> Option<&str> {
        self.asset_bucket.as_deref()
    }

    /// Accept a new value from the caller.
    pub fn set_value(&mut self, value: ContentValue) {
        self.value = value;
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let resolved = resolve_html(&self.value, self.mode);
        match self
            .sync
            .reconcile_external(&resolved, &engine.html(), engine.is_empty())
        {
            ExternalAction::Replace(html) => engine.set_html(&html),
            ExternalAction::Clear => engine.clear(),
            ExternalAction::Ignore => {}
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        self.engine.as_ref().map(DocumentEditor::selection)
    }

    pub fn set_selection(&mut self, selection: Selection) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_selection(selection);
        }
    }

    /// Run a command from the toolbar or surface. Returns true when content changed.
    pub fn execute(&mut self, command: EditorCommand) -> bool {
        if !self.is_editable() {
            return false;
        }
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        let changed = engine.apply(command);
        if changed {
            self.emit_change();
        }
        changed
    }

    fn emit_change(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let html = engine.html();
        if let Some(dual) = self.sync.observe_local(&html) {
            if let Some(on_change) = self.on_change.as_mut() {
                on_change(dual);
            }
        }
    }

    /// Prompt for a URL and link, relink or unlink the selection.
    pub fn edit_link(&mut self, prompt: &mut impl LinkPrompt) -> bool {
        if !self.is_editable() {
            return false;
        }
        let current = self
            .engine
            .as_ref()
            .and_then(DocumentEditor::current_link)
            .map(|link| link.href);
        let command = match link::link_target(prompt.prompt_url(current.as_deref())) {
            Some(href) => EditorCommand::SetLink { href },
            None => EditorCommand::UnsetLink,
        };
        self.execute(command)
    }

    /// Insert an image at the cursor.
    pub fn insert_image(&mut self, attrs: ImageAttrs) -> bool {
        self.execute(EditorCommand::InsertImage(attrs))
    }

    pub fn view(&self) -> EditorView {
        let Some(engine) = self.engine.as_ref() else {
            return EditorView::Loading {
                placeholder: self.placeholder.clone(),
            };
        };
        EditorView::Ready {
            toolbar: view::toolbar(engine, !self.disabled),
            html: engine.html(),
            placeholder: engine.is_empty().then(|| self.placeholder.clone()),
            editable: !self.disabled,
        }
    }
}
