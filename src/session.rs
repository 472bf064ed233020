use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{Block, BlockKind};
use crate::context::RenderOptions;
use crate::document::{Document, Footer};
use crate::error::{MailError, MailResult};
use crate::render;
use crate::style::{BlockStyle, StylesState};

/// The undoable portion of a session: the document plus template styles.
/// The active selection is deliberately outside, so undo never teleports
/// the user's cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub document: Document,
    pub styles: StylesState,
}

#[derive(Serialize)]
struct SessionStateRef<'a> {
    document: &'a Document,
    styles: &'a StylesState,
}

/// One editing operation. The set is closed: every mutation of a session
/// goes through [`EditingSession::apply`], which keeps the structural
/// invariants in one place and gives history a single choke point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    Insert {
        block: Block,
        parent: Option<String>,
        index: usize,
    },
    Remove {
        id: String,
    },
    Move {
        id: String,
        parent: Option<String>,
        index: usize,
    },
    Duplicate {
        id: String,
    },
    ReplaceContent {
        id: String,
        kind: BlockKind,
    },
    SetStyle {
        id: String,
        style: BlockStyle,
    },
    Select {
        id: Option<String>,
    },
    SetFooter {
        footer: Footer,
    },
    SetTemplateStyle {
        key: String,
        value: String,
    },
}

/// What an applied edit did, as far as history needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Document or template styles changed. `id` names the block a
    /// structural edit created, when it created one.
    Changed { id: Option<String> },
    /// Only the selection moved; history does not record these.
    SelectionOnly,
}

/// One user's in-progress edit of one document. Owns all mutable editor
/// state explicitly; there are no globals, so several sessions can live
/// side by side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditingSession {
    pub document: Document,
    pub active_block_id: Option<String>,
    pub styles: StylesState,
}

impl EditingSession {
    pub fn with_document(document: Document) -> Self {
        EditingSession {
            document,
            active_block_id: None,
            styles: StylesState::new(),
        }
    }

    /// Builds a session from stored JSON. Accepts a serialized session
    /// (`{document, styles}`), a bare document object, or the legacy bare
    /// block array; empty input yields the starter document.
    pub fn hydrate(input: &str) -> MailResult<EditingSession> {
        if input.trim().is_empty() {
            return Ok(EditingSession::with_document(Document::starter()));
        }
        let value: Value = serde_json::from_str(input)?;
        EditingSession::from_value(value)
    }

    pub fn from_value(value: Value) -> MailResult<EditingSession> {
        match value {
            Value::Object(mut map) if map.contains_key("document") => {
                let styles = map
                    .remove("styles")
                    .and_then(|v| serde_json::from_value(v).ok())
                    .unwrap_or_default();
                let document = match map.remove("document") {
                    Some(doc) => Document::from_value(doc)?,
                    None => Document::default(),
                };
                Ok(EditingSession {
                    document,
                    active_block_id: None,
                    styles,
                })
            }
            other => Ok(EditingSession::with_document(Document::from_value(other)?)),
        }
    }

    /// Canonical serialized form, used for saving and for history
    /// comparisons. Key order is stable, so equal states serialize
    /// identically.
    pub fn serialize(&self) -> MailResult<String> {
        Ok(serde_json::to_string(&SessionStateRef {
            document: &self.document,
            styles: &self.styles,
        })?)
    }

    /// Renders the session as a recipient would see it, template styles
    /// included.
    pub fn preview(&self, options: &RenderOptions) -> String {
        render::render_with_styles(&self.document, &self.styles, options)
    }

    /// Snapshot of the undoable state.
    pub fn state(&self) -> SessionState {
        SessionState {
            document: self.document.clone(),
            styles: self.styles.clone(),
        }
    }

    /// Replaces the undoable state wholesale (undo/redo restore path) and
    /// clears the selection.
    pub fn restore(&mut self, state: &SessionState) {
        self.document = state.document.clone();
        self.styles = state.styles.clone();
        self.active_block_id = None;
    }

    /// Applies one edit. Structural misuse returns an error and leaves the
    /// session untouched; interactive layers such as drag/drop turn these
    /// into silent no-ops.
    pub fn apply(&mut self, edit: Edit) -> MailResult<EditOutcome> {
        match edit {
            Edit::Insert {
                block,
                parent,
                index,
            } => {
                let id = block.id.clone();
                self.document.insert(block, parent.as_deref(), index)?;
                self.active_block_id = Some(id.clone());
                Ok(EditOutcome::Changed { id: Some(id) })
            }
            Edit::Remove { id } => {
                let removed = self.document.remove(&id)?;
                if self.selection_within(&removed) {
                    self.active_block_id = None;
                }
                Ok(EditOutcome::Changed { id: None })
            }
            Edit::Move { id, parent, index } => {
                self.document.move_block(&id, parent.as_deref(), index)?;
                Ok(EditOutcome::Changed { id: None })
            }
            Edit::Duplicate { id } => {
                let copy_id = self.document.duplicate_block(&id)?;
                self.active_block_id = Some(copy_id.clone());
                Ok(EditOutcome::Changed { id: Some(copy_id) })
            }
            Edit::ReplaceContent { id, kind } => {
                self.replace_content(&id, kind)?;
                Ok(EditOutcome::Changed { id: None })
            }
            Edit::SetStyle { id, style } => {
                let block = self
                    .document
                    .get_mut(&id)
                    .ok_or(MailError::UnknownBlock { id })?;
                block.style = style;
                Ok(EditOutcome::Changed { id: None })
            }
            Edit::Select { id } => {
                if let Some(id) = &id {
                    if !self.document.contains(id) {
                        return Err(MailError::UnknownBlock { id: id.clone() });
                    }
                }
                self.active_block_id = id;
                Ok(EditOutcome::SelectionOnly)
            }
            Edit::SetFooter { footer } => {
                self.document.footer = footer;
                Ok(EditOutcome::Changed { id: None })
            }
            Edit::SetTemplateStyle { key, value } => {
                if value.is_empty() {
                    self.styles.remove(&key);
                } else {
                    self.styles.insert(key, value);
                }
                Ok(EditOutcome::Changed { id: None })
            }
        }
    }

    fn replace_content(&mut self, id: &str, kind: BlockKind) -> MailResult<()> {
        let nested = matches!(
            self.document.find(id),
            Some(location) if matches!(location.owner, crate::document::BlockOwner::Strip(_))
        );
        if nested && matches!(kind, BlockKind::Strip(_)) {
            return Err(MailError::NestedContainer { id: id.to_string() });
        }
        let block = self
            .document
            .get_mut(id)
            .ok_or_else(|| MailError::UnknownBlock { id: id.to_string() })?;
        let old = std::mem::replace(&mut block.kind, kind);
        // Swapping one strip for another keeps the children.
        if let (BlockKind::Strip(old_strip), BlockKind::Strip(new_strip)) =
            (old, &mut block.kind)
        {
            if new_strip.blocks.is_empty() {
                new_strip.blocks = old_strip.blocks;
            }
        }
        Ok(())
    }

    fn selection_within(&self, removed: &Block) -> bool {
        let Some(active) = &self.active_block_id else {
            return false;
        };
        if removed.id == *active {
            return true;
        }
        removed
            .children()
            .is_some_and(|children| children.iter().any(|c| c.id == *active))
    }
}
