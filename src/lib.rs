//! # mailcanvas
//!
//! Core engine of a drag-and-drop email builder for event marketing: a
//! recursive block document model, an editing session with undo/redo and
//! drag/drop, and a deterministic compiler from block tree plus
//! personalization context to email-client-safe HTML.
//!
//! ## Example — load, edit, render
//! ```ignore
//! use mailcanvas::{render, Document, Edit, EditingSession, RenderOptions};
//!
//! let mut session = EditingSession::hydrate(stored_json)?;
//! session.apply(Edit::Remove { id: block_id })?;
//!
//! let html = session.preview(&RenderOptions::default());
//! ```
//!
//! ## Example — render a stored document directly
//! ```ignore
//! use mailcanvas::{render, Document, RenderOptions};
//!
//! let document = Document::from_json(stored_json)?;
//! let html = render(&document, &RenderOptions::default());
//! ```

pub mod block;
pub mod context;
pub mod document;
pub mod dragdrop;
pub mod error;
pub mod history;
pub mod personalize;
pub mod recommend;
pub mod render;
pub mod session;
pub mod style;

// --- Core types ---
pub use block::{Block, BlockKind, BlockType};
pub use context::{Affinity, Contact, RenderOptions, Show};
pub use document::{Document, Footer};
pub use error::{MailError, MailResult};
pub use session::{Edit, EditOutcome, EditingSession};
pub use style::{BlockStyle, StylesState};

// --- Editor services ---
pub use dragdrop::{DragController, DragSource, DropOutcome, DropTarget};
pub use history::{HistoryManager, RecordMode};
pub use personalize::TokenTable;
pub use render::{render, render_with_styles};
