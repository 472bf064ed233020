use std::time::Instant;

use crate::block::{Block, BlockType};
use crate::document::BlockOwner;
use crate::history::{HistoryManager, RecordMode};
use crate::session::{Edit, EditingSession};

/// What is being dragged: a palette entry that will become a new block, or
/// an existing block picked up from the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    Palette(BlockType),
    Existing(String),
}

/// Where an armed drop would land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Canvas,
    Strip(String),
}

/// Result of a drop attempt. Invalid drops are rejected without touching
/// the session; the embedding UI simply snaps the ghost back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Completed { id: String },
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DragPhase {
    Idle,
    Dragging {
        source: DragSource,
    },
    Armed {
        source: DragSource,
        target: DropTarget,
        index: usize,
    },
}

/// Resolves where a pointer lands in a vertical list of children, given
/// the children's midpoints in document order: before the first child
/// whose midpoint lies below the pointer, otherwise at the end.
pub fn insertion_index(pointer_y: f64, midpoints: &[f64]) -> usize {
    midpoints
        .iter()
        .position(|&mid| pointer_y < mid)
        .unwrap_or(midpoints.len())
}

/// Drag state machine for the editor canvas. Geometry stays in the
/// embedding UI, which reports hover targets and child midpoints; the
/// controller owns validity, insertion order, and the history commit.
#[derive(Debug, Default)]
pub struct DragController {
    phase: DragPhase,
}

impl Default for DragPhase {
    fn default() -> Self {
        DragPhase::Idle
    }
}

impl DragController {
    pub fn new() -> Self {
        DragController::default()
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle)
    }

    /// The armed target and insertion index, if any, for placeholder UI.
    pub fn armed(&self) -> Option<(&DropTarget, usize)> {
        match &self.phase {
            DragPhase::Armed { target, index, .. } => Some((target, *index)),
            _ => None,
        }
    }

    /// Begins a drag. Picking up an id the document does not contain is
    /// ignored and the controller stays idle.
    pub fn drag_start(&mut self, session: &EditingSession, source: DragSource) -> bool {
        if let DragSource::Existing(id) = &source {
            if !session.document.contains(id) {
                log::debug!("drag ignored: unknown block '{id}'");
                return false;
            }
        }
        self.phase = DragPhase::Dragging { source };
        true
    }

    /// Updates the armed drop position while the pointer moves. Returns
    /// the insertion index when the hover is valid; invalid targets disarm
    /// without ending the drag.
    pub fn hover(
        &mut self,
        session: &EditingSession,
        target: DropTarget,
        pointer_y: f64,
        child_midpoints: &[f64],
    ) -> Option<usize> {
        let source = match std::mem::take(&mut self.phase) {
            DragPhase::Idle => return None,
            DragPhase::Dragging { source } | DragPhase::Armed { source, .. } => source,
        };
        if !target_accepts(session, &source, &target) {
            self.phase = DragPhase::Dragging { source };
            return None;
        }
        let index = insertion_index(pointer_y, child_midpoints);
        self.phase = DragPhase::Armed {
            source,
            target,
            index,
        };
        Some(index)
    }

    /// Completes the drag. Palette sources insert a block with that type's
    /// default content; existing sources are detached first and reinserted
    /// at the armed position, in that order, so the insertion index is
    /// applied to the post-removal list. A successful drop commits one
    /// immediate history snapshot.
    pub fn drop(
        &mut self,
        session: &mut EditingSession,
        history: &mut HistoryManager,
        now: Instant,
    ) -> DropOutcome {
        let phase = std::mem::take(&mut self.phase);
        let DragPhase::Armed {
            source,
            target,
            index,
        } = phase
        else {
            log::debug!("drop rejected: no armed target");
            return DropOutcome::Rejected;
        };
        let parent = match target {
            DropTarget::Canvas => None,
            DropTarget::Strip(id) => Some(id),
        };
        let (dropped_id, edit) = match source {
            DragSource::Palette(block_type) => {
                let block = Block::new(block_type);
                (
                    block.id.clone(),
                    Edit::Insert {
                        block,
                        parent,
                        index,
                    },
                )
            }
            DragSource::Existing(id) => {
                let index = adjusted_for_removal(session, &id, parent.as_deref(), index);
                (
                    id.clone(),
                    Edit::Move {
                        id,
                        parent,
                        index,
                    },
                )
            }
        };
        match session.apply(edit) {
            Ok(_) => {
                if let Err(err) = history.record(session, RecordMode::Immediate, now) {
                    log::warn!("history record after drop failed: {err}");
                }
                DropOutcome::Completed { id: dropped_id }
            }
            Err(err) => {
                log::debug!("drop rejected: {err}");
                DropOutcome::Rejected
            }
        }
    }

    /// Abandons the drag without touching the session.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

fn target_accepts(session: &EditingSession, source: &DragSource, target: &DropTarget) -> bool {
    let strip_id = match target {
        DropTarget::Canvas => return true,
        DropTarget::Strip(id) => id,
    };
    let strip_source = match source {
        DragSource::Palette(block_type) => *block_type == BlockType::Strip,
        DragSource::Existing(id) => {
            if id == strip_id {
                return false;
            }
            session
                .document
                .get(id)
                .is_some_and(Block::is_container)
        }
    };
    if strip_source {
        return false;
    }
    session
        .document
        .blocks
        .iter()
        .any(|b| b.id == *strip_id && b.is_container())
}

/// When a block moves within the list it already occupies, detaching it
/// shifts everything after it up by one; the armed index was computed
/// against the pre-removal list and has to follow.
fn adjusted_for_removal(
    session: &EditingSession,
    id: &str,
    parent: Option<&str>,
    index: usize,
) -> usize {
    let Some(location) = session.document.find(id) else {
        return index;
    };
    let same_list = match (&location.owner, parent) {
        (BlockOwner::Root, None) => true,
        (BlockOwner::Strip(a), Some(b)) => a == b,
        _ => false,
    };
    if same_list && location.index < index {
        index - 1
    } else {
        index
    }
}
