use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{new_block_id, Block, BlockKind, BlockType, StripContent};
use crate::error::{MailError, MailResult};
use crate::style::BlockStyle;

// ─── Footer ──────────────────────────────────────────────────────────────────

/// The mandatory footer. It is not a [`Block`]: it has no id, never enters
/// the layout tree, cannot be removed or reordered, and always renders last.
/// Its rendered fragment structurally carries the unsubscribe and
/// preferences links; nothing here can switch those off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Footer {
    pub org_name: String,
    pub mailing_address: String,
    pub permission_reminder: String,
    pub style: FooterStyle,
}

impl Default for Footer {
    fn default() -> Self {
        Footer {
            org_name: String::new(),
            mailing_address: String::new(),
            permission_reminder:
                "You are receiving this email because you opted in via our website.".to_string(),
            style: FooterStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

// ─── Locations ───────────────────────────────────────────────────────────────

/// The list a block sits in: the document root or a named strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOwner {
    Root,
    Strip(String),
}

/// Where a block lives, expressed uniformly for both tree levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    pub owner: BlockOwner,
    pub index: usize,
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A stored email layout: the editable block tree plus the fixed footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub footer: Footer,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// The document a brand-new session starts from.
    pub fn starter() -> Self {
        Document {
            blocks: vec![
                Block::new(BlockType::Text),
                Block::new(BlockType::Button),
                Block::new(BlockType::Social),
            ],
            footer: Footer::default(),
        }
    }

    // ─── Loading and saving ──────────────────────────────────────────────────

    /// Loads a stored document. Accepts the canonical `{blocks, footer}`
    /// object as well as the older bare array of blocks. Malformed entries
    /// recover instead of failing the load: unknown fields are dropped,
    /// content that does not match its declared type falls back to that
    /// type's default content, and entries without a usable type are
    /// skipped. The result is normalized before it is returned.
    pub fn from_json(input: &str) -> MailResult<Document> {
        if input.trim().is_empty() {
            return Ok(Document::default());
        }
        let value: Value = serde_json::from_str(input)?;
        Document::from_value(value)
    }

    pub fn from_value(value: Value) -> MailResult<Document> {
        let mut document = match value {
            Value::Null => Document::default(),
            Value::Array(items) => Document {
                blocks: blocks_from_values(items),
                footer: Footer::default(),
            },
            Value::Object(mut map) => {
                let blocks = match map.remove("blocks") {
                    Some(Value::Array(items)) => blocks_from_values(items),
                    _ => Vec::new(),
                };
                let footer = map
                    .remove("footer")
                    .and_then(|v| serde_json::from_value(v).ok())
                    .unwrap_or_default();
                Document { blocks, footer }
            }
            other => {
                return Err(MailError::Document(format!(
                    "expected an object or an array of blocks, found {}",
                    json_type_name(&other)
                )))
            }
        };
        document.normalize();
        Ok(document)
    }

    pub fn to_json(&self) -> MailResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    // ─── Normalization ───────────────────────────────────────────────────────

    /// Repairs structural defects in place: strips nested inside strips are
    /// flattened by hoisting their children, and duplicate or empty ids are
    /// reassigned. User content is never discarded by normalization.
    pub fn normalize(&mut self) {
        for block in &mut self.blocks {
            if let BlockKind::Strip(strip) = &mut block.kind {
                flatten_strip(strip);
            }
        }
        let mut seen = HashSet::new();
        for block in &mut self.blocks {
            repair_ids(block, &mut seen);
        }
    }

    /// Checks the two structural invariants: unique ids everywhere and no
    /// strip inside a strip. Loading normalizes these away; `validate` is
    /// for callers that want to report instead of repair.
    pub fn validate(&self) -> MailResult<()> {
        let mut ids = Vec::new();
        for block in &self.blocks {
            collect_ids(block, &mut ids);
        }
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id.clone()) {
                return Err(MailError::DuplicateId { id });
            }
        }
        for block in &self.blocks {
            if let Some(children) = block.children() {
                if let Some(nested) = children.iter().find(|c| c.is_container()) {
                    return Err(MailError::NestedContainer {
                        id: nested.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    // ─── Tree operations ─────────────────────────────────────────────────────

    /// Locates a block by id at either tree level.
    pub fn find(&self, id: &str) -> Option<BlockLocation> {
        for (index, block) in self.blocks.iter().enumerate() {
            if block.id == id {
                return Some(BlockLocation {
                    owner: BlockOwner::Root,
                    index,
                });
            }
            if let Some(children) = block.children() {
                for (child_index, child) in children.iter().enumerate() {
                    if child.id == id {
                        return Some(BlockLocation {
                            owner: BlockOwner::Strip(block.id.clone()),
                            index: child_index,
                        });
                    }
                }
            }
        }
        None
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        for block in &self.blocks {
            if block.id == id {
                return Some(block);
            }
            if let Some(children) = block.children() {
                if let Some(child) = children.iter().find(|c| c.id == id) {
                    return Some(child);
                }
            }
        }
        None
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Block> {
        for block in &mut self.blocks {
            if block.id == id {
                return Some(block);
            }
            if let Some(children) = block.children_mut() {
                if let Some(child) = children.iter_mut().find(|c| c.id == id) {
                    return Some(child);
                }
            }
        }
        None
    }

    /// Total number of blocks, children included.
    pub fn block_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| 1 + b.children().map_or(0, |c| c.len()))
            .sum()
    }

    /// Inserts a block at `index` of the root list (`parent` = `None`) or
    /// of the named strip. Fails without mutating on an unknown or
    /// non-container parent, on a strip bound for another strip, or on an
    /// out-of-bounds index.
    pub fn insert(&mut self, block: Block, parent: Option<&str>, index: usize) -> MailResult<()> {
        match parent {
            None => {
                let len = self.blocks.len();
                if index > len {
                    return Err(MailError::IndexOutOfBounds { index, len });
                }
                self.blocks.insert(index, block);
            }
            Some(parent_id) => {
                if block.is_container() {
                    return Err(MailError::NestedContainer { id: block.id });
                }
                let parent_block =
                    self.blocks
                        .iter_mut()
                        .find(|b| b.id == parent_id)
                        .ok_or_else(|| MailError::UnknownBlock {
                            id: parent_id.to_string(),
                        })?;
                let children = match parent_block.children_mut() {
                    Some(children) => children,
                    None => {
                        return Err(MailError::NotAContainer {
                            id: parent_id.to_string(),
                        })
                    }
                };
                let len = children.len();
                if index > len {
                    return Err(MailError::IndexOutOfBounds { index, len });
                }
                children.insert(index, block);
            }
        }
        Ok(())
    }

    /// Detaches a block from wherever it lives and returns it. The footer
    /// is not reachable here, so it can never be removed.
    pub fn remove(&mut self, id: &str) -> MailResult<Block> {
        let location = self.find(id).ok_or_else(|| MailError::UnknownBlock {
            id: id.to_string(),
        })?;
        match location.owner {
            BlockOwner::Root => Ok(self.blocks.remove(location.index)),
            BlockOwner::Strip(parent_id) => {
                let parent = self
                    .blocks
                    .iter_mut()
                    .find(|b| b.id == parent_id)
                    .and_then(|b| b.children_mut())
                    .ok_or_else(|| MailError::UnknownBlock {
                        id: parent_id.clone(),
                    })?;
                Ok(parent.remove(location.index))
            }
        }
    }

    /// Deep-copies a block, gives the copy (and every descendant) fresh
    /// ids, and inserts it immediately after the original. Returns the
    /// copy's id.
    pub fn duplicate_block(&mut self, id: &str) -> MailResult<String> {
        let location = self.find(id).ok_or_else(|| MailError::UnknownBlock {
            id: id.to_string(),
        })?;
        let original = match &location.owner {
            BlockOwner::Root => &self.blocks[location.index],
            BlockOwner::Strip(parent_id) => {
                let parent_id = parent_id.clone();
                self.blocks
                    .iter()
                    .find(|b| b.id == parent_id)
                    .and_then(|b| b.children())
                    .map(|c| &c[location.index])
                    .ok_or(MailError::UnknownBlock { id: parent_id })?
            }
        };
        let copy = original.clone().with_fresh_ids();
        let copy_id = copy.id.clone();
        let parent = match &location.owner {
            BlockOwner::Root => None,
            BlockOwner::Strip(parent_id) => Some(parent_id.clone()),
        };
        self.insert(copy, parent.as_deref(), location.index + 1)?;
        Ok(copy_id)
    }

    /// Reparents a block. Validates the destination first, then detaches
    /// the block and reinserts it, in that order, so indexes are computed
    /// against the post-removal state. The index is clamped to the
    /// destination length.
    pub fn move_block(&mut self, id: &str, parent: Option<&str>, index: usize) -> MailResult<()> {
        let moving = self.get(id).ok_or_else(|| MailError::UnknownBlock {
            id: id.to_string(),
        })?;
        if let Some(parent_id) = parent {
            if moving.is_container() {
                return Err(MailError::NestedContainer { id: id.to_string() });
            }
            let target = self
                .blocks
                .iter()
                .find(|b| b.id == parent_id)
                .ok_or_else(|| MailError::UnknownBlock {
                    id: parent_id.to_string(),
                })?;
            if !target.is_container() {
                return Err(MailError::NotAContainer {
                    id: parent_id.to_string(),
                });
            }
        }
        let block = self.remove(id)?;
        let len = match parent {
            None => self.blocks.len(),
            Some(parent_id) => self
                .blocks
                .iter()
                .find(|b| b.id == parent_id)
                .and_then(|b| b.children())
                .map_or(0, |c| c.len()),
        };
        self.insert(block, parent, index.min(len))
    }
}

// ─── Lenient block loading ───────────────────────────────────────────────────

fn blocks_from_values(items: Vec<Value>) -> Vec<Block> {
    items.into_iter().filter_map(block_from_value).collect()
}

fn block_from_value(value: Value) -> Option<Block> {
    let Value::Object(mut map) = value else {
        log::warn!("dropping non-object block entry");
        return None;
    };
    let tag = match map.get("type").and_then(Value::as_str) {
        Some(tag) if !tag.is_empty() => tag.to_string(),
        _ => {
            log::warn!("dropping block entry without a type");
            return None;
        }
    };
    let id = map
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(new_block_id);
    let style = map
        .remove("style")
        .map(|v| serde_json::from_value::<BlockStyle>(v).unwrap_or_default())
        .unwrap_or_default();
    let content = map
        .remove("content")
        .unwrap_or_else(|| Value::Object(Default::default()));

    let kind = if tag == "strip" || tag == "container" {
        let children = match content {
            Value::Object(mut content_map) => match content_map.remove("blocks") {
                Some(Value::Array(items)) => blocks_from_values(items),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        BlockKind::Strip(StripContent { blocks: children })
    } else {
        kind_from_parts(&tag, content)
    };
    Some(Block { id, kind, style })
}

fn kind_from_parts(tag: &str, content: Value) -> BlockKind {
    let tagged = serde_json::json!({ "type": tag, "content": content });
    match serde_json::from_value::<BlockKind>(tagged) {
        Ok(kind) => kind,
        Err(err) => {
            log::warn!("content for '{tag}' does not match its type ({err}); using defaults");
            serde_json::from_value(serde_json::json!({ "type": tag, "content": {} }))
                .unwrap_or(BlockKind::Unknown)
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ─── Normalization helpers ───────────────────────────────────────────────────

fn flatten_strip(strip: &mut StripContent) {
    if !strip.blocks.iter().any(Block::is_container) {
        return;
    }
    let mut flat = Vec::with_capacity(strip.blocks.len());
    for child in strip.blocks.drain(..) {
        match child.kind {
            BlockKind::Strip(mut inner) => {
                log::warn!("hoisting children of nested strip '{}'", child.id);
                flatten_strip(&mut inner);
                flat.extend(inner.blocks);
            }
            _ => flat.push(child),
        }
    }
    strip.blocks = flat;
}

fn repair_ids(block: &mut Block, seen: &mut HashSet<String>) {
    if block.id.is_empty() || !seen.insert(block.id.clone()) {
        let fresh = new_block_id();
        log::warn!("reassigning duplicate block id '{}'", block.id);
        block.id = fresh.clone();
        seen.insert(fresh);
    }
    if let Some(children) = block.children_mut() {
        for child in children {
            repair_ids(child, seen);
        }
    }
}

fn collect_ids(block: &Block, ids: &mut Vec<String>) {
    ids.push(block.id.clone());
    if let Some(children) = block.children() {
        for child in children {
            collect_ids(child, ids);
        }
    }
}
