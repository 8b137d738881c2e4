use crate::extractor::ExtractedImage;
use crate::scanner::ProfileFile;
use std::path::Path;

/// Identity of a queue item, unique within one `SelectionQueue` and stable
/// across moves between the two lists. Two items with identical payload
/// bytes are still distinct.
pub type ItemId = u64;

/// Which of the two ordered lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Candidates,
    Queued,
}

/// What a queue item carries: an in-memory extracted image, or a bare
/// profile file reference when running in copy mode.
#[derive(Debug, Clone)]
pub enum ItemPayload {
    Extracted(ExtractedImage),
    SourceFile(ProfileFile),
}

impl ItemPayload {
    pub fn source_path(&self) -> &Path {
        match self {
            ItemPayload::Extracted(image) => &image.source_path,
            ItemPayload::SourceFile(profile) => &profile.path,
        }
    }

    pub fn filename(&self) -> String {
        match self {
            ItemPayload::Extracted(image) => image.filename(),
            ItemPayload::SourceFile(profile) => profile.filename.clone(),
        }
    }

    /// Extracted bytes, when cached. Copy-mode items have none; the
    /// conversion driver reads the source file instead.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            ItemPayload::Extracted(image) => Some(&image.bytes),
            ItemPayload::SourceFile(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueueItem {
    id: ItemId,
    payload: ItemPayload,
    selected: bool,
}

impl QueueItem {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn payload(&self) -> &ItemPayload {
        &self.payload
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn filename(&self) -> String {
        self.payload.filename()
    }
}

/// Aggregate enablement flags for a presentation layer, recomputed from the
/// lists on demand. There is no background polling; read this after every
/// mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlStates {
    pub can_promote: bool,
    pub can_demote: bool,
    pub can_start: bool,
}

/// Two ordered, disjoint lists of discovered images: `candidates` (found
/// but not staged) and `queued` (staged for the next conversion run).
///
/// Insertion order is display order. An item lives in exactly one list at a
/// time; moving it appends at the destination tail and resets its selected
/// flag. Mutations are expected from a single control thread.
#[derive(Debug, Default)]
pub struct SelectionQueue {
    candidates: Vec<QueueItem>,
    queued: Vec<QueueItem>,
    next_id: ItemId,
}

impl SelectionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `candidates` wholesale and drop everything queued. Used
    /// after every (re-)scan of the source directory.
    pub fn load<I: IntoIterator<Item = ItemPayload>>(&mut self, items: I) {
        self.candidates.clear();
        self.queued.clear();

        for payload in items {
            let id = self.next_id;
            self.next_id += 1;
            self.candidates.push(QueueItem {
                id,
                payload,
                selected: false,
            });
        }
    }

    /// Empty both lists atomically. Called when the source directory
    /// selection changes.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.queued.clear();
    }

    /// Move one candidate to the end of the queued list. A stale id (item
    /// already moved or never existed) is a silent no-op, not an error.
    pub fn promote(&mut self, id: ItemId) {
        Self::transfer(&mut self.candidates, &mut self.queued, id);
    }

    /// Move one queued item back to the end of the candidates list.
    pub fn demote(&mut self, id: ItemId) {
        Self::transfer(&mut self.queued, &mut self.candidates, id);
    }

    /// Promote every selected candidate, preserving their relative order.
    pub fn promote_selected(&mut self) {
        Self::transfer_selected(&mut self.candidates, &mut self.queued);
    }

    /// Demote every selected queued item, preserving their relative order.
    pub fn demote_selected(&mut self) {
        Self::transfer_selected(&mut self.queued, &mut self.candidates);
    }

    pub fn set_selected(&mut self, list: ListKind, id: ItemId, value: bool) {
        if let Some(item) = self.list_mut(list).iter_mut().find(|item| item.id == id) {
            item.selected = value;
        }
    }

    pub fn select_all(&mut self, list: ListKind, value: bool) {
        for item in self.list_mut(list) {
            item.selected = value;
        }
    }

    /// True iff at least one candidate is selected.
    pub fn can_promote(&self) -> bool {
        self.candidates.iter().any(|item| item.selected)
    }

    /// True iff at least one queued item is selected.
    pub fn can_demote(&self) -> bool {
        self.queued.iter().any(|item| item.selected)
    }

    /// True iff the queued list is non-empty.
    pub fn can_start(&self) -> bool {
        !self.queued.is_empty()
    }

    pub fn control_states(&self) -> ControlStates {
        ControlStates {
            can_promote: self.can_promote(),
            can_demote: self.can_demote(),
            can_start: self.can_start(),
        }
    }

    pub fn candidates(&self) -> &[QueueItem] {
        &self.candidates
    }

    pub fn queued(&self) -> &[QueueItem] {
        &self.queued
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty() && self.queued.is_empty()
    }

    fn list_mut(&mut self, list: ListKind) -> &mut Vec<QueueItem> {
        match list {
            ListKind::Candidates => &mut self.candidates,
            ListKind::Queued => &mut self.queued,
        }
    }

    fn transfer(source: &mut Vec<QueueItem>, dest: &mut Vec<QueueItem>, id: ItemId) {
        if let Some(index) = source.iter().position(|item| item.id == id) {
            let mut item = source.remove(index);
            // Selection state does not carry across lists.
            item.selected = false;
            dest.push(item);
        }
    }

    fn transfer_selected(source: &mut Vec<QueueItem>, dest: &mut Vec<QueueItem>) {
        let mut kept = Vec::with_capacity(source.len());
        for mut item in source.drain(..) {
            if item.selected {
                item.selected = false;
                dest.push(item);
            } else {
                kept.push(item);
            }
        }
        *source = kept;
    }
}
