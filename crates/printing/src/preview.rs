use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use crate::job::PrintJobId;
use crate::renderer::Side;

/// Cache key for preview bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrintPreviewKey {
    pub job_id: PrintJobId,
    pub side: Side,
    pub zoom_percent: u32,
}

/// Rasterized preview of one slip face (PNG payload).
/// 單一存款單面的預覽影像。
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
    pub data: Vec<u8>,
}

/// In-memory LRU cache for preview images.
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: HashMap<PrintPreviewKey, PreviewEntry>,
    order: VecDeque<PrintPreviewKey>,
    capacity: usize,
}

impl PreviewCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn insert(&mut self, key: PrintPreviewKey, entry: PreviewEntry) {
        if self.capacity == 0 {
            return;
        }
        if !self.entries.contains_key(&key) && self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }

        match self.entries.entry(key) {
            Entry::Occupied(mut occ) => {
                occ.insert(entry);
                self.touch(key);
            }
            Entry::Vacant(vac) => {
                vac.insert(entry);
                self.order.push_back(key);
            }
        }
    }

    pub fn get(&mut self, key: &PrintPreviewKey) -> Option<&PreviewEntry> {
        if self.entries.contains_key(key) {
            self.touch(*key);
            self.entries.get(key)
        } else {
            None
        }
    }

    /// Drops every preview of `job_id`, e.g. after the check list changed.
    pub fn remove_job(&mut self, job_id: PrintJobId) {
        self.entries.retain(|key, _| key.job_id != job_id);
        self.order.retain(|key| key.job_id != job_id);
    }

    fn touch(&mut self, key: PrintPreviewKey) {
        if let Some(idx) = self.order.iter().position(|k| *k == key) {
            self.order.remove(idx);
            self.order.push_back(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
