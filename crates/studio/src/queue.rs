//! In-flight request bookkeeping.
//!
//! Entries are owned exclusively by the queue; the dispatch task mutates its
//! own entry through [`ProcessingQueue::update_progress`] and removes it on
//! settle. Progress never moves backwards within one entry.

use generation::{Dimensions, GenerationProgress, GenerationRequest, MediaKind, Operation, Style};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One in-flight generation request with coarse progress metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: String,
    pub media_kind: MediaKind,
    pub prompt: String,
    pub style: Style,
    pub dimensions: Dimensions,
    pub source_video: Option<String>,
    pub duration_secs: Option<u32>,
    pub operation: Operation,
    /// 0-100, monotonically non-decreasing.
    pub progress_percent: f32,
    pub current_segment: Option<u32>,
    pub total_segments: Option<u32>,
    /// Library item this entry was resubmitted from, if any.
    pub origin_id: Option<String>,
}

impl QueueEntry {
    pub fn new(request: &GenerationRequest, operation: Operation, origin_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            media_kind: request.media_kind,
            prompt: request.prompt.clone(),
            style: request.style,
            dimensions: request.dimensions,
            source_video: request.source_video.clone(),
            duration_secs: request.duration_secs,
            operation,
            progress_percent: 0.0,
            current_segment: None,
            total_segments: None,
            origin_id,
        }
    }
}

/// Ordered collection of in-flight entries.
#[derive(Debug, Default)]
pub struct ProcessingQueue {
    entries: Vec<QueueEntry>,
}

impl ProcessingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: QueueEntry) {
        self.entries.push(entry);
    }

    /// Remove a settled entry. Returns it so the caller can log what ended.
    pub fn remove(&mut self, id: &str) -> Option<QueueEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Apply a progress update, clamping the percent so it never decreases.
    /// Returns the entry state actually stored, or None for a settled entry.
    pub fn update_progress(
        &mut self,
        id: &str,
        progress: GenerationProgress,
    ) -> Option<GenerationProgress> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        entry.progress_percent = entry.progress_percent.max(progress.percent);
        if progress.current_segment.is_some() {
            entry.current_segment = progress.current_segment;
        }
        if progress.total_segments.is_some() {
            entry.total_segments = progress.total_segments;
        }
        Some(GenerationProgress {
            percent: entry.progress_percent,
            current_segment: entry.current_segment,
            total_segments: entry.total_segments,
        })
    }

    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "a fox running through snow".to_string(),
            style: Style::Cinematic,
            media_kind: MediaKind::Video,
            dimensions: Dimensions::FullHd,
            source_video: None,
            duration_secs: Some(30),
        }
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = QueueEntry::new(&request(), Operation::Generate, None);
        let b = QueueEntry::new(&request(), Operation::Generate, None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_progress_never_decreases() {
        let mut queue = ProcessingQueue::new();
        let entry = QueueEntry::new(&request(), Operation::Generate, None);
        let id = entry.id.clone();
        queue.push(entry);

        queue.update_progress(
            &id,
            GenerationProgress {
                percent: 50.0,
                current_segment: Some(2),
                total_segments: Some(4),
            },
        );
        let stored = queue
            .update_progress(
                &id,
                GenerationProgress {
                    percent: 25.0,
                    current_segment: Some(3),
                    total_segments: Some(4),
                },
            )
            .unwrap();

        assert_eq!(stored.percent, 50.0);
        assert_eq!(stored.current_segment, Some(3));
    }

    #[test]
    fn test_update_after_removal_is_a_no_op() {
        let mut queue = ProcessingQueue::new();
        let entry = QueueEntry::new(&request(), Operation::Generate, None);
        let id = entry.id.clone();
        queue.push(entry);
        assert!(queue.remove(&id).is_some());
        assert!(queue
            .update_progress(
                &id,
                GenerationProgress {
                    percent: 10.0,
                    current_segment: None,
                    total_segments: None,
                },
            )
            .is_none());
        assert!(queue.is_empty());
    }
}
