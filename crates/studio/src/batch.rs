//! Draft accumulation for sequential batch dispatch.

use generation::{Dimensions, GenerationProgress, RequestForm, Style};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending request captured from the form, awaiting batch dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDraft {
    pub id: String,
    pub prompt: String,
    pub style: Style,
    /// Size captured with the draft; dispatch falls back to the form's
    /// current size when absent.
    pub dimensions: Option<Dimensions>,
    pub source_video: Option<String>,
}

/// Accumulates drafts and tracks aggregate dispatch progress.
///
/// Batch dispatch is strictly sequential, so one scalar per-item progress
/// plus one aggregate percent is enough state.
#[derive(Debug, Default)]
pub struct BatchCollector {
    drafts: Vec<BatchDraft>,
    /// Aggregate percent across the whole batch, 0-100.
    progress_percent: u8,
    /// Progress of the draft currently being dispatched.
    item_progress: Option<GenerationProgress>,
}

impl BatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the form as a draft. No-op (returns None) when the form has
    /// neither prompt text nor a source video.
    pub fn add(&mut self, form: &RequestForm) -> Option<String> {
        if !form.is_submittable() {
            return None;
        }
        let draft = BatchDraft {
            id: Uuid::new_v4().to_string(),
            prompt: form.prompt.clone(),
            style: form.style,
            dimensions: Some(form.dimensions),
            source_video: form.source_video.clone(),
        };
        let id = draft.id.clone();
        self.drafts.push(draft);
        Some(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.drafts.len();
        self.drafts.retain(|draft| draft.id != id);
        self.drafts.len() != before
    }

    pub fn drafts(&self) -> Vec<BatchDraft> {
        self.drafts.clone()
    }

    pub fn clear_drafts(&mut self) {
        self.drafts.clear();
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn set_progress_percent(&mut self, percent: u8) {
        self.progress_percent = percent.min(100);
    }

    pub fn item_progress(&self) -> Option<GenerationProgress> {
        self.item_progress
    }

    pub fn set_item_progress(&mut self, progress: GenerationProgress) {
        self.item_progress = Some(progress);
    }

    pub fn reset_item_progress(&mut self) {
        self.item_progress = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use generation::MediaKind;

    #[test]
    fn test_empty_form_is_not_collected() {
        let mut collector = BatchCollector::new();
        let form = RequestForm::new(MediaKind::Image);
        assert!(collector.add(&form).is_none());
        assert!(collector.is_empty());
    }

    #[test]
    fn test_source_video_alone_is_collectable() {
        let mut collector = BatchCollector::new();
        let mut form = RequestForm::new(MediaKind::Video);
        form.source_video = Some("https://example.com/src.mp4".to_string());
        assert!(collector.add(&form).is_some());
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_remove_draft() {
        let mut collector = BatchCollector::new();
        let mut form = RequestForm::new(MediaKind::Image);
        form.prompt = "a quiet harbor".to_string();
        let id = collector.add(&form).unwrap();
        assert!(collector.remove(&id));
        assert!(!collector.remove(&id));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_progress_is_capped_at_100() {
        let mut collector = BatchCollector::new();
        collector.set_progress_percent(250);
        assert_eq!(collector.progress_percent(), 100);
    }
}
