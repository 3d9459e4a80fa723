//! The media library: completed results, newest first.

use generation::{
    Dimensions, GenerationRequest, MediaKind, Operation, RequestForm, Style, UPSCALE_DIMENSIONS,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed generation result. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub media_kind: MediaKind,
    /// Result locator exactly as the endpoint returned it.
    pub url: String,
    pub prompt: String,
    pub style: Style,
    pub dimensions: Dimensions,
    pub source_video: Option<String>,
    /// Unix epoch seconds.
    pub created_at: i64,
}

impl MediaItem {
    pub fn new(request: &GenerationRequest, url: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            media_kind: request.media_kind,
            url,
            prompt: request.prompt.clone(),
            style: request.style,
            dimensions: request.dimensions,
            source_video: request.source_video.clone(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Request for submitting this item again.
    ///
    /// Regeneration reuses the item's fields verbatim; upscaling prefixes the
    /// prompt with the upscale intent and forces the high-resolution size.
    /// The target duration is not recorded on items, so video resubmissions
    /// take it from the caller's current form state.
    pub fn resubmission_request(
        &self,
        operation: Operation,
        duration_secs: Option<u32>,
    ) -> GenerationRequest {
        let (prompt, dimensions) = match operation {
            Operation::Upscale => (
                format!("Upscale this {}: {}", self.media_kind, self.prompt),
                UPSCALE_DIMENSIONS,
            ),
            Operation::Generate | Operation::Regenerate => (self.prompt.clone(), self.dimensions),
        };
        GenerationRequest {
            prompt,
            style: self.style,
            media_kind: self.media_kind,
            dimensions,
            source_video: self.source_video.clone(),
            duration_secs: match self.media_kind {
                MediaKind::Video => duration_secs,
                MediaKind::Image => None,
            },
        }
    }

    /// Copy this item's fields back into an editable form, for tweaking
    /// before resubmission.
    pub fn edit_form(&self) -> RequestForm {
        let mut form = RequestForm::new(self.media_kind);
        form.prompt = self.prompt.clone();
        form.style = self.style;
        form.dimensions = self.dimensions;
        form.source_video = self.source_video.clone();
        form
    }
}

/// Completed results, newest first.
#[derive(Debug, Default)]
pub struct MediaLibrary {
    items: Vec<MediaItem>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly completed item at the front.
    pub fn prepend(&mut self, item: MediaItem) {
        self.items.insert(0, item);
    }

    /// Insert a completed batch at the front, preserving the batch's own
    /// order ahead of everything already present.
    pub fn prepend_batch(&mut self, batch: Vec<MediaItem>) {
        let mut items = batch;
        items.append(&mut self.items);
        self.items = items;
    }

    pub fn get(&self, id: &str) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Remove one item. Irreversible.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Remove everything. Irreversible. Returns how many items were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.items.len();
        self.items.clear();
        count
    }

    pub fn snapshot(&self) -> Vec<MediaItem> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(prompt: &str) -> MediaItem {
        MediaItem::new(
            &GenerationRequest {
                prompt: prompt.to_string(),
                style: Style::Photorealistic,
                media_kind: MediaKind::Image,
                dimensions: Dimensions::Square1024,
                source_video: None,
                duration_secs: None,
            },
            format!("https://cdn.example.com/{prompt}.png"),
        )
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut library = MediaLibrary::new();
        library.prepend(item("first"));
        library.prepend(item("second"));
        let snapshot = library.snapshot();
        assert_eq!(snapshot[0].prompt, "second");
        assert_eq!(snapshot[1].prompt, "first");
    }

    #[test]
    fn test_prepend_batch_preserves_batch_order() {
        let mut library = MediaLibrary::new();
        library.prepend(item("old"));
        library.prepend_batch(vec![item("a"), item("b")]);
        let prompts: Vec<_> = library.snapshot().iter().map(|i| i.prompt.clone()).collect();
        assert_eq!(prompts, vec!["a", "b", "old"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut library = MediaLibrary::new();
        let kept = item("kept");
        let dropped = item("dropped");
        let dropped_id = dropped.id.clone();
        library.prepend(kept);
        library.prepend(dropped);

        assert!(library.remove(&dropped_id));
        assert!(!library.remove(&dropped_id));
        assert_eq!(library.len(), 1);

        assert_eq!(library.clear(), 1);
        assert!(library.is_empty());
    }

    #[test]
    fn test_upscale_resubmission_forces_high_resolution() {
        let original = item("a quiet harbor");
        let request = original.resubmission_request(Operation::Upscale, None);
        assert_eq!(request.dimensions, UPSCALE_DIMENSIONS);
        assert_eq!(request.prompt, "Upscale this image: a quiet harbor");
        // The source item is untouched.
        assert_eq!(original.dimensions, Dimensions::Square1024);
        assert_eq!(original.prompt, "a quiet harbor");
    }

    #[test]
    fn test_regenerate_resubmission_reuses_fields() {
        let original = item("a quiet harbor");
        let request = original.resubmission_request(Operation::Regenerate, None);
        assert_eq!(request.prompt, original.prompt);
        assert_eq!(request.dimensions, original.dimensions);
        assert_eq!(request.duration_secs, None);
    }

    #[test]
    fn test_edit_form_copies_fields() {
        let original = item("a quiet harbor");
        let form = original.edit_form();
        assert_eq!(form.prompt, original.prompt);
        assert_eq!(form.dimensions, original.dimensions);
        assert_eq!(form.media_kind, MediaKind::Image);
    }
}
