//! Studio controller: owns the processing queue, batch collector, and media
//! library, and exposes the mutation entry points a rendering layer drives.
//!
//! All state lives behind this controller. Consumers either call a snapshot
//! accessor or watch the event stream; nothing else mutates the collections.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;

use generation::{
    Dimensions, GenerationProgress, GenerationRequest, MediaGenerator, MediaKind, Operation,
    ProgressSink, RequestForm, ValidationError,
};

pub mod batch;
pub mod library;
pub mod queue;

pub use batch::{BatchCollector, BatchDraft};
pub use library::{MediaItem, MediaLibrary};
pub use queue::{ProcessingQueue, QueueEntry};

/// State transitions a rendering layer can observe without polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StudioEvent {
    EntryQueued {
        entry_id: String,
    },
    EntryProgress {
        entry_id: String,
        percent: f32,
        current_segment: Option<u32>,
        total_segments: Option<u32>,
    },
    EntryCompleted {
        entry_id: String,
        item_id: String,
    },
    EntryFailed {
        entry_id: String,
        error: String,
    },
    BatchProgress {
        percent: u8,
    },
    BatchCompleted {
        added: usize,
    },
}

struct StudioInner {
    generator: MediaGenerator,
    queue: Mutex<ProcessingQueue>,
    library: Mutex<MediaLibrary>,
    batch: Mutex<BatchCollector>,
    // Cancellation seam: every in-flight entry keeps its abort handle here so
    // the contract stays extensible, but nothing invokes abort today.
    abort_handles: Mutex<HashMap<String, AbortHandle>>,
    events: UnboundedSender<StudioEvent>,
}

/// The application controller. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Studio {
    inner: Arc<StudioInner>,
}

impl Studio {
    /// Create a studio around a dispatcher. The returned receiver yields
    /// every [`StudioEvent`]; dropping it just disables notifications.
    pub fn new(generator: MediaGenerator) -> (Self, UnboundedReceiver<StudioEvent>) {
        let (events, rx) = unbounded_channel();
        let studio = Self {
            inner: Arc::new(StudioInner {
                generator,
                queue: Mutex::new(ProcessingQueue::new()),
                library: Mutex::new(MediaLibrary::new()),
                batch: Mutex::new(BatchCollector::new()),
                abort_handles: Mutex::new(HashMap::new()),
                events,
            }),
        };
        (studio, rx)
    }

    /// Validate the form and enqueue it as a fresh generation.
    pub fn submit(&self, form: &RequestForm) -> Result<String, ValidationError> {
        let request = form.build()?;
        Ok(self.enqueue(request, Operation::Generate, None))
    }

    /// Append a queue entry and immediately begin dispatch for it, without
    /// waiting on other entries. Entries settle independently and may
    /// complete out of enqueue order. Must be called within a tokio runtime.
    pub fn enqueue(
        &self,
        request: GenerationRequest,
        operation: Operation,
        origin_id: Option<String>,
    ) -> String {
        let entry = QueueEntry::new(&request, operation, origin_id);
        let entry_id = entry.id.clone();
        self.inner.queue.lock().push(entry);
        self.emit(StudioEvent::EntryQueued {
            entry_id: entry_id.clone(),
        });

        let inner = self.inner.clone();
        let task_id = entry_id.clone();
        // Holding the handle map across the spawn keeps the task's own
        // cleanup from running before its handle is registered.
        let mut handles = self.inner.abort_handles.lock();
        let handle = tokio::spawn(async move {
            let sink = EntrySink {
                inner: inner.clone(),
                entry_id: task_id.clone(),
            };
            let outcome = inner.generator.generate(&request, &sink).await;
            inner.abort_handles.lock().remove(&task_id);
            inner.queue.lock().remove(&task_id);
            match outcome {
                Ok(url) => {
                    let item = MediaItem::new(&request, url);
                    let item_id = item.id.clone();
                    inner.library.lock().prepend(item);
                    let _ = inner.events.send(StudioEvent::EntryCompleted {
                        entry_id: task_id,
                        item_id,
                    });
                }
                Err(err) => {
                    log::error!("generation failed for entry {task_id}: {err}");
                    let _ = inner.events.send(StudioEvent::EntryFailed {
                        entry_id: task_id,
                        error: err.to_string(),
                    });
                }
            }
        });
        handles.insert(entry_id.clone(), handle.abort_handle());
        drop(handles);

        entry_id
    }

    pub fn queue_snapshot(&self) -> Vec<QueueEntry> {
        self.inner.queue.lock().snapshot()
    }

    pub fn library_snapshot(&self) -> Vec<MediaItem> {
        self.inner.library.lock().snapshot()
    }

    /// Remove one library item. Irreversible.
    pub fn remove_item(&self, id: &str) -> bool {
        self.inner.library.lock().remove(id)
    }

    /// Empty the library. Irreversible. Returns how many items were dropped.
    pub fn clear_library(&self) -> usize {
        self.inner.library.lock().clear()
    }

    /// Re-enqueue a library item. The original item stays in the library;
    /// the new entry references it through `origin_id`. Video resubmissions
    /// take the target duration from the caller since items do not record it.
    pub fn resubmit(
        &self,
        item_id: &str,
        operation: Operation,
        duration_secs: Option<u32>,
    ) -> Option<String> {
        let request = {
            let library = self.inner.library.lock();
            library
                .get(item_id)?
                .resubmission_request(operation, duration_secs)
        };
        Some(self.enqueue(request, operation, Some(item_id.to_string())))
    }

    /// Copy a library item's fields into an editable form.
    pub fn edit_into_form(&self, item_id: &str) -> Option<RequestForm> {
        self.inner.library.lock().get(item_id).map(MediaItem::edit_form)
    }

    /// Capture the form as a batch draft. No-op when the form is empty.
    pub fn add_draft(&self, form: &RequestForm) -> Option<String> {
        self.inner.batch.lock().add(form)
    }

    pub fn remove_draft(&self, id: &str) -> bool {
        self.inner.batch.lock().remove(id)
    }

    pub fn drafts_snapshot(&self) -> Vec<BatchDraft> {
        self.inner.batch.lock().drafts()
    }

    /// Aggregate percent of the most recent batch dispatch.
    pub fn batch_progress(&self) -> u8 {
        self.inner.batch.lock().progress_percent()
    }

    /// Dispatch the collected drafts strictly sequentially: each draft fully
    /// settles before the next is issued. A failed draft is logged and
    /// skipped. Successes are prepended to the library in one batch once the
    /// whole run finishes, the drafts are cleared, and the number of items
    /// added is returned. The aggregate percent still reaches 100 when some
    /// drafts fail.
    pub async fn dispatch_batch(
        &self,
        media_kind: MediaKind,
        default_dimensions: Dimensions,
        duration_secs: u32,
    ) -> usize {
        let drafts = self.inner.batch.lock().drafts();
        if drafts.is_empty() {
            return 0;
        }

        self.inner.batch.lock().set_progress_percent(0);
        self.emit(StudioEvent::BatchProgress { percent: 0 });

        let total = drafts.len();
        let mut results = Vec::new();
        for (index, draft) in drafts.iter().enumerate() {
            let request = GenerationRequest {
                prompt: draft.prompt.clone(),
                style: draft.style,
                media_kind,
                dimensions: draft.dimensions.unwrap_or(default_dimensions),
                source_video: draft.source_video.clone(),
                duration_secs: match media_kind {
                    MediaKind::Video => Some(duration_secs),
                    MediaKind::Image => None,
                },
            };

            self.inner.batch.lock().reset_item_progress();
            let sink = BatchItemSink {
                inner: self.inner.clone(),
            };
            match self.inner.generator.generate(&request, &sink).await {
                Ok(url) => results.push(MediaItem::new(&request, url)),
                Err(err) => {
                    log::warn!("batch draft {} failed, skipping: {err}", draft.id);
                }
            }

            let percent = (((index + 1) as f32 / total as f32) * 100.0).round() as u8;
            self.inner.batch.lock().set_progress_percent(percent);
            self.emit(StudioEvent::BatchProgress { percent });
        }

        let added = results.len();
        self.inner.library.lock().prepend_batch(results);
        self.inner.batch.lock().clear_drafts();
        self.emit(StudioEvent::BatchCompleted { added });
        added
    }

    fn emit(&self, event: StudioEvent) {
        let _ = self.inner.events.send(event);
    }
}

/// Routes dispatcher progress into the owning queue entry.
struct EntrySink {
    inner: Arc<StudioInner>,
    entry_id: String,
}

impl ProgressSink for EntrySink {
    fn update(&self, progress: GenerationProgress) {
        let stored = self
            .inner
            .queue
            .lock()
            .update_progress(&self.entry_id, progress);
        if let Some(stored) = stored {
            let _ = self.inner.events.send(StudioEvent::EntryProgress {
                entry_id: self.entry_id.clone(),
                percent: stored.percent,
                current_segment: stored.current_segment,
                total_segments: stored.total_segments,
            });
        }
    }
}

/// Routes dispatcher progress into the batch's scalar per-item state.
struct BatchItemSink {
    inner: Arc<StudioInner>,
}

impl ProgressSink for BatchItemSink {
    fn update(&self, progress: GenerationProgress) {
        self.inner.batch.lock().set_item_progress(progress);
    }
}
