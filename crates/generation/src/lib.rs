//! Generation pipeline: request model, remote dispatch, prompt assistance,
//! and source-media download.
//!
//! The studio crate drives this one; nothing here owns long-lived state.

pub mod dispatcher;
pub mod instagram;
pub mod prompt;
pub mod request;
pub mod service;

pub use dispatcher::{
    GenerationProgress, MediaGenerator, NoProgress, ProgressSink, SegmentPlan, IMAGE_MODEL,
    MAX_SEGMENT_SECS, SEGMENT_LENGTH_SECS, VIDEO_MODEL,
};
pub use instagram::{DownloadError, InstagramDownloader};
pub use prompt::{PromptAssistant, PROMPT_MODEL};
pub use request::{
    Dimensions, GenerationRequest, MediaKind, Operation, RequestForm, Style, UseCaseTemplate,
    ValidationError, DEFAULT_DURATION_SECS, DURATION_CHOICES, UPSCALE_DIMENSIONS,
    USE_CASE_TEMPLATES,
};
pub use service::{ChatCompletionClient, GenerationError, GenerationService, ServiceConfig};
