//! Generation dispatch: turns a [`GenerationRequest`] into endpoint calls.
//!
//! Images are a single call. Videos are split into fixed-length segments
//! issued strictly sequentially; a failed segment is logged and skipped, and
//! only the first successful segment URL is returned. Stitching segments into
//! a single file of the requested duration is server-side work this crate
//! does not own, so a multi-segment result is knowingly truncated to its
//! first segment.

use std::sync::Arc;

use crate::request::{GenerationRequest, MediaKind};
use crate::service::{GenerationError, GenerationService};

/// Model used for image requests.
pub const IMAGE_MODEL: &str = "replicate/black-forest-labs/flux-1.1-pro";

/// Model used for video segment requests.
pub const VIDEO_MODEL: &str = "replicate/google/veo-3";

/// System message sent with every generation call.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Nominal length of one generated video segment, in seconds.
pub const SEGMENT_LENGTH_SECS: u32 = 8;

/// Hard cap on the per-segment duration sent to the endpoint.
pub const MAX_SEGMENT_SECS: u32 = 10;

/// How a target duration is split into sequential segment calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPlan {
    /// Number of segment calls to issue.
    pub count: u32,
    /// Rounded per-part duration quoted in the continuity phrasing.
    pub part_secs: u32,
    /// Capped per-segment duration quoted in the segment instruction.
    pub segment_secs: u32,
}

impl SegmentPlan {
    /// Plan for a target duration: `max(1, ceil(target / 8))` segments.
    pub fn for_duration(target_secs: u32) -> Self {
        let count = (target_secs.div_ceil(SEGMENT_LENGTH_SECS)).max(1);
        let part_secs = (target_secs as f64 / count as f64).round() as u32;
        let segment_secs = target_secs.div_ceil(count).min(MAX_SEGMENT_SECS);
        Self {
            count,
            part_secs,
            segment_secs,
        }
    }
}

/// Progress snapshot emitted while a request is being dispatched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationProgress {
    /// 0-100.
    pub percent: f32,
    pub current_segment: Option<u32>,
    pub total_segments: Option<u32>,
}

/// Receives progress side effects from the dispatcher: a queue entry for
/// queued work, or scalar batch state for the sequential batch path.
pub trait ProgressSink: Send + Sync {
    fn update(&self, progress: GenerationProgress);
}

/// Sink that drops all updates.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _progress: GenerationProgress) {}
}

/// Dispatches requests against a [`GenerationService`].
#[derive(Clone)]
pub struct MediaGenerator {
    service: Arc<dyn GenerationService>,
}

impl MediaGenerator {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Produce a result URL for the request, reporting progress as segments
    /// complete. The returned URL is whatever the endpoint handed back,
    /// unvalidated.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        progress: &dyn ProgressSink,
    ) -> Result<String, GenerationError> {
        match request.media_kind {
            MediaKind::Image => self.generate_image(request).await,
            MediaKind::Video => self.generate_video(request, progress).await,
        }
    }

    async fn generate_image(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let instruction = format!("Generate image: {}", image_instruction(request));
        self.service
            .complete(IMAGE_MODEL, SYSTEM_PROMPT, &instruction)
            .await
    }

    async fn generate_video(
        &self,
        request: &GenerationRequest,
        progress: &dyn ProgressSink,
    ) -> Result<String, GenerationError> {
        let target_secs = request
            .duration_secs
            .unwrap_or(crate::request::DEFAULT_DURATION_SECS);
        let plan = SegmentPlan::for_duration(target_secs);

        progress.update(GenerationProgress {
            percent: 0.0,
            current_segment: None,
            total_segments: Some(plan.count),
        });

        let mut segment_urls = Vec::new();
        for index in 0..plan.count {
            progress.update(GenerationProgress {
                percent: ((index + 1) as f32 / plan.count as f32) * 100.0,
                current_segment: Some(index + 1),
                total_segments: Some(plan.count),
            });

            let instruction = format!(
                "Generate video: {}",
                segment_instruction(request, target_secs, plan, index)
            );
            match self
                .service
                .complete(VIDEO_MODEL, SYSTEM_PROMPT, &instruction)
                .await
            {
                Ok(url) => segment_urls.push(url),
                Err(err) => {
                    log::warn!(
                        "video segment {}/{} failed, skipping: {}",
                        index + 1,
                        plan.count,
                        err
                    );
                }
            }
        }

        // Only the first segment survives; see the module docs.
        segment_urls
            .into_iter()
            .next()
            .ok_or(GenerationError::NoSegments)
    }
}

/// Instruction body for an image request.
fn image_instruction(request: &GenerationRequest) -> String {
    format!(
        "{}, {} style, high quality, detailed, {}",
        request.prompt,
        request.style.as_str(),
        request.dimensions.as_str()
    )
}

/// Instruction body for one video segment. Multi-segment requests embed a
/// continuity phrasing referencing the part index so consecutive segments
/// stay visually consistent.
fn segment_instruction(
    request: &GenerationRequest,
    target_secs: u32,
    plan: SegmentPlan,
    index: u32,
) -> String {
    let sequenced = if plan.count > 1 {
        format!(
            "{} (continuous sequence part {}/{}, maintain visual consistency, {} seconds duration)",
            request.prompt,
            index + 1,
            plan.count,
            plan.part_secs
        )
    } else {
        format!("{}, {} seconds duration", request.prompt, target_secs)
    };

    let body = format!(
        "{} (segment {}), {} style, high quality, detailed, {}, {} seconds duration",
        sequenced,
        index + 1,
        request.style.as_str(),
        request.dimensions.as_str(),
        plan.segment_secs
    );

    match &request.source_video {
        Some(source) => format!("Transform this video: {}, {}", source, body),
        None => body,
    }
}
