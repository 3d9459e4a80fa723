//! Request model: media kinds, style and size catalogs, and the form that
//! user-facing layers edit before submitting a generation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What kind of media a request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style tag interpolated into the generation instruction.
///
/// The image and video catalogs overlap on a few tags; `image_catalog` and
/// `video_catalog` return the set offered for each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Photorealistic,
    Artistic,
    Cartoon,
    Vintage,
    Modern,
    Fantasy,
    Minimalist,
    Cyberpunk,
    Cinematic,
    Documentary,
    Animated,
    Commercial,
    Dramatic,
}

impl Style {
    /// Lowercase tag used in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photorealistic => "photorealistic",
            Self::Artistic => "artistic",
            Self::Cartoon => "cartoon",
            Self::Vintage => "vintage",
            Self::Modern => "modern",
            Self::Fantasy => "fantasy",
            Self::Minimalist => "minimalist",
            Self::Cyberpunk => "cyberpunk",
            Self::Cinematic => "cinematic",
            Self::Documentary => "documentary",
            Self::Animated => "animated",
            Self::Commercial => "commercial",
            Self::Dramatic => "dramatic",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Photorealistic => "Photorealistic",
            Self::Artistic => "Artistic",
            Self::Cartoon => "Cartoon",
            Self::Vintage => "Vintage",
            Self::Modern => "Modern",
            Self::Fantasy => "Fantasy",
            Self::Minimalist => "Minimalist",
            Self::Cyberpunk => "Cyberpunk",
            Self::Cinematic => "Cinematic",
            Self::Documentary => "Documentary",
            Self::Animated => "Animated",
            Self::Commercial => "Commercial",
            Self::Dramatic => "Dramatic",
        }
    }

    /// Short description, also used by the prompt assistant as style context.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Photorealistic => "Realistic photo-like images",
            Self::Artistic => "Creative and stylized artwork",
            Self::Cartoon => "Animated cartoon style",
            Self::Vintage => "Retro and classic look",
            Self::Modern => "Clean contemporary design",
            Self::Fantasy => "Magical and otherworldly",
            Self::Minimalist => "Simple and clean design",
            Self::Cyberpunk => "Futuristic neon aesthetic",
            Self::Cinematic => "Movie-like quality and framing",
            Self::Documentary => "Natural and informative style",
            Self::Animated => "Cartoon or animated style",
            Self::Commercial => "Professional marketing style",
            Self::Dramatic => "High contrast and moody",
        }
    }

    /// Styles offered for image generation.
    pub fn image_catalog() -> &'static [Style] {
        &[
            Self::Photorealistic,
            Self::Artistic,
            Self::Cartoon,
            Self::Vintage,
            Self::Modern,
            Self::Fantasy,
            Self::Minimalist,
            Self::Cyberpunk,
        ]
    }

    /// Styles offered for video generation.
    pub fn video_catalog() -> &'static [Style] {
        &[
            Self::Cinematic,
            Self::Documentary,
            Self::Animated,
            Self::Commercial,
            Self::Artistic,
            Self::Vintage,
            Self::Modern,
            Self::Dramatic,
        ]
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target output size, interpolated into prompts as `WxH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimensions {
    #[serde(rename = "512x512")]
    Square512,
    #[serde(rename = "1024x1024")]
    Square1024,
    #[serde(rename = "1024x768")]
    Landscape1024,
    #[serde(rename = "768x1024")]
    Portrait768,
    #[serde(rename = "1920x1080")]
    FullHd,
    #[serde(rename = "1080x1920")]
    VerticalHd,
    #[serde(rename = "1280x720")]
    Hd720,
}

/// Size every upscale resubmission is forced to.
pub const UPSCALE_DIMENSIONS: Dimensions = Dimensions::FullHd;

impl Dimensions {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square512 => "512x512",
            Self::Square1024 => "1024x1024",
            Self::Landscape1024 => "1024x768",
            Self::Portrait768 => "768x1024",
            Self::FullHd => "1920x1080",
            Self::VerticalHd => "1080x1920",
            Self::Hd720 => "1280x720",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Square512 => "Square - Social media posts",
            Self::Square1024 => "Large Square - High quality posts",
            Self::Landscape1024 => "Landscape - Desktop wallpapers",
            Self::Portrait768 => "Portrait - Mobile wallpapers",
            Self::FullHd => "Full HD - Professional use",
            Self::VerticalHd => "Vertical HD - Stories, Reels",
            Self::Hd720 => "HD - General use",
        }
    }

    /// Sizes offered for image generation.
    pub fn image_catalog() -> &'static [Dimensions] {
        &[
            Self::Square512,
            Self::Square1024,
            Self::Landscape1024,
            Self::Portrait768,
            Self::FullHd,
            Self::VerticalHd,
        ]
    }

    /// Sizes offered for video generation.
    pub fn video_catalog() -> &'static [Dimensions] {
        &[
            Self::Square512,
            Self::Square1024,
            Self::FullHd,
            Self::VerticalHd,
            Self::Hd720,
        ]
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video durations offered to the user, in seconds.
pub const DURATION_CHOICES: [u32; 6] = [10, 20, 30, 40, 50, 60];

/// Default target duration for video requests.
pub const DEFAULT_DURATION_SECS: u32 = 30;

/// Quick-start prompt template.
#[derive(Debug, Clone, Copy)]
pub struct UseCaseTemplate {
    pub key: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

/// Canned prompts loadable into a [`RequestForm`].
pub const USE_CASE_TEMPLATES: [UseCaseTemplate; 6] = [
    UseCaseTemplate {
        key: "marketing",
        label: "Marketing Materials",
        prompt: "Professional marketing banner with bold text and vibrant colors",
    },
    UseCaseTemplate {
        key: "social",
        label: "Social Media Posts",
        prompt: "Instagram-worthy post with trendy aesthetics and good lighting",
    },
    UseCaseTemplate {
        key: "blog",
        label: "Blog Headers",
        prompt: "Clean blog header image with professional typography",
    },
    UseCaseTemplate {
        key: "presentation",
        label: "Presentation Slides",
        prompt: "Business presentation background with modern design elements",
    },
    UseCaseTemplate {
        key: "website",
        label: "Website Graphics",
        prompt: "Web-friendly graphic with clean design and good contrast",
    },
    UseCaseTemplate {
        key: "print",
        label: "Print Materials",
        prompt: "High-resolution print design with sharp details and vibrant colors",
    },
];

/// Which action produced a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Generate,
    Regenerate,
    Upscale,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Regenerate => "regenerate",
            Self::Upscale => "upscale",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled generation request. Immutable once dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub style: Style,
    pub media_kind: MediaKind,
    pub dimensions: Dimensions,
    /// Source video URL for video-to-video transformation.
    pub source_video: Option<String>,
    /// Target duration; video requests only.
    pub duration_secs: Option<u32>,
}

/// Submitting with no prompt text and no source video.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("prompt is empty and no source video is attached")]
pub struct ValidationError;

/// User-editable request fields; the request builder.
///
/// A rendering layer mutates this directly and calls [`RequestForm::build`]
/// on submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestForm {
    pub media_kind: MediaKind,
    pub prompt: String,
    pub style: Style,
    pub dimensions: Dimensions,
    pub source_video: Option<String>,
    pub duration_secs: u32,
}

impl RequestForm {
    pub fn new(media_kind: MediaKind) -> Self {
        let (style, dimensions) = match media_kind {
            MediaKind::Image => (Style::Photorealistic, Dimensions::Square1024),
            MediaKind::Video => (Style::Cinematic, Dimensions::FullHd),
        };
        Self {
            media_kind,
            prompt: String::new(),
            style,
            dimensions,
            source_video: None,
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    /// Switch between image and video. Switching to video snaps the size to
    /// full HD, matching the catalog default for that kind.
    pub fn set_media_kind(&mut self, kind: MediaKind) {
        self.media_kind = kind;
        if kind == MediaKind::Video {
            self.dimensions = Dimensions::FullHd;
        }
    }

    /// Load a quick-start template prompt. Returns false for an unknown key.
    pub fn load_template(&mut self, key: &str) -> bool {
        match USE_CASE_TEMPLATES.iter().find(|t| t.key == key) {
            Some(template) => {
                self.prompt = template.prompt.to_string();
                true
            }
            None => false,
        }
    }

    /// True when the form can be submitted or added to a batch.
    pub fn is_submittable(&self) -> bool {
        !self.prompt.trim().is_empty() || self.source_video.is_some()
    }

    /// Assemble an immutable request from the current fields.
    pub fn build(&self) -> Result<GenerationRequest, ValidationError> {
        if !self.is_submittable() {
            return Err(ValidationError);
        }
        Ok(GenerationRequest {
            prompt: self.prompt.trim().to_string(),
            style: self.style,
            media_kind: self.media_kind,
            dimensions: self.dimensions,
            source_video: self.source_video.clone(),
            duration_secs: match self.media_kind {
                MediaKind::Video => Some(self.duration_secs),
                MediaKind::Image => None,
            },
        })
    }
}
