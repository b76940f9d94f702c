//! Render targets
//!
//! A render target is where a pass draws to: the window's back buffer, an
//! offscreen buffer, or a texture sampled by a later pass. Targets are plain
//! descriptions owned by whoever asked for them.

use serde::{Deserialize, Serialize};

use crate::render::{RenderError, RenderResult};

/// Kind of render target, with the numeric tags used on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RenderTargetType {
    /// The window's back buffer
    Screen = 0,
    /// An offscreen colour buffer
    Buffer = 1,
    /// A texture that later passes can sample
    Texture = 2,
}

impl TryFrom<u32> for RenderTargetType {
    type Error = RenderError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(RenderTargetType::Screen),
            1 => Ok(RenderTargetType::Buffer),
            2 => Ok(RenderTargetType::Texture),
            other => Err(RenderError::UnsupportedTargetType(other)),
        }
    }
}

/// Pixel layout of an offscreen target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8 bits per channel with alpha
    #[default]
    Rgba8,
    /// 8 bits per channel, no alpha
    Rgb8,
    /// 16-bit packed colour
    Rgb565,
    /// 16-bit packed colour with 4-bit alpha
    Rgba4,
}

/// Construction options for offscreen targets; ignored for the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderTargetOptions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel layout
    pub format: PixelFormat,
    /// Whether a depth attachment is allocated
    pub depth_buffer: bool,
}

impl Default for RenderTargetOptions {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            format: PixelFormat::Rgba8,
            depth_buffer: true,
        }
    }
}

impl RenderTargetOptions {
    /// Options for a `width` x `height` target
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    fn validate(&self, kind: RenderTargetType) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidTargetOptions(format!(
                "{:?} target needs a non-zero size, got {}x{}",
                kind, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// The window's back buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenTarget;

/// An offscreen colour buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferTarget {
    /// Options the buffer was created with
    pub options: RenderTargetOptions,
}

/// A texture-backed target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureTarget {
    /// Options the texture was created with
    pub options: RenderTargetOptions,
}

/// A render target of any kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// Back buffer
    Screen(ScreenTarget),
    /// Offscreen buffer
    Buffer(BufferTarget),
    /// Texture
    Texture(TextureTarget),
}

impl RenderTarget {
    /// Kind of this target
    pub fn kind(&self) -> RenderTargetType {
        match self {
            RenderTarget::Screen(_) => RenderTargetType::Screen,
            RenderTarget::Buffer(_) => RenderTargetType::Buffer,
            RenderTarget::Texture(_) => RenderTargetType::Texture,
        }
    }

    /// Size in pixels; the screen's size is the window's and unknown here
    pub fn size(&self) -> Option<(u32, u32)> {
        match self {
            RenderTarget::Screen(_) => None,
            RenderTarget::Buffer(BufferTarget { options }) | RenderTarget::Texture(TextureTarget { options }) => {
                Some((options.width, options.height))
            }
        }
    }
}

/// Build a target of `kind`
pub fn create_render_target(
    kind: RenderTargetType,
    options: &RenderTargetOptions,
) -> RenderResult<RenderTarget> {
    let target = match kind {
        RenderTargetType::Screen => RenderTarget::Screen(ScreenTarget),
        RenderTargetType::Buffer => {
            options.validate(kind)?;
            RenderTarget::Buffer(BufferTarget { options: *options })
        }
        RenderTargetType::Texture => {
            options.validate(kind)?;
            RenderTarget::Texture(TextureTarget { options: *options })
        }
    };
    log::debug!("Created {:?} render target", kind);
    Ok(target)
}

/// Build a target from a raw numeric tag
pub fn create_render_target_from_tag(tag: u32, options: &RenderTargetOptions) -> RenderResult<RenderTarget> {
    let kind = RenderTargetType::try_from(tag).map_err(|error| {
        log::warn!("Render target tag {} is not supported", tag);
        error
    })?;
    create_render_target(kind, options)
}
