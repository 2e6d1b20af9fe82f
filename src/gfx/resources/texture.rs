//! Texture decoding, upload, and tag-keyed ownership
//!
//! Image files decode through the `image` crate into [`DecodedImage`], upload
//! as [`GpuTexture`] (repeat wrap, trilinear minification over a CPU-built mip
//! chain, linear magnification), and live in a [`TextureRegistry`] keyed by a
//! stable string tag. Replacing a tag drops the previous handle before the new
//! one is installed, so a tag never owns two live textures.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::wgpu_utils::binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc};

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unsupported channel count {0} (expected 1, 3, or 4)")]
    UnsupportedChannelCount(u8),
}

/// Pixel data ready for GPU upload.
///
/// Single-channel images stay one byte per pixel; three-channel images are
/// expanded to RGBA because wgpu has no packed RGB format. `channels` records
/// what the file actually contained.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl DecodedImage {
    pub fn bytes_per_pixel(&self) -> u32 {
        if self.channels == 1 {
            1
        } else {
            4
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        if self.channels == 1 {
            wgpu::TextureFormat::R8Unorm
        } else {
            wgpu::TextureFormat::Rgba8UnormSrgb
        }
    }
}

/// Decodes an image file, optionally flipping it vertically.
///
/// Channel counts other than 1, 3, or 4 are rejected here rather than being
/// coerced into a wrong format downstream.
pub fn decode_image(
    path: impl AsRef<Path>,
    flip_vertically: bool,
) -> Result<DecodedImage, TextureError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    convert_image(image, flip_vertically)
}

fn convert_image(
    image: image::DynamicImage,
    flip_vertically: bool,
) -> Result<DecodedImage, TextureError> {
    let channels = image.color().channel_count();
    if !matches!(channels, 1 | 3 | 4) {
        return Err(TextureError::UnsupportedChannelCount(channels));
    }

    let image = if flip_vertically { image.flipv() } else { image };
    let (pixels, (width, height)) = if channels == 1 {
        let buffer = image.to_luma8();
        let dimensions = buffer.dimensions();
        (buffer.into_raw(), dimensions)
    } else {
        let buffer = image.to_rgba8();
        let dimensions = buffer.dimensions();
        (buffer.into_raw(), dimensions)
    };

    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
    })
}

/// Number of mip levels for a full chain down to 1x1.
fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Box-filters one mip level into the next, halving each dimension.
fn downsample(pixels: &[u8], width: u32, height: u32, bytes_per_pixel: u32) -> (Vec<u8>, u32, u32) {
    let next_width = (width / 2).max(1);
    let next_height = (height / 2).max(1);
    let bpp = bytes_per_pixel as usize;
    let mut next = vec![0u8; (next_width * next_height) as usize * bpp];

    for y in 0..next_height {
        for x in 0..next_width {
            let src_x = (x * 2).min(width - 1);
            let src_y = (y * 2).min(height - 1);
            let src_x1 = (src_x + 1).min(width - 1);
            let src_y1 = (src_y + 1).min(height - 1);

            for c in 0..bpp {
                let sample = |sx: u32, sy: u32| {
                    pixels[(sy * width + sx) as usize * bpp + c] as u32
                };
                let sum = sample(src_x, src_y)
                    + sample(src_x1, src_y)
                    + sample(src_x, src_y1)
                    + sample(src_x1, src_y1);
                next[(y * next_width + x) as usize * bpp + c] = (sum / 4) as u8;
            }
        }
    }

    (next, next_width, next_height)
}

/// GPU texture resource: texture, view, sampler, and the bind group that the
/// scene pipeline samples it through.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    /// Uploads a decoded image with a full mip chain.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        image: &DecodedImage,
        label: &str,
    ) -> Self {
        let mip_levels = mip_level_count(image.width, image.height);
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: image.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        // Upload level 0, then each box-filtered level below it
        let bpp = image.bytes_per_pixel();
        let mut level_pixels = image.pixels.clone();
        let mut level_width = image.width;
        let mut level_height = image.height;
        for level in 0..mip_levels {
            if level > 0 {
                let (next, next_width, next_height) =
                    downsample(&level_pixels, level_width, level_height, bpp);
                level_pixels = next;
                level_width = next_width;
                level_height = next_height;
            }

            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level_pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bpp * level_width),
                    rows_per_image: Some(level_height),
                },
                wgpu::Extent3d {
                    width: level_width,
                    height: level_height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Fixed sampling policy: repeat wrap, trilinear min, linear mag
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group = BindGroupBuilder::new(layout)
            .texture(&view)
            .sampler(&sampler)
            .create(device, label);

        Self {
            texture,
            view,
            sampler,
            bind_group,
        }
    }

    /// 1x1 opaque white texture used for draws that sample nothing.
    pub fn white_pixel(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) -> Self {
        let image = DecodedImage {
            pixels: vec![255, 255, 255, 255],
            width: 1,
            height: 1,
            channels: 4,
        };
        Self::from_image(device, queue, layout, &image, "fallback_white")
    }
}

/// Tag-keyed owner of texture handles.
///
/// Generic over the handle type so the ownership discipline (replace frees the
/// old handle, teardown frees everything) is testable without a GPU.
pub struct TextureRegistry<H = GpuTexture> {
    entries: HashMap<String, H>,
    released: bool,
}

impl<H> TextureRegistry<H> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            released: false,
        }
    }

    /// Installs a handle under `tag`, dropping any previous handle for the tag
    /// before the new one goes in.
    pub fn install(&mut self, tag: &str, handle: H) {
        if let Some(old) = self.entries.remove(tag) {
            drop(old);
        }
        self.entries.insert(tag.to_string(), handle);
        self.released = false;
    }

    pub fn find(&self, tag: &str) -> Option<&H> {
        self.entries.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frees every handle and marks the registry as torn down.
    ///
    /// Call once at session end; the scene guards against drawing afterwards.
    pub fn release_all(&mut self) {
        self.entries.clear();
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<H> Default for TextureRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureRegistry<GpuTexture> {
    /// Decodes `path` and installs the uploaded texture under `tag`.
    ///
    /// On failure the tag keeps whatever it previously held.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        tag: &str,
        path: impl AsRef<Path>,
        flip_vertically: bool,
    ) -> Result<(), TextureError> {
        let image = decode_image(path, flip_vertically)?;
        let texture = GpuTexture::from_image(device, queue, layout, &image, tag);
        self.install(tag, texture);
        log::debug!(
            "loaded texture '{tag}' ({}x{}, {} channels)",
            image.width,
            image.height,
            image.channels
        );
        Ok(())
    }
}
