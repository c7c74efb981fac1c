//! Image loading and GPU texture upload

use std::collections::BTreeMap;
use std::path::Path;

use image::imageops::FilterType;
use image::{ColorType, DynamicImage, RgbaImage};
use tabletop_core::{Error, Result, TextureSlot};

use crate::device::GpuContext;

/// Decode an image file into RGBA8, flipped so row 0 is the bottom
///
/// Texture coordinates in the scene put v = 0 at the bottom of the image.
/// Only RGB and RGBA sources are accepted.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| Error::Texture {
        path: path.display().to_string(),
        source,
    })?;
    prepare_image(image, &path.display().to_string())
}

/// Validate the channel layout of a decoded image and convert it for upload
pub fn prepare_image(image: DynamicImage, name: &str) -> Result<RgbaImage> {
    match image.color() {
        ColorType::Rgb8 | ColorType::Rgba8 => {}
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "{}: {} channel image ({:?}), expected RGB or RGBA",
                name,
                other.channel_count(),
                other
            )))
        }
    }
    Ok(image.flipv().to_rgba8())
}

/// Number of mip levels down to 1x1
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Full mip chain starting with `base`, each level half the previous one
pub fn mip_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(base.width(), base.height()) as usize;
    let mut chain = Vec::with_capacity(levels);
    chain.push(base.clone());
    while chain.len() < levels {
        let prev = &chain[chain.len() - 1];
        let width = (prev.width() / 2).max(1);
        let height = (prev.height() / 2).max(1);
        let next = image::imageops::resize(prev, width, height, FilterType::Triangle);
        chain.push(next);
    }
    chain
}

/// A sampled, mipmapped 2D texture
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Upload an image and its mip chain
    pub fn from_image(ctx: &GpuContext, label: &str, image: &RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidData(format!("{}: image has no pixels", label)));
        }

        let levels = mip_chain(image);
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            ctx.queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_raw(),
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width()),
                    rows_per_image: Some(level.height()),
                },
                wgpu::Extent3d {
                    width: level.width(),
                    height: level.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::debug!("Uploaded texture {} ({}x{}, {} mips)", label, width, height, levels.len());

        Ok(Self {
            texture,
            view,
            sampler,
            width,
            height,
        })
    }
}

/// The textures of a scene, keyed by slot
pub struct TextureSet {
    textures: BTreeMap<TextureSlot, Texture>,
}

impl TextureSet {
    /// Load every slot's image from `asset_dir`
    ///
    /// Fails on the first texture that cannot be read or decoded.
    pub fn load(ctx: &GpuContext, asset_dir: &Path, slots: &[TextureSlot]) -> Result<Self> {
        let mut textures = BTreeMap::new();
        for &slot in slots {
            let path = asset_dir.join(slot.file_name());
            let image = load_image(&path).map_err(|e| {
                log::error!("Failed to load texture {}", path.display());
                e
            })?;
            textures.insert(slot, Texture::from_image(ctx, slot.file_name(), &image)?);
        }
        log::info!("Loaded {} textures from {}", textures.len(), asset_dir.display());
        Ok(Self { textures })
    }

    pub fn get(&self, slot: TextureSlot) -> Option<&Texture> {
        self.textures.get(&slot)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(300, 17), 9);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn test_mip_chain_halves_down_to_one() {
        let base = RgbaImage::from_pixel(8, 2, image::Rgba([200, 100, 50, 255]));
        let chain = mip_chain(&base);
        let dims: Vec<_> = chain.iter().map(|m| m.dimensions()).collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        // a flat color survives filtering
        assert_eq!(chain[3].get_pixel(0, 0), &image::Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn test_prepare_flips_rows() {
        let mut rgb = RgbImage::new(1, 2);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(0, 1, Rgb([0, 0, 255]));
        let out = prepare_image(DynamicImage::ImageRgb8(rgb), "flip").unwrap();
        assert_eq!(out.get_pixel(0, 0), &image::Rgba([0, 0, 255, 255]));
        assert_eq!(out.get_pixel(0, 1), &image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_prepare_rejects_grayscale() {
        let gray = GrayImage::from_pixel(2, 2, Luma([128]));
        let err = prepare_image(DynamicImage::ImageLuma8(gray), "gray").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
