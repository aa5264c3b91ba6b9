use std::fs;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageFormat, ImageResult, RgbaImage};

use crate::error::{DiffError, Result};

/// Decodes PNG bytes into an RGBA8 image, expanding grey, RGB and palette inputs.
pub fn decode_png(bytes: &[u8]) -> ImageResult<RgbaImage> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8())
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)
        .map_err(DiffError::Encode)?;
    Ok(bytes)
}

pub fn read_png(path: &Path) -> Result<RgbaImage> {
    let bytes = fs::read(path).map_err(|source| DiffError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let img = decode_png(&bytes).map_err(|source| DiffError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("decoded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}

/// Encodes `img` and writes it to `path`, creating or truncating the file.
pub fn write_png(path: &Path, img: &RgbaImage) -> Result<()> {
    let bytes = encode_png(img)?;
    fs::write(path, bytes).map_err(|source| DiffError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} ({}x{})", path.display(), img.width(), img.height());
    Ok(())
}
