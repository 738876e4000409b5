use crate::api::SourceClient;
use anyhow::{Context as _, Result, anyhow};
use gpui::RenderImage as GpuiRenderImage;
use image::{Frame as RasterFrame, RgbaImage};
use std::sync::Arc;

pub(super) struct FetchedPage {
    pub image: Arc<GpuiRenderImage>,
    pub size: (u32, u32),
}

pub(super) fn fetch_page_image(client: &SourceClient, url: &str) -> Result<FetchedPage> {
    let bytes = client.fetch_image_bytes(url)?;
    decode_render_image(&bytes)
}

pub(super) fn decode_render_image(bytes: &[u8]) -> Result<FetchedPage> {
    let decoded = image::load_from_memory(bytes).context("failed to decode page image")?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(anyhow!("invalid page image size: {width}x{height}"));
    }

    // gpui samples frames as BGRA.
    let mut raw = rgba.into_raw();
    for pixel in raw.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }

    let buffer = RgbaImage::from_raw(width, height, raw)
        .ok_or_else(|| anyhow!("could not create image buffer: {width}x{height}"))?;
    let frame = RasterFrame::new(buffer);

    Ok(FetchedPage {
        image: Arc::new(GpuiRenderImage::new([frame])),
        size: (width, height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn decodes_png_bytes_and_reports_the_natural_size() {
        let source = RgbaImage::from_pixel(3, 2, image::Rgba([200, 100, 50, 255]));
        let mut encoded = Vec::new();
        image::DynamicImage::ImageRgba8(source)
            .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            .unwrap();

        let fetched = decode_render_image(&encoded).unwrap();
        assert_eq!(fetched.size, (3, 2));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode_render_image(&[0, 1, 2, 3]).is_err());
    }
}
