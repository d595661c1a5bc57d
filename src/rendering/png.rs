//! PNG decode and export encoding.

use std::io::Cursor;
use tile_quant::PixelBuffer;

use crate::error::ImageError;

/// Decode a PNG into an RGBA8 buffer.
///
/// Palette, low-bit and 16-bit images are expanded to 8 bits per channel;
/// grey and RGB inputs get an opaque alpha channel.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::Unsupported(format!(
            "bit depth {:?} after expansion",
            info.bit_depth
        )));
    }

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(ImageError::Unsupported(
                "indexed color was not expanded".to_string(),
            ))
        }
    };

    Ok(PixelBuffer::new(info.width, info.height, rgba)?)
}

/// Encode an RGBA8 buffer as a PNG.
///
/// Uses fast settings; pass the result through [`optimize_png`] for the
/// final file.
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixels.width(), pixels.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(pixels.data())
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Re-compress a PNG with oxipng (zopfli + adaptive filter selection).
///
/// Returns the input unchanged if optimization fails.
pub fn optimize_png(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => optimized,
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping unoptimized export");
            png_bytes
        }
    }
}
