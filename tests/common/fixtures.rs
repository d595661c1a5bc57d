//! Test fixtures and message builders.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use tile_quant::{PixelBuffer, Rgba8};

use pixelforge::rendering::encode_png;

/// PICO-8 colors as a flat RGBA array
pub const PICO8_FLAT: &[u8] = &[
    0x00, 0x00, 0x00, 255, 0x1d, 0x2b, 0x53, 255, 0x7e, 0x25, 0x53, 255, 0x00, 0x87, 0x51, 255,
    0xab, 0x52, 0x36, 255, 0x5f, 0x57, 0x4f, 255, 0xc2, 0xc3, 0xc7, 255, 0xff, 0xf1, 0xe8, 255,
    0xff, 0x00, 0x4d, 255, 0xff, 0xa3, 0x00, 255, 0xff, 0xec, 0x27, 255, 0x00, 0xe4, 0x36, 255,
    0x29, 0xad, 0xff, 255, 0x83, 0x76, 0x9c, 255, 0xff, 0x77, 0xa8, 255, 0xff, 0xcc, 0xaa, 255,
];

/// A palette JSON file body
pub const PALETTE_JSON: &str = r##"{
  "black": { "color": "#000", "is_premium": false },
  "white": { "color": "#ffffff", "is_premium": false },
  "red": { "color": "#ff004d", "is_premium": true },
  "broken": { "color": "not-a-color" }
}"##;

/// Horizontal gradient with a transparent right column
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        if x == width - 1 {
            Rgba8::TRANSPARENT
        } else {
            Rgba8::opaque((x * 255 / width) as u8, (y * 255 / height) as u8, 128)
        }
    })
}

/// Deterministic noise; compresses poorly, so it is slow to decode
pub fn noise(width: u32, height: u32) -> PixelBuffer {
    let mut state: u32 = 0x9e37_79b9;
    PixelBuffer::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgba8::opaque(r, g, b)
    })
}

/// A raw-buffer source image
pub fn raw_source(pixels: &PixelBuffer) -> Value {
    json!({
        "width": pixels.width(),
        "height": pixels.height(),
        "data": STANDARD.encode(pixels.data()),
    })
}

/// A PNG source image
pub fn png_source(pixels: &PixelBuffer) -> Value {
    let png = encode_png(pixels).expect("encode fixture");
    json!({ "png": STANDARD.encode(png) })
}

/// A `process` message; `None` fields are omitted
pub fn process(
    job_id: u64,
    block_size: u32,
    source: Option<Value>,
    palette: Option<&[u8]>,
    mapper: Option<&str>,
) -> Value {
    let mut message = json!({
        "type": "process",
        "jobId": job_id,
        "blockSize": block_size,
    });
    if let Some(source) = source {
        message["sourceImage"] = source;
    }
    if let Some(palette) = palette {
        message["palette"] = json!(palette);
        message["colorizeEnabled"] = json!(true);
    }
    if let Some(mapper) = mapper {
        message["mapper"] = json!(mapper);
    }
    message
}

pub fn cancel(job_id: u64) -> Value {
    json!({ "type": "cancel", "jobId": job_id })
}

pub fn generate_export(job_id: u64) -> Value {
    json!({ "type": "generateExport", "jobId": job_id })
}

/// Decode the base64 `pixels` of a result event
pub fn result_pixels(event: &Value) -> Vec<u8> {
    STANDARD
        .decode(event["pixels"].as_str().expect("pixels field"))
        .expect("valid base64")
}
