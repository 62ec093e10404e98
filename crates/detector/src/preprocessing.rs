use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::RgbImage;
use ndarray::{Array, IxDyn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("undecodable image: {0}")]
    UndecodableImage(#[from] image::ImageError),
}

/// Decode a base64 image payload into raw RGB pixels.
///
/// Fails on malformed base64 or an image the decoder cannot read; a bad
/// payload never yields a blank placeholder image.
pub fn decode_image(data: &str) -> Result<RgbImage, DecodeError> {
    let bytes = BASE64.decode(data.trim())?;
    let img = image::load_from_memory(&bytes)?;
    Ok(img.to_rgb8())
}

/// Resize to the model's square input, subtract per-channel means and
/// lay the result out as a 1x3xSxS f32 tensor.
pub fn to_input_tensor(
    img: &RgbImage,
    input_size: u32,
    pixel_means: [f32; 3],
) -> Array<f32, IxDyn> {
    let resized = image::imageops::resize(
        img,
        input_size,
        input_size,
        image::imageops::FilterType::Triangle,
    );

    let size = input_size as usize;
    let mut input = Array::zeros(IxDyn(&[1, 3, size, size]));
    for y in 0..input_size {
        for x in 0..input_size {
            let pixel = resized.get_pixel(x, y);
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 - pixel_means[0];
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 - pixel_means[1];
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 - pixel_means[2];
        }
    }

    input
}
