use image::{DynamicImage, GrayImage, RgbImage};

pub const MAX_POSTERIZE_BITS: u8 = 8;

/// Keep only the top `bits` bits of every channel.
pub fn posterize(image: &mut RgbImage, bits: u8) {
    let bits = bits.clamp(1, MAX_POSTERIZE_BITS);
    let mask = (0xFFu16 << (8 - bits)) as u8;
    for channel in image.iter_mut() {
        *channel &= mask;
    }
}

/// Single-channel brightness of `image`, posterized first when `posterize_bits > 0`.
pub fn extract_brightness(image: &DynamicImage, posterize_bits: u8) -> GrayImage {
    if posterize_bits == 0 {
        return image.to_luma8();
    }

    let mut rgb = image.to_rgb8();
    posterize(&mut rgb, posterize_bits);
    DynamicImage::ImageRgb8(rgb).to_luma8()
}
