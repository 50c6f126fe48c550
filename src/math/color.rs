/// Splits a packed `0xRRGGBB` value into sRGB components in [0, 1]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Packed sRGB hex color to linear RGB, the space the shaders light in
pub fn hex_to_linear_rgb(hex: u32) -> [f32; 3] {
    hex_to_rgb(hex).map(srgb_to_linear)
}
