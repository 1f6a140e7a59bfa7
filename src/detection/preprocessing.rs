use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Convert image to grayscale using BT.601 luma weights
/// (0.299 R + 0.587 G + 0.114 B, 14-bit fixed point)
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << 13)) >> 14;
        Luma([luma as u8])
    })
}

/// Binarize with Otsu's level, inverted: pixels at or below the level
/// become foreground (255), brighter pixels become background (0).
/// Returns the mask and the chosen level.
pub fn otsu_binarize_inv(gray: &GrayImage) -> (GrayImage, u8) {
    let level = otsu_level(gray);

    let mut binary = gray.clone();
    for p in binary.pixels_mut() {
        *p = if p.0[0] <= level { Luma([255]) } else { Luma([0]) };
    }

    (binary, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_grayscale_weights() {
        let mut img = RgbImage::new(4, 1);
        img.put_pixel(0, 0, Rgb([255, 255, 255]));
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        img.put_pixel(2, 0, Rgb([0, 255, 0]));
        img.put_pixel(3, 0, Rgb([0, 0, 255]));

        let gray = to_grayscale(&DynamicImage::ImageRgb8(img));
        assert_eq!(gray.get_pixel(0, 0)[0], 255);
        assert_eq!(gray.get_pixel(1, 0)[0], 76);
        assert_eq!(gray.get_pixel(2, 0)[0], 150);
        assert_eq!(gray.get_pixel(3, 0)[0], 29);
    }

    #[test]
    fn test_dark_pixels_become_foreground() {
        let mut gray = GrayImage::from_pixel(10, 10, Luma([230]));
        for y in 2..5 {
            for x in 2..5 {
                gray.put_pixel(x, y, Luma([20]));
            }
        }

        let (binary, level) = otsu_binarize_inv(&gray);
        assert!(level >= 20 && level < 230);
        assert_eq!(binary.get_pixel(3, 3)[0], 255);
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.pixels().filter(|p| p[0] == 255).count(), 9);
    }
}
