use image::{imageops::FilterType, Rgb as Pixel, RgbImage};

use super::background::{Backdrop, LinearGradient, Rgb};
use super::layout::{CardLayout, Rect, CARD_HEIGHT, CARD_WIDTH};

/// Device pixels per card pixel.
pub const PIXEL_RATIO: u32 = 2;

const VEIL_COLOR: Rgb = [255, 255, 255];
const VEIL_ALPHA: f32 = 0.6;
const BADGE_COLOR: Rgb = [0x11, 0x18, 0x27];
const BADGE_ALPHA: f32 = 0.8;

/// Paints the card background, the white veil and the badge pill. Text is
/// left to the PDF so it stays selectable.
pub fn rasterize(backdrop: &Backdrop, layout: &CardLayout, ratio: u32) -> RgbImage {
    let width = CARD_WIDTH * ratio;
    let height = CARD_HEIGHT * ratio;

    let mut bitmap = match backdrop {
        Backdrop::Gradient(gradient) => paint_gradient(gradient, width, height),
        Backdrop::Image(image) => image
            .resize_to_fill(width, height, FilterType::Triangle)
            .to_rgb8(),
    };

    for pixel in bitmap.pixels_mut() {
        pixel.0 = blend(pixel.0, VEIL_COLOR, VEIL_ALPHA);
    }

    if let Some(badge) = &layout.badge {
        fill_pill(&mut bitmap, badge, ratio as f32, BADGE_COLOR, BADGE_ALPHA);
    }

    bitmap
}

/// CSS gradient geometry: the gradient line passes through the center at
/// `angle_deg` and is long enough for the corners to hit the end colors.
fn paint_gradient(gradient: &LinearGradient, width: u32, height: u32) -> RgbImage {
    let angle = gradient.angle_deg.to_radians();
    let (dx, dy) = (angle.sin(), -angle.cos());
    let (w, h) = (width as f32, height as f32);
    let length = (w * dx).abs() + (h * dy).abs();

    RgbImage::from_fn(width, height, |x, y| {
        let px = x as f32 + 0.5 - w / 2.0;
        let py = y as f32 + 0.5 - h / 2.0;
        let t = if length > 0.0 {
            (px * dx + py * dy) / length + 0.5
        } else {
            0.5
        };
        Pixel(gradient.color_at(t))
    })
}

fn fill_pill(bitmap: &mut RgbImage, rect: &Rect, scale: f32, color: Rgb, alpha: f32) {
    let (x0, y0) = (rect.x * scale, rect.y * scale);
    let (x1, y1) = (x0 + rect.width * scale, y0 + rect.height * scale);
    let radius = (rect.height * scale) / 2.0;

    let x_range = x0.floor().max(0.0) as u32..(x1.ceil() as u32).min(bitmap.width());
    let y_range = y0.floor().max(0.0) as u32..(y1.ceil() as u32).min(bitmap.height());

    for y in y_range {
        for x in x_range.clone() {
            let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
            if cx < x0 || cx > x1 || cy < y0 || cy > y1 {
                continue;
            }
            // Distance to the nearest point of the pill's center segment
            let nearest_x = cx.clamp(x0 + radius, (x1 - radius).max(x0 + radius));
            let dist = ((cx - nearest_x).powi(2) + (cy - (y0 + radius)).powi(2)).sqrt();
            if dist <= radius {
                let pixel = bitmap.get_pixel_mut(x, y);
                pixel.0 = blend(pixel.0, color, alpha);
            }
        }
    }
}

fn blend(base: Rgb, over: Rgb, alpha: f32) -> Rgb {
    let mix = |b: u8, o: u8| (b as f32 * (1.0 - alpha) + o as f32 * alpha).round() as u8;
    [mix(base[0], over[0]), mix(base[1], over[1]), mix(base[2], over[2])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer};

    fn empty_layout() -> CardLayout {
        CardLayout {
            runs: Vec::new(),
            badge: None,
        }
    }

    #[test]
    fn test_size_follows_pixel_ratio() {
        let backdrop = Backdrop::Gradient(LinearGradient::solid([0, 0, 0]));
        let bitmap = rasterize(&backdrop, &empty_layout(), PIXEL_RATIO);
        assert_eq!(bitmap.dimensions(), (1280, 960));
    }

    #[test]
    fn test_veil_lightens_background() {
        let backdrop = Backdrop::Gradient(LinearGradient::solid([0, 0, 0]));
        let bitmap = rasterize(&backdrop, &empty_layout(), 1);
        assert_eq!(bitmap.get_pixel(10, 10).0, [153, 153, 153]);
    }

    #[test]
    fn test_diagonal_gradient_runs_top_left_to_bottom_right() {
        let gradient = LinearGradient::parse("linear-gradient(135deg,#000000,#ffffff)").unwrap();
        let bitmap = paint_gradient(&gradient, 640, 480);

        let top_left = bitmap.get_pixel(0, 0).0[0];
        let center = bitmap.get_pixel(320, 240).0[0];
        let bottom_right = bitmap.get_pixel(639, 479).0[0];
        assert!(top_left < 5);
        assert!((120..=135).contains(&center));
        assert!(bottom_right > 250);
    }

    #[test]
    fn test_vertical_gradient_is_constant_across_rows() {
        let gradient = LinearGradient::parse("linear-gradient(180deg,#000000,#ffffff)").unwrap();
        let bitmap = paint_gradient(&gradient, 64, 48);

        assert_eq!(bitmap.get_pixel(0, 10), bitmap.get_pixel(63, 10));
        assert!(bitmap.get_pixel(5, 0).0[0] < bitmap.get_pixel(5, 47).0[0]);
    }

    #[test]
    fn test_image_backdrop_covers_card() {
        let red: RgbImage = ImageBuffer::from_pixel(4, 2, Pixel([255, 0, 0]));
        let backdrop = Backdrop::Image(DynamicImage::ImageRgb8(red));
        let bitmap = rasterize(&backdrop, &empty_layout(), 1);

        assert_eq!(bitmap.dimensions(), (640, 480));
        assert_eq!(bitmap.get_pixel(0, 0).0, [255, 153, 153]);
        assert_eq!(bitmap.get_pixel(639, 479).0, [255, 153, 153]);
    }

    #[test]
    fn test_badge_is_darkened() {
        let backdrop = Backdrop::Gradient(LinearGradient::solid([255, 255, 255]));
        let layout = CardLayout {
            runs: Vec::new(),
            badge: Some(Rect {
                x: 100.0,
                y: 100.0,
                width: 80.0,
                height: 20.0,
            }),
        };
        let bitmap = rasterize(&backdrop, &layout, 2);

        let inside = bitmap.get_pixel(280, 220).0;
        assert!(inside[0] < 80);
        // Rounded corner stays uncovered
        assert_eq!(bitmap.get_pixel(201, 201).0, [255, 255, 255]);
        assert_eq!(bitmap.get_pixel(50, 50).0, [255, 255, 255]);
    }
}
