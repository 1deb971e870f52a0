//! Parsing of the `background_image_url` values an invitation can carry:
//! a CSS `linear-gradient(...)`, a plain color, an inline `data:` image or
//! a remote image URL.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;

use super::ExportError;

pub type Rgb = [u8; 3];

#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub color: Rgb,
    /// Position along the gradient line, 0.0 to 1.0.
    pub position: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// CSS angle: 0 points up, 90 points right.
    pub angle_deg: f32,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn solid(color: Rgb) -> Self {
        Self {
            angle_deg: 180.0,
            stops: vec![
                ColorStop { color, position: 0.0 },
                ColorStop { color, position: 1.0 },
            ],
        }
    }

    /// Parses `linear-gradient(<angle or direction>?, <stop>, <stop>, ...)`.
    pub fn parse(css: &str) -> Result<Self, ExportError> {
        let css = css.trim();
        let inner = strip_function(css, "linear-gradient")
            .ok_or_else(|| ExportError::Background(format!("not a linear gradient: {}", css)))?;

        let mut args = split_top_level(inner);
        if args.is_empty() {
            return Err(ExportError::Background("empty gradient".to_string()));
        }

        let angle_deg = match parse_angle(args[0]) {
            Some(angle) => {
                args.remove(0);
                angle
            }
            None => 180.0,
        };

        let mut raw_stops = args
            .into_iter()
            .map(parse_stop)
            .collect::<Result<Vec<_>, _>>()?;
        match raw_stops.len() {
            0 => return Err(ExportError::Background("gradient has no colors".to_string())),
            1 => raw_stops.push(raw_stops[0]),
            _ => {}
        }

        Ok(Self {
            angle_deg,
            stops: resolve_positions(&raw_stops),
        })
    }

    /// Color at position `t` along the gradient line.
    pub fn color_at(&self, t: f32) -> Rgb {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return [255, 255, 255],
        };
        if t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.position {
                let span = b.position - a.position;
                let f = if span <= f32::EPSILON {
                    1.0
                } else {
                    (t - a.position) / span
                };
                return lerp_rgb(a.color, b.color, f);
            }
        }
        last.color
    }
}

/// Where the pixels of a background come from.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundSource {
    Gradient(LinearGradient),
    Inline(Vec<u8>),
    Remote(String),
}

impl BackgroundSource {
    pub fn parse(value: &str) -> Result<Self, ExportError> {
        let value = value.trim();
        let lower = value.to_ascii_lowercase();

        if lower.starts_with("linear-gradient(") {
            return LinearGradient::parse(value).map(BackgroundSource::Gradient);
        }
        if lower.starts_with("data:") {
            return decode_data_uri(value).map(BackgroundSource::Inline);
        }
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(BackgroundSource::Remote(value.to_string()));
        }
        if let Some(color) = parse_color(value) {
            return Ok(BackgroundSource::Gradient(LinearGradient::solid(color)));
        }

        Err(ExportError::Background(format!(
            "unsupported background: {}",
            value
        )))
    }
}

/// A background ready to be painted.
#[derive(Debug, Clone)]
pub enum Backdrop {
    Gradient(LinearGradient),
    Image(DynamicImage),
}

impl Backdrop {
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self, ExportError> {
        Ok(Backdrop::Image(image::load_from_memory(bytes)?))
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ExportError> {
    let (header, data) = uri
        .split_once(',')
        .ok_or_else(|| ExportError::Background("malformed data URI".to_string()))?;
    if !header.to_ascii_lowercase().ends_with(";base64") {
        return Err(ExportError::Background(
            "only base64 data URIs are supported".to_string(),
        ));
    }

    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| ExportError::Background(format!("invalid base64 image data: {}", e)))
}

fn strip_function<'a>(css: &'a str, name: &str) -> Option<&'a str> {
    let open = css.find('(')?;
    if !css[..open].trim().eq_ignore_ascii_case(name) || !css.ends_with(')') {
        return None;
    }
    Some(&css[open + 1..css.len() - 1])
}

/// Splits on commas that are not nested inside parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

fn parse_angle(arg: &str) -> Option<f32> {
    let arg = arg.trim().to_ascii_lowercase();
    if let Some(deg) = arg.strip_suffix("deg") {
        return deg.trim().parse().ok();
    }
    if let Some(turn) = arg.strip_suffix("turn") {
        return turn.trim().parse::<f32>().ok().map(|t| t * 360.0);
    }

    let direction = arg.strip_prefix("to ")?;
    let mut words: Vec<&str> = direction.split_whitespace().collect();
    words.sort_unstable();
    match words.as_slice() {
        ["top"] => Some(0.0),
        ["right", "top"] => Some(45.0),
        ["right"] => Some(90.0),
        ["bottom", "right"] => Some(135.0),
        ["bottom"] => Some(180.0),
        ["bottom", "left"] => Some(225.0),
        ["left"] => Some(270.0),
        ["left", "top"] => Some(315.0),
        _ => None,
    }
}

fn parse_stop(arg: &str) -> Result<(Rgb, Option<f32>), ExportError> {
    let (color_part, position) = match arg.rsplit_once(char::is_whitespace) {
        Some((color, pos)) if pos.ends_with('%') => {
            let pct: f32 = pos
                .trim_end_matches('%')
                .parse()
                .map_err(|_| ExportError::Background(format!("bad stop position: {}", pos)))?;
            (color.trim(), Some(pct / 100.0))
        }
        _ => (arg, None),
    };

    let color = parse_color(color_part)
        .ok_or_else(|| ExportError::Background(format!("unsupported color: {}", color_part)))?;
    Ok((color, position))
}

/// Hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()` and a
/// few keywords. Alpha is ignored.
pub fn parse_color(value: &str) -> Option<Rgb> {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        return match digits.len() {
            3 | 4 => Some([digits[0] * 17, digits[1] * 17, digits[2] * 17]),
            6 | 8 => Some([
                digits[0] * 16 + digits[1],
                digits[2] * 16 + digits[3],
                digits[4] * 16 + digits[5],
            ]),
            _ => None,
        };
    }

    if let Some(args) = strip_function(&value, "rgb").or_else(|| strip_function(&value, "rgba")) {
        let channels: Vec<u8> = args
            .split([',', ' ', '/'])
            .filter(|p| !p.is_empty())
            .take(3)
            .map(|p| p.trim().parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8))
            .collect::<Option<_>>()?;
        return match channels.as_slice() {
            [r, g, b] => Some([*r, *g, *b]),
            _ => None,
        };
    }

    match value.as_str() {
        "white" | "transparent" => Some([255, 255, 255]),
        "black" => Some([0, 0, 0]),
        _ => None,
    }
}

/// Fills in omitted stop positions the way CSS does: the ends default to
/// 0% and 100% and gaps are spread evenly between known positions.
fn resolve_positions(raw: &[(Rgb, Option<f32>)]) -> Vec<ColorStop> {
    let last_index = raw.len() - 1;
    let mut positions: Vec<Option<f32>> = raw.iter().map(|(_, p)| *p).collect();
    positions[0] = positions[0].or(Some(0.0));
    positions[last_index] = positions[last_index].or(Some(1.0));

    let mut i = 0;
    while i < last_index {
        let start = positions[i].unwrap_or(0.0);
        let next_known = (i + 1..=last_index)
            .find(|&j| positions[j].is_some())
            .unwrap_or(last_index);
        let end = positions[next_known].unwrap_or(1.0);
        let steps = (next_known - i) as f32;
        for (k, slot) in positions[i + 1..next_known].iter_mut().enumerate() {
            *slot = Some(start + (end - start) * (k as f32 + 1.0) / steps);
        }
        i = next_known;
    }

    let mut previous = 0.0f32;
    raw.iter()
        .zip(positions)
        .map(|((color, _), position)| {
            let position = position.unwrap_or(previous).max(previous);
            previous = position;
            ColorStop {
                color: *color,
                position,
            }
        })
        .collect()
}

fn lerp_rgb(a: Rgb, b: Rgb, f: f32) -> Rgb {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * f).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use invitely_shared::backgrounds::default_background_for;
    use invitely_shared::models::EventType;

    #[test]
    fn test_parses_every_default_background() {
        for event_type in EventType::ALL {
            let source = BackgroundSource::parse(default_background_for(event_type)).unwrap();
            let BackgroundSource::Gradient(gradient) = source else {
                panic!("expected a gradient for {}", event_type);
            };
            assert_eq!(gradient.angle_deg, 135.0);
            assert_eq!(gradient.stops.len(), 2);
        }
    }

    #[test]
    fn test_gradient_stops() {
        let gradient = LinearGradient::parse("linear-gradient(135deg,#f59e0b,#f472b6)").unwrap();
        assert_eq!(gradient.stops[0].color, [0xf5, 0x9e, 0x0b]);
        assert_eq!(gradient.stops[0].position, 0.0);
        assert_eq!(gradient.stops[1].color, [0xf4, 0x72, 0xb6]);
        assert_eq!(gradient.stops[1].position, 1.0);
    }

    #[test]
    fn test_gradient_with_direction_and_positions() {
        let gradient = LinearGradient::parse(
            "linear-gradient(to bottom right, rgb(255, 0, 0) 10%, #fff, rgba(0,0,0,0.5) 90%)",
        )
        .unwrap();
        assert_eq!(gradient.angle_deg, 135.0);
        let positions: Vec<f32> = gradient.stops.iter().map(|s| s.position).collect();
        assert_eq!(positions.len(), 3);
        assert!((positions[0] - 0.1).abs() < 1e-6);
        assert!((positions[1] - 0.5).abs() < 1e-6);
        assert!((positions[2] - 0.9).abs() < 1e-6);
        assert_eq!(gradient.stops[0].color, [255, 0, 0]);
        assert_eq!(gradient.stops[2].color, [0, 0, 0]);
    }

    #[test]
    fn test_gradient_without_angle_points_down() {
        let gradient = LinearGradient::parse("linear-gradient(#000, #fff)").unwrap();
        assert_eq!(gradient.angle_deg, 180.0);
    }

    #[test]
    fn test_color_at() {
        let gradient = LinearGradient::parse("linear-gradient(90deg,#000000,#ffffff)").unwrap();
        assert_eq!(gradient.color_at(-1.0), [0, 0, 0]);
        assert_eq!(gradient.color_at(0.5), [128, 128, 128]);
        assert_eq!(gradient.color_at(2.0), [255, 255, 255]);
    }

    #[test]
    fn test_rejects_unsupported_values() {
        assert!(matches!(
            BackgroundSource::parse("radial-gradient(#fff, #000)"),
            Err(ExportError::Background(_))
        ));
        assert!(LinearGradient::parse("linear-gradient(135deg, chartreuse, #fff)").is_err());
        assert!(BackgroundSource::parse("data:image/png,rawbytes").is_err());
        assert!(BackgroundSource::parse("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_other_sources() {
        assert_eq!(
            BackgroundSource::parse("https://cdn.example.com/bg.png").unwrap(),
            BackgroundSource::Remote("https://cdn.example.com/bg.png".to_string())
        );
        assert_eq!(
            BackgroundSource::parse("data:image/png;base64,aGVsbG8=").unwrap(),
            BackgroundSource::Inline(b"hello".to_vec())
        );
        assert_eq!(
            BackgroundSource::parse("#336699").unwrap(),
            BackgroundSource::Gradient(LinearGradient::solid([0x33, 0x66, 0x99]))
        );
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#abc"), Some([0xaa, 0xbb, 0xcc]));
        assert_eq!(parse_color("#AABBCCDD"), Some([0xaa, 0xbb, 0xcc]));
        assert_eq!(parse_color("rgb(1 2 3 / 50%)"), Some([1, 2, 3]));
        assert_eq!(parse_color("#abcde"), None);
        assert_eq!(parse_color("#ggg"), None);
    }
}
