//! Geometry of the export: where text sits on the 640x480 card, and where
//! the rendered card sits on an A4 page.

use super::background::Rgb;
use super::preview::PreviewCard;

pub const CARD_WIDTH: u32 = 640;
pub const CARD_HEIGHT: u32 = 480;

pub const A4_WIDTH_PT: f64 = 595.28;
pub const A4_HEIGHT_PT: f64 = 841.89;
pub const PAGE_MARGIN_PT: f64 = 30.0;

const CARD_PADDING: f32 = 40.0;
const TITLE_SIZE: f32 = 40.0;
const TITLE_LINE_HEIGHT: f32 = 48.0;
const TITLE_MAX_LINES: usize = 3;
const DETAIL_SIZE: f32 = 16.0;
const DETAIL_LINE_HEIGHT: f32 = 24.0;
const BADGE_SIZE: f32 = 12.0;
const BADGE_PAD_X: f32 = 12.0;
const BADGE_PAD_Y: f32 = 6.0;
const BLOCK_GAP: f32 = 16.0;

const TITLE_COLOR: Rgb = [0x11, 0x18, 0x27];
const DETAIL_COLOR: Rgb = [0x37, 0x41, 0x51];
const BADGE_TEXT_COLOR: Rgb = [0xff, 0xff, 0xff];

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];
const FALLBACK_WIDTH: u16 = 556;

fn char_units(c: char) -> u32 {
    match c as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize] as u32,
        _ => FALLBACK_WIDTH as u32,
    }
}

/// Width of `text` set in Helvetica at `size`.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(char_units).sum();
    units as f32 * size / 1000.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub size: f32,
    /// Left edge, in card pixels.
    pub x: f32,
    /// Baseline, in card pixels from the top.
    pub baseline: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub runs: Vec<TextRun>,
    /// Pill behind the event type label.
    pub badge: Option<Rect>,
}

/// Centers the title, detail lines and badge as one block on the card.
pub fn layout_card(card: &PreviewCard) -> CardLayout {
    let max_width = CARD_WIDTH as f32 - 2.0 * CARD_PADDING;

    let title_lines = wrap_text(card.display_title(), TITLE_SIZE, max_width, TITLE_MAX_LINES);
    let details: Vec<String> = card
        .detail_lines()
        .iter()
        .map(|line| truncate_to_width(line, DETAIL_SIZE, max_width))
        .collect();
    let badge_label = card.badge_label();
    let badge_height = BADGE_SIZE + 2.0 * BADGE_PAD_Y;

    let mut height = title_lines.len() as f32 * TITLE_LINE_HEIGHT;
    if !details.is_empty() {
        height += BLOCK_GAP + details.len() as f32 * DETAIL_LINE_HEIGHT;
    }
    height += BLOCK_GAP * 1.5 + badge_height;

    let mut top = ((CARD_HEIGHT as f32 - height) / 2.0).max(0.0);
    let mut runs = Vec::new();

    for line in title_lines {
        runs.push(centered_run(line, TITLE_SIZE, TITLE_LINE_HEIGHT, top, TITLE_COLOR));
        top += TITLE_LINE_HEIGHT;
    }

    if !details.is_empty() {
        top += BLOCK_GAP;
        for line in details {
            runs.push(centered_run(line, DETAIL_SIZE, DETAIL_LINE_HEIGHT, top, DETAIL_COLOR));
            top += DETAIL_LINE_HEIGHT;
        }
    }

    top += BLOCK_GAP * 1.5;
    let label_width = text_width(&badge_label, BADGE_SIZE);
    let badge = Rect {
        x: (CARD_WIDTH as f32 - label_width) / 2.0 - BADGE_PAD_X,
        y: top,
        width: label_width + 2.0 * BADGE_PAD_X,
        height: badge_height,
    };
    runs.push(centered_run(
        badge_label,
        BADGE_SIZE,
        badge_height,
        top,
        BADGE_TEXT_COLOR,
    ));

    CardLayout {
        runs,
        badge: Some(badge),
    }
}

fn centered_run(text: String, size: f32, line_height: f32, top: f32, color: Rgb) -> TextRun {
    let width = text_width(&text, size);
    TextRun {
        x: (CARD_WIDTH as f32 - width) / 2.0,
        // Helvetica cap height is roughly 0.72 em
        baseline: top + (line_height + size * 0.72) / 2.0,
        size,
        color,
        text,
    }
}

/// Greedy word wrap. The last allowed line is truncated if text remains.
pub fn wrap_text(text: &str, size: f32, max_width: f32, max_lines: usize) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut overflowed = false;

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if text_width(&candidate, size) <= max_width {
            current = candidate;
        } else if lines.len() + 1 == max_lines {
            overflowed = true;
            break;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let last = lines.len().saturating_sub(1);
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if overflowed && i == last {
                force_ellipsis(&line, size, max_width)
            } else {
                truncate_to_width(&line, size, max_width)
            }
        })
        .collect()
}

/// Cuts `text` so it fits in `max_width`, marking the cut with "...".
pub fn truncate_to_width(text: &str, size: f32, max_width: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }
    force_ellipsis(text, size, max_width)
}

/// Longest prefix of `text` that still fits in `max_width` once "..." is
/// appended. Widths are summed in one pass.
fn force_ellipsis(text: &str, size: f32, max_width: f32) -> String {
    let mut used = 3 * char_units('.');
    let mut cut = 0;
    for (i, c) in text.char_indices() {
        used += char_units(c);
        if used as f32 * size / 1000.0 > max_width {
            break;
        }
        cut = i + c.len_utf8();
    }

    let kept = text[..cut].trim_end().trim_end_matches("...").trim_end();
    format!("{}...", kept)
}

/// The card image on the page, in points from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PagePlacement {
    /// Full page width minus the margins, aspect ratio kept, vertically
    /// centered but never closer than the margin to the top.
    pub fn for_image(pixel_width: u32, pixel_height: u32) -> Self {
        let width = A4_WIDTH_PT - 2.0 * PAGE_MARGIN_PT;
        let height = if pixel_width == 0 {
            0.0
        } else {
            width * pixel_height as f64 / pixel_width as f64
        };
        let y = ((A4_HEIGHT_PT - height) / 2.0).max(PAGE_MARGIN_PT);
        Self {
            x: PAGE_MARGIN_PT,
            y,
            width,
            height,
        }
    }

    /// Bottom edge in PDF user space, where y grows upwards.
    pub fn pdf_bottom(&self) -> f64 {
        A4_HEIGHT_PT - self.y - self.height
    }

    /// Maps a point on the card to PDF user space.
    pub fn card_to_pdf(&self, x: f32, y: f32) -> (f64, f64) {
        let scale = self.card_scale();
        (
            self.x + x as f64 * scale,
            A4_HEIGHT_PT - (self.y + y as f64 * scale),
        )
    }

    /// Points per card pixel.
    pub fn card_scale(&self) -> f64 {
        self.width / CARD_WIDTH as f64
    }
}
