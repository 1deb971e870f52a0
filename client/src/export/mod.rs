//! PDF export of an invitation card.
//!
//! The card is rasterized at twice its CSS size, encoded as JPEG and
//! centered on an A4 page; the card text is drawn over it as real PDF text.

pub mod background;
pub mod layout;
pub mod pdf;
pub mod preview;
pub mod raster;

use image::{codecs::jpeg::JpegEncoder, RgbImage};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use self::background::Backdrop;
use self::layout::{layout_card, PagePlacement, TextRun};
use self::pdf::{write_single_page, PdfImage, PdfText};
use self::preview::PreviewCard;
use self::raster::{rasterize, PIXEL_RATIO};

pub const DEFAULT_PDF_FILENAME: &str = "invitation.pdf";

const JPEG_QUALITY: u8 = 92;
const MAX_FILENAME_STEM: usize = 80;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: {0}")]
    MissingPreview(String),

    #[error("Background could not be loaded: {0}")]
    Background(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub fn export_invitation_pdf(
    card: &PreviewCard,
    backdrop: &Backdrop,
) -> Result<ExportedPdf, ExportError> {
    let layout = layout_card(card);
    let bitmap = rasterize(backdrop, &layout, PIXEL_RATIO);
    let jpeg = encode_jpeg(&bitmap)?;

    let placement = PagePlacement::for_image(bitmap.width(), bitmap.height());
    let image = PdfImage {
        jpeg: &jpeg,
        pixel_width: bitmap.width(),
        pixel_height: bitmap.height(),
        x: placement.x,
        y: placement.pdf_bottom(),
        width: placement.width,
        height: placement.height,
    };
    let texts: Vec<PdfText> = layout
        .runs
        .iter()
        .map(|run| text_on_page(run, &placement))
        .collect();

    let bytes = write_single_page(card.display_title(), &image, &texts);
    debug!(
        "Rendered PDF: {} bytes, jpeg {} bytes, {} text runs",
        bytes.len(),
        jpeg.len(),
        texts.len()
    );

    Ok(ExportedPdf {
        filename: pdf_filename(&card.title),
        bytes,
    })
}

/// Writes the PDF into `dir`, creating the directory if needed.
pub fn save_pdf(pdf: &ExportedPdf, dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&pdf.filename);
    fs::write(&path, &pdf.bytes)?;
    Ok(path)
}

/// File name derived from the title: letters and digits are kept, runs of
/// whitespace, `-` and `_` become one `-`, everything else is dropped.
pub fn pdf_filename(title: &str) -> String {
    let mut stem = String::new();
    for c in title.chars() {
        if c.is_alphanumeric() {
            stem.push(c);
        } else if (c.is_whitespace() || c == '-' || c == '_') && !stem.ends_with('-') {
            stem.push('-');
        }
    }

    let stem: String = stem.trim_matches('-').chars().take(MAX_FILENAME_STEM).collect();
    let stem = stem.trim_end_matches('-');
    if stem.is_empty() {
        DEFAULT_PDF_FILENAME.to_string()
    } else {
        format!("{}.pdf", stem)
    }
}

fn encode_jpeg(bitmap: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(bitmap)?;
    Ok(jpeg)
}

fn text_on_page(run: &TextRun, placement: &PagePlacement) -> PdfText {
    let (x, y) = placement.card_to_pdf(run.x, run.baseline);
    PdfText {
        text: run.text.clone(),
        size: run.size as f64 * placement.card_scale(),
        x,
        y,
        color: run.color,
    }
}
