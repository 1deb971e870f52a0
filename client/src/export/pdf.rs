//! Just enough PDF 1.4 to put one JPEG and some Helvetica text on a page.

use std::fmt::Write as _;

use super::background::Rgb;
use super::layout::{A4_HEIGHT_PT, A4_WIDTH_PT};

/// A JPEG placed on the page, in PDF user space (origin bottom-left).
#[derive(Debug, Clone)]
pub struct PdfImage<'a> {
    pub jpeg: &'a [u8],
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfText {
    pub text: String,
    pub size: f64,
    pub x: f64,
    /// Baseline, in PDF user space.
    pub y: f64,
    pub color: Rgb,
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = b"%PDF-1.4\n".to_vec();
        // Binary marker so transfer tools keep the file 8-bit clean
        buf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn begin_object(&mut self) -> usize {
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf
            .extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        id
    }

    fn object(&mut self, body: &str) -> usize {
        let id = self.begin_object();
        self.buf.extend_from_slice(body.as_bytes());
        self.buf.extend_from_slice(b"\nendobj\n");
        id
    }

    fn stream(&mut self, dict: &str, data: &[u8]) -> usize {
        let id = self.begin_object();
        self.buf
            .extend_from_slice(format!("<< {} /Length {} >>\nstream\n", dict, data.len()).as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
        id
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            let _ = writeln!(xref, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.offsets.len() + 1,
            root,
            info,
            xref_offset
        );
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// Writes a single A4 page with `image` drawn first and `texts` on top.
pub fn write_single_page(title: &str, image: &PdfImage<'_>, texts: &[PdfText]) -> Vec<u8> {
    let mut pdf = PdfWriter::new();

    // Object ids are assigned in write order, so the references below are
    // known up front.
    let catalog = pdf.object("<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object("<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    pdf.object(&format!(
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
         /Resources << /XObject << /Im1 4 0 R >> /Font << /F1 5 0 R >> >> \
         /Contents 6 0 R >>",
        num(A4_WIDTH_PT),
        num(A4_HEIGHT_PT)
    ));
    pdf.stream(
        &format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode",
            image.pixel_width, image.pixel_height
        ),
        image.jpeg,
    );
    pdf.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>");
    pdf.stream("", page_content(image, texts).as_bytes());
    let info = pdf.object(&format!(
        "<< /Title ({}) /Producer (Invitely) >>",
        escape_text(title)
    ));

    pdf.finish(catalog, info)
}

fn page_content(image: &PdfImage<'_>, texts: &[PdfText]) -> String {
    let mut content = String::new();
    let _ = writeln!(content, "q");
    let _ = writeln!(
        content,
        "{} 0 0 {} {} {} cm",
        num(image.width),
        num(image.height),
        num(image.x),
        num(image.y)
    );
    let _ = writeln!(content, "/Im1 Do");
    let _ = writeln!(content, "Q");

    for text in texts {
        let [r, g, b] = text.color.map(|c| c as f64 / 255.0);
        let _ = writeln!(content, "BT");
        let _ = writeln!(content, "/F1 {} Tf", num(text.size));
        let _ = writeln!(content, "{} {} {} rg", num(r), num(g), num(b));
        let _ = writeln!(content, "1 0 0 1 {} {} Tm", num(text.x), num(text.y));
        let _ = writeln!(content, "({}) Tj", escape_text(&text.text));
        let _ = writeln!(content, "ET");
    }
    content
}

fn num(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Encodes text as a PDF literal string in WinAnsi. Characters outside
/// the encoding become `?`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' | '\r' | '\t' => out.push(' '),
            ' '..='~' => out.push(c),
            _ => match win_ansi_byte(c) {
                Some(byte) => {
                    let _ = write!(out, "\\{:03o}", byte);
                }
                None => out.push('?'),
            },
        }
    }
    out
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        _ => return None,
    };
    Some(byte)
}
