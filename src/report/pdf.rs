use std::io::BufWriter;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use super::{Block, Report};

// US Letter with one-inch margins, in millimetres.
const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 25.4;
const MM_PER_PT: f32 = 25.4 / 72.0;
const IMAGE_DPI: f32 = 300.0;

const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const MONO_SIZE: f32 = 7.0;

/// Render `report` and write it to `path`, replacing any existing file.
pub fn write_pdf(report: &Report, path: &Path) -> Result<()> {
    let bytes = render(report)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Report saved to {}", path.display());
    Ok(())
}

/// Lay out every block on as many pages as needed. Returns PDF bytes.
pub fn render(report: &Report) -> Result<Vec<u8>> {
    render_paged(report).map(|(bytes, _)| bytes)
}

fn render_paged(report: &Report) -> Result<(Vec<u8>, usize)> {
    let (doc, page1, layer1) =
        PdfDocument::new(&report.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let fonts = Fonts {
        regular: builtin(&doc, BuiltinFont::Helvetica)?,
        bold: builtin(&doc, BuiltinFont::HelveticaBold)?,
        mono: builtin(&doc, BuiltinFont::Courier)?,
    };

    let mut page = PageCursor {
        doc: &doc,
        layer,
        y: PAGE_HEIGHT - MARGIN,
        pages: 1,
    };
    for block in &report.blocks {
        page.block(block, &fonts)?;
    }
    let pages = page.pages;
    log::debug!("Laid out {} blocks on {pages} pages", report.blocks.len());

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf).map_err(|e| anyhow!("PDF save error: {e}"))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| anyhow!("PDF buffer error: {e}"))?;
    Ok((bytes, pages))
}

fn builtin(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| anyhow!("PDF font error: {e}"))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

// ---------------------------------------------------------------------------
// Flow layout
// ---------------------------------------------------------------------------

/// Current page and the top of the free space on it.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl PageCursor<'_> {
    fn usable_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    /// Start a new page unless `height` still fits, or the page is empty.
    fn reserve(&mut self, height: f32) {
        let at_top = self.y >= PAGE_HEIGHT - MARGIN;
        if self.y - height < MARGIN && !at_top {
            self.pages += 1;
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Page {}", self.pages),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn line(&mut self, text: &str, size: f32, leading: f32, font: &IndirectFontRef) {
        let leading = leading * MM_PER_PT;
        self.reserve(leading);
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.y - size * MM_PER_PT), font);
        self.y -= leading;
    }

    fn block(&mut self, block: &Block, fonts: &Fonts) -> Result<()> {
        match block {
            Block::Heading(text) => {
                self.y -= 6.0 * MM_PER_PT;
                self.line(text, HEADING_SIZE, 18.0, &fonts.bold);
                self.y -= 4.0 * MM_PER_PT;
            }
            Block::Paragraph(text) => {
                // Helvetica averages about half an em per character.
                let max_chars = (Self::usable_width() / (BODY_SIZE * 0.5 * MM_PER_PT)) as usize;
                for line in wrap_text(text, max_chars) {
                    self.line(&line, BODY_SIZE, 12.0, &fonts.regular);
                }
            }
            Block::Preformatted(text) => {
                // Courier glyphs are 0.6 em wide.
                let max_chars = (Self::usable_width() / (MONO_SIZE * 0.6 * MM_PER_PT)) as usize;
                for raw in text.lines() {
                    for line in hard_wrap(raw, max_chars) {
                        self.line(&line, MONO_SIZE, 8.5, &fonts.mono);
                    }
                }
            }
            Block::Spacer(points) => {
                self.y -= points * MM_PER_PT;
            }
            Block::Image {
                path,
                width,
                height,
            } => self.image(path, *width, *height)?,
        }
        Ok(())
    }

    fn image(&mut self, path: &Path, width: f32, height: f32) -> Result<()> {
        let decoded = image::open(path)
            .with_context(|| format!("reading image {}", path.display()))?;
        let pixels = decoded.to_rgb8();
        let (px_w, px_h) = (pixels.width() as f32, pixels.height() as f32);
        let rgb = image::DynamicImage::ImageRgb8(pixels);

        let (w_mm, h_mm) = (width * MM_PER_PT, height * MM_PER_PT);
        self.reserve(h_mm);
        let natural = |px: f32| px / IMAGE_DPI * 25.4;

        Image::from_dynamic_image(&rgb).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm((PAGE_WIDTH - w_mm) / 2.0)),
                translate_y: Some(Mm(self.y - h_mm)),
                scale_x: Some(w_mm / natural(px_w)),
                scale_y: Some(h_mm / natural(px_h)),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        self.y -= h_mm;
        Ok(())
    }
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Split a preformatted line into `max_chars` pieces without touching spacing.
fn hard_wrap(line: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() || max_chars == 0 {
        return vec![line.to_string()];
    }
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_text_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.len() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn hard_wrap_keeps_spacing() {
        assert_eq!(hard_wrap("ab  cd", 3), vec!["ab ", " cd"]);
        assert_eq!(hard_wrap("", 3), vec![""]);
    }

    #[test]
    fn long_reports_flow_onto_more_pages() {
        let report = Report {
            title: "t".into(),
            blocks: (0..200)
                .map(|i| Block::Paragraph(format!("line {i}")))
                .collect(),
        };
        let (bytes, pages) = render_paged(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(pages > 1, "only {pages} page(s)");
    }

    #[test]
    fn write_pdf_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let report = Report {
            title: "t".into(),
            blocks: vec![Block::Heading("Dataset Info".into())],
        };
        write_pdf(&report, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
