//! `printpdf`-backed implementation of the document canvas.
//!
//! [`PdfCanvas`] keeps a cursor in millimetres from the top-left content
//! origin of an A4 page and translates cell, line and image operations into
//! `printpdf` primitives.  When a cell would cross the bottom margin the
//! canvas starts a fresh page first, so callers never see a page boundary.
//!
//! Text metrics are estimated from an average Helvetica glyph advance rather
//! than measured from font tables; the estimate only steers alignment and
//! wrapping, never clipping.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point, Polygon, Px, Rgb as PdfRgb,
};

use crate::canvas::{Align, CellStyle, DocumentCanvas, Edges, FontKind, Rgb};
use crate::error::CanvasError;
use crate::model::ImageSource;

/// Title stamped into the PDF metadata of rendered transcripts.
pub const DOCUMENT_TITLE: &str = "Transcript of Academic Records";

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN_LEFT: f64 = 15.0;
const MARGIN_TOP: f64 = 27.0;
const MARGIN_BOTTOM: f64 = 25.0;

const DEFAULT_LINE_HEIGHT: f64 = 6.0;
const CELL_PADDING: f64 = 1.0;
const PT_TO_MM: f64 = 25.4 / 72.0;
/// Average Helvetica glyph advance as a fraction of the font size.
const AVG_GLYPH_EM: f64 = 0.5;
/// Images are embedded at this resolution before scaling.
const IMAGE_BASE_DPI: f64 = 300.0;

/// A named section recorded during rendering, with the page it started on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionMark {
    /// Section title, e.g. a session label.
    pub title: String,
    /// 1-indexed page the section starts on.
    pub page: usize,
}

/// A finished document together with the section marks collected while
/// drawing it.
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    /// The serialized PDF.
    pub bytes: Vec<u8>,
    /// Sections recorded via [`DocumentCanvas::mark_section`].
    pub marks: Vec<SectionMark>,
}

/// Cursor-based drawing surface producing PDF bytes.
pub struct PdfCanvas {
    document: PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    x: f64,
    y: f64,
    last_height: f64,
    page_count: usize,
    marks: Vec<SectionMark>,
    pending_marks: Vec<String>,
}

impl PdfCanvas {
    /// Creates an empty A4 document with the given metadata title.
    pub fn new(title: impl Into<String>) -> Result<Self, CanvasError> {
        let (document, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH as f32),
            Mm(PAGE_HEIGHT as f32),
            "Page 1",
        );

        let regular = document
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|err| CanvasError::new(format!("Failed to load built-in Helvetica: {err}")))?;
        let bold = document.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|err| {
            CanvasError::new(format!("Failed to load built-in Helvetica Bold: {err}"))
        })?;

        Ok(Self {
            document,
            page,
            layer,
            regular,
            bold,
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            last_height: DEFAULT_LINE_HEIGHT,
            page_count: 1,
            marks: Vec::new(),
            pending_marks: Vec::new(),
        })
    }

    /// Returns the section marks resolved so far.  A mark settles on a page
    /// only once content follows it, so marks issued right before
    /// [`finish`](Self::finish) resolve there instead.
    pub fn marks(&self) -> &[SectionMark] {
        &self.marks
    }

    /// Serializes the document, consuming the canvas.
    pub fn finish(mut self) -> Result<RenderedDocument, CanvasError> {
        self.resolve_marks();
        let Self {
            document, marks, ..
        } = self;
        let bytes = document
            .save_to_bytes()
            .map_err(|err| CanvasError::new(format!("Failed to serialize PDF: {err}")))?;
        Ok(RenderedDocument { bytes, marks })
    }

    fn layer_ref(&self) -> PdfLayerReference {
        self.document.get_page(self.page).get_layer(self.layer)
    }

    fn font(&self, kind: FontKind) -> &IndirectFontRef {
        match kind {
            FontKind::Regular => &self.regular,
            FontKind::Bold => &self.bold,
        }
    }

    /// Starts a new page if `height` would cross the bottom margin.  The
    /// horizontal cursor is preserved, matching mid-row breaks of the page
    /// into a continued table.
    fn ensure_space(&mut self, height: f64) {
        if self.y + height <= PAGE_HEIGHT - MARGIN_BOTTOM {
            return;
        }
        let name = format!("Page {}", self.page_count + 1);
        let (page, layer) =
            self.document
                .add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), name);
        self.page = page;
        self.layer = layer;
        self.page_count += 1;
        self.y = MARGIN_TOP;
    }

    /// Settles pending section marks on the current page.  Runs after a
    /// possible page break, so a section marked just before content that no
    /// longer fits points at the page the content actually lands on.
    fn resolve_marks(&mut self) {
        for title in self.pending_marks.drain(..) {
            self.marks.push(SectionMark {
                title,
                page: self.page_count,
            });
        }
    }

    fn fill_rect(layer: &PdfLayerReference, x: f64, y_top: f64, width: f64, height: f64, color: Rgb) {
        layer.set_fill_color(pdf_color(color));
        let ring = vec![
            (point(x, y_top), false),
            (point(x + width, y_top), false),
            (point(x + width, y_top + height), false),
            (point(x, y_top + height), false),
        ];
        layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn stroke_edges(
        layer: &PdfLayerReference,
        x: f64,
        y_top: f64,
        width: f64,
        height: f64,
        border: Edges,
        style: &CellStyle,
    ) {
        if border == Edges::NONE {
            return;
        }
        layer.set_outline_color(pdf_color(style.draw_color));
        layer.set_outline_thickness((style.line_width / PT_TO_MM) as f32);

        let edges = [
            (border.left, (x, y_top), (x, y_top + height)),
            (border.top, (x, y_top), (x + width, y_top)),
            (border.right, (x + width, y_top), (x + width, y_top + height)),
            (border.bottom, (x, y_top + height), (x + width, y_top + height)),
        ];
        for (selected, from, to) in edges {
            if !selected {
                continue;
            }
            layer.add_line(Line {
                points: vec![(point(from.0, from.1), false), (point(to.0, to.1), false)],
                is_closed: false,
            });
        }
    }

    fn place_text(
        &self,
        layer: &PdfLayerReference,
        text: &str,
        width: f64,
        align: Align,
        style: &CellStyle,
        baseline_from_top: f64,
    ) {
        let text_width = text_width_mm(text, style.font_size);
        let x = match align {
            Align::Left => self.x + CELL_PADDING,
            Align::Center => self.x + ((width - text_width) / 2.0).max(CELL_PADDING),
            Align::Right => self.x + (width - text_width - CELL_PADDING).max(CELL_PADDING),
        };

        layer.set_fill_color(pdf_color(style.text_color));
        layer.use_text(
            text,
            style.font_size as f32,
            Mm(x as f32),
            Mm(pdf_y(baseline_from_top) as f32),
            self.font(style.font),
        );
    }
}

impl DocumentCanvas for PdfCanvas {
    fn draw_cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        border: Edges,
        align: Align,
        filled: bool,
        style: &CellStyle,
    ) -> Result<(), CanvasError> {
        self.ensure_space(height);
        self.resolve_marks();
        let layer = self.layer_ref();

        if filled && height > 0.0 {
            Self::fill_rect(&layer, self.x, self.y, width, height, style.fill_color);
        }
        Self::stroke_edges(&layer, self.x, self.y, width, height, border, style);

        if !text.is_empty() {
            let baseline = self.y + height / 2.0 + style.font_size * PT_TO_MM * 0.35;
            self.place_text(&layer, text, width, align, style, baseline);
        }

        self.x += width;
        if height > 0.0 {
            self.last_height = height;
        }
        Ok(())
    }

    fn draw_wrapping_cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        border: Edges,
        align: Align,
        filled: bool,
        style: &CellStyle,
    ) -> Result<(), CanvasError> {
        self.ensure_space(height);
        self.resolve_marks();
        let layer = self.layer_ref();

        if filled && height > 0.0 {
            Self::fill_rect(&layer, self.x, self.y, width, height, style.fill_color);
        }
        Self::stroke_edges(&layer, self.x, self.y, width, height, border, style);

        let usable = (width - 2.0 * CELL_PADDING).max(1.0);
        let glyph_advance = style.font_size * AVG_GLYPH_EM * PT_TO_MM;
        let max_chars = ((usable / glyph_advance).floor() as usize).max(1);
        let lines = wrap_text(text, max_chars);

        let line_height = style.font_size * PT_TO_MM * 1.3;
        let block_height = line_height * lines.len() as f64;
        let mut baseline =
            self.y + ((height - block_height) / 2.0).max(0.0) + line_height * 0.8;
        for line in &lines {
            if !line.is_empty() {
                self.place_text(&layer, line, width, align, style, baseline);
            }
            baseline += line_height;
        }

        self.x += width;
        if height > 0.0 {
            self.last_height = height;
        }
        Ok(())
    }

    fn new_line(&mut self, height: Option<f64>) -> Result<(), CanvasError> {
        self.x = MARGIN_LEFT;
        self.y += height.unwrap_or(self.last_height);
        Ok(())
    }

    fn advance(&mut self, dx: f64) {
        self.x += dx;
    }

    fn draw_image(
        &mut self,
        source: &ImageSource,
        width: f64,
        height: f64,
    ) -> Result<(), CanvasError> {
        self.ensure_space(height);
        self.resolve_marks();

        let rgb = decode_image(source)?.to_rgb8();
        let (px_width, px_height) = rgb.dimensions();
        if px_width == 0 || px_height == 0 {
            return Err(CanvasError::new("Image has no pixels"));
        }

        let xobject = ImageXObject {
            width: Px(px_width as usize),
            height: Px(px_height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: rgb.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };
        let image = Image::from(xobject);

        let natural_width = f64::from(px_width) / IMAGE_BASE_DPI * 25.4;
        let natural_height = f64::from(px_height) / IMAGE_BASE_DPI * 25.4;
        image.add_to_layer(
            self.layer_ref(),
            ImageTransform {
                translate_x: Some(Mm(self.x as f32)),
                translate_y: Some(Mm(pdf_y(self.y + height) as f32)),
                scale_x: Some((width / natural_width) as f32),
                scale_y: Some((height / natural_height) as f32),
                ..ImageTransform::default()
            },
        );
        Ok(())
    }

    fn mark_section(&mut self, title: &str) {
        // Deferred until the next draw call so a page break triggered by the
        // section's first content still counts towards the mark.
        self.pending_marks.push(title.to_string());
    }
}

/// Converts a y coordinate measured from the top of the page into PDF space.
fn pdf_y(y_from_top: f64) -> f64 {
    PAGE_HEIGHT - y_from_top
}

fn point(x: f64, y_from_top: f64) -> Point {
    Point::new(Mm(x as f32), Mm(pdf_y(y_from_top) as f32))
}

fn pdf_color(color: Rgb) -> PdfColor {
    PdfColor::Rgb(PdfRgb::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        None,
    ))
}

fn text_width_mm(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * AVG_GLYPH_EM * PT_TO_MM
}

fn decode_image(source: &ImageSource) -> Result<image::DynamicImage, CanvasError> {
    match source {
        ImageSource::Bytes(bytes) => image::load_from_memory(bytes)
            .map_err(|err| CanvasError::with_source("Failed to decode image bytes", err)),
        ImageSource::Path(path) => image::open(path)
            .map_err(|err| CanvasError::with_source(format!("Failed to open image file {path}"), err)),
    }
}

/// Greedy word wrap with a hard break for words longer than a full line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let limit = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > limit {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(limit).collect();
            word = &word[head.len()..];
            lines.push(head);
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if !current.is_empty() && needed > limit {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_marks_settle_on_the_page_their_content_lands_on() {
        let mut canvas = PdfCanvas::new("marks").expect("canvas setup");
        let style = CellStyle::new(FontKind::Regular, 10.0);

        canvas.y = PAGE_HEIGHT - MARGIN_BOTTOM - 10.0;
        canvas.mark_section("2015/2016");
        canvas
            .draw_cell(40.0, 24.0, "", Edges::NONE, Align::Left, false, &style)
            .expect("draw cell");

        assert_eq!(
            canvas.marks(),
            [SectionMark {
                title: "2015/2016".to_string(),
                page: 2,
            }]
        );
    }

    #[test]
    fn trailing_marks_resolve_when_the_document_is_finished() {
        let mut canvas = PdfCanvas::new("marks").expect("canvas setup");
        canvas.mark_section("2014/2015");
        assert!(canvas.marks().is_empty());

        let rendered = canvas.finish().expect("serialize");
        assert_eq!(
            rendered.marks,
            [SectionMark {
                title: "2014/2015".to_string(),
                page: 1,
            }]
        );
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap_text("COURSE TITLE", 20), ["COURSE TITLE"]);
    }

    #[test]
    fn wrap_breaks_at_word_boundaries() {
        assert_eq!(
            wrap_text("Introduction to Digital Electronics", 15),
            ["Introduction to", "Digital", "Electronics"]
        );
    }

    #[test]
    fn wrap_hard_breaks_oversized_words() {
        assert_eq!(wrap_text("Electroencephalography", 10), ["Electroenc", "ephalograp", "hy"]);
    }

    #[test]
    fn wrap_of_empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 10), [""]);
    }

    #[test]
    fn pdf_y_flips_the_vertical_axis() {
        assert_eq!(pdf_y(0.0), PAGE_HEIGHT);
        assert_eq!(pdf_y(PAGE_HEIGHT), 0.0);
    }
}
