//! Drawing capability consumed by the layout engine.
//!
//! The engine never talks to a PDF library directly; it issues cursor-based
//! cell, line and image operations against this trait.  Every visual property
//! (font, colors, line width) travels with the call in a [`CellStyle`], so a
//! canvas implementation holds no style state that drawing order could
//! corrupt.  Page breaks are the canvas's job: implementations guarantee that
//! content is never clipped, inserting pages as needed, and the engine stays
//! oblivious to page boundaries.

use crate::error::CanvasError;
use crate::model::ImageSource;

/// Horizontal alignment of text inside a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

/// Selection of cell edges to stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    /// Stroke the left edge.
    pub left: bool,
    /// Stroke the top edge.
    pub top: bool,
    /// Stroke the right edge.
    pub right: bool,
    /// Stroke the bottom edge.
    pub bottom: bool,
}

impl Edges {
    /// No edges.
    pub const NONE: Self = Self::new(false, false, false, false);
    /// All four edges.
    pub const ALL: Self = Self::new(true, true, true, true);
    /// Top edge only.
    pub const TOP: Self = Self::new(false, true, false, false);
    /// Left and top edges.
    pub const LEFT_TOP: Self = Self::new(true, true, false, false);
    /// Left and right edges.
    pub const LEFT_RIGHT: Self = Self::new(true, false, true, false);
    /// Left, top and bottom edges.
    pub const LEFT_TOP_BOTTOM: Self = Self::new(true, true, false, true);

    /// Creates an edge selection.
    pub const fn new(left: bool, top: bool, right: bool, bottom: bool) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Returns the selection with the top edge toggled.
    pub const fn with_top(self, top: bool) -> Self {
        Self { top, ..self }
    }
}

/// An RGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Black, the default text color.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Font face requested for a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontKind {
    /// Regular weight.
    #[default]
    Regular,
    /// Bold weight.
    Bold,
}

/// The complete visual style of one draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellStyle {
    /// Font face for the cell text.
    pub font: FontKind,
    /// Font size in points.
    pub font_size: f64,
    /// Color of the cell text.
    pub text_color: Rgb,
    /// Background color applied when the cell is filled.
    pub fill_color: Rgb,
    /// Color of stroked borders.
    pub draw_color: Rgb,
    /// Border stroke width in document units.
    pub line_width: f64,
}

impl CellStyle {
    /// Creates a style with black text and borders and a white fill.
    pub const fn new(font: FontKind, font_size: f64) -> Self {
        Self {
            font,
            font_size,
            text_color: Rgb::BLACK,
            fill_color: Rgb::new(255, 255, 255),
            draw_color: Rgb::BLACK,
            line_width: 0.1,
        }
    }

    /// Sets the fill color and returns the updated style.
    pub const fn with_fill_color(self, fill_color: Rgb) -> Self {
        Self { fill_color, ..self }
    }

    /// Sets the border color and returns the updated style.
    pub const fn with_draw_color(self, draw_color: Rgb) -> Self {
        Self { draw_color, ..self }
    }

    /// Sets the border stroke width and returns the updated style.
    pub const fn with_line_width(self, line_width: f64) -> Self {
        Self { line_width, ..self }
    }
}

/// Primitive drawing surface for paginated tabular documents.
///
/// Widths and heights are in document units (millimetres for the PDF
/// implementation).  The cursor starts at the top-left content origin; cells
/// advance it horizontally and [`DocumentCanvas::new_line`] returns it to the
/// left margin.
pub trait DocumentCanvas {
    /// Draws a single-line cell at the cursor and advances the cursor by
    /// `width`.
    #[allow(clippy::too_many_arguments)]
    fn draw_cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        border: Edges,
        align: Align,
        filled: bool,
        style: &CellStyle,
    ) -> Result<(), CanvasError>;

    /// Draws a cell whose text wraps onto multiple lines within `height`, and
    /// advances the cursor by `width`.
    #[allow(clippy::too_many_arguments)]
    fn draw_wrapping_cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        border: Edges,
        align: Align,
        filled: bool,
        style: &CellStyle,
    ) -> Result<(), CanvasError>;

    /// Moves the cursor to the left margin and down by `height`, or by the
    /// height of the last drawn cell when `height` is `None`.
    fn new_line(&mut self, height: Option<f64>) -> Result<(), CanvasError>;

    /// Moves the cursor right by `dx` without drawing.
    fn advance(&mut self, dx: f64);

    /// Draws an image at the cursor scaled to `width` x `height` without
    /// moving the cursor.
    fn draw_image(
        &mut self,
        source: &ImageSource,
        width: f64,
        height: f64,
    ) -> Result<(), CanvasError>;

    /// Records a named section starting at the current position.
    ///
    /// Canvases that support document outlines remember the page the mark
    /// landed on; the default implementation ignores the mark.
    fn mark_section(&mut self, _title: &str) {}
}
