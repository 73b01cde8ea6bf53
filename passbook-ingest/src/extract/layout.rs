//! Content-stream interpretation: text operators to positioned spans.
//!
//! Only what table detection needs is tracked: the text and line matrices,
//! the current transformation matrix, the selected font and the spacing
//! parameters that move the pen. Advances come from the font's widths;
//! codes without metrics get an estimate that is good enough to tell cells
//! apart but not for pixel-exact layout.

use lopdf::Object;
use lopdf::content::Operation;
use tracing::debug;

use super::font::{FontMap, PageFont};

/// A run of text drawn by a single show operation, in page space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub x: f32,
    /// Baseline; larger is higher on the page.
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub text: String,
}

impl TextSpan {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// 1-based page number
    pub page: usize,
    pub spans: Vec<TextSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other` in PDF row-vector convention (apply `self` first).
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Vertical scale, used to bring font sizes into page space.
    fn scale_y(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState<'f> {
    ctm: Matrix,
    /// `None` until `Tf` selects a font the page defines.
    font: Option<&'f PageFont<'f>>,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    rise: f32,
}

impl Default for GraphicsState<'_> {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: None,
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            rise: 0.0,
        }
    }
}

struct Interpreter<'f> {
    page: usize,
    fonts: &'f FontMap<'f>,
    state: GraphicsState<'f>,
    stack: Vec<GraphicsState<'f>>,
    tm: Matrix,
    tlm: Matrix,
    spans: Vec<TextSpan>,
}

/// Lay out the text of one page from its decoded content operations.
/// `fonts` are the page's font resources; text in fonts it does not name is
/// decoded as Latin-1 with estimated advances.
pub fn interpret<'f>(page: usize, operations: &[Operation], fonts: &'f FontMap<'f>) -> PageLayout {
    let mut interp = Interpreter {
        page,
        fonts,
        state: GraphicsState::default(),
        stack: Vec::new(),
        tm: Matrix::IDENTITY,
        tlm: Matrix::IDENTITY,
        spans: Vec::new(),
    };
    for op in operations {
        interp.step(op);
    }
    PageLayout {
        page: interp.page,
        spans: interp.spans,
    }
}

impl<'f> Interpreter<'f> {
    fn step(&mut self, op: &Operation) {
        let nums = |i: usize| operand(&op.operands, i);
        match op.operator.as_str() {
            "q" => self.stack.push(self.state),
            "Q" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                let m = Matrix::new(nums(0), nums(1), nums(2), nums(3), nums(4), nums(5));
                self.state.ctm = m.multiply(&self.state.ctm);
            }
            "BT" => {
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => {
                self.state.font_size = nums(1);
                let name = op.operands.first().and_then(|o| o.as_name().ok());
                self.state.font = name.and_then(|name| self.fonts.get(name));
                if self.state.font.is_none() {
                    let font = name.map(String::from_utf8_lossy);
                    debug!(page = self.page, ?font, "font not in page resources");
                }
            }
            "TL" => self.state.leading = nums(0),
            "Tc" => self.state.char_spacing = nums(0),
            "Tw" => self.state.word_spacing = nums(0),
            "Tz" => self.state.horizontal_scale = nums(0) / 100.0,
            "Ts" => self.state.rise = nums(0),
            "Td" => self.move_line(nums(0), nums(1)),
            "TD" => {
                self.state.leading = -nums(1);
                self.move_line(nums(0), nums(1));
            }
            "Tm" => {
                self.tlm = Matrix::new(nums(0), nums(1), nums(2), nums(3), nums(4), nums(5));
                self.tm = self.tlm;
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(bytes) = string_operand(op.operands.first()) {
                    self.show(bytes);
                }
            }
            "'" => {
                self.next_line();
                if let Some(bytes) = string_operand(op.operands.first()) {
                    self.show(bytes);
                }
            }
            "\"" => {
                self.state.word_spacing = nums(0);
                self.state.char_spacing = nums(1);
                self.next_line();
                if let Some(bytes) = string_operand(op.operands.get(2)) {
                    self.show(bytes);
                }
            }
            "TJ" => {
                let Some(Object::Array(items)) = op.operands.first() else {
                    return;
                };
                for item in items {
                    match item {
                        Object::String(bytes, _) => self.show(bytes),
                        other => {
                            if let Ok(adjust) = other.as_float() {
                                let tx = -adjust / 1000.0
                                    * self.state.font_size
                                    * self.state.horizontal_scale;
                                self.tm = Matrix::translate(tx, 0.0).multiply(&self.tm);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translate(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.state.leading);
    }

    fn show(&mut self, bytes: &[u8]) {
        let fallback;
        let font = match self.state.font {
            Some(font) => font,
            None => {
                fallback = PageFont::fallback();
                &fallback
            }
        };
        let text = font.decode(bytes);

        let mut advance = 0.0;
        for (code, width) in font.codes(bytes) {
            advance += width / 1000.0 * self.state.font_size + self.state.char_spacing;
            // word spacing applies to the single-byte space only
            if code == 32 && !font.is_composite() {
                advance += self.state.word_spacing;
            }
        }
        advance *= self.state.horizontal_scale;

        let trm = self.tm.multiply(&self.state.ctm);
        let (x, y) = trm.apply(0.0, self.state.rise);
        let (x_end, _) = Matrix::translate(advance, 0.0)
            .multiply(&trm)
            .apply(0.0, self.state.rise);

        if !text.trim().is_empty() {
            self.spans.push(TextSpan {
                x: x.min(x_end),
                y,
                width: (x_end - x).abs(),
                font_size: (self.state.font_size * trm.scale_y()).abs(),
                text,
            });
        }
        self.tm = Matrix::translate(advance, 0.0).multiply(&self.tm);
    }
}

fn operand(operands: &[Object], index: usize) -> f32 {
    operands
        .get(index)
        .and_then(|o| o.as_float().ok())
        .unwrap_or(0.0)
}

fn string_operand(obj: Option<&Object>) -> Option<&[u8]> {
    match obj {
        Some(Object::String(bytes, _)) => Some(bytes),
        _ => None,
    }
}
