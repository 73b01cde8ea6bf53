//! Page fonts: how shown strings decode to text and how far each character
//! code moves the pen.
//!
//! Encodings come from lopdf (`/Encoding` names, `ToUnicode` CMaps for
//! composite fonts). Advances come from `/Widths` for simple fonts and from
//! the descendant font's `/W` and `/DW` for Type0 fonts.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Encoding, Object, ObjectId};
use tracing::{debug, warn};

/// Advance in thousandths of an em for codes without metrics.
pub const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// `/DW` when a CID font does not set one.
const DEFAULT_CID_WIDTH: f32 = 1000.0;

/// Fonts of one page, keyed by resource name (`F1`, ...).
pub type FontMap<'a> = BTreeMap<Vec<u8>, PageFont<'a>>;

/// Resolve every font the page can select with `Tf`. A page whose
/// resources cannot be read gets no fonts and decodes with the fallback.
pub fn page_fonts(doc: &Document, page_id: ObjectId) -> FontMap<'_> {
    match doc.get_page_fonts(page_id) {
        Ok(fonts) => fonts
            .into_iter()
            .map(|(name, dict)| {
                let font = PageFont::load(doc, dict);
                (name, font)
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, "page fonts unreadable");
            FontMap::new()
        }
    }
}

#[derive(Debug)]
pub struct PageFont<'a> {
    encoding: Option<Encoding<'a>>,
    /// Bytes per character code: 2 for Type0 fonts.
    code_len: usize,
    /// First code of each run, mapped to the run's last code and width.
    widths: BTreeMap<u32, (u32, f32)>,
    default_width: f32,
}

impl<'a> PageFont<'a> {
    /// A font nothing is known about: one byte per code, Latin-1 text and
    /// estimated advances.
    pub fn fallback() -> Self {
        Self {
            encoding: None,
            code_len: 1,
            widths: BTreeMap::new(),
            default_width: DEFAULT_GLYPH_WIDTH,
        }
    }

    pub fn load(doc: &'a Document, font: &'a Dictionary) -> Self {
        let composite = font
            .get(b"Subtype")
            .and_then(Object::as_name)
            .is_ok_and(|subtype| subtype == b"Type0");

        let encoding = if font.type_is(b"Font") {
            font.get_font_encoding(doc)
                .map_err(|e| debug!(error = %e, "no usable font encoding"))
                .ok()
        } else {
            None
        };

        let mut loaded = Self {
            encoding,
            ..Self::fallback()
        };
        if composite {
            loaded.code_len = 2;
            loaded.load_cid_widths(doc, font);
        } else {
            loaded.load_simple_widths(doc, font);
        }
        loaded
    }

    pub fn is_composite(&self) -> bool {
        self.code_len == 2
    }

    /// Text of a shown string. Strings the font cannot decode fall back to
    /// [`decode_bytes`].
    pub fn decode(&self, bytes: &[u8]) -> String {
        self.encoding
            .as_ref()
            .and_then(|encoding| encoding.bytes_to_string(bytes).ok())
            .unwrap_or_else(|| decode_bytes(bytes))
    }

    /// Character codes of a shown string, each with its advance in
    /// thousandths of an em.
    pub fn codes<'s>(&'s self, bytes: &'s [u8]) -> impl Iterator<Item = (u32, f32)> + 's {
        bytes.chunks(self.code_len).map(move |chunk| {
            let code = chunk.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
            (code, self.width(code))
        })
    }

    fn width(&self, code: u32) -> f32 {
        match self.widths.range(..=code).next_back() {
            Some((_, &(last, width))) if code <= last => width,
            _ => self.default_width,
        }
    }

    fn load_simple_widths(&mut self, doc: &Document, font: &Dictionary) {
        let first = font
            .get(b"FirstChar")
            .and_then(Object::as_i64)
            .ok()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);
        let Ok(widths) = font.get_deref(b"Widths", doc).and_then(Object::as_array) else {
            return;
        };
        for (code, width) in (first..).zip(widths) {
            if let Some(width) = number(doc, width) {
                self.widths.insert(code, (code, width));
            }
        }
    }

    fn load_cid_widths(&mut self, doc: &Document, font: &Dictionary) {
        self.default_width = DEFAULT_CID_WIDTH;
        let descendant = font
            .get_deref(b"DescendantFonts", doc)
            .and_then(Object::as_array)
            .ok()
            .and_then(|fonts| fonts.first())
            .and_then(|f| doc.dereference(f).ok())
            .and_then(|(_, f)| f.as_dict().ok());
        let Some(cid_font) = descendant else {
            return;
        };

        if let Some(dw) = cid_font.get(b"DW").ok().and_then(|dw| number(doc, dw)) {
            self.default_width = dw;
        }
        let Ok(w) = cid_font.get_deref(b"W", doc).and_then(Object::as_array) else {
            return;
        };

        // `c [w1 w2 ...]` or `c_first c_last w`
        let mut i = 0;
        while let Some(start) = w.get(i).and_then(|o| code(doc, o)) {
            match w.get(i + 1).map(|o| resolve(doc, o)) {
                Some(Object::Array(run)) => {
                    for (c, width) in (start..).zip(run) {
                        if let Some(width) = number(doc, width) {
                            self.widths.insert(c, (c, width));
                        }
                    }
                    i += 2;
                }
                Some(end) => {
                    let (Some(end), Some(width)) =
                        (code(doc, end), w.get(i + 2).and_then(|o| number(doc, o)))
                    else {
                        break;
                    };
                    self.widths.insert(start, (end, width));
                    i += 3;
                }
                None => break,
            }
        }
    }
}

fn resolve<'d>(doc: &'d Document, obj: &'d Object) -> &'d Object {
    doc.dereference(obj).map(|(_, o)| o).unwrap_or(obj)
}

fn number(doc: &Document, obj: &Object) -> Option<f32> {
    resolve(doc, obj).as_float().ok()
}

fn code(doc: &Document, obj: &Object) -> Option<u32> {
    resolve(doc, obj)
        .as_i64()
        .ok()
        .and_then(|n| u32::try_from(n).ok())
}

/// Decoding of last resort: UTF-16BE when the string carries a byte-order
/// mark, Latin-1 otherwise.
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
impl PageFont<'_> {
    /// A simple font with `/FirstChar` and `/Widths`.
    pub(crate) fn with_widths(first_char: u32, widths: &[f32]) -> Self {
        let mut font = Self::fallback();
        for (code, width) in (first_char..).zip(widths) {
            font.widths.insert(code, (code, *width));
        }
        font
    }
}
