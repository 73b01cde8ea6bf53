//! In-memory PDF fixtures built with lopdf's object API.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

/// Font a fixture string is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// `F1`: Type1 Courier, one byte per character, no widths.
    Courier,
    /// `F2`: Type0 Identity-H subset font. Glyph ids are not character
    /// codes; only the `ToUnicode` CMap recovers the text.
    Subset,
}

/// Text drawn at a fixed position (points from the bottom-left corner).
pub struct Text<'a> {
    pub x: i64,
    pub y: i64,
    pub text: &'a str,
    pub face: Face,
}

pub fn at(x: i64, y: i64, text: &str) -> Text<'_> {
    Text {
        x,
        y,
        text,
        face: Face::Courier,
    }
}

pub fn subset_at(x: i64, y: i64, text: &str) -> Text<'_> {
    Text {
        x,
        y,
        text,
        face: Face::Subset,
    }
}

/// Column x positions used by the statement fixtures.
pub const COLUMNS: [i64; 6] = [40, 110, 250, 360, 440, 520];

/// HDFC puts a narrow reference column before two wide amount headers.
pub const HDFC_COLUMNS: [i64; 6] = [40, 100, 260, 340, 440, 530];

/// One table row laid out on [`COLUMNS`]; blank cells are not drawn.
pub fn row(y: i64, cells: [&str; 6]) -> Vec<Text<'_>> {
    row_at(&COLUMNS, y, cells)
}

pub fn row_at<'a>(columns: &[i64; 6], y: i64, cells: [&'a str; 6]) -> Vec<Text<'a>> {
    columns
        .iter()
        .zip(cells)
        .filter(|(_, text)| !text.is_empty())
        .map(|(x, text)| at(*x, y, text))
        .collect()
}

/// Maps U+0020..U+007D onto glyph ids 3.., the way subset fonts number
/// their glyphs.
const SUBSET_TO_UNICODE: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0003> <0060> <0020>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

const SUBSET_GLYPH_OFFSET: u16 = 0x20 - 3;

fn show(item: &Text<'_>) -> Object {
    match item.face {
        Face::Courier => Object::string_literal(item.text),
        Face::Subset => {
            let bytes = item
                .text
                .chars()
                .flat_map(|c| (c as u16 - SUBSET_GLYPH_OFFSET).to_be_bytes())
                .collect();
            Object::String(bytes, StringFormat::Hexadecimal)
        }
    }
}

/// Build a PDF with one page per entry, every text item at 10pt.
pub fn build_pdf(pages: &[Vec<Text<'_>>]) -> Vec<u8> {
    build(pages, None)
}

/// Like [`build_pdf`], but the content stream of 1-based page `corrupt` is
/// declared `FlateDecode` and holds bytes that are not zlib data.
pub fn build_pdf_with_corrupt_page(pages: &[Vec<Text<'_>>], corrupt: usize) -> Vec<u8> {
    build(pages, Some(corrupt))
}

fn build(pages: &[Vec<Text<'_>>], corrupt: Option<usize>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let courier_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let cmap_id = doc.add_object(Stream::new(dictionary! {}, SUBSET_TO_UNICODE.to_vec()));
    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "AAAAAB+Arial",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "DW" => 500,
    });
    let subset_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "AAAAAB+Arial",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![cid_font_id.into()],
        "ToUnicode" => cmap_id,
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => courier_id,
            "F2" => subset_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (i, items) in pages.iter().enumerate() {
        let mut operations = Vec::new();
        for item in items {
            let font = match item.face {
                Face::Courier => "F1",
                Face::Subset => "F2",
            };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), 10.into()]));
            operations.push(Operation::new("Td", vec![item.x.into(), item.y.into()]));
            operations.push(Operation::new("Tj", vec![show(item)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let stream = if corrupt == Some(i + 1) {
            Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                b"this was never deflated".to_vec(),
            )
        } else {
            let content = Content { operations };
            Stream::new(dictionary! {}, content.encode().expect("encode content"))
        };
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

/// First page of the SBI statement: title, header, three rows (the third
/// wraps onto a second line) and a footer.
pub fn sbi_first_page() -> Vec<Text<'static>> {
    let mut page = vec![
        at(40, 800, "State Bank of India"),
        at(40, 780, "Account Statement"),
    ];
    page.extend(row(
        700,
        ["Txn Date", "Description", "Ref No./Cheque No.", "Debit", "Credit", "Balance"],
    ));
    page.extend(row(686, ["01-Jan-24", "Opening deposit", "", "", "10,000.00", "10,000.00"]));
    page.extend(row(672, ["02-Jan-24", "ATM WDL", "ATM123", "500.00", "", "9,500.00"]));
    page.extend(row(658, ["03-Jan-24", "UPI/PAYTM", "UPI4031", "1,200.00", "", "8,300.00"]));
    page.push(at(110, 646, "GROCERY"));
    page.push(at(40, 100, "Page 1 of 2"));
    page
}

/// Two-page SBI statement. Page 2 repeats the table without its header and
/// has no credit entries, so its credit column is empty.
pub fn sbi_statement() -> Vec<u8> {
    let mut page2 = vec![at(40, 800, "Statement continued")];
    page2.extend(row(760, ["04-Jan-24", "Rent", "", "5,000.00", "", "3,300.00"]));
    page2.extend(row(746, ["05-Jan-24", "Electricity", "BESCOM77", "1,450.50", "", "1,849.50"]));
    page2.push(at(40, 100, "Page 2 of 2"));

    build_pdf(&[sbi_first_page(), page2])
}

/// One-page HDFC statement with `dd/mm/yy` dates.
pub fn hdfc_statement() -> Vec<u8> {
    let mut page = vec![
        at(40, 800, "HDFC BANK Ltd."),
        at(40, 780, "Statement of account"),
    ];
    page.extend(row_at(
        &HDFC_COLUMNS,
        700,
        [
            "Date",
            "Narration",
            "Chq./Ref.No.",
            "Withdrawal Amt.",
            "Deposit Amt.",
            "Closing Balance",
        ],
    ));
    page.extend(row_at(
        &HDFC_COLUMNS,
        686,
        ["01/03/24", "NEFT CR-ACME PAYROLL", "N0612345", "", "50,000.00", "1,20,000.00"],
    ));
    page.extend(row_at(
        &HDFC_COLUMNS,
        672,
        ["05/03/24", "POS AMAZON", "0000412345", "2,499.00", "", "1,17,501.00"],
    ));
    page.extend(row_at(
        &HDFC_COLUMNS,
        658,
        ["31/03/24", "ATM-CASH MG ROAD", "", "10,000.00", "", "1,07,501.00"],
    ));
    page.push(at(40, 100, "Page 1 of 1"));
    build_pdf(&[page])
}
