//! Two-up notice layout.
//!
//! Each page is landscape A4 split down the middle by a dashed cut line; both
//! halves carry the same notice. Positions are stamped from a fixed offset
//! table (in centimetres) - nothing is measured or reflowed.

use chrono::{Datelike, Local};

use crate::surface::{DrawingSurface, Font, PageSize, Point, Rect, Stroke, TextAlign};

use super::logo::LogoCache;
use super::model::{CustomerRecord, DocumentType};

/// One centimetre in PDF points.
pub const CM: f64 = 72.0 / 2.54;

pub const PAGE: PageSize = PageSize::A4_LANDSCAPE;

pub const AGENCY_NAME: &str = "PERUSAHAAN UMUM DAERAH AIR MINUM";
pub const SUB_AGENCY_NAME: &str = "TIRTA TARUM KABUPATEN KARAWANG";
pub const AGENCY_ADDRESS: &str = "Jl. Surotokunto No.205 Karawang Timur";

// Offsets, all in centimetres.
const MARGIN: f64 = 1.2;
const HEADER_SHIFT: f64 = 1.0;
const HEADER_LINES: [f64; 3] = [1.5, 2.0, 2.5];
const LOGO_TOP: f64 = 3.2;
const LOGO_SIZE: f64 = 2.0;
const RULE_TOP: f64 = 3.5;
const DATA_INDENT: f64 = 1.0;
const SIGNATURE_INSET: f64 = 3.0;
const TECH_COLON: f64 = 3.5;
const TECH_ROW: f64 = 0.45;
const CUT_LINE_INSET: f64 = 0.5;

const RULE_WIDTH: f64 = 1.5;
const CUT_LINE_WIDTH: f64 = 0.5;
const CUT_LINE_DASH: f64 = 3.0;

const CUSTOMER_SIGNATURE: &str = "(…………………………..)";
const OFFICER_SIGNATURE: &str = "(...................................)";

/// Meter-stand and seal/body labels of the technical block.
pub fn technical_labels(doc_type: DocumentType) -> (&'static str, &'static str) {
    match doc_type {
        DocumentType::Sealing => ("Stand Meter Segel", "No Segel"),
        DocumentType::Removal => ("Stand Meter Cabut", "No Body"),
    }
}

/// Title line of a notice.
pub fn title(doc_type: DocumentType) -> String {
    format!("SURAT PERINTAH KERJA {}", doc_type.name().to_uppercase())
}

/// Document number placeholder, filled in by hand after printing.
pub fn number_line(year: i32) -> String {
    format!("Nomor : …../…../SPK/{year}")
}

/// Static options for a render run.
#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    /// Year printed in the document number.
    pub year: i32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            year: Local::now().year(),
        }
    }
}

/// Stamp one page per renderable record and return the number of pages.
pub fn render(
    records: &[CustomerRecord],
    doc_type: DocumentType,
    surface: &mut dyn DrawingSurface,
    logo: &LogoCache,
    options: &LayoutOptions,
) -> usize {
    let mut pages = 0;
    for record in records {
        if !record.is_renderable() {
            log::debug!("Skipping record without customer number ({:?})", record.name);
            continue;
        }
        render_page(record, doc_type, surface, logo, options);
        pages += 1;
    }
    pages
}

/// Left notice, cut line, right notice.
pub fn render_page(
    record: &CustomerRecord,
    doc_type: DocumentType,
    surface: &mut dyn DrawingSurface,
    logo: &LogoCache,
    options: &LayoutOptions,
) {
    let half = PAGE.width / 2.0;

    draw_notice(surface, record, doc_type, logo, options, 0.0, half);

    surface.draw_line(
        Point::new(half, CUT_LINE_INSET * CM),
        Point::new(half, PAGE.height - CUT_LINE_INSET * CM),
        Stroke::dashed(CUT_LINE_WIDTH, CUT_LINE_DASH, CUT_LINE_DASH),
    );

    draw_notice(surface, record, doc_type, logo, options, half, half);
    surface.show_page();
}

/// Pen for one half-page: converts centimetre offsets to absolute points.
struct Half<'a> {
    surface: &'a mut dyn DrawingSurface,
    x0: f64,
    width: f64,
}

impl Half<'_> {
    fn left(&self, cm: f64) -> f64 {
        self.x0 + MARGIN * CM + cm * CM
    }

    fn right(&self, cm: f64) -> f64 {
        self.x0 + self.width - MARGIN * CM - cm * CM
    }

    fn center(&self) -> f64 {
        self.x0 + self.width / 2.0
    }

    fn text(&mut self, x: f64, y: f64, text: &str, align: TextAlign) {
        self.surface.draw_text(Point::new(x, y), text, align);
    }

    fn font(&mut self, font: Font) {
        self.surface.set_font(font);
    }
}

fn draw_notice(
    surface: &mut dyn DrawingSurface,
    record: &CustomerRecord,
    doc_type: DocumentType,
    logo: &LogoCache,
    options: &LayoutOptions,
    x0: f64,
    width: f64,
) {
    let height = PAGE.height;
    let mut pen = Half { surface, x0, width };
    let type_name = doc_type.name().to_uppercase();

    // Letterhead, shifted right to leave room for the logo.
    let header_x = pen.center() + HEADER_SHIFT * CM;
    pen.font(Font::regular(10.0));
    pen.text(header_x, height - HEADER_LINES[0] * CM, AGENCY_NAME, TextAlign::Center);
    pen.font(Font::bold(11.0));
    pen.text(header_x, height - HEADER_LINES[1] * CM, SUB_AGENCY_NAME, TextAlign::Center);
    pen.font(Font::regular(9.0));
    pen.text(header_x, height - HEADER_LINES[2] * CM, AGENCY_ADDRESS, TextAlign::Center);

    if let Some(image) = logo.get() {
        let rect = Rect {
            origin: Point::new(pen.left(0.0), height - LOGO_TOP * CM),
            width: LOGO_SIZE * CM,
            height: LOGO_SIZE * CM,
        };
        pen.surface.draw_image(image, rect);
    }

    let rule_y = height - RULE_TOP * CM;
    let (rule_start, rule_end) = (pen.left(0.0), pen.right(0.0));
    pen.surface.draw_line(
        Point::new(rule_start, rule_y),
        Point::new(rule_end, rule_y),
        Stroke::solid(RULE_WIDTH),
    );

    // Title and number.
    let center = pen.center();
    pen.font(Font::bold(10.0));
    pen.text(center, rule_y - 1.0 * CM, &title(doc_type), TextAlign::Center);
    pen.font(Font::regular(10.0));
    pen.text(center, rule_y - 1.5 * CM, &number_line(options.year), TextAlign::Center);

    // Sender and recipient.
    let margin = pen.left(0.0);
    let mut y = rule_y - 2.5 * CM;
    pen.text(margin, y, &format!("Dari           : Manager {}", record.branch), TextAlign::Left);
    y -= 0.5 * CM;
    pen.text(margin, y, "Untuk        : Distribusi", TextAlign::Left);

    y -= 1.0 * CM;
    pen.text(
        margin,
        y,
        &format!("Untuk melaksanakan pekerjaan {type_name} sambungan pelanggan"),
        TextAlign::Left,
    );
    y -= 0.45 * CM;
    pen.text(margin, y, "sebagaimana data dibawah ini", TextAlign::Left);

    // Customer block.
    let indent = pen.left(DATA_INDENT);
    y -= 1.0 * CM;
    pen.text(indent, y, &format!("No pelanggan  : {}", record.customer_id), TextAlign::Left);
    y -= 0.5 * CM;
    pen.text(indent, y, &format!("Nama               : {}", record.name), TextAlign::Left);

    // Arrears block.
    y -= 1.0 * CM;
    pen.text(indent, y, "Rincian tunggakan air / Non air", TextAlign::Left);
    y -= 0.8 * CM;
    pen.text(
        indent,
        y,
        &format!("Total Tunggakan      : {} Bulan", record.arrears_months),
        TextAlign::Left,
    );
    y -= 0.5 * CM;
    pen.text(
        indent,
        y,
        &format!("Total tagihan             : Rp.{}", record.arrears_amount),
        TextAlign::Left,
    );

    y -= 1.2 * CM;
    pen.text(
        margin,
        y,
        "Demikian untuk dilaksanakan dengan penuh tanggung jawab dan dengan semestinya",
        TextAlign::Left,
    );

    // Signatures.
    let customer_col = pen.left(SIGNATURE_INSET);
    let manager_col = pen.right(SIGNATURE_INSET);
    y -= 1.5 * CM;
    pen.text(customer_col, y, "Tanda tangan Pelanggan", TextAlign::Center);
    pen.text(manager_col, y, &format!("Manager Cabang {}", record.branch), TextAlign::Center);
    y -= 2.0 * CM;
    pen.text(customer_col, y, CUSTOMER_SIGNATURE, TextAlign::Center);
    pen.font(Font::bold(10.0));
    pen.text(manager_col, y, &record.manager_name, TextAlign::Center);

    // Technical data, filled in by the field officer.
    let (stand_label, seal_label) = technical_labels(doc_type);
    let colon = pen.left(TECH_COLON);
    let right_edge = pen.right(0.0);
    pen.font(Font::regular(9.0));

    let mut tech_y = y - 1.5 * CM;
    let rows = ["Merk Meter", "No Meter", stand_label, seal_label, "Digit Meter"];
    for (index, label) in rows.iter().enumerate() {
        if index > 0 {
            tech_y -= TECH_ROW * CM;
        }
        pen.text(margin, tech_y, label, TextAlign::Left);
        pen.text(colon, tech_y, ":", TextAlign::Left);
        if index == 0 {
            pen.text(right_edge, tech_y, "Tanda tangan Petugas", TextAlign::Right);
        }
    }
    pen.text(right_edge, tech_y - 0.5 * CM, OFFICER_SIGNATURE, TextAlign::Right);
}
