//! Report renderer: record in, paginated PDF bytes out.
//!
//! Page 1 carries the structured clinical layout; each attachment image gets
//! its own page, scaled to fit. The record's capsule is written into the
//! document metadata before the bytes leave this module, so every rendered
//! artifact is re-importable. All scratch state lives on the stack of one
//! call and is dropped on success and failure alike.

use std::io::BufWriter;

use printpdf::image_crate::{self, GenericImageView};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use super::layout::{
    attachment_box, attachment_origin, fit_image, wrap_text, FOOTER_CLEARANCE_MM, MARGIN_MM,
    PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use super::RenderError;
use crate::capsule;
use crate::models::VisitRecord;

/// Attachment pixels handed to the renderer alongside the record.
///
/// The record itself carries only the reference names; image bytes never
/// enter the capsule.
#[derive(Debug, Clone)]
pub struct AttachmentImage {
    pub name: String,
    pub data: Vec<u8>,
}

/// Attachment images are laid out at this resolution.
const RENDER_DPI: f64 = 300.0;

/// No body text is drawn below this line; the footer owns the space under it.
const BODY_FLOOR_MM: f64 = FOOTER_CLEARANCE_MM + 4.0;

/// Left edge of the right-hand body column.
const RIGHT_COLUMN_MM: f64 = 112.0;

/// Wrap widths tuned to the column widths at 9pt Helvetica.
const LEFT_WRAP: usize = 52;
const RIGHT_WRAP: usize = 50;

const FOOTER_NOTICE: &str =
    "Electronically generated home-visit report. Keep this document for your medical records.";
const FOOTER_DISCLAIMER: &str =
    "Not valid for medico-legal purposes without the attending consultant's countersignature.";
const PAYMENT_LINE: &str = "Pay online: pay.housecall.example (UPI and cards accepted)";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

/// Render a visit record into a finished, capsule-carrying PDF.
pub fn render_report(
    record: &VisitRecord,
    attachments: &[AttachmentImage],
) -> Result<Vec<u8>, RenderError> {
    // Encode up front: the capsule is a verbatim snapshot of the record as
    // rendered, and a record that cannot encode must not produce an artifact.
    let capsule = capsule::encode(record)?;
    let artifact = build_document(record, attachments)?;
    Ok(super::metadata::embed_capsule(&artifact, &capsule)?)
}

fn build_document(
    record: &VisitRecord,
    attachments: &[AttachmentImage],
) -> Result<Vec<u8>, RenderError> {
    let title = format!("Visit Report - {}", record.patient_name);
    let (doc, page1, layer1) = PdfDocument::new(
        &title,
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "Layer 1",
    );
    let fonts = load_fonts(&doc)?;
    let total_pages = 1 + attachments.len();

    let layer = doc.get_page(page1).get_layer(layer1);
    draw_clinical_page(&layer, &fonts, record);
    draw_footer(&layer, &fonts, 1, total_pages);

    for (index, attachment) in attachments.iter().enumerate() {
        let (page, layer_index) =
            doc.add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer_index);
        place_attachment(&layer, attachment)?;
        draw_footer(&layer, &fonts, index + 2, total_pages);
    }

    let mut buffer = BufWriter::new(Vec::new());
    doc.save(&mut buffer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    buffer
        .into_inner()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn load_fonts(doc: &PdfDocumentReference) -> Result<Fonts, RenderError> {
    Ok(Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
        mono: doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
    })
}

fn draw_clinical_page(layer: &PdfLayerReference, fonts: &Fonts, record: &VisitRecord) {
    let mut y = PAGE_HEIGHT_MM - 18.0;

    // Header
    let clinic = if record.consultant_name.is_empty() {
        "Home Healthcare Service"
    } else {
        record.consultant_name.as_str()
    };
    layer.use_text(clinic, 16.0, Mm(MARGIN_MM as f32), Mm(y as f32), &fonts.bold);
    y -= 6.5;
    layer.use_text(
        format!("Attending: {}", record.staff_name),
        9.0,
        Mm(MARGIN_MM as f32),
        Mm(y as f32),
        &fonts.regular,
    );
    layer.use_text(
        format!("Date: {}", record.visit_date),
        9.0,
        Mm(158.0 as f32),
        Mm(y as f32),
        &fonts.regular,
    );
    y -= 4.5;
    if !record.visit_id.is_empty() {
        layer.use_text(
            format!("Visit ID: {}", record.visit_id),
            8.0,
            Mm(MARGIN_MM as f32),
            Mm(y as f32),
            &fonts.mono,
        );
        y -= 4.5;
    }
    y -= 2.0;

    // Patient summary block
    layer.use_text("PATIENT", 10.0, Mm(MARGIN_MM as f32), Mm(y as f32), &fonts.bold);
    y -= 4.5;
    layer.use_text(
        format!(
            "Name: {}    Age: {}    Gender: {}",
            record.patient_name, record.age, record.gender
        ),
        9.0,
        Mm(MARGIN_MM as f32),
        Mm(y as f32),
        &fonts.regular,
    );
    y -= 4.0;
    layer.use_text(
        format!("Phone: {}    Email: {}", record.contact, record.email),
        9.0,
        Mm(MARGIN_MM as f32),
        Mm(y as f32),
        &fonts.regular,
    );
    y -= 4.0;
    for line in wrap_text(&format!("Address: {}", record.address), 100) {
        layer.use_text(line, 9.0, Mm(MARGIN_MM as f32), Mm(y as f32), &fonts.regular);
        y -= 4.0;
    }
    y -= 2.0;

    y = draw_vitals_grid(layer, fonts, record, y);

    // Two-column body: narrative on the left, prescription and billing on
    // the right. Columns flow independently from the same top line.
    let body_top = y;
    let diagnosis = if record.diagnosis_code.is_empty() {
        record.provisional_diagnosis.clone()
    } else {
        format!(
            "{} ({})",
            record.provisional_diagnosis, record.diagnosis_code
        )
    };

    let mut left_y = body_top;
    let narrative: [(&str, &str); 9] = [
        ("COMPLAINTS", &record.complaints),
        ("DURATION OF ILLNESS", &record.illness_duration),
        ("HISTORY", &record.history),
        ("SURGICAL HISTORY", &record.surgical_history),
        ("EXAMINATION FINDINGS", &record.examination_findings),
        ("PROVISIONAL DIAGNOSIS", &diagnosis),
        ("INVESTIGATIONS ADVISED", &record.investigations_advised),
        ("TREATMENT PLAN", &record.treatment_plan),
        ("ADVICE", &record.advice),
    ];
    for (title, body) in narrative {
        left_y = draw_section(layer, fonts, title, body, MARGIN_MM, left_y, LEFT_WRAP);
    }

    let mut right_y = body_top;
    right_y = draw_medications(layer, fonts, record, right_y);
    draw_billing(layer, fonts, record, right_y);
}

fn draw_vitals_grid(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    record: &VisitRecord,
    mut y: f64,
) -> f64 {
    layer.use_text("VITALS", 10.0, Mm(MARGIN_MM as f32), Mm(y as f32), &fonts.bold);
    y -= 4.5;

    let rows: [&[(&str, &str)]; 2] = [
        &[
            ("Temp", record.temperature.as_str()),
            ("BP", record.blood_pressure.as_str()),
            ("SpO2", record.spo2.as_str()),
            ("HR", record.heart_rate.as_str()),
            ("RBS", record.rbs.as_str()),
        ],
        &[
            ("Weight", record.weight.as_str()),
            ("Height", record.height.as_str()),
            ("BMI", record.bmi.as_str()),
        ],
    ];
    for row in rows {
        for (index, (label, value)) in row.iter().enumerate() {
            let x = MARGIN_MM + index as f64 * 36.0;
            let value = if value.is_empty() { "-" } else { value };
            layer.use_text(
                format!("{label}: {value}"),
                9.0,
                Mm(x as f32),
                Mm(y as f32),
                &fonts.regular,
            );
        }
        y -= 4.5;
    }
    y - 3.0
}

fn draw_section(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    title: &str,
    body: &str,
    x: f64,
    mut y: f64,
    wrap: usize,
) -> f64 {
    if body.trim().is_empty() || y < BODY_FLOOR_MM {
        return y;
    }

    layer.use_text(title, 10.0, Mm(x as f32), Mm(y as f32), &fonts.bold);
    y -= 4.5;
    for raw_line in body.lines() {
        for line in wrap_text(raw_line, wrap) {
            if y < BODY_FLOOR_MM {
                return y;
            }
            layer.use_text(line, 9.0, Mm(x as f32), Mm(y as f32), &fonts.regular);
            y -= 4.0;
        }
    }
    y - 3.0
}

fn draw_medications(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    record: &VisitRecord,
    mut y: f64,
) -> f64 {
    if !record.medications.is_empty() {
        layer.use_text("PRESCRIPTION", 10.0, Mm(RIGHT_COLUMN_MM as f32), Mm(y as f32), &fonts.bold);
        y -= 4.5;
        for (index, med) in record.medications.iter().enumerate() {
            if y < BODY_FLOOR_MM {
                return y;
            }
            layer.use_text(
                format!("{}. {} {}", index + 1, med.name, med.dose),
                9.0,
                Mm(RIGHT_COLUMN_MM as f32),
                Mm(y as f32),
                &fonts.bold,
            );
            y -= 4.0;
            let detail = format!(
                "{} | {} | {}x/day | {} days",
                med.route, med.timing, med.frequency_per_day, med.duration_days
            );
            for line in wrap_text(&detail, RIGHT_WRAP) {
                layer.use_text(line, 8.0, Mm((RIGHT_COLUMN_MM + 4.0) as f32), Mm(y as f32), &fonts.mono);
                y -= 3.5;
            }
            y -= 1.5;
        }
        y -= 2.0;
    }

    if !record.medicine_advice.is_empty() {
        layer.use_text("MEDICINE SCHEDULE", 10.0, Mm(RIGHT_COLUMN_MM as f32), Mm(y as f32), &fonts.bold);
        y -= 4.5;
        for item in &record.medicine_advice {
            if y < BODY_FLOOR_MM {
                return y;
            }
            let line = format!(
                "{} at {} ({}, {})",
                item.medicine_name, item.display_time, item.duration_label, item.day_count_label
            );
            for wrapped in wrap_text(&line, RIGHT_WRAP) {
                layer.use_text(wrapped, 8.0, Mm(RIGHT_COLUMN_MM as f32), Mm(y as f32), &fonts.regular);
                y -= 3.5;
            }
            y -= 1.0;
        }
        y -= 2.0;
    }
    y
}

fn draw_billing(layer: &PdfLayerReference, fonts: &Fonts, record: &VisitRecord, mut y: f64) {
    if record.service_name.trim().is_empty() || y < BODY_FLOOR_MM {
        return;
    }

    layer.use_text("BILLING", 10.0, Mm(RIGHT_COLUMN_MM as f32), Mm(y as f32), &fonts.bold);
    y -= 4.5;
    layer.use_text(
        format!(
            "{}  x{}  Rs. {}",
            record.service_name, record.service_quantity, record.service_charge
        ),
        9.0,
        Mm(RIGHT_COLUMN_MM as f32),
        Mm(y as f32),
        &fonts.regular,
    );
    y -= 4.0;
    layer.use_text(
        format!("Total: Rs. {}", billing_total(record)),
        9.0,
        Mm(RIGHT_COLUMN_MM as f32),
        Mm(y as f32),
        &fonts.bold,
    );
    y -= 4.0;
    for line in wrap_text(PAYMENT_LINE, RIGHT_WRAP) {
        layer.use_text(line, 8.0, Mm(RIGHT_COLUMN_MM as f32), Mm(y as f32), &fonts.regular);
        y -= 3.5;
    }
    if record.follow_up_required {
        y -= 1.0;
        layer.use_text(
            format!("Follow-up on: {}", record.follow_up_date),
            9.0,
            Mm(RIGHT_COLUMN_MM as f32),
            Mm(y as f32),
            &fonts.bold,
        );
    }
}

/// Charge times quantity when the charge parses; the raw charge otherwise.
fn billing_total(record: &VisitRecord) -> String {
    match record.service_charge.trim().parse::<f64>() {
        Ok(charge) => format!("{}", charge * record.service_quantity as f64),
        Err(_) => record.service_charge.clone(),
    }
}

fn draw_footer(layer: &PdfLayerReference, fonts: &Fonts, page: usize, total_pages: usize) {
    layer.use_text(FOOTER_NOTICE, 7.0, Mm(MARGIN_MM as f32), Mm(14.0 as f32), &fonts.regular);
    layer.use_text(FOOTER_DISCLAIMER, 7.0, Mm(MARGIN_MM as f32), Mm(10.5 as f32), &fonts.regular);
    layer.use_text(
        format!("Page {page} of {total_pages}"),
        7.0,
        Mm(183.0 as f32),
        Mm(14.0 as f32),
        &fonts.regular,
    );
}

fn place_attachment(
    layer: &PdfLayerReference,
    attachment: &AttachmentImage,
) -> Result<(), RenderError> {
    let dynamic = image_crate::load_from_memory(&attachment.data)
        .map_err(|e| RenderError::Attachment(format!("{}: {e}", attachment.name)))?;
    let (px_w, px_h) = dynamic.dimensions();

    let (max_w, max_h) = attachment_box();
    let (w, h) = fit_image(px_w as f64, px_h as f64, max_w, max_h);
    let (x, y) = attachment_origin(w, h);

    // printpdf lays the image out at its natural size for the given dpi;
    // scale from that to the fitted box.
    let natural_w = px_w as f64 * 25.4 / RENDER_DPI;
    let natural_h = px_h as f64 * 25.4 / RENDER_DPI;

    let image = Image::from_dynamic_image(&dynamic);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x as f32)),
            translate_y: Some(Mm(y as f32)),
            scale_x: Some((w / natural_w) as f32),
            scale_y: Some((h / natural_h) as f32),
            dpi: Some(RENDER_DPI as f32),
            ..ImageTransform::default()
        },
    );
    Ok(())
}
