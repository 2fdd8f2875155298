//! Draws invoice marks onto a single Letter page with `printpdf`.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Greyscale, Image, ImageTransform, IndirectFontRef, Line, Mm,
    PdfDocument, PdfLayerReference, Point, Rect, image_crate,
};

use super::{Font, Mark};
use crate::error::{AppError, AppResult};

pub const PAGE_WIDTH_MM: f32 = 215.9;
pub const PAGE_HEIGHT_MM: f32 = 279.4;

const BAND_SHADE: f32 = 0.9;

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("invoice rendering failed: {e}"))
}

pub fn render(title: &str, marks: &[Mark], logo: Option<&[u8]>) -> AppResult<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Invoice");
    let layer = doc.get_page(page).get_layer(layer);
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    for mark in marks {
        match mark {
            Mark::Text { font, size, x, y, text } => {
                let font_ref: &IndirectFontRef = match font {
                    Font::Regular => &regular,
                    Font::Bold => &bold,
                };
                layer.use_text(text.as_str(), *size, Mm(*x), Mm(*y), font_ref);
            }
            Mark::Rule { x1, x2, y } => {
                layer.set_outline_thickness(0.5);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(*x1), Mm(*y)), false),
                        (Point::new(Mm(*x2), Mm(*y)), false),
                    ],
                    is_closed: false,
                });
            }
            Mark::Band { x, y, width, height } => {
                layer.set_fill_color(Color::Greyscale(Greyscale::new(BAND_SHADE, None)));
                layer.add_rect(
                    Rect::new(Mm(*x), Mm(*y), Mm(x + width), Mm(y + height))
                        .with_mode(PaintMode::Fill),
                );
                layer.set_fill_color(Color::Greyscale(Greyscale::new(0.0, None)));
            }
            Mark::Logo { x, y, width } => {
                if let Some(bytes) = logo {
                    place_logo(&layer, bytes, *x, *y, *width);
                }
            }
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

/// An unreadable logo leaves the company block without it.
fn place_logo(layer: &PdfLayerReference, bytes: &[u8], x: f32, y: f32, width_mm: f32) {
    let decoded = match image_crate::load_from_memory(bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(error = %e, "Invoice logo could not be decoded");
            return;
        }
    };
    if decoded.width() == 0 {
        return;
    }

    let dpi = decoded.width() as f32 * 25.4 / width_mm;
    Image::from_dynamic_image(&decoded).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}
