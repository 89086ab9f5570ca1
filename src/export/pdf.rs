//! Relatório de vistoria em PDF (printpdf, Helvetica embutida)
//!
//! Coordenadas do layout em mm a partir do topo; convertidas com `flip_y`.

use crate::error::{ChecklistError, Result};
use checklist_common::data_url::extract_base64_from_data_url;
use checklist_common::export::report_core::{
    wrap_text, ReportAttachment, ReportModel, ReportRow, APPENDIX_TITLE, IMAGE_ERROR_TEXT,
    SUPERVISOR_LABEL, TABLE_HEAD,
};
use checklist_common::layout::*;
use checklist_common::ItemStatus;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Point, Polygon, PolygonRing, Pt, RawImage, Rgb, TextItem, WindingOrder, XObjectId,
    XObjectTransform,
};
use tracing::warn;

/// Qualidade das imagens anexadas
#[derive(Debug, Clone, Copy)]
pub struct ImageQuality {
    pub max_width: u32,
    pub jpeg_quality: u8,
}

impl Default for ImageQuality {
    fn default() -> Self {
        Self {
            max_width: 800,
            jpeg_quality: 75,
        }
    }
}

type Rgb8 = (u8, u8, u8);
const BLACK: Rgb8 = (0, 0, 0);
const WHITE: Rgb8 = (255, 255, 255);
const GRID: Rgb8 = (200, 200, 200);

fn color((r, g, b): Rgb8) -> Color {
    Color::Rgb(Rgb {
        r: r as f32 / 255.0,
        g: g as f32 / 255.0,
        b: b as f32 / 255.0,
        icc_profile: None,
    })
}

fn point(x_mm: f32, y_top_mm: f32) -> LinePoint {
    LinePoint {
        p: Point::new(Mm(x_mm), Mm(flip_y(y_top_mm))),
        bezier: false,
    }
}

fn rect_points(x: f32, y_top: f32, w: f32, h: f32) -> Vec<LinePoint> {
    vec![
        point(x, y_top),
        point(x + w, y_top),
        point(x + w, y_top + h),
        point(x, y_top + h),
    ]
}

/// Acumula as operações da página atual
struct PageWriter {
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
        }
    }

    fn new_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages
            .push(PdfPage::new(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), ops));
    }

    fn finish(mut self) -> Vec<PdfPage> {
        self.new_page();
        self.pages
    }

    fn text(&mut self, x_mm: f32, baseline_mm: f32, size: f32, font: BuiltinFont, rgb: Rgb8, text: &str) {
        self.ops.extend([
            Op::StartTextSection,
            Op::SetFillColor { col: color(rgb) },
            Op::SetTextCursor {
                pos: Point::new(Mm(x_mm), Mm(flip_y(baseline_mm))),
            },
            Op::SetFontSizeBuiltinFont { size: Pt(size), font },
            Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(text.to_string())],
                font,
            },
            Op::EndTextSection,
        ]);
    }

    fn centered_text(&mut self, baseline_mm: f32, size: f32, font: BuiltinFont, text: &str) {
        let x = (A4_WIDTH_MM - approx_text_width_mm(text, size)) / 2.0;
        self.text(x.max(LEFT_MM), baseline_mm, size, font, BLACK, text);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness_mm: f32) {
        self.ops.extend([
            Op::SetOutlineColor { col: color(BLACK) },
            Op::SetOutlineThickness {
                pt: Pt(mm_to_pt(thickness_mm)),
            },
            Op::DrawLine {
                line: Line {
                    points: vec![point(x1, y1), point(x2, y2)],
                    is_closed: false,
                },
            },
        ]);
    }

    fn cell(&mut self, x: f32, y_top: f32, w: f32, h: f32, fill: Option<Rgb8>) {
        if let Some(fill) = fill {
            self.ops.extend([
                Op::SetFillColor { col: color(fill) },
                Op::DrawPolygon {
                    polygon: Polygon {
                        rings: vec![PolygonRing {
                            points: rect_points(x, y_top, w, h),
                        }],
                        mode: PaintMode::Fill,
                        winding_order: WindingOrder::NonZero,
                    },
                },
            ]);
        }
        self.ops.extend([
            Op::SetOutlineColor { col: color(GRID) },
            Op::SetOutlineThickness { pt: Pt(0.5) },
            Op::DrawLine {
                line: Line {
                    points: rect_points(x, y_top, w, h),
                    is_closed: true,
                },
            },
        ]);
    }

    fn image(&mut self, id: XObjectId, x_mm: f32, y_top_mm: f32, w_mm: f32, h_mm: f32, px_w: u32, px_h: u32) {
        // dpi 72: 1px = 1pt antes da escala
        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(mm_to_pt(x_mm))),
                translate_y: Some(Pt(mm_to_pt(flip_y(y_top_mm + h_mm)))),
                scale_x: Some(mm_to_pt(w_mm) / px_w as f32),
                scale_y: Some(mm_to_pt(h_mm) / px_h as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        });
    }
}

fn row_height(lines: usize) -> f32 {
    lines.max(1) as f32 * CELL_LINE_HEIGHT_MM + CELL_PADDING_MM * 2.0
}

fn draw_cell_lines(pw: &mut PageWriter, x: f32, y_top: f32, lines: &[String], font: BuiltinFont, rgb: Rgb8) {
    for (i, line) in lines.iter().enumerate() {
        let baseline = y_top + CELL_PADDING_MM + (i + 1) as f32 * CELL_LINE_HEIGHT_MM - 1.0;
        pw.text(x + CELL_PADDING_MM, baseline, TABLE_FONT_PT, font, rgb, line);
    }
}

fn draw_table_head(pw: &mut PageWriter, y: f32) -> f32 {
    let h = row_height(1);
    let mut x = LEFT_MM;
    for (title, width) in TABLE_HEAD.iter().zip(COLUMN_WIDTHS_MM) {
        pw.cell(x, y, width, h, Some(HEAD_FILL));
        draw_cell_lines(pw, x, y, &[title.to_string()], BuiltinFont::HelveticaBold, WHITE);
        x += width;
    }
    y + h
}

fn status_color(status: Option<ItemStatus>) -> Rgb8 {
    match status {
        Some(ItemStatus::Ok) => OK_TEXT,
        Some(ItemStatus::Defect) => DEFECT_TEXT,
        None => BLACK,
    }
}

/// Desenha a tabela; devolve o y final
fn draw_table(pw: &mut PageWriter, rows: &[ReportRow]) -> f32 {
    let table_width: f32 = COLUMN_WIDTHS_MM.iter().sum();
    let mut y = draw_table_head(pw, TABLE_START_Y_MM);

    for row in rows {
        let (cells, h) = match row {
            ReportRow::Category(name) => {
                let lines = wrap_text(name, COLUMN_WRAP_CHARS.iter().sum());
                let h = row_height(lines.len());
                (vec![lines], h)
            }
            ReportRow::Item { label, description, .. } => {
                let cells = vec![
                    wrap_text(label, COLUMN_WRAP_CHARS[0]),
                    vec![row.status_label().to_string()],
                    wrap_text(description, COLUMN_WRAP_CHARS[2]),
                ];
                let h = row_height(cells.iter().map(Vec::len).max().unwrap_or(1));
                (cells, h)
            }
        };

        if y + h > TABLE_BOTTOM_MM {
            pw.new_page();
            y = draw_table_head(pw, TABLE_TOP_ON_NEW_PAGE_MM);
        }

        match row {
            ReportRow::Category(_) => {
                pw.cell(LEFT_MM, y, table_width, h, Some(CATEGORY_FILL));
                draw_cell_lines(pw, LEFT_MM, y, &cells[0], BuiltinFont::HelveticaBold, BLACK);
            }
            ReportRow::Item { status, .. } => {
                let mut x = LEFT_MM;
                for (col, (lines, width)) in cells.iter().zip(COLUMN_WIDTHS_MM).enumerate() {
                    pw.cell(x, y, width, h, None);
                    let rgb = if col == 1 { status_color(*status) } else { BLACK };
                    draw_cell_lines(pw, x, y, lines, BuiltinFont::Helvetica, rgb);
                    x += width;
                }
            }
        }
        y += h;
    }
    y
}

fn draw_signatures(pw: &mut PageWriter, table_end_y: f32, signature_name: &str) {
    let mut y = table_end_y + SIGNATURE_GAP_MM;
    if y + SIGNATURE_BLOCK_HEIGHT_MM > A4_HEIGHT_MM {
        pw.new_page();
        y = SIGNATURE_Y_ON_NEW_PAGE_MM;
    }
    let labels = [signature_name, SUPERVISOR_LABEL];
    for ((x1, x2), label) in SIGNATURE_LINES_MM.iter().zip(labels) {
        pw.line(*x1, y, *x2, y, 0.5);
        pw.text(*x1, y + 5.0, SIGNATURE_FONT_PT, BuiltinFont::Helvetica, BLACK, label);
    }
}

/// Imagem pronta para o PDF (JPEG reduzido) e suas dimensões em px
fn prepare_image(data_url: &str, quality: &ImageQuality) -> std::result::Result<(Vec<u8>, u32, u32), String> {
    let encoded = extract_base64_from_data_url(data_url).ok_or("data URL sem conteúdo")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| e.to_string())?;
    let mut img = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
    if img.width() > quality.max_width {
        img = img.resize(quality.max_width, u32::MAX, FilterType::Triangle);
    }
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality))
        .map_err(|e| e.to_string())?;
    Ok((jpeg, rgb.width(), rgb.height()))
}

fn draw_appendix(
    doc: &mut PdfDocument,
    pw: &mut PageWriter,
    attachments: &[ReportAttachment],
    quality: &ImageQuality,
    warnings: &mut Vec<PdfWarnMsg>,
) {
    if attachments.is_empty() {
        return;
    }
    pw.new_page();
    let mut y = APPENDIX_TOP_MM;
    pw.centered_text(y, APPENDIX_TITLE_FONT_PT, BuiltinFont::Helvetica, APPENDIX_TITLE);
    y += 15.0;

    for attachment in attachments {
        if y > APPENDIX_PAGE_BREAK_Y_MM {
            pw.new_page();
            y = APPENDIX_TOP_MM;
        }
        pw.text(
            LEFT_MM,
            y,
            HEADER_FONT_PT,
            BuiltinFont::HelveticaBold,
            BLACK,
            &format!("Item: {}", attachment.label),
        );
        y += 7.0;

        let prepared = prepare_image(&attachment.data_url, quality).and_then(|(jpeg, w, h)| {
            RawImage::decode_from_bytes(&jpeg, warnings).map(|raw| (raw, w, h))
        });
        match prepared {
            Ok((raw, px_w, px_h)) => {
                let w_mm = APPENDIX_IMAGE_WIDTH_MM;
                let h_mm = px_h as f32 * w_mm / px_w.max(1) as f32;
                let id = doc.add_image(&raw);
                pw.image(id, LEFT_MM, y, w_mm, h_mm, px_w.max(1), px_h.max(1));
                y += h_mm + 15.0;
            }
            Err(e) => {
                warn!(item = attachment.item_id, error = %e, "imagem não pôde ser incluída no PDF");
                pw.text(LEFT_MM, y, HEADER_FONT_PT, BuiltinFont::Helvetica, DEFECT_TEXT, IMAGE_ERROR_TEXT);
                y += 10.0;
            }
        }
    }
}

/// Gera os bytes do PDF
pub fn render_report(model: &ReportModel, quality: &ImageQuality) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(model.title);
    let mut pw = PageWriter::new();
    let mut warnings = Vec::new();

    pw.centered_text(TITLE_Y_MM, TITLE_FONT_PT, BuiltinFont::Helvetica, model.title);
    for (i, (left, right)) in model.header_left.iter().zip(&model.header_right).enumerate() {
        let y = HEADER_FIRST_LINE_Y_MM + i as f32 * HEADER_LINE_GAP_MM;
        pw.text(LEFT_MM, y, HEADER_FONT_PT, BuiltinFont::Helvetica, BLACK, left);
        pw.text(HEADER_RIGHT_COLUMN_MM, y, HEADER_FONT_PT, BuiltinFont::Helvetica, BLACK, right);
    }
    pw.text(LEFT_MM, PROGRESS_Y_MM, PROGRESS_FONT_PT, BuiltinFont::Helvetica, BLACK, &model.progress_line);

    let table_end = draw_table(&mut pw, &model.rows);
    draw_signatures(&mut pw, table_end, &model.signature_name);
    draw_appendix(&mut doc, &mut pw, &model.attachments, quality, &mut warnings);

    let pages = pw.finish();
    let bytes = doc
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings);
    if bytes.is_empty() {
        return Err(ChecklistError::PdfGeneration("documento vazio".into()));
    }
    Ok(bytes)
}
