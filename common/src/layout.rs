//! Layout do relatório (mm, origem no canto superior esquerdo)
//!
//! O gerador de PDF converte para a origem inferior esquerda.

/// A4 (mm)
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Margem esquerda da tabela e dos textos
pub const LEFT_MM: f32 = 14.0;
/// Coluna direita do cabeçalho
pub const HEADER_RIGHT_COLUMN_MM: f32 = 105.0;

pub const TITLE_Y_MM: f32 = 20.0;
pub const HEADER_FIRST_LINE_Y_MM: f32 = 35.0;
pub const HEADER_LINE_GAP_MM: f32 = 7.0;
pub const PROGRESS_Y_MM: f32 = 55.0;
pub const TABLE_START_Y_MM: f32 = 65.0;
/// Limite inferior da tabela antes de quebrar página
pub const TABLE_BOTTOM_MM: f32 = A4_HEIGHT_MM - 15.0;
pub const TABLE_TOP_ON_NEW_PAGE_MM: f32 = 15.0;

/// Larguras das colunas: item, status, observações
pub const COLUMN_WIDTHS_MM: [f32; 3] = [88.0, 28.0, 66.0];
pub const CELL_PADDING_MM: f32 = 2.0;
pub const CELL_LINE_HEIGHT_MM: f32 = 4.5;
/// Caracteres por linha em cada coluna (Helvetica 9pt)
pub const COLUMN_WRAP_CHARS: [usize; 3] = [52, 14, 38];

/// Assinaturas
pub const SIGNATURE_GAP_MM: f32 = 30.0;
pub const SIGNATURE_BLOCK_HEIGHT_MM: f32 = 40.0;
pub const SIGNATURE_Y_ON_NEW_PAGE_MM: f32 = 40.0;
pub const SIGNATURE_LINES_MM: [(f32, f32); 2] = [(20.0, 90.0), (120.0, 190.0)];

/// Anexos de imagens
pub const APPENDIX_TOP_MM: f32 = 20.0;
pub const APPENDIX_IMAGE_WIDTH_MM: f32 = 100.0;
/// Passou deste ponto, o próximo anexo vai para nova página
pub const APPENDIX_PAGE_BREAK_Y_MM: f32 = 190.0;

/// Cores (RGB 0-255)
pub const HEAD_FILL: (u8, u8, u8) = (41, 128, 185);
pub const CATEGORY_FILL: (u8, u8, u8) = (22, 163, 163);
pub const OK_TEXT: (u8, u8, u8) = (0, 128, 0);
pub const DEFECT_TEXT: (u8, u8, u8) = (255, 0, 0);

/// Fonte (pt)
pub const TITLE_FONT_PT: f32 = 20.0;
pub const HEADER_FONT_PT: f32 = 12.0;
pub const PROGRESS_FONT_PT: f32 = 14.0;
pub const TABLE_FONT_PT: f32 = 9.0;
pub const SIGNATURE_FONT_PT: f32 = 10.0;
pub const APPENDIX_TITLE_FONT_PT: f32 = 16.0;

/// mm → pt (1mm = 72/25.4 pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// Converte y (topo) para a origem inferior do PDF
pub fn flip_y(y_from_top_mm: f32) -> f32 {
    A4_HEIGHT_MM - y_from_top_mm
}

/// Largura aproximada de um texto em Helvetica (mm)
pub fn approx_text_width_mm(text: &str, font_pt: f32) -> f32 {
    text.chars().count() as f32 * font_pt * 0.5 / MM_TO_PT
}
