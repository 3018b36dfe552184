use std::{io::Cursor, sync::Arc};

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::ImageFormat;
use resvg::{
    tiny_skia,
    usvg::{self, fontdb},
};

/// Fixed Open Graph canvas dimensions.
pub const WIDTH: u32 = 1200;
pub const HEIGHT: u32 = 630;

/// The cover image occupies half the canvas in both dimensions.
pub const COVER_WIDTH: u32 = WIDTH / 2;
pub const COVER_HEIGHT: u32 = HEIGHT / 2;
/// Gap between the cover and the first title line.
const COVER_GAP: u32 = 20;

/// 1.2 line height at the 60px title size.
pub const LINE_HEIGHT: u32 = 72;
/// Baseline offset from the top of a line box.
const ASCENT: u32 = 48;

/// Greedy wrap budget: roughly 1080px of text (5% padding each side) at
/// 60px with Inter-like metrics. SVG has no automatic text wrapping.
const MAX_LINE_CHARS: usize = 34;

pub fn wrap_title(title: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in title.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() > MAX_LINE_CHARS {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Vertical placement of the content block, centered on the canvas.
pub struct Layout {
    pub cover_y: u32,
    pub title_y: u32,
}

pub fn layout(line_count: usize, has_cover: bool) -> Layout {
    let text_height = line_count as u32 * LINE_HEIGHT;
    let content_height =
        if has_cover { COVER_HEIGHT + COVER_GAP + text_height } else { text_height };
    let top = HEIGHT.saturating_sub(content_height) / 2;
    let title_top = if has_cover { top + COVER_HEIGHT + COVER_GAP } else { top };
    Layout { cover_y: top, title_y: title_top + ASCENT }
}

/// Embed fetched cover bytes as a data URI for the SVG `<image>` element.
/// resvg decodes PNG, JPEG, and GIF natively; anything else is transcoded
/// to PNG first.
pub fn cover_data_uri(data: &[u8]) -> Result<String> {
    let format = image::guess_format(data).context("Unrecognized cover image format")?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif => {
            Ok(format!("data:{};base64,{}", format.to_mime_type(), BASE64.encode(data)))
        }
        _ => {
            let decoded = image::load_from_memory(data).context("Failed to decode cover image")?;
            let mut out = Vec::new();
            decoded
                .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
                .context("Failed to transcode cover image")?;
            Ok(format!("data:image/png;base64,{}", BASE64.encode(&out)))
        }
    }
}

/// Rasterize SVG markup to a PNG using exactly the provided font faces.
///
/// Fails when `family` did not resolve to any loaded face: the card renders
/// with the intended typography or not at all. `load_font_data` skips
/// unparseable faces without reporting, so the check must be explicit.
pub fn render_png(svg: &str, family: &str, faces: &[Vec<u8>]) -> Result<Vec<u8>> {
    let mut db = fontdb::Database::new();
    for data in faces {
        db.load_font_data(data.clone());
    }
    let resolved =
        db.faces().any(|face| face.families.iter().any(|(name, _)| name.as_str() == family));
    if !resolved {
        bail!("No usable face was loaded for font family {family:?}");
    }
    let mut options = usvg::Options::default();
    options.fontdb = Arc::new(db);
    let tree = usvg::Tree::from_str(svg, &options).context("Failed to parse SVG markup")?;
    let mut pixmap =
        tiny_skia::Pixmap::new(WIDTH, HEIGHT).context("Failed to allocate output pixmap")?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap.encode_png().context("Failed to encode PNG")
}
