/// Terminal rendering for the image editor. Images are drawn with
/// half-block glyphs: every cell shows two vertically stacked pixels.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use image::RgbImage;
use tank_arcade::editor::{Editor, Fit, CANVAS_SIZE, MAX_SCALE, MIN_SCALE, REFERENCE_SIZE};
use tank_arcade::viewport::Viewport;

const C_CANVAS: Color = Color::Rgb { r: 24, g: 24, b: 24 };
const C_FRAME: Color = Color::DarkGrey;
const C_CROP: Color = Color::Red;
const C_TITLE: Color = Color::Cyan;
const C_STATUS: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// Where the two canvases land for a terminal of the given size.
pub struct Layout {
    pub main: Viewport,
    pub reference: Viewport,
    pub height: u16,
}

impl Layout {
    pub fn new(width: u16, height: u16) -> Self {
        let main_cols = (width.saturating_mul(2) / 3).saturating_sub(2).max(1);
        let main_rows = height.saturating_sub(6).max(1);
        let main = Viewport::new(
            1,
            2,
            main_cols,
            main_rows,
            CANVAS_SIZE.0 as f32,
            CANVAS_SIZE.1 as f32,
        );
        let ref_col = main.col + main.cols + 2;
        let reference = Viewport::new(
            ref_col,
            2,
            width.saturating_sub(ref_col + 1).max(1),
            (main_rows / 2).max(1),
            REFERENCE_SIZE.0 as f32,
            REFERENCE_SIZE.1 as f32,
        );
        Layout {
            main,
            reference,
            height,
        }
    }
}

fn rgb_at(image: &RgbImage, fit: &Fit, x: f32, y: f32) -> Color {
    match fit.pixel_at(x, y) {
        Some((px, py)) => {
            let [r, g, b] = image.get_pixel(px, py).0;
            Color::Rgb { r, g, b }
        }
        None => C_CANVAS,
    }
}

fn draw_frame<W: Write>(out: &mut W, vp: &Viewport, title: &str) -> std::io::Result<()> {
    let inner = vp.cols as usize;
    out.queue(style::SetForegroundColor(C_FRAME))?;
    out.queue(cursor::MoveTo(vp.col - 1, vp.row - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    out.queue(cursor::MoveTo(vp.col + 1, vp.row - 1))?;
    out.queue(Print(title))?;
    out.queue(cursor::MoveTo(vp.col - 1, vp.row + vp.rows))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;
    for row in vp.row..vp.row + vp.rows {
        out.queue(cursor::MoveTo(vp.col - 1, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.col + vp.cols, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

/// Paint an image into a viewport through its fit.
fn draw_image<W: Write>(
    out: &mut W,
    image: Option<&RgbImage>,
    fit: Option<Fit>,
    vp: &Viewport,
) -> std::io::Result<()> {
    for r in 0..vp.rows {
        out.queue(cursor::MoveTo(vp.col, vp.row + r))?;
        for c in 0..vp.cols {
            let (top, bottom) = match (image, fit.as_ref()) {
                (Some(img), Some(fit)) => {
                    let (tx, ty) = vp.half_cell_logical(c, r, 0);
                    let (bx, by) = vp.half_cell_logical(c, r, 1);
                    (rgb_at(img, fit, tx, ty), rgb_at(img, fit, bx, by))
                }
                _ => (C_CANVAS, C_CANVAS),
            };
            out.queue(style::SetForegroundColor(top))?;
            out.queue(style::SetBackgroundColor(bottom))?;
            out.queue(Print("▀"))?;
        }
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

/// Outline a canvas-space rectangle.
fn draw_outline<W: Write>(
    out: &mut W,
    (x0, y0, x1, y1): (f32, f32, f32, f32),
    vp: &Viewport,
) -> std::io::Result<()> {
    let (c0, r0) = vp.to_cell(x0, y0);
    let (c1, r1) = vp.to_cell(x1, y1);
    out.queue(style::SetForegroundColor(C_CROP))?;
    for col in c0..=c1 {
        out.queue(cursor::MoveTo(col, r0))?;
        out.queue(Print("─"))?;
        out.queue(cursor::MoveTo(col, r1))?;
        out.queue(Print("─"))?;
    }
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(c1, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn scale_slider(scale: f32, width: usize) -> String {
    let t = ((scale - MIN_SCALE) / (MAX_SCALE - MIN_SCALE)).clamp(0.0, 1.0);
    let knob = (t * width.saturating_sub(1) as f32).round() as usize;
    let track: String = (0..width)
        .map(|i| if i == knob { '●' } else { '─' })
        .collect();
    format!("Scale {:.1}x [{}]", scale, track)
}

/// Render the whole editor. `status` overrides the editor's own label
/// (prompts and errors).
pub fn render<W: Write>(
    out: &mut W,
    editor: &Editor,
    layout: &Layout,
    status: Option<&str>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print("Image Editor"))?;

    draw_frame(out, &layout.main, " Canvas ")?;
    draw_image(out, editor.working(), editor.view(), &layout.main)?;
    if let Some(sel) = editor.selection() {
        draw_outline(out, sel.normalized(), &layout.main)?;
    }

    draw_frame(out, &layout.reference, " Original ")?;
    let reference = editor.reference_view();
    draw_image(out, editor.original(), reference, &layout.reference)?;
    if let (Some(fit), Some(crop)) = (reference, editor.crop_on_original()) {
        draw_outline(out, fit.crop_to_canvas(&crop), &layout.reference)?;
    }

    let bottom = layout.main.row + layout.main.rows + 1;
    out.queue(cursor::MoveTo(1, bottom))?;
    out.queue(style::SetForegroundColor(C_STATUS))?;
    out.queue(Print(scale_slider(editor.resize_scale(), 20)))?;

    out.queue(cursor::MoveTo(1, bottom + 1))?;
    out.queue(Print(status.unwrap_or_else(|| editor.status())))?;

    out.queue(cursor::MoveTo(1, bottom + 2))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "drag : Crop   O : Open   S : Save   U : Undo   + / - : Scale   Q : Quit",
    ))?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, layout.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}
