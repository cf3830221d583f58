//! Image editor model: load, drag-select, crop, undo, resize, save.
//!
//! The editor keeps the loaded original, the current working image (the
//! original or a crop of it) and a LIFO history of earlier working images.
//! Nothing here touches the terminal; the `image_editor` binary feeds in
//! canvas coordinates and draws from the accessors.

pub mod fit;

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;
use log::{debug, info};

pub use fit::{CropRect, Fit, Selection};

/// Main canvas size.
pub const CANVAS_SIZE: (u32, u32) = (600, 400);
/// Reference canvas showing the untouched original.
pub const REFERENCE_SIZE: (u32, u32) = (300, 200);

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 2.0;
pub const SCALE_STEP: f32 = 0.1;

pub const OPEN_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
pub const SAVE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub const NO_IMAGE: &str = "No image loaded.";

/// Working image plus where it sits inside the original.
#[derive(Clone, Debug)]
struct Layer {
    image: RgbImage,
    origin: (u32, u32),
}

#[derive(Debug)]
pub struct Editor {
    original: Option<RgbImage>,
    working: Option<Layer>,
    history: Vec<Layer>,
    view: Option<Fit>,
    resize_scale: f32,
    drag: Option<Selection>,
    status: String,
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

impl Default for Editor {
    fn default() -> Self {
        Editor {
            original: None,
            working: None,
            history: Vec::new(),
            view: None,
            resize_scale: 1.0,
            drag: None,
            status: NO_IMAGE.to_string(),
        }
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    pub fn load(&mut self, path: &Path) -> Result<()> {
        match extension_of(path) {
            Some(ext) if OPEN_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => bail!("unsupported image type: {}", path.display()),
        }
        let image = image::open(path)
            .with_context(|| format!("open image: {}", path.display()))?
            .to_rgb8();
        info!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        self.set_image(image);
        Ok(())
    }

    /// Replace everything with a new original.
    pub fn set_image(&mut self, image: RgbImage) {
        self.history.clear();
        self.drag = None;
        self.working = Some(Layer {
            image: image.clone(),
            origin: (0, 0),
        });
        self.original = Some(image);
        self.refit();
        self.set_info("Original");
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn original(&self) -> Option<&RgbImage> {
        self.original.as_ref()
    }

    pub fn working(&self) -> Option<&RgbImage> {
        self.working.as_ref().map(|l| &l.image)
    }

    /// Placement of the working image on the main canvas.
    pub fn view(&self) -> Option<Fit> {
        self.view
    }

    /// Placement of the original on the reference canvas.
    pub fn reference_view(&self) -> Option<Fit> {
        let img = self.original.as_ref()?;
        Some(Fit::contain(
            img.width(),
            img.height(),
            REFERENCE_SIZE.0,
            REFERENCE_SIZE.1,
        ))
    }

    /// Current crop in original-image coordinates, if the working image is a crop.
    pub fn crop_on_original(&self) -> Option<CropRect> {
        if self.history.is_empty() {
            return None;
        }
        let layer = self.working.as_ref()?;
        Some(CropRect {
            x0: 0,
            y0: 0,
            x1: layer.image.width(),
            y1: layer.image.height(),
        }
        .offset(layer.origin))
    }

    pub fn selection(&self) -> Option<Selection> {
        self.drag
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn resize_scale(&self) -> f32 {
        self.resize_scale
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn set_info(&mut self, label: &str) {
        self.status = match self.working() {
            Some(img) => format!("{}: Image size: {} x {}", label, img.width(), img.height()),
            None => NO_IMAGE.to_string(),
        };
    }

    fn refit(&mut self) {
        self.resize_scale = 1.0;
        self.view = self.working().map(|img| {
            Fit::contain(img.width(), img.height(), CANVAS_SIZE.0, CANVAS_SIZE.1)
        });
    }

    // ── Crop gesture ──────────────────────────────────────────────────────────

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        if self.working.is_none() {
            self.status = NO_IMAGE.to_string();
            return;
        }
        self.drag = Some(Selection {
            start: (x, y),
            end: (x, y),
        });
    }

    pub fn drag_to(&mut self, x: f32, y: f32) {
        if let Some(sel) = self.drag.as_mut() {
            sel.end = (x, y);
        }
    }

    /// Finish the gesture and crop. Empty or off-image selections are
    /// dropped without touching the history.
    pub fn end_drag(&mut self, x: f32, y: f32) -> Option<CropRect> {
        let mut selection = self.drag.take()?;
        selection.end = (x, y);
        let view = self.view?;
        let rect = view.selection_to_source(&selection)?;
        self.crop(rect)
    }

    /// Crop the working image to `rect` (working-image pixels).
    pub fn crop(&mut self, rect: CropRect) -> Option<CropRect> {
        let current = self.working.take()?;
        let fits = rect.x1 <= current.image.width() && rect.y1 <= current.image.height();
        if !fits || rect.x1 <= rect.x0 || rect.y1 <= rect.y0 {
            self.working = Some(current);
            return None;
        }
        let image =
            imageops::crop_imm(&current.image, rect.x0, rect.y0, rect.width(), rect.height())
                .to_image();
        let origin = (current.origin.0 + rect.x0, current.origin.1 + rect.y0);
        debug!("crop {:?} at origin {:?}", rect, origin);
        self.history.push(current);
        self.working = Some(Layer { image, origin });
        self.refit();
        self.set_info("Cropped");
        Some(rect)
    }

    /// Step back one crop. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            if self.working.is_none() {
                self.status = NO_IMAGE.to_string();
            }
            return false;
        };
        self.working = Some(previous);
        self.drag = None;
        self.refit();
        self.set_info("Undo Cropped");
        true
    }

    // ── Resize & save ─────────────────────────────────────────────────────────

    /// Redisplay the working image at `scale`, clamped to the slider range.
    pub fn set_resize_scale(&mut self, scale: f32) {
        let Some((w, h)) = self.working().map(|img| img.dimensions()) else {
            self.status = NO_IMAGE.to_string();
            return;
        };
        let scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        let fit = Fit::scaled(w, h, scale, CANVAS_SIZE.0, CANVAS_SIZE.1);
        self.resize_scale = scale;
        self.view = Some(fit);
        self.status = format!("Displayed: Image size: {} x {}", fit.width, fit.height);
    }

    pub fn nudge_scale(&mut self, steps: i32) {
        let target = self.resize_scale + steps as f32 * SCALE_STEP;
        // Snap to the slider grid so repeated nudges do not drift.
        self.set_resize_scale((target * 10.0).round() / 10.0);
    }

    /// The working image at the current resize scale.
    pub fn displayed_image(&self) -> Option<RgbImage> {
        let img = self.working()?;
        if (self.resize_scale - 1.0).abs() < f32::EPSILON {
            return Some(img.clone());
        }
        let w = ((img.width() as f32 * self.resize_scale) as u32).max(1);
        let h = ((img.height() as f32 * self.resize_scale) as u32).max(1);
        Some(imageops::resize(img, w, h, FilterType::Triangle))
    }

    /// Write the displayed image. A missing extension defaults to `.png`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let Some(image) = self.displayed_image() else {
            self.status = NO_IMAGE.to_string();
            bail!("no image loaded");
        };
        let path = match extension_of(path) {
            None => path.with_extension("png"),
            Some(ext) if SAVE_EXTENSIONS.contains(&ext.as_str()) => {
                path.to_path_buf()
            }
            Some(ext) => bail!("unsupported save type: .{}", ext),
        };
        image
            .save(&path)
            .with_context(|| format!("save image: {}", path.display()))?;
        info!("saved {}", path.display());
        self.status = format!("Saved: {}", path.display());
        Ok(())
    }
}
