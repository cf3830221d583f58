//! Placement of an image on a fixed-size canvas: uniform scale plus a
//! centring offset, and the mapping between canvas and source pixels.

/// Crop region in source pixels, half-open: `x0..x1`, `y0..y1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// Shift by an origin, turning a crop of a crop into original-image coordinates.
    pub fn offset(&self, (dx, dy): (u32, u32)) -> CropRect {
        CropRect {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }
}

/// Two canvas points from a drag gesture, in any order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

impl Selection {
    /// (min_x, min_y, max_x, max_y)
    pub fn normalized(&self) -> (f32, f32, f32, f32) {
        (
            self.start.0.min(self.end.0),
            self.start.1.min(self.end.1),
            self.start.0.max(self.end.0),
            self.start.1.max(self.end.1),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    pub scale: f32,
    pub offset_x: i32,
    pub offset_y: i32,
    /// Displayed size on the canvas.
    pub width: u32,
    pub height: u32,
    /// Source image size.
    pub src_width: u32,
    pub src_height: u32,
}

impl Fit {
    /// Shrink to fit the canvas (never enlarge) and centre.
    pub fn contain(src_width: u32, src_height: u32, canvas_w: u32, canvas_h: u32) -> Fit {
        let scale = (canvas_w as f32 / src_width.max(1) as f32)
            .min(canvas_h as f32 / src_height.max(1) as f32)
            .min(1.0);
        Fit::scaled(src_width, src_height, scale, canvas_w, canvas_h)
    }

    /// Explicit scale, centred. The image may overflow the canvas, in which
    /// case the offset goes negative.
    pub fn scaled(src_width: u32, src_height: u32, scale: f32, canvas_w: u32, canvas_h: u32) -> Fit {
        let width = (src_width as f32 * scale) as u32;
        let height = (src_height as f32 * scale) as u32;
        Fit {
            scale,
            offset_x: (canvas_w as i32 - width as i32).div_euclid(2),
            offset_y: (canvas_h as i32 - height as i32).div_euclid(2),
            width,
            height,
            src_width,
            src_height,
        }
    }

    pub fn canvas_to_source(&self, cx: f32, cy: f32) -> (f32, f32) {
        (
            (cx - self.offset_x as f32) / self.scale,
            (cy - self.offset_y as f32) / self.scale,
        )
    }

    pub fn source_to_canvas(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            sx * self.scale + self.offset_x as f32,
            sy * self.scale + self.offset_y as f32,
        )
    }

    /// Source pixel under a canvas point, if the point lands on the image.
    pub fn pixel_at(&self, cx: f32, cy: f32) -> Option<(u32, u32)> {
        let (sx, sy) = self.canvas_to_source(cx, cy);
        if sx < 0.0 || sy < 0.0 {
            return None;
        }
        let (px, py) = (sx as u32, sy as u32);
        (px < self.src_width && py < self.src_height).then_some((px, py))
    }

    /// Map a drag selection to source pixels: normalise, truncate, clamp to
    /// the image. Empty results are `None`.
    pub fn selection_to_source(&self, selection: &Selection) -> Option<CropRect> {
        let (x0, y0, x1, y1) = selection.normalized();
        let (sx0, sy0) = self.canvas_to_source(x0, y0);
        let (sx1, sy1) = self.canvas_to_source(x1, y1);
        let clamp = |v: f32, max: u32| (v.trunc().max(0.0) as u32).min(max);
        let rect = CropRect {
            x0: clamp(sx0, self.src_width),
            y0: clamp(sy0, self.src_height),
            x1: clamp(sx1, self.src_width),
            y1: clamp(sy1, self.src_height),
        };
        (rect.x1 > rect.x0 && rect.y1 > rect.y0).then_some(rect)
    }

    /// Canvas rectangle (x0, y0, x1, y1) outlining a source crop.
    pub fn crop_to_canvas(&self, crop: &CropRect) -> (f32, f32, f32, f32) {
        let (x0, y0) = self.source_to_canvas(crop.x0 as f32, crop.y0 as f32);
        let (x1, y1) = self.source_to_canvas(crop.x1 as f32, crop.y1 as f32);
        (x0.round(), y0.round(), x1.round(), y1.round())
    }
}
