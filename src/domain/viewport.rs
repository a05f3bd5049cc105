//! Pure zoom/pan arithmetic for a displayed schematic.
//!
//! No rendering surface is involved: gestures go in, new coordinates come out.
//! This is the reference model for the view math in `preview.js`, which runs
//! it in the browser. The constants are injected into the script, and the
//! preview tests check that the script reads those and hardcodes none.

/// Box scale applied by one zoom-in step (the box shrinks, content grows).
pub const ZOOM_IN_FACTOR: f64 = 0.8;
/// Box scale applied by one zoom-out step.
pub const ZOOM_OUT_FACTOR: f64 = 1.25;
/// Wheel delta to zoom exponent.
pub const WHEEL_SENSITIVITY: f64 = 0.0015;
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;

/// The `(x, y, width, height)` region of the image's coordinate space shown on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parses the value of an SVG `viewBox` attribute. Rejects degenerate boxes.
    pub fn parse(value: &str) -> Option<Self> {
        let numbers: Vec<f64> = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;

        let [x, y, width, height] = numbers.as_slice() else {
            return None;
        };
        if !width.is_finite() || !height.is_finite() || *width <= 0.0 || *height <= 0.0 {
            return None;
        }

        Some(Self::new(*x, *y, *width, *height))
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Scales the box about its own centre. `factor < 1` zooms in.
    pub fn zoom(&self, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let (cx, cy) = self.center();
        let width = self.width * factor;
        let height = self.height * factor;
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Moves the box opposite to a drag of `(dx, dy)` screen pixels.
    ///
    /// The delta is scaled by box size over display size, so content follows
    /// the pointer at any zoom level or display resolution.
    pub fn pan(&self, dx: f64, dy: f64, display_width: f64, display_height: f64) -> Self {
        if display_width <= 0.0 || display_height <= 0.0 {
            return *self;
        }
        let scale_x = self.width / display_width;
        let scale_y = self.height / display_height;
        Self::new(
            self.x - dx * scale_x,
            self.y - dy * scale_y,
            self.width,
            self.height,
        )
    }

    pub fn to_attribute(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// Box zoom factor for a wheel event; positive deltas (scrolling down) zoom out.
pub fn wheel_factor(delta_y: f64) -> f64 {
    (delta_y * WHEEL_SENSITIVITY).exp()
}

/// Scale + translate fallback for images without a usable `viewBox`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for CssTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl CssTransform {
    /// Multiplies the scale by `factor`, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn zoom(&self, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        Self {
            scale: (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE),
            ..*self
        }
    }

    pub fn pan(&self, dx: f64, dy: f64) -> Self {
        Self {
            translate_x: self.translate_x + dx,
            translate_y: self.translate_y + dy,
            ..*self
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

/// View of one displayed image. Replaced, never reused, when a new image arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewState {
    ViewBox { current: ViewBox, original: ViewBox },
    Css { current: CssTransform },
}

impl ViewState {
    /// Starts viewing an image; `view_box` is the image's own box, if any.
    pub fn load(view_box: Option<ViewBox>) -> Self {
        match view_box {
            Some(original) => ViewState::ViewBox {
                current: original,
                original,
            },
            None => ViewState::Css {
                current: CssTransform::default(),
            },
        }
    }

    pub fn zoom_in(&self) -> Self {
        self.zoom_by(ZOOM_IN_FACTOR)
    }

    pub fn zoom_out(&self) -> Self {
        self.zoom_by(ZOOM_OUT_FACTOR)
    }

    pub fn wheel(&self, delta_y: f64) -> Self {
        self.zoom_by(wheel_factor(delta_y))
    }

    /// `box_factor` is expressed for the box: `< 1` zooms in.
    fn zoom_by(&self, box_factor: f64) -> Self {
        match *self {
            ViewState::ViewBox { current, original } => ViewState::ViewBox {
                current: current.zoom(box_factor),
                original,
            },
            ViewState::Css { current } => ViewState::Css {
                current: current.zoom(1.0 / box_factor),
            },
        }
    }

    pub fn pan(&self, dx: f64, dy: f64, display_width: f64, display_height: f64) -> Self {
        match *self {
            ViewState::ViewBox { current, original } => ViewState::ViewBox {
                current: current.pan(dx, dy, display_width, display_height),
                original,
            },
            ViewState::Css { current } => ViewState::Css {
                current: current.pan(dx, dy),
            },
        }
    }

    /// Restores exactly what was captured at load time.
    pub fn reset(&self) -> Self {
        match *self {
            ViewState::ViewBox { original, .. } => ViewState::ViewBox {
                current: original,
                original,
            },
            ViewState::Css { .. } => ViewState::Css {
                current: CssTransform::default(),
            },
        }
    }
}
