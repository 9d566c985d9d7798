//! Rendering options and their translation for the SVG engine.

use std::path::PathBuf;

use crate::error::Error;

/// An opaque RGB background color.
pub type Color = rgb::RGB8;

/// Default pixel density, the same as the SVG engine's.
pub const DEFAULT_DPI: f64 = 96.0;

/// Options accepted by the rendering functions.
///
/// The defaults render an SVG at its own size at 96 DPI, on a transparent
/// background.  You can set the fields directly or chain the `with_*` methods:
///
/// ```
/// use svg_render::Options;
///
/// let options = Options::default()
///     .with_width(200)
///     .with_background_color("#eeddcc");
/// # assert_eq!(options.width, 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Output width in pixels; 0 means unconstrained.
    pub width: u32,

    /// Output height in pixels; 0 means unconstrained.
    pub height: u32,

    /// Dots per inch used to resolve physical units like `cm` and `in`.
    pub dpi: f64,

    /// Opaque background color as `#RRGGBB`.  `None` or an empty string means a
    /// transparent background.
    pub background_color: Option<String>,

    /// Scale factor to apply when neither `width` nor `height` is set.
    pub zoom: Option<f64>,

    /// Directory used to resolve relative references in SVG strings.
    pub resources_dir: Option<PathBuf>,

    /// Lifts the XML parser's safety limits.  Only use this for trusted documents.
    pub unlimited_size: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            width: 0,
            height: 0,
            dpi: DEFAULT_DPI,
            background_color: None,
            zoom: None,
            resources_dir: None,
            unlimited_size: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(self, width: u32) -> Self {
        Options { width, ..self }
    }

    pub fn with_height(self, height: u32) -> Self {
        Options { height, ..self }
    }

    /// Sets both dimensions at once, as needed by the in-memory rendering functions.
    pub fn with_size(self, width: u32, height: u32) -> Self {
        Options {
            width,
            height,
            ..self
        }
    }

    pub fn with_dpi(self, dpi: f64) -> Self {
        Options { dpi, ..self }
    }

    pub fn with_background_color(self, color: &str) -> Self {
        Options {
            background_color: Some(color.to_string()),
            ..self
        }
    }

    pub fn with_zoom(self, zoom: f64) -> Self {
        Options {
            zoom: Some(zoom),
            ..self
        }
    }

    pub fn with_resources_dir<P: Into<PathBuf>>(self, dir: P) -> Self {
        Options {
            resources_dir: Some(dir.into()),
            ..self
        }
    }

    pub fn with_unlimited_size(self, unlimited: bool) -> Self {
        Options {
            unlimited_size: unlimited,
            ..self
        }
    }

    /// Translates these options into the engine's [`RenderOptions`].
    ///
    /// The engine defaults are set up first and then overridden.  `width` takes
    /// precedence over `height`, which takes precedence over `zoom`.
    ///
    /// Fails if the DPI or the zoom factor are not positive, or if the background
    /// color is not a valid `#RRGGBB` string.
    pub fn to_render_options(&self) -> Result<RenderOptions, Error> {
        let mut opt = RenderOptions::default();

        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::InvalidDpi(self.dpi));
        }
        opt.dpi = self.dpi;

        if self.width > 0 {
            opt.fit_to = FitTo::Width(self.width);
        } else if self.height > 0 {
            opt.fit_to = FitTo::Height(self.height);
        } else if let Some(zoom) = self.zoom {
            if !(zoom.is_finite() && zoom > 0.0) {
                return Err(Error::InvalidZoom(zoom));
            }
            opt.fit_to = FitTo::Zoom(zoom);
        }

        match self.background_color.as_deref() {
            Some(s) if !s.is_empty() => opt.background = Some(parse_hex_color(s)?),
            _ => (),
        }

        opt.resources_dir = self.resources_dir.clone();
        opt.unlimited_size = self.unlimited_size;

        Ok(opt)
    }
}

/// How to scale a document's own size to get the output size.
///
/// All modes keep the aspect ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FitTo {
    /// Use the document's size.
    Original,

    /// Scale to the given width in pixels.
    Width(u32),

    /// Scale to the given height in pixels.
    Height(u32),

    /// Multiply the document's size by a factor.
    Zoom(f64),
}

/// Options in the form used to drive the SVG engine and the drawing library.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub dpi: f64,
    pub fit_to: FitTo,

    /// Color to fill the canvas with before rendering; `None` leaves it transparent.
    pub background: Option<Color>,

    pub resources_dir: Option<PathBuf>,
    pub unlimited_size: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            dpi: DEFAULT_DPI,
            fit_to: FitTo::Original,
            background: None,
            resources_dir: None,
            unlimited_size: false,
        }
    }
}

/// Parses a color of the form `#RRGGBB`.
///
/// Exactly six hex digits are required after the `#`; either case is accepted.
pub fn parse_hex_color(s: &str) -> Result<Color, Error> {
    let invalid = || Error::InvalidHexColor(s.to_string());

    let digits = s.strip_prefix('#').ok_or_else(invalid)?;

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let component = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

    Ok(Color {
        r: component(0)?,
        g: component(2)?,
        b: component(4)?,
    })
}
