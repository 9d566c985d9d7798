//! Computing the pixel size of a document and of its rendered output.

use float_cmp::approx_eq;
use rsvg::{CairoRenderer, IntrinsicDimensions, Length, LengthUnit};

use crate::error::Error;
use crate::options::FitTo;

/// A size in pixels, possibly fractional.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// A size in whole pixels that a cairo image surface can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    /// Returns `None` if either dimension is zero or too big for cairo.
    pub fn new(width: u32, height: u32) -> Option<ScreenSize> {
        if width == 0 || height == 0 {
            return None;
        }

        Some(ScreenSize {
            width: cast::i32(width).ok()?,
            height: cast::i32(height).ok()?,
        })
    }

    fn from_f64(w: f64, h: f64) -> Option<ScreenSize> {
        let width = cast::i32(w.ceil()).ok()?;
        let height = cast::i32(h.ceil()).ok()?;

        if width <= 0 || height <= 0 {
            return None;
        }

        Some(ScreenSize { width, height })
    }
}

/// Computes the size in pixels at which a document wants to be rendered.
///
/// The size comes from the `width` and `height` of the toplevel `<svg>` if they
/// are absolute lengths.  If they are both `100%` (which is also what they are when
/// missing), the size of the `viewBox` is used instead.  Otherwise the document is
/// measured by computing the extents of everything it draws.
///
/// See <https://www.w3.org/TR/css-images-3/#sizing-terms> for terminology.
pub fn document_size(renderer: &CairoRenderer<'_>) -> Result<Size, Error> {
    let from_intrinsic_dimensions = renderer.intrinsic_size_in_pixels().or_else(|| {
        size_in_pixels_from_percentage_width_and_height(&renderer.intrinsic_dimensions())
    });

    if let Some((w, h)) = from_intrinsic_dimensions {
        Ok(Size::new(w, h))
    } else {
        let (ink_r, _) = renderer.geometry_for_layer(None, &unit_rectangle())?;
        Ok(Size::new(ink_r.width(), ink_r.height()))
    }
}

pub(crate) fn unit_rectangle() -> cairo::Rectangle {
    cairo::Rectangle::new(0.0, 0.0, 1.0, 1.0)
}

/// If the width and height are both 100%, returns the `viewBox` size, which has the
/// correct aspect ratio.
///
/// Percentages cannot be resolved here since there is no viewport to embed the document
/// in, so other percentages give `None`.
fn size_in_pixels_from_percentage_width_and_height(
    dim: &IntrinsicDimensions,
) -> Option<(f64, f64)> {
    let IntrinsicDimensions {
        width,
        height,
        vbox,
    } = *dim;

    match (width, height, vbox) {
        (
            Length {
                length: w,
                unit: LengthUnit::Percent,
            },
            Length {
                length: h,
                unit: LengthUnit::Percent,
            },
            Some(vbox),
        ) if approx_eq!(f64, w, 1.0) && approx_eq!(f64, h, 1.0) => {
            Some((vbox.width(), vbox.height()))
        }

        _ => None,
    }
}

impl FitTo {
    /// Computes the output size for a document of the given size.
    ///
    /// The document size is first rounded up to whole pixels.  Returns `None` if the
    /// result would be empty or too large for a cairo surface.
    pub fn fit(self, input: Size) -> Option<ScreenSize> {
        let w = input.w.ceil();
        let h = input.h.ceil();

        if !(w > 0.0 && h > 0.0) {
            return None;
        }

        match self {
            FitTo::Original => ScreenSize::from_f64(w, h),

            FitTo::Width(width) => {
                let width = f64::from(width);
                ScreenSize::from_f64(width, h * width / w)
            }

            FitTo::Height(height) => {
                let height = f64::from(height);
                ScreenSize::from_f64(w * height / h, height)
            }

            FitTo::Zoom(z) => ScreenSize::from_f64(w * z, h * z),
        }
    }
}
