//! Conversion of rendered surfaces into host images.

use gdk_pixbuf::{Colorspace, Pixbuf};

use crate::error::Error;

/// GdkPixbuf's endian-independent RGBA8 pixel layout, which is also what we use to
/// do arithmetic on Cairo's pixels.
type Pixel = rgb::RGBA8;

trait PixelOps {
    fn from_u32(x: u32) -> Self;
    fn unpremultiply(self) -> Self;
}

impl PixelOps for Pixel {
    /// Decodes Cairo's native-endian `0xaarrggbb`.
    #[inline]
    fn from_u32(x: u32) -> Self {
        Self {
            r: ((x >> 16) & 0xFF) as u8,
            g: ((x >> 8) & 0xFF) as u8,
            b: (x & 0xFF) as u8,
            a: ((x >> 24) & 0xFF) as u8,
        }
    }

    /// For a fully transparent pixel, a transparent black pixel is returned.
    #[inline]
    fn unpremultiply(self) -> Self {
        if self.a == 0 {
            Self {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            }
        } else {
            let alpha = f32::from(self.a) / 255.0;
            self.map_rgb(|x| ((f32::from(x) / alpha) + 0.5) as u8)
        }
    }
}

/// Copies an ARGB32 surface into a new RGBA image with non-premultiplied alpha.
///
/// Nothing else may hold a reference to the surface, such as a `cairo::Context`
/// drawing on it.
pub fn pixbuf_from_surface(surface: &mut cairo::ImageSurface) -> Result<Pixbuf, Error> {
    surface.flush();

    let width = surface.width();
    let height = surface.height();
    let stride = usize::try_from(surface.stride())
        .map_err(|_| Error::NoCanvas(String::from("invalid surface stride")))?;

    if width <= 0 || height <= 0 {
        return Err(Error::NoCanvas(format!(
            "cannot create a {width}x{height} image"
        )));
    }

    let rowstride = width
        .checked_mul(4)
        .ok_or_else(|| Error::NoCanvas(format!("image {width} pixels wide is too big")))?;

    // Both are positive here.
    let (w, h) = (width as usize, height as usize);

    let data = surface
        .data()
        .map_err(|e| Error::Rendering(format!("cannot access surface data: {e:?}")))?;

    let mut pixels = Vec::with_capacity(w * h * 4);

    for row in data.chunks(stride).take(h) {
        for argb in row[..w * 4].chunks_exact(4) {
            let argb = u32::from_ne_bytes([argb[0], argb[1], argb[2], argb[3]]);
            let Pixel { r, g, b, a } = Pixel::from_u32(argb).unpremultiply();
            pixels.extend_from_slice(&[r, g, b, a]);
        }
    }

    let bytes = glib::Bytes::from_owned(pixels);

    Ok(Pixbuf::from_bytes(
        &bytes,
        Colorspace::Rgb,
        true,
        8,
        width,
        height,
        rowstride,
    ))
}
