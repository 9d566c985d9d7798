//! Raster drawing surfaces.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use gdk_pixbuf::Pixbuf;

use crate::error::Error;
use crate::image;
use crate::options::Color;
use crate::render_log;
use crate::session::Session;
use crate::sizing::ScreenSize;
use crate::tree::{fragment_id, Tree};

/// An ARGB32 cairo image surface together with the context that draws on it.
///
/// Both are owned by the `Canvas` and released when it goes out of scope, or when it
/// is consumed by [`Canvas::into_pixbuf`].
pub struct Canvas {
    surface: cairo::ImageSurface,
    cr: cairo::Context,
    session: Session,
}

impl Canvas {
    pub fn new(session: &Session, size: ScreenSize) -> Result<Canvas, Error> {
        let ScreenSize { width, height } = size;

        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
            .map_err(|e| Error::NoCanvas(format!("{width}x{height} surface: {e}")))?;

        let cr = cairo::Context::new(&surface)
            .map_err(|e| Error::NoCanvas(format!("context for {width}x{height} surface: {e}")))?;

        render_log!(session, "created {width}x{height} canvas");

        Ok(Canvas {
            surface,
            cr,
            session: session.clone(),
        })
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    fn viewport(&self) -> cairo::Rectangle {
        cairo::Rectangle::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()))
    }

    /// Paints the whole canvas with an opaque color.
    pub fn fill(&self, color: Color) -> Result<(), Error> {
        self.cr.save()?;
        self.cr.set_source_rgb(
            f64::from(color.r) / 255.0,
            f64::from(color.g) / 255.0,
            f64::from(color.b) / 255.0,
        );
        self.cr.paint()?;
        self.cr.restore()?;

        Ok(())
    }

    /// Renders the whole document, fitted to the canvas.
    pub fn render_document(&self, tree: &Tree) -> Result<(), Error> {
        tree.renderer().render_document(&self.cr, &self.viewport())?;
        Ok(())
    }

    /// Renders only the element with the given `id` and its children, at the place it
    /// would have if the whole document were fitted to the canvas.
    ///
    /// Returns `false`, having drawn nothing, if there is no such element.
    pub fn render_element(&self, tree: &Tree, id: &str) -> Result<bool, Error> {
        if !tree.node_exists(id) {
            render_log!(tree.session(), "no element with id {id:?}; nothing to render");
            return Ok(false);
        }

        tree.renderer()
            .render_layer(&self.cr, Some(fragment_id(id).as_str()), &self.viewport())?;

        Ok(true)
    }

    /// Writes the canvas to a PNG file, replacing the file if it exists.
    ///
    /// On failure the destination file is removed.
    pub fn write_png(&self, path: &Path) -> Result<(), Error> {
        self.surface.flush();

        let file = File::create(path).map_err(|source| Error::FileWriteFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = BufWriter::new(file);

        let res = self
            .surface
            .write_to_png(&mut writer)
            .map_err(|e| Error::write_failed(path.to_path_buf(), e))
            .and_then(|_| {
                writer.flush().map_err(|source| Error::FileWriteFailed {
                    path: path.to_path_buf(),
                    source,
                })
            });

        if res.is_err() {
            drop(writer);
            remove_incomplete(&self.session, path);
        } else {
            render_log!(self.session, "wrote {}", path.display());
        }

        res
    }

    /// Copies the canvas into a new image, releasing the drawing context and surface.
    pub fn into_pixbuf(self) -> Result<Pixbuf, Error> {
        let Canvas {
            mut surface, cr, ..
        } = self;

        // The surface data can only be borrowed once nothing else references the surface.
        drop(cr);

        image::pixbuf_from_surface(&mut surface)
    }
}

/// Returns whether the file was removed.
fn remove_incomplete(session: &Session, path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            render_log!(session, "could not remove incomplete {}: {e}", path.display());
            false
        }
    }
}
