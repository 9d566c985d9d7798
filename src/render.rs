//! The rendering entry points.
//!
//! Each function is a single synchronous call.  The parsed document and the drawing
//! surface it creates are released before it returns, whether it succeeds or not.

use std::path::Path;

use gdk_pixbuf::Pixbuf;

use crate::canvas::Canvas;
use crate::error::Error;
use crate::options::{Options, RenderOptions};
use crate::render_log;
use crate::session::Session;
use crate::sizing::ScreenSize;
use crate::tree::Tree;

/// Renders an SVG file to a PNG file.
///
/// The output size is the document's own size, scaled to `options.width` or
/// `options.height` if one of them is set.  An existing file at `png_path` is
/// replaced.
pub fn render_file_to_png<P, Q>(svg_path: P, png_path: Q, options: &Options) -> Result<(), Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let session = Session::new();
    let opt = options.to_render_options()?;

    let tree = Tree::from_file_with_session(session.clone(), svg_path.as_ref(), &opt)?;

    render_tree_to_png(&session, &tree, png_path.as_ref(), &opt)
}

/// Renders an SVG document in a string to a PNG file.
///
/// See [`render_file_to_png`] for how the output size is chosen.  Relative references
/// in the document are only resolved if `options.resources_dir` is set.
pub fn render_string_to_png<Q>(svg: &str, png_path: Q, options: &Options) -> Result<(), Error>
where
    Q: AsRef<Path>,
{
    let session = Session::new();
    let opt = options.to_render_options()?;

    let tree = Tree::from_data_with_session(session.clone(), svg.as_bytes(), &opt)?;

    render_tree_to_png(&session, &tree, png_path.as_ref(), &opt)
}

/// Renders an SVG document in a string to an in-memory image.
///
/// `options.width` and `options.height` are both required and give the exact size of
/// the image; the document is scaled to fit inside it, keeping its aspect ratio.
pub fn render_string_to_image(svg: &str, options: &Options) -> Result<Pixbuf, Error> {
    render_string_to_pixbuf(svg, None, options)
}

/// Like [`render_string_to_image`], but only draws the element with the given `id` and
/// its children.
///
/// The element is drawn where it would be if the whole document were rendered.  If
/// there is no such element, the image is blank; this is not an error.
pub fn render_string_to_image_by_id(
    svg: &str,
    id: &str,
    options: &Options,
) -> Result<Pixbuf, Error> {
    render_string_to_pixbuf(svg, Some(id), options)
}

fn render_tree_to_png(
    session: &Session,
    tree: &Tree,
    png_path: &Path,
    opt: &RenderOptions,
) -> Result<(), Error> {
    let doc_size = tree.size()?;

    let size = opt.fit_to.fit(doc_size).ok_or_else(|| {
        Error::NoCanvas(format!(
            "cannot fit a {}x{} document with {:?}",
            doc_size.w, doc_size.h, opt.fit_to
        ))
    })?;

    render_log!(
        session,
        "rendering {}x{} document to {}x{} PNG",
        doc_size.w,
        doc_size.h,
        size.width,
        size.height
    );

    let canvas = Canvas::new(session, size)?;

    if let Some(color) = opt.background {
        canvas.fill(color)?;
    }

    canvas.render_document(tree)?;
    canvas.write_png(png_path)
}

fn render_string_to_pixbuf(
    svg: &str,
    id: Option<&str>,
    options: &Options,
) -> Result<Pixbuf, Error> {
    let session = Session::new();
    let opt = options.to_render_options()?;

    let size = ScreenSize::new(options.width, options.height).ok_or(Error::InvalidDimensions {
        width: options.width,
        height: options.height,
    })?;

    let tree = Tree::from_data_with_session(session.clone(), svg.as_bytes(), &opt)?;
    let canvas = Canvas::new(&session, size)?;

    if let Some(color) = opt.background {
        canvas.fill(color)?;
    }

    match id {
        None => canvas.render_document(&tree)?,
        Some(id) => {
            canvas.render_element(&tree, id)?;
        }
    }

    canvas.into_pixbuf()
}
