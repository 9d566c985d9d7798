//! Parsed SVG documents.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::str;

use gio::prelude::*;
use rsvg::{CairoRenderer, Loader, LoadingError, SvgHandle};

use crate::error::Error;
use crate::options::RenderOptions;
use crate::render_log;
use crate::session::Session;
use crate::sizing::{self, Size};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// Relative references are resolved against a file, not a directory, so strings
// loaded with a resources directory pretend to live in this file inside it.
const BASE_FILE_NAME: &str = "document.svg";

/// A parsed SVG document, ready to be rendered.
///
/// The document is owned by the `Tree` and released when it goes out of scope.
pub struct Tree {
    handle: SvgHandle,
    dpi: f64,
    session: Session,
}

impl Tree {
    /// Loads an SVG document from a `.svg` or `.svgz` file.
    ///
    /// `.svgz` files must be gzip-compressed.  The document, once decompressed, must
    /// be UTF-8.  The file's location is used to resolve relative references in the
    /// document.
    pub fn from_file<P: AsRef<Path>>(path: P, opt: &RenderOptions) -> Result<Tree, Error> {
        Self::from_file_with_session(Session::new(), path.as_ref(), opt)
    }

    /// Loads an SVG document from UTF-8 bytes, or from gzip-compressed UTF-8 bytes.
    ///
    /// If [`RenderOptions::resources_dir`] is set, relative references in the document
    /// are resolved against it; otherwise they are not allowed.
    pub fn from_data(data: &[u8], opt: &RenderOptions) -> Result<Tree, Error> {
        Self::from_data_with_session(Session::new(), data, opt)
    }

    /// Loads an SVG document from a string.  See [`Tree::from_data`].
    pub fn from_str(svg: &str, opt: &RenderOptions) -> Result<Tree, Error> {
        Self::from_data(svg.as_bytes(), opt)
    }

    pub(crate) fn from_file_with_session(
        session: Session,
        path: &Path,
        opt: &RenderOptions,
    ) -> Result<Tree, Error> {
        let compressed = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => false,
            Some(ext) if ext.eq_ignore_ascii_case("svgz") => true,
            _ => return Err(Error::InvalidFileSuffix(path.to_path_buf())),
        };

        let data = fs::read(path).map_err(|source| Error::FileOpenFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let data = if compressed {
            if !is_gzip(&data) {
                return Err(Error::MalformedGzip(format!(
                    "{}: missing gzip header",
                    path.display()
                )));
            }

            decompress(data)
                .map_err(|e| Error::MalformedGzip(format!("{}: {e}", path.display())))?
        } else {
            data
        };

        str::from_utf8(&data).map_err(Error::NotUtf8)?;

        render_log!(session, "loading {} ({} bytes)", path.display(), data.len());

        let base_file = gio::File::for_path(path);

        Ok(Self::load(session, data, Some(&base_file), opt)?)
    }

    pub(crate) fn from_data_with_session(
        session: Session,
        data: &[u8],
        opt: &RenderOptions,
    ) -> Result<Tree, Error> {
        let data = if is_gzip(data) {
            decompress(data.to_vec()).map_err(|e| Error::MalformedGzip(e.to_string()))?
        } else {
            data.to_vec()
        };

        str::from_utf8(&data).map_err(Error::NotUtf8)?;

        render_log!(session, "loading SVG data ({} bytes)", data.len());

        let base_file = opt
            .resources_dir
            .as_ref()
            .map(|dir| gio::File::for_path(dir.join(BASE_FILE_NAME)));

        Ok(Self::load(session, data, base_file.as_ref(), opt)?)
    }

    fn load(
        session: Session,
        data: Vec<u8>,
        base_file: Option<&gio::File>,
        opt: &RenderOptions,
    ) -> Result<Tree, LoadingError> {
        let bytes = glib::Bytes::from_owned(data);
        let stream = gio::MemoryInputStream::from_bytes(&bytes);

        let handle = Loader::new()
            .with_unlimited_size(opt.unlimited_size)
            .read_stream(&stream, base_file, None::<&gio::Cancellable>)?;

        Ok(Tree {
            handle,
            dpi: opt.dpi,
            session,
        })
    }

    pub(crate) fn renderer(&self) -> CairoRenderer<'_> {
        CairoRenderer::new(&self.handle).with_dpi(self.dpi, self.dpi)
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// The size in pixels at which the document wants to be rendered.
    pub fn size(&self) -> Result<Size, Error> {
        sizing::document_size(&self.renderer())
    }

    /// The `viewBox` of the toplevel `<svg>` element, if it has one.
    pub fn view_box(&self) -> Option<cairo::Rectangle> {
        self.renderer().intrinsic_dimensions().vbox
    }

    /// Whether rendering the document would draw nothing at all.
    pub fn is_empty(&self) -> Result<bool, Error> {
        let (ink_r, _) = self
            .renderer()
            .geometry_for_layer(None, &sizing::unit_rectangle())?;

        Ok(is_empty_rect(&ink_r))
    }

    /// Whether the document has an element with the given `id`.
    ///
    /// The `id` can be given with or without a leading `#`.  Ids that are not valid
    /// fragment identifiers are never found.
    pub fn node_exists(&self, id: &str) -> bool {
        let fragment = fragment_id(id);

        match self.handle.has_element_with_id(&fragment) {
            Ok(exists) => exists,
            Err(e) => {
                render_log!(self.session, "cannot look up element {fragment:?}: {e}");
                false
            }
        }
    }

    /// The bounding box of an element, in the pixel coordinates of the whole document
    /// rendered at [`Tree::size`].
    ///
    /// The box includes strokes.  Returns `None` if there is no such element or if it
    /// draws nothing.
    pub fn node_bbox(&self, id: &str) -> Result<Option<cairo::Rectangle>, Error> {
        if !self.node_exists(id) {
            return Ok(None);
        }

        let size = self.size()?;
        let viewport = cairo::Rectangle::new(0.0, 0.0, size.w, size.h);

        let (ink_r, _) = self
            .renderer()
            .geometry_for_layer(Some(fragment_id(id).as_str()), &viewport)?;

        if is_empty_rect(&ink_r) {
            Ok(None)
        } else {
            Ok(Some(ink_r))
        }
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        render_log!(self.session, "releasing render tree");
    }
}

fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Inflates a gzip stream with gio's zlib converter.
fn decompress(data: Vec<u8>) -> io::Result<Vec<u8>> {
    let bytes = glib::Bytes::from_owned(data);
    let stream = gio::MemoryInputStream::from_bytes(&bytes);
    let decomp = gio::ZlibDecompressor::new(gio::ZlibCompressorFormat::Gzip);
    let converter = gio::ConverterInputStream::new(&stream, &decomp);

    let mut out = Vec::new();
    converter.into_read().read_to_end(&mut out)?;

    Ok(out)
}

/// The engine looks up elements by fragment identifier, like `#foo`.
pub(crate) fn fragment_id(id: &str) -> String {
    if id.starts_with('#') {
        id.to_string()
    } else {
        format!("#{id}")
    }
}

fn is_empty_rect(r: &cairo::Rectangle) -> bool {
    !(r.width() > 0.0 && r.height() > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
  <rect id="box" x="10" y="10" width="20" height="20" fill="#00ff00"/>
  <g id="nothing"/>
</svg>"##;

    fn load(svg: &str) -> Tree {
        Tree::from_str(svg, &RenderOptions::default()).unwrap()
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn fragment_ids() {
        assert_eq!(fragment_id("foo"), "#foo");
        assert_eq!(fragment_id("#foo"), "#foo");
    }

    #[test]
    fn size_from_width_and_height() {
        assert_eq!(load(SVG).size().unwrap(), Size::new(100.0, 50.0));
    }

    #[test]
    fn physical_units_use_dpi() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1in" height="2in"/>"#;
        let opt = RenderOptions {
            dpi: 72.0,
            ..RenderOptions::default()
        };

        let tree = Tree::from_str(svg, &opt).unwrap();
        assert_eq!(tree.size().unwrap(), Size::new(72.0, 144.0));
    }

    #[test]
    fn view_box_is_exposed() {
        assert_eq!(load(SVG).view_box(), None);

        let tree = load(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-52 -53 100 100"/>"#);
        assert_eq!(
            tree.view_box(),
            Some(cairo::Rectangle::new(-52.0, -53.0, 100.0, 100.0))
        );
        assert_eq!(tree.size().unwrap(), Size::new(100.0, 100.0));
    }

    #[test]
    fn percentage_size_without_view_box_uses_ink_extents() {
        let tree = load(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="50%" height="50%">
  <rect x="10" y="10" width="20" height="30" fill="#000000"/>
</svg>"##,
        );

        assert_eq!(tree.view_box(), None);
        assert_eq!(tree.size().unwrap(), Size::new(20.0, 30.0));
    }

    #[test]
    fn finds_elements_with_or_without_hash() {
        let tree = load(SVG);

        assert!(tree.node_exists("box"));
        assert!(tree.node_exists("#box"));
        assert!(!tree.node_exists("missing"));
        assert!(!tree.node_exists(""));
    }

    #[test]
    fn bounding_boxes() {
        let tree = load(SVG);

        assert_eq!(
            tree.node_bbox("box").unwrap(),
            Some(cairo::Rectangle::new(10.0, 10.0, 20.0, 20.0))
        );
        assert_eq!(tree.node_bbox("nothing").unwrap(), None);
        assert_eq!(tree.node_bbox("missing").unwrap(), None);
    }

    #[test]
    fn emptiness() {
        assert!(!load(SVG).is_empty().unwrap());
        assert!(load(r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#)
            .is_empty()
            .unwrap());
    }

    #[test]
    fn rejects_invalid_utf8() {
        let data = b"<svg xmlns=\"http://www.w3.org/2000/svg\"><title>\xff</title></svg>";
        assert!(matches!(
            Tree::from_data(data, &RenderOptions::default()),
            Err(Error::NotUtf8(_))
        ));
    }

    #[test]
    fn reports_parse_errors() {
        assert!(matches!(
            Tree::from_str("<svg", &RenderOptions::default()),
            Err(Error::ParsingFailed(_))
        ));
        assert!(matches!(
            Tree::from_str("<html/>", &RenderOptions::default()),
            Err(Error::ParsingFailed(_))
        ));
    }

    #[test]
    fn file_suffix_is_checked_before_opening() {
        for name in ["drawing.png", "drawing", "drawing.svg.txt"] {
            assert!(matches!(
                Tree::from_file(name, &RenderOptions::default()),
                Err(Error::InvalidFileSuffix(_))
            ));
        }
    }

    #[test]
    fn missing_file_cannot_be_opened() {
        assert!(matches!(
            Tree::from_file("does/not/exist.SVG", &RenderOptions::default()),
            Err(Error::FileOpenFailed { .. })
        ));
    }

    #[test]
    fn compressed_data_is_decompressed() {
        let data = fs::read(fixture("circles.svgz")).unwrap();

        let tree = Tree::from_data(&data, &RenderOptions::default()).unwrap();
        assert_eq!(tree.size().unwrap(), Size::new(100.0, 100.0));
        assert!(tree.node_exists("center"));
    }

    #[test]
    fn corrupt_compressed_data() {
        let data = fs::read(fixture("truncated.svgz")).unwrap();

        assert!(matches!(
            Tree::from_data(&data, &RenderOptions::default()),
            Err(Error::MalformedGzip(_))
        ));
        assert!(matches!(
            Tree::from_file(fixture("truncated.svgz"), &RenderOptions::default()),
            Err(Error::MalformedGzip(_))
        ));
    }

    #[test]
    fn compressed_files_must_be_utf8() {
        assert!(matches!(
            Tree::from_file(fixture("latin1.svgz"), &RenderOptions::default()),
            Err(Error::NotUtf8(_))
        ));

        let data = fs::read(fixture("latin1.svgz")).unwrap();
        assert!(matches!(
            Tree::from_data(&data, &RenderOptions::default()),
            Err(Error::NotUtf8(_))
        ));
    }

    #[test]
    fn compressed_files_report_parse_errors() {
        assert!(matches!(
            Tree::from_file(fixture("not-svg.svgz"), &RenderOptions::default()),
            Err(Error::ParsingFailed(_))
        ));
    }

    #[test]
    fn uncompressed_svgz_is_malformed() {
        assert!(matches!(
            Tree::from_file(fixture("not-gzip.svgz"), &RenderOptions::default()),
            Err(Error::MalformedGzip(_))
        ));
    }
}
