//! Render SVG files and strings to PNG files or in-memory images.
//!
//! This crate is a small layer over [librsvg](https://docs.rs/librsvg), which parses
//! and renders the SVG, and over Cairo, which rasterizes it.  It adds sizing options
//! that keep the document's aspect ratio, an optional opaque background, conversion of
//! the result into a [`gdk_pixbuf::Pixbuf`], and a classification of errors into
//! [`ErrorKind`] with stable integer codes.
//!
//! # Example
//!
//! ```no_run
//! use svg_render::{render_file_to_png, render_string_to_image, Options};
//!
//! let options = Options::default()
//!     .with_width(200)
//!     .with_background_color("#ffffff");
//!
//! render_file_to_png("drawing.svg", "drawing.png", &options)?;
//!
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">
//!   <circle cx="5" cy="5" r="4"/>
//! </svg>"#;
//!
//! let pixbuf = render_string_to_image(svg, &Options::default().with_size(64, 64))?;
//! assert_eq!(pixbuf.width(), 64);
//! # Ok::<(), svg_render::Error>(())
//! ```
//!
//! # Logging
//!
//! Set the `SVG_RENDER_LOG` environment variable to any value to print what each call
//! does to standard output.

#![warn(nonstandard_style, rust_2018_idioms, unused)]
#![warn(trivial_casts, trivial_numeric_casts)]

pub use crate::canvas::Canvas;
pub use crate::error::{Error, ErrorKind};
pub use crate::image::pixbuf_from_surface;
pub use crate::log::LOG_ENV_VAR;
pub use crate::options::{parse_hex_color, Color, FitTo, Options, RenderOptions, DEFAULT_DPI};
pub use crate::render::{
    render_file_to_png, render_string_to_image, render_string_to_image_by_id,
    render_string_to_png,
};
pub use crate::session::Session;
pub use crate::sizing::{ScreenSize, Size};
pub use crate::tree::Tree;

mod canvas;
mod error;
mod image;
mod log;
mod options;
mod render;
mod session;
mod sizing;
mod tree;
