//! Utilities for the integration tests.

mod png;

pub use self::png::PngPredicate;

pub fn is_png() -> PngPredicate {
    PngPredicate {}
}
