use predicates::prelude::*;
use predicates::reflection::{Case, Child, PredicateReflection, Product};
use std::fmt;

/// Checks that the variable of type [u8] can be parsed as a PNG file.
#[derive(Debug)]
pub struct PngPredicate {}

impl PngPredicate {
    pub fn with_size(self, w: u32, h: u32) -> SizePredicate {
        SizePredicate { p: self, w, h }
    }
}

impl Predicate<[u8]> for PngPredicate {
    fn eval(&self, data: &[u8]) -> bool {
        png::Decoder::new(data).read_info().is_ok()
    }

    fn find_case<'a>(&'a self, expected: bool, data: &[u8]) -> Option<Case<'a>> {
        match png::Decoder::new(data).read_info() {
            Ok(_) if expected => Some(Case::new(Some(self), true)),
            Ok(_) => None,
            Err(e) if !expected => {
                Some(Case::new(Some(self), false).add_product(Product::new("Error", e)))
            }
            Err(_) => None,
        }
    }
}

impl PredicateReflection for PngPredicate {}

impl fmt::Display for PngPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "is a PNG")
    }
}

/// Extends a PngPredicate by a check for a given size of the PNG file.
#[derive(Debug)]
pub struct SizePredicate {
    p: PngPredicate,
    w: u32,
    h: u32,
}

impl SizePredicate {
    fn size_of(data: &[u8]) -> Result<(u32, u32), png::DecodingError> {
        let reader = png::Decoder::new(data).read_info()?;
        let info = reader.info();
        Ok((info.width, info.height))
    }
}

impl Predicate<[u8]> for SizePredicate {
    fn eval(&self, data: &[u8]) -> bool {
        matches!(Self::size_of(data), Ok(size) if size == (self.w, self.h))
    }

    fn find_case<'a>(&'a self, expected: bool, data: &[u8]) -> Option<Case<'a>> {
        match Self::size_of(data) {
            Ok((w, h)) => {
                let matches = (w, h) == (self.w, self.h);
                if matches == expected {
                    let actual_size = format!("{w} x {h}");
                    Some(
                        Case::new(Some(self), matches)
                            .add_product(Product::new("actual size", actual_size)),
                    )
                } else {
                    None
                }
            }
            Err(e) if !expected => {
                Some(Case::new(Some(self), false).add_product(Product::new("Error", e)))
            }
            Err(_) => None,
        }
    }
}

impl PredicateReflection for SizePredicate {
    fn children<'a>(&'a self) -> Box<dyn Iterator<Item = Child<'a>> + 'a> {
        let params = vec![Child::new("predicate", &self.p)];
        Box::new(params.into_iter())
    }
}

impl fmt::Display for SizePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "is a PNG with size {} x {}", self.w, self.h)
    }
}
