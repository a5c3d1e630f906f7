#![allow(dead_code)]

use std::path::Path;

use hdlplan_common::{Library, Manifest};

/// Assert that a condition holds, with detailed error message
#[macro_export]
macro_rules! assert_with_context {
    ($cond:expr, $context:expr) => {
        if !$cond {
            panic!(
                "Assertion failed: {}\nContext: {}",
                stringify!($cond),
                $context
            );
        }
    };
}

/// Parse manifest text into a library rooted at `dir`, panicking on error.
pub fn library_from(text: &str, dir: &str) -> Library {
    match Manifest::parse(text) {
        Ok(manifest) => manifest.into_library(Path::new(dir)),
        Err(e) => panic!("manifest failed to parse: {e}\n{text}"),
    }
}
