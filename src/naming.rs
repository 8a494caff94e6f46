//! Output file naming for single- and multi-page exports.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Number of digits used to number `count` output files.
///
/// Equal to `floor(log10(count)) + 1`, and computed from the total so that
/// every file of one export shares the same width.
pub fn pad_width(count: usize) -> usize {
    let mut width = 1;
    let mut rest = count / 10;
    while rest > 0 {
        width += 1;
        rest /= 10;
    }
    width
}

/// Compute the files to write for `count` pages.
///
/// One page keeps `output` as given. More pages get a zero-padded, 1-based
/// number inserted before the extension, so lexicographic order matches
/// document order: `out.png` with 10 pages gives `out01.png` .. `out10.png`.
///
/// # Example
/// ```
/// use std::path::PathBuf;
/// use visio2img::names_for;
///
/// let names = names_for("diagram.png", 2);
/// assert_eq!(names, vec![PathBuf::from("diagram1.png"), PathBuf::from("diagram2.png")]);
/// ```
pub fn names_for<P: AsRef<Path>>(output: P, count: usize) -> Vec<PathBuf> {
    let output = output.as_ref();
    match count {
        0 => Vec::new(),
        1 => vec![output.to_path_buf()],
        _ => {
            let width = pad_width(count);
            let stem = output.file_stem().unwrap_or_default();
            let ext = output.extension();

            (1..=count)
                .map(|i| {
                    let mut file_name = OsString::from(stem);
                    file_name.push(format!("{:0width$}", i, width = width));
                    if let Some(ext) = ext {
                        file_name.push(".");
                        file_name.push(ext);
                    }
                    output.with_file_name(file_name)
                })
                .collect()
        }
    }
}
