//! Line scanners for header markers and changelog sections

use regex::Regex;

/// Token that opens each section of a changelog file
pub const SECTION_MARKER: &str = "Version";

/// Find the value following `marker` in the first line that contains it
///
/// The value is the next whitespace-delimited token, with surrounding double
/// quotes removed, so both `#define CFITSIO_SONAME 7` and
/// `#define LIB_VERSION "1.2"` are understood.
pub fn scan_marker(text: &str, marker: &str) -> Option<String> {
    let pattern = format!(r#"\b{}\b\s+"?([^\s"]+)"#, regex::escape(marker));
    let re = Regex::new(&pattern).ok()?;
    text.lines()
        .find_map(|line| re.captures(line))
        .map(|caps| caps[1].to_string())
}

/// Return the first changelog section: the lines from the first line starting
/// with [`SECTION_MARKER`] (inclusive) up to the next such line (exclusive),
/// or to the end of the text when there is no second marker
pub fn first_section(text: &str) -> Option<String> {
    let mut lines = text.lines();
    let first = lines.find(|l| is_section_header(l))?;

    let mut section = vec![first];
    section.extend(lines.take_while(|l| !is_section_header(l)));
    Some(section.join("\n"))
}

fn is_section_header(line: &str) -> bool {
    line.trim_start().starts_with(SECTION_MARKER)
}
