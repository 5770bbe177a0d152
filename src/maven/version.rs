use std::cmp::Ordering;

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Compares two version strings segment by segment, returning true only if `a` is *strictly*
///  newer than `b`.
///
/// A trailing "-SNAPSHOT" is ignored, the rest is split on '.', and missing segments count as 0.
///  Each segment is compared by its leading integer (optional whitespace and sign, then decimal
///  digits), so "10-rc1" counts as 10, "-1" as -1 and "beta" as 0. Any other pre-release marker
///  is therefore *not* understood - "1.0-beta" and "1.0" are equal.
pub fn is_newer(a: &str, b: &str) -> bool {
    let a_segments = segments(a);
    let b_segments = segments(b);

    let len = a_segments.len().max(b_segments.len());
    for i in 0..len {
        let a_segment = a_segments.get(i).copied().unwrap_or("");
        let b_segment = b_segments.get(i).copied().unwrap_or("");

        match compare_segments(a_segment, b_segment) {
            Ordering::Greater => return true,
            Ordering::Less => return false,
            Ordering::Equal => {}
        }
    }
    false
}

/// Picks the newest version from an unordered list.
///
/// A candidate only replaces the current best if it is strictly newer, so of several versions
///  that compare equal (e.g. "1.10" and "1.10-SNAPSHOT") the one listed first wins.
pub fn latest_version<'a>(versions: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    versions.into_iter()
        .fold(None, |latest, version| match latest {
            Some(latest) if !is_newer(version, latest) => Some(latest),
            _ => Some(version),
        })
}

fn segments(version: &str) -> Vec<&str> {
    version.strip_suffix(SNAPSHOT_SUFFIX)
        .unwrap_or(version)
        .split('.')
        .collect()
}

/// Compares the numeric values of two segments without parsing them into a fixed-width integer,
///  so arbitrarily long digit runs never overflow.
fn compare_segments(a: &str, b: &str) -> Ordering {
    let (a_negative, a_digits) = numeric_part(a);
    let (b_negative, b_digits) = numeric_part(b);

    let magnitude = a_digits.len().cmp(&b_digits.len())
        .then_with(|| a_digits.cmp(b_digits));

    match (a_negative, b_negative) {
        (false, false) => magnitude,
        (true, true) => magnitude.reverse(),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}

/// Sign and leading digits of a segment, after leading whitespace, with leading zeros removed.
///  "" stands for 0, which is never negative.
fn numeric_part(segment: &str) -> (bool, &str) {
    let segment = segment.trim_start();
    let (negative, unsigned) = match segment.as_bytes().first() {
        Some(b'-') => (true, &segment[1..]),
        Some(b'+') => (false, &segment[1..]),
        _ => (false, segment),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = unsigned[..digits_end].trim_start_matches('0');
    (negative && !digits.is_empty(), digits)
}
