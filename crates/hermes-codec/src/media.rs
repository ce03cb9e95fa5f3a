//! Media type helpers.
//!
//! Header values are compared by their essence (`type/subtype`), ignoring
//! parameters and case.

use mime::Mime;

/// Returns the lowercase `type/subtype` essence of a media type header
/// value.
///
/// Values that do not parse as a media type fall back to the trimmed,
/// lowercased text before the first `;`.
///
/// ```
/// use hermes_codec::media::essence;
///
/// assert_eq!(essence("Application/JSON; charset=utf-8"), "application/json");
/// assert_eq!(essence("not a mime"), "not a mime");
/// ```
pub fn essence(value: &str) -> String {
    match value.trim().parse::<Mime>() {
        Ok(parsed) => parsed.essence_str().to_ascii_lowercase(),
        Err(_) => value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase(),
    }
}

/// Returns true if two header values name the same media type.
pub fn same_essence(a: &str, b: &str) -> bool {
    essence(a) == essence(b)
}

/// Returns true if `value` parses as a concrete `type/subtype`.
pub fn is_valid(value: &str) -> bool {
    value
        .trim()
        .parse::<Mime>()
        .map(|parsed| parsed.type_() != mime::STAR && parsed.subtype() != mime::STAR)
        .unwrap_or(false)
}

/// One entry of an `Accept` header.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    type_: String,
    subtype: String,
    quality: f32,
}

impl MediaRange {
    /// Returns the range's quality weight in `0.0..=1.0`.
    #[must_use]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Returns true for `*/*`.
    #[must_use]
    pub fn is_any(&self) -> bool {
        self.type_ == "*" && self.subtype == "*"
    }

    /// Returns true if the concrete media type falls within this range.
    pub fn matches(&self, media_type: &str) -> bool {
        if self.is_any() {
            return true;
        }
        let essence = essence(media_type);
        let Some((type_, subtype)) = essence.split_once('/') else {
            return false;
        };
        self.type_ == type_ && (self.subtype == "*" || self.subtype == subtype)
    }
}

/// Parses an `Accept` header into ranges ordered by descending quality.
///
/// Ranges with equal weight keep their header order. Ranges with `q=0` and
/// entries that do not parse are dropped. A missing or malformed `q`
/// parameter counts as `1.0`.
///
/// ```
/// use hermes_codec::media::parse_accept;
///
/// let ranges = parse_accept("text/html;q=0.5, application/json, */*;q=0");
/// assert_eq!(ranges.len(), 2);
/// assert!(ranges[0].matches("application/json"));
/// ```
pub fn parse_accept(header: &str) -> Vec<MediaRange> {
    let mut ranges: Vec<MediaRange> = header
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let parsed = part.parse::<Mime>().ok()?;
            let quality = parsed
                .get_param("q")
                .and_then(|q| q.as_str().parse::<f32>().ok())
                .map_or(1.0, |q| q.clamp(0.0, 1.0));
            Some(MediaRange {
                type_: parsed.type_().as_str().to_ascii_lowercase(),
                subtype: parsed.subtype().as_str().to_ascii_lowercase(),
                quality,
            })
        })
        .filter(|range| range.quality > 0.0)
        .collect();

    // sort_by is stable, so equal weights keep header order
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}
