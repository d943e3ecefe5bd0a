//! Task and calendar colors
//!
//! There is no standard way to give a color to a task (RFC7986 `COLOR` is meant for CSS names and is barely supported), so several vendor extensions are written and read.
//! Internally, a color is a bare 6-hex-digit string (`e8e8e8`).

/// Properties that may carry a color, in the order they are looked up by the decoder
pub const COLOR_PROPERTIES: [&str; 4] = [
    "X-APPLE-CALENDAR-COLOR",
    "X-OUTLOOK-COLOR",
    "X-FUNAMBOL-COLOR",
    "COLOR",
];

/// Prefix a color with `#`, unless it already has one
pub fn make_hex_color(color: &str) -> String {
    if color.starts_with('#') {
        color.to_string()
    } else {
        format!("#{}", color)
    }
}

/// The color lines written in an envelope or a `VTODO`, or an empty list if there is no usable color
pub fn color_lines(color: Option<&str>) -> Vec<String> {
    let color = match color.map(str::trim) {
        None | Some("") | Some("#") => return Vec::new(),
        Some(c) => make_hex_color(c),
    };

    vec![
        format!("X-APPLE-CALENDAR-COLOR:{}FF", color),
        format!("X-OUTLOOK-COLOR:{}", color),
        format!("X-FUNAMBOL-COLOR:{}", color),
        format!("COLOR:{}", color),
    ]
}

fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize a color value found in an iCal file into a bare 6-hex-digit string.
///
/// Accepted inputs are `#RRGGBB`, `#RRGGBBAA` (the alpha channel is dropped), the same without `#`, and anything CSS understands (`red`, `rebeccapurple`, `rgb(...)`...).
/// Hex values keep their case, other inputs end up lowercase.
pub fn normalize(value: &str) -> Option<String> {
    let value = value.trim();
    let bare = value.trim_start_matches('#');
    if (bare.len() == 6 || bare.len() == 8) && is_hex(bare) {
        return Some(bare[..6].to_string());
    }

    match csscolorparser::parse(value) {
        Ok(color) => {
            let hex = color.to_hex_string();
            Some(hex.trim_start_matches('#').chars().take(6).collect())
        },
        Err(err) => {
            log::warn!("Unable to understand color {:?}: {}", value, err);
            None
        },
    }
}

/// Pick the first usable color in vendor order.
///
/// `lookup` returns the raw value of a property, if the component has it.
pub fn find_color<'a, F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<&'a str>,
{
    COLOR_PROPERTIES.iter()
        .filter_map(|name| lookup(*name))
        .find_map(normalize)
}
