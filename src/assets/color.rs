use crate::foundation::core::Rgba8;

/// Resolve a user color string, falling back to `default` when it is empty or unrecognized.
///
/// Accepts `black`, `white`, `transparent`, `#rgb` (each nibble scaled by 16) and `#rrggbb`.
pub fn resolve_color(s: &str, default: Rgba8) -> Rgba8 {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "" => default,
        "black" => Rgba8::BLACK,
        "white" => Rgba8::WHITE,
        "transparent" => Rgba8::TRANSPARENT,
        _ => match parse_hex(s) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("color {s:?} not understood ({e}), using default");
                default
            }
        },
    }
}

/// Parse an opaque `#rgb` / `#rrggbb` hex color.
pub fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let Some(digits) = s.trim().strip_prefix('#') else {
        return Err(format!("{s:?} is not a hex color"));
    };
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{s:?} contains non-hex digits"));
    }

    fn hex_u8(digits: &str) -> Result<u8, String> {
        u8::from_str_radix(digits, 16).map_err(|_| format!("invalid hex digits \"{digits}\""))
    }

    match digits.len() {
        3 => {
            // Nibbles are scaled, not repeated: "#f0c" is (240, 0, 192).
            let r = hex_u8(&digits[0..1])? * 16;
            let g = hex_u8(&digits[1..2])? * 16;
            let b = hex_u8(&digits[2..3])? * 16;
            Ok(Rgba8::new(r, g, b, 255))
        }
        6 => Ok(Rgba8::new(
            hex_u8(&digits[0..2])?,
            hex_u8(&digits[2..4])?,
            hex_u8(&digits[4..6])?,
            255,
        )),
        _ => Err("hex color must be #rgb or #rrggbb".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
