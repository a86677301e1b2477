use super::*;

#[test]
fn parses_six_digit_hex() {
    assert_eq!(parse_hex("#ff1034").unwrap(), Rgba8::new(255, 16, 52, 255));
    assert_eq!(parse_hex("#FF1034").unwrap(), Rgba8::new(255, 16, 52, 255));
}

#[test]
fn three_digit_hex_scales_nibbles_by_16() {
    assert_eq!(parse_hex("#f0c").unwrap(), Rgba8::new(240, 0, 192, 255));
    assert_eq!(parse_hex("#fff").unwrap(), Rgba8::new(240, 240, 240, 255));
}

#[test]
fn rejects_malformed_hex() {
    assert!(parse_hex("ff1034").is_err());
    assert!(parse_hex("#ff10").is_err());
    assert!(parse_hex("#gg0000").is_err());
    assert!(parse_hex("#").is_err());
}

#[test]
fn named_colors_resolve() {
    let d = Rgba8::new(1, 2, 3, 4);
    assert_eq!(resolve_color("black", d), Rgba8::BLACK);
    assert_eq!(resolve_color("white", d), Rgba8::WHITE);
    assert_eq!(resolve_color("transparent", d), Rgba8::TRANSPARENT);
    assert_eq!(resolve_color("#ff1034", d), Rgba8::new(255, 16, 52, 255));
}

#[test]
fn unresolvable_strings_fall_back_to_default() {
    let d = Rgba8::new(9, 8, 7, 255);
    assert_eq!(resolve_color("", d), d);
    assert_eq!(resolve_color("#zzzzzz", d), d);
    assert_eq!(resolve_color("chartreuse", d), d);
    assert_eq!(resolve_color("#12345", d), d);
}
