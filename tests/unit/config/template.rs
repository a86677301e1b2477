use super::*;
use serde_json::json;

fn ctx(v: serde_json::Value) -> Context {
    serde_json::from_value(v).unwrap()
}

#[test]
fn halves_split_odd_length_strings_without_loss() {
    let s = "ODDLENGTHSTRING".to_string();
    let first = first_half(s.clone());
    let second = second_half(s.clone());
    assert_eq!(first, "ODDLENG");
    assert_eq!(second, "THSTRING");
    assert_eq!(format!("{first}{second}"), s);
}

#[test]
fn halves_respect_multibyte_characters() {
    let s = "héllo wörld".to_string();
    assert_eq!(format!("{}{}", first_half(s.clone()), second_half(s.clone())), s);
}

#[test]
fn substitutes_context_values() {
    let t = Templater::new();
    let out = t
        .render("Hello {{ name }}!", &ctx(json!({"name": "Ada"})))
        .unwrap();
    assert_eq!(out, "Hello Ada!");
}

#[test]
fn helpers_work_as_functions_and_filters() {
    let t = Templater::new();
    let c = ctx(json!({"amount": 1.5, "count": 4, "key": "ABCDEF"}));
    assert_eq!(t.render("{{ precise4(mul(amount, count)) }}", &c).unwrap(), "6.0000");
    assert_eq!(t.render("{{ amount | add(1) | precise8 }}", &c).unwrap(), "2.50000000");
    assert_eq!(t.render("{{ precise4(sub(count, amount)) }}", &c).unwrap(), "2.5000");
    assert_eq!(t.render("{{ div(count, 8) | precise4 }}", &c).unwrap(), "0.5000");
    assert_eq!(t.render("{{ key | first_half }}-{{ second_half(key) }}", &c).unwrap(), "ABC-DEF");
}

#[test]
fn plain_text_passes_through() {
    let t = Templater::new();
    assert_eq!(t.render("static/logo.png", &Context::new()).unwrap(), "static/logo.png");
}

#[test]
fn undefined_variable_is_a_render_error() {
    let t = Templater::new();
    let err = t.render("{{ missing }}", &Context::new()).unwrap_err();
    assert!(matches!(err, LayerpressError::Render(_)), "{err}");
}

#[test]
fn syntax_error_is_a_render_error() {
    let t = Templater::new();
    let err = t.render("{{ unterminated", &Context::new()).unwrap_err();
    assert!(matches!(err, LayerpressError::Render(_)));
}
