//! Overlay value templating.
//!
//! Templates use Jinja syntax. Arithmetic and string helpers work both as functions
//! (`{{ mul(price, 2) }}`) and as filters (`{{ price | mul(2) }}`).

use minijinja::{Environment, UndefinedBehavior};

use crate::config::model::Context;
use crate::foundation::error::{LayerpressError, LayerpressResult};

/// Shared template environment; built once per run.
pub struct Templater {
    env: Environment<'static>,
}

impl Default for Templater {
    fn default() -> Self {
        Self::new()
    }
}

impl Templater {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        macro_rules! helper {
            ($name:literal, $f:expr) => {
                env.add_function($name, $f);
                env.add_filter($name, $f);
            };
        }
        helper!("mul", mul);
        helper!("add", add);
        helper!("sub", sub);
        helper!("div", div);
        helper!("first_half", first_half);
        helper!("second_half", second_half);
        helper!("precise8", precise8);
        helper!("precise4", precise4);

        Self { env }
    }

    /// Render `source` against `ctx`. Syntax errors and undefined variables are render errors.
    pub fn render(&self, source: &str, ctx: &Context) -> LayerpressResult<String> {
        self.env
            .render_str(source, ctx)
            .map_err(|e| LayerpressError::render(format!("template '{source}': {e:#}")))
    }
}

fn mul(a: f64, b: f64) -> f64 {
    a * b
}

fn add(a: f64, b: f64) -> f64 {
    a + b
}

fn sub(a: f64, b: f64) -> f64 {
    a - b
}

fn div(a: f64, b: f64) -> f64 {
    a / b
}

/// Leading `len / 2` characters; `first_half(s) + second_half(s) == s`.
pub fn first_half(s: String) -> String {
    let half = s.chars().count() / 2;
    s.chars().take(half).collect()
}

pub fn second_half(s: String) -> String {
    let half = s.chars().count() / 2;
    s.chars().skip(half).collect()
}

fn precise8(a: f64) -> String {
    format!("{a:.8}")
}

fn precise4(a: f64) -> String {
    format!("{a:.4}")
}

#[cfg(test)]
#[path = "../../tests/unit/config/template.rs"]
mod tests;
