use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{ColorSpace, OutputFormat, Placement};
use crate::foundation::error::{LayerpressError, LayerpressResult};
use crate::overlay::OverlayKind;

/// Template substitution variables.
pub type Context = BTreeMap<String, serde_json::Value>;

pub const DEFAULT_TEXT_SIZE: u32 = 12;
pub const DEFAULT_DPI: u32 = 72;

/// One run's configuration document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Default font for text overlays.
    #[serde(default, alias = "font")]
    pub fontpath: Option<PathBuf>,
    #[serde(default)]
    pub colorspace: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub context: Context,
    /// Per-item overrides; each produces one image per output.
    #[serde(default)]
    pub items: Vec<Context>,
    #[serde(default)]
    pub outputs: Vec<OutputSpec>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// One output job template: a background plus a stack of overlays.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputSpec {
    pub prefix: String,
    pub background: PathBuf,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub colorspace: Option<String>,
    #[serde(default)]
    pub overlays: Vec<OverlaySpec>,
}

/// One configured overlay. Zero `size`/`dpi` fall back to their defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverlaySpec {
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub xoffset: i32,
    #[serde(default)]
    pub yoffset: i32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub dpi: u32,
    #[serde(default)]
    pub font: Option<PathBuf>,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub foreground: String,
    #[serde(default)]
    pub background: String,
}

impl RunConfig {
    /// Load a YAML (`.yaml`/`.yml`, the default) or JSON (`.json`) document.
    pub fn from_path(path: impl AsRef<Path>) -> LayerpressResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LayerpressError::config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let cfg = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
        .map_err(|e| e.context(format!("'{}'", path.display())))?;

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(cfg.with_base_dir(base_dir))
    }

    pub fn from_yaml_str(text: &str) -> LayerpressResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| LayerpressError::config(format!("invalid yaml config: {e}")))
    }

    pub fn from_json_str(text: &str) -> LayerpressResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| LayerpressError::config(format!("invalid json config: {e}")))
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Resolve `p` against [`Self::base_dir`] unless it is absolute.
    pub fn resolve_path(&self, p: &Path) -> PathBuf {
        resolve_relative(&self.base_dir, p)
    }

    pub fn default_format(&self) -> LayerpressResult<OutputFormat> {
        parse_or_default(self.format.as_deref(), OutputFormat::default())
    }

    pub fn default_color_space(&self) -> LayerpressResult<ColorSpace> {
        parse_or_default(self.colorspace.as_deref(), ColorSpace::default())
    }

    /// Fresh context for item `index`: run context overlaid with the item's keys.
    pub fn item_context(&self, index: usize) -> Context {
        let mut ctx = self.context.clone();
        if let Some(item) = self.items.get(index) {
            ctx.extend(item.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        ctx
    }

    /// Whether any text overlay exists in any output.
    pub fn uses_text(&self) -> bool {
        self.outputs
            .iter()
            .flat_map(|o| &o.overlays)
            .any(|o| o.kind == OverlayKind::Text)
    }

    /// Static checks that need no asset access.
    pub fn validate(&self) -> LayerpressResult<()> {
        let default_format = self.default_format()?;
        let default_cs = self.default_color_space()?;

        for (oi, output) in self.outputs.iter().enumerate() {
            let label = output_label(oi, output);
            if output.prefix.trim().is_empty() {
                return Err(LayerpressError::config(format!("{label}: prefix is empty")));
            }
            if output.prefix.contains(['/', '\\']) {
                return Err(LayerpressError::config(format!(
                    "{label}: prefix must not contain path separators"
                )));
            }
            output
                .format(default_format)
                .and_then(|_| output.color_space(default_cs))
                .map_err(|e| e.context(&label))?;

            for (i, overlay) in output.overlays.iter().enumerate() {
                if overlay.xoffset < 0 || overlay.yoffset < 0 {
                    return Err(LayerpressError::config(format!(
                        "{label}: overlay #{} has a negative offset ({}, {})",
                        i + 1,
                        overlay.xoffset,
                        overlay.yoffset
                    )));
                }
            }
        }
        Ok(())
    }
}

impl OutputSpec {
    pub fn format(&self, default: OutputFormat) -> LayerpressResult<OutputFormat> {
        parse_or_default(self.format.as_deref(), default)
    }

    pub fn color_space(&self, default: ColorSpace) -> LayerpressResult<ColorSpace> {
        parse_or_default(self.colorspace.as_deref(), default)
    }
}

impl OverlaySpec {
    pub fn placement(&self) -> Placement {
        Placement::new(self.rotation, self.xoffset, self.yoffset)
    }

    /// Point size for text, pixel width for QR codes.
    pub fn size_or_default(&self) -> u32 {
        if self.size == 0 {
            DEFAULT_TEXT_SIZE
        } else {
            self.size
        }
    }

    pub fn dpi_or_default(&self) -> u32 {
        if self.dpi == 0 { DEFAULT_DPI } else { self.dpi }
    }
}

/// `p` joined onto `base` unless it is already absolute.
pub fn resolve_relative(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn parse_or_default<T>(raw: Option<&str>, default: T) -> LayerpressResult<T>
where
    T: std::str::FromStr<Err = LayerpressError>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s.parse(),
    }
}

fn output_label(index: usize, output: &OutputSpec) -> String {
    if output.prefix.is_empty() {
        format!("output #{}", index + 1)
    } else {
        format!("output '{}'", output.prefix)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
