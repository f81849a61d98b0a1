//! Payloads returned by the optimizer and the color extractor.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::HexColor;

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Semantic role of each palette position.
pub const COLOR_ROLES: [&str; 3] = ["Primary", "Background", "Accent"];

/// Server-computed metric treated as an opaque display value.
///
/// The optimizer reports metrics either as numbers or as preformatted
/// strings such as `"4.5:1"` or `"100% valid"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl Default for MetricValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One ranked candidate palette. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: [HexColor; 3],
    #[serde(default)]
    pub contrast: MetricValue,
    #[serde(default)]
    pub delta_e: MetricValue,
    #[serde(default)]
    pub daltonism: MetricValue,
}

/// Rendered convergence chart, decoded from the base64 payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConvergenceChart {
    bytes: Vec<u8>,
}

impl ConvergenceChart {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Width and height read from the PNG header, when the payload is a PNG.
    pub fn png_dimensions(&self) -> Option<(u32, u32)> {
        if self.bytes.len() < 24 || !self.bytes.starts_with(PNG_SIGNATURE) || &self.bytes[12..16] != b"IHDR" {
            return None;
        }
        let width = u32::from_be_bytes(self.bytes[16..20].try_into().ok()?);
        let height = u32::from_be_bytes(self.bytes[20..24].try_into().ok()?);
        Some((width, height))
    }
}

impl fmt::Debug for ConvergenceChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvergenceChart").field("len", &self.bytes.len()).finish()
    }
}

impl TryFrom<String> for ConvergenceChart {
    type Error = base64::DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        STANDARD.decode(value.trim()).map(Self::from_bytes)
    }
}

impl From<ConvergenceChart> for String {
    fn from(value: ConvergenceChart) -> Self {
        STANDARD.encode(value.bytes)
    }
}

/// Successful `/generate` response.
///
/// `initial_colors` is absent when the server runs the single base color
/// variant, which has no baseline to compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerationResult {
    #[serde(default)]
    pub palettes: Vec<Palette>,
    #[serde(default)]
    pub initial_colors: Option<[HexColor; 3]>,
    #[serde(default)]
    pub convergence_chart: Option<ConvergenceChart>,
}

impl GenerationResult {
    /// Decode a `/generate` payload one palette at a time.
    ///
    /// The optimizer formats unclamped sRGB values, so an out-of-gamut
    /// palette can carry text such as `#14bff00`. Such entries are left out
    /// and described in the returned list instead of failing the response.
    /// Malformed `initial_colors` drop the baseline the same way.
    pub fn decode(payload: Value) -> Result<(Self, Vec<String>), serde_json::Error> {
        let raw: RawGenerationResult = serde_json::from_value(payload)?;
        let mut rejected = Vec::new();
        let mut palettes = Vec::with_capacity(raw.palettes.len());
        for (index, entry) in raw.palettes.into_iter().enumerate() {
            match serde_json::from_value::<Palette>(entry) {
                Ok(palette) => palettes.push(palette),
                Err(error) => rejected.push(format!("palette {}: {error}", index + 1)),
            }
        }
        let initial_colors = match raw.initial_colors.map(serde_json::from_value::<[HexColor; 3]>) {
            Some(Ok(colors)) => Some(colors),
            Some(Err(error)) => {
                rejected.push(format!("initial colors: {error}"));
                None
            }
            None => None,
        };
        let result = Self {
            palettes,
            initial_colors,
            convergence_chart: raw.convergence_chart,
        };
        Ok((result, rejected))
    }
}

/// `/generate` body with palettes left undecoded.
#[derive(Deserialize)]
struct RawGenerationResult {
    #[serde(default)]
    palettes: Vec<Value>,
    #[serde(default)]
    initial_colors: Option<Value>,
    #[serde(default)]
    convergence_chart: Option<ConvergenceChart>,
}

/// Successful `/extract-color` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedColors {
    #[serde(rename = "primary_color")]
    pub primary: HexColor,
    #[serde(rename = "bg_color")]
    pub background: HexColor,
    #[serde(rename = "accent_color")]
    pub accent: HexColor,
}

impl ExtractedColors {
    /// Colors in palette order: primary, background, accent.
    pub fn to_array(&self) -> [HexColor; 3] {
        [self.primary.clone(), self.background.clone(), self.accent.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_result_accepts_string_and_numeric_metrics() {
        let json = r##"{
            "palettes": [
                {"colors": ["#3366CC", "#f0f0f0", "#202020"], "contrast": "12.1:1", "delta_e": 4.25, "daltonism": "100% valid"}
            ],
            "initial_colors": ["#3366CC", "#ffffff", "#000000"],
            "convergence_chart": "iVBORw0KGgo="
        }"##;
        let result: GenerationResult = serde_json::from_str(json).expect("deserialize GenerationResult");
        let palette = &result.palettes[0];
        assert_eq!(palette.contrast.to_string(), "12.1:1");
        assert_eq!(palette.delta_e, MetricValue::Number(4.25));
        assert_eq!(palette.delta_e.to_string(), "4.25");
        assert_eq!(result.initial_colors.as_ref().map(|colors| colors[1].as_str()), Some("#ffffff"));
        let chart = result.convergence_chart.expect("chart");
        assert_eq!(chart.bytes(), PNG_SIGNATURE);
    }

    #[test]
    fn single_variant_result_has_no_baseline() {
        let json = r##"{"palettes": [], "convergence_chart": ""}"##;
        let result: GenerationResult = serde_json::from_str(json).expect("deserialize");
        assert!(result.palettes.is_empty());
        assert!(result.initial_colors.is_none());
    }

    #[test]
    fn palette_rejects_invalid_colors() {
        let json = r##"{"colors": ["#3366CC", "white", "#000000"]}"##;
        assert!(serde_json::from_str::<Palette>(json).is_err());
    }

    #[test]
    fn out_of_gamut_palette_is_left_out() {
        let payload = serde_json::json!({
            "palettes": [
                {"colors": ["#3366CC", "#F0F0F0", "#101010"], "contrast": "12.1:1", "delta_e": 3.2, "daltonism": "OK"},
                {"colors": ["#14bff00", "#FFFFFF", "#202020"], "contrast": "9.0:1", "delta_e": 2.0, "daltonism": "OK"},
                {"colors": ["#224488", "#FAFAFA", "#333333"], "contrast": "8.4:1", "delta_e": 1.5, "daltonism": "OK"}
            ],
            "initial_colors": ["#3366CC", "#FFFFFF", "#000000"]
        });
        let (result, rejected) = GenerationResult::decode(payload).expect("payload shape is valid");
        let first: Vec<&str> = result.palettes.iter().map(|palette| palette.colors[0].as_str()).collect();
        assert_eq!(first, ["#3366CC", "#224488"]);
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].starts_with("palette 2:"), "{}", rejected[0]);
        assert!(result.initial_colors.is_some());
    }

    #[test]
    fn malformed_initial_colors_drop_only_the_baseline() {
        let payload = serde_json::json!({
            "palettes": [{"colors": ["#3366CC", "#F0F0F0", "#101010"]}],
            "initial_colors": ["#3366CC", "#1000000", "#000000"]
        });
        let (result, rejected) = GenerationResult::decode(payload).expect("payload shape is valid");
        assert_eq!(result.palettes.len(), 1);
        assert!(result.initial_colors.is_none());
        assert_eq!(rejected.len(), 1);

        assert!(GenerationResult::decode(serde_json::json!({"palettes": "nope"})).is_err());
    }

    #[test]
    fn png_dimensions_come_from_ihdr() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13]);
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&1000u32.to_be_bytes());
        bytes.extend_from_slice(&500u32.to_be_bytes());
        let chart = ConvergenceChart::from_bytes(bytes);
        assert_eq!(chart.png_dimensions(), Some((1000, 500)));
        assert_eq!(ConvergenceChart::from_bytes(vec![1, 2, 3]).png_dimensions(), None);
    }

    #[test]
    fn extracted_colors_use_wire_names() {
        let json = r##"{"primary_color": "#111111", "bg_color": "#FFFFFF", "accent_color": "#FF8800"}"##;
        let colors: ExtractedColors = serde_json::from_str(json).expect("deserialize");
        let ordered: Vec<String> = colors.to_array().iter().map(ToString::to_string).collect();
        assert_eq!(ordered, ["#111111", "#FFFFFF", "#FF8800"]);
    }
}
