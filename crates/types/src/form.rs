//! Request bodies for the generation and extraction endpoints.

use std::fmt;

use crate::HexColor;

/// Field name used when a single base color is submitted.
pub const SINGLE_BASE_COLOR_FIELD: &str = "base_color";
/// Field names used when a full base triple is submitted.
pub const TRIPLE_BASE_COLOR_FIELDS: [&str; 3] = ["primary_color", "bg_color", "accent_color"];

/// WCAG conformance level the optimizer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WcagLevel {
    #[default]
    AA,
    AAA,
}

impl WcagLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AA => "AA",
            Self::AAA => "AAA",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::AA => Self::AAA,
            Self::AAA => Self::AA,
        }
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation parameters captured from the widgets at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationForm {
    /// One base color, or primary/background/accent for the extended variant.
    pub base_colors: Vec<HexColor>,
    pub population_size: u32,
    pub generations: u32,
    /// Mutation probability in percent (0-100); the server divides by 100.
    pub mutation_percent: u32,
    /// Accessibility weight (0-100); the aesthetic weight is the complement.
    pub accessibility_weight: u32,
    pub initial_weight: Option<u32>,
    pub wcag_level: WcagLevel,
}

impl GenerationForm {
    /// Multipart fields in submission order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(self.base_colors.len() + 6);
        match self.base_colors.as_slice() {
            [single] => fields.push((SINGLE_BASE_COLOR_FIELD, single.to_string())),
            colors => {
                for (name, color) in TRIPLE_BASE_COLOR_FIELDS.iter().zip(colors) {
                    fields.push((*name, color.to_string()));
                }
            }
        }
        fields.push(("population_size", self.population_size.to_string()));
        fields.push(("generations", self.generations.to_string()));
        fields.push(("mutation_prob", self.mutation_percent.to_string()));
        fields.push(("accessibility_weight", self.accessibility_weight.to_string()));
        fields.push(("wcag_level", self.wcag_level.to_string()));
        if let Some(initial_weight) = self.initial_weight {
            fields.push(("initial_weight", initial_weight.to_string()));
        }
        fields
    }
}

/// Which extraction flow a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionKind {
    Url,
    Html,
}

impl ExtractionKind {
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Html => "html",
        }
    }

    /// Alert shown when the source field is empty.
    pub fn empty_source_message(self) -> &'static str {
        match self {
            Self::Url => "Please enter a valid URL",
            Self::Html => "Please enter HTML code",
        }
    }
}

/// Source text for one extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionSource {
    Url(String),
    Html(String),
}

impl ExtractionSource {
    pub fn new(kind: ExtractionKind, text: impl Into<String>) -> Self {
        match kind {
            ExtractionKind::Url => Self::Url(text.into()),
            ExtractionKind::Html => Self::Html(text.into()),
        }
    }

    pub fn kind(&self) -> ExtractionKind {
        match self {
            Self::Url(_) => ExtractionKind::Url,
            Self::Html(_) => ExtractionKind::Html,
        }
    }

    /// The single url-encoded pair sent to `/extract-color`.
    pub fn form_pair(&self) -> (&'static str, &str) {
        match self {
            Self::Url(url) => (ExtractionKind::Url.field_name(), url),
            Self::Html(html) => (ExtractionKind::Html.field_name(), html),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(base_colors: &[&str]) -> GenerationForm {
        GenerationForm {
            base_colors: base_colors.iter().map(|hex| HexColor::parse(hex).unwrap()).collect(),
            population_size: 50,
            generations: 100,
            mutation_percent: 5,
            accessibility_weight: 70,
            initial_weight: None,
            wcag_level: WcagLevel::AA,
        }
    }

    #[test]
    fn single_base_color_uses_base_color_field() {
        let fields = form(&["#3366CC"]).fields();
        assert_eq!(
            fields,
            vec![
                ("base_color", "#3366CC".to_string()),
                ("population_size", "50".to_string()),
                ("generations", "100".to_string()),
                ("mutation_prob", "5".to_string()),
                ("accessibility_weight", "70".to_string()),
                ("wcag_level", "AA".to_string()),
            ]
        );
    }

    #[test]
    fn triple_base_colors_and_initial_weight() {
        let mut triple = form(&["#111111", "#FFFFFF", "#FF8800"]);
        triple.initial_weight = Some(40);
        let fields = triple.fields();
        assert_eq!(&fields[..3], &[
            ("primary_color", "#111111".to_string()),
            ("bg_color", "#FFFFFF".to_string()),
            ("accent_color", "#FF8800".to_string()),
        ]);
        assert_eq!(fields.last(), Some(&("initial_weight", "40".to_string())));
    }

    #[test]
    fn extraction_source_sends_exactly_one_field() {
        assert_eq!(ExtractionSource::new(ExtractionKind::Url, "https://a.test").form_pair(), ("url", "https://a.test"));
        assert_eq!(ExtractionSource::new(ExtractionKind::Html, "<p/>").form_pair(), ("html", "<p/>"));
    }
}
