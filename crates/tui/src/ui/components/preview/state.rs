use colorevolve_types::{COLOR_ROLES, Capabilities, HexColor};

/// What a table selection hands to the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewInput {
    pub colors: [HexColor; 3],
    pub baseline: Option<[HexColor; 3]>,
}

/// Role assignment of the three colors onto the mockup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mockup {
    pub header_background: HexColor,
    pub content_background: HexColor,
    pub title_color: HexColor,
    pub button_background: HexColor,
    pub button_text: HexColor,
}

impl Mockup {
    fn from_colors(colors: &[HexColor; 3]) -> Self {
        let [primary, background, accent] = colors;
        Self {
            header_background: primary.clone(),
            content_background: background.clone(),
            title_color: accent.clone(),
            button_background: accent.clone(),
            button_text: background.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDiff {
    pub before: HexColor,
    pub after: HexColor,
}

/// Info block for one color: swatch, role label, hex and optional diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorInfo {
    pub role: &'static str,
    pub color: HexColor,
    pub diff: Option<ColorDiff>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewModel {
    pub mockup: Mockup,
    pub info: [ColorInfo; 3],
}

impl PreviewModel {
    /// A diff is shown for index `i` only when the diff capability is on, a
    /// baseline exists, and the hex strings differ exactly.
    pub fn build(colors: &[HexColor; 3], baseline: Option<&[HexColor; 3]>, capabilities: &Capabilities) -> Self {
        let baseline = baseline.filter(|_| capabilities.has_diff_comparison);
        let info = std::array::from_fn(|index| {
            let color = colors[index].clone();
            let diff = baseline
                .map(|baseline| &baseline[index])
                .filter(|before| *before != &color)
                .map(|before| ColorDiff {
                    before: before.clone(),
                    after: color.clone(),
                });
            ColorInfo {
                role: COLOR_ROLES[index],
                color,
                diff,
            }
        });
        Self {
            mockup: Mockup::from_colors(colors),
            info,
        }
    }

    pub fn from_input(input: &PreviewInput, capabilities: &Capabilities) -> Self {
        Self::build(&input.colors, input.baseline.as_ref(), capabilities)
    }

    pub fn diff_count(&self) -> usize {
        self.info.iter().filter(|info| info.diff.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use colorevolve_types::Variant;

    use super::*;

    fn triple(hex: [&str; 3]) -> [HexColor; 3] {
        hex.map(|value| HexColor::parse(value).unwrap())
    }

    #[test]
    fn mockup_roles_follow_index() {
        let model = PreviewModel::build(&triple(["#111111", "#222222", "#333333"]), None, &Variant::Extended.into());
        assert_eq!(model.mockup.header_background.as_str(), "#111111");
        assert_eq!(model.mockup.content_background.as_str(), "#222222");
        assert_eq!(model.mockup.title_color.as_str(), "#333333");
        assert_eq!(model.mockup.button_background.as_str(), "#333333");
        assert_eq!(model.mockup.button_text.as_str(), "#222222");
        let roles: Vec<&str> = model.info.iter().map(|info| info.role).collect();
        assert_eq!(roles, ["Primary", "Background", "Accent"]);
    }

    #[test]
    fn diff_only_where_strings_differ() {
        let baseline = triple(["#3366CC", "#FFFFFF", "#000000"]);
        let colors = triple(["#3366CC", "#F0F0F0", "#101010"]);
        let model = PreviewModel::build(&colors, Some(&baseline), &Variant::Extended.into());
        assert!(model.info[0].diff.is_none());
        assert_eq!(
            model.info[1].diff,
            Some(ColorDiff {
                before: baseline[1].clone(),
                after: colors[1].clone()
            })
        );
        assert_eq!(model.diff_count(), 2);
    }

    #[test]
    fn case_difference_counts_as_a_change() {
        let baseline = triple(["#3366cc", "#ffffff", "#000000"]);
        let colors = triple(["#3366CC", "#ffffff", "#000000"]);
        let model = PreviewModel::build(&colors, Some(&baseline), &Variant::Extended.into());
        assert_eq!(model.diff_count(), 1);
    }

    #[test]
    fn diff_requires_capability() {
        let baseline = triple(["#000000", "#000000", "#000000"]);
        let colors = triple(["#ffffff", "#ffffff", "#ffffff"]);
        let model = PreviewModel::build(&colors, Some(&baseline), &Variant::Single.into());
        assert_eq!(model.diff_count(), 0);
    }
}
