//! Linked input synchronizer state.
//!
//! Picker/hex pairs and slider/label bindings are kept mutually consistent
//! by synchronous per-event updates. Malformed hex text is held in the text
//! field and silently ignored; the picker keeps its last valid color.

use colorevolve_types::{Capabilities, GenerationForm, HexColor, RgbChannel, SliderId, WcagLevel};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use crate::ui::components::common::TextInputState;
use crate::ui::focus::FocusTarget;

const DEFAULT_BASE_COLOR: &str = "#3a5fcd";
const DEFAULT_EXTENDED_COLORS: [&str; 3] = ["#3a5fcd", "#ffffff", "#1f1f1f"];

/// A color picker and a hex text field bound to the same color.
#[derive(Debug, Clone)]
pub struct LinkedInputPair {
    label: &'static str,
    picker: HexColor,
    text: TextInputState,
    /// Channel the terminal picker currently adjusts.
    channel: RgbChannel,
    pub f_picker: FocusFlag,
    pub f_hex: FocusFlag,
}

impl LinkedInputPair {
    pub fn new(label: &'static str, color: HexColor) -> Self {
        Self {
            label,
            text: TextInputState::with_text(color.as_str()),
            picker: color,
            channel: RgbChannel::default(),
            f_picker: FocusFlag::named(&format!("inputs.{label}.picker")),
            f_hex: FocusFlag::named(&format!("inputs.{label}.hex")),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn picker(&self) -> &HexColor {
        &self.picker
    }

    pub fn text(&self) -> &TextInputState {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut TextInputState {
        &mut self.text
    }

    pub fn channel(&self) -> RgbChannel {
        self.channel
    }

    pub fn set_channel(&mut self, channel: RgbChannel) {
        self.channel = channel;
    }

    /// Picker edits are always valid; mirror them into the text field.
    pub fn on_picker_change(&mut self, color: HexColor) {
        self.text.set_input(color.as_str());
        self.picker = color;
    }

    /// Commit `text` into the text field; the picker follows only when the
    /// text is a complete `#RRGGBB` value. Returns whether it followed.
    pub fn on_text_change(&mut self, text: &str) -> bool {
        self.text.set_input(text);
        match HexColor::parse(text) {
            Ok(color) => {
                self.picker = color;
                true
            }
            Err(_) => false,
        }
    }

    /// Overwrite both controls.
    pub fn set_color(&mut self, color: &HexColor) {
        self.on_picker_change(color.clone());
    }
}

/// An integer range control with a label showing its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderBinding {
    min: i64,
    max: i64,
    step: i64,
    value: i64,
    label: String,
}

impl SliderBinding {
    pub fn new(min: i64, max: i64, step: i64, value: i64) -> Self {
        let mut slider = Self {
            min,
            max,
            step: step.max(1),
            value: min,
            label: String::new(),
        };
        slider.set(value);
        slider
    }

    /// Moves the control, clamped to its range, and rewrites the label.
    pub fn set(&mut self, value: i64) {
        self.value = value.clamp(self.min, self.max);
        self.label = self.value.to_string();
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn range(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    /// Position of the value in the range, 0.0..=1.0.
    pub fn ratio(&self) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        (self.value - self.min) as f64 / (self.max - self.min) as f64
    }

    fn value_u32(&self) -> u32 {
        u32::try_from(self.value).unwrap_or_default()
    }
}

/// Accessibility slider with its complementary aesthetic label.
///
/// The two labels always sum to 100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightSliderBinding {
    slider: SliderBinding,
    aesthetic_label: String,
}

impl WeightSliderBinding {
    pub fn new(accessibility: i64) -> Self {
        let mut binding = Self {
            slider: SliderBinding::new(0, 100, 1, accessibility),
            aesthetic_label: String::new(),
        };
        binding.set(accessibility);
        binding
    }

    pub fn set(&mut self, value: i64) {
        self.slider.set(value);
        self.aesthetic_label = (100 - self.slider.value()).to_string();
    }

    pub fn slider(&self) -> &SliderBinding {
        &self.slider
    }

    pub fn accessibility_label(&self) -> &str {
        self.slider.label()
    }

    pub fn aesthetic_label(&self) -> &str {
        &self.aesthetic_label
    }
}

/// Every widget that feeds the generation form.
#[derive(Debug, Clone)]
pub struct InputsState {
    pairs: Vec<LinkedInputPair>,
    population_size: SliderBinding,
    generations: SliderBinding,
    mutation_probability: SliderBinding,
    initial_weight: Option<SliderBinding>,
    accessibility: WeightSliderBinding,
    wcag_level: WcagLevel,

    container_focus: FocusFlag,
    pub f_population_size: FocusFlag,
    pub f_generations: FocusFlag,
    pub f_mutation_probability: FocusFlag,
    pub f_initial_weight: FocusFlag,
    pub f_accessibility: FocusFlag,
    pub f_wcag_level: FocusFlag,
    pub f_generate: FocusFlag,
}

impl InputsState {
    pub fn new(capabilities: &Capabilities) -> Self {
        let pairs = if capabilities.base_color_count >= 3 {
            ["Primary", "Background", "Accent"]
                .into_iter()
                .zip(DEFAULT_EXTENDED_COLORS)
                .map(|(label, hex)| LinkedInputPair::new(label, default_color(hex)))
                .collect()
        } else {
            vec![LinkedInputPair::new("Base color", default_color(DEFAULT_BASE_COLOR))]
        };
        Self {
            pairs,
            population_size: SliderBinding::new(10, 200, 10, 50),
            generations: SliderBinding::new(5, 200, 5, 20),
            mutation_probability: SliderBinding::new(0, 100, 1, 15),
            initial_weight: capabilities
                .has_initial_palette_row
                .then(|| SliderBinding::new(0, 100, 5, 50)),
            accessibility: WeightSliderBinding::new(70),
            wcag_level: WcagLevel::default(),
            container_focus: FocusFlag::named("inputs"),
            f_population_size: FocusFlag::named("inputs.population_size"),
            f_generations: FocusFlag::named("inputs.generations"),
            f_mutation_probability: FocusFlag::named("inputs.mutation_probability"),
            f_initial_weight: FocusFlag::named("inputs.initial_weight"),
            f_accessibility: FocusFlag::named("inputs.accessibility"),
            f_wcag_level: FocusFlag::named("inputs.wcag_level"),
            f_generate: FocusFlag::named("inputs.generate"),
        }
    }

    pub fn pairs(&self) -> &[LinkedInputPair] {
        &self.pairs
    }

    pub fn pair_mut(&mut self, index: usize) -> Option<&mut LinkedInputPair> {
        self.pairs.get_mut(index)
    }

    pub fn slider(&self, id: SliderId) -> Option<&SliderBinding> {
        match id {
            SliderId::PopulationSize => Some(&self.population_size),
            SliderId::Generations => Some(&self.generations),
            SliderId::MutationProbability => Some(&self.mutation_probability),
            SliderId::InitialWeight => self.initial_weight.as_ref(),
        }
    }

    fn slider_mut(&mut self, id: SliderId) -> Option<&mut SliderBinding> {
        match id {
            SliderId::PopulationSize => Some(&mut self.population_size),
            SliderId::Generations => Some(&mut self.generations),
            SliderId::MutationProbability => Some(&mut self.mutation_probability),
            SliderId::InitialWeight => self.initial_weight.as_mut(),
        }
    }

    /// Sliders present in this variant, in display order.
    pub fn slider_ids(&self) -> impl Iterator<Item = SliderId> + '_ {
        [
            SliderId::PopulationSize,
            SliderId::Generations,
            SliderId::MutationProbability,
            SliderId::InitialWeight,
        ]
        .into_iter()
        .filter(|id| self.slider(*id).is_some())
    }

    pub fn slider_flag(&self, id: SliderId) -> Option<&FocusFlag> {
        self.slider(id)?;
        Some(match id {
            SliderId::PopulationSize => &self.f_population_size,
            SliderId::Generations => &self.f_generations,
            SliderId::MutationProbability => &self.f_mutation_probability,
            SliderId::InitialWeight => &self.f_initial_weight,
        })
    }

    /// Flag backing `target`, when this form renders it.
    pub fn flag(&self, target: FocusTarget) -> Option<FocusFlag> {
        match target {
            FocusTarget::Picker(pair) => self.pairs.get(pair).map(|pair| pair.f_picker.clone()),
            FocusTarget::HexText(pair) => self.pairs.get(pair).map(|pair| pair.f_hex.clone()),
            FocusTarget::Slider(id) => self.slider_flag(id).cloned(),
            FocusTarget::AccessibilityWeight => Some(self.f_accessibility.clone()),
            FocusTarget::WcagLevel => Some(self.f_wcag_level.clone()),
            FocusTarget::GenerateButton => Some(self.f_generate.clone()),
            _ => None,
        }
    }

    pub fn focused_target(&self) -> Option<FocusTarget> {
        for (index, pair) in self.pairs.iter().enumerate() {
            if pair.f_picker.get() {
                return Some(FocusTarget::Picker(index));
            }
            if pair.f_hex.get() {
                return Some(FocusTarget::HexText(index));
            }
        }
        if let Some(id) = self.slider_ids().find(|id| self.slider_flag(*id).is_some_and(FocusFlag::get)) {
            return Some(FocusTarget::Slider(id));
        }
        [
            (&self.f_accessibility, FocusTarget::AccessibilityWeight),
            (&self.f_wcag_level, FocusTarget::WcagLevel),
            (&self.f_generate, FocusTarget::GenerateButton),
        ]
        .into_iter()
        .find_map(|(flag, target)| flag.get().then_some(target))
    }

    pub fn accessibility(&self) -> &WeightSliderBinding {
        &self.accessibility
    }

    pub fn wcag_level(&self) -> WcagLevel {
        self.wcag_level
    }

    // ----- Event handlers -----

    pub fn picker_changed(&mut self, pair: usize, color: &HexColor) {
        if let Some(pair) = self.pairs.get_mut(pair) {
            pair.on_picker_change(color.clone());
        }
    }

    pub fn hex_text_changed(&mut self, pair: usize, text: &str) {
        if let Some(pair) = self.pairs.get_mut(pair) {
            pair.on_text_change(text);
        }
    }

    pub fn slider_changed(&mut self, id: SliderId, value: i64) {
        if let Some(slider) = self.slider_mut(id) {
            slider.set(value);
        }
    }

    pub fn accessibility_changed(&mut self, value: i64) {
        self.accessibility.set(value);
    }

    pub fn toggle_wcag_level(&mut self) {
        self.wcag_level = self.wcag_level.toggled();
    }

    /// Copy colors into the pairs, index-aligned. Extra colors are ignored.
    pub fn apply_colors(&mut self, colors: &[HexColor]) {
        for (pair, color) in self.pairs.iter_mut().zip(colors) {
            pair.set_color(color);
        }
    }

    /// Serialize the current widget state into a fresh form.
    pub fn form(&self) -> GenerationForm {
        GenerationForm {
            base_colors: self.pairs.iter().map(|pair| pair.picker().clone()).collect(),
            population_size: self.population_size.value_u32(),
            generations: self.generations.value_u32(),
            mutation_percent: self.mutation_probability.value_u32(),
            accessibility_weight: self.accessibility.slider().value_u32(),
            initial_weight: self.initial_weight.as_ref().map(SliderBinding::value_u32),
            wcag_level: self.wcag_level,
        }
    }
}

impl HasFocus for InputsState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        for pair in &self.pairs {
            builder.leaf_widget(&pair.f_picker);
            builder.leaf_widget(&pair.f_hex);
        }
        for id in self.slider_ids() {
            if let Some(flag) = self.slider_flag(id) {
                builder.leaf_widget(flag);
            }
        }
        builder.leaf_widget(&self.f_accessibility);
        builder.leaf_widget(&self.f_wcag_level);
        builder.leaf_widget(&self.f_generate);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

fn default_color(hex: &str) -> HexColor {
    HexColor::parse(hex).unwrap_or_else(|_| HexColor::from_rgb(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use colorevolve_types::Variant;

    use super::*;

    fn extended() -> InputsState {
        InputsState::new(&Variant::Extended.into())
    }

    #[test]
    fn picker_change_copies_into_text() {
        let mut inputs = extended();
        inputs.picker_changed(1, &HexColor::parse("#abcdef").unwrap());
        assert_eq!(inputs.pairs()[1].text().input(), "#abcdef");
        assert_eq!(inputs.pairs()[1].picker().as_str(), "#abcdef");
    }

    #[test]
    fn text_updates_picker_only_for_valid_hex() {
        let cases = [
            ("#3366CC", true),
            ("#3366cc", true),
            ("#3366C", false),
            ("3366CC", false),
            ("#3366CCA", false),
            ("#33 6CC", false),
            ("", false),
            ("#ZZZZZZ", false),
        ];
        for (text, follows) in cases {
            let mut inputs = extended();
            let before = inputs.pairs()[0].picker().clone();
            inputs.hex_text_changed(0, text);
            let pair = &inputs.pairs()[0];
            assert_eq!(pair.text().input(), text, "invalid text stays visible");
            if follows {
                assert_eq!(pair.picker().as_str(), text);
            } else {
                assert_eq!(pair.picker(), &before, "{text:?} must not reach the picker");
            }
        }
    }

    #[test]
    fn partial_typing_keeps_last_valid_picker() {
        let mut pair = LinkedInputPair::new("Base color", HexColor::parse("#000000").unwrap());
        for partial in ["#", "#1", "#12", "#123", "#1234", "#12345"] {
            assert!(!pair.on_text_change(partial));
            assert_eq!(pair.picker().as_str(), "#000000");
        }
        assert!(pair.on_text_change("#123456"));
        assert_eq!(pair.picker().as_str(), "#123456");
    }

    #[test]
    fn slider_label_tracks_clamped_value() {
        let mut inputs = extended();
        inputs.slider_changed(SliderId::PopulationSize, 120);
        assert_eq!(inputs.slider(SliderId::PopulationSize).unwrap().label(), "120");
        inputs.slider_changed(SliderId::PopulationSize, 5000);
        let population = inputs.slider(SliderId::PopulationSize).unwrap();
        assert_eq!(population.value(), 200);
        assert_eq!(population.label(), "200");
    }

    #[test]
    fn accessibility_and_aesthetic_always_sum_to_100() {
        let mut inputs = extended();
        for value in -20..=130 {
            inputs.accessibility_changed(value);
            let access: i64 = inputs.accessibility().accessibility_label().parse().unwrap();
            let aesthetic: i64 = inputs.accessibility().aesthetic_label().parse().unwrap();
            assert_eq!(access + aesthetic, 100, "value {value}");
            assert_eq!(access, inputs.accessibility().slider().value());
        }
    }

    #[test]
    fn single_variant_has_one_pair_and_no_initial_weight() {
        let inputs = InputsState::new(&Variant::Single.into());
        assert_eq!(inputs.pairs().len(), 1);
        assert!(inputs.slider(SliderId::InitialWeight).is_none());
        let form = inputs.form();
        assert_eq!(form.base_colors.len(), 1);
        assert_eq!(form.initial_weight, None);
    }

    #[test]
    fn form_reflects_widgets() {
        let mut inputs = InputsState::new(&Variant::Single.into());
        inputs.hex_text_changed(0, "#3366CC");
        inputs.slider_changed(SliderId::PopulationSize, 50);
        inputs.slider_changed(SliderId::Generations, 100);
        inputs.slider_changed(SliderId::MutationProbability, 5);
        inputs.accessibility_changed(70);
        inputs.toggle_wcag_level();
        let form = inputs.form();
        assert_eq!(form.base_colors[0].as_str(), "#3366CC");
        assert_eq!(
            (form.population_size, form.generations, form.mutation_percent, form.accessibility_weight),
            (50, 100, 5, 70)
        );
        assert_eq!(form.wcag_level, WcagLevel::AAA);
    }

    #[test]
    fn apply_colors_updates_picker_and_text() {
        let mut inputs = extended();
        let colors = ["#111111", "#FFFFFF", "#FF8800"].map(|hex| HexColor::parse(hex).unwrap());
        inputs.apply_colors(&colors);
        for (pair, expected) in inputs.pairs().iter().zip(["#111111", "#FFFFFF", "#FF8800"]) {
            assert_eq!(pair.picker().as_str(), expected);
            assert_eq!(pair.text().input(), expected);
        }
    }
}
