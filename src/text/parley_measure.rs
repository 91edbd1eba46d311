use std::borrow::Cow;

use crate::style::model::FontStyle;
use crate::text::fonts::FontRegistry;
use crate::text::measure::{BuiltinMetrics, FontSpec, TextMeasurer};

/// Measures lines by shaping them with parley against registered font files.
///
/// Families without a registered face are measured with [`BuiltinMetrics`], so a missing font
/// degrades to the table rather than to whatever the system font fallback picks.
pub struct ParleyMeasurer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: Vec<String>,
    fallback: BuiltinMetrics,
}

impl ParleyMeasurer {
    pub fn new(registry: &FontRegistry) -> Self {
        let mut font_ctx = parley::FontContext::default();
        let mut families = Vec::new();
        for face in registry.faces() {
            let registered = font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::<u8>::new(face.bytes.clone()), None);
            for (id, _) in registered {
                if let Some(name) = font_ctx.collection.family_name(id) {
                    families.push(name.to_string());
                }
            }
        }
        families.sort();
        families.dedup();

        Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            families,
            fallback: BuiltinMetrics,
        }
    }

    fn resolve_family(&self, family: &str) -> Option<String> {
        let wanted = family.trim();
        self.families
            .iter()
            .find(|f| f.eq_ignore_ascii_case(wanted))
            .cloned()
    }
}

impl TextMeasurer for ParleyMeasurer {
    fn advance_px(&mut self, text: &str, font: &FontSpec) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let Some(family) = self.resolve_family(&font.family) else {
            return self.fallback.advance_px(text, font);
        };

        let style = match font.style {
            FontStyle::Normal => parley::style::FontStyle::Normal,
            FontStyle::Italic => parley::style::FontStyle::Italic,
            FontStyle::Oblique => parley::style::FontStyle::Oblique(None),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(font.weight.value())),
        ));
        builder.push_default(parley::style::StyleProperty::FontStyle(style));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        layout
            .lines()
            .map(|line| f64::from(line.metrics().advance))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/parley_measure.rs"]
mod tests;
