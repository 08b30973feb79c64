use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color string: {input:?} (expected #rrggbb or #rrggbbaa)")]
pub struct ColorParseError {
    /// The string that failed to parse.
    pub input: String,
}

/// Validated RGBA color.
///
/// Parsed from `#rrggbb` / `#rrggbbaa` hex strings and formatted back the same
/// way for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(200, 200, 200);
    pub const DARK_GRAY: Color = Color::rgb(80, 80, 80);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a `#rrggbb` or `#rrggbbaa` hex string.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            input: input.to_string(),
        };

        let hex = input.strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| err())
        };

        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;
        let a = if hex.len() == 8 { channel(6..8)? } else { 255 };

        Ok(Self { r, g, b, a })
    }

    /// Formats as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Channel-wise linear interpolation in sRGB space. `t` is clamped to [0, 1].
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Color {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: ch(self.a, other.a),
        }
    }
}

/// Node body shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Ellipse,
    Rectangle,
    RoundRectangle,
    Triangle,
    Diamond,
    Hexagon,
    Octagon,
    Parallelogram,
    Vee,
}

impl ShapeKind {
    pub fn css_name(self) -> &'static str {
        match self {
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::RoundRectangle => "round-rectangle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Octagon => "octagon",
            ShapeKind::Parallelogram => "parallelogram",
            ShapeKind::Vee => "vee",
        }
    }
}

/// Edge stroke pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn css_name(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
        }
    }
}

/// Arrow head shape at an edge endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowShape {
    #[default]
    None,
    Triangle,
    Circle,
    Diamond,
    Tee,
    Vee,
}

impl ArrowShape {
    pub fn css_name(self) -> &'static str {
        match self {
            ArrowShape::None => "none",
            ArrowShape::Triangle => "triangle",
            ArrowShape::Circle => "circle",
            ArrowShape::Diamond => "diamond",
            ArrowShape::Tee => "tee",
            ArrowShape::Vee => "vee",
        }
    }
}

/// Horizontal label anchor relative to the element body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalAlign {
    pub fn css_name(self) -> &'static str {
        match self {
            HorizontalAlign::Left => "left",
            HorizontalAlign::Center => "center",
            HorizontalAlign::Right => "right",
        }
    }
}

/// Vertical label anchor relative to the element body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VerticalAlign {
    pub fn css_name(self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Center => "center",
            VerticalAlign::Bottom => "bottom",
        }
    }
}

/// Element visibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    /// Renderer display keyword.
    pub fn css_name(self) -> &'static str {
        match self {
            Visibility::Visible => "element",
            Visibility::Hidden => "none",
        }
    }
}

/// Kind of value a visual property holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    Color,
    Shape,
    LineStyle,
    ArrowShape,
    HorizontalAlign,
    VerticalAlign,
    Visibility,
    Number,
    Boolean,
    Text,
}

impl ValueKind {
    /// Whether values of this kind admit continuous interpolation.
    pub fn is_interpolable(self) -> bool {
        matches!(self, ValueKind::Color | ValueKind::Number)
    }
}

/// A concrete visual property value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualValue {
    Color(Color),
    Shape(ShapeKind),
    LineStyle(LineStyle),
    ArrowShape(ArrowShape),
    HorizontalAlign(HorizontalAlign),
    VerticalAlign(VerticalAlign),
    Visibility(Visibility),
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl VisualValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            VisualValue::Color(_) => ValueKind::Color,
            VisualValue::Shape(_) => ValueKind::Shape,
            VisualValue::LineStyle(_) => ValueKind::LineStyle,
            VisualValue::ArrowShape(_) => ValueKind::ArrowShape,
            VisualValue::HorizontalAlign(_) => ValueKind::HorizontalAlign,
            VisualValue::VerticalAlign(_) => ValueKind::VerticalAlign,
            VisualValue::Visibility(_) => ValueKind::Visibility,
            VisualValue::Number(_) => ValueKind::Number,
            VisualValue::Boolean(_) => ValueKind::Boolean,
            VisualValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            VisualValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            VisualValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Linear interpolation between two values of the same interpolable kind.
    ///
    /// Returns `None` for non-interpolable or mismatched kinds; continuous
    /// mappings are validated against this at construction so the resolution
    /// path never observes `None`.
    pub fn lerp(&self, other: &VisualValue, t: f64) -> Option<VisualValue> {
        match (self, other) {
            (VisualValue::Number(a), VisualValue::Number(b)) => {
                Some(VisualValue::Number(a + (b - a) * t.clamp(0.0, 1.0)))
            }
            (VisualValue::Color(a), VisualValue::Color(b)) => {
                Some(VisualValue::Color(a.lerp(*b, t)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Color::parse("#ff0000"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("#00ff0080"), Ok(Color::rgba(0, 255, 0, 128)));
        assert!(Color::parse("ff0000").is_err());
        assert!(Color::parse("#ff00").is_err());
        assert!(Color::parse("#zzzzzz").is_err());
    }

    #[test]
    fn formats_hex_colors() {
        assert_eq!(Color::rgb(255, 0, 0).to_hex(), "#ff0000");
        assert_eq!(Color::rgba(0, 0, 0, 128).to_hex(), "#00000080");
    }

    #[test]
    fn lerps_channelwise() {
        let a = Color::rgb(0, 0, 0);
        let b = Color::rgb(100, 200, 50);
        assert_eq!(a.lerp(b, 0.5), Color::rgb(50, 100, 25));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn lerp_rejects_non_interpolable_kinds() {
        let shape = VisualValue::Shape(ShapeKind::Diamond);
        let other = VisualValue::Shape(ShapeKind::Ellipse);
        assert!(shape.lerp(&other, 0.5).is_none());

        let n = VisualValue::Number(1.0);
        let c = VisualValue::Color(Color::BLACK);
        assert!(n.lerp(&c, 0.5).is_none());
    }

    #[test]
    fn number_lerp_midpoint() {
        let a = VisualValue::Number(10.0);
        let b = VisualValue::Number(50.0);
        assert_eq!(a.lerp(&b, 0.5), Some(VisualValue::Number(30.0)));
    }
}
