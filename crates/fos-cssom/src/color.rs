//! CSS Color Values
//!
//! A color is a function value whose arguments are named channels: `r,g,b`
//! or `h,s,l`, optionally followed by `a`. The function name is derived from
//! the channel keys and never stored. An alpha channel equal to 1 is never
//! stored, whichever way the color was built or converted.

use std::fmt;

use crate::named_colors;
use crate::values::{Size, Value};

/// Color channel key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    Lightness,
    Alpha,
}

impl Channel {
    pub fn key(&self) -> char {
        match self {
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Blue => 'b',
            Self::Hue => 'h',
            Self::Saturation => 's',
            Self::Lightness => 'l',
            Self::Alpha => 'a',
        }
    }
}

/// Native channel family of a color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFamily {
    Rgb,
    Hsl,
}

/// Color with named channels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Color {
    channels: Vec<(Channel, Value)>,
}

impl Color {
    /// Build from `r,g,b` channels. Channels are clamped to 0-255 and
    /// rounded, alpha is clamped to 0-1 and dropped when opaque.
    pub fn from_rgb(r: f64, g: f64, b: f64, a: Option<f64>) -> Self {
        let mut color = Self::default();
        color.set_rgb(r, g, b, a);
        color
    }

    /// Build from HSL channels, stored as RGB
    pub fn from_hsl(h: f64, s: f64, l: f64, a: Option<f64>) -> Self {
        let (r, g, b) = hsl_to_rgb(normalize_hue(h), clamp(s, 0.0, 100.0), clamp(l, 0.0, 100.0));
        Self::from_rgb(r, g, b, a)
    }

    /// Build an `hsl(...)` literal that keeps HSL as its native family
    pub fn hsl_literal(h: f64, s: f64, l: f64, a: Option<f64>) -> Self {
        let mut color = Self::default();
        color.set_hsl(normalize_hue(h), clamp(s, 0.0, 100.0), clamp(l, 0.0, 100.0), a);
        color
    }

    /// Parse `#rgb` / `#rrggbb` (the `#` is optional, case-insensitive)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            tracing::trace!("Rejected hex color {:?}", hex);
            return None;
        }

        let (r, g, b) = match hex.len() {
            3 => (
                u8::from_str_radix(&hex[0..1], 16).ok()? * 17,
                u8::from_str_radix(&hex[1..2], 16).ok()? * 17,
                u8::from_str_radix(&hex[2..3], 16).ok()? * 17,
            ),
            6 => (
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            ),
            _ => {
                tracing::trace!("Rejected hex color {:?}", hex);
                return None;
            }
        };

        Some(Self::from_rgb(r as f64, g as f64, b as f64, None))
    }

    /// Look up a CSS color keyword
    pub fn from_named(name: &str) -> Option<Self> {
        let [r, g, b] = named_colors::rgb_for_name(name)?;
        Some(Self::from_rgb(r as f64, g as f64, b as f64, None))
    }

    /// Build from an explicit channel mapping. A complete `r,g,b` set wins
    /// over a complete `h,s,l` set; anything else yields `None`.
    pub fn from_channels(channels: &[(char, f64)]) -> Option<Self> {
        let get = |key: char| {
            channels
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| *value)
        };

        if let (Some(r), Some(g), Some(b)) = (get('r'), get('g'), get('b')) {
            return Some(Self::from_rgb(r, g, b, get('a')));
        }
        if let (Some(h), Some(s), Some(l)) = (get('h'), get('s'), get('l')) {
            return Some(Self::from_hsl(h, s, l, get('a')));
        }

        tracing::trace!("Incomplete color channel mapping: {:?}", channels);
        None
    }

    /// Parse a keyword or a hex string
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_named(text).or_else(|| Self::from_hex(text))
    }

    /// Function name derived from the channel keys (`rgb`, `hsla`, ...)
    pub fn name(&self) -> String {
        self.channels.iter().map(|(channel, _)| channel.key()).collect()
    }

    pub fn family(&self) -> Option<ColorFamily> {
        let name = self.name();
        if name.starts_with("rgb") {
            Some(ColorFamily::Rgb)
        } else if name.starts_with("hsl") {
            Some(ColorFamily::Hsl)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Numeric value of a channel
    pub fn channel(&self, channel: Channel) -> Option<f64> {
        self.channels
            .iter()
            .find(|(c, _)| *c == channel)
            .and_then(|(_, value)| value.as_size())
            .map(Size::value)
    }

    pub fn alpha(&self) -> Option<f64> {
        self.channel(Channel::Alpha)
    }

    /// Channel values in storage order
    pub fn components(&self) -> impl Iterator<Item = &Value> {
        self.channels.iter().map(|(_, value)| value)
    }

    /// Convert to the RGB family in place. No-op when already RGB, apart from
    /// dropping an opaque alpha channel.
    pub fn to_rgb(&mut self) {
        match self.family() {
            None => {}
            Some(ColorFamily::Rgb) => self.drop_opaque_alpha(),
            Some(ColorFamily::Hsl) => {
                let Some((h, s, l)) = self.hsl_channels() else {
                    return;
                };
                let alpha = self.alpha();
                let (r, g, b) = hsl_to_rgb(h, s, l);
                self.set_rgb(r, g, b, alpha);
            }
        }
    }

    /// Convert to the HSL family in place. No-op when already HSL, apart from
    /// dropping an opaque alpha channel.
    pub fn to_hsl(&mut self) {
        match self.family() {
            None => {}
            Some(ColorFamily::Hsl) => self.drop_opaque_alpha(),
            Some(ColorFamily::Rgb) => {
                let Some((r, g, b)) = self.rgb_channels() else {
                    return;
                };
                let alpha = self.alpha();
                let (h, s, l) = rgb_to_hsl(r, g, b);
                self.set_hsl(h, s, l, alpha);
            }
        }
    }

    /// `#rrggbb`, or `None` for translucent colors
    pub fn hex_value(&self) -> Option<String> {
        if self.alpha().is_some_and(|a| a != 1.0) {
            return None;
        }
        let (r, g, b) = self.as_rgb_triple()?;
        Some(format!("#{:02x}{:02x}{:02x}", r, g, b))
    }

    /// Exact keyword for this color, if any
    pub fn named_color(&self) -> Option<&'static str> {
        let mut rgb = self.clone();
        rgb.to_rgb();
        if rgb.alpha().is_some() {
            return None;
        }
        let (r, g, b) = rgb.as_rgb_triple()?;
        named_colors::name_for_rgb([r, g, b])
    }

    fn as_rgb_triple(&self) -> Option<(u8, u8, u8)> {
        let (r, g, b) = match self.family()? {
            ColorFamily::Rgb => self.rgb_channels()?,
            ColorFamily::Hsl => {
                let (h, s, l) = self.hsl_channels()?;
                hsl_to_rgb(h, s, l)
            }
        };
        Some((to_byte(r), to_byte(g), to_byte(b)))
    }

    fn rgb_channels(&self) -> Option<(f64, f64, f64)> {
        Some((
            self.channel(Channel::Red)?,
            self.channel(Channel::Green)?,
            self.channel(Channel::Blue)?,
        ))
    }

    fn hsl_channels(&self) -> Option<(f64, f64, f64)> {
        Some((
            self.channel(Channel::Hue)?,
            self.channel(Channel::Saturation)?,
            self.channel(Channel::Lightness)?,
        ))
    }

    fn set_rgb(&mut self, r: f64, g: f64, b: f64, a: Option<f64>) {
        self.channels = vec![
            (Channel::Red, rgb_component(r)),
            (Channel::Green, rgb_component(g)),
            (Channel::Blue, rgb_component(b)),
        ];
        self.push_alpha(a);
    }

    fn set_hsl(&mut self, h: f64, s: f64, l: f64, a: Option<f64>) {
        self.channels = vec![
            (Channel::Hue, Value::Size(Size::channel(h, None))),
            (Channel::Saturation, Value::Size(Size::channel(s, Some("%")))),
            (Channel::Lightness, Value::Size(Size::channel(l, Some("%")))),
        ];
        self.push_alpha(a);
    }

    fn push_alpha(&mut self, a: Option<f64>) {
        if let Some(a) = a {
            let a = clamp(a, 0.0, 1.0);
            if a != 1.0 {
                self.channels.push((Channel::Alpha, Value::Size(Size::channel(a, None))));
            }
        }
    }

    fn drop_opaque_alpha(&mut self) {
        if self.alpha().is_some_and(|a| a >= 1.0) {
            self.channels.retain(|(channel, _)| *channel != Channel::Alpha);
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        for (i, (_, value)) in self.channels.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            fmt::Display::fmt(value, f)?;
        }
        f.write_str(")")
    }
}

fn rgb_component(value: f64) -> Value {
    Value::Size(Size::channel(round_half_up(clamp(value, 0.0, 255.0)), None))
}

fn to_byte(value: f64) -> u8 {
    round_half_up(clamp(value, 0.0, 255.0)) as u8
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

/// Round half up, used for every channel
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Wrap a hue angle into [0, 360)
fn normalize_hue(h: f64) -> f64 {
    if h.is_finite() { h.rem_euclid(360.0) } else { 0.0 }
}

/// HSL (degrees, percent, percent) to rounded RGB channels
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = normalize_hue(h) / 360.0;
    let s = clamp(s, 0.0, 100.0) / 100.0;
    let l = clamp(l, 0.0, 100.0) / 100.0;

    if s == 0.0 {
        let v = round_half_up(l * 255.0);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    (
        round_half_up(r * 255.0),
        round_half_up(g * 255.0),
        round_half_up(b * 255.0),
    )
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// RGB channels (0-255) to rounded HSL (degrees, percent, percent)
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let r = clamp(r, 0.0, 255.0) / 255.0;
    let g = clamp(g, 0.0, 255.0) / 255.0;
    let b = clamp(b, 0.0, 255.0) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, round_half_up(l * 100.0));
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (
        round_half_up(h * 60.0) % 360.0,
        round_half_up(s * 100.0),
        round_half_up(l * 100.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_clamps_and_rounds() {
        let color = Color::from_rgb(300.0, -5.0, 127.5, None);
        assert_eq!(color.to_string(), "rgb(255,0,128)");
    }

    #[test]
    fn test_opaque_alpha_is_dropped() {
        let opaque = Color::from_rgb(255.0, 0.0, 0.0, Some(1.0));
        assert_eq!(opaque.name(), "rgb");
        assert_eq!(opaque.to_string(), "rgb(255,0,0)");

        let clamped = Color::from_rgb(255.0, 0.0, 0.0, Some(3.0));
        assert_eq!(clamped.name(), "rgb");

        let translucent = Color::from_rgb(255.0, 0.0, 0.0, Some(0.5));
        assert_eq!(translucent.name(), "rgba");
        assert_eq!(translucent.to_string(), "rgba(255,0,0,0.5)");
    }

    #[test]
    fn test_from_hsl_stores_rgb() {
        let red = Color::from_hsl(0.0, 100.0, 50.0, None);
        assert_eq!(red.to_string(), "rgb(255,0,0)");

        let wrapped = Color::from_hsl(480.0, 100.0, 50.0, Some(1.0));
        assert_eq!(wrapped.to_string(), "rgb(0,255,0)");

        let gray = Color::from_hsl(0.0, 0.0, 50.0, Some(0.25));
        assert_eq!(gray.to_string(), "rgba(128,128,128,0.25)");
    }

    #[test]
    fn test_hex_parsing() {
        let short = Color::from_hex("#F00").unwrap();
        let long = Color::from_hex("ff0000").unwrap();
        assert_eq!(short, long);
        assert_eq!(short.to_string(), "rgb(255,0,0)");

        assert!(Color::from_hex("#ff00").is_none());
        assert!(Color::from_hex("#gg0000").is_none());
        assert!(Color::from_hex("").is_none());
    }

    #[test]
    fn test_hex_value_roundtrip() {
        for hex in ["#ff0000", "#00ffff", "#123abc", "#000000"] {
            assert_eq!(Color::from_hex(hex).unwrap().hex_value().as_deref(), Some(hex));
        }
        assert_eq!(Color::from_hex("#ABCDEF").unwrap().hex_value().as_deref(), Some("#abcdef"));
    }

    #[test]
    fn test_hex_value_requires_opacity() {
        assert_eq!(Color::from_rgb(0.0, 0.0, 0.0, Some(0.5)).hex_value(), None);
        assert_eq!(Color::default().hex_value(), None);
        let literal = Color::hsl_literal(120.0, 100.0, 50.0, None);
        assert_eq!(literal.hex_value().as_deref(), Some("#00ff00"));
    }

    #[test]
    fn test_to_hsl_and_back() {
        let mut color = Color::from_named("red").unwrap();
        color.to_hsl();
        assert_eq!(color.to_string(), "hsl(0,100%,50%)");
        color.to_hsl();
        assert_eq!(color.to_string(), "hsl(0,100%,50%)");
        color.to_rgb();
        assert_eq!(color.to_string(), "rgb(255,0,0)");
    }

    #[test]
    fn test_conversion_preserves_alpha() {
        let mut color = Color::from_rgb(0.0, 0.0, 255.0, Some(0.5));
        color.to_hsl();
        assert_eq!(color.to_string(), "hsla(240,100%,50%,0.5)");
        color.to_rgb();
        assert_eq!(color.to_string(), "rgba(0,0,255,0.5)");
    }

    #[test]
    fn test_hsl_literal_keeps_family() {
        let mut literal = Color::hsl_literal(210.0, 50.0, 40.0, Some(1.0));
        assert_eq!(literal.to_string(), "hsl(210,50%,40%)");
        literal.to_rgb();
        assert_eq!(literal.to_string(), "rgb(51,102,153)");
    }

    #[test]
    fn test_named_color_lookup() {
        assert_eq!(Color::from_hex("#0ff").unwrap().named_color(), Some("aqua"));
        assert_eq!(Color::hsl_literal(0.0, 100.0, 50.0, None).named_color(), Some("red"));
        assert_eq!(Color::from_rgb(1.0, 2.0, 3.0, None).named_color(), None);
        assert_eq!(Color::from_rgb(255.0, 0.0, 0.0, Some(0.5)).named_color(), None);
    }

    #[test]
    fn test_from_channels() {
        let rgb = Color::from_channels(&[('r', 10.0), ('g', 20.0), ('b', 30.0)]).unwrap();
        assert_eq!(rgb.to_string(), "rgb(10,20,30)");

        let hsl = Color::from_channels(&[('h', 0.0), ('s', 100.0), ('l', 50.0), ('a', 0.5)])
            .unwrap();
        assert_eq!(hsl.to_string(), "rgba(255,0,0,0.5)");

        assert!(Color::from_channels(&[('r', 10.0), ('g', 20.0)]).is_none());
    }

    #[test]
    fn test_rgb_to_hsl_formula() {
        assert_eq!(rgb_to_hsl(255.0, 255.0, 255.0), (0.0, 0.0, 100.0));
        assert_eq!(rgb_to_hsl(0.0, 128.0, 0.0), (120.0, 100.0, 25.0));
        assert_eq!(rgb_to_hsl(255.0, 0.0, 255.0), (300.0, 100.0, 50.0));
    }
}
