//! CSS Value Model
//!
//! Rule values as a closed set of variants: sizes, identifiers, strings,
//! separated lists, function calls and colors.

use std::fmt;

use crate::color::Color;

/// Property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Number with an optional unit (`0`, `1em`, `50%`)
    Size(Size),
    /// Bare identifier (`none`, `repeat-x`, `inherit`)
    Keyword(String),
    /// Quoted string
    String(String),
    /// Separated list of values
    List(ValueList),
    /// Function call (`url(...)`, `attr(...)`)
    Function(Function),
    /// Color function with named channels
    Color(Color),
}

impl Value {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self::Keyword(keyword.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::String(text.into())
    }

    /// Identifier text, if this is a keyword
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<&Size> {
        match self {
            Self::Size(size) => Some(size),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ValueList> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Check for a list joined by `separator`
    pub fn is_list_with(&self, separator: Separator) -> bool {
        matches!(self, Self::List(list) if list.separator() == separator)
    }

    /// Case-insensitive keyword comparison
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.as_keyword()
            .map(|k| k.eq_ignore_ascii_case(keyword))
            .unwrap_or(false)
    }
}

impl From<Size> for Value {
    fn from(size: Size) -> Self {
        Self::Size(size)
    }
}

impl From<ValueList> for Value {
    fn from(list: ValueList) -> Self {
        Self::List(list)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

impl From<Color> for Value {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(size) => fmt::Display::fmt(size, f),
            Self::Keyword(keyword) => f.write_str(keyword),
            Self::String(text) => {
                f.write_str("\"")?;
                for ch in text.chars() {
                    if ch == '"' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", ch)?;
                }
                f.write_str("\"")
            }
            Self::List(list) => fmt::Display::fmt(list, f),
            Self::Function(function) => fmt::Display::fmt(function, f),
            Self::Color(color) => fmt::Display::fmt(color, f),
        }
    }
}

/// Numeric value with an optional unit
#[derive(Debug, Clone, PartialEq)]
pub struct Size {
    value: f64,
    unit: Option<String>,
    /// Print the literal as-is (color channels)
    keep_form: bool,
}

impl Size {
    pub fn new(value: f64, unit: Option<&str>) -> Self {
        Self {
            value,
            unit: unit.map(str::to_string),
            keep_form: false,
        }
    }

    /// Unitless number
    pub fn number(value: f64) -> Self {
        Self::new(value, None)
    }

    pub fn with_unit(value: f64, unit: &str) -> Self {
        Self::new(value, Some(unit))
    }

    pub fn percent(value: f64) -> Self {
        Self::new(value, Some("%"))
    }

    /// Color channel literal; never normalized on output
    pub fn channel(value: f64, unit: Option<&str>) -> Self {
        Self {
            keep_form: true,
            ..Self::new(value, unit)
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn keeps_form(&self) -> bool {
        self.keep_form
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0.0 prints as "-0"
        let value = if self.value == 0.0 { 0.0 } else { self.value };
        let number = value.to_string();
        let number = match (self.keep_form, number.as_str()) {
            (false, n) if n.starts_with("0.") => &n[1..],
            (false, n) if n.starts_with("-0.") => {
                f.write_str("-")?;
                &n[2..]
            }
            (_, n) => n,
        };
        f.write_str(number)?;
        if let Some(unit) = &self.unit {
            f.write_str(unit)?;
        }
        Ok(())
    }
}

/// List separator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    Comma,
    Space,
    Slash,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Space => " ",
            Self::Slash => "/",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered values joined by one separator
#[derive(Debug, Clone, PartialEq)]
pub struct ValueList {
    components: Vec<Value>,
    separator: Separator,
}

impl ValueList {
    pub fn new(separator: Separator) -> Self {
        Self {
            components: Vec::new(),
            separator,
        }
    }

    pub fn from_components(components: Vec<Value>, separator: Separator) -> Self {
        Self {
            components,
            separator,
        }
    }

    /// Wrap a single value. A list already joined by `separator` is taken
    /// over as-is instead of being nested.
    pub fn wrap(value: Value, separator: Separator) -> Self {
        match value {
            Value::List(list) if list.separator == separator => list,
            other => Self::from_components(vec![other], separator),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.components.push(value);
    }

    pub fn components(&self) -> &[Value] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut Vec<Value> {
        &mut self.components
    }

    pub fn set_components(&mut self, components: Vec<Value>) {
        self.components = components;
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn set_separator(&mut self, separator: Separator) {
        self.separator = separator;
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for ValueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(self.separator.as_str())?;
            }
            fmt::Display::fmt(component, f)?;
        }
        Ok(())
    }
}

/// Named function call with comma-separated arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    name: String,
    arguments: ValueList,
}

impl Function {
    pub fn new(name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            arguments: ValueList::from_components(arguments, Separator::Comma),
        }
    }

    /// `url(...)` with a quoted target
    pub fn url(target: impl Into<String>) -> Self {
        Self::new("url", vec![Value::string(target)])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn arguments(&self) -> &[Value] {
        self.arguments.components()
    }

    pub fn argument_list(&self) -> &ValueList {
        &self.arguments
    }

    pub fn argument_list_mut(&mut self) -> &mut ValueList {
        &mut self.arguments
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_display() {
        assert_eq!(Size::number(0.0).to_string(), "0");
        assert_eq!(Size::with_unit(0.0, "px").to_string(), "0px");
        assert_eq!(Size::with_unit(1.0, "em").to_string(), "1em");
        assert_eq!(Size::percent(50.0).to_string(), "50%");
        assert_eq!(Size::with_unit(-0.0, "px").to_string(), "0px");
    }

    #[test]
    fn test_size_drops_leading_zero_unless_kept() {
        assert_eq!(Size::with_unit(0.5, "em").to_string(), ".5em");
        assert_eq!(Size::with_unit(-0.25, "em").to_string(), "-.25em");
        assert_eq!(Size::channel(0.5, None).to_string(), "0.5");
        assert_eq!(Size::with_unit(1.5, "em").to_string(), "1.5em");
    }

    #[test]
    fn test_list_wrap_flattens_same_separator() {
        let inner = ValueList::from_components(
            vec![Size::percent(0.0).into(), Size::percent(0.0).into()],
            Separator::Space,
        );
        let wrapped = ValueList::wrap(Value::List(inner.clone()), Separator::Space);
        assert_eq!(wrapped, inner);

        let nested = ValueList::wrap(Value::List(inner), Separator::Comma);
        assert_eq!(nested.len(), 1);
        assert!(nested.components()[0].is_list_with(Separator::Space));
    }

    #[test]
    fn test_list_and_function_display() {
        let families = ValueList::from_components(
            vec![Value::string("Helvetica Neue"), Value::keyword("sans-serif")],
            Separator::Comma,
        );
        assert_eq!(families.to_string(), "\"Helvetica Neue\",sans-serif");

        let url = Function::url("img/bg.png");
        assert_eq!(url.to_string(), "url(\"img/bg.png\")");

        let slash = ValueList::from_components(
            vec![Size::with_unit(12.0, "px").into(), Size::number(1.5).into()],
            Separator::Slash,
        );
        assert_eq!(slash.to_string(), "12px/1.5");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(Value::string("a\"b\\c").to_string(), "\"a\\\"b\\\\c\"");
    }
}
