//! Inline `style="..."` processing and the small computed-style subset the
//! reading assistant needs: `font-size` and `line-height`.
//! CSS Style Attributes: <https://www.w3.org/TR/css-style-attr/>

use cssparser::{Parser, ParserInput, Token};
use std::collections::HashMap;

/// Initial `font-size` of the root element.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// A single CSS declaration parsed from a style attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name normalized to ASCII lowercase as per CSS case-insensitivity.
    pub property: String,
    /// Raw value slice trimmed of surrounding ASCII whitespace. May contain spaces.
    pub value: String,
}

/// Parse the value of a `style` attribute into a list of declarations.
///
/// Splits on `;`, then on the first `:` of each item. Items without a colon or
/// with an empty property or value are skipped.
pub fn parse_style_attribute(input: &str) -> Vec<Declaration> {
    let mut out: Vec<Declaration> = Vec::new();
    for raw_item in input.split(';') {
        let item = raw_item.trim_matches(is_ascii_whitespace);
        let Some((raw_prop, raw_value)) = item.split_once(':') else {
            continue;
        };
        let property_text = raw_prop.trim_matches(is_ascii_whitespace);
        let value_text = raw_value.trim_matches(is_ascii_whitespace);
        if property_text.is_empty() || value_text.is_empty() {
            continue;
        }
        out.push(Declaration {
            property: property_text.to_ascii_lowercase(),
            value: value_text.to_owned(),
        });
    }
    out
}

/// Parse into a map keyed by property name; the last duplicate wins.
pub fn parse_style_attribute_into_map(input: &str) -> HashMap<String, String> {
    parse_style_attribute(input)
        .into_iter()
        .map(|decl| (decl.property, decl.value))
        .collect()
}

/// ASCII whitespace per CSS Syntax (TAB, LF, FF, CR, SPACE).
const fn is_ascii_whitespace(character: char) -> bool {
    matches!(
        character,
        '\u{0009}' | '\u{000A}' | '\u{000C}' | '\u{000D}' | '\u{0020}'
    )
}

/// Computed `line-height`.
///
/// Unitless numbers inherit as numbers and are multiplied by the font size of
/// the element they end up on; lengths and percentages inherit as absolute pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineHeight {
    Normal,
    Number(f64),
    Px(f64),
}

/// The computed values used to measure the first rendered line of a block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedStyle {
    /// Computed font size in CSS pixels.
    pub font_size: f64,
    pub line_height: LineHeight,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE_PX,
            line_height: LineHeight::Normal,
        }
    }
}

impl ComputedStyle {
    /// Used line height in pixels. `normal` is approximated as `normal_factor × font-size`.
    pub fn line_height_px(&self, normal_factor: f64) -> f64 {
        match self.line_height {
            LineHeight::Normal => self.font_size * normal_factor,
            LineHeight::Number(multiplier) => self.font_size * multiplier,
            LineHeight::Px(pixels) => pixels,
        }
    }

    /// Compute the style of a child element that carries the given `style` attribute.
    ///
    /// Both properties are inherited, so anything the attribute does not set
    /// (or sets to an unsupported value) keeps the parent's computed value.
    pub fn inherit_with(&self, style_attr: Option<&str>) -> Self {
        let mut computed = *self;
        let Some(attr) = style_attr else {
            return computed;
        };
        let declarations = parse_style_attribute_into_map(attr);
        if let Some(size) = declarations
            .get("font-size")
            .and_then(|value| parse_font_size(value, self.font_size))
        {
            computed.font_size = size;
        }
        if let Some(height) = declarations
            .get("line-height")
            .and_then(|value| parse_line_height(value, computed.font_size))
        {
            computed.line_height = height;
        }
        computed
    }
}

/// Run `map` on the only token of `value`; `None` if there is not exactly one.
fn single_token<T>(value: &str, map: impl FnOnce(&Token<'_>) -> Option<T>) -> Option<T> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let mapped = match parser.next() {
        Ok(token) => map(token),
        Err(_) => None,
    };
    parser.expect_exhausted().ok()?;
    mapped
}

/// Resolve a `font-size` value against the parent's computed font size.
///
/// Supports px, em, rem, percentages and unitless zero.
pub fn parse_font_size(value: &str, parent_font_size: f64) -> Option<f64> {
    let size = single_token(value, |token| match *token {
        Token::Dimension {
            value: number,
            ref unit,
            ..
        } => match unit.to_ascii_lowercase().as_str() {
            "px" => Some(f64::from(number)),
            "em" => Some(f64::from(number) * parent_font_size),
            "rem" => Some(f64::from(number) * DEFAULT_FONT_SIZE_PX),
            _ => None,
        },
        Token::Percentage { unit_value, .. } => Some(f64::from(unit_value) * parent_font_size),
        Token::Number { value: number, .. } if number.abs() < f32::EPSILON => Some(0.0),
        _ => None,
    })?;
    (size >= 0.0).then_some(size)
}

/// Resolve a `line-height` value for an element whose computed font size is `font_size`.
pub fn parse_line_height(value: &str, font_size: f64) -> Option<LineHeight> {
    let height = single_token(value, |token| match *token {
        Token::Ident(ref name) if name.eq_ignore_ascii_case("normal") => Some(LineHeight::Normal),
        Token::Number { value: number, .. } => Some(LineHeight::Number(f64::from(number))),
        Token::Percentage { unit_value, .. } => {
            Some(LineHeight::Px(f64::from(unit_value) * font_size))
        }
        Token::Dimension {
            value: number,
            ref unit,
            ..
        } => match unit.to_ascii_lowercase().as_str() {
            "px" => Some(LineHeight::Px(f64::from(number))),
            "em" => Some(LineHeight::Px(f64::from(number) * font_size)),
            "rem" => Some(LineHeight::Px(f64::from(number) * DEFAULT_FONT_SIZE_PX)),
            _ => None,
        },
        _ => None,
    })?;
    match height {
        LineHeight::Number(number) | LineHeight::Px(number) if number < 0.0 => None,
        LineHeight::Normal | LineHeight::Number(_) | LineHeight::Px(_) => Some(height),
    }
}
