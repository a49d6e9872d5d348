//! Window placement requests as sent by hosted pages.
//!
//! Each of `x`, `y`, `width`, `height` is either a pixel number or a string:
//! `"25%"` of the work area, or an anchor keyword (`left`, `right`, `center`
//! for `x`; `top`, `bottom`, `center` for `y`). Size is applied before
//! position so anchors see the final size.

use serde::{Deserialize, Serialize};

use super::core::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

/// One placement coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDimension", into = "RawDimension")]
pub enum Dimension {
    Pixels(f64),
    Percent(f64),
    Anchor(Anchor),
    /// Any string that is neither a percentage nor a known keyword.
    /// Kept so the request still parses; ignored when resolving.
    Unsupported(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDimension {
    Number(f64),
    Text(String),
}

impl From<RawDimension> for Dimension {
    fn from(raw: RawDimension) -> Self {
        match raw {
            RawDimension::Number(n) => Dimension::Pixels(n),
            RawDimension::Text(text) => Dimension::parse(&text),
        }
    }
}

impl From<Dimension> for RawDimension {
    fn from(dim: Dimension) -> Self {
        match dim {
            Dimension::Pixels(n) => RawDimension::Number(n),
            Dimension::Percent(p) => RawDimension::Text(format!("{p}%")),
            Dimension::Anchor(anchor) => RawDimension::Text(
                match anchor {
                    Anchor::Left => "left",
                    Anchor::Right => "right",
                    Anchor::Top => "top",
                    Anchor::Bottom => "bottom",
                    Anchor::Center => "center",
                }
                .to_string(),
            ),
            Dimension::Unsupported(text) => RawDimension::Text(text),
        }
    }
}

impl Dimension {
    /// Parse the string form of a coordinate.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Some(number) = text.strip_suffix('%') {
            return match number.trim().parse::<f64>() {
                Ok(p) => Dimension::Percent(p),
                Err(_) => Dimension::Unsupported(text.to_string()),
            };
        }
        match text {
            "left" => Dimension::Anchor(Anchor::Left),
            "right" => Dimension::Anchor(Anchor::Right),
            "top" => Dimension::Anchor(Anchor::Top),
            "bottom" => Dimension::Anchor(Anchor::Bottom),
            "center" => Dimension::Anchor(Anchor::Center),
            other => match other.parse::<f64>() {
                Ok(n) => Dimension::Pixels(n),
                Err(_) => Dimension::Unsupported(other.to_string()),
            },
        }
    }

    fn size(&self, extent: f64, scale: f64) -> Option<f64> {
        match self {
            Dimension::Pixels(px) => Some(px * scale),
            Dimension::Percent(p) => Some(extent * p / 100.0),
            _ => None,
        }
    }

    fn offset(
        &self,
        origin: f64,
        extent: f64,
        size: f64,
        start: Anchor,
        end: Anchor,
    ) -> Option<f64> {
        match self {
            Dimension::Pixels(px) => Some(*px),
            Dimension::Percent(p) => Some(origin + extent * p / 100.0),
            Dimension::Anchor(a) if *a == start => Some(origin),
            Dimension::Anchor(a) if *a == end => Some(origin + extent - size),
            Dimension::Anchor(Anchor::Center) => Some(origin + (extent - size) / 2.0),
            _ => None,
        }
    }
}

/// Requested bounds for a window; absent fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
}

impl Placement {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// Resolve against the current window bounds and the monitor work area.
    ///
    /// Pixel sizes are multiplied by `scale`; pixel positions are not.
    pub fn resolve(&self, current: Rect, work_area: Rect, scale: f64) -> Rect {
        let mut out = current;

        if let Some(w) = self.width.as_ref().and_then(|d| d.size(work_area.width, scale)) {
            out.width = w;
        }
        if let Some(h) = self.height.as_ref().and_then(|d| d.size(work_area.height, scale)) {
            out.height = h;
        }
        if let Some(x) = self.x.as_ref().and_then(|d| {
            d.offset(work_area.x, work_area.width, out.width, Anchor::Left, Anchor::Right)
        }) {
            out.x = x;
        }
        if let Some(y) = self.y.as_ref().and_then(|d| {
            d.offset(work_area.y, work_area.height, out.height, Anchor::Top, Anchor::Bottom)
        }) {
            out.y = y;
        }

        out
    }
}
