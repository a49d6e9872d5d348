use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Process-unique identity assigned to a window at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(uuid::Uuid);

impl WindowId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse a window identity from its hyphenated UUID form.
    /// Returns `None` for anything that is not a UUID.
    pub fn parse(raw: &str) -> Option<Self> {
        uuid::Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WindowId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

/// Identifier of one engine surface. Allocated by whoever builds the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EngineId(pub u64);

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_id_is_v4_uuid() {
        let id = WindowId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn window_id_is_unique() {
        assert_ne!(WindowId::new(), WindowId::new());
    }

    #[test]
    fn window_id_display_round_trips_through_parse() {
        let id = WindowId::new();
        let text = id.to_string();
        assert_eq!(WindowId::parse(&text), Some(id));
        assert_eq!(text.parse::<WindowId>().unwrap(), id);
    }

    #[test]
    fn window_id_parse_rejects_garbage() {
        assert_eq!(WindowId::parse("not-a-uuid"), None);
        assert_eq!(WindowId::parse(""), None);
    }

    #[test]
    fn window_id_parse_trims_whitespace() {
        let id = WindowId::new();
        assert_eq!(WindowId::parse(&format!(" {id}\n")), Some(id));
    }

    #[test]
    fn window_id_serializes_as_plain_string() {
        let id = WindowId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: WindowId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn window_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let a = WindowId::new();
        set.insert(a);
        set.insert(a);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn engine_id_display() {
        assert_eq!(EngineId(7).to_string(), "engine-7");
    }
}
