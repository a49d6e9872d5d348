mod core;
mod placement;

pub use self::core::*;
pub use placement::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_clone_and_equality() {
        let r = Rect::new(10.0, 20.0, 800.0, 600.0);
        let r2 = r;
        assert_eq!(r, r2);
        assert_eq!(r.right(), 810.0);
        assert_eq!(r.bottom(), 620.0);
    }

    #[test]
    fn rect_serialization() {
        let r = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let json = serde_json::to_string(&r).unwrap();
        let deserialized: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, deserialized);
    }

    #[test]
    fn window_mode_defaults_to_normal() {
        assert_eq!(WindowMode::default(), WindowMode::Normal);
    }

    #[test]
    fn window_mode_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&WindowMode::Singleton).unwrap(),
            "\"singleton\""
        );
        let mode: WindowMode = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(mode, WindowMode::Normal);
    }
}
