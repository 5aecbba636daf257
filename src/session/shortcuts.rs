//! Keyboard shortcuts of the preview window

use super::messages::Event;

/// Map a key name (as reported by GStreamer navigation events) to an event
pub fn handle_key_event(key: &str) -> Option<Event> {
    match key {
        // Capture
        "space" | "Return" | "KP_Enter" => Some(Event::CaptureRequested),
        // Quit
        "Escape" | "q" | "Q" => Some(Event::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_keys() {
        assert!(matches!(handle_key_event("space"), Some(Event::CaptureRequested)));
        assert!(matches!(handle_key_event("Return"), Some(Event::CaptureRequested)));
    }

    #[test]
    fn test_quit_keys() {
        assert!(matches!(handle_key_event("Escape"), Some(Event::Quit)));
        assert!(matches!(handle_key_event("q"), Some(Event::Quit)));
    }

    #[test]
    fn test_other_keys_ignored() {
        assert!(handle_key_event("a").is_none());
        assert!(handle_key_event("").is_none());
    }
}
