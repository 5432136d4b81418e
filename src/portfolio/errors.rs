// Error types for the page runtime

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortfolioError {
    /// A required DOM element or global (window, document, worker scope) is missing
    MissingElement(String),

    /// The browser refused media playback (autoplay policy, interrupted play)
    PlaybackRejected(String),

    /// Video decode or network failure reported by the media element
    MediaFailed(String),

    /// Preference storage is unavailable or rejected the write
    StorageUnavailable(String),

    /// Cache storage operation failed (open, add, put, delete)
    CacheFailed(String),

    /// Network fetch failed or returned an unusable response
    NetworkFailed(String),

    /// Site configuration could not be parsed
    InvalidConfig(String),

    /// Unknown error with details
    Unknown(String),
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(what) => write!(f, "Missing element: {}", what),
            Self::PlaybackRejected(msg) => write!(f, "Playback rejected: {}", msg),
            Self::MediaFailed(msg) => write!(f, "Media failed: {}", msg),
            Self::StorageUnavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            Self::CacheFailed(msg) => write!(f, "Cache error: {}", msg),
            Self::NetworkFailed(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Self::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for PortfolioError {}

impl From<serde_json::Error> for PortfolioError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

// Browser exceptions arrive as free-form strings; sort them by their DOMException name
impl From<String> for PortfolioError {
    fn from(s: String) -> Self {
        // play() rejections
        if s.contains("NotAllowedError") || s.contains("AbortError") || s.contains("play()") {
            return Self::PlaybackRejected(s);
        }

        // localStorage in private mode / over quota
        if s.contains("QuotaExceededError") || s.contains("SecurityError") {
            return Self::StorageUnavailable(s);
        }

        if s.contains("NotSupportedError") || s.contains("MEDIA_ERR") {
            return Self::MediaFailed(s);
        }

        if s.contains("Failed to fetch") || s.contains("NetworkError") {
            return Self::NetworkFailed(s);
        }

        if s.contains("Cache") || s.contains("addAll") {
            return Self::CacheFailed(s);
        }

        Self::Unknown(s)
    }
}

impl From<&str> for PortfolioError {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

// Thrown JS values: DOMException / Error carry "Name: message", anything else is stringified
#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for PortfolioError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        use wasm_bindgen::JsCast;

        if let Some(error) = value.dyn_ref::<js_sys::Error>() {
            let name = String::from(error.name());
            let message = String::from(error.message());
            return Self::from(format!("{}: {}", name, message));
        }
        match value.as_string() {
            Some(text) => Self::from(text),
            None => Self::from(format!("{:?}", value)),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<PortfolioError> for wasm_bindgen::JsValue {
    fn from(e: PortfolioError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoplay_rejection_detection() {
        let err = PortfolioError::from(
            "NotAllowedError: play() failed because the user didn't interact with the document first.",
        );
        assert!(matches!(err, PortfolioError::PlaybackRejected(_)));
    }

    #[test]
    fn test_quota_detection() {
        let err = PortfolioError::from("QuotaExceededError: The quota has been exceeded.");
        assert!(matches!(err, PortfolioError::StorageUnavailable(_)));
    }

    #[test]
    fn test_fetch_failure_detection() {
        let err = PortfolioError::from("TypeError: Failed to fetch");
        assert!(matches!(err, PortfolioError::NetworkFailed(_)));
    }

    #[test]
    fn test_cache_failure_detection() {
        let err = PortfolioError::from("TypeError: Cache.addAll() encountered a network error");
        assert!(matches!(err, PortfolioError::CacheFailed(_)));
    }

    #[test]
    fn test_unknown_fallback() {
        let err = PortfolioError::from("something odd");
        assert_eq!(err, PortfolioError::Unknown("something odd".to_string()));
        assert_eq!(err.to_string(), "Unknown error: something odd");
    }
}
