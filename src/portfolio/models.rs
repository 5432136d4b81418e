// Common data models for the page runtime

use std::fmt;

/// Identity of one managed video element (document order index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VideoId(pub usize);

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "video#{}", self.0)
    }
}

/// Load status tracked per video
///
/// Only ever advances `Unloaded -> Loading -> {Loaded, Error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    Error,
}

impl LoadStatus {
    /// Loaded or Error; no further transitions
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded | Self::Error)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Unloaded => 0,
            Self::Loading => 1,
            Self::Loaded | Self::Error => 2,
        }
    }

    /// Whether `next` is a legal forward transition from `self`
    pub fn can_advance_to(&self, next: LoadStatus) -> bool {
        !self.is_settled() && next.rank() > self.rank()
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unloaded => write!(f, "unloaded"),
            Self::Loading => write!(f, "loading"),
            Self::Loaded => write!(f, "loaded"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Outcome reported by a media element's readiness listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// `canplaythrough` fired
    Ready,
    /// `error` fired
    Failed,
}

impl From<LoadOutcome> for LoadStatus {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Ready => LoadStatus::Loaded,
            LoadOutcome::Failed => LoadStatus::Error,
        }
    }
}

/// HTMLMediaElement.readyState
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

impl ReadyState {
    pub fn from_raw(value: u16) -> Self {
        match value {
            0 => Self::HaveNothing,
            1 => Self::HaveMetadata,
            2 => Self::HaveCurrentData,
            3 => Self::HaveFutureData,
            _ => Self::HaveEnoughData,
        }
    }

    /// Enough data buffered to start playback without stalling
    pub fn can_play_through(&self) -> bool {
        *self >= Self::HaveFutureData
    }
}

/// Value written to the `preload` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadHint {
    Auto,
}

impl PreloadHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
        }
    }
}

/// navigator.connection.effectiveType
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveType {
    FourG,
    ThreeG,
    TwoG,
    Slow2G,
}

impl EffectiveType {
    /// Parse the reported value; unknown strings yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "4g" => Some(Self::FourG),
            "3g" => Some(Self::ThreeG),
            "2g" => Some(Self::TwoG),
            "slow-2g" => Some(Self::Slow2G),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FourG => "4g",
            Self::ThreeG => "3g",
            Self::TwoG => "2g",
            Self::Slow2G => "slow-2g",
        }
    }
}

impl fmt::Display for EffectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection speed collapsed to two buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionClass {
    Slow,
    #[default]
    Fast,
}

impl fmt::Display for ConnectionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slow => write!(f, "slow"),
            Self::Fast => write!(f, "fast"),
        }
    }
}

/// Open/closed state of one accordion panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccordionState {
    #[default]
    Closed,
    Open,
}

impl AccordionState {
    pub fn from_open(open: bool) -> Self {
        if open {
            Self::Open
        } else {
            Self::Closed
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}
