// Theme management: dark by default, light on request, remembered across visits

use std::fmt;

use super::traits::{PreferenceStore, ThemeSurface};

/// Storage key holding the preference
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Only an explicit "light" switches away from the default
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Font Awesome icon shown on the toggle: a moon offers dark, a sun offers light
    pub fn icon_class(&self) -> &'static str {
        match self {
            Self::Dark => "fa-sun",
            Self::Light => "fa-moon",
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self, Self::Light)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ThemeController<S, T> {
    store: S,
    surface: T,
    current: Theme,
}

impl<S: PreferenceStore, T: ThemeSurface> ThemeController<S, T> {
    /// Read the stored preference and apply it when it differs from the markup default
    pub fn start(store: S, surface: T) -> Self {
        let stored = match store.get(THEME_KEY) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("[Theme] Could not read preference: {}", e);
                None
            }
        };
        let current = Theme::from_stored(stored.as_deref());
        if current.is_light() {
            surface.apply_theme(current);
        }
        log::debug!("[Theme] Starting in {} mode", current);
        Self {
            store,
            surface,
            current,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Toggle button clicked
    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        self.surface.apply_theme(self.current);
        if let Err(e) = self.store.set(THEME_KEY, self.current.as_str()) {
            log::warn!("[Theme] Could not save preference: {}", e);
        }
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn surface(&self) -> &T {
        &self.surface
    }
}
