//! Light/dark palette

/// Color scheme, sampled from the host once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }

    /// Spark fill: blue accent on light, white on dark
    pub fn particle_color(&self) -> &'static str {
        match self {
            Theme::Light => "#3b82f6",
            Theme::Dark => "#ffffff",
        }
    }

    /// Shape fill: near-black on light, white on dark
    pub fn shape_color(&self) -> &'static str {
        match self {
            Theme::Light => "#18181b",
            Theme::Dark => "#ffffff",
        }
    }
}
