/// Pipeline steps shown while a full generation request is in flight.
const FULL_STEPS: &[&str] = &[
    "Analyzing person photo",
    "Analyzing style guide",
    "Generating toy image",
    "Building 3D model",
];

/// Image-only generation skips the 3D stage.
const IMAGE_ONLY_STEPS: &[&str] = &[
    "Analyzing person photo",
    "Analyzing style guide",
    "Generating toy image",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Full,
    ImageOnly,
}

impl GenerationMode {
    /// Endpoint path on the generation service
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Full => "/generate-toy",
            Self::ImageOnly => "/generate-image-only",
        }
    }

    /// Mode name for display in UI
    pub fn name(&self) -> &str {
        match self {
            Self::Full => "Image + 3D model",
            Self::ImageOnly => "Image only",
        }
    }

    /// Whether this mode produces a 3D model result
    pub fn includes_model(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Progress step labels for the simulated progress display
    pub fn steps(&self) -> &'static [&'static str] {
        match self {
            Self::Full => FULL_STEPS,
            Self::ImageOnly => IMAGE_ONLY_STEPS,
        }
    }
}

impl Default for GenerationMode {
    fn default() -> Self {
        Self::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(GenerationMode::Full.endpoint(), "/generate-toy");
        assert_eq!(GenerationMode::ImageOnly.endpoint(), "/generate-image-only");
    }

    #[test]
    fn test_step_counts() {
        assert_eq!(GenerationMode::Full.steps().len(), 4);
        assert_eq!(GenerationMode::ImageOnly.steps().len(), 3);
    }

    #[test]
    fn test_model_gate() {
        assert!(GenerationMode::Full.includes_model());
        assert!(!GenerationMode::ImageOnly.includes_model());
    }
}
