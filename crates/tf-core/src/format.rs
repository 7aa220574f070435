/// Unified 3D output format definition shared across the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Gaussian,
    Mesh,
    RadianceField,
    All,
}

impl OutputFormat {
    /// Format name for display in UI
    pub fn name(&self) -> &str {
        match self {
            Self::Gaussian => "Gaussian Splat",
            Self::Mesh => "Mesh",
            Self::RadianceField => "Radiance Field",
            Self::All => "All Formats",
        }
    }

    /// Format token for API communication
    pub fn id(&self) -> &str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Mesh => "mesh",
            Self::RadianceField => "radiance_field",
            Self::All => "all",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &str {
        match self {
            Self::Gaussian => "Point cloud as a .ply file, plus a turntable preview video",
            Self::Mesh => "Textured mesh exported as .glb",
            Self::RadianceField => "Radiance field representation (no file download)",
            Self::All => "Every representation the service can produce",
        }
    }

    /// UI icon
    pub fn icon(&self) -> &str {
        match self {
            Self::Gaussian => "✨",
            Self::Mesh => "🔶",
            Self::RadianceField => "🌐",
            Self::All => "📦",
        }
    }

    /// All selectable formats
    pub fn all() -> [OutputFormat; 4] {
        [Self::Gaussian, Self::Mesh, Self::RadianceField, Self::All]
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Gaussian
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tokens() {
        assert_eq!(OutputFormat::Gaussian.id(), "gaussian");
        assert_eq!(OutputFormat::Mesh.id(), "mesh");
        assert_eq!(OutputFormat::RadianceField.id(), "radiance_field");
        assert_eq!(OutputFormat::All.id(), "all");
    }

    #[test]
    fn test_all_formats() {
        assert_eq!(OutputFormat::all().len(), 4);
    }

    #[test]
    fn test_default_format() {
        assert_eq!(OutputFormat::default(), OutputFormat::Gaussian);
    }
}
