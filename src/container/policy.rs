//! Advisory checks on the linter image reference.

use super::OFFICIAL_IMAGE_PREFIX;
use crate::output;
use crate::product::ProductTable;
use std::fmt;
use std::sync::Arc;

const LATEST_TAG: &str = ":latest";

/// A reason to warn about an image reference. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageWarning {
    Unofficial { image: String },
    Unpinned { image: String, suggestion: String },
    Incompatible {
        image: String,
        cli_version: String,
        suggestion: String,
    },
}

impl fmt::Display for ImageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unofficial { image } => {
                write!(f, "You are using an unofficial linter image: {}", image)
            }
            Self::Unpinned { image, suggestion } => write!(
                f,
                "You are running a linter without an exact version tag: {}\n \
                 Consider pinning the version in your configuration to ensure version compatibility: {}",
                image, suggestion
            ),
            Self::Incompatible {
                image,
                cli_version,
                suggestion,
            } => write!(
                f,
                "You are using a non-compatible linter {} with the current CLI ({})\n \
                 Consider updating the CLI or using a compatible linter {}",
                image, cli_version, suggestion
            ),
        }
    }
}

/// Compatibility rules for linter images.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    products: Arc<ProductTable>,
    cli_version: String,
}

impl ImagePolicy {
    pub fn new(products: Arc<ProductTable>, cli_version: &str) -> Self {
        Self {
            products,
            cli_version: cli_version.to_string(),
        }
    }

    /// Development builds pair with arbitrary images.
    fn is_dev_build(&self) -> bool {
        self.cli_version.contains("nightly") || self.cli_version.contains("dev")
    }

    /// Classify `image`. Unpinned takes precedence over incompatible.
    pub fn check(&self, image: &str) -> Vec<ImageWarning> {
        if self.is_dev_build() {
            return Vec::new();
        }

        let mut warnings = Vec::new();
        if !image.starts_with(OFFICIAL_IMAGE_PREFIX) {
            warnings.push(ImageWarning::Unofficial {
                image: image.to_string(),
            });
        }

        let release = self.products.release_version();
        let repository = image.split(':').next().unwrap_or(image);
        let suggestion = format!("{}:{}", repository, release);

        if !has_exact_version_tag(image) {
            warnings.push(ImageWarning::Unpinned {
                image: image.to_string(),
                suggestion,
            });
        } else if !image.contains(release) {
            warnings.push(ImageWarning::Incompatible {
                image: image.to_string(),
                cli_version: self.cli_version.clone(),
                suggestion,
            });
        }
        warnings
    }

    /// Print a CI-visible warning for every problem with `image`.
    pub fn check_image(&self, image: &str) {
        for warning in self.check(image) {
            output::warning_ci(&warning.to_string());
        }
    }
}

fn has_exact_version_tag(image: &str) -> bool {
    image.contains(':') && !image.contains(LATEST_TAG)
}
