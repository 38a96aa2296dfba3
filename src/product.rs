//! Linter product table.
//!
//! Maps linter codes to their container images and release versions. The
//! table is built once at startup and shared by reference with everything
//! that resolves images.

use std::collections::BTreeMap;

pub const RELEASE_VERSION: &str = "2025.1";

pub const EAP_SUFFIX: &str = "-EAP";

pub const QDJVMC: &str = "QDJVMC";
pub const QDJVM: &str = "QDJVM";
pub const QDAND: &str = "QDAND";
pub const QDANDC: &str = "QDANDC";
pub const QDPHP: &str = "QDPHP";
pub const QDPY: &str = "QDPY";
pub const QDPYC: &str = "QDPYC";
pub const QDJS: &str = "QDJS";
pub const QDGO: &str = "QDGO";
pub const QDNET: &str = "QDNET";
pub const QDNETC: &str = "QDNETC";
pub const QDRST: &str = "QDRST";
pub const QDRUBY: &str = "QDRUBY";
pub const QDCLC: &str = "QDCLC";
pub const QDCPP: &str = "QDCPP";

/// Registry mirror that hosts the same images as the official namespace.
const MIRROR_PREFIX: &str = "registry.lintctl.dev/containers/";

/// Immutable lookup table of known linters.
#[derive(Debug, Clone)]
pub struct ProductTable {
    release_version: String,
    is_released: bool,
    images: BTreeMap<&'static str, &'static str>,
    native_codes: Vec<&'static str>,
    eap_codes: Vec<&'static str>,
}

impl ProductTable {
    /// The table shipped with this build.
    pub fn current() -> Self {
        let images = BTreeMap::from([
            (QDAND, "lintctl/linter-android:"),
            (QDANDC, "lintctl/linter-jvm-android:"),
            (QDPHP, "lintctl/linter-php:"),
            (QDJS, "lintctl/linter-js:"),
            (QDNET, "lintctl/linter-dotnet:"),
            (QDCPP, "lintctl/linter-cpp:"),
            (QDNETC, "lintctl/linter-cdnet:"),
            (QDPY, "lintctl/linter-python:"),
            (QDPYC, "lintctl/linter-python-community:"),
            (QDGO, "lintctl/linter-go:"),
            (QDJVM, "lintctl/linter-jvm:"),
            (QDJVMC, "lintctl/linter-jvm-community:"),
            (QDCLC, "lintctl/linter-clang:"),
            (QDRUBY, "lintctl/linter-ruby:"),
        ]);

        Self {
            release_version: RELEASE_VERSION.to_string(),
            is_released: true,
            images,
            native_codes: vec![QDNET, QDJVM, QDJVMC, QDGO, QDPY, QDPYC, QDJS, QDPHP],
            eap_codes: vec![QDNETC, QDCLC, QDRUBY, QDCPP],
        }
    }

    /// Mark the table as describing an unreleased (EAP) build.
    pub fn unreleased(mut self) -> Self {
        self.is_released = false;
        self
    }

    pub fn release_version(&self) -> &str {
        &self.release_version
    }

    /// Resolve a linter code to its pinned image reference.
    pub fn image(&self, code: &str) -> Option<String> {
        let repository = self.images.get(code)?;
        if !self.is_released || self.eap_codes.contains(&code) {
            Some(format!("{}{}-eap", repository, self.release_version))
        } else {
            Some(format!("{}{}", repository, self.release_version))
        }
    }

    /// All pinned images, in code order.
    pub fn all_images(&self) -> Vec<String> {
        self.images
            .keys()
            .filter_map(|code| self.image(code))
            .collect()
    }

    /// Guess the linter code from either a native IDE code or an image reference.
    pub fn guess_product_code(&self, ide: Option<&str>, linter: Option<&str>) -> Option<String> {
        if let Some(ide) = ide {
            let code = ide.strip_suffix(EAP_SUFFIX).unwrap_or(ide);
            return self
                .images
                .contains_key(code)
                .then(|| code.to_string())
                .filter(|c| self.is_native_analyzer(c));
        }

        let linter = linter?;
        let linter = linter.strip_prefix("https://").unwrap_or(linter);
        let normalized = match linter.strip_prefix(MIRROR_PREFIX) {
            Some(rest) => format!("lintctl/{}", rest),
            None => linter.to_string(),
        };

        self.images
            .iter()
            .find(|(_, repository)| normalized.starts_with(*repository))
            .map(|(code, _)| code.to_string())
    }

    /// Whether the code names an analyzer that runs natively instead of in a container.
    pub fn is_native_analyzer(&self, code: &str) -> bool {
        self.native_codes.contains(&code)
    }
}

impl Default for ProductTable {
    fn default() -> Self {
        Self::current()
    }
}
