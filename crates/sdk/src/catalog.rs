//! The framework versions a project can run against, one per API level.

use crate::error::{Result, SdkError};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const GROUP_ID: &str = "org.robolectric";
pub const ARTIFACT_ID: &str = "android-all";

/// One framework release, published as a jar plus a `-sources.jar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AndroidSdk {
    pub api_level: u32,
    pub sdk_version: String,
    pub build: String,
}

impl AndroidSdk {
    pub fn new(api_level: u32, sdk_version: impl Into<String>, build: impl Into<String>) -> Self {
        Self {
            api_level,
            sdk_version: sdk_version.into(),
            build: build.into(),
        }
    }

    /// `4.4_r1-robolectric-1`
    pub fn version(&self) -> String {
        format!("{}-robolectric-{}", self.sdk_version, self.build)
    }

    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", GROUP_ID, ARTIFACT_ID, self.version())
    }

    /// `<repo>/org/robolectric/android-all/<version>/android-all-<version><suffix>`
    fn artifact_file(&self, m2_repository: &Path, suffix: &str) -> PathBuf {
        let version = self.version();
        let mut path = m2_repository.to_path_buf();
        path.extend(GROUP_ID.split('.'));
        path.push(ARTIFACT_ID);
        path.push(&version);
        // Versions contain dots; `with_extension` would truncate them.
        path.push(format!("{}-{}{}", ARTIFACT_ID, version, suffix));
        path
    }

    pub fn jar_file(&self, m2_repository: &Path) -> PathBuf {
        self.artifact_file(m2_repository, ".jar")
    }

    pub fn source_jar_file(&self, m2_repository: &Path) -> PathBuf {
        self.artifact_file(m2_repository, "-sources.jar")
    }

    /// Both archives are present.
    pub fn exists(&self, m2_repository: &Path) -> bool {
        self.jar_file(m2_repository).is_file() && self.source_jar_file(m2_repository).is_file()
    }
}

/// Known SDKs and where their archives live.
#[derive(Debug, Clone)]
pub struct SdkCatalog {
    sdks: Vec<AndroidSdk>,
    m2_repository: PathBuf,
}

impl SdkCatalog {
    /// The releases with published archives, API 16 through 24.
    pub fn builtin(m2_repository: impl Into<PathBuf>) -> Self {
        let sdks = [
            (16, "4.1.2_r1", "0"),
            (17, "4.2.2_r1.2", "0"),
            (18, "4.3_r2", "0"),
            (19, "4.4_r1", "1"),
            (21, "5.0.0_r2", "1"),
            (22, "5.1.1_r9", "1"),
            (23, "6.0.0_r1", "0"),
            (24, "7.0.0_r1", "0"),
        ]
        .into_iter()
        .map(|(level, version, build)| AndroidSdk::new(level, version, build))
        .collect();
        Self::new(sdks, m2_repository)
    }

    pub fn new(sdks: Vec<AndroidSdk>, m2_repository: impl Into<PathBuf>) -> Self {
        Self {
            sdks,
            m2_repository: m2_repository.into(),
        }
    }

    pub fn m2_repository(&self) -> &Path {
        &self.m2_repository
    }

    pub fn sdks(&self) -> &[AndroidSdk] {
        &self.sdks
    }

    pub fn by_api_level(&self, api_level: u32) -> Option<&AndroidSdk> {
        self.sdks.iter().find(|s| s.api_level == api_level)
    }

    pub fn require(&self, api_level: u32) -> Result<&AndroidSdk> {
        self.by_api_level(api_level)
            .ok_or(SdkError::UnknownApiLevel(api_level))
    }

    /// Accepts either the release (`4.4_r1`) or the full artifact version
    /// (`4.4_r1-robolectric-1`).
    pub fn by_version(&self, version: &str) -> Option<&AndroidSdk> {
        self.sdks
            .iter()
            .find(|s| s.sdk_version == version || s.version() == version)
    }

    pub fn exists(&self, sdk: &AndroidSdk) -> bool {
        sdk.exists(&self.m2_repository)
    }

    /// SDKs whose archives are both downloaded.
    pub fn installed(&self) -> impl Iterator<Item = &AndroidSdk> + '_ {
        self.sdks.iter().filter(|s| self.exists(s))
    }
}
