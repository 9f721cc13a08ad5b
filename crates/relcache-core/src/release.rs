//! Release feed data and version selection.

use itertools::Itertools;
use semver::Version;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub size: u64,
    pub browser_download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Semantic version parsed from the tag, if it has one.
    pub fn version(&self) -> Option<Version> {
        parse_tag(&self.tag_name)
    }

    /// The asset considered for caching. Only the first listed asset is ever used.
    pub fn primary_asset(&self) -> Option<&Asset> {
        self.assets.first()
    }
}

/// Parses `v1.2.3`, `1.2.3-beta.1`, `v2.1` or `3` into a version.
///
/// Missing minor/patch components are treated as `0`.
pub fn parse_tag(tag: &str) -> Option<Version> {
    let tag = tag.trim();
    let tag = tag
        .strip_prefix('v')
        .or_else(|| tag.strip_prefix('V'))
        .unwrap_or(tag);

    if let Ok(version) = Version::parse(tag) {
        return Some(version);
    }

    let mut parts = tag.splitn(3, '.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    let patch = parts.next().map_or(Some(0), |p| p.parse().ok())?;

    Some(Version::new(major, minor, patch))
}

/// Picks the newest release whose major version equals `major`.
///
/// Releases with unparseable tags are never selected.
pub fn select_release(
    releases: Vec<Release>,
    major: u64,
    include_prereleases: bool,
) -> Option<(Release, Version)> {
    releases
        .into_iter()
        .map(|release| {
            let version = release.version();
            (release, version)
        })
        .sorted_by(|(_, a), (_, b)| b.cmp(a))
        .find_map(|(release, version)| {
            let version = version?;
            let compatible = version.major == major && (include_prereleases || version.pre.is_empty());
            compatible.then_some((release, version))
        })
}
