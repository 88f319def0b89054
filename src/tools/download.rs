// src/tools/download.rs

use std::{
    fs,
    io::{Read, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use crossbeam::channel::Sender;
use serde::Deserialize;
use tracing::debug;

use crate::tools::InstallEvent;

const USER_AGENT: &str = "TweakHub/0.1";
const CHUNK_SIZE: usize = 8192;

#[derive(Debug, Deserialize)]
pub struct GitHubRelease {
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Downloads tool payloads over HTTP and resolves GitHub release assets,
/// reporting chunk-level progress over the event channel.
pub struct DownloadClient {
    http: reqwest::blocking::Client,
    tools_dir: PathBuf,
    events: Sender<InstallEvent>,
}

impl DownloadClient {
    pub fn new(tools_dir: PathBuf, events: Sender<InstallEvent>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            tools_dir,
            events,
        })
    }

    fn progress(&self, tool: &str, percent: u8, message: String) {
        let _ = self.events.send(InstallEvent::Progress {
            tool: tool.to_string(),
            percent,
            message,
        });
    }

    /// Downloads `url` into `<tools_dir>/<category>/<name>/<filename>` and
    /// returns the written path.
    pub fn download(&self, tool_name: &str, category: &str, url: &str) -> Result<PathBuf> {
        let dir = self
            .tools_dir
            .join(sanitize_file_name(category))
            .join(sanitize_file_name(tool_name));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create tool directory '{}'", dir.display()))?;
        let path = dir.join(file_name_from_url(url));

        self.progress(tool_name, 0, "Starting download...".to_string());
        let mut response = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("Request to '{}' failed", url))?
            .error_for_status()
            .with_context(|| format!("Download of '{}' was refused", url))?;

        let total = response.content_length().unwrap_or(0);
        let mut file = fs::File::create(&path)
            .with_context(|| format!("Failed to create '{}'", path.display()))?;

        let mut downloaded: u64 = 0;
        let mut buffer = [0u8; CHUNK_SIZE];
        loop {
            let read = response
                .read(&mut buffer)
                .with_context(|| format!("Download of '{}' was interrupted", url))?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read])
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            downloaded += read as u64;
            if total > 0 {
                let percent = ((downloaded * 100) / total).min(100) as u8;
                self.progress(
                    tool_name,
                    percent,
                    format!(
                        "Downloaded {} of {}",
                        format_bytes(downloaded),
                        format_bytes(total)
                    ),
                );
            }
        }

        debug!("Downloaded '{}' to '{}'", url, path.display());
        Ok(path)
    }

    /// Resolves a GitHub `/releases` page to the latest release's best asset.
    pub fn latest_release_asset(&self, releases_url: &str) -> Result<GitHubAsset> {
        let repo = github_repo_from_url(releases_url)?;
        let api_url = format!("https://api.github.com/repos/{}/releases/latest", repo);
        let release: GitHubRelease = self
            .http
            .get(&api_url)
            .send()
            .with_context(|| format!("Request to '{}' failed", api_url))?
            .error_for_status()
            .with_context(|| format!("GitHub API refused '{}'", api_url))?
            .json()
            .context("Failed to parse release payload")?;
        best_asset(&release.assets)
            .cloned()
            .with_context(|| format!("Latest release of '{}' has no assets", repo))
    }
}

pub fn is_github_release_url(url: &str) -> bool {
    url.contains("github.com") && url.contains("/releases")
}

/// Extracts `owner/repo` from a GitHub URL.
pub fn github_repo_from_url(url: &str) -> Result<String> {
    let after = url
        .split("github.com/")
        .nth(1)
        .with_context(|| format!("Not a GitHub URL: '{}'", url))?;
    let mut segments = after.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) => Ok(format!("{}/{}", owner, repo.trim_end_matches(".git"))),
        _ => bail!("Invalid GitHub URL format: '{}'", url),
    }
}

/// Picks the most installable asset: `.exe` first, then `.msi`, then `.zip`,
/// then whatever comes first.
pub fn best_asset(assets: &[GitHubAsset]) -> Option<&GitHubAsset> {
    for ext in [".exe", ".msi", ".zip"] {
        if let Some(asset) = assets
            .iter()
            .find(|a| a.name.to_ascii_lowercase().ends_with(ext))
        {
            return Some(asset);
        }
    }
    assets.first()
}

pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or("");
    if name.is_empty() || name.contains(':') || !path.contains('/') {
        "download".to_string()
    } else {
        name.to_string()
    }
}

/// Replaces characters invalid in Windows file names.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect()
}

pub fn format_bytes(bytes: u64) -> String {
    const SUFFIXES: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut index = 0;
    while value >= 1024.0 && index < SUFFIXES.len() - 1 {
        value /= 1024.0;
        index += 1;
    }
    format!("{:.1} {}", value, SUFFIXES[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> GitHubAsset {
        GitHubAsset {
            name: name.to_string(),
            browser_download_url: format!("https://example.com/{}", name),
        }
    }

    #[test]
    fn best_asset_prefers_exe_over_msi_and_zip() {
        let assets = vec![asset("tool.zip"), asset("Tool-x64.EXE"), asset("tool.msi")];
        assert_eq!(best_asset(&assets).unwrap().name, "Tool-x64.EXE");

        let no_exe = vec![asset("tool.zip"), asset("tool.msi")];
        assert_eq!(best_asset(&no_exe).unwrap().name, "tool.msi");

        let only_other = vec![asset("checksums.txt"), asset("source.tar.gz")];
        assert_eq!(best_asset(&only_other).unwrap().name, "checksums.txt");

        assert!(best_asset(&[]).is_none());
    }

    #[test]
    fn github_repo_extraction() {
        assert_eq!(
            github_repo_from_url("https://github.com/Orbmu2k/nvidiaProfileInspector/releases")
                .unwrap(),
            "Orbmu2k/nvidiaProfileInspector"
        );
        assert_eq!(
            github_repo_from_url("https://github.com/beeradmoore/dlss-swapper").unwrap(),
            "beeradmoore/dlss-swapper"
        );
        assert!(github_repo_from_url("https://example.com/owner/repo").is_err());
        assert!(github_repo_from_url("https://github.com/justowner").is_err());
    }

    #[test]
    fn release_url_detection() {
        assert!(is_github_release_url(
            "https://github.com/lostindark/DriverStoreExplorer/releases"
        ));
        assert!(!is_github_release_url("https://github.com/lostindark/DriverStoreExplorer"));
        assert!(!is_github_release_url("https://dnsjumper.net/"));
    }

    #[test]
    fn file_name_extraction_handles_queries_and_bare_hosts() {
        assert_eq!(
            file_name_from_url("https://dl5.oo-software.com/files/ooshutup10/OOSU10.exe"),
            "OOSU10.exe"
        );
        assert_eq!(
            file_name_from_url("https://example.com/setup.msi?token=abc#frag"),
            "setup.msi"
        );
        assert_eq!(file_name_from_url("https://example.com/"), "download");
    }

    #[test]
    fn byte_formatting_walks_the_suffixes() {
        assert_eq!(format_bytes(512), "512.0 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn sanitization_replaces_reserved_characters() {
        assert_eq!(
            sanitize_file_name("Driver Store Explorer (RAPR)"),
            "Driver Store Explorer (RAPR)"
        );
        assert_eq!(sanitize_file_name("a/b\\c:d*e"), "a_b_c_d_e");
    }
}
