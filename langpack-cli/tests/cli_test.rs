//! Integration tests for the local-only language commands
//!
//! These run the built `langpack` binary against a temporary content
//! directory; none of them reach the network.

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run langpack with an isolated config and content directory
fn langpack(content_dir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_langpack"))
        .arg("--config")
        .arg(content_dir.join("langpack.yaml"))
        .arg("--content-dir")
        .arg(content_dir)
        .args(args)
        .output()?;
    Ok(output)
}

fn touch(path: &Path) -> Result<()> {
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, "")?;
    Ok(())
}

/// A site with Dutch and German core packages installed
fn site_with_core_languages() -> Result<TempDir> {
    let temp = TempDir::new()?;
    let languages = temp.path().join("languages");
    for name in [
        "nl_NL.mo",
        "nl_NL.po",
        "admin-nl_NL.mo",
        "nl_NL-0123456789abcdef0123456789abcdef.json",
        "de_DE.mo",
        "de_DE.po",
    ] {
        touch(&languages.join(name))?;
    }
    Ok(temp)
}

#[test]
fn test_core_is_installed_exit_codes() -> Result<()> {
    let site = site_with_core_languages()?;

    let output = langpack(site.path(), &["core", "is-installed", "nl_NL", "en_US"])?;
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let output = langpack(site.path(), &["core", "is-installed", "nl_NL", "fr_FR"])?;
    assert_eq!(output.status.code(), Some(1));

    Ok(())
}

#[test]
fn test_plugin_is_installed() -> Result<()> {
    let temp = TempDir::new()?;
    fs::create_dir_all(temp.path().join("plugins/akismet"))?;
    touch(&temp.path().join("languages/plugins/akismet-nl_NL.mo"))?;

    let output = langpack(temp.path(), &["plugin", "is-installed", "akismet", "nl_NL"])?;
    assert!(output.status.success());

    let output = langpack(temp.path(), &["plugin", "is-installed", "akismet", "de_DE"])?;
    assert_eq!(output.status.code(), Some(1));

    let output = langpack(temp.path(), &["plugin", "is-installed", "missing", "de_DE"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    Ok(())
}

#[test]
fn test_core_uninstall_removes_only_owned_files() -> Result<()> {
    let site = site_with_core_languages()?;
    let languages = site.path().join("languages");

    let output = langpack(site.path(), &["core", "uninstall", "nl_NL"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Success: Uninstalled 1 of 1 language."), "stdout: {stdout}");

    let mut remaining: Vec<String> = fs::read_dir(&languages)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec!["de_DE.mo", "de_DE.po"]);

    Ok(())
}

#[test]
fn test_core_uninstall_not_installed_is_fatal() -> Result<()> {
    let site = site_with_core_languages()?;

    let output = langpack(site.path(), &["core", "uninstall", "fr_FR"])?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Language 'fr_FR' not installed for core."), "stderr: {stderr}");

    Ok(())
}

#[test]
fn test_uninstall_active_language_is_refused() -> Result<()> {
    let site = site_with_core_languages()?;
    let languages = site.path().join("languages");
    fs::write(languages.join("settings.yaml"), "locale: nl_NL\n")?;

    let output = langpack(site.path(), &["core", "uninstall", "de_DE", "nl_NL"])?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success());
    assert!(stderr.contains("Warning:"), "stderr: {stderr}");
    assert!(languages.join("nl_NL.mo").exists());

    Ok(())
}

#[test]
fn test_switch_language_and_back() -> Result<()> {
    let site = site_with_core_languages()?;
    let settings = site.path().join("languages/settings.yaml");

    let output = langpack(site.path(), &["switch-language", "nl_NL"])?;
    assert!(output.status.success());
    assert!(fs::read_to_string(&settings)?.contains("nl_NL"));

    let output = langpack(site.path(), &["core", "activate", "nl_NL"])?;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already active"));

    let output = langpack(site.path(), &["core", "activate", "en_US"])?;
    assert!(output.status.success());
    assert!(!fs::read_to_string(&settings)?.contains("nl_NL"));

    let output = langpack(site.path(), &["switch-language", "fr_FR"])?;
    assert!(!output.status.success());

    Ok(())
}
