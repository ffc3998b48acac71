//! Loading modules from repositories on disk

use std::fs;
use std::path::Path;

use nsload::{find_config, ErrorLevel, Loader, LoaderConfig, ManifestFactory, UrlFetcher, Value};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "lib/Digest/MD5.js",
        r#"
[[use]]
module = "Digest.Base"
import = []

[module."Digest.MD5"]
export_ok = ["md5Hex"]
export_tags = { ":all" = ["md5Hex"] }
members = { md5Hex = "d41d8cd98f00b204e9800998ecf8427e" }
"#,
    );
    write(
        dir.path(),
        "lib/Digest/Base.js",
        r#"
[module."Digest.Base"]
export = ["version"]
members = { version = "1.0" }
"#,
    );
    write(
        dir.path(),
        "js/private/Digest/Base.js",
        r#"
[module."Digest.Base"]
export = ["version"]
members = { version = "private" }
"#,
    );
    dir
}

#[test]
fn test_loads_from_disk() {
    let dir = project();
    let fetcher = UrlFetcher::new(dir.path()).unwrap();
    let mut loader = Loader::new(fetcher, ManifestFactory);

    let handle = loader.use_module("Digest.MD5", &[":all".into()]).unwrap().unwrap();

    assert_eq!(handle.name(), "Digest.MD5");
    assert_eq!(
        loader.global_scope().get("md5Hex"),
        Some(Value::from("d41d8cd98f00b204e9800998ecf8427e"))
    );
    // explicit empty import list
    assert!(!loader.global_scope().contains("version"));
    assert!(loader.is_loaded("Digest.Base"));

    let cached = loader.cache().entry("Digest/MD5.js").unwrap();
    assert_eq!(cached.url, "lib/Digest/MD5.js");
    assert_eq!(cached.checksum.len(), 64);
}

#[test]
fn test_private_repository_shadows_lib() {
    let dir = project();
    let mut loader = Loader::new(UrlFetcher::new(dir.path()).unwrap(), ManifestFactory);
    loader.add_repository("js/private");

    let base = loader.use_module("Digest.Base", &[]).unwrap().unwrap();

    assert_eq!(base.member("version"), Some(Value::from("private")));
    assert_eq!(loader.global_scope().get("version"), Some(Value::from("private")));
}

#[test]
fn test_file_url_repository() {
    let dir = project();
    let lib = url::Url::from_directory_path(dir.path().join("lib")).unwrap();
    let config = LoaderConfig {
        repositories: vec![lib.to_string()],
        error_level: ErrorLevel::Fatal,
        ..LoaderConfig::default()
    };
    let mut loader = Loader::from_config(&config, UrlFetcher::current_dir().unwrap(), ManifestFactory);

    let handle = loader.require("Digest.Base").unwrap();

    assert!(handle.is_some());
    assert!(loader.cache().entry("Digest/Base.js").unwrap().url.starts_with("file://"));
}

#[test]
fn test_missing_module_on_disk() {
    let dir = project();
    let mut loader = Loader::new(UrlFetcher::new(dir.path()).unwrap(), ManifestFactory);

    assert!(loader.require("Digest.SHA1").unwrap().is_none());
    assert_eq!(loader.last_error(), Some("File not found: lib/Digest/SHA1.js"));
}

#[test]
fn test_config_discovered_from_subdirectory() {
    let dir = project();
    write(
        dir.path(),
        "nsload.toml",
        "repositories = [\"js/private\", \"lib\"]\nerror_level = \"fatal\"\n",
    );
    let nested = dir.path().join("src/deep");
    fs::create_dir_all(&nested).unwrap();

    let found = find_config(&nested).unwrap();
    assert_eq!(found, dir.path().join("nsload.toml"));

    let config = LoaderConfig::from_file(&found).unwrap();
    let mut loader = Loader::from_config(&config, UrlFetcher::new(dir.path()).unwrap(), ManifestFactory);

    assert_eq!(loader.error_level(), ErrorLevel::Fatal);
    let base = loader.require("Digest.Base").unwrap().unwrap();
    assert_eq!(base.member("version"), Some(Value::from("private")));
    assert!(loader.require("Nope").is_err());
}

#[test]
fn test_config_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nsload.toml");
    let config = LoaderConfig {
        repositories: vec!["vendor".to_string()],
        error_level: ErrorLevel::Warn,
        extension: "jsm".to_string(),
    };

    config.to_file(&path).unwrap();

    assert_eq!(LoaderConfig::from_file(&path).unwrap(), config);
}
