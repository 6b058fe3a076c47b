//! Tests running the collaborators against scripted stand-ins for skopeo
//! and docker
//!
//! Each script records its argv to a log file and answers with canned
//! output, so these tests cover argument passing, output parsing and
//! exit-status handling without a registry.

#![cfg(unix)]

use revtag_core::{
    Digest, DigestInspector, ImageReference, PaddingStrategy, PlatformOverrides, RevisionEngine,
    RevisionInputs, TagLister, TagPublisher,
};
use revtag_registry::{tool_registry, BuildxPublisher, SkopeoClient};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write an executable shell script
fn write_script(path: &Path, body: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(body.as_bytes())?;

    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;

    Ok(())
}

/// Fake skopeo reporting `digest` and `tags`, logging calls to `log`
fn fake_skopeo(dir: &Path, digest: &str, tags: &str) -> (PathBuf, PathBuf) {
    let script = dir.join("skopeo");
    let log = dir.join("skopeo.log");
    let body = format!(
        r#"#!/bin/sh
echo "$@" >> "{log}"
for arg in "$@"; do
    case "$arg" in
        inspect)
            echo "{digest}"
            exit 0
            ;;
        list-tags)
            echo '{{"Repository": "unknown-image", "Tags": {tags}}}'
            exit 0
            ;;
    esac
done
exit 1
"#,
        log = log.display(),
        digest = digest,
        tags = tags,
    );
    write_script(&script, &body).unwrap();
    (script, log)
}

/// Fake tool that fails with `stderr`
fn failing_tool(dir: &Path, name: &str, stderr: &str) -> PathBuf {
    let script = dir.join(name);
    let body = format!("#!/bin/sh\necho \"{}\" >&2\nexit 1\n", stderr);
    write_script(&script, &body).unwrap();
    script
}

/// Fake docker logging calls to `log`
fn fake_docker(dir: &Path) -> (PathBuf, PathBuf) {
    let script = dir.join("docker");
    let log = dir.join("docker.log");
    let body = format!("#!/bin/sh\necho \"$@\" >> \"{}\"\nexit 0\n", log.display());
    write_script(&script, &body).unwrap();
    (script, log)
}

fn image() -> ImageReference {
    ImageReference::new("unknown-image", "1.0.0")
}

fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

#[tokio::test]
async fn test_inspect_reads_digest() {
    let dir = TempDir::new().unwrap();
    let (skopeo, log) = fake_skopeo(dir.path(), "sha256:42", "[]");

    let client = SkopeoClient::with_binary(skopeo);
    let digest = client
        .inspect_digest(&image(), &PlatformOverrides::default())
        .await
        .unwrap();

    assert_eq!(digest, Some(Digest::new("sha256:42")));
    assert_eq!(
        read_log(&log),
        vec!["inspect --format {{.Digest}} docker://unknown-image:1.0.0"]
    );
}

#[tokio::test]
async fn test_inspect_passes_platform_overrides() {
    let dir = TempDir::new().unwrap();
    let (skopeo, log) = fake_skopeo(dir.path(), "sha256:42", "[]");

    let client = SkopeoClient::with_binary(skopeo);
    client
        .inspect_digest(
            &image(),
            &PlatformOverrides::new(Some("linux"), None, Some("v6")),
        )
        .await
        .unwrap();

    assert_eq!(
        read_log(&log),
        vec!["--override-os=linux --override-variant=v6 inspect --format {{.Digest}} docker://unknown-image:1.0.0"]
    );
}

#[tokio::test]
async fn test_inspect_not_found_is_none() {
    let dir = TempDir::new().unwrap();
    let skopeo = failing_tool(
        dir.path(),
        "skopeo",
        "reading manifest 1.0.0 in docker.io/library/unknown-image: manifest unknown",
    );

    let client = SkopeoClient::with_binary(skopeo);
    let digest = client
        .inspect_digest(&image(), &PlatformOverrides::default())
        .await
        .unwrap();

    assert!(digest.is_none());
}

#[tokio::test]
async fn test_inspect_transport_failure_is_error() {
    let dir = TempDir::new().unwrap();
    let skopeo = failing_tool(dir.path(), "skopeo", "dial tcp: i/o timeout");

    let client = SkopeoClient::with_binary(skopeo);
    let err = client
        .inspect_digest(&image(), &PlatformOverrides::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("i/o timeout"));
}

#[tokio::test]
async fn test_inspect_credential_helper_failure_is_error() {
    let dir = TempDir::new().unwrap();
    let skopeo = failing_tool(
        dir.path(),
        "skopeo",
        "error getting credentials: exec: docker-credential-ecr-login: executable file not found in PATH",
    );

    let client = SkopeoClient::with_binary(skopeo);
    let err = client
        .inspect_digest(&image(), &PlatformOverrides::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("executable file not found"));
}

#[tokio::test]
async fn test_list_tags_parses_json() {
    let dir = TempDir::new().unwrap();
    let (skopeo, log) = fake_skopeo(dir.path(), "sha256:42", r#"["1.0.0", "1.0.0-001"]"#);

    let client = SkopeoClient::with_binary(skopeo);
    let tags = client.list_tags("unknown-image").await.unwrap();

    assert_eq!(tags, vec!["1.0.0", "1.0.0-001"]);
    assert_eq!(read_log(&log), vec!["list-tags docker://unknown-image"]);
}

#[tokio::test]
async fn test_list_tags_failure_is_error() {
    let dir = TempDir::new().unwrap();
    let skopeo = failing_tool(dir.path(), "skopeo", "unauthorized: authentication required");

    let client = SkopeoClient::with_binary(skopeo);
    let err = client.list_tags("unknown-image").await.unwrap_err();

    assert!(err.to_string().contains("unauthorized"));
}

#[tokio::test]
async fn test_publish_invokes_buildx() {
    let dir = TempDir::new().unwrap();
    let (docker, log) = fake_docker(dir.path());

    let publisher = BuildxPublisher::with_binary(docker);
    publisher
        .publish_tag("unknown-image", "1.0.0", "1.0.0-001")
        .await
        .unwrap();

    assert_eq!(
        read_log(&log),
        vec!["buildx imagetools create unknown-image:1.0.0 --tag unknown-image:1.0.0-001"]
    );
}

#[tokio::test]
async fn test_publish_failure_is_error() {
    let dir = TempDir::new().unwrap();
    let docker = failing_tool(dir.path(), "docker", "denied: permission_denied");

    let publisher = BuildxPublisher::with_binary(docker);
    let err = publisher
        .publish_tag("unknown-image", "1.0.0", "1.0.0-001")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("permission_denied"));
}

#[tokio::test]
async fn test_engine_with_tool_registry() {
    let dir = TempDir::new().unwrap();
    let (skopeo, skopeo_log) = fake_skopeo(dir.path(), "sha256:43", r#"["1.0.0", "1.0.0-001"]"#);
    let (docker, docker_log) = fake_docker(dir.path());

    let registry = tool_registry(Some(skopeo), Some(docker)).unwrap();
    let config = RevisionInputs {
        image: Some("unknown-image:1.0.0".to_string()),
        digest: Some("sha256:42".to_string()),
        strategy: Some("alphabetical".to_string()),
        ..Default::default()
    }
    .into_config()
    .unwrap();
    assert_eq!(config.strategy, PaddingStrategy::Alphabetical { width: 3 });

    let output = RevisionEngine::new(registry).run(&config).await.unwrap();
    assert_eq!(output.published(), 1);

    assert_eq!(
        read_log(&skopeo_log),
        vec![
            "inspect --format {{.Digest}} docker://unknown-image:1.0.0",
            "list-tags docker://unknown-image",
        ]
    );
    assert_eq!(
        read_log(&docker_log),
        vec!["buildx imagetools create unknown-image:1.0.0 --tag unknown-image:1.0.0-002"]
    );
}
