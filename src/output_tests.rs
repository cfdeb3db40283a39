use super::*;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use regex::Regex;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(14, 5, 7)
        .unwrap()
}

fn temp_root(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    env::temp_dir().join(format!("reconmux-{}-{}", tag, nanos))
}

#[test]
fn test_auto_mode_layout() {
    let root = temp_root("auto");
    let resolver = OutputResolver::new(&root);

    let loc = resolver
        .resolve_at("gobuster", "10.10.10.10", None, None, fixed_time())
        .unwrap();

    assert_eq!(loc.directory, root.join("10_10_10_10_2024-03-09_14-05-07"));
    assert_eq!(loc.filename, "gobuster_10.10.10.10");
    assert_eq!(loc.full_path, loc.directory.join("gobuster_10.10.10.10.txt"));
    assert!(loc.directory.is_dir());

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_auto_folder_name_shape() {
    let re = Regex::new(r"^[A-Za-z0-9_\-]+_\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}$").unwrap();
    let name = auto_folder_name("scanme.nmap.org", fixed_time());
    assert!(re.is_match(&name), "unexpected folder name {}", name);
    assert!(!name.contains('.'));
}

#[test]
fn test_auto_mode_is_deterministic_for_fixed_time() {
    let root = temp_root("determinism");
    let resolver = OutputResolver::new(&root);

    let first = resolver
        .resolve_at("nmap", "example.com", None, None, fixed_time())
        .unwrap();
    let second = resolver
        .resolve_at("nmap", "example.com", None, None, fixed_time())
        .unwrap();

    assert_eq!(first, second);
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_manual_mode_creates_directory() {
    let root = temp_root("manual");
    let dir = root.join("out");
    let resolver = OutputResolver::default();

    let loc = resolver
        .resolve_at("ffuf", "10.0.0.1", Some("myresults"), Some(dir.to_str().unwrap()), fixed_time())
        .unwrap();

    assert_eq!(loc.full_path, dir.join("myresults.txt"));
    assert!(dir.is_dir());

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_manual_directory_without_filename_uses_tool_default() {
    let root = temp_root("nofile");
    let resolver = OutputResolver::default();

    let loc = resolver
        .resolve_at("dirb", "10.0.0.1", None, Some(root.to_str().unwrap()), fixed_time())
        .unwrap();

    assert_eq!(loc.filename, "dirb_output");
    assert_eq!(loc.full_path, root.join("dirb_output.txt"));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_manual_filename_without_directory_uses_working_dir() {
    let resolver = OutputResolver::default();
    let loc = resolver
        .resolve_at("whois", "example.com", Some("whois_notes"), None, fixed_time())
        .unwrap();

    assert_eq!(loc.directory, PathBuf::from("."));
    assert_eq!(loc.full_path, PathBuf::from("./whois_notes.txt"));
}

#[test]
fn test_extension_is_always_appended() {
    let root = temp_root("ext");
    let resolver = OutputResolver::default();

    let loc = resolver
        .resolve_at("nmap", "h", Some("results.txt"), Some(root.to_str().unwrap()), fixed_time())
        .unwrap();

    assert_eq!(loc.full_path, root.join("results.txt.txt"));
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_blank_target_still_gets_timestamp_folder() {
    let root = temp_root("blank");
    let resolver = OutputResolver::new(&root);

    let loc = resolver
        .resolve_at("gobuster", "", None, None, fixed_time())
        .unwrap();

    assert_eq!(loc.directory, root.join("_2024-03-09_14-05-07"));
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_file_in_the_way_is_io_error() {
    let root = temp_root("blocked");
    fs::create_dir_all(&root).unwrap();
    let blocker = root.join("taken");
    fs::write(&blocker, "x").unwrap();

    let resolver = OutputResolver::default();
    let result = resolver.resolve_at("nmap", "h", Some("f"), Some(blocker.to_str().unwrap()), fixed_time());

    match result {
        Err(LauncherError::Io { path, .. }) => assert_eq!(path, blocker),
        other => panic!("expected Io error, got {:?}", other),
    }
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_filename_never_escapes_directory() {
    let root = temp_root("slash");
    let resolver = OutputResolver::new(&root);

    let loc = resolver
        .resolve_at("netdiscover", "192.168.1.0/24", None, None, fixed_time())
        .unwrap();

    assert_eq!(loc.filename, "netdiscover_192.168.1.0_24");
    assert_eq!(loc.directory, root.join("192_168_1_0_24_2024-03-09_14-05-07"));
    assert_eq!(loc.full_path.parent(), Some(loc.directory.as_path()));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_sanitizers() {
    assert_eq!(sanitize_folder("a.b/c"), "a_b_c");
    assert_eq!(sanitize_filename("a.b/c"), "a.b_c");
}
