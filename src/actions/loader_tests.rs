use super::*;
use crate::actions::Registry;
use std::path::Path;

fn write(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(file_name);
    fs::write(&path, content).unwrap();
    path
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

fn names(report: &ScanReport) -> Vec<(&str, ActionKind)> {
    report
        .descriptors
        .iter()
        .map(|d| (d.name.as_str(), d.kind))
        .collect()
}

#[test]
fn test_directory_decides_kind() {
    let root = tempfile::tempdir().unwrap();
    let tab = root.path().join("tab");
    let url = root.path().join("url");
    // Content claims the opposite kind; placement wins
    write(&tab, "close.sh", "#!/bin/sh\n# Kind: url\nexit 0\n");
    write(&url, "copy.sh", "#!/bin/sh\n# Kind: tab\nexit 0\n");

    let report = ScriptScanner::new(root.path())
        .with_probe(false)
        .scan(&[&tab, &url])
        .unwrap();

    assert_eq!(
        names(&report),
        vec![("close", ActionKind::Tab), ("copy", ActionKind::Url)]
    );
}

#[test]
fn test_kind_header_used_outside_tab_and_url_dirs() {
    let root = tempfile::tempdir().unwrap();
    let extra = root.path().join("extra");
    write(&extra, "archive.sh", "#!/bin/sh\n# Kind: url\n");
    write(&extra, "unclassified.sh", "#!/bin/sh\necho hi\n");

    let report = ScriptScanner::new(root.path())
        .with_probe(false)
        .scan(&[&extra])
        .unwrap();

    assert_eq!(names(&report), vec![("archive", ActionKind::Url)]);
}

#[test]
fn test_missing_directory_is_empty() {
    let root = tempfile::tempdir().unwrap();
    let report = ScriptScanner::new(root.path())
        .scan(&[root.path().join("nope/tab")])
        .unwrap();
    assert!(report.descriptors.is_empty());
    assert!(report.duplicates.is_empty());
}

#[test]
fn test_file_in_place_of_directory_is_skipped() {
    let root = tempfile::tempdir().unwrap();
    let not_dir = write(root.path(), "tab", "");
    let report = ScriptScanner::new(root.path()).scan(&[not_dir]).unwrap();
    assert!(report.descriptors.is_empty());
}

#[test]
fn test_hidden_images_and_plain_files_are_skipped() {
    let root = tempfile::tempdir().unwrap();
    let tab = root.path().join("tab");
    write(&tab, ".hidden.sh", "#!/bin/sh\n");
    write(&tab, "close.png", "");
    write(&tab, "README", "notes");
    write(&tab, "notes.txt", "notes");
    write(&tab, "close.sh", "#!/bin/sh\n");
    fs::create_dir_all(tab.join("subdir.sh")).unwrap();

    let report = ScriptScanner::new(root.path())
        .with_probe(false)
        .scan(&[&tab])
        .unwrap();

    assert_eq!(names(&report), vec![("close", ActionKind::Tab)]);
}

#[cfg(unix)]
#[test]
fn test_executable_without_known_extension_is_found() {
    let root = tempfile::tempdir().unwrap();
    let url = root.path().join("url");
    let bin = write(&url, "open-in-safari", "#!/bin/sh\n");
    make_executable(&bin);

    let report = ScriptScanner::new(root.path())
        .with_probe(false)
        .scan(&[&url])
        .unwrap();

    assert_eq!(names(&report), vec![("open-in-safari", ActionKind::Url)]);
}

#[test]
fn test_entries_are_in_file_name_order() {
    let root = tempfile::tempdir().unwrap();
    let tab = root.path().join("tab");
    write(&tab, "zeta.sh", "");
    write(&tab, "alpha.py", "");
    write(&tab, "mid.rb", "");

    let report = ScriptScanner::new(root.path())
        .with_probe(false)
        .scan(&[&tab])
        .unwrap();

    let order: Vec<_> = report.descriptors.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(order, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_bundled_action_wins_over_user_duplicate() {
    let root = tempfile::tempdir().unwrap();
    let bundled_tab = root.path().join("bundled/scripts/tab");
    let user_tab = root.path().join("user/scripts/tab");
    let bundled = write(&bundled_tab, "close.sh", "#!/bin/sh\n");
    let user = write(&user_tab, "close.py", "#!/usr/bin/env python3\n");

    let scanner = ScriptScanner::new(root.path().join("bundled")).with_probe(false);
    let report = scanner.scan(&[&bundled_tab, &user_tab]).unwrap();

    assert_eq!(report.descriptors.len(), 1);
    assert_eq!(report.descriptors[0].path, bundled);
    assert_eq!(
        report.duplicates,
        vec![Duplicate {
            name: "close".to_string(),
            kind: ActionKind::Tab,
            kept: bundled.clone(),
            dropped: user,
        }]
    );

    let registry = Registry::build(&scanner, &[&bundled_tab, &user_tab]).unwrap();
    assert_eq!(
        registry.by_name("close", ActionKind::Tab).unwrap().path,
        bundled
    );
}

#[test]
fn test_same_name_in_different_kinds_is_not_a_duplicate() {
    let root = tempfile::tempdir().unwrap();
    let tab = root.path().join("tab");
    let url = root.path().join("url");
    write(&tab, "copy.sh", "");
    write(&url, "copy.sh", "");

    let report = ScriptScanner::new(root.path())
        .with_probe(false)
        .scan(&[&tab, &url])
        .unwrap();

    assert_eq!(report.descriptors.len(), 2);
    assert!(report.duplicates.is_empty());
}

#[test]
fn test_blacklisted_names_are_disabled() {
    let root = tempfile::tempdir().unwrap();
    let url = root.path().join("url");
    write(&url, "pocket.sh", "");
    write(&url, "open.sh", "");

    let blacklist: crate::blacklist::Blacklist = vec!["pocket".to_string()].into_iter().collect();
    let scanner = ScriptScanner::new(root.path())
        .with_probe(false)
        .with_blacklist(blacklist);
    let report = scanner.scan(&[&url]).unwrap();

    let pocket = report.descriptors.iter().find(|d| d.name == "pocket").unwrap();
    assert!(!pocket.enabled);

    let registry = Registry::build(&scanner, &[&url]).unwrap();
    let listed: Vec<_> = registry
        .all(ActionKind::Url)
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(listed, vec!["open"]);
    assert!(matches!(
        registry.by_name("pocket", ActionKind::Url),
        Err(ActionError::UnknownAction { .. })
    ));
}

#[test]
fn test_default_title_and_icon() {
    let root = tempfile::tempdir().unwrap();
    let tab = root.path().join("scripts/tab");
    write(&tab, "close.sh", "#!/bin/sh\n");

    let report = ScriptScanner::new(root.path())
        .with_probe(false)
        .scan(&[&tab])
        .unwrap();

    let close = &report.descriptors[0];
    assert_eq!(close.title, "close");
    assert_eq!(close.icon, root.path().join("icons/tab.png"));
    assert!(close.enabled);
}

#[test]
fn test_header_and_sidecar_metadata() {
    let root = tempfile::tempdir().unwrap();
    let url = root.path().join("url");
    write(&url, "archive.sh", "#!/bin/sh\n# Title: Archive Page\n");
    let sidecar = write(&url, "archive.png", "");
    write(
        &url,
        "pocket.sh",
        "#!/bin/sh\n# Icon: icons/pocket.png\n",
    );
    let pocket_sidecar = write(&url, "pocket.gif", "");

    let report = ScriptScanner::new(root.path())
        .with_probe(false)
        .scan(&[&url])
        .unwrap();

    let archive = report.descriptors.iter().find(|d| d.name == "archive").unwrap();
    assert_eq!(archive.title, "Archive Page");
    assert_eq!(archive.icon, sidecar);

    // Header icon beats the sidecar
    let pocket = report.descriptors.iter().find(|d| d.name == "pocket").unwrap();
    assert_eq!(pocket.icon, url.join("icons/pocket.png"));
    assert_ne!(pocket.icon, pocket_sidecar);
}

#[cfg(unix)]
#[test]
fn test_describe_probe_overrides_header() {
    let root = tempfile::tempdir().unwrap();
    let url = root.path().join("url");
    write(
        &url,
        "pocket.sh",
        "#!/bin/bash\n# Title: From Header\n# Describe: true\n\
         if [ \"$1\" = --describe ]; then echo 'title: From Probe'; exit 0; fi\nexit 1\n",
    );

    let report = ScriptScanner::new(root.path()).scan(&[&url]).unwrap();
    assert_eq!(report.descriptors[0].title, "From Probe");

    let report = ScriptScanner::new(root.path())
        .with_probe(false)
        .scan(&[&url])
        .unwrap();
    assert_eq!(report.descriptors[0].title, "From Header");
}

#[cfg(unix)]
#[test]
fn test_scripts_without_describe_header_are_never_probed() {
    let root = tempfile::tempdir().unwrap();
    let url = root.path().join("url");
    let marker = root.path().join("ran");
    write(
        &url,
        "side-effect.sh",
        &format!("#!/bin/bash\ntouch '{}'\n", marker.display()),
    );

    let report = ScriptScanner::new(root.path()).scan(&[&url]).unwrap();
    assert_eq!(report.descriptors[0].title, "side-effect");
    assert!(!marker.exists());
}

#[cfg(unix)]
#[test]
fn test_blacklisted_script_is_not_probed() {
    let root = tempfile::tempdir().unwrap();
    let tab = root.path().join("tab");
    let marker = root.path().join("ran");
    write(
        &tab,
        "secret.sh",
        &format!(
            "#!/bin/bash\n# Title: Secret\n# Describe: true\ntouch '{}'\necho 'title: Probed'\n",
            marker.display()
        ),
    );

    let blacklist: crate::blacklist::Blacklist = vec!["secret".to_string()].into_iter().collect();
    let report = ScriptScanner::new(root.path())
        .with_blacklist(blacklist)
        .scan(&[&tab])
        .unwrap();

    let secret = &report.descriptors[0];
    assert!(!secret.enabled);
    assert_eq!(secret.title, "Secret");
    assert!(!marker.exists());
}

#[cfg(unix)]
#[test]
fn test_failed_probe_keeps_defaults() {
    let root = tempfile::tempdir().unwrap();
    let tab = root.path().join("tab");
    write(&tab, "broken.sh", "#!/bin/bash\n# Describe: true\nexit 4\n");

    let report = ScriptScanner::new(root.path()).scan(&[&tab]).unwrap();
    assert_eq!(report.descriptors[0].title, "broken");
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_discovery_error() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempfile::tempdir().unwrap();
    let tab = root.path().join("tab");
    write(&tab, "close.sh", "");
    fs::set_permissions(&tab, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to assert in that case
    let readable = fs::read_dir(&tab).is_ok();
    let result = ScriptScanner::new(root.path()).scan(&[&tab]);
    fs::set_permissions(&tab, fs::Permissions::from_mode(0o755)).unwrap();

    if !readable {
        assert!(matches!(result, Err(ActionError::Discovery { .. })));
    }
}
