//! Integration tests for folder-pager
//!
//! These tests drive the engine over a real directory tree through
//! `LocalSource`, covering the full root → child → back workflow.

use folder_pager::config::PagerConfig;
use folder_pager::engine::{ChannelObserver, EngineHandle, NavOutcome, NavigationEngine};
use folder_pager::entry::{EntryKind, FileEntry};
use folder_pager::output;
use folder_pager::sort::SortMode;
use folder_pager::source::LocalSource;
use std::fs;
use tempfile::TempDir;

/// Helper function to create a small directory tree
fn setup_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("docs").join("api")).unwrap();
    fs::create_dir(root.join("src")).unwrap();
    fs::write(root.join("Cargo.toml"), "[package]").unwrap();
    fs::write(root.join("docs").join("intro.md"), "# intro").unwrap();
    fs::write(root.join("docs").join("api").join("engine.md"), "# engine").unwrap();
    dir
}

fn spawn(dir: &TempDir, config: &PagerConfig) -> EngineHandle {
    let source = LocalSource::new(dir.path(), config.show_hidden).unwrap();
    let (observer, _events) = ChannelObserver::new();
    NavigationEngine::spawn(source, observer, config.engine_settings())
}

async fn child_folder(handle: &EngineHandle, name: &str) -> FileEntry {
    let pages = handle.pages().await.unwrap();
    pages
        .last()
        .and_then(|leaf| leaf.folders().find(|e| e.display_name() == name))
        .cloned()
        .unwrap_or_else(|| panic!("no folder named {name}"))
}

#[tokio::test]
async fn test_browse_local_tree() {
    let dir = setup_tree();
    let handle = spawn(&dir, &PagerConfig::default());

    assert_eq!(handle.create_root().await.unwrap(), NavOutcome::Fetched);
    let root_names: Vec<String> = handle.pages().await.unwrap()[0]
        .entries
        .iter()
        .map(|e| e.display_name().to_string())
        .collect();
    // typed-name: files ("File") sort before folders ("Folder")
    assert_eq!(root_names, vec!["Cargo.toml", "docs", "src"]);

    let docs = child_folder(&handle, "docs").await;
    assert_eq!(handle.explore(docs, 1).await.unwrap(), NavOutcome::Fetched);
    let api = child_folder(&handle, "api").await;
    assert_eq!(handle.explore(api, 2).await.unwrap(), NavOutcome::Fetched);

    let pages = handle.pages().await.unwrap();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[2].entries[0].name, "engine.md");
    assert_eq!(pages[2].level, 3);
}

#[tokio::test]
async fn test_back_navigation_uses_cache() {
    let dir = setup_tree();
    let handle = spawn(&dir, &PagerConfig::default());
    handle.create_root().await.unwrap();

    let docs = child_folder(&handle, "docs").await;
    handle.explore(docs.clone(), 1).await.unwrap();

    // remove the folder on disk; the cached page still serves re-entry
    fs::remove_dir_all(dir.path().join("docs")).unwrap();

    let root = handle.pages().await.unwrap()[0].folder_token.clone();
    let root_entry = FileEntry::new(root, "", "/", EntryKind::Folder, docs.last_modified);
    assert_eq!(handle.explore(root_entry, 0).await.unwrap(), NavOutcome::Reused);
    assert_eq!(handle.explore(docs.clone(), 1).await.unwrap(), NavOutcome::Reused);
    assert_eq!(handle.pages().await.unwrap().len(), 2);

    // a forced refresh hits the filesystem and fails without touching the stack
    assert_eq!(handle.refresh(docs, 1).await.unwrap(), NavOutcome::FetchFailed);
    assert_eq!(handle.pages().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_name_sort_from_config() {
    let dir = setup_tree();
    let config = PagerConfig {
        sort_mode: SortMode::Name,
        ..PagerConfig::default()
    };
    let handle = spawn(&dir, &config);
    handle.create_root().await.unwrap();

    let names: Vec<String> = handle.pages().await.unwrap()[0]
        .entries
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(names, vec!["Cargo.toml", "docs", "src"]);

    handle.sort(SortMode::Name, true, 0).await.unwrap();
    let names: Vec<String> = handle.pages().await.unwrap()[0]
        .entries
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(names, vec!["src", "docs", "Cargo.toml"]);
}

#[tokio::test]
async fn test_stack_renders_as_json() {
    let dir = setup_tree();
    let handle = spawn(&dir, &PagerConfig::default());
    handle.create_root().await.unwrap();

    let pages = handle.pages().await.unwrap();
    let json = output::stack_json(&pages).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["entries"].as_array().map(Vec::len), Some(3));
}
