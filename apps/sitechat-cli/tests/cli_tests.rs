use sitechat_cli::{format_hits, load_settings, preview};
use sitechat_core::RetrievedChunk;

#[test]
fn preview_cuts_on_char_boundaries() {
    assert_eq!(preview("short", 10), "short");
    assert_eq!(preview("héllo wörld", 5), "héllo...");
}

#[test]
fn hits_are_numbered_by_rank() {
    let hits = vec![
        RetrievedChunk { position: 4, text: "about us".to_string(), score: 0.125 },
        RetrievedChunk { position: 1, text: "contact".to_string(), score: 0.5 },
    ];
    let out = format_hits(&hits, 80);
    assert_eq!(
        out,
        "  1. distance=0.1250  chunk=4\n     about us\n  2. distance=0.5000  chunk=1\n     contact"
    );
}

#[test]
fn settings_paths_resolve_against_config_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[store]\npath = \"out/store.json\"\n").unwrap();
    let settings = load_settings(dir.path()).unwrap();
    assert_eq!(settings.store.path, dir.path().join("out/store.json"));
}
