use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults() {
    let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.port, 3000);
    assert_eq!((cfg.session.width, cfg.session.height), (960, 540));
    assert_eq!(cfg.session.history_capacity, None);
    assert_eq!(cfg.theme_file, None);
}

#[test]
fn overrides() {
    let cfg = AppConfig::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("THEME_FILE", "/tmp/theme.json"),
        ("STATIC_DIR", "web"),
        ("SURFACE_WIDTH", "640"),
        ("SURFACE_HEIGHT", "480"),
        ("HISTORY_CAPACITY", "50"),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.theme_file, Some(PathBuf::from("/tmp/theme.json")));
    assert_eq!(cfg.static_dir, Some(PathBuf::from("web")));
    assert_eq!(cfg.session, SessionShape { width: 640, height: 480, history_capacity: Some(50) });
}

#[test]
fn blank_values_use_defaults() {
    let cfg = AppConfig::from_lookup(lookup(&[("PORT", " "), ("THEME_FILE", "")])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.theme_file, None);
}

#[test]
fn bad_port_is_an_error() {
    let err = AppConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
    assert_eq!(err.key, "PORT");
    assert_eq!(err.to_string(), "invalid PORT: 'http'");
}

#[test]
fn zero_surface_size_is_an_error() {
    let err = AppConfig::from_lookup(lookup(&[("SURFACE_HEIGHT", "0")])).unwrap_err();
    assert_eq!(err.key, "SURFACE_HEIGHT");
}
