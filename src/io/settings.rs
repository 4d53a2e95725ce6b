use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::ViewMode;

/// Small per-user settings remembered between sessions: the last opened
/// project and the active view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    pub last_file: Option<PathBuf>,
    #[serde(default)]
    pub view: ViewMode,
}

fn settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "WorkplanEditor")
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

impl AppSettings {
    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        let Some(path) = settings_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = std::fs::write(&path, json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_round_trips_and_defaults_to_timeline() {
        let settings = AppSettings {
            last_file: Some(PathBuf::from("/tmp/pilot.workplan.json")),
            view: ViewMode::Network,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.view, ViewMode::Network);
        assert_eq!(loaded.last_file, settings.last_file);

        // Settings written before the view was stored must still load.
        let old: AppSettings = serde_json::from_str(r#"{"last_file":null}"#).unwrap();
        assert_eq!(old.view, ViewMode::Timeline);
    }
}
