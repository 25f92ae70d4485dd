use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::PathBuf;

pub fn get_clip_tui_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("Could not find a data or home directory"))?;
    Ok(base.join("clip-tui"))
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_clip_tui_dir()?.join("config.toml"))
}

pub fn get_history_path() -> Result<PathBuf> {
    Ok(get_clip_tui_dir()?.join("history.json"))
}

pub fn get_log_dir() -> Result<PathBuf> {
    get_clip_tui_dir()
}

pub fn ensure_directories_exist() -> Result<()> {
    let dir = get_clip_tui_dir()?;

    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_clip_tui_dir() {
        let dir = get_clip_tui_dir().unwrap();
        assert!(dir.ends_with("clip-tui"));
    }

    #[test]
    fn test_get_config_path() {
        let path = get_config_path().unwrap();
        assert!(path.to_string_lossy().contains("clip-tui"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_get_history_path() {
        let path = get_history_path().unwrap();
        assert_eq!(path.parent().unwrap(), get_clip_tui_dir().unwrap());
        assert!(path.to_string_lossy().ends_with("history.json"));
    }
}
