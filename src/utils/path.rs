use std::path::PathBuf;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV_VAR: &str = "MENU_SCREENS_CONFIG";

/// Get the home directory, with fallback to "/"
pub fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Get the config directory path (always ~/.config/menu-screens, regardless of OS)
pub fn get_config_dir() -> PathBuf {
    get_home_dir().join(".config").join("menu-screens")
}

/// Get the config file path
///
/// `MENU_SCREENS_CONFIG` wins when set; otherwise ~/.config/menu-screens/menu.toml
pub fn get_config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => get_config_dir().join("menu.toml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_under_home() {
        let dir = get_config_dir();
        assert!(dir.ends_with(".config/menu-screens"));
    }

    #[test]
    fn test_config_path_env_override() {
        std::env::set_var(CONFIG_ENV_VAR, "/tmp/custom/menu.toml");
        assert_eq!(get_config_path(), PathBuf::from("/tmp/custom/menu.toml"));

        // Empty values fall back to the default location
        std::env::set_var(CONFIG_ENV_VAR, "");
        assert_eq!(get_config_path(), get_config_dir().join("menu.toml"));

        std::env::remove_var(CONFIG_ENV_VAR);
        assert_eq!(get_config_path(), get_config_dir().join("menu.toml"));
    }
}
