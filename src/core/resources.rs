use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 背包相关配置，来自 `assets/config/bag.toml`
#[derive(Resource, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 格子数量，也就是背包容量
    pub slot_number: usize,
    /// 物品表资产路径（相对 assets/）
    pub items_path: String,
    /// 存档文件路径
    pub save_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            slot_number: 10,
            items_path: "data/items.ron".into(),
            save_path: PathBuf::from("save/bag.json"),
        }
    }
}

impl GameConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid bag config")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// 读取失败时退回默认配置
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("使用默认配置: {err:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = GameConfig::from_toml("slot_number = 4").unwrap();
        assert_eq!(config.slot_number, 4);
        assert_eq!(config.items_path, "data/items.ron");
        assert_eq!(config.save_path, PathBuf::from("save/bag.json"));
    }

    #[test]
    fn full_config_parses() {
        let config = GameConfig::from_toml(
            r#"
            slot_number = 24
            items_path = "data/other.ron"
            save_path = "/tmp/bag.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.slot_number, 24);
        assert_eq!(config.items_path, "data/other.ron");
        assert_eq!(config.save_path, PathBuf::from("/tmp/bag.json"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(GameConfig::from_toml("slot_number = \"ten\"").is_err());
    }

    #[test]
    fn unreadable_file_gives_defaults() {
        let config = GameConfig::load_or_default("does/not/exist.toml");
        assert_eq!(config, GameConfig::default());
    }
}
