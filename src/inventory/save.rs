use anyhow::Context;
use std::path::Path;

use super::bag::ItemBag;

/// 把背包写入存档文件，必要时创建目录
pub fn write_save(path: &Path, bag: &ItemBag) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("could not create {}", dir.display()))?;
    }
    let json = bag.to_json()?;
    std::fs::write(path, json).with_context(|| format!("could not write {}", path.display()))
}

/// 读取存档，容量以当前配置为准
pub fn read_save(path: &Path, capacity: usize) -> anyhow::Result<ItemBag> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    ItemBag::from_json(capacity, &json)
        .with_context(|| format!("invalid save file {}", path.display()))
}
