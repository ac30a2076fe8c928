use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde::Deserialize;
use uuid::Uuid;

/// 物品种类的编号，与物品种类一一对应
pub type ItemId = u32;

/// 物品的静态描述，只读
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemDescriptor {
    pub id:   ItemId,
    pub name: String,
    #[serde(default)] pub icon:        String,
    #[serde(default)] pub description: String,
}

impl ItemDescriptor {
    /// 用固定 namespace + id 生成版本 5 UUID，保证可重复得到同一值
    pub fn uuid(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, &self.id.to_be_bytes())
    }
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct ItemList {
    pub items: Vec<ItemDescriptor>,
}
