pub mod schema;
pub mod loader;

use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::{resources::GameConfig, states::AppState};
use schema::{ItemDescriptor, ItemId, ItemList};

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct ItemAssets {
    handle: Option<Handle<ItemList>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("item id {0} is defined more than once")]
    DuplicateId(ItemId),
}

/// id → 物品描述 的只读查询表，加载完成后以 Resource 注入
#[derive(Resource, Debug, Default, Clone)]
pub struct ItemCatalog {
    by_id: HashMap<ItemId, ItemDescriptor>,
}

impl ItemCatalog {
    pub fn from_list(list: &ItemList) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(list.items.len());
        for entry in &list.items {
            if by_id.insert(entry.id, entry.clone()).is_some() {
                return Err(CatalogError::DuplicateId(entry.id));
            }
        }
        Ok(Self { by_id })
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemDescriptor> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// 按 id 升序
    pub fn iter(&self) -> impl Iterator<Item = &ItemDescriptor> {
        let mut items: Vec<_> = self.by_id.values().collect();
        items.sort_by_key(|d| d.id);
        items.into_iter()
    }

    /// 按 id / 名称 / uuid 查找
    pub fn find(&self, token: &str) -> Option<&ItemDescriptor> {
        if let Ok(id) = token.parse::<ItemId>() {
            return self.get(id);
        }
        let t_low = token.to_lowercase();
        self.iter().find(|d| {
            d.name.eq_ignore_ascii_case(&t_low) || d.uuid().to_string() == t_low
        })
    }
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<ItemList>()
            .register_asset_loader(loader::RonItemLoader)
            .init_resource::<ItemAssets>()
            // Loading 流程
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(
                Update,
                check_loaded.run_if(in_state(AppState::Loading)),
            );
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut item_assets: ResMut<ItemAssets>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
) {
    let handle: Handle<ItemList> = asset_server.load(config.items_path.clone());
    item_assets.handle = Some(handle);
}

fn check_loaded(
    mut commands: Commands,
    mut next: ResMut<NextState<AppState>>,
    item_assets: Res<ItemAssets>,
    lists: Res<Assets<ItemList>>,
) {
    let Some(list) = item_assets.handle.as_ref().and_then(|h| lists.get(h)) else {
        return;
    };

    match ItemCatalog::from_list(list) {
        Ok(catalog) => {
            info!("✔ Items loaded: {}", catalog.len());
            commands.insert_resource(catalog);
            next.set(AppState::InGame);
        }
        Err(err) => {
            error!("物品表无效: {err}");
            next.set(AppState::Shutdown);
        }
    }
}
