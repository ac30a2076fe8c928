use bevy::prelude::*;

/// 应用的大状态
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    /// 正在加载物品表
    Loading,
    InGame,
    Shutdown,
}
