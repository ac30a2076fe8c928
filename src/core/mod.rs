use bevy::prelude::*;

pub mod states;
pub mod events;
pub mod resources;

/// 配置文件位置（相对于工作目录）
pub const CONFIG_PATH: &str = "assets/config/bag.toml";

/// 核心插件：注册全局资源 / 事件 / 状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        app
            .init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .insert_resource(resources::GameConfig::load_or_default(CONFIG_PATH))
            .add_systems(OnEnter(AppState::Shutdown), events::exit_on_shutdown);
    }
}
