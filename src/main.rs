use bevy::prelude::*;

mod core;
mod data;
mod interface;
mod inventory;

use crate::core::{CorePlugin, events::LogEvent, states};
use crate::interface::debug_cli::DebugCliPlugin;
use crate::inventory::InventoryPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                visible: false,
                ..default()
            }),   // 隐藏窗口，实现“无 UI”
            ..default()
        }))
        .add_plugins(CorePlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins(InventoryPlugin)
        .add_plugins(DebugCliPlugin)
        .add_systems(Update, forward_log_event)
        .add_systems(Startup, |mut next: ResMut<NextState<states::AppState>>| {
            next.set(states::AppState::Loading);
        })
        .run();
}

fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
