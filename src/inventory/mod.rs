pub mod bag;
pub mod components;
pub mod events;
mod save;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use bag::*;
use components::*;
use events::*;
use systems::*;

/// 背包系统所在的集合，外部的命令来源排在它前面
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InventorySet;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<ItemBag>()
            .init_resource::<SlotInteractions>()
            .add_event::<BagCommand>()
            .add_event::<ListInventoryEvent>()
            .add_event::<BagChanged>()
            .add_event::<ClickSlotEvent>()
            .add_event::<SlotClicked>()
            .add_systems(OnEnter(AppState::InGame), spawn_slots)
            // 先改数据，再整体刷新格子，最后处理显示和点击
            .add_systems(
                Update,
                (
                    apply_bag_commands,
                    refresh_slots,
                    print_inventory,
                    click_slot,
                    forward_slot_interactions,
                    show_item_detail,
                )
                    .chain()
                    .in_set(InventorySet)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
