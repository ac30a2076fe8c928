use bevy::prelude::*;

use crate::data::schema::{ItemDescriptor, ItemId};

/// 对背包的一次操作。所有会读写背包数据的请求都走这一个事件，
/// 按发送顺序依次执行。
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum BagCommand {
    /// 放入物品
    Give { id: ItemId, count: u32 },
    /// 取出物品
    Take { id: ItemId, count: u32 },
    /// 查询持有数量
    Count { id: ItemId },
    Save,
    Load,
}

#[derive(Event)]
pub struct ListInventoryEvent;   // 让 CLI 请求打印背包

/// 背包数据变了，所有格子需要重新显示
#[derive(Event, Default)]
pub struct BagChanged;

/// 模拟点击第 `index` 个格子
#[derive(Event, Debug, Clone)]
pub struct ClickSlotEvent {
    pub index: usize,
}

/// 格子回调触发后发出
#[derive(Event, Debug, Clone)]
pub struct SlotClicked {
    pub slot:     Entity,
    pub item:     Option<ItemDescriptor>,
    pub quantity: Option<u32>,
}
