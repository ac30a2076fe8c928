use super::{bag::*, components::*, events::*, save};
use crate::core::{events::LogEvent, resources::GameConfig};
use crate::data::{ItemCatalog, schema::ItemId};
use bevy::prelude::*;

/// 按背包容量生成格子，并注册点击回调
pub fn spawn_slots(
    mut commands: Commands,
    bag: Res<ItemBag>,
    interactions: Res<SlotInteractions>,
    mut changed: EventWriter<BagChanged>,
) {
    for index in 0..bag.capacity() {
        let mut presenter = TextSlot::new();
        presenter.on_interact(interactions.callback());
        commands.spawn((
            Name::new(format!("slot {index}")),
            ItemSlot {
                index,
                presenter: Box::new(presenter),
            },
        ));
    }
    changed.write(BagChanged);
}

/// 按到达顺序执行背包操作，同一帧内先发的先执行
pub fn apply_bag_commands(
    mut ev_commands: EventReader<BagCommand>,
    mut bag: ResMut<ItemBag>,
    catalog: Res<ItemCatalog>,
    config: Res<GameConfig>,
    mut changed: EventWriter<BagChanged>,
    mut log: EventWriter<LogEvent>,
) {
    for command in ev_commands.read() {
        let (text, mutated) = match *command {
            BagCommand::Give { id, count } => give(&mut bag, &catalog, id, count),
            BagCommand::Take { id, count } => take(&mut bag, &catalog, id, count),
            BagCommand::Count { id } => (count_of(&bag, &catalog, id), false),
            BagCommand::Save => (save_to(&config, &bag), false),
            BagCommand::Load => load_from(&config, &mut bag),
        };
        log.write(LogEvent(text));
        if mutated {
            changed.write(BagChanged);
        }
    }
}

/// 物品表里没有的 id 不放入
fn give(bag: &mut ItemBag, catalog: &ItemCatalog, id: ItemId, count: u32) -> (String, bool) {
    let Some(item) = catalog.get(id) else {
        warn!("不存在物品 ID {id}");
        return (format!("不存在物品 ID {id}"), false);
    };

    match bag.add(id, count) {
        Ok(()) => {
            info!("获得 {} ×{count}", item.name);
            (format!("获得 {} ×{count}", item.name), true)
        }
        Err(err) => {
            warn!("无法获得 {}: {err}", item.name);
            (format!("无法获得 {}: {err}", item.name), false)
        }
    }
}

fn take(bag: &mut ItemBag, catalog: &ItemCatalog, id: ItemId, count: u32) -> (String, bool) {
    let Some(item) = catalog.get(id) else {
        warn!("不存在物品 ID {id}");
        return (format!("不存在物品 ID {id}"), false);
    };

    match bag.remove(id, count) {
        Ok(()) => {
            info!("取出 {} ×{count}", item.name);
            (format!("取出 {} ×{count}", item.name), true)
        }
        Err(err) => {
            warn!("无法取出 {}: {err}", item.name);
            (format!("无法取出 {}: {err}", item.name), false)
        }
    }
}

fn count_of(bag: &ItemBag, catalog: &ItemCatalog, id: ItemId) -> String {
    let name = catalog.get(id).map_or("???", |d| d.name.as_str());
    if bag.contains(id) {
        format!("{} (id={}) ×{}", name, id, bag.quantity_of(id))
    } else {
        format!("未持有 {} (id={})", name, id)
    }
}

fn save_to(config: &GameConfig, bag: &ItemBag) -> String {
    match save::write_save(&config.save_path, bag) {
        Ok(()) => {
            info!("背包已保存到 {}", config.save_path.display());
            "已保存".into()
        }
        Err(err) => {
            error!("保存失败: {err:#}");
            format!("保存失败: {err:#}")
        }
    }
}

/// 读档失败时保留当前背包
fn load_from(config: &GameConfig, bag: &mut ItemBag) -> (String, bool) {
    match save::read_save(&config.save_path, bag.capacity()) {
        Ok(loaded) => {
            *bag = loaded;
            info!("从 {} 读取背包", config.save_path.display());
            ("已读取".into(), true)
        }
        Err(err) => {
            error!("读取失败: {err:#}");
            (format!("读取失败: {err:#}"), false)
        }
    }
}

/// 让所有格子的显示和背包数据一致：第 i 个条目进第 i 格，其余为空
pub fn refresh_slots(
    mut changed: EventReader<BagChanged>,
    bag: Res<ItemBag>,
    catalog: Res<ItemCatalog>,
    mut slots: Query<&mut ItemSlot>,
) {
    if changed.is_empty() {
        return;
    }
    changed.clear();

    for mut slot in &mut slots {
        match bag.get(slot.index) {
            Some(entry) => {
                let item = catalog.get(entry.id);
                if item.is_none() {
                    warn!("格子 {} 中的物品 {} 不在物品表中", slot.index, entry.id);
                }
                slot.presenter.render(item, Some(entry.qty));
            }
            None => slot.presenter.render(None, None),
        }
    }
    debug!("刷新了 {} 个格子", bag.capacity());
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    bag: Res<ItemBag>,
    slots: Query<&ItemSlot>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    let mut sorted: Vec<_> = slots.iter().collect();
    sorted.sort_by_key(|s| s.index);

    let mut lines = vec![format!("背包 {}/{}", bag.len(), bag.capacity())];
    lines.extend(
        sorted
            .iter()
            .map(|slot| format!("[{}] {}", slot.index, slot.presenter.text())),
    );
    log.write(LogEvent(lines.join("\n")));
}

/// 点击指定序号的格子
pub fn click_slot(
    mut ev_click: EventReader<ClickSlotEvent>,
    slots: Query<(Entity, &ItemSlot)>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_click.read() {
        match slots.iter().find(|(_, slot)| slot.index == ev.index) {
            Some((entity, slot)) => slot.presenter.interact(entity),
            None => {
                log.write(LogEvent(format!("没有第 {} 格", ev.index)));
            }
        }
    }
}

/// 把回调队列中的点击转成事件
pub fn forward_slot_interactions(
    interactions: Res<SlotInteractions>,
    mut writer: EventWriter<SlotClicked>,
) {
    for click in interactions.drain() {
        writer.write(SlotClicked {
            slot: click.slot,
            item: click.item,
            quantity: click.quantity,
        });
    }
}

/// 格子被点击后显示物品详情
pub fn show_item_detail(mut ev_clicked: EventReader<SlotClicked>, mut log: EventWriter<LogEvent>) {
    for ev in ev_clicked.read() {
        let text = match (&ev.item, ev.quantity) {
            (Some(item), Some(qty)) if item.description.is_empty() => {
                format!("{} ×{}", item.name, qty)
            }
            (Some(item), Some(qty)) => {
                format!("{} ×{}\n{}", item.name, qty, item.description)
            }
            (None, Some(qty)) => format!("未知物品 ×{qty}"),
            _ => "空格子".to_string(),
        };
        log.write(LogEvent(text));
    }
}
