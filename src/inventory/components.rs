use bevy::prelude::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::data::schema::ItemDescriptor;

/// 格子被点击时的回调：(物品, 数量, 格子实体)
pub type SlotCallback =
    Box<dyn Fn(Option<&ItemDescriptor>, Option<u32>, Entity) + Send + Sync>;

/// 格子的显示层。背包只负责数据，具体怎么画由实现者决定。
pub trait SlotPresenter: Send + Sync + 'static {
    /// 显示物品和数量；`quantity == None` 表示空格子
    fn render(&mut self, item: Option<&ItemDescriptor>, quantity: Option<u32>);

    /// 注册点击回调，覆盖之前的回调
    fn on_interact(&mut self, callback: SlotCallback);

    /// 玩家点击了这个格子
    fn interact(&self, slot: Entity);

    /// 当前显示的文字
    fn text(&self) -> &str;
}

/// 一个格子（挂在实体上），`index` 对应背包中的条目序号
#[derive(Component)]
pub struct ItemSlot {
    pub index:     usize,
    pub presenter: Box<dyn SlotPresenter>,
}

/// 终端用的文字格子
#[derive(Default)]
pub struct TextSlot {
    item:     Option<ItemDescriptor>,
    quantity: Option<u32>,
    text:     String,
    callback: Option<SlotCallback>,
}

pub const EMPTY_SLOT_TEXT: &str = "(empty)";

impl TextSlot {
    pub fn new() -> Self {
        Self {
            text: EMPTY_SLOT_TEXT.into(),
            ..default()
        }
    }
}

impl SlotPresenter for TextSlot {
    fn render(&mut self, item: Option<&ItemDescriptor>, quantity: Option<u32>) {
        self.item = item.cloned();
        self.quantity = quantity;
        self.text = match (item, quantity) {
            (Some(item), Some(qty)) => format!("{} ×{} (id={})", item.name, qty, item.id),
            // 物品表里查不到的 id
            (None, Some(qty)) => format!("??? ×{qty}"),
            (_, None) => EMPTY_SLOT_TEXT.into(),
        };
    }

    fn on_interact(&mut self, callback: SlotCallback) {
        self.callback = Some(callback);
    }

    fn interact(&self, slot: Entity) {
        if let Some(callback) = &self.callback {
            callback(self.item.as_ref(), self.quantity, slot);
        }
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// 一次格子点击
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInteraction {
    pub slot:     Entity,
    pub item:     Option<ItemDescriptor>,
    pub quantity: Option<u32>,
}

/// 回调写入、系统每帧取出的点击队列
#[derive(Resource, Clone, Default)]
pub struct SlotInteractions(Arc<Mutex<VecDeque<SlotInteraction>>>);

impl SlotInteractions {
    /// 生成一个把点击推入队列的回调
    pub fn callback(&self) -> SlotCallback {
        let queue = self.0.clone();
        Box::new(move |item, quantity, slot| {
            // 队列里只有已完成的点击，持锁方 panic 后数据仍然可用
            let mut queue = queue.lock().unwrap_or_else(PoisonError::into_inner);
            queue.push_back(SlotInteraction {
                slot,
                item: item.cloned(),
                quantity,
            });
        })
    }

    pub fn drain(&self) -> Vec<SlotInteraction> {
        let mut queue = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apple() -> ItemDescriptor {
        ItemDescriptor {
            id: 1,
            name: "Apple".into(),
            icon: String::new(),
            description: "Crunchy.".into(),
        }
    }

    #[test]
    fn renders_item_and_empty_state() {
        let mut slot = TextSlot::new();
        assert_eq!(slot.text(), EMPTY_SLOT_TEXT);

        slot.render(Some(&apple()), Some(3));
        assert_eq!(slot.text(), "Apple ×3 (id=1)");

        slot.render(None, Some(2));
        assert_eq!(slot.text(), "??? ×2");

        slot.render(None, None);
        assert_eq!(slot.text(), EMPTY_SLOT_TEXT);
    }

    #[test]
    fn interaction_reports_current_contents() {
        let interactions = SlotInteractions::default();
        let mut slot = TextSlot::new();
        slot.on_interact(interactions.callback());
        slot.render(Some(&apple()), Some(3));

        let entity = Entity::from_raw(7);
        slot.interact(entity);
        slot.render(None, None);
        slot.interact(entity);

        let clicks = interactions.drain();
        assert_eq!(
            clicks,
            vec![
                SlotInteraction { slot: entity, item: Some(apple()), quantity: Some(3) },
                SlotInteraction { slot: entity, item: None, quantity: None },
            ]
        );
        assert!(interactions.drain().is_empty());
    }

    #[test]
    fn interact_without_callback_is_a_no_op() {
        let slot = TextSlot::new();
        slot.interact(Entity::from_raw(1));
    }

    #[test]
    fn clicks_survive_a_poisoned_queue() {
        let interactions = SlotInteractions::default();
        let shared = interactions.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.0.lock().unwrap();
            panic!("holder panicked");
        })
        .join();
        assert!(interactions.0.is_poisoned());

        let mut slot = TextSlot::new();
        slot.on_interact(interactions.callback());
        slot.render(Some(&apple()), Some(2));
        slot.interact(Entity::from_raw(3));

        let clicks = interactions.drain();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].quantity, Some(2));
    }
}
