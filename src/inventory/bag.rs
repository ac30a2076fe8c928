use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::core::resources::GameConfig;
use crate::data::schema::ItemId;

#[derive(Debug, Error)]
pub enum BagError {
    #[error("bag is full ({capacity} slots), cannot add new item {id}")]
    CapacityExceeded { id: ItemId, capacity: usize },
    #[error("cannot remove {requested} of item {id}, only {held} held")]
    InsufficientQuantity { id: ItemId, requested: u32, held: u32 },
    #[error("cannot add zero of new item {id}")]
    ZeroCount { id: ItemId },
    #[error("quantity of item {id} would overflow")]
    QuantityOverflow { id: ItemId },
    #[error("saved bag has {ids} ids but {qty} quantities")]
    LengthMismatch { ids: usize, qty: usize },
    #[error("saved bag lists item {0} twice")]
    DuplicateId(ItemId),
    #[error("saved bag holds zero of item {0}")]
    EmptyStack(ItemId),
    #[error("saved bag has {entries} entries but only {capacity} slots")]
    TooManyEntries { entries: usize, capacity: usize },
    #[error("bag JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 一个格子的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagEntry {
    pub id:  ItemId,
    pub qty: u32,
}

/// 存档格式：两个等长的有序数组
#[derive(Debug, Serialize, Deserialize)]
struct BagSnapshot {
    #[serde(rename = "Ids")]
    ids: Vec<ItemId>,
    #[serde(rename = "Qty")]
    qty: Vec<u32>,
}

/// 背包的核心数据。
///
/// 第 `i` 个条目显示在第 `i` 个格子里；条目数量不超过 `capacity`，
/// 每个 id 只出现一次，数量始终为正。数量归零的条目会被移除，
/// 后面的条目依次前移。
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ItemBag {
    capacity: usize,
    entries:  Vec<BagEntry>,
}

impl ItemBag {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 已占用的格子数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.entries.len())
    }

    pub fn entries(&self) -> &[BagEntry] {
        &self.entries
    }

    /// 第 `slot` 个格子的内容，空格子返回 `None`
    pub fn get(&self, slot: usize) -> Option<&BagEntry> {
        self.entries.get(slot)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn quantity_of(&self, id: ItemId) -> u32 {
        self.position(id).map_or(0, |i| self.entries[i].qty)
    }

    /// 放入物品。已持有的物品只增加数量；未持有的物品占用一个新格子，
    /// 格子已满时失败且不改变背包。未持有的物品放入 0 个会失败，
    /// 因为不能出现数量为 0 的格子。
    pub fn add(&mut self, id: ItemId, count: u32) -> Result<(), BagError> {
        match self.position(id) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.qty = entry
                    .qty
                    .checked_add(count)
                    .ok_or(BagError::QuantityOverflow { id })?;
            }
            None => {
                if self.is_full() {
                    return Err(BagError::CapacityExceeded {
                        id,
                        capacity: self.capacity,
                    });
                }
                if count == 0 {
                    return Err(BagError::ZeroCount { id });
                }
                self.entries.push(BagEntry { id, qty: count });
            }
        }
        Ok(())
    }

    /// 取出物品。持有数量不足（包括未持有）时失败且不改变背包；
    /// 数量归零时释放格子。取出 0 个总是成功且不改变背包。
    pub fn remove(&mut self, id: ItemId, count: u32) -> Result<(), BagError> {
        if count == 0 {
            return Ok(());
        }

        let held = self.quantity_of(id);
        if held < count {
            return Err(BagError::InsufficientQuantity {
                id,
                requested: count,
                held,
            });
        }

        // held >= count > 0, so the entry exists
        if let Some(index) = self.position(id) {
            if held == count {
                self.entries.remove(index);
            } else {
                self.entries[index].qty = held - count;
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, BagError> {
        let snapshot = BagSnapshot {
            ids: self.entries.iter().map(|e| e.id).collect(),
            qty: self.entries.iter().map(|e| e.qty).collect(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// 从存档恢复，逐条检查不变量
    pub fn from_json(capacity: usize, json: &str) -> Result<Self, BagError> {
        let snapshot: BagSnapshot = serde_json::from_str(json)?;

        if snapshot.ids.len() != snapshot.qty.len() {
            return Err(BagError::LengthMismatch {
                ids: snapshot.ids.len(),
                qty: snapshot.qty.len(),
            });
        }
        if snapshot.ids.len() > capacity {
            return Err(BagError::TooManyEntries {
                entries: snapshot.ids.len(),
                capacity,
            });
        }

        let mut seen = HashSet::with_capacity(snapshot.ids.len());
        let mut entries = Vec::with_capacity(capacity);
        for (id, qty) in snapshot.ids.into_iter().zip(snapshot.qty) {
            if !seen.insert(id) {
                return Err(BagError::DuplicateId(id));
            }
            if qty == 0 {
                return Err(BagError::EmptyStack(id));
            }
            entries.push(BagEntry { id, qty });
        }

        Ok(Self { capacity, entries })
    }
}

/// 容量取自 `GameConfig::slot_number`
impl FromWorld for ItemBag {
    fn from_world(world: &mut World) -> Self {
        let slots = world
            .get_resource::<GameConfig>()
            .map_or_else(|| GameConfig::default().slot_number, |c| c.slot_number);
        Self::new(slots)
    }
}
