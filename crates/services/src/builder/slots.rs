//! 配图槽位表
//!
//! 按槽位下标寻址的配图状态表。更新永远按下标定点写入，
//! 不整表替换，并发结算互不覆盖。

use std::collections::BTreeMap;

use redgreen_core::types::GeneratedImage;
use serde::Serialize;

/// 配图槽位表
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SlotMap {
    slots: BTreeMap<usize, GeneratedImage>,
}

impl SlotMap {
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// 以 loading 态登记槽位（提示词确定的那一刻调用）
    pub fn init_loading(&mut self, index: usize, prompt: &str) {
        self.slots.insert(index, GeneratedImage::loading(prompt));
    }

    /// 将指定槽位结算为成功
    pub fn resolve(&mut self, index: usize, url: String) {
        if let Some(slot) = self.slots.get_mut(&index) {
            slot.resolve(url);
        }
    }

    /// 将指定槽位结算为失败
    pub fn fail(&mut self, index: usize, message: String) {
        if let Some(slot) = self.slots.get_mut(&index) {
            slot.fail(message);
        }
    }

    pub fn get(&self, index: usize) -> Option<&GeneratedImage> {
        self.slots.get(&index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 按槽位下标升序遍历
    pub fn iter(&self) -> impl Iterator<Item = (usize, &GeneratedImage)> {
        self.slots.iter().map(|(index, slot)| (*index, slot))
    }

    /// 已成功槽位数量
    pub fn resolved_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_resolved()).count()
    }

    /// 已失败槽位数量
    pub fn failed_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_failed()).count()
    }

    /// 是否所有槽位都已结算
    pub fn all_settled(&self) -> bool {
        self.slots.values().all(|slot| !slot.loading)
    }
}
