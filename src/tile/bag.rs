use super::tile::Tile;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 牌袋（计数多重集）：牌 -> 张数
///
/// 计数表是唯一的数据来源，排序视图总是按需生成，不跨修改缓存。
/// 读操作持有共享锁，写操作持有独占锁，同一个实例可以被多个判定并发读取。
#[derive(Debug, Default)]
pub struct TileBag {
    tiles: RwLock<HashMap<Tile, u8>>,
}

impl TileBag {
    /// 创建空牌袋
    pub fn new() -> Self {
        Self::default()
    }

    /// 从牌列表创建
    pub fn from_tiles(tiles: &[Tile]) -> Self {
        let bag = Self::new();
        bag.set_tiles(tiles);
        bag
    }

    // 计数在每次修改后都保持一致，锁中毒时直接取回内部数据
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Tile, u8>> {
        self.tiles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Tile, u8>> {
        self.tiles.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// 用给定的牌替换全部内容
    pub fn set_tiles(&self, tiles: &[Tile]) {
        let mut map = self.write();
        map.clear();
        for tile in tiles {
            let count = map.entry(*tile).or_insert(0);
            *count = count.saturating_add(1);
        }
    }

    /// 添加 `count` 张牌
    pub fn add_tile(&self, tile: Tile, count: u8) {
        if count == 0 {
            return;
        }
        let mut map = self.write();
        let entry = map.entry(tile).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// 删除 `count` 张牌
    ///
    /// # Returns
    ///
    /// - `true`：删除成功
    /// - `false`：张数不足，牌袋保持不变
    #[must_use]
    pub fn del_tile(&self, tile: Tile, count: u8) -> bool {
        let mut map = self.write();
        match map.get_mut(&tile) {
            Some(held) if *held > count => {
                *held -= count;
                true
            }
            Some(held) if *held == count => {
                map.remove(&tile);
                true
            }
            None if count == 0 => true,
            _ => false,
        }
    }

    /// 查询某张牌的数量
    pub fn tile_count(&self, tile: Tile) -> u8 {
        self.read().get(&tile).copied().unwrap_or(0)
    }

    /// 是否有某张牌
    pub fn has_tile(&self, tile: Tile) -> bool {
        self.tile_count(tile) > 0
    }

    /// 总牌数
    pub fn total_count(&self) -> usize {
        self.read().values().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// 转换为排序后的牌向量（非递减）
    pub fn to_sorted_vec(&self) -> Vec<Tile> {
        let map = self.read();
        let mut result = Vec::with_capacity(map.values().map(|&c| c as usize).sum());
        for tile in Tile::all() {
            let count = map.get(&tile).copied().unwrap_or(0);
            result.extend(std::iter::repeat(tile).take(count as usize));
        }
        result
    }

    /// 所有不同的牌（已排序）
    pub fn distinct_tiles(&self) -> SmallVec<[Tile; 14]> {
        let map = self.read();
        let mut result: SmallVec<[Tile; 14]> = map.keys().copied().collect();
        result.sort_unstable();
        result
    }

    /// 按种类索引（0-33）导出的计数表
    pub fn to_counts(&self) -> [u8; Tile::KINDS] {
        let mut counts = [0u8; Tile::KINDS];
        for (tile, &count) in self.read().iter() {
            let slot = &mut counts[tile.to_index() as usize];
            *slot = slot.saturating_add(count);
        }
        counts
    }
}

impl Clone for TileBag {
    fn clone(&self) -> Self {
        Self {
            tiles: RwLock::new(self.read().clone()),
        }
    }
}

impl PartialEq for TileBag {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        *self.read() == *other.read()
    }
}

impl Eq for TileBag {}

impl From<&[Tile]> for TileBag {
    fn from(tiles: &[Tile]) -> Self {
        Self::from_tiles(tiles)
    }
}
