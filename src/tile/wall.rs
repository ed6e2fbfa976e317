use super::tile::Tile;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};

/// 牌墙（Wall）
///
/// 存储所有 136 张牌。正常摸牌从前端（draw end）取，
/// 杠后补牌等替换摸牌从末端（dead wall）取，不影响后续正常摸牌的顺序。
///
/// 牌墙只建一次，之后单调减少；摸空时返回 `None`，由编排层决定流局。
#[repr(C)]
#[derive(Debug, Clone)]
pub struct Wall {
    /// 使用 Box<[Tile]> 减少堆分配，大小固定为 136
    tiles: Box<[Tile]>,
    /// 前端下一张的位置
    front: usize,
    /// 末端之后的位置（不含）
    back: usize,
}

impl Wall {
    /// 创建一副完整的牌墙（136 张，未洗牌）
    pub fn new() -> Self {
        let mut tiles = Vec::with_capacity(Tile::TOTAL_COUNT);
        for tile in Tile::all() {
            for _ in 0..Tile::COPIES {
                tiles.push(tile);
            }
        }
        Self::from_tiles(tiles)
    }

    /// 创建并用系统随机数洗牌
    pub fn shuffled() -> Self {
        let mut wall = Self::new();
        wall.shuffle(&mut thread_rng());
        wall
    }

    /// 创建并用固定种子洗牌（可复现）
    pub fn with_seed(seed: u64) -> Self {
        let mut wall = Self::new();
        wall.shuffle(&mut StdRng::seed_from_u64(seed));
        wall
    }

    /// 按给定顺序创建牌墙（前端在前）
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        let back = tiles.len();
        Self {
            tiles: tiles.into_boxed_slice(),
            front: 0,
            back,
        }
    }

    /// 洗牌（只洗剩余部分）
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tiles[self.front..self.back].shuffle(rng);
    }

    /// 从前端摸一张
    pub fn draw_one(&mut self) -> Option<Tile> {
        if self.is_empty() {
            return None;
        }
        let tile = self.tiles[self.front];
        self.front += 1;
        Some(tile)
    }

    /// 从前端摸 `n` 张；不足时摸光剩余的
    pub fn draw(&mut self, n: usize) -> Vec<Tile> {
        let take = n.min(self.remaining_count());
        let drawn = self.tiles[self.front..self.front + take].to_vec();
        self.front += take;
        drawn
    }

    /// 从末端（岭上）摸一张，用于吃碰杠后的补牌
    pub fn bottom_draw_one(&mut self) -> Option<Tile> {
        if self.is_empty() {
            return None;
        }
        self.back -= 1;
        Some(self.tiles[self.back])
    }

    /// 剩余牌数
    pub fn remaining_count(&self) -> usize {
        self.back - self.front
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_count() == 0
    }

    /// 已摸出的牌数（两端合计）
    pub fn drawn_count(&self) -> usize {
        self.tiles.len() - self.remaining_count()
    }

    /// 总牌数
    pub fn total_count(&self) -> usize {
        self.tiles.len()
    }
}

impl Default for Wall {
    fn default() -> Self {
        Self::new()
    }
}
