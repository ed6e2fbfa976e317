use crate::game::action::PlayerId;
use crate::tile::Tile;
use std::collections::BTreeSet;

/// 弃牌堆
///
/// 只追加，记录最后出牌者、本轮发起者以及放弃当前牌的玩家集合。
/// 牌顶或发起者变化时，放弃集合被清空；无人要牌时本轮关闭，牌顶不能再被要。
#[derive(Debug, Clone, Default)]
pub struct Pile {
    tiles: Vec<Tile>,
    discarder: Option<PlayerId>,
    originator: Option<PlayerId>,
    decliners: BTreeSet<PlayerId>,
    /// 牌顶是否已被吃碰杠拿走
    top_taken: bool,
    /// 本轮是否已结束（所有人都放弃）
    closed: bool,
}

impl Pile {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打出一张牌
    ///
    /// # 参数
    ///
    /// - `tile`: 打出的牌
    /// - `discarder`: 出牌者
    /// - `originator`: 本轮发起者（出牌者的下家，只有它可以吃）
    pub fn add(&mut self, tile: Tile, discarder: PlayerId, originator: PlayerId) {
        self.tiles.push(tile);
        self.discarder = Some(discarder);
        self.originator = Some(originator);
        self.decliners.clear();
        self.top_taken = false;
        self.closed = false;
    }

    /// 当前牌顶（已被拿走时为 None）
    pub fn top(&self) -> Option<Tile> {
        if self.top_taken {
            return None;
        }
        self.tiles.last().copied()
    }

    /// 牌顶是否还能被要
    pub fn is_claimable(&self) -> bool {
        !self.closed && self.top().is_some()
    }

    /// 拿走牌顶（吃碰杠胡）
    ///
    /// 本轮已关闭时返回 None
    pub fn take_top(&mut self) -> Option<Tile> {
        if self.closed {
            return None;
        }
        let tile = self.top()?;
        self.tiles.pop();
        self.top_taken = true;
        self.decliners.clear();
        Some(tile)
    }

    pub fn last_discarder(&self) -> Option<PlayerId> {
        self.discarder
    }

    pub fn originator(&self) -> Option<PlayerId> {
        self.originator
    }

    /// 记录放弃当前牌顶的玩家
    pub fn add_decliner(&mut self, player: PlayerId) {
        self.decliners.insert(player);
    }

    pub fn has_declined(&self, player: PlayerId) -> bool {
        self.decliners.contains(&player)
    }

    pub fn decliners(&self) -> &BTreeSet<PlayerId> {
        &self.decliners
    }

    /// 结束本轮：无人要牌，牌留在弃牌堆直到下一张打出
    pub fn close_cycle(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 弃牌堆中的所有牌（按打出顺序）
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
