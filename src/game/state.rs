use crate::game::action::{PlayerId, Privilege};
use crate::game::meld::Meld;
use crate::tile::Tile;
use serde::Serialize;
use std::collections::BTreeMap;

/// 单个玩家对外可见的信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    /// 亮出的牌组
    pub melds: Vec<Meld>,
    /// 暗手牌张数
    pub hand_size: usize,
    /// 是否听牌（只对 3n+1 张暗手有意义）
    pub is_ting: bool,
}

/// 游戏状态快照
///
/// 每个决策点构造一次，只读地交给决策方。`viewer` 是被询问的玩家，
/// `viewer_hand` 是他自己的暗手牌，其他玩家的暗手牌不会出现在快照中。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// 座位顺序
    pub turn_order: Vec<PlayerId>,
    /// 当前轮到的座位
    pub current_seat: Option<PlayerId>,
    pub players: Vec<PlayerView>,
    /// 弃牌堆顶的牌
    pub top_tile: Option<Tile>,
    /// 出牌者
    pub discarder: Option<PlayerId>,
    /// 本轮发起者（出牌者的下家）
    pub originator: Option<PlayerId>,
    /// 每个玩家对牌顶可以行使的特权
    pub privileges: BTreeMap<PlayerId, Vec<Privilege>>,
    /// 现在就可以胡牌的玩家
    pub can_win: Vec<PlayerId>,
    pub viewer: Option<PlayerId>,
    pub viewer_hand: Vec<Tile>,
    /// 牌墙剩余张数
    pub wall_remaining: usize,
}

impl GameSnapshot {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    /// 某个玩家可以行使的特权（按优先级从高到低）
    pub fn privileges_of(&self, id: PlayerId) -> &[Privilege] {
        self.privileges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn can_win(&self, id: PlayerId) -> bool {
        self.can_win.contains(&id)
    }

    /// 被询问玩家亮出的所有牌
    pub fn viewer_revealed(&self) -> Vec<Tile> {
        self.viewer
            .and_then(|id| self.player(id))
            .map(|p| crate::game::meld::meld_tiles(&p.melds))
            .unwrap_or_default()
    }
}
