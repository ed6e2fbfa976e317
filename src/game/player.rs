use crate::game::action::{PlayerId, Privilege};
use crate::game::agent::PlayerAgent;
use crate::game::claim::ClaimChecker;
use crate::game::event::{EventBus, TileDrawn};
use crate::game::game_engine::{GameError, GameResult};
use crate::game::meld::{meld_tiles, Meld, MeldKind};
use crate::game::pile::Pile;
use crate::game::state::GameSnapshot;
use crate::tile::{Tile, TileBag, Wall};
use log::{debug, warn};

/// 要牌的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TakeOutcome {
    /// 放弃（已记入弃牌堆的放弃集合）
    Declined,
    /// 点炮胡
    Won(Tile),
    /// 吃碰杠，新牌组在 `melds()` 末尾
    Claimed {
        privilege: Privilege,
        /// 杠后从牌墙末端补的牌（摸空时为 None）
        replacement: Option<Tile>,
    },
}

/// 玩家控制器
///
/// 持有玩家拿到的所有牌和亮出的牌组，并包装外部决策方。
/// 暗手牌 = 所有牌 - 牌组中的牌。
pub struct PlayerController {
    id: PlayerId,
    name: String,
    agent: Box<dyn PlayerAgent>,
    /// 拿到的所有牌（含已亮出的）
    tiles: TileBag,
    melds: Vec<Meld>,
}

impl PlayerController {
    pub fn new(id: PlayerId, name: impl Into<String>, agent: Box<dyn PlayerAgent>) -> Self {
        Self {
            id,
            name: name.into(),
            agent,
            tiles: TileBag::new(),
            melds: Vec::with_capacity(4),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_tiles(&mut self, tiles: &[Tile]) {
        for tile in tiles {
            self.tiles.add_tile(*tile, 1);
        }
    }

    /// 拿到的所有牌（已排序，含牌组）
    pub fn tiles(&self) -> Vec<Tile> {
        self.tiles.to_sorted_vec()
    }

    /// 暗手牌（已排序）
    ///
    /// 每张牌组中的牌只抵消一张
    pub fn hand(&self) -> Vec<Tile> {
        let mut counts = self.tiles.to_counts();
        for tile in self.revealed_tiles() {
            let count = &mut counts[tile.to_index() as usize];
            *count = count.saturating_sub(1);
        }

        let mut hand = Vec::with_capacity(14);
        for (index, count) in counts.iter().enumerate() {
            if let Some(tile) = Tile::from_index(index as u8) {
                hand.extend(std::iter::repeat(tile).take(*count as usize));
            }
        }
        hand
    }

    /// 亮出的所有牌
    pub fn revealed_tiles(&self) -> Vec<Tile> {
        meld_tiles(&self.melds)
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    /// 从牌墙前端摸一张，摸空时返回 None
    pub fn draw(&mut self, wall: &mut Wall, bus: &mut EventBus) -> Option<Tile> {
        let tile = wall.draw_one()?;
        self.receive(tile, bus);
        Some(tile)
    }

    /// 从牌墙末端补一张（杠后补牌）
    pub fn draw_back(&mut self, wall: &mut Wall, bus: &mut EventBus) -> Option<Tile> {
        let tile = wall.bottom_draw_one()?;
        self.receive(tile, bus);
        Some(tile)
    }

    fn receive(&mut self, tile: Tile, bus: &mut EventBus) {
        debug!("{} 摸牌 {}", self.name, tile);
        self.tiles.add_tile(tile, 1);
        bus.publish(&TileDrawn {
            player_name: self.name.clone(),
            tile,
        });
    }

    /// 询问是否要弃牌堆顶的牌
    ///
    /// 放弃时记入弃牌堆的放弃集合，不摸牌。接受时牌顶移入自己的牌，
    /// 组成牌组（记录出牌者）；明杠再从牌墙末端补一张。
    ///
    /// # 参数
    ///
    /// - `eligible`: 这名玩家对牌顶可以行使的特权
    ///
    /// # 错误
    ///
    /// - 决策方出错时原样返回 `GameError::Decision`
    /// - 选择的特权不在 `eligible` 中或组成的牌不合法时返回 `GameError::IllegalClaim`
    pub fn take(
        &mut self,
        snapshot: &GameSnapshot,
        wall: &mut Wall,
        pile: &mut Pile,
        bus: &mut EventBus,
        eligible: &[Privilege],
    ) -> GameResult<TakeOutcome> {
        let top = pile.top().filter(|_| pile.is_claimable()).ok_or(GameError::EmptyPile)?;
        let mut offered = self.hand();
        offered.push(top);

        let (privilege, selected) = self.agent.take(&offered, snapshot).map_err(|e| {
            warn!("{} 要牌决策失败: {}", self.name, e);
            GameError::from(e)
        })?;

        if selected.is_empty() {
            debug!("{} 放弃 {}", self.name, top);
            pile.add_decliner(self.id);
            return Ok(TakeOutcome::Declined);
        }

        let illegal = GameError::IllegalClaim {
            player: self.id,
            privilege,
        };
        if !eligible.contains(&privilege) || !Self::selection_fits(&offered, &selected, top) {
            return Err(illegal);
        }

        let meld = match privilege {
            Privilege::Win => None,
            Privilege::Quad => Some(MeldKind::Quad),
            Privilege::Triplet => Some(MeldKind::Triplet),
            Privilege::Run => Some(MeldKind::Run),
        }
        .map(|kind| Meld::new(kind, &selected, pile.last_discarder()).ok_or(illegal))
        .transpose()?;

        pile.take_top();
        self.tiles.add_tile(top, 1);

        let Some(meld) = meld else {
            return Ok(TakeOutcome::Won(top));
        };
        debug!("{} {:?} {:?}", self.name, privilege, meld.tiles());
        self.melds.push(meld);

        let replacement = match privilege {
            Privilege::Quad => self.draw_back(wall, bus),
            _ => None,
        };
        Ok(TakeOutcome::Claimed {
            privilege,
            replacement,
        })
    }

    /// 选择的牌必须包含牌顶，且都来自 `offered`
    fn selection_fits(offered: &[Tile], selected: &[Tile], top: Tile) -> bool {
        if !selected.contains(&top) {
            return false;
        }
        let bag = TileBag::from_tiles(offered);
        selected.iter().all(|tile| bag.del_tile(*tile, 1))
    }

    /// 出牌：只能打暗手牌中的牌
    ///
    /// # 错误
    ///
    /// 决策方出错时返回 `GameError::Decision`，选的牌不在暗手牌中返回 `GameError::TileNotInHand`
    pub fn play(&mut self, snapshot: &GameSnapshot) -> GameResult<Tile> {
        let hand = self.hand();
        let tile = self.agent.play(&hand, snapshot).map_err(|e| {
            warn!("{} 出牌决策失败: {}", self.name, e);
            GameError::from(e)
        })?;

        if !hand.contains(&tile) || !self.tiles.del_tile(tile, 1) {
            return Err(GameError::TileNotInHand {
                player: self.id,
                tile,
            });
        }
        debug!("{} 打出 {}", self.name, tile);
        Ok(tile)
    }

    /// 询问是否自摸
    pub fn ask_self_win(&mut self, snapshot: &GameSnapshot) -> GameResult<bool> {
        let hand = self.hand();
        self.agent.self_win(&hand, snapshot).map_err(|e| {
            warn!("{} 自摸决策失败: {}", self.name, e);
            GameError::from(e)
        })
    }

    /// 可以暗杠或补杠的牌
    pub fn quad_candidates(&self) -> Vec<Tile> {
        let hand = TileBag::from_tiles(&self.hand());
        let mut candidates = ClaimChecker::concealed_quads(&hand);
        candidates.extend(ClaimChecker::added_quads(&hand, &self.melds));
        candidates
    }

    /// 询问是否开杠，返回的牌必须在候选中
    pub fn ask_concealed_quad(&mut self, candidates: &[Tile], snapshot: &GameSnapshot) -> GameResult<Option<Tile>> {
        let choice = self.agent.concealed_quad(candidates, snapshot).map_err(|e| {
            warn!("{} 杠牌决策失败: {}", self.name, e);
            GameError::from(e)
        })?;
        match choice {
            Some(tile) if !candidates.contains(&tile) => Err(GameError::IllegalClaim {
                player: self.id,
                privilege: Privilege::Quad,
            }),
            _ => Ok(choice),
        }
    }

    /// 暗杠：暗手牌中的四张相同牌直接组成牌组，不涉及弃牌堆
    ///
    /// 暗手牌中不足四张时返回 `GameError::TileNotInHand`，不做任何修改
    pub fn dark_gang(&mut self, tile: Tile) -> GameResult<()> {
        if self.hand().iter().filter(|t| **t == tile).count() != 4 {
            return Err(GameError::TileNotInHand {
                player: self.id,
                tile,
            });
        }
        debug!("{} 暗杠 {}", self.name, tile);
        self.melds.push(Meld::concealed_quad(tile));
        Ok(())
    }

    /// 补杠：把暗手牌中的一张加到同一张牌的碰上
    ///
    /// 没有对应的碰或暗手牌中没有这张牌时返回 `GameError::TileNotInHand`
    pub fn add_gang(&mut self, tile: Tile) -> GameResult<()> {
        let not_in_hand = GameError::TileNotInHand {
            player: self.id,
            tile,
        };
        if !self.hand().contains(&tile) {
            return Err(not_in_hand);
        }
        let meld = self
            .melds
            .iter_mut()
            .find(|m| m.is_triplet_of(tile))
            .ok_or(not_in_hand)?;
        meld.upgrade_to_quad(tile);
        debug!("{} 补杠 {}", self.name, tile);
        Ok(())
    }
}

impl std::fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tiles", &self.tiles)
            .field("melds", &self.melds)
            .finish()
    }
}
