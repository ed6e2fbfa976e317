use crate::game::action::{PlayerId, Privilege};
use crate::game::agent::{DecisionError, PlayerAgent};
use crate::game::claim::ClaimChecker;
use crate::game::config::GameConfig;
use crate::game::constants::{NUM_PLAYERS, SEAT_NAMES};
use crate::game::event::{EventBus, TileDrawnListener};
use crate::game::pile::Pile;
use crate::game::player::{PlayerController, TakeOutcome};
use crate::game::ready::ReadyChecker;
use crate::game::state::{GameSnapshot, PlayerView};
use crate::game::turn::TurnIterator;
use crate::tile::{Tile, TileBag, Wall, WinChecker};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;

/// 游戏引擎错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 无效的玩家 ID
    InvalidPlayer(PlayerId),
    /// 玩家数量不是 4
    InvalidPlayerCount(usize),
    /// 决策方出错（原样传播，不重试）
    Decision(DecisionError),
    /// 决策方选择了不能行使的特权或不合法的牌组
    IllegalClaim { player: PlayerId, privilege: Privilege },
    /// 要打出或开杠的牌不在暗手牌中
    TileNotInHand { player: PlayerId, tile: Tile },
    /// 弃牌堆没有可以要的牌
    EmptyPile,
    /// 游戏已结束
    GameOver,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidPlayer(id) => write!(f, "invalid player id {}", id),
            GameError::InvalidPlayerCount(n) => write!(f, "expected {} players, got {}", NUM_PLAYERS, n),
            GameError::Decision(e) => write!(f, "{}", e),
            GameError::IllegalClaim { player, privilege } => {
                write!(f, "player {} cannot claim {:?}", player, privilege)
            }
            GameError::TileNotInHand { player, tile } => {
                write!(f, "player {} does not hold {}", player, tile)
            }
            GameError::EmptyPile => write!(f, "discard pile has no claimable tile"),
            GameError::GameOver => write!(f, "game is over"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Decision(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecisionError> for GameError {
    fn from(e: DecisionError) -> Self {
        GameError::Decision(e)
    }
}

pub type GameResult<T> = Result<T, GameError>;

/// 一局的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// 胡牌；`discarder` 为 None 表示自摸
    Won {
        winner: PlayerId,
        discarder: Option<PlayerId>,
        tile: Tile,
    },
    /// 流局（牌墙摸空）
    Exhausted,
}

/// 单步结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Won {
        winner: PlayerId,
        discarder: Option<PlayerId>,
        tile: Tile,
    },
    /// 有人吃碰杠，由他接着出牌
    Claimed {
        player: PlayerId,
        privilege: Privilege,
        tile: Tile,
    },
    /// 无人要牌，轮到下家
    Discarded { player: PlayerId, tile: Tile },
    WallExhausted,
}

/// 游戏引擎
///
/// 组合牌墙、弃牌堆、座位和玩家，驱动出牌与吃碰杠胡的轮转。
/// 玩家按 ID 存放，弃牌堆和座位只记录 ID。
pub struct GameEngine {
    config: GameConfig,
    players: Vec<PlayerController>,
    wall: Wall,
    pile: Pile,
    turns: TurnIterator,
    bus: EventBus,
    checker: WinChecker,
    dealt: bool,
    outcome: Option<GameOutcome>,
}

impl GameEngine {
    /// 创建新的游戏引擎（按配置洗牌，尚未发牌）
    pub fn new(config: GameConfig, agents: Vec<Box<dyn PlayerAgent>>) -> GameResult<Self> {
        let wall = match config.seed {
            Some(seed) => Wall::with_seed(seed),
            None => Wall::shuffled(),
        };
        Self::with_wall(config, agents, wall)
    }

    /// 使用给定的牌墙创建
    pub fn with_wall(config: GameConfig, agents: Vec<Box<dyn PlayerAgent>>, wall: Wall) -> GameResult<Self> {
        if agents.len() != NUM_PLAYERS as usize {
            return Err(GameError::InvalidPlayerCount(agents.len()));
        }
        let players: Vec<PlayerController> = agents
            .into_iter()
            .zip(SEAT_NAMES)
            .enumerate()
            .map(|(id, (agent, name))| PlayerController::new(id as PlayerId, name, agent))
            .collect();
        let turns = TurnIterator::new(players.iter().map(PlayerController::id).collect());

        Ok(Self {
            checker: WinChecker::with_rules(config.rules),
            config,
            players,
            wall,
            pile: Pile::new(),
            turns,
            bus: EventBus::new(),
            dealt: false,
            outcome: None,
        })
    }

    /// 订阅摸牌事件
    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: TileDrawnListener + 'static,
    {
        self.bus.subscribe(listener);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    pub fn players(&self) -> &[PlayerController] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> GameResult<&PlayerController> {
        self.players.get(id as usize).ok_or(GameError::InvalidPlayer(id))
    }

    /// 当前轮到的座位
    pub fn current_player(&self) -> Option<PlayerId> {
        self.turns.current()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// 发牌：每人从牌墙前端摸 `deal_size` 张
    ///
    /// 已经发过牌时不做任何事，返回 false
    pub fn deal_starting_tiles(&mut self) -> bool {
        if self.dealt {
            return false;
        }
        for player in &mut self.players {
            let tiles = self.wall.draw(self.config.deal_size);
            player.add_tiles(&tiles);
        }
        self.dealt = true;
        debug!("发牌完成，牌墙剩余 {} 张", self.wall.remaining_count());
        true
    }

    /// 每个玩家对弃牌堆顶的牌可以行使的特权
    ///
    /// 不包括出牌者本人和已经放弃的玩家；只有发起者（出牌者的下家）可以吃。
    /// 本轮无人要牌而关闭后返回空表
    pub fn privileges(&mut self) -> BTreeMap<PlayerId, Vec<Privilege>> {
        let mut map = BTreeMap::new();
        if !self.pile.is_claimable() {
            return map;
        }
        let (Some(top), Some(discarder)) = (self.pile.top(), self.pile.last_discarder()) else {
            return map;
        };
        let originator = self.pile.originator();

        for id in self.turns.others(discarder) {
            if self.pile.has_declined(id) {
                continue;
            }
            let Some(player) = self.players.get(id as usize) else {
                continue;
            };
            let hand = TileBag::from_tiles(&player.hand());
            let revealed = player.revealed_tiles();
            let privileges =
                ClaimChecker::privileges(&mut self.checker, &hand, &revealed, top, originator == Some(id));
            if !privileges.is_empty() {
                map.insert(id, privileges.to_vec());
            }
        }
        map
    }

    /// 构造给 `viewer` 看的状态快照
    pub fn snapshot(&mut self, viewer: Option<PlayerId>) -> GameSnapshot {
        let privileges = self.privileges();
        let mut can_win: Vec<PlayerId> = privileges
            .iter()
            .filter(|(_, list)| list.contains(&Privilege::Win))
            .map(|(id, _)| *id)
            .collect();

        let mut players = Vec::with_capacity(self.players.len());
        for player in &self.players {
            let hand = player.hand();
            let revealed = player.revealed_tiles();
            let is_ting = ReadyChecker::can_ting_with(&mut self.checker, &hand, &revealed).0;

            // 当前座位摸牌后可以自摸
            if Some(player.id()) == self.turns.current()
                && hand.len() % 3 == 2
                && self.checker.can_win(&hand, &revealed)
                && !can_win.contains(&player.id())
            {
                can_win.push(player.id());
            }

            players.push(PlayerView {
                id: player.id(),
                name: player.name().to_string(),
                melds: player.melds().to_vec(),
                hand_size: hand.len(),
                is_ting,
            });
        }
        can_win.sort_unstable();

        GameSnapshot {
            turn_order: self.turns.order().to_vec(),
            current_seat: self.turns.current(),
            players,
            top_tile: self.pile.top(),
            discarder: self.pile.last_discarder(),
            originator: self.pile.originator(),
            privileges,
            can_win,
            viewer,
            viewer_hand: viewer
                .and_then(|id| self.players.get(id as usize))
                .map(PlayerController::hand)
                .unwrap_or_default(),
            wall_remaining: self.wall.remaining_count(),
        }
    }

    /// 执行当前座位的一个回合
    ///
    /// 摸牌（暗手为 3n+1 张时）、询问自摸和开杠、出牌，再按优先级处理其他玩家的要牌。
    pub fn step(&mut self) -> GameResult<StepOutcome> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        self.deal_starting_tiles();

        let seat = self.turns.current().ok_or(GameError::InvalidPlayer(0))?;
        let index = seat as usize;

        let mut drawn = None;
        if self.players[index].hand().len() % 3 == 1 {
            match self.players[index].draw(&mut self.wall, &mut self.bus) {
                Some(tile) => drawn = Some(tile),
                None => return Ok(self.exhaust()),
            }
        }

        loop {
            if let Some(tile) = drawn {
                if self.self_win_ready(index) {
                    let snapshot = self.snapshot(Some(seat));
                    if self.players[index].ask_self_win(&snapshot)? {
                        return Ok(self.finish_win(seat, None, tile));
                    }
                }
            }

            let candidates = self.players[index].quad_candidates();
            if candidates.is_empty() {
                break;
            }
            let snapshot = self.snapshot(Some(seat));
            let Some(tile) = self.players[index].ask_concealed_quad(&candidates, &snapshot)? else {
                break;
            };

            let player = &mut self.players[index];
            if player.hand().iter().filter(|t| **t == tile).count() == 4 {
                player.dark_gang(tile)?;
            } else {
                player.add_gang(tile)?;
            }
            match player.draw_back(&mut self.wall, &mut self.bus) {
                Some(replacement) => drawn = Some(replacement),
                None => return Ok(self.exhaust()),
            }
        }

        let snapshot = self.snapshot(Some(seat));
        let tile = self.players[index].play(&snapshot)?;
        self.resolve_discard(seat, tile)
    }

    /// 运行到胡牌或流局
    pub fn run(&mut self) -> GameResult<GameOutcome> {
        loop {
            match self.step()? {
                StepOutcome::Won {
                    winner,
                    discarder,
                    tile,
                } => {
                    return Ok(GameOutcome::Won {
                        winner,
                        discarder,
                        tile,
                    })
                }
                StepOutcome::WallExhausted => return Ok(GameOutcome::Exhausted),
                StepOutcome::Claimed { .. } | StepOutcome::Discarded { .. } => {}
            }
        }
    }

    fn self_win_ready(&mut self, index: usize) -> bool {
        let player = &self.players[index];
        let hand = player.hand();
        hand.len() % 3 == 2 && self.checker.can_win(&hand, &player.revealed_tiles())
    }

    /// 处理一张打出的牌
    ///
    /// 按最高特权（胡 > 杠 > 碰 > 吃）排序询问，同级按离出牌者的距离；
    /// 第一个接受的玩家结束本轮。无人接受时轮到出牌者的下家。
    fn resolve_discard(&mut self, discarder: PlayerId, tile: Tile) -> GameResult<StepOutcome> {
        let originator = self
            .turns
            .downstream(discarder)
            .ok_or(GameError::InvalidPlayer(discarder))?;
        self.pile.add(tile, discarder, originator);

        // 从下家起按座位顺序排列，再按最高特权稳定排序
        let mut privileges = self.privileges();
        let mut order: Vec<(PlayerId, Vec<Privilege>)> = self
            .turns
            .others(discarder)
            .filter_map(|id| privileges.remove(&id).map(|list| (id, list)))
            .collect();
        order.sort_by_key(|(_, list)| list.first().copied());

        for (id, eligible) in order {
            if self.pile.has_declined(id) {
                continue;
            }
            debug!("询问玩家 {} 是否要 {}: {:?}", id, tile, eligible);
            let snapshot = self.snapshot(Some(id));
            let player = &mut self.players[id as usize];
            match player.take(&snapshot, &mut self.wall, &mut self.pile, &mut self.bus, &eligible)? {
                TakeOutcome::Declined => continue,
                TakeOutcome::Won(tile) => return Ok(self.finish_win(id, Some(discarder), tile)),
                TakeOutcome::Claimed { privilege, .. } => {
                    self.turns.set_current(id);
                    return Ok(StepOutcome::Claimed {
                        player: id,
                        privilege,
                        tile,
                    });
                }
            }
        }

        debug!("{} 名玩家放弃 {}，本轮结束", self.pile.decliners().len(), tile);
        self.pile.close_cycle();
        self.turns.set_current(discarder);
        self.turns.advance();
        Ok(StepOutcome::Discarded {
            player: discarder,
            tile,
        })
    }

    fn finish_win(&mut self, winner: PlayerId, discarder: Option<PlayerId>, tile: Tile) -> StepOutcome {
        match discarder {
            Some(from) => info!("玩家 {} 胡 {}（玩家 {} 点炮）", winner, tile, from),
            None => info!("玩家 {} 自摸 {}", winner, tile),
        }
        self.outcome = Some(GameOutcome::Won {
            winner,
            discarder,
            tile,
        });
        StepOutcome::Won {
            winner,
            discarder,
            tile,
        }
    }

    fn exhaust(&mut self) -> StepOutcome {
        info!("牌墙摸空，流局");
        self.outcome = Some(GameOutcome::Exhausted);
        StepOutcome::WallExhausted
    }
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("players", &self.players)
            .field("wall_remaining", &self.wall.remaining_count())
            .field("pile", &self.pile)
            .field("listeners", &self.bus.listener_count())
            .field("current", &self.turns.current())
            .field("outcome", &self.outcome)
            .finish()
    }
}
