/// 四人麻将规则引擎
///
/// 胡牌判定、听牌计算，以及吃碰杠胡按优先级轮转的对局编排

pub mod tile;
pub mod game;

// 重新导出常用类型
pub use tile::{Tile, Suit, Honor, TileBag, Wall, WinChecker, WinResult, WinRules, WinType, Group, can_win, check_win};
pub use game::action::{PlayerId, Privilege};
pub use game::agent::{DecisionError, FnAgent, PlayerAgent, SimpleAgent};
pub use game::claim::ClaimChecker;
pub use game::config::GameConfig;
pub use game::event::{EventBus, TileDrawn, TileDrawnListener};
pub use game::game_engine::{GameEngine, GameError, GameOutcome, GameResult, StepOutcome};
pub use game::meld::{Meld, MeldKind};
pub use game::pile::Pile;
pub use game::player::{PlayerController, TakeOutcome};
pub use game::ready::ReadyChecker;
pub use game::state::{GameSnapshot, PlayerView};
pub use game::turn::TurnIterator;
