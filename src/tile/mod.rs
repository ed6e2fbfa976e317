/// 牌相关模块
///
/// 包含牌（Tile）、牌袋（TileBag）、牌墙（Wall）和胡牌判定

pub mod tile;
pub mod bag;
pub mod wall;
pub mod win_check;

// 重新导出常用类型
pub use tile::{Tile, Suit, Honor};
pub use bag::TileBag;
pub use wall::Wall;
pub use win_check::{WinChecker, WinResult, WinRules, WinType, Group, can_win, check_win};
