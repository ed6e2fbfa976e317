/// 游戏常量定义
///
/// 集中管理所有魔法数字

/// 玩家数量
pub const NUM_PLAYERS: u8 = 4;

/// 总牌数（136 张：万、筒、条各 36 张，字牌 28 张）
pub const TOTAL_TILES: usize = 136;

/// 起手牌张数
pub const DEAL_SIZE: usize = 13;

/// 座位名称（按座位号）
pub const SEAT_NAMES: [&str; NUM_PLAYERS as usize] = ["东家", "南家", "西家", "北家"];
