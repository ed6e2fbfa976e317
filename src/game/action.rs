use serde::{Deserialize, Serialize};

/// 玩家 ID（座位号）
pub type PlayerId = u8;

/// 对别人打出的牌可以行使的特权
///
/// 声明顺序即优先级：胡 > 杠 > 碰 > 吃，`Ord` 越小优先级越高
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Privilege {
    /// 胡（点炮）
    Win,
    /// 明杠
    Quad,
    /// 碰
    Triplet,
    /// 吃（只有出牌者的下家可以）
    Run,
}

impl Privilege {
    /// 按优先级从高到低排列的全部特权
    pub fn all() -> [Privilege; 4] {
        [Privilege::Win, Privilege::Quad, Privilege::Triplet, Privilege::Run]
    }

    /// 形成的牌组张数（胡牌不形成牌组）
    pub fn meld_size(&self) -> Option<usize> {
        match self {
            Privilege::Win => None,
            Privilege::Quad => Some(4),
            Privilege::Triplet | Privilege::Run => Some(3),
        }
    }
}
