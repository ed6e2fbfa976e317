use serde::{Deserialize, Serialize};

/// 麻将牌
///
/// 136 张牌：万、筒、条各 36 张（1-9 各 4 张），字牌 28 张（东南西北中发白各 4 张）
///
/// 牌是值而不是对象，派生的 `Ord` 即为排序顺序：万 < 筒 < 条 < 字，同花色内按数字
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// 万子（1-9）
    Wan(u8),
    /// 筒子（1-9）
    Tong(u8),
    /// 条子（1-9）
    Tiao(u8),
    /// 字牌（风牌 + 箭牌）
    Honor(Honor),
}

impl Tile {
    /// 总牌数：136 张
    pub const TOTAL_COUNT: usize = 136;

    /// 牌的种类数：27 种序数牌 + 7 种字牌
    pub const KINDS: usize = 34;

    /// 每种牌的张数
    pub const COPIES: u8 = 4;

    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 9;

    /// 十三幺所需的 13 种幺九牌
    pub const THIRTEEN_ORPHANS: [Tile; 13] = [
        Tile::Wan(1),
        Tile::Wan(9),
        Tile::Tong(1),
        Tile::Tong(9),
        Tile::Tiao(1),
        Tile::Tiao(9),
        Tile::Honor(Honor::East),
        Tile::Honor(Honor::South),
        Tile::Honor(Honor::West),
        Tile::Honor(Honor::North),
        Tile::Honor(Honor::Red),
        Tile::Honor(Honor::Green),
        Tile::Honor(Honor::White),
    ];

    /// 创建一张序数牌，验证输入有效性
    pub fn new(suit: Suit, rank: u8) -> Option<Self> {
        if !(Self::MIN_RANK..=Self::MAX_RANK).contains(&rank) {
            return None;
        }
        Some(match suit {
            Suit::Wan => Tile::Wan(rank),
            Suit::Tong => Tile::Tong(rank),
            Suit::Tiao => Tile::Tiao(rank),
        })
    }

    /// 获取花色（字牌没有花色）
    pub fn suit(&self) -> Option<Suit> {
        match self {
            Tile::Wan(_) => Some(Suit::Wan),
            Tile::Tong(_) => Some(Suit::Tong),
            Tile::Tiao(_) => Some(Suit::Tiao),
            Tile::Honor(_) => None,
        }
    }

    /// 获取数字（1-9），字牌返回 None
    pub fn rank(&self) -> Option<u8> {
        match self {
            Tile::Wan(r) | Tile::Tong(r) | Tile::Tiao(r) => Some(*r),
            Tile::Honor(_) => None,
        }
    }

    /// 是否序数牌（万、筒、条）
    #[inline]
    pub fn is_suited(&self) -> bool {
        !self.is_honor()
    }

    /// 是否字牌
    #[inline]
    pub fn is_honor(&self) -> bool {
        matches!(self, Tile::Honor(_))
    }

    /// 是否幺九牌（1、9 和所有字牌）
    pub fn is_terminal(&self) -> bool {
        match self.rank() {
            Some(rank) => rank == Self::MIN_RANK || rank == Self::MAX_RANK,
            None => true,
        }
    }

    /// 转换为种类索引（0-33）
    ///
    /// - 万子：0-8
    /// - 筒子：9-17
    /// - 条子：18-26
    /// - 字牌：27-33
    pub fn to_index(&self) -> u8 {
        match self {
            Tile::Wan(r) => r - 1,
            Tile::Tong(r) => 9 + r - 1,
            Tile::Tiao(r) => 18 + r - 1,
            Tile::Honor(h) => 27 + *h as u8,
        }
    }

    /// 从种类索引创建牌
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0..=8 => Some(Tile::Wan(index + 1)),
            9..=17 => Some(Tile::Tong(index - 9 + 1)),
            18..=26 => Some(Tile::Tiao(index - 18 + 1)),
            27..=33 => Honor::from_index(index - 27).map(Tile::Honor),
            _ => None,
        }
    }

    /// 所有 34 种牌（按排序顺序）
    pub fn all() -> impl Iterator<Item = Tile> {
        (0..Self::KINDS as u8).filter_map(Tile::from_index)
    }

    /// 同花色的下一张（9 和字牌没有）
    pub fn next(&self) -> Option<Tile> {
        let suit = self.suit()?;
        Tile::new(suit, self.rank()? + 1)
    }

    /// 同花色的上一张（1 和字牌没有）
    pub fn prev(&self) -> Option<Tile> {
        let suit = self.suit()?;
        Tile::new(suit, self.rank()?.checked_sub(1)?)
    }

    /// 检查是否可以组成顺子（同花色连续三张，字牌不行）
    pub fn can_form_sequence(&self, other1: &Tile, other2: &Tile) -> bool {
        let (Some(suit), Some(r0), Some(r1), Some(r2)) =
            (self.suit(), self.rank(), other1.rank(), other2.rank())
        else {
            return false;
        };
        if other1.suit() != Some(suit) || other2.suit() != Some(suit) {
            return false;
        }
        let mut ranks = [r0, r1, r2];
        ranks.sort_unstable();
        ranks[0] + 1 == ranks[1] && ranks[1] + 1 == ranks[2]
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tile::Wan(r) => write!(f, "{}万", r),
            Tile::Tong(r) => write!(f, "{}筒", r),
            Tile::Tiao(r) => write!(f, "{}条", r),
            Tile::Honor(h) => write!(f, "{}", h),
        }
    }
}

/// 花色枚举
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Wan = 0,
    Tong = 1,
    Tiao = 2,
}

impl Suit {
    /// 所有花色
    pub fn all() -> [Suit; 3] {
        [Suit::Wan, Suit::Tong, Suit::Tiao]
    }
}

/// 字牌：东南西北（风牌）+ 中发白（箭牌）
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Honor {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
    Red = 4,
    Green = 5,
    White = 6,
}

impl Honor {
    pub fn all() -> [Honor; 7] {
        [
            Honor::East,
            Honor::South,
            Honor::West,
            Honor::North,
            Honor::Red,
            Honor::Green,
            Honor::White,
        ]
    }

    fn from_index(index: u8) -> Option<Self> {
        Self::all().get(index as usize).copied()
    }

    /// 是否风牌
    pub fn is_wind(&self) -> bool {
        (*self as u8) < 4
    }
}

impl std::fmt::Display for Honor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Honor::East => "东",
            Honor::South => "南",
            Honor::West => "西",
            Honor::North => "北",
            Honor::Red => "中",
            Honor::Green => "发",
            Honor::White => "白",
        };
        f.write_str(name)
    }
}
