use crate::game::action::{PlayerId, Privilege};
use crate::tile::Tile;
use serde::Serialize;
use smallvec::SmallVec;

/// 牌组类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MeldKind {
    /// 顺子（吃）
    Run,
    /// 刻子（碰）
    Triplet,
    /// 杠（明杠/暗杠/补杠）
    Quad,
}

impl MeldKind {
    pub fn size(&self) -> usize {
        match self {
            MeldKind::Run | MeldKind::Triplet => 3,
            MeldKind::Quad => 4,
        }
    }
}

impl From<MeldKind> for Privilege {
    fn from(kind: MeldKind) -> Self {
        match kind {
            MeldKind::Run => Privilege::Run,
            MeldKind::Triplet => Privilege::Triplet,
            MeldKind::Quad => Privilege::Quad,
        }
    }
}

/// 亮出的牌组
///
/// 形成后不可变，唯一的例外是碰升级为杠
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meld {
    kind: MeldKind,
    /// 已排序
    tiles: SmallVec<[Tile; 4]>,
    /// 被吃碰杠的牌是谁打出的（暗杠为 None）
    from: Option<PlayerId>,
    /// 是否暗杠
    concealed: bool,
}

impl Meld {
    /// 创建牌组，牌型不合法时返回 None
    pub fn new(kind: MeldKind, tiles: &[Tile], from: Option<PlayerId>) -> Option<Self> {
        if tiles.len() != kind.size() {
            return None;
        }
        let mut sorted: SmallVec<[Tile; 4]> = SmallVec::from_slice(tiles);
        sorted.sort_unstable();

        let valid = match kind {
            MeldKind::Run => sorted[0].can_form_sequence(&sorted[1], &sorted[2]),
            MeldKind::Triplet | MeldKind::Quad => sorted.iter().all(|t| *t == sorted[0]),
        };
        valid.then_some(Self {
            kind,
            tiles: sorted,
            from,
            concealed: false,
        })
    }

    /// 暗杠：手里的四张相同牌
    pub fn concealed_quad(tile: Tile) -> Self {
        Self {
            kind: MeldKind::Quad,
            tiles: SmallVec::from_slice(&[tile; 4]),
            from: None,
            concealed: true,
        }
    }

    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// 牌组中最小的那张
    pub fn tile(&self) -> Tile {
        self.tiles[0]
    }

    pub fn claimed_from(&self) -> Option<PlayerId> {
        self.from
    }

    pub fn is_concealed(&self) -> bool {
        self.concealed
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// 是否是这张牌的碰
    pub fn is_triplet_of(&self, tile: Tile) -> bool {
        self.kind == MeldKind::Triplet && self.tiles[0] == tile
    }

    /// 碰升级为杠（补杠）
    ///
    /// 只有同一张牌的碰才能升级，否则返回 false 且不修改
    pub fn upgrade_to_quad(&mut self, tile: Tile) -> bool {
        if !self.is_triplet_of(tile) {
            return false;
        }
        self.kind = MeldKind::Quad;
        self.tiles.push(tile);
        true
    }
}

/// 所有牌组中的牌
pub fn meld_tiles(melds: &[Meld]) -> Vec<Tile> {
    melds.iter().flat_map(|m| m.tiles().iter().copied()).collect()
}
