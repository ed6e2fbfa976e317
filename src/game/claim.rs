use crate::game::action::Privilege;
use crate::game::meld::Meld;
use crate::tile::{Tile, TileBag, WinChecker};
use smallvec::SmallVec;

/// 吃碰杠判定器
///
/// 所有判定只读手牌牌袋，可以在同一个牌袋上并发调用
pub struct ClaimChecker;

impl ClaimChecker {
    /// 可以和 `tile` 组成顺子的手牌组合
    ///
    /// 依次检查 (t+1, t+2)、(t-1, t-2)、(t-1, t+1) 三种位置
    pub fn run_options(hand: &TileBag, tile: Tile) -> SmallVec<[[Tile; 2]; 3]> {
        let mut options = SmallVec::new();
        let (prev, next) = (tile.prev(), tile.next());
        let prev2 = prev.and_then(|t| t.prev());
        let next2 = next.and_then(|t| t.next());

        for pair in [(next, next2), (prev, prev2), (prev, next)] {
            if let (Some(a), Some(b)) = pair {
                if hand.has_tile(a) && hand.has_tile(b) {
                    options.push([a, b]);
                }
            }
        }
        options
    }

    /// 是否可以吃
    pub fn can_run(hand: &TileBag, tile: Tile) -> bool {
        !Self::run_options(hand, tile).is_empty()
    }

    /// 是否可以碰：手牌中至少两张相同的牌
    pub fn can_triplet(hand: &TileBag, tile: Tile) -> bool {
        hand.tile_count(tile) >= 2
    }

    /// 是否可以明杠：手牌中有三张相同的牌
    pub fn can_quad_claim(hand: &TileBag, tile: Tile) -> bool {
        hand.tile_count(tile) >= 3
    }

    /// 手牌中可以暗杠的牌（四张相同）
    pub fn concealed_quads(hand: &TileBag) -> Vec<Tile> {
        hand.distinct_tiles()
            .into_iter()
            .filter(|t| hand.tile_count(*t) == 4)
            .collect()
    }

    /// 可以补杠的牌：已碰的牌且手里有第四张
    pub fn added_quads(hand: &TileBag, melds: &[Meld]) -> Vec<Tile> {
        melds
            .iter()
            .filter(|m| m.is_triplet_of(m.tile()) && hand.has_tile(m.tile()))
            .map(Meld::tile)
            .collect()
    }

    /// 对打出的牌可以行使的全部特权（按优先级从高到低）
    ///
    /// # 参数
    ///
    /// - `hand`: 暗手牌
    /// - `revealed`: 已亮出的牌
    /// - `tile`: 打出的牌
    /// - `downstream`: 是否是出牌者的下家（只有下家可以吃）
    pub fn privileges(
        checker: &mut WinChecker,
        hand: &TileBag,
        revealed: &[Tile],
        tile: Tile,
        downstream: bool,
    ) -> SmallVec<[Privilege; 4]> {
        let mut privileges = SmallVec::new();

        let mut test_hand = hand.to_sorted_vec();
        test_hand.push(tile);
        if checker.can_win(&test_hand, revealed) {
            privileges.push(Privilege::Win);
        }
        if Self::can_quad_claim(hand, tile) {
            privileges.push(Privilege::Quad);
        }
        if Self::can_triplet(hand, tile) {
            privileges.push(Privilege::Triplet);
        }
        if downstream && Self::can_run(hand, tile) {
            privileges.push(Privilege::Run);
        }
        privileges
    }
}
