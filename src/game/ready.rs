use crate::tile::{Tile, WinChecker};
use std::collections::{BTreeMap, BTreeSet};

/// 听牌判定器
///
/// 听牌：手牌差一张就能胡牌。候选牌只取手牌自身及相邻的牌，
/// 再逐张带入胡牌判定。
pub struct ReadyChecker;

impl ReadyChecker {
    /// 可能听的牌
    ///
    /// - 字牌只有自身
    /// - 1 只有自身和 2，9 只有自身和 8
    /// - 其他序数牌是自身和上下各一张
    /// - 如果亮出的牌恰好是三张相同的牌（可以补杠），这张牌也算候选
    pub fn candidate_tiles(hand: &[Tile], revealed: &[Tile]) -> BTreeSet<Tile> {
        let mut candidates = BTreeSet::new();
        for tile in hand {
            candidates.insert(*tile);
            // 边张的 prev/next 为 None，自然只留下向内的一张
            candidates.extend(tile.prev());
            candidates.extend(tile.next());
        }

        if let [a, b, c] = revealed {
            if a == b && b == c {
                candidates.insert(*a);
            }
        }
        candidates
    }

    /// 判断是否听牌，返回听哪些牌（已排序）
    ///
    /// 手牌张数必须满足 3n+1，否则视为不听
    pub fn can_ting(hand: &[Tile], revealed: &[Tile]) -> (bool, Vec<Tile>) {
        Self::can_ting_with(&mut WinChecker::new(), hand, revealed)
    }

    /// 同 [`ReadyChecker::can_ting`]，使用给定的胡牌判定器（规则和缓存）
    pub fn can_ting_with(checker: &mut WinChecker, hand: &[Tile], revealed: &[Tile]) -> (bool, Vec<Tile>) {
        if hand.len() % 3 != 1 {
            return (false, Vec::new());
        }

        let mut test_hand = Vec::with_capacity(hand.len() + 1);
        let mut winning = Vec::new();
        for candidate in Self::candidate_tiles(hand, revealed) {
            test_hand.clear();
            test_hand.extend_from_slice(hand);
            test_hand.push(candidate);
            if checker.can_win(&test_hand, revealed) {
                winning.push(candidate);
            }
        }
        (!winning.is_empty(), winning)
    }

    /// 打哪张可以听哪些牌
    ///
    /// 手牌张数必须满足 3n+2，否则返回空表
    pub fn ting_map(hand: &[Tile], revealed: &[Tile]) -> BTreeMap<Tile, Vec<Tile>> {
        Self::ting_map_with(&mut WinChecker::new(), hand, revealed)
    }

    pub fn ting_map_with(
        checker: &mut WinChecker,
        hand: &[Tile],
        revealed: &[Tile],
    ) -> BTreeMap<Tile, Vec<Tile>> {
        let mut map = BTreeMap::new();
        if hand.len() % 3 != 2 {
            return map;
        }

        let distinct: BTreeSet<Tile> = hand.iter().copied().collect();
        for discard in distinct {
            let mut remaining = hand.to_vec();
            if let Some(pos) = remaining.iter().position(|t| *t == discard) {
                remaining.swap_remove(pos);
            }
            let (ready, tiles) = Self::can_ting_with(checker, &remaining, revealed);
            if ready {
                map.insert(discard, tiles);
            }
        }
        map
    }

    /// 是否听牌（只返回 bool）
    pub fn is_ready(hand: &[Tile], revealed: &[Tile]) -> bool {
        Self::can_ting(hand, revealed).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Honor;

    fn wan(ranks: &[u8]) -> Vec<Tile> {
        ranks.iter().map(|&r| Tile::Wan(r)).collect()
    }

    fn sorted(set: BTreeSet<Tile>) -> Vec<Tile> {
        set.into_iter().collect()
    }

    #[test]
    fn test_candidate_tiles() {
        assert_eq!(sorted(ReadyChecker::candidate_tiles(&wan(&[1]), &[])), wan(&[1, 2]));
        assert_eq!(sorted(ReadyChecker::candidate_tiles(&wan(&[1, 2]), &[])), wan(&[1, 2, 3]));
        assert_eq!(
            sorted(ReadyChecker::candidate_tiles(&wan(&[6, 9]), &[])),
            wan(&[5, 6, 7, 8, 9])
        );
        assert_eq!(
            sorted(ReadyChecker::candidate_tiles(&wan(&[6, 9]), &wan(&[3, 3, 3]))),
            wan(&[3, 5, 6, 7, 8, 9])
        );
        // 四张亮牌不再加入候选
        assert_eq!(
            sorted(ReadyChecker::candidate_tiles(&wan(&[6, 9]), &wan(&[3, 3, 3, 3]))),
            wan(&[5, 6, 7, 8, 9])
        );
    }

    #[test]
    fn test_candidate_tiles_honor_and_other_suits() {
        let hand = [Tile::Honor(Honor::White), Tile::Tiao(1), Tile::Tong(9)];
        assert_eq!(
            sorted(ReadyChecker::candidate_tiles(&hand, &[])),
            vec![Tile::Tong(8), Tile::Tong(9), Tile::Tiao(1), Tile::Tiao(2), Tile::Honor(Honor::White)]
        );
    }

    #[test]
    fn test_single_tile_wait() {
        assert_eq!(ReadyChecker::can_ting(&wan(&[1]), &[]), (true, wan(&[1])));
    }

    #[test]
    fn test_two_sided_wait() {
        assert_eq!(ReadyChecker::can_ting(&wan(&[1, 2, 3, 4]), &[]), (true, wan(&[1, 4])));
    }

    #[test]
    fn test_wait_with_revealed_triplet() {
        let (ready, tiles) = ReadyChecker::can_ting(&wan(&[1, 1, 2, 2, 3, 3, 4, 4, 5, 5]), &wan(&[8, 8, 8]));
        assert!(ready);
        assert_eq!(tiles, wan(&[1, 2, 4, 5]));
    }

    #[test]
    fn test_nine_gates() {
        let (ready, tiles) = ReadyChecker::can_ting(&wan(&[1, 1, 1, 2, 3, 4, 5, 6, 7, 8, 9, 9, 9]), &[]);
        assert!(ready);
        assert_eq!(tiles, wan(&[1, 2, 3, 4, 5, 6, 7, 8, 9]));
    }

    #[test]
    fn test_seven_pairs_wait() {
        let mut hand = wan(&[1, 1, 3, 3, 5, 5, 7, 7, 9, 9]);
        hand.extend([Tile::Tong(1), Tile::Tong(1), Tile::Tong(8)]);
        assert_eq!(ReadyChecker::can_ting(&hand, &[]), (true, vec![Tile::Tong(8)]));
    }

    #[test]
    fn test_not_ready() {
        let hand = vec![
            Tile::Wan(1), Tile::Wan(4), Tile::Wan(7),
            Tile::Tong(2), Tile::Tong(5), Tile::Tong(8),
            Tile::Tiao(3), Tile::Tiao(6), Tile::Tiao(9),
            Tile::Honor(Honor::East), Tile::Honor(Honor::South),
            Tile::Honor(Honor::West), Tile::Honor(Honor::North),
        ];
        assert_eq!(ReadyChecker::can_ting(&hand, &[]), (false, Vec::new()));
        assert!(!ReadyChecker::is_ready(&hand, &[]));
    }

    #[test]
    fn test_malformed_sizes() {
        assert_eq!(ReadyChecker::can_ting(&wan(&[1, 1]), &[]), (false, Vec::new()));
        assert!(ReadyChecker::ting_map(&wan(&[1, 2, 3, 4]), &[]).is_empty());
    }

    #[test]
    fn test_ting_map() {
        let map = ReadyChecker::ting_map(&wan(&[1, 2, 3, 4, 5]), &[]);
        assert_eq!(map.get(&Tile::Wan(1)), Some(&wan(&[2, 5])));
        assert_eq!(map.get(&Tile::Wan(2)), Some(&wan(&[1])));
        assert_eq!(map.get(&Tile::Wan(4)), Some(&wan(&[5])));
        assert_eq!(map.get(&Tile::Wan(5)), Some(&wan(&[1, 4])));
        assert_eq!(map.get(&Tile::Wan(3)), None);
        assert!(map.keys().all(|t| wan(&[1, 2, 3, 4, 5]).contains(t)));
    }

    #[test]
    fn test_thirteen_orphans_wait() {
        let hand = Tile::THIRTEEN_ORPHANS.to_vec();
        let (ready, tiles) = ReadyChecker::can_ting(&hand, &[]);
        assert!(ready);
        assert_eq!(tiles, Tile::THIRTEEN_ORPHANS.to_vec());
    }
}
