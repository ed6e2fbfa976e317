use super::{Suit, Tile};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// 启用的特殊胡牌型（基本胡牌型总是启用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRules {
    /// 七对
    pub seven_pairs: bool,
    /// 十三幺
    pub thirteen_orphans: bool,
}

impl Default for WinRules {
    fn default() -> Self {
        Self {
            seven_pairs: true,
            thirteen_orphans: true,
        }
    }
}

/// 胡牌判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinResult {
    /// 是否胡牌
    pub is_win: bool,
    /// 胡牌类型
    pub win_type: WinType,
    /// 将牌（七对没有单独的将）
    pub pair: Option<Tile>,
    /// 找到的顺子/刻子组合（按搜索顺序）
    pub groups: SmallVec<[Group; 4]>,
}

impl WinResult {
    fn not_win() -> Self {
        Self {
            is_win: false,
            win_type: WinType::Standard,
            pair: None,
            groups: SmallVec::new(),
        }
    }
}

/// 胡牌类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinType {
    /// 基本胡牌型：1 个将 + n 个顺子/刻子
    Standard,
    /// 七对
    SevenPairs,
    /// 十三幺
    ThirteenOrphans,
}

/// 牌组（顺子或刻子）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// 顺子（连续三张牌）
    Sequence { suit: Suit, start: u8 },
    /// 刻子（三张相同牌）
    Triplet { tile: Tile },
}

type Counts = [u8; Tile::KINDS];

/// 胡牌判定器
///
/// 判定本身是纯函数；判定器只额外持有规则开关和按牌型计数的结果缓存
#[derive(Debug)]
pub struct WinChecker {
    rules: WinRules,
    /// 结果缓存，键为 (各牌张数, 是否门清)
    result_cache: HashMap<(Counts, bool), WinResult>,
    /// 超过此大小后清空缓存
    max_cache_size: usize,
}

impl WinChecker {
    /// 创建新的胡牌判定器
    pub fn new() -> Self {
        Self::with_rules(WinRules::default())
    }

    pub fn with_rules(rules: WinRules) -> Self {
        Self {
            rules,
            result_cache: HashMap::new(),
            max_cache_size: 1000,
        }
    }

    /// 创建新的胡牌判定器（自定义缓存大小，0 表示不缓存）
    pub fn with_cache_size(rules: WinRules, max_cache_size: usize) -> Self {
        Self {
            rules,
            result_cache: HashMap::new(),
            max_cache_size,
        }
    }

    pub fn rules(&self) -> WinRules {
        self.rules
    }

    /// 判定是否胡牌
    #[inline]
    pub fn can_win(&mut self, tiles: &[Tile], revealed: &[Tile]) -> bool {
        self.check_win(tiles, revealed).is_win
    }

    /// 判定手牌是否胡牌
    ///
    /// # 参数
    ///
    /// - `tiles`: 暗手牌（含待判定的那张），张数必须满足 3n+2
    /// - `revealed`: 已亮出的牌组中的牌，不参与拆解；非空时不能胡七对和十三幺
    ///
    /// 结果只取决于牌的多重集合，与输入顺序无关
    pub fn check_win(&mut self, tiles: &[Tile], revealed: &[Tile]) -> WinResult {
        if tiles.len() % 3 != 2 {
            return WinResult::not_win();
        }

        let mut counts: Counts = [0; Tile::KINDS];
        for tile in tiles {
            let slot = &mut counts[tile.to_index() as usize];
            *slot = slot.saturating_add(1);
        }
        let concealed = revealed.is_empty();

        if self.max_cache_size == 0 {
            return evaluate(&mut counts, tiles.len(), concealed, self.rules);
        }

        let key = (counts, concealed);
        if let Some(cached) = self.result_cache.get(&key) {
            return cached.clone();
        }

        let result = evaluate(&mut counts, tiles.len(), concealed, self.rules);
        if self.result_cache.len() >= self.max_cache_size {
            self.result_cache.clear();
        }
        self.result_cache.insert(key, result.clone());
        result
    }

    pub fn clear_cache(&mut self) {
        self.result_cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.result_cache.len()
    }
}

impl Default for WinChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷函数：按默认规则判定是否胡牌（不缓存）
pub fn can_win(tiles: &[Tile], revealed: &[Tile]) -> bool {
    check_win(tiles, revealed).is_win
}

/// 便捷函数：按默认规则获取胡牌结果（不缓存）
pub fn check_win(tiles: &[Tile], revealed: &[Tile]) -> WinResult {
    WinChecker::with_cache_size(WinRules::default(), 0).check_win(tiles, revealed)
}

fn evaluate(counts: &mut Counts, len: usize, concealed: bool, rules: WinRules) -> WinResult {
    if len == 14 && concealed {
        if rules.thirteen_orphans {
            if let Some(eye) = thirteen_orphans_eye(counts) {
                return WinResult {
                    is_win: true,
                    win_type: WinType::ThirteenOrphans,
                    pair: Some(eye),
                    groups: SmallVec::new(),
                };
            }
        }
        // 四张相同算两对
        if rules.seven_pairs && counts.iter().all(|&c| c % 2 == 0) {
            return WinResult {
                is_win: true,
                win_type: WinType::SevenPairs,
                pair: None,
                groups: SmallVec::new(),
            };
        }
    }

    for index in 0..Tile::KINDS {
        if counts[index] < 2 {
            continue;
        }
        counts[index] -= 2;
        let mut groups = SmallVec::new();
        let found = decompose(counts, 0, &mut groups);
        counts[index] += 2;
        if found {
            return WinResult {
                is_win: true,
                win_type: WinType::Standard,
                pair: Tile::from_index(index as u8),
                groups,
            };
        }
    }

    WinResult::not_win()
}

/// 十三幺：13 种幺九牌各至少一张，其中恰好一种两张，且没有其他牌
fn thirteen_orphans_eye(counts: &Counts) -> Option<Tile> {
    let mut eye = None;
    for tile in Tile::THIRTEEN_ORPHANS {
        match counts[tile.to_index() as usize] {
            1 => {}
            2 if eye.is_none() => eye = Some(tile),
            _ => return None,
        }
    }
    let total: usize = counts.iter().map(|&c| c as usize).sum();
    // 13 种各一张 + 一张将，总数恰为 14 说明没有非幺九牌
    if total == 14 {
        eye
    } else {
        None
    }
}

fn first_held(counts: &Counts, from: usize) -> usize {
    (from..Tile::KINDS).find(|&i| counts[i] > 0).unwrap_or(Tile::KINDS)
}

/// 回溯拆解：剩余的牌是否能全部拆成顺子/刻子
///
/// 在同一个计数表上原地增减并在返回前恢复，不做任何分配。
/// 最小的剩余牌只能作为刻子或顺子的第一张，先试刻子再试顺子。
fn decompose(counts: &mut Counts, from: usize, groups: &mut SmallVec<[Group; 4]>) -> bool {
    let index = first_held(counts, from);
    if index == Tile::KINDS {
        return true;
    }
    let Some(tile) = Tile::from_index(index as u8) else {
        return false;
    };

    if counts[index] >= 3 {
        counts[index] -= 3;
        groups.push(Group::Triplet { tile });
        let found = decompose(counts, index, groups);
        counts[index] += 3;
        if found {
            return true;
        }
        groups.pop();
    }

    // 字牌不能组成顺子；7 以上的数字凑不满同花色三连
    if let (Some(suit), Some(rank)) = (tile.suit(), tile.rank()) {
        if rank <= 7 && counts[index + 1] > 0 && counts[index + 2] > 0 {
            counts[index] -= 1;
            counts[index + 1] -= 1;
            counts[index + 2] -= 1;
            groups.push(Group::Sequence { suit, start: rank });
            let found = decompose(counts, index, groups);
            counts[index] += 1;
            counts[index + 1] += 1;
            counts[index + 2] += 1;
            if found {
                return true;
            }
            groups.pop();
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Honor;

    fn wan(ranks: &[u8]) -> Vec<Tile> {
        ranks.iter().map(|&r| Tile::Wan(r)).collect()
    }

    fn orphans_with_eye(eye: Tile) -> Vec<Tile> {
        let mut tiles = Tile::THIRTEEN_ORPHANS.to_vec();
        tiles.push(eye);
        tiles
    }

    #[test]
    fn test_normal_win() {
        let mut tiles = wan(&[1, 1, 2, 3, 4, 5, 6, 7]);
        tiles.extend([Tile::Tong(1), Tile::Tong(2), Tile::Tong(3)]);
        tiles.extend([Tile::Tong(5), Tile::Tong(6), Tile::Tong(7)]);

        let result = check_win(&tiles, &[]);
        assert!(result.is_win);
        assert_eq!(result.win_type, WinType::Standard);
        assert_eq!(result.pair, Some(Tile::Wan(1)));
        assert_eq!(result.groups.len(), 4);
    }

    #[test]
    fn test_seven_pairs() {
        let tiles = wan(&[1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7]);
        let result = check_win(&tiles, &[]);
        assert!(result.is_win);

        // 最后一对拆成 7、9
        let broken = wan(&[1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 9]);
        assert!(!can_win(&broken, &[]));
    }

    #[test]
    fn test_seven_pairs_with_four_of_a_kind() {
        let mut tiles = wan(&[1, 1, 1, 1]);
        tiles.extend([Tile::Tong(2), Tile::Tong(2), Tile::Tong(5), Tile::Tong(5)]);
        tiles.extend([Tile::Tiao(3), Tile::Tiao(3), Tile::Tiao(8), Tile::Tiao(8)]);
        tiles.extend([Tile::Honor(Honor::Red), Tile::Honor(Honor::Red)]);

        let result = check_win(&tiles, &[]);
        assert!(result.is_win);
        assert_eq!(result.win_type, WinType::SevenPairs);
    }

    #[test]
    fn test_thirteen_orphans() {
        for eye in Tile::THIRTEEN_ORPHANS {
            let result = check_win(&orphans_with_eye(eye), &[]);
            assert!(result.is_win);
            assert_eq!(result.win_type, WinType::ThirteenOrphans);
            assert_eq!(result.pair, Some(eye));
        }
    }

    #[test]
    fn test_thirteen_orphans_with_non_member() {
        let mut tiles = orphans_with_eye(Tile::Wan(1));
        tiles[0] = Tile::Wan(2);
        assert!(!can_win(&tiles, &[]));

        // 两种各两张
        let mut tiles = orphans_with_eye(Tile::Wan(1));
        tiles[1] = Tile::Tong(9);
        assert!(!can_win(&tiles, &[]));
    }

    #[test]
    fn test_small_standard_hands() {
        assert!(can_win(&wan(&[1, 1, 2, 2, 2, 3, 3, 3]), &[]));
        assert!(can_win(&wan(&[1, 1, 1, 2, 3, 2, 3, 4]), &[]));
        assert!(can_win(&wan(&[1, 1]), &[]));
        assert!(!can_win(&wan(&[1, 2]), &[]));
    }

    #[test]
    fn test_eye_backtracking() {
        // 11、33、44 作将都拆不开，只有 66 作将：111 + 234 + 345
        let tiles = wan(&[1, 1, 1, 2, 3, 4, 3, 4, 5, 6, 6]);
        let result = check_win(&tiles, &[]);
        assert!(result.is_win);
        assert_eq!(result.pair, Some(Tile::Wan(6)));
        assert_eq!(result.groups[0], Group::Triplet { tile: Tile::Wan(1) });
    }

    #[test]
    fn test_triplets_found_before_runs() {
        let tiles = wan(&[2, 2, 2, 3, 3, 3, 4, 4, 4, 9, 9]);
        let result = check_win(&tiles, &[]);
        assert!(result.is_win);
        assert_eq!(result.pair, Some(Tile::Wan(9)));
        assert!(result.groups.iter().all(|g| matches!(g, Group::Triplet { .. })));
    }

    #[test]
    fn test_honors_never_form_runs() {
        let tiles = vec![
            Tile::Honor(Honor::East),
            Tile::Honor(Honor::South),
            Tile::Honor(Honor::West),
            Tile::Wan(5),
            Tile::Wan(5),
        ];
        assert!(!can_win(&tiles, &[]));
    }

    #[test]
    fn test_runs_do_not_cross_suits() {
        let tiles = vec![Tile::Wan(8), Tile::Wan(9), Tile::Tong(1), Tile::Tiao(5), Tile::Tiao(5)];
        assert!(!can_win(&tiles, &[]));
    }

    #[test]
    fn test_wrong_count() {
        assert!(!can_win(&wan(&[1, 1, 1]), &[]));
        assert!(!can_win(&wan(&[1, 2, 3, 4, 4, 4]), &[]));
        assert!(!can_win(&[], &[]));
    }

    #[test]
    fn test_special_shapes_need_closed_hand() {
        let tiles = wan(&[1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7]);
        let revealed = [Tile::Tiao(5); 3];
        // 仍能按基本型胡（11 + 234 + 234 + 567 + 567）
        let result = check_win(&tiles, &revealed);
        assert!(result.is_win);
        assert_eq!(result.win_type, WinType::Standard);

        assert!(!can_win(&orphans_with_eye(Tile::Wan(1)), &revealed));
    }

    #[test]
    fn test_oversized_input_does_not_overflow() {
        assert!(!can_win(&vec![Tile::Wan(1); 257], &[]));
        assert!(!can_win(&vec![Tile::Honor(Honor::Red); 302], &[]));
    }

    #[test]
    fn test_rules_toggle() {
        let tiles = vec![
            Tile::Wan(1), Tile::Wan(1), Tile::Wan(3), Tile::Wan(3),
            Tile::Tong(5), Tile::Tong(5), Tile::Tong(7), Tile::Tong(7),
            Tile::Tiao(2), Tile::Tiao(2), Tile::Tiao(9), Tile::Tiao(9),
            Tile::Honor(Honor::East), Tile::Honor(Honor::East),
        ];
        let mut checker = WinChecker::with_rules(WinRules { seven_pairs: false, thirteen_orphans: true });
        assert!(!checker.can_win(&tiles, &[]));
        assert!(WinChecker::new().can_win(&tiles, &[]));
    }

    #[test]
    fn test_cache() {
        let mut checker = WinChecker::with_cache_size(WinRules::default(), 2);
        let tiles = wan(&[1, 1, 2, 3, 4]);
        assert!(checker.can_win(&tiles, &[]));
        assert!(checker.can_win(&wan(&[4, 3, 2, 1, 1]), &[]));
        assert_eq!(checker.cache_size(), 1);

        assert!(!checker.can_win(&wan(&[1, 1, 2, 3, 5]), &[]));
        assert!(checker.can_win(&wan(&[5, 5]), &[]));
        // 超出上限后清空重建
        assert_eq!(checker.cache_size(), 1);

        checker.clear_cache();
        assert_eq!(checker.cache_size(), 0);
    }
}
