use crate::game::action::Privilege;
use crate::game::claim::ClaimChecker;
use crate::game::ready::ReadyChecker;
use crate::game::state::GameSnapshot;
use crate::tile::{Tile, TileBag, WinChecker};
use std::fmt;

/// 决策方未能给出合法选择
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionError {
    pub message: String,
}

impl DecisionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decision failed: {}", self.message)
    }
}

impl std::error::Error for DecisionError {}

/// 玩家决策接口（人类或 AI）
///
/// 每次调用都是同步阻塞的，引擎在这里等待决策结果。返回错误时
/// 引擎不会重试，错误原样向上传播。
pub trait PlayerAgent {
    /// 选择一张牌打出
    ///
    /// # 参数
    ///
    /// - `hand`: 暗手牌（不含亮出的牌组）
    /// - `snapshot`: 当前游戏状态快照
    ///
    /// # 返回
    ///
    /// 要打出的牌，必须在 `hand` 中
    fn play(&mut self, hand: &[Tile], snapshot: &GameSnapshot) -> Result<Tile, DecisionError>;

    /// 是否要别人刚打出的牌
    ///
    /// # 参数
    ///
    /// - `tiles`: 暗手牌加上弃牌堆顶的牌（最后一张）
    /// - `snapshot`: 当前游戏状态快照，`privileges_of(viewer)` 是可以行使的特权
    ///
    /// # 返回
    ///
    /// 选择的特权和组成的牌（包含牌顶那张）；牌为空表示放弃
    fn take(&mut self, tiles: &[Tile], snapshot: &GameSnapshot) -> Result<(Privilege, Vec<Tile>), DecisionError>;

    /// 自摸时是否胡牌
    fn self_win(&mut self, _hand: &[Tile], _snapshot: &GameSnapshot) -> Result<bool, DecisionError> {
        Ok(true)
    }

    /// 是否开杠（暗杠或补杠）
    ///
    /// `candidates` 是可以杠的牌，返回 None 表示不杠
    fn concealed_quad(
        &mut self,
        _candidates: &[Tile],
        _snapshot: &GameSnapshot,
    ) -> Result<Option<Tile>, DecisionError> {
        Ok(None)
    }
}

impl<A: PlayerAgent + ?Sized> PlayerAgent for Box<A> {
    fn play(&mut self, hand: &[Tile], snapshot: &GameSnapshot) -> Result<Tile, DecisionError> {
        (**self).play(hand, snapshot)
    }

    fn take(&mut self, tiles: &[Tile], snapshot: &GameSnapshot) -> Result<(Privilege, Vec<Tile>), DecisionError> {
        (**self).take(tiles, snapshot)
    }

    fn self_win(&mut self, hand: &[Tile], snapshot: &GameSnapshot) -> Result<bool, DecisionError> {
        (**self).self_win(hand, snapshot)
    }

    fn concealed_quad(
        &mut self,
        candidates: &[Tile],
        snapshot: &GameSnapshot,
    ) -> Result<Option<Tile>, DecisionError> {
        (**self).concealed_quad(candidates, snapshot)
    }
}

/// 函数式决策适配器
///
/// 将出牌、要牌两个闭包转换为 PlayerAgent
pub struct FnAgent<P, T> {
    play: P,
    take: T,
}

impl<P, T> FnAgent<P, T>
where
    P: FnMut(&[Tile], &GameSnapshot) -> Result<Tile, DecisionError>,
    T: FnMut(&[Tile], &GameSnapshot) -> Result<(Privilege, Vec<Tile>), DecisionError>,
{
    pub fn new(play: P, take: T) -> Self {
        Self { play, take }
    }
}

impl<P, T> PlayerAgent for FnAgent<P, T>
where
    P: FnMut(&[Tile], &GameSnapshot) -> Result<Tile, DecisionError>,
    T: FnMut(&[Tile], &GameSnapshot) -> Result<(Privilege, Vec<Tile>), DecisionError>,
{
    fn play(&mut self, hand: &[Tile], snapshot: &GameSnapshot) -> Result<Tile, DecisionError> {
        (self.play)(hand, snapshot)
    }

    fn take(&mut self, tiles: &[Tile], snapshot: &GameSnapshot) -> Result<(Privilege, Vec<Tile>), DecisionError> {
        (self.take)(tiles, snapshot)
    }
}

/// 简单策略
///
/// - 能胡就胡，能杠就杠，其次碰、吃
/// - 出牌时优先保持听牌（听的牌最多的打法）
/// - 否则打出与其他手牌关联最少的孤张
#[derive(Debug, Default)]
pub struct SimpleAgent {
    checker: WinChecker,
}

impl SimpleAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// 孤张程度：与其他手牌关联越少，分数越低
    fn connectivity(tile: Tile, hand: &[Tile]) -> u32 {
        hand.iter()
            .map(|other| {
                if *other == tile {
                    return 2;
                }
                match (tile.suit(), other.suit(), tile.rank(), other.rank()) {
                    (Some(a), Some(b), Some(r1), Some(r2)) if a == b => match r1.abs_diff(r2) {
                        1 => 2,
                        2 => 1,
                        _ => 0,
                    },
                    _ => 0,
                }
            })
            .sum::<u32>()
            .saturating_sub(2)
    }
}

impl PlayerAgent for SimpleAgent {
    fn play(&mut self, hand: &[Tile], snapshot: &GameSnapshot) -> Result<Tile, DecisionError> {
        let revealed = snapshot.viewer_revealed();
        let ting_map = ReadyChecker::ting_map_with(&mut self.checker, hand, &revealed);
        if let Some((discard, _)) = ting_map.iter().max_by_key(|(_, waits)| waits.len()) {
            return Ok(*discard);
        }

        let mut sorted = hand.to_vec();
        sorted.sort_unstable();
        // 同分时优先打字牌（排在最后）
        sorted
            .iter()
            .rev()
            .min_by_key(|tile| Self::connectivity(**tile, hand))
            .copied()
            .ok_or_else(|| DecisionError::new("empty hand"))
    }

    fn take(&mut self, tiles: &[Tile], snapshot: &GameSnapshot) -> Result<(Privilege, Vec<Tile>), DecisionError> {
        let viewer = snapshot.viewer.ok_or_else(|| DecisionError::new("snapshot has no viewer"))?;
        let top = snapshot.top_tile.ok_or_else(|| DecisionError::new("no tile to take"))?;

        let Some(&best) = snapshot.privileges_of(viewer).first() else {
            return Ok((Privilege::Run, Vec::new()));
        };
        let selection = match best {
            Privilege::Win => vec![top],
            Privilege::Quad => vec![top; 4],
            Privilege::Triplet => vec![top; 3],
            Privilege::Run => {
                let hand = TileBag::from_tiles(tiles);
                if !hand.del_tile(top, 1) {
                    return Err(DecisionError::new("top tile missing from offered tiles"));
                }
                match ClaimChecker::run_options(&hand, top).first() {
                    Some([a, b]) => vec![*a, *b, top],
                    None => Vec::new(),
                }
            }
        };
        Ok((best, selection))
    }

    fn concealed_quad(
        &mut self,
        candidates: &[Tile],
        _snapshot: &GameSnapshot,
    ) -> Result<Option<Tile>, DecisionError> {
        Ok(candidates.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Honor;

    fn snapshot_for(viewer: u8, top: Tile, privileges: Vec<Privilege>) -> GameSnapshot {
        let mut snapshot = GameSnapshot {
            viewer: Some(viewer),
            top_tile: Some(top),
            ..Default::default()
        };
        snapshot.privileges.insert(viewer, privileges);
        snapshot
    }

    #[test]
    fn test_simple_agent_discards_isolated_tile() {
        let mut agent = SimpleAgent::new();
        let hand = vec![
            Tile::Wan(1), Tile::Wan(2), Tile::Wan(3),
            Tile::Tong(4), Tile::Tong(5), Tile::Tong(6),
            Tile::Tiao(7), Tile::Tiao(8),
            Tile::Honor(Honor::Red), Tile::Honor(Honor::Red),
            Tile::Wan(7), Tile::Wan(8),
            Tile::Honor(Honor::East),
            Tile::Tiao(1),
        ];
        let tile = agent.play(&hand, &GameSnapshot::default()).unwrap();
        assert_eq!(tile, Tile::Honor(Honor::East));
    }

    #[test]
    fn test_simple_agent_keeps_ting() {
        let mut agent = SimpleAgent::new();
        // 打东风后听 3 万 / 6 万
        let hand = vec![
            Tile::Wan(4), Tile::Wan(5),
            Tile::Tong(1), Tile::Tong(2), Tile::Tong(3),
            Tile::Tong(7), Tile::Tong(8), Tile::Tong(9),
            Tile::Tiao(2), Tile::Tiao(2), Tile::Tiao(2),
            Tile::Tiao(5), Tile::Tiao(5),
            Tile::Honor(Honor::East),
        ];
        let tile = agent.play(&hand, &GameSnapshot::default()).unwrap();
        assert_eq!(tile, Tile::Honor(Honor::East));
    }

    #[test]
    fn test_simple_agent_empty_hand() {
        let mut agent = SimpleAgent::new();
        assert!(agent.play(&[], &GameSnapshot::default()).is_err());
    }

    #[test]
    fn test_simple_agent_take() {
        let mut agent = SimpleAgent::new();
        let top = Tile::Tong(5);

        let snapshot = snapshot_for(2, top, vec![Privilege::Triplet, Privilege::Run]);
        let tiles = vec![Tile::Tong(5), Tile::Tong(5), Tile::Tong(6), Tile::Tong(7), top];
        assert_eq!(agent.take(&tiles, &snapshot).unwrap(), (Privilege::Triplet, vec![top; 3]));

        let snapshot = snapshot_for(2, top, vec![Privilege::Run]);
        let (privilege, selection) = agent.take(&tiles, &snapshot).unwrap();
        assert_eq!(privilege, Privilege::Run);
        assert_eq!(selection, vec![Tile::Tong(6), Tile::Tong(7), top]);

        let snapshot = snapshot_for(2, top, Vec::new());
        let (_, selection) = agent.take(&tiles, &snapshot).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_fn_agent() {
        let mut agent = FnAgent::new(
            |hand: &[Tile], _: &GameSnapshot| hand.last().copied().ok_or_else(|| DecisionError::new("empty")),
            |_: &[Tile], _: &GameSnapshot| Err(DecisionError::new("offline")),
        );
        let snapshot = GameSnapshot::default();
        assert_eq!(agent.play(&[Tile::Wan(1), Tile::Wan(9)], &snapshot), Ok(Tile::Wan(9)));
        assert_eq!(agent.take(&[], &snapshot), Err(DecisionError::new("offline")));
        assert_eq!(agent.self_win(&[], &snapshot), Ok(true));
        assert_eq!(agent.concealed_quad(&[Tile::Wan(1)], &snapshot), Ok(None));
    }
}
