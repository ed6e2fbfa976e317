use crate::game::action::PlayerId;

/// 环形座位迭代器
#[derive(Debug, Clone)]
pub struct TurnIterator {
    order: Vec<PlayerId>,
    cursor: usize,
}

impl TurnIterator {
    /// 按给定座位顺序创建，从第一个座位开始
    pub fn new(order: Vec<PlayerId>) -> Self {
        Self { order, cursor: 0 }
    }

    /// 当前座位
    pub fn current(&self) -> Option<PlayerId> {
        self.order.get(self.cursor).copied()
    }

    /// 前进到下一个座位并返回
    pub fn advance(&mut self) -> Option<PlayerId> {
        if self.order.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.order.len();
        self.current()
    }

    /// 某个座位的下家
    pub fn downstream(&self, player: PlayerId) -> Option<PlayerId> {
        let pos = self.position(player)?;
        self.order.get((pos + 1) % self.order.len()).copied()
    }

    /// 跳到指定座位（吃碰杠后由要牌者接着出牌）
    ///
    /// 座位不存在时返回 false 且不移动
    pub fn set_current(&mut self, player: PlayerId) -> bool {
        match self.position(player) {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    /// 从 `player` 的下家开始绕一圈，不包含 `player` 自己
    pub fn others(&self, player: PlayerId) -> impl Iterator<Item = PlayerId> + '_ {
        let start = self.position(player).map_or(0, |p| p + 1);
        let len = self.order.len();
        (0..len.saturating_sub(1)).map(move |i| self.order[(start + i) % len])
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn position(&self, player: PlayerId) -> Option<usize> {
        self.order.iter().position(|p| *p == player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() {
        let mut turns = TurnIterator::new(vec![0, 1, 2, 3]);
        assert_eq!(turns.current(), Some(0));
        assert_eq!(turns.advance(), Some(1));
        assert_eq!(turns.advance(), Some(2));
        assert_eq!(turns.advance(), Some(3));
        assert_eq!(turns.advance(), Some(0));
    }

    #[test]
    fn test_downstream() {
        let turns = TurnIterator::new(vec![2, 0, 3, 1]);
        assert_eq!(turns.downstream(2), Some(0));
        assert_eq!(turns.downstream(1), Some(2));
        assert_eq!(turns.downstream(9), None);
        assert_eq!(turns.others(3).collect::<Vec<_>>(), vec![1, 2, 0]);
    }

    #[test]
    fn test_set_current_and_others() {
        let mut turns = TurnIterator::new(vec![0, 1, 2, 3]);
        assert!(turns.set_current(2));
        assert_eq!(turns.current(), Some(2));
        assert!(!turns.set_current(7));
        assert_eq!(turns.current(), Some(2));

        assert_eq!(turns.others(2).collect::<Vec<_>>(), vec![3, 0, 1]);
    }

    #[test]
    fn test_empty() {
        let mut turns = TurnIterator::new(Vec::new());
        assert_eq!(turns.current(), None);
        assert_eq!(turns.advance(), None);
        assert_eq!(turns.others(0).count(), 0);
    }
}
