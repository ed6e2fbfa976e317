use crate::game::constants::DEAL_SIZE;
use crate::tile::WinRules;
use serde::{Deserialize, Serialize};

/// 对局配置
///
/// 只支持基本型、七对、十三幺三种胡牌型的开关，不涉及计分或地方规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 洗牌种子（None 表示使用系统随机数）
    pub seed: Option<u64>,
    /// 起手牌张数
    pub deal_size: usize,
    /// 胡牌型开关
    pub rules: WinRules,
}

impl GameConfig {
    /// 固定种子的配置（用于复现对局）
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            deal_size: DEAL_SIZE,
            rules: WinRules::default(),
        }
    }
}
