/// 游戏逻辑模块
///
/// 包含玩家、吃碰杠判定、听牌、弃牌堆、座位轮转和对局编排

pub mod action;
pub mod agent;
pub mod claim;
pub mod config;
pub mod constants;
pub mod event;
pub mod game_engine;
pub mod meld;
pub mod pile;
pub mod player;
pub mod ready;
pub mod state;
pub mod turn;
