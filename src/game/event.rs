use crate::tile::Tile;

/// 摸牌事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDrawn {
    pub player_name: String,
    pub tile: Tile,
}

/// 摸牌事件监听器
pub trait TileDrawnListener {
    fn on_tile_drawn(&mut self, event: &TileDrawn);
}

impl<F> TileDrawnListener for F
where
    F: FnMut(&TileDrawn),
{
    fn on_tile_drawn(&mut self, event: &TileDrawn) {
        self(event)
    }
}

/// 事件总线
///
/// 由一局游戏持有，只能追加订阅。事件同步地按订阅顺序分发。
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn TileDrawnListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: TileDrawnListener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&mut self, event: &TileDrawn) {
        for listener in &mut self.listeners {
            listener.on_tile_drawn(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
