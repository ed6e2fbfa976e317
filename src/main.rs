/// 可执行文件入口（用于测试和调试）

use mahjong_engine::{GameConfig, GameEngine, GameOutcome, PlayerAgent, SimpleAgent, TileDrawn};
use std::cell::Cell;
use std::rc::Rc;

fn main() {
    println!("四人麻将规则引擎测试");

    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let agents: Vec<Box<dyn PlayerAgent>> = (0..4).map(|_| Box::new(SimpleAgent::new()) as Box<dyn PlayerAgent>).collect();

    let mut engine = match GameEngine::new(GameConfig::seeded(seed), agents) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("创建对局失败：{}", e);
            return;
        }
    };

    let draws = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&draws);
    engine.subscribe(move |_: &TileDrawn| counter.set(counter.get() + 1));

    engine.deal_starting_tiles();
    println!("种子 {}，发牌后牌墙剩余：{} 张", seed, engine.wall().remaining_count());

    let outcome = match engine.run() {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("对局出错：{}", e);
            return;
        }
    };

    match outcome {
        GameOutcome::Won { winner, discarder: Some(from), tile } => {
            println!("玩家 {} 胡 {}，玩家 {} 点炮", winner, tile, from);
        }
        GameOutcome::Won { winner, discarder: None, tile } => {
            println!("玩家 {} 自摸 {}", winner, tile);
        }
        GameOutcome::Exhausted => println!("流局"),
    }
    println!("共摸牌 {} 次，牌墙剩余 {} 张", draws.get(), engine.wall().remaining_count());

    for player in engine.players() {
        print!("{}：", player.name());
        for meld in player.melds() {
            print!("[");
            for tile in meld.tiles() {
                print!("{}", tile);
            }
            print!("] ");
        }
        for tile in player.hand() {
            print!("{} ", tile);
        }
        println!();
    }
}
