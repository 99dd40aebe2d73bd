//! ASCII view of what the actor remembers.
use delver_core::state::{Glyph, RememberedObject, TileMemory};
use delver_core::{GameState, Position};

fn glyph_char(glyph: Glyph) -> char {
    match glyph {
        Glyph::Unexplored | Glyph::Stone => ' ',
        Glyph::Wall => '#',
        Glyph::Tree => 'T',
        Glyph::Room => '.',
        Glyph::Corridor => ':',
        Glyph::Doorway | Glyph::BrokenDoor => '.',
        Glyph::OpenDoor => '\'',
        Glyph::ClosedDoor => '+',
        Glyph::IronBars => 'X',
        Glyph::Pool => '}',
        Glyph::Lava => '~',
        Glyph::Swamp => '=',
        Glyph::StairsUp | Glyph::LadderUp => '<',
        Glyph::StairsDown | Glyph::LadderDown => '>',
        Glyph::Altar => '_',
        Glyph::Fountain => '{',
        Glyph::Sink => 'K',
        Glyph::Throne => '\\',
        Glyph::Grave => '|',
    }
}

fn memory_char(memory: &TileMemory) -> char {
    match memory.object {
        Some(RememberedObject::Boulder) => return '0',
        Some(RememberedObject::Statue { .. }) => return '\'',
        Some(RememberedObject::Item) => return '*',
        None => {}
    }
    if memory.trap.is_some() {
        return '^';
    }
    glyph_char(memory.glyph)
}

/// Remembered map, one line per row, with the actor and visible monsters
/// drawn over it.
pub fn render_memory(state: &GameState) -> String {
    let dimensions = state.level.dimensions();
    let mut out = String::with_capacity((dimensions.width as usize + 1) * dimensions.height as usize);
    for y in 0..dimensions.height as i32 {
        for x in 0..dimensions.width as i32 {
            let at = Position::new(x, y);
            let ch = if at == state.actor.position {
                '@'
            } else if state
                .level
                .monster_at(at)
                .is_some_and(|monster| monster.is_apparent())
            {
                'm'
            } else {
                state
                    .level
                    .tile(at)
                    .map(|tile| memory_char(&tile.memory))
                    .unwrap_or(' ')
            };
            out.push(ch);
        }
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }
    out
}
