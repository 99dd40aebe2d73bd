//! The data directory shipped with the client must always load.

use std::path::PathBuf;

use delver_content::ContentFactory;
use delver_core::state::RoomKind;
use delver_core::{GameConfig, Position};

fn factory() -> ContentFactory {
    let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data");
    ContentFactory::new(data)
}

#[test]
fn shipped_config_matches_defaults() {
    let config = factory().load_config().expect("config.toml should parse");
    assert_eq!(config, GameConfig::default());
}

#[test]
fn closet_level_loads() {
    let state = factory()
        .load_level("closet")
        .and_then(|spec| spec.into_state(7))
        .expect("closet should load");

    assert_eq!(state.actor.position, Position::new(3, 3));
    assert!(state.level.in_room_of(Position::new(30, 10), RoomKind::Shop));
    assert!(state.level.has_boulder(Position::new(31, 6)));
}

#[test]
fn sokoban_level_loads() {
    let state = factory()
        .load_level("sokoban")
        .and_then(|spec| spec.into_state(7))
        .expect("sokoban should load");

    assert!(state.level.is_sokoban());
    assert_eq!(state.actor.position, Position::new(1, 1));
}
