// tests/mode_cycle.rs
mod common;

use common::setup;
use sign_hand::{
    Command, GameState, HandConfig, JointVector, LoopInputs, Mode, PoseTable, Profile,
};
use std::time::{Duration, Instant};

#[test]
fn three_toggles_return_to_spelling() {
    let mut hand = setup(HandConfig::default());
    assert_eq!(hand.mode(), Mode::Spelling);

    hand.on_mode_toggle();
    assert_eq!(hand.mode(), Mode::Mirror);
    hand.on_mode_toggle();
    assert_eq!(hand.mode(), Mode::Game);
    hand.on_mode_toggle();
    assert_eq!(hand.mode(), Mode::Spelling);

    assert_eq!(hand.display().echoes, vec!["Mirror", "Game", "ASL"]);
}

#[test]
fn entering_game_zeroes_the_score() {
    let now = Instant::now();
    let mut hand = setup(HandConfig::default());
    hand.on_mode_toggle();
    hand.on_mode_toggle();
    hand.dispatch("SCORE:2,1", now);
    assert_eq!(hand.game_state(), GameState::new(2, 1));

    // Leaving game keeps the score; coming back clears it.
    hand.on_mode_toggle();
    assert_eq!(hand.game_state(), GameState::new(2, 1));
    hand.on_mode_toggle();
    hand.on_mode_toggle();
    assert_eq!(hand.mode(), Mode::Game);
    assert_eq!(hand.game_state(), GameState::default());
    assert_eq!(hand.display().last(), ["Mode: Game", "You: 0  Hand: 0"]);
}

#[test]
fn spelling_applies_letter_poses_in_order() {
    let now = Instant::now();
    let mut hand = setup(HandConfig::default());
    let table = PoseTable::builtin(Profile::SevenAxis).unwrap();

    let cmds = hand.dispatch("HI\n", now);
    assert_eq!(cmds, vec![Command::Letter('H'), Command::Letter('I')]);

    let applied = &hand.actuator().applied;
    assert_eq!(applied.len(), 2);
    assert_eq!(&applied[0], table.lookup_letter('H').unwrap());
    assert_eq!(&applied[1], table.lookup_letter('I').unwrap());
    assert_eq!(hand.display().last(), ["Mode: ASL", "Letter: I"]);
}

#[test]
fn letter_lookup_is_deterministic() {
    let table = PoseTable::builtin(Profile::SevenAxis).unwrap();
    for c in 'A'..='Z' {
        let first = table.lookup_letter(c).cloned();
        assert!(first.is_some(), "{c}");
        assert_eq!(table.lookup_letter(c).cloned(), first);
    }
}

#[test]
fn mirror_mode_applies_whole_vectors_only() {
    let now = Instant::now();
    let mut hand = setup(HandConfig::default());
    hand.on_mode_toggle();

    hand.dispatch("90 0 90 90 90 90 90", now);
    let expected = JointVector::new([90, 0, 90, 90, 90, 90, 90]);
    assert_eq!(hand.last_pose(), Some(&expected));

    let cmds = hand.dispatch("10 20 30 40 50 60", now);
    assert!(cmds[0].is_invalid());
    assert_eq!(hand.last_pose(), Some(&expected));
    assert_eq!(hand.actuator().applied.len(), 1);
}

#[test]
fn six_axis_profile_mirrors_six_angles() {
    let now = Instant::now();
    let config = HandConfig {
        profile: Profile::SixAxis,
        ..HandConfig::default()
    };
    let mut hand = setup(config);
    hand.on_mode_toggle();

    hand.dispatch("0,180,180,0,0,90", now);
    assert_eq!(
        hand.last_pose(),
        Some(&JointVector::new([0, 180, 180, 0, 0, 90]))
    );
}

#[test]
fn serial_mode_words_select_modes() {
    let now = Instant::now();
    let mut hand = setup(HandConfig::default());

    // Spelling mode only switches on the prefixed form
    hand.dispatch("MODE:MIRROR\n", now);
    assert_eq!(hand.mode(), Mode::Mirror);
    hand.dispatch("game", now);
    assert_eq!(hand.mode(), Mode::Game);
    hand.dispatch("ASL", now);
    assert_eq!(hand.mode(), Mode::Spelling);
    hand.dispatch("MODE:game", now);
    assert_eq!(hand.mode(), Mode::Game);
    assert!(hand.actuator().applied.is_empty());
}

#[test]
fn spelled_mode_words_are_spelled() {
    let now = Instant::now();
    let table = PoseTable::builtin(Profile::SevenAxis).unwrap();
    let mut hand = setup(HandConfig::default());

    let cmds = hand.dispatch("GAME\n", now);
    assert_eq!(
        cmds,
        vec![
            Command::Letter('G'),
            Command::Letter('A'),
            Command::Letter('M'),
            Command::Letter('E'),
        ]
    );
    assert_eq!(hand.mode(), Mode::Spelling);
    assert_eq!(hand.actuator().applied.len(), 4);
    assert_eq!(&hand.actuator().applied[3], table.lookup_letter('E').unwrap());

    hand.dispatch("ASL", now);
    assert_eq!(hand.mode(), Mode::Spelling);
    assert_eq!(hand.actuator().applied.len(), 7);
    assert_eq!(hand.display().last(), ["Mode: ASL", "Letter: L"]);
}

#[test]
fn serial_mode_words_can_be_disabled() {
    let now = Instant::now();
    let config = HandConfig {
        serial_mode_select: false,
        ..HandConfig::default()
    };
    let mut hand = setup(config);
    hand.on_mode_toggle();

    let cmds = hand.dispatch("GAME", now);
    assert!(cmds[0].is_invalid());
    assert_eq!(hand.mode(), Mode::Mirror);

    let cmds = hand.dispatch("MODE:GAME", now);
    assert!(cmds[0].is_invalid());
    assert_eq!(hand.mode(), Mode::Mirror);
    assert!(hand.actuator().applied.is_empty());
}

#[test]
fn poll_debounces_the_mode_button() {
    let t0 = Instant::now();
    let mut hand = setup(HandConfig::default());
    let pressed = LoopInputs {
        mode_pressed: true,
        ..LoopInputs::default()
    };
    let released = LoopInputs::default();

    hand.poll(&pressed, t0);
    hand.poll(&released, t0 + Duration::from_millis(30));
    hand.poll(&pressed, t0 + Duration::from_millis(60));
    assert_eq!(hand.mode(), Mode::Mirror);

    hand.poll(&released, t0 + Duration::from_millis(600));
    hand.poll(&pressed, t0 + Duration::from_millis(700));
    assert_eq!(hand.mode(), Mode::Game);
}

#[test]
fn reset_button_only_counts_in_game_mode() {
    let t0 = Instant::now();
    let mut hand = setup(HandConfig::default());
    let reset = LoopInputs {
        reset_pressed: true,
        ..LoopInputs::default()
    };

    hand.poll(&reset, t0);
    assert_eq!(hand.mode(), Mode::Spelling);

    hand.on_mode_toggle();
    hand.on_mode_toggle();
    hand.dispatch("SCORE:1,2", t0);
    hand.poll(&LoopInputs::default(), t0 + Duration::from_millis(10));
    hand.poll(&reset, t0 + Duration::from_millis(20));
    assert_eq!(hand.game_state(), GameState::default());
}
