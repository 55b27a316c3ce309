use super::*;
use crate::audio::testing::{Call, FakeEngine};
use crate::audio::{EngineEvent, EngineState, MediaStatus};
use crate::library::ScanOutcome;
use crate::playback::{PlaybackController, PlaybackStatus, RepeatMode};
use std::path::{Path, PathBuf};

fn outcome(paths: &[&str]) -> ScanOutcome {
    ScanOutcome {
        root: PathBuf::from("/music"),
        files: paths.iter().map(PathBuf::from).collect(),
        errors: Vec::new(),
    }
}

fn app_with(paths: &[&str]) -> App<FakeEngine> {
    let mut app = App::new(PlaybackController::new(FakeEngine::default(), 100)).with_seed(1);
    app.apply_scan(&outcome(paths));
    app
}

fn abc() -> App<FakeEngine> {
    app_with(&["/music/c.mp3", "/music/a.mp3", "/music/b.mp3"])
}

fn current(app: &App<FakeEngine>) -> Option<&Path> {
    app.player.state().current_file.as_deref()
}

/// Deliver `status` for the track the controller is on.
fn report(app: &mut App<FakeEngine>, status: MediaStatus) {
    let source = app.player.state().current_file.clone().unwrap();
    app.handle_engine_event(EngineEvent::StatusChanged { source, status });
}

#[test]
fn scan_results_are_sorted_and_visible() {
    let app = abc();
    assert_eq!(app.catalog().len(), 3);
    assert_eq!(app.visible(), &[0, 1, 2]);
    assert_eq!(app.catalog().get(0).unwrap().title, "a");
    assert_eq!(app.status_message.as_deref(), Some("/music: 3 new tracks"));
}

#[test]
fn query_filters_and_clears_hidden_selection() {
    let mut app = app_with(&["/music/Blue_Monday.mp3", "/music/Red-Rain.flac"]);
    app.select_last();
    assert_eq!(app.selected_track().unwrap().title, "Red-Rain");

    app.set_query("blue");
    assert_eq!(app.visible(), &[0]);
    assert_eq!(app.selected(), None);

    app.clear_query();
    assert_eq!(app.visible().len(), 2);
}

#[test]
fn typing_query_refilters_per_keystroke() {
    let mut app = app_with(&["/music/alpha.mp3", "/music/beta.mp3"]);
    app.push_query_char('b');
    app.push_query_char('e');
    assert_eq!(app.visible(), &[1]);
    assert_eq!(app.query(), "be");
    app.pop_query_char();
    app.pop_query_char();
    assert_eq!(app.visible().len(), 2);
}

#[test]
fn selection_survives_resort_after_new_scan() {
    let mut app = app_with(&["/music/m.mp3"]);
    app.select_first();
    app.apply_scan(&outcome(&["/music/a.mp3"]));

    assert_eq!(app.selected_track().unwrap().title, "m");
    assert_eq!(app.selected_row(), Some(1));
}

#[test]
fn selection_moves_within_bounds() {
    let mut app = abc();
    app.select_next();
    assert_eq!(app.selected_row(), Some(0));
    app.select_next();
    app.select_next();
    app.select_next();
    assert_eq!(app.selected_row(), Some(2));
    app.select_prev();
    assert_eq!(app.selected_row(), Some(1));
    app.select_first();
    app.select_prev();
    assert_eq!(app.selected_row(), Some(0));
}

#[test]
fn selecting_previews_track_while_stopped() {
    let mut app = abc();
    app.select_last();
    assert_eq!(app.player.now_playing().title, "c");
    assert_eq!(app.player.now_playing().location, "/music");
}

#[test]
fn play_pause_with_nothing_selected_plays_first_visible() {
    let mut app = abc();
    app.toggle_play_pause();
    assert_eq!(current(&app), Some(Path::new("/music/a.mp3")));
    assert_eq!(app.selected_row(), Some(0));
}

#[test]
fn play_next_moves_down_and_wraps_with_repeat_all() {
    let mut app = abc();
    app.select_last();
    assert!(app.play_selected());

    assert!(!app.play_next());
    assert_eq!(current(&app), Some(Path::new("/music/c.mp3")));

    app.player.set_repeat(RepeatMode::All);
    assert!(app.play_next());
    assert_eq!(current(&app), Some(Path::new("/music/a.mp3")));
    assert_eq!(app.selected_row(), Some(0));
}

#[test]
fn play_previous_uses_history_then_rows() {
    let mut app = abc();
    app.select_first();
    app.play_selected();
    app.play_next();
    app.play_next();
    assert_eq!(current(&app), Some(Path::new("/music/c.mp3")));

    assert!(app.play_previous());
    assert_eq!(current(&app), Some(Path::new("/music/b.mp3")));
    assert!(app.play_previous());
    assert_eq!(current(&app), Some(Path::new("/music/a.mp3")));
    assert_eq!(app.player.history().len(), 1);

    // History exhausted; row 0 has nothing above it.
    assert!(!app.play_previous());
    app.player.set_repeat(RepeatMode::All);
    assert!(app.play_previous());
    assert_eq!(current(&app), Some(Path::new("/music/c.mp3")));
}

#[test]
fn navigation_is_a_no_op_on_empty_view() {
    let mut app = abc();
    app.set_query("zzz");
    assert!(!app.play_next());
    assert!(!app.play_previous());
    assert!(!app.play_selected());
    assert!(app.player.engine().calls.is_empty());
}

#[test]
fn current_file_survives_being_filtered_out() {
    let mut app = abc();
    app.select_first();
    app.play_selected();
    app.set_query("b");

    assert_eq!(current(&app), Some(Path::new("/music/a.mp3")));
    assert_eq!(app.selected(), None);

    // Not visible: the next row counts from the top.
    app.play_next();
    assert_eq!(current(&app), Some(Path::new("/music/b.mp3")));
}

#[test]
fn end_of_media_advances_or_repeats() {
    let mut app = abc();
    app.select_first();
    app.play_selected();

    app.handle_engine_event(EngineEvent::StateChanged(EngineState::Stopped));
    report(&mut app, MediaStatus::EndOfMedia);
    assert_eq!(current(&app), Some(Path::new("/music/b.mp3")));

    app.player.set_repeat(RepeatMode::One);
    report(&mut app, MediaStatus::EndOfMedia);
    assert_eq!(current(&app), Some(Path::new("/music/b.mp3")));
    assert_eq!(app.player.engine().loaded().len(), 3);
    assert_eq!(app.player.history().len(), 2);
}

#[test]
fn end_of_last_track_stops_with_repeat_off() {
    let mut app = abc();
    app.select_last();
    app.play_selected();
    let loads = app.player.engine().loaded().len();

    app.handle_engine_event(EngineEvent::StateChanged(EngineState::Stopped));
    report(&mut app, MediaStatus::EndOfMedia);

    assert_eq!(app.player.engine().loaded().len(), loads);
    assert_eq!(app.player.state().status, PlaybackStatus::Stopped);
}

#[test]
fn load_failures_advance_but_give_up_after_whole_view() {
    let mut app = abc();
    app.player.set_repeat(RepeatMode::All);
    app.select_first();
    app.play_selected();

    let fail = || MediaStatus::Invalid("bad file".into());
    report(&mut app, fail());
    assert_eq!(current(&app), Some(Path::new("/music/b.mp3")));
    report(&mut app, fail());
    assert_eq!(current(&app), Some(Path::new("/music/c.mp3")));
    report(&mut app, fail());
    assert_eq!(current(&app), Some(Path::new("/music/c.mp3")));
    assert_eq!(app.player.state().status, PlaybackStatus::Stopped);

    // A successful load resets the count.
    report(&mut app, MediaStatus::Loaded);
    report(&mut app, fail());
    assert_eq!(current(&app), Some(Path::new("/music/a.mp3")));
}

#[test]
fn status_for_a_replaced_track_is_ignored() {
    let mut app = abc();
    app.select_first();
    app.play_selected();
    // The user skips ahead before the end of `a` is handled.
    app.play_next();
    let loads = app.player.engine().loaded().len();

    let stale = |status| EngineEvent::StatusChanged {
        source: PathBuf::from("/music/a.mp3"),
        status,
    };
    app.handle_engine_event(stale(MediaStatus::EndOfMedia));
    assert_eq!(current(&app), Some(Path::new("/music/b.mp3")));

    app.player.set_repeat(RepeatMode::One);
    app.handle_engine_event(stale(MediaStatus::EndOfMedia));
    app.handle_engine_event(stale(MediaStatus::Invalid("gone".into())));
    assert_eq!(app.player.engine().loaded().len(), loads);
    assert!(app.player.is_playing());
}

#[test]
fn failed_only_track_stays_idle_and_play_pause_retries_it() {
    let mut app = app_with(&["/music/only.mp3"]);
    app.select_first();
    app.play_selected();
    report(&mut app, MediaStatus::Invalid("no such file".into()));
    assert_eq!(app.player.state().status, PlaybackStatus::Stopped);
    assert_eq!(app.player.engine().loaded().len(), 1);

    app.toggle_play_pause();
    assert_eq!(app.player.engine().loaded().len(), 2);
    report(&mut app, MediaStatus::Invalid("no such file".into()));
    assert_eq!(app.player.state().status, PlaybackStatus::Stopped);
    assert!(app.player.now_playing().location.contains("no such file"));
}

#[test]
fn engine_progress_reaches_controller() {
    let mut app = abc();
    app.toggle_play_pause();
    app.handle_engine_event(EngineEvent::DurationChanged(std::time::Duration::from_secs(100)));
    app.handle_engine_event(EngineEvent::PositionChanged(std::time::Duration::from_secs(50)));
    assert_eq!(app.player.seek_bar().value(), 500);
    assert_eq!(app.player.time_label(), "00:50 / 01:40");
}

#[test]
fn shuffle_next_stays_within_visible_rows() {
    let mut app = abc();
    app.player.toggle_shuffle();
    for _ in 0..20 {
        assert!(app.play_next());
    }
    let played = app.player.engine().loaded();
    assert_eq!(played.len(), 20);
    assert!(played.iter().all(|p| app.catalog().contains(p)));
    assert!(!app.player.engine().calls.contains(&Call::Stop));
}

#[test]
fn folder_input_expands_home_and_resets_mode() {
    let mut app = abc();
    app.enter_add_folder();
    assert_eq!(app.mode, InputMode::AddFolder);
    app.folder_input.push_str("  /srv/music  ");
    assert_eq!(app.take_folder_input(), Some(PathBuf::from("/srv/music")));
    assert_eq!(app.mode, InputMode::Normal);

    app.enter_add_folder();
    assert_eq!(app.take_folder_input(), None);

    if let Some(home) = dirs::home_dir() {
        app.enter_add_folder();
        app.folder_input.push_str("~/Music");
        assert_eq!(app.take_folder_input(), Some(home.join("Music")));
    }
}
