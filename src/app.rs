//! Top-level screen router
//!
//! Menu selects a difficulty, the play session produces final stats once,
//! and the results screen shows them after the high score is written back.

use crate::highscores::SaveData;
use crate::persistence::Storage;
use crate::results::ResultsSummary;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, GameStats, TickInput, tick};
use crate::tuning::DifficultyLevel;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
}

/// Application state shared by every screen
pub struct App {
    pub screen: Screen,
    /// Difficulty highlighted in the menu / used by the current session
    pub selected: DifficultyLevel,
    pub save: SaveData,
    pub settings: Settings,
    /// Active play session, dropped when leaving the play screen
    pub session: Option<GameState>,
    /// Summary of the last finished session
    pub results: Option<ResultsSummary>,
    pub show_instructions: bool,
    storage: Box<dyn Storage>,
}

impl App {
    /// Load saved data and settings from `storage` and open the menu
    pub fn new(storage: Box<dyn Storage>) -> Self {
        let save = SaveData::load(storage.as_ref());
        let settings = Settings::load(storage.as_ref());
        Self {
            screen: Screen::Menu,
            selected: DifficultyLevel::default(),
            save,
            settings,
            session: None,
            results: None,
            show_instructions: false,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Highlight a difficulty in the menu
    pub fn select(&mut self, level: DifficultyLevel) {
        self.selected = level;
    }

    pub fn toggle_instructions(&mut self) {
        self.show_instructions = !self.show_instructions;
    }

    /// Start a new session at `level`
    pub fn start_game(&mut self, level: DifficultyLevel, seed: u64) {
        self.selected = level;
        self.session = Some(GameState::new(level.config(), seed));
        self.results = None;
        self.screen = Screen::Playing;
        log::info!("Starting {} game with seed {}", level.as_str(), seed);
    }

    /// Play again at the same difficulty
    pub fn restart(&mut self, seed: u64) {
        self.start_game(self.selected, seed);
    }

    pub fn main_menu(&mut self) {
        self.session = None;
        self.results = None;
        self.screen = Screen::Menu;
    }

    /// Advance the active session; hands final stats to the results screen
    ///
    /// Returns the session events raised during this step.
    pub fn update(&mut self, input: &TickInput, dt_ms: f64) -> Vec<GameEvent> {
        if self.screen != Screen::Playing {
            return Vec::new();
        }
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        tick(session, input, dt_ms);
        let events = session.drain_events();
        if let Some(stats) = session.take_final_stats() {
            self.finish_game(stats);
        }
        events
    }

    /// Record the final stats and switch to the results screen
    fn finish_game(&mut self, stats: GameStats) {
        let level = self.selected;
        let is_new_high_score = self.save.record(level, stats.score);
        if is_new_high_score {
            log::info!("New {} high score: {}", level.as_str(), stats.score);
            if let Err(e) = self.save.save(self.storage.as_mut()) {
                log::error!("Failed to save high scores: {}", e);
            }
        }

        let high_score = self.save.high_score(level);
        self.results = Some(ResultsSummary::new(level, stats, high_score, is_new_high_score));
        self.session = None;
        self.screen = Screen::GameOver;
    }

    /// Apply a settings change and persist it
    pub fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
        change(&mut self.settings);
        if let Err(e) = self.settings.save(self.storage.as_mut()) {
            log::error!("Failed to save settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::persistence::{MemoryStorage, StorageError};
    use crate::sim::{Problem, insert_problem};

    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("read only".to_string()))
        }
    }

    fn press(app: &mut App, value: u32) -> Vec<GameEvent> {
        app.update(&TickInput { answer: Some(value) }, FRAME_MS)
    }

    /// Score one fast correct answer (15 points), then lose all lives
    fn play_short_game(app: &mut App) {
        if let Some(session) = app.session.as_mut() {
            insert_problem(session, Problem::new(2, 3), 50.0);
        }
        press(app, 6);
        for _ in 0..3 {
            press(app, 1000);
        }
        for _ in 0..60 {
            app.update(&TickInput::default(), FRAME_MS);
        }
    }

    #[test]
    fn test_starts_on_menu_with_zero_scores() {
        let app = App::new(Box::new(MemoryStorage::new()));
        assert_eq!(app.screen, Screen::Menu);
        assert_eq!(app.save, SaveData::default());
        assert!(app.session.is_none());
    }

    #[test]
    fn test_menu_to_results_flow() {
        let mut app = App::new(Box::new(MemoryStorage::new()));
        app.select(DifficultyLevel::Easy);
        app.start_game(app.selected, 1);
        assert_eq!(app.screen, Screen::Playing);

        play_short_game(&mut app);
        assert_eq!(app.screen, Screen::GameOver);
        assert!(app.session.is_none());

        let results = app.results.as_ref().expect("results after game over");
        assert_eq!(results.level, DifficultyLevel::Easy);
        assert_eq!(results.stats.correct_answers, 1);
        assert_eq!(results.stats.lives, 0);
        assert!(results.is_new_high_score);
        assert_eq!(results.high_score, results.stats.score);

        // Written through to storage
        let stored = SaveData::load(app.storage());
        assert_eq!(stored.high_score(DifficultyLevel::Easy), results.stats.score);
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut storage = MemoryStorage::new();
        let mut existing = SaveData::new();
        existing.record(DifficultyLevel::Beginner, 500);
        existing.save(&mut storage).unwrap();

        let mut app = App::new(Box::new(storage));
        app.start_game(DifficultyLevel::Beginner, 2);
        play_short_game(&mut app);

        let results = app.results.as_ref().unwrap();
        assert!(!results.is_new_high_score);
        assert_eq!(results.high_score, 500);
    }

    #[test]
    fn test_zero_score_is_not_a_high_score() {
        let mut app = App::new(Box::new(MemoryStorage::new()));
        app.start_game(DifficultyLevel::Master, 3);
        for _ in 0..3 {
            press(&mut app, 1000);
        }
        for _ in 0..60 {
            app.update(&TickInput::default(), FRAME_MS);
        }
        let results = app.results.as_ref().unwrap();
        assert_eq!(results.stats.score, 0);
        assert!(!results.is_new_high_score);
    }

    #[test]
    fn test_restart_and_menu() {
        let mut app = App::new(Box::new(MemoryStorage::new()));
        app.start_game(DifficultyLevel::Hard, 4);
        play_short_game(&mut app);

        app.restart(5);
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.selected, DifficultyLevel::Hard);
        assert!(app.results.is_none());
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.config.level, DifficultyLevel::Hard);
        assert_eq!(session.stats.score, 0);

        app.main_menu();
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.session.is_none());
        assert!(app.update(&TickInput::default(), FRAME_MS).is_empty());
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        let mut app = App::new(Box::new(ReadOnlyStorage));
        app.start_game(DifficultyLevel::Beginner, 6);
        play_short_game(&mut app);

        assert_eq!(app.screen, Screen::GameOver);
        assert!(app.results.as_ref().unwrap().is_new_high_score);
        assert_eq!(app.save.high_score(DifficultyLevel::Beginner), 15);

        app.update_settings(|s| s.muted = true);
        assert!(app.settings.muted);
    }
}
