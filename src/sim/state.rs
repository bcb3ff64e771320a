//! Run state
//!
//! One `RunState` owns every piece of a run: player, stats, score, scenery,
//! timers and the seeded RNG. A new run is a new `RunState`.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::player::Player;
use super::score::Score;
use super::stats::{HitEffect, PlayerStats};
use super::stream::SceneryStream;
use super::timer::{TimedEvent, TimerQueue};
use crate::consts::PREPOPULATE_SEGMENTS;
use crate::tuning::Tuning;

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Died,
    Finished,
}

/// Notifications for the host (UI bars, text, animator, scene loader)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RiskChanged(f32),
    HealthChanged(f32),
    ScoreChanged(f32),
    LaneChanged(i32),
    PlayerLanded,
    PlayerDied,
    FinishReached,
    ShowFailureScreen,
    ShowQuiz,
    SceneRequested(String),
}

/// Values for the HUD and animator, read once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    /// Health bar fill [0, 1]
    pub health_fill: f32,
    /// Risk bar fill [0, 1]
    pub risk_fill: f32,
    pub score_text: String,
    /// Animator walk speed
    pub walk_speed: f32,
    pub is_dead: bool,
    pub has_won: bool,
    pub failure_screen_visible: bool,
    pub quiz_visible: bool,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct RunState {
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub player: Player,
    pub stats: PlayerStats,
    pub score: Score,
    pub stream: SceneryStream,
    pub timers: TimerQueue,
    /// Current scroll speed
    pub speed: f32,
    /// Current spawn chance for new segments
    pub spawn_chance: f32,
    /// Speed to restore on resume
    saved_speed: f32,
    paused: bool,
    game_over: bool,
    pub outcome: Option<RunOutcome>,
    pub failure_screen_visible: bool,
    pub quiz_visible: bool,
    /// Frames ticked so far
    pub frame: u64,
    events: Vec<GameEvent>,
}

impl RunState {
    /// Build a run, lay out the opening track and wait paused for `resume`
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let stats = PlayerStats::new(tuning.risk_increase_factor, tuning.death_rule);
        let stream = SceneryStream::new(&tuning.stream);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(Vec3::ZERO),
            stats,
            score: Score::new(),
            stream,
            timers: TimerQueue::new(),
            speed: 0.0,
            spawn_chance: 0.0,
            saved_speed: 0.0,
            paused: false,
            game_over: false,
            outcome: None,
            failure_screen_visible: false,
            quiz_visible: false,
            frame: 0,
            events: Vec::new(),
            tuning,
        };

        state.update_difficulty();
        state
            .stream
            .start(PREPOPULATE_SEGMENTS, state.spawn_chance, &mut state.rng);
        state.pause();

        log::info!(
            "Run started with seed {}: {} segments, {:.1} units of track ahead",
            seed,
            state.stream.len(),
            state.stream.distance_spawned()
        );
        state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Stop scrolling, remembering the current speed
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.saved_speed = self.speed;
        self.speed = 0.0;
        self.paused = true;
    }

    /// Restore exactly the speed saved by `pause`
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.speed = self.saved_speed;
        self.paused = false;
    }

    /// Recompute speed and spawn chance from risk (frozen while paused or over)
    pub fn update_difficulty(&mut self) {
        if self.game_over || self.paused {
            return;
        }
        let difficulty = self.tuning.difficulty.evaluate(self.stats.risk());
        self.speed = difficulty.speed;
        self.spawn_chance = difficulty.spawn_chance;
    }

    /// Apply a spawnable hit to the stats and start the death sequence if it killed
    pub fn apply_hit(&mut self, effect: HitEffect) {
        let change = self.stats.apply(effect, &self.tuning.difficulty);
        if change.risk_changed {
            self.events.push(GameEvent::RiskChanged(self.stats.risk()));
        }
        if change.health_changed {
            self.events.push(GameEvent::HealthChanged(self.stats.health()));
        }
        if change.died {
            self.on_player_death();
        }
    }

    fn end_run(&mut self, outcome: RunOutcome) -> bool {
        if self.game_over {
            return false;
        }
        self.speed = 0.0;
        self.game_over = true;
        self.outcome = Some(outcome);
        true
    }

    /// One-shot death sequence
    pub fn on_player_death(&mut self) {
        if !self.end_run(RunOutcome::Died) {
            return;
        }
        self.player.on_death();
        self.timers.schedule(
            self.tuning.timing.failure_screen_delay,
            TimedEvent::RevealFailureScreen,
        );
        self.events.push(GameEvent::PlayerDied);
        log::info!(
            "Player died at risk {:.2} after {:.1} units",
            self.stats.risk(),
            self.stream.distance_walked()
        );
    }

    /// One-shot finish sequence
    pub fn on_reached_finish_line(&mut self) {
        if !self.end_run(RunOutcome::Finished) {
            return;
        }
        self.player.on_finish_line();
        self.timers
            .schedule(self.tuning.timing.quiz_delay, TimedEvent::StartQuiz);
        self.events.push(GameEvent::FinishReached);
        log::info!(
            "Finish line reached with score {} after {:.1} units",
            self.score.display(),
            self.stream.distance_walked()
        );
    }

    /// Handle a timer that came due
    pub(crate) fn fire(&mut self, event: TimedEvent) {
        match event {
            TimedEvent::RevealFailureScreen => {
                self.failure_screen_visible = true;
                self.events.push(GameEvent::ShowFailureScreen);
            }
            TimedEvent::StartQuiz => {
                self.quiz_visible = true;
                self.events.push(GameEvent::ShowQuiz);
            }
        }
    }

    /// Pay distance score for the units walked so far
    pub(crate) fn award_distance_score(&mut self) {
        let rate = self.tuning.difficulty.score_rate(self.stats.risk());
        if self.score.award_distance(self.stream.distance_walked(), rate) > 0 {
            self.events.push(GameEvent::ScoreChanged(self.score.value()));
        }
    }

    /// Quiz interlude: add bonus / divisor for a correct answer
    pub fn answer_correct(&mut self, divisor: f32) {
        if self
            .score
            .award_correct_answer(self.tuning.correct_answer_bonus, divisor)
        {
            self.events.push(GameEvent::ScoreChanged(self.score.value()));
        }
    }

    /// The quiz is done; ask the host for the next scene
    pub fn quiz_finished(&mut self) {
        self.quiz_visible = false;
        let scene = self.tuning.scenes.after_quiz.clone();
        self.request_scene(scene);
    }

    /// The failure screen was dismissed; ask the host for the retry scene
    pub fn failure_acknowledged(&mut self) {
        self.failure_screen_visible = false;
        let scene = self.tuning.scenes.after_failure.clone();
        self.request_scene(scene);
    }

    pub fn request_scene(&mut self, name: impl Into<String>) {
        let name = name.into();
        log::info!("Scene requested: {}", name);
        self.events.push(GameEvent::SceneRequested(name));
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            health_fill: self.stats.health().clamp(0.0, 1.0),
            risk_fill: self.stats.risk_fraction(),
            score_text: self.score.display(),
            walk_speed: Player::walk_speed(self.speed, self.paused),
            is_dead: self.player.is_dead(),
            has_won: self.player.has_won(),
            failure_screen_visible: self.failure_screen_visible,
            quiz_visible: self.quiz_visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_starts_paused_with_track() {
        let state = RunState::new(Tuning::default(), 1);
        assert!(state.is_paused());
        assert_eq!(state.speed, 0.0);
        assert_eq!(state.stream.len(), 1 + PREPOPULATE_SEGMENTS);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_resume_restores_speed_exactly() {
        let mut state = RunState::new(Tuning::default(), 2);
        state.resume();
        let speed = state.speed;
        assert_eq!(speed, Tuning::default().difficulty.speed.evaluate(0.0));

        state.pause();
        assert_eq!(state.speed, 0.0);
        state.pause();
        state.resume();
        assert_eq!(state.speed, speed);
    }

    #[test]
    fn test_death_is_one_shot() {
        let mut state = RunState::new(Tuning::default(), 3);
        state.resume();
        state.apply_hit(HitEffect::RaiseRisk { weight: 10.0 });
        state.apply_hit(HitEffect::RaiseRisk { weight: 10.0 });
        state.on_player_death();

        let events = state.drain_events();
        let deaths = events.iter().filter(|e| **e == GameEvent::PlayerDied).count();
        assert_eq!(deaths, 1);
        assert_eq!(state.timers.len(), 1);
        assert_eq!(state.speed, 0.0);
        assert_eq!(state.outcome, Some(RunOutcome::Died));
        assert!(state.hud().is_dead);
    }

    #[test]
    fn test_finish_after_death_is_ignored() {
        let mut state = RunState::new(Tuning::default(), 4);
        state.on_player_death();
        state.on_reached_finish_line();
        assert_eq!(state.outcome, Some(RunOutcome::Died));
        assert!(!state.player.has_won());
    }

    #[test]
    fn test_correct_answer_emits_score() {
        let mut state = RunState::new(Tuning::default(), 5);
        state.answer_correct(2.0);
        assert_eq!(state.score.value(), 125.0);
        assert_eq!(state.drain_events(), vec![GameEvent::ScoreChanged(125.0)]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_quiz_finish_requests_scene() {
        let mut state = RunState::new(Tuning::default(), 6);
        state.quiz_visible = true;
        state.quiz_finished();
        assert!(!state.quiz_visible);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::SceneRequested("Level1".to_string())]
        );
    }

    #[test]
    fn test_hud_reflects_stats() {
        let mut state = RunState::new(Tuning::default(), 7);
        state.apply_hit(HitEffect::RaiseRisk { weight: 1.0 });
        let hud = state.hud();
        assert!((hud.risk_fill - 0.25).abs() < 1e-6);
        assert!((hud.health_fill - 0.75).abs() < 1e-6);
        assert_eq!(hud.walk_speed, 0.0);
        assert_eq!(hud.score_text, "0");
    }
}
