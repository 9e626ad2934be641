//! Round state machine
//!
//! Owns every piece of engine state and is the only entry point for input,
//! ticks and collisions. One instance is constructed explicitly per game and
//! passed around; nothing here is global.

use glam::Vec2;

use super::merge::MergeEngine;
use super::monitor::{GameOverMonitor, Watch};
use super::physics::{CollisionPair, ObjectHandle, PhysicsAdapter};
use super::spawn::SpawnController;
use super::state::{GameEvent, Hud, RoundPhase};
use super::tags::TierTags;
use super::tiers::spec_of;
use crate::error::Result;
use crate::highscores::ScoreLedger;
use crate::persistence::HighScoreStore;
use crate::settings::Settings;

pub struct Round<P, S> {
    settings: Settings,
    physics: P,
    store: S,
    tags: TierTags,
    ledger: ScoreLedger,
    spawn: SpawnController,
    merge: MergeEngine,
    monitor: GameOverMonitor,
    phase: RoundPhase,
    /// Last known pointer x, for the preview circle
    pointer_x: f32,
    /// Whether the last finished round set a new high score
    new_high_score: bool,
    /// Events since the last drain
    events: Vec<GameEvent>,
}

impl<P: PhysicsAdapter, S: HighScoreStore> Round<P, S> {
    /// Build a round and start playing. Reads the high score once.
    pub fn new(settings: Settings, physics: P, store: S) -> Result<Self> {
        settings.validate()?;
        let seed = settings.resolve_seed();
        log::info!("Starting with spawn seed {}", seed);

        let ledger = ScoreLedger::load(&store);
        let spawn = SpawnController::new(
            seed,
            settings.container_left,
            settings.container_right,
            settings.preview_y,
        );
        let monitor = GameOverMonitor::new(settings.ceiling_y, settings.game_over_delay_ms);
        let pointer_x = (settings.container_left + settings.container_right) * 0.5;

        let mut round = Self {
            settings,
            physics,
            store,
            tags: TierTags::new(),
            ledger,
            spawn,
            merge: MergeEngine::new(),
            monitor,
            phase: RoundPhase::Playing,
            pointer_x,
            new_high_score: false,
            events: Vec::new(),
        };
        round.reset();
        Ok(round)
    }

    /// Clear the board and start a fresh round
    pub fn reset(&mut self) {
        self.tags.clear(&mut self.physics);
        self.merge.clear();
        // Contacts reported for bodies that no longer exist
        self.physics.drain_collisions();
        self.physics.configure_bounds(&self.settings.bounds());

        self.ledger.reset();
        self.monitor.reset();
        self.spawn.pick_next();
        self.phase = RoundPhase::Playing;
        self.new_high_score = false;

        self.events.push(GameEvent::Reset);
        log::info!(
            "Round reset (high score {}, first tier {})",
            self.ledger.high(),
            self.spawn.current_tier()
        );
    }

    /// Drop the current tier at `x`. Ignored unless playing.
    pub fn handle_drop(&mut self, x: f32) -> Result<Option<ObjectHandle>> {
        if self.phase != RoundPhase::Playing {
            return Ok(None);
        }

        let tier = self.spawn.current_tier();
        let drop_x = self.spawn.clamped_x(x)?;
        let handle = self
            .tags
            .spawn(&mut self.physics, Vec2::new(drop_x, self.settings.drop_y), tier)?;
        self.spawn.pick_next();

        self.events.push(GameEvent::Dropped {
            handle,
            tier,
            x: drop_x,
        });
        log::debug!("Dropped tier {} at x={} as {:?}", tier, drop_x, handle);
        Ok(Some(handle))
    }

    /// Queue fusions for reported contacts. Returns how many were queued.
    pub fn on_collisions(&mut self, pairs: impl IntoIterator<Item = CollisionPair>) -> usize {
        if self.phase != RoundPhase::Playing {
            return 0;
        }
        pairs
            .into_iter()
            .filter(|&pair| self.merge.on_collision(pair, &self.tags))
            .count()
    }

    /// Advance one frame: step physics, apply fusions, check the ceiling.
    pub fn tick(&mut self, delta_ms: f32) -> Result<()> {
        if self.phase != RoundPhase::Playing {
            return Ok(());
        }
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            log::warn!("Ignoring tick with invalid delta {delta_ms}");
            return Ok(());
        }

        self.physics.step(delta_ms);
        let pairs = self.physics.drain_collisions();
        self.on_collisions(pairs);

        // The step has finished reporting; safe to destroy/create now
        let fusions = self
            .merge
            .flush(&mut self.tags, &mut self.physics, &mut self.ledger)?;
        for fusion in fusions {
            self.events.push(GameEvent::Merged {
                created: fusion.created,
                tier: fusion.to_tier,
                pos: fusion.pos,
                points: fusion.points,
            });
        }

        let objects: Vec<(usize, f32)> = self
            .physics
            .active_objects()
            .into_iter()
            .filter_map(|obj| self.tags.tier_of(obj.handle).map(|tier| (tier, obj.pos.y)))
            .collect();
        if self.monitor.check(delta_ms, objects)? == Watch::Expired {
            self.end_round();
        }
        Ok(())
    }

    fn end_round(&mut self) {
        let new_high_score = self.ledger.finalize_round(&mut self.store);
        self.phase = RoundPhase::GameOver;
        self.new_high_score = new_high_score;

        self.events.push(GameEvent::GameOver {
            score: self.ledger.current(),
            new_high_score,
        });
        log::info!(
            "Game over: score {} (high {}{})",
            self.ledger.current(),
            self.ledger.high(),
            if new_high_score { ", new!" } else { "" }
        );
    }

    // === Inbound presentation calls ===

    pub fn on_pointer_down(&mut self, x: f32) -> Result<Option<ObjectHandle>> {
        if self.phase == RoundPhase::Playing {
            self.pointer_x = x;
        }
        self.handle_drop(x)
    }

    pub fn on_pointer_move(&mut self, x: f32) {
        if self.phase == RoundPhase::Playing {
            self.pointer_x = x;
        }
    }

    /// Restart; only honored once the round is over
    pub fn on_restart_requested(&mut self) -> bool {
        if self.phase != RoundPhase::GameOver {
            return false;
        }
        self.reset();
        true
    }

    pub fn on_tick(&mut self, delta_ms: f32) -> Result<()> {
        self.tick(delta_ms)
    }

    // === Outbound state ===

    pub fn current_score(&self) -> u64 {
        self.ledger.current()
    }

    pub fn high_score(&self) -> u64 {
        self.ledger.high()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn next_tier(&self) -> usize {
        self.spawn.current_tier()
    }

    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    /// Preview circle center; `None` once the round is over
    pub fn indicator_position(&self) -> Result<Option<Vec2>> {
        if self.phase != RoundPhase::Playing {
            return Ok(None);
        }
        self.spawn.indicator_position(self.pointer_x).map(Some)
    }

    pub fn hud(&self) -> Result<Hud> {
        Ok(Hud {
            score: self.current_score(),
            high_score: self.high_score(),
            phase: self.phase,
            next_tier: self.next_tier(),
            next_spec: *spec_of(self.next_tier())?,
            indicator: self.indicator_position()?,
            new_high_score: self.new_high_score,
        })
    }

    /// Events since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Dwell time accumulated above the ceiling line
    pub fn dwell_ms(&self) -> f32 {
        self.monitor.accumulated_ms()
    }

    pub fn object_count(&self) -> usize {
        self.tags.len()
    }

    pub fn tags(&self) -> &TierTags {
        &self.tags
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::world::CircleWorld;

    const FRAME: f32 = 1000.0 / 60.0;

    fn settings() -> Settings {
        Settings {
            seed: Some(12345),
            ..Default::default()
        }
    }

    fn new_round() -> Round<CircleWorld, MemoryStore> {
        Round::new(settings(), CircleWorld::default(), MemoryStore::new()).unwrap()
    }

    /// No gravity, so placed objects stay where they are
    fn still_round(store: MemoryStore) -> Round<CircleWorld, MemoryStore> {
        Round::new(settings(), CircleWorld::new(0.0, 0.5), store).unwrap()
    }

    fn place(round: &mut Round<CircleWorld, MemoryStore>, x: f32, y: f32, tier: usize) -> ObjectHandle {
        round
            .tags
            .spawn(&mut round.physics, Vec2::new(x, y), tier)
            .unwrap()
    }

    #[test]
    fn test_new_round_is_playing() {
        let mut round = new_round();
        assert_eq!(round.phase(), RoundPhase::Playing);
        assert_eq!(round.current_score(), 0);
        assert!(round.next_tier() < 3);
        assert_eq!(round.drain_events(), vec![GameEvent::Reset]);
    }

    #[test]
    fn test_drop_spawns_clamped_and_rerolls() {
        let mut round = new_round();
        let tier = round.next_tier();
        let radius = spec_of(tier).unwrap().radius_f32();

        let handle = round.on_pointer_down(-100.0).unwrap().unwrap();
        assert_eq!(round.tags().tier_of(handle), Some(tier));
        assert_eq!(
            round.physics().position(handle),
            Some(Vec2::new(50.0 + radius, 100.0))
        );
        assert!(round.next_tier() < 3);
        assert_eq!(round.object_count(), 1);
    }

    #[test]
    fn test_two_tier0_objects_fuse() {
        let mut round = new_round();
        place(&mut round, 300.0, 760.0, 0);
        place(&mut round, 300.0, 720.0, 0);

        round.tick(FRAME).unwrap();

        assert_eq!(round.object_count(), 1);
        let (_, tier) = round.tags().iter().next().unwrap();
        assert_eq!(tier, 1);
        assert_eq!(round.current_score(), spec_of(1).unwrap().score_reward);
        assert_eq!(round.physics().len(), 1);

        let merged = round
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Merged { tier: 1, .. }))
            .count();
        assert_eq!(merged, 1);
    }

    #[test]
    fn test_dropped_pair_fuses() {
        // First seed whose opening two drops are both tier 0
        let mut round = (0..500)
            .find_map(|seed| {
                let settings = Settings {
                    seed: Some(seed),
                    ..Default::default()
                };
                let mut round =
                    Round::new(settings, CircleWorld::default(), MemoryStore::new()).unwrap();
                if round.next_tier() != 0 {
                    return None;
                }
                round.on_pointer_down(300.0).unwrap();
                (round.next_tier() == 0).then_some(round)
            })
            .expect("no seed opens with two tier-0 drops");

        let second = round.on_pointer_down(300.0).unwrap();
        assert!(second.is_some());
        assert_eq!(round.object_count(), 2);

        for _ in 0..240 {
            round.tick(FRAME).unwrap();
        }

        assert_eq!(round.phase(), RoundPhase::Playing);
        assert_eq!(round.object_count(), 1);
        let (_, tier) = round.tags().iter().next().unwrap();
        assert_eq!(tier, 1);
        assert_eq!(round.current_score(), spec_of(1).unwrap().score_reward);
    }

    #[test]
    fn test_mixed_tiers_do_not_fuse() {
        let mut round = new_round();
        place(&mut round, 300.0, 760.0, 1);
        place(&mut round, 300.0, 715.0, 0);
        for _ in 0..30 {
            round.tick(FRAME).unwrap();
        }
        assert_eq!(round.object_count(), 2);
        assert_eq!(round.current_score(), 0);
    }

    #[test]
    fn test_reset_mid_round_clears_board() {
        let mut round = new_round();
        for i in 0..5 {
            place(&mut round, 80.0 + i as f32 * 90.0, 600.0, 2);
        }
        round.ledger.award(70);
        assert_eq!(round.object_count(), 5);

        round.reset();

        assert_eq!(round.object_count(), 0);
        assert!(round.physics().is_empty());
        assert_eq!(round.current_score(), 0);
        assert_eq!(round.phase(), RoundPhase::Playing);
        assert_eq!(round.dwell_ms(), 0.0);
    }

    #[test]
    fn test_game_over_after_sustained_violation() {
        let mut round = still_round(MemoryStore::new());
        place(&mut round, 300.0, 60.0, 0);

        for _ in 0..20 {
            round.tick(100.0).unwrap();
            assert_eq!(round.phase(), RoundPhase::Playing);
        }
        round.tick(100.0).unwrap();
        assert_eq!(round.phase(), RoundPhase::GameOver);
        assert_eq!(round.indicator_position().unwrap(), None);
    }

    #[test]
    fn test_violation_cleared_resets_dwell() {
        let mut round = still_round(MemoryStore::new());
        let h = place(&mut round, 300.0, 60.0, 0);
        for _ in 0..15 {
            round.tick(100.0).unwrap();
        }
        assert_eq!(round.dwell_ms(), 1500.0);

        round.tags.despawn(&mut round.physics, h);
        round.tick(100.0).unwrap();
        assert_eq!(round.dwell_ms(), 0.0);
        assert_eq!(round.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_invalid_delta_ignored() {
        let mut round = still_round(MemoryStore::new());
        let h = place(&mut round, 300.0, 60.0, 0);
        round.tick(100.0).unwrap();
        assert_eq!(round.dwell_ms(), 100.0);
        let before = round.physics().position(h);

        round.tick(-500.0).unwrap();
        assert_eq!(round.dwell_ms(), 100.0);

        round.tick(f32::NAN).unwrap();
        round.tick(f32::INFINITY).unwrap();
        assert_eq!(round.dwell_ms(), 100.0);
        assert_eq!(round.physics().position(h), before);

        // Board still works and the round still ends on time
        for _ in 0..19 {
            round.tick(100.0).unwrap();
        }
        assert_eq!(round.phase(), RoundPhase::Playing);
        round.tick(100.0).unwrap();
        assert_eq!(round.phase(), RoundPhase::GameOver);
    }

    #[test]
    fn test_lower_score_keeps_high() {
        let mut round = still_round(MemoryStore::with_raw("100"));
        assert_eq!(round.high_score(), 100);
        round.ledger.award(80);
        place(&mut round, 300.0, 60.0, 0);
        for _ in 0..21 {
            round.tick(100.0).unwrap();
        }

        assert_eq!(round.phase(), RoundPhase::GameOver);
        assert_eq!(round.high_score(), 100);
        assert!(!round.is_new_high_score());
        assert_eq!(round.store().writes(), 0);
        let events = round.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 80,
            new_high_score: false
        }));
    }

    #[test]
    fn test_new_high_score_persisted() {
        let mut round = still_round(MemoryStore::with_raw("100"));
        round.ledger.award(150);
        place(&mut round, 300.0, 60.0, 0);
        for _ in 0..21 {
            round.tick(100.0).unwrap();
        }

        assert_eq!(round.phase(), RoundPhase::GameOver);
        assert_eq!(round.high_score(), 150);
        assert!(round.is_new_high_score());
        assert_eq!(round.store().raw(), Some("150"));
        assert!(round.hud().unwrap().new_high_score);
    }

    #[test]
    fn test_game_over_ignores_input() {
        let mut round = still_round(MemoryStore::new());
        place(&mut round, 300.0, 60.0, 0);
        for _ in 0..21 {
            round.tick(100.0).unwrap();
        }
        assert_eq!(round.phase(), RoundPhase::GameOver);

        let count = round.object_count();
        assert_eq!(round.on_pointer_down(300.0).unwrap(), None);
        assert_eq!(round.object_count(), count);

        round.on_pointer_move(123.0);
        assert_eq!(round.pointer_x, 300.0);

        let a = place(&mut round, 100.0, 700.0, 0);
        let b = place(&mut round, 140.0, 700.0, 0);
        assert_eq!(round.on_collisions([CollisionPair::new(a, b)]), 0);

        let dwell = round.dwell_ms();
        round.tick(100.0).unwrap();
        assert_eq!(round.dwell_ms(), dwell);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut round = still_round(MemoryStore::new());
        assert!(!round.on_restart_requested());

        place(&mut round, 300.0, 60.0, 0);
        for _ in 0..21 {
            round.tick(100.0).unwrap();
        }
        assert_eq!(round.phase(), RoundPhase::GameOver);

        round.drain_events();
        assert!(round.on_restart_requested());
        assert_eq!(round.phase(), RoundPhase::Playing);
        assert_eq!(round.object_count(), 0);
        assert!(!round.is_new_high_score());
        assert_eq!(round.drain_events(), vec![GameEvent::Reset]);
    }

    #[test]
    fn test_indicator_follows_pointer() {
        let mut round = new_round();
        round.on_pointer_move(300.0);
        assert_eq!(
            round.indicator_position().unwrap(),
            Some(Vec2::new(300.0, 50.0))
        );

        round.on_pointer_move(10_000.0);
        let r = spec_of(round.next_tier()).unwrap().radius_f32();
        let hud = round.hud().unwrap();
        assert_eq!(hud.indicator, Some(Vec2::new(550.0 - r, 50.0)));
        assert_eq!(hud.next_spec, *spec_of(hud.next_tier).unwrap());
        assert_eq!(hud.phase, RoundPhase::Playing);
    }

    #[test]
    fn test_autoplay_keeps_tags_in_sync() {
        let mut round = new_round();
        let mut x = 60.0;
        for frame in 0..1200 {
            if frame % 30 == 0 {
                round.on_pointer_down(x).unwrap();
                x = if x > 500.0 { 60.0 } else { x + 73.0 };
            }
            round.tick(FRAME).unwrap();
            if round.phase() == RoundPhase::GameOver {
                break;
            }

            let objects = round.physics().active_objects();
            assert_eq!(objects.len(), round.object_count());
            for obj in objects {
                assert_eq!(round.tags().tier_of(obj.handle), Some(obj.tier_index));
            }
        }
    }
}
