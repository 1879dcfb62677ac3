//! Merge balls: drop a ball from the top, two balls of the same size fuse into
//! the next size up, two of the largest size vanish.

use glam::Vec2;
use merge_engine::{
    BodyDesc, BodyType, ColliderDesc, CollisionPair, EngineContext, Entity, EntityId, EntityKind,
    Game, GameConfig, GameEvent, InputQueue, MeshComponent, Scheduler, SoundEvent, TimerHandle,
};
use merge_web::LaunchParams;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::MergeConfig;
use crate::tiers::TierTable;

// Sound IDs (mapped to audio files on the browser side)
pub const SOUND_DROP: u32 = 1;
pub const SOUND_MERGE: u32 = 2;

// Game event kinds
/// Two balls fused. `a` = new tier, `b`/`c` = position.
pub const EVENT_MERGE: f32 = 1.0;
/// Two max-tier balls were removed. `a` = tier, `b`/`c` = position.
pub const EVENT_VANISH: f32 = 2.0;

// Used when the page reports a degenerate viewport.
const FALLBACK_WIDTH: f32 = 400.0;
const FALLBACK_HEIGHT: f32 = 700.0;

/// Work deferred to a later step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    RespawnPreview,
}

pub struct MergeBalls {
    config: MergeConfig,
    tiers: TierTable,
    viewport: Vec2,
    rng: Pcg32,
    /// The static ball waiting at the top, if any.
    preview: Option<EntityId>,
    timers: Scheduler<Deferred>,
    respawn: Option<TimerHandle>,
}

impl MergeBalls {
    pub fn new(config: MergeConfig, width: f32, height: f32, seed: u64) -> Self {
        let sane = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            tiers: TierTable::new(config.tiers.clone()),
            config,
            viewport: Vec2::new(sane(width, FALLBACK_WIDTH), sane(height, FALLBACK_HEIGHT)),
            rng: Pcg32::seed_from_u64(seed),
            preview: None,
            timers: Scheduler::new(),
            respawn: None,
        }
    }

    /// Build the game from what the page passed to `game_init`.
    /// A config that fails to parse or validate is logged and replaced by the defaults.
    pub fn launch(params: &LaunchParams) -> Self {
        let config = match params.config_json.as_deref() {
            Some(json) => MergeConfig::from_json(json).unwrap_or_else(|err| {
                log::error!("Rejected merge config, using defaults: {err:#}");
                MergeConfig::default()
            }),
            None => MergeConfig::default(),
        };
        Self::new(config, params.width, params.height, params.seed)
    }

    pub fn merge_config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn preview(&self) -> Option<EntityId> {
        self.preview
    }

    pub fn respawn_pending(&self) -> bool {
        self.respawn.is_some_and(|handle| self.timers.is_pending(handle))
    }

    /// Release the preview at `offset_x` (clamped so the ball stays inside the walls).
    /// Does nothing while no preview is shown.
    pub fn drop_ball(&mut self, ctx: &mut EngineContext, offset_x: f32) -> Option<EntityId> {
        let preview = self.preview?;
        let Some(tier) = ctx.scene.get(preview).and_then(|e| e.kind.tier()) else {
            self.preview = None;
            return None;
        };
        let radius = self.tiers.get(tier)?.radius;

        ctx.despawn(preview);
        self.preview = None;

        let x = self.clamp_x(offset_x, radius);
        let id = self.spawn_ball(ctx, tier, Vec2::new(x, self.config.spawn_y), BodyType::Dynamic)?;
        ctx.emit_sound(SoundEvent(SOUND_DROP));

        if let Some(stale) = self.respawn.take() {
            self.timers.cancel(stale);
        }
        self.respawn = Some(self.timers.schedule(self.config.respawn_delay, Deferred::RespawnPreview));

        log::debug!("Dropped tier {} at x={:.1}", tier, x);
        Some(id)
    }

    /// Show a new static preview at the top centre, replacing any existing one.
    pub fn spawn_preview(&mut self, ctx: &mut EngineContext) -> Option<EntityId> {
        if let Some(old) = self.preview.take() {
            ctx.despawn(old);
        }

        let choices = self.tiers.preview_count(self.config.preview_tiers);
        let tier = self.rng.random_range(0..choices);
        let pos = Vec2::new(self.viewport.x / 2.0, self.config.spawn_y);

        self.preview = self.spawn_ball(ctx, tier, pos, BodyType::Fixed);
        self.preview
    }

    /// Apply the merge rule to every collision-start pair of one physics step, in order.
    pub fn on_collision_start(&mut self, ctx: &mut EngineContext, pairs: &[CollisionPair]) {
        for pair in pairs.iter().filter(|p| p.started) {
            self.merge_pair(ctx, pair.entity_a, pair.entity_b);
        }
    }

    pub fn on_timer(&mut self, ctx: &mut EngineContext, task: Deferred) {
        match task {
            Deferred::RespawnPreview => {
                self.respawn = None;
                self.spawn_preview(ctx);
            }
        }
    }

    /// Cancel a pending respawn. Returns `false` if none was pending.
    pub fn cancel_respawn(&mut self) -> bool {
        match self.respawn.take() {
            Some(handle) => self.timers.cancel(handle),
            None => false,
        }
    }

    fn merge_pair(&mut self, ctx: &mut EngineContext, a: EntityId, b: EntityId) -> bool {
        // The preview stays out of merges so there is never more than one.
        if a == b || self.preview == Some(a) || self.preview == Some(b) {
            return false;
        }
        let (Some(ball_a), Some(ball_b)) = (ctx.scene.get(a), ctx.scene.get(b)) else {
            return false;
        };
        let (Some(tier), Some(other)) = (ball_a.kind.tier(), ball_b.kind.tier()) else {
            return false;
        };
        if tier != other {
            return false;
        }
        let pos = ball_a.pos;

        ctx.despawn(a);
        ctx.despawn(b);

        match self.tiers.next(tier) {
            Some(next) => {
                self.spawn_ball(ctx, next, pos, BodyType::Dynamic);
                ctx.emit_event(GameEvent::new(EVENT_MERGE, next as f32, pos.x, pos.y));
                ctx.emit_sound(SoundEvent(SOUND_MERGE));
                log::debug!("Merged two tier {} into tier {} at ({:.1}, {:.1})", tier, next, pos.x, pos.y);
            }
            None => {
                ctx.emit_event(GameEvent::new(EVENT_VANISH, tier as f32, pos.x, pos.y));
                log::debug!("Two max-tier balls vanished at ({:.1}, {:.1})", pos.x, pos.y);
            }
        }
        true
    }

    fn spawn_ball(
        &self,
        ctx: &mut EngineContext,
        tier: usize,
        pos: Vec2,
        body_type: BodyType,
    ) -> Option<EntityId> {
        let def = self.tiers.get(tier)?;
        let collider = ColliderDesc::Ball { radius: def.radius };
        let desc = match body_type {
            BodyType::Dynamic => BodyDesc::dynamic(collider)
                .with_air_friction(self.config.air_friction(def.radius), ctx.dt()),
            BodyType::Fixed => BodyDesc::fixed(collider),
        }
        .with_position(pos);

        let id = ctx.next_id();
        let entity = Entity::new(id)
            .with_kind(EntityKind::Ball { tier })
            .with_mesh(MeshComponent::sphere(def.radius, def.color));
        Some(ctx.spawn_with_body(entity, desc, self.config.material()))
    }

    fn clamp_x(&self, x: f32, radius: f32) -> f32 {
        let (lo, hi) = (radius, self.viewport.x - radius);
        if hi < lo {
            // Viewport narrower than the ball.
            return self.viewport.x / 2.0;
        }
        if x.is_nan() {
            return lo;
        }
        x.clamp(lo, hi)
    }

    fn spawn_walls(&self, ctx: &mut EngineContext) {
        let Vec2 { x: w, y: h } = self.viewport;
        let t = self.config.wall_thickness;
        let half = t / 2.0;

        // Inner faces sit exactly on the viewport edges.
        let walls = [
            (Vec2::new(w / 2.0, -half), w / 2.0 + t, half),
            (Vec2::new(w / 2.0, h + half), w / 2.0 + t, half),
            (Vec2::new(-half, h / 2.0), half, h / 2.0 + t),
            (Vec2::new(w + half, h / 2.0), half, h / 2.0 + t),
        ];

        for (pos, half_width, half_height) in walls {
            let id = ctx.next_id();
            let desc = BodyDesc::fixed(ColliderDesc::Cuboid { half_width, half_height })
                .with_position(pos);
            ctx.spawn_with_body(
                Entity::new(id).with_kind(EntityKind::Wall),
                desc,
                self.config.material(),
            );
        }
    }
}

impl Game for MergeBalls {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: self.viewport.x,
            world_height: self.viewport.y,
            gravity: Vec2::new(0.0, self.config.gravity),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.spawn_walls(ctx);
        self.spawn_preview(ctx);
        log::info!(
            "Merge balls: {}x{} viewport, {} tiers",
            self.viewport.x,
            self.viewport.y,
            self.tiers.len()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for x in input.pointer_downs() {
            self.drop_ball(ctx, x);
        }

        let pairs = ctx.take_collisions();
        self.on_collision_start(ctx, &pairs);

        for task in self.timers.advance(ctx.dt()) {
            self.on_timer(ctx, task);
        }
    }
}
