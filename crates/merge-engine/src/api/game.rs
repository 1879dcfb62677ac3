use glam::Vec2;

use crate::api::types::{EntityId, GameEvent, SoundEvent};
use crate::components::entity::Entity;
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsWorld};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units (viewport pixels).
    pub world_width: f32,
    /// World height in game units (viewport pixels).
    pub world_height: f32,
    /// Gravity vector. Y-down, so positive Y pulls toward the bottom of the viewport.
    pub gravity: Vec2,
    /// Maximum number of SDF instances drawn per frame (default: 512).
    pub max_sdf_instances: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            gravity: Vec2::ZERO,
            max_sdf_instances: 512,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

/// The contract every game fulfills.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state and spawn entities.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step of game logic, run before the physics step.
    /// `ctx.take_collisions()` yields the pairs reported by the previous physics step.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    next_id: u32,
    collision_events: Vec<CollisionPair>,
    dt: f32,
}

impl EngineContext {
    /// Zero-gravity context stepping at 1/60 s.
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    /// Create a context with the gravity and timestep from `config`.
    pub fn from_config(config: &GameConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.fixed_dt);
        Self {
            scene: Scene::new(),
            physics,
            sounds: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            collision_events: Vec::new(),
            dt: config.fixed_dt,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Fixed step length in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Emit a sound event for the browser.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event for the browser.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame outputs (sounds, events).
    /// Collision pairs are kept: they belong to the step, not the frame.
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. The entity's position is taken from the BodyDesc.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity.with_pos(desc.position).with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity and its physics body.
    /// Returns `false` if the entity was already gone, so repeated calls are harmless.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.scene.despawn(id) {
            Some(entity) => {
                if let Some(body) = &entity.body {
                    self.physics.remove_body(body);
                }
                true
            }
            None => false,
        }
    }

    /// Whether the entity is still in the scene.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.scene.contains(id)
    }

    /// Take ownership of the most recent step's collision events, leaving none behind.
    pub fn take_collisions(&mut self) -> Vec<CollisionPair> {
        std::mem::take(&mut self.collision_events)
    }

    /// Step the physics simulation and sync positions back to entities.
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
