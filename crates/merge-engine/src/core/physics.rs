use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::Mutex;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra and back
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Moves under gravity and contacts.
    Dynamic,
    /// Immovable: walls and the preview ball.
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.1,
            density: 1.0,
        }
    }
}

/// Convert a per-step air friction coefficient into Rapier linear damping.
///
/// Air friction `f` means a free body keeps `1 - f` of its velocity each step.
/// Rapier scales velocity by `1 / (1 + dt * damping)` per step, so
/// `damping = f / ((1 - f) * dt)` yields the same per-step retention.
/// Coefficients outside `[0, 1)` are clamped.
pub fn air_friction_to_damping(friction_air: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    let f = friction_air.clamp(0.0, 0.999);
    f / ((1.0 - f) * dt)
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub gravity_scale: f32,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            gravity_scale: 1.0,
            collider,
            linear_damping: 0.0,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec2::ZERO,
            gravity_scale: 0.0,
            collider,
            linear_damping: 0.0,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    /// Set the linear damping (velocity decay per second).
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Set damping from a per-step air friction coefficient, see [`air_friction_to_damping`].
    pub fn with_air_friction(self, friction_air: f32, dt: f32) -> Self {
        self.with_linear_damping(air_friction_to_damping(friction_air, dt))
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// A collision-start pair.
    pub fn started(entity_a: EntityId, entity_b: EntityId) -> Self {
        Self { entity_a, entity_b, started: true }
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single struct.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// Coordinates are Y-down (browser pixels), so positive Y pulls downward.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .gravity_scale(desc.gravity_scale)
            .linear_damping(desc.linear_damping)
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and its collider from the simulation.
    /// Returns `false` when the body was already gone.
    pub fn remove_body(&mut self, body: &PhysicsBody) -> bool {
        self.bodies
            .remove(
                body.body_handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            // Stopped events for removed colliders cannot be resolved and are dropped.
            let entity_a = self.collider_to_entity(h1);
            let entity_b = self.collider_to_entity(h2);

            if let (Some(a), Some(b)) = (entity_a, entity_b) {
                collision_events.push(CollisionPair {
                    entity_a: a,
                    entity_b: b,
                    started,
                });
            }
        }
    }

    /// Linear damping currently applied to a body.
    pub fn linear_damping(&self, body: &PhysicsBody) -> Option<f32> {
        self.bodies.get(body.body_handle).map(|rb| rb.linear_damping())
    }

    /// Whether the body is fixed (immovable).
    pub fn is_fixed(&self, body: &PhysicsBody) -> Option<bool> {
        self.bodies.get(body.body_handle).map(|rb| rb.is_fixed())
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Query the collider shape of a physics body.
    /// Returns `None` if the collider no longer exists or has an unsupported shape.
    pub fn collider_shape(&self, body: &PhysicsBody) -> Option<ColliderDesc> {
        let collider = self.colliders.get(body.collider_handle)?;
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            Some(ColliderDesc::Ball { radius: ball.radius })
        } else {
            shape.as_cuboid().map(|cuboid| ColliderDesc::Cuboid {
                half_width: cuboid.half_extents.x,
                half_height: cuboid.half_extents.y,
            })
        }
    }

    /// Restitution of a body's collider.
    pub fn restitution(&self, body: &PhysicsBody) -> Option<f32> {
        self.colliders.get(body.collider_handle).map(|c| c.restitution())
    }

    // -- private helpers --

    fn collider_to_entity(&self, collider_handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(EntityId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(world: &mut PhysicsWorld, id: u32, pos: Vec2) -> PhysicsBody {
        world.create_body(
            EntityId(id),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
                .with_position(pos),
            ColliderMaterial::default(),
        )
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = ball(&mut world, 1, Vec2::ZERO);
        assert_eq!(world.body_count(), 1);
        assert!(world.remove_body(&body));
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_shape(&body), None);
    }

    #[test]
    fn removing_twice_is_harmless() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = ball(&mut world, 1, Vec2::ZERO);
        let other = ball(&mut world, 2, Vec2::new(100.0, 0.0));
        assert!(world.remove_body(&body));
        assert!(!world.remove_body(&body));
        assert_eq!(world.body_count(), 1);
        assert!(world.collider_shape(&other).is_some());
    }

    #[test]
    fn gravity_pulls_dynamic_body_down() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        world.set_dt(1.0 / 60.0);
        let body = ball(&mut world, 1, Vec2::new(50.0, 40.0));

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&body);
        assert!(pos.y > 40.0, "Body should fall: y={}", pos.y);
    }

    #[test]
    fn fixed_body_ignores_gravity() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        world.set_dt(1.0 / 60.0);
        let body = world.create_body(
            EntityId(1),
            &BodyDesc::fixed(ColliderDesc::Ball { radius: 20.0 })
                .with_position(Vec2::new(200.0, 40.0)),
            ColliderMaterial::default(),
        );

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&body);
        assert!((pos.y - 40.0).abs() < 0.001, "Fixed body moved: y={}", pos.y);
        assert_eq!(world.is_fixed(&body), Some(true));
    }

    #[test]
    fn collision_start_resolves_entity_ids() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(1.0 / 60.0);
        ball(&mut world, 1, Vec2::new(0.0, 0.0));
        ball(&mut world, 2, Vec2::new(15.0, 0.0));

        let mut all_events = Vec::new();
        for _ in 0..60 {
            world.step_into(&mut all_events);
        }

        let first = all_events
            .iter()
            .find(|e| e.started)
            .expect("Should have at least one collision start event");
        let ids = [first.entity_a, first.entity_b];
        assert!(ids.contains(&EntityId(1)));
        assert!(ids.contains(&EntityId(2)));
    }

    #[test]
    fn ball_resting_on_fixed_floor_reports_contact() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        world.set_dt(1.0 / 60.0);
        world.create_body(
            EntityId(1),
            &BodyDesc::fixed(ColliderDesc::Cuboid { half_width: 500.0, half_height: 25.0 })
                .with_position(Vec2::new(0.0, 225.0)),
            ColliderMaterial::default(),
        );
        ball(&mut world, 2, Vec2::new(0.0, 0.0));

        let mut events = Vec::new();
        for _ in 0..120 {
            world.step_into(&mut events);
        }
        assert!(events.iter().any(|e| e.started));
    }

    #[test]
    fn air_friction_matches_per_step_retention() {
        let dt = 1.0 / 60.0;
        let f = 0.008;
        let damping = air_friction_to_damping(f, dt);
        let retained = 1.0 / (1.0 + dt * damping);
        assert!((retained - (1.0 - f)).abs() < 1e-6);
        assert_eq!(air_friction_to_damping(0.0, dt), 0.0);
        assert_eq!(air_friction_to_damping(0.5, 0.0), 0.0);
    }

    #[test]
    fn body_desc_carries_damping_and_material() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 25.0 })
            .with_air_friction(0.0075, 1.0 / 60.0);
        let material = ColliderMaterial { restitution: 0.3, ..ColliderMaterial::default() };
        let body = world.create_body(EntityId(1), &desc, material);

        let damping = world.linear_damping(&body).unwrap();
        assert!((damping - desc.linear_damping).abs() < 1e-6);
        assert!(damping > 0.0);
        assert!((world.restitution(&body).unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(world.is_fixed(&body), Some(false));
    }

    #[test]
    fn collider_shape_ball_and_cuboid() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let ball_body = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 15.0 }),
            ColliderMaterial::default(),
        );
        let wall_body = world.create_body(
            EntityId(2),
            &BodyDesc::fixed(ColliderDesc::Cuboid { half_width: 50.0, half_height: 10.0 }),
            ColliderMaterial::default(),
        );

        assert_eq!(
            world.collider_shape(&ball_body),
            Some(ColliderDesc::Ball { radius: 15.0 })
        );
        assert_eq!(
            world.collider_shape(&wall_body),
            Some(ColliderDesc::Cuboid { half_width: 50.0, half_height: 10.0 })
        );

        world.remove_body(&ball_body);
        assert_eq!(world.collider_shape(&ball_body), None);
    }
}
