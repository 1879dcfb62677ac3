use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::mesh::MeshComponent;
use crate::core::physics::PhysicsBody;

/// What role an entity plays in the game.
/// Collision handling dispatches on this instead of parsing labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityKind {
    /// Static containment geometry (boundary walls).
    #[default]
    Wall,
    /// A gameplay ball of the given tier index.
    Ball { tier: usize },
}

impl EntityKind {
    /// The tier of a ball, `None` for walls.
    pub fn tier(&self) -> Option<usize> {
        match *self {
            EntityKind::Ball { tier } => Some(tier),
            EntityKind::Wall => None,
        }
    }

    pub fn is_ball(&self) -> bool {
        matches!(self, EntityKind::Ball { .. })
    }
}

/// Fat Entity: a single struct with optional components.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Gameplay role.
    pub kind: EntityKind,
    /// Whether this entity is active (inactive entities are not rendered).
    pub active: bool,
    /// Position in world space, synced from physics after each step.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// SDF mesh. Entities without one are invisible.
    pub mesh: Option<MeshComponent>,
    /// Physics body, set by `EngineContext::spawn_with_body`.
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new wall-kind entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            kind: EntityKind::Wall,
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            mesh: None,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_reports_tier() {
        assert_eq!(EntityKind::Wall.tier(), None);
        assert_eq!(EntityKind::Ball { tier: 4 }.tier(), Some(4));
        assert!(EntityKind::Ball { tier: 0 }.is_ball());
        assert!(!EntityKind::Wall.is_ball());
    }

    #[test]
    fn builder_sets_fields() {
        let e = Entity::new(EntityId(9))
            .with_kind(EntityKind::Ball { tier: 2 })
            .with_pos(Vec2::new(3.0, 4.0));
        assert_eq!(e.kind, EntityKind::Ball { tier: 2 });
        assert_eq!(e.pos, Vec2::new(3.0, 4.0));
        assert!(e.active);
        assert!(e.mesh.is_none());
        assert!(e.body.is_none());
    }
}
