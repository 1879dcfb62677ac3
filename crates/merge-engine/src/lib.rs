pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, SoundEvent, GameEvent};
pub use components::entity::{Entity, EntityKind};
pub use components::mesh::{MeshComponent, SDFShape, SDFColor};
pub use crate::core::scene::Scene;
pub use crate::core::time::FixedTimestep;
pub use crate::core::timer::{Scheduler, TimerHandle};
pub use crate::core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionPair,
    air_friction_to_damping,
};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::sdf_instance::{SDFInstance, SDFBuffer};
pub use systems::sdf_render::build_sdf_buffer;
pub use bridge::protocol::{ProtocolLayout, FrameCounts};
