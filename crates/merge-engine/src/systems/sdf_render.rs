use crate::components::entity::Entity;
use crate::renderer::sdf_instance::{SDFBuffer, SDFInstance};

/// Rebuild the SDF instance buffer from entities with mesh components.
/// Returns the number of instances dropped because the buffer was full.
pub fn build_sdf_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    buffer: &mut SDFBuffer,
) -> usize {
    buffer.clear();
    let mut dropped = 0;
    for entity in entities.filter(|e| e.active) {
        let Some(mesh) = &entity.mesh else {
            continue;
        };
        let pushed = buffer.push(SDFInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            radius: mesh.shape.radius(),
            rotation: entity.rotation,
            r: mesh.color.r,
            g: mesh.color.g,
            b: mesh.color.b,
            shininess: mesh.shininess,
            emissive: mesh.emissive,
            ..SDFInstance::default()
        });
        if !pushed {
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::warn!("SDF buffer full: {} instance(s) not drawn", dropped);
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::entity::EntityKind;
    use crate::components::mesh::{MeshComponent, SDFColor};
    use glam::Vec2;

    #[test]
    fn ball_becomes_instance() {
        let entity = Entity::new(EntityId(1))
            .with_kind(EntityKind::Ball { tier: 2 })
            .with_pos(Vec2::new(50.0, 75.0))
            .with_mesh(MeshComponent::sphere(35.0, SDFColor::new(1.0, 0.5, 0.0)));

        let mut buffer = SDFBuffer::with_capacity(8);
        build_sdf_buffer(std::iter::once(&entity), &mut buffer);

        let inst = buffer.instances()[0];
        assert_eq!((inst.x, inst.y, inst.radius), (50.0, 75.0, 35.0));
        assert_eq!((inst.r, inst.g, inst.b), (1.0, 0.5, 0.0));
        assert_eq!(inst.shininess, 32.0);
        let floats: &[f32] = bytemuck::cast_slice(buffer.instances());
        assert_eq!(floats[2], 35.0);
    }

    #[test]
    fn skips_inactive_and_meshless() {
        let wall = Entity::new(EntityId(1));
        let mut hidden = Entity::new(EntityId(2)).with_mesh(MeshComponent::default());
        hidden.active = false;
        let shown = Entity::new(EntityId(3)).with_mesh(MeshComponent::default());

        let entities = [wall, hidden, shown];
        let mut buffer = SDFBuffer::with_capacity(8);
        assert_eq!(build_sdf_buffer(entities.iter(), &mut buffer), 0);
        assert_eq!(buffer.instance_count(), 1);
    }

    #[test]
    fn overflow_is_counted() {
        let entities: Vec<Entity> = (0..5)
            .map(|i| Entity::new(EntityId(i)).with_mesh(MeshComponent::default()))
            .collect();
        let mut buffer = SDFBuffer::with_capacity(3);
        assert_eq!(build_sdf_buffer(entities.iter(), &mut buffer), 2);
        assert_eq!(buffer.instance_count(), 3);
    }
}
