use bytemuck::{Pod, Zeroable};

/// Per-instance SDF render data for the ball pipeline.
/// Read by the browser renderer straight out of WASM memory.
/// 12 floats = 48 bytes per instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SDFInstance {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub rotation: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub shininess: f32,
    pub emissive: f32,
    pub _pad0: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

impl SDFInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Capacity-bounded buffer of SDF instances.
pub struct SDFBuffer {
    instances: Vec<SDFInstance>,
    max: usize,
}

impl SDFBuffer {
    pub fn with_capacity(max: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max),
            max,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Returns `false` (and drops it) when the buffer is full.
    pub fn push(&mut self, instance: SDFInstance) -> bool {
        if self.instances.len() >= self.max {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn instances(&self) -> &[SDFInstance] {
        &self.instances
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}
