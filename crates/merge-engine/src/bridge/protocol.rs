//! Frame data layout shared with the browser renderer.
//! Must stay in sync with the TypeScript reader.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 12 floats]
//! [SDF instances: max_sdf_instances × 12 floats]
//! [Sounds: max_sounds × 1 float]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header so the reader can compute offsets.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 12;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_WORLD_WIDTH: usize = 2;
pub const HEADER_WORLD_HEIGHT: usize = 3;
pub const HEADER_MAX_SDF_INSTANCES: usize = 4;
pub const HEADER_SDF_INSTANCE_COUNT: usize = 5;
pub const HEADER_MAX_SOUNDS: usize = 6;
pub const HEADER_SOUND_COUNT: usize = 7;
pub const HEADER_MAX_EVENTS: usize = 8;
pub const HEADER_EVENT_COUNT: usize = 9;
pub const HEADER_INTERPOLATION_ALPHA: usize = 10;
pub const HEADER_BALL_COUNT: usize = 11;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 2.0;

/// Floats per SDF instance: x, y, radius, rotation, r, g, b, shininess, emissive, pad×3.
pub const SDF_INSTANCE_FLOATS: usize = 12;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Per-frame counters that go into the header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameCounts {
    pub frame: u32,
    pub sdf_instances: usize,
    pub sounds: usize,
    pub events: usize,
    pub balls: usize,
    pub alpha: f32,
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub world_width: f32,
    pub world_height: f32,

    pub max_sdf_instances: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    pub sdf_data_floats: usize,
    pub sound_data_floats: usize,
    pub event_data_floats: usize,

    pub sdf_data_offset: usize,
    pub sound_data_offset: usize,
    pub event_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        world_width: f32,
        world_height: f32,
        max_sdf_instances: usize,
        max_sounds: usize,
        max_events: usize,
    ) -> Self {
        let sdf_data_floats = max_sdf_instances * SDF_INSTANCE_FLOATS;
        let sound_data_floats = max_sounds;
        let event_data_floats = max_events * EVENT_FLOATS;

        let sdf_data_offset = HEADER_FLOATS;
        let sound_data_offset = sdf_data_offset + sdf_data_floats;
        let event_data_offset = sound_data_offset + sound_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            world_width,
            world_height,
            max_sdf_instances,
            max_sounds,
            max_events,
            sdf_data_floats,
            sound_data_floats,
            event_data_floats,
            sdf_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.world_width,
            config.world_height,
            config.max_sdf_instances,
            config.max_sounds,
            config.max_events,
        )
    }

    /// Build the header for one frame. Counts above capacity are clamped.
    pub fn header(&self, counts: &FrameCounts) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = counts.frame as f32;
        header[HEADER_WORLD_WIDTH] = self.world_width;
        header[HEADER_WORLD_HEIGHT] = self.world_height;
        header[HEADER_MAX_SDF_INSTANCES] = self.max_sdf_instances as f32;
        header[HEADER_SDF_INSTANCE_COUNT] = counts.sdf_instances.min(self.max_sdf_instances) as f32;
        header[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        header[HEADER_SOUND_COUNT] = counts.sounds.min(self.max_sounds) as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_EVENT_COUNT] = counts.events.min(self.max_events) as f32;
        header[HEADER_INTERPOLATION_ALPHA] = counts.alpha;
        header[HEADER_BALL_COUNT] = counts.balls as f32;
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_layout() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());

        assert_eq!(layout.max_sdf_instances, 512);
        assert_eq!(layout.max_sounds, 32);
        assert_eq!(layout.max_events, 32);
        assert_eq!(layout.sdf_data_offset, HEADER_FLOATS);
        assert_eq!(
            layout.buffer_total_floats,
            HEADER_FLOATS + 512 * SDF_INSTANCE_FLOATS + 32 + 32 * EVENT_FLOATS
        );
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(400.0, 700.0, 100, 10, 20);

        assert_eq!(layout.sound_data_offset, layout.sdf_data_offset + layout.sdf_data_floats);
        assert_eq!(layout.event_data_offset, layout.sound_data_offset + layout.sound_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn header_clamps_counts() {
        let layout = ProtocolLayout::new(400.0, 700.0, 4, 2, 2);
        let header = layout.header(&FrameCounts {
            frame: 9,
            sdf_instances: 10,
            sounds: 1,
            events: 5,
            balls: 10,
            alpha: 0.25,
        });

        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_FRAME_COUNTER], 9.0);
        assert_eq!(header[HEADER_WORLD_WIDTH], 400.0);
        assert_eq!(header[HEADER_SDF_INSTANCE_COUNT], 4.0);
        assert_eq!(header[HEADER_SOUND_COUNT], 1.0);
        assert_eq!(header[HEADER_EVENT_COUNT], 2.0);
        assert_eq!(header[HEADER_BALL_COUNT], 10.0);
        assert_eq!(header[HEADER_INTERPOLATION_ALPHA], 0.25);
    }
}
