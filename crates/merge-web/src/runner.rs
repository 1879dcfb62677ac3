use merge_engine::bridge::protocol::HEADER_FLOATS;
use merge_engine::{
    build_sdf_buffer, EngineContext, FixedTimestep, FrameCounts, Game, GameEvent,
    InputEvent, InputQueue, ProtocolLayout, SDFBuffer,
};

/// What the browser hands over at startup.
/// The viewport is measured once; resizes are not tracked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchParams {
    pub width: f32,
    pub height: f32,
    /// Seed for the game's RNG (the page passes e.g. `Date.now()`).
    pub seed: u64,
    /// Optional JSON config loaded before init.
    pub config_json: Option<String>,
}

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export generic
/// structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    sdf_buffer: SDFBuffer,
    timestep: FixedTimestep,
    layout: ProtocolLayout,
    initialized: bool,
    frame: u32,
    header: [f32; HEADER_FLOATS],
    /// Flat buffer of sound event IDs for the browser to read.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            sdf_buffer: SDFBuffer::with_capacity(config.max_sdf_instances),
            timestep: FixedTimestep::new(config.fixed_dt),
            layout: ProtocolLayout::from_config(&config),
            initialized: false,
            frame: 0,
            header: [0.0; HEADER_FLOATS],
            sound_buffer: Vec::with_capacity(config.max_sounds),
            game,
        }
    }

    /// Initialize the game. Call once after construction.
    /// The first frame's buffers are built right away so the preview is visible before any tick.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.rebuild_frame();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one animation frame: fixed-step update + physics, then rebuild output buffers.
    /// Input is delivered to the first fixed step only; if the frame runs no step
    /// the input stays queued for the next frame.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        if steps > 0 {
            let input = std::mem::take(&mut self.input);
            let idle = InputQueue::new();
            for step in 0..steps {
                let queue = if step == 0 { &input } else { &idle };
                self.game.update(&mut self.ctx, queue);
                self.ctx.step_physics();
            }
        }

        self.frame = self.frame.wrapping_add(1);
        self.rebuild_frame();
    }

    fn rebuild_frame(&mut self) {
        build_sdf_buffer(self.ctx.scene.iter(), &mut self.sdf_buffer);

        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.layout.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.header = self.layout.header(&FrameCounts {
            frame: self.frame,
            sdf_instances: self.sdf_buffer.instance_count(),
            sounds: self.sound_buffer.len(),
            events: self.ctx.events.len(),
            balls: self.ctx.scene.balls().count(),
            alpha: self.timestep.alpha(),
        });
    }

    // ---- Inspection ----

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn header(&self) -> &[f32; HEADER_FLOATS] {
        &self.header
    }

    pub fn sdf_buffer(&self) -> &SDFBuffer {
        &self.sdf_buffer
    }

    /// Game events of the last frame, clamped to the configured capacity.
    pub fn game_events(&self) -> &[GameEvent] {
        let len = self.ctx.events.len().min(self.layout.max_events);
        &self.ctx.events[..len]
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn sdf_instances_ptr(&self) -> *const f32 {
        self.sdf_buffer.instances_ptr()
    }

    pub fn sdf_instance_count(&self) -> u32 {
        self.sdf_buffer.instance_count() as u32
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.game_events().len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.layout.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.layout.world_height
    }

    // ---- Capacity accessors ----

    pub fn max_sdf_instances(&self) -> u32 {
        self.layout.max_sdf_instances as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
