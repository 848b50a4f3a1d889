use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use glam::Mat4;
use winit::window::Window;

use immersion_core::fault::XorShift32;
use immersion_core::layout::SurfaceLayout;
use immersion_core::pose::ViewState;
use immersion_core::scene::SceneParams;
use immersion_core::{Eye, FrameContext};
use immersion_gpu::context::{
    linear_sampler, texture_bind_group_layout, DrawUniforms, UniformArena,
};
use immersion_gpu::eye_buffer::{EyeBuffer, MirrorPass};
use immersion_gpu::lines::DebugLines;
use immersion_gpu::pipelines::Pipelines;
use immersion_gpu::scene::SceneContent;
use immersion_gpu::surface::RenderSurface;

use crate::headset::{Headset, EYE_HEIGHT, EYE_WIDTH};
use crate::input::{axis_commands, EdgeTracker, InputEvent, Key, PolledState, SceneCommand};

// ---------------------------------------------------------------------------
// Simple FPS counter — logs to console once per second
// ---------------------------------------------------------------------------

struct FpsCounter {
    frames: u32,
    last_report: Instant,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            last_report: Instant::now(),
        }
    }

    /// Increment the frame count.  Returns the FPS value if a full second has
    /// elapsed since the last report (so the caller can log it).
    fn tick(&mut self) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.last_report.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frames as f32 / elapsed;
            self.frames = 0;
            self.last_report = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Uniform slot map
// ---------------------------------------------------------------------------

// Every draw's matrices live in one dynamic-offset arena, written up front
// each frame. Slots 0..12 are the six offscreen passes (side panel + cube
// per screen); 12/13 hold each eye's composite projection/view, shared by
// that eye's quads, lines and backdrop.
const SLOT_COUNT: u32 = 14;

fn side_slot(screen: usize) -> u32 {
    2 * screen as u32
}

fn cube_slot(screen: usize) -> u32 {
    2 * screen as u32 + 1
}

fn composite_slot(eye: Eye) -> u32 {
    12 + eye.index() as u32
}

/// Which eye a screen (0-based index 0..6) belongs to.
fn screen_eye(screen: usize) -> Eye {
    if screen < 3 {
        Eye::Left
    } else {
        Eye::Right
    }
}

/// The wall layouts each eye's three screens cycle through.
const SCREEN_LAYOUTS: [SurfaceLayout; 3] = [
    SurfaceLayout::LeftWall,
    SurfaceLayout::FrontWall,
    SurfaceLayout::BackWall,
];

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,

    arena: UniformArena,
    pipelines: Pipelines,
    screens: [RenderSurface; 6],
    scene: SceneContent,
    lines: DebugLines,
    eye_buffer: EyeBuffer,
    mirror: MirrorPass,

    headset: Headset,
    view: ViewState,
    params: SceneParams,
    frame: FrameContext,

    polled: PolledState,
    edges: EdgeTracker,
    rng: XorShift32,

    start: Instant,
    fps: FpsCounter,
}

impl App {
    /// Initialise wgpu for the mirror window.  The window is wrapped in `Arc`
    /// so that the surface can safely hold a `'static` reference to it.
    /// Every failure here is fatal and propagated for `main` to report.
    pub fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        // ---- Instance -------------------------------------------------------
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // ---- Surface --------------------------------------------------------
        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        // ---- Adapter --------------------------------------------------------
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter found")?;

        log::info!("GPU adapter: {}", adapter.get_info().name);

        // ---- Device & Queue -------------------------------------------------
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("immersion device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create GPU device")?;

        // Per-frame GPU errors are logged, never fatal; the frame loop keeps
        // running in a possibly-degraded visual state.
        device.on_uncaptured_error(Box::new(|e| {
            log::error!("uncaptured GPU error: {e}");
        }));

        // ---- Surface configuration ------------------------------------------
        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!(
            "Mirror surface configured: {}×{} {:?} Fifo",
            surface_config.width,
            surface_config.height,
            format
        );

        // ---- Shared GPU plumbing --------------------------------------------
        let texture_bgl = texture_bind_group_layout(&device);
        let sampler = linear_sampler(&device);
        let arena = UniformArena::new(&device, SLOT_COUNT);
        let pipelines = Pipelines::new(&device, &arena.layout, &texture_bgl);

        // ---- Screens, scene, eye buffer -------------------------------------
        let screens = std::array::from_fn(|i| {
            RenderSurface::new(&device, SCREEN_LAYOUTS[i % 3], &texture_bgl, &sampler)
        });
        let scene = SceneContent::new(&device, &queue, &texture_bgl, &sampler);
        let lines = DebugLines::new(&device);
        let eye_buffer = EyeBuffer::new(&device, EYE_WIDTH, EYE_HEIGHT, &texture_bgl, &sampler);
        let mirror = MirrorPass::new(&device, &texture_bgl, format);

        log::info!(
            "Six screens allocated; stereo target {}×{}",
            EYE_WIDTH * 2,
            EYE_HEIGHT
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            arena,
            pipelines,
            screens,
            scene,
            lines,
            eye_buffer,
            mirror,
            headset: Headset::new(),
            view: ViewState::new(),
            params: SceneParams::new(),
            frame: FrameContext::default(),
            polled: PolledState::default(),
            edges: EdgeTracker::new(),
            rng: XorShift32::new(0x5eed),
            start: Instant::now(),
            fps: FpsCounter::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Resize — the mirror stretches, so only the window surface reconfigures
    // -------------------------------------------------------------------------

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        self.surface_config.width = new_width;
        self.surface_config.height = new_height;
        self.surface.configure(&self.device, &self.surface_config);
        log::debug!("Mirror resized to {}×{}", new_width, new_height);
    }

    // -------------------------------------------------------------------------
    // Input — called by main.rs window_event handler
    // -------------------------------------------------------------------------

    pub fn on_key(&mut self, key: Key, pressed: bool) {
        self.polled.set(key, pressed);
    }

    /// Fold this frame's input into the app state: edge events first, then
    /// the continuous stick-style adjustments.
    fn apply_input(&mut self, t: f32) {
        for event in self.edges.poll(self.polled) {
            match event {
                InputEvent::FreezeToggled => {
                    self.view.toggle_freeze();
                    log::info!(
                        "freeze {}",
                        if self.view.is_frozen() { "on" } else { "off" }
                    );
                }
                InputEvent::FaultTripped => {
                    self.frame.fault.trip(&mut self.rng);
                    log::info!("fault tripped on screen {}", self.frame.fault.get());
                }
                InputEvent::FaultCleared => {
                    self.frame.fault.clear();
                    log::info!("fault cleared");
                }
                InputEvent::Recenter => {
                    self.headset.recenter(t);
                    log::info!("tracking recentered");
                }
            }
        }
        self.frame.show_debug_lines = self.polled.debug;

        for command in axis_commands(&self.polled) {
            match command {
                SceneCommand::MoveBox(delta) => self.params.move_box(delta),
                SceneCommand::Scale(direction) => self.params.change_scale(direction),
            }
        }
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// Run one full frame: poll input, advance tracking, encode the six
    /// offscreen passes, the stereo composite and the mirror blit.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let t = self.start.elapsed().as_secs_f32();

        self.apply_input(t);

        let tracking = self.headset.sample(t);
        self.view.update(&tracking, self.polled.hand_override);

        if let Some(fps) = self.fps.tick() {
            log::debug!(
                "FPS: {:.1}  fault: {}  scale: {:.3}  frozen: {}",
                fps,
                self.frame.fault.get(),
                self.params.scale_factor,
                self.view.is_frozen(),
            );
        }

        // --- Upload this frame's uniform slots --------------------------------
        let projection = Headset::projection(self.eye_buffer.aspect());
        let model = Mat4::from_translation(self.params.box_offset)
            * Mat4::from_scale(glam::Vec3::splat(self.params.scale_factor));

        for i in 0..self.screens.len() {
            let view = self.view.eye_view(screen_eye(i));
            self.arena.write(
                &self.queue,
                side_slot(i),
                &DrawUniforms {
                    projection: projection.to_cols_array_2d(),
                    modelview: view.to_cols_array_2d(),
                },
            );
            self.arena.write(
                &self.queue,
                cube_slot(i),
                &DrawUniforms {
                    projection: projection.to_cols_array_2d(),
                    modelview: (view * model).to_cols_array_2d(),
                },
            );
        }
        for eye in Eye::BOTH {
            self.arena.write(
                &self.queue,
                composite_slot(eye),
                &DrawUniforms {
                    projection: projection.to_cols_array_2d(),
                    modelview: self.view.eye_view(eye).to_cols_array_2d(),
                },
            );
        }

        if self.frame.show_debug_lines {
            self.lines.update(
                &self.queue,
                self.view.eye_position(Eye::Left),
                self.view.eye_position(Eye::Right),
            );
        }

        // --- Acquire the mirror surface ---------------------------------------
        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        // --- 1. Six offscreen scene passes ------------------------------------
        for (i, screen) in self.screens.iter().enumerate() {
            let mut rpass = screen.begin_scene_pass(&mut encoder);
            self.scene.draw_eye_scene(
                &mut rpass,
                &self.pipelines,
                &self.arena,
                screen_eye(i),
                side_slot(i),
                cube_slot(i),
            );
        }

        // --- 2. Stereo composite ----------------------------------------------
        {
            let mut rpass = self.eye_buffer.begin_pass(&mut encoder);
            for eye in Eye::BOTH {
                self.eye_buffer.set_viewport(&mut rpass, eye);
                let slot = composite_slot(eye);

                // This eye's three screens, numbered 1..=6 across both eyes.
                for (i, screen) in self.screens.iter().enumerate() {
                    if screen_eye(i) != eye {
                        continue;
                    }
                    let faulted = self.frame.fault.hits(i as u8 + 1);
                    screen.draw_composite(&mut rpass, &self.pipelines, &self.arena, slot, faulted);
                }

                if self.frame.show_debug_lines {
                    self.lines
                        .draw(&mut rpass, &self.pipelines, &self.arena, slot);
                }

                self.scene
                    .draw_backdrop(&mut rpass, &self.pipelines, &self.arena, slot);
            }
        }

        // --- 3. Mirror blit ----------------------------------------------------
        self.mirror
            .blit(&mut encoder, &surface_view, &self.eye_buffer);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_disjoint_and_within_the_arena() {
        let mut seen = std::collections::HashSet::new();
        for i in 0..6 {
            assert!(seen.insert(side_slot(i)));
            assert!(seen.insert(cube_slot(i)));
        }
        for eye in Eye::BOTH {
            assert!(seen.insert(composite_slot(eye)));
        }
        assert_eq!(seen.len() as u32, SLOT_COUNT);
        assert!(seen.iter().all(|&s| s < SLOT_COUNT));
    }

    #[test]
    fn screens_split_three_per_eye() {
        assert!((0..3).all(|i| screen_eye(i) == Eye::Left));
        assert!((3..6).all(|i| screen_eye(i) == Eye::Right));
    }
}
