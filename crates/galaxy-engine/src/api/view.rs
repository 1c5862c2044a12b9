use glam::{Vec2, Vec3};
use log::{debug, info, warn};
use crate::api::config::GalaxyConfig;
use crate::api::types::{BodyId, SelectCallback, Viewport};
use crate::core::resources::{ResourceId, ResourceKind, ResourceLedger};
use crate::core::scheduler::{FrameScheduler, Task, TaskHandle};
use crate::core::time::{FrameClock, FrameTime};
use crate::input::orbit_controls::{ControlEvent, OrbitControls};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::traits::{FrameData, Renderer, RendererSettings, ResourceDescriptor};
use crate::systems::animation::tick_scene;
use crate::systems::auto_orbit::{AutoOrbitScheduler, CameraAuthority, InteractionState};
use crate::systems::autoscale::AutoscaleProfile;
use crate::systems::interaction::InteractionController;
use crate::systems::labels::{LabelProjector, LabelSink};
use crate::systems::render::{build_frame_buffers, FrameBuffers};
use crate::systems::resize::ResizeHandler;
use crate::systems::scene_builder::{GalaxyScene, SceneBuilder};
use crate::systems::zoom::{ZoomAnimator, ZoomProgress};

/// One mounted galaxy visualization.
///
/// The view owns the scene, the camera and every scheduled task, and its
/// methods are the only way to mutate them. The host drives it with
/// `push_input` and one `run_frame` per animation frame, and must call
/// `unmount` before dropping it so GPU resources are released.
pub struct GalaxyView {
    config: GalaxyConfig,
    viewport: Viewport,
    profile: AutoscaleProfile,
    scene: GalaxyScene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    interaction: InteractionState,
    picker: InteractionController,
    zoom: ZoomAnimator,
    auto_orbit: AutoOrbitScheduler,
    labels: LabelProjector,
    resize: ResizeHandler,
    scheduler: FrameScheduler,
    ledger: ResourceLedger,
    input: InputQueue,
    clock: FrameClock,
    buffers: FrameBuffers,
    galaxy_points: Option<ResourceId>,
    render_handle: Option<TaskHandle>,
    on_select: Option<SelectCallback>,
    authority: CameraAuthority,
    frame_count: u64,
    mounted: bool,
}

impl GalaxyView {
    /// Build the scene for `viewport`, upload it and schedule the first frame.
    pub fn mount(config: GalaxyConfig, viewport: Viewport, now_ms: f64, renderer: &mut dyn Renderer) -> Self {
        let profile = AutoscaleProfile::from_viewport(&viewport, &config.autoscale);
        let aspect = viewport.aspect().unwrap_or_else(|| {
            warn!("mounting into a zero-size viewport {}x{}", viewport.width, viewport.height);
            1.0
        });

        let mut camera = PerspectiveCamera::new(profile.fov, aspect, config.camera.near, config.camera.far);
        camera.position = Vec3::from_array(config.camera.initial_position) * profile.distance_multiplier;
        camera.look_at(Vec3::ZERO);
        let mut controls = OrbitControls::new(&config.camera, Vec3::ZERO);

        let pixel_ratio = profile.pixel_ratio(viewport.device_pixel_ratio);
        renderer.configure(RendererSettings {
            antialias: !profile.reduce_quality,
            pixel_ratio,
            transparent: true,
        });
        if viewport.has_area() {
            controls.set_viewport_height(viewport.height);
            renderer.resize(viewport.width as u32, viewport.height as u32, pixel_ratio);
        }

        let mut scene = SceneBuilder::new(&config).build(&profile);
        let mut ledger = ResourceLedger::new();
        let galaxy_points = upload_scene(&mut scene, &mut ledger, renderer);

        let mut scheduler = FrameScheduler::new();
        let render_handle = scheduler.request_frame(Task::RenderLoop);

        info!(
            "galaxy view mounted on {}: {}x{} {:?}, {} resources",
            renderer.backend(),
            viewport.width,
            viewport.height,
            profile.tier,
            ledger.live()
        );

        Self {
            viewport,
            picker: InteractionController::new(&scene),
            zoom: ZoomAnimator::new(config.zoom.easing),
            auto_orbit: AutoOrbitScheduler::new(config.orbit.clone(), profile.distance_multiplier),
            labels: LabelProjector::new(&config.labels),
            resize: ResizeHandler::new(config.resize.debounce_ms),
            interaction: InteractionState::new(now_ms),
            clock: FrameClock::new(now_ms),
            input: InputQueue::new(),
            buffers: FrameBuffers::default(),
            render_handle: Some(render_handle),
            on_select: None,
            authority: CameraAuthority::AutoOrbit,
            frame_count: 0,
            mounted: true,
            profile,
            scene,
            camera,
            controls,
            scheduler,
            ledger,
            galaxy_points,
            config,
        }
    }

    /// Queue an input event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.mounted {
            self.input.push(event);
        }
    }

    /// Set a body's external progress scalar. Values are used as given.
    pub fn set_progress(&mut self, body: BodyId, progress: f32) {
        self.scene.body_mut(body).progress = progress;
    }

    pub fn progress(&self, body: BodyId) -> f32 {
        self.scene.body(body).progress
    }

    pub fn set_on_select(&mut self, callback: Option<SelectCallback>) {
        self.on_select = callback;
    }

    /// Zoom to `body` and report the selection. Shared by mesh picks and
    /// label clicks.
    pub fn select(&mut self, body: BodyId, now_ms: f64) {
        if !self.mounted {
            return;
        }
        let target = *self.picker.target(body);
        let info = target.selection(&self.scene);
        self.zoom_to(info.position, target.zoom_distance, now_ms);
        debug!("selected {} at {:?}", body.tag(), info.position);
        if let Some(callback) = self.on_select.as_mut() {
            callback(body, &info);
        }
    }

    /// Start a camera transition ending `distance` (before the tier
    /// multiplier) from `target`.
    pub fn zoom_to(&mut self, target: Vec3, distance: f32, now_ms: f64) {
        if !self.mounted {
            return;
        }
        self.zoom.zoom_to(
            &self.camera,
            self.controls.target,
            target,
            distance * self.profile.distance_multiplier,
            self.config.zoom.duration_ms,
            now_ms,
            &mut self.scheduler,
        );
        self.interaction.touch(now_ms);
    }

    /// Run everything due at `now_ms`: queued input, the resize timer, the
    /// zoom step and the render loop. Returns whether a frame was drawn.
    pub fn run_frame(&mut self, now_ms: f64, renderer: &mut dyn Renderer, labels: &mut dyn LabelSink) -> bool {
        if !self.mounted {
            return false;
        }

        for event in self.input.drain() {
            self.handle_input(event, now_ms);
        }

        let due = self.scheduler.take_due(now_ms);
        self.authority = self.auto_orbit.authority(&mut self.interaction, self.zoom.is_active(), now_ms);

        let mut drawn = false;
        for (handle, task) in due {
            match task {
                Task::ResizeSettle => {
                    if let Some(viewport) = self.resize.settle(handle) {
                        self.apply_resize(viewport, renderer);
                    }
                }
                Task::ZoomStep => {
                    let step = self.zoom.step(handle, now_ms, &mut self.camera, &mut self.controls, &mut self.scheduler);
                    if step == Some(ZoomProgress::Finished) {
                        self.interaction.touch(now_ms);
                    }
                }
                Task::RenderLoop => {
                    if self.render_handle == Some(handle) {
                        self.render_tick(now_ms, renderer, labels);
                        drawn = true;
                    }
                }
            }
        }
        drawn
    }

    fn handle_input(&mut self, event: InputEvent, now_ms: f64) {
        match event {
            InputEvent::PointerDown { x, y, pointer_id } => {
                let pos = Vec2::new(x, y);
                if let Some(control) = self.controls.pointer_down(pointer_id, pos) {
                    self.on_control(control, now_ms);
                }
                let picked = self.picker.pick(&self.scene, &self.camera, pos, self.viewport.width, self.viewport.height);
                if let Some(body) = picked {
                    self.select(body, now_ms);
                }
            }
            InputEvent::PointerMove { x, y, pointer_id } => {
                self.controls.pointer_move(pointer_id, Vec2::new(x, y), &self.camera);
            }
            InputEvent::PointerUp { pointer_id, .. } => {
                if let Some(control) = self.controls.pointer_up(pointer_id) {
                    self.on_control(control, now_ms);
                }
            }
            InputEvent::Wheel { delta_y } => {
                for control in self.controls.wheel(delta_y) {
                    self.on_control(control, now_ms);
                }
            }
            InputEvent::Resize(viewport) => {
                self.resize.on_resize(viewport, now_ms, &mut self.scheduler);
            }
            InputEvent::LabelClick(body) => self.select(body, now_ms),
        }
    }

    fn on_control(&mut self, event: ControlEvent, now_ms: f64) {
        self.interaction.on_control(event, now_ms);
    }

    fn apply_resize(&mut self, viewport: Viewport, renderer: &mut dyn Renderer) {
        let applied = self.resize.apply(
            &viewport,
            &self.config.autoscale,
            &mut self.camera,
            &mut self.controls,
            renderer,
        );
        if let Some(profile) = applied {
            if profile.tier != self.profile.tier {
                debug!("device tier changed {:?} -> {:?}", self.profile.tier, profile.tier);
            }
            self.auto_orbit.set_distance_multiplier(profile.distance_multiplier);
            self.profile = profile;
            self.viewport = viewport;
        }
    }

    fn render_tick(&mut self, now_ms: f64, renderer: &mut dyn Renderer, labels: &mut dyn LabelSink) {
        let time: FrameTime = self.clock.tick(now_ms);
        self.frame_count += 1;

        // The zoom step has already placed the camera this frame.
        if self.authority != CameraAuthority::ZoomTransition {
            self.controls.update(&mut self.camera);
        }

        tick_scene(&mut self.scene, time, self.config.galaxy.rotation_speed);

        if self.labels.is_due(self.frame_count) {
            let positions = BodyId::ALL.map(|body| self.scene.body_position(body));
            self.labels.project(&self.camera, &positions, self.viewport.width, self.viewport.height, labels);
        }

        if self.authority == CameraAuthority::AutoOrbit {
            self.auto_orbit.apply(
                &mut self.camera,
                &mut self.controls,
                &self.interaction,
                self.scene.star_position,
                time.elapsed,
                now_ms,
            );
        }

        build_frame_buffers(&self.scene.graph, &mut self.buffers);
        renderer.draw(&FrameData {
            camera: self.camera.uniform(),
            galaxy_model: self.scene.graph.world_matrix(self.scene.galaxy),
            galaxy_points: self.galaxy_points,
            meshes: &self.buffers.meshes,
            lights: &self.buffers.lights,
        });

        self.render_handle = Some(self.scheduler.request_frame(Task::RenderLoop));
    }

    /// Cancel every task and release every resource. Safe to call twice;
    /// the second call does nothing and returns false.
    pub fn unmount(&mut self, renderer: &mut dyn Renderer) -> bool {
        if !self.mounted {
            return false;
        }
        self.zoom.cancel(&mut self.scheduler);
        self.resize.cancel(&mut self.scheduler);
        if let Some(handle) = self.render_handle.take() {
            self.scheduler.cancel(handle);
        }
        let leftover_tasks = self.scheduler.cancel_all();

        let released = self.ledger.release_all(|id, kind| {
            if kind.is_gpu() {
                renderer.release(id);
            }
        });
        renderer.dispose();

        self.input.clear();
        self.on_select = None;
        self.galaxy_points = None;
        self.mounted = false;
        info!("galaxy view unmounted: {} resources released, {} stray tasks", released, leftover_tasks);
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the host should request another animation frame.
    pub fn wants_frame(&self) -> bool {
        self.mounted && self.scheduler.wants_frame()
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn profile(&self) -> &AutoscaleProfile {
        &self.profile
    }

    pub fn scene(&self) -> &GalaxyScene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Camera authority chosen for the most recent frame.
    pub fn authority(&self) -> CameraAuthority {
        self.authority
    }

    pub fn zoom(&self) -> &ZoomAnimator {
        &self.zoom
    }

    pub fn auto_orbit(&self) -> &AutoOrbitScheduler {
        &self.auto_orbit
    }

    pub fn labels(&self) -> &LabelProjector {
        &self.labels
    }

    pub fn resize_handler(&self) -> &ResizeHandler {
        &self.resize
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// Hosts register their own labels and listeners here.
    pub fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Upload the point cloud and every mesh, recording handles on the meshes.
fn upload_scene(scene: &mut GalaxyScene, ledger: &mut ResourceLedger, renderer: &mut dyn Renderer) -> Option<ResourceId> {
    let points = if scene.points.is_empty() {
        None
    } else {
        let id = ledger.acquire(ResourceKind::Geometry, "galaxy.points");
        renderer.upload(id, ResourceDescriptor::Points {
            vertices: &scene.points.vertices,
            size: scene.points.size,
        });
        Some(id)
    };

    for node in scene.graph.iter_mut() {
        let tag = node.tag.clone();
        let Some(mesh) = node.mesh_mut() else { continue };
        let geometry = ledger.acquire(ResourceKind::Geometry, format!("{tag}.geometry"));
        renderer.upload(geometry, ResourceDescriptor::Geometry(&mesh.geometry));
        let material = ledger.acquire(ResourceKind::Material, format!("{tag}.material"));
        renderer.upload(material, ResourceDescriptor::Material(&mesh.material));
        mesh.geometry_handle = Some(geometry);
        mesh.material_handle = Some(material);
    }
    points
}
