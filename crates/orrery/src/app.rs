use glam::Vec3;
use orrery_engine::camera::FreeCamera;
use orrery_engine::coords::Viewport;
use orrery_engine::core::{App, AppControl, FrameCtx};
use orrery_engine::gfx::{Canvas, Canvas3d};
use orrery_engine::input::{InputFrame, Key};
use orrery_engine::paint::Color;
use orrery_engine::render::SceneRenderer;
use orrery_engine::scene::DrawList;
use orrery_engine::text::{FontId, FontSystem};
use orrery_engine::time::FpsCounter;

use crate::sim::Simulation;
use crate::system::SolarSystem;
use crate::traverse::{render_body, render_labels};

pub const HELP_TEXT: &str =
    "- [h] Toggle help\n- [l] Toggle labels\n- [left/right arrows] Increase/decrease rotation speed";
pub const HELP_HINT: &str = "Press [h] for help";

/// Camera the viewer opens with.
pub fn initial_camera() -> FreeCamera {
    FreeCamera::new(Vec3::new(20.0, 12.0, 20.0), Vec3::ZERO, Vec3::Y, 45.0)
}

/// Toggles and tunables driven by the keyboard.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    pub show_help: bool,
    pub show_labels: bool,
    pub sim: Simulation,
}

impl ViewState {
    pub fn new(sim: Simulation, show_labels: bool) -> Self {
        Self { show_help: false, show_labels, sim }
    }

    /// Applies this frame's key presses. `Esc` asks to exit.
    pub fn handle_keys(&mut self, frame: &InputFrame) -> AppControl {
        if frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if frame.key_pressed(Key::H) {
            self.show_help = !self.show_help;
        }
        if frame.key_pressed(Key::L) {
            self.show_labels = !self.show_labels;
        }
        if frame.key_pressed(Key::ArrowLeft) {
            self.sim.slow_down();
        }
        if frame.key_pressed(Key::ArrowRight) {
            self.sim.speed_up();
        }
        AppControl::Continue
    }
}

/// Draws the speed banner, help text and FPS counter.
pub fn draw_hud(canvas: &mut Canvas<'_>, view: &ViewState, fps: u32) {
    canvas.draw_text(
        &format!("FULL SOLAR SYSTEM - SPEED: {:.2}", view.sim.rotation_speed),
        120.0,
        10.0,
        20.0,
        Color::LIME,
    );

    let help = if view.show_help { HELP_TEXT } else { HELP_HINT };
    canvas.draw_text(help, 10.0, 40.0, 10.0, Color::GREEN);

    canvas.draw_fps(10.0, 10.0, fps);
}

/// Runs the render pass and, when enabled, the label pass.
pub fn record_scene<C: Canvas3d>(
    system: &mut SolarSystem,
    view: &ViewState,
    camera: &FreeCamera,
    canvas: &mut C,
) {
    let root = system.root;
    render_body(&mut system.graph, root, canvas, camera, &view.sim);
    if view.show_labels {
        render_labels(&system.graph, root, canvas);
    }
}

/// The solar system viewer.
pub struct OrreryApp {
    system: SolarSystem,
    camera: FreeCamera,
    view: ViewState,

    fonts: FontSystem,
    font: Option<FontId>,

    draw_list: DrawList,
    renderer: SceneRenderer,
    fps: FpsCounter,
}

impl OrreryApp {
    pub fn new(system: SolarSystem, view: ViewState, fonts: FontSystem, font: Option<FontId>) -> Self {
        Self {
            system,
            camera: initial_camera(),
            view,
            fonts,
            font,
            draw_list: DrawList::new(),
            renderer: SceneRenderer::new(),
            fps: FpsCounter::new(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    /// Records one frame of the scene into the draw list.
    pub fn record(&mut self, viewport: Viewport) {
        self.draw_list.clear();

        let mut canvas = Canvas::new(&mut self.draw_list, &self.fonts, self.font, viewport, self.camera);
        record_scene(&mut self.system, &self.view, &self.camera, &mut canvas);
        draw_hud(&mut canvas, &self.view, self.fps.fps());

        canvas.finish();
    }
}

impl App for OrreryApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let dt = ctx.time.dt;
        self.fps.record(dt);

        self.camera.update(ctx.input, ctx.input_frame, dt);
        if self.view.handle_keys(ctx.input_frame) == AppControl::Exit {
            log::info!("exit requested");
            return AppControl::Exit;
        }

        self.record(ctx.window.viewport());

        let (renderer, draw_list, fonts) = (&mut self.renderer, &mut self.draw_list, &self.fonts);
        ctx.render(Color::BLACK, |rctx, target| {
            renderer.render(rctx, target, draw_list, fonts);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::input::{InputState, KeyState, Modifiers};
    use orrery_engine::input::InputEvent;
    use orrery_engine::assets::Model;
    use orrery_engine::coords::Vec2;
    use orrery_engine::scene::DrawCmd;
    use std::path::Path;

    fn press(keys: &[Key]) -> InputFrame {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for &key in keys {
            state.apply_event(
                &mut frame,
                InputEvent::Key { key, state: KeyState::Pressed, modifiers: Modifiers::default(), repeat: false },
            );
        }
        frame
    }

    #[test]
    fn keys_toggle_and_step_speed() {
        let mut view = ViewState::new(Simulation::default(), true);

        assert_eq!(view.handle_keys(&press(&[Key::H, Key::L])), AppControl::Continue);
        assert!(view.show_help);
        assert!(!view.show_labels);

        view.handle_keys(&press(&[Key::ArrowRight]));
        assert!((view.sim.rotation_speed - 0.3).abs() < 1e-6);
        view.handle_keys(&press(&[Key::ArrowLeft]));
        view.handle_keys(&press(&[Key::ArrowLeft]));
        assert!((view.sim.rotation_speed - 0.1).abs() < 1e-6);

        view.handle_keys(&press(&[Key::H]));
        assert!(!view.show_help);
    }

    #[test]
    fn escape_exits_without_other_changes() {
        let mut view = ViewState::new(Simulation::default(), true);
        assert_eq!(view.handle_keys(&press(&[Key::Escape, Key::H])), AppControl::Exit);
        assert!(!view.show_help);
    }

    #[test]
    fn frame_records_bodies_guides_and_advances_orbits() {
        let system = SolarSystem::build(Path::new("no/such/dir"), false);
        let view = ViewState::new(Simulation::default(), true);
        let mut app = OrreryApp::new(system, view, FontSystem::new(), None);

        app.record(Viewport::new(800.0, 450.0));

        let (mut discs, mut lines) = (0, 0);
        for item in app.draw_list.items() {
            match item.cmd {
                DrawCmd::Circle(_) => discs += 1,
                DrawCmd::Line(_) => lines += 1,
                DrawCmd::Text(_) => {}
            }
        }
        assert_eq!(discs, 6);
        assert_eq!(lines, 5 * 36);

        let graph = &app.system().graph;
        let earth = graph.get(graph.find("earth").unwrap()).unwrap();
        assert!((earth.orbit_position - 0.2 * 360.0 / 365.0).abs() < 1e-6);
    }

    /// Keeps only the text calls; geometry is covered in `traverse`.
    #[derive(Default)]
    struct TextLog(Vec<String>);

    impl Canvas3d for TextLog {
        fn push_matrix(&mut self) {}
        fn pop_matrix(&mut self) {}
        fn rotate(&mut self, _axis: Vec3, _degrees: f32) {}
        fn translate(&mut self, _offset: Vec3) {}
        fn draw_model(&mut self, _model: &Model, _position: Vec3, _scale: f32, _tint: Color) {}
        fn draw_circle_3d(&mut self, _center: Vec3, _radius: f32, _axis: Vec3, _degrees: f32, _color: Color) {}
        fn world_to_screen(&self, point: Vec3, _camera: &FreeCamera) -> Vec2 {
            Vec2::new(point.x, point.y)
        }
        fn draw_text(&mut self, text: &str, _x: f32, _y: f32, _size: f32, _color: Color) {
            self.0.push(text.to_string());
        }
        fn measure_text(&self, text: &str, size: f32) -> f32 {
            text.len() as f32 * size / 2.0
        }
    }

    #[test]
    fn label_toggle_controls_label_pass() {
        let mut system = SolarSystem::build(Path::new("no/such/dir"), false);
        let camera = initial_camera();

        let mut shown = TextLog::default();
        let view = ViewState::new(Simulation::default(), true);
        record_scene(&mut system, &view, &camera, &mut shown);
        assert_eq!(shown.0, ["sun", "mercury", "venus", "earth", "moon", "mars"]);

        let mut hidden = TextLog::default();
        let view = ViewState::new(Simulation::default(), false);
        record_scene(&mut system, &view, &camera, &mut hidden);
        assert!(hidden.0.is_empty());
    }
}
