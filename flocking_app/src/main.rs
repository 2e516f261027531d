extern crate nannou;
use std::{fs::File, io::BufReader};

use clap_serde_derive::{clap::Parser, ClapSerde};
use log::{error, info, warn};
use nannou::{color::*, prelude::*};
use nannou_egui::{egui, Egui};

use flocking_lib::{
    agent::AgentKind,
    flock::ParticleSystem,
    options::{CanvasSize, SimParams},
    render::{Canvas, Paint},
};

mod cliargs;
use cliargs::{Args, Config};

/// Longest frame handed to the simulation, a stalled window must not
/// teleport the flock.
const MAX_FRAME_SECS: f32 = 0.1;
const MAX_POPULATION: usize = 600;

fn main() {
    env_logger::init();

    nannou::app(model).update(update).run();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// slider driven population of flocking boids
    Flock,
    /// clicks spawn bouncing dots
    Bounce,
}

struct ControlsState {
    execution_paused: bool,
    controls_open: bool,
}

struct Model {
    egui: Egui,
    system: ParticleSystem,
    mode: Mode,
    target_population: usize,
    fps: f32,
    control_state: ControlsState,
}

fn load_config() -> Config {
    let mut args = Args::parse();

    if let Ok(f) = File::open(&args.config_path) {
        // Parse config with serde
        match serde_yaml::from_reader::<_, <Config as ClapSerde>::Opt>(BufReader::new(f)) {
            // merge config already parsed from clap
            Ok(config) => return Config::from(config).merge(&mut args.config),
            Err(err) => error!(
                "ignoring config file {}: {}",
                args.config_path.display(),
                err
            ),
        }
    }

    // If there is no usable config file return only config parsed from clap
    Config::from(&mut args.config)
}

fn model(app: &App) -> Model {
    let config = load_config();
    let canvas = config.canvas();

    let system = match ParticleSystem::new(config.params(), canvas) {
        Ok(system) => system,
        Err(err) => {
            warn!("invalid configuration ({}), falling back to defaults", err);
            ParticleSystem::new(SimParams::default(), CanvasSize::default())
                .expect("default parameters are valid")
        }
    };
    let canvas = system.canvas();

    let main_window = app
        .new_window()
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .size(canvas.width as u32, canvas.height as u32)
        .title("boids flocking")
        .raw_event(raw_window_event)
        .view(view)
        .build()
        .unwrap();

    let window = app.window(main_window).unwrap();

    let mut model = Model {
        egui: Egui::from_window(&window),
        system,
        mode: Mode::Flock,
        target_population: config.no_boids.min(MAX_POPULATION),
        fps: 0.,
        control_state: ControlsState {
            execution_paused: false,
            controls_open: false,
        },
    };
    model.system.populate(model.target_population);
    info!(
        "started with {} boids on a {}x{} canvas",
        model.target_population, canvas.width, canvas.height
    );

    model
}

fn update(app: &App, model: &mut Model, update: Update) {
    let elapsed = update.since_last.as_secs_f32();
    if elapsed > 0. {
        model.fps = 0.9 * model.fps + 0.1 / elapsed;
    }

    // follow the window as it could be resized
    let win = app.window_rect();
    let canvas = model.system.canvas();
    if win.w() != canvas.width || win.h() != canvas.height {
        if let Err(err) = model.system.resize(win.w(), win.h()) {
            warn!("{}", err);
        }
    }

    update_controls(model, &update);
    sync_population(model);

    if model.control_state.execution_paused {
        return;
    }
    model.system.move_all(elapsed.min(MAX_FRAME_SECS));
}

fn update_controls(model: &mut Model, update: &Update) {
    let Model {
        ref mut egui,
        ref mut system,
        ref mut target_population,
        ref mut control_state,
        mode,
        fps,
    } = *model;

    let mut params = system.params().clone();
    let mut debug = system.debug();
    let mut slow_motion = false;
    let mut clear = false;

    egui.set_elapsed_time(update.since_start);
    let ctx = egui.begin_frame();
    egui::Window::new("controls")
        .default_size(egui::vec2(0.0, 200.0))
        .open(&mut control_state.controls_open)
        .show(&ctx, |ui| {
            ui.label(format!("mode: {:?} (M to switch)", mode));
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("population");
                ui.add_enabled(
                    mode == Mode::Flock,
                    egui::Slider::new(&mut *target_population, 0..=MAX_POPULATION),
                )
            });

            ui.horizontal(|ui| {
                ui.label("view range");
                ui.add(egui::Slider::new(&mut params.view_range, 0.0..=300.0))
            });

            ui.horizontal(|ui| {
                ui.label("protected distance");
                ui.add(egui::Slider::new(&mut params.min_distance, 0.0..=100.0))
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("separation");
                ui.add(egui::Slider::new(&mut params.separation_factor, 0.0..=10.0))
            });

            ui.horizontal(|ui| {
                ui.label("cohesion");
                ui.add(egui::Slider::new(&mut params.cohesion_factor, 0.0..=5.0))
            });

            ui.horizontal(|ui| {
                ui.label("alignment");
                ui.add(egui::Slider::new(&mut params.alignment_factor, 0.0..=5.0))
            });

            ui.horizontal(|ui| {
                ui.label("wall avoidance");
                ui.add(egui::Slider::new(&mut params.wall_avoid_factor, 0.0..=2.0))
            });

            ui.horizontal(|ui| {
                ui.label("scatter chance");
                ui.add(egui::Slider::new(&mut params.scatter_chance, 0.0..=1.0))
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("min speed");
                ui.add(egui::Slider::new(&mut params.min_velocity, 1.0..=params.max_velocity))
            });

            ui.horizontal(|ui| {
                ui.label("max speed");
                ui.add(egui::Slider::new(&mut params.max_velocity, params.min_velocity..=600.0))
            });

            ui.horizontal(|ui| {
                ui.label("time scale");
                ui.add(egui::Slider::new(&mut params.time_scale, 0.0..=2.0))
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.add(egui::Checkbox::new(&mut debug, "debug"));
                slow_motion = ui.button("slow motion").clicked();
                clear = ui.button("clear").clicked();
            });

            ui.horizontal(|ui| {
                ui.label(format!("agents: {n:3}", n = system.num_particles()));
            });

            ui.horizontal(|ui| {
                ui.label(format!("FPS: {fps:3.0}"));
            });

            ui.horizontal(|ui| {
                ui.label(if system.is_scattering() {
                    "scattering"
                } else {
                    "flocking"
                });
            });
        });

    if params != *system.params() {
        if let Err(err) = system.set_params(params) {
            warn!("{}", err);
        }
    }
    system.set_debug(debug);
    if slow_motion {
        system.toggle_slow_motion();
    }
    if clear {
        system.remove_all();
        *target_population = 0;
    }
}

/// Brings the number of boids to the population target, one at a time.
fn sync_population(model: &mut Model) {
    if model.mode != Mode::Flock {
        return;
    }

    let boids = model
        .system
        .filter(|a| a.kind() == AgentKind::Boid && !a.is_marked_for_removal())
        .len();

    if boids < model.target_population {
        (boids..model.target_population).for_each(|_| model.system.add_particle());
    } else if boids > model.target_population {
        model.system.remove_particle();
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    let Model {
        ref mut system,
        ref mut control_state,
        ref mut mode,
        target_population,
        ..
    } = *model;

    match key {
        // pause the whole simulation
        Key::Space => control_state.execution_paused = !control_state.execution_paused,
        // show/hide controls
        Key::C => control_state.controls_open = !control_state.controls_open,
        Key::D => system.set_debug(!system.debug()),
        Key::S => {
            let scale = system.toggle_slow_motion();
            info!("time scale {}", scale);
        }
        Key::M => {
            *mode = match mode {
                Mode::Flock => {
                    system.mark_where(|a| a.kind() == AgentKind::Boid);
                    Mode::Bounce
                }
                Mode::Bounce => {
                    system.mark_where(|a| a.kind() == AgentKind::Bouncer);
                    system.populate(target_population);
                    Mode::Flock
                }
            };
            info!("switched to {:?} mode", mode);
        }
        // restart the flock, not the simulation
        Key::R => {
            system.remove_all();
            if *mode == Mode::Flock {
                system.populate(target_population);
            }
        }
        Key::Back => system.remove_all(),
        _ => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, _button: MouseButton) {
    if model.control_state.controls_open || model.mode != Mode::Bounce {
        return;
    }

    let win = app.window_rect();
    let x = app.mouse.x - win.left();
    let y = win.top() - app.mouse.y;
    model.system.add_bouncer(x, y);
}

/// Maps the simulation's canvas (origin top left, y down) onto nannou's
/// window space (origin centre, y up).
struct NannouCanvas<'a> {
    draw: &'a Draw,
    win: Rect,
}

impl NannouCanvas<'_> {
    fn to_screen(&self, p: Vec2) -> Vec2 {
        vec2(self.win.left() + p.x, self.win.top() - p.y)
    }
}

impl Canvas for NannouCanvas<'_> {
    fn triangle(&mut self, points: [Vec2; 3], paint: Paint) {
        let points = points.map(|p| self.to_screen(p));
        self.draw
            .polygon()
            .stroke(AZURE)
            .stroke_weight(1.0)
            .points(points)
            .z(1.)
            .color(paint_color(paint));
    }

    fn circle(&mut self, centre: Vec2, radius: f32, filled: bool, paint: Paint) {
        let xy = self.to_screen(centre);
        if filled {
            self.draw
                .ellipse()
                .xy(xy)
                .radius(radius)
                .color(paint_color(paint));
        } else {
            self.draw
                .ellipse()
                .xy(xy)
                .radius(radius)
                .no_fill()
                .stroke(paint_color(paint))
                .stroke_weight(2.);
        }
    }

    fn line(&mut self, start: Vec2, end: Vec2, paint: Paint) {
        self.draw
            .line()
            .start(self.to_screen(start))
            .end(self.to_screen(end))
            .color(paint_color(paint))
            .weight(3.0);
    }
}

fn paint_color(paint: Paint) -> Srgb<u8> {
    match paint {
        Paint::Boid => STEELBLUE,
        Paint::Bouncer => ORANGE,
        Paint::Highlight => HOTPINK,
        Paint::Neighbour => LIMEGREEN,
        Paint::TooClose => RED,
        Paint::ViewRange => YELLOW,
        Paint::ProtectedRange => BLUE,
        Paint::Velocity => LIME,
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();

    draw.background().color(PLUM);

    let mut canvas = NannouCanvas {
        draw: &draw,
        win: app.window_rect(),
    };
    model.system.render_all(&mut canvas);

    if let Err(err) = draw.to_frame(app, &frame) {
        error!("failed to draw frame: {:?}", err);
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        error!("failed to draw controls: {:?}", err);
    }
}
