//! Runner engine: the headless pursuit simulation.
//!
//! `RunnerEngine` owns the runner body and the pursuit controller, processes
//! queued commands at tick boundaries, advances everything at a fixed
//! timestep, and produces `PursuitSnapshot`s. No renderer or audio
//! dependency, enabling deterministic testing.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec3;
use log::debug;

use runner_core::commands::PursuitCommand;
use runner_core::config::PursuitConfig;
use runner_core::constants::DT;
use runner_core::events::PursuitEvent;
use runner_core::state::PursuitSnapshot;
use runner_core::types::SimTime;

use crate::controller::PursuitController;
use crate::runner::RunnerBody;

/// Default runner speed (units/s).
pub const DEFAULT_RUNNER_SPEED: f32 = 8.0;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Initial time scale (1.0 = normal).
    pub time_scale: f32,
    /// Initial runner speed (units/s).
    pub runner_speed: f32,
    /// How far behind the runner the camera still sees. `None` disables
    /// the view test so retreats use the fallback distance.
    pub camera_depth: Option<f32>,
    pub pursuit: PursuitConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            runner_speed: DEFAULT_RUNNER_SPEED,
            camera_depth: Some(18.0),
            pursuit: PursuitConfig::default(),
        }
    }
}

/// Camera that trails the runner: anything further behind than `depth`
/// along the track is off screen.
struct TrailingCamera {
    runner_z: Rc<Cell<f32>>,
    depth: f32,
}

impl TrailingCamera {
    fn is_off_screen(&self, point: Vec3) -> bool {
        self.runner_z.get() - point.z > self.depth
    }
}

/// The simulation engine. Owns the runner, the chaser and all pursuit state.
pub struct RunnerEngine {
    controller: PursuitController<RunnerBody>,
    time: SimTime,
    paused: bool,
    time_scale: f32,
    command_queue: VecDeque<PursuitCommand>,
    camera_runner_z: Rc<Cell<f32>>,
}

impl RunnerEngine {
    /// Create a new engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let runner = RunnerBody::new(Vec3::ZERO, Vec3::Z, config.runner_speed);
        let mut controller = PursuitController::with_target(config.pursuit, runner);

        let camera_runner_z = Rc::new(Cell::new(0.0));
        if let Some(depth) = config.camera_depth {
            let camera = TrailingCamera {
                runner_z: Rc::clone(&camera_runner_z),
                depth,
            };
            controller.set_view_test(Box::new(move |point: Vec3| camera.is_off_screen(point)));
        }

        Self {
            controller,
            time: SimTime::default(),
            paused: false,
            time_scale: config.time_scale,
            command_queue: VecDeque::new(),
            camera_runner_z,
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PursuitCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PursuitCommand>) {
        self.command_queue.extend(commands);
    }

    /// Register an event observer on the underlying controller.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&PursuitEvent) + 'static) {
        self.controller.subscribe(subscriber);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> PursuitSnapshot {
        self.process_commands();

        if !self.paused {
            if let Some(runner) = self.controller.target_mut() {
                runner.advance(DT);
                self.camera_runner_z.set(runner.position.z);
            }
            self.controller.tick(DT);
            self.time.advance();
        }

        self.build_snapshot()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn controller(&self) -> &PursuitController<RunnerBody> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PursuitController<RunnerBody> {
        &mut self.controller
    }

    pub fn runner(&self) -> Option<&RunnerBody> {
        self.controller.target()
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: PursuitCommand) {
        debug!("tick {}: {command:?}", self.time.tick);
        match command {
            PursuitCommand::StartContinuousChase => self.controller.start_continuous_chase(),
            PursuitCommand::StopContinuousChase => self.controller.stop_continuous_chase(),
            PursuitCommand::StartTemporaryChase => self.controller.start_temporary_chase(),
            PursuitCommand::NotifyHitWhileChasing => self.controller.notify_hit_while_chasing(),
            PursuitCommand::TriggerFatalCapture => self.controller.trigger_fatal_capture(),
            PursuitCommand::AdoptExternalChaser { pose } => {
                self.controller.adopt_external_chaser(pose)
            }
            PursuitCommand::PlaceChaser { pose } => self.controller.place_chaser(pose),
            PursuitCommand::SetRunnerSpeed { speed } => {
                if let Some(runner) = self.controller.target_mut() {
                    runner.speed = speed.max(0.0);
                }
            }
            PursuitCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            PursuitCommand::Pause => self.paused = true,
            PursuitCommand::Resume => self.paused = false,
        }
    }

    fn build_snapshot(&mut self) -> PursuitSnapshot {
        self.controller.snapshot(self.time, self.paused)
    }
}
