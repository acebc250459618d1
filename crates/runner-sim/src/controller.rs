//! Pursuit controller: owns the chaser and the pursuit state machine.
//!
//! The chaser lives as a single hecs entity in a private world. Exactly one
//! maneuver may drive it at a time; starting a maneuver drops whatever was
//! running before, so two maneuvers never write the same chaser.

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use log::{debug, info, warn};

use runner_core::components::Chaser;
use runner_core::config::PursuitConfig;
use runner_core::enums::{AnimationIntent, ContestOutcome, PursuitState};
use runner_core::error::PursuitError;
use runner_core::events::PursuitEvent;
use runner_core::state::{ChaserView, ContestView, PursuitSnapshot};
use runner_core::types::{Pose, SimTime, TargetPose};
use runner_pursuit::pose::{behind, facing_rotation};
use runner_pursuit::{
    CaptureManeuver, DistanceDynamics, ManeuverStatus, RetreatManeuver, TemporaryChaseManeuver,
    ViewTest,
};

use crate::collaborators::Target;

/// Template name recorded on chasers handed over by another system.
const EXTERNAL_TEMPLATE: &str = "external";

type Subscriber = Box<dyn FnMut(&PursuitEvent)>;

/// The maneuver currently driving the chaser.
#[derive(Debug, Clone)]
enum ActiveManeuver {
    Chase(DistanceDynamics),
    Temporary(TemporaryChaseManeuver),
    Capture(CaptureManeuver),
    Retreat(RetreatManeuver),
}

/// What the controller must do after ticking a maneuver.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StepResult {
    Continue,
    Caught,
    Escaped,
    TemporaryDone { stop_distance: f32 },
    CaptureDone,
    RetreatDone,
}

impl ActiveManeuver {
    fn state(&self) -> PursuitState {
        match self {
            ActiveManeuver::Chase(_) => PursuitState::Chasing,
            ActiveManeuver::Temporary(_) => PursuitState::TemporaryChasing,
            ActiveManeuver::Capture(_) => PursuitState::Capturing,
            ActiveManeuver::Retreat(_) => PursuitState::Retreating,
        }
    }

    fn animation(&self) -> AnimationIntent {
        match self {
            ActiveManeuver::Chase(_) => AnimationIntent::Running,
            ActiveManeuver::Temporary(m) => m.animation(),
            ActiveManeuver::Capture(m) => m.animation(),
            ActiveManeuver::Retreat(m) => m.animation(),
        }
    }
}

/// Owns the single chaser instance and dispatches pursuit commands.
pub struct PursuitController<T: Target> {
    config: PursuitConfig,
    world: World,
    chaser: Option<Entity>,
    state: PursuitState,
    maneuver: Option<ActiveManeuver>,
    target: Option<T>,
    last_target: TargetPose,
    view: Option<Box<dyn ViewTest>>,
    subscribers: Vec<Subscriber>,
    pending_events: Vec<PursuitEvent>,
    tick: u64,
}

impl<T: Target> PursuitController<T> {
    pub fn new(config: PursuitConfig) -> Self {
        Self {
            config,
            world: World::new(),
            chaser: None,
            state: PursuitState::Idle,
            maneuver: None,
            target: None,
            last_target: TargetPose::default(),
            view: None,
            subscribers: Vec::new(),
            pending_events: Vec::new(),
            tick: 0,
        }
    }

    /// Controller with a target already attached.
    pub fn with_target(config: PursuitConfig, target: T) -> Self {
        let mut controller = Self::new(config);
        controller.attach_target(target);
        controller
    }

    // --- Collaborators ---

    pub fn attach_target(&mut self, target: T) {
        self.last_target = target.pose();
        self.target = Some(target);
    }

    /// Remove the target. Running maneuvers keep using its last known pose
    /// until their timeouts end them.
    pub fn detach_target(&mut self) -> Option<T> {
        self.target.take()
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn target_mut(&mut self) -> Option<&mut T> {
        self.target.as_mut()
    }

    pub fn set_view_test(&mut self, view: Box<dyn ViewTest>) {
        self.view = Some(view);
    }

    pub fn clear_view_test(&mut self) {
        self.view = None;
    }

    /// Register an observer. Called synchronously for every event, in order.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&PursuitEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn config(&self) -> &PursuitConfig {
        &self.config
    }

    // --- Queries ---

    pub fn state(&self) -> PursuitState {
        self.state
    }

    /// True during either kind of chase.
    pub fn is_chasing(&self) -> bool {
        matches!(
            self.state,
            PursuitState::Chasing | PursuitState::TemporaryChasing
        )
    }

    /// Contest distance while `Chasing`; straight-line distance to the
    /// runner otherwise. `None` without a chaser.
    pub fn pursuit_distance(&self) -> Option<f32> {
        if let Some(ActiveManeuver::Chase(dynamics)) = &self.maneuver {
            return Some(dynamics.current_distance());
        }
        self.chaser_position()
            .map(|position| self.last_target.distance_to(position))
    }

    pub fn chaser_position(&self) -> Option<Vec3> {
        self.chaser_pose().map(|pose| pose.position)
    }

    pub fn chaser_facing(&self) -> Option<Quat> {
        self.chaser_pose().map(|pose| pose.facing)
    }

    pub fn chaser_pose(&self) -> Option<Pose> {
        let entity = self.chaser?;
        self.world.get::<&Pose>(entity).ok().map(|pose| *pose)
    }

    pub fn animation_intent(&self) -> Option<AnimationIntent> {
        let entity = self.chaser?;
        self.world
            .get::<&AnimationIntent>(entity)
            .ok()
            .map(|intent| *intent)
    }

    pub fn is_spawned(&self) -> bool {
        self.chaser.is_some()
    }

    /// Number of chaser entities alive. Never more than one.
    pub fn chaser_count(&self) -> usize {
        let mut query = self.world.query::<&Chaser>();
        query.iter().count()
    }

    /// Distance contest values; only present while `Chasing`.
    pub fn contest(&self) -> Option<ContestView> {
        match &self.maneuver {
            Some(ActiveManeuver::Chase(dynamics)) => Some(dynamics.view()),
            _ => None,
        }
    }

    pub fn chaser_view(&self) -> Option<ChaserView> {
        let pose = self.chaser_pose()?;
        Some(ChaserView {
            position: pose.position,
            facing: pose.facing,
            animation: self.animation_intent().unwrap_or_default(),
            distance_to_runner: self.last_target.distance_to(pose.position),
        })
    }

    /// Take the events fired since the last call.
    pub fn drain_events(&mut self) -> Vec<PursuitEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Everything a presentation layer needs for this frame. Drains events.
    pub fn snapshot(&mut self, time: SimTime, paused: bool) -> PursuitSnapshot {
        PursuitSnapshot {
            time,
            paused,
            state: self.state,
            runner: self.target.as_ref().map_or(self.last_target, |t| t.pose()),
            chaser: self.chaser_view(),
            contest: self.contest(),
            events: self.drain_events(),
        }
    }

    // --- Commands ---

    pub fn start_continuous_chase(&mut self) {
        let result = self.try_start_continuous_chase();
        report("start_continuous_chase", result);
    }

    pub fn stop_continuous_chase(&mut self) {
        if self.state == PursuitState::Idle && self.chaser.is_none() {
            debug!("stop_continuous_chase: already idle");
            return;
        }
        self.cancel_maneuver();
        self.despawn_chaser(true);
        self.set_state(PursuitState::Idle);
    }

    pub fn start_temporary_chase(&mut self) {
        let result = self.try_start_temporary_chase();
        report("start_temporary_chase", result);
    }

    pub fn notify_hit_while_chasing(&mut self) {
        match &mut self.maneuver {
            Some(ActiveManeuver::Chase(dynamics)) => {
                dynamics.notify_hit();
                debug!(
                    "hit while chasing: distance now {:.2}",
                    dynamics.current_distance()
                );
            }
            _ => debug!("hit ignored outside continuous chase ({:?})", self.state),
        }
    }

    pub fn trigger_fatal_capture(&mut self) {
        let result = self.try_trigger_fatal_capture();
        report("trigger_fatal_capture", result);
    }

    pub fn adopt_external_chaser(&mut self, pose: Pose) {
        let result = self.try_adopt_external_chaser(pose);
        report("adopt_external_chaser", result);
    }

    /// Park the chaser at `pose` (e.g. at home when a level ends) without chasing.
    pub fn place_chaser(&mut self, pose: Pose) {
        let result = self.try_place_chaser(pose);
        report("place_chaser", result);
    }

    // --- Tick ---

    /// Advance the active maneuver by one frame.
    pub fn tick(&mut self, dt: f32) {
        self.tick += 1;
        let target = self.observe_target();

        let Some(mut maneuver) = self.maneuver.take() else {
            return;
        };
        // Guard against a completion arriving after the state already moved on.
        if maneuver.state() != self.state {
            warn!(
                "dropping stale {:?} maneuver in state {:?}",
                maneuver.state(),
                self.state
            );
            return;
        }
        let Some(mut pose) = self.chaser_pose() else {
            warn!("{:?} maneuver has no chaser; returning to idle", self.state);
            self.chaser = None;
            self.set_state(PursuitState::Idle);
            return;
        };

        let turn_rate = self.config.turn_rate;
        let step = match &mut maneuver {
            ActiveManeuver::Chase(dynamics) => {
                match dynamics.tick(dt, &mut pose, &target, turn_rate) {
                    ContestOutcome::Ongoing => StepResult::Continue,
                    ContestOutcome::Caught => StepResult::Caught,
                    ContestOutcome::Escaped => StepResult::Escaped,
                }
            }
            ActiveManeuver::Temporary(temp) => match temp.tick(dt, &mut pose, &target) {
                ManeuverStatus::Continue => StepResult::Continue,
                ManeuverStatus::Complete => StepResult::TemporaryDone {
                    stop_distance: temp.stop_distance(),
                },
            },
            ActiveManeuver::Capture(capture) => match capture.tick(dt, &mut pose, &target) {
                ManeuverStatus::Continue => StepResult::Continue,
                ManeuverStatus::Complete => StepResult::CaptureDone,
            },
            ActiveManeuver::Retreat(retreat) => {
                let view = self.view.as_deref();
                match retreat.tick(dt, &mut pose, &target, view) {
                    ManeuverStatus::Continue => StepResult::Continue,
                    ManeuverStatus::Complete => StepResult::RetreatDone,
                }
            }
        };
        self.write_chaser_pose(pose);

        match step {
            StepResult::Continue => {
                let intent = maneuver.animation();
                self.maneuver = Some(maneuver);
                self.sync_animation(intent);
            }
            StepResult::Caught => self.finish_caught(),
            StepResult::Escaped => {
                info!("runner escaped the chase");
                self.despawn_chaser(true);
                self.set_state(PursuitState::Idle);
            }
            StepResult::TemporaryDone { stop_distance } => self.begin_retreat(stop_distance),
            StepResult::CaptureDone => {
                self.sync_animation(AnimationIntent::Idle);
                self.emit(PursuitEvent::CaptureSequenceFinished);
                self.set_state(PursuitState::Idle);
            }
            StepResult::RetreatDone => {
                self.despawn_chaser(true);
                self.set_state(PursuitState::Idle);
            }
        }
    }

    // --- Transitions ---

    fn try_start_continuous_chase(&mut self) -> Result<(), PursuitError> {
        match self.state {
            PursuitState::Chasing => {
                debug!("start_continuous_chase: already chasing");
                return Ok(());
            }
            PursuitState::Capturing => {
                debug!("start_continuous_chase: ignored during capture");
                return Ok(());
            }
            _ => {}
        }
        let target = self.require_target()?;
        if self.chaser.is_none() {
            let spawn = Pose::new(
                behind(&target, self.config.chase.start_distance),
                facing_rotation(target.forward),
            );
            self.spawn_or_place(spawn)?;
        }
        self.begin(ActiveManeuver::Chase(DistanceDynamics::new(self.config.chase)));
        Ok(())
    }

    fn try_start_temporary_chase(&mut self) -> Result<(), PursuitError> {
        match self.state {
            PursuitState::Chasing => {
                // Continuous chase takes priority: treat as a hit.
                self.notify_hit_while_chasing();
                return Ok(());
            }
            PursuitState::Capturing => {
                debug!("start_temporary_chase: ignored during capture");
                return Ok(());
            }
            _ => {}
        }
        let target = self.require_target()?;
        let (maneuver, spawn) =
            TemporaryChaseManeuver::start(self.config.temporary, self.config.turn_rate, &target);
        self.spawn_or_place(spawn)?;
        self.begin(ActiveManeuver::Temporary(maneuver));
        Ok(())
    }

    fn try_trigger_fatal_capture(&mut self) -> Result<(), PursuitError> {
        if self.state == PursuitState::Capturing {
            debug!("trigger_fatal_capture: already capturing");
            return Ok(());
        }
        let target = self.require_target()?;
        self.require_template()?;

        self.cancel_maneuver();
        self.despawn_chaser(false);
        let (maneuver, spawn) =
            CaptureManeuver::start(self.config.capture, self.config.turn_rate, &target);
        self.spawn_or_place(spawn)?;
        self.begin(ActiveManeuver::Capture(maneuver));
        Ok(())
    }

    fn try_adopt_external_chaser(&mut self, pose: Pose) -> Result<(), PursuitError> {
        if self.state == PursuitState::Capturing {
            debug!("adopt_external_chaser: ignored during capture");
            return Ok(());
        }
        let target = self.require_target()?;

        self.cancel_maneuver();
        self.despawn_chaser(false);
        let entity = self.world.spawn((
            Chaser {
                template: EXTERNAL_TEMPLATE.to_string(),
                spawned_tick: self.tick,
            },
            pose,
            AnimationIntent::Idle,
        ));
        self.chaser = Some(entity);
        info!("adopted external chaser {entity:?}");

        let distance = target.distance_to(pose.position);
        self.begin(ActiveManeuver::Chase(DistanceDynamics::with_distance(
            self.config.chase,
            distance,
        )));
        Ok(())
    }

    fn try_place_chaser(&mut self, pose: Pose) -> Result<(), PursuitError> {
        if self.chaser.is_none() {
            self.require_template()?;
        }
        self.cancel_maneuver();
        self.spawn_or_place(pose)?;
        self.sync_animation(AnimationIntent::Idle);
        self.set_state(PursuitState::Idle);
        Ok(())
    }

    fn begin_retreat(&mut self, stop_distance: f32) {
        if self.state != PursuitState::TemporaryChasing {
            return;
        }
        let retreat = RetreatManeuver::new(self.config.retreat, stop_distance, self.config.turn_rate);
        self.begin(ActiveManeuver::Retreat(retreat));
    }

    fn finish_caught(&mut self) {
        if self.state != PursuitState::Chasing {
            return;
        }
        info!("runner caught");
        if let Some(target) = self.target.as_mut() {
            target.notify_captured();
        }
        self.emit(PursuitEvent::Captured);
        self.despawn_chaser(true);
        self.set_state(PursuitState::Idle);
    }

    /// Install `maneuver` as the only one driving the chaser.
    fn begin(&mut self, maneuver: ActiveManeuver) {
        self.cancel_maneuver();
        let state = maneuver.state();
        let intent = maneuver.animation();
        self.maneuver = Some(maneuver);
        self.set_state(state);
        self.sync_animation(intent);
    }

    fn cancel_maneuver(&mut self) {
        if let Some(previous) = self.maneuver.take() {
            debug!("cancelled {:?} maneuver", previous.state());
        }
    }

    fn set_state(&mut self, to: PursuitState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!("pursuit {from:?} -> {to:?}");
        self.emit(PursuitEvent::StateChanged { from, to });
    }

    fn emit(&mut self, event: PursuitEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&event);
        }
        self.pending_events.push(event);
    }

    // --- Chaser entity ---

    /// Reposition the existing chaser, or spawn one from the template.
    fn spawn_or_place(&mut self, pose: Pose) -> Result<Entity, PursuitError> {
        if let Some(entity) = self.chaser {
            if let Ok(mut current) = self.world.get::<&mut Pose>(entity) {
                *current = pose;
                return Ok(entity);
            }
            // Entity vanished underneath us; forget it and spawn fresh.
            self.chaser = None;
        }
        let template = self.require_template()?.name.clone();
        let entity = self.world.spawn((
            Chaser {
                template,
                spawned_tick: self.tick,
            },
            pose,
            AnimationIntent::Idle,
        ));
        self.chaser = Some(entity);
        info!("spawned chaser {entity:?} at {:?}", pose.position);
        Ok(entity)
    }

    fn despawn_chaser(&mut self, announce: bool) {
        let Some(entity) = self.chaser.take() else {
            return;
        };
        match self.world.despawn(entity) {
            Ok(()) => info!("despawned chaser {entity:?}"),
            Err(err) => warn!("chaser {entity:?} already gone: {err}"),
        }
        if announce {
            self.emit(PursuitEvent::EntityDisappeared);
        }
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn write_chaser_pose(&mut self, pose: Pose) {
        if let Some(entity) = self.chaser {
            if let Ok(mut current) = self.world.get::<&mut Pose>(entity) {
                *current = pose;
            }
        }
    }

    fn sync_animation(&mut self, intent: AnimationIntent) {
        let Some(entity) = self.chaser else {
            return;
        };
        let changed = match self.world.get::<&mut AnimationIntent>(entity) {
            Ok(mut current) if *current != intent => {
                *current = intent;
                true
            }
            _ => false,
        };
        if changed {
            self.emit(PursuitEvent::AnimationChanged { intent });
        }
    }

    // --- Collaborator access ---

    fn observe_target(&mut self) -> TargetPose {
        if let Some(target) = &self.target {
            self.last_target = target.pose();
        }
        self.last_target
    }

    fn require_target(&mut self) -> Result<TargetPose, PursuitError> {
        let pose = self.target.as_ref().ok_or(PursuitError::NoTarget)?.pose();
        self.last_target = pose;
        Ok(pose)
    }

    fn require_template(&self) -> Result<&runner_core::config::ChaserTemplate, PursuitError> {
        self.config
            .template
            .as_ref()
            .ok_or(PursuitError::NoChaserTemplate)
    }
}

/// Public commands never fail loudly: log the diagnostic and carry on.
fn report(operation: &str, result: Result<(), PursuitError>) {
    if let Err(err) = result {
        warn!("{operation} skipped: {err}");
    }
}
