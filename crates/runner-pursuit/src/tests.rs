#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use runner_core::config::{CaptureTuning, ChaseTuning, RetreatTuning, TemporaryTuning};
    use runner_core::constants::{DT, TURN_RATE};
    use runner_core::enums::{AnimationIntent, ContestOutcome};
    use runner_core::types::{Pose, TargetPose};

    use crate::capture::{capture_point, CaptureManeuver};
    use crate::distance::DistanceDynamics;
    use crate::pose::*;
    use crate::retreat::{RetreatExit, RetreatManeuver};
    use crate::temporary::TemporaryChaseManeuver;
    use crate::ManeuverStatus;

    fn runner_at_origin(speed: f32) -> TargetPose {
        TargetPose::new(Vec3::ZERO, Vec3::Z, speed)
    }

    fn advance(target: &mut TargetPose, dt: f32) {
        target.position += target.forward * target.speed * dt;
    }

    fn scenario_a_tuning() -> ChaseTuning {
        ChaseTuning {
            start_distance: 15.0,
            catch_distance: 1.0,
            max_distance: 30.0,
            safe_duration: 3.0,
            return_speed: 2.0,
            ..ChaseTuning::default()
        }
    }

    // ---- Pose helpers ----

    #[test]
    fn test_move_towards_never_overshoots() {
        let goal = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(move_towards(Vec3::ZERO, goal, 5.0), goal);
        let step = move_towards(Vec3::ZERO, goal, 0.25);
        assert!((step.z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_ground_forward_flattens_and_falls_back() {
        let flat = ground_forward(Vec3::new(0.0, 5.0, 2.0));
        assert!((flat - Vec3::Z).length() < 1e-6);
        assert_eq!(ground_forward(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_behind_and_local_offset_follow_target_heading() {
        let target = TargetPose::new(Vec3::new(5.0, 0.0, 5.0), Vec3::X, 0.0);
        let point = behind(&target, 2.0);
        assert!((point - Vec3::new(3.0, 0.0, 5.0)).length() < 1e-5);

        let offset = local_to_world(&target, Vec3::new(0.0, 0.0, -3.0));
        assert!((offset - Vec3::new(-3.0, 0.0, 0.0)).length() < 1e-5, "{offset:?}");
    }

    #[test]
    fn test_look_at_none_when_coincident() {
        assert!(look_at(Vec3::ONE, Vec3::ONE).is_none());
        let q = look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)).unwrap();
        assert!(((q * Vec3::Z) - Vec3::Z).length() < 1e-5);
    }

    // ---- Distance contest ----

    #[test]
    fn test_new_contest_starts_at_start_distance() {
        let dyn_ = DistanceDynamics::new(scenario_a_tuning());
        assert_eq!(dyn_.current_distance(), 15.0);
        assert_eq!(dyn_.safe_timer(), 0.0);
        assert!(!dyn_.is_safe());
    }

    #[test]
    fn test_hit_closes_gap_and_resets_timer() {
        let tuning = ChaseTuning {
            acceleration_on_hit: 5.0,
            ..scenario_a_tuning()
        };
        let mut dyn_ = DistanceDynamics::with_distance(tuning, 6.0);
        dyn_.step(0.5);
        assert!(dyn_.safe_timer() > 0.0);

        let mut dyn_ = DistanceDynamics::with_distance(tuning, 6.0);
        dyn_.step(0.0);
        dyn_.notify_hit();
        assert!((dyn_.current_distance() - 1.0).abs() < 1e-6);
        assert_eq!(dyn_.safe_timer(), 0.0);
    }

    #[test]
    fn test_hit_floors_at_zero() {
        let mut dyn_ = DistanceDynamics::with_distance(scenario_a_tuning(), 3.0);
        dyn_.notify_hit();
        assert_eq!(dyn_.current_distance(), 0.0);
        assert_eq!(dyn_.step(DT), ContestOutcome::Caught);
    }

    #[test]
    fn test_closing_stops_at_standoff() {
        let mut dyn_ = DistanceDynamics::with_distance(scenario_a_tuning(), 2.05);
        for _ in 0..60 {
            assert_eq!(dyn_.step(DT), ContestOutcome::Ongoing);
        }
        assert!((dyn_.current_distance() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_standoff_does_not_push_back_out_after_hit() {
        let mut dyn_ = DistanceDynamics::with_distance(scenario_a_tuning(), 6.5);
        dyn_.notify_hit();
        assert!((dyn_.current_distance() - 1.5).abs() < 1e-6);
        assert_eq!(dyn_.step(DT), ContestOutcome::Ongoing);
        assert!(dyn_.current_distance() <= 1.5 + 1e-6);
    }

    #[test]
    fn test_catch_reported_same_step() {
        let mut dyn_ = DistanceDynamics::with_distance(scenario_a_tuning(), 6.0);
        dyn_.notify_hit();
        assert_eq!(dyn_.step(DT), ContestOutcome::Caught);
    }

    #[test]
    fn test_clean_run_escapes_monotonically() {
        let tuning = scenario_a_tuning();
        let mut dyn_ = DistanceDynamics::new(tuning);

        let mut ticks = 0u32;
        while !dyn_.is_safe() {
            assert_eq!(dyn_.step(DT), ContestOutcome::Ongoing);
            ticks += 1;
            assert!(ticks < 10_000);
        }
        let distance_at_safe = dyn_.current_distance();
        let budget = (tuning.max_distance - distance_at_safe) / tuning.return_speed;
        let budget_ticks = (budget / DT).ceil() as u32 + 2;

        let mut prev = distance_at_safe;
        let mut outcome = ContestOutcome::Ongoing;
        for _ in 0..budget_ticks {
            outcome = dyn_.step(DT);
            let d = dyn_.current_distance();
            assert!(d >= prev, "distance must not shrink once safe");
            assert!((0.0..=tuning.max_distance).contains(&d));
            prev = d;
            if outcome != ContestOutcome::Ongoing {
                break;
            }
        }
        assert_eq!(outcome, ContestOutcome::Escaped);
        assert_eq!(dyn_.current_distance(), tuning.max_distance);
    }

    #[test]
    fn test_tick_pulls_chaser_toward_trailing_point() {
        let mut dyn_ = DistanceDynamics::new(scenario_a_tuning());
        let target = runner_at_origin(0.0);
        let mut chaser = Pose::at(Vec3::new(0.0, 0.0, -29.0));
        let before = chaser.position.distance(behind(&target, dyn_.current_distance()));
        for _ in 0..30 {
            dyn_.tick(DT, &mut chaser, &target, TURN_RATE);
        }
        let after = chaser.position.distance(behind(&target, dyn_.current_distance()));
        assert!(after < before * 0.5, "before {before}, after {after}");
        // Visual lag: not yet at the logical distance.
        assert!(after > 0.01);
    }

    #[test]
    fn test_view_reports_thresholds() {
        let view = DistanceDynamics::new(scenario_a_tuning()).view();
        assert_eq!(view.current_distance, 15.0);
        assert_eq!(view.catch_distance, 1.0);
        assert_eq!(view.max_distance, 30.0);
    }

    // ---- Capture ----

    #[test]
    fn test_capture_point_includes_local_offset() {
        let tuning = CaptureTuning {
            stop_distance: 1.5,
            local_offset: Vec3::new(0.0, 0.0, -3.0),
            ..CaptureTuning::default()
        };
        let p = capture_point(&tuning, &runner_at_origin(0.0));
        assert!((p - Vec3::new(0.0, 0.0, -4.5)).length() < 1e-5);
    }

    #[test]
    fn test_capture_spawns_behind_target() {
        let tuning = CaptureTuning::default();
        let target = runner_at_origin(8.0);
        let (maneuver, spawn) = CaptureManeuver::start(tuning, TURN_RATE, &target);
        assert!((target.distance_to(spawn.position) - tuning.spawn_distance).abs() < 1e-4);
        assert!(maneuver.speed() >= tuning.run_speed);
        assert_eq!(maneuver.animation(), AnimationIntent::Running);
    }

    #[test]
    fn test_capture_completes_within_budget_with_moving_target() {
        let tuning = CaptureTuning::default();
        for speed in [0.0_f32, 8.0, 40.0] {
            let mut target = runner_at_origin(speed);
            let (mut maneuver, mut chaser) = CaptureManeuver::start(tuning, TURN_RATE, &target);
            let bound = ((tuning.max_duration + tuning.blend_delay) / DT).ceil() as u32 + 2;

            let mut ticks = 0;
            loop {
                advance(&mut target, DT);
                ticks += 1;
                if maneuver.tick(DT, &mut chaser, &target) == ManeuverStatus::Complete {
                    break;
                }
                assert!(ticks <= bound, "speed {speed}: exceeded {bound} ticks");
            }
            let expected = capture_point(&tuning, &target);
            assert!(chaser.position.distance(expected) < 1e-4);
            assert_eq!(maneuver.animation(), AnimationIntent::Idle);
            // Facing the runner.
            let to_runner = ground_forward(target.position - chaser.position);
            assert!(chaser.forward().dot(to_runner) > 0.99);
        }
    }

    #[test]
    fn test_capture_arrives_early_for_still_target() {
        let tuning = CaptureTuning::default();
        let target = runner_at_origin(0.0);
        let (mut maneuver, mut chaser) = CaptureManeuver::start(tuning, TURN_RATE, &target);
        while !maneuver.is_settling() {
            maneuver.tick(DT, &mut chaser, &target);
        }
        assert!(maneuver.elapsed() < tuning.max_duration);
    }

    #[test]
    fn test_capture_without_blend_completes_on_arrival_tick() {
        let tuning = CaptureTuning {
            blend_delay: 0.0,
            ..CaptureTuning::default()
        };
        let target = runner_at_origin(0.0);
        let (mut maneuver, mut chaser) = CaptureManeuver::start(tuning, TURN_RATE, &target);
        let mut status = ManeuverStatus::Continue;
        while status == ManeuverStatus::Continue {
            status = maneuver.tick(DT, &mut chaser, &target);
            assert!(!maneuver.is_settling());
        }
        // Completion is sticky.
        assert_eq!(maneuver.tick(DT, &mut chaser, &target), ManeuverStatus::Complete);
    }

    // ---- Retreat ----

    fn retreat_tuning() -> RetreatTuning {
        RetreatTuning {
            timeout_secs: 100.0,
            vanish_delay: 0.0,
            ..RetreatTuning::default()
        }
    }

    #[test]
    fn test_retreat_speed_decays_to_floor() {
        let tuning = retreat_tuning();
        let mut retreat = RetreatManeuver::new(tuning, 10.0, TURN_RATE);
        let target = runner_at_origin(0.0);
        let mut chaser = Pose::at(Vec3::new(0.0, 0.0, -10.0));
        let never_off = |_: Vec3| false;

        let mut prev = retreat.speed();
        for _ in 0..300 {
            retreat.tick(DT, &mut chaser, &target, Some(&never_off));
            assert!(retreat.speed() <= prev);
            assert!(retreat.speed() >= tuning.min_speed);
            prev = retreat.speed();
        }
        assert_eq!(retreat.speed(), tuning.min_speed);
        assert!(chaser.position.z < -10.0, "chaser must move away");
    }

    #[test]
    fn test_retreat_fallback_distance_without_view() {
        let tuning = RetreatTuning {
            fallback_extra_distance: 10.0,
            ..retreat_tuning()
        };
        let mut retreat = RetreatManeuver::new(tuning, 10.0, TURN_RATE);
        let target = runner_at_origin(0.0);
        let mut chaser = Pose::at(Vec3::new(0.0, 0.0, -10.0));

        let mut ticks = 0;
        while retreat.tick(DT, &mut chaser, &target, None) == ManeuverStatus::Continue {
            let d = target.distance_to(chaser.position);
            assert!(d <= 20.0, "must stop as soon as distance exceeds 20, got {d}");
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert!(target.distance_to(chaser.position) > 20.0);
        assert_eq!(retreat.exit(), Some(RetreatExit::FallbackDistance));
        assert!(retreat.elapsed() < tuning.timeout_secs);
    }

    #[test]
    fn test_retreat_view_test_takes_priority() {
        let mut retreat = RetreatManeuver::new(retreat_tuning(), 10.0, TURN_RATE);
        let target = runner_at_origin(0.0);
        let mut chaser = Pose::at(Vec3::new(0.0, 0.0, -10.0));
        let off_screen = |p: Vec3| p.z < -12.0;

        while retreat.tick(DT, &mut chaser, &target, Some(&off_screen)) == ManeuverStatus::Continue
        {}
        assert_eq!(retreat.exit(), Some(RetreatExit::OffScreen));
        assert!(target.distance_to(chaser.position) < 13.0);
    }

    #[test]
    fn test_retreat_times_out_when_never_off_screen() {
        let tuning = RetreatTuning {
            timeout_secs: 1.0,
            ..retreat_tuning()
        };
        let mut retreat = RetreatManeuver::new(tuning, 10.0, TURN_RATE);
        let target = runner_at_origin(0.0);
        let mut chaser = Pose::at(Vec3::new(0.0, 0.0, -10.0));
        let never_off = |_: Vec3| false;

        let mut ticks = 0;
        while retreat.tick(DT, &mut chaser, &target, Some(&never_off)) == ManeuverStatus::Continue {
            ticks += 1;
        }
        assert_eq!(retreat.exit(), Some(RetreatExit::Timeout));
        assert!(ticks <= (1.0 / DT).ceil() as u32 + 1);
    }

    #[test]
    fn test_retreat_vanish_delay_and_glance_back() {
        let tuning = RetreatTuning {
            vanish_delay: 0.3,
            ..retreat_tuning()
        };
        let mut retreat = RetreatManeuver::new(tuning, 10.0, TURN_RATE);
        let target = runner_at_origin(0.0);
        let mut chaser = Pose::new(Vec3::new(0.0, 0.0, -10.0), Quat::from_rotation_y(3.0));

        while retreat.exit().is_none() {
            assert_eq!(
                retreat.tick(DT, &mut chaser, &target, None),
                ManeuverStatus::Continue
            );
            assert_eq!(
                retreat.animation(),
                if retreat.exit().is_some() {
                    AnimationIntent::Idle
                } else {
                    AnimationIntent::Running
                }
            );
        }
        let to_runner = ground_forward(target.position - chaser.position);
        assert!(chaser.forward().dot(to_runner) > 0.9);

        let mut vanish_ticks = 0;
        while retreat.tick(DT, &mut chaser, &target, None) == ManeuverStatus::Continue {
            vanish_ticks += 1;
        }
        assert!(vanish_ticks >= 15 && vanish_ticks <= 19, "{vanish_ticks}");
    }

    // ---- Temporary chase ----

    #[test]
    fn test_temporary_chase_sequence() {
        let tuning = TemporaryTuning::default();
        let target = runner_at_origin(0.0);
        let (mut temp, mut chaser) = TemporaryChaseManeuver::start(tuning, TURN_RATE, &target);
        assert!((target.distance_to(chaser.position) - tuning.spawn_distance).abs() < 1e-4);
        assert_eq!(temp.animation(), AnimationIntent::Roaring);

        let mut saw_running = false;
        while !temp.is_lingering() {
            assert_eq!(temp.tick(DT, &mut chaser, &target), ManeuverStatus::Continue);
            saw_running |= temp.animation() == AnimationIntent::Running;
        }
        assert!(saw_running);
        assert!(target.distance_to(chaser.position) <= tuning.stop_distance + 0.1);

        let bound = (tuning.display_duration / DT).ceil() as u32 + 1;
        let mut ticks = 0;
        while temp.tick(DT, &mut chaser, &target) == ManeuverStatus::Continue {
            ticks += 1;
            assert!(ticks <= bound);
        }
        assert!((target.distance_to(chaser.position) - tuning.stop_distance).abs() < 0.1);
    }

    #[test]
    fn test_temporary_chase_bounded_when_runner_outpaces() {
        let tuning = TemporaryTuning::default();
        let mut target = runner_at_origin(tuning.run_speed * 2.0);
        let (mut temp, mut chaser) = TemporaryChaseManeuver::start(tuning, TURN_RATE, &target);

        let total = tuning.roar_duration + tuning.approach_timeout + tuning.display_duration;
        let bound = (total / DT).ceil() as u32 + 5;
        let mut ticks = 0;
        loop {
            advance(&mut target, DT);
            ticks += 1;
            if temp.tick(DT, &mut chaser, &target) == ManeuverStatus::Complete {
                break;
            }
            assert!(ticks <= bound, "temporary chase overran its bound");
        }
        assert_eq!(temp.stop_distance(), tuning.stop_distance);
    }
}
