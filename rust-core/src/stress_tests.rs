/// Stress testing for the stillness session core.
///
/// Long runs and pathological input that only show up on real devices:
/// hours of sensor data, sensors that never deliver data, garbage values.

#[cfg(test)]
mod stress_tests {
    use crate::alert::AlertResolver;
    use crate::sampler::SamplerConfig;
    use crate::session::StillnessSession;
    use crate::types::*;

    fn new_session() -> StillnessSession {
        StillnessSession::new(SamplerConfig::default(), AlertResolver::default(), 0)
    }

    /// Drives `session` at 60Hz from `start_ms` for `duration_ms`, ticking
    /// once per second. `sample` picks the acceleration for each timestamp.
    fn drive<F>(session: &mut StillnessSession, start_ms: u64, duration_ms: u64, mut sample: F)
    where
        F: FnMut(u64) -> MotionEvent,
    {
        let mut next_tick = (start_ms / 1000 + 1) * 1000;
        let mut t = start_ms;
        while t < start_ms + duration_ms {
            session.on_motion(&sample(t), t);
            if t >= next_tick {
                session.on_tick(next_tick);
                next_tick += 1000;
            }
            t += 16;
        }
    }

    // ============================================================================
    // CATEGORY 1: EXTREME DURATION & THROUGHPUT
    // ============================================================================

    /// One hour of a phone on a nightstand at 60Hz (~225k samples).
    #[test]
    fn stress_one_hour_resting_60hz() {
        let mut session = new_session();
        drive(&mut session, 0, 3_600_000, |t| {
            let wobble = if (t / 16) % 3 == 0 { 0.03 } else { -0.03 };
            MotionEvent::new(0.01, 0.02, 9.8 + wobble)
        });

        assert!(session.duration_secs() >= 3_598);
        assert_eq!(session.active_stage().color_tag, "darkred");
        assert_eq!(session.sampler().statistics().0, 0);
    }

    /// Ten minutes alternating: 45s still, then a 1s shake.
    #[test]
    fn stress_ten_minutes_periodic_pickups() {
        let mut session = new_session();
        let mut max_duration = 0;

        for cycle in 0..13u64 {
            let base = cycle * 46_000;
            drive(&mut session, base, 45_000, |_| MotionEvent::new(0.0, 0.0, 9.8));
            max_duration = max_duration.max(session.duration_secs());
            drive(&mut session, base + 45_000, 1_000, |t| {
                MotionEvent::new(if (t / 16) % 2 == 0 { 2.5 } else { -2.5 }, 0.0, 9.8)
            });
            assert!(session.duration_secs() <= 1, "cycle {cycle} did not reset");
        }

        assert!(max_duration >= 44 && max_duration <= 45);
        assert!(session.active_stage().threshold_secs < 10);
    }

    // ============================================================================
    // CATEGORY 2: PATHOLOGICAL INPUT
    // ============================================================================

    /// A sensor that fires events but never carries data.
    #[test]
    fn stress_sensor_without_data() {
        let mut session = new_session();
        drive(&mut session, 0, 90_000, |_| MotionEvent::empty());

        assert!(session.duration_secs() >= 89);
        assert_eq!(session.active_stage().color_tag, "red");
        let (movements, ignored) = session.sampler().statistics();
        assert_eq!(movements, 0);
        assert!(ignored > 5_000);
    }

    /// NaN and infinite readings never count as movement.
    #[test]
    fn stress_non_finite_readings() {
        let mut session = new_session();
        drive(&mut session, 0, 20_000, |t| match (t / 16) % 3 {
            0 => MotionEvent::new(f64::NAN, 0.0, 9.8),
            1 => MotionEvent::new(0.0, f64::INFINITY, 9.8),
            _ => MotionEvent::new(0.0, 0.0, f64::NEG_INFINITY),
        });

        assert!(session.duration_secs() >= 19);
        assert_eq!(session.sampler().statistics().0, 0);
    }

    /// Saturated accelerometer readings are plain movement.
    #[test]
    fn stress_saturated_readings() {
        let mut session = new_session();
        drive(&mut session, 0, 10_000, |_| MotionEvent::new(f64::MAX / 4.0, 0.0, 0.0));
        assert_eq!(session.duration_secs(), 0);
    }
}
