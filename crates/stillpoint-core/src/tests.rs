#[cfg(test)]
mod tests {
    use crate::event_bus::{EventBus, MAX_PENDING};
    use crate::ports::*;
    use crate::runtime::{MeditationRuntime, Ports, RuntimeHandle};
    use crate::stats::{StatsStore, MILLIS_PER_DAY};
    use crate::streak::{self, StreakStep};
    use crate::testing::*;
    use crate::timer::{TimerEngine, TimerEvent};
    use chrono::NaiveDate;
    use std::rc::Rc;
    use stillpoint_types::config::*;
    use stillpoint_types::event::{Cue, MeditationEvent};
    use stillpoint_types::stats::Stats;
    use stillpoint_types::timer::TimerState;

    fn short_timer(secs: u32, interval_bell: bool) -> TimerConfig {
        TimerConfig {
            default_duration_secs: secs,
            interval_bell,
            ..TimerConfig::default()
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn at(d: u32, hour: u32) -> u64 {
        ManualClock::millis_at(2026, 1, d, hour, 0)
    }

    fn store_with(clock: Rc<ManualClock>, storage: Rc<FakeStorage>) -> StatsStore {
        StatsStore::load(storage, clock, &MeditationConfig::default())
    }

    fn fresh_store() -> (StatsStore, Rc<FakeStorage>) {
        let storage = Rc::new(FakeStorage::new());
        let clock = Rc::new(ManualClock::new(at(1, 12)));
        (store_with(clock, storage.clone()), storage)
    }

    // ─── EventBus Tests ──────────────────────────────────────

    #[test]
    fn test_event_bus_new_is_empty() {
        let bus = EventBus::new();
        assert!(!bus.has_pending());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_event_bus_emit_and_drain_in_order() {
        let bus = EventBus::new();
        bus.emit(MeditationEvent::Reset);
        bus.emit(MeditationEvent::HistoryCleared);
        assert_eq!(bus.pending_len(), 2);

        let events = bus.drain();
        assert_eq!(events, vec![MeditationEvent::Reset, MeditationEvent::HistoryCleared]);
        assert!(!bus.has_pending());
    }

    #[test]
    fn test_event_bus_clone_shares_state() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();
        bus1.emit(MeditationEvent::Reset);
        assert!(bus2.has_pending());
        assert_eq!(bus2.drain().len(), 1);
        assert!(!bus1.has_pending());
    }

    #[test]
    fn test_event_bus_drops_oldest_when_full() {
        let bus = EventBus::new();
        for i in 0..=MAX_PENDING as u32 {
            bus.emit(MeditationEvent::Paused { remaining_secs: i });
        }
        assert_eq!(bus.pending_len(), MAX_PENDING);
        let events = bus.drain();
        assert_eq!(events[0], MeditationEvent::Paused { remaining_secs: 1 });
    }

    // ─── TimerEngine Tests ───────────────────────────────────

    #[test]
    fn test_engine_initial_state() {
        let engine = TimerEngine::new(TimerConfig::default());
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.configured_secs(), 1800);
        assert_eq!(engine.remaining_secs(), 1800);
        assert!(engine.intention().is_none());
        assert!(!engine.interval_bell());
    }

    #[test]
    fn test_configure_steps_within_bounds() {
        let mut engine = TimerEngine::new(TimerConfig::default());
        assert_eq!(engine.configure(300), Some(2100));
        assert_eq!(engine.remaining_secs(), 2100);
        assert_eq!(engine.configure(-1800), Some(300));
    }

    #[test]
    fn test_configure_rejects_out_of_range_without_snapping() {
        let mut engine = TimerEngine::new(short_timer(300, false));
        let before = engine.snapshot();
        assert_eq!(engine.configure(-300), None);
        assert_eq!(engine.snapshot(), before);

        let mut engine = TimerEngine::new(short_timer(6900, false));
        assert_eq!(engine.configure(300), Some(7200));
        let before = engine.snapshot();
        assert_eq!(engine.configure(300), None);
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.configure(600), None);
        assert_eq!(engine.configured_secs(), 7200);
    }

    #[test]
    fn test_configure_never_leaves_bounds() {
        let mut engine = TimerEngine::new(TimerConfig::default());
        for delta in [300, 300, -900, 7200, -7200, 600, -300, -300, -300, -300, -300, -300] {
            engine.configure(delta);
            assert!((300..=7200).contains(&engine.configured_secs()));
        }
    }

    #[test]
    fn test_configure_rejected_outside_idle() {
        let mut engine = TimerEngine::new(TimerConfig::default());
        engine.start(0);
        assert_eq!(engine.configure(300), None);
        engine.pause();
        assert_eq!(engine.configure(300), None);
        assert_eq!(engine.configured_secs(), 1800);
    }

    #[test]
    fn test_start_pause_resume() {
        let mut engine = TimerEngine::new(short_timer(300, false));
        assert_eq!(
            engine.start(42),
            Some(TimerEvent::Started { duration_secs: 300, intention: None })
        );
        assert_eq!(engine.state(), TimerState::Running);
        assert_eq!(engine.started_at_millis(), Some(42));

        for _ in 0..10 {
            engine.tick();
        }
        assert_eq!(engine.pause(), Some(TimerEvent::Paused { remaining_secs: 290 }));
        assert_eq!(engine.state(), TimerState::Paused);

        // Paused engines ignore ticks
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.remaining_secs(), 290);

        assert_eq!(engine.start(99), Some(TimerEvent::Resumed { remaining_secs: 290 }));
        assert_eq!(engine.remaining_secs(), 290);
        assert_eq!(engine.started_at_millis(), Some(42));
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut engine = TimerEngine::new(TimerConfig::default());
        assert!(engine.start(0).is_some());
        assert!(engine.start(0).is_none());
    }

    #[test]
    fn test_pause_only_from_running() {
        let mut engine = TimerEngine::new(TimerConfig::default());
        assert!(engine.pause().is_none());
        engine.start(0);
        engine.pause();
        assert!(engine.pause().is_none());
    }

    #[test]
    fn test_reset_restores_duration() {
        let mut engine = TimerEngine::new(short_timer(600, false));
        assert!(engine.reset().is_none());

        engine.start(0);
        for _ in 0..100 {
            engine.tick();
        }
        assert_eq!(engine.reset(), Some(TimerEvent::Reset));
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 600);
        assert!(engine.started_at_millis().is_none());

        engine.start(0);
        engine.pause();
        assert_eq!(engine.reset(), Some(TimerEvent::Reset));
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn test_tick_idle_is_inert() {
        let mut engine = TimerEngine::new(TimerConfig::default());
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 1800);
    }

    #[test]
    fn test_ticks_count_down_to_single_completion() {
        let mut engine = TimerEngine::new(short_timer(300, false));
        engine.set_intention("let go");
        engine.start(1_000);

        let mut previous = engine.remaining_secs();
        let mut completions = 0;
        for _ in 0..299 {
            let event = engine.tick();
            assert!(event.is_none());
            assert_eq!(engine.remaining_secs(), previous - 1);
            previous = engine.remaining_secs();
        }
        assert_eq!(engine.remaining_secs(), 1);

        if let Some(TimerEvent::Completed { duration_secs, intention, started_at_millis }) =
            engine.tick()
        {
            completions += 1;
            assert_eq!(duration_secs, 300);
            assert_eq!(intention.as_deref(), Some("let go"));
            assert_eq!(started_at_millis, Some(1_000));
        }
        assert_eq!(completions, 1);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 300);

        // Back in Idle: further ticks do nothing
        assert!(engine.tick().is_none());
    }

    #[test]
    fn test_halfway_fires_once_at_midpoint() {
        let mut engine = TimerEngine::new(short_timer(300, true));
        engine.start(0);
        let mut halfway_at = Vec::new();
        for _ in 0..300 {
            if let Some(TimerEvent::Halfway { remaining_secs }) = engine.tick() {
                halfway_at.push(remaining_secs);
            }
        }
        assert_eq!(halfway_at, vec![150]);
    }

    #[test]
    fn test_halfway_uses_floor_for_odd_durations() {
        let mut engine = TimerEngine::new(short_timer(301, true));
        engine.start(0);
        let mut ticks = 0;
        loop {
            ticks += 1;
            if let Some(TimerEvent::Halfway { remaining_secs }) = engine.tick() {
                assert_eq!(remaining_secs, 150);
                break;
            }
        }
        assert_eq!(ticks, 151);
    }

    #[test]
    fn test_halfway_silent_when_disabled() {
        let mut engine = TimerEngine::new(short_timer(300, false));
        engine.start(0);
        let halfway = (0..300)
            .filter_map(|_| engine.tick())
            .filter(|e| matches!(e, TimerEvent::Halfway { .. }))
            .count();
        assert_eq!(halfway, 0);
    }

    #[test]
    fn test_halfway_survives_pause_without_refiring() {
        let mut engine = TimerEngine::new(short_timer(300, true));
        engine.start(0);
        let mut halfway = 0;
        for i in 0..300 {
            if i == 150 {
                engine.pause();
                engine.start(0);
            }
            if matches!(engine.tick(), Some(TimerEvent::Halfway { .. })) {
                halfway += 1;
            }
        }
        assert_eq!(halfway, 1);
    }

    #[test]
    fn test_intention_locked_once_started() {
        let mut engine = TimerEngine::new(TimerConfig::default());
        assert!(engine.set_intention("  be present  "));
        assert_eq!(engine.intention(), Some("be present"));

        engine.start(0);
        assert!(!engine.set_intention("something else"));
        assert_eq!(engine.intention(), Some("be present"));
    }

    #[test]
    fn test_blank_intention_is_none() {
        let mut engine = TimerEngine::new(TimerConfig::default());
        engine.set_intention("   ");
        assert!(engine.intention().is_none());
    }

    #[test]
    fn test_engine_widened_limits_still_refuse_out_of_range() {
        let mut engine = TimerEngine::new(TimerConfig {
            min_duration_secs: 1,
            default_duration_secs: 60,
            max_duration_secs: 100_000,
            ..TimerConfig::default()
        });
        assert_eq!(engine.configured_secs(), 300);
        assert_eq!(engine.configure(50_000), None);
        assert_eq!(engine.configure(-299), None);
        assert_eq!(engine.configure(6_900), Some(7_200));
        assert_eq!(engine.configure(300), None);
        assert_eq!(engine.configured_secs(), 7_200);
    }

    // ─── Streak Tests ────────────────────────────────────────

    #[test]
    fn test_classify() {
        assert_eq!(streak::classify(None, day(1)), StreakStep::First);
        assert_eq!(streak::classify(Some(day(1)), day(1)), StreakStep::SameDay);
        assert_eq!(streak::classify(Some(day(1)), day(2)), StreakStep::NextDay);
        assert_eq!(streak::classify(Some(day(1)), day(3)), StreakStep::Broken);
        assert_eq!(streak::classify(Some(day(5)), day(4)), StreakStep::Broken);
    }

    #[test]
    fn test_advance_sequence() {
        let mut streak_value = 0;
        let mut last = None;
        let mut seen = Vec::new();
        for d in [1, 2, 2, 4] {
            streak_value = streak::advance(streak_value, last, day(d));
            last = Some(day(d));
            seen.push(streak_value);
        }
        assert_eq!(seen, vec![1, 2, 2, 1]);
    }

    #[test]
    fn test_advance_across_month_boundary() {
        let jan31 = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let feb1 = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(streak::advance(4, Some(jan31), feb1), 5);
    }

    #[test]
    fn test_longest_run() {
        assert_eq!(streak::longest_run(Vec::new()), 0);
        assert_eq!(streak::longest_run([1, 2, 3, 5, 6].map(day)), 3);
        assert_eq!(streak::longest_run([1, 1, 1].map(day)), 1);
        assert_eq!(streak::longest_run([1, 3, 4, 5, 6].map(day)), 4);
        assert_eq!(streak::longest_run([1, 2, 2, 3, 9].map(day)), 3);
    }

    // ─── StatsStore Tests ────────────────────────────────────

    #[test]
    fn test_store_starts_empty() {
        let (store, _) = fresh_store();
        assert!(store.recent().is_empty());
        assert_eq!(store.stats().total_sessions, 0);
        assert_eq!(store.longest_streak(), 0);
        assert_eq!(store.window_minutes(at(1, 12), 7), 0.0);
    }

    #[test]
    fn test_record_session_updates_aggregates() {
        let (mut store, storage) = fresh_store();
        let record = store.record_session(1500, Some("gratitude".to_string()), at(1, 9));

        assert_eq!(record.duration_seconds, 1500);
        assert_eq!(record.completed_at_epoch_millis, at(1, 9));
        assert_eq!(record.intention.as_deref(), Some("gratitude"));
        assert_eq!(store.recent(), &[record.clone()]);
        assert_eq!(store.stats().all_time_sessions, vec![record]);
        assert_eq!(store.stats().total_sessions, 1);
        assert_eq!(store.stats().total_minutes, 25.0);
        assert_eq!(store.current_streak(), 1);
        assert_eq!(store.last_session_date(), Some(day(1)));
        assert!(storage.raw(SESSIONS_KEY).is_some());
        assert!(storage.raw(STATS_KEY).is_some());
    }

    #[test]
    fn test_recent_log_keeps_ten_newest_first() {
        let (mut store, _) = fresh_store();
        for i in 0..11u64 {
            store.record_session(300, None, at(1, 0) + i * 60_000);
        }
        assert_eq!(store.stats().total_sessions, 11);
        assert_eq!(store.stats().all_time_sessions.len(), 11);
        assert_eq!(store.recent().len(), 10);

        let stamps: Vec<u64> = store
            .recent()
            .iter()
            .map(|r| r.completed_at_epoch_millis)
            .collect();
        let expected: Vec<u64> = (1..11u64).rev().map(|i| at(1, 0) + i * 60_000).collect();
        assert_eq!(stamps, expected);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let (mut store, _) = fresh_store();
        let a = store.record_session(300, None, at(1, 9));
        let b = store.record_session(300, None, at(1, 9));
        let c = store.record_session(300, None, at(1, 8));
        assert_eq!(a.id, at(1, 9));
        assert!(b.id > a.id);
        assert!(c.id > b.id);
    }

    #[test]
    fn test_streak_scenario() {
        let (mut store, _) = fresh_store();
        let mut seen = Vec::new();
        for stamp in [at(1, 9), at(2, 9), at(2, 18), at(4, 9)] {
            store.record_session(600, None, stamp);
            seen.push(store.current_streak());
        }
        assert_eq!(seen, vec![1, 2, 2, 1]);
    }

    #[test]
    fn test_streak_uses_calendar_days_not_elapsed_hours() {
        // 20 hours apart, across midnight
        let (mut store, _) = fresh_store();
        store.record_session(600, None, at(1, 4));
        store.record_session(600, None, at(2, 0));
        assert_eq!(store.current_streak(), 2);

        // 20 hours apart, same calendar day
        let (mut store, _) = fresh_store();
        store.record_session(600, None, ManualClock::millis_at(2026, 1, 1, 2, 0));
        store.record_session(600, None, ManualClock::millis_at(2026, 1, 1, 22, 0));
        assert_eq!(store.current_streak(), 1);
    }

    #[test]
    fn test_streak_follows_local_timezone() {
        // UTC-5: 03:00Z is 22:00 the previous evening locally
        let storage = Rc::new(FakeStorage::new());
        let clock = Rc::new(ManualClock::with_offset(0, -300));
        let mut store = store_with(clock, storage);
        store.record_session(600, None, ManualClock::millis_at(2026, 1, 2, 3, 0));
        store.record_session(600, None, ManualClock::millis_at(2026, 1, 2, 20, 0));
        assert_eq!(store.current_streak(), 2);
        assert_eq!(store.last_session_date(), Some(day(2)));
    }

    #[test]
    fn test_streak_resets_on_earlier_date() {
        let (mut store, _) = fresh_store();
        store.record_session(600, None, at(5, 9));
        store.record_session(600, None, at(6, 9));
        store.record_session(600, None, at(3, 9));
        assert_eq!(store.current_streak(), 1);
        assert_eq!(store.last_session_date(), Some(day(3)));
    }

    #[test]
    fn test_update_streak_directly() {
        let (mut store, _) = fresh_store();
        store.update_streak(day(10));
        store.update_streak(day(11));
        store.update_streak(day(11));
        assert_eq!(store.current_streak(), 2);
        store.update_streak(day(20));
        assert_eq!(store.current_streak(), 1);
    }

    #[test]
    fn test_longest_streak_scenario() {
        let (mut store, _) = fresh_store();
        for d in [1, 2, 3, 5, 6] {
            store.record_session(600, None, at(d, 9));
        }
        assert_eq!(store.longest_streak(), 3);
        assert_eq!(store.current_streak(), 2);
    }

    #[test]
    fn test_longest_streak_sorts_by_timestamp() {
        let (mut store, _) = fresh_store();
        for d in [5, 1, 2, 6, 3] {
            store.record_session(600, None, at(d, 9));
        }
        assert_eq!(store.longest_streak(), 3);
    }

    #[test]
    fn test_window_minutes() {
        let (mut store, _) = fresh_store();
        let now = at(20, 12);
        store.record_session(1800, None, now - 10 * MILLIS_PER_DAY);
        store.record_session(1200, None, now - MILLIS_PER_DAY);

        assert_eq!(store.window_minutes(now, 7), 20.0);
        assert_eq!(store.window_minutes(now, 30), 50.0);
    }

    #[test]
    fn test_window_excludes_exact_boundary() {
        let (mut store, _) = fresh_store();
        let now = at(20, 12);
        store.record_session(600, None, now - 7 * MILLIS_PER_DAY);
        store.record_session(600, None, now - 7 * MILLIS_PER_DAY + 1);
        assert_eq!(store.window_minutes(now, 7), 10.0);
    }

    #[test]
    fn test_summary() {
        let (mut store, _) = fresh_store();
        let now = at(20, 12);
        for d in [1, 2, 3, 18, 19] {
            store.record_session(600, None, at(d, 9));
        }
        let summary = store.summary(now);
        assert_eq!(summary.total_sessions, 5);
        assert_eq!(summary.total_minutes, 50.0);
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.longest_streak, 3);
        assert_eq!(summary.week_minutes, 20.0);
        assert_eq!(summary.month_minutes, 50.0);
    }

    #[test]
    fn test_clear_all_then_record_matches_fresh_store() {
        let (mut used, storage) = fresh_store();
        for d in [1, 2, 3] {
            used.record_session(900, Some("x".to_string()), at(d, 9));
        }
        used.clear_all();
        assert!(used.recent().is_empty());
        assert_eq!(*used.stats(), Stats::default());
        assert!(storage.raw(SESSIONS_KEY).is_none());
        assert!(storage.raw(STATS_KEY).is_none());

        let (mut fresh, _) = fresh_store();
        let a = used.record_session(300, None, at(9, 9));
        let b = fresh.record_session(300, None, at(9, 9));
        assert_eq!(a, b);
        assert_eq!(used.stats(), fresh.stats());
        assert_eq!(used.recent(), fresh.recent());
        assert_eq!(used.current_streak(), 1);
        assert_eq!(used.stats().total_minutes, 5.0);
    }

    #[test]
    fn test_persist_and_reload_roundtrip() {
        let storage = Rc::new(FakeStorage::new());
        let clock = Rc::new(ManualClock::new(at(10, 12)));
        let mut store = store_with(clock.clone(), storage.clone());
        store.record_session(1800, Some("metta".to_string()), at(1, 9));
        store.record_session(600, None, at(2, 9));
        store.record_session(300, None, at(2, 21));

        let reloaded = store_with(clock, storage);
        assert_eq!(reloaded.stats(), store.stats());
        assert_eq!(reloaded.recent(), store.recent());
        assert_eq!(reloaded.longest_streak(), 2);
    }

    #[test]
    fn test_persist_and_reload_roundtrip_fractional_minutes() {
        let storage = Rc::new(FakeStorage::new());
        let clock = Rc::new(ManualClock::new(at(28, 12)));
        let mut store = store_with(clock.clone(), storage.clone());
        for i in 0..200u64 {
            let secs = 300 + ((i * 377) % 6900) as u32;
            store.record_session(secs, None, at(1, 0) + i * 3_600_000);
        }
        assert!(store.stats().all_time_sessions.iter().any(|r| r.duration_seconds % 60 != 0));

        let reloaded = store_with(clock, storage);
        assert_eq!(reloaded.stats(), store.stats());
        assert_eq!(
            reloaded.stats().total_minutes.to_bits(),
            store.stats().total_minutes.to_bits()
        );
        assert_eq!(reloaded.recent(), store.recent());
    }

    #[test]
    fn test_record_after_max_id_does_not_overflow() {
        let storage = Rc::new(FakeStorage::new());
        let stored = vec![stillpoint_types::session::SessionRecord {
            id: u64::MAX,
            duration_seconds: 300,
            completed_at_epoch_millis: 500,
            intention: None,
        }];
        storage.insert_raw(SESSIONS_KEY, &serde_json::to_string(&stored).unwrap());
        let mut store = store_with(Rc::new(ManualClock::new(0)), storage);

        let record = store.record_session(300, None, 1000);
        assert_eq!(record.id, u64::MAX);
        assert_eq!(store.recent().len(), 2);
        assert_eq!(store.stats().total_sessions, 2);
    }

    #[test]
    fn test_older_history_without_stats_is_adopted() {
        let storage = Rc::new(FakeStorage::new());
        let older = format!(
            r#"[{{"id":{},"duration":1200,"date":"1/2/2026","time":"09:00","intention":"rest","completed":true}},
                {{"id":{},"duration":600,"date":"1/1/2026","time":"09:00","intention":null,"completed":true}}]"#,
            at(2, 9),
            at(1, 9)
        );
        storage.insert_raw(SESSIONS_KEY, &older);
        let store = store_with(Rc::new(ManualClock::new(at(3, 12))), storage.clone());

        assert_eq!(store.recent().len(), 2);
        assert_eq!(store.recent()[0].completed_at_epoch_millis, at(2, 9));
        assert_eq!(store.recent()[0].intention.as_deref(), Some("rest"));
        assert_eq!(store.stats().total_sessions, 2);
        assert_eq!(store.stats().total_minutes, 30.0);
        assert_eq!(store.current_streak(), 2);
        assert_eq!(store.last_session_date(), Some(day(2)));
        assert!(storage.raw(STATS_KEY).is_some());
    }

    #[test]
    fn test_existing_stats_are_not_rebuilt() {
        let storage = Rc::new(FakeStorage::new());
        let clock = Rc::new(ManualClock::new(at(10, 12)));
        let mut store = store_with(clock.clone(), storage.clone());
        store.record_session(600, None, at(1, 9));
        let writes = storage.write_count();

        let reloaded = store_with(clock, storage.clone());
        assert_eq!(reloaded.stats(), store.stats());
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn test_store_caps_recent_log_at_ten_even_if_configured_higher() {
        let storage = Rc::new(FakeStorage::new());
        let config = MeditationConfig {
            stats: StatsConfig {
                recent_limit: 50,
                ..StatsConfig::default()
            },
            ..MeditationConfig::default()
        };
        let mut store = StatsStore::load(storage, Rc::new(ManualClock::new(at(1, 0))), &config);
        for i in 0..15u64 {
            store.record_session(300, None, at(1, 1) + i);
        }
        assert_eq!(store.recent().len(), 10);
        assert_eq!(store.stats().total_sessions, 15);
    }

    #[test]
    fn test_reload_keeps_ids_monotonic() {
        let storage = Rc::new(FakeStorage::new());
        let clock = Rc::new(ManualClock::new(at(10, 12)));
        let mut store = store_with(clock.clone(), storage.clone());
        let first = store.record_session(300, None, at(5, 9));

        let mut reloaded = store_with(clock, storage);
        let second = reloaded.record_session(300, None, at(4, 9));
        assert!(second.id > first.id);
    }

    #[test]
    fn test_missing_keys_load_empty() {
        let (store, storage) = fresh_store();
        assert!(!storage.exists(SESSIONS_KEY).unwrap());
        assert!(store.recent().is_empty());
        assert_eq!(*store.stats(), Stats::default());
    }

    #[test]
    fn test_malformed_blobs_load_empty() {
        let storage = Rc::new(FakeStorage::new());
        storage.insert_raw(SESSIONS_KEY, "{not json");
        storage.insert_raw(STATS_KEY, r#"{"totalSessions":"many"}"#);
        let store = store_with(Rc::new(ManualClock::new(0)), storage);
        assert!(store.recent().is_empty());
        assert_eq!(store.stats().total_sessions, 0);
    }

    #[test]
    fn test_oversized_recent_log_truncated_on_load() {
        let storage = Rc::new(FakeStorage::new());
        let records: Vec<_> = (0..12u64)
            .map(|i| stillpoint_types::session::SessionRecord {
                id: 100 - i,
                duration_seconds: 300,
                completed_at_epoch_millis: 100 - i,
                intention: None,
            })
            .collect();
        storage.insert_raw(SESSIONS_KEY, &serde_json::to_string(&records).unwrap());
        let store = store_with(Rc::new(ManualClock::new(0)), storage);
        assert_eq!(store.recent().len(), 10);
        assert_eq!(store.recent()[0].id, 100);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let (mut store, storage) = fresh_store();
        storage.set_failing_writes(true);
        let record = store.record_session(600, None, at(1, 9));
        assert_eq!(store.recent(), &[record]);
        assert_eq!(store.stats().total_sessions, 1);
        assert!(storage.raw(STATS_KEY).is_none());
        assert_eq!(storage.write_count(), 2);

        // Delete failures are swallowed too
        store.clear_all();
        assert!(store.recent().is_empty());
    }

    // ─── Runtime Tests ───────────────────────────────────────

    struct Rig {
        handle: RuntimeHandle,
        ticker: Rc<ManualTicker>,
        audio: Rc<RecordingAudio>,
        storage: Rc<FakeStorage>,
        clock: Rc<ManualClock>,
        bus: EventBus,
    }

    fn rig(timer: TimerConfig) -> Rig {
        let ticker = Rc::new(ManualTicker::new());
        let audio = Rc::new(RecordingAudio::new());
        let storage = Rc::new(FakeStorage::new());
        let clock = Rc::new(ManualClock::new(at(3, 7)));
        let bus = EventBus::new();
        let config = MeditationConfig {
            timer,
            ..MeditationConfig::default()
        };
        let ports = Ports {
            storage: storage.clone(),
            audio: audio.clone(),
            clock: clock.clone(),
            ticker: ticker.clone(),
        };
        let runtime = MeditationRuntime::new(config, bus.clone(), ports);
        Rig {
            handle: RuntimeHandle::new(runtime),
            ticker,
            audio,
            storage,
            clock,
            bus,
        }
    }

    #[test]
    fn test_runtime_full_session() {
        let rig = rig(short_timer(300, true));
        rig.handle.set_intention("steady");
        rig.handle.start();
        assert!(rig.handle.is_ticking());

        let fired = rig.ticker.advance(400);
        assert_eq!(fired, 300);
        assert!(!rig.handle.is_ticking());

        let events = rig.bus.drain();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            MeditationEvent::Started {
                duration_secs: 300,
                intention: Some("steady".to_string())
            }
        );
        assert_eq!(events[1], MeditationEvent::Halfway { remaining_secs: 150 });
        match &events[2] {
            MeditationEvent::Completed(record) => {
                assert_eq!(record.duration_seconds, 300);
                assert_eq!(record.intention.as_deref(), Some("steady"));
                assert_eq!(record.completed_at_epoch_millis, rig.clock.now_millis());
            }
            other => panic!("Expected completion, got {:?}", other),
        }

        assert_eq!(rig.audio.played(), vec![Cue::Start, Cue::Halfway, Cue::Completion]);

        let snap = rig.handle.snapshot();
        assert_eq!(snap.state, TimerState::Idle);
        assert_eq!(snap.remaining_secs, 300);
        // Intention is left for the UI to clear
        assert_eq!(snap.intention.as_deref(), Some("steady"));

        let summary = rig.handle.summary();
        assert_eq!(summary.total_sessions, 1);
        assert_eq!(summary.total_minutes, 5.0);
        assert_eq!(summary.current_streak, 1);
        assert_eq!(rig.handle.recent_sessions().len(), 1);
        assert!(rig.storage.raw(STATS_KEY).is_some());
    }

    #[test]
    fn test_runtime_pause_disarms_ticker() {
        let rig = rig(short_timer(300, false));
        rig.handle.start();
        rig.ticker.advance(10);
        rig.handle.pause();

        assert!(!rig.handle.is_ticking());
        assert!(!rig.ticker.fire());
        assert_eq!(rig.handle.snapshot().remaining_secs, 290);
        assert_eq!(rig.handle.snapshot().state, TimerState::Paused);

        rig.handle.start();
        assert!(rig.handle.is_ticking());
        assert_eq!(rig.ticker.start_count(), 2);
        rig.ticker.advance(5);
        assert_eq!(rig.handle.snapshot().remaining_secs, 285);

        let events = rig.bus.drain();
        assert!(events.contains(&MeditationEvent::Paused { remaining_secs: 290 }));
        assert!(events.contains(&MeditationEvent::Resumed { remaining_secs: 290 }));
        // No start gong on resume
        assert_eq!(rig.audio.played(), vec![Cue::Start]);
    }

    #[test]
    fn test_runtime_reset_discards_session() {
        let rig = rig(short_timer(300, false));
        rig.handle.start();
        rig.ticker.advance(120);
        rig.handle.reset();

        assert!(!rig.handle.is_ticking());
        assert_eq!(rig.ticker.advance(10), 0);
        assert!(rig.handle.recent_sessions().is_empty());
        assert_eq!(rig.handle.summary().total_sessions, 0);
        assert_eq!(rig.handle.snapshot().remaining_secs, 300);
        assert_eq!(rig.bus.drain().last(), Some(&MeditationEvent::Reset));
    }

    #[test]
    fn test_runtime_double_start_arms_once() {
        let rig = rig(short_timer(300, false));
        rig.handle.start();
        rig.handle.start();
        assert_eq!(rig.ticker.start_count(), 1);
        rig.ticker.advance(3);
        assert_eq!(rig.handle.snapshot().remaining_secs, 297);
    }

    #[test]
    fn test_runtime_audio_failure_is_swallowed() {
        let rig = rig(short_timer(300, true));
        rig.audio.set_failing(true);
        rig.handle.start();
        rig.ticker.advance(300);
        assert_eq!(rig.handle.summary().total_sessions, 1);
        assert_eq!(rig.audio.played().len(), 3);
    }

    #[test]
    fn test_runtime_storage_failure_is_swallowed() {
        let rig = rig(short_timer(300, false));
        rig.storage.set_failing_writes(true);
        rig.handle.start();
        rig.ticker.advance(300);
        assert_eq!(rig.handle.recent_sessions().len(), 1);
        assert!(rig.storage.raw(SESSIONS_KEY).is_none());
    }

    #[test]
    fn test_runtime_adjust_duration() {
        let rig = rig(TimerConfig::default());
        assert!(rig.handle.adjust_duration(300));
        assert_eq!(rig.handle.snapshot().configured_secs, 2100);
        assert_eq!(rig.handle.config().timer.default_duration_secs, 2100);
        assert_eq!(
            rig.bus.drain(),
            vec![MeditationEvent::DurationChanged { duration_secs: 2100 }]
        );

        rig.handle.start();
        assert!(!rig.handle.adjust_duration(300));
        assert_eq!(rig.handle.snapshot().configured_secs, 2100);
    }

    #[test]
    fn test_runtime_interval_bell_toggle() {
        let rig = rig(short_timer(300, false));
        rig.handle.set_interval_bell(true);
        assert!(rig.handle.snapshot().interval_bell);
        assert!(rig.handle.config().timer.interval_bell);
        rig.handle.start();
        rig.ticker.advance(150);
        assert_eq!(rig.audio.played(), vec![Cue::Start, Cue::Halfway]);
    }

    #[test]
    fn test_runtime_clear_all() {
        let rig = rig(short_timer(300, false));
        rig.handle.start();
        rig.ticker.advance(300);
        let _ = rig.bus.drain();

        rig.handle.clear_all();
        assert!(rig.handle.recent_sessions().is_empty());
        assert_eq!(rig.handle.summary().total_sessions, 0);
        assert_eq!(rig.bus.drain(), vec![MeditationEvent::HistoryCleared]);
    }

    #[test]
    fn test_runtime_loads_persisted_history() {
        let first = rig(short_timer(300, false));
        first.handle.start();
        first.ticker.advance(300);

        let ports = Ports {
            storage: first.storage.clone(),
            audio: Rc::new(RecordingAudio::new()),
            clock: first.clock.clone(),
            ticker: Rc::new(ManualTicker::new()),
        };
        let runtime = MeditationRuntime::new(MeditationConfig::default(), EventBus::new(), ports);
        assert_eq!(runtime.recent_sessions().len(), 1);
        assert_eq!(runtime.summary().total_sessions, 1);
    }

    #[test]
    fn test_runtime_widened_limits_still_refuse_out_of_range() {
        let rig = rig(TimerConfig {
            min_duration_secs: 1,
            default_duration_secs: 60,
            max_duration_secs: 100_000,
            ..TimerConfig::default()
        });
        assert_eq!(rig.handle.snapshot().configured_secs, 300);
        assert!(!rig.handle.adjust_duration(50_000));
        assert!(!rig.handle.adjust_duration(-200));
        assert_eq!(rig.handle.snapshot().configured_secs, 300);
    }

    #[test]
    fn test_runtime_tracks_wall_time_including_pauses() {
        let rig = rig(short_timer(300, false));
        rig.handle.start();
        assert_eq!(rig.handle.last_wall_secs(), None);

        rig.ticker.advance(100);
        rig.clock.advance(100_000);
        rig.handle.pause();
        rig.clock.advance(60_000);
        rig.handle.start();
        rig.clock.advance(200_000);
        rig.ticker.advance(200);

        assert_eq!(rig.handle.recent_sessions().len(), 1);
        assert_eq!(rig.handle.last_wall_secs(), Some(360));
    }

    #[test]
    fn test_runtime_dropped_handle_ticks_are_harmless() {
        let rig = rig(short_timer(300, false));
        rig.handle.start();
        let ticker = rig.ticker.clone();
        drop(rig);
        assert!(ticker.fire());
    }
}
