//! Unit and integration tests for gt-travel.
//!
//! Sessions run against a scripted [`helpers::Stage`] that plays every
//! collaborator at once, and a `ManualClock` so timeouts and settle delays
//! cost no real time.

#[cfg(test)]
mod helpers {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use gt_core::{Coordinates, ManualClock, Position, StopKey, TravelConfig};
    use gt_registry::{DestinationDecl, DestinationRegistry, KindTag, Prerequisite};
    use gt_transit::{build, ConnectionDecl, NetworkConfig, SharedGraph, StopDecl};

    use crate::{
        Collaborators, EventSink, Interaction, Locomotion, MemorySink, PositionSource,
        PrerequisiteCheck, TransitRequest, TravelAgent,
    };

    pub fn key(planet: &str, city: &str) -> StopKey {
        StopKey::new(planet, city)
    }

    fn stop(planet: &str, city: &str, x: f32, y: f32, two_way: &[(&str, &str)]) -> StopDecl {
        StopDecl {
            planet:         planet.into(),
            city:           city.into(),
            coordinates:    Coordinates::new(x, y),
            boarding_agent: format!("shuttle_{city}"),
            connections:    two_way
                .iter()
                .map(|(p, c)| ConnectionDecl { planet: (*p).into(), city: (*c).into(), bidirectional: true })
                .collect(),
        }
    }

    /// mos_eisley ↔ bestine ↔ theed ↔ keren, plus an isolated yavin base.
    pub fn network() -> NetworkConfig {
        NetworkConfig {
            stops: vec![
                stop("tatooine", "mos_eisley", 0.0, 0.0, &[("tatooine", "bestine")]),
                stop("tatooine", "bestine", 1000.0, 0.0, &[("naboo", "theed")]),
                stop("naboo", "theed", 0.0, 0.0, &[("naboo", "keren")]),
                stop("naboo", "keren", 2000.0, 500.0, &[]),
                stop("yavin", "base", 0.0, 0.0, &[]),
            ],
        }
    }

    /// The same network with the tatooine–naboo link removed.
    pub fn severed_network() -> NetworkConfig {
        let mut config = network();
        config.stops[1].connections.clear();
        config
    }

    fn dest(id: &str, planet: &str, city: &str, prerequisites: Vec<Prerequisite>) -> DestinationDecl {
        DestinationDecl {
            id:                id.into(),
            kind:              Some(KindTag::Quest),
            network_entry:     Some(key(planet, city)),
            final_coordinates: Some(Coordinates::new(10.0, 10.0)),
            prerequisites,
            ..DestinationDecl::default()
        }
    }

    pub fn registry() -> DestinationRegistry {
        let mut registry = DestinationRegistry::new();
        registry
            .register_all([
                dest("shrine", "naboo", "keren", vec![]),
                dest("cantina", "tatooine", "mos_eisley", vec![]),
                dest("dune_sea", "tatooine", "bestine", vec![]),
                dest("rebel_base", "yavin", "base", vec![]),
                dest(
                    "palace",
                    "naboo",
                    "keren",
                    vec![
                        Prerequisite::Skill { name: "pilot".into() },
                        Prerequisite::Quest { id: "find_the_droids".into() },
                    ],
                ),
            ])
            .unwrap();
        registry
    }

    pub fn quick_config() -> TravelConfig {
        TravelConfig {
            max_attempts:          3,
            timeout_secs:          300,
            verification_delay_ms: 100,
            arrival_tolerance:     15.0,
        }
    }

    // ── Stage ─────────────────────────────────────────────────────────────

    type MoveHook = Box<dyn FnMut(usize) + Send>;

    /// A scripted world: walks instantly, boards by teleporting to the
    /// requested stop, and counts every call.
    pub struct Stage {
        pub position:       Mutex<Position>,
        stops:              HashMap<StopKey, Coordinates>,
        pub moves:          AtomicUsize,
        pub transits:       AtomicUsize,
        /// When `false`, locomotion reports failure without moving.
        pub can_walk:       AtomicBool,
        /// When `false`, boarding "succeeds" but the agent stays put.
        pub teleports:      AtomicBool,
        /// Number of upcoming boardings that leave the agent in place.
        pub missed_flights: AtomicUsize,
        /// Called after each move with the running move count.
        pub on_move:        Mutex<Option<MoveHook>>,
    }

    impl Stage {
        pub fn new(start: Position) -> Arc<Self> {
            let stops = network()
                .stops
                .iter()
                .map(|s| (s.key(), s.coordinates))
                .collect();
            Arc::new(Self {
                position:       Mutex::new(start),
                stops,
                moves:          AtomicUsize::new(0),
                transits:       AtomicUsize::new(0),
                can_walk:       AtomicBool::new(true),
                teleports:      AtomicBool::new(true),
                missed_flights: AtomicUsize::new(0),
                on_move:        Mutex::new(None),
            })
        }

        pub fn moves(&self) -> usize {
            self.moves.load(Ordering::SeqCst)
        }

        pub fn transits(&self) -> usize {
            self.transits.load(Ordering::SeqCst)
        }

        pub fn set_on_move(&self, hook: impl FnMut(usize) + Send + 'static) {
            *self.on_move.lock().unwrap() = Some(Box::new(hook));
        }
    }

    impl Locomotion for Stage {
        fn move_to(&self, target: Coordinates) -> bool {
            let n = self.moves.fetch_add(1, Ordering::SeqCst) + 1;
            let walked = self.can_walk.load(Ordering::SeqCst);
            if walked {
                self.position.lock().unwrap().coords = target;
            }
            if let Some(hook) = self.on_move.lock().unwrap().as_mut() {
                hook(n);
            }
            walked
        }
    }

    impl Interaction for Stage {
        fn attempt_transit(&self, request: &TransitRequest<'_>) -> bool {
            self.transits.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.boarding_agent, format!("shuttle_{}", request.from.city));

            let missed = self
                .missed_flights
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if !missed && self.teleports.load(Ordering::SeqCst) {
                let coords = self.stops[request.to];
                *self.position.lock().unwrap() = Position::new(request.to.planet.clone(), coords);
            }
            true
        }
    }

    impl PositionSource for Stage {
        fn current_position(&self) -> Position {
            self.position.lock().unwrap().clone()
        }
    }

    /// Knows a fixed set of completed quests and learned skills.
    pub struct Progress {
        pub quests: Vec<String>,
        pub skills: Vec<String>,
    }

    impl PrerequisiteCheck for Progress {
        fn is_met(&self, prerequisite: &Prerequisite) -> bool {
            match prerequisite {
                Prerequisite::Quest { id }      => self.quests.contains(id),
                Prerequisite::Skill { name }    => self.skills.contains(name),
                Prerequisite::Reputation { .. } => false,
            }
        }
    }

    // ── Fixture ───────────────────────────────────────────────────────────

    pub struct Fixture {
        pub stage:   Arc<Stage>,
        pub clock:   Arc<ManualClock>,
        pub sink:    Arc<MemorySink>,
        pub network: SharedGraph,
        pub agent:   TravelAgent,
    }

    pub fn start_position() -> Position {
        Position::new("tatooine", Coordinates::new(5.0, 5.0))
    }

    pub fn fixture(config: TravelConfig) -> Fixture {
        fixture_with(config, start_position(), None, None)
    }

    pub fn fixture_with(
        config:        TravelConfig,
        start:         Position,
        prerequisites: Option<Arc<dyn PrerequisiteCheck>>,
        events:        Option<Arc<dyn EventSink>>,
    ) -> Fixture {
        let stage = Stage::new(start);
        let clock = Arc::new(ManualClock::new());
        let sink = Arc::new(MemorySink::new());
        let network = SharedGraph::new(build(&network()).unwrap());

        let mut collaborators = Collaborators::new(stage.clone(), stage.clone(), stage.clone())
            .with_events(events.unwrap_or_else(|| sink.clone() as Arc<dyn EventSink>));
        if let Some(p) = prerequisites {
            collaborators = collaborators.with_prerequisites(p);
        }

        let agent = TravelAgent::builder(Arc::new(registry()), network.clone(), collaborators)
            .config(config)
            .clock(clock.clone())
            .build()
            .unwrap();

        Fixture { stage, clock, sink, network, agent }
    }
}

// ── RetryPolicy ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod policy_tests {
    use std::time::Duration;

    use gt_core::{Coordinates, Position, StopKey};
    use gt_transit::RouteStop;

    use crate::{FailureKind, HopOutcome, RetryPolicy, Verdict};

    fn theed() -> RouteStop {
        RouteStop {
            key:            StopKey::new("naboo", "theed"),
            coordinates:    Coordinates::new(100.0, 100.0),
            boarding_agent: "shuttle_theed".into(),
        }
    }

    #[test]
    fn defaults_match_config_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.timeout, Duration::from_secs(300));
        assert_eq!(policy.verification_delay, Duration::from_millis(5_000));
        assert_eq!(policy.arrival_tolerance, 15.0);
    }

    #[test]
    fn verified_advances_even_on_last_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.judge(HopOutcome::Verified, 3), Verdict::Advance);
    }

    #[test]
    fn failures_retry_until_budget_is_spent() {
        let policy = RetryPolicy::default();
        let miss = HopOutcome::PositionMismatch { distance: Some(40.0) };
        assert_eq!(policy.judge(miss, 1), Verdict::Retry);
        assert_eq!(policy.judge(HopOutcome::TransitFailed, 2), Verdict::Retry);
        assert_eq!(
            policy.judge(HopOutcome::LocomotionFailed, 3),
            Verdict::Fail(FailureKind::MaxAttemptsExceeded)
        );
    }

    #[test]
    fn deadline_is_exclusive() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.check_deadline(Duration::from_secs(300)), None);
        assert_eq!(
            policy.check_deadline(Duration::from_millis(300_001)),
            Some(FailureKind::VerificationTimeout)
        );
    }

    #[test]
    fn verify_within_tolerance() {
        let policy = RetryPolicy::default();
        let near = Position::new("naboo", Coordinates::new(110.0, 105.0));
        assert_eq!(policy.verify(&near, &theed()), HopOutcome::Verified);
    }

    #[test]
    fn verify_reports_distance_or_wrong_planet() {
        let policy = RetryPolicy::default();
        let far = Position::new("naboo", Coordinates::new(130.0, 140.0));
        assert_eq!(policy.verify(&far, &theed()), HopOutcome::PositionMismatch { distance: Some(50.0) });

        let elsewhere = Position::new("tatooine", Coordinates::new(100.0, 100.0));
        assert_eq!(policy.verify(&elsewhere, &theed()), HopOutcome::PositionMismatch { distance: None });
    }
}

// ── Step-level session behavior ───────────────────────────────────────────────

#[cfg(test)]
mod session_steps {
    use gt_core::{Clock, ManualClock};
    use gt_transit::{build, BfsPlanner};

    use super::helpers::{network, quick_config, registry, start_position, Stage};
    use crate::{
        Collaborators, InterruptHandle, RetryPolicy, SessionContext, SessionStatus, TravelSession,
    };

    #[test]
    fn one_step_per_transition_and_hop() {
        let stage = Stage::new(start_position());
        let collaborators = Collaborators::new(stage.clone(), stage.clone(), stage.clone());
        let registry = registry();
        let graph = build(&network()).unwrap();
        let clock = ManualClock::new();
        let interrupt = InterruptHandle::new();
        let policy = RetryPolicy::from_config(&quick_config());
        let ctx = SessionContext {
            registry:      &registry,
            graph:         &graph,
            planner:       &BfsPlanner,
            collaborators: &collaborators,
            policy:        &policy,
            clock:         &clock,
            interrupt:     &interrupt,
        };

        let mut session = TravelSession::new("shrine", clock.now());
        assert_eq!(session.status(), SessionStatus::Idle);

        let seen: Vec<_> = (0..6).map(|_| session.step(&ctx)).collect();
        assert_eq!(
            seen,
            vec![
                SessionStatus::Planning,
                SessionStatus::Traveling,
                SessionStatus::Traveling,
                SessionStatus::Traveling,
                SessionStatus::Arrived,
                SessionStatus::Arrived, // terminal steps are no-ops
            ]
        );
        assert_eq!(session.current_hop_index(), 3);
        assert_eq!(session.attempts_on_current_hop(), 0);
        assert_eq!(stage.moves(), 3);
        assert_eq!(session.last_known_position().unwrap().planet, "naboo");
    }

    #[test]
    fn resume_only_rearms_interrupted_sessions() {
        let clock = ManualClock::new();
        let mut session = TravelSession::new("shrine", clock.now());
        assert!(!session.resume(clock.now()));
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[test]
    fn interrupt_before_first_step_resumes_from_idle() {
        let stage = Stage::new(start_position());
        let collaborators = Collaborators::new(stage.clone(), stage.clone(), stage.clone());
        let registry = registry();
        let graph = build(&network()).unwrap();
        let clock = ManualClock::new();
        let interrupt = InterruptHandle::new();
        let policy = RetryPolicy::from_config(&quick_config());
        let ctx = SessionContext {
            registry:      &registry,
            graph:         &graph,
            planner:       &BfsPlanner,
            collaborators: &collaborators,
            policy:        &policy,
            clock:         &clock,
            interrupt:     &interrupt,
        };

        let mut session = TravelSession::new("shrine", clock.now());
        interrupt.interrupt();
        assert_eq!(session.step(&ctx), SessionStatus::Interrupted);
        assert!(session.destination().is_none());

        interrupt.clear();
        assert!(session.resume(clock.now()));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.step(&ctx), SessionStatus::Planning);
    }
}

// ── Agent: happy paths ────────────────────────────────────────────────────────

#[cfg(test)]
mod arrival {
    use std::time::Duration;

    use gt_core::Clock;
    use gt_transit::{BfsPlanner, CachedPlanner, SharedGraph, build};

    use super::helpers::{fixture, key, network, quick_config};
    use crate::{SessionStatus, TravelEvent};

    #[test]
    fn three_hops_to_destination() {
        let f = fixture(quick_config());
        let outcome = f.agent.travel_to_destination("shrine").unwrap();

        assert!(outcome.is_arrived());
        assert_eq!(outcome.hop_index, 3);
        let route = outcome.route.unwrap();
        assert_eq!(route.start, key("tatooine", "mos_eisley"));
        assert_eq!(route.goal(), &key("naboo", "keren"));
        assert_eq!(route.hop_count(), 3);
        assert_eq!(f.stage.moves(), 3);
        assert_eq!(f.stage.transits(), 3);
        // Three settle delays of 100 ms each.
        assert_eq!(outcome.elapsed, Duration::from_millis(300));
    }

    #[test]
    fn already_at_entry_stop_arrives_without_moving() {
        let f = fixture(quick_config());
        let outcome = f.agent.travel_to_destination("cantina").unwrap();

        assert_eq!(outcome.status, SessionStatus::Arrived);
        assert!(outcome.route.unwrap().is_trivial());
        assert_eq!(outcome.hop_index, 0);
        assert_eq!(f.stage.moves(), 0);
        assert_eq!(f.stage.transits(), 0);
    }

    #[test]
    fn events_follow_the_session() {
        let f = fixture(quick_config());
        f.agent.travel_to_destination("shrine").unwrap();

        let events = f.sink.events();
        assert_eq!(events.len(), 1 + 3 * 2 + 1);
        assert_eq!(
            events[0],
            TravelEvent::RoutePlanned { destination_id: "shrine".into(), hops: 3 }
        );
        for (hop, pair) in events[1..7].chunks(2).enumerate() {
            assert!(matches!(
                pair[0],
                TravelEvent::HopStarted { hop_index, attempt: 1, .. } if hop_index == hop
            ));
            assert_eq!(pair[1], TravelEvent::HopVerified { hop_index: hop, attempts: 1 });
        }
        assert!(matches!(
            events[7],
            TravelEvent::SessionTerminal { status: SessionStatus::Arrived, hop_index: 3, .. }
        ));
    }

    #[test]
    fn one_missed_flight_is_retried() {
        let f = fixture(quick_config());
        f.stage.missed_flights.store(1, std::sync::atomic::Ordering::SeqCst);

        let outcome = f.agent.travel_to_destination("shrine").unwrap();
        assert!(outcome.is_arrived());
        assert_eq!(f.stage.moves(), 4);
        assert_eq!(f.stage.transits(), 4);

        let events = f.sink.events();
        assert!(events.iter().any(|e| matches!(
            e,
            TravelEvent::HopRetried { hop_index: 0, attempt: 1, .. }
        )));
        assert!(events.contains(&TravelEvent::HopVerified { hop_index: 0, attempts: 2 }));
    }

    #[test]
    fn status_is_frozen_after_arrival() {
        let f = fixture(quick_config());
        f.agent.travel_to_destination("shrine").unwrap();

        let before = f.agent.get_status();
        f.clock.advance(Duration::from_secs(60));
        let after = f.agent.get_status();

        assert_eq!(before, after);
        assert_eq!(after.status, SessionStatus::Arrived);
        assert_eq!(after.destination_id.as_deref(), Some("shrine"));
        assert_eq!(after.current_hop_index, 3);
        assert!(f.clock.now() > after.elapsed);
    }

    #[test]
    fn status_before_any_session_is_idle() {
        let f = fixture(quick_config());
        let status = f.agent.get_status();
        assert_eq!(status.status, SessionStatus::Idle);
        assert!(status.destination_id.is_none());
        assert_eq!(status.elapsed, Duration::ZERO);
    }

    #[test]
    fn route_survives_graph_rebuild_mid_session() {
        let f = fixture(quick_config());
        let shared = f.network.clone();
        f.stage.set_on_move(move |n| {
            if n == 1 {
                shared.rebuild(&super::helpers::severed_network()).unwrap();
            }
        });

        let outcome = f.agent.travel_to_destination("shrine").unwrap();
        assert!(outcome.is_arrived());
        assert_eq!(f.stage.transits(), 3);

        // New plans see the severed network.
        let err = f
            .agent
            .plan_route(&key("tatooine", "mos_eisley"), &key("naboo", "keren"))
            .unwrap_err();
        assert!(matches!(err, crate::TravelError::Transit(gt_transit::TransitError::NoRoute { .. })));
    }

    #[test]
    fn cached_planner_plugs_in() {
        let f = fixture(quick_config());
        let agent = crate::TravelAgent::builder(
            std::sync::Arc::new(super::helpers::registry()),
            SharedGraph::new(build(&network()).unwrap()),
            crate::Collaborators::new(f.stage.clone(), f.stage.clone(), f.stage.clone()),
        )
        .planner(CachedPlanner::new(BfsPlanner))
        .config(quick_config())
        .clock(f.clock.clone())
        .build()
        .unwrap();

        let a = agent.plan_route(&key("tatooine", "bestine"), &key("naboo", "keren")).unwrap();
        let b = agent.plan_route(&key("tatooine", "bestine"), &key("naboo", "keren")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hop_count(), 2);
    }
}

// ── Agent: failures ───────────────────────────────────────────────────────────

#[cfg(test)]
mod failures {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use gt_core::{Coordinates, Position, TravelConfig};
    use gt_registry::Prerequisite;

    use super::helpers::{fixture, fixture_with, quick_config, start_position, Progress};
    use crate::{
        EventSink, FailureKind, PrerequisiteCheck, SessionStatus, SinkError, TravelError, TravelEvent,
    };

    #[test]
    fn unknown_destination_is_not_found() {
        let f = fixture(quick_config());
        let outcome = f.agent.travel_to_destination("death_star").unwrap();

        assert_eq!(outcome.failure(), Some(FailureKind::NotFound));
        assert!(outcome.route.is_none());
        assert_eq!(f.stage.moves(), 0);

        match outcome.into_result() {
            Err(TravelError::Failed { kind, destination_id, .. }) => {
                assert_eq!(kind, FailureKind::NotFound);
                assert_eq!(destination_id, "death_star");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn unmet_prerequisite_never_moves() {
        let progress: Arc<dyn PrerequisiteCheck> =
            Arc::new(Progress { quests: vec![], skills: vec!["pilot".into()] });
        let f = fixture_with(quick_config(), start_position(), Some(progress), None);

        let outcome = f.agent.travel_to_destination("palace").unwrap();
        assert_eq!(outcome.failure(), Some(FailureKind::PrerequisiteNotMet));
        assert_eq!(
            outcome.unmet_prerequisite,
            Some(Prerequisite::Quest { id: "find_the_droids".into() })
        );
        assert_eq!(f.stage.moves(), 0);
        assert_eq!(f.stage.transits(), 0);
    }

    #[test]
    fn met_prerequisites_allow_travel() {
        let progress: Arc<dyn PrerequisiteCheck> = Arc::new(Progress {
            quests: vec!["find_the_droids".into()],
            skills: vec!["pilot".into()],
        });
        let f = fixture_with(quick_config(), start_position(), Some(progress), None);
        assert!(f.agent.travel_to_destination("palace").unwrap().is_arrived());
    }

    #[test]
    fn disconnected_entry_is_unreachable() {
        let f = fixture(quick_config());
        let outcome = f.agent.travel_to_destination("rebel_base").unwrap();
        assert_eq!(outcome.failure(), Some(FailureKind::Unreachable));
        assert!(outcome.route.is_none());
        assert_eq!(f.stage.moves(), 0);
    }

    #[test]
    fn planet_without_stops_is_unreachable() {
        let start = Position::new("dagobah", Coordinates::new(0.0, 0.0));
        let f = fixture_with(quick_config(), start, None, None);
        let outcome = f.agent.travel_to_destination("shrine").unwrap();
        assert_eq!(outcome.failure(), Some(FailureKind::Unreachable));
    }

    #[test]
    fn verification_failures_exhaust_attempts() {
        let f = fixture(quick_config());
        f.stage.teleports.store(false, Ordering::SeqCst);

        let outcome = f.agent.travel_to_destination("dune_sea").unwrap();
        assert_eq!(outcome.failure(), Some(FailureKind::MaxAttemptsExceeded));
        assert_eq!(outcome.route.as_ref().map(|r| r.hop_count()), Some(1));
        assert_eq!(outcome.hop_index, 0);
        assert_eq!(f.stage.moves(), 3);
        assert_eq!(f.stage.transits(), 3);
    }

    #[test]
    fn locomotion_failure_skips_boarding() {
        let f = fixture(quick_config());
        f.stage.can_walk.store(false, Ordering::SeqCst);

        let outcome = f.agent.travel_to_destination("shrine").unwrap();
        assert_eq!(outcome.failure(), Some(FailureKind::MaxAttemptsExceeded));
        assert_eq!(f.stage.moves(), 3);
        assert_eq!(f.stage.transits(), 0);
    }

    #[test]
    fn session_deadline_fails_with_timeout() {
        let config = TravelConfig {
            max_attempts:          100,
            timeout_secs:          10,
            verification_delay_ms: 4_000,
            arrival_tolerance:     15.0,
        };
        let f = fixture(config);
        f.stage.teleports.store(false, Ordering::SeqCst);

        let outcome = f.agent.travel_to_destination("shrine").unwrap();
        assert_eq!(outcome.failure(), Some(FailureKind::VerificationTimeout));
        assert!(outcome.elapsed > Duration::from_secs(10));
        // 4 s, 8 s, then 12 s trips the deadline right after the third delay.
        assert_eq!(f.stage.transits(), 3);
    }

    struct BrokenSink;

    impl EventSink for BrokenSink {
        fn record(&self, _event: &TravelEvent) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("disk full".into()))
        }
    }

    #[test]
    fn sink_errors_do_not_abort_the_session() {
        let sink: Arc<dyn EventSink> = Arc::new(BrokenSink);
        let f = fixture_with(quick_config(), start_position(), None, Some(sink));
        let outcome = f.agent.travel_to_destination("shrine").unwrap();
        assert_eq!(outcome.status, SessionStatus::Arrived);
    }

    #[test]
    fn invalid_config_is_rejected_at_build() {
        let f = fixture(quick_config());
        let result = crate::TravelAgent::builder(
            Arc::new(super::helpers::registry()),
            f.network.clone(),
            crate::Collaborators::new(f.stage.clone(), f.stage.clone(), f.stage.clone()),
        )
        .config(TravelConfig { max_attempts: 0, ..quick_config() })
        .build();
        assert!(matches!(result, Err(TravelError::Config(_))));
    }
}

// ── Agent: interruption, resumption, exclusivity ──────────────────────────────

#[cfg(test)]
mod control {
    use std::sync::{Arc, Barrier};

    use super::helpers::{fixture, quick_config};
    use crate::{SessionStatus, TravelError, TravelEvent};

    #[test]
    fn interrupt_during_second_hop_keeps_position_in_route() {
        let f = fixture(quick_config());
        let handle = f.agent.interrupt_handle();
        f.stage.set_on_move(move |n| {
            if n == 2 {
                handle.interrupt();
            }
        });

        let outcome = f.agent.travel_to_destination("shrine").unwrap();
        assert_eq!(outcome.status, SessionStatus::Interrupted);
        assert_eq!(outcome.hop_index, 1);
        // Boarding for the interrupted hop never happened.
        assert_eq!(f.stage.transits(), 1);

        let status = f.agent.get_status();
        assert_eq!(status.status, SessionStatus::Interrupted);
        assert_eq!(status.current_hop_index, 1);
        assert!(f.agent.has_parked_session());
        assert!(matches!(
            f.sink.events().last(),
            Some(TravelEvent::SessionTerminal { status: SessionStatus::Interrupted, hop_index: 1, .. })
        ));
    }

    #[test]
    fn resume_continues_from_the_interrupted_hop() {
        let f = fixture(quick_config());
        let handle = f.agent.interrupt_handle();
        f.stage.set_on_move(move |n| {
            if n == 2 {
                handle.interrupt();
            }
        });
        f.agent.travel_to_destination("shrine").unwrap();
        f.sink.drain();

        let outcome = f.agent.resume_interrupted().unwrap();
        assert!(outcome.is_arrived());
        assert_eq!(outcome.hop_index, 3);
        assert_eq!(f.stage.moves(), 4);
        assert_eq!(f.stage.transits(), 3);
        assert!(!f.agent.has_parked_session());

        // No re-planning on resume.
        let events = f.sink.events();
        assert!(matches!(events[0], TravelEvent::HopStarted { hop_index: 1, attempt: 1, .. }));
    }

    #[test]
    fn resume_without_parked_session_errors() {
        let f = fixture(quick_config());
        assert!(matches!(f.agent.resume_interrupted(), Err(TravelError::NothingToResume)));
    }

    #[test]
    fn new_session_discards_parked_one() {
        let f = fixture(quick_config());
        let handle = f.agent.interrupt_handle();
        f.stage.set_on_move(move |n| {
            if n == 1 {
                handle.interrupt();
            }
        });
        f.agent.travel_to_destination("shrine").unwrap();
        assert!(f.agent.has_parked_session());

        // Stale interrupt flags do not leak into the next session.
        assert!(f.agent.travel_to_destination("cantina").unwrap().is_arrived());
        assert!(!f.agent.has_parked_session());
    }

    #[test]
    fn interrupt_without_active_session_is_ignored() {
        let f = fixture(quick_config());
        assert!(!f.agent.interrupt_current_session());
        assert!(f.agent.travel_to_destination("shrine").unwrap().is_arrived());
    }

    #[test]
    fn second_session_conflicts_while_first_runs() {
        let f = fixture(quick_config());
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        {
            let (entered, release) = (entered.clone(), release.clone());
            f.stage.set_on_move(move |n| {
                if n == 1 {
                    entered.wait();
                    release.wait();
                }
            });
        }

        std::thread::scope(|s| {
            let traveller = s.spawn(|| f.agent.travel_to_destination("shrine"));

            entered.wait();
            assert!(f.agent.is_active());
            assert_eq!(f.agent.get_status().status, SessionStatus::Traveling);
            assert!(matches!(
                f.agent.travel_to_destination("cantina"),
                Err(TravelError::SessionConflict)
            ));
            assert!(matches!(f.agent.resume_interrupted(), Err(TravelError::SessionConflict)));
            release.wait();

            let outcome = traveller.join().unwrap().unwrap();
            assert!(outcome.is_arrived());
        });
        assert!(!f.agent.is_active());
    }

    #[test]
    fn interrupt_from_another_thread() {
        let f = fixture(quick_config());
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        {
            let (entered, release) = (entered.clone(), release.clone());
            f.stage.set_on_move(move |n| {
                if n == 1 {
                    entered.wait();
                    release.wait();
                }
            });
        }

        std::thread::scope(|s| {
            let traveller = s.spawn(|| f.agent.travel_to_destination("shrine"));
            entered.wait();
            assert!(f.agent.interrupt_current_session());
            release.wait();

            let outcome = traveller.join().unwrap().unwrap();
            assert_eq!(outcome.status, SessionStatus::Interrupted);
            assert_eq!(outcome.hop_index, 0);
        });
    }
}
