//! The timer state machine.
//!
//! `step` is a pure function: it takes the current state, one input, the
//! configuration resolved at this moment and the current instant, and
//! returns the next state together with the effects the host must carry
//! out. It never reads a clock or touches any collaborator itself.
//!
//! | From            | Input                 | To      |
//! |-----------------|-----------------------|---------|
//! | Idle            | Start                 | Running |
//! | Running         | Pause                 | Paused  |
//! | Paused          | Resume (or Start)     | Running |
//! | any             | Reset                 | Idle    |
//! | Running         | Tick with nothing left| Running (next phase) |
//! | any             | Skip                  | Running (next phase) |

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::settings::Configuration;
use crate::types::{Command, Input, Phase, RunState, StatusMessage, TimerState};

/// Side effects requested by a transition, in the order they must happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Show `remaining` for the current phase
    Render {
        /// Time left to display
        remaining: Duration,
        /// Phase the readout belongs to
        phase: Phase,
    },
    /// Replace the status line
    Message(StatusMessage),
    /// Cancel any polling cycle and start a new one
    StartPolling,
    /// Cancel the polling cycle
    StopPolling,
    /// Play the phase-change alert
    PlayAlert,
    /// Post a system notification for the phase that just began
    Notify(Phase),
    /// Keep the screen awake
    AcquireWakeLock,
    /// Let the screen sleep again
    ReleaseWakeLock,
}

/// Result of feeding one input to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The next state
    pub state: TimerState,
    /// Effects to apply, in order
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: TimerState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// Computes the next state and effects for `input`.
pub fn step(state: TimerState, input: Input, config: &Configuration, now: Instant) -> Transition {
    match input {
        Input::Tick => tick(state, config, now),
        Input::Command(command) => match command {
            Command::Toggle => match state.run {
                RunState::Idle => start(state, config, now),
                RunState::Running { .. } => pause(state, now),
                RunState::Paused { .. } => resume(state, now),
            },
            Command::Start => match state.run {
                RunState::Idle => start(state, config, now),
                // A pending pause must not be lost to a fresh start.
                RunState::Paused { .. } => resume(state, now),
                RunState::Running { .. } => {
                    debug!("Start ignored: already running");
                    Transition::unchanged(state)
                }
            },
            Command::Pause => pause(state, now),
            Command::Resume => resume(state, now),
            Command::Reset => reset(state, config),
            Command::Skip => expire(state, config, now),
        },
    }
}

/// Idle → Running for the current phase.
fn start(state: TimerState, config: &Configuration, now: Instant) -> Transition {
    let mut effects = Vec::new();
    let next = begin_phase(state, state.phase, config, now, &mut effects);
    Transition {
        state: next,
        effects,
    }
}

fn pause(state: TimerState, now: Instant) -> Transition {
    let RunState::Running { target } = state.run else {
        debug!("Pause ignored: timer is {}", state.run.as_str());
        return Transition::unchanged(state);
    };

    let remaining = target.saturating_duration_since(now);
    Transition {
        state: TimerState {
            phase: state.phase,
            run: RunState::Paused { remaining },
        },
        effects: vec![
            Effect::StopPolling,
            Effect::ReleaseWakeLock,
            Effect::Message(StatusMessage::Paused),
        ],
    }
}

fn resume(state: TimerState, now: Instant) -> Transition {
    let RunState::Paused { remaining } = state.run else {
        debug!("Resume ignored: timer is {}", state.run.as_str());
        return Transition::unchanged(state);
    };

    Transition {
        state: TimerState {
            phase: state.phase,
            run: RunState::Running {
                target: now + remaining,
            },
        },
        effects: vec![
            Effect::AcquireWakeLock,
            Effect::StartPolling,
            Effect::Render {
                remaining,
                phase: state.phase,
            },
            Effect::Message(StatusMessage::Resumed),
        ],
    }
}

fn reset(state: TimerState, config: &Configuration) -> Transition {
    let mut effects = vec![Effect::StopPolling];
    if state.is_running() {
        effects.push(Effect::ReleaseWakeLock);
    }
    effects.push(Effect::Render {
        remaining: config.duration_for(state.phase),
        phase: state.phase,
    });
    effects.push(Effect::Message(StatusMessage::Reset));

    Transition {
        state: TimerState {
            phase: state.phase,
            run: RunState::Idle,
        },
        effects,
    }
}

fn tick(state: TimerState, config: &Configuration, now: Instant) -> Transition {
    let RunState::Running { target } = state.run else {
        // A tick can only come from an active cycle; anything else is stale.
        return Transition::unchanged(state);
    };

    if target <= now {
        let mut effects = vec![
            Effect::StopPolling,
            Effect::Render {
                remaining: Duration::ZERO,
                phase: state.phase,
            },
        ];
        let mut transition = expire(state, config, now);
        effects.append(&mut transition.effects);
        transition.effects = effects;
        return transition;
    }

    Transition {
        state,
        effects: vec![Effect::Render {
            remaining: target - now,
            phase: state.phase,
        }],
    }
}

/// The phase transition shared by natural expiry and Skip.
fn expire(state: TimerState, config: &Configuration, now: Instant) -> Transition {
    let phase = state.phase.next();
    debug!("Phase {} -> {}", state.phase, phase);

    let mut effects = vec![
        Effect::Message(StatusMessage::PhaseStarted(phase)),
        Effect::PlayAlert,
        Effect::Notify(phase),
    ];
    let next = begin_phase(state, phase, config, now, &mut effects);
    Transition {
        state: next,
        effects,
    }
}

/// Enters Running for `phase` with its full configured duration.
fn begin_phase(
    previous: TimerState,
    phase: Phase,
    config: &Configuration,
    now: Instant,
    effects: &mut Vec<Effect>,
) -> TimerState {
    let duration = config.duration_for(phase);
    if !previous.is_running() {
        effects.push(Effect::AcquireWakeLock);
    }
    effects.push(Effect::StartPolling);
    effects.push(Effect::Render {
        remaining: duration,
        phase,
    });
    TimerState {
        phase,
        run: RunState::Running {
            target: now + duration,
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Configuration {
        Configuration {
            work_minutes: 25,
            break_minutes: 5,
        }
    }

    fn running(phase: Phase, target: Instant) -> TimerState {
        TimerState {
            phase,
            run: RunState::Running { target },
        }
    }

    fn paused(phase: Phase, remaining: Duration) -> TimerState {
        TimerState {
            phase,
            run: RunState::Paused { remaining },
        }
    }

    fn cmd(state: TimerState, command: Command, now: Instant) -> Transition {
        step(state, Input::Command(command), &config(), now)
    }

    // ------------------------------------------------------------------------
    // Start Tests
    // ------------------------------------------------------------------------

    mod start_tests {
        use super::*;

        #[test]
        fn test_start_from_idle() {
            let now = Instant::now();
            let t = cmd(TimerState::new(), Command::Start, now);

            assert_eq!(
                t.state,
                running(Phase::Work, now + Duration::from_secs(25 * 60))
            );
            assert_eq!(
                t.effects,
                vec![
                    Effect::AcquireWakeLock,
                    Effect::StartPolling,
                    Effect::Render {
                        remaining: Duration::from_secs(25 * 60),
                        phase: Phase::Work
                    },
                ]
            );
        }

        #[test]
        fn test_start_uses_current_phase() {
            let now = Instant::now();
            let idle_break = TimerState {
                phase: Phase::Break,
                run: RunState::Idle,
            };
            let t = cmd(idle_break, Command::Start, now);
            assert_eq!(
                t.state,
                running(Phase::Break, now + Duration::from_secs(5 * 60))
            );
        }

        #[test]
        fn test_start_while_paused_resumes() {
            let now = Instant::now();
            let state = paused(Phase::Work, Duration::from_secs(100));
            let t = cmd(state, Command::Start, now);

            assert_eq!(
                t.state,
                running(Phase::Work, now + Duration::from_secs(100))
            );
            assert!(t.effects.contains(&Effect::Message(StatusMessage::Resumed)));
        }

        #[test]
        fn test_start_while_running_is_noop() {
            let now = Instant::now();
            let state = running(Phase::Work, now + Duration::from_secs(10));
            let t = cmd(state, Command::Start, now);
            assert_eq!(t.state, state);
            assert!(t.effects.is_empty());
        }
    }

    // ------------------------------------------------------------------------
    // Pause / Resume Tests
    // ------------------------------------------------------------------------

    mod pause_resume_tests {
        use super::*;

        #[test]
        fn test_pause_captures_remaining() {
            let now = Instant::now();
            let state = running(Phase::Work, now + Duration::from_millis(61_500));
            let t = cmd(state, Command::Pause, now);

            assert_eq!(t.state, paused(Phase::Work, Duration::from_millis(61_500)));
            assert_eq!(
                t.effects,
                vec![
                    Effect::StopPolling,
                    Effect::ReleaseWakeLock,
                    Effect::Message(StatusMessage::Paused),
                ]
            );
        }

        #[test]
        fn test_pause_after_target_clamps_to_zero() {
            let now = Instant::now();
            let state = running(Phase::Work, now);
            let t = cmd(state, Command::Pause, now + Duration::from_secs(3));
            assert_eq!(t.state, paused(Phase::Work, Duration::ZERO));
        }

        #[test]
        fn test_pause_is_noop_unless_running() {
            let now = Instant::now();
            for state in [TimerState::new(), paused(Phase::Break, Duration::from_secs(9))] {
                let t = cmd(state, Command::Pause, now);
                assert_eq!(t.state, state);
                assert!(t.effects.is_empty());
            }
        }

        #[test]
        fn test_resume_restores_remaining() {
            let now = Instant::now();
            let state = paused(Phase::Break, Duration::from_secs(42));
            let t = cmd(state, Command::Resume, now);

            assert_eq!(t.state, running(Phase::Break, now + Duration::from_secs(42)));
            assert_eq!(
                t.effects,
                vec![
                    Effect::AcquireWakeLock,
                    Effect::StartPolling,
                    Effect::Render {
                        remaining: Duration::from_secs(42),
                        phase: Phase::Break
                    },
                    Effect::Message(StatusMessage::Resumed),
                ]
            );
        }

        #[test]
        fn test_resume_is_noop_unless_paused() {
            let now = Instant::now();
            for state in [TimerState::new(), running(Phase::Work, now)] {
                let t = cmd(state, Command::Resume, now);
                assert_eq!(t.state, state);
                assert!(t.effects.is_empty());
            }
        }

        #[test]
        fn test_pause_resume_preserves_total_time() {
            let start = Instant::now();
            let t = cmd(TimerState::new(), Command::Start, start);
            let t = step(
                t.state,
                Input::Tick,
                &config(),
                start + Duration::from_secs(600),
            );
            let t = cmd(t.state, Command::Pause, start + Duration::from_secs(600));

            // A long pause does not consume countdown time.
            let resumed_at = start + Duration::from_secs(5000);
            let t = cmd(t.state, Command::Resume, resumed_at);
            let t = step(t.state, Input::Tick, &config(), resumed_at);

            assert_eq!(
                t.effects,
                vec![Effect::Render {
                    remaining: Duration::from_secs(15 * 60),
                    phase: Phase::Work
                }]
            );
        }
    }

    // ------------------------------------------------------------------------
    // Toggle Tests
    // ------------------------------------------------------------------------

    mod toggle_tests {
        use super::*;

        #[test]
        fn test_toggle_cycles_start_pause_resume() {
            let now = Instant::now();
            let t = cmd(TimerState::new(), Command::Toggle, now);
            assert!(t.state.is_running());

            let t = cmd(t.state, Command::Toggle, now + Duration::from_secs(1));
            assert!(t.state.is_paused());

            let t = cmd(t.state, Command::Toggle, now + Duration::from_secs(2));
            assert!(t.state.is_running());
            assert_eq!(
                t.state.remaining_at(now + Duration::from_secs(2)),
                Some(Duration::from_secs(25 * 60 - 1))
            );
        }
    }

    // ------------------------------------------------------------------------
    // Reset Tests
    // ------------------------------------------------------------------------

    mod reset_tests {
        use super::*;

        #[test]
        fn test_reset_from_running() {
            let now = Instant::now();
            let state = running(Phase::Break, now + Duration::from_secs(30));
            let t = cmd(state, Command::Reset, now);

            assert_eq!(
                t.state,
                TimerState {
                    phase: Phase::Break,
                    run: RunState::Idle
                }
            );
            assert_eq!(
                t.effects,
                vec![
                    Effect::StopPolling,
                    Effect::ReleaseWakeLock,
                    Effect::Render {
                        remaining: Duration::from_secs(5 * 60),
                        phase: Phase::Break
                    },
                    Effect::Message(StatusMessage::Reset),
                ]
            );
        }

        #[test]
        fn test_reset_from_paused_keeps_phase() {
            let now = Instant::now();
            let t = cmd(paused(Phase::Work, Duration::from_secs(3)), Command::Reset, now);
            assert_eq!(t.state.phase, Phase::Work);
            assert!(t.state.is_idle());
            assert!(!t.effects.contains(&Effect::ReleaseWakeLock));
        }

        #[test]
        fn test_reset_from_idle_renders_full_duration() {
            let now = Instant::now();
            let t = cmd(TimerState::new(), Command::Reset, now);
            assert!(t.state.is_idle());
            assert!(t.effects.contains(&Effect::Render {
                remaining: Duration::from_secs(25 * 60),
                phase: Phase::Work
            }));
        }
    }

    // ------------------------------------------------------------------------
    // Tick / Expiry Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_renders_remaining() {
            let now = Instant::now();
            let state = running(Phase::Work, now + Duration::from_millis(1200));
            let t = step(state, Input::Tick, &config(), now);
            assert_eq!(t.state, state);
            assert_eq!(
                t.effects,
                vec![Effect::Render {
                    remaining: Duration::from_millis(1200),
                    phase: Phase::Work
                }]
            );
        }

        #[test]
        fn test_tick_when_not_running_is_ignored() {
            let now = Instant::now();
            for state in [TimerState::new(), paused(Phase::Work, Duration::from_secs(1))] {
                let t = step(state, Input::Tick, &config(), now);
                assert_eq!(t.state, state);
                assert!(t.effects.is_empty());
            }
        }

        #[test]
        fn test_expiry_at_exact_target() {
            let now = Instant::now();
            let state = running(Phase::Work, now);
            let t = step(state, Input::Tick, &config(), now);

            assert_eq!(
                t.state,
                running(Phase::Break, now + Duration::from_secs(5 * 60))
            );
            assert_eq!(
                t.effects,
                vec![
                    Effect::StopPolling,
                    Effect::Render {
                        remaining: Duration::ZERO,
                        phase: Phase::Work
                    },
                    Effect::Message(StatusMessage::PhaseStarted(Phase::Break)),
                    Effect::PlayAlert,
                    Effect::Notify(Phase::Break),
                    Effect::StartPolling,
                    Effect::Render {
                        remaining: Duration::from_secs(5 * 60),
                        phase: Phase::Break
                    },
                ]
            );
        }

        #[test]
        fn test_late_tick_still_flips_once() {
            let now = Instant::now();
            let state = running(Phase::Break, now);
            let late = now + Duration::from_secs(3600);
            let t = step(state, Input::Tick, &config(), late);

            assert_eq!(
                t.state,
                running(Phase::Work, late + Duration::from_secs(25 * 60))
            );
            let alerts = t.effects.iter().filter(|e| **e == Effect::PlayAlert).count();
            assert_eq!(alerts, 1);
        }

        #[test]
        fn test_phases_alternate_across_expiries() {
            let mut now = Instant::now();
            let mut state = cmd(TimerState::new(), Command::Start, now).state;
            let mut seen = vec![state.phase];

            for _ in 0..6 {
                let RunState::Running { target } = state.run else {
                    panic!("expected running");
                };
                now = target;
                state = step(state, Input::Tick, &config(), now).state;
                seen.push(state.phase);
            }

            assert_eq!(
                seen,
                vec![
                    Phase::Work,
                    Phase::Break,
                    Phase::Work,
                    Phase::Break,
                    Phase::Work,
                    Phase::Break,
                    Phase::Work
                ]
            );
        }
    }

    // ------------------------------------------------------------------------
    // Skip Tests
    // ------------------------------------------------------------------------

    mod skip_tests {
        use super::*;

        #[test]
        fn test_skip_while_running_matches_expiry() {
            let now = Instant::now();
            let state = running(Phase::Work, now + Duration::from_secs(900));
            let t = cmd(state, Command::Skip, now);

            assert_eq!(
                t.state,
                running(Phase::Break, now + Duration::from_secs(5 * 60))
            );
            assert_eq!(
                t.effects,
                vec![
                    Effect::Message(StatusMessage::PhaseStarted(Phase::Break)),
                    Effect::PlayAlert,
                    Effect::Notify(Phase::Break),
                    Effect::StartPolling,
                    Effect::Render {
                        remaining: Duration::from_secs(5 * 60),
                        phase: Phase::Break
                    },
                ]
            );
        }

        #[test]
        fn test_skip_from_idle_starts_next_phase() {
            let now = Instant::now();
            let t = cmd(TimerState::new(), Command::Skip, now);
            assert_eq!(
                t.state,
                running(Phase::Break, now + Duration::from_secs(5 * 60))
            );
            assert!(t.effects.contains(&Effect::AcquireWakeLock));
        }

        #[test]
        fn test_skip_from_paused_discards_remainder() {
            let now = Instant::now();
            let t = cmd(paused(Phase::Break, Duration::from_secs(7)), Command::Skip, now);
            assert_eq!(
                t.state,
                running(Phase::Work, now + Duration::from_secs(25 * 60))
            );
        }

        #[test]
        fn test_skip_reads_configuration_fresh() {
            let now = Instant::now();
            let custom = Configuration {
                work_minutes: 10,
                break_minutes: 2,
            };
            let t = step(
                TimerState::new(),
                Input::Command(Command::Skip),
                &custom,
                now,
            );
            assert_eq!(
                t.state,
                running(Phase::Break, now + Duration::from_secs(2 * 60))
            );
        }
    }
}
