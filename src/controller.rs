//! The mode state machine that ties parsing, pose lookup and the game
//! together.
//!
//! The entry point is [`HandController`]. Build it from a [`HandConfig`] and
//! the two sinks, then either drive it one loop iteration at a time with
//! [`HandController::poll`], or call [`on_mode_toggle`], [`on_reset`],
//! [`dispatch`] and [`tick`] directly.
//!
//! [`on_mode_toggle`]: HandController::on_mode_toggle
//! [`on_reset`]: HandController::on_reset
//! [`dispatch`]: HandController::dispatch
//! [`tick`]: HandController::tick

use crate::command::{self, Command, Mode};
use crate::config::HandConfig;
use crate::error::{CommandError, PoseTableError};
use crate::game::{
    GameEngine, GameState, Gesture, GestureChooser, Handshake, RandomChooser, RoundReport,
};
use crate::input::Button;
use crate::pose::{JointVector, PoseTable};
use crate::sink::{ActuatorSink, DisplaySink};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Inputs sampled by one iteration of the control loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoopInputs<'a> {
    /// Current level of the mode button.
    pub mode_pressed: bool,
    /// Current level of the reset button.
    pub reset_pressed: bool,
    /// One pending input line, if any.
    pub line: Option<&'a str>,
}

/// Owns the mode, the game state and the sinks.
pub struct HandController<A, D> {
    config: HandConfig,
    table: PoseTable,
    mode: Mode,
    game: GameEngine,
    chooser: Box<dyn GestureChooser>,
    actuator: A,
    display: D,
    mode_button: Button,
    reset_button: Button,
    last_pose: Option<JointVector>,
    last_letter: Option<char>,
    /// While set, the display shows a transient message until this instant.
    transient_until: Option<Instant>,
}

impl<A: ActuatorSink, D: DisplaySink> HandController<A, D> {
    /// Creates a controller in spelling mode and renders the initial banner.
    ///
    /// Fails only if the configured pose table does not validate.
    pub fn new(config: HandConfig, actuator: A, display: D) -> Result<Self, PoseTableError> {
        let table = config.pose_table()?;
        let settle = config.settle_delay();
        let mut controller = Self {
            game: GameEngine::new(config.win_threshold),
            table,
            mode: Mode::default(),
            chooser: Box::new(RandomChooser),
            actuator,
            display,
            mode_button: Button::new(settle),
            reset_button: Button::new(settle),
            last_pose: None,
            last_letter: None,
            transient_until: None,
            config,
        };
        info!(
            profile = %controller.config.profile,
            joints = controller.table.joint_count(),
            "hand controller ready"
        );
        controller.render_status();
        Ok(controller)
    }

    /// Replaces the strategy the hand uses to pick its own gesture.
    pub fn with_chooser(mut self, chooser: impl GestureChooser + 'static) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn game_state(&self) -> GameState {
        self.game.state()
    }

    pub fn handshake(&self) -> Handshake {
        self.game.handshake()
    }

    /// The last pose forwarded to the actuator.
    pub fn last_pose(&self) -> Option<&JointVector> {
        self.last_pose.as_ref()
    }

    pub fn table(&self) -> &PoseTable {
        &self.table
    }

    pub fn config(&self) -> &HandConfig {
        &self.config
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Runs one loop iteration: mode button, reset button (game mode only),
    /// at most one input line, then timers.
    ///
    /// Returns the commands the line produced.
    pub fn poll(&mut self, inputs: &LoopInputs<'_>, now: Instant) -> Vec<Command> {
        if self.mode_button.sample(inputs.mode_pressed, now) {
            self.on_mode_toggle();
        }
        if self.mode == Mode::Game && self.reset_button.sample(inputs.reset_pressed, now) {
            self.on_reset();
        }

        let commands = match inputs.line {
            Some(line) => self.dispatch(line, now),
            None => Vec::new(),
        };
        self.tick(now);
        commands
    }

    /// Advances to the next mode.
    pub fn on_mode_toggle(&mut self) {
        self.enter_mode(self.mode.next());
    }

    /// Reset button edge. Ignored outside game mode.
    pub fn on_reset(&mut self) {
        if self.mode != Mode::Game {
            debug!(mode = %self.mode, "reset ignored outside game mode");
            return;
        }
        info!("game reset");
        self.game.reset();
        self.render_status();
    }

    /// Parses one input line with the active grammar and acts on it.
    ///
    /// Returns every command the line produced, including rejected ones.
    ///
    /// A stale handshake is expired first, so a counterpart line arriving
    /// after the deadline is rejected as [`CommandError::HandshakeTimeout`]
    /// instead of scoring the round.
    pub fn dispatch(&mut self, line: &str, now: Instant) -> Vec<Command> {
        let expired = self.expire_handshake(now);
        let mut commands = self.parse(line, expired);
        if expired {
            for cmd in &mut commands {
                if matches!(
                    cmd,
                    Command::GameHandGesture(_)
                        | Command::Invalid(CommandError::UnsupportedSymbol(_))
                ) {
                    *cmd = Command::Invalid(CommandError::HandshakeTimeout);
                }
            }
        }

        for cmd in &commands {
            // Already reported by the expiry above.
            if *cmd == Command::Invalid(CommandError::HandshakeTimeout) {
                continue;
            }
            self.handle(cmd, now);
        }
        commands
    }

    /// Reverts expired status messages and times out a stale handshake.
    pub fn tick(&mut self, now: Instant) {
        if self.expire_handshake(now) {
            return;
        }
        if self.transient_until.is_some() && !self.transient_active(now) {
            self.render_status();
        }
    }

    fn expire_handshake(&mut self, now: Instant) -> bool {
        if !self.game.expire(now) {
            return false;
        }
        warn!("counterpart gesture timed out");
        self.show_error(&CommandError::HandshakeTimeout, now);
        true
    }

    fn transient_active(&self, now: Instant) -> bool {
        self.transient_until.is_some_and(|until| now < until)
    }

    /// `late_counterpart` is set when a handshake expired just before this
    /// line, so the line is still read with the counterpart grammar.
    fn parse(&self, line: &str, late_counterpart: bool) -> Vec<Command> {
        // Bare mode words would swallow spelled words, so spelling mode
        // only takes the `MODE:` form.
        if self.config.serial_mode_select
            && let Some(cmd) = command::parse_mode_select(line, self.mode != Mode::Spelling)
        {
            return vec![cmd];
        }

        match self.mode {
            Mode::Spelling => command::parse_spelling(line, &self.table),
            _ if line.trim().is_empty() => Vec::new(),
            Mode::Mirror => vec![command::parse_angles(line, &self.table)],
            Mode::Game => vec![command::parse_game(
                line,
                late_counterpart
                    || matches!(self.game.handshake(), Handshake::AwaitingHand { .. }),
            )],
        }
    }

    fn handle(&mut self, cmd: &Command, now: Instant) {
        debug!(mode = %self.mode, ?cmd, "dispatching");
        match cmd {
            Command::Letter(c) => {
                if let Some(pose) = self.table.lookup_letter(*c).cloned() {
                    self.last_letter = Some(*c);
                    self.apply(pose);
                    // Keep an earlier "Invalid Letter" from the same line
                    // visible; `tick` shows the letter once it expires.
                    if !self.transient_active(now) {
                        self.render_status();
                    }
                }
            }
            Command::AngleVector(pose) => {
                self.apply(pose.clone());
                self.render_status();
            }
            Command::GameUserGesture {
                gesture,
                handshake: true,
            } => {
                let deadline = now + self.config.handshake_timeout();
                self.game.begin_handshake(*gesture, deadline);
                self.render_status();
            }
            Command::GameUserGesture {
                gesture,
                handshake: false,
            } => {
                let hand = self.chooser.choose();
                self.play_round(*gesture, hand, now);
            }
            Command::GameHandGesture(hand) => match self.game.take_pending() {
                Some(user) => self.play_round(user, *hand, now),
                None => warn!(%hand, "counterpart gesture without a pending user move"),
            },
            Command::GameScoreReport(reported) => {
                info!(score = %reported, "score report");
                match self.game.apply_score_report(*reported) {
                    Some(winner) => {
                        let lines = vec![winner.banner().to_string(), reported.to_string()];
                        self.show_transient(lines, self.config.win_hold(), now);
                    }
                    None => self.render_status(),
                }
            }
            Command::GameReset => self.on_reset(),
            Command::SelectMode(mode) => self.enter_mode(*mode),
            Command::Invalid(err) => {
                warn!(mode = %self.mode, error = %err, "input rejected");
                // A bad counterpart line abandons the round.
                if self.mode == Mode::Game
                    && matches!(err, CommandError::UnsupportedSymbol(_))
                    && self.game.take_pending().is_some()
                {
                    debug!("pending round abandoned");
                }
                self.show_error(err, now);
            }
        }
    }

    fn enter_mode(&mut self, mode: Mode) {
        let previous = self.mode;
        self.mode = mode;
        if mode == Mode::Game && previous != Mode::Game {
            self.game.reset();
        } else if previous == Mode::Game && mode != Mode::Game {
            self.game.take_pending();
        }
        info!(from = %previous, to = %mode, "mode changed");
        self.display.echo(mode.name());
        self.render_status();
    }

    fn play_round(&mut self, user: Gesture, hand: Gesture, now: Instant) {
        let report = self.game.play_round(user, hand);
        let pose = self.table.lookup_gesture(hand).clone();
        self.apply(pose);

        let (lines, hold) = round_lines(
            &report,
            self.config.status_timeout(),
            self.config.win_hold(),
        );
        self.show_transient(lines, hold, now);
    }

    fn apply(&mut self, pose: JointVector) {
        debug!(pose = %pose, "applying pose");
        self.actuator.apply(&pose);
        self.last_pose = Some(pose);
    }

    fn show_error(&mut self, err: &CommandError, now: Instant) {
        let status = match err {
            CommandError::UnsupportedSymbol(_) if self.mode == Mode::Game => "Invalid Gesture",
            _ => err.status_text(),
        };
        let lines = vec![format!("Mode: {}", self.mode), status.to_string()];
        self.show_transient(lines, self.config.status_timeout(), now);
    }

    fn show_transient(&mut self, lines: Vec<String>, hold: Duration, now: Instant) {
        self.display.render(&lines);
        self.transient_until = Some(now + hold);
    }

    fn render_status(&mut self) {
        self.transient_until = None;
        let mut lines = vec![format!("Mode: {}", self.mode)];
        match self.mode {
            Mode::Spelling => lines.push(match self.last_letter {
                Some(c) => format!("Letter: {c}"),
                None => "Letter: -".to_string(),
            }),
            Mode::Mirror => lines.push(match &self.last_pose {
                Some(pose) => format!("Pose: {pose}"),
                None => "Pose: -".to_string(),
            }),
            Mode::Game => {
                lines.push(self.game.state().to_string());
                if let Handshake::AwaitingHand { user, .. } = self.game.handshake() {
                    lines.push(format!("You: {user}"));
                    lines.push("Waiting for hand...".to_string());
                }
            }
        }
        self.display.render(&lines);
    }
}

fn round_lines(
    report: &RoundReport,
    status: Duration,
    win_hold: Duration,
) -> (Vec<String>, Duration) {
    let mut lines = vec![
        format!("Hand: {}", report.hand),
        format!("You: {}", report.user),
        report.outcome.status_text().to_string(),
    ];
    match report.winner {
        Some(winner) => {
            lines.push(winner.banner().to_string());
            (lines, win_hold)
        }
        None => {
            lines.push(report.score.to_string());
            (lines, status)
        }
    }
}
