//! Player controller
//!
//! One body shared by two roles that alternate turns:
//!
//! ```text
//! Grounded --hold--> Charging --release--> Airborne (spinning) --land--> Grounded
//!     \_____________________\______________________/
//!                            \--> Dead --respawn--> (spawn point)
//! ```
//!
//! Landing passes the turn. Death can interrupt any state and is idempotent.

use glam::Vec3;

use super::body::Body;
use super::state::GameEvent;
use crate::consts::{P1_POSE_DEGREES, P2_POSE_DEGREES};
use crate::platform::InputSnapshot;
use crate::settings::{GroundCheckSettings, JumpSettings, Settings, SpinSettings};
use crate::{lerp, wrap_degrees};

/// Answers "is there ground inside this sphere?"
pub trait GroundProbe {
    fn is_ground_at(&self, center: Vec3, radius: f32) -> bool;
}

/// Which set of character models is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSet {
    Default,
    /// Shown while dead
    Reversed,
}

/// Coarse controller state, derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Grounded,
    Charging,
    Airborne,
    Dead,
}

/// Impulse magnitude for a charge held `charge_time` seconds
pub fn jump_force(charge_time: f32, jump: &JumpSettings) -> f32 {
    lerp(jump.min_force, jump.max_force, charge_time / jump.max_charge_time)
}

/// Degrees of spin for a jump released at `charge_percent` (0..=1)
pub fn spin_total_rotation(charge_percent: f32, spin: &SpinSettings) -> f32 {
    let extra = (charge_percent.clamp(0.0, 1.0) * spin.max_additional_loops as f32)
        .round_ties_even() as u32;
    360.0 * (spin.base_loops + extra) as f32
}

/// Canonical model roll for the active role
pub fn pose_degrees(is_player1_turn: bool) -> f32 {
    if is_player1_turn {
        P1_POSE_DEGREES
    } else {
        P2_POSE_DEGREES
    }
}

/// Result of releasing a charged jump
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpLaunch {
    pub force: f32,
    pub charge_percent: f32,
    pub total_rotation: f32,
    pub impulse: Vec3,
}

#[derive(Debug, Clone)]
pub struct Player {
    is_dead: bool,
    is_charging: bool,
    is_spinning: bool,
    is_grounded: bool,
    is_player1_turn: bool,
    /// +1 faces right; the turn frame flips instead of the player
    facing: f32,
    charge_time: f32,
    spin_speed: f32,
    /// Visible model roll in degrees
    model_roll: f32,
    spawn_point: Vec3,
    death_timer: f32,
    model_set: ModelSet,
}

impl Player {
    /// Grounded player 1 standing at `spawn_point`
    pub fn new(spawn_point: Vec3) -> Self {
        Self {
            is_dead: false,
            is_charging: false,
            is_spinning: false,
            is_grounded: true,
            is_player1_turn: true,
            facing: 1.0,
            charge_time: 0.0,
            spin_speed: 0.0,
            model_roll: pose_degrees(true),
            spawn_point,
            death_timer: 0.0,
            model_set: ModelSet::Default,
        }
    }

    pub fn phase(&self) -> PlayerPhase {
        if self.is_dead {
            PlayerPhase::Dead
        } else if self.is_charging {
            PlayerPhase::Charging
        } else if self.is_grounded && !self.is_spinning {
            PlayerPhase::Grounded
        } else {
            PlayerPhase::Airborne
        }
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    pub fn is_spinning(&self) -> bool {
        self.is_spinning
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn is_player1_turn(&self) -> bool {
        self.is_player1_turn
    }

    /// Player 1 plays red, player 2 blue
    pub fn is_red_turn(&self) -> bool {
        self.is_player1_turn
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn charge_time(&self) -> f32 {
        self.charge_time
    }

    pub fn spin_speed(&self) -> f32 {
        self.spin_speed
    }

    pub fn model_roll(&self) -> f32 {
        self.model_roll
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.spawn_point
    }

    pub fn death_timer(&self) -> f32 {
        self.death_timer
    }

    pub fn model_set(&self) -> ModelSet {
        self.model_set
    }

    /// Overwrite the respawn location (checkpoint contact)
    pub fn set_spawn_point(&mut self, position: Vec3) {
        self.spawn_point = position;
        log::info!("New spawn point set at: {}", position);
    }

    /// One controller tick
    pub fn update(
        &mut self,
        body: &mut Body,
        ground: &impl GroundProbe,
        input: &InputSnapshot,
        settings: &Settings,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if self.is_dead {
            let manual = input.was_pressed(settings.keys.respawn);
            self.update_dead(body, manual, settings.auto_respawn_time, dt, events);
            return;
        }

        self.update_ground(body, ground, &settings.ground_check, events);
        self.handle_jump_input(body, input, settings, dt, events);
        self.update_spin(dt);
    }

    fn update_ground(
        &mut self,
        body: &Body,
        ground: &impl GroundProbe,
        probe: &GroundCheckSettings,
        events: &mut Vec<GameEvent>,
    ) {
        let offset = if self.is_player1_turn {
            probe.p1_probe_offset
        } else {
            probe.p2_probe_offset
        };
        let was_grounded = self.is_grounded;
        self.is_grounded = ground.is_ground_at(body.position + offset, probe.probe_radius);

        if !was_grounded && self.is_grounded {
            self.land();
            events.push(GameEvent::Landed {
                player1_turn: self.is_player1_turn,
            });
        }
    }

    /// Landing: stop spinning and hand the turn over
    fn land(&mut self) {
        self.is_player1_turn = !self.is_player1_turn;
        self.stop_spin();
        log::info!(
            "Now it's Player {}'s turn!",
            if self.is_player1_turn { 1 } else { 2 }
        );
    }

    /// End the spin and snap back to the role's pose
    fn stop_spin(&mut self) {
        self.is_spinning = false;
        self.spin_speed = 0.0;
        self.reset_pose();
    }

    fn reset_pose(&mut self) {
        self.model_roll = pose_degrees(self.is_player1_turn);
        self.facing = 1.0;
    }

    fn handle_jump_input(
        &mut self,
        body: &mut Body,
        input: &InputSnapshot,
        settings: &Settings,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let key = settings.keys.jump_key(self.is_player1_turn);
        let held = input.is_held(key);
        let released = input.was_released(key);

        if held && !self.is_charging && self.is_grounded {
            log::debug!("Charging jump ({})", key.as_str());
            // A jump that never left the ground is still spinning
            if self.is_spinning {
                self.stop_spin();
            }
            self.start_charge();
            events.push(GameEvent::ChargeStarted {
                player1: self.is_player1_turn,
            });
        } else if held && self.is_charging {
            self.continue_charge(dt, settings.jump.max_charge_time);
        } else if released && self.is_charging {
            let launch = self.release(body, &settings.jump, &settings.spin);
            events.push(GameEvent::Jumped {
                player1: self.is_player1_turn,
                force: launch.force,
                total_rotation: launch.total_rotation,
            });
        }
    }

    pub fn start_charge(&mut self) {
        self.is_charging = true;
        self.charge_time = 0.0;
    }

    pub fn continue_charge(&mut self, dt: f32, max_charge_time: f32) {
        self.charge_time = (self.charge_time + dt).min(max_charge_time);
    }

    /// Launch: zero velocity, apply one impulse, start the spin
    pub fn release(&mut self, body: &mut Body, jump: &JumpSettings, spin: &SpinSettings) -> JumpLaunch {
        let charge_percent = (self.charge_time / jump.max_charge_time).clamp(0.0, 1.0);
        let force = jump_force(self.charge_time, jump);
        let angle = jump.angle_degrees.to_radians();
        let direction = Vec3::new(self.facing * angle.cos(), angle.sin(), 0.0);
        let impulse = direction * force;

        let total_rotation = self.start_spin(charge_percent, spin);

        body.velocity = Vec3::ZERO;
        body.apply_impulse(impulse);

        self.is_charging = false;
        self.charge_time = 0.0;

        JumpLaunch {
            force,
            charge_percent,
            total_rotation,
            impulse,
        }
    }

    fn start_spin(&mut self, charge_percent: f32, spin: &SpinSettings) -> f32 {
        let total_rotation = spin_total_rotation(charge_percent, spin);
        self.spin_speed = total_rotation / spin.estimated_air_time;
        self.is_spinning = true;
        log::debug!(
            "Started spinning with charge {:.2}: {} degrees",
            charge_percent,
            total_rotation
        );
        total_rotation
    }

    fn update_spin(&mut self, dt: f32) {
        if self.is_spinning {
            self.model_roll = wrap_degrees(self.model_roll + self.spin_speed * dt);
        }
    }

    /// Kill the player. Returns `false` if already dead.
    pub fn die(&mut self, body: &mut Body) -> bool {
        if self.is_dead {
            return false;
        }
        self.is_dead = true;
        self.death_timer = 0.0;
        self.model_set = ModelSet::Reversed;
        self.is_spinning = false;
        self.spin_speed = 0.0;
        self.is_charging = false;
        self.charge_time = 0.0;
        body.angular_velocity = Vec3::ZERO;
        log::info!("Player died! Press respawn or wait for auto-respawn.");
        true
    }

    fn update_dead(
        &mut self,
        body: &mut Body,
        manual: bool,
        auto_respawn_time: f32,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if manual {
            self.respawn(body);
            events.push(GameEvent::Respawned {
                manual: true,
                position: self.spawn_point,
            });
            return;
        }

        self.death_timer += dt;
        if self.death_timer >= auto_respawn_time {
            self.respawn(body);
            events.push(GameEvent::Respawned {
                manual: false,
                position: self.spawn_point,
            });
        }
    }

    /// Back to the spawn point at rest with the default models
    pub fn respawn(&mut self, body: &mut Body) {
        self.is_dead = false;
        self.death_timer = 0.0;
        body.teleport(self.spawn_point);
        self.reset_pose();
        self.model_set = ModelSet::Default;
        log::info!("Player respawned!");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Key;
    use proptest::prelude::*;

    /// Flat ground everywhere below y = 0
    struct Floor;

    impl GroundProbe for Floor {
        fn is_ground_at(&self, center: Vec3, radius: f32) -> bool {
            center.y - radius <= 0.0
        }
    }

    /// No ground anywhere
    struct Void;

    impl GroundProbe for Void {
        fn is_ground_at(&self, _center: Vec3, _radius: f32) -> bool {
            false
        }
    }

    fn setup() -> (Player, Body, Settings) {
        let spawn = Vec3::new(0.0, 0.5, 0.0);
        let settings = Settings::default();
        let body = Body::new(spawn, 1.0, Vec3::splat(0.5));
        (Player::new(spawn), body, settings)
    }

    fn step(
        player: &mut Player,
        body: &mut Body,
        ground: &impl GroundProbe,
        input: InputSnapshot,
        settings: &Settings,
        dt: f32,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        player.update(body, ground, &input, settings, dt, &mut events);
        events
    }

    #[test]
    fn test_force_endpoints() {
        let jump = JumpSettings::default();
        assert_eq!(jump_force(0.0, &jump), jump.min_force);
        assert_eq!(jump_force(jump.max_charge_time, &jump), jump.max_force);
        assert_eq!(jump_force(1.0, &jump), 10.0);
    }

    #[test]
    fn test_spin_rotation_values() {
        let spin = SpinSettings::default();
        assert_eq!(spin_total_rotation(0.0, &spin), 360.0);
        assert_eq!(spin_total_rotation(0.5, &spin), 360.0 * 3.0);
        assert_eq!(spin_total_rotation(1.0, &spin), 360.0 * 4.0);
    }

    #[test]
    fn test_spin_rounds_half_to_even() {
        let spin = SpinSettings::default();
        // 1/6 * 3 = 0.5 rounds down to 0 extra loops
        assert_eq!(spin_total_rotation(1.0 / 6.0, &spin), 360.0);
    }

    #[test]
    fn test_charge_release_launches() {
        let (mut player, mut body, settings) = setup();
        let key = Key::Space;

        let events = step(&mut player, &mut body, &Floor, InputSnapshot::default().press(key), &settings, 0.5);
        assert!(matches!(events[..], [GameEvent::ChargeStarted { player1: true }]));
        assert_eq!(player.phase(), PlayerPhase::Charging);
        assert_eq!(player.charge_time(), 0.0);

        step(&mut player, &mut body, &Floor, InputSnapshot::default().hold(key), &settings, 0.5);
        step(&mut player, &mut body, &Floor, InputSnapshot::default().hold(key), &settings, 0.5);
        assert_eq!(player.charge_time(), 1.0);

        let events = step(&mut player, &mut body, &Floor, InputSnapshot::default().release(key), &settings, 0.5);
        match events[..] {
            [GameEvent::Jumped { force, total_rotation, .. }] => {
                assert_eq!(force, 10.0);
                assert_eq!(total_rotation, 360.0 * 3.0);
            }
            _ => panic!("expected a jump, got {:?}", events),
        }
        assert!(!player.is_charging());
        assert!(player.is_spinning());
        let expected = 10.0 * 45f32.to_radians().cos();
        assert!((body.velocity.x - expected).abs() < 1e-4);
        assert!((body.velocity.y - expected).abs() < 1e-4);
    }

    #[test]
    fn test_charge_clamped_to_max() {
        let (mut player, mut body, settings) = setup();
        step(&mut player, &mut body, &Floor, InputSnapshot::default().press(Key::Space), &settings, 0.5);
        for _ in 0..20 {
            step(&mut player, &mut body, &Floor, InputSnapshot::default().hold(Key::Space), &settings, 0.5);
        }
        assert_eq!(player.charge_time(), settings.jump.max_charge_time);
    }

    #[test]
    fn test_wrong_role_key_ignored() {
        let (mut player, mut body, settings) = setup();
        let events = step(
            &mut player,
            &mut body,
            &Floor,
            InputSnapshot::default().press(Key::RightShift),
            &settings,
            0.1,
        );
        assert!(events.is_empty());
        assert!(!player.is_charging());
    }

    #[test]
    fn test_no_charge_while_airborne() {
        let (mut player, mut body, settings) = setup();
        step(&mut player, &mut body, &Void, InputSnapshot::default().press(Key::Space), &settings, 0.1);
        assert!(!player.is_grounded());
        assert!(!player.is_charging());
    }

    #[test]
    fn test_landing_flips_turn_and_resets_pose() {
        let (mut player, mut body, settings) = setup();
        step(&mut player, &mut body, &Floor, InputSnapshot::default().press(Key::Space), &settings, 0.1);
        step(&mut player, &mut body, &Floor, InputSnapshot::default().release(Key::Space), &settings, 0.1);
        assert!(player.is_spinning());

        // Airborne: spin accumulates regardless of trajectory
        body.position.y = 5.0;
        let roll_before = player.model_roll();
        step(&mut player, &mut body, &Floor, InputSnapshot::default(), &settings, 0.1);
        assert!(!player.is_grounded());
        assert!(player.model_roll() != roll_before);
        assert!(player.is_player1_turn());

        body.position.y = 0.5;
        let events = step(&mut player, &mut body, &Floor, InputSnapshot::default(), &settings, 0.1);
        assert!(matches!(events[..], [GameEvent::Landed { player1_turn: false }]));
        assert!(!player.is_spinning());
        assert!(!player.is_player1_turn());
        assert_eq!(player.model_roll(), P2_POSE_DEGREES);
        assert_eq!(player.facing(), 1.0);

        // Player 2 now jumps with Right-Shift
        let events = step(
            &mut player,
            &mut body,
            &Floor,
            InputSnapshot::default().press(Key::RightShift),
            &settings,
            0.1,
        );
        assert!(matches!(events[..], [GameEvent::ChargeStarted { player1: false }]));
    }

    #[test]
    fn test_grounded_charge_ends_leftover_spin() {
        let (mut player, mut body, mut settings) = setup();
        settings.jump.min_force = 1.0;
        assert!(settings.validate().is_ok());

        step(&mut player, &mut body, &Floor, InputSnapshot::default().press(Key::Space), &settings, 0.1);
        step(&mut player, &mut body, &Floor, InputSnapshot::default().release(Key::Space), &settings, 0.1);
        assert!(player.is_spinning());

        // The hop never cleared the probe, so no landing happens
        for _ in 0..10 {
            let events = step(&mut player, &mut body, &Floor, InputSnapshot::default(), &settings, 0.1);
            assert!(events.is_empty());
        }
        assert!(player.is_grounded());
        assert!(player.is_spinning());
        assert!(player.is_player1_turn());

        let events = step(&mut player, &mut body, &Floor, InputSnapshot::default().press(Key::Space), &settings, 0.1);
        assert!(matches!(events[..], [GameEvent::ChargeStarted { player1: true }]));
        assert!(player.is_charging());
        assert!(!player.is_spinning());
        assert_eq!(player.spin_speed(), 0.0);
        assert_eq!(player.model_roll(), P1_POSE_DEGREES);
    }

    #[test]
    fn test_death_is_idempotent() {
        let (mut player, mut body, settings) = setup();
        step(&mut player, &mut body, &Floor, InputSnapshot::default().press(Key::Space), &settings, 0.1);
        body.angular_velocity = Vec3::Z;

        assert!(player.die(&mut body));
        let once = format!("{:?}", player);
        assert!(!player.die(&mut body));
        let twice = format!("{:?}", player);
        assert_eq!(once, twice);

        assert_eq!(player.phase(), PlayerPhase::Dead);
        assert!(!player.is_charging());
        assert!(!player.is_spinning());
        assert_eq!(player.model_set(), ModelSet::Reversed);
        assert_eq!(body.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_auto_respawn_at_timeout() {
        let (mut player, mut body, settings) = setup();
        player.set_spawn_point(Vec3::new(3.0, 0.5, 0.0));
        body.position = Vec3::new(9.0, -20.0, 0.0);
        body.velocity = Vec3::new(1.0, -9.0, 0.0);
        player.die(&mut body);

        // 8 s timeout with half-second ticks: nothing for 15 ticks
        for _ in 0..15 {
            let events = step(&mut player, &mut body, &Void, InputSnapshot::default(), &settings, 0.5);
            assert!(events.is_empty());
            assert!(player.is_dead());
        }
        assert_eq!(player.death_timer(), 7.5);

        let events = step(&mut player, &mut body, &Void, InputSnapshot::default(), &settings, 0.5);
        assert!(matches!(events[..], [GameEvent::Respawned { manual: false, .. }]));
        assert!(!player.is_dead());
        assert_eq!(player.death_timer(), 0.0);
        assert_eq!(body.position, Vec3::new(3.0, 0.5, 0.0));
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(player.model_set(), ModelSet::Default);
    }

    #[test]
    fn test_manual_respawn() {
        let (mut player, mut body, settings) = setup();
        player.die(&mut body);
        let events = step(
            &mut player,
            &mut body,
            &Floor,
            InputSnapshot::default().press(settings.keys.respawn),
            &settings,
            0.01,
        );
        assert!(matches!(events[..], [GameEvent::Respawned { manual: true, .. }]));
        assert!(!player.is_dead());
    }

    #[test]
    fn test_dead_player_ignores_jump() {
        let (mut player, mut body, settings) = setup();
        player.die(&mut body);
        let events = step(&mut player, &mut body, &Floor, InputSnapshot::default().press(Key::Space), &settings, 0.01);
        assert!(events.is_empty());
        assert!(!player.is_charging());
    }

    #[test]
    fn test_spawn_point_overwritten_unconditionally() {
        let (mut player, _, _) = setup();
        player.set_spawn_point(Vec3::new(100.0, -50.0, 0.0));
        assert_eq!(player.spawn_point(), Vec3::new(100.0, -50.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_force_monotonic_and_bounded(a in 0.0f32..=2.0, b in 0.0f32..=2.0) {
            let jump = JumpSettings::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let f_lo = jump_force(lo, &jump);
            let f_hi = jump_force(hi, &jump);
            prop_assert!(f_lo <= f_hi);
            prop_assert!(f_lo >= jump.min_force && f_hi <= jump.max_force);
        }

        #[test]
        fn prop_spin_whole_loops_non_decreasing(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let spin = SpinSettings::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let r_lo = spin_total_rotation(lo, &spin);
            let r_hi = spin_total_rotation(hi, &spin);
            prop_assert!(r_lo > 0.0);
            prop_assert_eq!(r_lo % 360.0, 0.0);
            prop_assert!(r_lo <= r_hi);
        }

        #[test]
        fn prop_charging_and_spinning_exclusive(script in proptest::collection::vec((any::<bool>(), any::<bool>(), 0u8..3), 1..200)) {
            let (mut player, mut body, settings) = setup();
            for (held, grounded, action) in script {
                let mut input = InputSnapshot::default();
                let key = settings.keys.jump_key(player.is_player1_turn());
                input = match (held, action) {
                    (true, 0) => input.press(key),
                    (true, _) => input.hold(key),
                    (false, 1) => input.release(key),
                    _ => input,
                };
                if action == 2 && !held {
                    player.die(&mut body);
                }
                if grounded {
                    step(&mut player, &mut body, &Floor, input, &settings, 0.05);
                } else {
                    step(&mut player, &mut body, &Void, input, &settings, 0.05);
                }
                prop_assert!(!(player.is_charging() && player.is_spinning()));
                if player.is_dead() {
                    prop_assert!(!player.is_charging() && !player.is_spinning());
                }
            }
        }
    }
}
