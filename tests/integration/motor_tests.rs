//! Motor controller against recording PWM and GPIO mocks.

use crate::mock_hw::{Bench, Fault, HwCall, IN1, IN2, MOTOR, STBY, TestMotor};

use actuator_node::app::Applied;
use actuator_node::app::motor::{Direction, DriverState, MotorController};
use actuator_node::config::MotorConfig;
use actuator_node::error::ActuatorError;

fn ready_motor(bench: &Bench) -> TestMotor {
    let mut motor = bench.motor();
    motor.begin().unwrap();
    motor
}

fn bridge(bench: &Bench) -> (Option<bool>, Option<bool>) {
    (bench.pin_level(IN1), bench.pin_level(IN2))
}

#[test]
fn no_hardware_access_before_begin() {
    let bench = Bench::new();
    let mut motor = bench.motor();

    assert_eq!(motor.set_speed(100), Err(ActuatorError::NotInitialized));
    assert_eq!(motor.stop(), Err(ActuatorError::NotInitialized));
    assert_eq!(motor.enable(), Err(ActuatorError::NotInitialized));
    assert_eq!(motor.disable(), Err(ActuatorError::NotInitialized));

    assert!(bench.calls().is_empty(), "uninitialized motor touched hardware");
    assert_eq!(motor.speed(), 0);
    assert!(!motor.is_ready());
}

#[test]
fn begin_stops_bridge_then_enables_driver() {
    let bench = Bench::new();
    let motor = ready_motor(&bench);

    assert_eq!(
        bench.calls(),
        vec![
            HwCall::Pin { name: IN1, high: false },
            HwCall::Pin { name: IN2, high: false },
            HwCall::Pin { name: STBY, high: true },
            HwCall::Configure { device: MOTOR, frequency_hz: 1000, resolution_bits: 8 },
            HwCall::WriteDuty { device: MOTOR, duty: 0 },
        ]
    );
    assert!(motor.is_ready());
    assert!(motor.is_enabled());
    assert_eq!(motor.direction(), Direction::Stopped);
}

#[test]
fn forward_speed_sets_in1_high() {
    let bench = Bench::new();
    let mut motor = ready_motor(&bench);

    let applied = motor.set_speed(128).unwrap();
    assert!(!applied.clamped);
    assert_eq!(bridge(&bench), (Some(true), Some(false)));
    assert_eq!(bench.last_duty(MOTOR), Some(128));
    assert_eq!(motor.direction(), Direction::Forward);
}

#[test]
fn out_of_range_reverse_is_clamped() {
    let bench = Bench::new();
    let mut motor = ready_motor(&bench);

    let applied = motor.set_speed(-400).unwrap();
    assert_eq!(applied, Applied { value: -255, requested: -400, clamped: true });
    assert_eq!(motor.speed(), -255);
    assert_eq!(motor.direction(), Direction::Reverse);
    assert_eq!(bridge(&bench), (Some(false), Some(true)));
    assert_eq!(bench.last_duty(MOTOR), Some(255));
}

#[test]
fn direction_is_written_before_duty() {
    let bench = Bench::new();
    let mut motor = ready_motor(&bench);
    bench.clear();

    motor.set_speed(-10).unwrap();
    assert_eq!(
        bench.calls(),
        vec![
            HwCall::Pin { name: IN1, high: false },
            HwCall::Pin { name: IN2, high: true },
            HwCall::WriteDuty { device: MOTOR, duty: 10 },
        ]
    );
}

#[test]
fn zero_speed_brakes_low() {
    let bench = Bench::new();
    let mut motor = ready_motor(&bench);
    motor.set_speed(90).unwrap();

    motor.set_speed(0).unwrap();
    assert_eq!(bridge(&bench), (Some(false), Some(false)));
    assert_eq!(bench.last_duty(MOTOR), Some(0));
    assert_eq!(motor.direction(), Direction::Stopped);
}

#[test]
fn stop_from_any_speed() {
    for start in [-255, 0, 255] {
        let bench = Bench::new();
        let mut motor = ready_motor(&bench);
        motor.set_speed(start).unwrap();

        motor.stop().unwrap();
        assert_eq!(motor.speed(), 0, "from {}", start);
        assert_eq!(bridge(&bench), (Some(false), Some(false)), "from {}", start);
        assert_eq!(bench.last_duty(MOTOR), Some(0), "from {}", start);
    }
}

#[test]
fn disable_only_drops_standby() {
    let bench = Bench::new();
    let mut motor = ready_motor(&bench);
    motor.set_speed(200).unwrap();
    bench.clear();

    motor.disable().unwrap();
    assert_eq!(bench.calls(), vec![HwCall::Pin { name: STBY, high: false }]);
    assert_eq!(motor.speed(), 0);
    assert_eq!(motor.driver_state(), DriverState::Standby);
    assert!(!motor.is_enabled());
}

#[test]
fn enable_does_not_restore_speed() {
    let bench = Bench::new();
    let mut motor = ready_motor(&bench);
    motor.set_speed(200).unwrap();
    motor.disable().unwrap();
    bench.clear();

    motor.enable().unwrap();
    assert_eq!(bench.calls(), vec![HwCall::Pin { name: STBY, high: true }]);
    assert_eq!(motor.speed(), 0);
    assert!(motor.is_enabled());
}

#[test]
fn failed_direction_write_keeps_speed() {
    let bench = Bench::new();
    let mut motor = ready_motor(&bench);
    motor.set_speed(50).unwrap();
    bench.fail(Fault::Pin(IN1));
    bench.clear();

    assert_eq!(motor.set_speed(-50), Err(ActuatorError::GpioWriteFailed));
    assert_eq!(motor.speed(), 50);
    assert!(bench.calls().is_empty(), "bridge touched by a rejected command: {:?}", bench.calls());
}

#[test]
fn failed_in2_write_restores_in1() {
    let bench = Bench::new();
    let mut motor = ready_motor(&bench);
    motor.set_speed(50).unwrap();
    bench.fail(Fault::Pin(IN2));

    assert_eq!(motor.set_speed(-50), Err(ActuatorError::GpioWriteFailed));
    assert_eq!(motor.speed(), 50);
    assert_eq!(bridge(&bench), (Some(true), Some(false)));
    assert_eq!(bench.last_duty(MOTOR), Some(50));
}

#[test]
fn failed_duty_write_restores_direction() {
    let bench = Bench::new();
    let mut motor = ready_motor(&bench);
    motor.set_speed(50).unwrap();
    bench.fail(Fault::Write(MOTOR));

    assert_eq!(motor.set_speed(-120), Err(ActuatorError::PwmWriteFailed));
    assert_eq!(motor.speed(), 50);
    assert_eq!(motor.direction(), Direction::Forward);
    assert_eq!(bridge(&bench), (Some(true), Some(false)));

    assert_eq!(motor.stop(), Err(ActuatorError::PwmWriteFailed));
    assert_eq!(motor.speed(), 50);
    assert_eq!(bridge(&bench), (Some(true), Some(false)));
}

#[test]
fn oversized_max_speed_is_capped() {
    let bench = Bench::new();
    let config = MotorConfig { max_speed: 40_000, ..MotorConfig::default() };
    let mut motor = MotorController::new(
        bench.pwm(MOTOR),
        bench.pin(IN1),
        bench.pin(IN2),
        bench.pin(STBY),
        config,
    );
    motor.begin().unwrap();
    assert_eq!(motor.config().max_speed, 255);

    let applied = motor.set_speed(40_000).unwrap();
    assert_eq!(applied, Applied { value: 255, requested: 40_000, clamped: true });
    assert_eq!(motor.direction(), Direction::Forward);
    assert_eq!(bridge(&bench), (Some(true), Some(false)));
    assert_eq!(bench.last_duty(MOTOR), Some(255));
}

#[test]
fn failed_begin_returns_driver_to_standby() {
    let bench = Bench::new();
    bench.fail(Fault::Configure(MOTOR));
    let mut motor = bench.motor();

    assert_eq!(motor.begin(), Err(ActuatorError::PwmConfigFailed));
    assert!(!motor.is_ready());
    assert_eq!(bench.pin_level(STBY), Some(false));
    assert_eq!(motor.set_speed(10), Err(ActuatorError::NotInitialized));
    assert!(bench.duties(MOTOR).is_empty());
}
