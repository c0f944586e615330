//! Servo controller against a recording PWM channel.

use crate::mock_hw::{Bench, Fault, HwCall, MockDelay, SERVO};

use actuator_node::app::Applied;
use actuator_node::error::ActuatorError;

const DUTY_0_DEG: u32 = 3276;
const DUTY_90_DEG: u32 = 4915;
const DUTY_180_DEG: u32 = 6553;

fn ready_servo(bench: &Bench) -> crate::mock_hw::TestServo {
    let mut servo = bench.servo();
    servo.begin(&mut MockDelay::default()).unwrap();
    servo
}

#[test]
fn no_hardware_access_before_begin() {
    let bench = Bench::new();
    let mut servo = bench.servo();

    assert_eq!(servo.set_position(45), Err(ActuatorError::NotInitialized));
    assert_eq!(servo.center(), Err(ActuatorError::NotInitialized));
    assert_eq!(servo.detach(), Err(ActuatorError::NotInitialized));
    assert_eq!(servo.attach(), Err(ActuatorError::NotInitialized));

    assert!(bench.calls().is_empty(), "uninitialized servo touched hardware");
    assert_eq!(servo.position(), 90);
    assert!(!servo.is_ready());
}

#[test]
fn begin_configures_channel_and_centers() {
    let bench = Bench::new();
    let mut servo = bench.servo();
    let mut delay = MockDelay::default();

    servo.begin(&mut delay).unwrap();

    assert_eq!(
        bench.calls(),
        vec![
            HwCall::Configure { device: SERVO, frequency_hz: 50, resolution_bits: 16 },
            HwCall::WriteDuty { device: SERVO, duty: DUTY_90_DEG },
        ]
    );
    assert_eq!(delay.delays_ms, vec![50, 500]);
    assert!(servo.is_ready());
    assert!(servo.is_attached());
    assert_eq!(servo.position(), 90);
}

#[test]
fn out_of_range_angles_are_clamped() {
    let bench = Bench::new();
    let mut servo = ready_servo(&bench);

    let applied = servo.set_position(200).unwrap();
    assert_eq!(applied, Applied { value: 180, requested: 200, clamped: true });
    assert_eq!(servo.position(), 180);
    assert_eq!(bench.last_duty(SERVO), Some(DUTY_180_DEG));

    let applied = servo.set_position(-30).unwrap();
    assert_eq!(applied.value, 0);
    assert!(applied.clamped);
    assert_eq!(bench.last_duty(SERVO), Some(DUTY_0_DEG));
}

#[test]
fn in_range_angle_is_not_clamped() {
    let bench = Bench::new();
    let mut servo = ready_servo(&bench);

    let applied = servo.set_position(1).unwrap();
    assert!(!applied.clamped);
    // 1005 us at 16-bit / 20 ms
    assert_eq!(bench.last_duty(SERVO), Some(3293));
}

#[test]
fn center_is_idempotent() {
    let bench = Bench::new();
    let mut servo = ready_servo(&bench);
    servo.set_position(33).unwrap();
    bench.clear();

    servo.center().unwrap();
    servo.center().unwrap();

    assert_eq!(bench.duties(SERVO), vec![DUTY_90_DEG, DUTY_90_DEG]);
    assert_eq!(servo.position(), 90);
}

#[test]
fn failed_write_keeps_previous_angle() {
    let bench = Bench::new();
    let mut servo = ready_servo(&bench);
    servo.set_position(45).unwrap();

    bench.fail(Fault::Write(SERVO));
    assert_eq!(servo.set_position(120), Err(ActuatorError::PwmWriteFailed));
    assert_eq!(servo.position(), 45);
}

#[test]
fn detach_and_attach_keep_angle() {
    let bench = Bench::new();
    let mut servo = ready_servo(&bench);
    servo.set_position(45).unwrap();

    servo.detach().unwrap();
    assert!(!servo.is_attached());
    assert_eq!(servo.position(), 45);

    servo.attach().unwrap();
    assert!(servo.is_attached());
    assert_eq!(servo.position(), 45);
}

#[test]
fn attach_does_not_reissue_duty() {
    let bench = Bench::new();
    let mut servo = ready_servo(&bench);
    servo.detach().unwrap();

    // Latched while detached; attach resumes it without another write.
    servo.set_position(120).unwrap();
    assert_eq!(servo.position(), 120);
    bench.clear();

    servo.attach().unwrap();
    assert_eq!(bench.calls(), vec![HwCall::Attach { device: SERVO }]);
}

#[test]
fn repeated_detach_is_a_no_op() {
    let bench = Bench::new();
    let mut servo = ready_servo(&bench);
    bench.clear();

    servo.detach().unwrap();
    servo.detach().unwrap();
    servo.attach().unwrap();
    servo.attach().unwrap();

    assert_eq!(
        bench.calls(),
        vec![HwCall::Detach { device: SERVO }, HwCall::Attach { device: SERVO }]
    );
}

#[test]
fn failed_begin_leaves_servo_uninitialized() {
    let bench = Bench::new();
    bench.fail(Fault::Configure(SERVO));
    let mut servo = bench.servo();

    assert_eq!(
        servo.begin(&mut MockDelay::default()),
        Err(ActuatorError::PwmConfigFailed)
    );
    assert!(!servo.is_ready());
    assert_eq!(servo.set_position(10), Err(ActuatorError::NotInitialized));
    assert!(bench.duties(SERVO).is_empty());

    bench.heal(Fault::Configure(SERVO));
    servo.begin(&mut MockDelay::default()).unwrap();
    assert!(servo.is_ready());
}

#[test]
fn failed_center_write_leaves_servo_uninitialized() {
    let bench = Bench::new();
    bench.fail(Fault::Write(SERVO));
    let mut servo = bench.servo();

    assert_eq!(
        servo.begin(&mut MockDelay::default()),
        Err(ActuatorError::PwmWriteFailed)
    );
    assert!(!servo.is_ready());
}

#[test]
fn begin_again_recenters() {
    let bench = Bench::new();
    let mut servo = ready_servo(&bench);
    servo.set_position(30).unwrap();
    servo.detach().unwrap();

    servo.begin(&mut MockDelay::default()).unwrap();
    assert_eq!(servo.position(), 90);
    assert!(servo.is_attached());
    assert_eq!(bench.last_duty(SERVO), Some(DUTY_90_DEG));
}
