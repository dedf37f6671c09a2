//! Angle sweep example.
//!
//! Homes a simulated stage, then sweeps it through a few angles in both step
//! modes, standing in for the step timer interrupt with a loop.
//!
//! The coils are four discrete pins behind `PinCoilPort`, and the limit
//! switches are active-low inputs, so the same wiring works on real hardware
//! with the board crate's pin types.

use std::cell::Cell;
use std::rc::Rc;

use coil_stepper::{
    ActiveLow, BusyFlag, CompareTimer, OutputAction, PinCoilPort, SharedStepper, StepMode,
    StepperControllerBuilder, TimerAction, TimerTicks,
};
use coil_stepper::hal::Channel;

/// Coil pin writing one bit of a shared port register.
struct CoilPin {
    port: Rc<Cell<u8>>,
    bit: u8,
}

impl embedded_hal::digital::ErrorType for CoilPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for CoilPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.port.set(self.port.get() | (1 << self.bit));
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.port.set(self.port.get() & !(1 << self.bit));
        Ok(())
    }
}

/// Switch input that closes after it has been polled a fixed number of times.
struct TravelSwitch {
    polls_left: u32,
}

impl embedded_hal::digital::ErrorType for TravelSwitch {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for TravelSwitch {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        if self.polls_left == 0 {
            return Ok(true);
        }
        self.polls_left -= 1;
        Ok(false)
    }
}

/// Timer with a free-running counter that only moves when told to.
#[derive(Default)]
struct DemoTimer {
    compare: [u16; 8],
    enabled: [bool; 8],
}

impl CompareTimer for DemoTimer {
    fn configure_output_compare(&mut self, channel: Channel) {
        println!("  timer: channel {} -> output compare", channel);
    }

    fn set_output_action(&mut self, channel: Channel, action: OutputAction) {
        println!("  timer: channel {} pin action {:?}", channel, action);
    }

    fn enable_interrupt(&mut self, channel: Channel) {
        self.enabled[channel as usize] = true;
    }

    fn disable_interrupt(&mut self, channel: Channel) {
        self.enabled[channel as usize] = false;
    }

    fn arm_after(&mut self, channel: Channel, ticks: TimerTicks) {
        self.compare[channel as usize] = ticks.0;
    }

    fn advance_compare(&mut self, channel: Channel, ticks: TimerTicks) {
        let compare = &mut self.compare[channel as usize];
        *compare = compare.wrapping_add(ticks.0);
    }

    fn read_compare(&mut self, channel: Channel) -> u16 {
        self.compare[channel as usize]
    }
}

/// Mock delay provider for demonstration.
struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

static BUSY: BusyFlag = BusyFlag::new();

fn main() {
    println!("=== Angle Sweep Example ===\n");

    let port = Rc::new(Cell::new(0u8));
    let pins = [4, 5, 6, 7].map(|bit| CoilPin {
        port: port.clone(),
        bit,
    });

    let mut stepper = StepperControllerBuilder::new()
        .name("sweep")
        .port(PinCoilPort::new(pins))
        .timer(DemoTimer::default())
        .left_switch(ActiveLow::new(TravelSwitch { polls_left: 240 }))
        .right_switch(ActiveLow::new(TravelSwitch { polls_left: 40 }))
        .delay(NoDelay)
        .busy_flag(&BUSY)
        .step_period(TimerTicks(2500))
        .build()
        .expect("Failed to build stepper");

    println!("Homing {}...", stepper.name());
    let report = stepper.init().expect("Homing failed");
    println!(
        "Home after {} steps, travel {} half-steps\n",
        report.home_steps, report.max_steps
    );

    let shared = SharedStepper::new();
    shared.install(stepper);

    for (mode, angles) in [
        (StepMode::Half, [0, 45, 90, 179]),
        (StepMode::Full, [135, 90, 45, 0]),
    ] {
        shared.set_step_mode(mode);
        println!("{:?} stepping:", mode);

        for angle in angles {
            let target = shared.set_angle(angle).expect("Stepper not homed");

            // Stand-in for the step channel's compare interrupt
            let mut ticks = 0u32;
            while BUSY.is_set() {
                match shared.on_timer_interrupt() {
                    Some(Ok(TimerAction::Rearm(_))) | Some(Ok(TimerAction::Disable)) => ticks += 1,
                    Some(Err(e)) => {
                        println!("  step failed: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            println!(
                "  {:>3} deg -> step {:>4} in {:>3} ticks, coils {:04b}",
                angle,
                target.value(),
                ticks,
                port.get() >> 4
            );
        }
        println!();
    }

    if let Some(stepper) = shared.take() {
        println!("Final position: {} half-steps", stepper.position().value());
    }
}
