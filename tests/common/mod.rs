//! Simulated board for integration tests.
//!
//! The port decodes each coil write back into rotor motion, and the limit
//! switches read that rotor position, so homing and moves are checked
//! against what the coils actually did.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use coil_stepper::hal::{Channel, CoilPort, CompareTimer, LimitSwitch, OutputAction};
use coil_stepper::motion::COIL_TABLE;
use coil_stepper::{
    BusyFlag, HomingConfig, StepperController, StepperControllerBuilder, TimerAction, TimerTicks,
};
use embedded_hal_mock::eh1::delay::NoopDelay;

/// Physical side of the rig.
#[derive(Debug)]
pub struct Rig {
    /// Port register.
    pub port: u8,
    /// Data direction register.
    pub ddr: u8,
    /// Rotor position in half-steps.
    pub rotor: i32,
    /// Coil table entry the rotor is aligned with.
    pub rotor_index: usize,
    /// Right switch closes at or below this rotor position.
    pub right_at: i32,
    /// Left switch closes at or above this rotor position.
    pub left_at: i32,
    /// Switch pins put in digital mode.
    pub digital: [bool; 2],
    /// Fail every port write from now on.
    pub port_fault: bool,
    /// Coil writes seen.
    pub writes: u32,
}

/// Step timer registers.
#[derive(Debug, Default)]
pub struct TimerRegs {
    pub counter: u16,
    pub compare: [u16; 8],
    pub output_compare: [bool; 8],
    pub actions: [Option<OutputAction>; 8],
    pub interrupt_enabled: [bool; 8],
    pub compare_reads: u32,
}

pub type Shared<T> = Rc<RefCell<T>>;

pub struct SimPort(pub Shared<Rig>);
pub struct SimTimer(pub Shared<TimerRegs>);
pub struct SimSwitch {
    rig: Shared<Rig>,
    left: bool,
}

#[derive(Debug)]
pub struct PortFault;

impl CoilPort for SimPort {
    type Error = PortFault;

    fn set_data_direction(&mut self, mask: u8) -> Result<(), Self::Error> {
        self.0.borrow_mut().ddr |= mask;
        Ok(())
    }

    fn force_output_bits(&mut self, mask: u8, pattern: u8) -> Result<(), Self::Error> {
        let mut rig = self.0.borrow_mut();
        if rig.port_fault {
            return Err(PortFault);
        }
        rig.port = (rig.port & !mask) | (pattern & mask);
        rig.writes += 1;

        let nibble = (rig.port & mask) >> mask.trailing_zeros();
        let index = COIL_TABLE
            .iter()
            .position(|&p| p == nibble)
            .expect("port holds a coil pattern");
        let delta = match (index + 8 - rig.rotor_index) % 8 {
            0 => 0,
            1 => 1,
            2 => 2,
            6 => -2,
            7 => -1,
            other => panic!("rotor cannot follow a jump of {} entries", other),
        };
        rig.rotor += delta;
        rig.rotor_index = index;
        Ok(())
    }
}

impl CompareTimer for SimTimer {
    fn configure_output_compare(&mut self, channel: Channel) {
        self.0.borrow_mut().output_compare[channel as usize] = true;
    }

    fn set_output_action(&mut self, channel: Channel, action: OutputAction) {
        self.0.borrow_mut().actions[channel as usize] = Some(action);
    }

    fn enable_interrupt(&mut self, channel: Channel) {
        self.0.borrow_mut().interrupt_enabled[channel as usize] = true;
    }

    fn disable_interrupt(&mut self, channel: Channel) {
        self.0.borrow_mut().interrupt_enabled[channel as usize] = false;
    }

    fn arm_after(&mut self, channel: Channel, ticks: TimerTicks) {
        let mut regs = self.0.borrow_mut();
        regs.compare[channel as usize] = regs.counter.wrapping_add(ticks.0);
    }

    fn advance_compare(&mut self, channel: Channel, ticks: TimerTicks) {
        let mut regs = self.0.borrow_mut();
        let compare = &mut regs.compare[channel as usize];
        *compare = compare.wrapping_add(ticks.0);
    }

    fn read_compare(&mut self, channel: Channel) -> u16 {
        let mut regs = self.0.borrow_mut();
        regs.compare_reads += 1;
        regs.compare[channel as usize]
    }
}

impl LimitSwitch for SimSwitch {
    type Error = core::convert::Infallible;

    fn set_digital(&mut self) -> Result<(), Self::Error> {
        self.rig.borrow_mut().digital[self.left as usize] = true;
        Ok(())
    }

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        let rig = self.rig.borrow();
        Ok(if self.left {
            rig.rotor >= rig.left_at
        } else {
            rig.rotor <= rig.right_at
        })
    }
}

pub type SimController<'a> = StepperController<'a, SimPort, SimTimer, SimSwitch, SimSwitch, NoopDelay>;

/// Board handles kept by the test after the controller takes the hardware.
pub struct Board {
    pub rig: Shared<Rig>,
    pub timer: Shared<TimerRegs>,
}

impl Board {
    /// Rotor starting at zero with the switches at the given positions.
    pub fn new(right_at: i32, left_at: i32) -> Self {
        Self {
            rig: Rc::new(RefCell::new(Rig {
                port: 0,
                ddr: 0,
                rotor: 0,
                rotor_index: 0,
                right_at,
                left_at,
                digital: [false; 2],
                port_fault: false,
                writes: 0,
            })),
            timer: Rc::new(RefCell::new(TimerRegs::default())),
        }
    }

    /// Builder with all hardware filled in.
    pub fn builder<'a>(
        &self,
        busy: &'a BusyFlag,
    ) -> StepperControllerBuilder<'a, SimPort, SimTimer, SimSwitch, SimSwitch, NoopDelay> {
        StepperControllerBuilder::new()
            .port(SimPort(self.rig.clone()))
            .timer(SimTimer(self.timer.clone()))
            .left_switch(self.switch(true))
            .right_switch(self.switch(false))
            .delay(NoopDelay::new())
            .busy_flag(busy)
    }

    /// Controller with default configuration and a bounded homing scan.
    pub fn controller<'a>(&self, busy: &'a BusyFlag) -> SimController<'a> {
        self.builder(busy)
            .homing(HomingConfig {
                settle_delay_ms: 5,
                step_limit: Some(10_000),
            })
            .build()
            .expect("complete builder")
    }

    /// Left or right limit switch on this rig.
    pub fn switch(&self, left: bool) -> SimSwitch {
        SimSwitch {
            rig: self.rig.clone(),
            left,
        }
    }

    pub fn rotor(&self) -> i32 {
        self.rig.borrow().rotor
    }

    pub fn step_interrupt_enabled(&self) -> bool {
        self.timer.borrow().interrupt_enabled[4]
    }

    /// Move the free-running counter.
    pub fn set_counter(&self, counter: u16) {
        self.timer.borrow_mut().counter = counter;
    }

    pub fn step_compare(&self) -> u16 {
        self.timer.borrow().compare[4]
    }
}

/// Fire the step interrupt while it is enabled; returns the ticks serviced.
pub fn run_until_idle(board: &Board, controller: &mut SimController<'_>, max_ticks: u32) -> u32 {
    let mut ticks = 0;
    while board.step_interrupt_enabled() {
        assert!(ticks < max_ticks, "motion did not finish in {} ticks", max_ticks);
        controller.on_timer_interrupt().expect("tick");
        ticks += 1;
    }
    ticks
}

/// Fire exactly `n` step interrupts.
pub fn tick(controller: &mut SimController<'_>, n: u32) -> Vec<TimerAction> {
    (0..n)
        .map(|_| controller.on_timer_interrupt().expect("tick"))
        .collect()
}
