//! Application service: the controller that ties everything together.
//!
//! [`Controller`] owns the protocol state machine, both IR drivers, the
//! proximity detector, the two indicators and the command transport.
//! Each [`poll`](Controller::poll) is one main-loop iteration: consume at
//! most one command byte, then take one proximity sample.
//!
//! ```text
//!  Transport ──byte──▶ ┌──────────────────────────┐ ──reply──▶ Transport
//!                      │        Controller        │
//!  IR in ────────────▶ │ protocol · IR · detector │ ──────────▶ IR out, LEDs
//!  Range ADC ────────▶ └──────────────────────────┘ ──event──▶ EventSink
//! ```
//!
//! The state machine decides, the controller executes.  A hardware error
//! while reading or executing a command byte forces the protocol back to
//! Idle before it propagates.  Sensor-side errors are only reported: the
//! proximity path never touches protocol state, so a half-filled frame
//! survives them.

use embedded_hal::digital::{InputPin, OutputPin};
use log::{info, warn};

use crate::config::FirmwareConfig;
use crate::drivers::indicator::Indicator;
use crate::error::{Error, Result, TransportError};
use crate::fsm::{Action, CommandProtocol, ProtocolState};
use crate::ir::receiver::IrReceiver;
use crate::ir::timing::BusyDelay;
use crate::ir::transmitter::{CarrierTiming, IrTransmitter};
use crate::sensors::proximity::ProximityDetector;
use crate::transport::Transport;

use super::commands::reply;
use super::events::ControllerEvent;
use super::ports::{AnalogInput, Clock, EventSink};

/// Peripherals handed to the controller at construction.
pub struct Board<O, I, A, L, C> {
    /// IR LED (carrier output).
    pub ir_out: O,
    /// IR demodulator output.
    pub ir_in: I,
    /// Analog range sensor.
    pub range: A,
    pub generic_led: L,
    pub active_led: L,
    pub clock: C,
}

pub struct Controller<O, I, A, L, C: Clock, T> {
    protocol: CommandProtocol,
    transmitter: IrTransmitter<O>,
    receiver: IrReceiver<I>,
    detector: ProximityDetector<A>,
    generic_led: Indicator<L>,
    active_led: Indicator<L>,
    clock: C,
    delay: BusyDelay<C>,
    transport: T,
    config: FirmwareConfig,
}

impl<O, I, A, L, C, T> Controller<O, I, A, L, C, T>
where
    O: OutputPin,
    I: InputPin,
    A: AnalogInput,
    L: OutputPin,
    C: Clock + Clone,
    T: Transport,
{
    /// Validate `config`, take ownership of the board and drive every
    /// output to its idle level.
    pub fn new(board: Board<O, I, A, L, C>, transport: T, config: FirmwareConfig) -> Result<Self> {
        config.validate()?;

        let Board {
            ir_out,
            ir_in,
            range,
            generic_led,
            active_led,
            clock,
        } = board;

        let mut controller = Self {
            protocol: CommandProtocol::new(config.protocol_variant),
            transmitter: IrTransmitter::new(ir_out, CarrierTiming::from_config(&config)),
            receiver: IrReceiver::new(ir_in, config.slot_us),
            detector: ProximityDetector::new(range, config.presence_threshold_raw, config.dwell_us()),
            generic_led: Indicator::new(generic_led),
            active_led: Indicator::new(active_led),
            delay: BusyDelay::new(clock.clone()),
            clock,
            transport,
            config,
        };

        controller.transmitter.idle()?;
        controller.generic_led.off()?;
        controller.active_led.off()?;
        Ok(controller)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        info!(
            "Controller started ({:?} protocol, {}us slots)",
            self.config.protocol_variant, self.config.slot_us
        );
        sink.emit(&ControllerEvent::Started);
    }

    // ── Per-iteration work ────────────────────────────────────

    /// One main-loop iteration.  Both halves always run; the first error
    /// is returned.
    pub fn poll(&mut self, sink: &mut impl EventSink) -> Result<()> {
        let command = match self.transport.read_byte() {
            Ok(Some(byte)) => self.consume(byte, sink),
            Ok(None) => Ok(()),
            Err(e) => Err(self.fault(e.into(), sink)),
        };
        let sense = self.sample_sensor(sink);
        command.and(sense)
    }

    /// Feed one command byte through the protocol and carry out the
    /// resulting action.
    pub fn consume(&mut self, byte: u8, sink: &mut impl EventSink) -> Result<()> {
        let before = self.protocol.state();
        let action = self.protocol.step(byte);
        let after = self.protocol.state();

        if !before.same_kind(&after) {
            sink.emit(&ControllerEvent::StateChanged {
                from: before,
                to: after,
            });
        }

        self.execute(action, byte, before, sink)
            .map_err(|e| self.fault(e, sink))
    }

    fn execute(
        &mut self,
        action: Action,
        byte: u8,
        before: ProtocolState,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match action {
            Action::Identify => {
                self.generic_led
                    .blink(1, self.config.identify_blink_ms, &mut self.delay)?;
                self.reply(reply::LED_OK)?;
                sink.emit(&ControllerEvent::Identified);
            }
            Action::Ack => self.reply(reply::OK)?,
            Action::OpenFrame { channel, length } => {
                self.transmitter.reset();
                self.reply(reply::OK)?;
                sink.emit(&ControllerEvent::FrameOpened { channel, length });
            }
            Action::Append(b) => {
                self.transmitter.push(b);
            }
            Action::AppendAndTransmit { byte, length } => {
                self.transmitter.push(byte);
                let elapsed_us = self.transmitter.transmit(length, &self.clock)?;
                self.completion_blink()?;
                self.reply(reply::DATA_COMPLETION)?;
                self.flush()?;
                sink.emit(&ControllerEvent::FrameTransmitted { length, elapsed_us });
            }
            Action::Receive { length } => self.receive(length, sink)?,
            Action::ArmSensor => {
                self.detector.start();
                sink.emit(&ControllerEvent::SensorArmed);
            }
            Action::SetActivity(on) => {
                self.active_led.set(on)?;
                sink.emit(&ControllerEvent::ActivityIndicator(on));
            }
            Action::Reject => {
                self.reply(reply::PROTOCOL_ERROR)?;
                sink.emit(&ControllerEvent::ProtocolError {
                    byte,
                    state: before,
                });
            }
        }
        Ok(())
    }

    fn receive(&mut self, length: usize, sink: &mut impl EventSink) -> Result<()> {
        self.transport
            .write_all(&[reply::OK, reply::RECEIVE_DATA])?;
        sink.emit(&ControllerEvent::ReceiveStarted { length });

        let transport = &mut self.transport;
        let elapsed_us = self.receiver.receive(length, &self.clock, |b| {
            transport.write_all(&[b]).map_err(Error::from)
        })?;

        self.completion_blink()?;
        self.reply(reply::DATA_COMPLETION)?;
        self.flush()?;
        sink.emit(&ControllerEvent::FrameReceived { length, elapsed_us });
        Ok(())
    }

    fn sample_sensor(&mut self, sink: &mut impl EventSink) -> Result<()> {
        let detection = match self.detector.sample(&self.clock) {
            Ok(d) => d,
            Err(e) => return Err(self.report(e, sink)),
        };
        if let Some(d) = detection {
            self.reply(reply::SENSOR_DETECTED)
                .and_then(|()| self.flush())
                .map_err(|e| self.report(e, sink))?;
            sink.emit(&ControllerEvent::ProximityDetected {
                dwell_us: d.dwell_us,
            });
        }
        Ok(())
    }

    fn completion_blink(&mut self) -> Result<()> {
        self.generic_led.blink(
            self.config.completion_blinks,
            self.config.completion_blink_ms,
            &mut self.delay,
        )
    }

    fn reply(&mut self, byte: u8) -> Result<()> {
        self.transport.write_all(&[byte])?;
        Ok(())
    }

    /// Push out everything written so far.  Called once a reply sequence
    /// is complete (`E`, `P`).
    fn flush(&mut self) -> Result<()> {
        self.transport.flush().map_err(|e| {
            warn!("transport flush failed: {:?}", e);
            TransportError::WriteFailed
        })?;
        Ok(())
    }

    /// Put the protocol back in Idle and report the fault.  Returns the
    /// error so callers can propagate it.
    fn fault(&mut self, error: Error, sink: &mut impl EventSink) -> Error {
        warn!(
            "fault in {}: {}, protocol reset to Idle",
            self.protocol.state().name(),
            error
        );
        self.protocol.reset();
        sink.emit(&ControllerEvent::Fault(error));
        error
    }

    /// Report a fault that leaves the protocol where it is.
    fn report(&mut self, error: Error, sink: &mut impl EventSink) -> Error {
        warn!("sensor fault: {}", error);
        sink.emit(&ControllerEvent::Fault(error));
        error
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn protocol_state(&self) -> ProtocolState {
        self.protocol.state()
    }

    pub fn sensor_armed(&self) -> bool {
        self.detector.is_enabled()
    }

    pub fn activity_on(&self) -> bool {
        self.active_led.is_on()
    }

    /// Bytes currently held in the transmit frame buffer.
    pub fn buffered(&self) -> &[u8] {
        self.transmitter.frame()
    }

    pub fn config(&self) -> &FirmwareConfig {
        &self.config
    }
}
