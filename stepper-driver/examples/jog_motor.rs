//! Moves one motor by a relative number of microsteps and waits for the
//! board to report that it has stopped.

use eyre::Report;
use harp_protocol::client::HarpClient;
use log::warn;
use std::env;
use std::process::exit;
use std::thread;
use std::time::Duration;
use stepper_driver::registers::*;
use stepper_driver::types::MotorFlags;
use stepper_driver::StepperEvent;

const BAUD_RATE: u32 = 1_000_000;
const SLEEP_DURATION: Duration = Duration::from_millis(2);

fn main() -> Result<(), Report> {
    stable_eyre::install()?;
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage:");
        eprintln!("  {} <serial port> <motor 0-3> <microsteps>", args[0]);
        exit(1);
    }
    let port_name = &args[1];
    let motor: u8 = args[2].parse()?;
    let microsteps: i32 = args[3].parse()?;
    let motor_flag = MotorFlags::from_bits(1 << motor)
        .ok_or_else(|| eyre::eyre!("Motor must be between 0 and 3"))?;

    let port = serialport::new(port_name, BAUD_RATE)
        .timeout(Duration::from_millis(100))
        .open()?;
    let mut client = HarpClient::new(port);

    client.write::<EnableMotors>(motor_flag)?;
    match motor {
        0 => client.write::<Motor0MoveRelative>(microsteps)?,
        1 => client.write::<Motor1MoveRelative>(microsteps)?,
        2 => client.write::<Motor2MoveRelative>(microsteps)?,
        _ => client.write::<Motor3MoveRelative>(microsteps)?,
    }
    println!("Moving motor {} by {} microsteps", motor, microsteps);

    loop {
        for message in client.poll()? {
            match StepperEvent::from_message(&message) {
                Ok(Some(event)) => {
                    println!("{:?}", event);
                    if let StepperEvent::MotorStopped(stopped) = event.value {
                        if stopped.contains(motor_flag) {
                            return Ok(());
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring unrecognized frame: {}", e),
            }
        }
        thread::sleep(SLEEP_DURATION);
    }
}
