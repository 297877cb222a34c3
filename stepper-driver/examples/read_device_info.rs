//! Reads and prints the identity and status registers of a stepper
//! controller board.

use eyre::Report;
use harp_protocol::client::HarpClient;
use harp_protocol::registers::{
    FirmwareVersionHigh, FirmwareVersionLow, HardwareVersionHigh, HardwareVersionLow, WhoAmI,
};
use std::env;
use std::process::exit;
use std::time::Duration;
use stepper_driver::registers::{DeviceState, DigitalInputState, MotorErrorDetection, MotorStopped};
use stepper_driver::WHO_AM_I;

const BAUD_RATE: u32 = 1_000_000;

fn main() -> Result<(), Report> {
    stable_eyre::install()?;
    pretty_env_logger::init();

    let mut args = env::args();
    let binary_name = args
        .next()
        .ok_or_else(|| eyre::eyre!("Binary name missing"))?;
    if args.len() != 1 {
        eprintln!("Usage:");
        eprintln!("  {} <serial port>", binary_name);
        exit(1);
    }
    let port_name = args.next().unwrap();

    let port = serialport::new(&port_name, BAUD_RATE)
        .timeout(Duration::from_millis(100))
        .open()?;
    let mut client = HarpClient::new(port);

    let who_am_i = client.read::<WhoAmI>()?;
    println!("WhoAmI: {}", who_am_i);
    if who_am_i != WHO_AM_I {
        eprintln!("Warning: this is not a stepper controller board");
    }
    println!(
        "Hardware: {}.{}",
        client.read::<HardwareVersionHigh>()?,
        client.read::<HardwareVersionLow>()?
    );
    println!(
        "Firmware: {}.{}",
        client.read::<FirmwareVersionHigh>()?,
        client.read::<FirmwareVersionLow>()?
    );
    println!("Device state: {:?}", client.read::<DeviceState>()?);
    println!("Stopped motors: {:?}", client.read::<MotorStopped>()?);
    println!("Motor errors: {:?}", client.read::<MotorErrorDetection>()?);
    println!("Digital inputs: {:?}", client.read::<DigitalInputState>()?);

    Ok(())
}
