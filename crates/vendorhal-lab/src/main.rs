//! vendorhal lab programs
//!
//! Command line front end for the GPIO and ADS1115 labs and for probing the
//! vendor services without a client application:
//!
//! - `toggle`: blink the LED a fixed number of times
//! - `reverse-gear`: keep the LED in step with the reverse gear property
//! - `adc`: one-shot ADS1115 conversion
//! - `gpio-set` / `gpio-get` / `wheel-angle` / `time` / `date` / `led`:
//!   single service calls

mod labs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};
use vendorhal_config::{ConfigError, VendorHalConfig};
use vendorhal_hal::{FilePropertyStore, SysfsGpio};
use vendorhal_service::{
    ClockService, GpioService, I2cService, LedControlProperty, wheel_position_percent,
};

/// Raised by SIGINT/SIGTERM to end long-running labs
static STOP: AtomicBool = AtomicBool::new(false);

/// GPIO and ADS1115 lab programs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: layered system and user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blink the LED
    Toggle {
        #[arg(long)]
        pin: Option<u32>,
        #[arg(long)]
        iterations: Option<u32>,
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Light the LED while the reverse gear property is "1"
    ReverseGear {
        #[arg(long)]
        pin: Option<u32>,
        #[arg(long)]
        property: Option<String>,
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Read one ADS1115 conversion
    Adc {
        #[arg(long)]
        bus: Option<PathBuf>,
        /// Slave address, decimal or 0x-prefixed hex
        #[arg(long, value_parser = parse_address)]
        address: Option<u16>,
        #[arg(long)]
        channel: Option<u8>,
    },

    /// Drive a pin through the GPIO service
    GpioSet { pin: u32, state: PinState },

    /// Sample a pin through the GPIO service
    GpioGet { pin: u32 },

    /// Read the steering angle through the I2C service
    WheelAngle,

    /// Local time from the clock service
    Time,

    /// Local date from the clock service
    Date,

    /// Write the LED control vehicle property
    Led { value: i32 },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PinState {
    On,
    Off,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    match parsed {
        Ok(addr) if addr <= 0x7F => Ok(addr),
        Ok(addr) => Err(format!("0x{addr:x} is not a 7-bit address")),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => VendorHalConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => VendorHalConfig::load_default().context("Failed to load configuration")?,
    };
    debug!("Configuration: {:?}", config);

    run(cli.command, &config, cli.json)
}

/// Setup logging to stderr so stdout carries only results
fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Setup signal handlers for graceful shutdown
fn setup_signal_handlers() -> Result<()> {
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

    let action = SigAction::new(
        SigHandler::Handler(handle_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );

    unsafe {
        sigaction(Signal::SIGTERM, &action)?;
        sigaction(Signal::SIGINT, &action)?;
    }

    Ok(())
}

/// Signal handler
extern "C" fn handle_signal(sig: i32) {
    if sig == libc::SIGTERM || sig == libc::SIGINT {
        STOP.store(true, Ordering::Relaxed);
    }
}

/// Fold command line overrides into a copy of the configuration and check it
/// the way a configuration file is checked
fn resolve_config(
    command: &Command,
    config: &VendorHalConfig,
) -> Result<VendorHalConfig, ConfigError> {
    let mut config = config.clone();

    match command {
        Command::Toggle {
            pin,
            iterations,
            interval_ms,
        } => {
            if let Some(pin) = pin {
                config.gpio.led_pin = *pin;
            }
            if let Some(iterations) = iterations {
                config.lab.toggle_iterations = *iterations;
            }
            if let Some(interval_ms) = interval_ms {
                config.lab.interval_ms = *interval_ms;
            }
        }
        Command::ReverseGear {
            pin,
            property,
            interval_ms,
        } => {
            if let Some(pin) = pin {
                config.gpio.led_pin = *pin;
            }
            if let Some(property) = property {
                config.properties.reverse_gear = property.clone();
            }
            if let Some(interval_ms) = interval_ms {
                config.lab.interval_ms = *interval_ms;
            }
        }
        Command::Adc {
            bus,
            address,
            channel,
        } => {
            if let Some(bus) = bus {
                config.i2c.bus = bus.clone();
            }
            if let Some(address) = address {
                config.i2c.address = *address;
            }
            if let Some(channel) = channel {
                config.i2c.channel = *channel;
            }
        }
        _ => {}
    }

    config.validate()?;
    Ok(config)
}

fn run(command: Command, config: &VendorHalConfig, json: bool) -> Result<()> {
    let config = resolve_config(&command, config).context("Invalid command line options")?;

    match command {
        Command::Toggle { .. } => {
            let pin = config.gpio.led_pin;
            let interval = Duration::from_millis(config.lab.interval_ms);

            let mut gpio = SysfsGpio::with_root(&config.gpio.sysfs_root);
            let iterations = config.lab.toggle_iterations;
            let written = labs::toggle_led(&mut gpio, pin, iterations, interval)
                .with_context(|| format!("Failed to toggle GPIO {}", pin))?;

            if json {
                let levels: Vec<bool> = written.into_iter().map(bool::from).collect();
                println!("{}", json!({ "pin": pin, "levels": levels }));
            }
        }

        Command::ReverseGear { .. } => {
            let pin = config.gpio.led_pin;
            let property = &config.properties.reverse_gear;
            let interval = Duration::from_millis(config.lab.interval_ms);

            setup_signal_handlers()?;

            let mut gpio = SysfsGpio::with_root(&config.gpio.sysfs_root);
            let properties = FilePropertyStore::new(&config.properties.dir);
            let mut light = labs::ReverseGearLight::new(&mut gpio, &properties, pin, property)
                .with_context(|| format!("Failed to set up GPIO {}", pin))?;

            info!("Following property {} on GPIO {}", property, pin);
            let polls = light.run(interval, &STOP)?;
            info!("Stopped after {} polls", polls);
        }

        Command::Adc { .. } => {
            let bus = config.i2c.bus.display();
            let reading = I2cService::from_config(&config.i2c)?
                .read()
                .with_context(|| format!("Failed to read ADS1115 on {}", bus))?;

            if json {
                println!(
                    "{}",
                    json!({
                        "channel": reading.channel.index(),
                        "raw": reading.raw,
                        "millivolts": reading.millivolts(),
                    })
                );
            } else {
                println!(
                    "ADC Value for channel {}: {}",
                    reading.channel.index(),
                    reading.raw
                );
            }
        }

        Command::GpioSet { pin, state } => {
            let mut service = GpioService::from_config(&config.gpio);
            let ok = service.set_gpio_state(pin, matches!(state, PinState::On));
            print_result(json, "ok", ok, || {
                format!("GPIO {} {}", pin, if ok { "set" } else { "write failed" })
            });
            if !ok {
                anyhow::bail!("Failed to set GPIO {}", pin);
            }
        }

        Command::GpioGet { pin } => {
            let service = GpioService::from_config(&config.gpio);
            let on = service.get_gpio_state(pin);
            print_result(json, "on", on, || {
                format!("GPIO {} is {}", pin, if on { "ON" } else { "OFF" })
            });
        }

        Command::WheelAngle => {
            let service = I2cService::from_config(&config.i2c)?;
            let raw = service.read()?.raw;
            let percent = wheel_position_percent(raw);
            if json {
                println!("{}", json!({ "raw": raw, "percent": percent }));
            } else {
                println!("Wheel angle: {} (mapped value: {})", raw, percent);
            }
        }

        Command::Time => {
            let time = ClockService::new().get_time();
            print_result(json, "time", time.as_str(), || time.clone());
        }

        Command::Date => {
            let date = ClockService::new().get_date();
            print_result(json, "date", date.as_str(), || date.clone());
        }

        Command::Led { value } => {
            let service = GpioService::from_config(&config.gpio);
            let mut led = LedControlProperty::new(service, config.gpio.led_pin);
            led.set(value)?;
            let state = led.get();
            print_result(json, "value", state, || {
                format!("LED on GPIO {} is {}", led.pin(), state)
            });
        }
    }

    Ok(())
}

/// Print a single named result, as JSON or as a human line
fn print_result(
    json: bool,
    key: &str,
    value: impl Into<serde_json::Value>,
    human: impl FnOnce() -> String,
) {
    if json {
        let mut object = serde_json::Map::new();
        object.insert(key.to_string(), value.into());
        println!("{}", serde_json::Value::Object(object));
    } else {
        println!("{}", human());
    }
}
