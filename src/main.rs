//! XM122 beacon firmware.
//!
//! Broadcasts two 16-bit values in the manufacturer-specific data of a
//! non-connectable advertisement. All beacon operations go through one
//! task that owns the controller; everything else sends it commands.

#![no_std]
#![no_main]

mod fault;
mod radio;

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::Priority;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_time::{Duration, Instant, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use xm122_beacon::beacon::adv_data::ADV_DATA_MAX_LEN;
use xm122_beacon::config::{
    COMMAND_CHANNEL_DEPTH, DEFAULT_ADV_INTERVAL_MS, DEMO_UPDATE_PERIOD_SECS,
    STATUS_LED_ACTIVE_LOW,
};
use xm122_beacon::dfu_key;
use xm122_beacon::indicator::LedIndicator;
use xm122_beacon::{BeaconCommand, BeaconConfig, BeaconController};

use fault::ResetOnFault;
use radio::SoftdeviceRadio;

type Beacon = BeaconController<SoftdeviceRadio, LedIndicator<Output<'static>>, ResetOnFault>;

type CommandReceiver =
    Receiver<'static, CriticalSectionRawMutex, BeaconCommand, COMMAND_CHANNEL_DEPTH>;
type CommandSender = Sender<'static, CriticalSectionRawMutex, BeaconCommand, COMMAND_CHANNEL_DEPTH>;

static COMMANDS: Channel<CriticalSectionRawMutex, BeaconCommand, COMMAND_CHANNEL_DEPTH> =
    Channel::new();
static ADV_BUFFER: StaticCell<[u8; ADV_DATA_MAX_LEN]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("xm122-beacon starting, DFU key {=u32:#x}", dfu_key::key_id());

    // The SoftDevice reserves interrupt priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);

    let led = LedIndicator::new(
        Output::new(p.P0_13, Level::High, OutputDrive::Standard),
        STATUS_LED_ACTIVE_LOW,
    );
    let radio = SoftdeviceRadio::new(spawner, ADV_BUFFER.init([0; ADV_DATA_MAX_LEN]));
    let beacon = BeaconController::new(radio, led, ResetOnFault, BeaconConfig::default());

    unwrap!(spawner.spawn(beacon_task(beacon, COMMANDS.receiver())));
    unwrap!(spawner.spawn(demo_task(COMMANDS.sender())));
}

/// Owns the controller; applies commands in arrival order.
#[embassy_executor::task]
async fn beacon_task(mut beacon: Beacon, commands: CommandReceiver) -> ! {
    if let Err(e) = beacon.init() {
        warn!("Beacon: init failed: {}", e);
    }

    loop {
        let cmd = commands.receive().await;
        if let Err(e) = beacon.handle(cmd) {
            warn!("Beacon: {} failed: {}", cmd, e);
        }
    }
}

/// Publishes a sequence counter and the uptime, standing in for sensor
/// readings.
#[embassy_executor::task]
async fn demo_task(commands: CommandSender) -> ! {
    let mut ticker = Ticker::every(Duration::from_secs(DEMO_UPDATE_PERIOD_SECS));
    let mut sequence: u16 = 0;

    loop {
        // Deliberately truncated: wraps every 65536 s (~18 h).
        let uptime_secs = Instant::now().as_secs() as u16;
        commands
            .send(BeaconCommand::Update {
                interval_ms: DEFAULT_ADV_INTERVAL_MS,
                data1: Some(sequence),
                data2: Some(uptime_secs),
            })
            .await;
        sequence = sequence.wrapping_add(1);
        ticker.next().await;
    }
}
