//! W5500 bring-up for the sync link
//!
//! The watch opens a single UDP socket, only while an NTP exchange is due.
//! This module resets the chip and hands embassy-net a device for it.

use defmt::info;
use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice as SpiDeviceBus;
use embassy_net_wiznet::chip::W5500;
use embassy_net_wiznet::{Device, Runner};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Output;
use embassy_stm32::mode::Async;
use embassy_stm32::spi::Spi;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;

/// Drives the W5500 on SPI2; joined with the stack runner in the watch task
pub type W5500Runner = Runner<
    'static,
    W5500,
    SpiDeviceBus<'static, CriticalSectionRawMutex, Spi<'static, Async>, Output<'static>>,
    ExtiInput<'static>,
    Output<'static>,
>;

/// Pins and bus wired to the FeatherWing W5500
pub struct EthPeripherals<'a> {
    pub spi: Spi<'a, Async>,
    pub cs: Output<'a>,
    pub reset: Output<'a>,
    pub int: ExtiInput<'a>,
}

/// W5500 did not answer during initialisation
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct EthInitError;

/// Reset the W5500 and create its embassy-net device
///
/// Called once at boot. The link itself is brought up later by
/// `EthTransport::connect`, when a sync is due.
pub async fn init_w5500(
    periph: EthPeripherals<'static>,
    mac_addr: [u8; 6],
) -> Result<(Device<'static>, W5500Runner), EthInitError> {
    let EthPeripherals {
        spi,
        cs,
        mut reset,
        int,
    } = periph;

    info!("Resetting W5500");
    reset.set_low();
    embassy_time::Timer::after_millis(1).await;
    reset.set_high();
    embassy_time::Timer::after_millis(2).await;

    type SpiBusType = embassy_sync::mutex::Mutex<CriticalSectionRawMutex, Spi<'static, Async>>;
    static SPI_BUS: StaticCell<SpiBusType> = StaticCell::new();
    let spi_bus = SPI_BUS.init(embassy_sync::mutex::Mutex::new(spi));
    let spi_device = SpiDeviceBus::new(spi_bus, cs);

    info!(
        "MAC address: {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac_addr[0], mac_addr[1], mac_addr[2], mac_addr[3], mac_addr[4], mac_addr[5]
    );

    // Only one UDP socket is ever open; small queues are enough
    static STATE: StaticCell<embassy_net_wiznet::State<2, 2>> = StaticCell::new();
    let state = STATE.init(embassy_net_wiznet::State::<2, 2>::new());

    let (device, runner) = embassy_net_wiznet::new(mac_addr, state, spi_device, int, reset)
        .await
        .map_err(|_| EthInitError)?;

    info!("W5500 ready, link idle until first sync");

    Ok((device, runner))
}
