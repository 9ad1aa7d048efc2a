#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;
use rtic_monotonics::stm32::prelude::*;

mod eth;
mod network;
mod time;

stm32_tim2_monotonic!(Mono, 1_000_000);

#[app(device = embassy_stm32, peripherals = true, dispatchers = [USART1, USART2])]
mod app {
    use super::*;
    use defmt::{error, info, warn};
    use embassy_futures::join::join3;
    use embassy_stm32::exti::ExtiInput;
    use embassy_stm32::gpio::{Level, Output, Pull, Speed};
    use embassy_stm32::peripherals;
    use embassy_stm32::rcc::{Hse, HseMode, LsConfig, LseConfig, LseMode};
    use embassy_stm32::rtc::{Rtc, RtcConfig};
    use embassy_stm32::spi::{self, Spi};
    use embassy_stm32::time::Hertz;
    use rtic_monotonics::fugit::ExtU64;
    use watch_core::time::EuropeanSummerTime;
    use watch_core::{SyncOutcome, WakeReport, Watch, WatchConfig};

    use network::{EthConfig, EthTransport, SocketBuffers};
    use time::{BackupRegisters, RtcClock, UptimeMillis};

    type SpiPeripheral = embassy_stm32::Peri<'static, peripherals::SPI2>;
    type PinPB13 = embassy_stm32::Peri<'static, peripherals::PB13>;
    type PinPB15 = embassy_stm32::Peri<'static, peripherals::PB15>;
    type PinPB14 = embassy_stm32::Peri<'static, peripherals::PB14>;
    type PinPC6 = embassy_stm32::Peri<'static, peripherals::PC6>;
    type PinPC3 = embassy_stm32::Peri<'static, peripherals::PC3>;
    type PinPC2 = embassy_stm32::Peri<'static, peripherals::PC2>;
    type ExtiChannel = embassy_stm32::Peri<'static, peripherals::EXTI2>;
    type DmaTx = embassy_stm32::Peri<'static, peripherals::DMA1_CH4>;
    type DmaRx = embassy_stm32::Peri<'static, peripherals::DMA1_CH3>;

    struct NetworkPeripherals {
        spi: SpiPeripheral,
        sck: PinPB13,
        mosi: PinPB15,
        miso: PinPB14,
        cs: PinPC6,
        reset: PinPC3,
        int: PinPC2,
        exti: ExtiChannel,
        dma_tx: DmaTx,
        dma_rx: DmaRx,
    }

    #[shared]
    struct Shared {}

    #[local]
    struct Local {}

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        info!("Watch starting...");

        // Adafruit Feather STM32F405: 12 MHz HSE, 32.768 kHz LSE (PC14/PC15)
        let mut config = embassy_stm32::Config::default();
        config.rcc.hse = Some(Hse {
            freq: Hertz(12_000_000),
            mode: HseMode::Oscillator,
        });

        // HSE (12 MHz) / PREDIV(6) = 2 MHz (PLL input)
        // 2 MHz * MUL(168) = 336 MHz (VCO)
        // VCO / DIVP(4) = 84 MHz (SYSCLK)
        // VCO / DIVQ(7) = 48 MHz (USB)
        config.rcc.pll_src = embassy_stm32::rcc::PllSource::HSE;
        config.rcc.pll = Some(embassy_stm32::rcc::Pll {
            prediv: embassy_stm32::rcc::PllPreDiv::DIV6,
            mul: embassy_stm32::rcc::PllMul::MUL168,
            divp: Some(embassy_stm32::rcc::PllPDiv::DIV4),
            divq: Some(embassy_stm32::rcc::PllQDiv::DIV7),
            divr: None,
        });
        config.rcc.sys = embassy_stm32::rcc::Sysclk::PLL1_P;
        config.rcc.ahb_pre = embassy_stm32::rcc::AHBPrescaler::DIV1; // 84 MHz
        config.rcc.apb1_pre = embassy_stm32::rcc::APBPrescaler::DIV2; // 42 MHz
        config.rcc.apb2_pre = embassy_stm32::rcc::APBPrescaler::DIV1; // 84 MHz

        config.rcc.ls = LsConfig {
            rtc: embassy_stm32::rcc::RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz(32_768),
                mode: LseMode::Oscillator(embassy_stm32::rcc::LseDrive::MediumHigh),
            }),
        };

        let p = embassy_stm32::init(config);

        // TIM2 on APB1: timer clock = 2*APB1 when prescaler != 1
        let timer_clock_hz = 84_000_000;
        Mono::start(timer_clock_hz);

        let rtc = Rtc::new(p.RTC, RtcConfig::default());
        time::initialize_rtc(rtc);

        let net_periph = NetworkPeripherals {
            spi: p.SPI2,
            sck: p.PB13,
            mosi: p.PB15,
            miso: p.PB14,
            cs: p.PC6,
            reset: p.PC3,
            int: p.PC2,
            exti: p.EXTI2,
            dma_tx: p.DMA1_CH4,
            dma_rx: p.DMA1_CH3,
        };

        watch_task::spawn(net_periph).ok();

        (Shared {}, Local {})
    }

    /// Watch task - owns the network stack and runs the wake cycle
    ///
    /// Stack is !Send and must remain within this task.
    #[task(priority = 1)]
    async fn watch_task(_cx: watch_task::Context, periph: NetworkPeripherals) {
        use embassy_net::{Config, StackResources};
        use static_cell::StaticCell;

        let eth_config = EthConfig::default();

        let mut spi_config = spi::Config::default();
        spi_config.frequency = Hertz(eth_config.spi_hz);

        let spi = Spi::new(
            periph.spi,
            periph.sck,
            periph.mosi,
            periph.miso,
            periph.dma_tx,
            periph.dma_rx,
            spi_config,
        );

        let cs = Output::new(periph.cs, Level::High, Speed::VeryHigh);
        let reset = Output::new(periph.reset, Level::High, Speed::Low);
        let int = ExtiInput::new(periph.int, periph.exti, Pull::Up);

        let eth_periph = eth::EthPeripherals {
            spi,
            cs,
            reset,
            int,
        };

        let (device, w5500_runner) = match eth::init_w5500(eth_periph, eth_config.mac_addr).await {
            Ok(parts) => parts,
            Err(e) => {
                error!("W5500 init failed: {:?}", e);
                return;
            }
        };

        // No IPv4 config until a sync asks for a DHCP lease
        static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
        let (stack, mut net_runner) = embassy_net::new(
            device,
            Config::default(),
            RESOURCES.init(StackResources::new()),
            eth_config.seed,
        );
        info!("Network stack initialized");

        static SOCKET_BUFFERS: StaticCell<SocketBuffers> = StaticCell::new();
        let transport = EthTransport::new(
            stack,
            SOCKET_BUFFERS.init(SocketBuffers::new()),
            eth_config.dhcp_timeout_ms,
        );

        join3(w5500_runner.run(), net_runner.run(), run_watch(transport)).await;
    }

    async fn run_watch(mut transport: EthTransport) -> ! {
        let mut watch = Watch::new(WatchConfig::default(), BackupRegisters, EuropeanSummerTime);
        let mut rtc = RtcClock;
        let mono = UptimeMillis;
        info!("Hand style: {}", watch.hand_style().name);

        loop {
            let report = watch.wake(&mut transport, &mut rtc, &mono).await;
            log_report(&report);

            // Next wake on the following minute boundary
            let second = u64::from(report.local.civil().second);
            Mono::delay((60 - second).secs()).await;
        }
    }

    fn log_report(report: &WakeReport) {
        match report.sync {
            SyncOutcome::Synced(ts) => info!("Clock set to {}.{:03} UTC", ts.unix_secs, ts.millis),
            SyncOutcome::Failed(e) => warn!("Sync failed, keeping RTC time: {}", e),
            SyncOutcome::NotDue => {}
        }
        if !report.clock_valid {
            warn!("RTC unreadable, showing placeholder time");
        }
        let civil = report.local.civil();
        info!(
            "{:02}:{:02} {} hands: hour {} minute {} second {}",
            civil.hour,
            civil.minute,
            report.local.zone,
            report.hands.hour.tip(),
            report.hands.minute.tip(),
            report.hands.second.tip()
        );
    }

    /// RTIC idle task - WFI sleep mode when no tasks active
    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }
}
