#![no_std]
#![no_main]

mod peripherals;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use core::time::Duration as CoreDuration;

use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pin, Pull},
    peripherals::{P0_13, P0_15, SPI2},
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Delay, Duration, Instant, Ticker, Timer};

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    backlight::{Backlight, DEFAULT_BRIGHTNESS},
    button::Button,
    config::SystemConfig,
    display::Display,
};
use pinetime_watchface::{
    system::{
        config::{WatchConfig, BUILD_EPOCH},
        tick::{TickTimerService, TimeUnits},
        time::{Clock, ManagedClock, TimeManager, TimeReference},
    },
    ui::{DefaultWatchface, WatchFace, LCD_H, LCD_W},
};

// Others
use chrono::Timelike;
use embedded_graphics::geometry::Size;

/// 240x240 big endian RGB565
static BACKGROUND: &[u8] = include_bytes!("../assets/background.raw");

type SystemClock = ManagedClock<fn() -> CoreDuration>;

// Communication channels
static TICK: Signal<ThreadModeRawMutex, TimeUnits> = Signal::new();
static TOGGLE_SCREEN: Signal<ThreadModeRawMutex, ()> = Signal::new();

fn uptime() -> CoreDuration {
    CoreDuration::from_micros(Instant::now().as_micros())
}

/// Wall clock counting from the build time
fn system_clock() -> SystemClock {
    let reference = unwrap!(TimeReference::from_timestamp(BUILD_EPOCH, uptime()));
    ManagedClock::new(
        TimeManager::init(reference),
        WatchConfig::from_build(),
        uptime as fn() -> CoreDuration,
    )
}

/// Sample the clock every second and signal minute changes.
#[embassy_executor::task(pool_size = 1)]
async fn update_time(clock: SystemClock) {
    let mut ticks = TickTimerService::subscribe(TimeUnits::MINUTE);
    let mut tick = Ticker::every(Duration::from_secs(1));
    loop {
        let now = clock.now();
        if let Some(units) = ticks.poll(now) {
            defmt::info!("Minute tick: {:02}:{:02}", now.hour(), now.minute());
            TICK.signal(units);
        }

        // Re-schedule the timer interrupt in 1s
        tick.next().await;
    }
}

/// Owns the display; shows, hides and redraws the watchface.
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(
    mut display: Display<'static, SPI2>,
    mut backlight: Backlight<'static>,
    mut face: DefaultWatchface<'static, SystemClock>,
) {
    let mut tick = Ticker::every(Duration::from_millis(100));
    let mut brightness = backlight.get_brightness();

    face.on_show();
    loop {
        let mut redraw = false;

        if TOGGLE_SCREEN.signaled() {
            TOGGLE_SCREEN.wait().await;
            if face.is_visible() {
                face.on_hide();
                brightness = backlight.get_brightness();
                backlight.off();
                if display.clear().is_err() {
                    defmt::warn!("Failed to clear display");
                }
            } else {
                face.on_show();
                // Don't wait for the next minute to replace the placeholder
                face.on_tick(TimeUnits::all());
                unwrap!(backlight.set(brightness));
                redraw = true;
            }
        }

        if TICK.signaled() {
            let units = TICK.wait().await;
            face.on_tick(units);
            redraw |= face.is_visible();
        }

        if redraw && display.render(&face).is_err() {
            defmt::warn!("Failed to draw watchface");
        }

        // Re-schedule the timer interrupt in 100ms
        tick.next().await;
    }
}

/// Polls the button state every 10ms
#[embassy_executor::task(pool_size = 1)]
async fn poll_button(mut button: Button<'static>) {
    loop {
        if button.pressed().await {
            defmt::info!("Button pressed");
            TOGGLE_SCREEN.signal(());
        }

        // Re-schedule the timer interrupt in 10ms
        Timer::after(Duration::from_millis(10)).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    // Initialize Backlight
    let backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_22.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_23.degrade(), Level::High, OutputDrive::Standard),
        DEFAULT_BRIGHTNESS,
    ));

    // Initialize Button
    let button = Button::init(
        Input::<P0_13>::new(p.P0_13, Pull::None),
        Output::<P0_15>::new(p.P0_15, Level::Low, OutputDrive::Standard),
    );

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = Display::init(
        spim,
        Output::new(p.P0_25.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_18.degrade(), Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26.degrade(), Level::Low, OutputDrive::Standard),
        &mut Delay,
    );

    let clock = system_clock();
    let face = DefaultWatchface::new(clock, Size::new(LCD_W, LCD_H), BACKGROUND);

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(poll_button(button)));
    unwrap!(spawner.spawn(update_lcd(display, backlight, face)));
    unwrap!(spawner.spawn(update_time(clock)));
}
