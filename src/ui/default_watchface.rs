//! Default watchface
//!
//! Background image with the time and the date stacked in the top left
//! corner, refreshed on every tick.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    image::ImageRawBE,
    mono_font::{iso_8859_1::FONT_10X20, MonoTextStyle},
    pixelcolor::RgbColor,
    primitives::Rectangle,
};
use profont::PROFONT_24_POINT;

use super::{
    format::{DateText, TimeText},
    layer::{BitmapLayer, TextLayer},
    ColorMode, WatchFace,
};
use crate::system::{tick::TimeUnits, time::Clock};

/// Time text capacity including the terminator
pub const TIME_BUF_LEN: usize = 8;
/// Date text capacity including the terminator
pub const DATE_BUF_LEN: usize = 16;

const TIME_LAYER_HEIGHT: u32 = 40;
const DATE_LAYER_OFFSET: Point = Point::new(5, 40);
const DATE_LAYER_HEIGHT: u32 = 30;

/// Shown until the first tick arrives
const TIME_PLACEHOLDER: &str = "00:00";

/// Layers of the only window; they exist while the watchface is shown
struct MainWindow<'a> {
    background: BitmapLayer<'a>,
    time_layer: TextLayer<'static, TIME_BUF_LEN>,
    date_layer: TextLayer<'static, DATE_BUF_LEN>,
}

impl<'a> MainWindow<'a> {
    fn load(screen: Size, background: &'a [u8]) -> Self {
        let background = BitmapLayer::new(
            Rectangle::new(Point::zero(), screen),
            ImageRawBE::new(background, screen.width),
        );

        let mut time_layer = TextLayer::new(
            Rectangle::new(Point::zero(), Size::new(screen.width, TIME_LAYER_HEIGHT)),
            MonoTextStyle::new(&PROFONT_24_POINT, ColorMode::WHITE),
        );
        // Cannot overflow, the placeholder is shorter than the buffer
        time_layer.set_text(TIME_PLACEHOLDER).ok();

        let date_layer = TextLayer::new(
            Rectangle::new(DATE_LAYER_OFFSET, Size::new(screen.width, DATE_LAYER_HEIGHT)),
            MonoTextStyle::new(&FONT_10X20, ColorMode::WHITE),
        );

        Self {
            background,
            time_layer,
            date_layer,
        }
    }

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        self.background.draw(target)?;
        self.time_layer.draw(target)?;
        self.date_layer.draw(target)
    }
}

/// Basic default watchface
pub struct DefaultWatchface<'a, C> {
    /// Wall-clock time and hour format
    clock: C,
    /// Screen size
    screen: Size,
    /// Big endian RGB565 pixels covering the whole screen
    background: &'a [u8],
    /// `None` while hidden
    window: Option<MainWindow<'a>>,
}

impl<'a, C> DefaultWatchface<'a, C>
where
    C: Clock,
{
    /// Create new (hidden) watchface
    pub fn new(clock: C, screen: Size, background: &'a [u8]) -> Self {
        Self {
            clock,
            screen,
            background,
            window: None,
        }
    }

    /// Render the current time and date into the text layers.
    ///
    /// Both texts come from a single clock sample.
    pub fn update_time(&mut self) {
        let Some(window) = self.window.as_mut() else {
            debug!("Watchface hidden, skipping update");
            return;
        };

        let now = self.clock.now();
        let style = self.clock.clock_style();

        if let Err(e) = window.time_layer.set_text(TimeText::new(&now, style)) {
            warn!("Time text not updated: {}", e);
        }
        if let Err(e) = window.date_layer.set_text(DateText::new(&now)) {
            warn!("Date text not updated: {}", e);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.window.is_some()
    }

    /// Currently displayed time, `None` while hidden
    pub fn time_text(&self) -> Option<&str> {
        self.window.as_ref().map(|w| w.time_layer.text())
    }

    /// Currently displayed date, `None` while hidden
    pub fn date_text(&self) -> Option<&str> {
        self.window.as_ref().map(|w| w.date_layer.text())
    }

    /// NUL terminated time and date buffers, `None` while hidden
    pub fn buffers(&self) -> Option<(&[u8], &[u8])> {
        self.window.as_ref().map(|w| {
            (
                w.time_layer.buffer().as_bytes_with_nul(),
                w.date_layer.buffer().as_bytes_with_nul(),
            )
        })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

impl<'a, C> WatchFace for DefaultWatchface<'a, C>
where
    C: Clock,
{
    fn on_show(&mut self) {
        if self.window.is_some() {
            return;
        }
        info!("Showing watchface");
        self.window = Some(MainWindow::load(self.screen, self.background));
    }

    fn on_tick(&mut self, _units_changed: TimeUnits) {
        self.update_time();
    }

    fn on_hide(&mut self) {
        if self.window.take().is_some() {
            info!("Hiding watchface");
        }
    }

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        match &self.window {
            Some(window) => window.draw(target),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::time::Duration;

    use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta};
    use embedded_graphics::{mock_display::MockDisplay, prelude::*};
    use proptest::prelude::*;

    use super::*;
    use crate::system::{
        config::{ClockStyle, WatchConfig},
        tick::TickTimerService,
        time::{ManagedClock, TimeManager, TimeReference},
    };

    const SCREEN: Size = Size::new(64, 64);
    static BLACK_BACKGROUND: [u8; 64 * 64 * 2] = [0; 64 * 64 * 2];

    /// Clock returning a settable time, counting how often it is read
    struct FakeClock {
        now: Cell<NaiveDateTime>,
        style: Cell<ClockStyle>,
        reads: Cell<usize>,
    }

    impl FakeClock {
        fn new(now: NaiveDateTime, style: ClockStyle) -> Self {
            Self {
                now: Cell::new(now),
                style: Cell::new(style),
                reads: Cell::new(0),
            }
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> NaiveDateTime {
            self.reads.set(self.reads.get() + 1);
            self.now.get()
        }

        fn clock_style(&self) -> ClockStyle {
            self.style.get()
        }
    }

    /// Clock that moves forward by one second on every read
    struct AdvancingClock(Cell<NaiveDateTime>);

    impl Clock for AdvancingClock {
        fn now(&self) -> NaiveDateTime {
            let now = self.0.get();
            self.0.set(now + TimeDelta::seconds(1));
            now
        }

        fn clock_style(&self) -> ClockStyle {
            ClockStyle::TwentyFourHour
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn shown<C: Clock>(clock: C) -> DefaultWatchface<'static, C> {
        let mut face = DefaultWatchface::new(clock, SCREEN, &BLACK_BACKGROUND);
        face.on_show();
        face
    }

    #[test]
    fn starts_hidden() {
        let clock = FakeClock::new(at(2024, 3, 2, 9, 30), ClockStyle::TwentyFourHour);
        let face = DefaultWatchface::new(&clock, SCREEN, &BLACK_BACKGROUND);
        assert!(!face.is_visible());
        assert_eq!(face.time_text(), None);
        assert_eq!(face.date_text(), None);
    }

    #[test]
    fn show_creates_placeholder_text() {
        let clock = FakeClock::new(at(2024, 3, 2, 9, 30), ClockStyle::TwentyFourHour);
        let face = shown(&clock);
        assert!(face.is_visible());
        assert_eq!(face.time_text(), Some("00:00"));
        assert_eq!(face.date_text(), Some(""));
        assert_eq!(clock.reads.get(), 0);
    }

    #[test]
    fn tick_at_morning_in_24h_mode() {
        let clock = FakeClock::new(at(2024, 3, 2, 9, 30), ClockStyle::TwentyFourHour);
        let mut face = shown(&clock);
        face.on_tick(TimeUnits::MINUTE);
        assert_eq!(face.time_text(), Some("09:30"));
        assert_eq!(face.date_text(), Some("Mar 02"));
    }

    #[test]
    fn tick_at_evening_in_12h_mode() {
        let clock = FakeClock::new(at(2024, 3, 2, 21, 30), ClockStyle::TwelveHour);
        let mut face = shown(&clock);
        face.on_tick(TimeUnits::MINUTE);
        assert_eq!(face.time_text(), Some(" 9:30"));
        assert_eq!(face.date_text(), Some("Mar 02"));
    }

    #[test]
    fn tick_ignores_changed_units() {
        let clock = FakeClock::new(at(2024, 12, 25, 0, 5), ClockStyle::TwelveHour);
        let mut face = shown(&clock);
        face.on_tick(TimeUnits::SECOND);
        assert_eq!(face.time_text(), Some("12:05"));
        face.on_tick(TimeUnits::all());
        assert_eq!(face.time_text(), Some("12:05"));
        assert_eq!(face.date_text(), Some("Dec 25"));
    }

    #[test]
    fn preference_is_read_on_every_update() {
        let clock = FakeClock::new(at(2024, 1, 5, 19, 5), ClockStyle::TwentyFourHour);
        let mut face = shown(&clock);
        face.update_time();
        assert_eq!(face.time_text(), Some("19:05"));

        clock.style.set(ClockStyle::TwelveHour);
        face.update_time();
        assert_eq!(face.time_text(), Some(" 7:05"));
        assert_eq!(face.date_text(), Some("Jan 05"));
    }

    #[test]
    fn repeated_updates_are_identical() {
        let clock = FakeClock::new(at(2024, 3, 2, 9, 30), ClockStyle::TwelveHour);
        let mut face = shown(&clock);
        face.update_time();
        let first = (face.time_text().map(String::from), face.date_text().map(String::from));
        face.update_time();
        let second = (face.time_text().map(String::from), face.date_text().map(String::from));
        assert_eq!(first, second);
    }

    #[test]
    fn one_clock_sample_per_update() {
        // 23:59:59 on New Year's Eve; a second read would land in the next year
        let clock = AdvancingClock(Cell::new(
            NaiveDate::from_ymd_opt(2023, 12, 31)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        ));
        let mut face = shown(&clock);
        face.update_time();
        assert_eq!(face.time_text(), Some("23:59"));
        assert_eq!(face.date_text(), Some("Dec 31"));

        face.update_time();
        assert_eq!(face.time_text(), Some("00:00"));
        assert_eq!(face.date_text(), Some("Jan 01"));
    }

    #[test]
    fn hidden_watchface_ignores_ticks() {
        let clock = FakeClock::new(at(2024, 3, 2, 9, 30), ClockStyle::TwentyFourHour);
        let mut face = DefaultWatchface::new(&clock, SCREEN, &BLACK_BACKGROUND);
        face.on_tick(TimeUnits::MINUTE);
        assert_eq!(face.time_text(), None);
        assert_eq!(clock.reads.get(), 0);
    }

    #[test]
    fn hide_destroys_window() {
        let clock = FakeClock::new(at(2024, 3, 2, 9, 30), ClockStyle::TwentyFourHour);
        let mut face = shown(&clock);
        face.on_tick(TimeUnits::MINUTE);
        face.on_hide();
        assert!(!face.is_visible());
        assert_eq!(face.buffers(), None);

        // Shown again, the old text is gone
        face.on_show();
        assert_eq!(face.time_text(), Some("00:00"));
        assert_eq!(face.date_text(), Some(""));
    }

    #[test]
    fn repeated_show_keeps_text() {
        let clock = FakeClock::new(at(2024, 3, 2, 9, 30), ClockStyle::TwentyFourHour);
        let mut face = shown(&clock);
        face.on_tick(TimeUnits::MINUTE);
        face.on_show();
        assert_eq!(face.time_text(), Some("09:30"));
    }

    #[test]
    fn buffers_fit_for_every_minute_and_day() {
        let clock = FakeClock::new(at(2024, 1, 1, 0, 0), ClockStyle::TwelveHour);
        let mut face = shown(&clock);

        let mut day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        while day.year() == 2024 {
            for style in [ClockStyle::TwelveHour, ClockStyle::TwentyFourHour] {
                clock.style.set(style);
                for minute_of_day in 0..24 * 60 {
                    let now = day
                        .and_hms_opt(minute_of_day / 60, minute_of_day % 60, 0)
                        .unwrap();
                    clock.now.set(now);
                    face.update_time();

                    let (time, date) = face.buffers().unwrap();
                    assert!(time.len() <= TIME_BUF_LEN);
                    assert!(date.len() <= DATE_BUF_LEN);
                    assert_eq!(time.last(), Some(&0));
                    assert_eq!(date.last(), Some(&0));
                    assert_eq!(time.len(), 6);
                    assert_eq!(date.len(), 7);
                }
            }
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn tick_service_drives_the_watchface() {
        let uptime = Cell::new(Duration::ZERO);
        // 2024-03-02T09:29:58Z
        let reference = TimeReference::from_timestamp(1_709_371_798, Duration::ZERO).unwrap();
        let clock = ManagedClock::new(
            TimeManager::init(reference),
            WatchConfig::default(),
            || uptime.get(),
        );
        let mut ticks = TickTimerService::subscribe(TimeUnits::MINUTE);
        let mut face = shown(&clock);

        // First poll fires right away
        let units = ticks.poll(clock.now()).unwrap();
        face.on_tick(units);
        assert_eq!(face.time_text(), Some("09:29"));

        uptime.set(Duration::from_secs(1));
        assert_eq!(ticks.poll(clock.now()), None);

        uptime.set(Duration::from_secs(2));
        let units = ticks.poll(clock.now()).unwrap();
        assert!(units.contains(TimeUnits::MINUTE));
        face.on_tick(units);
        assert_eq!(face.time_text(), Some("09:30"));
        assert_eq!(face.date_text(), Some("Mar 02"));
    }

    #[test]
    fn draws_background_and_white_text() {
        let clock = FakeClock::new(at(2024, 3, 2, 9, 30), ClockStyle::TwentyFourHour);
        let mut face = shown(&clock);
        face.on_tick(TimeUnits::MINUTE);

        let mut display = MockDisplay::<ColorMode>::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        face.draw(&mut display).unwrap();

        let white_in = |area: Rectangle| {
            area.points()
                .any(|p| display.get_pixel(p) == Some(ColorMode::WHITE))
        };
        assert!(white_in(Rectangle::new(Point::zero(), Size::new(64, 40))));
        assert!(white_in(Rectangle::new(Point::new(0, 40), Size::new(64, 24))));
        // Every pixel is either background or text
        assert!(display.bounding_box().points().all(|p| {
            let color = display.get_pixel(p);
            color == Some(ColorMode::BLACK) || color == Some(ColorMode::WHITE)
        }));
    }

    #[test]
    fn hidden_watchface_draws_nothing() {
        let clock = FakeClock::new(at(2024, 3, 2, 9, 30), ClockStyle::TwentyFourHour);
        let face = DefaultWatchface::new(&clock, SCREEN, &BLACK_BACKGROUND);

        let mut display = MockDisplay::<ColorMode>::new();
        face.draw(&mut display).unwrap();
        assert!(display.affected_area().is_zero_sized());
    }

    proptest! {
        #[test]
        fn any_time_fits_and_is_stable(secs in 0i64..4_102_444_800, is_24h in any::<bool>()) {
            let now = DateTime::from_timestamp(secs, 0).unwrap().naive_utc();
            let clock = FakeClock::new(now, ClockStyle::from_24h(is_24h));
            let mut face = shown(&clock);

            face.update_time();
            let (time, date) = face.buffers().unwrap();
            let (time, date) = (time.to_vec(), date.to_vec());
            prop_assert!(time.len() <= TIME_BUF_LEN);
            prop_assert!(date.len() <= DATE_BUF_LEN);
            prop_assert_eq!(time.last(), Some(&0));
            prop_assert_eq!(date.last(), Some(&0));

            face.update_time();
            let (again_time, again_date) = face.buffers().unwrap();
            prop_assert_eq!(&time[..], again_time);
            prop_assert_eq!(&date[..], again_date);
        }
    }
}
