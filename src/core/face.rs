/// Face lifecycle: builds every slot at show time, drives the renderers on
/// each tick, and tears everything down at hide.
///
/// The `Face` value is the only owner of its slot ids, font leases and
/// background image; nothing else creates or destroys them.
use chrono::NaiveDateTime;
use std::cell::RefCell;
use std::rc::Rc;
use tiny_skia::Pixmap;
use tracing::{debug, error, info, warn};

use crate::core::scheduler::{TickScheduler, TickUnit};
use crate::face::codec;
use crate::face::model::WatchFaceConfig;
use crate::platform::assets::{FONT_DATE, FONT_TEXT, FONT_TIME, RESOURCE_BACKGROUND, ResourceStore};
use crate::platform::clock::TimeSource;
use crate::platform::display::DisplayMetrics;
use crate::render::compositor::{Compositor, SlotId};
use crate::render::fonts::FontProvider;
use crate::render::layout::FaceLayout;
use crate::render::plugins::analog::AnalogRenderer;
use crate::render::plugins::date::DateRenderer;
use crate::render::plugins::digital::DigitalRenderer;
use crate::render::plugins::text::LabelRenderer;
use crate::render::plugins::{RenderState, TextSlot, TickRenderer};

/// The host collaborators a face runs against
pub struct Host {
    pub display: DisplayMetrics,
    pub clock: Box<dyn TimeSource>,
    pub resources: Box<dyn ResourceStore>,
    pub fonts: Rc<RefCell<dyn FontProvider>>,
}

pub struct Face {
    config: WatchFaceConfig,
    layout: FaceLayout,
    state: RenderState,
    scheduler: TickScheduler,
    background: SlotId,
    digital: Option<DigitalRenderer>,
    date: Option<DateRenderer>,
    label: Option<LabelRenderer>,
    analog: Option<AnalogRenderer>,
}

impl Face {
    /// Load the config blob from the host's resources and show it. An
    /// unusable blob falls back to the default face.
    pub fn show(host: &Host, compositor: &mut Compositor) -> Self {
        let config = match codec::load(host.resources.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                error!("Face config unusable, showing default face: {}", e);
                WatchFaceConfig::default()
            }
        };
        Self::show_config(host, config, compositor)
    }

    pub fn show_config(host: &Host, config: WatchFaceConfig, compositor: &mut Compositor) -> Self {
        let layout = FaceLayout::compute(&config, &host.display);
        debug!("Face layout: {:?}", layout);

        compositor.set_backdrop(config.background.color);
        let image = host.resources.load_image(RESOURCE_BACKGROUND);
        if image.is_none() {
            debug!("No background image, backdrop colour only");
        }
        let background = compositor.create_image(layout.background, image);

        let digital = config.digital.enabled.then(|| {
            let slot = TextSlot::create(&config.digital, FONT_TIME, layout.digital, &host.fonts, compositor);
            DigitalRenderer::new(config.digital.enabled, slot)
        });

        let date = config.date.element.enabled.then(|| {
            let element = &config.date.element;
            let slot = TextSlot::create(element, FONT_DATE, layout.date, &host.fonts, compositor);
            DateRenderer::new(element.enabled, slot)
        });

        let label = config.text.element.enabled.then(|| {
            let element = &config.text.element;
            let slot = TextSlot::create(element, FONT_TEXT, layout.text, &host.fonts, compositor);
            LabelRenderer::show(element.enabled, &config.text.label, slot, compositor)
        });

        let analog = config.analog.enabled.then(|| {
            let slot = compositor.create_canvas(layout.analog);
            AnalogRenderer::new(config.analog, slot)
        });

        // Fixed z-order, bottom to top
        compositor.attach(background);
        if let Some(digital) = &digital {
            compositor.attach(digital.slot.id);
        }
        if let Some(date) = &date {
            compositor.attach(date.slot.id);
        }
        if let Some(label) = &label {
            compositor.attach(label.slot.id);
        }
        if let Some(analog) = &analog {
            compositor.attach(analog.slot);
        }

        let now = host.clock.now();
        let unit = TickUnit::for_config(&config);
        let scheduler = TickScheduler::subscribe(unit, &now);

        let mut face = Self {
            config,
            layout,
            state: RenderState::default(),
            scheduler,
            background,
            digital,
            date,
            label,
            analog,
        };

        info!(
            "Face shown: {} slots, ticking every {:?}",
            compositor.tree().len(),
            unit
        );

        // Never show a blank face while waiting for the first tick
        face.tick(&now, host.clock.is_24h(), compositor);
        face
    }

    /// Update if the scheduler says a new unit has started. Returns true
    /// when an update ran.
    pub fn poll(&mut self, now: &NaiveDateTime, hour24: bool, compositor: &mut Compositor) -> bool {
        if !self.scheduler.due(now) {
            return false;
        }
        self.tick(now, hour24, compositor);
        true
    }

    /// Refresh the render state and run digital, date, then analog.
    pub fn tick(&mut self, now: &NaiveDateTime, hour24: bool, compositor: &mut Compositor) {
        self.state = RenderState::capture(now, hour24, &self.config.date.format);

        let renderers: [Option<&mut dyn TickRenderer>; 3] = [
            self.digital.as_mut().map(|r| r as &mut dyn TickRenderer),
            self.date.as_mut().map(|r| r as &mut dyn TickRenderer),
            self.analog.as_mut().map(|r| r as &mut dyn TickRenderer),
        ];
        for renderer in renderers.into_iter().flatten() {
            renderer.update(&self.state, compositor);
        }
    }

    /// Paint callback for the compositor's canvas repaint pass.
    pub fn paint(&self, slot: SlotId, surface: &mut Pixmap) {
        match &self.analog {
            Some(analog) if analog.slot == slot => analog.paint(surface),
            _ => warn!("No painter for slot {:?}", slot),
        }
    }

    pub fn tick_unit(&self) -> TickUnit {
        self.scheduler.unit()
    }

    /// Destroy every slot, release custom fonts, then the background image.
    pub fn hide(self, compositor: &mut Compositor) {
        if let Some(digital) = self.digital {
            digital.slot.release(compositor);
        }
        if let Some(date) = self.date {
            date.slot.release(compositor);
        }
        if let Some(label) = self.label {
            label.slot.release(compositor);
        }
        if let Some(analog) = self.analog {
            analog.release(compositor);
        }
        // the background image lives in its slot
        compositor.destroy(self.background);

        info!("Face hidden");
    }
}
