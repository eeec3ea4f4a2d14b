/// Label renderer. The label never changes, so it is pushed once at show
/// time and ignores ticks.
use tracing::debug;

use crate::render::compositor::Compositor;
use crate::render::plugins::TextSlot;

pub struct LabelRenderer {
    pub slot: TextSlot,
}

impl LabelRenderer {
    pub fn show(enabled: bool, label: &str, slot: TextSlot, compositor: &mut Compositor) -> Self {
        if enabled {
            compositor.set_text(slot.id, label);
            debug!("Label set to {:?}", label);
        }
        Self { slot }
    }
}
