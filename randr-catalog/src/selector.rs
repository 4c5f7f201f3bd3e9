//! Selection of one representative mode per aspect ratio per monitor.

use crate::catalog::{Catalog, MonitorModes};
use randr_common::{AspectRatio, ModeEntry};

/// Widest width seen for each aspect ratio, in first-seen order.
pub fn widest_per_aspect(monitor: &MonitorModes) -> Vec<(AspectRatio, u32)> {
    let mut widest: Vec<(AspectRatio, u32)> = Vec::new();
    for (_, info) in monitor.iter() {
        match widest.iter_mut().find(|(aspect, _)| *aspect == info.aspect_ratio) {
            Some((_, width)) => *width = (*width).max(info.width),
            None => widest.push((info.aspect_ratio, info.width)),
        }
    }
    widest
}

/// The widest mode of every aspect ratio of one monitor.
///
/// Aspect ratios are visited in reverse of the order they were first seen.
/// Resolutions tied on aspect ratio and width are all returned, in catalog
/// order.
pub fn highest_modes_for(monitor: &MonitorModes) -> Vec<ModeEntry> {
    let mut selected = Vec::new();
    for (aspect, max_width) in widest_per_aspect(monitor).into_iter().rev() {
        selected.extend(
            monitor
                .iter()
                .filter(|(_, info)| info.aspect_ratio == aspect && info.width == max_width)
                .map(|(resolution, info)| {
                    ModeEntry::new(
                        monitor.name(),
                        resolution,
                        info.mode_id.as_str(),
                        info.refresh_rate.as_str(),
                    )
                }),
        );
    }
    selected
}

/// The widest mode of every aspect ratio of every monitor, monitors in
/// catalog order.
pub fn highest_modes(catalog: &Catalog) -> Vec<ModeEntry> {
    catalog
        .monitors()
        .iter()
        .flat_map(highest_modes_for)
        .collect()
}
