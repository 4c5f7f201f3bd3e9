//! Property tests for the catalog parser and the mode selector.
//!
//! Modelines are generated from arbitrary resolutions and refresh rates and
//! rendered in the display tool's text format, so the checks run through the
//! same line parser as real output.

use crate::catalog::{parse_modes, ModeFilter};
use crate::selector::{highest_modes, widest_per_aspect};
use proptest::prelude::*;
use randr_common::AspectRatio;
use std::collections::HashSet;

fn modeline() -> impl Strategy<Value = (u32, u32, u32)> {
    (320u32..5000, 200u32..3000, 2400u32..24000)
}

fn render(monitor: &str, modes: &[(u32, u32, u32)]) -> String {
    let mut out = format!("{monitor} Vendor 0x0001 0x00000000\n");
    for &(width, height, centihz) in modes {
        let rate = format!("{}.{:02}", centihz / 100, centihz % 100);
        out.push_str(&format!(
            "              {width}x{height}@{rate}\t{width}x{height}\t{rate}\t[x1.00]\n"
        ));
    }
    out
}

proptest! {
    #[test]
    fn small_modes_never_enter_the_catalog(modes in prop::collection::vec(modeline(), 1..40)) {
        let parsed = parse_modes(&render("DP-1", &modes));
        let filter = ModeFilter::default();
        for monitor in parsed.catalog.monitors() {
            for (_, info) in monitor.iter() {
                prop_assert!(info.width >= filter.min_width);
                prop_assert!(!info.aspect_ratio.height_below(info.width, filter.min_height));
            }
        }
    }

    #[test]
    fn duplicates_keep_the_highest_rate(
        width in 675u32..5000,
        height in 530u32..3000,
        rates in prop::collection::vec(2400u32..24000, 2..6),
    ) {
        let modes: Vec<_> = rates.iter().map(|&r| (width, height, r)).collect();
        let parsed = parse_modes(&render("HDMI-1", &modes));
        let monitor = parsed.catalog.monitor("HDMI-1").unwrap();
        prop_assert_eq!(monitor.len(), 1);

        let best = *rates.iter().max().unwrap();
        let stored = monitor.get(&format!("{width}x{height}")).unwrap();
        let expected = f64::from(best) / 100.0;
        prop_assert!((stored.refresh_hz().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn one_selection_per_aspect_ratio(modes in prop::collection::vec(modeline(), 0..40)) {
        let parsed = parse_modes(&render("eDP-1", &modes));
        let selected = highest_modes(&parsed.catalog);

        let Some(monitor) = parsed.catalog.monitor("eDP-1") else {
            return Ok(());
        };
        let aspects: HashSet<AspectRatio> = monitor.iter().map(|(_, i)| i.aspect_ratio).collect();
        let selected_aspects: HashSet<AspectRatio> = selected
            .iter()
            .map(|e| monitor.get(&e.resolution).unwrap().aspect_ratio)
            .collect();
        prop_assert_eq!(&aspects, &selected_aspects);
        prop_assert!(selected.len() >= aspects.len());

        // Resolution keys are unique, so equal width at equal aspect ratio
        // also means equal height: no ties can arise here.
        prop_assert_eq!(selected.len(), widest_per_aspect(monitor).len());
    }

    #[test]
    fn selection_is_idempotent(modes in prop::collection::vec(modeline(), 0..40)) {
        let parsed = parse_modes(&render("eDP-1", &modes));
        prop_assert_eq!(highest_modes(&parsed.catalog), highest_modes(&parsed.catalog));
    }
}
