//! Colormap definitions and value-to-colour mapping.

use serde::{Deserialize, Serialize};

/// Available colormaps, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Gray,
    Viridis,
    Plasma,
    Inferno,
    Magma,
}

// 11 evenly spaced stops (t = 0.0, 0.1, ..., 1.0) sampled from the matplotlib maps.
const VIRIDIS: [u32; 11] = [
    0x440154, 0x482475, 0x414487, 0x355f8d, 0x2a788e, 0x21918c, 0x22a884, 0x44bf70, 0x7ad151,
    0xbddf26, 0xfde725,
];
const PLASMA: [u32; 11] = [
    0x0d0887, 0x41049d, 0x6a00a8, 0x8f0da4, 0xb12a90, 0xcc4778, 0xe16462, 0xf2844b, 0xfca636,
    0xfcce25, 0xf0f921,
];
const INFERNO: [u32; 11] = [
    0x000004, 0x160b39, 0x420a68, 0x6a176e, 0x932667, 0xbc3754, 0xdd513a, 0xf37819, 0xfca50a,
    0xf6d746, 0xfcffa4,
];
const MAGMA: [u32; 11] = [
    0x000004, 0x140e36, 0x3b0f70, 0x641a80, 0x8c2981, 0xb73779, 0xde4968, 0xf7705c, 0xfe9f6d,
    0xfecf92, 0xfcfdbf,
];

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Colormap {
    pub const ALL: [Colormap; 5] = [
        Colormap::Gray,
        Colormap::Viridis,
        Colormap::Plasma,
        Colormap::Inferno,
        Colormap::Magma,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Gray => "gray",
            Colormap::Viridis => "viridis",
            Colormap::Plasma => "plasma",
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    fn stops(self) -> Option<&'static [u32; 11]> {
        match self {
            Colormap::Gray => None,
            Colormap::Viridis => Some(&VIRIDIS),
            Colormap::Plasma => Some(&PLASMA),
            Colormap::Inferno => Some(&INFERNO),
            Colormap::Magma => Some(&MAGMA),
        }
    }

    /// Map a normalized value in `[0, 1]` to opaque RGBA. Out-of-range input
    /// is clamped; NaN maps to fully transparent.
    #[must_use]
    pub fn apply(self, val: f32) -> [u8; 4] {
        if val.is_nan() {
            return [0, 0, 0, 0];
        }
        let t = val.clamp(0.0, 1.0);
        let Some(stops) = self.stops() else {
            let v = f32_to_u8(t * 255.0);
            return [v, v, v, 255];
        };

        let scaled = t * (stops.len() - 1) as f32;
        let lo = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lo as f32;
        let (a, b) = (unpack(stops[lo]), unpack(stops[lo + 1]));
        let mix = |i: usize| f32_to_u8(a[i] + (b[i] - a[i]) * frac);
        [mix(0), mix(1), mix(2), 255]
    }
}

fn unpack(rgb: u32) -> [f32; 3] {
    [
        ((rgb >> 16) & 0xff) as f32,
        ((rgb >> 8) & 0xff) as f32,
        (rgb & 0xff) as f32,
    ]
}

/// Convert f32 to u8 with clamping to [0, 255].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn f32_to_u8(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for cmap in Colormap::ALL {
            assert_eq!(Colormap::from_name(cmap.name()), Some(cmap));
        }
        assert_eq!(Colormap::from_name("jet"), None);
    }

    #[test]
    fn gray_is_linear() {
        assert_eq!(Colormap::Gray.apply(0.0), [0, 0, 0, 255]);
        assert_eq!(Colormap::Gray.apply(1.0), [255, 255, 255, 255]);
        assert_eq!(Colormap::Gray.apply(2.0), [255, 255, 255, 255]);
        assert_eq!(Colormap::Gray.apply(-1.0), [0, 0, 0, 255]);
    }

    #[test]
    fn endpoints_hit_table_stops() {
        assert_eq!(Colormap::Viridis.apply(0.0), [0x44, 0x01, 0x54, 255]);
        assert_eq!(Colormap::Viridis.apply(1.0), [0xfd, 0xe7, 0x25, 255]);
        assert_eq!(Colormap::Magma.apply(0.0), [0, 0, 4, 255]);
    }

    #[test]
    fn nan_is_transparent() {
        assert_eq!(Colormap::Inferno.apply(f32::NAN)[3], 0);
    }
}
