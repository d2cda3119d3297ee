//! Named colormaps and the two ways figures pick colours from them.
//!
//! Bar charts sample a map evenly across `[0, 1]` ([`Colormap::sample`]);
//! box plot palettes take interior points, or the leading colours of an
//! unreversed qualitative map ([`Colormap::palette`]).

use crate::error::{PlotError, Result};
use plotters::style::RGBColor;

const PIYG: [&str; 11] = [
    "#8e0152", "#c51b7d", "#de77ae", "#f1b6da", "#fde0ef", "#f7f7f7", "#e6f5d0", "#b8e186",
    "#7fbc41", "#4d9221", "#276419",
];

const BRBG: [&str; 11] = [
    "#543005", "#8c510a", "#bf812d", "#dfc27d", "#f6e8c3", "#f5f5f5", "#c7eae5", "#80cdc1",
    "#35978f", "#01665e", "#003c30",
];

const RDBU: [&str; 11] = [
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
    "#4393c3", "#2166ac", "#053061",
];

const SET2: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

const DARK2: [&str; 8] = [
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];

/// Resolution of continuous maps.
const LUT_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// Fixed list of colours, looked up by bin.
    Listed,
    /// Linear interpolation between equally spaced anchors.
    Continuous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    kind: Kind,
    colors: Vec<RGBColor>,
    reversed: bool,
}

impl Colormap {
    /// Look up a map by name; a `_r` suffix reverses it.
    pub fn named(name: &str) -> Result<Self> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };
        let (kind, anchors): (Kind, &[&str]) = match base {
            "PiYG" => (Kind::Continuous, &PIYG[..]),
            "BrBG" => (Kind::Continuous, &BRBG[..]),
            "RdBu" => (Kind::Continuous, &RDBU[..]),
            "Set2" => (Kind::Listed, &SET2[..]),
            "Dark2" => (Kind::Listed, &DARK2[..]),
            _ => return Err(PlotError::UnknownColormap(name.to_string())),
        };
        let mut colors = anchors
            .iter()
            .map(|hex| parse_hex(hex))
            .collect::<Result<Vec<_>>>()?;
        if reversed {
            colors.reverse();
        }
        Ok(Colormap {
            name: name.to_string(),
            kind,
            colors,
            reversed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_qualitative(&self) -> bool {
        self.kind == Kind::Listed
    }

    /// Colour at position `t` in `[0, 1]`.
    pub fn at(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self.kind {
            Kind::Listed => {
                let n = self.colors.len();
                let idx = ((t * n as f64).floor() as usize).min(n - 1);
                self.colors[idx]
            }
            Kind::Continuous => {
                let bin = ((t * LUT_SIZE as f64).floor() as usize).min(LUT_SIZE - 1);
                self.interpolate(bin as f64 / (LUT_SIZE - 1) as f64)
            }
        }
    }

    fn interpolate(&self, t: f64) -> RGBColor {
        let last = self.colors.len() - 1;
        let x = t * last as f64;
        let lo = (x.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        let frac = x - lo as f64;
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        let (a, b) = (self.colors[lo], self.colors[hi]);
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }

    /// `n` colours at evenly spaced positions from 0 to 1 inclusive.
    pub fn sample(&self, n: usize) -> Vec<RGBColor> {
        match n {
            0 => Vec::new(),
            1 => vec![self.at(0.0)],
            _ => (0..n)
                .map(|i| self.at(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }

    /// `n` colours for categorical hues.
    ///
    /// An unreversed qualitative map yields its leading colours; any other
    /// map is sampled at `n` interior points, skipping both ends.
    pub fn palette(&self, n: usize) -> Vec<RGBColor> {
        if self.is_qualitative() && !self.reversed {
            let bins = self.colors.len();
            return (0..n)
                .map(|i| {
                    let t = if bins > 1 { i as f64 / (bins - 1) as f64 } else { 0.0 };
                    self.at(t)
                })
                .collect();
        }
        (1..=n).map(|i| self.at(i as f64 / (n + 1) as f64)).collect()
    }
}

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(hex: &str) -> Result<RGBColor> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PlotError::InvalidColor(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| PlotError::InvalidColor(hex.to_string()))
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Scale the saturation of `color` by `prop` in HLS space.
pub fn desaturate(color: RGBColor, prop: f64) -> RGBColor {
    let (h, l, s) = rgb_to_hls(color);
    hls_to_rgb(h, l, s * prop.clamp(0.0, 1.0))
}

fn rgb_to_hls(color: RGBColor) -> (f64, f64, f64) {
    let (r, g, b) = (
        color.0 as f64 / 255.0,
        color.1 as f64 / 255.0,
        color.2 as f64 / 255.0,
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, l, 0.0);
    }
    let range = max - min;
    let s = if l <= 0.5 {
        range / (max + min)
    } else {
        range / (2.0 - max - min)
    };
    let (rc, gc, bc) = ((max - r) / range, (max - g) / range, (max - b) / range);
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> RGBColor {
    let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    if s == 0.0 {
        return RGBColor(to_u8(l), to_u8(l), to_u8(l));
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    let channel = |hue: f64| {
        let hue = hue.rem_euclid(1.0);
        if hue < 1.0 / 6.0 {
            m1 + (m2 - m1) * hue * 6.0
        } else if hue < 0.5 {
            m2
        } else if hue < 2.0 / 3.0 {
            m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
        } else {
            m1
        }
    };
    RGBColor(
        to_u8(channel(h + 1.0 / 3.0)),
        to_u8(channel(h)),
        to_u8(channel(h - 1.0 / 3.0)),
    )
}
