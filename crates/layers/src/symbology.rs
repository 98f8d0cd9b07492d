use serde::Serialize;

/// How a map region is filled.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    Ramp([f32; 4]),
    /// Distinct "no data" style; never a ramp color.
    NoData,
}

/// Linear two-stop color ramp for choropleth fills.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorRamp {
    pub low: [f32; 4],
    pub high: [f32; 4],
}

impl ColorRamp {
    pub const fn new(low: [f32; 4], high: [f32; 4]) -> Self {
        Self { low, high }
    }

    pub fn fill(&self, normalized: Option<f64>) -> Fill {
        let Some(t) = normalized else {
            return Fill::NoData;
        };
        let t = t.clamp(0.0, 1.0) as f32;
        let mut c = [0.0; 4];
        for (i, out) in c.iter_mut().enumerate() {
            *out = self.low[i] * (1.0 - t) + self.high[i] * t;
        }
        Fill::Ramp(c)
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        // #EFEFFF -> #02386F
        Self::new(rgb8(0xEF, 0xEF, 0xFF), rgb8(0x02, 0x38, 0x6F))
    }
}

pub const fn rgb8(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

const CATEGORY10: [[u8; 3]; 10] = [
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0xd6, 0x27, 0x28],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x7f, 0x7f, 0x7f],
    [0xbc, 0xbd, 0x22],
    [0x17, 0xbe, 0xcf],
];

/// Categorical legend color; cycles after ten entities.
pub fn legend_color(index: usize) -> [f32; 4] {
    let [r, g, b] = CATEGORY10[index % CATEGORY10.len()];
    rgb8(r, g, b)
}
