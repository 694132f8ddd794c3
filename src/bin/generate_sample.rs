//! Writes a synthetic mammal sleep table for offline use:
//! `generate_sample [OUTPUT] [ROWS]` (defaults `sample_msleep.csv`, 80).

use anyhow::{Context, Result};

/// Deterministic splitmix64 generator.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

/// (category, log10 body weight range, typical total sleep in hours)
const VORES: [(&str, (f64, f64), f64); 4] = [
    ("carni", (-1.0, 2.5), 10.5),
    ("herbi", (-2.3, 3.8), 9.5),
    ("insecti", (-2.0, 1.8), 14.9),
    ("omni", (-2.0, 1.7), 10.9),
];

const ORDERS: [&str; 6] = [
    "Rodentia",
    "Primates",
    "Carnivora",
    "Artiodactyla",
    "Chiroptera",
    "Soricomorpha",
];
const CONSERVATION: [&str; 5] = ["lc", "nt", "vu", "en", "domesticated"];

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "sample_msleep.csv".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("row count '{n}'"))?,
        None => 80,
    };

    let mut rng = Rng(42);
    let mut writer = csv::Writer::from_path(&output).with_context(|| format!("creating {output}"))?;
    writer.write_record([
        "", "name", "vore", "order", "conservation", "sleep_total", "awake", "bodywt",
    ])?;

    for i in 1..=rows {
        let (vore, (lo, hi), sleep_mean) = VORES[(rng.next_u64() % VORES.len() as u64) as usize];
        let bodywt = 10f64.powf(lo + (hi - lo) * rng.unit());
        let sleep_total = (sleep_mean + 6.0 * (rng.unit() - 0.5)).clamp(1.0, 20.0);

        let vore = if rng.chance(0.08) { "NA" } else { vore };
        let bodywt = if rng.chance(0.05) {
            "NA".to_string()
        } else {
            format!("{bodywt:.3}")
        };
        let conservation = if rng.chance(0.3) { "NA" } else { rng.pick(&CONSERVATION) };

        writer.write_record([
            i.to_string(),
            format!("Species {i}"),
            vore.to_string(),
            rng.pick(&ORDERS).to_string(),
            conservation.to_string(),
            format!("{sleep_total:.1}"),
            format!("{:.1}", 24.0 - sleep_total),
            bodywt,
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} rows to {output}");
    Ok(())
}
