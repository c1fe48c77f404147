use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

const MONTAGE: [&str; 19] = [
    "FP1", "FP2", "F7", "F3", "Fz", "F4", "F8", "T3", "C3", "Cz", "C4", "T4", "T5", "P3", "Pz",
    "P4", "T6", "O1", "O2",
];

/// (column prefix, baseline absolute power)
const BANDS: [(&str, f64); 6] = [
    ("AB.A.delta", 22.0),
    ("AB.B.theta", 14.0),
    ("AB.C.alpha", 18.0),
    ("AB.D.beta", 9.0),
    ("AB.E.highbeta", 4.5),
    ("AB.F.gamma", 2.5),
];

/// (label, subjects, per-band gain)
const DISORDERS: [(&str, usize, [f64; 6]); 7] = [
    ("Addictive disorder", 28, [1.05, 1.00, 0.95, 1.10, 1.15, 1.10]),
    ("Anxiety disorder", 24, [0.95, 1.00, 0.90, 1.20, 1.25, 1.15]),
    ("Healthy control", 30, [1.00, 1.00, 1.00, 1.00, 1.00, 1.00]),
    ("Mood disorder", 32, [1.10, 1.15, 1.05, 0.95, 0.95, 0.90]),
    ("Obsessive compulsive disorder", 16, [1.00, 1.10, 0.85, 1.05, 1.10, 1.00]),
    ("Schizophrenia", 26, [1.30, 1.25, 0.80, 0.90, 0.90, 1.05]),
    ("Trauma and stress related disorder", 20, [1.05, 1.05, 0.95, 1.05, 1.10, 1.00]),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Posterior electrodes carry more alpha, frontal ones more delta.
fn topography(band: usize, electrode: usize) -> f64 {
    let posterior = electrode as f64 / (MONTAGE.len() - 1) as f64;
    match band {
        0 => 1.3 - 0.5 * posterior,
        2 => 0.7 + 0.8 * posterior,
        _ => 1.0 + 0.1 * (electrode as f64 * 0.7).sin(),
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut ids: Vec<i64> = Vec::new();
    let mut sexes: Vec<&str> = Vec::new();
    let mut ages: Vec<f64> = Vec::new();
    let mut disorders: Vec<&str> = Vec::new();
    // band-power columns, then the coherence column
    let mut power: Vec<Vec<f64>> = vec![Vec::new(); BANDS.len() * MONTAGE.len() + 1];

    for (label, subjects, gains) in &DISORDERS {
        for _ in 0..*subjects {
            ids.push(ids.len() as i64 + 1);
            sexes.push(if rng.next_f64() < 0.5 { "F" } else { "M" });
            ages.push(rng.gauss(32.0, 9.0).clamp(18.0, 70.0).round());
            disorders.push(*label);

            for (b, (_, baseline)) in BANDS.iter().enumerate() {
                for e in 0..MONTAGE.len() {
                    let mean = baseline * gains[b] * topography(b, e);
                    let value = rng.gauss(mean, mean * 0.15).max(0.01);
                    power[b * MONTAGE.len() + e].push(value);
                }
            }
            power[BANDS.len() * MONTAGE.len()].push(rng.gauss(70.0, 10.0).clamp(0.0, 100.0));
        }
    }

    // Column names. The first band column carries stray spaces like the
    // exports this viewer reads.
    let mut names: Vec<String> = vec![
        "no.".to_string(),
        "sex".to_string(),
        "age".to_string(),
        "main.disorder".to_string(),
    ];
    for (prefix, _) in &BANDS {
        for (i, electrode) in MONTAGE.iter().enumerate() {
            let letter = (b'a' + i as u8) as char;
            names.push(format!("{prefix}.{letter}.{electrode}"));
        }
    }
    names[4] = format!(" {} ", names[4]);
    names.push("COH.A.delta.a.FP1.b.FP2".to_string());

    let mut fields = vec![
        Field::new(&names[0], DataType::Int64, false),
        Field::new(&names[1], DataType::Utf8, false),
        Field::new(&names[2], DataType::Float64, false),
        Field::new(&names[3], DataType::Utf8, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(ids.clone())),
        Arc::new(StringArray::from(sexes.clone())),
        Arc::new(Float64Array::from(ages.clone())),
        Arc::new(StringArray::from(disorders.clone())),
    ];
    for (name, values) in names[4..].iter().zip(&power) {
        fields.push(Field::new(name, DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(values.clone())));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    // Write Parquet
    let parquet_path = "sample_eeg.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    // Write CSV
    let csv_path = "sample_eeg.csv";
    let mut csv = csv::Writer::from_path(csv_path).context("creating CSV file")?;
    csv.write_record(&names)?;
    for row in 0..ids.len() {
        let mut record = vec![
            ids[row].to_string(),
            sexes[row].to_string(),
            ages[row].to_string(),
            disorders[row].to_string(),
        ];
        record.extend(power.iter().map(|col| format!("{:.4}", col[row])));
        csv.write_record(&record)?;
    }
    csv.flush()?;

    let preview = batch.project(&[0, 1, 2, 3, 4, 5])?.slice(0, 5);
    println!("{}", pretty_format_batches(&[preview])?);
    println!(
        "Wrote {} subjects ({} columns) to {csv_path} and {parquet_path}",
        ids.len(),
        names.len()
    );
    Ok(())
}
