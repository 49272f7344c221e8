use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const LISTINGS: usize = 2_000;
const CSV_PATH: &str = "sample_listings.csv";
const PARQUET_PATH: &str = "sample_listings.parquet";

/// (zipcode, centre lat, centre long, price multiplier)
const NEIGHBOURHOODS: [(&str, f64, f64, f64); 8] = [
    ("98004", 47.616, -122.205, 2.6),
    ("98039", 47.626, -122.233, 3.4),
    ("98112", 47.630, -122.297, 2.1),
    ("98103", 47.672, -122.343, 1.4),
    ("98115", 47.681, -122.300, 1.3),
    ("98023", 47.309, -122.364, 0.7),
    ("98002", 47.308, -122.213, 0.6),
    ("98178", 47.499, -122.247, 0.8),
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    id: i64,
    price: f64,
    bedrooms: i64,
    bathrooms: f64,
    sqft_living: i64,
    zipcode: &'static str,
    lat: f64,
    long: f64,
    grade: i64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    (0..LISTINGS)
        .map(|i| {
            let (zipcode, lat, long, multiplier) = NEIGHBOURHOODS[rng.below(NEIGHBOURHOODS.len())];
            let bedrooms = (rng.gauss(3.3, 0.9).round() as i64).clamp(1, 8);
            let bathrooms = ((rng.gauss(bedrooms as f64 * 0.65, 0.4) * 4.0).round() / 4.0).max(0.75);
            let sqft_living = (rng.gauss(600.0 + bedrooms as f64 * 450.0, 300.0) as i64).max(380);
            let grade = (rng.gauss(7.0 + (multiplier - 1.0), 1.0).round() as i64).clamp(3, 13);
            let per_sqft = rng.gauss(220.0 * multiplier, 35.0).max(60.0);
            let price = ((sqft_living as f64 * per_sqft) / 1000.0).round() * 1000.0;

            Row {
                id: 1_000_000_000 + i as i64 * 7919,
                price,
                bedrooms,
                bathrooms,
                sqft_living,
                zipcode,
                lat: lat + rng.gauss(0.0, 0.012),
                long: long + rng.gauss(0.0, 0.015),
                grade,
            }
        })
        .collect()
}

fn write_csv(rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV output")?;
    writer.write_record([
        "id", "price", "bedrooms", "bathrooms", "sqft_living", "zipcode", "lat", "long", "grade",
    ])?;
    for r in rows {
        writer.write_record([
            r.id.to_string(),
            r.price.to_string(),
            r.bedrooms.to_string(),
            r.bathrooms.to_string(),
            r.sqft_living.to_string(),
            r.zipcode.to_string(),
            format!("{:.4}", r.lat),
            format!("{:.3}", r.long),
            r.grade.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("price", DataType::Float64, false),
        Field::new("bedrooms", DataType::Int64, false),
        Field::new("bathrooms", DataType::Float64, false),
        Field::new("sqft_living", DataType::Int64, false),
        Field::new("zipcode", DataType::Utf8, false),
        Field::new("lat", DataType::Float64, false),
        Field::new("long", DataType::Float64, false),
        Field::new("grade", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.price))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.bedrooms))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.bathrooms))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.sqft_living))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.zipcode))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.lat))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.long))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.grade))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// How to open the generated file, since the dashboard's default path
/// points elsewhere.
fn dashboard_hint() -> String {
    format!(
        "Point the dashboard at it with ESTATE_LENS_DATA={CSV_PATH} \
         or \"data_path\": \"{CSV_PATH}\" in estate-lens.json"
    )
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!("Wrote {} listings to {CSV_PATH} and {PARQUET_PATH}", rows.len());
    println!("{}", dashboard_hint());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_names_both_config_routes() {
        let hint = dashboard_hint();
        assert!(hint.contains("ESTATE_LENS_DATA=sample_listings.csv"), "{hint}");
        assert!(hint.contains("estate-lens.json"), "{hint}");
    }

    #[test]
    fn generated_rows_are_plausible() {
        let rows = generate(&mut SimpleRng::new(7));
        assert_eq!(rows.len(), LISTINGS);
        assert!(rows.iter().all(|r| r.price > 0.0 && r.sqft_living > 0));
    }
}
