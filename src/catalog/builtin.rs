use super::schema::{Catalog, Feature, Item};

/// The crop catalog shipped with the binary.
///
/// Used whenever no `catalog:` path is configured. `cropfit init` writes
/// it out as `catalog.yaml` so it can be edited.
pub fn builtin_catalog() -> Catalog {
    Catalog {
        features: builtin_features(),
        items: builtin_crops(),
    }
}

fn builtin_features() -> Vec<Feature> {
    vec![
        Feature::new("ph", "pH", 4.5, 9.0).with_default(6.5),
        Feature::new("n", "Nitrogen", 0.0, 150.0)
            .with_default(80.0)
            .with_unit("kg/ha"),
        Feature::new("p", "Phosphorus", 0.0, 150.0)
            .with_default(50.0)
            .with_unit("kg/ha"),
        Feature::new("k", "Potassium", 0.0, 250.0)
            .with_default(80.0)
            .with_unit("kg/ha"),
        Feature::new("rain", "Rainfall", 0.0, 350.0)
            .with_default(120.0)
            .with_unit("mm"),
        Feature::new("temp", "Temperature", 0.0, 50.0)
            .with_default(26.0)
            .with_unit("°C"),
        Feature::new("hum", "Humidity", 0.0, 100.0)
            .with_default(65.0)
            .with_unit("%"),
    ]
}

// Column order: ph, n, p, k, rain, temp, hum
fn crop(name: &str, ranges: [(f64, f64); 7]) -> Item {
    const KEYS: [&str; 7] = ["ph", "n", "p", "k", "rain", "temp", "hum"];
    let ranges: Vec<(&str, f64, f64)> = KEYS
        .iter()
        .zip(ranges)
        .map(|(key, (lo, hi))| (*key, lo, hi))
        .collect();
    Item::new(name, &ranges)
}

#[rustfmt::skip]
fn builtin_crops() -> Vec<Item> {
    vec![
        crop("Rice", [(5.5, 7.0), (60.0, 100.0), (35.0, 60.0), (35.0, 45.0), (180.0, 300.0), (20.0, 27.0), (80.0, 90.0)]),
        crop("Maize", [(5.5, 7.0), (60.0, 100.0), (35.0, 60.0), (15.0, 25.0), (60.0, 110.0), (18.0, 27.0), (55.0, 75.0)]),
        crop("Chickpea", [(6.0, 8.0), (20.0, 60.0), (55.0, 80.0), (75.0, 85.0), (65.0, 95.0), (17.0, 21.0), (14.0, 20.0)]),
        crop("Kidney Beans", [(5.5, 6.0), (0.0, 40.0), (55.0, 80.0), (15.0, 25.0), (60.0, 150.0), (15.0, 25.0), (18.0, 25.0)]),
        crop("Lentil", [(5.9, 6.9), (0.0, 40.0), (55.0, 80.0), (15.0, 25.0), (35.0, 55.0), (18.0, 30.0), (60.0, 70.0)]),
        crop("Banana", [(5.5, 6.5), (80.0, 120.0), (70.0, 95.0), (45.0, 55.0), (90.0, 120.0), (25.0, 30.0), (75.0, 85.0)]),
        crop("Mango", [(4.5, 7.0), (0.0, 40.0), (15.0, 40.0), (25.0, 35.0), (90.0, 100.0), (27.0, 36.0), (45.0, 55.0)]),
        crop("Grapes", [(5.5, 6.5), (0.0, 40.0), (120.0, 145.0), (195.0, 205.0), (65.0, 75.0), (8.0, 42.0), (80.0, 84.0)]),
        crop("Cotton", [(5.8, 8.0), (100.0, 140.0), (35.0, 60.0), (15.0, 25.0), (60.0, 100.0), (22.0, 26.0), (75.0, 85.0)]),
        crop("Jute", [(6.0, 7.5), (60.0, 100.0), (35.0, 60.0), (35.0, 45.0), (150.0, 200.0), (23.0, 27.0), (70.0, 90.0)]),
        crop("Coffee", [(6.0, 7.5), (80.0, 120.0), (15.0, 40.0), (25.0, 35.0), (115.0, 200.0), (23.0, 28.0), (50.0, 70.0)]),
        crop("Coconut", [(5.5, 6.5), (0.0, 40.0), (5.0, 30.0), (25.0, 35.0), (130.0, 225.0), (25.0, 30.0), (90.0, 100.0)]),
        crop("Papaya", [(6.5, 7.0), (30.0, 70.0), (45.0, 70.0), (45.0, 55.0), (40.0, 250.0), (23.0, 44.0), (90.0, 95.0)]),
        crop("Tomato", [(6.0, 7.0), (60.0, 100.0), (40.0, 70.0), (60.0, 100.0), (60.0, 150.0), (20.0, 30.0), (50.0, 75.0)]),
    ]
}
