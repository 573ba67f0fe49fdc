//! CSV report: one row per game with its derived fields.

use crate::catalog::Catalog;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, catalog: &Catalog) -> io::Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record([
        "name",
        "release_date",
        "year",
        "semester",
        "price",
        "num_reviews_total",
        "num_reviews_positive",
        "primary_genre",
        "genres",
    ])
    .map_err(to_io)?;

    for record in &catalog.records {
        let release_date = record
            .release_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        let year = record.year.map(|y| y.to_string()).unwrap_or_default();
        let price = format!("{:.2}", record.price);
        let reviews_total = record.num_reviews_total.to_string();
        let reviews_positive = record
            .num_reviews_positive
            .map(|n| n.to_string())
            .unwrap_or_default();
        let genres = record.genres.join("; ");

        out.write_record([
            record.name.as_str(),
            release_date.as_str(),
            year.as_str(),
            record.semester.as_deref().unwrap_or(""),
            price.as_str(),
            reviews_total.as_str(),
            reviews_positive.as_str(),
            record.primary_genre().unwrap_or(""),
            genres.as_str(),
        ])
        .map_err(to_io)?;
    }

    out.flush()
}

fn to_io(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GameRecord;
    use std::path::PathBuf;

    #[test]
    fn test_csv_has_header_plus_one_row_per_game() {
        let catalog = Catalog {
            records: vec![
                GameRecord {
                    name: "G1".to_string(),
                    release_date: None,
                    price: 9.99,
                    num_reviews_total: 12,
                    num_reviews_positive: Some(10),
                    genres: vec!["RPG".to_string(), "Indie".to_string()],
                    year: None,
                    month: None,
                    semester: None,
                },
                GameRecord {
                    name: "G2".to_string(),
                    release_date: None,
                    price: 0.0,
                    num_reviews_total: 0,
                    num_reviews_positive: None,
                    genres: Vec::new(),
                    year: None,
                    month: None,
                    semester: None,
                },
            ],
            source: PathBuf::from("test.csv"),
            has_positive_reviews: true,
        };

        let mut buffer = Vec::new();
        write(&mut buffer, &catalog).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("name,release_date"));
        assert!(text.contains("RPG; Indie"));
        // Unknown fields stay empty, never placeholder values
        assert!(text.contains("G2,,,,0.00,0,,,"));
    }
}
