use chrono::NaiveDate;
use once_cell::sync::Lazy;

pub struct Holiday {
    pub date: NaiveDate,
    pub name: &'static str,
}

/// Static public-holiday table (Korean calendar, 2024-2026). Composed into
/// the shared calendar as company-wide entries; never stored.
pub static HOLIDAYS: Lazy<Vec<Holiday>> = Lazy::new(|| {
    RAW.iter()
        .map(|(date, name)| Holiday {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            name,
        })
        .collect()
});

const RAW: &[(&str, &str)] = &[
    ("2024-01-01", "New Year's Day"),
    ("2024-02-09", "Seollal holiday"),
    ("2024-02-10", "Seollal"),
    ("2024-02-11", "Seollal holiday"),
    ("2024-02-12", "Substitute holiday"),
    ("2024-03-01", "Independence Movement Day"),
    ("2024-04-10", "National Assembly election"),
    ("2024-05-05", "Children's Day"),
    ("2024-05-06", "Substitute holiday"),
    ("2024-05-15", "Buddha's Birthday"),
    ("2024-06-06", "Memorial Day"),
    ("2024-08-15", "Liberation Day"),
    ("2024-09-16", "Chuseok holiday"),
    ("2024-09-17", "Chuseok"),
    ("2024-09-18", "Chuseok holiday"),
    ("2024-10-03", "National Foundation Day"),
    ("2024-10-09", "Hangul Day"),
    ("2024-12-25", "Christmas Day"),
    ("2025-01-01", "New Year's Day"),
    ("2025-01-28", "Seollal holiday"),
    ("2025-01-29", "Seollal"),
    ("2025-01-30", "Seollal holiday"),
    ("2025-03-01", "Independence Movement Day"),
    ("2025-03-03", "Substitute holiday"),
    ("2025-05-05", "Children's Day"),
    ("2025-05-06", "Substitute holiday"),
    ("2025-06-06", "Memorial Day"),
    ("2025-08-15", "Liberation Day"),
    ("2025-10-03", "National Foundation Day"),
    ("2025-10-05", "Chuseok holiday"),
    ("2025-10-06", "Chuseok"),
    ("2025-10-07", "Chuseok holiday"),
    ("2025-10-08", "Substitute holiday"),
    ("2025-10-09", "Hangul Day"),
    ("2025-12-25", "Christmas Day"),
    ("2026-01-01", "New Year's Day"),
    ("2026-02-16", "Seollal holiday"),
    ("2026-02-17", "Seollal"),
    ("2026-02-18", "Seollal holiday"),
    ("2026-03-01", "Independence Movement Day"),
    ("2026-03-02", "Substitute holiday"),
    ("2026-05-05", "Children's Day"),
    ("2026-05-24", "Buddha's Birthday"),
    ("2026-05-25", "Substitute holiday"),
    ("2026-06-06", "Memorial Day"),
    ("2026-08-15", "Liberation Day"),
    ("2026-09-24", "Chuseok holiday"),
    ("2026-09-25", "Chuseok"),
    ("2026-09-26", "Chuseok holiday"),
    ("2026-10-03", "National Foundation Day"),
    ("2026-10-05", "Substitute holiday"),
    ("2026-10-09", "Hangul Day"),
    ("2026-12-25", "Christmas Day"),
];
