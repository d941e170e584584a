use crate::model::{PLACEHOLDER, PropertyRecord};

pub type CellFormatter = fn(&PropertyRecord) -> String;

#[derive(Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub format: CellFormatter,
}

impl ColumnDef {
    pub fn value(&self, record: &PropertyRecord) -> String {
        (self.format)(record)
    }

    pub fn header(&self) -> String {
        match self.unit {
            Some(unit) => format!("{} ({unit})", self.name),
            None => self.name.to_string(),
        }
    }
}

impl std::fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDef")
            .field("name", &self.name)
            .field("unit", &self.unit)
            .finish()
    }
}

pub type AvailableColumns<'a> = Vec<&'a ColumnDef>;

fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

fn fixed_or_dash(value: f64, decimals: usize) -> String {
    if value == 0.0 {
        return PLACEHOLDER.to_string();
    }
    fixed(value, decimals)
}

fn residual_or_dash(record: &PropertyRecord) -> String {
    if record.residual.is_empty() {
        return PLACEHOLDER.to_string();
    }
    record.residual.clone()
}

const fn column(
    name: &'static str,
    unit: Option<&'static str>,
    format: CellFormatter,
) -> ColumnDef {
    ColumnDef {
        name,
        unit,
        format,
    }
}

const MM: Option<&str> = Some("mm");
const MM3: Option<&str> = Some("mm³");

pub static CATALOG: [ColumnDef; 45] = [
    column("Grade", None, |p| p.grade.to_string()),
    column("Weight", Some("kg/m"), |p| fixed(p.weight, 1)),
    column("d", MM, |p| fixed(p.d, 1)),
    column("bf", MM, |p| fixed(p.bf, 1)),
    column("tf", MM, |p| fixed(p.tf, 1)),
    column("tw", MM, |p| fixed(p.tw, 1)),
    column("r1", MM, |p| p.r1.to_string()),
    column("d1", MM, |p| fixed(p.d1, 1)),
    column("tw__1", MM, |p| p.tw_1.to_string()),
    column("tf__1", MM, |p| p.tf_1.to_string()),
    column("Ag", Some("mm²"), |p| fixed(p.ag, 0)),
    column("Ix", Some("10⁶mm⁴"), |p| fixed(p.ix, 1)),
    column("Zx", Some("10³mm³"), |p| fixed(p.zx, 1)),
    column("Sx", Some("10³mm³"), |p| fixed(p.sx, 0)),
    column("rx", MM, |p| fixed(p.rx, 1)),
    column("Iy", Some("10⁶mm⁴"), |p| fixed(p.iy, 2)),
    column("Zy", MM3, |p| fixed(p.zy, 1)),
    column("Sy", MM3, |p| fixed(p.sy, 1)),
    column("ry", MM, |p| fixed(p.ry, 1)),
    column("J", Some("10³mm⁴"), |p| fixed(p.j, 0)),
    column("Iw", Some("10⁹mm⁶"), |p| p.iw.to_string()),
    column("flange", MM, |p| p.flange.to_string()),
    column("web", MM, |p| p.web.to_string()),
    column("kf", None, |p| p.kf.to_string()),
    column("C,N,S", None, |p| p.compactness.to_string()),
    column("Zex", MM3, |p| fixed(p.zex, 0)),
    column("C,N,S__1", None, |p| p.compactness_y.to_string()),
    column("Zey", MM3, |p| fixed(p.zey, 1)),
    column("2tf", None, |p| p.two_tf.to_string()),
    column("Zy5", MM3, |p| fixed_or_dash(p.zy5, 1)),
    column("TanAlpha", None, |p| fixed_or_dash(p.tan_alpha, 3)),
    column("αb", None, |p| p.alpha_b.to_string()),
    column("Fu", Some("MPa"), |p| p.fu.to_string()),
    column("r2", MM, |p| p.r2.to_string()),
    column("ZeyD", MM3, |p| fixed_or_dash(p.zey_d, 1)),
    column("In", Some("10³mm⁴"), |p| fixed_or_dash(p.i_n, 2)),
    column("Ip", Some("10³mm⁴"), |p| fixed_or_dash(p.i_p, 2)),
    column("ZexC", MM3, |p| fixed_or_dash(p.zex_c, 0)),
    column("x5", MM, |p| p.x5.to_string()),
    column("y5", MM, |p| fixed_or_dash(p.y5, 1)),
    column("nL", MM, |p| fixed_or_dash(p.n_l, 1)),
    column("pB", MM, |p| fixed_or_dash(p.p_b, 1)),
    column("pT", MM, |p| p.p_t.to_string()),
    column("Residual", None, residual_or_dash),
    column("Type", None, |p| p.section_type.to_string()),
];

pub fn catalog() -> &'static [ColumnDef] {
    &CATALOG
}

pub fn is_placeholder(value: &str) -> bool {
    value.is_empty() || value == PLACEHOLDER
}

pub fn is_zero_equivalent(value: &str) -> bool {
    matches!(value, "0" | "0.0" | "0.00" | "0.000")
        || value.parse::<f64>().is_ok_and(|parsed| parsed == 0.0)
}

/// Keeps the columns with at least one displayed value that is neither a
/// placeholder nor zero. The decision is made on formatted strings, so a
/// column whose values all round to zero is dropped too.
pub fn compute_available_columns<'a>(
    columns: &'a [ColumnDef],
    records: &[PropertyRecord],
) -> AvailableColumns<'a> {
    columns
        .iter()
        .filter(|column| {
            let mut has_non_placeholder = false;
            let mut has_real_data = false;
            for record in records {
                let value = column.value(record);
                if is_placeholder(&value) {
                    continue;
                }
                has_non_placeholder = true;
                if !is_zero_equivalent(&value) {
                    has_real_data = true;
                    break;
                }
            }
            has_non_placeholder && has_real_data
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        CATALOG, ColumnDef, catalog, compute_available_columns, is_placeholder,
        is_zero_equivalent,
    };
    use crate::model::{FieldValue, PropertyRecord};

    fn record(section: &str) -> PropertyRecord {
        PropertyRecord {
            section: section.to_string(),
            ..PropertyRecord::default()
        }
    }

    fn names(columns: &[&ColumnDef]) -> Vec<&'static str> {
        columns.iter().map(|column| column.name).collect()
    }

    #[test]
    fn catalog_has_unique_names_and_unit_headers() {
        assert_eq!(catalog().len(), 45);
        let mut seen = std::collections::HashSet::new();
        for column in catalog() {
            assert!(seen.insert(column.name), "duplicate column {}", column.name);
        }
        let weight = catalog().iter().find(|c| c.name == "Weight").unwrap();
        assert_eq!(weight.header(), "Weight (kg/m)");
        let kf = catalog().iter().find(|c| c.name == "kf").unwrap();
        assert_eq!(kf.header(), "kf");
    }

    #[test]
    fn zero_equivalents_cover_formatted_and_parsed_zero() {
        for value in ["0", "0.0", "0.00", "0.000", "-0.0", "0e3", "+0"] {
            assert!(is_zero_equivalent(value), "{value} should be zero");
        }
        for value in ["0.1", "12.5", "C", "-"] {
            assert!(!is_zero_equivalent(value), "{value} should not be zero");
        }
        assert!(is_placeholder("-"));
        assert!(is_placeholder(""));
        assert!(!is_placeholder("0"));
    }

    #[test]
    fn all_zero_column_is_dropped_even_when_present() {
        let records = vec![
            PropertyRecord {
                weight: 0.0,
                ..record("A")
            },
            PropertyRecord {
                weight: 0.04,
                ..record("B")
            },
        ];
        let available = compute_available_columns(&CATALOG, &records);
        assert!(!names(&available).contains(&"Weight"));
    }

    #[test]
    fn mixed_column_with_one_real_value_is_kept() {
        let records = vec![
            PropertyRecord {
                r1: FieldValue::Text("-".to_string()),
                ..record("A")
            },
            PropertyRecord {
                r1: FieldValue::Absent,
                ..record("B")
            },
            PropertyRecord {
                r1: FieldValue::Number(12.5),
                ..record("C")
            },
        ];
        let available = compute_available_columns(&CATALOG, &records);
        assert_eq!(names(&available), vec!["r1"]);
    }

    #[test]
    fn placeholder_only_column_is_dropped() {
        let records = vec![
            PropertyRecord {
                flange: FieldValue::Text("-".to_string()),
                zy5: 0.0,
                ..record("A")
            };
            3
        ];
        assert!(compute_available_columns(&CATALOG, &records).is_empty());
    }

    #[test]
    fn result_preserves_catalog_order() {
        let records = vec![PropertyRecord {
            grade: 300,
            d: 310.0,
            ix: 86.4,
            section_type: FieldValue::Text("UB".to_string()),
            residual: "HR".to_string(),
            tan_alpha: 0.25,
            ..record("310UB40.4")
        }];
        let available = compute_available_columns(&CATALOG, &records);
        assert_eq!(
            names(&available),
            vec!["Grade", "d", "Ix", "TanAlpha", "Residual", "Type"]
        );
    }

    #[test]
    fn text_columns_count_as_real_data() {
        let records = vec![PropertyRecord {
            compactness: FieldValue::Text("C".to_string()),
            ..record("A")
        }];
        let available = compute_available_columns(&CATALOG, &records);
        assert_eq!(names(&available), vec!["C,N,S"]);
    }

    #[test]
    fn empty_dataset_has_no_columns() {
        assert!(compute_available_columns(catalog(), &[]).is_empty());
    }

    #[test]
    fn fixed_precision_matches_column() {
        let sample = PropertyRecord {
            iy: 1.234,
            ag: 5120.4,
            tan_alpha: 0.4321,
            ..record("A")
        };
        let by_name = |name: &str| {
            catalog()
                .iter()
                .find(|column| column.name == name)
                .unwrap()
                .value(&sample)
        };
        assert_eq!(by_name("Iy"), "1.23");
        assert_eq!(by_name("Ag"), "5120");
        assert_eq!(by_name("TanAlpha"), "0.432");
        assert_eq!(by_name("ZeyD"), "-");
        assert_eq!(by_name("Residual"), "-");
    }
}
