//! Destination tables and their ingestion profiles
//!
//! Coercion rules are data, not code: each table carries the columns it
//! requires, the literals it treats as null, and the header substrings
//! that mark a column as numeric. The markers are substrings rather than
//! exact names because incoming files carry open-ended header sets
//! (`COSTO AUTO`, `COSTO VIDA`, ... must all coerce).

/// The three destination tables uploads can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetTable {
    Auto,
    Renovaciones,
    Validaciones,
}

impl TargetTable {
    /// SQL table name. Closed set; safe to interpolate into statements.
    pub fn table_name(&self) -> &'static str {
        match self {
            TargetTable::Auto => "auto",
            TargetTable::Renovaciones => "renovaciones",
            TargetTable::Validaciones => "validaciones",
        }
    }

    /// Prefix used when deriving the stored object key.
    pub fn key_prefix(&self) -> &'static str {
        self.table_name()
    }

    /// The ingestion profile for this table.
    pub fn profile(&self) -> &'static TableProfile {
        match self {
            TargetTable::Auto => &AUTO_PROFILE,
            TargetTable::Renovaciones => &RENOVACIONES_PROFILE,
            TargetTable::Validaciones => &VALIDACIONES_PROFILE,
        }
    }
}

impl std::fmt::Display for TargetTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Per-table ingestion rules.
#[derive(Debug)]
pub struct TableProfile {
    /// Columns that must be present (case-insensitive) in the header row.
    pub required_columns: &'static [&'static str],
    /// Literal values normalized to null before coercion.
    pub null_literals: &'static [&'static str],
    /// Case-insensitive header substrings marking a column as numeric.
    pub numeric_markers: &'static [&'static str],
}

pub static RENOVACIONES_PROFILE: TableProfile = TableProfile {
    required_columns: &["SOLICITUD", "NOMBRE", "CREDITO", "VIGENCIA AUTO"],
    null_literals: &["NaT", "NaN"],
    numeric_markers: &[
        "solicitud",
        "acreditado",
        "credito",
        "costo",
        "total",
        "poliza",
        "modulo",
    ],
};

pub static VALIDACIONES_PROFILE: TableProfile = TableProfile {
    required_columns: &[],
    null_literals: &[],
    numeric_markers: &[],
};

pub static AUTO_PROFILE: TableProfile = TableProfile {
    required_columns: &[],
    null_literals: &["NaT", "NaN"],
    numeric_markers: &["credito", "sucursal", "tasa", "prima", "aseg", "poliza"],
};

impl TableProfile {
    /// Whether values under this header should attempt numeric coercion.
    pub fn is_numeric_column(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        self.numeric_markers.iter().any(|marker| header.contains(marker))
    }

    /// Required columns absent from `headers` (case-insensitive), in
    /// declaration order.
    pub fn missing_columns(&self, headers: &[String]) -> Vec<String> {
        self.required_columns
            .iter()
            .filter(|required| {
                !headers.iter().any(|header| header.eq_ignore_ascii_case(required))
            })
            .map(|required| required.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_renovaciones_numeric_markers() {
        let profile = TargetTable::Renovaciones.profile();
        assert!(profile.is_numeric_column("COSTO AUTO"));
        assert!(profile.is_numeric_column("NO. POLIZA VIDA"));
        assert!(profile.is_numeric_column("Modulo"));
        assert!(!profile.is_numeric_column("NOMBRE"));
        assert!(!profile.is_numeric_column("VIGENCIA AUTO"));
    }

    #[test]
    fn test_validaciones_has_no_coercion() {
        let profile = TargetTable::Validaciones.profile();
        assert!(!profile.is_numeric_column("SOLICITUD"));
        assert!(profile.null_literals.is_empty());
    }

    #[test]
    fn test_missing_columns_named_in_order() {
        let profile = TargetTable::Renovaciones.profile();
        let missing = profile.missing_columns(&headers(&["NOMBRE", "CREDITO"]));
        assert_eq!(missing, vec!["SOLICITUD", "VIGENCIA AUTO"]);
    }

    #[test]
    fn test_required_columns_case_insensitive() {
        let profile = TargetTable::Renovaciones.profile();
        let missing =
            profile.missing_columns(&headers(&["solicitud", "nombre", "credito", "vigencia auto"]));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_table_names() {
        assert_eq!(TargetTable::Auto.table_name(), "auto");
        assert_eq!(TargetTable::Renovaciones.to_string(), "renovaciones");
        assert_eq!(TargetTable::Validaciones.key_prefix(), "validaciones");
    }
}
